//! # Reuters News API
//!
//! A small JSON service in front of the Reuters content API. It pages
//! through keyword searches or section listings, normalizes each article to
//! `id`, `title`, `description`, `date`, `time` and `link`, drops repeated
//! ids, sorts newest first and serves the result as `{length, data}`.
//!
//! ## Usage
//!
//! ```sh
//! reuters_news_api --bind 0.0.0.0:8000
//! curl -X POST localhost:8000/reuters-by-search/ -d '{"search":"oil","pages":2}' \
//!      -H 'content-type: application/json'
//! ```
//!
//! ## Architecture
//!
//! Each request runs one pipeline, with nothing kept between requests:
//! 1. **Fetching**: one upstream call per page of 20 ([`reuters::client`])
//! 2. **Normalizing**: raw record to canonical article ([`reuters::normalize`])
//! 3. **Merging**: concatenate, dedupe by id, sort ([`pipeline`])
//! 4. **Serving**: wrap in the `{length, data}` envelope ([`handlers`])

use clap::Parser;
use std::error::Error;
use tracing::{info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod error;
mod handlers;
mod models;
mod pipeline;
mod reuters;
mod server;
mod utils;

use cli::Cli;
use reuters::client::ReutersClient;
use server::{AppState, create_app};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let args = Cli::parse();
    info!(
        bind = %args.bind,
        base_url = %args.base_url,
        timeout_secs = args.timeout_secs,
        page_concurrency = args.page_concurrency,
        "reuters_news_api starting up"
    );

    let client = ReutersClient::new(&args.base_url, args.timeout())?;
    let state = AppState::new(client, usize::from(args.page_concurrency));
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    info!(addr = %listener.local_addr()?, "Listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for ctrl-c; running until killed");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
