//! Command-line interface definitions for the Reuters news API.
//!
//! All options can be given as flags or through environment variables.

use crate::reuters::client::DEFAULT_BASE_URL;
use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;

/// Runtime configuration for the server.
///
/// # Examples
///
/// ```sh
/// # Serve on the default address
/// reuters_news_api
///
/// # Custom address, fetch up to four pages at a time
/// reuters_news_api --bind 127.0.0.1:9000 --page-concurrency 4
/// ```
#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Cli {
    /// Address the HTTP server listens on
    #[arg(short, long, env = "BIND_ADDR", default_value = "0.0.0.0:8000")]
    pub bind: SocketAddr,

    /// Origin of the Reuters content API
    #[arg(long, env = "REUTERS_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Per-request timeout for upstream calls, in seconds
    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// How many result pages may be fetched at once for a single request
    #[arg(
        long,
        env = "PAGE_CONCURRENCY",
        default_value_t = 1,
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub page_concurrency: u16,
}

impl Cli {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
