use clap::{Parser, ValueEnum};
use std::net::SocketAddr;
use std::time::Duration;

use crate::io::DEFAULT_LISTING_URL;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "diskzip")]
#[command(version)]
#[command(
    about = "Browse a public cloud-disk folder and download files as one zip",
    long_about = None
)]
#[command(after_help = "Examples:\n  \
  diskzip                                  serve on 127.0.0.1:5000\n  \
  diskzip --listen 0.0.0.0:8080 --log-format json\n  \
  DISKZIP_TIMEOUT=120 diskzip              allow slow downloads")]
pub struct Cli {
    /// Address to serve on
    #[arg(long, env = "DISKZIP_LISTEN", default_value = "127.0.0.1:5000")]
    pub listen: SocketAddr,

    /// Public resources listing endpoint
    #[arg(long, env = "DISKZIP_LISTING_URL", default_value = DEFAULT_LISTING_URL)]
    pub listing_url: String,

    /// Maximum number of items requested per listing
    #[arg(long, env = "DISKZIP_LISTING_LIMIT", default_value_t = 1000)]
    pub listing_limit: u32,

    /// Timeout for each outbound request, in seconds
    #[arg(long, env = "DISKZIP_TIMEOUT", default_value_t = 60)]
    pub timeout: u64,

    /// Log output format
    #[arg(long, env = "DISKZIP_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Log filter directive, e.g. "info" or "diskzip=debug,tower_http=debug"
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

impl Cli {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["diskzip"]).unwrap();
        assert_eq!(cli.listing_url, DEFAULT_LISTING_URL);
        assert_eq!(cli.listing_limit, 1000);
        assert_eq!(cli.request_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "diskzip",
            "--listen",
            "0.0.0.0:8080",
            "--timeout",
            "5",
            "--log-format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.listen.port(), 8080);
        assert_eq!(cli.request_timeout(), Duration::from_secs(5));
        assert_eq!(cli.log_format, LogFormat::Json);
    }

    #[test]
    fn rejects_bad_listen_address() {
        assert!(Cli::try_parse_from(["diskzip", "--listen", "not-an-address"]).is_err());
    }
}
