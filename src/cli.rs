//! Command-line interface.
//!
//! ```text
//! client [-r n pr1=value1 pr2=value2 ...] <URL>
//! ```
//!
//! `-r` takes a count followed by that many `key=value` tokens. Because clap
//! collects every token after `-r`, anything past the declared count is
//! treated as a URL. When several URLs are given the last one wins.

use std::path::PathBuf;

use clap::Parser;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::http::QueryString;

pub const USAGE: &str = "Usage: client [-r n <pr1=value1 pr2=value2 ...>] <URL>";

#[derive(Debug, Parser)]
#[command(name = "client")]
#[command(about = "Fetch a URL over plain HTTP, following redirects", long_about = None)]
#[command(override_usage = "client [OPTIONS] [-r n pr1=value1 pr2=value2 ...] <URL>")]
pub struct Cli {
    /// Target URL (http://host[:port][/path]).
    #[arg(value_name = "URL")]
    pub urls: Vec<String>,

    /// Parameter count followed by that many key=value tokens.
    #[arg(short = 'r', value_name = "N PARAMS", num_args = 1..)]
    pub params: Option<Vec<String>>,

    /// TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Where an image/png payload is written.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Maximum number of redirects to follow.
    #[arg(long)]
    pub max_redirects: Option<u32>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,
}

/// What to fetch, resolved from the raw arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchArgs {
    pub url: String,
    pub query: QueryString,
}

impl Cli {
    /// Resolve the URL and query string.
    pub fn fetch_args(&self) -> Result<FetchArgs> {
        let mut urls = self.urls.clone();
        let mut query = QueryString::default();

        if let Some(tokens) = &self.params {
            let (count, rest) = tokens.split_first().ok_or_else(missing_count)?;
            if count.is_empty() || !count.bytes().all(|b| b.is_ascii_digit()) {
                return Err(missing_count());
            }
            let n: usize = count.parse().map_err(|_| missing_count())?;
            if rest.len() < n {
                return Err(ClientError::Usage(USAGE.to_string()));
            }
            query = QueryString::from_pairs(&rest[..n])?;
            urls.extend(rest[n..].iter().cloned());
        }

        let url = urls.pop().ok_or_else(|| ClientError::Usage(USAGE.to_string()))?;
        Ok(FetchArgs { url, query })
    }

    /// Apply flag overrides on top of file configuration.
    pub fn apply_overrides(&self, config: &mut ClientConfig) {
        if let Some(output) = &self.output {
            config.output.png_path = output.clone();
        }
        if let Some(max) = self.max_redirects {
            config.limits.max_redirects = max;
        }
        if let Some(level) = &self.log_level {
            config.observability.log_level = level.clone();
        }
    }
}

fn missing_count() -> ClientError {
    ClientError::Usage("Usage: -r must be followed by a positive number".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("client").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_url_only() {
        let args = parse(&["http://example.com/"]).fetch_args().unwrap();
        assert_eq!(args.url, "http://example.com/");
        assert!(args.query.is_empty());
    }

    #[test]
    fn test_params_before_url() {
        let args = parse(&["-r", "2", "a=1", "b=2", "http://example.com/x"])
            .fetch_args()
            .unwrap();
        assert_eq!(args.url, "http://example.com/x");
        assert_eq!(args.query.as_str(), "?a=1&b=2");
    }

    #[test]
    fn test_params_after_url() {
        let args = parse(&["http://example.com/x", "-r", "1", "k=v"])
            .fetch_args()
            .unwrap();
        assert_eq!(args.url, "http://example.com/x");
        assert_eq!(args.query.as_str(), "?k=v");
    }

    #[test]
    fn test_usage_errors() {
        let err = parse(&["-r", "1", "a=1"]).fetch_args().unwrap_err();
        assert!(matches!(err, ClientError::Usage(_)));

        let err = parse(&["-r", "x", "http://example.com"]).fetch_args().unwrap_err();
        assert!(err.is_usage());

        let err = parse(&["-r", "3", "a=1", "http://example.com"]).fetch_args().unwrap_err();
        assert!(matches!(err, ClientError::Usage(_)));

        let err = parse(&["-r", "1", "novalue", "http://example.com"])
            .fetch_args()
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidParam(_)));

        let err = parse(&[]).fetch_args().unwrap_err();
        assert!(err.is_usage());
    }

    #[test]
    fn test_overrides() {
        let cli = parse(&[
            "--output",
            "cat.png",
            "--max-redirects",
            "3",
            "--log-level",
            "debug",
            "http://example.com",
        ]);
        let mut config = ClientConfig::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.output.png_path, PathBuf::from("cat.png"));
        assert_eq!(config.limits.max_redirects, 3);
        assert_eq!(config.observability.log_level, "debug");
    }
}
