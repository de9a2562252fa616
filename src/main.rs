//! `client [-r n pr1=value1 pr2=value2 ...] <URL>`
//!
//! Fetches a URL over plain HTTP, printing the final response to stdout or
//! saving an `image/png` body to disk.

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;

use plain_http_client::cli::{Cli, USAGE};
use plain_http_client::config::{load_config, validation::validate_config, ClientConfig, ConfigError};
use plain_http_client::error::EXIT_SUCCESS;
use plain_http_client::observability::logging;
use plain_http_client::{Client, ClientError, Outcome};

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            if e.is_usage() {
                eprintln!("{e}");
                if !matches!(e, ClientError::Usage(_)) {
                    eprintln!("{USAGE}");
                }
            } else {
                tracing::error!(error = %e, "Request failed");
                eprintln!("error: {e}");
            }
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(cli: &Cli) -> Result<(), ClientError> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ClientConfig::default(),
    };
    cli.apply_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init(&config.observability.log_level);

    let args = cli.fetch_args()?;
    tracing::info!(
        url = %args.url,
        query = args.query.as_str(),
        max_redirects = config.limits.max_redirects,
        "plain-http-client v0.1.0 starting"
    );

    let mut client = Client::new(&config);
    match client.fetch(&args.url, &args.query)? {
        Outcome::Delivered(delivery) => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(&delivery.response)
                .and_then(|_| stdout.write_all(b"\n"))
                .and_then(|_| stdout.flush())
                .map_err(ClientError::Output)?;
        }
        Outcome::SavedBinary {
            artifact,
            redirects,
        } => {
            println!(
                "Saved {} bytes to {} after {} redirect(s)",
                artifact.bytes,
                artifact.path.display(),
                redirects
            );
        }
    }

    Ok(())
}
