//! Spruce storefront CLI

use std::process::ExitCode;

use clap::Parser;
use tracing::error;

mod cli;
mod config;
mod observability;

#[tokio::main]
async fn main() -> ExitCode {
    _ = dotenvy::dotenv();

    let cli = cli::Cli::parse();

    if let Err(error) = observability::init_subscriber(&cli.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized yet, must use eprintln for setup errors"
        )]
        {
            eprintln!("{error}");
        }

        return ExitCode::FAILURE;
    }

    match cli.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!(%message, "command failed");

            #[expect(
                clippy::print_stderr,
                reason = "command errors are reported to the user, not only logged"
            )]
            {
                eprintln!("error: {message}");
            }

            ExitCode::FAILURE
        }
    }
}
