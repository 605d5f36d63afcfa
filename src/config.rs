//! Configuration

use std::path::PathBuf;

use clap::Args;

/// Log output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub(crate) struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn", global = true)]
    pub(crate) log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact, global = true)]
    pub(crate) log_format: LogFormat,
}

/// Storefront data settings.
#[derive(Debug, Args)]
pub(crate) struct StorageConfig {
    /// Directory holding the persisted cart and orders
    #[arg(long, env = "SPRUCE_DATA_DIR", default_value = ".spruce", global = true)]
    pub(crate) data_dir: PathBuf,

    /// Storefront seed fixture (services and coupons)
    #[arg(
        long,
        env = "SPRUCE_FIXTURE",
        default_value = "fixtures/storefront.yml",
        global = true
    )]
    pub(crate) fixture: PathBuf,

    /// Display currency; defaults to the fixture's currency
    #[arg(long, env = "SPRUCE_CURRENCY", global = true)]
    pub(crate) currency: Option<String>,
}
