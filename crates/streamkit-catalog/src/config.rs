use std::{path::PathBuf, time::Duration};

use anyhow::bail;
use clap::{Parser, ValueEnum};
use streamkit::LockTimeout;

/// Document format of the catalog file.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Toml,
}

/// Runtime configuration for the `streamkit-catalog` binary.
///
/// All values are parsed from CLI arguments or environment variables (a
/// `.env` file in the working directory is honoured).
#[derive(Parser, Debug, Clone)]
#[command(
    name = "streamkit-catalog",
    version,
    about = "Loads the platform catalog and registers it from worker threads"
)]
pub struct CliArgs {
    /// Path of the catalog document.
    ///
    /// Environment variable: `STREAMKIT_CATALOG`
    #[arg(long, env = "STREAMKIT_CATALOG", default_value = "platforms.json")]
    pub catalog: PathBuf,

    /// Document format. Inferred from the catalog's extension when omitted.
    ///
    /// Environment variable: `STREAMKIT_FORMAT`
    #[arg(long, env = "STREAMKIT_FORMAT", value_enum)]
    pub format: Option<Format>,

    /// Number of threads registering platforms concurrently.
    ///
    /// Environment variable: `STREAMKIT_WORKERS`
    #[arg(long, env = "STREAMKIT_WORKERS", default_value_t = 2)]
    pub workers: usize,

    /// How long a registry operation waits for the lock, in milliseconds.
    /// `0` waits indefinitely.
    ///
    /// Environment variable: `STREAMKIT_LOCK_TIMEOUT_MS`
    #[arg(long, env = "STREAMKIT_LOCK_TIMEOUT_MS", default_value_t = 300)]
    pub lock_timeout_ms: u64,

    /// Write the builtin platforms to the catalog path when it does not exist.
    #[arg(long, default_value_t = false)]
    pub seed_builtins: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub catalog: PathBuf,
    pub format: Format,
    pub workers: usize,
    pub lock_timeout: LockTimeout,
    pub seed_builtins: bool,
}

impl TryFrom<CliArgs> for CatalogConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.workers == 0 {
            bail!("STREAMKIT_WORKERS must be greater than 0");
        }

        let format = match args.format {
            Some(format) => format,
            None => match args.catalog.extension().and_then(|ext| ext.to_str()) {
                Some("json") => Format::Json,
                Some("toml") => Format::Toml,
                other => bail!(
                    "cannot infer the catalog format from extension {:?}; pass --format",
                    other.unwrap_or("")
                ),
            },
        };

        let lock_timeout = match args.lock_timeout_ms {
            0 => LockTimeout::Blocking,
            ms => LockTimeout::Bounded(Duration::from_millis(ms)),
        };

        Ok(Self {
            catalog: args.catalog,
            format,
            workers: args.workers,
            lock_timeout,
            seed_builtins: args.seed_builtins,
        })
    }
}
