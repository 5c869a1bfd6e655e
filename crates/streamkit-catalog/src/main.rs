//! # `streamkit-catalog`
//!
//! Loads the platform catalog, seeds it with the builtin platforms when asked,
//! and registers every platform into a [`LockRegistry`] from a pool of worker
//! threads. The registered platforms are printed to stdout as `id<TAB>name`.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin streamkit-catalog -- --catalog platforms.toml --seed-builtins
//! ```

mod config;
mod populate;
mod telemetry;

use std::io::{self, Write};

use anyhow::Context;
use clap::Parser;
use streamkit::{
    DataSerializer, JsonSerializer, LockRegistry, PersistableFile, PlatformCatalog,
    ReadOnlyRegistry, StoreError, TomlSerializer,
};

use crate::{
    config::{CatalogConfig, CliArgs, Format},
    populate::register_concurrently,
    telemetry::init_tracing,
};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = CliArgs::parse();
    let config = CatalogConfig::try_from(args)?;

    init_tracing();
    log_startup_info(&config);

    let catalog = match config.format {
        Format::Json => load_catalog(&PersistableFile::new(JsonSerializer::default()), &config)?,
        Format::Toml => load_catalog(&PersistableFile::new(TomlSerializer), &config)?,
    };

    let registry = LockRegistry::with_timeout(config.lock_timeout);
    let report = register_concurrently(&registry, catalog.into_registrants(), config.workers);
    tracing::info!(
        registered = report.registered,
        duplicates = ?report.duplicates,
        dropped = ?report.dropped,
        "platform catalog registered"
    );

    let mut out = io::stdout().lock();
    for platform in registry.all_registrants() {
        writeln!(out, "{}\t{}", platform.id, platform.name)?;
    }
    Ok(())
}

fn log_startup_info(config: &CatalogConfig) {
    if cfg!(debug_assertions) {
        tracing::info!("Starting catalog load with full config: {:#?}", config);
    } else {
        tracing::info!(
            "Loading {} with {} workers",
            config.catalog.display(),
            config.workers
        );
    }
}

fn load_catalog<S: DataSerializer>(
    store: &PersistableFile<S>,
    config: &CatalogConfig,
) -> anyhow::Result<PlatformCatalog> {
    match store.load(&config.catalog) {
        Ok(catalog) => Ok(catalog),
        Err(StoreError::NotFound { .. }) if config.seed_builtins => {
            let catalog = PlatformCatalog::builtin();
            store
                .save(&config.catalog, &catalog)
                .with_context(|| format!("seeding {}", config.catalog.display()))?;
            tracing::info!(path = %config.catalog.display(), "seeded builtin platforms");
            Ok(catalog)
        }
        Err(err) => {
            Err(err).with_context(|| format!("loading {}", config.catalog.display()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use streamkit::LockTimeout;

    fn config(catalog: PathBuf, seed_builtins: bool) -> CatalogConfig {
        CatalogConfig {
            catalog,
            format: Format::Toml,
            workers: 2,
            lock_timeout: LockTimeout::Blocking,
            seed_builtins,
        }
    }

    #[test]
    fn missing_catalog_is_seeded_when_asked() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("platforms.toml");
        let store = PersistableFile::new(TomlSerializer);

        let catalog = load_catalog(&store, &config(path.clone(), true)).unwrap();
        assert_eq!(catalog, PlatformCatalog::builtin());
        assert!(path.exists());

        let reloaded = load_catalog(&store, &config(path, false)).unwrap();
        assert_eq!(reloaded, catalog);
    }

    #[test]
    fn missing_catalog_is_an_error_without_seeding() {
        let dir = tempfile::tempdir().unwrap();
        let store = PersistableFile::new(TomlSerializer);

        let err = load_catalog(&store, &config(dir.path().join("absent.toml"), false)).unwrap_err();
        assert!(err.to_string().contains("absent.toml"));
    }
}
