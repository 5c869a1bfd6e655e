//! Structured logging for the catalog tool.
//!
//! Filtering comes from `RUST_LOG` and defaults to `info`. Output goes to
//! stderr so the registrant listing on stdout stays machine-readable.

/// Installs the global `tracing-subscriber` formatter.
pub fn init_tracing() {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::{EnvFilter, fmt};

    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_span_events(FmtSpan::NONE)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_timer(fmt::time::ChronoLocal::rfc_3339())
        .with_writer(std::io::stderr)
        .init();
}
