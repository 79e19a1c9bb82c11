//! Tracing initialization.

use crate::cli::LogFormat;
use crate::config::Config;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber: an fmt layer on stderr, text or JSON,
/// filtered by `cfg.log_filter`.
pub fn init_tracing(cfg: &Config) {
    let filter = EnvFilter::try_new(&cfg.log_filter).unwrap_or_else(|e| {
        eprintln!("Warning: Invalid RUST_LOG '{}': {e}", cfg.log_filter);
        EnvFilter::new("frametime_log=info") // Default filter on parse error
    });

    let registry = tracing_subscriber::registry().with(filter);
    let init_result = match cfg.log_format {
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(cfg.verbose)
                    .with_level(true),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(cfg.verbose)
                    .with_level(true),
            )
            .try_init(),
    };
    if let Err(e) = init_result {
        eprintln!("Warning: tracing subscriber already initialized: {e}");
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        build_ts = env!("VERGEN_BUILD_TIMESTAMP"),
        "frametime-log starting"
    );

    info!(
        input = %cfg.input.as_ref().map_or_else(|| "<stdin>".to_string(), |p| p.display().to_string()),
        output = ?cfg.output,
        output_dir = %cfg.output_dir.display(),
        environment = ?cfg.environment,
        deferred = cfg.deferred,
        stats_json = cfg.stats_json,
        verbose = cfg.verbose,
        log_filter = %cfg.log_filter,
        "Configuration loaded"
    );
}
