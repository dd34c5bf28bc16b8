use crate::config::AppConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Dependencies are held at `warn`; `log_level` applies to this crate only.
/// sqlx in particular logs every statement at info.
pub fn log_filter(config: &AppConfig) -> String {
    format!(
        "warn,{}={}",
        env!("CARGO_PKG_NAME").replace('-', "_"),
        config.log_level
    )
}

/// Install the global subscriber. The returned guard must live until shutdown
/// or buffered file output is lost. `RUST_LOG` overrides [`log_filter`].
pub fn init_logging(config: &AppConfig) -> WorkerGuard {
    let file_appender = match config.rotation.as_str() {
        "hourly" => tracing_appender::rolling::hourly(&config.log_dir, &config.log_file),
        "daily" => tracing_appender::rolling::daily(&config.log_dir, &config.log_file),
        _ => tracing_appender::rolling::never(&config.log_dir, &config.log_file),
    };
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_filter(config)));

    // Transfer outcomes carry their detail in fields (sender, receiver, state),
    // so the target is kept in both formats.
    let file_layer = fmt::layer()
        .with_target(true)
        .with_writer(non_blocking)
        .with_ansi(false);
    let registry = tracing_subscriber::registry().with(filter);

    if config.use_json {
        registry.with(file_layer.json()).init();
    } else {
        let stdout_layer = fmt::layer().with_target(true).with_ansi(true);
        registry.with(file_layer).with(stdout_layer).init();
    }

    tracing::info!(
        dir = %config.log_dir,
        file = %config.log_file,
        rotation = %config.rotation,
        json = config.use_json,
        "Logging initialized"
    );
    guard
}
