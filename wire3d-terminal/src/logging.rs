/// Logger bootstrap for the `wire3d` binary
use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "wire3d_core=debug").
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

/// Installs the global logger once; later calls are ignored.
///
/// The filter comes from `config.env_filter`, then `RUST_LOG`, then `warn`.
/// Output goes to stderr so it never mixes with frames drawn on stdout.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = config.env_filter {
            builder.parse_filters(&filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Warn);
        }

        builder.write_style(config.write_style);
        builder.target(env_logger::Target::Stderr);
        builder.init();

        log::debug!("logging initialized");
    });
}
