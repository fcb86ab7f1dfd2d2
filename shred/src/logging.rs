// Logging setup for shred hosts.
//
// Built on the `tracing` ecosystem. Library code logs through the
// `EventLog` port (which defaults to the `tracing` macros); a host binary
// calls one of the initializers here once, early in `main`, to install a
// global subscriber.
//
// ```rust
// use shred::logging;
//
// // Default settings (INFO level, console output)
// logging::init_default();
//
// // Or custom settings
// let config = logging::LogConfig {
//     level: tracing::Level::DEBUG,
//     ..Default::default()
// };
// logging::init(config);
// ```

use std::sync::Once;
use tracing::{Level, Subscriber};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Configuration for the host logging setup.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum log level to display
    pub level: Level,
    /// Whether to use JSON format for logs
    pub json_format: bool,
    /// Whether to include file and line information
    pub show_file_line: bool,
    /// Whether to include thread name/id
    pub show_thread_info: bool,
    /// Target filter expressions (format: "target=level,target2=level2,...")
    pub target_filters: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            json_format: false,
            show_file_line: false,
            show_thread_info: true,
            target_filters: None,
        }
    }
}

// Initialization guard to ensure we only initialize once
static INIT: Once = Once::new();

/// Install the global tracing subscriber with the given configuration.
///
/// Safe to call multiple times; only the first call takes effect.
pub fn init(config: LogConfig) {
    INIT.call_once(|| {
        let mut env_filter = EnvFilter::from_default_env().add_directive(config.level.into());

        if let Some(filters) = config.target_filters {
            for filter in filters.split(',') {
                if let Ok(directive) = filter.parse() {
                    env_filter = env_filter.add_directive(directive);
                }
            }
        }

        let fmt_layer = fmt::layer()
            .with_ansi(atty::is(atty::Stream::Stdout))
            .with_file(config.show_file_line)
            .with_line_number(config.show_file_line)
            .with_thread_names(config.show_thread_info)
            .with_thread_ids(config.show_thread_info);

        let registry = tracing_subscriber::registry().with(env_filter);

        let subscriber: Box<dyn Subscriber + Send + Sync> = if config.json_format {
            Box::new(registry.with(fmt::layer().json().flatten_event(true)))
        } else {
            Box::new(registry.with(fmt_layer))
        };

        if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
            eprintln!("Error setting global tracing subscriber: {}", err);
        }
    });
}

/// Reasonable defaults: INFO level, human-readable console output.
pub fn init_default() {
    init(LogConfig::default());
}

/// Development-friendly settings: DEBUG level with file/line info.
pub fn init_development() {
    init(LogConfig {
        level: Level::DEBUG,
        show_file_line: true,
        ..Default::default()
    });
}

/// Production settings: INFO level, JSON output for log aggregation.
pub fn init_production() {
    init(LogConfig {
        level: Level::INFO,
        json_format: true,
        ..Default::default()
    });
}
