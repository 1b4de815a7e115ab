/*!
 * Logging functionality for thingcodec.
 *
 * Codecs report diagnostics through `tracing`; this module installs the subscriber, which
 * writes to stderr, and provides the per-accessory span codec output is recorded under.
 */
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::codec::DeviceModel;
use crate::config::LoggingConfig;
use crate::error::{Error, Result};
use crate::types::Id;

/// Initialize the logging system from configuration, optionally emitting JSON lines.
///
/// A `RUST_LOG` directive, when set, takes precedence over the configured level.
pub fn init_from_config(config: &LoggingConfig) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    install(filter, config.json_format)
}

/// Initialize the logging system with the configured level, ignoring `RUST_LOG`
///
/// # Arguments
///
/// * `config` - Logging configuration; `level` is a filter string (e.g., "debug",
///   "thingcodec_devices=trace")
pub fn init_forced(config: &LoggingConfig) -> Result<()> {
    install(forced_filter(&config.level)?, config.json_format)
}

fn forced_filter(level: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(level)
        .map_err(|e| Error::config(format!("Invalid log filter '{}': {}", level, e)))
}

fn install(filter: EnvFilter, json_format: bool) -> Result<()> {
    let layer = fmt::layer().with_writer(std::io::stderr).with_target(true);

    let result = if json_format {
        tracing_subscriber::registry()
            .with(layer.json())
            .with(filter)
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(layer)
            .with(filter)
            .try_init()
    };

    result.map_err(|e| Error::other(format!("Failed to initialize logging: {}", e)))
}

/// A type alias for a tracing span
pub type Span = tracing::Span;

/// Create the span a codec instance's output is recorded under
///
/// # Arguments
///
/// * `name` - The accessory name
/// * `model` - The device model served
/// * `id` - The codec instance id
pub fn accessory_span(name: &str, model: DeviceModel, id: &Id) -> Span {
    tracing::info_span!("accessory", name = %name, model = %model, id = %id)
}

#[cfg(test)]
mod tests {
    use super::*;

    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn test_init() {
        // Only the first initialization in a process can succeed
        let _ = init_from_config(&LoggingConfig::default());
        assert!(init_forced(&LoggingConfig::default()).is_err());
    }

    #[test]
    fn test_forced_filter_ignores_rust_log() {
        std::env::set_var("RUST_LOG", "error");
        let filter = forced_filter("debug");
        std::env::remove_var("RUST_LOG");

        assert_eq!(filter.unwrap().max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn test_forced_filter_rejects_bad_directive() {
        assert!(matches!(
            forced_filter("thingcodec_devices=loud"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_accessory_span() {
        let id = Id::from_string("abc");
        let span = accessory_span("hallway", DeviceModel::Th6320zw, &id);
        let _entered = span.enter();
    }
}
