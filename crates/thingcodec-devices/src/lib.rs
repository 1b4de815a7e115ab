/*!
 * thingcodec Devices
 *
 * This crate provides the per-device codecs and the registry that builds the right codec for
 * a configured accessory.
 */

#![warn(missing_docs)]

// Re-export core types
pub use thingcodec_core::prelude;

pub mod conversion;
pub mod devices;
pub mod registry;

// Re-export codecs and registry
pub use devices::{LockCodec, SensorCodec, ThermostatCodec};
pub use registry::{Accessory, CodecFactory, CodecRegistry};

/// thingcodec devices crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
