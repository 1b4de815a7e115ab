/*!
 * thingcodec Core
 *
 * This crate provides the shared pieces every device codec is built from: values and the
 * property vocabulary, property tables and the codec contract, collaborator handles,
 * configuration, and logging.
 */

#![warn(missing_docs)]

pub mod bus;
pub mod codec;
pub mod config;
pub mod error;
pub mod logging;
pub mod prelude;
pub mod property;
pub mod types;

/// Re-export of dependencies that are part of the public API
pub mod deps {
    pub use serde;
    pub use tracing;
}

/// thingcodec core crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
