/*!
 * Prelude module for thingcodec Core.
 *
 * This module re-exports commonly used types so codec implementations can import them in one
 * line.
 */

// Re-export error types
pub use crate::error::{Error, Result};

// Re-export core types
pub use crate::types::{Id, Value};

// Re-export the property vocabulary
pub use crate::property::{HeatingCoolingState, LockState, Property, TemperatureDisplayUnits};

// Re-export codec contract
pub use crate::codec::{
    BindingSummary, Codec, CodecContext, Converter, DeviceModel, Direction, PropertyBinding,
    PropertyCodec, PropertyTable,
};

// Re-export collaborator handles
pub use crate::bus::{Delivery, Notifier, Publisher, RecordingBus};

// Re-export config types
pub use crate::config::{AccessoryConfig, Config, ConfigBuilder, Topics};

// Re-export logging macros
pub use tracing::{debug, error, info, trace, warn};
