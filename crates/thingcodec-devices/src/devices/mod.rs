/*!
 * Device codec implementations for thingcodec.
 *
 * This module contains one codec per supported device model.
 */

// Export device codecs
pub mod lock;
pub mod sensor;
pub mod thermostat;

// Re-export specific codecs for convenience
pub use lock::LockCodec;
pub use sensor::SensorCodec;
pub use thermostat::ThermostatCodec;
