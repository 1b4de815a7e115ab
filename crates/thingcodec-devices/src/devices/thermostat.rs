/*!
 * Thermostat codec for the Honeywell T6 Pro Z-Wave (TH6320ZW).
 *
 * The framework always works in Celsius with a single target temperature, while the device
 * reports in its current display unit and keeps separate heating and cooling setpoints. The
 * codec converts units using the display unit it last decoded, fans a target temperature out
 * to both setpoint topics, and folds either setpoint back into the target temperature.
 */
use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use thingcodec_core::prelude::*;

use crate::conversion::{celsius_to_fahrenheit_rounded, fahrenheit_to_celsius};

/// Topic role for publishing the heating setpoint
pub const SET_HEATING_THRESHOLD_TOPIC: &str = "setHeatingThresholdTemperature";

/// Topic role for publishing the cooling setpoint
pub const SET_COOLING_THRESHOLD_TOPIC: &str = "setCoolingThresholdTemperature";

/// Raw readings at or below this are taken to be Celsius already, whatever the display unit.
///
/// The device firmware sometimes reports Celsius while set to display Fahrenheit.
const ASSUME_CELSIUS_AT_OR_BELOW: f64 = 32.0;

/// Codec for the TH6320ZW thermostat
pub struct ThermostatCodec {
    table: PropertyTable<ThermostatCodec>,
    display_units: TemperatureDisplayUnits,
    heating_threshold_topic: String,
    cooling_threshold_topic: String,
    publisher: Arc<dyn Publisher>,
    notifier: Arc<dyn Notifier>,
}

impl fmt::Debug for ThermostatCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThermostatCodec")
            .field("table", &self.table)
            .field("display_units", &self.display_units)
            .field("heating_threshold_topic", &self.heating_threshold_topic)
            .field("cooling_threshold_topic", &self.cooling_threshold_topic)
            .finish()
    }
}

impl ThermostatCodec {
    /// Create a thermostat codec.
    ///
    /// The accessory must configure both setpoint topics.
    pub fn new(context: &CodecContext) -> Result<Self> {
        let topics = &context.accessory.topics;
        let heating_threshold_topic = topics.require(SET_HEATING_THRESHOLD_TOPIC)?.to_string();
        let cooling_threshold_topic = topics.require(SET_COOLING_THRESHOLD_TOPIC)?.to_string();

        let table = PropertyTable::new()
            .with(PropertyBinding::decode_only(
                Property::CurrentHeatingCoolingState,
                Self::decode_heating_cooling_state,
            ))?
            .with(PropertyBinding::both(
                Property::TargetHeatingCoolingState,
                Self::encode_heating_cooling_state,
                Self::decode_heating_cooling_state,
            ))?
            .with(PropertyBinding::decode_only(
                Property::CurrentTemperature,
                Self::decode_current_temperature,
            ))?
            .with(PropertyBinding::encode_only(
                Property::TargetTemperature,
                Self::encode_target_temperature,
            ))?
            .with(PropertyBinding::both(
                Property::TemperatureDisplayUnits,
                Self::encode_temperature_display_units,
                Self::decode_temperature_display_units,
            ))?
            .with(PropertyBinding::both(
                Property::CoolingThresholdTemperature,
                Self::encode_cooling_threshold_temperature,
                Self::decode_cooling_threshold_temperature,
            ))?
            .with(PropertyBinding::both(
                Property::HeatingThresholdTemperature,
                Self::encode_heating_threshold_temperature,
                Self::decode_heating_threshold_temperature,
            ))?;

        Ok(Self {
            table,
            display_units: TemperatureDisplayUnits::Fahrenheit,
            heating_threshold_topic,
            cooling_threshold_topic,
            publisher: context.publisher.clone(),
            notifier: context.notifier.clone(),
        })
    }

    /// Unit the device is currently believed to report in
    pub fn display_units(&self) -> TemperatureDisplayUnits {
        self.display_units
    }

    /// `OFF`/`HEAT`/`COOL` to 0/1/2. `AUTO` is not supported by the device.
    pub fn encode_heating_cooling_state(&mut self, message: &Value) -> Option<Value> {
        let code = match HeatingCoolingState::from_value(message) {
            Some(HeatingCoolingState::Off) => 0,
            Some(HeatingCoolingState::Heat) => 1,
            Some(HeatingCoolingState::Cool) => 2,
            Some(HeatingCoolingState::Auto) | None => {
                debug!(%message, "unsupported heating/cooling state, nothing sent");
                return None;
            }
        };

        Some(Value::from(code))
    }

    /// 0/1/2 to `OFF`/`HEAT`/`COOL`
    pub fn decode_heating_cooling_state(&mut self, message: &Value) -> Option<Value> {
        let state = match message.parse_integer() {
            Some(0) => HeatingCoolingState::Off,
            Some(1) => HeatingCoolingState::Heat,
            Some(2) => HeatingCoolingState::Cool,
            _ => {
                debug!(%message, "unknown heating/cooling state code");
                return None;
            }
        };

        Some(state.into())
    }

    /// Celsius to the device's display unit. Fahrenheit is rounded to whole degrees.
    pub fn encode_temperature(&self, message: &Value) -> Option<Value> {
        let celsius = message.as_number()?;

        match self.display_units {
            TemperatureDisplayUnits::Fahrenheit => {
                Some(Value::from(celsius_to_fahrenheit_rounded(celsius)))
            }
            TemperatureDisplayUnits::Celsius => Some(message.clone()),
        }
    }

    /// Device reading to Celsius.
    ///
    /// In Fahrenheit mode readings at or below 32 are passed through as Celsius, matching
    /// what the firmware actually sends. Non-numeric input is never passed through, in either
    /// mode.
    pub fn decode_temperature(&self, message: &Value) -> Option<Value> {
        let raw = message.as_number()?;

        match self.display_units {
            TemperatureDisplayUnits::Fahrenheit if raw > ASSUME_CELSIUS_AT_OR_BELOW => {
                Some(Value::from(fahrenheit_to_celsius(raw)))
            }
            _ => Some(message.clone()),
        }
    }

    fn decode_current_temperature(&mut self, message: &Value) -> Option<Value> {
        self.decode_temperature(message)
    }

    /// Publish the target temperature to both setpoint topics.
    ///
    /// Always produces no value of its own; the publishes are the effect.
    pub fn encode_target_temperature(&mut self, message: &Value) -> Option<Value> {
        let Some(temperature) = self.encode_temperature(message) else {
            debug!(%message, "target temperature not numeric, nothing published");
            return None;
        };

        debug!(
            %temperature,
            heating = %self.heating_threshold_topic,
            cooling = %self.cooling_threshold_topic,
            "publishing target temperature to both setpoints"
        );
        self.publisher
            .publish(&self.heating_threshold_topic, temperature.clone());
        self.publisher
            .publish(&self.cooling_threshold_topic, temperature);

        None
    }

    /// Setpoints are only ever written through the target temperature
    pub fn encode_cooling_threshold_temperature(&mut self, _message: &Value) -> Option<Value> {
        None
    }

    /// Setpoints are only ever written through the target temperature
    pub fn encode_heating_threshold_temperature(&mut self, _message: &Value) -> Option<Value> {
        None
    }

    /// Fold a reported cooling setpoint into the target temperature
    pub fn decode_cooling_threshold_temperature(&mut self, message: &Value) -> Option<Value> {
        self.notify_target_temperature(message)
    }

    /// Fold a reported heating setpoint into the target temperature
    pub fn decode_heating_threshold_temperature(&mut self, message: &Value) -> Option<Value> {
        self.notify_target_temperature(message)
    }

    fn notify_target_temperature(&self, message: &Value) -> Option<Value> {
        if let Some(temperature) = self.decode_temperature(message) {
            debug!(%temperature, "notifying target temperature from setpoint");
            self.notifier
                .notify(Property::TargetTemperature, temperature);
        }

        None
    }

    /// `FAHRENHEIT`/`CELSIUS` to 0/1
    pub fn encode_temperature_display_units(&mut self, message: &Value) -> Option<Value> {
        match TemperatureDisplayUnits::from_value(message)? {
            TemperatureDisplayUnits::Fahrenheit => Some(Value::from(0)),
            TemperatureDisplayUnits::Celsius => Some(Value::from(1)),
        }
    }

    /// 0/1 to `FAHRENHEIT`/`CELSIUS`, switching the unit later conversions use
    pub fn decode_temperature_display_units(&mut self, message: &Value) -> Option<Value> {
        let units = match message.parse_integer() {
            Some(0) => TemperatureDisplayUnits::Fahrenheit,
            Some(1) => TemperatureDisplayUnits::Celsius,
            _ => {
                debug!(%message, "unknown display unit code, keeping {}", self.display_units);
                return None;
            }
        };

        if units != self.display_units {
            info!(from = %self.display_units, to = %units, "display units changed");
        }
        self.display_units = units;

        Some(units.into())
    }
}

impl PropertyCodec for ThermostatCodec {
    fn device_model(&self) -> DeviceModel {
        DeviceModel::Th6320zw
    }

    fn table(&self) -> &PropertyTable<Self> {
        &self.table
    }
}
