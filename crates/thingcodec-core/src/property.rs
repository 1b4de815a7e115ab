/*!
 * Property vocabulary shared with the host framework.
 *
 * Property names and framework-side enumerations must match the host's spelling exactly,
 * since they are the contract a codec is looked up by.
 */
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::Value;

/// A device capability property known to the host framework
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Property {
    /// Heating/cooling state the device reports it is in
    CurrentHeatingCoolingState,
    /// Heating/cooling state commanded by the framework
    TargetHeatingCoolingState,
    /// Measured temperature
    CurrentTemperature,
    /// Single setpoint the framework exposes
    TargetTemperature,
    /// Unit the device displays temperatures in
    TemperatureDisplayUnits,
    /// Device cooling setpoint
    CoolingThresholdTemperature,
    /// Device heating setpoint
    HeatingThresholdTemperature,
    /// Lock state commanded by the framework
    LockTargetState,
    /// Lock state reported by the device
    LockCurrentState,
    /// Battery charge level
    BatteryLevel,
    /// Low battery indicator
    StatusLowBattery,
}

impl Property {
    /// Every property in the vocabulary
    pub const ALL: [Property; 11] = [
        Property::CurrentHeatingCoolingState,
        Property::TargetHeatingCoolingState,
        Property::CurrentTemperature,
        Property::TargetTemperature,
        Property::TemperatureDisplayUnits,
        Property::CoolingThresholdTemperature,
        Property::HeatingThresholdTemperature,
        Property::LockTargetState,
        Property::LockCurrentState,
        Property::BatteryLevel,
        Property::StatusLowBattery,
    ];

    /// The name the host framework uses for this property
    pub fn as_str(&self) -> &'static str {
        match self {
            Property::CurrentHeatingCoolingState => "currentHeatingCoolingState",
            Property::TargetHeatingCoolingState => "targetHeatingCoolingState",
            Property::CurrentTemperature => "currentTemperature",
            Property::TargetTemperature => "targetTemperature",
            Property::TemperatureDisplayUnits => "temperatureDisplayUnits",
            Property::CoolingThresholdTemperature => "coolingThresholdTemperature",
            Property::HeatingThresholdTemperature => "heatingThresholdTemperature",
            Property::LockTargetState => "lockTargetState",
            Property::LockCurrentState => "lockCurrentState",
            Property::BatteryLevel => "batteryLevel",
            Property::StatusLowBattery => "statusLowBattery",
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Property {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Property::ALL
            .iter()
            .find(|property| property.as_str() == s)
            .copied()
            .ok_or(())
    }
}

/// Generates a framework enumeration that travels as an exact, case-sensitive string.
macro_rules! framework_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// The framework's spelling of this value
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            /// Match a framework value exactly, as the host sends it
            pub fn from_value(value: &Value) -> Option<Self> {
                value.as_str().and_then(|s| s.parse().ok())
            }
        }

        impl FromStr for $name {
            type Err = ();

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    _ => Err(()),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<$name> for Value {
            fn from(v: $name) -> Self {
                Value::String(v.as_str().to_string())
            }
        }
    };
}

framework_enum! {
    /// Heating/cooling mode as the framework names it
    HeatingCoolingState {
        /// Heating and cooling off
        Off => "OFF",
        /// Heating
        Heat => "HEAT",
        /// Cooling
        Cool => "COOL",
        /// Automatic heat/cool
        Auto => "AUTO",
    }
}

framework_enum! {
    /// Temperature display unit
    TemperatureDisplayUnits {
        /// Degrees Fahrenheit
        Fahrenheit => "FAHRENHEIT",
        /// Degrees Celsius
        Celsius => "CELSIUS",
    }
}

framework_enum! {
    /// Lock state as the framework names it
    LockState {
        /// Unsecured
        Unsecured => "U",
        /// Secured
        Secured => "S",
        /// Reported, but not a state the framework knows
        Unknown => "?",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_names_round_trip() {
        for property in Property::ALL {
            assert_eq!(property.as_str().parse::<Property>(), Ok(property));
        }
        assert!("TargetTemperature".parse::<Property>().is_err());
        assert!("currentRelativeHumidity".parse::<Property>().is_err());
    }

    #[test]
    fn test_property_serde_uses_host_names() {
        let json = serde_json::to_string(&Property::LockTargetState).unwrap();
        assert_eq!(json, "\"lockTargetState\"");

        let property: Property = serde_json::from_str("\"temperatureDisplayUnits\"").unwrap();
        assert_eq!(property, Property::TemperatureDisplayUnits);
    }

    #[test]
    fn test_framework_values_are_case_sensitive() {
        assert_eq!(
            HeatingCoolingState::from_value(&Value::from("HEAT")),
            Some(HeatingCoolingState::Heat)
        );
        assert_eq!(HeatingCoolingState::from_value(&Value::from("heat")), None);
        assert_eq!(HeatingCoolingState::from_value(&Value::from(1)), None);

        assert_eq!(LockState::from_value(&Value::from("S")), Some(LockState::Secured));
        assert_eq!(Value::from(LockState::Unknown), Value::from("?"));
        assert_eq!(TemperatureDisplayUnits::Celsius.to_string(), "CELSIUS");
    }
}
