/*!
 * The codec contract.
 *
 * A codec translates between framework property values and a device's wire values. Each
 * device codec owns a [`PropertyTable`] mapping properties to an encoder and/or decoder, plus
 * generic passthrough functions used for anything the table does not cover. A converter
 * returning `None` means "no value produced": the caller must not publish or apply anything.
 */
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::bus::{Notifier, Publisher};
use crate::config::AccessoryConfig;
use crate::error::{Error, Result};
use crate::property::Property;
use crate::types::{Id, Value};

/// Supported device models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceModel {
    /// Honeywell T6 Pro Z-Wave thermostat
    Th6320zw,
    /// Yale Assure lock with Z-Wave module
    Yrd226,
    /// Zooz temperature/humidity XS sensor
    Zse44,
}

impl DeviceModel {
    /// Every supported model
    pub const ALL: [DeviceModel; 3] = [
        DeviceModel::Th6320zw,
        DeviceModel::Yrd226,
        DeviceModel::Zse44,
    ];

    /// Model code used in configuration
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceModel::Th6320zw => "th6320zw",
            DeviceModel::Yrd226 => "yrd226",
            DeviceModel::Zse44 => "zse44",
        }
    }

    /// Human readable device description
    pub fn description(&self) -> &'static str {
        match self {
            DeviceModel::Th6320zw => "Honeywell T6 Pro Z-Wave thermostat",
            DeviceModel::Yrd226 => "Yale Assure lock (Z-Wave)",
            DeviceModel::Zse44 => "Zooz temperature/humidity XS sensor",
        }
    }
}

impl fmt::Display for DeviceModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceModel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        DeviceModel::ALL
            .iter()
            .find(|model| model.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| Error::unknown_model(s))
    }
}

/// A conversion function bound to a property
pub type Converter<C> = fn(&mut C, &Value) -> Option<Value>;

/// Conversion direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Framework value to device value
    Encode,
    /// Device value to framework value
    Decode,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Encode => f.write_str("encode"),
            Direction::Decode => f.write_str("decode"),
        }
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "encode" => Ok(Direction::Encode),
            "decode" => Ok(Direction::Decode),
            _ => Err(Error::other(format!("unknown direction '{}'", s))),
        }
    }
}

/// A property with its encoder and/or decoder.
///
/// The constructors guarantee at least one of the two is present.
pub struct PropertyBinding<C> {
    property: Property,
    encode: Option<Converter<C>>,
    decode: Option<Converter<C>>,
}

impl<C> PropertyBinding<C> {
    /// Bind an encoder only
    pub fn encode_only(property: Property, encode: Converter<C>) -> Self {
        Self {
            property,
            encode: Some(encode),
            decode: None,
        }
    }

    /// Bind a decoder only
    pub fn decode_only(property: Property, decode: Converter<C>) -> Self {
        Self {
            property,
            encode: None,
            decode: Some(decode),
        }
    }

    /// Bind both directions
    pub fn both(property: Property, encode: Converter<C>, decode: Converter<C>) -> Self {
        Self {
            property,
            encode: Some(encode),
            decode: Some(decode),
        }
    }

    /// The bound property
    pub fn property(&self) -> Property {
        self.property
    }

    /// Converter for a direction, if bound
    pub fn converter(&self, direction: Direction) -> Option<Converter<C>> {
        match direction {
            Direction::Encode => self.encode,
            Direction::Decode => self.decode,
        }
    }
}

impl<C> fmt::Debug for PropertyBinding<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyBinding")
            .field("property", &self.property)
            .field("encode", &self.encode.is_some())
            .field("decode", &self.decode.is_some())
            .finish()
    }
}

/// Which directions a property supports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BindingSummary {
    /// The property
    pub property: Property,
    /// Has an encoder
    pub encodes: bool,
    /// Has a decoder
    pub decodes: bool,
}

/// The property bindings of one codec
pub struct PropertyTable<C> {
    bindings: BTreeMap<Property, PropertyBinding<C>>,
}

impl<C> PropertyTable<C> {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            bindings: BTreeMap::new(),
        }
    }

    /// Register a binding. A property may only be bound once.
    pub fn register(&mut self, binding: PropertyBinding<C>) -> Result<()> {
        let property = binding.property();
        if self.bindings.contains_key(&property) {
            return Err(Error::duplicate_binding(property.as_str()));
        }

        self.bindings.insert(property, binding);
        Ok(())
    }

    /// Builder-style [`register`](Self::register)
    pub fn with(mut self, binding: PropertyBinding<C>) -> Result<Self> {
        self.register(binding)?;
        Ok(self)
    }

    /// Binding for a property
    pub fn binding(&self, property: Property) -> Option<&PropertyBinding<C>> {
        self.bindings.get(&property)
    }

    /// Converter registered for a property name and direction
    pub fn converter(&self, property: &str, direction: Direction) -> Option<Converter<C>> {
        let property = property.parse::<Property>().ok()?;
        self.binding(property)?.converter(direction)
    }

    /// Encoder registered for a property name
    pub fn encoder(&self, property: &str) -> Option<Converter<C>> {
        self.converter(property, Direction::Encode)
    }

    /// Decoder registered for a property name
    pub fn decoder(&self, property: &str) -> Option<Converter<C>> {
        self.converter(property, Direction::Decode)
    }

    /// Which directions each bound property supports
    pub fn summary(&self) -> Vec<BindingSummary> {
        let mut summary: Vec<_> = self
            .bindings
            .values()
            .map(|binding| BindingSummary {
                property: binding.property,
                encodes: binding.encode.is_some(),
                decodes: binding.decode.is_some(),
            })
            .collect();
        summary.sort_by_key(|entry| entry.property.as_str());
        summary
    }

    /// Number of bound properties
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether nothing is bound
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl<C> Default for PropertyTable<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for PropertyTable<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.bindings.values()).finish()
    }
}

/// Everything a codec is constructed with
#[derive(Clone)]
pub struct CodecContext {
    /// Instance identifier, used to correlate log output
    pub id: Id,
    /// The accessory's configuration
    pub accessory: AccessoryConfig,
    /// Direct publish capability
    pub publisher: Arc<dyn Publisher>,
    /// Property notification capability
    pub notifier: Arc<dyn Notifier>,
}

impl CodecContext {
    /// Create a context with a fresh instance id
    pub fn new(
        accessory: AccessoryConfig,
        publisher: Arc<dyn Publisher>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            id: Id::new(),
            accessory,
            publisher,
            notifier,
        }
    }
}

impl fmt::Debug for CodecContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecContext")
            .field("id", &self.id)
            .field("accessory", &self.accessory)
            .finish_non_exhaustive()
    }
}

/// A device codec built around a property table.
///
/// Implementing this trait is enough to get [`Codec`].
pub trait PropertyCodec: Send + fmt::Debug + Sized {
    /// The device model this codec serves
    fn device_model(&self) -> DeviceModel;

    /// The codec's property bindings
    fn table(&self) -> &PropertyTable<Self>;

    /// Fallback encoder for properties without a specific encoder
    fn encode_generic(&mut self, message: &Value) -> Option<Value> {
        Some(message.clone())
    }

    /// Fallback decoder for properties without a specific decoder
    fn decode_generic(&mut self, message: &Value) -> Option<Value> {
        Some(message.clone())
    }
}

/// A device codec as seen by the host
pub trait Codec: Send + fmt::Debug {
    /// The device model this codec serves
    fn model(&self) -> DeviceModel;

    /// Which properties have specific converters, and in which directions
    fn properties(&self) -> Vec<BindingSummary>;

    /// Encode a framework value for `property`. `None` means nothing should be sent.
    fn encode(&mut self, property: &str, message: &Value) -> Option<Value>;

    /// Decode a device value for `property`. `None` means nothing should be applied.
    fn decode(&mut self, property: &str, message: &Value) -> Option<Value>;
}

impl<C: PropertyCodec> Codec for C {
    fn model(&self) -> DeviceModel {
        self.device_model()
    }

    fn properties(&self) -> Vec<BindingSummary> {
        self.table().summary()
    }

    fn encode(&mut self, property: &str, message: &Value) -> Option<Value> {
        let encoder = self.table().encoder(property);
        match encoder {
            Some(encode) => {
                trace!(property, %message, "encode");
                encode(self, message)
            }
            None => {
                trace!(property, %message, "generic encode");
                self.encode_generic(message)
            }
        }
    }

    fn decode(&mut self, property: &str, message: &Value) -> Option<Value> {
        let decoder = self.table().decoder(property);
        match decoder {
            Some(decode) => {
                trace!(property, %message, "decode");
                decode(self, message)
            }
            None => {
                trace!(property, %message, "generic decode");
                self.decode_generic(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Doubler {
        table: PropertyTable<Doubler>,
        decoded: usize,
    }

    impl Doubler {
        fn new() -> Result<Self> {
            let table = PropertyTable::new()
                .with(PropertyBinding::both(
                    Property::CurrentTemperature,
                    Doubler::double,
                    Doubler::count_and_halve,
                ))?
                .with(PropertyBinding::encode_only(
                    Property::TargetTemperature,
                    Doubler::suppress,
                ))?;
            Ok(Self { table, decoded: 0 })
        }

        fn double(&mut self, message: &Value) -> Option<Value> {
            message.as_number().map(|n| Value::from(n * 2.0))
        }

        fn count_and_halve(&mut self, message: &Value) -> Option<Value> {
            self.decoded += 1;
            message.as_number().map(|n| Value::from(n / 2.0))
        }

        fn suppress(&mut self, _message: &Value) -> Option<Value> {
            None
        }
    }

    impl PropertyCodec for Doubler {
        fn device_model(&self) -> DeviceModel {
            DeviceModel::Zse44
        }

        fn table(&self) -> &PropertyTable<Self> {
            &self.table
        }
    }

    #[test]
    fn test_dispatch_uses_bound_converters() {
        let mut codec = Doubler::new().unwrap();

        assert_eq!(codec.encode("currentTemperature", &Value::from(2)), Some(Value::from(4.0)));
        assert_eq!(codec.decode("currentTemperature", &Value::from(4)), Some(Value::from(2.0)));
        assert_eq!(codec.decoded, 1);

        assert_eq!(codec.encode("targetTemperature", &Value::from(20)), None);
    }

    #[test]
    fn test_missing_direction_and_unknown_names_fall_back_to_generic() {
        let mut codec = Doubler::new().unwrap();

        // targetTemperature has no decoder
        assert_eq!(codec.decode("targetTemperature", &Value::from(7)), Some(Value::from(7)));
        assert_eq!(codec.encode("brightness", &Value::from("x")), Some(Value::from("x")));
        assert_eq!(codec.decode("", &Value::Null), Some(Value::Null));
        assert_eq!(codec.decoded, 0);
    }

    #[test]
    fn test_duplicate_binding_rejected() {
        let result = PropertyTable::<Doubler>::new()
            .with(PropertyBinding::decode_only(
                Property::CurrentTemperature,
                Doubler::count_and_halve,
            ))
            .and_then(|table| {
                table.with(PropertyBinding::encode_only(
                    Property::CurrentTemperature,
                    Doubler::double,
                ))
            });

        assert!(matches!(result, Err(Error::DuplicateBinding(p)) if p == "currentTemperature"));
    }

    #[test]
    fn test_summary_is_sorted_by_name() {
        let codec = Doubler::new().unwrap();
        let dyn_codec: &dyn Codec = &codec;

        assert_eq!(
            dyn_codec.properties(),
            vec![
                BindingSummary {
                    property: Property::CurrentTemperature,
                    encodes: true,
                    decodes: true,
                },
                BindingSummary {
                    property: Property::TargetTemperature,
                    encodes: true,
                    decodes: false,
                },
            ]
        );
    }

    #[test]
    fn test_device_model_parsing() {
        assert_eq!("th6320zw".parse::<DeviceModel>().unwrap(), DeviceModel::Th6320zw);
        assert_eq!("YRD226".parse::<DeviceModel>().unwrap(), DeviceModel::Yrd226);
        assert!(matches!("t9".parse::<DeviceModel>(), Err(Error::UnknownModel(_))));
        assert_eq!(DeviceModel::Zse44.to_string(), "zse44");
    }
}
