/*!
 * Sensor codec for the Zooz temperature/humidity XS sensor (ZSE44).
 */
use thingcodec_core::prelude::*;

use crate::conversion::fahrenheit_to_celsius;

/// Codec for the ZSE44 sensor. The device always reports Fahrenheit.
#[derive(Debug)]
pub struct SensorCodec {
    table: PropertyTable<SensorCodec>,
}

impl SensorCodec {
    /// Create a sensor codec
    pub fn new(_context: &CodecContext) -> Result<Self> {
        let table = PropertyTable::new().with(PropertyBinding::decode_only(
            Property::CurrentTemperature,
            Self::decode_temperature,
        ))?;

        Ok(Self { table })
    }

    /// Fahrenheit reading to Celsius
    pub fn decode_temperature(&mut self, message: &Value) -> Option<Value> {
        message
            .as_number()
            .map(|fahrenheit| Value::from(fahrenheit_to_celsius(fahrenheit)))
    }
}

impl PropertyCodec for SensorCodec {
    fn device_model(&self) -> DeviceModel {
        DeviceModel::Zse44
    }

    fn table(&self) -> &PropertyTable<Self> {
        &self.table
    }
}
