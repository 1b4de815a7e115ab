/*!
 * Codec registry for thingcodec.
 *
 * This module maps device models to the factories that build their codecs, and wraps each
 * built codec in an [`Accessory`] that records its log output under the accessory's span.
 */
use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, error, info};

use thingcodec_core::logging::{accessory_span, Span};
use thingcodec_core::prelude::*;

use crate::devices::{LockCodec, SensorCodec, ThermostatCodec};

/// Builds a codec for an accessory
pub type CodecFactory = fn(&CodecContext) -> Result<Box<dyn Codec>>;

/// Codec registry
#[derive(Default)]
pub struct CodecRegistry {
    factories: BTreeMap<DeviceModel, CodecFactory>,
}

impl fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecRegistry")
            .field("models", &self.models())
            .finish()
    }
}

impl CodecRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with every built-in codec registered
    pub fn with_defaults() -> Self {
        let mut factories: BTreeMap<DeviceModel, CodecFactory> = BTreeMap::new();
        factories.insert(DeviceModel::Th6320zw, thermostat);
        factories.insert(DeviceModel::Yrd226, lock);
        factories.insert(DeviceModel::Zse44, sensor);
        Self { factories }
    }

    /// Register a codec factory for a model
    pub fn register(&mut self, model: DeviceModel, factory: CodecFactory) -> Result<()> {
        if self.factories.contains_key(&model) {
            return Err(Error::already_registered(format!(
                "codec for model {}",
                model
            )));
        }

        self.factories.insert(model, factory);
        debug!("Registered codec for model {}", model);
        Ok(())
    }

    /// Check if a model has a codec
    pub fn has_model(&self, model: DeviceModel) -> bool {
        self.factories.contains_key(&model)
    }

    /// All models with a registered codec
    pub fn models(&self) -> Vec<DeviceModel> {
        self.factories.keys().copied().collect()
    }

    /// Build the codec for the accessory in `context`
    pub fn create(&self, context: CodecContext) -> Result<Accessory> {
        let accessory = &context.accessory;
        let span = accessory_span(&accessory.name, accessory.model, &context.id);

        let codec = {
            let _entered = span.enter();

            let factory = self
                .factories
                .get(&accessory.model)
                .ok_or_else(|| Error::unknown_model(accessory.model.as_str()))?;

            let codec = factory(&context).map_err(|e| {
                error!("Failed to create codec: {}", e);
                e
            })?;

            info!(
                model = %accessory.model,
                properties = codec.properties().len(),
                "Codec created"
            );
            codec
        };

        Ok(Accessory {
            name: accessory.name.clone(),
            span,
            codec,
        })
    }
}

fn thermostat(context: &CodecContext) -> Result<Box<dyn Codec>> {
    Ok(Box::new(ThermostatCodec::new(context)?))
}

fn lock(context: &CodecContext) -> Result<Box<dyn Codec>> {
    Ok(Box::new(LockCodec::new(context)?))
}

fn sensor(context: &CodecContext) -> Result<Box<dyn Codec>> {
    Ok(Box::new(SensorCodec::new(context)?))
}

/// A configured accessory's codec.
///
/// Every conversion runs inside the accessory's span.
#[derive(Debug)]
pub struct Accessory {
    name: String,
    span: Span,
    codec: Box<dyn Codec>,
}

impl Accessory {
    /// Accessory name
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Codec for Accessory {
    fn model(&self) -> DeviceModel {
        self.codec.model()
    }

    fn properties(&self) -> Vec<BindingSummary> {
        self.codec.properties()
    }

    fn encode(&mut self, property: &str, message: &Value) -> Option<Value> {
        let _entered = self.span.enter();
        self.codec.encode(property, message)
    }

    fn decode(&mut self, property: &str, message: &Value) -> Option<Value> {
        let _entered = self.span.enter();
        self.codec.decode(property, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn context(accessory: AccessoryConfig) -> CodecContext {
        let bus = Arc::new(RecordingBus::new());
        CodecContext::new(accessory, bus.clone(), bus)
    }

    #[test]
    fn test_defaults_cover_every_model() {
        let registry = CodecRegistry::with_defaults();
        assert_eq!(registry.models(), DeviceModel::ALL.to_vec());
        assert!(registry.has_model(DeviceModel::Zse44));
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let mut registry = CodecRegistry::new();
        registry.register(DeviceModel::Zse44, sensor).unwrap();

        let err = registry.register(DeviceModel::Zse44, sensor).unwrap_err();
        assert!(matches!(err, Error::AlreadyRegistered(_)));
    }

    #[test]
    fn test_create_unknown_model() {
        let registry = CodecRegistry::new();
        let err = registry
            .create(context(AccessoryConfig::new("front-door", DeviceModel::Yrd226)))
            .unwrap_err();
        assert!(matches!(err, Error::UnknownModel(m) if m == "yrd226"));
    }

    #[test]
    fn test_create_propagates_config_errors() {
        let registry = CodecRegistry::with_defaults();
        let err = registry
            .create(context(AccessoryConfig::new("hallway", DeviceModel::Th6320zw)))
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test_log::test]
    fn test_accessory_delegates_to_codec() {
        let registry = CodecRegistry::with_defaults();
        let mut accessory = registry
            .create(context(AccessoryConfig::new("attic", DeviceModel::Zse44)))
            .unwrap();

        assert_eq!(accessory.name(), "attic");
        assert_eq!(accessory.model(), DeviceModel::Zse44);
        assert_eq!(accessory.properties().len(), 1);

        let celsius = accessory
            .decode("currentTemperature", &Value::from(50))
            .and_then(|v| v.as_number())
            .unwrap();
        assert!((celsius - 10.0).abs() < 0.01);
    }
}
