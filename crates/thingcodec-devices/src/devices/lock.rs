/*!
 * Lock codec for the Yale Assure lock (YRD226) with Z-Wave module.
 *
 * The device reports lock state as a byte: 0 unsecured, 255 secured. Whenever it reports its
 * current state, the framework's target state is set to match.
 */
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use thingcodec_core::prelude::*;

/// Device code for an unsecured lock
pub const UNSECURED_CODE: i64 = 0;

/// Device code for a secured lock
pub const SECURED_CODE: i64 = 255;

/// Codec for the YRD226 lock
pub struct LockCodec {
    table: PropertyTable<LockCodec>,
    notifier: Arc<dyn Notifier>,
}

impl fmt::Debug for LockCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockCodec")
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}

impl LockCodec {
    /// Create a lock codec
    pub fn new(context: &CodecContext) -> Result<Self> {
        let table = PropertyTable::new()
            .with(PropertyBinding::both(
                Property::LockTargetState,
                Self::encode_lock_state,
                Self::decode_lock_state,
            ))?
            .with(PropertyBinding::decode_only(
                Property::LockCurrentState,
                Self::decode_lock_current_state,
            ))?
            .with(PropertyBinding::decode_only(
                Property::BatteryLevel,
                Self::decode_battery_level,
            ))?
            .with(PropertyBinding::decode_only(
                Property::StatusLowBattery,
                Self::decode_status_low_battery,
            ))?;

        Ok(Self {
            table,
            notifier: context.notifier.clone(),
        })
    }

    /// `U`/`S` to 0/255
    pub fn encode_lock_state(&mut self, message: &Value) -> Option<Value> {
        match LockState::from_value(message) {
            Some(LockState::Unsecured) => Some(Value::from(UNSECURED_CODE)),
            Some(LockState::Secured) => Some(Value::from(SECURED_CODE)),
            _ => {
                debug!(%message, "unsupported lock state, nothing sent");
                None
            }
        }
    }

    /// 0/255 to `U`/`S`. Any other code decodes to the unknown state `?`.
    pub fn decode_lock_state(&mut self, message: &Value) -> Option<Value> {
        let state = match message.parse_integer() {
            Some(UNSECURED_CODE) => LockState::Unsecured,
            Some(SECURED_CODE) => LockState::Secured,
            _ => {
                debug!(%message, "unrecognized lock state code");
                LockState::Unknown
            }
        };

        Some(state.into())
    }

    /// Decode the reported state and mirror it into the target state
    pub fn decode_lock_current_state(&mut self, message: &Value) -> Option<Value> {
        let decoded = self.decode_lock_state(message)?;

        debug!(state = %decoded, "mirroring current lock state into target state");
        self.notifier
            .notify(Property::LockTargetState, decoded.clone());

        Some(decoded)
    }

    /// Reported as-is
    pub fn decode_battery_level(&mut self, message: &Value) -> Option<Value> {
        Some(message.clone())
    }

    /// Reported as-is
    pub fn decode_status_low_battery(&mut self, message: &Value) -> Option<Value> {
        Some(message.clone())
    }
}

impl PropertyCodec for LockCodec {
    fn device_model(&self) -> DeviceModel {
        DeviceModel::Yrd226
    }

    fn table(&self) -> &PropertyTable<Self> {
        &self.table
    }
}
