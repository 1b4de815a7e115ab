/*!
 * Collaborator handles a codec uses to reach outside its normal return path.
 *
 * `Publisher` sends a value straight to an arbitrary bus topic. `Notifier` tells the host that
 * a property has received a value without a real bus message. Both are invoked synchronously,
 * before the conversion that triggered them returns.
 */
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use tracing::trace;

use crate::property::Property;
use crate::types::Value;

/// Publishes a value directly onto a bus topic
pub trait Publisher: Send + Sync {
    /// Publish `value` to `topic`
    fn publish(&self, topic: &str, value: Value);
}

/// Notifies the host framework that a property has a new value
pub trait Notifier: Send + Sync {
    /// Treat `value` as received for `property`
    fn notify(&self, property: Property, value: Value);
}

impl<F> Publisher for F
where
    F: Fn(&str, Value) + Send + Sync,
{
    fn publish(&self, topic: &str, value: Value) {
        self(topic, value)
    }
}

impl<F> Notifier for F
where
    F: Fn(Property, Value) + Send + Sync,
{
    fn notify(&self, property: Property, value: Value) {
        self(property, value)
    }
}

/// A side effect captured by [`RecordingBus`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Delivery {
    /// A direct publish
    Published {
        /// Topic published to
        topic: String,
        /// Value published
        value: Value,
    },
    /// A property notification
    Notified {
        /// Property notified
        property: Property,
        /// Value notified
        value: Value,
    },
}

impl fmt::Display for Delivery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Delivery::Published { topic, value } => write!(f, "publish {} {}", topic, value),
            Delivery::Notified { property, value } => write!(f, "notify {} {}", property, value),
        }
    }
}

/// In-memory publisher and notifier that records every delivery in call order.
///
/// Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct RecordingBus {
    deliveries: Arc<Mutex<Vec<Delivery>>>,
}

impl RecordingBus {
    /// Create an empty recording bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far
    pub fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drain everything recorded so far
    pub fn take(&self) -> Vec<Delivery> {
        std::mem::take(&mut *self.deliveries.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn record(&self, delivery: Delivery) {
        trace!(%delivery, "recorded delivery");
        self.deliveries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(delivery);
    }
}

impl Publisher for RecordingBus {
    fn publish(&self, topic: &str, value: Value) {
        self.record(Delivery::Published {
            topic: topic.to_string(),
            value,
        });
    }
}

impl Notifier for RecordingBus {
    fn notify(&self, property: Property, value: Value) {
        self.record(Delivery::Notified { property, value });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_recording_bus_keeps_call_order() {
        let bus = RecordingBus::new();
        bus.publish("zwave/heat/set", Value::from(68));
        bus.notify(Property::TargetTemperature, Value::from(20.0));

        let shared = bus.clone();
        shared.publish("zwave/cool/set", Value::from(68));

        assert_eq!(
            bus.take(),
            vec![
                Delivery::Published {
                    topic: "zwave/heat/set".to_string(),
                    value: Value::from(68),
                },
                Delivery::Notified {
                    property: Property::TargetTemperature,
                    value: Value::from(20.0),
                },
                Delivery::Published {
                    topic: "zwave/cool/set".to_string(),
                    value: Value::from(68),
                },
            ]
        );
        assert!(bus.deliveries().is_empty());
    }

    #[test]
    fn test_closures_are_collaborators() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        let publisher = move |_topic: &str, _value: Value| {
            counter.fetch_add(1, Ordering::SeqCst);
        };

        let publisher: Arc<dyn Publisher> = Arc::new(publisher);
        publisher.publish("a", Value::Null);
        publisher.publish("b", Value::Null);

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_delivery_display() {
        let delivery = Delivery::Notified {
            property: Property::LockTargetState,
            value: Value::from("S"),
        };
        assert_eq!(delivery.to_string(), "notify lockTargetState S");
    }
}
