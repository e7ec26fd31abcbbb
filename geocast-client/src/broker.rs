//! Broker collaborator contract.
//!
//! The client does not own a broker connection; it drives one through this
//! trait. Every call is a blocking round-trip that returns once the broker
//! has acknowledged (or refused) the operation — any timeout is the
//! implementation's own concern. The manager issues calls sequentially, so
//! implementations only need `&self` receivers and internal synchronization
//! if they are shared.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Delivery quality level, passed through to the broker unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QoS {
    /// Fire and forget.
    AtMostOnce,
    /// Acknowledged delivery, possible duplicates.
    AtLeastOnce,
    /// Exactly-once handshake.
    ExactlyOnce,
}

impl From<QoS> for u8 {
    fn from(qos: QoS) -> u8 {
        match qos {
            QoS::AtMostOnce => 0,
            QoS::AtLeastOnce => 1,
            QoS::ExactlyOnce => 2,
        }
    }
}

/// A message delivered by the broker for a subscribed topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Concrete topic the message was published under.
    pub topic: String,
    /// Raw payload bytes.
    pub payload: Vec<u8>,
}

/// Callback invoked by the broker for each inbound message.
///
/// Runs on the broker's delivery thread and must not block.
pub type MessageHandler = Box<dyn Fn(InboundMessage) + Send + Sync + 'static>;

/// Opaque failure reported by a broker operation.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct BrokerError {
    message: String,
}

impl BrokerError {
    /// Create an error carrying the broker's report.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Blocking pub/sub broker operations consumed by the manager.
pub trait MessageBroker {
    /// Subscribe to a topic (wildcards allowed), routing its messages to
    /// `handler`. Blocks until the broker acknowledges.
    fn subscribe(&self, topic: &str, qos: QoS, handler: MessageHandler)
        -> std::result::Result<(), BrokerError>;

    /// Drop a subscription. Blocks until the broker acknowledges.
    fn unsubscribe(&self, topic: &str) -> std::result::Result<(), BrokerError>;

    /// Publish a payload to a topic. Blocks until the broker acknowledges.
    fn publish(
        &self,
        topic: &str,
        qos: QoS,
        retained: bool,
        payload: &[u8],
    ) -> std::result::Result<(), BrokerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qos_wire_values() {
        assert_eq!(u8::from(QoS::AtMostOnce), 0);
        assert_eq!(u8::from(QoS::AtLeastOnce), 1);
        assert_eq!(u8::from(QoS::ExactlyOnce), 2);
    }

    #[test]
    fn test_broker_error_carries_message() {
        let err = BrokerError::new("connection reset");
        assert_eq!(err.to_string(), "connection reset");
    }
}
