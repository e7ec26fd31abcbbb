//! Error types for the geocast client.

use crate::broker::BrokerError;
use geocast_spatial::SpatialError;
use std::fmt;
use thiserror::Error;

/// Result type alias using ClientError.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Which broker operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrokerOp {
    Subscribe,
    Unsubscribe,
    Publish,
}

impl fmt::Display for BrokerOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrokerOp::Subscribe => f.write_str("subscribe"),
            BrokerOp::Unsubscribe => f.write_str("unsubscribe"),
            BrokerOp::Publish => f.write_str("publish"),
        }
    }
}

/// Client-level errors.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Geometry error (invalid coordinates or covering bounds).
    #[error(transparent)]
    Spatial(#[from] SpatialError),

    /// A broker round-trip failed. Surfaced immediately, never retried here.
    #[error("broker {op} failed for topic {topic}: {source}")]
    Broker {
        op: BrokerOp,
        topic: String,
        source: BrokerError,
    },
}

impl ClientError {
    /// Wrap a broker failure with the operation and topic it hit.
    pub fn broker(op: BrokerOp, topic: impl Into<String>, source: BrokerError) -> Self {
        ClientError::Broker {
            op,
            topic: topic.into(),
            source,
        }
    }
}
