//! Client configuration.

use crate::topic::{DEFAULT_REGISTER_TOPIC, DEFAULT_UNREGISTER_TOPIC};
use geocast_spatial::CoveringConfig;
use serde::{Deserialize, Serialize};

/// Default bound on queued inbound messages.
pub const DEFAULT_INBOUND_CAPACITY: usize = 64;

/// Configuration for a [`SubscriptionManager`](crate::SubscriptionManager).
///
/// The subscribe radius is fixed for the manager's lifetime; covering bounds,
/// control topics, and the inbound queue bound have sensible defaults and
/// `with_*` overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Radius of the disc kept covered around the node's position, in km.
    pub subscribe_radius_km: f64,

    /// Cell budget and level bound for subscribe-side coverings.
    pub covering: CoveringConfig,

    /// Control topic that receives each newly subscribed topic string.
    pub register_topic: String,

    /// Control topic that receives each dropped topic string.
    pub unregister_topic: String,

    /// Bound on queued inbound messages; the oldest message is dropped when
    /// the consumer falls this far behind.
    pub inbound_capacity: usize,
}

impl ClientConfig {
    /// Config with the given subscribe radius and defaults for the rest.
    pub fn new(subscribe_radius_km: f64) -> Self {
        Self {
            subscribe_radius_km,
            covering: CoveringConfig::default(),
            register_topic: DEFAULT_REGISTER_TOPIC.to_string(),
            unregister_topic: DEFAULT_UNREGISTER_TOPIC.to_string(),
            inbound_capacity: DEFAULT_INBOUND_CAPACITY,
        }
    }

    /// Override the covering bounds.
    pub fn with_covering(mut self, covering: CoveringConfig) -> Self {
        self.covering = covering;
        self
    }

    /// Override the registration / deregistration control topics.
    pub fn with_control_topics(
        mut self,
        register: impl Into<String>,
        unregister: impl Into<String>,
    ) -> Self {
        self.register_topic = register.into();
        self.unregister_topic = unregister.into();
        self
    }

    /// Override the inbound queue bound (clamped to at least 1).
    pub fn with_inbound_capacity(mut self, capacity: usize) -> Self {
        self.inbound_capacity = capacity.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::new(5.0);
        assert_eq!(config.subscribe_radius_km, 5.0);
        assert_eq!(config.covering.max_level, 30);
        assert_eq!(config.covering.max_cells, 4);
        assert_eq!(config.register_topic, "/api/register");
        assert_eq!(config.unregister_topic, "/api/unregister");
        assert_eq!(config.inbound_capacity, DEFAULT_INBOUND_CAPACITY);
    }

    #[test]
    fn test_builders() {
        let config = ClientConfig::new(10.0)
            .with_covering(CoveringConfig::new(12, 8))
            .with_control_topics("/registry/add", "/registry/remove")
            .with_inbound_capacity(0);
        assert_eq!(config.covering.max_level, 12);
        assert_eq!(config.covering.max_cells, 8);
        assert_eq!(config.register_topic, "/registry/add");
        assert_eq!(config.unregister_topic, "/registry/remove");
        assert_eq!(config.inbound_capacity, 1);
    }
}
