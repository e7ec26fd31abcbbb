//! Geo-partitioned pub/sub subscription management.
//!
//! A node publishes and subscribes on a hierarchical broker topic space that
//! mirrors a spherical cell subdivision (provided by `geocast-spatial`), so
//! it only receives messages originating near its current location.
//!
//! ```text
//!  location update
//!        │
//!        ▼
//!  covering_for_disc ──► Topic codec ──► reconcile vs held topics
//!                                              │
//!                              subscribes first, then unsubscribes,
//!                              each with a control-topic notification
//!                                              │
//!                                              ▼
//!                                 commit new topic set on full success
//! ```
//!
//! The broker itself is a collaborator behind the [`MessageBroker`] trait;
//! this crate owns no connection lifecycle, payload schema, or persistence.
//!
//! # Modules
//!
//! - [`topic`]: cell-to-topic codec and control-topic constants
//! - [`reconcile`]: topic set diffing
//! - [`broker`]: broker collaborator contract (trait, QoS, errors)
//! - [`manager`]: the subscription manager
//! - [`config`]: client configuration
//! - [`error`]: error types
//!
//! # Example
//!
//! ```ignore
//! let config = ClientConfig::new(5.0); // keep a 5 km disc covered
//! let manager = SubscriptionManager::new(broker, config);
//! manager.update_subscription(GeoPoint::new(48.8566, 2.3522), QoS::AtLeastOnce)?;
//! manager.publish(GeoPoint::new(48.8566, 2.3522), QoS::AtMostOnce, false, b"hello")?;
//! for message in manager.messages().try_iter() {
//!     // ...
//! }
//! ```

pub mod broker;
pub mod config;
pub mod error;
pub mod manager;
pub mod reconcile;
pub mod topic;

pub use broker::{BrokerError, InboundMessage, MessageBroker, MessageHandler, QoS};
pub use config::{ClientConfig, DEFAULT_INBOUND_CAPACITY};
pub use error::{BrokerOp, ClientError, Result};
pub use manager::SubscriptionManager;
pub use reconcile::{diff, TopicDiff};
pub use topic::{Topic, DEFAULT_REGISTER_TOPIC, DEFAULT_UNREGISTER_TOPIC, WILDCARD_SUFFIX};

// Re-export the geometry types callers need to drive the manager.
pub use geocast_spatial::{covering_for_disc, CellId, CoveringConfig, GeoPoint, SpatialError};
