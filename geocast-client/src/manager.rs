//! Geo-subscription manager.
//!
//! One manager instance owns the subscription state for one node identity.
//! On every location update it recomputes the disc covering, diffs the
//! resulting topics against what is held, and drives the broker through the
//! change: all subscribes first (so the node never drops to zero coverage
//! mid-transition), then all unsubscribes, each paired with a notification
//! publish to the registration / deregistration control topic. The held
//! topic set is replaced wholesale only after the entire sequence succeeds —
//! a failed update leaves state untouched, so the caller can simply retry
//! and the reconciler will skip whatever already went through.
//!
//! Updates are serialized internally: the state mutex is held across the
//! whole broker sequence, so concurrent callers queue up rather than
//! interleave.

use crate::broker::{InboundMessage, MessageBroker, MessageHandler, QoS};
use crate::config::ClientConfig;
use crate::error::{BrokerOp, ClientError, Result};
use crate::reconcile::diff;
use crate::topic::Topic;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use geocast_spatial::{covering_for_disc, CellId, GeoPoint};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Manages a node's geo-partitioned subscriptions against a broker.
///
/// Generic over the broker collaborator, following the same pattern as the
/// rest of the client: the manager holds it by value and only needs the
/// [`MessageBroker`] contract.
pub struct SubscriptionManager<B> {
    broker: B,
    config: ClientConfig,
    subscriptions: Mutex<Vec<Topic>>,
    inbound_tx: Sender<InboundMessage>,
    inbound_rx: Receiver<InboundMessage>,
}

impl<B: MessageBroker> SubscriptionManager<B> {
    /// Create a manager with no subscriptions held.
    pub fn new(broker: B, config: ClientConfig) -> Self {
        let (inbound_tx, inbound_rx) = bounded(config.inbound_capacity.max(1));
        Self {
            broker,
            config,
            subscriptions: Mutex::new(Vec::new()),
            inbound_tx,
            inbound_rx,
        }
    }

    /// The manager's configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The broker collaborator.
    pub fn broker(&self) -> &B {
        &self.broker
    }

    /// Receiving side of the inbound message queue. Cloneable; all clones
    /// drain the same queue.
    pub fn messages(&self) -> Receiver<InboundMessage> {
        self.inbound_rx.clone()
    }

    /// Snapshot of the currently held subscription topics.
    pub fn subscribed_topics(&self) -> Vec<Topic> {
        self.subscriptions.lock().unwrap().clone()
    }

    /// Reconcile subscriptions to cover the disc around `position`.
    ///
    /// On the first broker failure the update aborts with that error and the
    /// held topic set is left exactly as it was.
    pub fn update_subscription(&self, position: GeoPoint, qos: QoS) -> Result<()> {
        let mut held = self.subscriptions.lock().unwrap();

        let cells = covering_for_disc(
            position,
            self.config.subscribe_radius_km,
            &self.config.covering,
        )?;
        let next: Vec<Topic> = cells
            .iter()
            .map(|cell| Topic::from_cell(*cell).subscription())
            .collect();

        let changes = diff(&held, &next);
        debug!(
            covering = cells.len(),
            subscribe = changes.subscribe.len(),
            unsubscribe = changes.unsubscribe.len(),
            "reconciling geo subscription"
        );

        for topic in &changes.subscribe {
            self.broker
                .subscribe(topic.as_str(), qos, self.inbound_handler())
                .map_err(|e| ClientError::broker(BrokerOp::Subscribe, topic.as_str(), e))?;
            self.notify(&self.config.register_topic, topic)?;
        }
        for topic in &changes.unsubscribe {
            self.broker
                .unsubscribe(topic.as_str())
                .map_err(|e| ClientError::broker(BrokerOp::Unsubscribe, topic.as_str(), e))?;
            self.notify(&self.config.unregister_topic, topic)?;
        }

        *held = next;
        Ok(())
    }

    /// Publish a payload addressed at the finest-level cell containing
    /// `position`. Independent of any held subscription state.
    pub fn publish(
        &self,
        position: GeoPoint,
        qos: QoS,
        retained: bool,
        payload: &[u8],
    ) -> Result<()> {
        let topic = Topic::from_cell(CellId::from_point(position)?);
        self.broker
            .publish(topic.as_str(), qos, retained, payload)
            .map_err(|e| ClientError::broker(BrokerOp::Publish, topic.as_str(), e))
    }

    /// Notify a control topic that `topic` was subscribed or dropped.
    fn notify(&self, control_topic: &str, topic: &Topic) -> Result<()> {
        self.broker
            .publish(
                control_topic,
                QoS::AtLeastOnce,
                false,
                topic.as_str().as_bytes(),
            )
            .map_err(|e| ClientError::broker(BrokerOp::Publish, control_topic, e))
    }

    /// Handler passed to each broker subscribe: forwards into the bounded
    /// inbound queue, discarding the oldest queued message instead of
    /// blocking the broker's delivery thread when the consumer lags.
    fn inbound_handler(&self) -> MessageHandler {
        let tx = self.inbound_tx.clone();
        let rx = self.inbound_rx.clone();
        Box::new(move |message| match tx.try_send(message) {
            Ok(()) | Err(TrySendError::Disconnected(_)) => {}
            Err(TrySendError::Full(message)) => {
                if rx.try_recv().is_ok() {
                    warn!(topic = %message.topic, "inbound queue full, dropped oldest message");
                }
                if tx.try_send(message).is_err() {
                    warn!("inbound queue still full, dropped newest message");
                }
            }
        })
    }
}
