//! Snapshot fan-out to room subscribers.
//!
//! Every subscriber holds the receiving end of an unbounded channel. A
//! broadcast captures one snapshot under the room lock and clones it into
//! each channel; a failed send means the subscriber hung up, and the hub
//! prunes it on the spot. Broadcasting never fails and never blocks on a
//! slow subscriber.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use quizcast_protocol::{RoomPin, StateSnapshot};
use tokio::sync::{mpsc, RwLock};
use tokio::time::Instant;

use crate::{RoomConfig, RoomError, RoomRegistry};

/// Identifies one subscription to one room's snapshot stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

impl SubscriberId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

type SnapshotSender = mpsc::UnboundedSender<StateSnapshot>;

/// Fan-out hub for room state snapshots.
pub struct BroadcastHub {
    registry: Arc<RoomRegistry>,
    config: RoomConfig,
    subscribers: RwLock<HashMap<RoomPin, HashMap<SubscriberId, SnapshotSender>>>,
}

impl BroadcastHub {
    pub fn new(registry: Arc<RoomRegistry>, config: RoomConfig) -> Self {
        Self {
            registry,
            config,
            subscribers: RwLock::new(HashMap::new()),
        }
    }

    /// Makes `pin` broadcastable. Called once per room at creation so a
    /// room with zero subscribers still has an entry to fan out into.
    pub async fn register(&self, pin: RoomPin) {
        self.subscribers.write().await.entry(pin).or_default();
    }

    /// Subscribes to `pin`'s snapshot stream.
    ///
    /// The current snapshot is pushed into the channel before this
    /// returns, so a new subscriber always sees the room's state without
    /// waiting for the next transition.
    pub async fn subscribe(
        &self,
        pin: &RoomPin,
    ) -> Result<(SubscriberId, mpsc::UnboundedReceiver<StateSnapshot>), RoomError>
    {
        // The write lock is held across the capture: a broadcast ordered
        // between the snapshot and the insert would otherwise be missed,
        // leaving the new subscriber one state behind.
        let mut all = self.subscribers.write().await;
        let snapshot = self.snapshot(pin).await?;
        let id = SubscriberId::next();
        let (tx, rx) = mpsc::unbounded_channel();
        let _ = tx.send(snapshot);
        all.entry(pin.clone()).or_default().insert(id, tx);
        tracing::debug!(%pin, subscriber = %id, "subscribed");
        Ok((id, rx))
    }

    /// Drops one subscription. Unknown ids are a no-op; the subscriber
    /// may already have been pruned by a failed send.
    pub async fn unsubscribe(&self, pin: &RoomPin, id: SubscriberId) {
        if let Some(subs) = self.subscribers.write().await.get_mut(pin) {
            if subs.remove(&id).is_some() {
                tracing::debug!(%pin, subscriber = %id, "unsubscribed");
            }
        }
    }

    /// Captures a snapshot of `pin`'s room and sends it to every
    /// subscriber, pruning any that have hung up.
    ///
    /// A broadcast for a pin with no subscribers (or no room) does
    /// nothing; room operations never fail because nobody is listening.
    pub async fn broadcast(&self, pin: &RoomPin) {
        let Ok(snapshot) = self.snapshot(pin).await else {
            tracing::debug!(%pin, "broadcast for unknown room dropped");
            return;
        };
        let mut all = self.subscribers.write().await;
        let Some(subs) = all.get_mut(pin) else {
            return;
        };
        let before = subs.len();
        subs.retain(|_, tx| tx.send(snapshot.clone()).is_ok());
        let pruned = before - subs.len();
        if pruned > 0 {
            tracing::debug!(%pin, pruned, "pruned dead subscribers");
        }
    }

    pub async fn subscriber_count(&self, pin: &RoomPin) -> usize {
        self.subscribers
            .read()
            .await
            .get(pin)
            .map_or(0, HashMap::len)
    }

    /// Reads the room's current snapshot without broadcasting it.
    pub async fn snapshot(
        &self,
        pin: &RoomPin,
    ) -> Result<StateSnapshot, RoomError> {
        let room = self.registry.get(pin).await?;
        let snapshot = room
            .lock()
            .await
            .snapshot(Instant::now(), self.config.question_duration);
        Ok(snapshot)
    }
}

impl fmt::Debug for BroadcastHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BroadcastHub").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PinGenerator;

    async fn hub_with_room() -> (Arc<BroadcastHub>, RoomPin) {
        let registry = Arc::new(RoomRegistry::new(PinGenerator::new(6)));
        let pin = registry.create("alice".into(), Vec::new()).await;
        let hub = Arc::new(BroadcastHub::new(registry, RoomConfig::default()));
        hub.register(pin.clone()).await;
        (hub, pin)
    }

    #[tokio::test]
    async fn test_subscribe_delivers_initial_snapshot() {
        let (hub, pin) = hub_with_room().await;
        let (_id, mut rx) = hub.subscribe(&pin).await.unwrap();

        let snap = rx.recv().await.unwrap();
        assert_eq!(snap.pin, pin);
        assert!(!snap.started);
    }

    #[tokio::test]
    async fn test_subscribe_unknown_pin_fails() {
        let (hub, _pin) = hub_with_room().await;
        let err = hub.subscribe(&RoomPin::from("000000")).await.unwrap_err();
        assert!(matches!(err, RoomError::RoomNotFound(_)));
    }

    #[tokio::test]
    async fn test_broadcast_reaches_every_subscriber() {
        let (hub, pin) = hub_with_room().await;
        let (_a, mut rx_a) = hub.subscribe(&pin).await.unwrap();
        let (_b, mut rx_b) = hub.subscribe(&pin).await.unwrap();
        rx_a.recv().await.unwrap();
        rx_b.recv().await.unwrap();

        hub.broadcast(&pin).await;

        assert_eq!(rx_a.recv().await.unwrap().pin, pin);
        assert_eq!(rx_b.recv().await.unwrap().pin, pin);
    }

    #[tokio::test]
    async fn test_broadcast_prunes_hung_up_subscribers() {
        let (hub, pin) = hub_with_room().await;
        let (_a, rx_a) = hub.subscribe(&pin).await.unwrap();
        let (_b, mut rx_b) = hub.subscribe(&pin).await.unwrap();
        assert_eq!(hub.subscriber_count(&pin).await, 2);

        drop(rx_a);
        hub.broadcast(&pin).await;

        assert_eq!(hub.subscriber_count(&pin).await, 1);
        rx_b.recv().await.unwrap(); // initial
        rx_b.recv().await.unwrap(); // broadcast
    }

    #[tokio::test]
    async fn test_unsubscribe_stops_delivery() {
        let (hub, pin) = hub_with_room().await;
        let (id, mut rx) = hub.subscribe(&pin).await.unwrap();
        rx.recv().await.unwrap();

        hub.unsubscribe(&pin, id).await;
        assert_eq!(hub.subscriber_count(&pin).await, 0);

        hub.broadcast(&pin).await;
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_broadcast_unknown_pin_is_noop() {
        let (hub, _pin) = hub_with_room().await;
        hub.broadcast(&RoomPin::from("000000")).await;
    }

    #[tokio::test]
    async fn test_subscriber_racing_a_broadcast_still_sees_the_change() {
        use std::time::Duration;

        use tokio::time::Instant;

        // Whichever way the subscribe and the broadcast interleave, the
        // started flag must reach the subscriber: either in the initial
        // snapshot (captured after the change) or as a broadcast frame.
        for _ in 0..20 {
            let registry = Arc::new(RoomRegistry::new(PinGenerator::new(6)));
            let pin = registry.create("alice".into(), Vec::new()).await;
            let hub = Arc::new(BroadcastHub::new(
                Arc::clone(&registry),
                RoomConfig::default(),
            ));
            hub.register(pin.clone()).await;

            let announce = async {
                let room = registry.get(&pin).await.unwrap();
                room.lock()
                    .await
                    .start_game(Instant::now(), Duration::from_secs(20));
                hub.broadcast(&pin).await;
            };
            let (subscribed, ()) = tokio::join!(hub.subscribe(&pin), announce);

            let (_id, mut rx) = subscribed.unwrap();
            let mut saw_started = false;
            while let Ok(snap) = rx.try_recv() {
                saw_started |= snap.started;
            }
            assert!(saw_started, "subscriber never saw the started state");
        }
    }
}
