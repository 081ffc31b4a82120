//! Auto-lock timers for question rounds.

use std::sync::Arc;

use quizcast_protocol::RoomPin;
use tokio::time::Instant;

use crate::{BroadcastHub, RoomRegistry};

/// Schedules one fire-and-forget lock task per round.
///
/// The task captures only `(pin, round_id)`, never a room handle. On
/// wake it re-resolves the room and checks the id: if the host advanced
/// or restarted in the meantime the ids no longer match and the task
/// does nothing. Timers are never cancelled, expiring stale ones is
/// cheaper than tracking them.
#[derive(Clone)]
pub struct RoundTimer {
    registry: Arc<RoomRegistry>,
    hub: Arc<BroadcastHub>,
}

impl RoundTimer {
    pub fn new(registry: Arc<RoomRegistry>, hub: Arc<BroadcastHub>) -> Self {
        Self { registry, hub }
    }

    /// Arms the auto-lock for round `round_id` of `pin`, firing at
    /// `ends_at`. Returns immediately.
    pub fn schedule(&self, pin: RoomPin, round_id: u64, ends_at: Instant) {
        let timer = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep_until(ends_at).await;
            timer.fire(pin, round_id).await;
        });
    }

    async fn fire(&self, pin: RoomPin, round_id: u64) {
        let Ok(room) = self.registry.get(&pin).await else {
            tracing::trace!(%pin, "timer fired for vanished room");
            return;
        };
        {
            let mut room = room.lock().await;
            if room.round_id() != round_id {
                tracing::trace!(
                    %pin,
                    stale = round_id,
                    current = room.round_id(),
                    "stale round timer ignored"
                );
                return;
            }
            if room.is_locked() {
                // A late submit beat us to the lock.
                return;
            }
            room.lock_question();
            tracing::debug!(%pin, round_id, "round locked on deadline");
        }
        self.hub.broadcast(&pin).await;
    }
}

impl std::fmt::Debug for RoundTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoundTimer").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{PinGenerator, RoomConfig};

    async fn fixture() -> (RoundTimer, Arc<RoomRegistry>, RoomPin) {
        let registry = Arc::new(RoomRegistry::new(PinGenerator::new(6)));
        let pin = registry.create("alice".into(), Vec::new()).await;
        let hub = Arc::new(BroadcastHub::new(
            Arc::clone(&registry),
            RoomConfig::default(),
        ));
        hub.register(pin.clone()).await;
        (RoundTimer::new(Arc::clone(&registry), hub), registry, pin)
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_locks_the_round_it_was_armed_for() {
        let (timer, registry, pin) = fixture().await;
        let room = registry.get(&pin).await.unwrap();

        let round = {
            let mut room = room.lock().await;
            room.join("bob");
            room.start_game(Instant::now(), Duration::from_secs(20))
        };
        timer.schedule(pin.clone(), round.round_id, round.ends_at);

        tokio::time::sleep(Duration::from_secs(21)).await;
        assert!(room.lock().await.is_locked());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_timer_does_not_lock_the_next_round() {
        let (timer, registry, pin) = fixture().await;
        let room = registry.get(&pin).await.unwrap();

        let first = {
            let mut room = room.lock().await;
            room.start_game(Instant::now(), Duration::from_secs(20))
        };
        timer.schedule(pin.clone(), first.round_id, first.ends_at);

        // A new round starts before the first deadline.
        tokio::time::sleep(Duration::from_secs(10)).await;
        {
            let mut room = room.lock().await;
            room.begin_round(Instant::now(), Duration::from_secs(20));
        }

        // Past the first deadline, inside the second round.
        tokio::time::sleep(Duration::from_secs(15)).await;
        assert!(!room.lock().await.is_locked());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_for_vanished_room_is_noop() {
        let (timer, _registry, _pin) = fixture().await;
        timer.schedule(RoomPin::from("000000"), 1, Instant::now());
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
