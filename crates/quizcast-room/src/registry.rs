//! The room registry: pin allocation and room lookup.

use std::collections::HashMap;
use std::sync::Arc;

use quizcast_protocol::{Question, RoomPin};
use tokio::sync::{Mutex, RwLock};

use crate::{PinGenerator, Room, RoomError};

/// Owns every live room, keyed by pin.
///
/// Lookups take the outer `RwLock` briefly and clone an `Arc` handle out;
/// all room mutation happens under the room's own `Mutex`, so the map
/// lock is never held across a room operation. Rooms live until process
/// exit, there is no eviction.
#[derive(Debug)]
pub struct RoomRegistry {
    rooms: RwLock<HashMap<RoomPin, Arc<Mutex<Room>>>>,
    pins: PinGenerator,
}

impl RoomRegistry {
    pub fn new(pins: PinGenerator) -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            pins,
        }
    }

    /// Creates a room under a freshly drawn pin and returns the pin.
    ///
    /// Redraws on collision. The check and insert happen under one write
    /// lock, so two concurrent creates can never share a pin.
    pub async fn create(
        &self,
        host_name: String,
        questions: Vec<Question>,
    ) -> RoomPin {
        let mut rooms = self.rooms.write().await;
        let pin = loop {
            let candidate = self.pins.generate();
            if !rooms.contains_key(&candidate) {
                break candidate;
            }
        };
        let room = Room::new(pin.clone(), host_name, questions);
        rooms.insert(pin.clone(), Arc::new(Mutex::new(room)));
        tracing::info!(%pin, "room created");
        pin
    }

    /// Fetches a handle to the room behind `pin`.
    pub async fn get(
        &self,
        pin: &RoomPin,
    ) -> Result<Arc<Mutex<Room>>, RoomError> {
        self.rooms
            .read()
            .await
            .get(pin)
            .cloned()
            .ok_or_else(|| RoomError::RoomNotFound(pin.clone()))
    }

    pub async fn contains(&self, pin: &RoomPin) -> bool {
        self.rooms.read().await.contains_key(pin)
    }

    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> RoomRegistry {
        RoomRegistry::new(PinGenerator::new(6))
    }

    #[tokio::test]
    async fn test_create_registers_the_room() {
        let registry = registry();
        let pin = registry.create("alice".into(), Vec::new()).await;

        assert!(registry.contains(&pin).await);
        assert_eq!(registry.room_count().await, 1);

        let room = registry.get(&pin).await.unwrap();
        assert_eq!(room.lock().await.host_name(), "alice");
    }

    #[tokio::test]
    async fn test_distinct_rooms_get_distinct_pins() {
        let registry = registry();
        let a = registry.create("alice".into(), Vec::new()).await;
        let b = registry.create("bob".into(), Vec::new()).await;
        assert_ne!(a, b);
        assert_eq!(registry.room_count().await, 2);
    }

    #[tokio::test]
    async fn test_get_unknown_pin_fails() {
        let registry = registry();
        let err = registry.get(&RoomPin::from("000000")).await.unwrap_err();
        assert!(matches!(err, RoomError::RoomNotFound(_)));
    }
}
