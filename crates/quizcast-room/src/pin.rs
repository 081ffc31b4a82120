//! Numeric room pin generation.

use quizcast_protocol::RoomPin;
use rand::Rng;

/// Generates random numeric pins of a fixed length.
///
/// Pins are plain decimal strings so players can type them on a phone
/// keypad. Uniqueness is the registry's job: the generator may repeat,
/// and the registry retries on collision.
#[derive(Debug, Clone, Copy)]
pub struct PinGenerator {
    length: usize,
}

impl PinGenerator {
    pub fn new(length: usize) -> Self {
        Self { length }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Draws a fresh pin. Leading zeros are allowed, so the space is the
    /// full `10^length` and every pin has the same length.
    pub fn generate(&self) -> RoomPin {
        let mut rng = rand::rng();
        let digits: String = (0..self.length)
            .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
            .collect();
        RoomPin::new(digits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pins_have_requested_length() {
        let pins = PinGenerator::new(6);
        for _ in 0..50 {
            assert_eq!(pins.generate().as_str().len(), 6);
        }
    }

    #[test]
    fn test_pins_are_digits_only() {
        let pins = PinGenerator::new(8);
        for _ in 0..50 {
            let pin = pins.generate();
            assert!(pin.as_str().chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_pins_vary() {
        let pins = PinGenerator::new(6);
        let first = pins.generate();
        // One in a million per draw; fifty identical draws means a broken rng.
        assert!((0..50).any(|_| pins.generate() != first));
    }
}
