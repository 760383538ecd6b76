//! ID generation utilities.

use std::sync::{LazyLock, Mutex, PoisonError};

use ulid::{Generator, Ulid};

/// Process-wide monotonic source shared by every `IdGenerator`.
static MONOTONIC: LazyLock<Mutex<Generator>> = LazyLock::new(|| Mutex::new(Generator::new()));

/// ID generator for films, users, reviews and events.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    _private: (),
}

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Generate a new ULID-based ID.
    ///
    /// IDs are lowercase and strictly increasing within the process, including
    /// IDs made in the same millisecond, so "id ascending" is creation order.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut generator = MONOTONIC.lock().unwrap_or_else(PoisonError::into_inner);
        // Overflow needs 2^80 ids in one millisecond.
        let id = generator.generate().unwrap_or_else(|_| Ulid::new());
        id.to_string().to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_ulid() {
        let id_gen = IdGenerator::new();
        let id1 = id_gen.generate();
        let id2 = id_gen.generate();

        assert_eq!(id1.len(), 26);
        assert_eq!(id2.len(), 26);
        assert_ne!(id1, id2);
        assert_eq!(id1, id1.to_lowercase());
    }

    #[test]
    fn test_ids_within_one_millisecond_are_increasing() {
        let id_gen = IdGenerator::new();
        let other = IdGenerator::new();
        let ids: Vec<String> = (0..1000)
            .map(|i| if i % 2 == 0 { id_gen.generate() } else { other.generate() })
            .collect();

        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_ids_from_later_milliseconds_sort_after() {
        let id_gen = IdGenerator::new();
        let first = id_gen.generate();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = id_gen.generate();

        assert!(first < second);
    }
}
