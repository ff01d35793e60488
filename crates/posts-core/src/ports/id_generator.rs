//! Identifier generation port.

use std::sync::Mutex;

use ulid::{Generator, Ulid};

/// Produces new unique identifiers.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// ULID generator. Ids sort lexicographically in creation order, including
/// ids minted within the same millisecond.
pub struct UlidGenerator {
    inner: Mutex<Generator>,
}

impl UlidGenerator {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Generator::new()),
        }
    }
}

impl Default for UlidGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for UlidGenerator {
    fn next_id(&self) -> String {
        let mut generator = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        // Overflow of the random component within one millisecond is
        // astronomically unlikely; a fresh ULID is still unique.
        generator
            .generate()
            .unwrap_or_else(|_| Ulid::new())
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ulids_are_unique_and_ordered() {
        let generator = UlidGenerator::new();
        let ids: Vec<String> = (0..100).map(|_| generator.next_id()).collect();

        let mut sorted = ids.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted, ids);
        assert!(ids.iter().all(|id| id.len() == 26));
    }
}
