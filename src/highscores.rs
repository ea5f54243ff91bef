//! Per-game high score
//!
//! One integer per game, persisted through a `ScoreStore` under the key the
//! game has always used.

use crate::persistence::ScoreStore;

/// Best score for one game
#[derive(Debug, Clone)]
pub struct HighScore {
    key: &'static str,
    best: u64,
}

impl HighScore {
    /// Storage key for Bubble Jump
    pub const JUMP_KEY: &'static str = "bubbleJumpHighScore";
    /// Storage key for Bubble Sequence
    pub const SEQUENCE_KEY: &'static str = "bubbleGameHighScore";

    /// Read the stored value; absent or malformed counts as zero
    pub fn load(key: &'static str, store: &dyn ScoreStore) -> Self {
        let best = store.get(key).unwrap_or(0);
        log::info!("Loaded high score {} ({})", best, key);
        Self { key, best }
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    /// Offer the running score. Persists and returns true when it beats the best.
    pub fn submit(&mut self, score: u64, store: &mut dyn ScoreStore) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;
        store.set(self.key, score);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_missing_value_is_zero() {
        let store = MemoryStore::new();
        assert_eq!(HighScore::load(HighScore::JUMP_KEY, &store).best(), 0);
    }

    #[test]
    fn test_malformed_value_is_zero() {
        let mut store = MemoryStore::new();
        store.insert_raw(HighScore::SEQUENCE_KEY, "NaN");
        assert_eq!(HighScore::load(HighScore::SEQUENCE_KEY, &store).best(), 0);
    }

    #[test]
    fn test_submit_only_persists_improvements() {
        let mut store = MemoryStore::new();
        let mut high = HighScore::load(HighScore::JUMP_KEY, &store);

        assert!(high.submit(300, &mut store));
        assert_eq!(store.get(HighScore::JUMP_KEY), Some(300));

        assert!(!high.submit(200, &mut store));
        assert!(!high.submit(300, &mut store));
        assert_eq!(high.best(), 300);
        assert_eq!(store.get(HighScore::JUMP_KEY), Some(300));
    }

    #[test]
    fn test_survives_reload() {
        let mut store = MemoryStore::new();
        HighScore::load(HighScore::SEQUENCE_KEY, &store).submit(900, &mut store);
        let reloaded = HighScore::load(HighScore::SEQUENCE_KEY, &store);
        assert_eq!(reloaded.best(), 900);
        // Keys are independent per game
        assert_eq!(HighScore::load(HighScore::JUMP_KEY, &store).best(), 0);
    }
}
