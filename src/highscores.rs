//! Best score tracking
//!
//! A single integer persisted as a decimal string under a fixed key.
//! Read on menu/game-over entry, maximized and written back at most once per
//! session.

use serde::{Deserialize, Serialize};

use crate::persistence::{ScoreStore, StoreError};

/// Storage key for the best score
pub const BEST_SCORE_KEY: &str = "flappyHighScore";

/// Result of closing out a session against the stored best
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreOutcome {
    /// The session's final score
    pub score: u32,
    /// Best score before this session
    pub previous_best: u32,
    /// Best score after this session
    pub best: u32,
    /// Final score beat the previous best (and is above zero)
    pub new_record: bool,
}

impl ScoreOutcome {
    /// Pure comparison, no storage involved
    pub fn evaluate(score: u32, previous_best: u32) -> Self {
        let new_record = score > previous_best && score > 0;
        Self {
            score,
            previous_best,
            best: previous_best.max(score),
            new_record,
        }
    }
}

/// Parse a stored value. Leading digits win, anything else reads as 0.
/// Digit runs too large for a `u32` saturate so they still outrank any score.
fn parse_stored(raw: &str) -> u32 {
    let trimmed = raw.trim();
    let digits: &str = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .map_or(trimmed, |end| &trimmed[..end]);
    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or(u32::MAX)
}

fn try_load_best(store: &dyn ScoreStore) -> Result<u32, StoreError> {
    Ok(store
        .get(BEST_SCORE_KEY)?
        .map_or(0, |raw| parse_stored(&raw)))
}

/// Read the best score, falling back to 0 when absent or unreadable
pub fn load_best(store: &dyn ScoreStore) -> u32 {
    match try_load_best(store) {
        Ok(best) => {
            log::info!("Loaded best score {}", best);
            best
        }
        Err(e) => {
            log::warn!("Could not read best score, using 0: {}", e);
            0
        }
    }
}

/// Read-maximize-write the best score for a finished session.
///
/// Writes only when the final score strictly beats the stored best. If the
/// stored best cannot be read nothing is written and no record is claimed.
/// A failed write is logged; the returned outcome still reflects the session.
pub fn record_session(store: &mut dyn ScoreStore, score: u32) -> ScoreOutcome {
    let previous_best = match try_load_best(store) {
        Ok(best) => best,
        Err(e) => {
            log::warn!("Could not read best score, not saving {}: {}", score, e);
            return ScoreOutcome {
                score,
                previous_best: 0,
                best: score,
                new_record: false,
            };
        }
    };
    let outcome = ScoreOutcome::evaluate(score, previous_best);

    if score > previous_best {
        match store.set(BEST_SCORE_KEY, &outcome.best.to_string()) {
            Ok(()) => log::info!("New best score saved: {}", outcome.best),
            Err(e) => log::warn!("Could not save best score {}: {}", outcome.best, e),
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use proptest::prelude::*;

    /// Store whose every call fails
    struct BrokenStore;

    impl ScoreStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Unavailable("broken".into()))
        }
        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("broken".into()))
        }
    }

    /// Store that cannot be read but still accepts writes
    struct WriteOnlyStore(MemoryStore);

    impl ScoreStore for WriteOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Unavailable("read failed".into()))
        }
        fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
            self.0.set(key, value)
        }
    }

    #[test]
    fn test_new_record_is_saved() {
        let mut store = MemoryStore::with_entry(BEST_SCORE_KEY, "3");
        let outcome = record_session(&mut store, 5);
        assert_eq!(outcome.best, 5);
        assert_eq!(outcome.previous_best, 3);
        assert!(outcome.new_record);
        assert_eq!(store.get(BEST_SCORE_KEY).unwrap().as_deref(), Some("5"));
    }

    #[test]
    fn test_tie_is_not_a_record() {
        let mut store = MemoryStore::with_entry(BEST_SCORE_KEY, "3");
        let outcome = record_session(&mut store, 3);
        assert_eq!(outcome.best, 3);
        assert!(!outcome.new_record);
        assert_eq!(store.get(BEST_SCORE_KEY).unwrap().as_deref(), Some("3"));
    }

    #[test]
    fn test_zero_on_empty_store_is_not_a_record() {
        let mut store = MemoryStore::new();
        let outcome = record_session(&mut store, 0);
        assert_eq!(outcome.best, 0);
        assert!(!outcome.new_record);
        assert_eq!(store.get(BEST_SCORE_KEY).unwrap(), None);
    }

    #[test]
    fn test_lower_score_leaves_best_alone() {
        let mut store = MemoryStore::with_entry(BEST_SCORE_KEY, "9");
        let outcome = record_session(&mut store, 4);
        assert_eq!(outcome.best, 9);
        assert!(!outcome.new_record);
        assert_eq!(store.get(BEST_SCORE_KEY).unwrap().as_deref(), Some("9"));
    }

    #[test]
    fn test_stored_value_parsing() {
        assert_eq!(parse_stored("12"), 12);
        assert_eq!(parse_stored(" 12 "), 12);
        assert_eq!(parse_stored("12abc"), 12);
        assert_eq!(parse_stored("abc"), 0);
        assert_eq!(parse_stored(""), 0);
        assert_eq!(parse_stored("-4"), 0);
    }

    #[test]
    fn test_broken_store_falls_back() {
        let mut store = BrokenStore;
        assert_eq!(load_best(&store), 0);
        let outcome = record_session(&mut store, 2);
        assert_eq!(outcome.score, 2);
        assert!(!outcome.new_record);
    }

    #[test]
    fn test_unreadable_best_is_not_overwritten() {
        let mut store = WriteOnlyStore(MemoryStore::with_entry(BEST_SCORE_KEY, "9"));
        let outcome = record_session(&mut store, 2);
        assert!(!outcome.new_record);
        assert_eq!(store.0.get(BEST_SCORE_KEY).unwrap().as_deref(), Some("9"));
    }

    #[test]
    fn test_oversized_stored_value_outranks_scores() {
        assert_eq!(parse_stored("5000000000"), u32::MAX);
        assert_eq!(parse_stored("5000000000xyz"), u32::MAX);

        let mut store = MemoryStore::with_entry(BEST_SCORE_KEY, "5000000000");
        let outcome = record_session(&mut store, 1);
        assert!(!outcome.new_record);
        assert_eq!(outcome.best, u32::MAX);
        assert_eq!(
            store.get(BEST_SCORE_KEY).unwrap().as_deref(),
            Some("5000000000")
        );
    }

    proptest! {
        #[test]
        fn prop_best_never_decreases(scores in proptest::collection::vec(0u32..50, 1..20)) {
            let mut store = MemoryStore::new();
            let mut last_best = 0;
            for score in scores {
                let outcome = record_session(&mut store, score);
                prop_assert!(outcome.best >= last_best);
                prop_assert_eq!(outcome.new_record, score > last_best && score > 0);
                prop_assert_eq!(load_best(&store), outcome.best);
                last_best = outcome.best;
            }
        }
    }
}
