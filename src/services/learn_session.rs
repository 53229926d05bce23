use std::collections::HashSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::services::SessionError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LearnOrder {
    #[default]
    Sequential,
    Random,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LearnAction {
    Next,
    Previous,
    Flip,
    Restart,
}

/// Flashcard progress through one word set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnSession {
    pub word_set_id: String,
    pub order: LearnOrder,
    pub word_ids: Vec<String>,
    pub current_index: usize,
    pub is_flipped: bool,
    pub completed: bool,
    /// Milliseconds since the Unix epoch
    pub started_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnProgress {
    /// 1-based position of the current card, 0 when there are no cards
    pub current: usize,
    pub total: usize,
    pub percent: f64,
}

impl LearnSession {
    pub fn start<R: Rng + ?Sized>(
        rng: &mut R,
        word_set_id: impl Into<String>,
        word_ids: Vec<String>,
        order: LearnOrder,
        now_ms: i64,
    ) -> Result<Self, SessionError> {
        if word_ids.is_empty() {
            return Err(SessionError::EmptyWordSet);
        }

        let mut session = Self {
            word_set_id: word_set_id.into(),
            order,
            word_ids,
            current_index: 0,
            is_flipped: false,
            completed: false,
            started_at: now_ms,
            updated_at: now_ms,
        };
        if order == LearnOrder::Random {
            wordset_exam::shuffle(&mut session.word_ids, rng);
        }
        Ok(session)
    }

    pub fn current_word_id(&self) -> Option<&str> {
        self.word_ids.get(self.current_index).map(String::as_str)
    }

    pub fn flip(&mut self) {
        self.is_flipped = !self.is_flipped;
    }

    /// Moves to the next card. Past the last card the session is marked
    /// completed and the index stays put; returns whether the index moved.
    pub fn next(&mut self) -> bool {
        self.is_flipped = false;
        if self.current_index + 1 < self.word_ids.len() {
            self.current_index += 1;
            true
        } else {
            self.completed = true;
            false
        }
    }

    pub fn previous(&mut self) -> bool {
        self.is_flipped = false;
        self.completed = false;
        if self.current_index > 0 {
            self.current_index -= 1;
            true
        } else {
            false
        }
    }

    /// Starts a new pass over `words`, given in the word set's natural order.
    /// Sequential passes follow that order; random passes reshuffle it. An
    /// empty `words` keeps the current cards.
    pub fn restart<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        order: Option<LearnOrder>,
        words: &[String],
    ) {
        if let Some(order) = order {
            self.order = order;
        }
        if !words.is_empty() {
            self.word_ids = words.to_vec();
        }
        if self.order == LearnOrder::Random {
            wordset_exam::shuffle(&mut self.word_ids, rng);
        }
        self.current_index = 0;
        self.is_flipped = false;
        self.completed = false;
    }

    pub fn apply<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        action: LearnAction,
        order: Option<LearnOrder>,
        words: &[String],
        now_ms: i64,
    ) {
        match action {
            LearnAction::Next => {
                self.next();
            }
            LearnAction::Previous => {
                self.previous();
            }
            LearnAction::Flip => self.flip(),
            LearnAction::Restart => self.restart(rng, order, words),
        }
        self.updated_at = now_ms;
    }

    pub fn progress(&self) -> LearnProgress {
        let total = self.word_ids.len();
        if total == 0 {
            return LearnProgress {
                current: 0,
                total: 0,
                percent: 0.0,
            };
        }

        let seen = if self.completed {
            total
        } else {
            self.current_index
        };
        LearnProgress {
            current: self.current_index + 1,
            total,
            percent: ((seen as f64 / total as f64) * 1000.0).round() / 10.0,
        }
    }

    /// Brings a restored session in line with the word set's current words.
    ///
    /// Deleted words are dropped, new words are appended, and the cursor
    /// stays on the same word when it still exists. Returns whether anything
    /// changed. `existing` is expected in the word set's natural order.
    pub fn reconcile(&mut self, existing: &[String]) -> bool {
        let alive: HashSet<&str> = existing.iter().map(String::as_str).collect();
        let current = self.current_word_id().map(str::to_string);

        let before = self.word_ids.len();
        self.word_ids.retain(|id| alive.contains(id.as_str()));
        let removed = before != self.word_ids.len();

        let known: HashSet<String> = self.word_ids.iter().cloned().collect();
        let added: Vec<String> = existing
            .iter()
            .filter(|id| !known.contains(*id))
            .cloned()
            .collect();
        let appended = !added.is_empty();
        if appended {
            self.word_ids.extend(added);
            self.completed = false;
        }

        if !removed && !appended {
            return false;
        }

        let last = self.word_ids.len().saturating_sub(1);
        match current
            .as_deref()
            .and_then(|id| self.word_ids.iter().position(|w| w == id))
        {
            Some(position) => self.current_index = position,
            None => {
                self.current_index = self.current_index.min(last);
                self.is_flipped = false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn ids(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("w{i}")).collect()
    }

    fn session(n: usize) -> LearnSession {
        let mut rng = StdRng::seed_from_u64(1);
        LearnSession::start(&mut rng, "set", ids(n), LearnOrder::Sequential, 0).unwrap()
    }

    #[test]
    fn test_start_requires_words() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = LearnSession::start(&mut rng, "set", Vec::new(), LearnOrder::Random, 0);
        assert!(matches!(err, Err(SessionError::EmptyWordSet)));
    }

    #[test]
    fn test_random_order_is_permutation() {
        let mut rng = StdRng::seed_from_u64(99);
        let session = LearnSession::start(&mut rng, "set", ids(30), LearnOrder::Random, 0).unwrap();
        let mut sorted = session.word_ids.clone();
        sorted.sort();
        let mut expected = ids(30);
        expected.sort();
        assert_eq!(sorted, expected);
    }

    #[test]
    fn test_navigation_and_completion() {
        let mut s = session(3);
        s.flip();
        assert!(s.is_flipped);

        assert!(s.next());
        assert!(!s.is_flipped);
        assert_eq!(s.current_word_id(), Some("w1"));

        assert!(s.next());
        assert!(!s.completed);
        assert!(!s.next());
        assert!(s.completed);
        assert_eq!(s.current_index, 2);
        assert_eq!(s.progress().percent, 100.0);

        assert!(s.previous());
        assert!(!s.completed);
        assert_eq!(s.current_word_id(), Some("w1"));
    }

    #[test]
    fn test_previous_at_start_is_noop() {
        let mut s = session(2);
        assert!(!s.previous());
        assert_eq!(s.current_index, 0);
    }

    #[test]
    fn test_progress() {
        let mut s = session(4);
        let p = s.progress();
        assert_eq!((p.current, p.total), (1, 4));
        assert_eq!(p.percent, 0.0);
        s.next();
        assert_eq!(s.progress().percent, 25.0);
    }

    #[test]
    fn test_restart_resets_state() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut s = session(5);
        s.next();
        s.flip();
        s.apply(&mut rng, LearnAction::Restart, Some(LearnOrder::Random), &ids(5), 10);
        assert_eq!(s.current_index, 0);
        assert!(!s.is_flipped);
        assert_eq!(s.order, LearnOrder::Random);
        assert_eq!(s.updated_at, 10);
        assert_eq!(s.word_ids.len(), 5);
    }

    #[test]
    fn test_sequential_restart_restores_natural_order() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut s = LearnSession::start(&mut rng, "set", ids(20), LearnOrder::Random, 0).unwrap();
        assert_ne!(s.word_ids, ids(20));

        s.restart(&mut rng, Some(LearnOrder::Sequential), &ids(20));
        assert_eq!(s.order, LearnOrder::Sequential);
        assert_eq!(s.word_ids, ids(20));

        // Keeping the random order reshuffles the current word list.
        s.restart(&mut rng, Some(LearnOrder::Random), &ids(20));
        s.restart(&mut rng, None, &ids(3));
        assert_eq!(s.order, LearnOrder::Random);
        let mut sorted = s.word_ids.clone();
        sorted.sort();
        assert_eq!(sorted, ids(3));
    }

    #[test]
    fn test_restart_without_words_keeps_cards() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut s = session(3);
        s.next();
        s.restart(&mut rng, None, &[]);
        assert_eq!(s.word_ids, ids(3));
        assert_eq!(s.current_index, 0);
    }

    #[test]
    fn test_reconcile_keeps_current_word() {
        let mut s = session(4);
        s.next();
        s.next();
        assert_eq!(s.current_word_id(), Some("w2"));

        let existing = vec!["w1".to_string(), "w2".to_string(), "w3".to_string()];
        assert!(s.reconcile(&existing));
        assert_eq!(s.word_ids, vec!["w1", "w2", "w3"]);
        assert_eq!(s.current_word_id(), Some("w2"));
    }

    #[test]
    fn test_reconcile_clamps_when_current_deleted() {
        let mut s = session(3);
        s.next();
        s.next();
        s.flip();

        let existing = vec!["w0".to_string()];
        assert!(s.reconcile(&existing));
        assert_eq!(s.current_index, 0);
        assert!(!s.is_flipped);
    }

    #[test]
    fn test_reconcile_appends_new_words() {
        let mut s = session(2);
        s.next();
        s.next();
        assert!(s.completed);

        let mut existing = ids(2);
        existing.push("w9".to_string());
        assert!(s.reconcile(&existing));
        assert!(!s.completed);
        assert_eq!(s.word_ids.last().map(String::as_str), Some("w9"));
        assert!(!s.reconcile(&existing));
    }

    #[test]
    fn test_snapshot_shape() {
        let value = serde_json::to_value(session(1)).unwrap();
        assert_eq!(value["wordSetId"], "set");
        assert_eq!(value["order"], "sequential");
        assert_eq!(value["isFlipped"], false);
    }
}
