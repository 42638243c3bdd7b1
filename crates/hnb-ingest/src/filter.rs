//! Record filter
//!
//! Decides whether a fetched item qualifies for persistence. Rejection
//! is a normal outcome, not an error.

use crate::item::Item;

/// Minimum score a story needs to be persisted
pub const MIN_SCORE: i64 = 5;

/// True iff the item is a story with a score of at least [`MIN_SCORE`].
///
/// A missing score rejects; it is not treated as zero, it is treated
/// as unknown, and unknown does not qualify.
pub fn qualifies(item: &Item) -> bool {
    item.kind.as_deref() == Some("story") && item.score.is_some_and(|s| s >= MIN_SCORE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(kind: Option<&str>, score: Option<i64>) -> Item {
        Item {
            id: 1,
            kind: kind.map(String::from),
            title: None,
            url: None,
            score,
            by: None,
            time: None,
        }
    }

    #[test]
    fn test_story_at_threshold_qualifies() {
        assert!(qualifies(&item(Some("story"), Some(5))));
        assert!(qualifies(&item(Some("story"), Some(5000))));
    }

    #[test]
    fn test_story_below_threshold_rejected() {
        assert!(!qualifies(&item(Some("story"), Some(4))));
        assert!(!qualifies(&item(Some("story"), Some(0))));
        assert!(!qualifies(&item(Some("story"), Some(-1))));
    }

    #[test]
    fn test_non_story_rejected() {
        assert!(!qualifies(&item(Some("comment"), Some(50))));
        assert!(!qualifies(&item(Some("job"), Some(50))));
        assert!(!qualifies(&item(Some("poll"), Some(50))));
        assert!(!qualifies(&item(None, Some(50))));
    }

    #[test]
    fn test_missing_score_rejected() {
        assert!(!qualifies(&item(Some("story"), None)));
    }
}
