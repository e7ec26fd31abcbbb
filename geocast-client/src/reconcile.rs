//! Subscription set reconciliation.
//!
//! Given the topic set currently held and the set a new covering calls for,
//! compute the minimal subscribe/unsubscribe operations. Matching is exact
//! string equality, and each topic occurrence matches at most one occurrence
//! on the other side, so duplicate topics reconcile by multiplicity.
//!
//! O(n·m), which is fine: both sides are bounded by the covering cell budget.

use crate::topic::Topic;

/// The broker operations needed to move from one topic set to another.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicDiff {
    /// Topics held but no longer wanted.
    pub unsubscribe: Vec<Topic>,
    /// Topics wanted but not yet held.
    pub subscribe: Vec<Topic>,
}

impl TopicDiff {
    /// True if the sets already match.
    pub fn is_empty(&self) -> bool {
        self.unsubscribe.is_empty() && self.subscribe.is_empty()
    }
}

/// Diff `current` against `next`.
///
/// Topics present in both (matched at most once per occurrence) appear in
/// neither output; everything else lands in `unsubscribe` or `subscribe`
/// respectively, in input order.
pub fn diff(current: &[Topic], next: &[Topic]) -> TopicDiff {
    let mut matched = vec![false; next.len()];
    let mut unsubscribe = Vec::new();

    for held in current {
        let slot = next
            .iter()
            .enumerate()
            .find(|(j, wanted)| !matched[*j] && *wanted == held);
        match slot {
            Some((j, _)) => matched[j] = true,
            None => unsubscribe.push(held.clone()),
        }
    }

    let subscribe = next
        .iter()
        .zip(&matched)
        .filter(|(_, &taken)| !taken)
        .map(|(topic, _)| topic.clone())
        .collect();

    TopicDiff {
        unsubscribe,
        subscribe,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topics(names: &[&str]) -> Vec<Topic> {
        names.iter().map(|&n| Topic::from(n)).collect()
    }

    #[test]
    fn test_identical_sets_are_empty_diff() {
        let held = topics(&["/0/1/2", "/0/1/3"]);
        let d = diff(&held, &held);
        assert!(d.is_empty());
    }

    #[test]
    fn test_empty_current_subscribes_everything() {
        let next = topics(&["/1/0", "/1/2"]);
        let d = diff(&[], &next);
        assert!(d.unsubscribe.is_empty());
        assert_eq!(d.subscribe, next);
    }

    #[test]
    fn test_empty_next_unsubscribes_everything() {
        let current = topics(&["/1/0", "/1/2"]);
        let d = diff(&current, &[]);
        assert_eq!(d.unsubscribe, current);
        assert!(d.subscribe.is_empty());
    }

    #[test]
    fn test_partial_overlap() {
        let current = topics(&["/0/1/2", "/0/1/3"]);
        let next = topics(&["/0/1/2", "/0/1/4"]);
        let d = diff(&current, &next);
        assert_eq!(d.unsubscribe, topics(&["/0/1/3"]));
        assert_eq!(d.subscribe, topics(&["/0/1/4"]));
    }

    #[test]
    fn test_order_does_not_matter_for_matching() {
        let current = topics(&["/2/0", "/3/1"]);
        let next = topics(&["/3/1", "/2/0"]);
        assert!(diff(&current, &next).is_empty());
    }

    #[test]
    fn test_duplicates_match_by_multiplicity() {
        let current = topics(&["/0/1", "/0/1"]);
        let next = topics(&["/0/1"]);
        let d = diff(&current, &next);
        assert_eq!(d.unsubscribe, topics(&["/0/1"]));
        assert!(d.subscribe.is_empty());

        let d = diff(&next, &current);
        assert_eq!(d.subscribe, topics(&["/0/1"]));
        assert!(d.unsubscribe.is_empty());
    }
}
