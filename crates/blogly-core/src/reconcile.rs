//! Tag reconciliation for post edits.
//!
//! Given the tags stored for a post and the tags submitted on the edit form,
//! compute which join rows have to go and which have to be created.

use std::collections::BTreeSet;

/// Join-row changes needed to make a post carry exactly the submitted tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagChanges {
    /// Submitted but not stored yet.
    pub to_add: BTreeSet<i32>,
    /// Stored but no longer submitted.
    pub to_remove: BTreeSet<i32>,
}

impl TagChanges {
    /// Both directions of the difference, possibly empty.
    pub fn between(current: &BTreeSet<i32>, submitted: &BTreeSet<i32>) -> Self {
        Self {
            to_add: submitted.difference(current).copied().collect(),
            to_remove: current.difference(submitted).copied().collect(),
        }
    }

    /// Additions only, as for a freshly created post.
    pub fn additions(tag_ids: BTreeSet<i32>) -> Self {
        Self {
            to_add: tag_ids,
            to_remove: BTreeSet::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }

    /// Short human-readable summary, e.g. "Tags: 1 added, 2 removed."
    pub fn summary(&self) -> String {
        match (self.to_add.len(), self.to_remove.len()) {
            (0, 0) => "Tags: no changes.".to_string(),
            (added, 0) => format!("Tags: {added} added."),
            (0, removed) => format!("Tags: {removed} removed."),
            (added, removed) => format!("Tags: {added} added, {removed} removed."),
        }
    }
}

/// Reconcile the stored tag set with the submitted one.
///
/// Returns `None` when the sets already match, so there is nothing to write.
/// Tag ids are not checked for existence here; the store rejects unknown ids.
pub fn reconcile(current: &BTreeSet<i32>, submitted: &BTreeSet<i32>) -> Option<TagChanges> {
    let changes = TagChanges::between(current, submitted);
    (!changes.is_empty()).then_some(changes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[i32]) -> BTreeSet<i32> {
        ids.iter().copied().collect()
    }

    #[test]
    fn test_add_and_remove() {
        let changes = reconcile(&set(&[1, 2, 3]), &set(&[2, 3, 4])).unwrap();
        assert_eq!(changes.to_add, set(&[4]));
        assert_eq!(changes.to_remove, set(&[1]));
    }

    #[test]
    fn test_same_sets_are_unchanged() {
        assert_eq!(reconcile(&set(&[1, 2]), &set(&[2, 1])), None);
        assert_eq!(reconcile(&set(&[]), &set(&[])), None);
    }

    #[test]
    fn test_empty_submission_removes_everything() {
        let changes = reconcile(&set(&[5]), &set(&[])).unwrap();
        assert_eq!(changes.to_remove, set(&[5]));
        assert!(changes.to_add.is_empty());
    }

    #[test]
    fn test_empty_current_only_adds() {
        let changes = reconcile(&set(&[]), &set(&[7, 8])).unwrap();
        assert_eq!(changes.to_add, set(&[7, 8]));
        assert!(changes.to_remove.is_empty());
    }

    #[test]
    fn test_between_matches_set_difference() {
        let cases = [
            (set(&[1, 2, 3]), set(&[3, 4, 5])),
            (set(&[10]), set(&[10, 11])),
            (set(&[]), set(&[1])),
            (set(&[4, 6]), set(&[])),
        ];

        for (current, submitted) in cases {
            let changes = TagChanges::between(&current, &submitted);
            let expected_add: BTreeSet<i32> = submitted.difference(&current).copied().collect();
            let expected_remove: BTreeSet<i32> =
                current.difference(&submitted).copied().collect();

            assert_eq!(changes.to_add, expected_add);
            assert_eq!(changes.to_remove, expected_remove);
            assert_eq!(
                reconcile(&current, &submitted).is_some(),
                !expected_add.is_empty() || !expected_remove.is_empty()
            );
        }
    }

    #[test]
    fn test_summary() {
        assert_eq!(TagChanges::default().summary(), "Tags: no changes.");
        assert_eq!(
            TagChanges::between(&set(&[1, 2, 3]), &set(&[2, 3, 4])).summary(),
            "Tags: 1 added, 1 removed."
        );
        assert_eq!(TagChanges::additions(set(&[1, 2])).summary(), "Tags: 2 added.");
    }
}
