//! Before/after comparison used to skip writes that would change nothing.

/// Report whether `to` differs from `from`.
///
/// Sequences of different length always count as changed, so a caller that
/// builds mismatched tuples never silently drops a write. Otherwise the
/// result is `true` as soon as one position differs.
pub fn changed<T: PartialEq>(from: &[T], to: &[T]) -> bool {
    if from.len() != to.len() {
        return true;
    }
    from.iter().zip(to).any(|(a, b)| a != b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_values_are_unchanged() {
        assert!(!changed(&["Ada", "Lovelace"], &["Ada", "Lovelace"]));
    }

    #[test]
    fn test_single_difference_is_a_change() {
        assert!(changed(&["Ada", "Lovelace"], &["Ada", "Byron"]));
        assert!(changed(&[1, 2, 3], &[0, 2, 3]));
    }

    #[test]
    fn test_length_mismatch_is_a_change() {
        assert!(changed(&[1, 2], &[1, 2, 3]));
        assert!(changed::<i32>(&[], &[1]));
    }

    #[test]
    fn test_empty_sequences_are_unchanged() {
        assert!(!changed::<i32>(&[], &[]));
    }

    #[test]
    fn test_none_and_empty_string_differ() {
        assert!(changed(&[None, Some("x")], &[Some(""), Some("x")]));
        assert!(!changed(&[None::<&str>], &[None]));
    }

    #[test]
    fn test_no_case_folding() {
        assert!(changed(&["rust"], &["Rust"]));
    }
}
