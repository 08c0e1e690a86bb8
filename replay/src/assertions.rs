//! Assertions over lists returned by the client.

use std::fmt::Debug;

/// Assert that `key` applied to every element yields exactly `expected`, in
/// order.
#[track_caller]
pub fn assert_list_key_equal<T, K, F>(elements: &[T], key: F, expected: &[K])
where
    K: PartialEq + Debug,
    F: Fn(&T) -> K,
{
    let actual: Vec<K> = elements.iter().map(key).collect();
    assert_eq!(actual.as_slice(), expected, "list keys differ");
}

/// Assert that the first `expected.len()` keys match `expected`. Useful for
/// paginated results whose tail keeps growing on the live service.
#[track_caller]
pub fn assert_list_key_begin<T, K, F>(elements: &[T], key: F, expected: &[K])
where
    K: PartialEq + Debug,
    F: Fn(&T) -> K,
{
    assert!(
        elements.len() >= expected.len(),
        "list has {} elements, expected at least {}",
        elements.len(),
        expected.len()
    );
    let actual: Vec<K> = elements.iter().take(expected.len()).map(key).collect();
    assert_eq!(actual.as_slice(), expected, "list prefix differs");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_compares_every_key() {
        let words = ["alpha", "beta"];
        assert_list_key_equal(&words, |w| w.len(), &[5, 4]);
    }

    #[test]
    #[should_panic(expected = "list keys differ")]
    fn equal_rejects_extra_elements() {
        let words = ["alpha", "beta", "gamma"];
        assert_list_key_equal(&words, |w| w.len(), &[5, 4]);
    }

    #[test]
    fn begin_ignores_the_tail() {
        let ids = [1u64, 2, 3, 4];
        assert_list_key_begin(&ids, |id| *id, &[1, 2]);
    }

    #[test]
    #[should_panic(expected = "expected at least 3")]
    fn begin_rejects_short_lists() {
        let ids = [1u64, 2];
        assert_list_key_begin(&ids, |id| *id, &[1, 2, 3]);
    }
}
