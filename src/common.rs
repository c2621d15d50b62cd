use itertools::iproduct;
use std::collections::HashSet;
use std::hash::Hash;

pub fn slice_pairwise_ordered<T>(v: &[T]) -> impl Iterator<Item = (&T, &T)> {
    iproduct!(0..v.len(), 0..v.len())
        .filter(|(i, j)| j > i)
        .map(move |(i, j)| (&v[i], &v[j]))
}

/// Returns the first element whose key has already been seen earlier in the iterator.
pub fn find_first_repeat<T, K, F>(it: impl Iterator<Item = T>, mut key: F) -> Option<T>
where
    K: Eq + Hash,
    F: FnMut(&T) -> K,
{
    let mut seen = HashSet::new();
    for t in it {
        if !seen.insert(key(&t)) {
            return Some(t);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_repeat_is_the_second_occurrence() {
        let v = [(1, 'a'), (2, 'b'), (1, 'c'), (2, 'd')];
        assert_eq!(find_first_repeat(v.iter(), |(k, _)| *k), Some(&(1, 'c')));
        assert_eq!(find_first_repeat([1, 2, 3].iter(), |k| **k), None);
    }

    #[test]
    fn pairwise_ordered_skips_diagonal() {
        assert_eq!(slice_pairwise_ordered(&[1, 2, 3]).count(), 3);
        assert_eq!(slice_pairwise_ordered::<u8>(&[]).count(), 0);
    }
}
