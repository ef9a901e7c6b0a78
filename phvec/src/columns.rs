//! Sorted sparse representations of matrix columns over `Z2`.
//!
//! A column is a `Vec` of row indices, ascending and free of duplicates, so the pivot is always the last entry.
//! Both the pivot query and [`symmetric_difference`] rely on this.

use itertools::{EitherOrBoth, Itertools};

/// Turns an arbitrary sequence of row indices into a sorted column with duplicates removed.
pub fn normalise<I: Ord + Copy>(rows: impl IntoIterator<Item = I>) -> Vec<I> {
    let mut column: Vec<I> = rows.into_iter().collect();
    column.sort_unstable();
    column.dedup();
    column
}

/// Addition of two columns mod 2.
/// Rows present in exactly one of the two columns survive, the output is sorted.
///
/// Runs in a single merge pass over both inputs, which must already be sorted.
pub fn symmetric_difference<I: Ord + Copy>(source: &[I], target: &[I]) -> Vec<I> {
    let mut result = Vec::with_capacity(source.len() + target.len());
    result.extend(
        source
            .iter()
            .merge_join_by(target.iter(), |s, t| s.cmp(t))
            .filter_map(|entry| match entry {
                EitherOrBoth::Left(row) | EitherOrBoth::Right(row) => Some(*row),
                // 1 + 1 = 0
                EitherOrBoth::Both(_, _) => None,
            }),
    );
    result
}

/// The pivot (largest row index) of a sorted column.
pub fn pivot<I: Copy>(column: &[I]) -> Option<I> {
    column.last().copied()
}

#[cfg(test)]
mod tests {
    use super::{normalise, pivot, symmetric_difference};

    #[test]
    fn test_normalise_sorts_and_dedups() {
        assert_eq!(normalise(vec![5u32, 1, 3, 1, 5]), vec![1, 3, 5]);
        assert_eq!(normalise(Vec::<u32>::new()), Vec::<u32>::new());
    }

    #[test]
    fn test_symmetric_difference() {
        let a = vec![0u32, 2, 4, 6];
        let b = vec![1u32, 2, 3, 6, 7];
        assert_eq!(symmetric_difference(&a, &b), vec![0, 1, 3, 4, 7]);
        assert_eq!(symmetric_difference(&b, &a), vec![0, 1, 3, 4, 7]);
    }

    #[test]
    fn test_symmetric_difference_with_self_vanishes() {
        let a = vec![3u32, 4, 5];
        assert!(symmetric_difference(&a, &a).is_empty());
        assert_eq!(symmetric_difference(&a, &[]), a);
        assert_eq!(symmetric_difference(&[], &a), a);
    }

    #[test]
    fn test_pivot() {
        assert_eq!(pivot(&[1u32, 4, 9]), Some(9));
        assert_eq!(pivot::<u32>(&[]), None);
    }
}
