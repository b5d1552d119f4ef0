// ============================================================
// Layer 4 — Train/Test Splitter
// ============================================================
// Shuffles rows with a seeded RNG and cuts them into a
// training and a held-out test partition.
//
// Sizing follows the usual convention:
//   n_test  = ceil(n * test_size)
//   n_train = n - n_test
// so 10 rows at test_size=0.2 always give 8 / 2.
//
// The split is row-wise i.i.d.: not time-ordered, not
// stratified by user. The same seed and input always produce
// the same partitions.

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::error::DataError;

/// Number of rows that go to the test partition.
pub fn test_count(total: usize, test_size: f64) -> usize {
    ((total as f64) * test_size).ceil() as usize
}

/// Shuffle `rows` with `seed` and split into (train, test).
///
/// Fails when either side would end up empty.
pub fn split_train_test<T>(
    mut rows:  Vec<T>,
    test_size: f64,
    seed:      u64,
) -> Result<(Vec<T>, Vec<T>), DataError> {
    let total  = rows.len();
    let n_test = test_count(total, test_size);

    if n_test == 0 || n_test >= total {
        return Err(DataError::SplitTooSmall { rows: total, test_size });
    }

    let mut rng = StdRng::seed_from_u64(seed);
    rows.shuffle(&mut rng);

    // split_off(n) leaves [0..n] in `rows` and returns [n..total]
    let test = rows.split_off(total - n_test);

    tracing::debug!(
        "Dataset split: {} train, {} test (seed={})",
        rows.len(),
        test.len(),
        seed,
    );

    Ok((rows, test))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ten_rows_at_twenty_percent() {
        let rows: Vec<usize> = (0..10).collect();
        let (train, test)    = split_train_test(rows, 0.2, 42).unwrap();
        assert_eq!(train.len(), 8);
        assert_eq!(test.len(),  2);
    }

    #[test]
    fn test_partitions_disjoint_and_complete() {
        let rows: Vec<usize> = (0..97).collect();
        let (train, test)    = split_train_test(rows, 0.3, 7).unwrap();

        let train_set: HashSet<_> = train.iter().copied().collect();
        let test_set:  HashSet<_> = test.iter().copied().collect();
        assert!(train_set.is_disjoint(&test_set));

        let union: HashSet<_> = train_set.union(&test_set).copied().collect();
        assert_eq!(union, (0..97).collect::<HashSet<_>>());
        assert_eq!(train.len() + test.len(), 97);
    }

    #[test]
    fn test_same_seed_same_split() {
        let a = split_train_test((0..40).collect::<Vec<u32>>(), 0.25, 123).unwrap();
        let b = split_train_test((0..40).collect::<Vec<u32>>(), 0.25, 123).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seed_usually_differs() {
        let a = split_train_test((0..40).collect::<Vec<u32>>(), 0.25, 1).unwrap();
        let b = split_train_test((0..40).collect::<Vec<u32>>(), 0.25, 2).unwrap();
        assert_ne!(a.1, b.1);
    }

    #[test]
    fn test_test_count_rounds_up() {
        assert_eq!(test_count(10, 0.2), 2);
        assert_eq!(test_count(11, 0.2), 3);
        assert_eq!(test_count(3, 0.01), 1);
    }

    #[test]
    fn test_too_small_to_split() {
        assert!(matches!(
            split_train_test(vec![1], 0.5, 0),
            Err(DataError::SplitTooSmall { rows: 1, .. })
        ));
        assert!(split_train_test(Vec::<u8>::new(), 0.2, 0).is_err());
    }
}
