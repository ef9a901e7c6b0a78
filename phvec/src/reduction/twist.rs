//! An implementation of the standard algorithm with the clearing (twist) optimisation.
//!
//! If column `j` ends up with pivot `i` then column `i` is known to reduce to zero, so it can be cleared without doing any work.
//! To profit from this, columns are processed one dimension at a time, starting with the dimension whose pivots lie in the dimensions processed afterwards.
//! For a boundary matrix that means decreasing dimension; for a dualized (coboundary) matrix increasing dimension.
//!
//! If the dimensions do not match the cells, a column may meet its pivot in a column to its right.
//! The sweep then stops and the standard algorithm finishes the reduction.

use std::cmp::Reverse;

use log::{debug, trace, warn};
use rustc_hash::FxHashMap;

use crate::{
    index::indices,
    matrices::ReducibleMatrix,
    reduction::{reduce, Reduction},
    PhvecError,
};

/// Reduce the provided matrix in place, clearing every column that is found to be a pivot row.
///
/// Within a dimension columns are still reduced left to right, so the pivots agree with [`reduce`](super::reduce).
pub fn reduce_with_clearing<M: ReducibleMatrix>(
    matrix: &mut M,
) -> Result<Reduction<M::Index>, PhvecError> {
    let num_columns = matrix.num_columns();
    let descending = !matrix.is_dualized();
    debug!("Reducing {num_columns:?} columns with clearing (descending dimension: {descending})");

    let mut order: Vec<(M::Index, M::Index)> = indices(num_columns)
        .map(|j| Ok((matrix.dimension_of(j)?, j)))
        .collect::<Result<_, PhvecError>>()?;
    if descending {
        order.sort_unstable_by_key(|&(dimension, j)| (Reverse(dimension), j));
    } else {
        order.sort_unstable();
    }

    let mut low_inverse: FxHashMap<M::Index, M::Index> = FxHashMap::default();
    let mut additions = 0;
    let mut cleared = 0;
    let mut out_of_order = None;

    'sweep: for (dimension, j) in order {
        // Cleared columns are already zero and skip straight through
        'reduction: while let Some(pivot) = matrix.maximum_index(j)? {
            let Some(&k) = low_inverse.get(&pivot) else {
                low_inverse.insert(pivot, j);

                // Only clear columns that are yet to be processed
                let pivot_dimension = matrix.dimension_of(pivot)?;
                let pending = if descending {
                    pivot_dimension < dimension
                } else {
                    pivot_dimension > dimension
                };
                if pending && matrix.maximum_index(pivot)?.is_some() {
                    matrix.clear_column(pivot)?;
                    cleared += 1;
                }
                break 'reduction;
            };
            if k > j {
                out_of_order = Some(j);
                break 'sweep;
            }
            matrix.add_columns(k, j)?;
            additions += 1;
        }
        trace!("Reduced column {j:?}");
    }

    if let Some(j) = out_of_order {
        // Additions and clearing so far leave every column its original plus earlier columns
        warn!(
            "Column {j:?} shares a pivot with a later column of another dimension, \
             finishing the reduction without clearing"
        );
        let finish = reduce(matrix)?;
        return Ok(Reduction {
            low_inverse: finish.low_inverse,
            additions: additions + finish.additions,
        });
    }

    debug!(
        "Clearing reduction finished: {} pivots, {additions} column additions, {cleared} columns cleared",
        low_inverse.len()
    );

    Ok(Reduction {
        low_inverse,
        additions,
    })
}

#[cfg(test)]
mod tests {
    use crate::matrices::{anti_transpose, ReducibleMatrix, VectorMatrix};
    use crate::reduction::{is_reduced, reduce, tests::{bigon, square_over_triangle, triangle}};

    use super::reduce_with_clearing;

    #[test]
    fn test_clearing_saves_additions() {
        let mut matrix = triangle();
        let reduction = reduce_with_clearing(&mut matrix).unwrap();
        assert!(is_reduced(&matrix).unwrap());
        // Column 5 is cleared by the pivot of column 6 instead of being reduced
        assert_eq!(reduction.additions, 0);
        assert_eq!(matrix.maximum_index(5).unwrap(), None);
    }

    #[test]
    fn test_clearing_on_dualized_matrix() {
        let dual = anti_transpose(&triangle()).unwrap();
        assert!(dual.is_dualized());

        let mut standard = dual.clone();
        let expected = reduce(&mut standard).unwrap();
        let mut cleared = dual;
        let reduction = reduce_with_clearing(&mut cleared).unwrap();

        assert!(is_reduced(&cleared).unwrap());
        assert_eq!(reduction.low_inverse, expected.low_inverse);
    }

    #[test]
    fn test_clearing_two_triangles() {
        // Two triangles glued along the edge {1, 2}
        let boundaries: Vec<Vec<u64>> = vec![
            vec![],
            vec![],
            vec![],
            vec![],
            vec![0, 1],
            vec![1, 2],
            vec![0, 2],
            vec![1, 3],
            vec![2, 3],
            vec![4, 5, 6],
            vec![5, 7, 8],
        ];
        let mut standard: VectorMatrix<u64> = VectorMatrix::from_boundaries(boundaries.clone()).unwrap();
        let mut cleared: VectorMatrix<u64> = VectorMatrix::from_boundaries(boundaries).unwrap();
        let expected = reduce(&mut standard).unwrap();
        let reduction = reduce_with_clearing(&mut cleared).unwrap();
        assert_eq!(reduction.low_inverse, expected.low_inverse);
        assert!(reduction.additions <= expected.additions);
    }

    #[test]
    fn test_clearing_with_bigon() {
        let mut standard = bigon();
        let expected = reduce(&mut standard).unwrap();
        let mut cleared = bigon();
        let reduction = reduce_with_clearing(&mut cleared).unwrap();
        assert!(is_reduced(&cleared).unwrap());
        assert_eq!(reduction.low_inverse, expected.low_inverse);
    }

    #[test]
    fn test_clearing_with_pivot_owned_by_later_column() {
        // The square is processed first but its pivot belongs to the earlier triangle
        let mut standard = square_over_triangle();
        let expected = reduce(&mut standard).unwrap();
        assert_eq!(expected.death_of(8), Some(9));

        let mut cleared = square_over_triangle();
        let reduction = reduce_with_clearing(&mut cleared).unwrap();
        assert!(is_reduced(&cleared).unwrap());
        assert_eq!(reduction.low_inverse, expected.low_inverse);
        for j in 0..cleared.num_columns() {
            assert_eq!(
                cleared.maximum_index(j).unwrap(),
                standard.maximum_index(j).unwrap()
            );
        }
    }
}
