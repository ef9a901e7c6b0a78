//! Column reduction algorithms for [`ReducibleMatrix`] implementors.
//! Includes the standard algorithm, the twist (clearing) optimisation and a variant that reduces each dimension on its own thread.
//!
//! All algorithms mutate the matrix in place until every non-empty column has a pivot that no other non-empty column shares.
//! They produce identical pivots, so the pairing read off by [`read_off_pairing`](crate::pairing::read_off_pairing) does not depend on the choice.

pub mod parallel;
pub mod standard;
pub mod twist;

pub use parallel::*;
pub use standard::*;
pub use twist::*;

use std::hash::Hash;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::{
    index::{indices, Index},
    matrices::{ReducibleMatrix, VectorMatrix},
    PhvecError,
};

/// Summary of a completed reduction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reduction<I: Hash + Eq> {
    /// `low_inverse[i] = j` means the reduced column `j` has its pivot in row `i`.
    pub low_inverse: FxHashMap<I, I>,
    /// Number of column additions that were performed.
    pub additions: usize,
}

impl<I: Index> Reduction<I> {
    /// The column that kills the class born at `row`, if any.
    pub fn death_of(&self, row: I) -> Option<I> {
        self.low_inverse.get(&row).copied()
    }
}

/// Selects one of the reduction algorithms at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    #[default]
    Standard,
    Twist,
    Parallel,
}

impl Algorithm {
    pub fn reduce<I: Index>(self, matrix: &mut VectorMatrix<I>) -> Result<Reduction<I>, PhvecError> {
        match self {
            Algorithm::Standard => reduce(matrix),
            Algorithm::Twist => reduce_with_clearing(matrix),
            Algorithm::Parallel => reduce_by_dimension(matrix),
        }
    }
}

/// Checks that no two non-empty columns share a pivot.
pub fn is_reduced<M: ReducibleMatrix>(matrix: &M) -> Result<bool, PhvecError> {
    let mut seen = FxHashSet::default();
    for j in indices(matrix.num_columns()) {
        if let Some(pivot) = matrix.maximum_index(j)? {
            if !seen.insert(pivot) {
                return Ok(false);
            }
        }
    }
    Ok(true)
}

#[cfg(test)]
pub(crate) mod tests {
    use crate::matrices::{ReducibleMatrix, VectorMatrix};
    use crate::pairing::read_off_pairing;

    use super::{is_reduced, reduce, Algorithm};

    /// Boundary matrix of a filled triangle.
    pub(crate) fn triangle() -> VectorMatrix<u32> {
        VectorMatrix::from_boundaries(vec![
            vec![],
            vec![],
            vec![],
            vec![0, 1],
            vec![1, 2],
            vec![0, 2],
            vec![3, 4, 5],
        ])
        .unwrap()
    }

    /// The triangle with a second edge `{0, 1}`, a triangle on the parallel edge and a bigon between the two edges.
    /// The bigon has two facets and so gets dimension 1.
    pub(crate) fn bigon() -> VectorMatrix<u32> {
        VectorMatrix::from_boundaries(vec![
            vec![],
            vec![],
            vec![],
            vec![0, 1],
            vec![1, 2],
            vec![0, 2],
            vec![0, 1],
            vec![4, 5, 6],
            vec![3, 6],
        ])
        .unwrap()
    }

    /// A square with diagonal `{0, 2}`, the triangle `{0, 2, 3}` and the square as a single 2-cell.
    /// The square has four facets and so gets dimension 3, although its pivot is the pivot of the triangle.
    pub(crate) fn square_over_triangle() -> VectorMatrix<u32> {
        VectorMatrix::from_boundaries(vec![
            vec![],
            vec![],
            vec![],
            vec![],
            vec![0, 2],
            vec![0, 1],
            vec![1, 2],
            vec![2, 3],
            vec![0, 3],
            vec![4, 7, 8],
            vec![5, 6, 7, 8],
        ])
        .unwrap()
    }

    /// The triangle, with the first edge given as `[1, 0, 1]` so that it is tagged dimension 2.
    pub(crate) fn edge_with_repeated_facet() -> VectorMatrix<u32> {
        let mut matrix = triangle();
        matrix.set_column(3, vec![1, 0, 1]).unwrap();
        matrix
    }

    #[test]
    fn test_triangle_reduction() {
        let mut matrix = triangle();
        assert!(!is_reduced(&matrix).unwrap());
        let reduction = reduce(&mut matrix).unwrap();
        assert!(is_reduced(&matrix).unwrap());

        let true_matrix = VectorMatrix::from_boundaries(vec![
            vec![],
            vec![],
            vec![],
            vec![0, 1],
            vec![1, 2],
            vec![],
            vec![3, 4, 5],
        ])
        .unwrap();
        assert!((0..7u32).all(|j| matrix.column(j).unwrap() == true_matrix.column(j).unwrap()));

        assert_eq!(reduction.death_of(1), Some(3));
        assert_eq!(reduction.death_of(2), Some(4));
        assert_eq!(reduction.death_of(5), Some(6));
        assert_eq!(reduction.death_of(0), None);
        // Column 5 needs two additions before it vanishes
        assert_eq!(reduction.additions, 2);
    }

    #[test]
    fn test_reduction_is_idempotent() {
        let mut matrix = triangle();
        let first = reduce(&mut matrix).unwrap();
        let reduced = matrix.clone();

        let second = reduce(&mut matrix).unwrap();
        assert_eq!(matrix, reduced);
        assert_eq!(second.low_inverse, first.low_inverse);
        assert_eq!(second.additions, 0);
    }

    #[test]
    fn test_algorithms_agree() {
        let mut standard = triangle();
        let expected = Algorithm::Standard.reduce(&mut standard).unwrap();

        for algorithm in [Algorithm::Twist, Algorithm::Parallel] {
            let mut matrix = triangle();
            let reduction = algorithm.reduce(&mut matrix).unwrap();
            assert!(is_reduced(&matrix).unwrap());
            assert_eq!(reduction.low_inverse, expected.low_inverse, "{algorithm:?}");
            for j in 0..matrix.num_columns() {
                assert_eq!(
                    matrix.maximum_index(j).unwrap(),
                    standard.maximum_index(j).unwrap()
                );
            }
        }
    }

    #[test]
    fn test_algorithms_agree_on_cell_complexes() {
        let fixtures: [fn() -> VectorMatrix<u32>; 3] =
            [bigon, square_over_triangle, edge_with_repeated_facet];
        for fixture in fixtures {
            let mut standard = fixture();
            let expected = Algorithm::Standard.reduce(&mut standard).unwrap();
            let expected_pairing = read_off_pairing(&standard).unwrap();

            for algorithm in [Algorithm::Twist, Algorithm::Parallel] {
                let mut matrix = fixture();
                let reduction = algorithm.reduce(&mut matrix).unwrap();
                assert!(is_reduced(&matrix).unwrap(), "{algorithm:?}");
                assert_eq!(reduction.low_inverse, expected.low_inverse, "{algorithm:?}");
                assert_eq!(read_off_pairing(&matrix).unwrap(), expected_pairing, "{algorithm:?}");
            }
        }
    }
}
