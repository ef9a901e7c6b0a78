//! Reduces every dimension of a [`VectorMatrix`] independently, on the `rayon` thread pool.
//!
//! A boundary (or coboundary) matrix of a simplicial complex only has non-zero entries between adjacent dimensions, so two columns of different dimension never share a pivot row.
//! Each dimension can then be reduced with its own pivot lookup, and the lookups merged afterwards.
//!
//! Dimensions derived from facet counts need not be the dimensions of the cells, e.g. for a bigon with two facets.
//! Columns of different dimension may then end up with the same pivot.
//! Such conflicts are detected while merging, and the matrix is finished with the sequential [`reduce`].

use log::{debug, warn};
use rayon::prelude::*;
use rustc_hash::FxHashMap;

use crate::{
    columns::{pivot, symmetric_difference},
    index::Index,
    matrices::VectorMatrix,
    reduction::{reduce, Reduction},
    PhvecError,
};

/// Columns of a single dimension, tagged with their position in the full matrix.
type Partition<I> = Vec<(usize, Vec<I>)>;

/// Reduce the provided matrix in place, one `rayon` task per dimension.
///
/// Produces the same pivots as [`reduce`].
pub fn reduce_by_dimension<I: Index>(
    matrix: &mut VectorMatrix<I>,
) -> Result<Reduction<I>, PhvecError> {
    let dimensions = matrix
        .dimensions()
        .iter()
        .map(|dimension| dimension.as_usize())
        .collect::<Result<Vec<_>, _>>()?;
    let num_columns = dimensions.len();
    let num_partitions = dimensions.iter().max().map_or(0, |max| max + 1);
    debug!("Reducing {num_columns} columns in {num_partitions} dimensions in parallel");

    let mut partitions: Vec<Partition<I>> = vec![Vec::new(); num_partitions];
    for (j, (column, dimension)) in matrix.take_columns().into_iter().zip(dimensions).enumerate() {
        partitions[dimension].push((j, column));
    }

    let reductions: Vec<(Vec<(I, usize)>, usize)> =
        partitions.par_iter_mut().map(reduce_partition).collect();

    let mut columns = vec![Vec::new(); num_columns];
    for (j, column) in partitions.into_iter().flatten() {
        columns[j] = column;
    }
    matrix.restore_columns(columns);

    let mut low_inverse = FxHashMap::default();
    let mut additions = 0;
    let mut conflicts = 0;
    for (pivots, partition_additions) in reductions {
        additions += partition_additions;
        for (row, j) in pivots {
            if low_inverse.insert(row, I::try_from_usize(j)?).is_some() {
                conflicts += 1;
            }
        }
    }

    if conflicts > 0 {
        // Every column is still its original plus earlier columns, so the sweep can pick up from here
        warn!("{conflicts} pivots are shared across dimensions, finishing the reduction sequentially");
        let finish = reduce(matrix)?;
        return Ok(Reduction {
            low_inverse: finish.low_inverse,
            additions: additions + finish.additions,
        });
    }

    debug!(
        "Parallel reduction finished: {} pivots, {additions} column additions",
        low_inverse.len()
    );

    Ok(Reduction {
        low_inverse,
        additions,
    })
}

/// Standard algorithm on a single partition.
/// Returns the pivots as `(row, column in full matrix)` together with the number of additions.
fn reduce_partition<I: Index>(partition: &mut Partition<I>) -> (Vec<(I, usize)>, usize) {
    // low_inverse[i] = t means the t-th column of the partition has its pivot in row i
    let mut low_inverse: FxHashMap<I, usize> = FxHashMap::default();
    let mut additions = 0;

    for t in 0..partition.len() {
        let (done, rest) = partition.split_at_mut(t);
        let target = &mut rest[0].1;
        while let Some(row) = pivot(target.as_slice()) {
            let Some(&s) = low_inverse.get(&row) else {
                low_inverse.insert(row, t);
                break;
            };
            *target = symmetric_difference(done[s].1.as_slice(), target.as_slice());
            additions += 1;
        }
    }

    let pivots = low_inverse
        .into_iter()
        .map(|(row, t)| (row, partition[t].0))
        .collect();
    (pivots, additions)
}
