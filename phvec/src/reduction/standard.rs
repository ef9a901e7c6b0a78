//! An implementation of the standard algorithm with no optimisations.
//!
//! Columns are swept left to right.
//! Each column is reduced by adding earlier reduced columns with the same pivot until its pivot is unique or the column vanishes.

use log::{debug, trace};
use rustc_hash::FxHashMap;

use crate::{
    index::indices,
    matrices::ReducibleMatrix,
    reduction::Reduction,
    PhvecError,
};

/// Run the standard algorithm to reduce the provided matrix in place.
///
/// Earlier columns with a matching pivot are found via a pivot lookup built up during the sweep, rather than by scanning.
pub fn reduce<M: ReducibleMatrix>(matrix: &mut M) -> Result<Reduction<M::Index>, PhvecError> {
    let num_columns = matrix.num_columns();
    debug!("Reducing {num_columns:?} columns with the standard algorithm");

    // low_inverse[i] = j means R[j] has lowest non-zero in row i
    let mut low_inverse: FxHashMap<M::Index, M::Index> = FxHashMap::default();
    let mut additions = 0;

    for j in indices(num_columns) {
        'reduction: while let Some(pivot) = matrix.maximum_index(j)? {
            // Check if there is a column with the same pivot
            let Some(&k) = low_inverse.get(&pivot) else {
                // Cannot reduce further -> found boundary -> save pivot
                low_inverse.insert(pivot, j);
                break 'reduction;
            };
            matrix.add_columns(k, j)?;
            additions += 1;
        }
        trace!("Reduced column {j:?}");
    }

    debug!(
        "Standard reduction finished: {} pivots, {additions} column additions",
        low_inverse.len()
    );

    Ok(Reduction {
        low_inverse,
        additions,
    })
}

/// Reduces a copy of `matrix`, leaving the original untouched.
pub fn reduced<M>(matrix: &M) -> Result<(M, Reduction<M::Index>), PhvecError>
where
    M: ReducibleMatrix + Clone,
{
    let mut copy = matrix.clone();
    let reduction = reduce(&mut copy)?;
    Ok((copy, reduction))
}
