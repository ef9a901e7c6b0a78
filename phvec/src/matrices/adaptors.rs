// ======== Dualization ========================================

use crate::{index::Index, PhvecError};

use super::{ReducibleMatrix, VectorMatrix};

/// Produces the anti-transpose of `matrix`: entry `(i, j)` moves to `(N-1-j, N-1-i)`.
///
/// For a boundary matrix this is the coboundary matrix with the filtration order reversed, which is again upper triangular and can be reduced by the same algorithms.
/// Column `N-1-i` keeps the dimension of simplex `i`, and the dualization flag is toggled, so applying this twice gives back the original matrix.
/// Indices in a pairing read off from the result can be mapped back with [`PersistencePairing::reflect`](crate::pairing::PersistencePairing::reflect).
pub fn anti_transpose<I: Index>(matrix: &VectorMatrix<I>) -> Result<VectorMatrix<I>, PhvecError> {
    let n = matrix.num_columns().as_usize()?;

    let mut cofaces: Vec<Vec<I>> = vec![Vec::new(); n];
    for (j, (column, _)) in matrix.iter().enumerate() {
        let reflected_column = I::try_from_usize(n - 1 - j)?;
        for row in column {
            let row = row.as_usize()?;
            if row >= n {
                return Err(PhvecError::ColumnOutOfRange {
                    column: row,
                    num_columns: n,
                });
            }
            cofaces[n - 1 - row].push(reflected_column);
        }
    }

    let mut dual = VectorMatrix::with_num_columns(matrix.num_columns())?;
    for ((k, rows), (_, dimension)) in cofaces.into_iter().enumerate().zip(matrix.iter().rev()) {
        let k = I::try_from_usize(k)?;
        dual.set_column(k, rows)?;
        dual.set_dimension(k, dimension)?;
    }
    dual.set_dualized(!matrix.is_dualized());

    Ok(dual)
}
