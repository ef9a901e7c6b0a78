use crate::{index::Index, PhvecError};

pub mod adaptors;
pub mod implementors;

pub use adaptors::anti_transpose;
pub use implementors::VectorMatrix;

// ======== Abstract reducible matrix trait ====================

/// The operations a matrix representation must support so that the algorithms in [`reduction`](crate::reduction) can reduce it.
///
/// Columns are addressed by [`Index`]; every method that takes a column must return [`PhvecError::ColumnOutOfRange`] when it does not exist.
/// Entries are over `Z2`, so a column is just the set of its non-zero rows.
pub trait ReducibleMatrix {
    type Index: Index;

    fn num_columns(&self) -> Self::Index;

    /// The pivot of `column`, or `None` if it is the zero column.
    fn maximum_index(&self, column: Self::Index) -> Result<Option<Self::Index>, PhvecError>;

    /// Replaces `target` by `source + target` (mod 2).
    fn add_columns(&mut self, source: Self::Index, target: Self::Index)
        -> Result<(), PhvecError>;

    fn clear_column(&mut self, column: Self::Index) -> Result<(), PhvecError>;

    fn dimension_of(&self, column: Self::Index) -> Result<Self::Index, PhvecError>;

    /// Largest dimension over all columns, `0` for an empty matrix.
    fn dimension(&self) -> Self::Index;

    fn is_dualized(&self) -> bool;
}
