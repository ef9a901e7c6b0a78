// ======== Default matrix representation ======================

use std::fmt::Display;

use crate::{
    columns::{normalise, pivot, symmetric_difference},
    index::Index,
    PhvecError,
};

use super::ReducibleMatrix;

// ====== VectorMatrix =========================

/// Column-major sparse boundary matrix over `Z2`.
///
/// Every column stores its non-zero rows sorted ascending, alongside the dimension of the simplex it represents.
/// A single flag records whether the matrix should be read as a coboundary matrix, the storage itself does not depend on it.
///
/// Row indices in column `j` are expected to be strictly smaller than `j` (faces precede cofaces).
/// This is not checked, violating it silently produces a meaningless pairing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorMatrix<I: Index = u32> {
    columns: Vec<Vec<I>>,
    dimensions: Vec<I>,
    num_columns: I,
    dualized: bool,
}

impl<I: Index> Default for VectorMatrix<I> {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            dimensions: Vec::new(),
            num_columns: I::zero(),
            dualized: false,
        }
    }
}

impl<I: Index> VectorMatrix<I> {
    pub fn with_num_columns(num_columns: I) -> Result<Self, PhvecError> {
        let mut matrix = Self::default();
        matrix.set_num_columns(num_columns)?;
        Ok(matrix)
    }

    /// Builds a matrix whose column `j` is the `j`-th boundary, assigned via [`set_column`](Self::set_column).
    pub fn from_boundaries<B>(boundaries: impl IntoIterator<Item = B>) -> Result<Self, PhvecError>
    where
        B: IntoIterator<Item = I>,
    {
        let boundaries: Vec<B> = boundaries.into_iter().collect();
        let mut matrix = Self::with_num_columns(I::try_from_usize(boundaries.len())?)?;
        for (j, boundary) in boundaries.into_iter().enumerate() {
            matrix.set_column(I::try_from_usize(j)?, boundary)?;
        }
        Ok(matrix)
    }

    /// Resizes to `num_columns` empty columns of dimension `0`.
    /// Any previous content is discarded.
    pub fn set_num_columns(&mut self, num_columns: I) -> Result<(), PhvecError> {
        let n = num_columns.as_usize()?;
        self.columns.clear();
        self.columns.resize_with(n, Vec::new);
        self.dimensions.clear();
        self.dimensions.resize(n, I::zero());
        self.num_columns = num_columns;
        Ok(())
    }

    fn slot(&self, column: I) -> Result<usize, PhvecError> {
        let out_of_range = || PhvecError::ColumnOutOfRange {
            column: column.as_usize().unwrap_or(usize::MAX),
            num_columns: self.columns.len(),
        };
        let idx = column.as_usize().map_err(|_| out_of_range())?;
        if idx < self.columns.len() {
            Ok(idx)
        } else {
            Err(out_of_range())
        }
    }

    /// Assigns the non-zero rows of `column` from an arbitrary sequence, which is sorted and de-duplicated on the way in.
    ///
    /// The dimension of the column is derived from the number of indices supplied: a `k`-simplex has `k+1` facets, and an empty boundary is a vertex.
    pub fn set_column(
        &mut self,
        column: I,
        boundary: impl IntoIterator<Item = I>,
    ) -> Result<(), PhvecError> {
        let idx = self.slot(column)?;
        let rows: Vec<I> = boundary.into_iter().collect();
        let dimension = rows.len().saturating_sub(1);
        self.dimensions[idx] = I::try_from_usize(dimension)?;
        self.columns[idx] = normalise(rows);
        Ok(())
    }

    pub fn column(&self, column: I) -> Result<&[I], PhvecError> {
        let idx = self.slot(column)?;
        Ok(&self.columns[idx])
    }

    /// Overrides the dimension derived by [`set_column`](Self::set_column).
    /// Needed for coboundary columns, whose size says nothing about the dimension.
    pub fn set_dimension(&mut self, column: I, dimension: I) -> Result<(), PhvecError> {
        let idx = self.slot(column)?;
        self.dimensions[idx] = dimension;
        Ok(())
    }

    pub fn set_dualized(&mut self, value: bool) {
        self.dualized = value;
    }

    /// Columns in filtration order, paired with their dimension.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&[I], I)> + ExactSizeIterator + '_ {
        self.columns
            .iter()
            .map(Vec::as_slice)
            .zip(self.dimensions.iter().copied())
    }

    pub(crate) fn take_columns(&mut self) -> Vec<Vec<I>> {
        let n = self.columns.len();
        std::mem::replace(&mut self.columns, vec![Vec::new(); n])
    }

    pub(crate) fn restore_columns(&mut self, columns: Vec<Vec<I>>) {
        debug_assert_eq!(columns.len(), self.columns.len());
        self.columns = columns;
    }

    pub(crate) fn dimensions(&self) -> &[I] {
        &self.dimensions
    }
}

impl<I: Index> ReducibleMatrix for VectorMatrix<I> {
    type Index = I;

    fn num_columns(&self) -> I {
        self.num_columns
    }

    fn maximum_index(&self, column: I) -> Result<Option<I>, PhvecError> {
        Ok(pivot(self.column(column)?))
    }

    fn add_columns(&mut self, source: I, target: I) -> Result<(), PhvecError> {
        let source = self.slot(source)?;
        let target = self.slot(target)?;
        let sum = symmetric_difference(&self.columns[source], &self.columns[target]);
        self.columns[target] = sum;
        Ok(())
    }

    fn clear_column(&mut self, column: I) -> Result<(), PhvecError> {
        let idx = self.slot(column)?;
        self.columns[idx].clear();
        Ok(())
    }

    fn dimension_of(&self, column: I) -> Result<I, PhvecError> {
        let idx = self.slot(column)?;
        Ok(self.dimensions[idx])
    }

    fn dimension(&self) -> I {
        self.dimensions.iter().copied().max().unwrap_or_else(I::zero)
    }

    fn is_dualized(&self) -> bool {
        self.dualized
    }
}

impl<I: Index> Display for VectorMatrix<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (j, (column, dimension)) in self.iter().enumerate() {
            writeln!(f, "{j} (dim {dimension:?}): {column:?}")?;
        }
        Ok(())
    }
}
