//! Reading persistence pairs off a reduced matrix.
//!
//! Extraction happens in two steps.
//! [`read_off_pivots`] only records which row each reduced column has its pivot in, and which columns are unpaired.
//! [`RawPairing::interpret`] then decides what a pivot means, swapping birth and death if the matrix is dualized.

use rustc_hash::FxHashSet;

use crate::{
    index::{indices, Index},
    matrices::ReducibleMatrix,
    reduction::reduce,
    PhvecError,
};

/// A finite bar: the class created by simplex `birth` is destroyed by simplex `death`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PersistencePair<I> {
    pub birth: I,
    pub death: I,
    pub dimension: I,
}

/// An infinite bar, created by `birth` and never destroyed within the filtration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EssentialClass<I> {
    pub birth: I,
    pub dimension: I,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistencePairing<I> {
    /// Finite bars, in the column order of the reduced matrix.
    pub pairs: Vec<PersistencePair<I>>,
    /// Infinite bars, sorted by birth.
    pub essential: Vec<EssentialClass<I>>,
}

impl<I> Default for PersistencePairing<I> {
    fn default() -> Self {
        Self {
            pairs: Vec::new(),
            essential: Vec::new(),
        }
    }
}

impl<I: Index> PersistencePairing<I> {
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs_in_dimension(&self, dimension: I) -> impl Iterator<Item = &PersistencePair<I>> {
        self.pairs
            .iter()
            .filter(move |pair| pair.dimension == dimension)
    }

    /// Maps every index `i` to `num_columns - 1 - i`.
    ///
    /// A pairing read off the [anti-transpose](crate::matrices::anti_transpose) of a boundary matrix is expressed in reversed filtration order; this brings it back.
    /// Pairs end up sorted by death and essential classes by birth.
    pub fn reflect(self, num_columns: I) -> Result<Self, PhvecError> {
        let reflect_index = |i: I| match num_columns.checked_sub(&I::one()) {
            Some(last) if i <= last => Ok(last - i),
            _ => Err(PhvecError::ColumnOutOfRange {
                column: i.as_usize()?,
                num_columns: num_columns.as_usize()?,
            }),
        };

        let mut pairs = self
            .pairs
            .into_iter()
            .map(|pair| {
                Ok(PersistencePair {
                    birth: reflect_index(pair.birth)?,
                    death: reflect_index(pair.death)?,
                    dimension: pair.dimension,
                })
            })
            .collect::<Result<Vec<_>, PhvecError>>()?;
        pairs.sort_unstable_by_key(|pair| (pair.death, pair.birth));

        let mut essential = self
            .essential
            .into_iter()
            .map(|class| {
                Ok(EssentialClass {
                    birth: reflect_index(class.birth)?,
                    dimension: class.dimension,
                })
            })
            .collect::<Result<Vec<_>, PhvecError>>()?;
        essential.sort_unstable();

        Ok(Self { pairs, essential })
    }
}

/// The pivots of a reduced matrix, before they are given a meaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPairing<I> {
    /// `(pivot row, column)` for every non-empty reduced column, in column order.
    pub pivots: Vec<(I, I)>,
    /// Columns that are empty and not the pivot row of any other column.
    pub unpaired: Vec<I>,
}

/// Collects the pivots of an already reduced matrix.
pub fn read_off_pivots<M: ReducibleMatrix>(matrix: &M) -> Result<RawPairing<M::Index>, PhvecError> {
    let mut pivots = Vec::new();
    let mut empty = Vec::new();
    let mut pivot_rows = FxHashSet::default();

    for j in indices(matrix.num_columns()) {
        match matrix.maximum_index(j)? {
            Some(row) => {
                pivots.push((row, j));
                pivot_rows.insert(row);
            }
            None => empty.push(j),
        }
    }

    let unpaired = empty
        .into_iter()
        .filter(|j| !pivot_rows.contains(j))
        .collect();

    Ok(RawPairing { pivots, unpaired })
}

impl<I: Index> RawPairing<I> {
    /// Turns pivots into pairs.
    ///
    /// Normally a pivot in row `i` of column `j` is the pair `(birth = i, death = j)`.
    /// If `matrix` is dualized the roles are swapped.
    /// The dimension of a pair is the dimension of its birth column.
    pub fn interpret<M>(self, matrix: &M) -> Result<PersistencePairing<I>, PhvecError>
    where
        M: ReducibleMatrix<Index = I>,
    {
        let dualized = matrix.is_dualized();

        let pairs = self
            .pivots
            .into_iter()
            .map(|(row, column)| {
                let (birth, death) = if dualized {
                    (column, row)
                } else {
                    (row, column)
                };
                Ok(PersistencePair {
                    birth,
                    death,
                    dimension: matrix.dimension_of(birth)?,
                })
            })
            .collect::<Result<_, PhvecError>>()?;

        let essential = self
            .unpaired
            .into_iter()
            .map(|birth| {
                Ok(EssentialClass {
                    birth,
                    dimension: matrix.dimension_of(birth)?,
                })
            })
            .collect::<Result<_, PhvecError>>()?;

        Ok(PersistencePairing { pairs, essential })
    }
}

/// Reads the pairing off an already reduced matrix.
pub fn read_off_pairing<M: ReducibleMatrix>(
    matrix: &M,
) -> Result<PersistencePairing<M::Index>, PhvecError> {
    read_off_pivots(matrix)?.interpret(matrix)
}

/// Calls [`reduce`] and then [`read_off_pairing`].
pub fn compute_pairing<M: ReducibleMatrix>(
    matrix: &mut M,
) -> Result<PersistencePairing<M::Index>, PhvecError> {
    reduce(matrix)?;
    read_off_pairing(matrix)
}
