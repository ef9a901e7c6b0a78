//! Integer types that can index rows, columns and dimensions of a boundary matrix.
//!
//! The width is chosen once, where the matrix is constructed, e.g. `VectorMatrix::<u16>::default()` for small complexes.

use std::fmt::Debug;
use std::hash::Hash;

use num::{NumCast, PrimInt};

use crate::PhvecError;

pub trait Index: PrimInt + Hash + Debug + Send + Sync {
    fn as_usize(self) -> Result<usize, PhvecError> {
        // Only fails for indices wider than the platform's usize
        <usize as NumCast>::from(self).ok_or(PhvecError::IndexOverflow(usize::MAX))
    }

    fn try_from_usize(value: usize) -> Result<Self, PhvecError> {
        <Self as NumCast>::from(value).ok_or(PhvecError::IndexOverflow(value))
    }
}

/// Iterates over `0..end`, e.g. over all columns of a matrix in filtration order.
pub fn indices<I: Index>(end: I) -> impl Iterator<Item = I> {
    num::range(I::zero(), end)
}

// Default implementors

impl Index for u16 {}
impl Index for u32 {}
impl Index for u64 {}
impl Index for usize {}
