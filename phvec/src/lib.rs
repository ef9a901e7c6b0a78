//! Persistent homology of filtered simplicial complexes, computed by column reduction of a sparse boundary matrix.
//!
//! The usual pipeline is
//! 1. describe the filtration, either directly as a [`VectorMatrix`](matrices::VectorMatrix) of facet indices or via a [`Filtration`](filtration::Filtration);
//! 2. reduce the matrix with one of the algorithms in [`reduction`];
//! 3. read off the [`PersistencePairing`](pairing::PersistencePairing) and, if filtration values are known, turn it into [persistence diagrams](diagram).

use std::fmt::Display;

pub mod columns;
pub mod diagram;
pub mod filtration;
pub mod index;
pub mod matrices;
pub mod pairing;
pub mod reduction;
pub mod weights;

/// Errors returned by the matrix, reduction and filtration operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhvecError {
    /// A column was addressed that the matrix does not have.
    ColumnOutOfRange { column: usize, num_columns: usize },
    /// A value does not fit into the chosen index type.
    IndexOverflow(usize),
    /// A facet of the simplex at `simplex` does not appear earlier in the filtration.
    MissingFace { simplex: usize },
    /// A simplex was given without any vertices.
    EmptySimplex,
    /// Two persistence diagrams, or a pair and a diagram, disagree on their dimension.
    DimensionMismatch { left: usize, right: usize },
    /// Edge weights that are all equal (or all zero) cannot be normalized.
    DegenerateWeights,
}

impl Display for PhvecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PhvecError::ColumnOutOfRange {
                column,
                num_columns,
            } => write!(
                f,
                "column {column} is out of range for a matrix with {num_columns} columns"
            ),
            PhvecError::IndexOverflow(value) => {
                write!(f, "value {value} does not fit into the index type")
            }
            PhvecError::MissingFace { simplex } => write!(
                f,
                "simplex {simplex} has a facet that does not precede it in the filtration"
            ),
            PhvecError::EmptySimplex => f.write_str("simplices must have at least one vertex"),
            PhvecError::DimensionMismatch { left, right } => {
                write!(f, "dimension {left} does not match dimension {right}")
            }
            PhvecError::DegenerateWeights => {
                f.write_str("edge weights do not vary, so they cannot be normalized")
            }
        }
    }
}

impl std::error::Error for PhvecError {}
