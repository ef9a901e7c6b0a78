//! Strategies for turning edge weights into filtration values.
//!
//! A [`ValueOrder`] decides which values come first in a filtration, a [`VertexWeights`] strategy how vertices get their values, and a [`Normalization`] rescales the weights before either is applied.

use std::cmp::Ordering;

use ordered_float::NotNan;

use crate::PhvecError;

/// The order in which filtration values enter the filtration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValueOrder {
    /// Order by absolute value, with a negative value before the positive value of the same size.
    pub absolute: bool,
    /// Superlevel instead of sublevel filtration: larger values come first.
    pub reverse: bool,
}

impl ValueOrder {
    pub fn new(absolute: bool, reverse: bool) -> Self {
        Self { absolute, reverse }
    }

    /// `Less` if `a` enters the filtration before `b`.
    pub fn compare(&self, a: NotNan<f64>, b: NotNan<f64>) -> Ordering {
        let ordering = if self.absolute {
            a.into_inner()
                .abs()
                .total_cmp(&b.into_inner().abs())
                .then(a.cmp(&b))
        } else {
            a.cmp(&b)
        };
        if self.reverse {
            ordering.reverse()
        } else {
            ordering
        }
    }

    /// Whichever of the two values enters the filtration first.
    pub fn first(&self, a: NotNan<f64>, b: NotNan<f64>) -> NotNan<f64> {
        match self.compare(a, b) {
            Ordering::Greater => b,
            _ => a,
        }
    }

    /// Whichever of the two values enters the filtration last.
    pub fn last(&self, a: NotNan<f64>, b: NotNan<f64>) -> NotNan<f64> {
        match self.compare(a, b) {
            Ordering::Greater => a,
            _ => b,
        }
    }
}

/// How vertices of a weighted graph get their filtration values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VertexWeights {
    /// Every vertex enters with the first edge of the whole graph.
    #[default]
    Global,
    /// Every vertex enters with the first of its own edges.
    Local,
}

/// Rescaling applied to the edge weights of a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalization {
    /// Divide by the largest absolute weight, giving weights in `[-1, 1]`.
    Abs,
    /// Map the smallest weight to `-1` and the largest to `1`.
    MinMax,
    /// Shift and scale to mean `0` and sample standard deviation `1`.
    Standardize,
}

impl Normalization {
    /// Rescales `weights` in place. An empty slice is left alone.
    ///
    /// Fails with [`PhvecError::DegenerateWeights`] if the weights do not vary enough to be rescaled.
    pub fn apply(self, weights: &mut [NotNan<f64>]) -> Result<(), PhvecError> {
        let Some(&first) = weights.first() else {
            return Ok(());
        };
        let (min, max) = weights
            .iter()
            .fold((first, first), |(min, max), &w| (min.min(w), max.max(w)));
        let (min, max) = (min.into_inner(), max.into_inner());

        let (shift, scale) = match self {
            Normalization::Abs => (0.0, min.abs().max(max.abs())),
            Normalization::MinMax => ((min + max) / 2.0, (max - min) / 2.0),
            Normalization::Standardize => {
                if weights.len() < 2 {
                    return Err(PhvecError::DegenerateWeights);
                }
                let n = weights.len() as f64;
                let mean = weights.iter().map(|w| w.into_inner()).sum::<f64>() / n;
                let variance = weights
                    .iter()
                    .map(|w| (w.into_inner() - mean).powi(2))
                    .sum::<f64>()
                    / (n - 1.0);
                (mean, variance.sqrt())
            }
        };
        if scale == 0.0 {
            return Err(PhvecError::DegenerateWeights);
        }

        for weight in weights.iter_mut() {
            *weight = NotNan::new((weight.into_inner() - shift) / scale)
                .map_err(|_| PhvecError::DegenerateWeights)?;
        }
        Ok(())
    }

    /// Rescales the weights of an edge list `(u, v, weight)` in place.
    pub fn apply_to_edges(
        self,
        edges: &mut [(usize, usize, NotNan<f64>)],
    ) -> Result<(), PhvecError> {
        let mut weights: Vec<NotNan<f64>> = edges.iter().map(|&(_, _, w)| w).collect();
        self.apply(&mut weights)?;
        for (edge, weight) in edges.iter_mut().zip(weights) {
            edge.2 = weight;
        }
        Ok(())
    }
}
