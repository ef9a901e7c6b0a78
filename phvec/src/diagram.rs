//! Persistence diagrams: pairings expressed in terms of filtration values.

use std::fmt::Display;

use crate::{
    filtration::Filtration,
    index::Index,
    matrices::anti_transpose,
    pairing::{read_off_pairing, PersistencePairing},
    reduction::Algorithm,
    PhvecError,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub birth: f64,
    /// `f64::INFINITY` for classes that never die.
    pub death: f64,
}

impl Point {
    pub fn new(birth: f64, death: f64) -> Self {
        Self { birth, death }
    }

    pub fn unpaired(birth: f64) -> Self {
        Self {
            birth,
            death: f64::INFINITY,
        }
    }

    pub fn is_unpaired(&self) -> bool {
        self.death == f64::INFINITY
    }

    pub fn persistence(&self) -> f64 {
        (self.death - self.birth).abs()
    }
}

/// The points of a single homological dimension.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PersistenceDiagram {
    dimension: usize,
    points: Vec<Point>,
}

impl PersistenceDiagram {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            points: Vec::new(),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn add(&mut self, point: Point) {
        self.points.push(point);
    }

    /// Replaces every point by `f(point)`.
    pub fn map_points(&mut self, f: impl FnMut(Point) -> Point) {
        self.points = self.points.iter().copied().map(f).collect();
    }

    /// Gives every unpaired point the finite `death`.
    pub fn close_unpaired(&mut self, death: f64) {
        self.map_points(|point| {
            if point.is_unpaired() {
                Point::new(point.birth, death)
            } else {
                point
            }
        });
    }

    /// Maps `[min, max]` affinely onto `[0, 1]`. Does nothing if `min == max`.
    pub fn rescale(&mut self, min: f64, max: f64) {
        if min == max {
            return;
        }
        let scale = |x: f64| (x - min) / (max - min);
        self.map_points(|point| Point::new(scale(point.birth), scale(point.death)));
    }

    /// Drops all points with zero persistence.
    pub fn remove_diagonal(&mut self) {
        self.points.retain(|point| point.birth != point.death);
    }

    /// Sum of `persistence^p` over all paired points.
    pub fn total_persistence(&self, p: f64) -> f64 {
        self.points
            .iter()
            .filter(|point| !point.is_unpaired())
            .map(|point| point.persistence().powf(p))
            .sum()
    }

    /// The `p`-norm of the diagram, unpaired points are skipped.
    pub fn p_norm(&self, p: f64) -> f64 {
        self.total_persistence(p).powf(1.0 / p)
    }

    /// Combines the points of two diagrams of the same dimension.
    pub fn merge(&self, other: &PersistenceDiagram) -> Result<PersistenceDiagram, PhvecError> {
        if self.dimension != other.dimension {
            return Err(PhvecError::DimensionMismatch {
                left: self.dimension,
                right: other.dimension,
            });
        }
        let mut merged = self.clone();
        merged.points.extend_from_slice(&other.points);
        Ok(merged)
    }
}

impl Display for PersistenceDiagram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for point in &self.points {
            writeln!(f, "{}\t{}", point.birth, point.death)?;
        }
        Ok(())
    }
}

/// Looks up birth and death values in `filtration`, producing one diagram for every dimension up to the dimension of the filtration.
pub fn diagrams_from_pairing<I: Index>(
    pairing: &PersistencePairing<I>,
    filtration: &Filtration,
) -> Result<Vec<PersistenceDiagram>, PhvecError> {
    let value_at = |index: I| {
        let index = index.as_usize()?;
        filtration
            .get(index)
            .map(|simplex| simplex.value().into_inner())
            .ok_or(PhvecError::ColumnOutOfRange {
                column: index,
                num_columns: filtration.len(),
            })
    };

    let mut diagrams: Vec<PersistenceDiagram> = (0..=filtration.dimension())
        .map(PersistenceDiagram::new)
        .collect();
    for pair in &pairing.pairs {
        let point = Point::new(value_at(pair.birth)?, value_at(pair.death)?);
        diagram_for(&mut diagrams, pair.dimension)?.add(point);
    }
    for class in &pairing.essential {
        let point = Point::unpaired(value_at(class.birth)?);
        diagram_for(&mut diagrams, class.dimension)?.add(point);
    }

    Ok(diagrams)
}

fn diagram_for<I: Index>(
    diagrams: &mut [PersistenceDiagram],
    dimension: I,
) -> Result<&mut PersistenceDiagram, PhvecError> {
    let dimension = dimension.as_usize()?;
    let max_dimension = diagrams.len().saturating_sub(1);
    diagrams
        .get_mut(dimension)
        .ok_or(PhvecError::DimensionMismatch {
            left: dimension,
            right: max_dimension,
        })
}

/// Runs the whole pipeline on a filtration: boundary matrix, reduction, pairing and diagrams.
///
/// With `dualize` set the anti-transposed (coboundary) matrix is reduced instead; the diagrams are the same.
pub fn calculate_persistence_diagrams<I: Index>(
    filtration: &Filtration,
    algorithm: Algorithm,
    dualize: bool,
) -> Result<Vec<PersistenceDiagram>, PhvecError> {
    let boundary = filtration.boundary_matrix::<I>()?;

    let pairing = if dualize {
        let mut coboundary = anti_transpose(&boundary)?;
        algorithm.reduce(&mut coboundary)?;
        let num_columns = I::try_from_usize(filtration.len())?;
        read_off_pairing(&coboundary)?.reflect(num_columns)?
    } else {
        let mut boundary = boundary;
        algorithm.reduce(&mut boundary)?;
        read_off_pairing(&boundary)?
    };

    diagrams_from_pairing(&pairing, filtration)
}
