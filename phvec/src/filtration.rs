//! Filtered simplicial complexes, as far as they are needed to set up a boundary matrix.

use std::collections::BTreeSet;

use itertools::Itertools;
use ordered_float::NotNan;
use rustc_hash::FxHashMap;

use crate::{
    index::Index,
    matrices::VectorMatrix,
    weights::{ValueOrder, VertexWeights},
    PhvecError,
};

/// A simplex with the value at which it enters the filtration.
/// Vertices are kept sorted and free of duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Simplex {
    vertices: Vec<usize>,
    value: NotNan<f64>,
}

impl Simplex {
    pub fn new(
        vertices: impl IntoIterator<Item = usize>,
        value: NotNan<f64>,
    ) -> Result<Self, PhvecError> {
        let vertices: Vec<usize> = vertices.into_iter().sorted_unstable().dedup().collect();
        if vertices.is_empty() {
            return Err(PhvecError::EmptySimplex);
        }
        Ok(Self { vertices, value })
    }

    pub fn vertices(&self) -> &[usize] {
        &self.vertices
    }

    pub fn value(&self) -> NotNan<f64> {
        self.value
    }

    pub fn dimension(&self) -> usize {
        self.vertices.len() - 1
    }

    /// The codimension-1 faces, as sorted vertex lists. A vertex has none.
    pub fn faces(&self) -> impl Iterator<Item = Vec<usize>> + '_ {
        let k = self.dimension();
        // combinations(0) would yield the empty face once
        (k > 0)
            .then(|| self.vertices.iter().copied().combinations(k))
            .into_iter()
            .flatten()
    }
}

/// How [`Filtration::from_weighted_edges`] builds a filtration from a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CliqueOptions {
    /// Largest dimension of a simplex in the filtration.
    pub max_dimension: usize,
    pub order: ValueOrder,
    pub vertex_weights: VertexWeights,
}

impl Default for CliqueOptions {
    fn default() -> Self {
        Self {
            max_dimension: 1,
            order: ValueOrder::default(),
            vertex_weights: VertexWeights::default(),
        }
    }
}

impl CliqueOptions {
    pub fn with_max_dimension(max_dimension: usize) -> Self {
        Self {
            max_dimension,
            ..Default::default()
        }
    }
}

/// An ordered sequence of simplices.
/// Index `j` in the filtration becomes column `j` of the boundary matrix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filtration {
    simplices: Vec<Simplex>,
}

impl From<Vec<Simplex>> for Filtration {
    fn from(simplices: Vec<Simplex>) -> Self {
        Self { simplices }
    }
}

impl Filtration {
    pub fn push(&mut self, simplex: Simplex) {
        self.simplices.push(simplex);
    }

    pub fn len(&self) -> usize {
        self.simplices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.simplices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Simplex> {
        self.simplices.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Simplex> {
        self.simplices.get(index)
    }

    /// Largest simplex dimension, `0` when empty.
    pub fn dimension(&self) -> usize {
        self.simplices
            .iter()
            .map(Simplex::dimension)
            .max()
            .unwrap_or(0)
    }

    /// Sorts by value in the given order, then dimension, then vertices, so that every face precedes its cofaces
    /// as long as faces never enter later than their cofaces.
    pub fn sort(&mut self, order: ValueOrder) {
        self.simplices.sort_by(|a, b| {
            order
                .compare(a.value, b.value)
                .then_with(|| (a.dimension(), &a.vertices).cmp(&(b.dimension(), &b.vertices)))
        });
    }

    /// Smallest and largest value of any simplex, `None` when empty.
    pub fn value_range(&self) -> Option<(NotNan<f64>, NotNan<f64>)> {
        self.simplices.iter().map(Simplex::value).minmax().into_option()
    }

    /// Smallest absolute value of any edge, `None` if there are no edges.
    pub fn minimum_absolute_edge_value(&self) -> Option<f64> {
        self.simplices
            .iter()
            .filter(|simplex| simplex.dimension() == 1)
            .map(|simplex| simplex.value().into_inner().abs())
            .min_by(f64::total_cmp)
    }

    /// Column `j` holds the filtration indices of the faces of simplex `j`.
    ///
    /// Fails with [`PhvecError::MissingFace`] if a face is absent or comes after its coface.
    pub fn boundary_matrix<I: Index>(&self) -> Result<VectorMatrix<I>, PhvecError> {
        let mut lookup: FxHashMap<&[usize], I> = FxHashMap::default();
        let mut boundaries: Vec<Vec<I>> = Vec::with_capacity(self.simplices.len());

        for (j, simplex) in self.simplices.iter().enumerate() {
            let boundary = simplex
                .faces()
                .map(|face| {
                    lookup
                        .get(face.as_slice())
                        .copied()
                        .ok_or(PhvecError::MissingFace { simplex: j })
                })
                .collect::<Result<Vec<I>, _>>()?;
            boundaries.push(boundary);
            lookup.insert(simplex.vertices(), I::try_from_usize(j)?);
        }

        VectorMatrix::from_boundaries(boundaries)
    }

    /// Clique filtration of a weighted graph, up to simplices of `options.max_dimension`.
    ///
    /// Vertices enter according to `options.vertex_weights`, every higher simplex with the last of its edges in `options.order`.
    /// Self-loops are ignored; of parallel edges the first one in `options.order` is kept.
    /// The result is sorted by `options.order`.
    pub fn from_weighted_edges(
        edges: impl IntoIterator<Item = (usize, usize, NotNan<f64>)>,
        options: &CliqueOptions,
    ) -> Result<Self, PhvecError> {
        let order = options.order;
        let mut weights: FxHashMap<(usize, usize), NotNan<f64>> = FxHashMap::default();
        for (u, v, w) in edges {
            if u == v {
                continue;
            }
            let key = (u.min(v), u.max(v));
            weights
                .entry(key)
                .and_modify(|existing| *existing = order.first(*existing, w))
                .or_insert(w);
        }

        let mut filtration = Filtration::default();
        let Some(first_weight) = weights.values().copied().reduce(|a, b| order.first(a, b)) else {
            return Ok(filtration);
        };

        let mut neighbours: FxHashMap<usize, BTreeSet<usize>> = FxHashMap::default();
        let mut vertex_values: FxHashMap<usize, NotNan<f64>> = FxHashMap::default();
        for (&(u, v), &w) in &weights {
            neighbours.entry(u).or_default().insert(v);
            neighbours.entry(v).or_default().insert(u);

            let value = match options.vertex_weights {
                VertexWeights::Global => first_weight,
                VertexWeights::Local => w,
            };
            for vertex in [u, v] {
                vertex_values
                    .entry(vertex)
                    .and_modify(|existing| *existing = order.first(*existing, value))
                    .or_insert(value);
            }
        }

        for (&vertex, &value) in vertex_values.iter().sorted_by_key(|&(&vertex, _)| vertex) {
            filtration.push(Simplex::new([vertex], value)?);
        }

        // Cliques of the current size, grown one vertex at a time by larger common neighbours
        let mut cliques: Vec<(Vec<usize>, NotNan<f64>)> = weights
            .iter()
            .map(|(&(u, v), &w)| (vec![u, v], w))
            .collect();
        for dimension in 1..=options.max_dimension {
            let mut larger = Vec::new();
            for (clique, value) in cliques {
                if dimension < options.max_dimension {
                    let last = clique[clique.len() - 1];
                    for &w in neighbours[&last].range(last + 1..) {
                        let mut extended = value;
                        let mut is_clique = true;
                        for &u in &clique {
                            match weights.get(&(u, w)) {
                                Some(&weight) => extended = order.last(extended, weight),
                                None => {
                                    is_clique = false;
                                    break;
                                }
                            }
                        }
                        if is_clique {
                            let mut vertices = clique.clone();
                            vertices.push(w);
                            larger.push((vertices, extended));
                        }
                    }
                }
                filtration.push(Simplex::new(clique, value)?);
            }
            cliques = larger;
        }

        filtration.sort(order);
        Ok(filtration)
    }
}

#[cfg(test)]
mod tests {
    use ordered_float::NotNan;

    use crate::matrices::ReducibleMatrix;
    use crate::weights::{ValueOrder, VertexWeights};
    use crate::PhvecError;

    use super::{CliqueOptions, Filtration, Simplex};

    fn value(v: f64) -> NotNan<f64> {
        NotNan::new(v).unwrap()
    }

    #[test]
    fn test_simplex_faces() {
        let triangle = Simplex::new([2, 0, 1], value(1.0)).unwrap();
        assert_eq!(triangle.vertices(), &[0, 1, 2]);
        assert_eq!(triangle.dimension(), 2);
        let faces: Vec<_> = triangle.faces().collect();
        assert_eq!(faces, vec![vec![0, 1], vec![0, 2], vec![1, 2]]);

        let vertex = Simplex::new([3], value(0.0)).unwrap();
        assert_eq!(vertex.faces().count(), 0);

        assert_eq!(
            Simplex::new([], value(0.0)),
            Err(PhvecError::EmptySimplex)
        );
    }

    #[test]
    fn test_boundary_matrix_of_triangle() {
        let mut filtration = Filtration::default();
        for vertex in 0..3 {
            filtration.push(Simplex::new([vertex], value(0.0)).unwrap());
        }
        filtration.push(Simplex::new([0, 1], value(1.0)).unwrap());
        filtration.push(Simplex::new([1, 2], value(1.0)).unwrap());
        filtration.push(Simplex::new([0, 2], value(2.0)).unwrap());
        filtration.push(Simplex::new([0, 1, 2], value(3.0)).unwrap());

        let matrix = filtration.boundary_matrix::<u32>().unwrap();
        assert_eq!(matrix.num_columns(), 7);
        assert_eq!(matrix.column(5).unwrap(), &[0, 2]);
        assert_eq!(matrix.column(6).unwrap(), &[3, 4, 5]);
        assert_eq!(matrix.dimension(), 2);
    }

    #[test]
    fn test_boundary_matrix_rejects_missing_face() {
        let filtration = Filtration::from(vec![
            Simplex::new([0], value(0.0)).unwrap(),
            Simplex::new([0, 1], value(1.0)).unwrap(),
            Simplex::new([1], value(2.0)).unwrap(),
        ]);
        assert_eq!(
            filtration.boundary_matrix::<u32>(),
            Err(PhvecError::MissingFace { simplex: 1 })
        );
    }

    #[test]
    fn test_sort_puts_faces_first() {
        let mut filtration = Filtration::from(vec![
            Simplex::new([0, 1], value(1.0)).unwrap(),
            Simplex::new([1], value(1.0)).unwrap(),
            Simplex::new([0], value(0.0)).unwrap(),
        ]);
        filtration.sort(ValueOrder::default());
        let dimensions: Vec<_> = filtration.iter().map(Simplex::dimension).collect();
        assert_eq!(dimensions, vec![0, 0, 1]);
        assert!(filtration.boundary_matrix::<u16>().is_ok());
    }

    #[test]
    fn test_clique_filtration_of_square_with_diagonal() {
        let edges = vec![
            (0, 1, value(1.0)),
            (1, 2, value(1.0)),
            (2, 3, value(1.0)),
            (3, 0, value(1.0)),
            (0, 2, value(2.0)),
            (2, 0, value(5.0)),
            (1, 1, value(0.0)),
        ];
        let filtration = Filtration::from_weighted_edges(edges, &CliqueOptions::with_max_dimension(2)).unwrap();

        // 4 vertices, 5 edges, 2 triangles
        assert_eq!(filtration.len(), 11);
        assert_eq!(filtration.dimension(), 2);
        assert!(filtration
            .iter()
            .filter(|simplex| simplex.dimension() == 0)
            .all(|simplex| simplex.value() == value(1.0)));
        let triangles: Vec<_> = filtration
            .iter()
            .filter(|simplex| simplex.dimension() == 2)
            .map(|simplex| (simplex.vertices().to_vec(), simplex.value()))
            .collect();
        assert_eq!(
            triangles,
            vec![(vec![0, 1, 2], value(2.0)), (vec![0, 2, 3], value(2.0))]
        );
        assert!(filtration.boundary_matrix::<u32>().is_ok());
    }

    #[test]
    fn test_clique_filtration_respects_max_dimension() {
        let edges = vec![(0, 1, value(1.0)), (1, 2, value(1.0)), (0, 2, value(1.0))];
        let filtration = Filtration::from_weighted_edges(edges, &CliqueOptions::default()).unwrap();
        assert_eq!(filtration.len(), 6);
        assert_eq!(filtration.dimension(), 1);

        let empty = Filtration::from_weighted_edges(Vec::new(), &CliqueOptions::with_max_dimension(2)).unwrap();
        assert!(empty.is_empty());
    }

    fn values(filtration: &Filtration) -> Vec<f64> {
        filtration
            .iter()
            .map(|simplex| simplex.value().into_inner())
            .collect()
    }

    #[test]
    fn test_superlevel_clique_filtration() {
        let edges = vec![(0, 1, value(1.0)), (1, 2, value(2.0)), (0, 2, value(3.0))];
        let options = CliqueOptions {
            max_dimension: 2,
            order: ValueOrder::new(false, true),
            ..Default::default()
        };
        let filtration = Filtration::from_weighted_edges(edges, &options).unwrap();

        // Vertices enter with the largest weight, the triangle with the smallest
        assert_eq!(values(&filtration), vec![3.0, 3.0, 3.0, 3.0, 2.0, 1.0, 1.0]);
        assert_eq!(filtration.get(6).unwrap().dimension(), 2);
        assert!(filtration.boundary_matrix::<u32>().is_ok());
    }

    #[test]
    fn test_absolute_clique_filtration() {
        let edges = vec![(0, 1, value(-2.0)), (1, 2, value(1.0)), (0, 2, value(0.5))];
        let options = CliqueOptions {
            max_dimension: 2,
            order: ValueOrder::new(true, false),
            ..Default::default()
        };
        let filtration = Filtration::from_weighted_edges(edges, &options).unwrap();

        assert_eq!(values(&filtration), vec![0.5, 0.5, 0.5, 0.5, 1.0, -2.0, -2.0]);
        assert_eq!(filtration.get(5).unwrap().vertices(), &[0, 1]);
        assert!(filtration.boundary_matrix::<u32>().is_ok());
        assert_eq!(filtration.minimum_absolute_edge_value(), Some(0.5));
    }

    #[test]
    fn test_local_vertex_weights() {
        let edges = vec![(0, 1, value(1.0)), (1, 2, value(2.0)), (2, 3, value(5.0))];
        let options = CliqueOptions {
            vertex_weights: VertexWeights::Local,
            ..Default::default()
        };
        let filtration = Filtration::from_weighted_edges(edges, &options).unwrap();

        let vertices: Vec<_> = filtration
            .iter()
            .filter(|simplex| simplex.dimension() == 0)
            .map(|simplex| (simplex.vertices()[0], simplex.value().into_inner()))
            .collect();
        assert_eq!(vertices, vec![(0, 1.0), (1, 1.0), (2, 2.0), (3, 5.0)]);
        assert!(filtration.boundary_matrix::<u32>().is_ok());
    }

    #[test]
    fn test_value_range() {
        let edges = vec![(0, 1, value(-1.0)), (1, 2, value(4.0))];
        let filtration = Filtration::from_weighted_edges(edges, &CliqueOptions::default()).unwrap();
        assert_eq!(filtration.value_range(), Some((value(-1.0), value(4.0))));
        assert_eq!(filtration.minimum_absolute_edge_value(), Some(1.0));
        assert_eq!(Filtration::default().value_range(), None);
    }
}
