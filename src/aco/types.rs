//! Core types: tours, matrices, instances, and errors.

use crate::instance::{self, Point};
use std::fmt;

/// Square matrix of edge values, indexed `[from][to]`.
pub type Matrix = Vec<Vec<f64>>;

/// Errors surfaced by the ACO engine.
///
/// All validation is eager: shape and parameter errors are raised before
/// the first iteration runs, and no partial result is ever returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcoError {
    /// Input matrices are not square, or differ in dimension.
    ShapeMismatch(String),

    /// A parameter lies outside its documented domain.
    InvalidParameter(String),

    /// Next-city selection found every candidate score equal to zero,
    /// so no probability distribution exists to sample from.
    ///
    /// This indicates a caller configuration error (for example a
    /// pheromone matrix initialized to zero with `alpha > 0`); the engine
    /// does not substitute a uniform distribution.
    DegenerateDistribution,
}

impl fmt::Display for AcoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AcoError::ShapeMismatch(msg) => write!(f, "shape mismatch: {msg}"),
            AcoError::InvalidParameter(msg) => write!(f, "invalid parameter: {msg}"),
            AcoError::DegenerateDistribution => {
                write!(f, "degenerate distribution: all candidate scores are zero")
            }
        }
    }
}

impl std::error::Error for AcoError {}

/// A closed tour: an ordered sequence of directed moves `(from, to)`
/// forming a Hamiltonian cycle over the instance's cities.
///
/// A tour over `n` cities has exactly `n` moves; the last move returns
/// to the start city.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tour {
    /// Directed moves in visiting order.
    pub moves: Vec<(usize, usize)>,
}

impl Tour {
    /// Number of moves (equals the number of cities for a complete tour).
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// The start (and end) city, if the tour is non-empty.
    pub fn start(&self) -> Option<usize> {
        self.moves.first().map(|&(from, _)| from)
    }

    /// Total length of the tour under the given distance matrix.
    pub fn length(&self, distance: &Matrix) -> f64 {
        self.moves.iter().map(|&(i, j)| distance[i][j]).sum()
    }

    /// Whether this is a Hamiltonian cycle over `n` cities: `n` chained
    /// moves, each city departed exactly once, closing at the start.
    pub fn is_hamiltonian_cycle(&self, n: usize) -> bool {
        if self.moves.len() != n {
            return false;
        }
        let mut departed = vec![false; n];
        for window in self.moves.windows(2) {
            if window[0].1 != window[1].0 {
                return false;
            }
        }
        for &(from, _) in &self.moves {
            if from >= n || departed[from] {
                return false;
            }
            departed[from] = true;
        }
        self.moves[n - 1].1 == self.moves[0].0
    }
}

/// A validated TSP instance: the two immutable matrices the engine reads
/// and the pheromone matrix it starts from.
///
/// Shape validation happens once, here; the runner may assume all three
/// matrices are square with equal dimension `n >= 2`.
#[derive(Debug, Clone)]
pub struct AcoInstance {
    distance: Matrix,
    visibility: Matrix,
    initial_pheromone: Matrix,
}

impl AcoInstance {
    /// Bundles pre-built matrices, checking shapes.
    ///
    /// # Errors
    ///
    /// [`AcoError::ShapeMismatch`] if any matrix is ragged, the three
    /// dimensions differ, or the dimension is below 2.
    pub fn new(
        distance: Matrix,
        visibility: Matrix,
        initial_pheromone: Matrix,
    ) -> Result<Self, AcoError> {
        let n = distance.len();
        if n < 2 {
            return Err(AcoError::ShapeMismatch(format!(
                "need at least 2 cities, got {n}"
            )));
        }
        for (name, matrix) in [
            ("distance", &distance),
            ("visibility", &visibility),
            ("pheromone", &initial_pheromone),
        ] {
            if matrix.len() != n {
                return Err(AcoError::ShapeMismatch(format!(
                    "{name} matrix has {} rows, expected {n}",
                    matrix.len()
                )));
            }
            for (i, row) in matrix.iter().enumerate() {
                if row.len() != n {
                    return Err(AcoError::ShapeMismatch(format!(
                        "{name} matrix row {i} has {} columns, expected {n}",
                        row.len()
                    )));
                }
            }
        }
        Ok(Self {
            distance,
            visibility,
            initial_pheromone,
        })
    }

    /// Builds an instance directly from point coordinates, seeding every
    /// edge's pheromone with `initial_pheromone` (diagonal stays zero).
    pub fn from_points(points: &[Point], initial_pheromone: f64) -> Result<Self, AcoError> {
        Self::new(
            instance::distance_matrix(points),
            instance::visibility_matrix(points),
            instance::uniform_pheromone(points.len(), initial_pheromone),
        )
    }

    /// Number of cities `n`.
    pub fn num_cities(&self) -> usize {
        self.distance.len()
    }

    pub fn distance(&self) -> &Matrix {
        &self.distance
    }

    pub fn visibility(&self) -> &Matrix {
        &self.visibility
    }

    pub fn initial_pheromone(&self) -> &Matrix {
        &self.initial_pheromone
    }
}
