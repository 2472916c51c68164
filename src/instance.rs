//! TSP instance construction: point loading and matrix building.
//!
//! Turns raw 2-D coordinates into the three square matrices the engine
//! consumes. The dataset format is one header line followed by one
//! `x<TAB>y` pair per line.

use crate::aco::Matrix;
use std::fs;
use std::path::Path;

/// A city's position in the plane.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Builds the Euclidean distance matrix: symmetric, zero diagonal.
pub fn distance_matrix(points: &[Point]) -> Matrix {
    let n = points.len();
    let mut matrix = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let d = points[i].distance_to(&points[j]);
            matrix[i][j] = d;
            matrix[j][i] = d;
        }
    }
    matrix
}

/// Builds the visibility matrix: elementwise reciprocal distance.
///
/// The diagonal stays zero, and so does any zero off-diagonal distance
/// (coincident points) — zero never inverts to infinity.
pub fn visibility_matrix(points: &[Point]) -> Matrix {
    let n = points.len();
    let mut matrix = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in 0..n {
            if i != j {
                let d = points[i].distance_to(&points[j]);
                if d > 0.0 {
                    matrix[i][j] = 1.0 / d;
                }
            }
        }
    }
    matrix
}

/// Builds an initial pheromone matrix with `value` on every edge and a
/// zero diagonal.
///
/// A common seed value is the reciprocal of a known or estimated optimal
/// tour length.
pub fn uniform_pheromone(n: usize, value: f64) -> Matrix {
    let mut matrix = vec![vec![value; n]; n];
    for (i, row) in matrix.iter_mut().enumerate() {
        row[i] = 0.0;
    }
    matrix
}

/// Parses the plain-text dataset format: the first line is a header and
/// every following non-empty line holds a tab-separated `x y` pair.
pub fn parse_points(text: &str) -> Result<Vec<Point>, String> {
    let mut points = Vec::new();
    for (line_num, line) in text.lines().enumerate().skip(1) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut fields = line.split_whitespace();
        let (Some(x_str), Some(y_str)) = (fields.next(), fields.next()) else {
            return Err(format!("L{}: malformed point line: '{line}'", line_num + 1));
        };
        let x = x_str
            .parse::<f64>()
            .map_err(|e| format!("L{}: invalid x coord: {e}", line_num + 1))?;
        let y = y_str
            .parse::<f64>()
            .map_err(|e| format!("L{}: invalid y coord: {e}", line_num + 1))?;
        points.push(Point::new(x, y));
    }
    Ok(points)
}

/// Loads points from a dataset file. See [`parse_points`] for the format.
pub fn load_points(path: impl AsRef<Path>) -> Result<Vec<Point>, String> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    parse_points(&text)
}
