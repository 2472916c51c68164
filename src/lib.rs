//! Ant Colony Optimization solver for the Traveling Salesman Problem.
//!
//! Given a set of 2-D points, the solver computes an approximate shortest
//! closed tour by letting a colony of simulated ants construct candidate
//! tours guided by a learned pheromone model:
//!
//! - [`instance`]: builds the distance, visibility (reciprocal distance),
//!   and initial pheromone matrices from raw coordinates, and loads the
//!   plain-text point format.
//! - [`aco`]: the optimization engine — probabilistic tour construction,
//!   the evaporate-then-reinforce pheromone update, and the iteration loop
//!   that tracks the best tour found.
//!
//! # Example
//!
//! ```
//! use aco_tsp::aco::{AcoConfig, AcoInstance, AcoRunner};
//! use aco_tsp::instance::Point;
//!
//! let points = vec![
//!     Point::new(0.0, 0.0),
//!     Point::new(0.0, 1.0),
//!     Point::new(1.0, 1.0),
//!     Point::new(1.0, 0.0),
//! ];
//! let instance = AcoInstance::from_points(&points, 0.25).unwrap();
//! let config = AcoConfig::default()
//!     .with_num_ants(4)
//!     .with_num_iterations(50)
//!     .with_seed(42);
//!
//! let result = AcoRunner::run(&instance, &config).unwrap();
//! assert!(result.best_length < f64::INFINITY);
//! ```

pub mod aco;
pub mod instance;
