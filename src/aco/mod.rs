//! Ant Colony Optimization engine.
//!
//! Ants construct tours one city at a time; the probability of moving from
//! the current city to an unvisited city `j` is proportional to
//! `pheromone[j]^alpha * visibility[j]^beta`. After every ant of an
//! iteration has finished, the pheromone matrix evaporates by `1 - decay`
//! and each traversed edge is reinforced by `q / distance`. Shorter tours
//! lay pheromone on fewer, cheaper edges per unit length, so the colony
//! gradually concentrates on good tours.
//!
//! # Key Types
//!
//! - [`AcoInstance`]: validated bundle of distance, visibility, and initial
//!   pheromone matrices
//! - [`AcoConfig`]: algorithm parameters (colony size, decay, alpha/beta, q)
//! - [`AcoRunner`]: executes the iteration loop
//! - [`AcoResult`]: best tour found plus per-iteration statistics
//!
//! # References
//!
//! - Dorigo, Maniezzo & Colorni (1996), *Ant System: Optimization by a
//!   Colony of Cooperating Agents*
//! - Dorigo & Stützle (2004), *Ant Colony Optimization*

mod config;
mod runner;
mod types;

pub use config::AcoConfig;
pub use runner::{AcoResult, AcoRunner};
pub use types::{AcoError, AcoInstance, Matrix, Tour};
