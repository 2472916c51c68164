//! ACO configuration.
//!
//! [`AcoConfig`] holds all parameters that control the colony loop.

use super::types::AcoError;

/// Configuration for the Ant Colony Optimization engine.
///
/// # Defaults
///
/// ```
/// use aco_tsp::aco::AcoConfig;
///
/// let config = AcoConfig::default();
/// assert_eq!(config.num_ants, 20);
/// assert_eq!(config.num_iterations, 1000);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use aco_tsp::aco::AcoConfig;
///
/// let config = AcoConfig::default()
///     .with_num_ants(50)
///     .with_decay(0.3)
///     .with_alpha(1.0)
///     .with_beta(2.0)
///     .with_seed(42);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AcoConfig {
    /// Number of ants per iteration (one tour constructed per ant).
    ///
    /// More ants widen exploration at linear cost. Commonly set to the
    /// number of cities; ant `k` starts its tour at city `k % n`.
    pub num_ants: usize,

    /// Number of iterations (pheromone update cycles).
    pub num_iterations: usize,

    /// Pheromone decay rate in `[0, 1)`.
    ///
    /// Every entry of the pheromone matrix is multiplied by `1 - decay`
    /// once per iteration, before reinforcement. Higher values forget
    /// old trails faster.
    pub decay: f64,

    /// Weight of pheromone in next-city selection (`>= 0`).
    pub alpha: f64,

    /// Weight of visibility (inverse distance) in next-city selection
    /// (`>= 0`). Higher values bias ants toward nearer cities.
    pub beta: f64,

    /// Reinforcement scale (`> 0`): each traversed edge gains
    /// `q / distance` pheromone per tour that uses it.
    pub q: f64,

    /// Random seed for reproducibility. `None` draws a fresh seed.
    pub seed: Option<u64>,

    /// Whether to construct the ants of one iteration in parallel.
    ///
    /// Requires the `parallel` cargo feature; ignored otherwise. Results
    /// are identical to a sequential run with the same seed.
    pub parallel: bool,
}

impl Default for AcoConfig {
    fn default() -> Self {
        Self {
            num_ants: 20,
            num_iterations: 1000,
            decay: 0.5,
            alpha: 1.0,
            beta: 1.0,
            q: 100.0,
            seed: None,
            parallel: false,
        }
    }
}

impl AcoConfig {
    pub fn with_num_ants(mut self, n: usize) -> Self {
        self.num_ants = n;
        self
    }

    pub fn with_num_iterations(mut self, n: usize) -> Self {
        self.num_iterations = n;
        self
    }

    pub fn with_decay(mut self, decay: f64) -> Self {
        self.decay = decay;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    pub fn with_q(mut self, q: f64) -> Self {
        self.q = q;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), AcoError> {
        if self.num_ants < 1 {
            return Err(AcoError::InvalidParameter("num_ants must be >= 1".into()));
        }
        if self.num_iterations < 1 {
            return Err(AcoError::InvalidParameter(
                "num_iterations must be >= 1".into(),
            ));
        }
        if !(0.0..1.0).contains(&self.decay) {
            return Err(AcoError::InvalidParameter(format!(
                "decay must be in [0, 1), got {}",
                self.decay
            )));
        }
        if !self.alpha.is_finite() || self.alpha < 0.0 {
            return Err(AcoError::InvalidParameter(format!(
                "alpha must be >= 0, got {}",
                self.alpha
            )));
        }
        if !self.beta.is_finite() || self.beta < 0.0 {
            return Err(AcoError::InvalidParameter(format!(
                "beta must be >= 0, got {}",
                self.beta
            )));
        }
        if !self.q.is_finite() || self.q <= 0.0 {
            return Err(AcoError::InvalidParameter(format!(
                "q must be > 0, got {}",
                self.q
            )));
        }
        Ok(())
    }
}
