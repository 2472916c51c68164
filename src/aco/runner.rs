//! ACO iteration loop execution.
//!
//! [`AcoRunner`] orchestrates the colony: tour construction per ant →
//! pheromone update → best-so-far tracking, repeated for a fixed number
//! of iterations.

use super::config::AcoConfig;
use super::types::{AcoError, AcoInstance, Matrix, Tour};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Result of an ACO run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AcoResult {
    /// The shortest tour found across all iterations.
    pub best_tour: Tour,

    /// Length of the best tour.
    pub best_length: f64,

    /// Number of iterations executed.
    pub iterations: usize,

    /// Best-so-far length at the end of each iteration. Non-increasing.
    pub length_history: Vec<f64>,
}

/// Executes the ACO optimization loop.
///
/// The pheromone matrix is owned by the run: it starts as a copy of the
/// instance's initial matrix and is mutated exactly once per iteration,
/// after every ant of that iteration has built its tour against the
/// frozen snapshot. The instance itself is never mutated, so repeated
/// runs on one instance are independent.
///
/// # Usage
///
/// ```ignore
/// let instance = AcoInstance::from_points(&points, 0.2)?;
/// let config = AcoConfig::default().with_seed(42);
/// let result = AcoRunner::run(&instance, &config)?;
/// println!("best length: {}", result.best_length);
/// ```
pub struct AcoRunner;

impl AcoRunner {
    /// Runs the optimization.
    ///
    /// # Errors
    ///
    /// [`AcoError::InvalidParameter`] before the first iteration if the
    /// configuration is out of domain; [`AcoError::DegenerateDistribution`]
    /// if next-city selection ever sees an all-zero score vector.
    pub fn run(instance: &AcoInstance, config: &AcoConfig) -> Result<AcoResult, AcoError> {
        Self::run_with_observer(instance, config, |_, _, _| {})
    }

    /// Runs the optimization, reporting each iteration's best pair.
    ///
    /// The observer receives `(iteration_index, best_tour_of_iteration,
    /// its_length)` once per iteration, after the pheromone update. This
    /// is the iteration's own minimum, which may be worse than the
    /// best-so-far recorded in the result.
    pub fn run_with_observer<F>(
        instance: &AcoInstance,
        config: &AcoConfig,
        mut observer: F,
    ) -> Result<AcoResult, AcoError>
    where
        F: FnMut(usize, &Tour, f64),
    {
        config.validate()?;

        let seed = config.seed.unwrap_or_else(rand::random);
        let mut pheromone = instance.initial_pheromone().clone();

        let mut best_tour = Tour::default();
        let mut best_length = f64::INFINITY;
        let mut length_history = Vec::with_capacity(config.num_iterations);

        for iteration in 0..config.num_iterations {
            let tours = construct_tours(instance, config, &pheromone, seed, iteration)?;

            update_pheromone(
                &mut pheromone,
                &tours,
                instance.distance(),
                config.decay,
                config.q,
            );

            let (iter_tour, iter_length) = tours
                .iter()
                .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
                .map(|(tour, length)| (tour, *length))
                .expect("num_ants >= 1 guarantees at least one tour");

            observer(iteration, iter_tour, iter_length);

            if iter_length < best_length {
                best_length = iter_length;
                best_tour = iter_tour.clone();
            }
            length_history.push(best_length);
        }

        Ok(AcoResult {
            best_tour,
            best_length,
            iterations: config.num_iterations,
            length_history,
        })
    }
}

/// Builds one tour per ant against the iteration-frozen pheromone matrix.
///
/// Ant `k` starts at city `k % n`, so with `num_ants == n` every city
/// hosts exactly one ant, matching the reference assignment.
fn construct_tours(
    instance: &AcoInstance,
    config: &AcoConfig,
    pheromone: &Matrix,
    seed: u64,
    iteration: usize,
) -> Result<Vec<(Tour, f64)>, AcoError> {
    let n = instance.num_cities();

    #[cfg(feature = "parallel")]
    if config.parallel {
        return (0..config.num_ants)
            .into_par_iter()
            .map(|ant| {
                let mut rng = ant_rng(seed, iteration, ant, config.num_ants);
                construct_tour(instance, config, pheromone, ant % n, &mut rng)
            })
            .collect();
    }

    (0..config.num_ants)
        .map(|ant| {
            let mut rng = ant_rng(seed, iteration, ant, config.num_ants);
            construct_tour(instance, config, pheromone, ant % n, &mut rng)
        })
        .collect()
}

/// Derives an ant's private RNG from the run seed.
///
/// Giving each `(iteration, ant)` pair its own stream keeps sequential
/// and parallel construction bit-identical for the same seed.
fn ant_rng(seed: u64, iteration: usize, ant: usize, num_ants: usize) -> StdRng {
    let stream = (iteration as u64) * (num_ants as u64) + ant as u64;
    StdRng::seed_from_u64(seed.wrapping_add(stream.wrapping_mul(0x9E37_79B9_7F4A_7C15)))
}

/// Constructs one Hamiltonian cycle from `start`.
fn construct_tour<R: Rng>(
    instance: &AcoInstance,
    config: &AcoConfig,
    pheromone: &Matrix,
    start: usize,
    rng: &mut R,
) -> Result<(Tour, f64), AcoError> {
    let n = instance.num_cities();
    let distance = instance.distance();
    let visibility = instance.visibility();

    let mut visited = vec![false; n];
    visited[start] = true;
    let mut moves = Vec::with_capacity(n);
    let mut length = 0.0;
    let mut current = start;

    for _ in 1..n {
        let next = select_next(
            &pheromone[current],
            &visibility[current],
            &visited,
            config.alpha,
            config.beta,
            rng,
        )?;
        moves.push((current, next));
        length += distance[current][next];
        visited[next] = true;
        current = next;
    }

    // close the cycle back to the start city
    moves.push((current, start));
    length += distance[current][start];

    Ok((Tour { moves }, length))
}

/// Samples the next city from the unvisited candidates.
///
/// Candidate `j` scores `pheromone[j]^alpha * visibility[j]^beta`;
/// visited cities (the start city included) are excluded outright. One
/// uniform draw over the score total is inverted against the cumulative
/// weights.
fn select_next<R: Rng>(
    pheromone_row: &[f64],
    visibility_row: &[f64],
    visited: &[bool],
    alpha: f64,
    beta: f64,
    rng: &mut R,
) -> Result<usize, AcoError> {
    let n = visited.len();
    let mut scores = vec![0.0; n];
    let mut total = 0.0;

    for j in 0..n {
        if visited[j] {
            continue;
        }
        let score = pow_or_zero(pheromone_row[j], alpha) * pow_or_zero(visibility_row[j], beta);
        if score.is_finite() && score > 0.0 {
            scores[j] = score;
            total += score;
        }
    }

    if total <= 0.0 {
        return Err(AcoError::DegenerateDistribution);
    }

    let mut threshold = rng.random_range(0.0..total);
    let mut last_candidate = 0;
    for (j, &score) in scores.iter().enumerate() {
        if score <= 0.0 {
            continue;
        }
        if threshold < score {
            return Ok(j);
        }
        threshold -= score;
        last_candidate = j;
    }
    // rounding in the cumulative subtraction can exhaust the threshold a
    // hair past the final candidate
    Ok(last_candidate)
}

/// `base^exp` with the fixed convention that a zero base yields zero for
/// any exponent, `0^0` included. This keeps zero-pheromone and
/// zero-visibility edges unselectable even when `alpha` or `beta` is 0.
fn pow_or_zero(base: f64, exp: f64) -> f64 {
    if base == 0.0 {
        0.0
    } else {
        base.powf(exp)
    }
}

/// Evaporate-then-reinforce pheromone update.
///
/// Every entry decays by `1 - decay`, then each move `(i, j)` of each
/// tour adds `q / distance[i][j]`. The reference processes tours in
/// ascending length order, but the reinforcement is a commutative sum,
/// so the tours are accumulated unordered here. Zero-distance moves
/// (coincident points) deposit nothing rather than dividing by zero.
fn update_pheromone(
    pheromone: &mut Matrix,
    tours: &[(Tour, f64)],
    distance: &Matrix,
    decay: f64,
    q: f64,
) {
    for row in pheromone.iter_mut() {
        for value in row.iter_mut() {
            *value *= 1.0 - decay;
        }
    }

    for (tour, _) in tours {
        for &(i, j) in &tour.moves {
            let d = distance[i][j];
            if d > 0.0 {
                pheromone[i][j] += q / d;
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::Point;
    use proptest::prelude::*;

    /// Unit square: optimal tour is the perimeter, length 4.
    fn unit_square() -> AcoInstance {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(1.0, 1.0),
            Point::new(1.0, 0.0),
        ];
        AcoInstance::from_points(&points, 0.25).unwrap()
    }

    fn square_config() -> AcoConfig {
        AcoConfig::default()
            .with_num_ants(4)
            .with_num_iterations(50)
            .with_decay(0.5)
            .with_alpha(1.0)
            .with_beta(1.0)
            .with_q(10.0)
    }

    #[test]
    fn test_unit_square_converges_to_perimeter() {
        let instance = unit_square();
        let runs = 20u64;
        let mut hits = 0;
        for seed in 0..runs {
            let config = square_config().with_seed(seed);
            let result = AcoRunner::run(&instance, &config).unwrap();
            assert!(
                result.best_length >= 4.0 - 1e-9,
                "4.0 is optimal, got {}",
                result.best_length
            );
            if (result.best_length - 4.0).abs() < 1e-6 {
                hits += 1;
            }
        }
        // expected to find the optimum in at least 95% of seeds
        assert!(hits >= 19, "only {hits}/{runs} runs found the optimum");
    }

    #[test]
    fn test_best_tour_is_hamiltonian_cycle() {
        let instance = unit_square();
        let result = AcoRunner::run(&instance, &square_config().with_seed(1)).unwrap();
        assert!(result.best_tour.is_hamiltonian_cycle(4));
        assert_eq!(result.best_tour.len(), 4);
    }

    #[test]
    fn test_fixed_seed_is_deterministic() {
        let instance = unit_square();
        let config = square_config().with_seed(7);
        let a = AcoRunner::run(&instance, &config).unwrap();
        let b = AcoRunner::run(&instance, &config).unwrap();
        assert_eq!(a.best_tour, b.best_tour);
        assert_eq!(a.best_length, b.best_length);
        assert_eq!(a.length_history, b.length_history);
    }

    #[test]
    fn test_best_length_history_non_increasing() {
        let instance = unit_square();
        let result = AcoRunner::run(&instance, &square_config().with_seed(3)).unwrap();
        assert_eq!(result.length_history.len(), 50);
        for window in result.length_history.windows(2) {
            assert!(
                window[1] <= window[0],
                "best-so-far must never increase: {} > {}",
                window[1],
                window[0]
            );
        }
        assert_eq!(*result.length_history.last().unwrap(), result.best_length);
    }

    #[test]
    fn test_observer_sees_every_iteration() {
        let instance = unit_square();
        let config = square_config().with_seed(11).with_num_iterations(30);
        let mut seen = Vec::new();
        let result = AcoRunner::run_with_observer(&instance, &config, |iter, tour, length| {
            assert!(tour.is_hamiltonian_cycle(4));
            seen.push((iter, length));
        })
        .unwrap();

        let indices: Vec<usize> = seen.iter().map(|&(i, _)| i).collect();
        assert_eq!(indices, (0..30).collect::<Vec<_>>());
        // every reported iteration best bounds the overall best from above
        for &(_, length) in &seen {
            assert!(length >= result.best_length);
        }
        assert!(seen.iter().any(|&(_, l)| l == result.best_length));
    }

    #[test]
    fn test_invalid_config_rejected_before_running() {
        let instance = unit_square();
        let config = square_config().with_decay(1.0);
        let mut called = false;
        let err = AcoRunner::run_with_observer(&instance, &config, |_, _, _| called = true)
            .unwrap_err();
        assert!(matches!(err, AcoError::InvalidParameter(_)));
        assert!(!called, "no iteration may run on invalid parameters");
    }

    #[test]
    fn test_start_city_wraps_modulo_n() {
        let instance = unit_square();
        let config = square_config().with_num_ants(6);
        let pheromone = instance.initial_pheromone().clone();
        let tours = construct_tours(&instance, &config, &pheromone, 42, 0).unwrap();
        let starts: Vec<usize> = tours
            .iter()
            .map(|(tour, _)| tour.start().unwrap())
            .collect();
        assert_eq!(starts, vec![0, 1, 2, 3, 0, 1]);
    }

    #[test]
    fn test_zero_pheromone_is_degenerate() {
        let n = 3;
        let distance = vec![
            vec![0.0, 1.0, 2.0],
            vec![1.0, 0.0, 1.0],
            vec![2.0, 1.0, 0.0],
        ];
        let visibility = vec![
            vec![0.0, 1.0, 0.5],
            vec![1.0, 0.0, 1.0],
            vec![0.5, 1.0, 0.0],
        ];
        let instance =
            AcoInstance::new(distance, visibility, vec![vec![0.0; n]; n]).unwrap();
        let config = AcoConfig::default().with_num_ants(3).with_seed(0);
        let err = AcoRunner::run(&instance, &config).unwrap_err();
        assert_eq!(err, AcoError::DegenerateDistribution);
    }

    #[test]
    fn test_all_zero_scores_with_zero_exponents_are_degenerate() {
        // alpha = 0 and beta = 0, but both bases are 0 for every
        // remaining candidate: 0^0 counts as 0, not 1
        let mut rng = StdRng::seed_from_u64(0);
        let err = select_next(
            &[0.0, 0.0, 0.0],
            &[0.0, 0.0, 0.0],
            &[true, false, false],
            0.0,
            0.0,
            &mut rng,
        )
        .unwrap_err();
        assert_eq!(err, AcoError::DegenerateDistribution);
    }

    #[test]
    fn test_select_next_never_picks_visited() {
        let pheromone = [1.0, 1.0, 1.0, 1.0];
        let visibility = [1.0, 1.0, 1.0, 1.0];
        let visited = [true, false, true, false];
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..200 {
            let next =
                select_next(&pheromone, &visibility, &visited, 1.0, 1.0, &mut rng).unwrap();
            assert!(next == 1 || next == 3);
        }
    }

    #[test]
    fn test_pow_or_zero_convention() {
        assert_eq!(pow_or_zero(0.0, 0.0), 0.0);
        assert_eq!(pow_or_zero(0.0, 2.0), 0.0);
        assert_eq!(pow_or_zero(3.0, 0.0), 1.0);
        assert!((pow_or_zero(2.0, 3.0) - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_evaporation_only_update() {
        let distance = vec![vec![0.0, 1.0], vec![1.0, 0.0]];
        let before = vec![vec![0.8, 0.4], vec![0.2, 0.6]];
        let mut pheromone = before.clone();
        update_pheromone(&mut pheromone, &[], &distance, 0.25, 10.0);
        for i in 0..2 {
            for j in 0..2 {
                assert_eq!(pheromone[i][j], 0.75 * before[i][j]);
            }
        }
    }

    #[test]
    fn test_reinforcement_adds_q_over_distance() {
        let distance = vec![
            vec![0.0, 2.0, 4.0],
            vec![2.0, 0.0, 5.0],
            vec![4.0, 5.0, 0.0],
        ];
        let mut pheromone = vec![vec![1.0; 3]; 3];
        let tour = Tour {
            moves: vec![(0, 1), (1, 2), (2, 0)],
        };
        let length = tour.length(&distance);
        update_pheromone(&mut pheromone, &[(tour, length)], &distance, 0.0, 10.0);

        // decay 0 leaves old pheromone intact; traversed edges gain q/d
        assert!((pheromone[0][1] - (1.0 + 10.0 / 2.0)).abs() < 1e-12);
        assert!((pheromone[1][2] - (1.0 + 10.0 / 5.0)).abs() < 1e-12);
        assert!((pheromone[2][0] - (1.0 + 10.0 / 4.0)).abs() < 1e-12);
        // untraversed direction untouched
        assert!((pheromone[1][0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_distance_moves_deposit_nothing() {
        let distance = vec![vec![0.0, 0.0], vec![0.0, 0.0]];
        let mut pheromone = vec![vec![1.0; 2]; 2];
        let tour = Tour {
            moves: vec![(0, 1), (1, 0)],
        };
        update_pheromone(&mut pheromone, &[(tour, 0.0)], &distance, 0.0, 10.0);
        assert_eq!(pheromone, vec![vec![1.0; 2]; 2]);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let instance = unit_square();
        let sequential = square_config().with_seed(9);
        let parallel = square_config().with_seed(9).with_parallel(true);
        let a = AcoRunner::run(&instance, &sequential).unwrap();
        let b = AcoRunner::run(&instance, &parallel).unwrap();
        assert_eq!(a.best_tour, b.best_tour);
        assert_eq!(a.length_history, b.length_history);
    }

    fn random_points(n: usize, seed: u64) -> Vec<Point> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n)
            .map(|_| Point::new(rng.random_range(0.0..100.0), rng.random_range(0.0..100.0)))
            .collect()
    }

    proptest! {
        #[test]
        fn prop_every_tour_is_a_hamiltonian_cycle(
            n in 3usize..10,
            point_seed in any::<u64>(),
            run_seed in any::<u64>(),
        ) {
            let points = random_points(n, point_seed);
            let instance = AcoInstance::from_points(&points, 0.1).unwrap();
            let config = AcoConfig::default()
                .with_num_ants(n)
                .with_num_iterations(3)
                .with_seed(run_seed);
            let mut observed = Vec::new();
            AcoRunner::run_with_observer(&instance, &config, |_, tour, length| {
                observed.push((tour.clone(), length));
            }).unwrap();

            for (tour, length) in observed {
                prop_assert!(tour.is_hamiltonian_cycle(n));
                prop_assert!((length - tour.length(instance.distance())).abs() < 1e-9);
            }
        }

        #[test]
        fn prop_pheromone_stays_non_negative(
            decay in 0.0..1.0f64,
            q in 0.001..1000.0f64,
            seed in any::<u64>(),
        ) {
            let points = random_points(8, seed);
            let instance = AcoInstance::from_points(&points, 0.2).unwrap();
            let config = AcoConfig::default()
                .with_num_ants(8)
                .with_num_iterations(5)
                .with_decay(decay)
                .with_q(q)
                .with_seed(seed);

            // replay the run's update sequence directly
            let mut pheromone = instance.initial_pheromone().clone();
            let run_seed = seed;
            for iteration in 0..config.num_iterations {
                let tours =
                    construct_tours(&instance, &config, &pheromone, run_seed, iteration)
                        .unwrap();
                update_pheromone(
                    &mut pheromone,
                    &tours,
                    instance.distance(),
                    config.decay,
                    config.q,
                );
                for row in &pheromone {
                    for &value in row {
                        prop_assert!(value >= 0.0);
                    }
                }
            }
        }
    }
}
