//! Annealing control loop.
//!
//! # Algorithm
//!
//! 1. Score the initial assignment; `T0 = 0.4 * score`
//! 2. While `T >= Tf`:
//!    a. Repeat `L` times: propose a neighbor, accept it if it lowers the
//!    score or with probability `exp(-delta / T)` otherwise
//!    b. Apply the cooling schedule once
//! 3. Return the last accepted assignment (and the best one seen)
//!
//! Termination is driven by the schedule only; there is no stagnation
//! check. An optional iteration budget bounds slow schedules.

use rand::Rng;
use tracing::{debug, info, warn};

use super::config::{AnnealingConfig, ReseedPolicy};
use super::cooling::CoolingStep;
use super::types::{Assignment, Instance};
use crate::error::CohortError;
use crate::neighbor::{propose, MoveOutcome};
use crate::objective::evaluate;
use crate::random::create_rng;

/// Initial temperature as a fraction of the initial score.
pub const INITIAL_TEMPERATURE_FACTOR: f64 = 0.4;

/// Result of an annealing run.
#[derive(Debug, Clone)]
pub struct AnnealingResult {
    /// Seed the run used; replaying with it reproduces the result.
    pub seed: u64,

    /// Score of the instance's initial assignment.
    pub initial_cost: f64,

    /// Starting temperature (`0.4 * initial_cost`).
    pub initial_temperature: f64,

    /// Last accepted assignment.
    pub current: Assignment,

    /// Score of `current`.
    pub current_cost: f64,

    /// Lowest-scoring assignment accepted during the run.
    pub best: Assignment,

    /// Score of `best`.
    pub best_cost: f64,

    /// Total candidate proposals.
    pub iterations: usize,

    /// Number of temperature levels completed.
    pub levels: usize,

    /// Temperature when the run stopped.
    pub final_temperature: f64,

    /// Number of accepted moves (including improvements).
    pub accepted_moves: usize,

    /// Number of improving moves.
    pub improving_moves: usize,

    /// Moves rejected because the destination section was full.
    pub capacity_rejections: usize,

    /// Moves rejected because the destination section does not exist.
    pub unknown_section_rejections: usize,

    /// Whether `max_iterations` stopped the run before the schedule did.
    pub budget_exhausted: bool,

    /// Current score at the start and after each temperature level.
    pub cost_history: Vec<f64>,
}

/// Executes the annealing loop.
pub struct AnnealingController;

impl AnnealingController {
    /// Runs one annealing search on a copy of `instance`.
    ///
    /// # Errors
    ///
    /// Configuration and instance problems are reported before the loop
    /// starts. Inside the loop, only a registry that disagrees with the
    /// graph can fail a proposal.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_cohort::graph::{SectionGraph, SectionKey};
    /// use u_cohort::registry::{SiblingRecord, SiblingRegistry};
    /// use u_cohort::sa::{AnnealingConfig, AnnealingController, CoolingSchedule, Instance};
    ///
    /// let (a, b) = (SectionKey::new("1", "ESO", "A"), SectionKey::new("1", "ESO", "B"));
    /// let mut graph = SectionGraph::new();
    /// graph.add_section(a.clone(), vec![1, 2]);
    /// graph.add_section(b.clone(), vec![3, 4]);
    /// graph.link(&a, &b, 1).unwrap();
    /// let registry: SiblingRegistry = [
    ///     SiblingRecord::new(1, "1", "ESO", "A"),
    ///     SiblingRecord::new(3, "1", "ESO", "B"),
    /// ]
    /// .into_iter()
    /// .collect();
    ///
    /// let config = AnnealingConfig::default()
    ///     .with_iterations_per_level(10)
    ///     .with_final_temperature(0.01)
    ///     .with_cooling(CoolingSchedule::Geometric { alpha: 0.9 })
    ///     .with_max_siblings_per_section(5)
    ///     .with_seed(42);
    ///
    /// let result = AnnealingController::run(&Instance::new(graph, registry, 4), &config).unwrap();
    /// assert!(result.current_cost.is_finite());
    /// assert!(result.best_cost <= result.initial_cost);
    /// ```
    pub fn run(
        instance: &Instance,
        config: &AnnealingConfig,
    ) -> Result<AnnealingResult, CohortError> {
        config.validate()?;
        instance.validate()?;

        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = create_rng(seed);

        let weights = config.weights;
        let total_students = instance.total_students;
        let score = |assignment: &Assignment| evaluate(&assignment.graph, &weights, total_students);

        let mut current = instance.initial_assignment();
        let initial_cost = score(&current);
        let mut current_cost = initial_cost;
        let mut best = current.clone();
        let mut best_cost = current_cost;

        let initial_temperature = INITIAL_TEMPERATURE_FACTOR * initial_cost;
        let mut temperature = initial_temperature;

        let mut iterations = 0usize;
        let mut levels = 0usize;
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;
        let mut capacity_rejections = 0usize;
        let mut unknown_section_rejections = 0usize;
        let mut budget_exhausted = false;
        let mut cost_history = vec![current_cost];

        if config.final_temperature >= initial_temperature {
            info!(
                initial_temperature,
                final_temperature = config.final_temperature,
                "final temperature not below initial temperature, nothing to anneal"
            );
        } else {
            config.cooling.validate_for_run(
                initial_temperature,
                config.final_temperature,
                config.iterations_per_level,
                config.max_iterations,
            )?;

            info!(
                seed,
                initial_cost,
                initial_temperature,
                final_temperature = config.final_temperature,
                iterations_per_level = config.iterations_per_level,
                cooling = config.cooling.name(),
                "starting annealing run"
            );

            'levels: while temperature >= config.final_temperature {
                for _ in 0..config.iterations_per_level {
                    if config.max_iterations > 0 && iterations >= config.max_iterations {
                        budget_exhausted = true;
                        break 'levels;
                    }
                    iterations += 1;

                    let mut registry = current.registry.clone();
                    let proposal = match config.reseed {
                        ReseedPolicy::PerRun => propose(
                            &mut registry,
                            &current.graph,
                            config.max_siblings_per_section,
                            &mut rng,
                        )?,
                        ReseedPolicy::PerCall => propose(
                            &mut registry,
                            &current.graph,
                            config.max_siblings_per_section,
                            &mut create_rng(seed),
                        )?,
                    };

                    // A rejected move leaves the state as it is.
                    match proposal.outcome {
                        MoveOutcome::Applied { .. } => {}
                        MoveOutcome::CapacityExceeded { .. } => {
                            capacity_rejections += 1;
                            continue;
                        }
                        MoveOutcome::UnknownSection { .. } => {
                            unknown_section_rejections += 1;
                            continue;
                        }
                    }

                    let candidate = Assignment {
                        graph: proposal.graph,
                        registry,
                    };
                    let candidate_cost = score(&candidate);
                    let delta = candidate_cost - current_cost;

                    // Metropolis acceptance criterion
                    let accept = if delta < 0.0 {
                        improving_moves += 1;
                        true
                    } else if temperature > 0.0 {
                        rng.random::<f64>() < (-delta / temperature).exp()
                    } else {
                        false
                    };

                    if accept {
                        current = candidate;
                        current_cost = candidate_cost;
                        accepted_moves += 1;

                        if current_cost < best_cost {
                            best = current.clone();
                            best_cost = current_cost;
                        }
                    }
                }

                let step = CoolingStep {
                    temperature,
                    initial_temperature,
                    final_temperature: config.final_temperature,
                    level: levels,
                    iterations_per_level: config.iterations_per_level,
                };
                temperature = config.cooling.next_temperature(&step, &mut rng);
                levels += 1;
                cost_history.push(current_cost);

                debug!(
                    level = levels,
                    temperature, current_cost, best_cost, "temperature level done"
                );
            }

            if budget_exhausted {
                warn!(
                    iterations,
                    temperature, "iteration budget exhausted before final temperature"
                );
            }
        }

        info!(
            initial_cost,
            current_cost,
            best_cost,
            iterations,
            levels,
            accepted_moves,
            capacity_rejections,
            "annealing run finished"
        );

        Ok(AnnealingResult {
            seed,
            initial_cost,
            initial_temperature,
            current,
            current_cost,
            best,
            best_cost,
            iterations,
            levels,
            final_temperature: temperature,
            accepted_moves,
            improving_moves,
            capacity_rejections,
            unknown_section_rejections,
            budget_exhausted,
            cost_history,
        })
    }

    /// Runs one independent search per configuration, e.g. a parameter
    /// sweep. Each run owns its own copy of the instance and its own RNG.
    /// Results are in the order of `configs`.
    ///
    /// With the `parallel` feature the runs execute on the rayon pool.
    pub fn sweep(
        instance: &Instance,
        configs: &[AnnealingConfig],
    ) -> Vec<Result<AnnealingResult, CohortError>> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            configs
                .par_iter()
                .map(|config| Self::run(instance, config))
                .collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            configs
                .iter()
                .map(|config| Self::run(instance, config))
                .collect()
        }
    }
}
