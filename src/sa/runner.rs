//! Annealing execution loop.

use rand::Rng;
use rayon::prelude::*;
use tracing::{debug, error, info, trace, warn};

use super::config::AnnealConfig;
use super::types::Annealable;
use crate::error::{Error, Result};
use crate::rng::create_rng;

/// Acceptance rate measured at one temperature level.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AcceptanceSample {
    /// Inverse temperature of the level.
    pub beta: f64,
    /// Accepted proposals divided by `mcmc_steps`, in `[0, 1]`.
    pub rate: f64,
}

impl From<AcceptanceSample> for (f64, f64) {
    fn from(s: AcceptanceSample) -> Self {
        (s.beta, s.rate)
    }
}

/// Result of an annealing run.
#[derive(Debug, Clone)]
pub struct AnnealResult<S: Clone> {
    /// Snapshot of the lowest-cost state seen.
    pub best: S,

    /// Cost of `best`, recomputed from the snapshot on return.
    pub best_cost: usize,

    /// One sample per temperature level actually run.
    pub acceptance_rates: Vec<AcceptanceSample>,

    /// Best cost after each level run.
    pub best_cost_history: Vec<usize>,

    /// Total proposals evaluated.
    pub iterations: usize,

    /// Accepted proposals, including improving ones.
    pub accepted_moves: usize,

    /// Accepted proposals with negative delta.
    pub improving_moves: usize,

    /// Inverse temperature of the last level run.
    pub final_beta: f64,

    /// Whether levels were skipped because a zero-cost state was found.
    pub stopped_early: bool,
}

impl<S: Clone> AnnealResult<S> {
    /// Splits into the best state and the acceptance-rate trace.
    pub fn into_parts(self) -> (S, Vec<AcceptanceSample>) {
        (self.best, self.acceptance_rates)
    }

    pub fn is_solved(&self) -> bool {
        self.best_cost == 0
    }
}

/// Outcome of [`AnnealRunner::run_multistart`].
#[derive(Debug, Clone)]
pub struct MultiStartResult<S: Clone> {
    /// Index of the start that produced `result`.
    pub best_start: usize,

    /// Number of starts that reached cost zero.
    pub solved_starts: usize,

    /// The run with the lowest best cost (earliest start on ties).
    pub result: AnnealResult<S>,
}

/// Executes simulated annealing with Metropolis sampling.
pub struct AnnealRunner;

impl AnnealRunner {
    /// Anneals `state` in place and returns the best snapshot.
    ///
    /// For each inverse temperature `β` of [`AnnealConfig::betas`], runs
    /// `mcmc_steps` proposals. A move with delta `d ≤ 0` is always accepted,
    /// otherwise it is accepted with probability `exp(-β·d)`. The acceptance
    /// rate of every level is recorded. With `early_stopping`, the schedule
    /// ends after the first level in which a zero-cost state was reached.
    ///
    /// On return `state` holds the last state visited, which need not be the
    /// best one.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfig`] if the configuration does not validate, and
    /// [`Error::InternalInconsistency`] if `debug_delta_cost` is set and an
    /// incremental delta disagrees with full recomputation.
    pub fn run<P: Annealable>(state: &mut P, config: &AnnealConfig) -> Result<AnnealResult<P>> {
        config.validate()?;

        let betas = config.betas();
        let mut rng = create_rng(config.seed);

        // Tracked from reported deltas; signed so a wrong delta cannot clamp.
        let mut current_cost = state.cost() as isize;
        let mut best = state.clone();
        let mut best_cost = current_cost;

        let mut acceptance_rates = Vec::with_capacity(betas.len());
        let mut best_cost_history = Vec::with_capacity(betas.len());
        let mut iterations = 0usize;
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;
        let mut final_beta = config.beta0;
        let mut stopped_early = false;

        info!(
            levels = betas.len(),
            mcmc_steps = config.mcmc_steps,
            beta0 = config.beta0,
            beta1 = config.beta1,
            initial_cost = current_cost,
            "annealing started"
        );

        for (level, &beta) in betas.iter().enumerate() {
            final_beta = beta;
            let mut accepted = 0usize;

            for _ in 0..config.mcmc_steps {
                let mv = state.propose_move(&mut rng);
                let delta = state.delta_cost(mv);

                if config.debug_delta_cost {
                    let recomputed = state.naive_delta_cost(mv);
                    if recomputed != delta {
                        error!(
                            ?mv,
                            incremental = delta,
                            recomputed,
                            "incremental delta cost mismatch"
                        );
                        return Err(Error::InternalInconsistency {
                            mv: format!("{mv:?}"),
                            incremental: delta,
                            recomputed,
                        });
                    }
                }

                iterations += 1;
                if !metropolis(delta, beta, &mut rng) {
                    continue;
                }

                state.apply_move(mv);
                current_cost += delta;
                accepted += 1;
                if delta < 0 {
                    improving_moves += 1;
                }

                if current_cost < best_cost {
                    best = state.clone();
                    best_cost = current_cost;
                    trace!(level, beta, best_cost, "new best");
                }
            }

            accepted_moves += accepted;
            let rate = accepted as f64 / config.mcmc_steps as f64;
            acceptance_rates.push(AcceptanceSample { beta, rate });
            best_cost_history.push(best_cost.max(0) as usize);

            debug!(
                level,
                beta,
                rate,
                cost = current_cost,
                best_cost,
                "temperature level finished"
            );

            if config.early_stopping && best_cost <= 0 {
                stopped_early = level + 1 < betas.len();
                break;
            }
        }

        let tracked_best = best_cost;
        let best_cost = best.cost();
        if best_cost as isize != tracked_best {
            warn!(
                tracked = tracked_best,
                actual = best_cost,
                "tracked best cost drifted from the snapshot; deltas are inconsistent"
            );
        }

        info!(
            best_cost,
            iterations,
            accepted_moves,
            stopped_early,
            "annealing finished"
        );

        Ok(AnnealResult {
            best,
            best_cost,
            acceptance_rates,
            best_cost_history,
            iterations,
            accepted_moves,
            improving_moves,
            final_beta,
            stopped_early,
        })
    }

    /// Anneals `starts` independent copies of `state` and keeps the best run.
    ///
    /// Each start re-randomizes a clone of `state` and anneals it with its
    /// own seed; all seeds are drawn up front from `config.seed`, so the
    /// outcome is the same whether or not `parallel` spreads the starts over
    /// the rayon pool. `state` itself is not modified.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfig`] if `starts` is zero or the configuration does
    /// not validate; otherwise the first error of any start.
    pub fn run_multistart<P>(
        state: &P,
        config: &AnnealConfig,
        starts: usize,
        parallel: bool,
    ) -> Result<MultiStartResult<P>>
    where
        P: Annealable + Send + Sync,
    {
        if starts == 0 {
            return Err(Error::InvalidConfig("starts must be positive".into()));
        }
        config.validate()?;

        let mut master = create_rng(config.seed);
        let seeds: Vec<(u64, u64)> = (0..starts)
            .map(|_| (master.random(), master.random()))
            .collect();

        let run_one = |&(init_seed, run_seed): &(u64, u64)| -> Result<AnnealResult<P>> {
            let mut trial = state.clone();
            trial.randomize(&mut create_rng(Some(init_seed)));
            let mut trial_config = config.clone();
            trial_config.seed = Some(run_seed);
            Self::run(&mut trial, &trial_config)
        };

        let mut results: Vec<AnnealResult<P>> = if parallel {
            seeds.par_iter().map(run_one).collect::<Result<_>>()?
        } else {
            seeds.iter().map(run_one).collect::<Result<_>>()?
        };

        let solved_starts = results.iter().filter(|r| r.is_solved()).count();
        let best_start = results
            .iter()
            .enumerate()
            .min_by_key(|(i, r)| (r.best_cost, *i))
            .map_or(0, |(i, _)| i);
        let result = results.swap_remove(best_start);

        info!(
            starts,
            solved_starts,
            best_start,
            best_cost = result.best_cost,
            "multistart finished"
        );

        Ok(MultiStartResult {
            best_start,
            solved_starts,
            result,
        })
    }
}

/// Metropolis acceptance: always for `delta <= 0`, otherwise with
/// probability `exp(-beta * delta)`.
fn metropolis<R: Rng>(delta: isize, beta: f64, rng: &mut R) -> bool {
    if delta <= 0 {
        return true;
    }
    let probability = (-beta * delta as f64).exp();
    rng.random_range(0.0..1.0) < probability
}
