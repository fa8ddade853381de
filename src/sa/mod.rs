//! Simulated Annealing (SA) with Metropolis sampling.
//!
//! The runner walks an inverse-temperature schedule `β_0 ≤ … ≤ β_1`. At
//! each level it evaluates a fixed number of single-move proposals and
//! accepts each with the Metropolis rule `min(1, exp(-β·Δ))`, where `Δ` is
//! the exact cost change reported by the state. The best state seen is
//! snapshotted by cloning, and the fraction of accepted proposals is
//! recorded per level.
//!
//! # References
//!
//! - Metropolis, Rosenbluth, Rosenbluth, Teller & Teller (1953),
//!   "Equation of State Calculations by Fast Computing Machines"
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"

mod config;
mod runner;
mod types;

pub use config::{AnnealConfig, BetaSchedule};
pub use runner::{AcceptanceSample, AnnealResult, AnnealRunner, MultiStartResult};
pub use types::Annealable;
