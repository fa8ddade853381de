//! Random K-SAT solved by simulated annealing.
//!
//! - [`ksat`]: random K-SAT formulas over `±1` variables, with a whole-
//!   formula cost and an incremental single-flip delta cost that touches
//!   only the clauses containing the flipped variable.
//! - [`sa`]: a generic simulated-annealing runner over any [`sa::Annealable`]
//!   state, with linear or geometric inverse-temperature schedules,
//!   Metropolis acceptance, per-level acceptance-rate traces, early stopping
//!   at zero cost and optional delta-cost verification.
//!
//! # Example
//!
//! ```
//! use ksat_anneal::ksat::KsatInstance;
//! use ksat_anneal::sa::{AnnealConfig, AnnealRunner};
//!
//! let mut instance = KsatInstance::new(30, 45, 3, Some(42)).unwrap();
//! let config = AnnealConfig::default()
//!     .with_mcmc_steps(500)
//!     .with_anneal_steps(40)
//!     .with_seed(42);
//! let (best, trace) = AnnealRunner::run(&mut instance, &config).unwrap().into_parts();
//! assert!(best.cost() <= instance.num_clauses());
//! assert!(!trace.is_empty());
//! ```
//!
//! Randomness is always threaded through explicit seeded generators (see
//! [`rng`]); no global random state is used when a seed is given.

pub mod error;
pub mod ksat;
pub mod rng;
pub mod sa;

pub use error::{Error, Result};
