//! Random K-SAT instances with incremental cost evaluation.
//!
//! A [`Formula`] holds `M` clauses of `K` literals over `N` variables, each
//! literal a variable index with a required sign. A [`KsatInstance`] pairs
//! a shared formula with a `±1` assignment and exposes the single-flip move
//! set used by the annealer: [`KsatInstance::delta_cost`] visits only the
//! clauses containing the flipped variable.

mod formula;
mod instance;

pub use formula::Formula;
pub use instance::KsatInstance;
