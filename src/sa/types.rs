//! Core trait for annealing over single-move neighbourhoods.

use rand::Rng;
use std::fmt::Debug;

/// A state that can be annealed one move at a time.
///
/// Unlike a neighbour-returning formulation, the state is mutated in place:
/// the runner asks for a move, queries its cost change, and applies it only
/// if accepted. Implementors are expected to compute
/// [`delta_cost`](Annealable::delta_cost) incrementally; the runner uses
/// [`naive_delta_cost`](Annealable::naive_delta_cost) only to cross-check it
/// when `debug_delta_cost` is enabled.
///
/// `Clone` must produce an independent copy of the mutable state: the runner
/// keeps clones as best-so-far snapshots while continuing to mutate the
/// original.
///
/// # Minimization
///
/// Costs are non-negative counts; zero is a perfect state.
pub trait Annealable: Clone {
    /// A single perturbation of the state.
    type Move: Copy + Debug;

    /// Current cost. Lower is better.
    fn cost(&self) -> usize;

    /// Draws a random move. Must not change the state.
    fn propose_move<R: Rng>(&self, rng: &mut R) -> Self::Move;

    /// Exact change in [`cost`](Annealable::cost) that applying `mv` would
    /// cause. Must not change the state.
    fn delta_cost(&self, mv: Self::Move) -> isize;

    /// Applies `mv` to the state.
    fn apply_move(&mut self, mv: Self::Move);

    /// Replaces the mutable state with a random one drawn from `rng`.
    fn randomize<R: Rng>(&mut self, rng: &mut R);

    /// Delta cost by applying `mv` to a copy and recomputing the full cost.
    fn naive_delta_cost(&self, mv: Self::Move) -> isize {
        let mut moved = self.clone();
        moved.apply_move(mv);
        moved.cost() as isize - self.cost() as isize
    }
}
