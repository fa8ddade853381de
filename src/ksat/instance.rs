//! A K-SAT formula paired with a mutable candidate assignment.

use std::sync::Arc;

use rand::Rng;

use super::formula::Formula;
use crate::error::{Error, Result};
use crate::rng::{create_rng, SolverRng};
use crate::sa::Annealable;

/// A random K-SAT instance and its current ±1 assignment.
///
/// The clause structure is shared through an `Arc` and never mutated; the
/// assignment is the only mutable state and changes only through
/// [`apply_move`](Self::apply_move), [`set_assignment`](Self::set_assignment)
/// or re-initialization. Cloning copies the assignment, which is what the
/// annealer relies on for best-so-far snapshots.
///
/// A clone also copies the instance's generator, so a clone and its source
/// draw the same assignment on their next
/// [`reinitialize_assignment`](Self::reinitialize_assignment). Use
/// [`fork`](Self::fork) for a trial that diverges.
///
/// # Examples
///
/// ```
/// use ksat_anneal::ksat::KsatInstance;
///
/// let mut inst = KsatInstance::new(20, 40, 3, Some(42)).unwrap();
/// let before = inst.cost();
/// let delta = inst.delta_cost(7);
/// inst.apply_move(7);
/// assert_eq!(inst.cost() as isize, before as isize + delta);
/// ```
#[derive(Debug, Clone)]
pub struct KsatInstance {
    formula: Arc<Formula>,
    assignment: Vec<i8>,
    rng: SolverRng,
}

impl KsatInstance {
    /// Draws a random instance with `n` variables and `m` clauses of `k`
    /// literals, then a uniformly random assignment.
    ///
    /// With `seed` set, the formula, the initial assignment and every later
    /// [`reinitialize_assignment`](Self::reinitialize_assignment) are
    /// reproducible.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArity`] if `k < 2`, [`Error::TooFewVariables`] if
    /// `n == 0` or `k > n`.
    pub fn new(n: usize, m: usize, k: usize, seed: Option<u64>) -> Result<Self> {
        let mut rng = create_rng(seed);
        let formula = Formula::random(n, m, k, &mut rng)?;
        let mut inst = Self {
            formula: Arc::new(formula),
            assignment: vec![1; n],
            rng,
        };
        inst.reinitialize_assignment();
        Ok(inst)
    }

    /// Builds an instance from explicit clauses and an explicit assignment.
    ///
    /// `seed` drives later re-initializations, as in [`new`](Self::new).
    pub fn from_clauses(
        n: usize,
        k: usize,
        clause_vars: &[Vec<usize>],
        signs: &[Vec<i8>],
        assignment: Vec<i8>,
        seed: Option<u64>,
    ) -> Result<Self> {
        let formula = Formula::from_clauses(n, k, clause_vars, signs)?;
        let mut inst = Self {
            formula: Arc::new(formula),
            assignment: vec![1; n],
            rng: create_rng(seed),
        };
        inst.set_assignment(assignment)?;
        Ok(inst)
    }

    /// Wraps a shared formula with a fresh random assignment.
    pub fn with_formula(formula: Arc<Formula>, seed: Option<u64>) -> Self {
        let n = formula.num_vars();
        let mut inst = Self {
            formula,
            assignment: vec![1; n],
            rng: create_rng(seed),
        };
        inst.reinitialize_assignment();
        inst
    }

    /// An independent trial on the same clauses: shares the formula, draws
    /// its own assignment from `seed`.
    pub fn fork(&self, seed: Option<u64>) -> Self {
        Self::with_formula(Arc::clone(&self.formula), seed)
    }

    pub fn formula(&self) -> &Arc<Formula> {
        &self.formula
    }

    pub fn num_vars(&self) -> usize {
        self.formula.num_vars()
    }

    pub fn num_clauses(&self) -> usize {
        self.formula.num_clauses()
    }

    pub fn arity(&self) -> usize {
        self.formula.arity()
    }

    /// Current assignment, one `±1` per variable.
    pub fn assignment(&self) -> &[i8] {
        &self.assignment
    }

    /// Current assignment as booleans (`+1` is `true`).
    pub fn solution(&self) -> Vec<bool> {
        self.assignment.iter().map(|&x| x == 1).collect()
    }

    /// Replaces the assignment.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAssignment`] if the length differs from `N` or a value
    /// is not `±1`.
    pub fn set_assignment(&mut self, assignment: Vec<i8>) -> Result<()> {
        if assignment.len() != self.num_vars() {
            return Err(Error::InvalidAssignment(format!(
                "expected {} values, got {}",
                self.num_vars(),
                assignment.len()
            )));
        }
        if let Some(&x) = assignment.iter().find(|&&x| x != 1 && x != -1) {
            return Err(Error::InvalidAssignment(format!("value {x} is not +1 or -1")));
        }
        self.assignment = assignment;
        Ok(())
    }

    /// Redraws the assignment uniformly at random from the instance's own
    /// generator. The clause structure is untouched.
    pub fn reinitialize_assignment(&mut self) {
        for x in &mut self.assignment {
            *x = random_sign(&mut self.rng);
        }
    }

    /// Redraws the assignment from an external generator.
    pub fn reinitialize_assignment_with<R: Rng>(&mut self, rng: &mut R) {
        for x in &mut self.assignment {
            *x = random_sign(rng);
        }
    }

    /// Number of violated clauses. Scans the whole formula.
    pub fn cost(&self) -> usize {
        (0..self.num_clauses())
            .filter(|&m| self.formula.is_violated(m, &self.assignment))
            .count()
    }

    /// Number of violated clauses, computed as `Σ_m Π_k (1 - s·x) / 2`.
    ///
    /// Each factor is 1 for a false literal and 0 for a true one, so the
    /// product is 1 exactly for violated clauses. Always equal to
    /// [`cost`](Self::cost); slower.
    pub fn cost_by_product(&self) -> usize {
        (0..self.num_clauses())
            .map(|m| {
                self.formula
                    .clause_vars(m)
                    .iter()
                    .zip(self.formula.clause_signs(m))
                    .map(|(&v, &s)| ((1 - (s * self.assignment[v]) as i32) / 2) as usize)
                    .product::<usize>()
            })
            .sum()
    }

    pub fn is_satisfied(&self) -> bool {
        self.cost() == 0
    }

    /// A variable index drawn uniformly from `0..N`.
    pub fn propose_move<R: Rng>(&self, rng: &mut R) -> usize {
        rng.random_range(0..self.num_vars())
    }

    /// Flips variable `v`.
    ///
    /// # Panics
    ///
    /// If `v >= N`.
    pub fn apply_move(&mut self, v: usize) {
        self.assignment[v] *= -1;
    }

    /// Exact change in [`cost`](Self::cost) that flipping `v` would cause.
    ///
    /// Only the clauses containing `v` are visited, so this is
    /// `O(deg(v) · K)`. The assignment is not modified.
    ///
    /// # Panics
    ///
    /// If `v >= N`.
    pub fn delta_cost(&self, v: usize) -> isize {
        assert!(
            v < self.num_vars(),
            "move {v} out of range for {} variables",
            self.num_vars()
        );
        let (mut before, mut after) = (0isize, 0isize);
        for &m in self.formula.clauses_of(v) {
            before += self.formula.is_violated(m, &self.assignment) as isize;
            after += self.formula.is_violated_flipped(m, &self.assignment, v) as isize;
        }
        after - before
    }

    /// Delta cost by full recomputation on a flipped copy.
    pub fn naive_delta_cost(&self, v: usize) -> isize {
        let mut flipped = self.clone();
        flipped.apply_move(v);
        flipped.cost() as isize - self.cost() as isize
    }
}

fn random_sign<R: Rng>(rng: &mut R) -> i8 {
    if rng.random_bool(0.5) {
        1
    } else {
        -1
    }
}

impl Annealable for KsatInstance {
    type Move = usize;

    fn cost(&self) -> usize {
        KsatInstance::cost(self)
    }

    fn propose_move<R: Rng>(&self, rng: &mut R) -> usize {
        KsatInstance::propose_move(self, rng)
    }

    fn delta_cost(&self, mv: usize) -> isize {
        KsatInstance::delta_cost(self, mv)
    }

    fn naive_delta_cost(&self, mv: usize) -> isize {
        KsatInstance::naive_delta_cost(self, mv)
    }

    fn apply_move(&mut self, mv: usize) {
        KsatInstance::apply_move(self, mv)
    }

    fn randomize<R: Rng>(&mut self, rng: &mut R) {
        self.reinitialize_assignment_with(rng)
    }
}
