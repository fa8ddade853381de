//! Immutable clause structure of a K-SAT formula.
//!
//! A [`Formula`] stores the `M × K` sign and variable tables row-major,
//! together with the inverted index from each variable to the clauses it
//! appears in. Nothing here changes after construction, so instances share a
//! formula through an `Arc` and only copy their assignment.

use rand::seq::index;
use rand::Rng;

use crate::error::{Error, Result};

/// Clause tables of a K-SAT formula plus the variable → clause index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formula {
    num_vars: usize,
    arity: usize,
    /// Required polarity of each clause slot, `M × K` row-major.
    signs: Vec<i8>,
    /// Variable occupying each clause slot, `M × K` row-major.
    clause_vars: Vec<usize>,
    /// `var_clauses[v]` lists, in increasing order, the clauses containing `v`.
    var_clauses: Vec<Vec<usize>>,
}

impl Formula {
    /// Draws a random formula with `m` clauses of `k` distinct variables.
    ///
    /// All signs are drawn first, then the variables of each clause in
    /// order, sampling without replacement from `0..n`.
    pub fn random<R: Rng>(n: usize, m: usize, k: usize, rng: &mut R) -> Result<Self> {
        check_shape(n, k)?;

        let signs: Vec<i8> = (0..m * k)
            .map(|_| if rng.random_bool(0.5) { 1i8 } else { -1 })
            .collect();

        let mut clause_vars = Vec::with_capacity(m * k);
        for _ in 0..m {
            clause_vars.extend(index::sample(rng, n, k).iter());
        }

        Ok(Self::assemble(n, k, signs, clause_vars))
    }

    /// Builds a formula from explicit clause rows.
    ///
    /// Each row of `clause_vars` must hold `k` distinct indices below `n`,
    /// and the matching row of `signs` must hold `k` values in `{-1, +1}`.
    pub fn from_clauses(
        n: usize,
        k: usize,
        clause_vars: &[Vec<usize>],
        signs: &[Vec<i8>],
    ) -> Result<Self> {
        check_shape(n, k)?;
        if clause_vars.len() != signs.len() {
            return Err(Error::MalformedClause {
                clause: clause_vars.len().min(signs.len()),
                reason: format!(
                    "{} variable rows but {} sign rows",
                    clause_vars.len(),
                    signs.len()
                ),
            });
        }

        for (clause, (vars, row_signs)) in clause_vars.iter().zip(signs).enumerate() {
            let malformed = |reason: String| Error::MalformedClause { clause, reason };
            if vars.len() != k || row_signs.len() != k {
                return Err(malformed(format!(
                    "expected {k} literals, got {} variables and {} signs",
                    vars.len(),
                    row_signs.len()
                )));
            }
            if let Some(&v) = vars.iter().find(|&&v| v >= n) {
                return Err(malformed(format!("variable {v} out of range 0..{n}")));
            }
            if let Some(&s) = row_signs.iter().find(|&&s| s != 1 && s != -1) {
                return Err(malformed(format!("sign {s} is not +1 or -1")));
            }
            for (slot, v) in vars.iter().enumerate() {
                if vars[..slot].contains(v) {
                    return Err(malformed(format!("variable {v} repeated")));
                }
            }
        }

        Ok(Self::assemble(n, k, signs.concat(), clause_vars.concat()))
    }

    fn assemble(num_vars: usize, arity: usize, signs: Vec<i8>, clause_vars: Vec<usize>) -> Self {
        let mut var_clauses = vec![Vec::new(); num_vars];
        for (clause, vars) in clause_vars.chunks_exact(arity).enumerate() {
            for &v in vars {
                var_clauses[v].push(clause);
            }
        }
        Self {
            num_vars,
            arity,
            signs,
            clause_vars,
            var_clauses,
        }
    }

    /// Number of variables `N`.
    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    /// Number of clauses `M`.
    pub fn num_clauses(&self) -> usize {
        self.clause_vars.len() / self.arity
    }

    /// Literals per clause `K`.
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Variables of clause `m`.
    pub fn clause_vars(&self, m: usize) -> &[usize] {
        &self.clause_vars[m * self.arity..(m + 1) * self.arity]
    }

    /// Required signs of clause `m`.
    pub fn clause_signs(&self, m: usize) -> &[i8] {
        &self.signs[m * self.arity..(m + 1) * self.arity]
    }

    /// Clauses in which variable `v` appears, in increasing order.
    pub fn clauses_of(&self, v: usize) -> &[usize] {
        &self.var_clauses[v]
    }

    /// Whether clause `m` has every literal false under `x`.
    ///
    /// Takes the maximum of `x[var] * sign` over the clause; the clause is
    /// violated iff that maximum is `-1`.
    #[inline]
    pub fn is_violated(&self, m: usize, x: &[i8]) -> bool {
        self.clause_vars(m)
            .iter()
            .zip(self.clause_signs(m))
            .map(|(&v, &s)| x[v] * s)
            .max()
            == Some(-1)
    }

    /// Same as [`is_violated`](Self::is_violated) with `flipped` negated.
    #[inline]
    pub fn is_violated_flipped(&self, m: usize, x: &[i8], flipped: usize) -> bool {
        self.clause_vars(m)
            .iter()
            .zip(self.clause_signs(m))
            .map(|(&v, &s)| if v == flipped { -x[v] * s } else { x[v] * s })
            .max()
            == Some(-1)
    }
}

fn check_shape(n: usize, k: usize) -> Result<()> {
    if k < 2 {
        return Err(Error::InvalidArity { k });
    }
    if n == 0 || k > n {
        return Err(Error::TooFewVariables { n, k });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::create_rng;

    #[test]
    fn test_random_clauses_have_distinct_vars() {
        let mut rng = create_rng(Some(3));
        let f = Formula::random(10, 200, 4, &mut rng).unwrap();
        assert_eq!(f.num_clauses(), 200);
        for m in 0..f.num_clauses() {
            let vars = f.clause_vars(m);
            assert_eq!(vars.len(), 4);
            for (i, v) in vars.iter().enumerate() {
                assert!(*v < 10);
                assert!(!vars[i + 1..].contains(v), "clause {m} repeats {v}");
            }
            assert!(f.clause_signs(m).iter().all(|&s| s == 1 || s == -1));
        }
    }

    #[test]
    fn test_inverted_index_is_exact_inverse() {
        let mut rng = create_rng(Some(11));
        let f = Formula::random(15, 60, 3, &mut rng).unwrap();
        for v in 0..f.num_vars() {
            for m in 0..f.num_clauses() {
                let listed = f.clauses_of(v).contains(&m);
                let present = f.clause_vars(m).contains(&v);
                assert_eq!(listed, present, "var {v}, clause {m}");
            }
            assert!(f.clauses_of(v).windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_both_signs_drawn() {
        let mut rng = create_rng(Some(5));
        let f = Formula::random(20, 100, 3, &mut rng).unwrap();
        let positives = f.signs.iter().filter(|&&s| s == 1).count();
        assert!(positives > 0 && positives < f.signs.len());
    }

    #[test]
    fn test_shape_errors() {
        let mut rng = create_rng(Some(0));
        assert_eq!(
            Formula::random(5, 3, 1, &mut rng),
            Err(Error::InvalidArity { k: 1 })
        );
        assert_eq!(
            Formula::random(2, 3, 3, &mut rng),
            Err(Error::TooFewVariables { n: 2, k: 3 })
        );
        assert_eq!(
            Formula::random(0, 0, 2, &mut rng),
            Err(Error::TooFewVariables { n: 0, k: 2 })
        );
    }

    #[test]
    fn test_empty_formula() {
        let mut rng = create_rng(Some(0));
        let f = Formula::random(4, 0, 2, &mut rng).unwrap();
        assert_eq!(f.num_clauses(), 0);
        assert!((0..4).all(|v| f.clauses_of(v).is_empty()));
    }

    #[test]
    fn test_from_clauses_validation() {
        let ok = Formula::from_clauses(3, 2, &[vec![0, 1], vec![1, 2]], &[vec![1, 1], vec![-1, 1]]);
        assert!(ok.is_ok());

        let repeated = Formula::from_clauses(3, 2, &[vec![1, 1]], &[vec![1, 1]]);
        assert!(matches!(repeated, Err(Error::MalformedClause { clause: 0, .. })));

        let out_of_range = Formula::from_clauses(3, 2, &[vec![0, 1], vec![0, 3]], &[vec![1, 1], vec![1, 1]]);
        assert!(matches!(out_of_range, Err(Error::MalformedClause { clause: 1, .. })));

        let bad_sign = Formula::from_clauses(3, 2, &[vec![0, 1]], &[vec![1, 0]]);
        assert!(matches!(bad_sign, Err(Error::MalformedClause { .. })));

        let short = Formula::from_clauses(3, 2, &[vec![0]], &[vec![1]]);
        assert!(matches!(short, Err(Error::MalformedClause { .. })));

        let mismatched = Formula::from_clauses(3, 2, &[vec![0, 1]], &[]);
        assert!(matches!(mismatched, Err(Error::MalformedClause { .. })));
    }

    #[test]
    fn test_violation_checks() {
        let f = Formula::from_clauses(3, 2, &[vec![0, 1]], &[vec![1, -1]]).unwrap();
        // clause is (x0 OR NOT x1)
        assert!(f.is_violated(0, &[-1, 1, 1]));
        assert!(!f.is_violated(0, &[1, 1, 1]));
        assert!(!f.is_violated(0, &[-1, -1, 1]));
        assert!(!f.is_violated_flipped(0, &[-1, 1, 1], 0));
        assert!(!f.is_violated_flipped(0, &[-1, 1, 1], 1));
        assert!(f.is_violated_flipped(0, &[-1, 1, 1], 2));
    }
}
