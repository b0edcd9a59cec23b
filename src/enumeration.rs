//Idcodes
//Copyright (C) 2024 The idcodes developers
//
//This program is free software: you can redistribute it and/or modify
//it under the terms of the GNU Affero General Public License as published by
//the Free Software Foundation, either version 3 of the License, or
//(at your option) any later version.
//
//This program is distributed in the hope that it will be useful,
//but WITHOUT ANY WARRANTY; without even the implied warranty of
//MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//GNU Affero General Public License for more details.
//
//You should have received a copy of the GNU Affero General Public License
//along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Enumeration of all the solutions of a formula by repeated solving. Starting from formula v0, the
//! oracle is called on the current version; each solution S found is recorded and the next version
//! is the current one plus the blocking constraint of S, which excludes S and only S. The loop
//! stops at the first version proven unsatisfiable: at that point, every solution of v0 has been
//! recorded exactly once.
//!
//! The loop goes through the following states
//!
//! ```text
//! Solving(F) --sat--> Satisfiable(F, S) --block--> Blocked(F + block(S)) --> Solving(...)
//! Solving(F) --unsat--> Unsat(F, proof)
//! ```
//!
//! A solution violating the formula it was found for is kept and reported, but it means that the
//! oracle ignores the blocking constraints; such an oracle may never reach the refutation.
//!
//! An oracle failure is an error and never ends the enumeration as if the formula were
//! unsatisfiable.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::artifacts::Artifacts;
use crate::core::formula::Formula;
use crate::core::solution::Solution;
use crate::error::Result;
use crate::oracles::{Oracle, Outcome, ProofHandle, SolveRequest};
use crate::statistics::Statistics;

/// A formula of the chain v0, v1, ... together with the file in which it is written
#[derive(Debug, Clone)]
pub struct FormulaVersion {
    index: usize,
    formula: Formula,
    path: PathBuf,
}

impl FormulaVersion {

    /// Writes the formula as version `index` of the chain
    pub fn write(index: usize, formula: Formula, artifacts: &Artifacts) -> Result<Self> {
        let path = artifacts.formula(index);
        formula.write_to(&path)?;
        Ok(Self { index, formula, path })
    }

    /// Returns the next version, in which the solution is blocked
    pub fn block(&self, solution: &Solution, artifacts: &Artifacts) -> Result<Self> {
        let formula = self.formula.with_constraints([solution.blocking_constraint()]);
        Self::write(self.index + 1, formula, artifacts)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn formula(&self) -> &Formula {
        &self.formula
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

pub enum State {
    Solving(FormulaVersion),
    Satisfiable(FormulaVersion, Solution),
    Blocked(FormulaVersion),
    Unsat(FormulaVersion, ProofHandle),
}

/// Everything accumulated by the loop. It is owned by `enumerate` and never shared.
#[derive(Debug, Default)]
pub struct EnumerationState {
    /// Solutions, in discovery order
    solutions: Vec<Solution>,
    /// Number of oracle calls so far
    iteration: usize,
    /// Versions for which the oracle answered with an assignment violating them
    inconsistent: Vec<usize>,
}

impl EnumerationState {

    pub fn solutions(&self) -> &[Solution] {
        &self.solutions
    }

    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn inconsistent(&self) -> &[usize] {
        &self.inconsistent
    }
}

/// Result of a complete enumeration
#[derive(Debug)]
pub struct Enumeration {
    original: FormulaVersion,
    solutions: Vec<Solution>,
    refuted: FormulaVersion,
    proof: ProofHandle,
    inconsistent: Vec<usize>,
}

impl Enumeration {

    /// Returns formula v0
    pub fn original(&self) -> &FormulaVersion {
        &self.original
    }

    pub fn solutions(&self) -> &[Solution] {
        &self.solutions
    }

    /// Returns the last version of the chain, which the oracle proved unsatisfiable
    pub fn refuted(&self) -> &FormulaVersion {
        &self.refuted
    }

    pub fn proof(&self) -> &ProofHandle {
        &self.proof
    }

    /// Returns the versions for which the oracle returned an assignment that violates them
    pub fn inconsistent(&self) -> &[usize] {
        &self.inconsistent
    }
}

/// Runs the oracle on the version and returns the next state
fn solve<O: Oracle, const S: bool>(oracle: &O, version: FormulaVersion, artifacts: &Artifacts, state: &mut EnumerationState, statistics: &mut Statistics<S>) -> Result<State> {
    let proof_base = artifacts.proof_base(version.index());
    let log = artifacts.solving_log(version.index());
    let request = SolveRequest::new(version.path(), version.formula().number_variables(), &proof_base, &log);
    let start = Instant::now();
    let outcome = oracle.solve(&request)?;
    state.iteration += 1;
    match outcome {
        Outcome::Sat(solution) => {
            statistics.sat(start.elapsed());
            debug!("iteration {}: solution {}", version.index(), solution);
            if let Some(constraint) = version.formula().first_violated(&solution) {
                warn!("iteration {}: the oracle returned an assignment violating `{}`; it may ignore the blocking constraints and never terminate", version.index(), constraint);
                state.inconsistent.push(version.index());
            }
            Ok(State::Satisfiable(version, solution))
        },
        Outcome::Unsat(proof) => {
            statistics.unsat(start.elapsed());
            debug!("iteration {}: unsatisfiable, proof in {}", version.index(), proof.path().display());
            Ok(State::Unsat(version, proof))
        },
    }
}

/// Enumerates all the solutions of the formula. The formula is written as version 0, and one new
/// version is written per solution found.
pub fn enumerate<O: Oracle, const S: bool>(oracle: &O, formula: Formula, artifacts: &Artifacts, statistics: &mut Statistics<S>) -> Result<Enumeration> {
    let original = FormulaVersion::write(0, formula, artifacts)?;
    let mut enumeration = EnumerationState::default();
    let mut state = State::Solving(original.clone());
    let (refuted, proof) = loop {
        state = match state {
            State::Solving(version) => solve(oracle, version, artifacts, &mut enumeration, statistics)?,
            State::Satisfiable(version, solution) => {
                let next = version.block(&solution, artifacts)?;
                enumeration.solutions.push(solution);
                info!("solution {} found, {} constraints in next formula", enumeration.solutions.len(), next.formula().number_constraints());
                State::Blocked(next)
            },
            State::Blocked(version) => State::Solving(version),
            State::Unsat(version, proof) => break (version, proof),
        };
    };
    info!("enumeration finished after {} oracle calls: {} solutions, {} is unsatisfiable", enumeration.iteration, enumeration.solutions.len(), refuted.path().display());
    Ok(Enumeration {
        original,
        solutions: enumeration.solutions,
        refuted,
        proof,
        inconsistent: enumeration.inconsistent,
    })
}

#[cfg(test)]
mod test_enumeration {
    use super::*;
    use crate::core::constraint::Constraint;
    use crate::core::literal::{Literal, Variable};
    use crate::error::{Error, OracleError};
    use crate::parsers::formula_from_file;
    use std::fs::File;

    /// Brute force oracle over a handful of variables, reading the formula back from its file
    struct BruteForce;

    impl Oracle for BruteForce {
        fn solve(&self, request: &SolveRequest) -> std::result::Result<Outcome, OracleError> {
            let formula = formula_from_file(request.formula()).unwrap();
            let n = request.number_variables();
            File::create(request.log()).unwrap();
            for bits in 0..(1usize << n) {
                let literals = (0..n).map(|i| Literal::from_variable(Variable(i + 1), bits & (1 << i) != 0)).collect();
                let solution = Solution::try_from_literals(literals, n).unwrap();
                if formula.is_satisfied_by(&solution) {
                    return Ok(Outcome::Sat(solution));
                }
            }
            File::create(request.proof()).unwrap();
            Ok(Outcome::Unsat(ProofHandle::new(request.proof())))
        }
    }

    struct Broken;

    impl Oracle for Broken {
        fn solve(&self, request: &SolveRequest) -> std::result::Result<Outcome, OracleError> {
            Err(OracleError::Io { path: request.log().to_path_buf(), source: std::io::Error::other("crashed") })
        }
    }

    /// Returns an already blocked solution once, then behaves
    struct Forgetful {
        calls: std::sync::atomic::AtomicUsize,
    }

    impl Oracle for Forgetful {
        fn solve(&self, request: &SolveRequest) -> std::result::Result<Outcome, OracleError> {
            if self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst) == 1 {
                let literals = vec![Literal::from_variable(Variable(1), false), Literal::from_variable(Variable(2), false)];
                return Ok(Outcome::Sat(Solution::try_from_literals(literals, 2).unwrap()));
            }
            BruteForce.solve(request)
        }
    }

    fn artifacts(dir: &Path) -> Artifacts {
        let artifacts = Artifacts::new(dir.join("out"), dir.join("logs"), "test".to_string());
        artifacts.prepare().unwrap();
        artifacts
    }

    #[test]
    fn enumerate_at_most_one() {
        // x1 + x2 + x3 <= 1 has 4 solutions
        let dir = tempfile::tempdir().unwrap();
        let artifacts = artifacts(dir.path());
        let formula = Formula::new(3, vec![], vec![Constraint::at_most([Variable(1), Variable(2), Variable(3)], 1)]);
        let mut stats = Statistics::<true>::default();
        let enumeration = enumerate(&BruteForce, formula, &artifacts, &mut stats).unwrap();
        assert_eq!(4, enumeration.solutions().len());
        assert_eq!(4, enumeration.refuted().index());
        assert_eq!(5, enumeration.refuted().formula().number_constraints());
        assert_eq!(5, stats.oracle_calls());
        for i in 0..=4 {
            assert!(artifacts.formula(i).is_file());
        }
        assert_eq!(&formula_from_file(enumeration.refuted().path()).unwrap(), enumeration.refuted().formula());
        assert_eq!(1, enumeration.original().formula().number_constraints());
    }

    #[test]
    fn unsatisfiable_formula_has_no_solution() {
        let dir = tempfile::tempdir().unwrap();
        let artifacts = artifacts(dir.path());
        let formula = Formula::new(1, vec![], vec![Constraint::fix(Variable(1), true), Constraint::fix(Variable(1), false)]);
        let mut stats = Statistics::<false>::default();
        let enumeration = enumerate(&BruteForce, formula, &artifacts, &mut stats).unwrap();
        assert!(enumeration.solutions().is_empty());
        assert_eq!(0, enumeration.refuted().index());
        assert_eq!(proof_path_of(&artifacts, 0), enumeration.proof().path());
    }

    fn proof_path_of(artifacts: &Artifacts, iteration: usize) -> PathBuf {
        crate::oracles::proof_path(&artifacts.proof_base(iteration))
    }

    #[test]
    fn oracle_failure_is_not_unsat() {
        let dir = tempfile::tempdir().unwrap();
        let artifacts = artifacts(dir.path());
        let formula = Formula::new(1, vec![], vec![]);
        let mut stats = Statistics::<false>::default();
        assert!(matches!(enumerate(&Broken, formula, &artifacts, &mut stats), Err(Error::Oracle(_))));
    }

    #[test]
    fn solution_violating_its_formula_is_reported() {
        // x1 + x2 <= 1 has 3 solutions, the first one found (all false) is returned again
        let dir = tempfile::tempdir().unwrap();
        let artifacts = artifacts(dir.path());
        let formula = Formula::new(2, vec![], vec![Constraint::at_most([Variable(1), Variable(2)], 1)]);
        let mut stats = Statistics::<false>::default();
        let oracle = Forgetful { calls: std::sync::atomic::AtomicUsize::new(0) };
        let enumeration = enumerate(&oracle, formula, &artifacts, &mut stats).unwrap();
        assert_eq!(vec![1], enumeration.inconsistent().to_vec());
        assert_eq!(4, enumeration.solutions().len());
        assert_eq!(enumeration.solutions()[0], enumeration.solutions()[1]);
    }

    #[test]
    fn correct_oracle_is_consistent() {
        let dir = tempfile::tempdir().unwrap();
        let artifacts = artifacts(dir.path());
        let formula = Formula::new(2, vec![], vec![Constraint::at_most([Variable(1), Variable(2)], 1)]);
        let mut stats = Statistics::<false>::default();
        let enumeration = enumerate(&BruteForce, formula, &artifacts, &mut stats).unwrap();
        assert!(enumeration.inconsistent().is_empty());
    }
}
