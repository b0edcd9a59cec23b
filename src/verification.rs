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

//! Independent checks of an enumeration, all required before declaring it complete:
//!     1. the proof that the last formula is unsatisfiable is accepted by the checker;
//!     2. every recorded solution satisfies formula v0, both when evaluated in-process and when
//!        formula v0 restricted to that solution (one unit clause per variable) is given back to
//!        the oracle, which must return the same assignment;
//!     3. no solution was recorded twice. A duplicate is only reported, as it points to a bug in
//!        the oracle rather than to an invalid run.
//! The re-validations of step 2 are independent from each other and run on a thread pool.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rayon::prelude::*;
use rustc_hash::FxHashMap;
use tracing::{debug, info, warn};

use crate::artifacts::Artifacts;
use crate::core::solution::Solution;
use crate::enumeration::{Enumeration, FormulaVersion};
use crate::error::{Result, VerificationError};
use crate::oracles::{Checker, Oracle, Outcome, SolveRequest, Verdict};
use crate::statistics::Statistics;

/// Two recorded solutions that are equal
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DuplicateSolution {
    pub first: usize,
    pub second: usize,
}

/// Summary of a successful verification
#[derive(Debug)]
pub struct VerificationReport {
    revalidated: usize,
    duplicates: Vec<DuplicateSolution>,
}

impl VerificationReport {

    pub fn revalidated(&self) -> usize {
        self.revalidated
    }

    pub fn duplicates(&self) -> &[DuplicateSolution] {
        &self.duplicates
    }
}

/// Checks the proof that the formula is unsatisfiable. The checker's output goes to `log`.
pub fn check_refutation<C: Checker, const S: bool>(checker: &C, formula: &Path, proof: &Path, log: PathBuf, statistics: &mut Statistics<S>) -> Result<()> {
    let start = Instant::now();
    let verdict = checker.check(formula, proof, &log)?;
    statistics.checker(start.elapsed());
    match verdict {
        Verdict::Verified => {
            info!("refutation of {} verified", formula.display());
            Ok(())
        },
        Verdict::Rejected => Err(VerificationError::Refutation {
            formula: formula.to_path_buf(),
            proof: proof.to_path_buf(),
            log,
        }.into()),
    }
}

/// Re-validates the solution of the given index against formula v0
fn revalidate_one<O: Oracle>(oracle: &O, original: &FormulaVersion, index: usize, solution: &Solution, artifacts: &Artifacts) -> Result<Duration> {
    let path = artifacts.solution_formula(index);
    if let Some(constraint) = original.formula().first_violated(solution) {
        return Err(VerificationError::ViolatedConstraint {
            index,
            formula: original.path().to_path_buf(),
            constraint: constraint.to_string(),
        }.into());
    }
    let fixed = original.formula().with_constraints(solution.unit_clauses());
    fixed.write_to(&path)?;
    let proof_base = artifacts.solution_proof_base(index);
    let log = artifacts.solution_log(index);
    let request = SolveRequest::new(&path, fixed.number_variables(), &proof_base, &log);
    let start = Instant::now();
    let outcome = oracle.solve(&request)?;
    let elapsed = start.elapsed();
    match outcome {
        Outcome::Sat(found) if found == *solution => {
            debug!("solution {} re-validated", index);
            Ok(elapsed)
        },
        Outcome::Sat(found) => Err(VerificationError::SolutionMismatch {
            index,
            formula: path,
            expected: solution.to_string(),
            found: found.to_string(),
        }.into()),
        Outcome::Unsat(_) => Err(VerificationError::SolutionRejected {
            index,
            formula: path,
            log,
            solution: solution.to_string(),
        }.into()),
    }
}

/// Re-validates every solution against formula v0, using `jobs` threads. If several solutions
/// fail, the error of the lowest index is returned.
pub fn revalidate<O: Oracle, const S: bool>(oracle: &O, original: &FormulaVersion, solutions: &[Solution], artifacts: &Artifacts, jobs: usize, statistics: &mut Statistics<S>) -> Result<usize> {
    let pool = rayon::ThreadPoolBuilder::new().num_threads(jobs.max(1)).build()?;
    let results = pool.install(|| {
        solutions.par_iter().enumerate().map(|(index, solution)| {
            revalidate_one(oracle, original, index, solution, artifacts)
        }).collect::<Vec<Result<Duration>>>()
    });
    for result in results {
        statistics.revalidated(result?);
    }
    info!("{} solutions re-validated against {}", solutions.len(), original.path().display());
    Ok(solutions.len())
}

/// Returns the pairs of equal solutions, each later index paired with the first occurrence
pub fn duplicates(solutions: &[Solution]) -> Vec<DuplicateSolution> {
    let mut first_seen: FxHashMap<&Solution, usize> = FxHashMap::default();
    let mut duplicates = vec![];
    for (index, solution) in solutions.iter().enumerate() {
        match first_seen.get(solution) {
            Some(first) => duplicates.push(DuplicateSolution { first: *first, second: index }),
            None => {
                first_seen.insert(solution, index);
            },
        }
    }
    duplicates
}

/// Runs the three checks on the enumeration
pub fn verify<O: Oracle, C: Checker, const S: bool>(oracle: &O, checker: &C, enumeration: &Enumeration, artifacts: &Artifacts, jobs: usize, statistics: &mut Statistics<S>) -> Result<VerificationReport> {
    let refuted = enumeration.refuted();
    check_refutation(checker, refuted.path(), enumeration.proof().path(), artifacts.verification_log(refuted.index()), statistics)?;
    let revalidated = revalidate(oracle, enumeration.original(), enumeration.solutions(), artifacts, jobs, statistics)?;
    let duplicates = duplicates(enumeration.solutions());
    for duplicate in duplicates.iter() {
        warn!("solution {} is a duplicate of solution {}", duplicate.second, duplicate.first);
    }
    Ok(VerificationReport { revalidated, duplicates })
}

#[cfg(test)]
mod test_verification {
    use super::*;
    use crate::core::constraint::Constraint;
    use crate::core::formula::Formula;
    use crate::core::literal::{Literal, Variable};
    use crate::error::{Error, OracleError};
    use crate::oracles::ProofHandle;

    fn solution(values: &[bool]) -> Solution {
        let literals = values.iter().enumerate().map(|(i, v)| Literal::from_variable(Variable(i + 1), *v)).collect();
        Solution::try_from_literals(literals, values.len()).unwrap()
    }

    /// Answers with a fixed outcome whatever the formula
    struct Constant(Option<Solution>);

    impl Oracle for Constant {
        fn solve(&self, request: &SolveRequest) -> std::result::Result<Outcome, OracleError> {
            match &self.0 {
                Some(s) => Ok(Outcome::Sat(s.clone())),
                None => Ok(Outcome::Unsat(ProofHandle::new(request.proof()))),
            }
        }
    }

    /// Returns, as the oracle would, the only assignment allowed by the unit clauses
    struct Echo;

    impl Oracle for Echo {
        fn solve(&self, request: &SolveRequest) -> std::result::Result<Outcome, OracleError> {
            let formula = crate::parsers::formula_from_file(request.formula()).unwrap();
            let n = formula.number_variables();
            let units = &formula.constraints()[formula.number_constraints() - n..];
            let literals = units.iter().map(|c| Literal::from_variable(c.terms()[0].variable(), c.rhs() == 1)).collect();
            let s = Solution::try_from_literals(literals, n).unwrap();
            if formula.is_satisfied_by(&s) {
                Ok(Outcome::Sat(s))
            } else {
                Ok(Outcome::Unsat(ProofHandle::new(request.proof())))
            }
        }
    }

    struct Fixed(Verdict);

    impl Checker for Fixed {
        fn check(&self, _formula: &Path, _proof: &Path, _log: &Path) -> std::result::Result<Verdict, OracleError> {
            Ok(self.0)
        }
    }

    fn setup(dir: &Path) -> (Artifacts, FormulaVersion) {
        let artifacts = Artifacts::new(dir.join("out"), dir.join("logs"), "test".to_string());
        artifacts.prepare().unwrap();
        let formula = Formula::new(2, vec![], vec![Constraint::at_least([Variable(1), Variable(2)], 1)]);
        let original = FormulaVersion::write(0, formula, &artifacts).unwrap();
        (artifacts, original)
    }

    #[test]
    fn revalidate_all_solutions() {
        let dir = tempfile::tempdir().unwrap();
        let (artifacts, original) = setup(dir.path());
        let solutions = vec![solution(&[true, false]), solution(&[false, true]), solution(&[true, true])];
        let mut stats = Statistics::<true>::default();
        assert_eq!(3, revalidate(&Echo, &original, &solutions, &artifacts, 2, &mut stats).unwrap());
        assert_eq!(3, stats.oracle_calls());
        let fixed = crate::parsers::formula_from_file(&artifacts.solution_formula(1)).unwrap();
        assert_eq!(3, fixed.number_constraints());
        assert_eq!("+1 x2 = 1 ;", format!("{}", fixed.constraints()[2]));
    }

    #[test]
    fn violated_solution_is_reported_with_lowest_index() {
        let dir = tempfile::tempdir().unwrap();
        let (artifacts, original) = setup(dir.path());
        let solutions = vec![solution(&[true, false]), solution(&[false, false]), solution(&[false, false])];
        let mut stats = Statistics::<false>::default();
        match revalidate(&Echo, &original, &solutions, &artifacts, 3, &mut stats) {
            Err(Error::Verification(VerificationError::ViolatedConstraint { index, .. })) => assert_eq!(1, index),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn oracle_must_confirm_the_solution() {
        let dir = tempfile::tempdir().unwrap();
        let (artifacts, original) = setup(dir.path());
        let solutions = vec![solution(&[true, false])];
        let mut stats = Statistics::<false>::default();
        let rejected = revalidate(&Constant(None), &original, &solutions, &artifacts, 1, &mut stats);
        assert!(matches!(rejected, Err(Error::Verification(VerificationError::SolutionRejected { index: 0, .. }))));
        let mismatch = revalidate(&Constant(Some(solution(&[true, true]))), &original, &solutions, &artifacts, 1, &mut stats);
        assert!(matches!(mismatch, Err(Error::Verification(VerificationError::SolutionMismatch { index: 0, .. }))));
    }

    #[test]
    fn refutation_needs_explicit_verdict() {
        let dir = tempfile::tempdir().unwrap();
        let (artifacts, original) = setup(dir.path());
        let proof = dir.path().join("test.proof");
        let mut stats = Statistics::<false>::default();
        let log = artifacts.verification_log(original.index());
        assert!(check_refutation(&Fixed(Verdict::Verified), original.path(), &proof, log.clone(), &mut stats).is_ok());
        let rejected = check_refutation(&Fixed(Verdict::Rejected), original.path(), &proof, log, &mut stats);
        assert!(matches!(rejected, Err(Error::Verification(VerificationError::Refutation { .. }))));
    }

    #[test]
    fn duplicates_are_found() {
        let solutions = vec![solution(&[true, false]), solution(&[false, true]), solution(&[true, false]), solution(&[true, false])];
        assert_eq!(vec![DuplicateSolution { first: 0, second: 2 }, DuplicateSolution { first: 0, second: 3 }], duplicates(&solutions));
        assert!(duplicates(&solutions[..2]).is_empty());
    }
}
