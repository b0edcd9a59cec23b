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

//! Narrow typed interface to the external programs. The enumeration and the verification only see
//! `Oracle::solve`, which answers with a solution or a refutation, and `Checker::check`, which
//! answers with a verdict. How the answers are scraped from the programs' outputs stays in the
//! adapters of this module.

pub mod roundingsat;
pub mod veripb;

use std::ffi::OsString;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Output;

use crate::core::literal::Literal;
use crate::core::solution::Solution;
use crate::error::{AssignmentError, OracleError};

pub use roundingsat::RoundingSat;
pub use veripb::VeriPB;

/// Location of a refutation written by the oracle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofHandle {
    path: PathBuf,
}

impl ProofHandle {

    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Answer of the oracle on a formula
#[derive(Debug, Clone)]
pub enum Outcome {
    Sat(Solution),
    Unsat(ProofHandle),
}

/// One invocation of the oracle: the formula to solve, where to write the proof and the log
#[derive(Debug, Clone, Copy)]
pub struct SolveRequest<'a> {
    formula: &'a Path,
    number_variables: usize,
    proof_base: &'a Path,
    log: &'a Path,
}

impl<'a> SolveRequest<'a> {

    pub fn new(formula: &'a Path, number_variables: usize, proof_base: &'a Path, log: &'a Path) -> Self {
        Self {
            formula,
            number_variables,
            proof_base,
            log,
        }
    }

    pub fn formula(&self) -> &'a Path {
        self.formula
    }

    pub fn number_variables(&self) -> usize {
        self.number_variables
    }

    /// Returns the prefix of the proof file. The proof itself is written at `<base>.proof`
    pub fn proof_base(&self) -> &'a Path {
        self.proof_base
    }

    pub fn proof(&self) -> PathBuf {
        proof_path(self.proof_base)
    }

    pub fn log(&self) -> &'a Path {
        self.log
    }
}

/// A decision procedure for pseudo-Boolean formulas. An implementation must never report
/// unsatisfiability without a proof, and must return an error when it reaches no verdict.
pub trait Oracle: Sync {
    fn solve(&self, request: &SolveRequest) -> Result<Outcome, OracleError>;
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Verdict {
    Verified,
    Rejected,
}

/// An independent checker of unsatisfiability proofs
pub trait Checker: Sync {
    fn check(&self, formula: &Path, proof: &Path, log: &Path) -> Result<Verdict, OracleError>;
}

/// Returns `<base>.proof`. The base may already contain dots, so the extension is appended rather
/// than substituted.
pub fn proof_path(base: &Path) -> PathBuf {
    let mut path = OsString::from(base.as_os_str());
    path.push(".proof");
    PathBuf::from(path)
}

/// Extracts the assignment printed on the `v ` lines of the output, if any. Returns an error if
/// the printed literals are not a total assignment of the variables.
pub fn parse_assignment(output: &str, number_variables: usize) -> Option<Result<Solution, AssignmentError>> {
    let mut lines = output.lines().filter(|l| l.starts_with("v ") || *l == "v").peekable();
    lines.peek()?;
    let mut literals: Vec<Literal> = vec![];
    for token in lines.flat_map(|l| l[1..].split_whitespace()) {
        match token.parse::<Literal>() {
            Ok(literal) => literals.push(literal),
            Err(e) => return Some(Err(e)),
        }
    }
    Some(Solution::try_from_literals(literals, number_variables))
}

/// Returns the status printed on the `s ` line of the output, if any (e.g. `UNSATISFIABLE`)
pub fn parse_status(output: &str) -> Option<&str> {
    output.lines().find_map(|l| l.strip_prefix("s ")).map(|s| s.trim())
}

/// Writes the standard output then the standard error of a finished program into its log, and
/// returns the standard output
fn write_log(output: &Output, log: &Path) -> Result<String, OracleError> {
    let io_error = |source| OracleError::Io { path: log.to_path_buf(), source };
    let mut file = File::create(log).map_err(io_error)?;
    file.write_all(&output.stdout).map_err(io_error)?;
    file.write_all(&output.stderr).map_err(io_error)?;
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
