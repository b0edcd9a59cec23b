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

//! Error types of the pipeline. Each stage has its own error enum so that a failure can be traced
//! back to the stage (ingest, encoding, formula I/O, oracle invocation, verification) and to the
//! artifacts involved. All of them are fatal; nothing is retried.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

use crate::core::literal::Variable;

/// Result type alias for the whole pipeline
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error, wrapping the error of the stage that failed
#[derive(Debug, Error)]
pub enum Error {
    #[error("ingest failed")]
    Ingest(#[from] IngestError),
    #[error("encoding failed")]
    Encode(#[from] EncodeError),
    #[error("formula artifact error")]
    Formula(#[from] FormulaError),
    #[error("oracle invocation failed")]
    Oracle(#[from] OracleError),
    #[error("verification failed")]
    Verification(#[from] VerificationError),
    #[error("could not write artifact {}", .path.display())]
    Artifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not start the re-validation workers")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Errors raised while reading the network. No partial graph is ever returned.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("could not read network {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}:{line}: expected two node labels, found {content:?}", .path.display())]
    MalformedLine {
        path: PathBuf,
        line: usize,
        content: String,
    },
    #[error("network {} does not contain any edge", .path.display())]
    Empty { path: PathBuf },
}

/// Internal invariant violations detected while building the constraints or the renaming
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("nodes {first} and {second} are twins (equal closed neighbourhoods), no identifying code exists")]
    Twins { first: String, second: String },
    #[error("{parameter} {value} is too large to be written in a constraint")]
    OutOfRange { parameter: &'static str, value: usize },
    #[error("variable renaming is not a bijection: {variables} variables for {nodes} nodes")]
    InconsistentMapping { variables: usize, nodes: usize },
    #[error("node {0} has no variable in the renaming")]
    UnmappedNode(String),
}

/// Errors on formula files, either when writing a new version or when reading one back
#[derive(Debug, Error)]
pub enum FormulaError {
    #[error("could not access formula {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}: missing `* #variable= <n> #constraint= <m>` header", .path.display())]
    MissingHeader { path: PathBuf },
    #[error("{}:{line}: {reason}", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },
    #[error("{}: header declares {declared} constraints but {actual} are present", .path.display())]
    HeaderMismatch {
        path: PathBuf,
        declared: usize,
        actual: usize,
    },
}

/// Reasons for which a set of literals is not a total assignment
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssignmentError {
    #[error("variable {0} is outside of the declared variables")]
    UnknownVariable(Variable),
    #[error("variable {0} is assigned twice")]
    DuplicateVariable(Variable),
    #[error("variable {0} is not assigned")]
    MissingVariable(Variable),
    #[error("could not parse literal {0:?}")]
    InvalidLiteral(String),
}

/// The external decision procedure (or checker) could not be run, or ran without producing a
/// usable answer. This is never interpreted as unsatisfiability.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("could not run {}", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not access {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} produced neither an assignment nor a refutation for {} ({status}), see {}", .program.display(), .formula.display(), .log.display())]
    NoVerdict {
        program: PathBuf,
        formula: PathBuf,
        log: PathBuf,
        status: ExitStatus,
    },
    #[error("malformed assignment in {}", .log.display())]
    MalformedAssignment {
        log: PathBuf,
        #[source]
        source: AssignmentError,
    },
}

/// A recorded solution or the final refutation did not survive the independent checks
#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("could not verify that {} is unsatisfiable with proof {}, see {}", .formula.display(), .proof.display(), .log.display())]
    Refutation {
        formula: PathBuf,
        proof: PathBuf,
        log: PathBuf,
    },
    #[error("solution {index} violates constraint `{constraint}` of {}", .formula.display())]
    ViolatedConstraint {
        index: usize,
        formula: PathBuf,
        constraint: String,
    },
    #[error("solution {index} is not a solution of the original formula: {} is unsatisfiable (solution: {solution}), see {}", .formula.display(), .log.display())]
    SolutionRejected {
        index: usize,
        formula: PathBuf,
        log: PathBuf,
        solution: String,
    },
    #[error("solution {index} was not reproduced by {}: expected {expected}, found {found}", .formula.display())]
    SolutionMismatch {
        index: usize,
        formula: PathBuf,
        expected: String,
        found: String,
    },
}
