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

//! Adapter for RoundingSAT. The solver is invoked as
//!
//! roundingsat --print-sol=1 --proof-log=<base> <formula>
//!
//! and prints, among comments, a status line `s SATISFIABLE` or `s UNSATISFIABLE` and, for a
//! satisfiable formula, the assignment on a `v ` line. The proof is always written to
//! `<base>.proof`. A proof left by an earlier run is removed before the solver starts, so that a
//! refutation is only reported for a proof written by this invocation.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use super::{parse_assignment, parse_status, write_log, Oracle, Outcome, ProofHandle, SolveRequest};
use crate::error::OracleError;

#[derive(Debug, Clone)]
pub struct RoundingSat {
    program: PathBuf,
}

impl RoundingSat {

    pub fn new(program: PathBuf) -> Self {
        Self { program }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Oracle for RoundingSat {

    fn solve(&self, request: &SolveRequest) -> Result<Outcome, OracleError> {
        let proof = request.proof();
        match std::fs::remove_file(&proof) {
            Ok(()) => debug!("removed stale proof {}", proof.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => (),
            Err(source) => return Err(OracleError::Io { path: proof, source }),
        }
        let mut proof_flag = OsString::from("--proof-log=");
        proof_flag.push(request.proof_base().as_os_str());
        debug!("running {} on {}", self.program.display(), request.formula().display());
        let output = Command::new(&self.program)
            .arg("--print-sol=1")
            .arg(&proof_flag)
            .arg(request.formula())
            .stdin(Stdio::null())
            .output()
            .map_err(|source| OracleError::Spawn { program: self.program.clone(), source })?;
        let stdout = write_log(&output, request.log())?;

        if let Some(assignment) = parse_assignment(&stdout, request.number_variables()) {
            let solution = assignment.map_err(|source| OracleError::MalformedAssignment { log: request.log().to_path_buf(), source })?;
            return Ok(Outcome::Sat(solution));
        }
        if parse_status(&stdout) == Some("UNSATISFIABLE") && proof.is_file() {
            return Ok(Outcome::Unsat(ProofHandle::new(proof)));
        }
        Err(OracleError::NoVerdict {
            program: self.program.clone(),
            formula: request.formula().to_path_buf(),
            log: request.log().to_path_buf(),
            status: output.status,
        })
    }
}
