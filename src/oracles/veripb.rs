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

//! Adapter for the VeriPB proof checker, invoked as `veripb <formula> <proof>`. A proof is only
//! accepted when the output contains the explicit success marker. A run without the marker is a
//! rejection, whatever its exit code.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use super::{write_log, Checker, Verdict};
use crate::error::OracleError;

pub const SUCCESS_MARKER: &str = "Verification succeeded.";

#[derive(Debug, Clone)]
pub struct VeriPB {
    program: PathBuf,
}

impl VeriPB {

    pub fn new(program: PathBuf) -> Self {
        Self { program }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Checker for VeriPB {

    fn check(&self, formula: &Path, proof: &Path, log: &Path) -> Result<Verdict, OracleError> {
        debug!("running {} on {} with proof {}", self.program.display(), formula.display(), proof.display());
        let output = Command::new(&self.program)
            .arg(formula)
            .arg(proof)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| OracleError::Spawn { program: self.program.clone(), source })?;
        let stdout = write_log(&output, log)?;
        let stderr = String::from_utf8_lossy(&output.stderr);
        if stdout.contains(SUCCESS_MARKER) || stderr.contains(SUCCESS_MARKER) {
            Ok(Verdict::Verified)
        } else {
            Ok(Verdict::Rejected)
        }
    }
}
