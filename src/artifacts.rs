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

//! Naming of the files produced by a run. Every formula version, proof and log is kept, so that any
//! step can be replayed by hand. With `<base>` the run's basename:
//!
//! <out>/<base>.it_NN.opb                     formula version NN
//! <out>/<base>.it_NN.proof                   proof written while solving version NN
//! <log>/<base>.it_NN.solving.log             output of the solver on version NN
//! <log>/<base>.it_NN.verification.log        output of the checker on version NN
//! <out>/<base>.it_00.sol_NN.opb              version 0 fixed to solution NN
//! <log>/<base>.it_00.sol_NN.solving.log      output of the solver on that formula
//! <out>/<base>.solutions                     the solutions, in discovery order

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct Artifacts {
    output_dir: PathBuf,
    log_dir: PathBuf,
    basename: String,
}

impl Artifacts {

    pub fn new(output_dir: PathBuf, log_dir: PathBuf, basename: String) -> Self {
        Self {
            output_dir,
            log_dir,
            basename,
        }
    }

    /// Creates the output and log directories if needed
    pub fn prepare(&self) -> Result<()> {
        for dir in [&self.output_dir, &self.log_dir] {
            std::fs::create_dir_all(dir).map_err(|source| Error::Artifact { path: dir.clone(), source })?;
        }
        Ok(())
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn basename(&self) -> &str {
        &self.basename
    }

    fn iteration(&self, iteration: usize) -> String {
        format!("{}.it_{:02}", self.basename, iteration)
    }

    fn solution(&self, index: usize) -> String {
        format!("{}.sol_{:02}", self.iteration(0), index)
    }

    pub fn formula(&self, iteration: usize) -> PathBuf {
        self.output_dir.join(format!("{}.opb", self.iteration(iteration)))
    }

    pub fn proof_base(&self, iteration: usize) -> PathBuf {
        self.output_dir.join(self.iteration(iteration))
    }

    pub fn solving_log(&self, iteration: usize) -> PathBuf {
        self.log_dir.join(format!("{}.solving.log", self.iteration(iteration)))
    }

    pub fn verification_log(&self, iteration: usize) -> PathBuf {
        self.log_dir.join(format!("{}.verification.log", self.iteration(iteration)))
    }

    pub fn solution_formula(&self, index: usize) -> PathBuf {
        self.output_dir.join(format!("{}.opb", self.solution(index)))
    }

    pub fn solution_proof_base(&self, index: usize) -> PathBuf {
        self.output_dir.join(self.solution(index))
    }

    pub fn solution_log(&self, index: usize) -> PathBuf {
        self.log_dir.join(format!("{}.solving.log", self.solution(index)))
    }

    pub fn solutions_file(&self) -> PathBuf {
        self.output_dir.join(format!("{}.solutions", self.basename))
    }
}
