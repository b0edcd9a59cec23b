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

use std::path::{Path, PathBuf};

/// Configuration of one run of the pipeline. It is built once from the command line and only read
/// afterward.
#[derive(Debug, Clone)]
pub struct Parameters {
    /// The network, as an edge list
    network: PathBuf,
    /// Maximum number of sensors. If absent, no cardinality constraint is generated
    budget: Option<usize>,
    /// Number of sensors that may fail while the code stays identifying
    fault_tolerance: usize,
    /// If true, twin nodes are accepted (the encoding is then unsatisfiable) instead of rejected
    allow_twins: bool,
    /// Solving oracle executable
    roundingsat: PathBuf,
    /// Proof checker executable
    veripb: PathBuf,
    /// Directory in which the formulas, proofs and solutions are written
    output_dir: PathBuf,
    /// Directory in which the logs of the external invocations are written
    log_dir: PathBuf,
    /// Prefix of every artifact. Derived from the network and the budget when absent
    basename: Option<String>,
    /// Number of threads used to re-validate the solutions
    jobs: usize,
}

impl Parameters {

    pub fn new(network: PathBuf) -> Self {
        Self {
            network,
            ..Self::default()
        }
    }

    // --- SETTERS --- //

    pub fn set_budget(&mut self, budget: Option<usize>) {
        self.budget = budget;
    }

    pub fn set_fault_tolerance(&mut self, fault_tolerance: usize) {
        self.fault_tolerance = fault_tolerance;
    }

    pub fn set_allow_twins(&mut self, allow_twins: bool) {
        self.allow_twins = allow_twins;
    }

    pub fn set_roundingsat(&mut self, roundingsat: PathBuf) {
        self.roundingsat = roundingsat;
    }

    pub fn set_veripb(&mut self, veripb: PathBuf) {
        self.veripb = veripb;
    }

    pub fn set_output_dir(&mut self, output_dir: PathBuf) {
        self.output_dir = output_dir;
    }

    pub fn set_log_dir(&mut self, log_dir: PathBuf) {
        self.log_dir = log_dir;
    }

    pub fn set_basename(&mut self, basename: Option<String>) {
        self.basename = basename;
    }

    pub fn set_jobs(&mut self, jobs: usize) {
        self.jobs = jobs.max(1);
    }

    // --- GETTERS --- //

    pub fn network(&self) -> &Path {
        &self.network
    }

    pub fn budget(&self) -> Option<usize> {
        self.budget
    }

    pub fn fault_tolerance(&self) -> usize {
        self.fault_tolerance
    }

    pub fn allow_twins(&self) -> bool {
        self.allow_twins
    }

    pub fn roundingsat(&self) -> &Path {
        &self.roundingsat
    }

    pub fn veripb(&self) -> &Path {
        &self.veripb
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// Returns the prefix of the artifacts: the given basename, or `<network>.b_<budget>` with
    /// `.k_<k>` appended for a fault-tolerant code
    pub fn basename(&self) -> String {
        if let Some(name) = self.basename.as_ref() {
            return name.clone();
        }
        let network = self.network.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_else(|| "network".to_string());
        let mut name = match self.budget {
            Some(b) => format!("{}.b_{}", network, b),
            None => network,
        };
        if self.fault_tolerance > 0 {
            name.push_str(&format!(".k_{}", self.fault_tolerance));
        }
        name
    }
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            network: PathBuf::default(),
            budget: None,
            fault_tolerance: 0,
            allow_twins: false,
            roundingsat: PathBuf::from("roundingsat"),
            veripb: PathBuf::from("veripb"),
            output_dir: PathBuf::from("output"),
            log_dir: PathBuf::from("logs"),
            basename: None,
            jobs: 1,
        }
    }
}
