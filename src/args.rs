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

use clap::{Parser, Subcommand};

use std::path::PathBuf;

use crate::parameters::Parameters;

#[derive(Debug, Parser)]
#[clap(name="idcodes", version, author, about)]
pub struct Args {
    #[clap(subcommand)]
    pub command: Command,
    /// Log debug messages (the RUST_LOG variable is also honoured)
    #[clap(short, long, global=true, action)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Writes the formula encoding the identifying codes of a network
    Encode {
        /// The network, as an edge list
        #[clap(short, long, value_parser)]
        network: PathBuf,
        /// Maximum number of sensors. If absent, the number of sensors is not bounded
        #[clap(short, long)]
        budget: Option<usize>,
        /// Number of sensors that may fail
        #[clap(short='k', long, default_value_t=0)]
        fault_tolerance: usize,
        /// Accept twin nodes instead of rejecting the network
        #[clap(long, action)]
        allow_twins: bool,
        /// Directory in which the formula is written
        #[clap(long, default_value="output")]
        out_dir: PathBuf,
        /// Name of the formula file. Defaults to `<network>.b_<budget>.opb`
        #[clap(long)]
        out_file: Option<String>,
    },
    /// Enumerates and verifies all the identifying codes within the budget
    Enumerate {
        /// The network, as an edge list
        #[clap(short, long, value_parser)]
        network: PathBuf,
        /// Maximum number of sensors
        #[clap(short, long)]
        budget: usize,
        /// Number of sensors that may fail
        #[clap(short='k', long, default_value_t=0)]
        fault_tolerance: usize,
        /// Accept twin nodes instead of rejecting the network
        #[clap(long, action)]
        allow_twins: bool,
        /// The solver executable
        #[clap(long, default_value="roundingsat")]
        roundingsat: PathBuf,
        /// The proof checker executable
        #[clap(long, default_value="veripb")]
        veripb: PathBuf,
        /// Directory in which the formulas, proofs and solutions are written
        #[clap(long, default_value="output")]
        out_dir: PathBuf,
        /// Directory in which the solver and checker logs are written
        #[clap(long, default_value="logs")]
        log_dir: PathBuf,
        /// Prefix of the produced files. Defaults to `<network>.b_<budget>`
        #[clap(long)]
        basename: Option<String>,
        /// Number of threads used to re-validate the solutions
        #[clap(short, long, default_value_t=1)]
        jobs: usize,
        /// Collect and print statistics about the run
        #[clap(long, action)]
        statistics: bool,
    },
    /// Checks that a formula is unsatisfiable with the given proof
    Verify {
        /// The formula
        #[clap(short, long, value_parser)]
        formula: PathBuf,
        /// The proof of unsatisfiability
        #[clap(short, long, value_parser)]
        proof: PathBuf,
        /// The proof checker executable
        #[clap(long, default_value="veripb")]
        veripb: PathBuf,
        /// Directory in which the checker log is written
        #[clap(long, default_value="logs")]
        log_dir: PathBuf,
    },
}

impl Args {

    /// Returns the parameters of the run described by the command line
    pub fn parameters(&self) -> Parameters {
        match &self.command {
            Command::Encode { network, budget, fault_tolerance, allow_twins, out_dir, out_file: _ } => {
                let mut parameters = Parameters::new(network.clone());
                parameters.set_budget(*budget);
                parameters.set_fault_tolerance(*fault_tolerance);
                parameters.set_allow_twins(*allow_twins);
                parameters.set_output_dir(out_dir.clone());
                parameters
            },
            Command::Enumerate { network, budget, fault_tolerance, allow_twins, roundingsat, veripb, out_dir, log_dir, basename, jobs, statistics: _ } => {
                let mut parameters = Parameters::new(network.clone());
                parameters.set_budget(Some(*budget));
                parameters.set_fault_tolerance(*fault_tolerance);
                parameters.set_allow_twins(*allow_twins);
                parameters.set_roundingsat(roundingsat.clone());
                parameters.set_veripb(veripb.clone());
                parameters.set_output_dir(out_dir.clone());
                parameters.set_log_dir(log_dir.clone());
                parameters.set_basename(basename.clone());
                parameters.set_jobs(*jobs);
                parameters
            },
            Command::Verify { formula, proof: _, veripb, log_dir } => {
                let mut parameters = Parameters::new(formula.clone());
                parameters.set_veripb(veripb.clone());
                parameters.set_log_dir(log_dir.clone());
                parameters
            },
        }
    }
}
