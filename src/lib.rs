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

// Re-export the modules
pub mod core;
pub mod parsers;
pub mod encoder;
pub mod oracles;
pub mod enumeration;
pub mod verification;
pub mod artifacts;
pub mod parameters;
pub mod args;
pub mod statistics;
pub mod error;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::artifacts::Artifacts;
use crate::core::graph::Graph;
use crate::encoder::Encoding;
use crate::enumeration::Enumeration;
use crate::oracles::{Checker, Oracle};
use crate::parameters::Parameters;
use crate::statistics::Statistics;
use crate::verification::VerificationReport;

pub use crate::error::{Error, Result};

use peak_alloc::PeakAlloc;
#[global_allocator]
pub static PEAK_ALLOC: PeakAlloc = PeakAlloc;

/// Reads the network of the parameters
pub fn ingest(parameters: &Parameters) -> Result<Graph> {
    let graph = parsers::graph_from_file(parameters.network())?;
    info!("network {}: {} nodes, {} edges", parameters.network().display(), graph.number_nodes(), graph.number_edges());
    Ok(graph)
}

/// Reads the network and encodes it into formula v0
pub fn encode(parameters: &Parameters) -> Result<(Graph, Encoding)> {
    let graph = ingest(parameters)?;
    let encoding = encoder::encode(&graph, parameters)?;
    Ok((graph, encoding))
}

/// Writes the encoding of the network in `<output_dir>/<out_file>` and returns the path of the file
pub fn run_encode(parameters: &Parameters, out_file: Option<String>) -> Result<PathBuf> {
    let (_, encoding) = encode(parameters)?;
    let name = out_file.unwrap_or_else(|| format!("{}.opb", parameters.basename()));
    std::fs::create_dir_all(parameters.output_dir()).map_err(|source| Error::Artifact { path: parameters.output_dir().to_path_buf(), source })?;
    let path = parameters.output_dir().join(name);
    encoding.formula().write_to(&path)?;
    info!("formula written to {}", path.display());
    Ok(path)
}

/// Outcome of a verified enumeration
#[derive(Debug)]
pub struct EnumerationReport {
    enumeration: Enumeration,
    verification: VerificationReport,
    /// Labels of the nodes holding a sensor, for each solution
    sensors: Vec<Vec<String>>,
    solutions_file: PathBuf,
}

impl EnumerationReport {

    pub fn enumeration(&self) -> &Enumeration {
        &self.enumeration
    }

    pub fn verification(&self) -> &VerificationReport {
        &self.verification
    }

    pub fn sensors(&self) -> &[Vec<String>] {
        &self.sensors
    }

    pub fn solutions_file(&self) -> &Path {
        &self.solutions_file
    }
}

/// Writes one line per solution: its index, its literals and the nodes holding a sensor
fn write_solutions(path: &Path, enumeration: &Enumeration, sensors: &[Vec<String>]) -> Result<()> {
    let io_error = |source| Error::Artifact { path: path.to_path_buf(), source };
    let mut writer = BufWriter::new(File::create(path).map_err(io_error)?);
    for (i, (solution, labels)) in enumeration.solutions().iter().zip(sensors.iter()).enumerate() {
        writeln!(writer, "{:02}: {} | {}", i, solution, labels.join(" ")).map_err(io_error)?;
    }
    writer.flush().map_err(io_error)
}

/// Encodes the network, enumerates all the solutions of formula v0 and verifies the enumeration
pub fn run_enumeration<O: Oracle, C: Checker, const S: bool>(oracle: &O, checker: &C, parameters: &Parameters) -> Result<EnumerationReport> {
    let (graph, encoding) = encode(parameters)?;
    let artifacts = Artifacts::new(parameters.output_dir().to_path_buf(), parameters.log_dir().to_path_buf(), parameters.basename());
    artifacts.prepare()?;
    let mut statistics = Statistics::<S>::default();

    let enumeration = enumeration::enumerate(oracle, encoding.formula().clone(), &artifacts, &mut statistics)?;
    let verification = verification::verify(oracle, checker, &enumeration, &artifacts, parameters.jobs(), &mut statistics)?;

    let mapping = encoding.mapping();
    let sensors = enumeration.solutions().iter()
        .map(|s| mapping.sensors(s).into_iter().map(|n| graph.label(n).to_string()).collect::<Vec<String>>())
        .collect::<Vec<Vec<String>>>();
    let solutions_file = artifacts.solutions_file();
    write_solutions(&solutions_file, &enumeration, &sensors)?;
    statistics.print();
    Ok(EnumerationReport {
        enumeration,
        verification,
        sensors,
        solutions_file,
    })
}

/// Checks a proof of unsatisfiability of an existing formula. The formula is read first, so that
/// a malformed or stale file is reported before the checker runs.
pub fn run_verify<C: Checker>(checker: &C, formula: &Path, proof: &Path, parameters: &Parameters) -> Result<()> {
    parsers::formula_from_file(formula)?;
    std::fs::create_dir_all(parameters.log_dir()).map_err(|source| Error::Artifact { path: parameters.log_dir().to_path_buf(), source })?;
    let name = formula.file_stem().map(|n| n.to_string_lossy().into_owned()).unwrap_or_else(|| "formula".to_string());
    let log = parameters.log_dir().join(format!("{}.verification.log", name));
    let mut statistics = Statistics::<false>::default();
    verification::check_refutation(checker, formula, proof, log, &mut statistics)
}
