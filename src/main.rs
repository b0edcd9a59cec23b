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

use clap::Parser;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use idcodes::args::{Args, Command};
use idcodes::oracles::{RoundingSat, VeriPB};
use idcodes::parameters::Parameters;

fn run_enumeration<const S: bool>(parameters: &Parameters) -> anyhow::Result<()> {
    let oracle = RoundingSat::new(parameters.roundingsat().to_path_buf());
    let checker = VeriPB::new(parameters.veripb().to_path_buf());
    let report = idcodes::run_enumeration::<_, _, S>(&oracle, &checker, parameters)?;
    for (i, sensors) in report.sensors().iter().enumerate() {
        println!("solution {:02}: {}", i, sensors.join(" "));
    }
    println!("{} identifying codes with at most {} sensors", report.sensors().len(), parameters.budget().unwrap_or(0));
    println!("refutation of {} verified, {} solutions re-validated", report.enumeration().refuted().path().display(), report.verification().revalidated());
    if !report.enumeration().inconsistent().is_empty() {
        println!("WARNING: the oracle returned {} assignments violating their formula", report.enumeration().inconsistent().len());
    }
    if !report.verification().duplicates().is_empty() {
        println!("WARNING: {} duplicate solutions", report.verification().duplicates().len());
    }
    println!("solutions written to {}", report.solutions_file().display());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let parameters = args.parameters();
    match args.command {
        Command::Encode { out_file, .. } => {
            let path = idcodes::run_encode(&parameters, out_file)?;
            println!("{}", path.display());
        },
        Command::Enumerate { statistics, .. } => {
            if statistics {
                run_enumeration::<true>(&parameters)?;
            } else {
                run_enumeration::<false>(&parameters)?;
            }
        },
        Command::Verify { formula, proof, .. } => {
            let checker = VeriPB::new(parameters.veripb().to_path_buf());
            idcodes::run_verify(&checker, &formula, &proof, &parameters)?;
            println!("Verification succeeded");
        },
    }
    Ok(())
}
