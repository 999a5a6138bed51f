//! Netpath - Gate-Level Netlist Analyzer
//!
//! Loads a combinational gate-level Verilog netlist and reports its
//! structure, path counts or simulated values.
//!
//! # Usage
//!
//! ```bash
//! netpath info c17.v
//! netpath paths c17.v --json
//! netpath simulate c17.v --inputs N1=1,N2=0,N3=1,N6=1,N7=0
//! netpath scan benchmarks/
//! ```

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use netpath_core::{
    analysis::InputVector,
    circuit::validate_circuit,
    error::{NetpathError, Result},
    logging, scan, Session,
};

/// Gate-level netlist analyzer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show circuit name and node counts
    Info(FileArgs),
    /// List every node with its fanins and fanouts
    Adjacency(FileArgs),
    /// Count input-to-output paths
    Paths(FileArgs),
    /// Simulate the circuit for one input assignment
    Simulate {
        #[command(flatten)]
        file: FileArgs,

        /// Primary input values, e.g. `a=1,b=0,c=x`
        #[arg(short, long, value_name = "ASSIGNMENTS")]
        inputs: InputVector,
    },
    /// List the netlist files in a directory
    Scan {
        /// Directory to search
        #[arg(value_name = "DIR", default_value = ".")]
        dir: PathBuf,
    },
}

#[derive(clap::Args, Debug)]
struct FileArgs {
    /// Path to the netlist file (.v)
    #[arg(value_name = "NETLIST_FILE")]
    netlist: PathBuf,

    /// Emit the report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_tracing(args.verbose);

    match args.command {
        Command::Info(file) => {
            let session = open(&file.netlist)?;
            emit(&session.summary()?, file.json)
        }
        Command::Adjacency(file) => {
            let session = open(&file.netlist)?;
            emit(&session.adjacency()?, file.json)
        }
        Command::Paths(file) => {
            let session = open(&file.netlist)?;
            emit(&session.paths()?, file.json)
        }
        Command::Simulate { file, inputs } => {
            let session = open(&file.netlist)?;
            emit(&session.simulate(&inputs)?, file.json)
        }
        Command::Scan { dir } => {
            let files = scan::find_verilog_files(&dir)?;
            info!(dir = %dir.display(), count = files.len(), "scanned for netlists");
            for path in files {
                println!("{}", path.display());
            }
            Ok(())
        }
    }
}

/// Load and validate a netlist.
fn open(path: &Path) -> Result<Session> {
    let mut session = Session::new();
    let circuit = session.load(path)?;
    validate_circuit(circuit)?;
    Ok(session)
}

fn emit<T: Serialize + std::fmt::Display>(report: &T, json: bool) -> Result<()> {
    if json {
        let text = serde_json::to_string_pretty(report).map_err(|e| NetpathError::ReportError {
            message: e.to_string(),
        })?;
        println!("{}", text);
    } else {
        print!("{}", report);
    }
    Ok(())
}
