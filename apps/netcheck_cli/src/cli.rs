//! Command-line argument parsing and dispatch for `netcheck`.
//!
//! Built on [`clap`] with derive macros, following the same shape as other
//! subcommand-style tools: [`Cli`] parses the top-level invocation and
//! delegates to [`Commands`], whose variants each map to a `cmd_*` handler
//! below.
//!
//! # Examples
//!
//! ```bash
//! # Check every property of a file, printing one verdict line each
//! netcheck check system.nc
//!
//! # Check just one property and fail the process if it isn't proven
//! netcheck check system.nc --only nomutex --strict
//!
//! # Print the WS1S script instead of running a solver
//! netcheck render system.nc --property nomutex
//! ```

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use netcheck_base::NetcheckError;
use netcheck_driver::{MonaSolver, Verdict};
use netcheck_model::Interaction;

/// How long a single property check may run before it is classified a
/// solver error.
const DEFAULT_SOLVER_TIMEOUT: Duration = Duration::from_secs(30);

/// Command-line interface for the netcheck verifier.
///
/// Delegates to [`Commands`] for subcommand handling; see [`run_cli`] for
/// the entry point that parses `std::env::args` and dispatches.
#[derive(Parser)]
#[command(name = "netcheck")]
#[command(about = "Proves Petri-net-style unreachability properties of parameterized systems", long_about = None)]
#[command(version)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available `netcheck` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Check one or more interaction files against their properties.
    ///
    /// Parses each file with `netcheck-frontend`, builds the WS1S base
    /// theory once per file, and discharges every property (or, with
    /// `--only`, a single named one) to the solver named by `--solver`.
    Check {
        /// Interaction description files to check.
        files: Vec<PathBuf>,

        /// Check only this property instead of every property the file names.
        #[arg(long)]
        only: Option<String>,

        /// Exit non-zero if any checked property is not proven, or if the
        /// solver errors on any of them.
        #[arg(long)]
        strict: bool,

        /// Path to the MONA binary, or a bare name resolved from `PATH`.
        #[arg(long, default_value = "mona")]
        solver: String,
    },

    /// Render the WS1S script for a file without running a solver.
    ///
    /// Useful for debugging a base theory or piping a single property's
    /// script into a solver by hand.
    Render {
        /// Interaction description files to render.
        files: Vec<PathBuf>,

        /// Render only this property's script instead of the base theory.
        #[arg(long)]
        property: Option<String>,
    },
}

/// Entry point for the CLI: parses `std::env::args`, initializes logging
/// from `RUST_LOG`, and dispatches to the matched subcommand.
pub fn run_cli() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { files, only, strict, solver } => cmd_check(&files, only.as_deref(), strict, &solver),
        Commands::Render { files, property } => cmd_render(&files, property.as_deref()),
    }
}

fn read_interaction(path: &PathBuf) -> Result<Interaction, Box<dyn std::error::Error>> {
    let source = fs::read_to_string(path)?;
    Ok(netcheck_frontend::parse_interaction(&source)?)
}

fn cmd_check(
    files: &[PathBuf],
    only: Option<&str>,
    strict: bool,
    solver_path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let solver = MonaSolver::new(solver_path);
    let mut any_unproven = false;

    for path in files {
        let interaction = read_interaction(path)?;
        let results = match only {
            Some(name) => {
                let verdict = netcheck_driver::check(&interaction, name, &solver, None, DEFAULT_SOLVER_TIMEOUT);
                vec![(name.to_string(), verdict)]
            }
            None => netcheck_driver::check_all(&interaction, &solver, DEFAULT_SOLVER_TIMEOUT),
        };

        for (name, verdict) in results {
            match verdict {
                Ok(Verdict::Proven) => println!("{}: {name}: proven", path.display()),
                Ok(Verdict::NotProven) => {
                    any_unproven = true;
                    println!("{}: {name}: not proven", path.display());
                }
                Ok(Verdict::SolverError(msg)) => {
                    any_unproven = true;
                    println!("{}: {name}: solver error: {msg}", path.display());
                }
                Err(e) => {
                    any_unproven = true;
                    println!("{}: {name}: error: {e}", path.display());
                }
            }
        }
    }

    if strict && any_unproven {
        return Err(Box::new(NetcheckError::internal(
            "one or more properties were not proven under --strict",
        )));
    }
    Ok(())
}

fn cmd_render(files: &[PathBuf], property: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    for path in files {
        let interaction = read_interaction(path)?;
        let text = match property {
            Some(name) => netcheck_driver::property_script(&interaction, name, None)?,
            None => netcheck_driver::base_theory(&interaction),
        };
        println!("{text}");
    }
    Ok(())
}
