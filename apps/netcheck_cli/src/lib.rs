//! netcheck CLI (`netcheck`)
//!
//! Command-line interface driving the netcheck unreachability pipeline end
//! to end: parse an interaction description, synthesize the WS1S base
//! theory, and discharge each property to an external decision procedure.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `netcheck check` | Check properties of one or more interaction files |
//! | `netcheck render` | Print the rendered WS1S script instead of running a solver |
//!
//! # Module Structure
//!
//! - [`cli`] - Command-line argument parsing and dispatch

pub mod cli;

pub use cli::run_cli;
