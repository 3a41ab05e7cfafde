//! netcheck CLI - Standalone binary
//!
//! This is the entry point for the `netcheck` command-line tool.
//!
//! The binary is a thin wrapper around [`netcheck_cli::run_cli`], handling
//! error display and exit codes. All command logic is implemented in the
//! library crate for testability.
//!
//! # Exit Codes
//!
//! - `0` - Success
//! - `1` - Error (message printed to stderr), or `--strict` checking found
//!   an unproven property / solver error

fn main() {
    if let Err(e) = netcheck_cli::run_cli() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
