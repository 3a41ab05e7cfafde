//! Turns a normalized [`netcheck_model::Interaction`] into WS1S script text
//! and drives an external decision procedure over it.
//!
//! This crate owns the only two concerns the lower layers deliberately avoid:
//! subprocess I/O and concurrency. [`driver::check_all`] fans every property
//! an interaction names out across a `rayon` thread pool, reusing one
//! rendered base theory for all of them.

pub mod driver;
pub mod solver;
pub mod verdict;

pub use driver::{base_theory, check, check_all, property_script};
pub use solver::{MonaSolver, SolverHandle, SolverOutput};
pub use verdict::Verdict;
