//! # netcheck-base
//!
//! Pure structural atoms for the netcheck ecosystem: the error vocabulary
//! shared by every crate in the workspace, and the determinism helpers used
//! anywhere a mathematical set is represented in memory but must be emitted
//! in a stable order.
//!
//! This crate has **no knowledge of components, formulas, or WS1S**. It
//! provides only generic, reusable infrastructure that higher-level crates
//! build upon.

pub mod error;
pub mod ordered;

pub use error::{NetcheckError, NetcheckErrorKind, Result};
pub use ordered::{sort_by_key_string, StableSet};
