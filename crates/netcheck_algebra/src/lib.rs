//! The WS1S formula algebra: a sum-typed `Formula`, total `simplify`,
//! syntactic `negate`, and a `render` targeting the MONA decision
//! procedure's concrete surface syntax.
//!
//! This crate has no knowledge of components, clauses, or predicate
//! synthesis; [`netcheck_synth`](../netcheck_synth) builds `Formula` values
//! out of a normalized [`netcheck_model::Clause`].

pub mod formula;

pub use formula::{Formula, PredicateDefinition, SIZE_VARIABLE};
