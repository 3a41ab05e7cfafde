//! Predicate synthesis: builds the WS1S predicate definitions that justify
//! a structural unreachability argument out of a normalized
//! [`netcheck_model::Interaction`].
//!
//! This crate has no knowledge of the solver or of file I/O; it only
//! produces [`netcheck_algebra::PredicateDefinition`] values.

pub mod synth;

pub use synth::{
    base_theory_definitions, conjunct_as_ws1s, dead_transition, deadlock, deadlock_property_definition,
    flow_invariant, guard_as_ws1s, hit_post, hit_pre, initially_marked_trap, initially_uniquely_marked_flow,
    intersection, intersects_initial, invariant, invariant_transition, marking, miss_post, miss_pre,
    property_check_call, property_definition, trap, trap_invariant, trap_transition, unique_intersection,
    uniquely_intersects_initial,
};
