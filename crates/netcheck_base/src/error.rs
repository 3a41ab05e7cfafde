//! Shared error vocabulary for the netcheck pipeline.
//!
//! Every crate in the workspace reports failures as a [`NetcheckError`]
//! carrying one of the [`NetcheckErrorKind`] variants named in the external
//! interface: parser-adjacent input errors, specification-level semantic
//! errors, solver errors, and internal invariant violations. Internal
//! invariant violations are never expected to surface in practice; their
//! presence indicates a bug in this crate, not in the caller's input.

use std::fmt;

/// Category of failure surfaced by the netcheck pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetcheckErrorKind {
    /// The front-end could not parse the input into an `Interaction`.
    ParseError,
    /// A predicate or broadcast body referenced a label with no matching edge.
    UnknownLabel,
    /// Two components of a system share a transition label.
    NotDisjointLabels,
    /// A component's initial state is not the source of any transition.
    MissingInitialTransition,
    /// Two transitions of one component share a label.
    LabelReused,
    /// A broadcast's body uses a variable outside its quantified set, or its
    /// port's variable does not match the broadcast's bound variable.
    BroadcastVariableMismatch,
    /// A broadcast's body predicates resolve to more than one component.
    InconsistentBroadcastType,
    /// The external decision procedure exited non-zero or produced output
    /// that could not be classified.
    SolverFailure,
    /// A consistency check that should be unreachable under well-formed
    /// input fired anyway; this is always a bug in this crate.
    InternalInvariantViolation,
}

impl fmt::Display for NetcheckErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NetcheckErrorKind::ParseError => "ParseError",
            NetcheckErrorKind::UnknownLabel => "UnknownLabel",
            NetcheckErrorKind::NotDisjointLabels => "NotDisjointLabels",
            NetcheckErrorKind::MissingInitialTransition => "MissingInitialTransition",
            NetcheckErrorKind::LabelReused => "LabelReused",
            NetcheckErrorKind::BroadcastVariableMismatch => "BroadcastVariableMismatch",
            NetcheckErrorKind::InconsistentBroadcastType => "InconsistentBroadcastType",
            NetcheckErrorKind::SolverFailure => "SolverFailure",
            NetcheckErrorKind::InternalInvariantViolation => "InternalInvariantViolation",
        };
        f.write_str(name)
    }
}

/// A structured error with the failing kind plus a human-readable
/// explanation. Callers needing the solver's verbatim stderr should read it
/// from `explanation`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetcheckError {
    pub kind: NetcheckErrorKind,
    pub explanation: String,
}

impl NetcheckError {
    pub fn new(kind: NetcheckErrorKind, explanation: impl Into<String>) -> Self {
        Self {
            kind,
            explanation: explanation.into(),
        }
    }

    pub fn parse(explanation: impl Into<String>) -> Self {
        Self::new(NetcheckErrorKind::ParseError, explanation)
    }

    pub fn unknown_label(label: impl Into<String>) -> Self {
        Self::new(
            NetcheckErrorKind::UnknownLabel,
            format!("no transition is labeled '{}'", label.into()),
        )
    }

    pub fn not_disjoint_labels(label: impl Into<String>) -> Self {
        Self::new(
            NetcheckErrorKind::NotDisjointLabels,
            format!("label '{}' is used by more than one component", label.into()),
        )
    }

    pub fn missing_initial_transition(component: impl Into<String>, state: impl Into<String>) -> Self {
        Self::new(
            NetcheckErrorKind::MissingInitialTransition,
            format!(
                "component '{}' has initial state '{}' which is not the source of any transition",
                component.into(),
                state.into()
            ),
        )
    }

    pub fn label_reused(component: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(
            NetcheckErrorKind::LabelReused,
            format!(
                "component '{}' reuses label '{}' on more than one transition",
                component.into(),
                label.into()
            ),
        )
    }

    pub fn broadcast_variable_mismatch(explanation: impl Into<String>) -> Self {
        Self::new(NetcheckErrorKind::BroadcastVariableMismatch, explanation)
    }

    pub fn inconsistent_broadcast_type(explanation: impl Into<String>) -> Self {
        Self::new(NetcheckErrorKind::InconsistentBroadcastType, explanation)
    }

    pub fn solver_failure(stderr: impl Into<String>) -> Self {
        Self::new(NetcheckErrorKind::SolverFailure, stderr)
    }

    pub fn internal(explanation: impl Into<String>) -> Self {
        Self::new(NetcheckErrorKind::InternalInvariantViolation, explanation)
    }
}

impl fmt::Display for NetcheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.explanation)
    }
}

impl std::error::Error for NetcheckError {}

/// Alias for `std::result::Result<T, NetcheckError>`.
pub type Result<T> = std::result::Result<T, NetcheckError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind_and_explanation() {
        let err = NetcheckError::unknown_label("enter");
        let text = err.to_string();
        assert!(text.contains("UnknownLabel"));
        assert!(text.contains("enter"));
    }

    #[test]
    fn kinds_compare_by_variant_not_payload() {
        assert_eq!(
            NetcheckError::unknown_label("a").kind,
            NetcheckError::unknown_label("b").kind
        );
    }
}
