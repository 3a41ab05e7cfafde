//! Classifies a solver's raw output into a verdict.
//!
//! The polarity here is load-bearing: MONA reporting a formula
//! unsatisfiable means the negated property holds of every reachable
//! marking, i.e. the property is proven. This direction must never be
//! inverted by a future refactor.

use crate::solver::SolverOutput;

const UNSATISFIABLE_MARKER: &str = "Formula is unsatisfiable";

/// The outcome of checking one property against a base theory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The solver reported the property's negation unsatisfiable: the
    /// property is proven unreachable.
    Proven,
    /// The solver ran to completion but did not report unsatisfiability.
    NotProven,
    /// The solver exited non-zero, or its output could not be classified.
    SolverError(String),
}

impl Verdict {
    pub fn classify(output: &SolverOutput) -> Verdict {
        if !output.exit_success {
            return Verdict::SolverError(if output.stderr.trim().is_empty() {
                output.stdout.trim().to_string()
            } else {
                output.stderr.trim().to_string()
            });
        }
        if output.stdout.contains(UNSATISFIABLE_MARKER) {
            Verdict::Proven
        } else {
            Verdict::NotProven
        }
    }

    pub fn is_proven(&self) -> bool {
        matches!(self, Verdict::Proven)
    }
}
