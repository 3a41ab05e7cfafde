//! Shared fixtures for the seed scenarios: the interaction sources from
//! `spec.md` §8, written in `netcheck-frontend`'s reference syntax.

use std::time::Duration;

use netcheck_driver::{SolverHandle, SolverOutput};
use netcheck_model::Interaction;

/// S1 — single mutex-style component: `P` with `{idle, crit}`, one clause
/// per port (`enter`, `leave`), and the `nomutex` property asserting two
/// distinct participants can both be in `crit`.
pub const MUTEX_SOURCE: &str = r#"
    component P {
        initial idle;
        idle -enter-> crit;
        crit -leave-> idle;
    }

    clause {
        enter(x);
    }

    clause {
        leave(x);
    }

    property "nomutex": "ex1 x, y. x ~= y & x in crit & y in crit";
"#;

/// S2 — a 2-phase ring: every participant of one replicated component
/// advances through its two phases in lockstep via a broadcast rendezvous.
/// `deadlock` is the reserved system-wide property; this scenario only
/// needs the script to be generated, not a fixed verdict (the real verdict
/// depends on the model and the solver).
pub const RING_SOURCE: &str = r#"
    component Node {
        initial phase0;
        phase0 -step1-> phase1;
        phase1 -step2-> phase0;
    }

    clause {
        broadcast q: step1(q);
    }

    clause {
        broadcast q: step2(q);
    }
"#;

pub fn parse(source: &str) -> Interaction {
    netcheck_frontend::parse_interaction(source).expect("fixture source must parse")
}

/// A canned [`SolverHandle`] for integration tests that need to drive
/// `netcheck-driver::check`/`check_all` without a real MONA binary on
/// `PATH`. Mirrors `netcheck-driver`'s own (crate-private) `FakeSolver`.
pub struct FakeSolver {
    pub stdout: String,
    pub exit_success: bool,
}

impl FakeSolver {
    pub fn unsatisfiable() -> Self {
        Self {
            stdout: "Formula is unsatisfiable\n".to_string(),
            exit_success: true,
        }
    }

    pub fn satisfiable() -> Self {
        Self {
            stdout: "A satisfying example of least length is:\n".to_string(),
            exit_success: true,
        }
    }

    pub fn crashed(message: impl Into<String>) -> Self {
        Self {
            stdout: message.into(),
            exit_success: false,
        }
    }
}

impl SolverHandle for FakeSolver {
    fn run(&self, _script: &str, _timeout: Duration) -> netcheck_base::Result<SolverOutput> {
        Ok(SolverOutput {
            stdout: self.stdout.clone(),
            stderr: String::new(),
            exit_success: self.exit_success,
        })
    }
}
