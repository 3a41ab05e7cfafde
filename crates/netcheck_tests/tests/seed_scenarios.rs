//! The end-to-end seed scenarios from `spec.md` §8 (S1-S6), exercised
//! through the full pipeline: `netcheck-frontend` parses and normalizes,
//! `netcheck-driver` renders and (against a [`common::FakeSolver`])
//! classifies.

mod common;

use std::time::Duration;

use netcheck_model::{Restriction, Term};

/// S1 - single mutex-style component: with `nomutex` asserting two distinct
/// participants both reach `crit`, an unsatisfiable solver result proves the
/// property unreachable.
#[test]
fn s1_mutex_nomutex_is_proven_unsatisfiable() {
    let interaction = common::parse(common::MUTEX_SOURCE);
    let solver = common::FakeSolver::unsatisfiable();
    let verdict = netcheck_driver::check(&interaction, "nomutex", &solver, None, Duration::from_secs(5)).unwrap();
    assert_eq!(verdict, netcheck_driver::Verdict::Proven);
}

/// S1 (continued) - the same interaction run through `check_all` reports
/// both the reserved `deadlock` property and `nomutex`, sorted.
#[test]
fn s1_mutex_check_all_covers_deadlock_and_nomutex() {
    let interaction = common::parse(common::MUTEX_SOURCE);
    let solver = common::FakeSolver::unsatisfiable();
    let results = netcheck_driver::check_all(&interaction, &solver, Duration::from_secs(5));
    let names: Vec<String> = results.iter().map(|(n, _)| n.clone()).collect();
    assert_eq!(names, vec!["deadlock".to_string(), "nomutex".to_string()]);
    assert!(results.iter().all(|(_, v)| v.as_ref().unwrap().is_proven()));
}

/// S2 - a 2-phase ring driven entirely by broadcasts: the `deadlock` script
/// must still render (no property-specific fragment is needed for the
/// reserved name), and a solver error on one property never poisons another.
#[test]
fn s2_ring_deadlock_script_renders_and_errors_are_isolated() {
    let interaction = common::parse(common::RING_SOURCE);
    let script = netcheck_driver::property_script(&interaction, "deadlock", None).unwrap();
    assert!(script.contains("pred deadlock"));
    assert!(script.trim_end().ends_with(';'));
    assert!(script.contains("deadlock("));
    // The obligation is "no reachable marking is a deadlock", not a bare
    // call to `deadlock` - it must existentially quantify a witness marking
    // and conjoin `marking` with `deadlock` over it (spec.md §4.5).
    let obligation = script.rsplit("\n\n").next().unwrap();
    assert!(obligation.trim_start().starts_with("ex2"));
    assert!(obligation.contains("marking("));

    let crashed = common::FakeSolver::crashed("mona: out of memory");
    let verdict = netcheck_driver::check(&interaction, "deadlock", &crashed, None, Duration::from_secs(5)).unwrap();
    match verdict {
        netcheck_driver::Verdict::SolverError(msg) => assert!(msg.contains("out of memory")),
        other => panic!("expected SolverError, got {other:?}"),
    }
}

/// S3 - `port(succ(x))` normalizes to `port(succ_x_0)` with an added
/// `IsNext(x_0, succ_x_0)` guard atom.
#[test]
fn s3_successor_argument_lifts_to_a_fresh_variable() {
    let source = r#"
        component P {
            initial idle;
            idle -enter-> crit;
        }

        clause {
            enter(succ(x));
        }
    "#;
    let interaction = common::parse(source);
    let clause = &interaction.clauses[0];
    assert_eq!(clause.ports.predicates[0].argument, Term::var("succ_x_0"));
    assert!(clause
        .guard
        .0
        .contains(&Restriction::IsNext(Term::var("x_0"), Term::var("succ_x_0"))));
}

/// S4 - `port(0)` normalizes to `port(c_0)` with an added `Equal(c_0, 0)`
/// guard atom.
#[test]
fn s4_constant_argument_lifts_to_a_fresh_variable() {
    let source = r#"
        component P {
            initial idle;
            idle -enter-> crit;
        }

        clause {
            enter(0);
        }
    "#;
    let interaction = common::parse(source);
    let clause = &interaction.clauses[0];
    assert_eq!(clause.ports.predicates[0].argument, Term::var("c_0"));
    assert!(clause
        .guard
        .0
        .contains(&Restriction::Equal(Term::var("c_0"), Term::Constant(0))));
}

/// S5 - shadow-avoidance: two broadcasts over the same component, each
/// quantifying a variable distinct from the clause's own free variable `y`
/// (bound by a port), must both carry `Unequal(y, q)` in every DNF conjunct
/// of their guard.
#[test]
fn s5_shadow_avoidance_adds_inequalities_to_every_broadcast() {
    let source = r#"
        component Ring {
            initial s0;
            s0 -step1-> s1;
            s1 -step2-> s0;
        }

        clause {
            broadcast q1: step1(q1);
            broadcast q2: step2(q2);
            step1(y);
        }
    "#;
    let interaction = common::parse(source);
    let clause = &interaction.clauses[0];
    assert_eq!(clause.broadcasts.len(), 2);
    let y = Term::var("x_0");
    for broadcast in &clause.broadcasts {
        let required = Restriction::Unequal(y.clone(), Term::Variable(broadcast.variable.clone()));
        for conjunct in &broadcast.guard.0 {
            assert!(
                conjunct.contains(&required),
                "broadcast {} guard conjunct {:?} is missing {:?}",
                broadcast.variable,
                conjunct,
                required
            );
        }
    }
}

/// S6 - determinism: rendering the base theory twice for the same
/// interaction yields byte-identical output, and the emitted predicate names
/// match the per-clause plus system-wide set from `spec.md` §4.5.
#[test]
fn s6_base_theory_rendering_is_deterministic_and_complete() {
    let interaction = common::parse(common::MUTEX_SOURCE);
    let first = netcheck_driver::base_theory(&interaction);
    let second = netcheck_driver::base_theory(&interaction);
    assert_eq!(first, second);

    let defs = netcheck_synth::base_theory_definitions(&interaction);
    let names: Vec<&str> = defs.iter().map(|d| d.name.as_str()).collect();
    for clause_number in 1..=interaction.clauses.len() {
        assert!(names.contains(&format!("dead_transition_{clause_number}").as_str()));
        assert!(names.contains(&format!("trap_transition_{clause_number}").as_str()));
        assert!(names.contains(&format!("invariant_transition_{clause_number}").as_str()));
    }
    for system_wide in [
        "trap",
        "deadlock",
        "invariant",
        "intersection",
        "unique_intersection",
        "intersects_initial",
        "uniquely_intersects_initial",
        "trap_invariant",
        "flow_invariant",
        "marking",
    ] {
        assert!(names.contains(&system_wide), "missing system-wide predicate '{system_wide}'");
    }
}
