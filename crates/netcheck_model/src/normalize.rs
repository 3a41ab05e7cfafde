//! The clause normalizer (spec'd in the component design as §4.3): rewrites
//! a clause into the canonical shape the predicate synthesizer expects.
//!
//! Canonical shape:
//! - every port/broadcast-body predicate's argument is a `Variable`,
//! - every non-trivial argument term has been lifted into a fresh variable
//!   constrained by synthesized `Equal`/`IsNext` restrictions,
//! - free variables are renamed `x_0, x_1, …` in lexicographic order of
//!   their original name,
//! - the j-th broadcast's bound variable is renamed `b_j` (0-indexed, so the
//!   first broadcast's variable becomes `b_0`),
//! - every DNF conjunct of a broadcast's guard carries the `Unequal(free_v,
//!   q_v)` atoms required by shadow-avoidance.
//!
//! Normalizing an already-normalized clause is a no-op (idempotence): the
//! canonical names are fixed points of the renaming step, and no term in a
//! normalized clause has anything left to lift.

use crate::ast::{Broadcast, Clause, PredicateCollection};
use crate::component::System;
use crate::restriction::Restriction;
use crate::term::{Substitution, Term, Variable};
use netcheck_base::{sort_by_key_string, NetcheckError, Result, StableSet};
use std::collections::HashMap;

/// Checks the contract in `spec.md` §3: every variable occurring in a
/// broadcast's body must be one of its quantified variables (the bound
/// `variable` itself, or one of `quantified_variables`). Run before any
/// other normalization step, since normalization's own renaming would
/// otherwise silently absorb a mismatched variable into the substitution.
fn validate_broadcast_variables(broadcast: &Broadcast) -> Result<()> {
    let quantified = broadcast.all_quantified_variables();
    for predicate in &broadcast.body.predicates {
        for v in predicate.argument.variables().iter() {
            if !quantified.contains(v) {
                return Err(NetcheckError::broadcast_variable_mismatch(format!(
                    "broadcast body predicate '{}' uses variable '{}' which is not quantified by this broadcast",
                    predicate.name,
                    v.name()
                )));
            }
        }
    }
    Ok(())
}

/// `succ_*`/`c_*` names are reserved (`spec.md` §6) for the representative
/// variable a `Successor`/`Constant` term is lifted into; once synthesized, a
/// representative's name is permanently derived from the canonical name of
/// the term it stands for. Treating it as an ordinary free variable eligible
/// for `x_i` renumbering would reshuffle it on a second normalization pass
/// (its name can sort ahead of or behind the `x_i` it was derived from),
/// breaking idempotence. These names are therefore excluded from the
/// renumbering pool and kept as fixed points.
fn is_synthesized_representative(v: &Variable) -> bool {
    v.name().starts_with("succ_") || v.name().starts_with("c_")
}

pub fn normalize_clause(system: &System, clause: &Clause) -> Result<Clause> {
    for broadcast in &clause.broadcasts {
        validate_broadcast_variables(broadcast)?;
    }

    let free_vars = sort_by_key_string(
        clause
            .free_variables()
            .into_vec()
            .into_iter()
            .filter(|v| !is_synthesized_representative(v))
            .collect::<Vec<_>>(),
        |v| v.name().to_string(),
    );

    let mut subst: Substitution = Substitution::new();
    for (i, v) in free_vars.iter().enumerate() {
        subst.insert(v.clone(), Variable::new(format!("x_{i}")));
    }

    let mut lifted_restrictions: Vec<Restriction> = Vec::new();
    for term in clause.local_terms().into_iter().chain(clause.constant_terms()) {
        lifted_restrictions.extend(term.normalizing_restrictions(&subst));
    }

    let new_guard = clause.guard.rename(&subst).extended_with(lifted_restrictions);

    let new_ports = PredicateCollection {
        intent: clause.ports.intent,
        predicates: clause
            .ports
            .predicates
            .iter()
            .map(|p| p.with_argument(Term::Variable(p.argument.to_variable(&subst))))
            .collect(),
    };

    let mut new_broadcasts = Vec::with_capacity(clause.broadcasts.len());
    for (j, broadcast) in clause.broadcasts.iter().enumerate() {
        new_broadcasts.push(normalize_broadcast(j, broadcast, &subst)?);
    }

    let new_free_vars: Vec<Variable> = (0..free_vars.len()).map(|i| Variable::new(format!("x_{i}"))).collect();
    let var_component = free_variable_components(system, &new_ports);

    for broadcast in new_broadcasts.iter_mut() {
        apply_shadow_avoidance(system, broadcast, &new_free_vars, &var_component)?;
    }

    Ok(Clause {
        guard: new_guard,
        ports: new_ports,
        broadcasts: new_broadcasts,
        index: clause.index,
    })
}

fn normalize_broadcast(index: usize, broadcast: &Broadcast, outer: &Substitution) -> Result<Broadcast> {
    let mut subst = outer.clone();
    let canonical_variable = Variable::new(format!("b_{index}"));
    subst.insert(broadcast.variable.clone(), canonical_variable.clone());

    let mut lifted_restrictions: Vec<Restriction> = Vec::new();
    for term in broadcast.local_terms() {
        if !matches!(term, Term::Variable(_)) {
            lifted_restrictions.extend(term.normalizing_restrictions(&subst));
        }
    }

    let renamed_guard = broadcast.guard.rename(&subst);
    let new_guard = renamed_guard.extend_all_conjuncts(&lifted_restrictions);

    let new_body = PredicateCollection {
        intent: broadcast.body.intent,
        predicates: broadcast
            .body
            .predicates
            .iter()
            .map(|p| p.with_argument(Term::Variable(p.argument.to_variable(&subst))))
            .collect(),
    };

    let new_quantified_variables: Vec<Variable> = broadcast
        .quantified_variables
        .iter()
        .map(|v| subst.get(v).cloned().unwrap_or_else(|| v.clone()))
        .collect();

    Ok(Broadcast {
        variable: canonical_variable,
        guard: new_guard,
        body: new_body,
        quantified_variables: new_quantified_variables,
        index: broadcast.index,
    })
}

/// Maps each (already-renamed) free variable to the name of the component it
/// participates in, determined by the clause's own ports. A free variable
/// never used as a port argument has no recorded component and is therefore
/// exempt from shadow-avoidance (the spec does not define an owning
/// component for it).
fn free_variable_components(system: &System, ports: &PredicateCollection) -> HashMap<Variable, String> {
    let mut map = HashMap::new();
    for predicate in &ports.predicates {
        if let Term::Variable(v) = &predicate.argument {
            if let Some(component) = system.component_of_label(&predicate.name) {
                map.entry(v.clone()).or_insert_with(|| component.name().to_string());
            }
        }
    }
    map
}

fn apply_shadow_avoidance(
    system: &System,
    broadcast: &mut Broadcast,
    free_vars: &[Variable],
    var_component: &HashMap<Variable, String>,
) -> Result<()> {
    let component = broadcast.resolve_component(system)?;
    let quantified = broadcast.all_quantified_variables();

    let mut required: Vec<Restriction> = Vec::new();
    for free_var in free_vars {
        if var_component.get(free_var).map(String::as_str) == Some(component.name()) {
            for q in quantified.iter() {
                required.push(Restriction::unequal(
                    Term::Variable(free_var.clone()),
                    Term::Variable(q.clone()),
                ));
            }
        }
    }

    if required.is_empty() {
        return Ok(());
    }

    let any_conjunct_missing_any = broadcast
        .guard
        .0
        .iter()
        .any(|conjunct| required.iter().any(|r| !conjunct.contains(r)));

    if any_conjunct_missing_any {
        broadcast.guard = broadcast.guard.extend_all_conjuncts(&required);
    }

    Ok(())
}

/// Re-normalizing a normalized clause must be a no-op: excluding the fixed
/// synthesized representatives (see [`is_synthesized_representative`]), the
/// remaining free-variable set is already `{x_0, .., x_{k-1}}`, so the
/// canonical renaming is the identity, and no predicate argument has
/// anything left to lift.
pub fn is_canonically_named(clause: &Clause) -> bool {
    let names: StableSet<String> = StableSet::from_iter_dedup(
        sort_by_key_string(
            clause
                .free_variables()
                .into_vec()
                .into_iter()
                .filter(|v| !is_synthesized_representative(v))
                .collect::<Vec<_>>(),
            |v| v.name().to_string(),
        )
        .into_iter()
        .map(|v| v.0),
    );
    let expected: Vec<String> = (0..names.len()).map(|i| format!("x_{i}")).collect();
    names.into_vec() == expected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{CollectionIntent, Predicate};
    use crate::component::Component;
    use crate::restriction::Dnf;

    fn single_component_system() -> System {
        let p = Component::new(
            "P",
            "idle",
            vec![
                ("idle".into(), "enter".into(), "crit".into()),
                ("crit".into(), "leave".into(), "idle".into()),
            ],
        )
        .unwrap();
        System::new(vec![p]).unwrap()
    }

    #[test]
    fn successor_lifting_adds_is_next_restriction() {
        let system = single_component_system();
        let predicate = Predicate::bind("enter", Term::succ(Term::var("x")), &system).unwrap();
        let clause = Clause {
            guard: crate::restriction::Conjunct::default(),
            ports: PredicateCollection {
                intent: CollectionIntent::Conjunctive,
                predicates: vec![predicate],
            },
            broadcasts: vec![],
            index: 0,
        };
        let normalized = normalize_clause(&system, &clause).unwrap();
        let arg = &normalized.ports.predicates[0].argument;
        assert_eq!(arg, &Term::var("succ_x_0"));
        assert!(normalized
            .guard
            .0
            .iter()
            .any(|r| matches!(r, Restriction::IsNext(_, _))));
    }

    #[test]
    fn constant_lifting_adds_equal_restriction() {
        let system = single_component_system();
        let predicate = Predicate::bind("enter", Term::Constant(0), &system).unwrap();
        let clause = Clause {
            guard: crate::restriction::Conjunct::default(),
            ports: PredicateCollection {
                intent: CollectionIntent::Conjunctive,
                predicates: vec![predicate],
            },
            broadcasts: vec![],
            index: 0,
        };
        let normalized = normalize_clause(&system, &clause).unwrap();
        let arg = &normalized.ports.predicates[0].argument;
        assert_eq!(arg, &Term::var("c_0"));
        assert!(normalized
            .guard
            .0
            .iter()
            .any(|r| matches!(r, Restriction::Equal(_, _))));
    }

    #[test]
    fn free_variables_are_renamed_in_lexicographic_order() {
        let system = single_component_system();
        let enter = Predicate::bind("enter", Term::var("zed"), &system).unwrap();
        let leave = Predicate::bind("leave", Term::var("alpha"), &system).unwrap();
        let clause = Clause {
            guard: crate::restriction::Conjunct::default(),
            ports: PredicateCollection {
                intent: CollectionIntent::Conjunctive,
                predicates: vec![enter, leave],
            },
            broadcasts: vec![],
            index: 0,
        };
        let normalized = normalize_clause(&system, &clause).unwrap();
        assert_eq!(normalized.ports.predicates[0].argument, Term::var("x_1"));
        assert_eq!(normalized.ports.predicates[1].argument, Term::var("x_0"));
    }

    #[test]
    fn broadcast_body_variable_outside_quantified_set_is_rejected() {
        let system = single_component_system();
        let predicate = Predicate::bind("enter", Term::var("y"), &system).unwrap();
        let broadcast = crate::ast::Broadcast {
            variable: Variable::new("q"),
            guard: Dnf::default(),
            body: PredicateCollection {
                intent: CollectionIntent::Conjunctive,
                predicates: vec![predicate],
            },
            quantified_variables: vec![],
            index: 0,
        };
        let clause = Clause {
            guard: crate::restriction::Conjunct::default(),
            ports: PredicateCollection {
                intent: CollectionIntent::Conjunctive,
                predicates: vec![],
            },
            broadcasts: vec![broadcast],
            index: 0,
        };
        let err = normalize_clause(&system, &clause).unwrap_err();
        assert_eq!(err.kind, netcheck_base::NetcheckErrorKind::BroadcastVariableMismatch);
    }

    #[test]
    fn normalizing_a_normalized_clause_is_idempotent() {
        let system = single_component_system();
        let predicate = Predicate::bind("enter", Term::succ(Term::var("x")), &system).unwrap();
        let clause = Clause {
            guard: crate::restriction::Conjunct::default(),
            ports: PredicateCollection {
                intent: CollectionIntent::Conjunctive,
                predicates: vec![predicate],
            },
            broadcasts: vec![],
            index: 0,
        };
        let once = normalize_clause(&system, &clause).unwrap();
        let twice = normalize_clause(&system, &once).unwrap();
        assert_eq!(once, twice);
        assert_eq!(once.ports.predicates[0].argument, Term::var("succ_x_0"));
        assert!(once
            .guard
            .0
            .contains(&Restriction::IsNext(Term::var("x_0"), Term::var("succ_x_0"))));
    }

    #[test]
    fn normalizing_a_normalized_clause_with_a_constant_argument_is_idempotent() {
        let system = single_component_system();
        let predicate = Predicate::bind("enter", Term::Constant(0), &system).unwrap();
        let clause = Clause {
            guard: crate::restriction::Conjunct::default(),
            ports: PredicateCollection {
                intent: CollectionIntent::Conjunctive,
                predicates: vec![predicate],
            },
            broadcasts: vec![],
            index: 0,
        };
        let once = normalize_clause(&system, &clause).unwrap();
        let twice = normalize_clause(&system, &once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn normalizing_a_normalized_clause_with_a_free_variable_and_a_successor_argument_is_idempotent() {
        // The exact shape that breaks a naive re-numbering: after the first
        // pass, `free_variables()` contains both `x_0` and `succ_x_0`, and
        // `"succ_x_0" < "x_0"` lexicographically, so a renumbering pass that
        // does not treat `succ_x_0` as a fixed point reassigns `succ_x_0 ->
        // x_0` and `x_0 -> x_1`, producing a different clause on pass two.
        let system = single_component_system();
        let enter = Predicate::bind("enter", Term::succ(Term::var("x")), &system).unwrap();
        let leave = Predicate::bind("leave", Term::var("x"), &system).unwrap();
        let clause = Clause {
            guard: crate::restriction::Conjunct::default(),
            ports: PredicateCollection {
                intent: CollectionIntent::Conjunctive,
                predicates: vec![enter, leave],
            },
            broadcasts: vec![],
            index: 0,
        };
        let once = normalize_clause(&system, &clause).unwrap();
        let twice = normalize_clause(&system, &once).unwrap();
        assert_eq!(once, twice);
        assert!(is_canonically_named(&once));
    }
}
