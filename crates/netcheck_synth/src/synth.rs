//! Turns a normalized [`Clause`]/[`System`] into the WS1S predicate
//! definitions that justify a structural unreachability argument: per-clause
//! flow-, trap-, and deadlock-transition predicates, and the system-wide
//! trap/invariant/marking predicates built from them.
//!
//! Every function here mirrors a function of the same shape in
//! `examples/original_source/rendering.py`, the prototype's own predicate
//! synthesis module.

use netcheck_algebra::{Formula, PredicateDefinition};
use netcheck_model::{Broadcast, Clause, Conjunct, Dnf, Interaction, Predicate, Restriction, System, Term, Variable};

fn state_variable(name: &str) -> Variable {
    Variable::new(name)
}

fn state_variables(system: &System) -> Vec<Variable> {
    system.states().iter().map(|s| state_variable(s)).collect()
}

fn state_terms(system: &System) -> Vec<Term> {
    system.states().iter().map(|s| Term::var(s.clone())).collect()
}

pub fn hit_pre(p: &Predicate) -> Formula {
    Formula::ElementIn(p.variable(), state_variable(&p.pre))
}

pub fn hit_post(p: &Predicate) -> Formula {
    Formula::ElementIn(p.variable(), state_variable(&p.post))
}

pub fn miss_pre(p: &Predicate) -> Formula {
    Formula::ElementNotIn(p.variable(), state_variable(&p.pre))
}

pub fn miss_post(p: &Predicate) -> Formula {
    Formula::ElementNotIn(p.variable(), state_variable(&p.post))
}

/// Translates one atomic restriction into its WS1S counterpart. `IsNext` and
/// `Last` have no structural `Formula` variant (MONA expresses them as plain
/// first-order arithmetic/range text), so they pass through as `Raw`.
fn restriction_as_formula(r: &Restriction) -> Formula {
    match r {
        Restriction::Equal(l, r) => Formula::Equal(l.clone(), r.clone()),
        Restriction::Unequal(l, r) => Formula::Unequal(l.clone(), r.clone()),
        Restriction::Less(l, r) => Formula::Less(l.clone(), r.clone()),
        Restriction::LessEqual(l, r) => Formula::LessEqual(l.clone(), r.clone()),
        Restriction::IsNext(_, _) | Restriction::Last(_) => Formula::Raw(r.render()),
    }
}

pub fn conjunct_as_ws1s(conjunct: &Conjunct) -> Formula {
    Formula::and(conjunct.0.iter().map(restriction_as_formula))
}

/// `guard_as_WS1S(b) = ⋁_{C ∈ G} ⋀_{a ∈ C} a`.
pub fn guard_as_ws1s(dnf: &Dnf) -> Formula {
    Formula::or(dnf.0.iter().map(conjunct_as_ws1s))
}

fn clause_free_vars(clause: &Clause) -> Vec<Variable> {
    netcheck_base::sort_by_key_string(clause.free_variables().into_vec(), |v| v.name().to_string())
}

fn broadcast_vars(broadcast: &Broadcast) -> Vec<Variable> {
    broadcast.all_quantified_variables().into_vec()
}

fn broadcast_dead(broadcast: &Broadcast) -> Formula {
    let guard = guard_as_ws1s(&broadcast.guard);
    let all_miss_pre = Formula::and(broadcast.body.predicates.iter().map(miss_pre));
    Formula::exists1(broadcast_vars(broadcast), Formula::and([guard, all_miss_pre]))
}

fn broadcast_one_post(broadcast: &Broadcast) -> Formula {
    let guard = guard_as_ws1s(&broadcast.guard);
    let all_hit_post = Formula::and(broadcast.body.predicates.iter().map(hit_post));
    Formula::exists1(broadcast_vars(broadcast), Formula::and([guard, all_hit_post]))
}

fn broadcast_vertical(broadcast: &Broadcast) -> Formula {
    let guard = guard_as_ws1s(&broadcast.guard);
    let pre_implies_post = Formula::and(
        broadcast
            .body
            .predicates
            .iter()
            .map(|p| hit_pre(p).implies(hit_post(p))),
    );
    Formula::forall1(broadcast_vars(broadcast), guard.implies(pre_implies_post))
}

fn broadcast_disjoint_all_pre(broadcast: &Broadcast) -> Formula {
    let guard = guard_as_ws1s(&broadcast.guard);
    let all_miss_pre = Formula::and(broadcast.body.predicates.iter().map(miss_pre));
    Formula::forall1(broadcast_vars(broadcast), guard.implies(all_miss_pre))
}

fn broadcast_disjoint_all_post(broadcast: &Broadcast) -> Formula {
    let guard = guard_as_ws1s(&broadcast.guard);
    let all_miss_post = Formula::and(broadcast.body.predicates.iter().map(miss_post));
    Formula::forall1(broadcast_vars(broadcast), guard.implies(all_miss_post))
}

/// Renames `broadcast.variable` to `y`: the fresh witness used by
/// `one_pre_in_broadcast`/`one_post_in_broadcast` to compare every other
/// assignment against the chosen one.
fn renamed_to_y(broadcast: &Broadcast) -> (Variable, Broadcast) {
    let y = Variable::new("y");
    let mut subst = netcheck_model::Substitution::new();
    subst.insert(broadcast.variable.clone(), y.clone());
    (y, broadcast.rename(&subst))
}

fn one_pre_in_broadcast(broadcast: &Broadcast) -> Formula {
    let (y, renamed) = renamed_to_y(broadcast);
    let pos_vars = broadcast_vars(broadcast);
    let pos_guard = guard_as_ws1s(&broadcast.guard);
    let neg_vars = broadcast_vars(&renamed);
    let neg_guard = guard_as_ws1s(&renamed.guard);
    let any_hit_pre = Formula::or(renamed.body.predicates.iter().map(hit_pre));
    let inner = Formula::forall1(
        neg_vars,
        Formula::and([neg_guard, any_hit_pre]).implies(Formula::Equal(
            Term::Variable(y),
            Term::Variable(broadcast.variable.clone()),
        )),
    );
    let mut conjuncts = vec![pos_guard];
    conjuncts.extend(broadcast.body.predicates.iter().map(hit_pre));
    conjuncts.push(inner);
    Formula::exists1(pos_vars, Formula::and(conjuncts))
}

fn one_post_in_broadcast(broadcast: &Broadcast) -> Formula {
    let (y, renamed) = renamed_to_y(broadcast);
    let pos_vars = broadcast_vars(broadcast);
    let pos_guard = guard_as_ws1s(&broadcast.guard);
    let neg_vars = broadcast_vars(&renamed);
    let neg_guard = guard_as_ws1s(&renamed.guard);
    let any_hit_post = Formula::or(renamed.body.predicates.iter().map(hit_post));
    let inner = Formula::forall1(
        neg_vars,
        Formula::and([neg_guard, any_hit_post]).implies(Formula::Equal(
            Term::Variable(y),
            Term::Variable(broadcast.variable.clone()),
        )),
    );
    let mut conjuncts = vec![pos_guard];
    conjuncts.extend(broadcast.body.predicates.iter().map(hit_post));
    conjuncts.push(inner);
    Formula::exists1(pos_vars, Formula::and(conjuncts))
}

fn disjoint_all_free_pre(clause: &Clause) -> Formula {
    Formula::and(clause.ports.predicates.iter().map(miss_pre))
}

fn disjoint_all_free_post(clause: &Clause) -> Formula {
    Formula::and(clause.ports.predicates.iter().map(miss_post))
}

fn disjoint_all_broadcasts_pre(clause: &Clause) -> Formula {
    Formula::and(clause.broadcasts.iter().map(broadcast_disjoint_all_pre))
}

fn disjoint_all_broadcasts_post(clause: &Clause) -> Formula {
    Formula::and(clause.broadcasts.iter().map(broadcast_disjoint_all_post))
}

fn disjoint_all_pre(clause: &Clause) -> Formula {
    Formula::and([disjoint_all_free_pre(clause), disjoint_all_broadcasts_pre(clause)])
}

fn disjoint_all_post(clause: &Clause) -> Formula {
    Formula::and([disjoint_all_free_post(clause), disjoint_all_broadcasts_post(clause)])
}

fn one_in_free(ports: &[Predicate], hit: impl Fn(&Predicate) -> Formula, miss: impl Fn(&Predicate) -> Formula) -> Formula {
    Formula::or(ports.iter().map(|p| {
        let mut conjuncts = vec![hit(p)];
        conjuncts.extend(ports.iter().filter(|o| *o != p).map(&miss));
        Formula::and(conjuncts)
    }))
}

fn one_pre_in_free(clause: &Clause) -> Formula {
    one_in_free(&clause.ports.predicates, hit_pre, miss_pre)
}

fn one_post_in_free(clause: &Clause) -> Formula {
    one_in_free(&clause.ports.predicates, hit_post, miss_post)
}

fn one_pre_all_broadcasts(clause: &Clause) -> Formula {
    Formula::or(clause.broadcasts.iter().enumerate().map(|(i, b)| {
        let mut conjuncts = vec![one_pre_in_broadcast(b)];
        conjuncts.extend(
            clause
                .broadcasts
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, o)| broadcast_disjoint_all_pre(o)),
        );
        Formula::and(conjuncts)
    }))
}

fn one_post_all_broadcasts(clause: &Clause) -> Formula {
    Formula::or(clause.broadcasts.iter().enumerate().map(|(i, b)| {
        let mut conjuncts = vec![one_post_in_broadcast(b)];
        conjuncts.extend(
            clause
                .broadcasts
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, o)| broadcast_disjoint_all_post(o)),
        );
        Formula::and(conjuncts)
    }))
}

fn one_in_pre(clause: &Clause) -> Formula {
    Formula::or([
        Formula::and([one_pre_in_free(clause), disjoint_all_broadcasts_pre(clause)]),
        Formula::and([disjoint_all_free_pre(clause), one_pre_all_broadcasts(clause)]),
    ])
}

fn one_in_post(clause: &Clause) -> Formula {
    Formula::or([
        Formula::and([one_post_in_free(clause), disjoint_all_broadcasts_post(clause)]),
        Formula::and([disjoint_all_free_post(clause), one_post_all_broadcasts(clause)]),
    ])
}

/// `dead_transition_{number}`: `∀free. guard ⇒ (⋁ miss_pre(port) ∨ ⋁ is_dead(broadcast))`.
pub fn dead_transition(system: &System, clause: &Clause, number: usize) -> PredicateDefinition {
    let dead_free = Formula::or(clause.ports.predicates.iter().map(miss_pre));
    let dead_broadcasts = Formula::or(clause.broadcasts.iter().map(broadcast_dead));
    let guard = conjunct_as_ws1s(&clause.guard);
    let inner = guard.implies(Formula::or([dead_free, dead_broadcasts]));
    let body = Formula::forall1(clause_free_vars(clause), inner);
    PredicateDefinition::new(format!("dead_transition_{number}"), state_variables(system), vec![], body).simplify()
}

/// `trap_transition_{number}`: see `spec.md` §4.5.
pub fn trap_transition(system: &System, clause: &Clause, number: usize) -> PredicateDefinition {
    let guard = conjunct_as_ws1s(&clause.guard);
    let vars = clause_free_vars(clause);
    let free_pre = Formula::or(clause.ports.predicates.iter().map(hit_pre));
    let free_post = Formula::or(clause.ports.predicates.iter().map(hit_post));

    let mut safe_post = vec![free_post];
    let mut broadcast_local = Vec::new();
    if !clause.broadcasts.is_empty() {
        safe_post.push(Formula::or(clause.broadcasts.iter().map(broadcast_one_post)));
        let mut vertical = vec![free_pre.clone().not()];
        vertical.extend(clause.broadcasts.iter().map(broadcast_vertical));
        broadcast_local.push(Formula::and(vertical));
    }

    let inner = Formula::or([Formula::or(safe_post), Formula::and([free_pre.not(), Formula::and(broadcast_local)])]);
    let body = Formula::forall1(vars, guard.implies(inner));
    PredicateDefinition::new(format!("trap_transition_{number}"), state_variables(system), vec![], body).simplify()
}

/// `invariant_transition_{number}`: see `spec.md` §4.5.
pub fn invariant_transition(system: &System, clause: &Clause, number: usize) -> PredicateDefinition {
    let inner = Formula::or([
        Formula::and([disjoint_all_pre(clause), disjoint_all_post(clause)]),
        Formula::and([one_in_pre(clause), one_in_post(clause)]),
        Formula::and([disjoint_all_pre(clause).not(), one_in_pre(clause).not()]),
    ]);
    let vars = clause_free_vars(clause);
    let guard = conjunct_as_ws1s(&clause.guard);
    let body = Formula::forall1(vars, guard.implies(inner));
    PredicateDefinition::new(format!("invariant_transition_{number}"), state_variables(system), vec![], body).simplify()
}

fn transition_calls(system: &System, prefix: &str, clause_count: usize) -> Formula {
    Formula::and((1..=clause_count).map(|k| Formula::PredicateCall(format!("{prefix}_{k}"), state_terms(system))))
}

pub fn trap(system: &System, clause_count: usize) -> PredicateDefinition {
    let body = transition_calls(system, "trap_transition", clause_count);
    PredicateDefinition::new("trap", state_variables(system), vec![], body).simplify()
}

pub fn deadlock(system: &System, clause_count: usize) -> PredicateDefinition {
    let body = transition_calls(system, "dead_transition", clause_count);
    PredicateDefinition::new("deadlock", state_variables(system), vec![], body).simplify()
}

pub fn invariant(system: &System, clause_count: usize) -> PredicateDefinition {
    let body = transition_calls(system, "invariant_transition", clause_count);
    PredicateDefinition::new("invariant", state_variables(system), vec![], body).simplify()
}

pub fn intersection(system: &System) -> PredicateDefinition {
    let x = Variable::new("x");
    let one_states: Vec<Variable> = system.states().iter().map(|s| Variable::new(format!("one{s}"))).collect();
    let two_states: Vec<Variable> = system.states().iter().map(|s| Variable::new(format!("two{s}"))).collect();
    let in_both = one_states
        .iter()
        .zip(two_states.iter())
        .map(|(o, t)| Formula::and([Formula::ElementIn(x.clone(), o.clone()), Formula::ElementIn(x.clone(), t.clone())]));
    let body = Formula::exists1(vec![x], Formula::or(in_both));
    let params = one_states.into_iter().chain(two_states).collect();
    PredicateDefinition::new("intersection", params, vec![], body).simplify()
}

pub fn unique_intersection(system: &System) -> PredicateDefinition {
    let x = Variable::new("x");
    let y = Variable::new("y");
    let one_states: Vec<Variable> = system.states().iter().map(|s| Variable::new(format!("one{s}"))).collect();
    let two_states: Vec<Variable> = system.states().iter().map(|s| Variable::new(format!("two{s}"))).collect();
    let pairs: Vec<(Variable, Variable)> = one_states.iter().cloned().zip(two_states.iter().cloned()).collect();

    let fix_x = Formula::or(pairs.iter().enumerate().map(|(i, (o, t))| {
        let mut conjuncts = vec![Formula::ElementIn(x.clone(), o.clone()), Formula::ElementIn(x.clone(), t.clone())];
        conjuncts.extend(pairs.iter().enumerate().filter(|(j, _)| *j != i).map(|(_, (o2, t2))| {
            Formula::and([Formula::ElementIn(x.clone(), o2.clone()), Formula::ElementIn(x.clone(), t2.clone())]).not()
        }));
        Formula::and(conjuncts)
    }));
    let y_in_intersection = Formula::or(
        pairs
            .iter()
            .map(|(o, t)| Formula::and([Formula::ElementIn(y.clone(), o.clone()), Formula::ElementIn(y.clone(), t.clone())])),
    );
    let unique_x = Formula::forall1(
        vec![y],
        y_in_intersection.implies(Formula::Equal(Term::Variable(x.clone()), Term::Variable(Variable::new("y")))),
    );
    let body = Formula::exists1(vec![x], Formula::and([fix_x, unique_x]));
    let params = one_states.into_iter().chain(two_states).collect();
    PredicateDefinition::new("unique_intersection", params, vec![], body).simplify()
}

pub fn intersects_initial(system: &System) -> PredicateDefinition {
    let x = Variable::new("x");
    let initial_states: Vec<Variable> = system.components().iter().map(|c| Variable::new(c.initial_state())).collect();
    let x_initial = Formula::or(initial_states.iter().map(|s| Formula::ElementIn(x.clone(), s.clone())));
    let body = Formula::exists1(vec![x], x_initial);
    PredicateDefinition::new("intersects_initial", state_variables(system), vec![], body).simplify()
}

pub fn uniquely_intersects_initial(system: &System) -> PredicateDefinition {
    let x = Variable::new("x");
    let y = Variable::new("y");
    let initial_states: Vec<Variable> = system.components().iter().map(|c| Variable::new(c.initial_state())).collect();
    let x_in_only_one_initial = Formula::or(initial_states.iter().enumerate().map(|(i, init)| {
        let mut conjuncts = vec![Formula::ElementIn(x.clone(), init.clone())];
        conjuncts.extend(
            initial_states
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, other)| Formula::ElementNotIn(x.clone(), other.clone())),
        );
        Formula::and(conjuncts)
    }));
    let y_in_initial = Formula::or(initial_states.iter().map(|s| Formula::ElementIn(y.clone(), s.clone())));
    let x_unique = Formula::forall1(vec![y], y_in_initial.implies(Formula::Equal(Term::Variable(x.clone()), Term::Variable(Variable::new("y")))));
    let body = Formula::exists1(vec![x], Formula::and([x_in_only_one_initial, x_unique]));
    PredicateDefinition::new("uniquely_intersects_initial", state_variables(system), vec![], body).simplify()
}

pub fn initially_marked_trap(system: &System) -> PredicateDefinition {
    let body = Formula::and([
        Formula::PredicateCall("trap".into(), state_terms(system)),
        Formula::PredicateCall("intersects_initial".into(), state_terms(system)),
    ]);
    PredicateDefinition::new("initially_marked_trap", state_variables(system), vec![], body).simplify()
}

pub fn trap_invariant(system: &System) -> PredicateDefinition {
    let trap_states: Vec<Variable> = system.states().iter().map(|s| Variable::new(format!("T{s}"))).collect();
    let precondition = Formula::PredicateCall(
        "initially_marked_trap".into(),
        trap_states.iter().cloned().map(Term::Variable).collect(),
    );
    let mut args: Vec<Term> = trap_states.iter().cloned().map(Term::Variable).collect();
    args.extend(state_terms(system));
    let postcondition = Formula::PredicateCall("intersection".into(), args);
    let body = Formula::forall2(trap_states, precondition.implies(postcondition));
    PredicateDefinition::new("trap_invariant", state_variables(system), vec![], body).simplify()
}

pub fn initially_uniquely_marked_flow(system: &System) -> PredicateDefinition {
    let body = Formula::and([
        Formula::PredicateCall("invariant".into(), state_terms(system)),
        Formula::PredicateCall("uniquely_intersects_initial".into(), state_terms(system)),
    ]);
    PredicateDefinition::new("initially_uniquely_marked_flow", state_variables(system), vec![], body).simplify()
}

pub fn flow_invariant(system: &System) -> PredicateDefinition {
    let flow_states: Vec<Variable> = system.states().iter().map(|s| Variable::new(format!("F{s}"))).collect();
    let precondition = Formula::PredicateCall(
        "initially_uniquely_marked_flow".into(),
        flow_states.iter().cloned().map(Term::Variable).collect(),
    );
    let mut args: Vec<Term> = flow_states.iter().cloned().map(Term::Variable).collect();
    args.extend(state_terms(system));
    let postcondition = Formula::PredicateCall("unique_intersection".into(), args);
    let body = Formula::forall2(flow_states, precondition.implies(postcondition));
    PredicateDefinition::new("flow_invariant", state_variables(system), vec![], body).simplify()
}

pub fn marking(system: &System) -> PredicateDefinition {
    let m = Variable::new("m");
    let unique_in_component = Formula::forall1(
        vec![m.clone()],
        Formula::and(system.components().iter().map(|c| {
            Formula::or(c.states().iter().map(|pos| {
                let mut conjuncts = vec![Formula::ElementIn(m.clone(), Variable::new(pos))];
                conjuncts.extend(
                    c.states()
                        .iter()
                        .filter(|neg| *neg != pos)
                        .map(|neg| Formula::ElementNotIn(m.clone(), Variable::new(neg))),
                );
                Formula::and(conjuncts)
            }))
        })),
    );
    let flow_invariant_call = Formula::PredicateCall("flow_invariant".into(), state_terms(system));
    let trap_invariant_call = Formula::PredicateCall("trap_invariant".into(), state_terms(system));
    let body = Formula::and([unique_in_component, flow_invariant_call, trap_invariant_call]);
    PredicateDefinition::new("marking", state_variables(system), vec![], body).simplify()
}

/// Wraps an opaque WS1S fragment (an `assumption`/`property` entry) as a
/// named predicate definition over the system's state-set parameters.
pub fn property_definition(system: &System, name: &str, body_text: &str) -> PredicateDefinition {
    PredicateDefinition::new(name, state_variables(system), vec![], Formula::Raw(body_text.to_string())).simplify()
}

/// `deadlock`'s own body is the reserved system-wide predicate rather than
/// an opaque fragment.
pub fn deadlock_property_definition(system: &System, clause_count: usize) -> PredicateDefinition {
    deadlock(system, clause_count)
}

/// The top-level obligation statement for a property check (`spec.md`
/// §4.5): "no reachable marking satisfies P". Existentially quantifies a
/// fresh witness state-set `M{state}` (the same fresh-copy idiom `T{state}`/
/// `F{state}` use elsewhere in this module) and conjoins `marking` with the
/// named property over that witness, so the statement actually encodes
/// reachability rather than calling the property predicate in isolation.
pub fn property_check_call(system: &System, property_name: &str) -> Formula {
    let witness_states: Vec<Variable> = system.states().iter().map(|s| Variable::new(format!("M{s}"))).collect();
    let witness_terms: Vec<Term> = witness_states.iter().cloned().map(Term::Variable).collect();
    let marking_call = Formula::PredicateCall("marking".into(), witness_terms.clone());
    let property_call = Formula::PredicateCall(property_name.to_string(), witness_terms);
    Formula::exists2(witness_states, Formula::and([marking_call, property_call]))
}

/// Every predicate definition that makes up the base theory, in a fixed
/// dependency order: per-clause predicates first (each clause contributes
/// its dead/trap/invariant triple), then the system-wide predicates built on
/// top of them.
pub fn base_theory_definitions(interaction: &Interaction) -> Vec<PredicateDefinition> {
    let mut defs = Vec::new();
    for (index, clause) in interaction.clauses.iter().enumerate() {
        let number = index + 1;
        defs.push(dead_transition(&interaction.system, clause, number));
        defs.push(trap_transition(&interaction.system, clause, number));
        defs.push(invariant_transition(&interaction.system, clause, number));
    }
    let clause_count = interaction.clauses.len();
    defs.push(trap(&interaction.system, clause_count));
    defs.push(deadlock(&interaction.system, clause_count));
    defs.push(invariant(&interaction.system, clause_count));
    defs.push(intersection(&interaction.system));
    defs.push(unique_intersection(&interaction.system));
    defs.push(intersects_initial(&interaction.system));
    defs.push(uniquely_intersects_initial(&interaction.system));
    defs.push(initially_marked_trap(&interaction.system));
    defs.push(trap_invariant(&interaction.system));
    defs.push(initially_uniquely_marked_flow(&interaction.system));
    defs.push(flow_invariant(&interaction.system));
    defs.push(marking(&interaction.system));
    defs
}

#[cfg(test)]
mod tests {
    use super::*;
    use netcheck_model::{normalize_clause, CollectionIntent, Component, PredicateCollection};

    fn mutex_system() -> System {
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

    fn enter_clause(system: &System) -> Clause {
        let predicate = Predicate::bind("enter", Term::var("x"), system).unwrap();
        let raw = Clause {
            guard: Conjunct::default(),
            ports: PredicateCollection {
                intent: CollectionIntent::Conjunctive,
                predicates: vec![predicate],
            },
            broadcasts: vec![],
            index: 0,
        };
        normalize_clause(system, &raw).unwrap()
    }

    #[test]
    fn dead_transition_is_deterministic_and_well_formed() {
        let system = mutex_system();
        let clause = enter_clause(&system);
        let def = dead_transition(&system, &clause, 1);
        assert_eq!(def.name, "dead_transition_1");
        assert_eq!(def.render(), def.simplify().render());
    }

    #[test]
    fn trap_calls_every_clause_transition() {
        let system = mutex_system();
        let def = trap(&system, 2);
        let rendered = def.render();
        assert!(rendered.contains("trap_transition_1"));
        assert!(rendered.contains("trap_transition_2"));
    }

    #[test]
    fn intersection_is_parameterized_by_two_state_copies() {
        let system = mutex_system();
        let def = intersection(&system);
        assert_eq!(def.second_order.len(), system.states().len() * 2);
    }

    #[test]
    fn base_theory_definitions_cover_every_clause_and_system_predicate() {
        let system = mutex_system();
        let clause = enter_clause(&system);
        let interaction = Interaction {
            clauses: vec![clause],
            system: system.clone(),
            assumptions: Default::default(),
            properties: Default::default(),
        };
        let defs = base_theory_definitions(&interaction);
        let names: Vec<&str> = defs.iter().map(|d| d.name.as_str()).collect();
        assert!(names.contains(&"dead_transition_1"));
        assert!(names.contains(&"marking"));
        assert_eq!(defs.len(), 3 + 12);
    }

    #[test]
    fn property_definition_wraps_raw_text() {
        let system = mutex_system();
        let def = property_definition(&system, "nomutex", "ex1 x, y: (x ~= y)");
        assert_eq!(def.name, "nomutex");
        assert!(def.render().contains("x ~= y"));
    }

    #[test]
    fn property_check_call_existentially_quantifies_a_witness_conjoined_with_marking() {
        let system = mutex_system();
        let obligation = property_check_call(&system, "nomutex");
        let rendered = obligation.render();
        assert!(rendered.starts_with("ex2 "));
        assert!(rendered.contains("marking("));
        assert!(rendered.contains("nomutex("));
        match obligation {
            Formula::ExistsSecondOrder(vars, inner) => {
                assert_eq!(vars.len(), system.states().len());
                match *inner {
                    Formula::Conjunction(parts) => assert_eq!(parts.len(), 2),
                    other => panic!("expected a conjunction of marking and the property, got {other:?}"),
                }
            }
            other => panic!("expected an ExistsSecondOrder obligation, got {other:?}"),
        }
    }
}
