//! Predicates (ports), broadcasts, clauses, and interactions: the layer
//! above terms and restrictions.

use crate::component::System;
use crate::restriction::{Conjunct, Dnf, Restriction};
use crate::term::{Substitution, Term, Variable};
use netcheck_base::{sort_by_key_string, NetcheckError, Result, StableSet};
use std::collections::BTreeMap;

/// A reference to a component transition, applied to a first-order
/// argument: "the argument moves along this edge". `pre`/`post` name the
/// second-order state-set variables for the edge's source/target state,
/// resolved against the containing system at bind time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub name: String,
    pub argument: Term,
    pub pre: String,
    pub post: String,
}

impl Predicate {
    /// Resolves `name` against `system` and binds `pre`/`post` to the
    /// labeled edge's source/target state names.
    pub fn bind(name: impl Into<String>, argument: Term, system: &System) -> Result<Self> {
        let name = name.into();
        let (pre, post) = system
            .edge_with_label(&name)
            .ok_or_else(|| NetcheckError::unknown_label(&name))?;
        Ok(Self {
            name,
            argument,
            pre: pre.to_string(),
            post: post.to_string(),
        })
    }

    pub fn with_argument(&self, argument: Term) -> Self {
        Self {
            name: self.name.clone(),
            argument,
            pre: self.pre.clone(),
            post: self.post.clone(),
        }
    }

    pub fn variable(&self) -> Variable {
        match &self.argument {
            Term::Variable(v) => v.clone(),
            other => panic!(
                "predicate '{}' argument is not normalized to a variable: {}",
                self.name,
                other.render()
            ),
        }
    }
}

/// Whether a [`PredicateCollection`]'s members are intended to be ANDed or
/// ORed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionIntent {
    Conjunctive,
    Disjunctive,
}

/// A set of predicates tagged with conjunctive or disjunctive intent.
/// `Clause.ports` and `Broadcast.body` are always conjunctive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredicateCollection {
    pub intent: CollectionIntent,
    pub predicates: Vec<Predicate>,
}

impl PredicateCollection {
    pub fn conjunctive(predicates: Vec<Predicate>) -> Self {
        Self {
            intent: CollectionIntent::Conjunctive,
            predicates,
        }
    }

    pub fn disjunctive(predicates: Vec<Predicate>) -> Self {
        Self {
            intent: CollectionIntent::Disjunctive,
            predicates,
        }
    }

    pub fn variables(&self) -> StableSet<Variable> {
        let mut set = StableSet::new();
        for p in &self.predicates {
            set.extend(p.argument.variables());
        }
        set
    }
}

/// A universally-quantified rendezvous body: "for all quantified
/// participants satisfying the guard, the body holds". The broadcast
/// implicitly quantifies `variable` and every entry of `quantified_variables`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Broadcast {
    pub variable: Variable,
    pub guard: Dnf,
    pub body: PredicateCollection,
    pub quantified_variables: Vec<Variable>,
    pub index: usize,
}

impl Broadcast {
    /// `variable` plus every entry of `quantified_variables`, deduplicated,
    /// in a deterministic (variable-then-extras) order.
    pub fn all_quantified_variables(&self) -> StableSet<Variable> {
        let mut set = StableSet::new();
        set.insert(self.variable.clone());
        set.extend(self.quantified_variables.iter().cloned());
        set
    }

    pub fn free_variables(&self) -> StableSet<Variable> {
        let quantified = self.all_quantified_variables();
        let mut set = StableSet::new();
        for v in self.guard.variables().iter() {
            if !quantified.contains(v) {
                set.insert(v.clone());
            }
        }
        set
    }

    /// The terms used as arguments of the broadcast's body predicates.
    pub fn local_terms(&self) -> Vec<Term> {
        self.body.predicates.iter().map(|p| p.argument.clone()).collect()
    }

    /// The single component every body predicate resolves to, or an error
    /// if the body mixes predicates from more than one component.
    pub fn resolve_component<'a>(&self, system: &'a System) -> Result<&'a crate::component::Component> {
        let mut resolved: Option<&crate::component::Component> = None;
        for predicate in &self.body.predicates {
            let component = system
                .component_of_label(&predicate.name)
                .ok_or_else(|| NetcheckError::unknown_label(&predicate.name))?;
            match resolved {
                None => resolved = Some(component),
                Some(already) if already.name() != component.name() => {
                    return Err(NetcheckError::inconsistent_broadcast_type(format!(
                        "broadcast body mixes components '{}' and '{}'",
                        already.name(),
                        component.name()
                    )));
                }
                _ => {}
            }
        }
        resolved.ok_or_else(|| {
            NetcheckError::internal("broadcast body has no predicates to resolve a component from")
        })
    }

    pub fn rename(&self, subst: &Substitution) -> Broadcast {
        Broadcast {
            variable: subst.get(&self.variable).cloned().unwrap_or_else(|| self.variable.clone()),
            guard: self.guard.rename(subst),
            body: PredicateCollection {
                intent: self.body.intent,
                predicates: self
                    .body
                    .predicates
                    .iter()
                    .map(|p| p.with_argument(p.argument.rename(subst)))
                    .collect(),
            },
            quantified_variables: self
                .quantified_variables
                .iter()
                .map(|v| subst.get(v).cloned().unwrap_or_else(|| v.clone()))
                .collect(),
            index: self.index,
        }
    }
}

/// A guarded multi-party interaction: a conjunctive guard, a conjunctive set
/// of ports, and an ordered list of broadcasts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub guard: Conjunct,
    pub ports: PredicateCollection,
    pub broadcasts: Vec<Broadcast>,
    pub index: usize,
}

impl Clause {
    pub fn free_variables(&self) -> StableSet<Variable> {
        let mut set = StableSet::new();
        set.extend(self.ports.variables());
        set.extend(self.guard.variables());
        for broadcast in &self.broadcasts {
            set.extend(broadcast.free_variables());
        }
        set
    }

    /// The arguments of every port and broadcast-body predicate: the terms
    /// subject to constant/successor lifting during normalization.
    pub fn predicate_argument_terms(&self) -> Vec<Term> {
        let mut terms: Vec<Term> = self.ports.predicates.iter().map(|p| p.argument.clone()).collect();
        for broadcast in &self.broadcasts {
            terms.extend(broadcast.local_terms());
        }
        terms
    }

    /// Predicate-argument terms that are not bare variables and whose
    /// variables are all free variables of the clause (as opposed to a
    /// broadcast's own quantified variables, which normalize within that
    /// broadcast's own local scope instead).
    pub fn local_terms(&self) -> Vec<Term> {
        let free = self.free_variables();
        self.predicate_argument_terms()
            .into_iter()
            .filter(|t| !matches!(t, Term::Variable(_)))
            .filter(|t| {
                let vars = t.variables();
                !vars.is_empty() && vars.iter().all(|v| free.contains(v))
            })
            .collect()
    }

    /// Predicate-argument terms with no variables at all (pure constants,
    /// including constants nested under `Successor`).
    pub fn constant_terms(&self) -> Vec<Term> {
        self.predicate_argument_terms()
            .into_iter()
            .filter(|t| !matches!(t, Term::Variable(_)))
            .filter(|t| t.variables().is_empty())
            .collect()
    }

    pub fn all_ports(&self) -> Vec<Predicate> {
        let mut seen: StableSet<Predicate> = StableSet::new();
        for p in &self.ports.predicates {
            seen.insert(p.clone());
        }
        for b in &self.broadcasts {
            for p in &b.body.predicates {
                seen.insert(p.clone());
            }
        }
        seen.into_vec()
    }
}

impl std::hash::Hash for Predicate {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.argument.hash(state);
    }
}

/// `(clauses, system, assumptions, properties)`. `assumptions` and
/// `properties` are opaque WS1S fragments supplied verbatim by the
/// front-end.
#[derive(Debug, Clone)]
pub struct Interaction {
    pub clauses: Vec<Clause>,
    pub system: System,
    pub assumptions: BTreeMap<String, String>,
    pub properties: BTreeMap<String, String>,
}

impl Interaction {
    /// The sorted keys of `properties` plus the reserved name `deadlock`,
    /// deduplicated.
    pub fn property_names(&self) -> Vec<String> {
        let mut names: StableSet<String> = StableSet::new();
        for name in self.properties.keys() {
            names.insert(name.clone());
        }
        names.insert("deadlock".to_string());
        sort_by_key_string(names.into_vec(), |s| s.clone())
    }
}
