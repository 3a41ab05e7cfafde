//! Turns a parse tree produced by [`crate::parser::InteractionParser`] into a
//! [`netcheck_model::Interaction`].
//!
//! Mirrors `to-mona`'s two-pass shape (`ComponentParser` then
//! `FormulaParser`): components are collected and bound into a `System`
//! first, since predicate binding needs to resolve labels against it before
//! any clause or broadcast can be built.

use std::collections::BTreeMap;

use netcheck_base::{NetcheckError, Result};
use netcheck_model::{
    normalize_clause, Broadcast, Clause, Component, Conjunct, Dnf, Interaction, Predicate, PredicateCollection,
    Restriction, System, Term,
};
use pest::iterators::Pair;
use pest::Parser;

use crate::parser::{InteractionParser, Rule};

/// Parses `source` into an `Interaction`, normalizing every clause along the
/// way.
pub fn parse_interaction(source: &str) -> Result<Interaction> {
    let mut file_pairs =
        InteractionParser::parse(Rule::file, source).map_err(|e| NetcheckError::parse(e.to_string()))?;
    let file = file_pairs.next().expect("file rule always matches once");

    let top_level: Vec<Pair<Rule>> = file.into_inner().filter(|p| p.as_rule() != Rule::EOI).collect();

    let mut components = Vec::new();
    for pair in &top_level {
        if pair.as_rule() == Rule::component {
            components.push(build_component(pair.clone())?);
        }
    }
    let system = System::new(components)?;

    let mut clauses = Vec::new();
    let mut assumptions = BTreeMap::new();
    let mut properties = BTreeMap::new();

    for pair in top_level {
        match pair.as_rule() {
            Rule::component => {}
            Rule::clause => {
                let raw = build_clause(pair, &system, clauses.len())?;
                clauses.push(normalize_clause(&system, &raw)?);
            }
            Rule::assumption => {
                let (name, text) = build_named_text(pair);
                assumptions.insert(name, text);
            }
            Rule::property => {
                let (name, text) = build_named_text(pair);
                properties.insert(name, text);
            }
            other => return Err(NetcheckError::internal(format!("unexpected top-level rule {other:?}"))),
        }
    }

    Ok(Interaction {
        clauses,
        system,
        assumptions,
        properties,
    })
}

fn build_component(pair: Pair<Rule>) -> Result<Component> {
    let mut inner = pair.into_inner();
    let name = inner.next().expect("component has a name").as_str();

    let initial_pair = inner.next().expect("component has an initial clause");
    let initial = initial_pair
        .into_inner()
        .next()
        .expect("initial names one state")
        .as_str()
        .to_string();

    let mut transitions = Vec::new();
    for transition_pair in inner {
        let mut t = transition_pair.into_inner();
        let source = t.next().expect("transition has a source").as_str().to_string();
        let label = t.next().expect("transition has a label").as_str().to_string();
        let target = t.next().expect("transition has a target").as_str().to_string();
        transitions.push((source, label, target));
    }

    Component::new(name, initial, transitions)
}

fn build_clause(pair: Pair<Rule>, system: &System, index: usize) -> Result<Clause> {
    let mut guard = Conjunct::default();
    let mut ports = Vec::new();
    let mut broadcasts = Vec::new();

    for child in pair.into_inner() {
        match child.as_rule() {
            Rule::guard => {
                guard = Conjunct::new(child.into_inner().map(build_restriction).collect::<Result<_>>()?);
            }
            Rule::ports => {
                for predicate_pair in child.into_inner() {
                    ports.push(build_predicate(predicate_pair, system)?);
                }
            }
            Rule::broadcast => {
                broadcasts.push(build_broadcast(child, system, broadcasts.len())?);
            }
            other => return Err(NetcheckError::internal(format!("unexpected clause child {other:?}"))),
        }
    }

    Ok(Clause {
        guard,
        ports: PredicateCollection::conjunctive(ports),
        broadcasts,
        index,
    })
}

fn build_broadcast(pair: Pair<Rule>, system: &System, index: usize) -> Result<Broadcast> {
    let mut variable = None;
    let mut quantified_variables = Vec::new();
    // No `where` clause means the broadcast applies unconditionally: a
    // single trivially-true conjunct, not an empty disjunction (which would
    // render as `false` and make the broadcast vacuously never apply).
    let mut guard = Dnf::single(Conjunct::default());
    let mut body = Vec::new();

    for child in pair.into_inner() {
        match child.as_rule() {
            Rule::ident => {
                let var = netcheck_model::Variable::new(child.as_str());
                if variable.is_none() {
                    variable = Some(var);
                } else {
                    quantified_variables.push(var);
                }
            }
            Rule::dnf => {
                guard = build_dnf(child)?;
            }
            Rule::predicate => {
                body.push(build_predicate(child, system)?);
            }
            other => return Err(NetcheckError::internal(format!("unexpected broadcast child {other:?}"))),
        }
    }

    let variable = variable.ok_or_else(|| NetcheckError::parse("broadcast names no bound variable"))?;

    Ok(Broadcast {
        variable,
        guard,
        body: PredicateCollection::conjunctive(body),
        quantified_variables,
        index,
    })
}

fn build_dnf(pair: Pair<Rule>) -> Result<Dnf> {
    let conjuncts = pair
        .into_inner()
        .map(|c| Ok(Conjunct::new(c.into_inner().map(build_restriction).collect::<Result<_>>()?)))
        .collect::<Result<_>>()?;
    Ok(Dnf::new(conjuncts))
}

fn build_predicate(pair: Pair<Rule>, system: &System) -> Result<Predicate> {
    let mut inner = pair.into_inner();
    let name = inner.next().expect("predicate has a label").as_str();
    let argument = build_term(inner.next().expect("predicate has one argument"));
    Predicate::bind(name, argument, system)
}

fn build_restriction(pair: Pair<Rule>) -> Result<Restriction> {
    let inner = pair.into_inner().next().expect("restriction has one alternative");
    match inner.as_rule() {
        Rule::last_restriction => {
            let argument = build_term(inner.into_inner().next().expect("last() takes one term"));
            Ok(Restriction::Last(argument))
        }
        Rule::comparison => {
            let mut parts = inner.into_inner();
            let left = build_term(parts.next().expect("comparison has a left term"));
            let op = parts.next().expect("comparison has an operator").as_str();
            let right = build_term(parts.next().expect("comparison has a right term"));
            Ok(match op {
                "=" => Restriction::Equal(left, right),
                "~=" => Restriction::Unequal(left, right),
                "<" => Restriction::Less(left, right),
                "<=" => Restriction::LessEqual(left, right),
                ">" => Restriction::Less(right, left),
                ">=" => Restriction::LessEqual(right, left),
                other => return Err(NetcheckError::internal(format!("unrecognised comparison operator {other}"))),
            })
        }
        other => Err(NetcheckError::internal(format!("unexpected restriction alternative {other:?}"))),
    }
}

fn build_term(pair: Pair<Rule>) -> Term {
    let inner = pair.into_inner().next().expect("term has one alternative");
    match inner.as_rule() {
        Rule::succ_term => {
            let argument = build_term(inner.into_inner().next().expect("succ() takes one term"));
            Term::succ(argument)
        }
        Rule::constant_term => Term::Constant(inner.as_str().parse().expect("constant_term is all digits")),
        Rule::variable_term => Term::var(inner.as_str()),
        other => unreachable!("unexpected term alternative {other:?}"),
    }
}

fn build_named_text(pair: Pair<Rule>) -> (String, String) {
    let mut strings = pair.into_inner();
    let name = unquote(strings.next().expect("has a name string").as_str());
    let text = unquote(strings.next().expect("has a value string").as_str());
    (name, text)
}

fn unquote(raw: &str) -> String {
    raw[1..raw.len() - 1].to_string()
}
