//! Terms: the sum type `Constant(int) | Variable(name) | Successor(arg)`.
//!
//! Terms are value-typed: equality is structural, hashing is content-based.
//! Any apparent ordering used for output is lexicographic on the rendered
//! string form, never on this type's derived `Ord` — see
//! [`netcheck_base::sort_by_key_string`].

use netcheck_base::StableSet;
use std::collections::HashMap;
use std::fmt;

/// A first-order variable, identified by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable(pub String);

impl Variable {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Variable {
    fn from(s: &str) -> Self {
        Variable::new(s)
    }
}

/// A total substitution `Variable -> Variable`, as produced by the
/// normalizer's canonical renaming pass.
pub type Substitution = HashMap<Variable, Variable>;

/// `Constant(int) | Variable(name) | Successor(argument)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    Constant(i64),
    Variable(Variable),
    Successor(Box<Term>),
}

impl Term {
    pub fn var(name: impl Into<String>) -> Self {
        Term::Variable(Variable::new(name))
    }

    pub fn succ(inner: Term) -> Self {
        Term::Successor(Box::new(inner))
    }

    /// The set of `Variable` subterms (itself, if it is a variable, plus any
    /// variables nested under `Successor`).
    pub fn variables(&self) -> StableSet<Variable> {
        let mut set = StableSet::new();
        self.collect_variables(&mut set);
        set
    }

    fn collect_variables(&self, into: &mut StableSet<Variable>) {
        match self {
            Term::Constant(_) => {}
            Term::Variable(v) => into.insert(v.clone()),
            Term::Successor(inner) => inner.collect_variables(into),
        }
    }

    /// `{self} union subterms`, per the data model's definition of `all_terms`.
    pub fn all_terms(&self) -> Vec<Term> {
        let mut terms = vec![self.clone()];
        if let Term::Successor(inner) = self {
            terms.extend(inner.all_terms());
        }
        terms
    }

    /// True for terms with no internal structure to normalize away:
    /// `Variable` and bare `Constant`. `Successor` is never trivial, even
    /// when its argument is trivial, because it still needs lifting into a
    /// fresh `succ_*` variable.
    pub fn is_trivial(&self) -> bool {
        matches!(self, Term::Constant(_) | Term::Variable(_))
    }

    /// Homomorphic substitution: replaces `Variable` leaves via `subst`,
    /// leaves `Constant` untouched, and recurses through `Successor`. This
    /// is plain renaming; it never introduces fresh variables or
    /// restrictions (see [`Term::to_variable`] for that).
    pub fn rename(&self, subst: &Substitution) -> Term {
        match self {
            Term::Constant(n) => Term::Constant(*n),
            Term::Variable(v) => Term::Variable(subst.get(v).cloned().unwrap_or_else(|| v.clone())),
            Term::Successor(inner) => Term::Successor(Box::new(inner.rename(subst))),
        }
    }

    /// The variable that represents this term once lifted out of a
    /// predicate-argument position. `Variable` represents itself (under
    /// `subst`); `Constant(n)` is represented by the fresh variable `c_n`;
    /// `Successor(arg)` is represented by the fresh variable `succ_<arg>`
    /// where `<arg>` is `arg`'s own representative.
    pub fn to_variable(&self, subst: &Substitution) -> Variable {
        match self {
            Term::Variable(v) => subst.get(v).cloned().unwrap_or_else(|| v.clone()),
            Term::Constant(n) => Variable::new(constant_variable_name(*n)),
            Term::Successor(inner) => {
                let inner_var = inner.to_variable(subst);
                Variable::new(format!("succ_{}", inner_var.name()))
            }
        }
    }

    /// The atomic restrictions that must be added to the enclosing guard to
    /// justify replacing this term, in argument position, with
    /// [`Term::to_variable`].
    pub fn normalizing_restrictions(&self, subst: &Substitution) -> Vec<super::restriction::Restriction> {
        use super::restriction::Restriction;
        match self {
            Term::Variable(_) => Vec::new(),
            Term::Constant(n) => {
                let c = Term::Variable(self.to_variable(subst));
                vec![Restriction::Equal(c, Term::Constant(*n))]
            }
            Term::Successor(inner) => {
                let mut restrictions = inner.normalizing_restrictions(subst);
                let inner_var = Term::Variable(inner.to_variable(subst));
                let succ_var = Term::Variable(self.to_variable(subst));
                restrictions.push(Restriction::IsNext(inner_var, succ_var));
                restrictions
            }
        }
    }

    pub fn render(&self) -> String {
        match self {
            Term::Constant(n) => n.to_string(),
            Term::Variable(v) => v.0.clone(),
            Term::Successor(inner) => format!("succ({})", inner.render()),
        }
    }
}

fn constant_variable_name(n: i64) -> String {
    if n >= 0 {
        format!("c_{n}")
    } else {
        format!("c_neg{}", n.abs())
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_lifts_to_named_variable_with_equality_restriction() {
        let subst = Substitution::new();
        let term = Term::Constant(0);
        assert_eq!(term.to_variable(&subst).name(), "c_0");
        let restrictions = term.normalizing_restrictions(&subst);
        assert_eq!(restrictions.len(), 1);
    }

    #[test]
    fn successor_lifts_recursively() {
        let mut subst = Substitution::new();
        subst.insert(Variable::new("x"), Variable::new("x_0"));
        let term = Term::succ(Term::var("x"));
        assert_eq!(term.to_variable(&subst).name(), "succ_x_0");
        let restrictions = term.normalizing_restrictions(&subst);
        assert_eq!(restrictions.len(), 1);
    }

    #[test]
    fn variables_collects_through_successor() {
        let term = Term::succ(Term::succ(Term::var("x")));
        let vars: Vec<_> = term.variables().into_vec();
        assert_eq!(vars, vec![Variable::new("x")]);
    }

    #[test]
    fn all_terms_includes_self_and_nested_successors() {
        let term = Term::succ(Term::var("x"));
        assert_eq!(term.all_terms().len(), 2);
    }
}
