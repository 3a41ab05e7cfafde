//! Atomic restrictions and the conjunctive/DNF collections built from them.

use crate::term::{Substitution, Term};
use netcheck_base::sort_by_key_string;
use std::fmt;
use std::hash::{Hash, Hasher};

/// One atomic restriction over two terms (or one, for `Last`).
///
/// `Equal` and `Unequal` are symmetric: `Equal(a, b)` and `Equal(b, a)`
/// compare and hash identically. The other variants are not symmetric.
#[derive(Debug, Clone)]
pub enum Restriction {
    Equal(Term, Term),
    Unequal(Term, Term),
    Less(Term, Term),
    LessEqual(Term, Term),
    /// True iff `right` (second operand) is the immediate successor of
    /// `left` (first operand).
    IsNext(Term, Term),
    /// True iff `argument` is the maximal index.
    Last(Term),
}

impl Restriction {
    pub fn variables(&self) -> netcheck_base::StableSet<crate::term::Variable> {
        let mut set = netcheck_base::StableSet::new();
        for term in self.terms() {
            set.extend(term.variables());
        }
        set
    }

    /// All terms occurring in this restriction, in a fixed (left-then-right)
    /// order.
    pub fn terms(&self) -> Vec<Term> {
        match self {
            Restriction::Equal(l, r)
            | Restriction::Unequal(l, r)
            | Restriction::Less(l, r)
            | Restriction::LessEqual(l, r)
            | Restriction::IsNext(l, r) => vec![l.clone(), r.clone()],
            Restriction::Last(a) => vec![a.clone()],
        }
    }

    /// Applies a plain `Variable -> Variable` renaming homomorphically to
    /// every term operand. Never lifts constants/successors into fresh
    /// variables; that only happens to predicate arguments (see
    /// [`Term::to_variable`]).
    pub fn rename(&self, subst: &Substitution) -> Restriction {
        match self {
            Restriction::Equal(l, r) => Restriction::Equal(l.rename(subst), r.rename(subst)),
            Restriction::Unequal(l, r) => Restriction::Unequal(l.rename(subst), r.rename(subst)),
            Restriction::Less(l, r) => Restriction::Less(l.rename(subst), r.rename(subst)),
            Restriction::LessEqual(l, r) => Restriction::LessEqual(l.rename(subst), r.rename(subst)),
            Restriction::IsNext(l, r) => Restriction::IsNext(l.rename(subst), r.rename(subst)),
            Restriction::Last(a) => Restriction::Last(a.rename(subst)),
        }
    }

    pub fn render(&self) -> String {
        match self {
            Restriction::Equal(l, r) => format!("{l} = {r}"),
            Restriction::Unequal(l, r) => format!("{l} ~= {r}"),
            Restriction::Less(l, r) => format!("{l} < {r}"),
            Restriction::LessEqual(l, r) => format!("{l} <= {r}"),
            Restriction::IsNext(l, r) => format!("{r} = {l}+1"),
            Restriction::Last(a) => format!("last({a})"),
        }
    }

    pub fn unequal(a: Term, b: Term) -> Restriction {
        Restriction::Unequal(a, b)
    }
}

fn symmetric_key(a: &Term, b: &Term) -> (Term, Term) {
    if a.render() <= b.render() {
        (a.clone(), b.clone())
    } else {
        (b.clone(), a.clone())
    }
}

impl PartialEq for Restriction {
    fn eq(&self, other: &Self) -> bool {
        use Restriction::*;
        match (self, other) {
            (Equal(a, b), Equal(c, d)) | (Unequal(a, b), Unequal(c, d)) => {
                symmetric_key(a, b) == symmetric_key(c, d)
            }
            (Less(a, b), Less(c, d)) => a == c && b == d,
            (LessEqual(a, b), LessEqual(c, d)) => a == c && b == d,
            (IsNext(a, b), IsNext(c, d)) => a == c && b == d,
            (Last(a), Last(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Restriction {}

impl Hash for Restriction {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Restriction::Equal(a, b) => {
                0u8.hash(state);
                let (x, y) = symmetric_key(a, b);
                x.hash(state);
                y.hash(state);
            }
            Restriction::Unequal(a, b) => {
                1u8.hash(state);
                let (x, y) = symmetric_key(a, b);
                x.hash(state);
                y.hash(state);
            }
            Restriction::Less(a, b) => {
                2u8.hash(state);
                a.hash(state);
                b.hash(state);
            }
            Restriction::LessEqual(a, b) => {
                3u8.hash(state);
                a.hash(state);
                b.hash(state);
            }
            Restriction::IsNext(a, b) => {
                4u8.hash(state);
                a.hash(state);
                b.hash(state);
            }
            Restriction::Last(a) => {
                5u8.hash(state);
                a.hash(state);
            }
        }
    }
}

impl fmt::Display for Restriction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// A conjunction of atomic restrictions: `Clause.guard`'s shape, and one
/// layer of `Broadcast.guard`'s DNF.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conjunct(pub Vec<Restriction>);

impl Conjunct {
    pub fn new(restrictions: Vec<Restriction>) -> Self {
        Self(restrictions)
    }

    pub fn rename(&self, subst: &Substitution) -> Conjunct {
        Conjunct(self.0.iter().map(|r| r.rename(subst)).collect())
    }

    pub fn variables(&self) -> netcheck_base::StableSet<crate::term::Variable> {
        let mut set = netcheck_base::StableSet::new();
        for r in &self.0 {
            set.extend(r.variables());
        }
        set
    }

    /// Appends `extra`, skipping any restriction already present.
    pub fn extended_with(&self, extra: impl IntoIterator<Item = Restriction>) -> Conjunct {
        let mut restrictions = self.0.clone();
        for r in extra {
            if !restrictions.contains(&r) {
                restrictions.push(r);
            }
        }
        Conjunct(restrictions)
    }

    pub fn contains(&self, r: &Restriction) -> bool {
        self.0.contains(r)
    }

    /// Deterministic rendering: atoms sorted by their lexicographic string
    /// form, joined with `&`.
    pub fn render_sorted(&self) -> String {
        let sorted = sort_by_key_string(self.0.clone(), |r| r.render());
        sorted
            .iter()
            .map(Restriction::render)
            .collect::<Vec<_>>()
            .join(" & ")
    }
}

/// A disjunction of [`Conjunct`]s: `Broadcast.guard`'s shape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dnf(pub Vec<Conjunct>);

impl Dnf {
    pub fn new(conjuncts: Vec<Conjunct>) -> Self {
        Self(conjuncts)
    }

    pub fn single(conjunct: Conjunct) -> Self {
        Self(vec![conjunct])
    }

    pub fn rename(&self, subst: &Substitution) -> Dnf {
        Dnf(self.0.iter().map(|c| c.rename(subst)).collect())
    }

    pub fn variables(&self) -> netcheck_base::StableSet<crate::term::Variable> {
        let mut set = netcheck_base::StableSet::new();
        for c in &self.0 {
            set.extend(c.variables());
        }
        set
    }

    /// Extends every conjunct with `extra`, per the shadow-avoidance policy
    /// adopted in [`crate::normalize`]: when any conjunct is missing a
    /// required inequality, it is added to *all* conjuncts, not only the
    /// conjunct(s) that were missing it.
    pub fn extend_all_conjuncts(&self, extra: &[Restriction]) -> Dnf {
        Dnf(self
            .0
            .iter()
            .map(|c| c.extended_with(extra.iter().cloned()))
            .collect())
    }
}
