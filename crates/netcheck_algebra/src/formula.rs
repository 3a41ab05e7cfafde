//! The WS1S formula algebra: a closed sum type with `simplify`, `negate`,
//! and `render`, rendered in the concrete surface syntax accepted by the
//! MONA decision procedure.
//!
//! Guarded first-order quantifiers are a rendering concern, not an AST
//! concern: the range guard `0 <= v & v < n` is synthesized by `render`
//! and never stored as a child of [`Formula::ExistsFirstOrder`] /
//! [`Formula::ForallFirstOrder`], so adding a future quantifier variant
//! never duplicates the guard logic.

use netcheck_model::{Term, Variable};

/// The reserved first-order variable denoting the system's size, used only
/// by the guard synthesized around first-order quantifiers.
pub const SIZE_VARIABLE: &str = "n";

/// A WS1S formula. Immutable: every transformation returns a new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Formula {
    /// An opaque, already-rendered fragment (e.g. an `assumption`/`property`
    /// string supplied verbatim by the front-end).
    Raw(String),
    Constant(bool),
    Conjunction(Vec<Formula>),
    Disjunction(Vec<Formula>),
    Implication(Box<Formula>, Box<Formula>),
    Negation(Box<Formula>),
    Equal(Term, Term),
    Unequal(Term, Term),
    Less(Term, Term),
    LessEqual(Term, Term),
    /// First-order `x` participates in second-order `set`.
    ElementIn(Variable, Variable),
    ElementNotIn(Variable, Variable),
    PredicateCall(String, Vec<Term>),
    ExistsFirstOrder(Vec<Variable>, Box<Formula>),
    ForallFirstOrder(Vec<Variable>, Box<Formula>),
    ExistsSecondOrder(Vec<Variable>, Box<Formula>),
    ForallSecondOrder(Vec<Variable>, Box<Formula>),
}

impl Formula {
    pub fn and(parts: impl IntoIterator<Item = Formula>) -> Formula {
        Formula::Conjunction(parts.into_iter().collect())
    }

    pub fn or(parts: impl IntoIterator<Item = Formula>) -> Formula {
        Formula::Disjunction(parts.into_iter().collect())
    }

    pub fn implies(self, then: Formula) -> Formula {
        Formula::Implication(Box::new(self), Box::new(then))
    }

    pub fn not(self) -> Formula {
        Formula::Negation(Box::new(self))
    }

    pub fn exists1(vars: Vec<Variable>, inner: Formula) -> Formula {
        Formula::ExistsFirstOrder(vars, Box::new(inner))
    }

    pub fn forall1(vars: Vec<Variable>, inner: Formula) -> Formula {
        Formula::ForallFirstOrder(vars, Box::new(inner))
    }

    pub fn exists2(vars: Vec<Variable>, inner: Formula) -> Formula {
        Formula::ExistsSecondOrder(vars, Box::new(inner))
    }

    pub fn forall2(vars: Vec<Variable>, inner: Formula) -> Formula {
        Formula::ForallSecondOrder(vars, Box::new(inner))
    }

    /// Total, never fails, idempotent: absorbs identities, short-circuits
    /// annihilators, unwraps singletons, flattens same-kind children, and
    /// recurses into every child before applying its own rule.
    pub fn simplify(&self) -> Formula {
        match self {
            Formula::Raw(_) | Formula::Constant(_) => self.clone(),
            Formula::Conjunction(parts) => simplify_conjunction(parts),
            Formula::Disjunction(parts) => simplify_disjunction(parts),
            Formula::Implication(left, right) => simplify_implication(left, right),
            Formula::Negation(inner) => inner.negate().simplify(),
            Formula::Equal(_, _)
            | Formula::Unequal(_, _)
            | Formula::Less(_, _)
            | Formula::LessEqual(_, _)
            | Formula::ElementIn(_, _)
            | Formula::ElementNotIn(_, _)
            | Formula::PredicateCall(_, _) => self.clone(),
            Formula::ExistsFirstOrder(vars, inner) => simplify_quantifier(vars, inner, Formula::ExistsFirstOrder),
            Formula::ForallFirstOrder(vars, inner) => simplify_quantifier(vars, inner, Formula::ForallFirstOrder),
            Formula::ExistsSecondOrder(vars, inner) => simplify_quantifier(vars, inner, Formula::ExistsSecondOrder),
            Formula::ForallSecondOrder(vars, inner) => simplify_quantifier(vars, inner, Formula::ForallSecondOrder),
        }
    }

    /// Syntactic negation, pushed inward wherever a dual exists.
    /// `PredicateCall` has no syntactic dual and is wrapped in `Negation`.
    pub fn negate(&self) -> Formula {
        match self {
            Formula::Raw(_) => Formula::Negation(Box::new(self.clone())),
            Formula::Constant(b) => Formula::Constant(!b),
            Formula::Conjunction(parts) => Formula::Disjunction(parts.iter().map(Formula::negate).collect()),
            Formula::Disjunction(parts) => Formula::Conjunction(parts.iter().map(Formula::negate).collect()),
            Formula::Implication(left, right) => {
                Formula::Conjunction(vec![(**left).clone(), right.negate()])
            }
            Formula::Negation(inner) => (**inner).clone(),
            Formula::Equal(a, b) => Formula::Unequal(a.clone(), b.clone()),
            Formula::Unequal(a, b) => Formula::Equal(a.clone(), b.clone()),
            Formula::Less(a, b) => Formula::LessEqual(b.clone(), a.clone()),
            Formula::LessEqual(a, b) => Formula::Less(b.clone(), a.clone()),
            Formula::ElementIn(x, set) => Formula::ElementNotIn(x.clone(), set.clone()),
            Formula::ElementNotIn(x, set) => Formula::ElementIn(x.clone(), set.clone()),
            Formula::PredicateCall(_, _) => Formula::Negation(Box::new(self.clone())),
            Formula::ExistsFirstOrder(vars, inner) => Formula::ForallFirstOrder(vars.clone(), Box::new(inner.negate())),
            Formula::ForallFirstOrder(vars, inner) => Formula::ExistsFirstOrder(vars.clone(), Box::new(inner.negate())),
            Formula::ExistsSecondOrder(vars, inner) => {
                Formula::ForallSecondOrder(vars.clone(), Box::new(inner.negate()))
            }
            Formula::ForallSecondOrder(vars, inner) => {
                Formula::ExistsSecondOrder(vars.clone(), Box::new(inner.negate()))
            }
        }
    }

    /// Renders the MONA surface syntax: block-indented, parenthesized infix
    /// `&`/`|`, `~( ... )` negation, `ex1`/`all1`/`ex2`/`all2` quantifier
    /// keywords. First-order quantifiers render with the range guard
    /// conjoined (existential) or implied (universal).
    pub fn render(&self) -> String {
        match self {
            Formula::Raw(text) => text.clone(),
            Formula::Constant(true) => "true".to_string(),
            Formula::Constant(false) => "false".to_string(),
            Formula::Conjunction(parts) => render_chain(parts, "&"),
            Formula::Disjunction(parts) => render_chain(parts, "|"),
            Formula::Implication(left, right) => {
                format!("(\n{}\n) => (\n{}\n)", block_indent(&left.render()), block_indent(&right.render()))
            }
            Formula::Negation(inner) => format!("~(\n{}\n)", block_indent(&inner.render())),
            Formula::Equal(a, b) => format!("{} = {}", a.render(), b.render()),
            Formula::Unequal(a, b) => format!("{} ~= {}", a.render(), b.render()),
            Formula::Less(a, b) => format!("{} < {}", a.render(), b.render()),
            Formula::LessEqual(a, b) => format!("{} <= {}", a.render(), b.render()),
            Formula::ElementIn(x, set) => format!("{} in {}", x, set),
            Formula::ElementNotIn(x, set) => format!("{} notin {}", x, set),
            Formula::PredicateCall(name, args) => {
                let args = args.iter().map(Term::render).collect::<Vec<_>>().join(", ");
                format!("{name}({args})")
            }
            Formula::ExistsFirstOrder(vars, inner) => render_quantifier("ex1", vars, &guarded_exists(vars, inner)),
            Formula::ForallFirstOrder(vars, inner) => render_quantifier("all1", vars, &guarded_forall(vars, inner)),
            Formula::ExistsSecondOrder(vars, inner) => render_quantifier("ex2", vars, inner),
            Formula::ForallSecondOrder(vars, inner) => render_quantifier("all2", vars, inner),
        }
    }
}

impl std::fmt::Display for Formula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

fn block_indent(block: &str) -> String {
    block.split('\n').map(|line| format!("  {line}")).collect::<Vec<_>>().join("\n")
}

fn render_chain(parts: &[Formula], symbol: &str) -> String {
    let rendered: Vec<String> = parts.iter().map(|p| block_indent(&p.render())).collect();
    let inner = rendered.join(&format!("\n) {symbol} (\n"));
    format!("(\n{inner}\n)")
}

fn render_quantifier(kind: &str, vars: &[Variable], inner: &Formula) -> String {
    let names = vars.iter().map(Variable::name).collect::<Vec<_>>().join(", ");
    format!("{kind} {names}: (\n{}\n)", block_indent(&inner.render()))
}

/// `0 <= v & v < n` for every quantified first-order variable, as a single
/// conjunction (or `true` if `vars` is empty).
fn range_guard(vars: &[Variable]) -> Formula {
    let n = Term::var(SIZE_VARIABLE);
    let zero = Term::Constant(0);
    let mut atoms = Vec::with_capacity(vars.len() * 2);
    for v in vars {
        atoms.push(Formula::LessEqual(zero.clone(), Term::Variable(v.clone())));
        atoms.push(Formula::Less(Term::Variable(v.clone()), n.clone()));
    }
    Formula::Conjunction(atoms)
}

fn guarded_exists(vars: &[Variable], inner: &Formula) -> Formula {
    Formula::Conjunction(vec![range_guard(vars), inner.clone()]).simplify()
}

fn guarded_forall(vars: &[Variable], inner: &Formula) -> Formula {
    Formula::Implication(Box::new(range_guard(vars)), Box::new(inner.clone())).simplify()
}

fn simplify_conjunction(parts: &[Formula]) -> Formula {
    let simplified: Vec<Formula> = parts
        .iter()
        .map(Formula::simplify)
        .filter(|f| !matches!(f, Formula::Constant(true)))
        .collect();
    if simplified.iter().any(|f| matches!(f, Formula::Constant(false))) {
        return Formula::Constant(false);
    }
    if simplified.is_empty() {
        return Formula::Constant(true);
    }
    if simplified.len() == 1 {
        return simplified.into_iter().next().unwrap();
    }
    let mut flattened = Vec::with_capacity(simplified.len());
    for f in simplified {
        match f {
            Formula::Conjunction(inner) => flattened.extend(inner),
            other => flattened.push(other),
        }
    }
    Formula::Conjunction(flattened)
}

fn simplify_disjunction(parts: &[Formula]) -> Formula {
    let simplified: Vec<Formula> = parts
        .iter()
        .map(Formula::simplify)
        .filter(|f| !matches!(f, Formula::Constant(false)))
        .collect();
    if simplified.iter().any(|f| matches!(f, Formula::Constant(true))) {
        return Formula::Constant(true);
    }
    if simplified.is_empty() {
        return Formula::Constant(false);
    }
    if simplified.len() == 1 {
        return simplified.into_iter().next().unwrap();
    }
    let mut flattened = Vec::with_capacity(simplified.len());
    for f in simplified {
        match f {
            Formula::Disjunction(inner) => flattened.extend(inner),
            other => flattened.push(other),
        }
    }
    Formula::Disjunction(flattened)
}

fn simplify_implication(left: &Formula, right: &Formula) -> Formula {
    let left = left.simplify();
    let right = right.simplify();
    match (&left, &right) {
        (Formula::Constant(true), _) => right,
        (Formula::Constant(false), _) => Formula::Constant(true),
        (_, Formula::Constant(true)) => Formula::Constant(true),
        (_, Formula::Constant(false)) => left.negate().simplify(),
        (_, Formula::Implication(inner_left, inner_right)) => {
            let new_left = Formula::Conjunction(vec![left, (**inner_left).clone()]).simplify();
            let new_right = inner_right.simplify();
            Formula::Implication(Box::new(new_left), Box::new(new_right))
        }
        _ => Formula::Implication(Box::new(left), Box::new(right)),
    }
}

fn simplify_quantifier(
    vars: &[Variable],
    inner: &Formula,
    rebuild: impl Fn(Vec<Variable>, Box<Formula>) -> Formula,
) -> Formula {
    let inner = inner.simplify();
    if vars.is_empty() {
        inner
    } else {
        rebuild(vars.to_vec(), Box::new(inner))
    }
}

/// A top-level `pred NAME(var2 ..., var1 ...) = ( BODY );` definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredicateDefinition {
    pub name: String,
    pub second_order: Vec<Variable>,
    pub first_order: Vec<Variable>,
    pub body: Formula,
}

impl PredicateDefinition {
    pub fn new(
        name: impl Into<String>,
        second_order: Vec<Variable>,
        first_order: Vec<Variable>,
        body: Formula,
    ) -> Self {
        Self {
            name: name.into(),
            second_order,
            first_order,
            body,
        }
    }

    pub fn simplify(&self) -> PredicateDefinition {
        PredicateDefinition {
            name: self.name.clone(),
            second_order: self.second_order.clone(),
            first_order: self.first_order.clone(),
            body: self.body.simplify(),
        }
    }

    pub fn render(&self) -> String {
        let params = self
            .second_order
            .iter()
            .map(|v| format!("var2 {v}"))
            .chain(self.first_order.iter().map(|v| format!("var1 {v}")))
            .collect::<Vec<_>>()
            .join(", ");
        format!("pred {}({params}) = (\n{}\n);", self.name, block_indent(&self.body.render()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(name: &str) -> Variable {
        Variable::new(name)
    }

    #[test]
    fn conjunction_absorbs_true_and_flattens() {
        let f = Formula::and([
            Formula::Constant(true),
            Formula::and([Formula::PredicateCall("p".into(), vec![])]),
        ]);
        assert_eq!(f.simplify(), Formula::PredicateCall("p".into(), vec![]));
    }

    #[test]
    fn conjunction_short_circuits_on_false() {
        let f = Formula::and([Formula::PredicateCall("p".into(), vec![]), Formula::Constant(false)]);
        assert_eq!(f.simplify(), Formula::Constant(false));
    }

    #[test]
    fn disjunction_short_circuits_on_true() {
        let f = Formula::or([Formula::PredicateCall("p".into(), vec![]), Formula::Constant(true)]);
        assert_eq!(f.simplify(), Formula::Constant(true));
    }

    #[test]
    fn empty_conjunction_is_true_empty_disjunction_is_false() {
        assert_eq!(Formula::and([]).simplify(), Formula::Constant(true));
        assert_eq!(Formula::or([]).simplify(), Formula::Constant(false));
    }

    #[test]
    fn implication_right_associates() {
        let a = Formula::PredicateCall("a".into(), vec![]);
        let b = Formula::PredicateCall("b".into(), vec![]);
        let c = Formula::PredicateCall("c".into(), vec![]);
        let f = a.clone().implies(b.clone().implies(c.clone()));
        let simplified = f.simplify();
        match simplified {
            Formula::Implication(left, right) => {
                assert_eq!(*left, Formula::and([a, b]).simplify());
                assert_eq!(*right, c);
            }
            other => panic!("expected Implication, got {other:?}"),
        }
    }

    #[test]
    fn negation_pushes_through_de_morgan() {
        let f = Formula::and([
            Formula::PredicateCall("a".into(), vec![]),
            Formula::PredicateCall("b".into(), vec![]),
        ]);
        let negated = f.clone().not().simplify();
        assert_eq!(
            negated,
            Formula::or([
                Formula::PredicateCall("a".into(), vec![]).negate(),
                Formula::PredicateCall("b".into(), vec![]).negate(),
            ])
        );
    }

    #[test]
    fn double_negation_is_identity_after_simplify() {
        let f = Formula::Equal(Term::var("x"), Term::var("y"));
        assert_eq!(f.negate().negate(), f);
    }

    #[test]
    fn comparison_duals_are_pairwise() {
        let x = Term::var("x");
        let y = Term::var("y");
        assert_eq!(Formula::Equal(x.clone(), y.clone()).negate(), Formula::Unequal(x.clone(), y.clone()));
        assert_eq!(Formula::Less(x.clone(), y.clone()).negate(), Formula::LessEqual(y.clone(), x.clone()));
    }

    #[test]
    fn quantifier_duals_swap_kind_and_negate_inner() {
        let inner = Formula::PredicateCall("p".into(), vec![Term::Variable(v("x"))]);
        let f = Formula::exists1(vec![v("x")], inner.clone());
        assert_eq!(f.negate(), Formula::forall1(vec![v("x")], inner.negate()));
    }

    #[test]
    fn quantifier_with_no_variables_collapses_to_inner() {
        let inner = Formula::Constant(true);
        let f = Formula::exists2(vec![], inner.clone());
        assert_eq!(f.simplify(), inner);
    }

    #[test]
    fn first_order_existential_renders_with_range_guard() {
        let f = Formula::exists1(vec![v("x_0")], Formula::PredicateCall("p".into(), vec![Term::var("x_0")]));
        let rendered = f.render();
        assert!(rendered.starts_with("ex1 x_0: ("));
        assert!(rendered.contains("x_0 < n"));
        assert!(rendered.contains("0 <= x_0"));
    }

    #[test]
    fn simplify_is_idempotent() {
        let f = Formula::and([
            Formula::Constant(true),
            Formula::or([Formula::Constant(false), Formula::PredicateCall("p".into(), vec![])]),
        ]);
        let once = f.simplify();
        let twice = once.simplify();
        assert_eq!(once, twice);
    }

    #[test]
    fn rendering_is_deterministic() {
        let f = Formula::and([
            Formula::Equal(Term::var("x"), Term::var("y")),
            Formula::PredicateCall("p".into(), vec![Term::var("x")]),
        ]);
        assert_eq!(f.render(), f.render());
    }

    #[test]
    fn predicate_definition_renders_var2_then_var1() {
        let def = PredicateDefinition::new(
            "trap",
            vec![v("T")],
            vec![v("x_0")],
            Formula::PredicateCall("p".into(), vec![Term::var("x_0")]),
        );
        let rendered = def.render();
        assert!(rendered.starts_with("pred trap(var2 T, var1 x_0) = (\n"));
        assert!(rendered.trim_end().ends_with(");"));
    }
}
