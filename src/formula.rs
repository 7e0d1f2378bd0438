//! Formula trees.
//!
//! A [`Formula`] is an immutable node owning its children. Each node carries two
//! pieces of data derived from its children at construction time: the
//! [`VarManager`] laying out every predicate occurring in it, and the sorted list
//! of its free variables.
//!
//! Equality is structural. Commutative operators compare their children as
//! multisets, so `And(p, q) == And(q, p)`, while `Not`, `OnlyL` and `OnlyR`
//! compare children positionally. Hashing goes through the same canonical key.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use log::trace;

use crate::error::{Result, WorldsError};
use crate::predicate::Predicate;
use crate::types::Term;
use crate::vars::VarManager;

/// Logical connectives.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Op {
    And,
    Or,
    Not,
    Nand,
    Nor,
    Xor,
    Iff,
    OnlyL,
    OnlyR,
}

impl Op {
    pub const ALL: [Op; 9] = [
        Op::And,
        Op::Or,
        Op::Not,
        Op::Nand,
        Op::Nor,
        Op::Xor,
        Op::Iff,
        Op::OnlyL,
        Op::OnlyR,
    ];

    pub fn is_commutative(self) -> bool {
        !matches!(self, Op::Not | Op::OnlyL | Op::OnlyR)
    }

    pub fn name(self) -> &'static str {
        match self {
            Op::And => "and",
            Op::Or => "or",
            Op::Not => "not",
            Op::Nand => "nand",
            Op::Nor => "nor",
            Op::Xor => "xor",
            Op::Iff => "iff",
            Op::OnlyL => "onlyl",
            Op::OnlyR => "onlyr",
        }
    }

    fn check_arity(self, found: usize) -> Result<()> {
        match self {
            Op::Not if found != 1 => Err(WorldsError::arity(self.name(), "1", found)),
            Op::Not => Ok(()),
            _ if found < 2 => Err(WorldsError::arity(self.name(), "at least 2", found)),
            _ => Ok(()),
        }
    }

    /// Builds the formula with this operator over the children of `other`.
    ///
    /// `Or.alternative_to(a & b)` is `a | b`. Fails with `UnsupportedAlternative`
    /// unless `other` is itself built with an operator.
    pub fn alternative_to(self, other: &Formula) -> Result<Formula> {
        match other.node() {
            Node::Op { children, .. } => Formula::op(self, children.clone()),
            _ => Err(WorldsError::UnsupportedAlternative {
                operator: self.name().to_string(),
                formula: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Quantifier {
    Forall,
    Exists,
}

impl Quantifier {
    pub fn name(self) -> &'static str {
        match self {
            Quantifier::Forall => "forall",
            Quantifier::Exists => "exists",
        }
    }

    /// Rebinds the variable and scope of another quantified formula with this quantifier.
    pub fn alternative_to(self, other: &Formula) -> Result<Formula> {
        match other.node() {
            Node::Quant { var, child, .. } => Ok(Formula::quant(self, var.clone(), (**child).clone())),
            _ => Err(WorldsError::UnsupportedAlternative {
                operator: self.name().to_string(),
                formula: other.to_string(),
            }),
        }
    }
}

/// The variant tag of a formula node.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Kind {
    Atom,
    Truth,
    Falsity,
    Named,
    Op(Op),
    Quant(Quantifier),
}

impl Kind {
    /// Builds the formula of this kind analogous to `other`.
    ///
    /// Only operators and quantifiers define alternatives; every other kind fails
    /// with `UnsupportedAlternative`.
    pub fn alternative_to(self, other: &Formula) -> Result<Formula> {
        match self {
            Kind::Op(op) => op.alternative_to(other),
            Kind::Quant(q) => q.alternative_to(other),
            Kind::Atom | Kind::Truth | Kind::Falsity | Kind::Named => {
                Err(WorldsError::UnsupportedAlternative {
                    operator: format!("{:?}", self).to_lowercase(),
                    formula: other.to_string(),
                })
            }
        }
    }
}

#[derive(Debug, Clone)]
pub enum Node {
    Atom {
        pred: Predicate,
        args: Vec<Term>,
    },
    Truth,
    Falsity,
    /// Display wrapper; evaluates exactly as its child.
    Named {
        name: String,
        latex: Option<String>,
        child: Box<Formula>,
    },
    Op {
        op: Op,
        children: Vec<Formula>,
    },
    Quant {
        quantifier: Quantifier,
        var: String,
        child: Box<Formula>,
    },
}

#[derive(Clone)]
pub struct Formula {
    node: Node,
    vm: Arc<VarManager>,
    free_vars: Vec<String>,
}

impl Formula {
    pub(crate) fn atom_unchecked(pred: Predicate, args: Vec<Term>) -> Self {
        let vm = Arc::new(VarManager::single(&pred));
        let mut free_vars: Vec<String> = args.iter().filter_map(Term::as_var).map(String::from).collect();
        free_vars.sort();
        free_vars.dedup();
        Self {
            node: Node::Atom { pred, args },
            vm,
            free_vars,
        }
    }

    /// The tautology.
    pub fn truth() -> Self {
        Self::leaf(Node::Truth)
    }

    /// The contradiction.
    pub fn falsity() -> Self {
        Self::leaf(Node::Falsity)
    }

    fn leaf(node: Node) -> Self {
        Self {
            node,
            vm: Arc::new(VarManager::default()),
            free_vars: Vec::new(),
        }
    }

    /// Wraps `child` under a display name.
    pub fn named(name: impl Into<String>, child: Formula) -> Self {
        Self::wrap(name.into(), None, child)
    }

    /// Wraps `child` under a display name with a separate LaTeX rendering.
    pub fn named_latex(name: impl Into<String>, latex: impl Into<String>, child: Formula) -> Self {
        Self::wrap(name.into(), Some(latex.into()), child)
    }

    fn wrap(name: String, latex: Option<String>, child: Formula) -> Self {
        let vm = child.vm.clone();
        let free_vars = child.free_vars.clone();
        Self {
            node: Node::Named {
                name,
                latex,
                child: Box::new(child),
            },
            vm,
            free_vars,
        }
    }

    /// Combines `children` with `op`.
    ///
    /// Fails with `ArityMismatch` if `op` is `Not` and there is not exactly one
    /// child, or if any other operator gets fewer than two. Fails with
    /// `DuplicateArityMismatch` or `DomainMismatch` if the children's predicates
    /// cannot share a column layout.
    pub fn op(op: Op, children: Vec<Formula>) -> Result<Self> {
        op.check_arity(children.len())?;
        let vm = if children.len() == 1 {
            children[0].vm.clone()
        } else {
            Arc::new(VarManager::merge(children.iter().map(|c| c.vars()))?)
        };
        let mut free_vars: Vec<String> = children
            .iter()
            .flat_map(|c| c.free_vars.iter().cloned())
            .collect();
        free_vars.sort();
        free_vars.dedup();
        trace!("op({}, {} children) over {} columns", op, children.len(), vm.total_columns());
        Ok(Self {
            node: Node::Op { op, children },
            vm,
            free_vars,
        })
    }

    pub fn not(child: Formula) -> Self {
        let vm = child.vm.clone();
        let free_vars = child.free_vars.clone();
        Self {
            node: Node::Op {
                op: Op::Not,
                children: vec![child],
            },
            vm,
            free_vars,
        }
    }

    pub fn and(children: impl IntoIterator<Item = Formula>) -> Result<Self> {
        Self::op(Op::And, children.into_iter().collect())
    }

    pub fn or(children: impl IntoIterator<Item = Formula>) -> Result<Self> {
        Self::op(Op::Or, children.into_iter().collect())
    }

    pub fn nand(children: impl IntoIterator<Item = Formula>) -> Result<Self> {
        Self::op(Op::Nand, children.into_iter().collect())
    }

    pub fn nor(children: impl IntoIterator<Item = Formula>) -> Result<Self> {
        Self::op(Op::Nor, children.into_iter().collect())
    }

    pub fn xor(children: impl IntoIterator<Item = Formula>) -> Result<Self> {
        Self::op(Op::Xor, children.into_iter().collect())
    }

    pub fn iff(children: impl IntoIterator<Item = Formula>) -> Result<Self> {
        Self::op(Op::Iff, children.into_iter().collect())
    }

    pub fn only_l(children: impl IntoIterator<Item = Formula>) -> Result<Self> {
        Self::op(Op::OnlyL, children.into_iter().collect())
    }

    pub fn only_r(children: impl IntoIterator<Item = Formula>) -> Result<Self> {
        Self::op(Op::OnlyR, children.into_iter().collect())
    }

    /// Binary conjunction `self & other`.
    pub fn conj(&self, other: &Formula) -> Result<Self> {
        Self::and([self.clone(), other.clone()])
    }

    /// Binary disjunction `self | other`.
    pub fn disj(&self, other: &Formula) -> Result<Self> {
        Self::or([self.clone(), other.clone()])
    }

    pub fn quant(quantifier: Quantifier, var: impl Into<String>, child: Formula) -> Self {
        let var = var.into();
        let vm = child.vm.clone();
        let free_vars = child.free_vars.iter().filter(|v| **v != var).cloned().collect();
        Self {
            node: Node::Quant {
                quantifier,
                var,
                child: Box::new(child),
            },
            vm,
            free_vars,
        }
    }

    pub fn forall(var: impl Into<String>, child: Formula) -> Self {
        Self::quant(Quantifier::Forall, var, child)
    }

    pub fn exists(var: impl Into<String>, child: Formula) -> Self {
        Self::quant(Quantifier::Exists, var, child)
    }

    /// Builds the formula of kind `self.kind()` analogous to `other`.
    pub fn alternative_to(&self, other: &Formula) -> Result<Self> {
        self.kind().alternative_to(other)
    }
}

impl Formula {
    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn kind(&self) -> Kind {
        match &self.node {
            Node::Atom { .. } => Kind::Atom,
            Node::Truth => Kind::Truth,
            Node::Falsity => Kind::Falsity,
            Node::Named { .. } => Kind::Named,
            Node::Op { op, .. } => Kind::Op(*op),
            Node::Quant { quantifier, .. } => Kind::Quant(*quantifier),
        }
    }

    /// Direct sub-formulas.
    pub fn children(&self) -> &[Formula] {
        match &self.node {
            Node::Atom { .. } | Node::Truth | Node::Falsity => &[],
            Node::Named { child, .. } | Node::Quant { child, .. } => std::slice::from_ref(&**child),
            Node::Op { children, .. } => children,
        }
    }

    /// Column layout of every predicate occurring in the formula.
    pub fn vars(&self) -> &VarManager {
        &self.vm
    }

    /// Free variables, lexically sorted.
    pub fn free_vars(&self) -> &[String] {
        &self.free_vars
    }

    /// Folds the tree bottom-up, handing each node's layer to `f` with the
    /// results already computed for its children.
    pub fn fold<R, F>(&self, f: &mut F) -> R
    where
        F: FnMut(&Formula, Layer<'_, R>) -> R,
    {
        let layer = match &self.node {
            Node::Atom { pred, args } => Layer::Atom(pred, args),
            Node::Truth => Layer::Truth,
            Node::Falsity => Layer::Falsity,
            Node::Named { name, latex, child } => {
                Layer::Named(name, latex.as_deref(), child.fold(f))
            }
            Node::Op { op, children } => {
                Layer::Op(*op, children.iter().map(|c| c.fold(f)).collect())
            }
            Node::Quant {
                quantifier,
                var,
                child,
            } => Layer::Quant(*quantifier, var, child.fold(f)),
        };
        f(self, layer)
    }

    fn key(&self) -> Key<'_> {
        match &self.node {
            Node::Atom { pred, args } => Key::Atom(pred.name(), args),
            Node::Truth => Key::Truth,
            Node::Falsity => Key::Falsity,
            Node::Named { name, child, .. } => Key::Named(name, Box::new(child.key())),
            Node::Op { op, children } => {
                let mut keys: Vec<Key<'_>> = children.iter().map(Formula::key).collect();
                if op.is_commutative() {
                    keys.sort();
                }
                Key::Op(*op, keys)
            }
            Node::Quant {
                quantifier,
                var,
                child,
            } => Key::Quant(*quantifier, var, Box::new(child.key())),
        }
    }
}

/// One node of a formula with its children replaced by fold results.
#[derive(Debug)]
pub enum Layer<'a, R> {
    Atom(&'a Predicate, &'a [Term]),
    Truth,
    Falsity,
    Named(&'a str, Option<&'a str>, R),
    Op(Op, Vec<R>),
    Quant(Quantifier, &'a str, R),
}

/// Canonical structural form used for equality and hashing.
#[derive(Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
enum Key<'a> {
    Atom(&'a str, &'a [Term]),
    Truth,
    Falsity,
    Named(&'a str, Box<Key<'a>>),
    Op(Op, Vec<Key<'a>>),
    Quant(Quantifier, &'a str, Box<Key<'a>>),
}

impl PartialEq for Formula {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Formula {}

impl Hash for Formula {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl std::ops::Not for Formula {
    type Output = Formula;

    fn not(self) -> Self::Output {
        Formula::not(self)
    }
}

impl fmt::Debug for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Formula")
            .field(&format_args!("{}", self))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::hash_map::DefaultHasher;
    use std::collections::HashSet;

    use super::*;
    use crate::types::Domain;

    use test_log::test;

    fn hash_of(f: &Formula) -> u64 {
        let mut h = DefaultHasher::new();
        f.hash(&mut h);
        h.finish()
    }

    fn abc() -> (Formula, Formula, Formula) {
        let d = Domain::default();
        (
            Predicate::new(d, "a", 0).atom(),
            Predicate::new(d, "b", 0).atom(),
            Predicate::new(d, "c", 0).atom(),
        )
    }

    #[test]
    fn test_commutative_equality() {
        let (a, b, _) = abc();
        for op in Op::ALL.into_iter().filter(|op| op.is_commutative()) {
            let f = Formula::op(op, vec![a.clone(), b.clone()]).unwrap();
            let g = Formula::op(op, vec![b.clone(), a.clone()]).unwrap();
            assert_eq!(f, g, "{} should be commutative", op);
            assert_eq!(hash_of(&f), hash_of(&g));
        }
    }

    #[test]
    fn test_non_commutative_inequality() {
        let (a, b, _) = abc();
        for op in [Op::OnlyL, Op::OnlyR] {
            let f = Formula::op(op, vec![a.clone(), b.clone()]).unwrap();
            let g = Formula::op(op, vec![b.clone(), a.clone()]).unwrap();
            assert_ne!(f, g, "{} should not be commutative", op);
        }
    }

    #[test]
    fn test_multiset_equality() {
        let (a, b, _) = abc();
        let f = Formula::and([a.clone(), a.clone(), b.clone()]).unwrap();
        let g = Formula::and([a.clone(), b.clone(), a.clone()]).unwrap();
        let h = Formula::and([a.clone(), b.clone(), b.clone()]).unwrap();
        assert_eq!(f, g);
        assert_ne!(f, h);
    }

    #[test]
    fn test_different_operators_differ() {
        let (a, b, _) = abc();
        let f = Formula::and([a.clone(), b.clone()]).unwrap();
        let g = Formula::or([a, b]).unwrap();
        assert_ne!(f, g);
    }

    #[test]
    fn test_nested_commutative_equality() {
        let (a, b, c) = abc();
        let f = Formula::or([Formula::and([a.clone(), b.clone()]).unwrap(), c.clone()]).unwrap();
        let g = Formula::or([c, Formula::and([b, a]).unwrap()]).unwrap();
        assert_eq!(f, g);
        let set: HashSet<Formula> = [f, g].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_not_arity() {
        let (a, b, _) = abc();
        assert!(matches!(
            Formula::op(Op::Not, vec![a.clone(), b]),
            Err(WorldsError::ArityMismatch { found: 2, .. })
        ));
        assert!(matches!(
            Formula::op(Op::Not, vec![]),
            Err(WorldsError::ArityMismatch { found: 0, .. })
        ));
        assert_eq!(Formula::op(Op::Not, vec![a.clone()]).unwrap(), !a);
    }

    #[test]
    fn test_nary_arity() {
        let (a, _, _) = abc();
        for op in Op::ALL.into_iter().filter(|&op| op != Op::Not) {
            assert!(matches!(
                Formula::op(op, vec![a.clone()]),
                Err(WorldsError::ArityMismatch { found: 1, .. })
            ));
        }
    }

    #[test]
    fn test_vm_merged_from_children() {
        let d = Domain::new(2);
        let a = Predicate::new(d, "a", 0).atom();
        let r = Predicate::new(d, "r", 2).atom();
        let f = Formula::and([r, !a]).unwrap();
        assert_eq!(f.vars().total_columns(), 5);
        assert_eq!(f.vars().offset("a"), Some(0));
        assert_eq!(f.vars().offset("r"), Some(1));
        assert_eq!(f.free_vars(), &["x", "y"]);
    }

    #[test]
    fn test_inconsistent_arity_across_children() {
        let d = Domain::new(2);
        let p0 = Predicate::new(d, "p", 0).atom();
        let p1 = Predicate::new(d, "p", 1).atom();
        assert!(matches!(
            Formula::or([p0, p1]),
            Err(WorldsError::DuplicateArityMismatch { .. })
        ));
    }

    #[test]
    fn test_quantifier_binds_variable() {
        let d = Domain::new(2);
        let r = Predicate::new(d, "r", 2).atom();
        let f = Formula::exists("y", r);
        assert_eq!(f.free_vars(), &["x"]);
        let g = Formula::forall("x", f);
        assert!(g.free_vars().is_empty());
    }

    #[test]
    fn test_named_equality_is_opaque() {
        let (a, b, _) = abc();
        let f = Formula::and([a.clone(), b.clone()]).unwrap();
        let n1 = Formula::named("A", f.clone());
        let n2 = Formula::named_latex("A", r"\mathcal{A}", f.clone());
        let n3 = Formula::named("B", f.clone());
        assert_eq!(n1, n2);
        assert_ne!(n1, n3);
        assert_ne!(n1, f);
        assert_eq!(n1.vars(), f.vars());
    }

    #[test]
    fn test_alternative_to_operator() {
        let (a, b, _) = abc();
        let f = Formula::and([a.clone(), b.clone()]).unwrap();
        let g = Op::Or.alternative_to(&f).unwrap();
        assert_eq!(g, Formula::or([a.clone(), b.clone()]).unwrap());

        let h = Formula::xor([a.clone(), b.clone()]).unwrap();
        assert_eq!(h.alternative_to(&g).unwrap(), h);
    }

    #[test]
    fn test_alternative_to_unsupported() {
        let (a, b, _) = abc();
        let f = Formula::and([a.clone(), b]).unwrap();
        assert!(matches!(
            Op::Or.alternative_to(&a),
            Err(WorldsError::UnsupportedAlternative { .. })
        ));
        assert!(matches!(
            a.alternative_to(&f),
            Err(WorldsError::UnsupportedAlternative { .. })
        ));
        assert!(matches!(
            Formula::truth().alternative_to(&f),
            Err(WorldsError::UnsupportedAlternative { .. })
        ));
        assert!(matches!(
            Quantifier::Exists.alternative_to(&f),
            Err(WorldsError::UnsupportedAlternative { .. })
        ));
        // `And` over the single child of a negation is not well-formed.
        assert!(matches!(
            Op::And.alternative_to(&!a),
            Err(WorldsError::ArityMismatch { .. })
        ));
    }

    #[test]
    fn test_alternative_to_keeps_quantifiers_and_names() {
        let d = Domain::new(2);
        let all = Formula::forall("x", Predicate::new(d, "p", 1).atom());
        assert!(matches!(
            Op::Not.alternative_to(&all),
            Err(WorldsError::UnsupportedAlternative { .. })
        ));

        let (a, b, _) = abc();
        let named = Formula::named("A", Formula::and([a, b]).unwrap());
        assert!(matches!(
            Op::Not.alternative_to(&named),
            Err(WorldsError::UnsupportedAlternative { .. })
        ));
        assert!(matches!(
            Op::Or.alternative_to(&named),
            Err(WorldsError::UnsupportedAlternative { .. })
        ));
    }

    #[test]
    fn test_alternative_to_quantifier() {
        let d = Domain::new(2);
        let p = Predicate::new(d, "p", 1).atom();
        let all = Formula::forall("x", p.clone());
        let some = Quantifier::Exists.alternative_to(&all).unwrap();
        assert_eq!(some, Formula::exists("x", p));
    }

    #[test]
    fn test_children_and_kind() {
        let (a, b, _) = abc();
        let f = Formula::only_l([a.clone(), b.clone()]).unwrap();
        assert_eq!(f.kind(), Kind::Op(Op::OnlyL));
        assert_eq!(f.children(), &[a.clone(), b]);
        assert!(a.children().is_empty());
        let n = Formula::named("A", a.clone());
        assert_eq!(n.children(), &[a]);
    }
}
