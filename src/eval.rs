//! Vectorized evaluation of formulas over a worlds matrix.
//!
//! Every node evaluates to a [`Valuation`]: one bit per world. Operators combine
//! their children's valuations word by word.

use bitvec::prelude::*;
use log::debug;

use crate::assignment::Worlds;
use crate::error::{Result, WorldsError};
use crate::formula::{Formula, Node, Op, Quantifier};
use crate::types::{Term, Valuation};
use crate::vars::VarManager;

/// Values of the variables bound by enclosing quantifiers, innermost last.
type Bindings<'a> = Vec<(&'a str, usize)>;

impl Op {
    /// Combines the children's valuations, all of the same length.
    ///
    /// # Panics
    ///
    /// Panics if `values` is empty.
    pub fn reduce(self, values: Vec<Valuation>) -> Valuation {
        assert!(!values.is_empty(), "`{}` needs at least one valuation", self);
        match self {
            Op::Not => {
                let mut values = values;
                !values.swap_remove(0)
            }
            Op::And => all(values),
            Op::Or => any(values),
            Op::Nand => !all(values),
            Op::Nor => !any(values),
            Op::Xor => {
                // Some but not all.
                let mut some = any(values.clone());
                some &= (!all(values)).as_bitslice();
                some
            }
            Op::Iff => {
                // All or none.
                let mut every = all(values.clone());
                every |= (!any(values)).as_bitslice();
                every
            }
            Op::OnlyL => {
                let mut values = values;
                let first = values.remove(0);
                only(first, values)
            }
            Op::OnlyR => {
                let mut values = values;
                let last = values.pop().unwrap_or_default();
                only(last, values)
            }
        }
    }
}

fn all(values: Vec<Valuation>) -> Valuation {
    let mut iter = values.into_iter();
    let mut acc = iter.next().unwrap_or_default();
    for v in iter {
        acc &= v.as_bitslice();
    }
    acc
}

fn any(values: Vec<Valuation>) -> Valuation {
    let mut iter = values.into_iter();
    let mut acc = iter.next().unwrap_or_default();
    for v in iter {
        acc |= v.as_bitslice();
    }
    acc
}

/// `chosen` and none of `others`.
fn only(mut chosen: Valuation, others: Vec<Valuation>) -> Valuation {
    for v in others {
        chosen &= (!v).as_bitslice();
    }
    chosen
}

impl Formula {
    /// Evaluates the formula in every world of `worlds`, interpreting predicates
    /// through the column layout of `vm`.
    ///
    /// Fails with `WorldsShapeMismatch` if the matrix width differs from the
    /// manager's column count, with `UnknownPredicate` if a predicate of the formula
    /// is missing from `vm`, and with `UnboundVariable` if the formula has free
    /// variables.
    pub fn evaluate(&self, worlds: &Worlds, vm: &VarManager) -> Result<Valuation> {
        if worlds.width() != vm.total_columns() {
            return Err(WorldsError::WorldsShapeMismatch {
                expected: vm.total_columns(),
                found: worlds.width(),
            });
        }
        debug!("evaluate({}) over {} worlds", self, worlds.len());
        let mut bindings = Bindings::new();
        self.eval(worlds, vm, &mut bindings)
    }

    fn eval<'a>(&'a self, worlds: &Worlds, vm: &VarManager, bindings: &mut Bindings<'a>) -> Result<Valuation> {
        match self.node() {
            Node::Atom { pred, args } => {
                let values = args
                    .iter()
                    .map(|arg| match arg {
                        Term::Value(value) => Ok(*value),
                        Term::Var(name) => bindings
                            .iter()
                            .rev()
                            .find(|(v, _)| v == name)
                            .map(|&(_, value)| value)
                            .ok_or_else(|| WorldsError::UnboundVariable(name.clone())),
                    })
                    .collect::<Result<Vec<usize>>>()?;
                let column = vm.column_index(pred.name(), &values)?;
                Ok(worlds.column(column).clone())
            }
            Node::Truth => Ok(bitvec![u64, Lsb0; 1; worlds.len()]),
            Node::Falsity => Ok(bitvec![u64, Lsb0; 0; worlds.len()]),
            Node::Named { child, .. } => child.eval(worlds, vm, bindings),
            Node::Op { op, children } => {
                let values = children
                    .iter()
                    .map(|c| c.eval(worlds, vm, bindings))
                    .collect::<Result<Vec<_>>>()?;
                Ok(op.reduce(values))
            }
            Node::Quant {
                quantifier,
                var,
                child,
            } => {
                let domain = vm.domain().unwrap_or_default();
                let mut values = Vec::with_capacity(domain.size());
                for value in 0..domain.size() {
                    bindings.push((var.as_str(), value));
                    let res = child.eval(worlds, vm, bindings);
                    bindings.pop();
                    values.push(res?);
                }
                Ok(match quantifier {
                    Quantifier::Forall => all(values),
                    Quantifier::Exists => any(values),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::Predicate;
    use crate::types::Domain;

    use test_log::test;

    fn bits(values: &[u8]) -> Valuation {
        values.iter().map(|&v| v == 1).collect()
    }

    #[test]
    fn test_reduce_binary() {
        let x = bits(&[0, 0, 1, 1]);
        let y = bits(&[0, 1, 0, 1]);
        let pair = || vec![x.clone(), y.clone()];
        assert_eq!(Op::And.reduce(pair()), bits(&[0, 0, 0, 1]));
        assert_eq!(Op::Or.reduce(pair()), bits(&[0, 1, 1, 1]));
        assert_eq!(Op::Nand.reduce(pair()), bits(&[1, 1, 1, 0]));
        assert_eq!(Op::Nor.reduce(pair()), bits(&[1, 0, 0, 0]));
        assert_eq!(Op::Xor.reduce(pair()), bits(&[0, 1, 1, 0]));
        assert_eq!(Op::Iff.reduce(pair()), bits(&[1, 0, 0, 1]));
        assert_eq!(Op::OnlyL.reduce(pair()), bits(&[0, 0, 1, 0]));
        assert_eq!(Op::OnlyR.reduce(pair()), bits(&[0, 1, 0, 0]));
        assert_eq!(Op::Not.reduce(vec![x]), bits(&[1, 1, 0, 0]));
    }

    #[test]
    #[should_panic(expected = "`not` needs at least one valuation")]
    fn test_reduce_not_without_values() {
        Op::Not.reduce(vec![]);
    }

    #[test]
    #[should_panic(expected = "`and` needs at least one valuation")]
    fn test_reduce_and_without_values() {
        Op::And.reduce(vec![]);
    }

    #[test]
    fn test_reduce_ternary() {
        let x = bits(&[0, 0, 0, 0, 1, 1, 1, 1]);
        let y = bits(&[0, 0, 1, 1, 0, 0, 1, 1]);
        let z = bits(&[0, 1, 0, 1, 0, 1, 0, 1]);
        let triple = || vec![x.clone(), y.clone(), z.clone()];
        assert_eq!(Op::And.reduce(triple()), bits(&[0, 0, 0, 0, 0, 0, 0, 1]));
        assert_eq!(Op::Or.reduce(triple()), bits(&[0, 1, 1, 1, 1, 1, 1, 1]));
        // Not parity: three true values make xor false.
        assert_eq!(Op::Xor.reduce(triple()), bits(&[0, 1, 1, 1, 1, 1, 1, 0]));
        assert_eq!(Op::Iff.reduce(triple()), bits(&[1, 0, 0, 0, 0, 0, 0, 1]));
        assert_eq!(Op::OnlyL.reduce(triple()), bits(&[0, 0, 0, 0, 1, 0, 0, 0]));
        assert_eq!(Op::OnlyR.reduce(triple()), bits(&[0, 1, 0, 0, 0, 0, 0, 0]));
    }

    #[test]
    fn test_evaluate_quantifiers() {
        let d = Domain::new(2);
        let p = Predicate::new(d, "p", 1);
        let vm = VarManager::from_predicates([&p]).unwrap();
        let worlds = Worlds::enumerate(vm.total_columns(), 20).unwrap();
        // p(0) is column 0, p(1) is column 1.
        let all = Formula::forall("x", p.atom());
        let some = Formula::exists("x", p.atom());
        assert_eq!(all.evaluate(&worlds, &vm).unwrap(), bits(&[0, 0, 0, 1]));
        assert_eq!(some.evaluate(&worlds, &vm).unwrap(), bits(&[0, 1, 1, 1]));
    }

    #[test]
    fn test_evaluate_nested_quantifiers() {
        let d = Domain::new(2);
        let r = Predicate::new(d, "r", 2);
        let vm = VarManager::from_predicates([&r]).unwrap();
        let worlds = Worlds::enumerate(vm.total_columns(), 20).unwrap();
        // Everybody relates to somebody vs. somebody relates to everybody.
        let ae = Formula::forall("x", Formula::exists("y", r.atom()));
        let ea = Formula::exists("y", Formula::forall("x", r.atom()));
        let v_ae = ae.evaluate(&worlds, &vm).unwrap();
        let v_ea = ea.evaluate(&worlds, &vm).unwrap();
        // exists-forall implies forall-exists, but not the other way round.
        assert!(v_ea.iter().zip(v_ae.iter()).all(|(a, b)| !*a || *b));
        assert!(v_ae.count_ones() > v_ea.count_ones());
    }

    #[test]
    fn test_evaluate_unbound_variable() {
        let d = Domain::new(2);
        let p = Predicate::new(d, "p", 1);
        let vm = VarManager::from_predicates([&p]).unwrap();
        let worlds = Worlds::enumerate(vm.total_columns(), 20).unwrap();
        assert_eq!(
            p.atom().evaluate(&worlds, &vm),
            Err(WorldsError::UnboundVariable("x".to_string()))
        );
    }

    #[test]
    fn test_evaluate_constant_arguments() {
        let d = Domain::new(2);
        let p = Predicate::new(d, "p", 1);
        let vm = VarManager::from_predicates([&p]).unwrap();
        let worlds = Worlds::enumerate(vm.total_columns(), 20).unwrap();
        let p1 = p.apply([1usize]).unwrap();
        assert_eq!(p1.evaluate(&worlds, &vm).unwrap(), bits(&[0, 0, 1, 1]));
    }

    #[test]
    fn test_evaluate_shape_mismatch() {
        let d = Domain::new(2);
        let a = Predicate::new(d, "a", 0);
        let vm = VarManager::from_predicates([&a]).unwrap();
        let worlds = Worlds::enumerate(2, 20).unwrap();
        assert_eq!(
            a.atom().evaluate(&worlds, &vm),
            Err(WorldsError::WorldsShapeMismatch {
                expected: 1,
                found: 2,
            })
        );
    }

    #[test]
    fn test_evaluate_unknown_predicate() {
        let d = Domain::new(2);
        let a = Predicate::new(d, "a", 0);
        let b = Predicate::new(d, "b", 0);
        let vm = VarManager::from_predicates([&a]).unwrap();
        let worlds = Worlds::enumerate(1, 20).unwrap();
        assert_eq!(
            b.atom().evaluate(&worlds, &vm),
            Err(WorldsError::UnknownPredicate("b".to_string()))
        );
    }

    #[test]
    fn test_named_is_transparent() {
        let d = Domain::new(2);
        let a = Predicate::new(d, "a", 0);
        let vm = VarManager::from_predicates([&a]).unwrap();
        let worlds = Worlds::enumerate(1, 20).unwrap();
        let named = Formula::named("A", a.atom());
        assert_eq!(
            named.evaluate(&worlds, &vm).unwrap(),
            a.atom().evaluate(&worlds, &vm).unwrap()
        );
    }
}
