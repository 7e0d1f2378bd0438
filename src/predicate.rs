//! Atomic predicates and their application to argument terms.
//!
//! A nullary predicate is a plain proposition. A predicate of arity `k` is
//! applied to `k` [`Term`]s; variables are bound by quantifiers, constants
//! must lie in `0..D`.

use std::fmt;

use crate::error::{Result, WorldsError};
use crate::formula::Formula;
use crate::types::{Domain, Term};

/// An atomic proposition with `arity` quantified argument slots.
///
/// Predicates are identified by name: two predicates with the same name denote
/// the same columns, and must agree on their arity.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Predicate {
    name: String,
    domain: Domain,
    vars: Vec<String>,
}

impl Predicate {
    /// Creates a predicate whose argument variables get default names
    /// (`x`, `y`, `z`, `x3`, `x4`, ...).
    pub fn new(domain: Domain, name: impl Into<String>, arity: usize) -> Self {
        let vars = (0..arity).map(default_var_name).collect();
        Self {
            name: name.into(),
            domain,
            vars,
        }
    }

    /// Creates a predicate with explicit argument variable names.
    pub fn with_vars<S: Into<String>>(
        domain: Domain,
        name: impl Into<String>,
        vars: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            name: name.into(),
            domain,
            vars: vars.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> usize {
        self.vars.len()
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// Names of the argument variables.
    pub fn vars(&self) -> &[String] {
        &self.vars
    }

    /// Applies the predicate to its own argument variables.
    ///
    /// A nullary predicate yields the plain proposition `p`; otherwise the result
    /// has the argument variables as free variables.
    pub fn atom(&self) -> Formula {
        let args = self.vars.iter().map(|v| Term::Var(v.clone())).collect();
        Formula::atom_unchecked(self.clone(), args)
    }

    /// Applies the predicate to the given arguments.
    ///
    /// Fails with `ArityMismatch` if the number of arguments differs from the arity,
    /// and with `ArgumentOutOfDomain` if a constant argument is not below the domain size.
    pub fn apply<T: Into<Term>>(&self, args: impl IntoIterator<Item = T>) -> Result<Formula> {
        let args: Vec<Term> = args.into_iter().map(Into::into).collect();
        if args.len() != self.arity() {
            return Err(WorldsError::arity(
                &self.name,
                self.arity().to_string(),
                args.len(),
            ));
        }
        for arg in &args {
            if let Term::Value(value) = *arg {
                if value >= self.domain.size() {
                    return Err(WorldsError::ArgumentOutOfDomain {
                        predicate: self.name.clone(),
                        value,
                        domain: self.domain.size(),
                    });
                }
            }
        }
        Ok(Formula::atom_unchecked(self.clone(), args))
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.vars.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}({})", self.name, self.vars.join(", "))
        }
    }
}

fn default_var_name(i: usize) -> String {
    match i {
        0 => "x".to_string(),
        1 => "y".to_string(),
        2 => "z".to_string(),
        _ => format!("x{}", i),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    #[test]
    fn test_default_var_names() {
        let p = Predicate::new(Domain::new(2), "p", 4);
        assert_eq!(p.arity(), 4);
        assert_eq!(p.vars(), &["x", "y", "z", "x3"]);
        assert_eq!(p.to_string(), "p(x, y, z, x3)");
    }

    #[test]
    fn test_apply_arity_mismatch() {
        let p = Predicate::new(Domain::new(2), "p", 2);
        let res = p.apply([0usize]);
        assert!(matches!(
            res,
            Err(WorldsError::ArityMismatch { found: 1, .. })
        ));
    }

    #[test]
    fn test_apply_out_of_domain() {
        let p = Predicate::new(Domain::new(2), "p", 1);
        let res = p.apply([2usize]);
        assert_eq!(
            res,
            Err(WorldsError::ArgumentOutOfDomain {
                predicate: "p".to_string(),
                value: 2,
                domain: 2,
            })
        );
    }

    #[test]
    fn test_atom_free_vars() {
        let p = Predicate::with_vars(Domain::new(2), "love", ["y", "x"]);
        let f = p.atom();
        assert_eq!(f.free_vars(), &["x", "y"]);
        let g = p.apply([Term::var("x"), Term::Value(1)]).unwrap();
        assert_eq!(g.free_vars(), &["x"]);
    }
}
