//! Small value types shared by predicates, variable managers and formulas.
//!
//! [`Domain`] fixes how many values a quantified argument ranges over, and
//! [`Term`] is a single argument slot of an atomic formula.
use std::fmt;

use bitvec::prelude::*;

/// One boolean per world, in world order.
pub type Valuation = BitVec<u64, Lsb0>;

/// The quantifier domain size `D`.
///
/// A predicate of arity `k` occupies `D^k` columns, one per tuple of argument
/// values drawn from `0..D`.
///
/// # Invariants
///
/// - `D >= 1`
/// - A set of formulas and the universes built from them share a single `Domain`
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Domain(usize);

impl Domain {
    /// Creates a domain of the given size.
    ///
    /// # Panics
    ///
    /// Panics if `size == 0`.
    pub fn new(size: usize) -> Self {
        assert_ne!(size, 0, "Domain size must be >= 1");
        Domain(size)
    }

    /// Returns the number of values in the domain.
    pub fn size(self) -> usize {
        self.0
    }

    /// Number of columns occupied by a predicate of the given arity.
    ///
    /// Saturates at `usize::MAX` when `D^arity` does not fit in a word; such a
    /// layout can never be enumerated.
    pub fn columns(self, arity: usize) -> usize {
        if self.0 == 1 {
            return 1;
        }
        u32::try_from(arity)
            .ok()
            .and_then(|arity| self.0.checked_pow(arity))
            .unwrap_or(usize::MAX)
    }

    /// Iterates over all argument tuples of the given arity, in column order.
    ///
    /// Argument 0 varies fastest.
    pub fn tuples(self, arity: usize) -> impl Iterator<Item = Vec<usize>> {
        let size = self.0;
        (0..self.columns(arity)).map(move |mut i| {
            let mut tuple = Vec::with_capacity(arity);
            for _ in 0..arity {
                tuple.push(i % size);
                i /= size;
            }
            tuple
        })
    }
}

impl Default for Domain {
    fn default() -> Self {
        Domain(3)
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "D{}", self.0)
    }
}

impl From<Domain> for usize {
    fn from(domain: Domain) -> Self {
        domain.0
    }
}

/// An argument of an atomic formula: a variable name or a constant domain value.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Term {
    Var(String),
    Value(usize),
}

impl Term {
    pub fn var(name: impl Into<String>) -> Self {
        Term::Var(name.into())
    }

    pub fn as_var(&self) -> Option<&str> {
        match self {
            Term::Var(name) => Some(name),
            Term::Value(_) => None,
        }
    }
}

impl From<usize> for Term {
    fn from(value: usize) -> Self {
        Term::Value(value)
    }
}

impl From<&str> for Term {
    fn from(name: &str) -> Self {
        Term::Var(name.to_string())
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Var(name) => write!(f, "{}", name),
            Term::Value(value) => write!(f, "{}", value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    #[test]
    fn test_domain_columns() {
        let d = Domain::new(3);
        assert_eq!(d.columns(0), 1);
        assert_eq!(d.columns(1), 3);
        assert_eq!(d.columns(2), 9);
        assert_eq!(Domain::new(1).columns(5), 1);
    }

    #[test]
    fn test_domain_columns_saturate() {
        assert_eq!(Domain::new(2).columns(63), 1usize << 63);
        assert_eq!(Domain::new(2).columns(64), usize::MAX);
        assert_eq!(Domain::new(3).columns(100), usize::MAX);
        assert_eq!(Domain::new(1).columns(usize::MAX), 1);
    }

    #[test]
    #[should_panic(expected = "Domain size must be >= 1")]
    fn test_domain_zero_panics() {
        Domain::new(0);
    }

    #[test]
    fn test_tuples_argument_zero_fastest() {
        let tuples: Vec<_> = Domain::new(2).tuples(2).collect();
        assert_eq!(tuples, vec![vec![0, 0], vec![1, 0], vec![0, 1], vec![1, 1]]);
        let nullary: Vec<_> = Domain::new(4).tuples(0).collect();
        assert_eq!(nullary, vec![Vec::<usize>::new()]);
    }

    #[test]
    fn test_term_conversions() {
        assert_eq!(Term::from(2), Term::Value(2));
        assert_eq!(Term::from("x"), Term::var("x"));
        assert_eq!(Term::var("y").as_var(), Some("y"));
        assert_eq!(Term::Value(0).as_var(), None);
        assert_eq!(Term::var("x").to_string(), "x");
    }
}
