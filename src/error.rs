//! Error types for formula construction, evaluation and universe queries.

use std::fmt;

use num_bigint::BigUint;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorldsError {
    #[error("`{what}` expects {expected} argument(s), got {found}")]
    ArityMismatch {
        what: String,
        expected: String,
        found: usize,
    },

    #[error("argument value {value} of `{predicate}` is outside the domain 0..{domain}")]
    ArgumentOutOfDomain {
        predicate: String,
        value: usize,
        domain: usize,
    },

    #[error("predicate `{predicate}` registered with arity {first} and arity {second}")]
    DuplicateArityMismatch {
        predicate: String,
        first: usize,
        second: usize,
    },

    #[error("quantifier domain size {first} cannot be combined with domain size {second}")]
    DomainMismatch { first: usize, second: usize },

    #[error("`{operator}` has no alternative to `{formula}`")]
    UnsupportedAlternative { operator: String, formula: String },

    #[error("enumerating {columns} columns would produce {worlds} worlds (limit is {limit} columns)")]
    UniverseTooLarge {
        columns: usize,
        limit: usize,
        worlds: WorldCount,
    },

    #[error("column index of `{predicate}` does not fit in a machine word")]
    ColumnOverflow { predicate: String },

    #[error("predicate `{0}` is not registered in the variable manager")]
    UnknownPredicate(String),

    #[error("variable `{0}` is not bound by any quantifier")]
    UnboundVariable(String),

    #[error("worlds matrix has {found} column(s), expected {expected}")]
    WorldsShapeMismatch { expected: usize, found: usize },

    #[error("world {index} is out of range (universe has {worlds} worlds)")]
    WorldOutOfRange { index: usize, worlds: usize },
}

pub type Result<T> = std::result::Result<T, WorldsError>;

impl WorldsError {
    pub(crate) fn arity(what: impl Into<String>, expected: impl Into<String>, found: usize) -> Self {
        WorldsError::ArityMismatch {
            what: what.into(),
            expected: expected.into(),
            found,
        }
    }

    pub(crate) fn too_large(columns: usize, limit: usize) -> Self {
        WorldsError::UniverseTooLarge {
            columns,
            limit,
            worlds: WorldCount(columns),
        }
    }
}

/// The number of worlds `2^columns` over a column count.
///
/// Only small counts are printed in full; the exact value is computed on demand.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct WorldCount(pub usize);

impl WorldCount {
    const MAX_EXACT_COLUMNS: usize = 256;

    /// `2^columns` as an integer, or `None` if the column count is too large to print.
    pub fn exact(self) -> Option<BigUint> {
        (self.0 <= Self::MAX_EXACT_COLUMNS).then(|| BigUint::from(1u32) << self.0)
    }
}

impl fmt::Display for WorldCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.exact() {
            Some(count) => write!(f, "{}", count),
            None => write!(f, "2^{}", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    #[test]
    fn test_too_large_reports_world_count() {
        let err = WorldsError::too_large(70, 20);
        assert_eq!(
            err.to_string(),
            "enumerating 70 columns would produce 1180591620717411303424 worlds (limit is 20 columns)"
        );
    }

    #[test]
    fn test_too_large_huge_column_count() {
        let err = WorldsError::too_large(usize::MAX, 20);
        assert_eq!(
            err,
            WorldsError::UniverseTooLarge {
                columns: usize::MAX,
                limit: 20,
                worlds: WorldCount(usize::MAX),
            }
        );
        assert_eq!(
            err.to_string(),
            format!(
                "enumerating {0} columns would produce 2^{0} worlds (limit is 20 columns)",
                usize::MAX
            )
        );
        assert!(WorldCount(257).exact().is_none());
        assert_eq!(WorldCount(3).exact(), Some(BigUint::from(8u32)));
    }

    #[test]
    fn test_arity_message() {
        let err = WorldsError::arity("not", "1", 2);
        assert_eq!(err.to_string(), "`not` expects 1 argument(s), got 2");
    }
}
