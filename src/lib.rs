//! # worlds-rs: propositional formulas over universes of possible worlds
//!
//! **`worlds-rs`** evaluates propositional formulas over finite universes of possible worlds and answers
//! model-theoretic queries (consistency, entailment, equivalence) by brute-force enumeration.
//! It is aimed at propositional models of natural-language meaning, where atomic predicates denote
//! bit-columns and a universe is every assignment of truth values to those columns.
//!
//! ## Key Features
//!
//! - **Shared column layout**: Every predicate gets a contiguous block of `D^arity` columns. Formulas built
//!   independently merge their [`VarManager`][crate::vars::VarManager]s into one consistent layout.
//! - **Vectorized evaluation**: A formula evaluates to one bit per world, computed word by word over
//!   [`bitvec`] columns, with formulas evaluated in parallel.
//! - **Structural equality**: Commutative operators compare their children as multisets, so
//!   `And(p, q) == And(q, p)`, while `OnlyL`/`OnlyR` stay order-sensitive.
//! - **Bounded enumeration**: [`UniverseConfig`][crate::universe::UniverseConfig] caps the column count,
//!   and oversized universes fail fast with `UniverseTooLarge`.
//!
//! ## Basic Usage
//!
//! ```rust
//! use worlds_rs::formula::Formula;
//! use worlds_rs::predicate::Predicate;
//! use worlds_rs::types::Domain;
//! use worlds_rs::universe::{Universe, UniverseConfig};
//!
//! // 1. Declare predicates over a quantifier domain
//! let d = Domain::default();
//! let a = Predicate::new(d, "a", 0).atom();
//! let b = Predicate::new(d, "b", 0).atom();
//!
//! // 2. Build formulas
//! let f = Formula::and([a.clone(), b.clone()]).unwrap();
//! let g = Formula::or([a.clone(), b.clone()]).unwrap();
//!
//! // 3. Enumerate the worlds
//! let u = Universe::from_formulas([&f, &g], UniverseConfig::default()).unwrap();
//! assert_eq!(u.len(), 4);
//!
//! // 4. Query
//! assert!(u.entails(&f, &g).unwrap());
//! assert!(!u.equivalent(&f, &g).unwrap());
//! assert!(!u.consistent(&[&f, &!a]).unwrap());
//! ```
//!
//! ## Core Components
//!
//! - **[`vars`]**: Column layout of predicates and its merge.
//! - **[`assignment`]**: The worlds matrix and its enumeration.
//! - **[`formula`]** and **[`eval`]**: Formula trees and their evaluation.
//! - **[`universe`]**: Queries over a universe of worlds.

pub mod assignment;
pub mod error;
pub mod eval;
pub mod formula;
pub mod predicate;
pub mod render;
pub mod table;
pub mod types;
pub mod universe;
pub mod vars;
