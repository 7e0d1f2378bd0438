//! Universes of possible worlds and the model-theoretic queries over them.
//!
//! A [`Universe`] pairs a column layout ([`VarManager`]) with a worlds matrix
//! whose width matches it. All queries are answered by evaluating formulas in
//! every world; nothing is mutated after construction, and "restricted" or
//! "updated" universes are new values.
//!
//! # Examples
//!
//! ```
//! use worlds_rs::formula::Formula;
//! use worlds_rs::predicate::Predicate;
//! use worlds_rs::types::Domain;
//! use worlds_rs::universe::{Universe, UniverseConfig};
//!
//! let d = Domain::default();
//! let a = Predicate::new(d, "a", 0).atom();
//! let b = Predicate::new(d, "b", 0).atom();
//! let u = Universe::from_formulas([&a, &b], UniverseConfig::default()).unwrap();
//!
//! let ab = Formula::and([a.clone(), b.clone()]).unwrap();
//! assert!(u.entails(&ab, &a).unwrap());
//! assert!(!u.consistent(&[&a, &!a.clone()]).unwrap());
//! ```

use std::sync::Arc;

use log::debug;
use rayon::prelude::*;

use crate::assignment::Worlds;
use crate::error::{Result, WorldsError};
use crate::formula::Formula;
use crate::table::TruthTable;
use crate::types::Valuation;
use crate::vars::VarManager;

/// Limits applied when enumerating worlds.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct UniverseConfig {
    /// Largest column count that may be enumerated (`2^max_columns` worlds).
    pub max_columns: usize,
}

impl Default for UniverseConfig {
    fn default() -> Self {
        Self { max_columns: 20 }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Universe {
    vm: Arc<VarManager>,
    worlds: Worlds,
    config: UniverseConfig,
}

impl Universe {
    /// Enumerates every world over the predicates of `formula`.
    pub fn from_formula(formula: &Formula, config: UniverseConfig) -> Result<Self> {
        Self::from_vars(formula.vars().clone(), config)
    }

    /// Enumerates every world over the merged predicates of `formulas`.
    pub fn from_formulas<'a>(
        formulas: impl IntoIterator<Item = &'a Formula>,
        config: UniverseConfig,
    ) -> Result<Self> {
        let vm = VarManager::merge(formulas.into_iter().map(Formula::vars))?;
        Self::from_vars(vm, config)
    }

    /// Enumerates every world over the columns of `vm`.
    pub fn from_vars(vm: VarManager, config: UniverseConfig) -> Result<Self> {
        let worlds = Worlds::enumerate(vm.total_columns(), config.max_columns)?;
        debug!(
            "universe: {} columns, {} worlds",
            vm.total_columns(),
            worlds.len()
        );
        Ok(Self {
            vm: Arc::new(vm),
            worlds,
            config,
        })
    }

    /// Uses a caller-supplied worlds matrix instead of enumerating.
    ///
    /// Fails with `WorldsShapeMismatch` if the matrix width differs from `vm`'s
    /// column count.
    pub fn with_worlds(vm: VarManager, worlds: Worlds, config: UniverseConfig) -> Result<Self> {
        if worlds.width() != vm.total_columns() {
            return Err(WorldsError::WorldsShapeMismatch {
                expected: vm.total_columns(),
                found: worlds.width(),
            });
        }
        Ok(Self {
            vm: Arc::new(vm),
            worlds,
            config,
        })
    }

    pub fn vars(&self) -> &VarManager {
        &self.vm
    }

    pub fn worlds(&self) -> &Worlds {
        &self.worlds
    }

    pub fn config(&self) -> UniverseConfig {
        self.config
    }

    /// Number of worlds.
    pub fn len(&self) -> usize {
        self.worlds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.worlds.is_empty()
    }

    /// Evaluates every formula in every world.
    ///
    /// The result has one column per formula, in the given order.
    pub fn evaluate(&self, formulas: &[&Formula]) -> Result<Evaluation> {
        let columns = formulas
            .par_iter()
            .map(|f| f.evaluate(&self.worlds, &self.vm))
            .collect::<Result<Vec<_>>>()?;
        Ok(Evaluation {
            columns,
            worlds: self.worlds.len(),
        })
    }

    /// Whether some world satisfies all of `formulas` at once.
    pub fn consistent(&self, formulas: &[&Formula]) -> Result<bool> {
        let evaluation = self.evaluate(formulas)?;
        Ok(evaluation.conjunction().any())
    }

    /// Whether no world makes `f1` true and `f2` false.
    pub fn entails(&self, f1: &Formula, f2: &Formula) -> Result<bool> {
        let not_f2 = Formula::not(f2.clone());
        Ok(!self.consistent(&[f1, &not_f2])?)
    }

    /// Whether `f1` and `f2` have the same truth value in every world.
    pub fn equivalent(&self, f1: &Formula, f2: &Formula) -> Result<bool> {
        let evaluation = self.evaluate(&[f1, f2])?;
        Ok(evaluation.column(0) == evaluation.column(1))
    }

    /// Indices of the worlds where `formula` holds.
    pub fn models(&self, formula: &Formula) -> Result<Vec<usize>> {
        let values = formula.evaluate(&self.worlds, &self.vm)?;
        Ok(values.iter_ones().collect())
    }

    /// A universe over the same columns keeping only the given worlds.
    pub fn restrict(&self, indices: &[usize]) -> Result<Universe> {
        debug!("restrict({} of {} worlds)", indices.len(), self.len());
        Ok(Universe {
            vm: self.vm.clone(),
            worlds: self.worlds.select(indices)?,
            config: self.config,
        })
    }

    /// A universe keeping only the worlds where `formula` holds.
    pub fn restrict_to(&self, formula: &Formula) -> Result<Universe> {
        let indices = self.models(formula)?;
        self.restrict(&indices)
    }

    /// A freshly enumerated universe that also covers the predicates of `formula`.
    pub fn update(&self, formula: &Formula) -> Result<Universe> {
        let vm = VarManager::merge([self.vars(), formula.vars()])?;
        Self::from_vars(vm, self.config)
    }

    /// Pairs each world's column values with the truth value of every formula.
    pub fn truth_table(&self, formulas: &[&Formula]) -> Result<TruthTable> {
        let evaluation = self.evaluate(formulas)?;
        Ok(TruthTable::build(&self.vm, &self.worlds, formulas, &evaluation))
    }
}

/// Worlds × formulas truth values.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Evaluation {
    columns: Vec<Valuation>,
    worlds: usize,
}

impl Evaluation {
    /// Number of worlds (rows).
    pub fn len(&self) -> usize {
        self.worlds
    }

    pub fn is_empty(&self) -> bool {
        self.worlds == 0
    }

    /// Number of formulas (columns).
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Truth values of formula `i` across all worlds.
    pub fn column(&self, i: usize) -> &Valuation {
        &self.columns[i]
    }

    pub fn get(&self, world: usize, i: usize) -> bool {
        self.columns[i][world]
    }

    /// Truth values of every formula in `world`.
    pub fn row(&self, world: usize) -> Vec<bool> {
        self.columns.iter().map(|c| c[world]).collect()
    }

    /// Worlds where every formula holds.
    pub fn conjunction(&self) -> Valuation {
        let mut acc: Valuation = Valuation::repeat(true, self.worlds);
        for column in &self.columns {
            acc &= column.as_bitslice();
        }
        acc
    }
}
