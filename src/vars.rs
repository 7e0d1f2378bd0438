//! Column layout of predicates.
//!
//! A [`VarManager`] assigns every predicate a contiguous block of `D^arity`
//! bit-columns. Predicates are kept sorted by name and offsets are recomputed
//! after every insertion, so two managers holding the same predicates always
//! have the same layout regardless of how they were built.
//!
//! For a predicate at offset `o` applied to values `(v0, v1, ...)`, the column is
//! `o + v0 + v1 * D + v2 * D^2 + ...` (argument 0 varies fastest).

use std::collections::BTreeMap;

use log::{debug, trace};

use crate::error::{Result, WorldsError};
use crate::predicate::Predicate;
use crate::types::Domain;

#[derive(Debug, Clone, Eq, PartialEq)]
struct Slot {
    arity: usize,
    vars: Vec<String>,
    offset: usize,
}

/// Maps predicate names to their column blocks.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct VarManager {
    domain: Option<Domain>,
    slots: BTreeMap<String, Slot>,
    total: usize,
}

impl VarManager {
    /// Creates an empty manager over the given domain.
    pub fn new(domain: Domain) -> Self {
        Self {
            domain: Some(domain),
            slots: BTreeMap::new(),
            total: 0,
        }
    }

    /// Creates a manager holding the given predicates.
    pub fn from_predicates<'a>(preds: impl IntoIterator<Item = &'a Predicate>) -> Result<Self> {
        let mut vm = Self::default();
        for pred in preds {
            vm.insert(pred)?;
        }
        vm.linearize();
        Ok(vm)
    }

    /// Manager holding a single predicate.
    pub(crate) fn single(pred: &Predicate) -> Self {
        let mut vm = Self::new(pred.domain());
        vm.slots.insert(
            pred.name().to_string(),
            Slot {
                arity: pred.arity(),
                vars: pred.vars().to_vec(),
                offset: 0,
            },
        );
        vm.linearize();
        vm
    }

    /// The domain size, or `None` for a manager that has never seen a predicate.
    pub fn domain(&self) -> Option<Domain> {
        self.domain
    }

    pub fn total_columns(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    pub fn offset(&self, name: &str) -> Option<usize> {
        self.slots.get(name).map(|s| s.offset)
    }

    pub fn arity(&self, name: &str) -> Option<usize> {
        self.slots.get(name).map(|s| s.arity)
    }

    /// Iterates over `(name, arity, offset)` in column order.
    pub fn predicates(&self) -> impl Iterator<Item = (&str, usize, usize)> {
        self.slots
            .iter()
            .map(|(name, s)| (name.as_str(), s.arity, s.offset))
    }

    /// Adds a predicate (or looks it up) and returns its offset.
    ///
    /// Fails with `DuplicateArityMismatch` if a predicate of the same name is
    /// already registered with a different arity, and with `DomainMismatch` if the
    /// predicate lives in a different domain than this manager.
    pub fn register(&mut self, pred: &Predicate) -> Result<usize> {
        debug!("register(pred = {}, arity = {})", pred.name(), pred.arity());
        if self.insert(pred)? {
            self.linearize();
        }
        Ok(self.slots[pred.name()].offset)
    }

    fn insert(&mut self, pred: &Predicate) -> Result<bool> {
        self.adopt_domain(pred.domain())?;
        if let Some(slot) = self.slots.get(pred.name()) {
            if slot.arity != pred.arity() {
                return Err(WorldsError::DuplicateArityMismatch {
                    predicate: pred.name().to_string(),
                    first: slot.arity,
                    second: pred.arity(),
                });
            }
            return Ok(false);
        }
        self.slots.insert(
            pred.name().to_string(),
            Slot {
                arity: pred.arity(),
                vars: pred.vars().to_vec(),
                offset: 0,
            },
        );
        Ok(true)
    }

    fn adopt_domain(&mut self, domain: Domain) -> Result<()> {
        match self.domain {
            None => {
                self.domain = Some(domain);
                Ok(())
            }
            Some(d) if d == domain => Ok(()),
            Some(d) => Err(WorldsError::DomainMismatch {
                first: d.size(),
                second: domain.size(),
            }),
        }
    }

    /// Recomputes contiguous offsets in name order.
    ///
    /// Offsets and the total saturate at `usize::MAX`, which enumeration then
    /// rejects as too large.
    fn linearize(&mut self) {
        let domain = self.domain.unwrap_or_default();
        let mut offset = 0;
        for (name, slot) in self.slots.iter_mut() {
            slot.offset = offset;
            offset = offset.saturating_add(domain.columns(slot.arity));
            trace!("linearize: {} at {}..{}", name, slot.offset, offset);
        }
        self.total = offset;
    }

    /// Unions the predicates of several managers into a fresh one.
    ///
    /// The result does not depend on the order of the inputs, and merging a manager
    /// with itself yields an equal manager.
    pub fn merge<'a>(vms: impl IntoIterator<Item = &'a VarManager>) -> Result<VarManager> {
        let mut merged = VarManager::default();
        for vm in vms {
            if let Some(domain) = vm.domain {
                merged.adopt_domain(domain)?;
            }
            for (name, slot) in &vm.slots {
                match merged.slots.get(name) {
                    Some(existing) if existing.arity != slot.arity => {
                        return Err(WorldsError::DuplicateArityMismatch {
                            predicate: name.clone(),
                            first: existing.arity,
                            second: slot.arity,
                        });
                    }
                    Some(_) => {}
                    None => {
                        merged.slots.insert(name.clone(), slot.clone());
                    }
                }
            }
        }
        merged.linearize();
        debug!(
            "merge: {} predicates over {} columns",
            merged.slots.len(),
            merged.total
        );
        Ok(merged)
    }

    /// Column of `name` applied to the given argument values.
    pub fn column_index(&self, name: &str, values: &[usize]) -> Result<usize> {
        let slot = self
            .slots
            .get(name)
            .ok_or_else(|| WorldsError::UnknownPredicate(name.to_string()))?;
        if values.len() != slot.arity {
            return Err(WorldsError::arity(
                name,
                slot.arity.to_string(),
                values.len(),
            ));
        }
        let size = self.domain.unwrap_or_default().size();
        let overflow = || WorldsError::ColumnOverflow {
            predicate: name.to_string(),
        };
        let mut index: usize = 0;
        // `None` once `D^i` no longer fits; only a zero argument may follow.
        let mut weight = Some(1usize);
        for &value in values {
            if value >= size {
                return Err(WorldsError::ArgumentOutOfDomain {
                    predicate: name.to_string(),
                    value,
                    domain: size,
                });
            }
            if value != 0 {
                let term = weight.and_then(|w| w.checked_mul(value)).ok_or_else(overflow)?;
                index = index.checked_add(term).ok_or_else(overflow)?;
            }
            weight = weight.and_then(|w| w.checked_mul(size));
        }
        slot.offset.checked_add(index).ok_or_else(overflow)
    }

    /// Display names of all columns, in column order.
    ///
    /// A nullary predicate `p` is named `p`; a column of `q` for the argument tuple
    /// `(0, 1)` is named `q(0, 1)`.
    pub fn column_names(&self) -> Vec<String> {
        let domain = self.domain.unwrap_or_default();
        let mut names = Vec::new();
        for (name, slot) in &self.slots {
            if slot.arity == 0 {
                names.push(name.clone());
                continue;
            }
            for tuple in domain.tuples(slot.arity) {
                let args: Vec<String> = tuple.iter().map(|v| v.to_string()).collect();
                names.push(format!("{}({})", name, args.join(", ")));
            }
        }
        names
    }

    /// Argument variable names recorded for `name`.
    pub fn vars(&self, name: &str) -> Option<&[String]> {
        self.slots.get(name).map(|s| s.vars.as_slice())
    }
}
