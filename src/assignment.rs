//! The worlds matrix: all truth-value assignments over a set of columns.
//!
//! Worlds are rows and columns are predicate columns, as in the usual
//! truth-table picture. Storage is column-major so that looking up a predicate
//! column for every world is a single clone.
//!
//! Enumerated worlds come in binary counting order: world `i` gives column `j`
//! the value of bit `j` of `i`, so column 0 is the least significant. For two
//! columns:
//!
//! ```text
//! world  c1 c0
//!   0     0  0
//!   1     0  1
//!   2     1  0
//!   3     1  1
//! ```

use bitvec::prelude::*;
use log::debug;
use rayon::prelude::*;

use crate::error::{Result, WorldsError};
use crate::types::Valuation;

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Worlds {
    columns: Vec<Valuation>,
    len: usize,
}

impl Worlds {
    /// Enumerates all `2^n` assignments over `n` columns.
    ///
    /// Fails with `UniverseTooLarge` if `n > max_columns`, before allocating anything.
    pub fn enumerate(n: usize, max_columns: usize) -> Result<Self> {
        // The row count must also fit in a machine word.
        if n > max_columns || n >= usize::BITS as usize {
            return Err(WorldsError::too_large(n, max_columns));
        }
        let len = 1usize << n;
        debug!("enumerate(n = {}) -> {} worlds", n, len);

        let columns = (0..n)
            .into_par_iter()
            .map(|j| {
                let mut column: Valuation = BitVec::with_capacity(len);
                column.extend((0..len).map(|i| (i >> j) & 1 == 1));
                column
            })
            .collect();

        Ok(Self { columns, len })
    }

    /// Builds a worlds matrix from explicit rows.
    ///
    /// Every row must have exactly `n` values.
    pub fn from_rows<R: AsRef<[bool]>>(n: usize, rows: &[R]) -> Result<Self> {
        let mut columns: Vec<Valuation> = vec![BitVec::with_capacity(rows.len()); n];
        for row in rows {
            let row = row.as_ref();
            if row.len() != n {
                return Err(WorldsError::WorldsShapeMismatch {
                    expected: n,
                    found: row.len(),
                });
            }
            for (column, &value) in columns.iter_mut().zip(row) {
                column.push(value);
            }
        }
        Ok(Self {
            columns,
            len: rows.len(),
        })
    }

    /// Number of worlds (rows).
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Values of column `j` across all worlds.
    pub fn column(&self, j: usize) -> &Valuation {
        &self.columns[j]
    }

    pub fn get(&self, world: usize, j: usize) -> bool {
        self.columns[j][world]
    }

    /// Values of all columns in world `i`.
    pub fn row(&self, i: usize) -> Vec<bool> {
        self.columns.iter().map(|c| c[i]).collect()
    }

    pub fn rows(&self) -> impl Iterator<Item = Vec<bool>> + '_ {
        (0..self.len).map(|i| self.row(i))
    }

    /// Keeps only the given worlds, in the given order.
    pub fn select(&self, indices: &[usize]) -> Result<Self> {
        if let Some(&index) = indices.iter().find(|&&i| i >= self.len) {
            return Err(WorldsError::WorldOutOfRange {
                index,
                worlds: self.len,
            });
        }
        let columns = self
            .columns
            .par_iter()
            .map(|c| indices.iter().map(|&i| c[i]).collect::<Valuation>())
            .collect();
        Ok(Self {
            columns,
            len: indices.len(),
        })
    }
}
