//! Truth tables as plain data, ready to be handed to a printer.
//!
//! A [`TruthTable`] has one row per world. The leading cells are the world's
//! column values, named after their predicate and argument tuple; the trailing
//! cells are the truth values of the evaluated formulas.

use std::fmt;

use crate::assignment::Worlds;
use crate::formula::Formula;
use crate::universe::Evaluation;
use crate::vars::VarManager;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Cell {
    /// Value of a predicate column, as 0 or 1.
    Bit(u8),
    /// Truth value of a formula.
    Truth(bool),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Bit(bit) => write!(f, "{}", bit),
            Cell::Truth(true) => write!(f, "T"),
            Cell::Truth(false) => write!(f, "F"),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TruthTable {
    header: Vec<String>,
    rows: Vec<Vec<Cell>>,
    num_columns: usize,
}

impl TruthTable {
    pub(crate) fn build(
        vm: &VarManager,
        worlds: &Worlds,
        formulas: &[&Formula],
        evaluation: &Evaluation,
    ) -> Self {
        let mut header = vm.column_names();
        let num_columns = header.len();
        header.extend(formulas.iter().map(|f| f.to_string()));

        let rows = (0..worlds.len())
            .map(|w| {
                let mut row: Vec<Cell> = worlds.row(w).into_iter().map(|b| Cell::Bit(b as u8)).collect();
                row.extend(evaluation.row(w).into_iter().map(Cell::Truth));
                row
            })
            .collect();

        Self {
            header,
            rows,
            num_columns,
        }
    }

    /// Column names: predicate columns first, then one per formula.
    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Number of predicate columns; formula columns start at this index.
    pub fn num_columns(&self) -> usize {
        self.num_columns
    }

    pub fn num_formulas(&self) -> usize {
        self.header.len() - self.num_columns
    }
}
