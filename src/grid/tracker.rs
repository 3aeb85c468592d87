//! Per-cell validity and "modified since load" bookkeeping for the grid.

use crate::grid::codec::{self, Parsed};
use crate::models::{EditableRow, Field, Transaction, FIELD_COUNT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellStatus {
    /// Legitimately blank.
    #[default]
    Inactive,
    Error,
    /// Parsed and confirmed valid.
    Valid,
}

pub type RowStatus = [CellStatus; FIELD_COUNT];

/// Outcome of validating one editable row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowCheck {
    pub transaction: Transaction,
    pub status: RowStatus,
}

impl RowCheck {
    pub fn has_error(&self) -> bool {
        self.status.contains(&CellStatus::Error)
    }

    pub fn is_blank(&self) -> bool {
        self.status.iter().all(|s| *s == CellStatus::Inactive)
    }

    /// Safe to hand to the store.
    pub fn is_usable(&self) -> bool {
        !self.has_error() && !self.is_blank() && self.transaction.is_valid
    }
}

const DATE_AND_DESCRIPTION: [Field; 4] = [Field::Year, Field::Month, Field::Day, Field::Description];

/// Parse every cell of `row` and derive its status.
///
/// A row must be either entirely blank or entirely specified, except that
/// debit and credit are alternatives: a blank amount is never an error just
/// because something else in the row is filled. Once date and description are
/// all present, at least one amount must be non-zero.
///
/// The baseline only contributes the stored id.
pub fn validate_row(row: &EditableRow, baseline: Option<&Transaction>) -> RowCheck {
    let blank = Field::ALL.map(|f| row.get(f).trim().is_empty());
    let mut txn = Transaction {
        id: baseline.and_then(|b| b.id),
        ..Default::default()
    };
    let mut status = [CellStatus::Inactive; FIELD_COUNT];

    for field in Field::ALL {
        status[field.index()] = match codec::parse(field, row.get(field)) {
            Parsed::Valid(value) => {
                codec::apply(field, value, &mut txn);
                CellStatus::Valid
            }
            Parsed::Invalid => CellStatus::Error,
            Parsed::Absent => {
                let sibling_filled = Field::ALL
                    .iter()
                    .any(|other| *other != field && !blank[other.index()]);
                if sibling_filled && !field.is_amount() {
                    CellStatus::Error
                } else {
                    CellStatus::Inactive
                }
            }
        };
    }

    let dated = DATE_AND_DESCRIPTION.iter().all(|f| !blank[f.index()]);
    if dated && txn.debit == 0.0 && txn.credit == 0.0 {
        status[Field::Debit.index()] = CellStatus::Error;
        status[Field::Credit.index()] = CellStatus::Error;
    }

    txn.refresh_validity();
    RowCheck {
        transaction: txn,
        status,
    }
}

/// Which cells differ, as text, from the baseline they were loaded from.
pub fn diff_row(row: &EditableRow, baseline: &Transaction) -> [bool; FIELD_COUNT] {
    Field::ALL.map(|f| codec::format(f, baseline) != row.get(f))
}

/// Derived cell state for a whole grid. Only this type writes it.
#[derive(Debug, Clone, Default)]
pub struct Tracker {
    status: Vec<RowStatus>,
    modified: Vec<[bool; FIELD_COUNT]>,
}

impl Tracker {
    pub fn new(rows: usize) -> Self {
        Self {
            status: vec![[CellStatus::Inactive; FIELD_COUNT]; rows],
            modified: vec![[false; FIELD_COUNT]; rows],
        }
    }

    pub fn reset(&mut self, rows: usize) {
        *self = Self::new(rows);
    }

    /// Re-validate every row. `baseline` is empty for a pure insert grid.
    pub fn validate_all(&mut self, rows: &[EditableRow], baseline: &[Transaction]) -> Vec<RowCheck> {
        if self.status.len() != rows.len() {
            self.reset(rows.len());
        }
        rows.iter()
            .enumerate()
            .map(|(i, row)| {
                let check = validate_row(row, baseline.get(i));
                self.status[i] = check.status;
                check
            })
            .collect()
    }

    /// Recompute the modified flags of one row after a text mutation.
    pub fn refresh_modified(&mut self, idx: usize, row: &EditableRow, baseline: Option<&Transaction>) {
        if let (Some(flags), Some(base)) = (self.modified.get_mut(idx), baseline) {
            *flags = diff_row(row, base);
        }
    }

    pub fn status(&self, row: usize, field: Field) -> CellStatus {
        self.status
            .get(row)
            .map_or(CellStatus::Inactive, |s| s[field.index()])
    }

    pub fn is_modified(&self, row: usize, field: Field) -> bool {
        self.modified.get(row).is_some_and(|m| m[field.index()])
    }
}
