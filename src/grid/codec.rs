//! Conversion between typed transaction fields and the text shown in grid cells.
//!
//! Parsing never fails loudly: every input maps to [`Parsed::Absent`],
//! [`Parsed::Valid`] or [`Parsed::Invalid`], and the caller decides what an
//! absent value means (wildcard in a search, unset in an insert).

use crate::models::{EditableRow, Field, Transaction};

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Year(i32),
    Month(u32),
    Day(u32),
    Text(String),
    Amount(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Parsed {
    /// Blank text.
    Absent,
    Valid(Value),
    Invalid,
}

pub fn parse(field: Field, text: &str) -> Parsed {
    let text = text.trim();
    if text.is_empty() {
        return Parsed::Absent;
    }
    let value = match field {
        Field::Year => text
            .parse::<i32>()
            .ok()
            .filter(|y| (1..=9999).contains(y))
            .map(Value::Year),
        Field::Month => parse_month(text).map(Value::Month),
        Field::Day => text
            .parse::<u32>()
            .ok()
            .filter(|d| (1..=31).contains(d))
            .map(Value::Day),
        Field::Description => Some(Value::Text(text.to_string())),
        Field::Debit | Field::Credit => text
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Value::Amount),
    };
    value.map_or(Parsed::Invalid, Parsed::Valid)
}

/// "Jan".."Dec" (any case), falling back to a number in 1..=12.
fn parse_month(text: &str) -> Option<u32> {
    if text.len() == 3 && text.chars().all(|c| c.is_ascii_alphabetic()) {
        return text
            .parse::<chrono::Month>()
            .ok()
            .map(|m| m.number_from_month());
    }
    text.parse::<u32>().ok().filter(|m| (1..=12).contains(m))
}

/// Text a cell shows for a stored value. Amounts always carry two decimals.
pub fn format(field: Field, txn: &Transaction) -> String {
    match field {
        Field::Year => txn.year.to_string(),
        Field::Month => txn.month.to_string(),
        Field::Day => txn.day.to_string(),
        Field::Description => txn.description.clone(),
        Field::Debit => format_amount(txn.debit),
        Field::Credit => format_amount(txn.credit),
    }
}

pub fn format_amount(val: f64) -> String {
    format!("{val:.2}")
}

/// Write a parsed value into the matching transaction field.
pub fn apply(field: Field, value: Value, txn: &mut Transaction) {
    match value {
        Value::Year(y) => txn.year = y,
        Value::Month(m) => txn.month = m,
        Value::Day(d) => txn.day = d,
        Value::Text(s) => txn.description = s,
        Value::Amount(a) if field == Field::Credit => txn.credit = a,
        Value::Amount(a) => txn.debit = a,
    }
}

impl From<&Transaction> for EditableRow {
    fn from(txn: &Transaction) -> Self {
        Self {
            year: format(Field::Year, txn),
            month: format(Field::Month, txn),
            day: format(Field::Day, txn),
            description: format(Field::Description, txn),
            debit: format(Field::Debit, txn),
            credit: format(Field::Credit, txn),
        }
    }
}
