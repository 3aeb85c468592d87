pub const FIELD_COUNT: usize = 6;

/// Editable columns of a transaction, in grid order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Year,
    Month,
    Day,
    Description,
    Debit,
    Credit,
}

impl Field {
    pub const ALL: [Field; FIELD_COUNT] = [
        Field::Year,
        Field::Month,
        Field::Day,
        Field::Description,
        Field::Debit,
        Field::Credit,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(idx: usize) -> Option<Field> {
        Self::ALL.get(idx).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Year => "Year",
            Self::Month => "Month",
            Self::Day => "Day",
            Self::Description => "Description",
            Self::Debit => "Debit",
            Self::Credit => "Credit",
        }
    }

    /// Maximum number of characters a cell of this column accepts.
    pub fn max_len(self) -> usize {
        match self {
            Self::Year | Self::Month | Self::Day => 5,
            Self::Description => 36,
            Self::Debit | Self::Credit => 15,
        }
    }

    pub fn is_amount(self) -> bool {
        matches!(self, Self::Debit | Self::Credit)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transaction {
    pub id: Option<i64>,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub description: String,
    pub debit: f64,
    pub credit: f64,
    pub is_valid: bool,
}

impl Transaction {
    /// A transaction may be stored only once its date and description are set
    /// and it moves money in at least one direction.
    pub fn is_eligible(&self) -> bool {
        self.year != 0
            && self.month != 0
            && self.day != 0
            && !self.description.is_empty()
            && (self.debit != 0.0 || self.credit != 0.0)
    }

    pub fn refresh_validity(&mut self) {
        self.is_valid = self.is_eligible();
    }

    /// True when both transactions carry the same ledger values, ignoring id and validity.
    pub fn same_entry(&self, other: &Transaction) -> bool {
        self.year == other.year
            && self.month == other.month
            && self.day == other.day
            && self.description == other.description
            && self.debit == other.debit
            && self.credit == other.credit
    }
}

/// Free-text shadow of a transaction while it sits in the grid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditableRow {
    pub year: String,
    pub month: String,
    pub day: String,
    pub description: String,
    pub debit: String,
    pub credit: String,
}

impl EditableRow {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Year => &self.year,
            Field::Month => &self.month,
            Field::Day => &self.day,
            Field::Description => &self.description,
            Field::Debit => &self.debit,
            Field::Credit => &self.credit,
        }
    }

    pub fn get_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Year => &mut self.year,
            Field::Month => &mut self.month,
            Field::Day => &mut self.day,
            Field::Description => &mut self.description,
            Field::Debit => &mut self.debit,
            Field::Credit => &mut self.credit,
        }
    }

    /// Append a character, respecting the column's width cap.
    pub fn push_char(&mut self, field: Field, c: char) -> bool {
        let text = self.get_mut(field);
        if text.chars().count() >= field.max_len() {
            return false;
        }
        text.push(c);
        true
    }

    pub fn pop_char(&mut self, field: Field) -> bool {
        self.get_mut(field).pop().is_some()
    }
}

/// Search filter. `None` fields are wildcards; all present fields are ANDed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchCriteria {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub description: Option<String>,
    pub debit: Option<f64>,
    pub credit: Option<f64>,
}

impl SearchCriteria {
    pub fn is_empty(&self) -> bool {
        self.year.is_none()
            && self.month.is_none()
            && self.day.is_none()
            && self.description.is_none()
            && self.debit.is_none()
            && self.credit.is_none()
    }

    #[cfg(test)]
    pub fn matches(&self, txn: &Transaction) -> bool {
        self.year.map_or(true, |y| txn.year == y)
            && self.month.map_or(true, |m| txn.month == m)
            && self.day.map_or(true, |d| txn.day == d)
            && self.description.as_ref().map_or(true, |d| {
                txn.description.to_lowercase().contains(&d.to_lowercase())
            })
            && self.debit.map_or(true, |d| txn.debit == d)
            && self.credit.map_or(true, |c| txn.credit == c)
    }

    /// Short human-readable summary, e.g. "year: 2024, description: coffee".
    pub fn describe(&self) -> String {
        if self.is_empty() {
            return "all transactions".to_string();
        }
        let mut parts = Vec::new();
        if let Some(y) = self.year {
            parts.push(format!("year: {y}"));
        }
        if let Some(m) = self.month {
            parts.push(format!("month: {m}"));
        }
        if let Some(d) = self.day {
            parts.push(format!("day: {d}"));
        }
        if let Some(ref d) = self.description {
            parts.push(format!("description: {d}"));
        }
        if let Some(d) = self.debit {
            parts.push(format!("debit: {d:.2}"));
        }
        if let Some(c) = self.credit {
            parts.push(format!("credit: {c:.2}"));
        }
        parts.join(", ")
    }
}
