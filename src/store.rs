use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

use crate::error::{BudgieError, Result};
use crate::models::{SearchCriteria, Transaction};

/// Persistence collaborator used by the grid editor and the importer.
///
/// Calls are independent: a failure part way through a batch leaves the
/// earlier rows written.
pub trait TransactionStore {
    fn find(&self, criteria: &SearchCriteria) -> Result<Vec<Transaction>>;

    /// Writes only rows with `is_valid` set. Returns how many were written.
    fn insert_many(&self, txns: &[Transaction]) -> Result<usize>;

    fn update_by_id(&self, id: i64, txn: &Transaction) -> Result<()>;

    fn delete_by_id(&self, id: i64) -> Result<()>;

    /// Whether an entry with exactly these values is already stored.
    fn contains(&self, txn: &Transaction) -> Result<bool>;

    fn count(&self) -> Result<i64>;
}

fn row_to_transaction(row: &Row) -> rusqlite::Result<Transaction> {
    let mut txn = Transaction {
        id: Some(row.get(0)?),
        year: row.get(1)?,
        month: row.get(2)?,
        day: row.get(3)?,
        description: row.get(4)?,
        debit: row.get(5)?,
        credit: row.get(6)?,
        is_valid: false,
    };
    txn.refresh_validity();
    Ok(txn)
}

impl TransactionStore for Connection {
    fn find(&self, criteria: &SearchCriteria) -> Result<Vec<Transaction>> {
        let mut clauses: Vec<String> = Vec::new();
        let mut values: Vec<Value> = Vec::new();

        if let Some(year) = criteria.year {
            values.push(Value::Integer(year.into()));
            clauses.push(format!("year = ?{}", values.len()));
        }
        if let Some(month) = criteria.month {
            values.push(Value::Integer(month.into()));
            clauses.push(format!("month = ?{}", values.len()));
        }
        if let Some(day) = criteria.day {
            values.push(Value::Integer(day.into()));
            clauses.push(format!("day = ?{}", values.len()));
        }
        if let Some(ref description) = criteria.description {
            values.push(Value::Text(description.to_lowercase()));
            clauses.push(format!("instr(lower(description), ?{}) > 0", values.len()));
        }
        if let Some(debit) = criteria.debit {
            values.push(Value::Real(debit));
            clauses.push(format!("debit = ?{}", values.len()));
        }
        if let Some(credit) = criteria.credit {
            values.push(Value::Real(credit));
            clauses.push(format!("credit = ?{}", values.len()));
        }

        let where_clause = if clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", clauses.join(" AND "))
        };
        let sql = format!(
            "SELECT id, year, month, day, description, debit, credit FROM transactions{where_clause} \
             ORDER BY year, month, day, id"
        );

        let mut stmt = self.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(values), row_to_transaction)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        tracing::debug!(criteria = %criteria.describe(), found = rows.len(), "find");
        Ok(rows)
    }

    fn insert_many(&self, txns: &[Transaction]) -> Result<usize> {
        let mut stmt = self.prepare_cached(
            "INSERT INTO transactions (year, month, day, description, debit, credit) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;
        let mut written = 0usize;
        for txn in txns.iter().filter(|t| t.is_valid) {
            stmt.execute(params![
                txn.year,
                txn.month,
                txn.day,
                txn.description,
                txn.debit,
                txn.credit
            ])?;
            written += 1;
        }
        tracing::debug!(written, offered = txns.len(), "insert_many");
        Ok(written)
    }

    fn update_by_id(&self, id: i64, txn: &Transaction) -> Result<()> {
        let changed = self.execute(
            "UPDATE transactions SET year = ?1, month = ?2, day = ?3, description = ?4, \
             debit = ?5, credit = ?6 WHERE id = ?7",
            params![
                txn.year,
                txn.month,
                txn.day,
                txn.description,
                txn.debit,
                txn.credit,
                id
            ],
        )?;
        if changed == 0 {
            return Err(BudgieError::Other(format!("Transaction #{id} not found")));
        }
        tracing::debug!(id, "update_by_id");
        Ok(())
    }

    fn delete_by_id(&self, id: i64) -> Result<()> {
        self.execute("DELETE FROM transactions WHERE id = ?1", [id])?;
        tracing::debug!(id, "delete_by_id");
        Ok(())
    }

    fn contains(&self, txn: &Transaction) -> Result<bool> {
        let mut stmt = self.prepare_cached(
            "SELECT 1 FROM transactions WHERE year = ?1 AND month = ?2 AND day = ?3 \
             AND description = ?4 AND debit = ?5 AND credit = ?6",
        )?;
        Ok(stmt.exists(params![
            txn.year,
            txn.month,
            txn.day,
            txn.description,
            txn.debit,
            txn.credit
        ])?)
    }

    fn count(&self) -> Result<i64> {
        Ok(self.query_row("SELECT count(*) FROM transactions", [], |r| r.get(0))?)
    }
}
