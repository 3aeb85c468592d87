use std::path::Path;

use chrono::{Datelike, NaiveDate};

use crate::error::Result;
use crate::models::Transaction;
use crate::store::TransactionStore;

// Column order of a statement export: date, description, debit, credit, total.
const COL_DATE: usize = 0;
const COL_DESCRIPTION: usize = 1;
const COL_DEBIT: usize = 2;
const COL_CREDIT: usize = 3;
const COL_TOTAL: usize = 4;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse a statement amount. Blank is `Some(0.0)`; garbage is `None`.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let s = raw.replace([',', '"', '$'], "");
    let s = s.trim();
    if s.is_empty() {
        return Some(0.0);
    }
    let value = if let Some(inner) = s.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
        -inner.trim().parse::<f64>().ok()?
    } else {
        s.parse::<f64>().ok()?
    };
    value.is_finite().then_some(value)
}

pub fn parse_date_mdy(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%m/%d/%Y").ok()
}

/// Read every record of a delimited file as trimmed column strings.
pub fn read_rows(file_path: &Path) -> Result<Vec<Vec<String>>> {
    let file = std::fs::File::open(file_path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(std::io::BufReader::new(file));
    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

/// Map one record to a transaction. Rows that cannot be mapped come back with
/// `is_valid` false rather than as an error, so a header line is just skipped.
pub fn row_to_transaction(columns: &[String]) -> Transaction {
    let col = |i: usize| columns.get(i).map(String::as_str).unwrap_or("");

    let mut txn = Transaction::default();
    let date = parse_date_mdy(col(COL_DATE));
    let debit = parse_amount(col(COL_DEBIT));
    let credit = if col(COL_CREDIT).is_empty() {
        parse_amount(col(COL_TOTAL))
    } else {
        parse_amount(col(COL_CREDIT))
    };

    let (Some(date), Some(debit), Some(credit)) = (date, debit, credit) else {
        txn.description = col(COL_DESCRIPTION).to_string();
        return txn;
    };
    txn.year = date.year();
    txn.month = date.month();
    txn.day = date.day();
    txn.description = col(COL_DESCRIPTION).to_string();
    txn.debit = debit;
    txn.credit = credit;
    txn.refresh_validity();
    txn
}

// ---------------------------------------------------------------------------
// import_file
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    Inserted,
    Invalid,
    Duplicate,
}

#[derive(Debug, Clone)]
pub struct ImportedRow {
    /// 1-based record number in the file.
    pub line: usize,
    pub transaction: Transaction,
    pub outcome: RowOutcome,
}

#[derive(Debug, Default)]
pub struct ImportReport {
    pub rows: Vec<ImportedRow>,
}

impl ImportReport {
    fn count(&self, outcome: RowOutcome) -> usize {
        self.rows.iter().filter(|r| r.outcome == outcome).count()
    }

    pub fn inserted(&self) -> usize {
        self.count(RowOutcome::Inserted)
    }

    pub fn invalid(&self) -> usize {
        self.count(RowOutcome::Invalid)
    }

    pub fn duplicates(&self) -> usize {
        self.count(RowOutcome::Duplicate)
    }
}

pub fn import_file(store: &dyn TransactionStore, file_path: &Path) -> Result<ImportReport> {
    let records = read_rows(file_path)?;

    let mut report = ImportReport::default();
    let mut to_insert: Vec<Transaction> = Vec::new();
    for (i, columns) in records.iter().enumerate() {
        let txn = row_to_transaction(columns);
        let outcome = if !txn.is_valid {
            RowOutcome::Invalid
        } else if to_insert.iter().any(|t| t.same_entry(&txn)) || store.contains(&txn)? {
            RowOutcome::Duplicate
        } else {
            to_insert.push(txn.clone());
            RowOutcome::Inserted
        };
        report.rows.push(ImportedRow {
            line: i + 1,
            transaction: txn,
            outcome,
        });
    }

    let written = store.insert_many(&to_insert)?;
    tracing::info!(
        file = %file_path.display(),
        written,
        invalid = report.invalid(),
        duplicates = report.duplicates(),
        "imported file"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_db;
    use crate::models::SearchCriteria;

    fn write_csv(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn cols(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1,234.56"), Some(1234.56));
        assert_eq!(parse_amount("\"500.00\""), Some(500.0));
        assert_eq!(parse_amount("  -42.50  "), Some(-42.5));
        assert_eq!(parse_amount(""), Some(0.0));
        assert_eq!(parse_amount("not_a_number"), None);
        assert_eq!(parse_amount("inf"), None);
    }

    #[test]
    fn test_parse_amount_parenthesized_negatives() {
        assert_eq!(parse_amount("(500.00)"), Some(-500.0));
        assert_eq!(parse_amount("(1,234.56)"), Some(-1234.56));
        assert_eq!(parse_amount("$1,234.56"), Some(1234.56));
    }

    #[test]
    fn test_parse_date_mdy() {
        assert_eq!(parse_date_mdy("01/15/2025"), NaiveDate::from_ymd_opt(2025, 1, 15));
        assert_eq!(parse_date_mdy("2025-01-15"), None);
        assert_eq!(parse_date_mdy("13/01/2025"), None);
        assert_eq!(parse_date_mdy("02/30/2025"), None);
    }

    #[test]
    fn test_row_to_transaction_maps_columns() {
        let txn = row_to_transaction(&cols(&["03/02/2024", "Groceries", "12.50", "", ""]));
        assert!(txn.is_valid);
        assert_eq!((txn.year, txn.month, txn.day), (2024, 3, 2));
        assert_eq!(txn.debit, 12.5);
        assert_eq!(txn.credit, 0.0);
    }

    #[test]
    fn test_total_fills_missing_credit() {
        let txn = row_to_transaction(&cols(&["03/02/2024", "Refund", "", "", "40.00"]));
        assert!(txn.is_valid);
        assert_eq!(txn.credit, 40.0);

        let short = row_to_transaction(&cols(&["03/02/2024", "Refund", "1"]));
        assert!(short.is_valid);
        assert_eq!(short.credit, 0.0);
    }

    #[test]
    fn test_header_row_is_invalid() {
        let txn = row_to_transaction(&cols(&["Date", "Description", "Debit", "Credit", "Total"]));
        assert!(!txn.is_valid);
    }

    #[test]
    fn test_import_file_inserts_and_reports() {
        let (dir, conn) = test_db();
        let path = write_csv(
            dir.path(),
            "stmt.csv",
            "Date,Description,Debit,Credit,Total\n\
             01/15/2025,COFFEE,4.50,,\n\
             01/16/2025,PAYMENT,,\"1,000.00\",\n\
             01/17/2025,NOTHING,,,\n",
        );
        let report = import_file(&conn, &path).unwrap();
        assert_eq!(report.inserted(), 2);
        assert_eq!(report.invalid(), 2);
        assert_eq!(report.rows[0].line, 1);
        assert_eq!(report.rows[0].outcome, RowOutcome::Invalid);
        assert_eq!(conn.count().unwrap(), 2);

        let found = conn
            .find(&SearchCriteria {
                description: Some("payment".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(found[0].credit, 1000.0);
    }

    #[test]
    fn test_import_file_skips_duplicates() {
        let (dir, conn) = test_db();
        let first = write_csv(dir.path(), "a.csv", "01/15/2025,COFFEE,4.50,,\n01/15/2025,COFFEE,4.50,,\n");
        let r1 = import_file(&conn, &first).unwrap();
        assert_eq!(r1.inserted(), 1);
        assert_eq!(r1.duplicates(), 1);

        let second = write_csv(dir.path(), "b.csv", "01/15/2025,COFFEE,4.50,,\n01/16/2025,TEA,2,,\n");
        let r2 = import_file(&conn, &second).unwrap();
        assert_eq!(r2.inserted(), 1);
        assert_eq!(r2.duplicates(), 1);
        assert_eq!(conn.count().unwrap(), 2);
    }

    #[test]
    fn test_import_missing_file_is_error() {
        let (dir, conn) = test_db();
        assert!(import_file(&conn, &dir.path().join("nope.csv")).is_err());
    }
}
