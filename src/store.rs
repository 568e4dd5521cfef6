use chrono::Datelike;
use rusqlite::types::ToSql;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::{LedgerError, Result};
use crate::models::{from_cents, to_cents, Kind, NewTransaction, Transaction, TransactionPatch, MAX_AMOUNT};
use crate::period::Period;

/// Optional constraints on a transaction query. Absent fields add no predicate.
#[derive(Debug, Clone)]
pub struct TransactionFilter {
    pub period: Period,
    pub kind: Option<Kind>,
    pub author: Option<String>,
}

impl TransactionFilter {
    pub fn period(period: Period) -> Self {
        Self {
            period,
            kind: None,
            author: None,
        }
    }

    pub fn kind(mut self, kind: Option<Kind>) -> Self {
        self.kind = kind;
        self
    }

    pub fn author(mut self, author: Option<&str>) -> Self {
        self.author = author.map(str::to_string);
        self
    }
}

/// Build a `WHERE` body and its positional parameters (`1=1` when nothing is
/// constrained). An unresolvable period is an error, never an unbounded query.
pub(crate) fn where_clause(filter: &TransactionFilter) -> Result<(String, Vec<Box<dyn ToSql>>)> {
    let mut clauses: Vec<String> = Vec::new();
    let mut params: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(range) = filter.period.range()? {
        params.push(Box::new(range.start));
        clauses.push(format!("date >= ?{}", params.len()));
        params.push(Box::new(range.end));
        clauses.push(format!("date < ?{}", params.len()));
    }
    if let Some(kind) = filter.kind {
        params.push(Box::new(kind));
        clauses.push(format!("kind = ?{}", params.len()));
    }
    if let Some(author) = &filter.author {
        params.push(Box::new(author.clone()));
        clauses.push(format!("author = ?{}", params.len()));
    }

    if clauses.is_empty() {
        Ok(("1=1".to_string(), params))
    } else {
        Ok((clauses.join(" AND "), params))
    }
}

fn validate(txn: &NewTransaction) -> Result<()> {
    if !txn.amount.is_finite() || txn.amount < 0.0 {
        return Err(LedgerError::Validation(format!(
            "amount must be a non-negative number, got {}",
            txn.amount
        )));
    }
    if txn.amount > MAX_AMOUNT {
        return Err(LedgerError::Validation(format!(
            "amount {} is above the limit of {MAX_AMOUNT}",
            txn.amount
        )));
    }
    if txn.author.trim().is_empty() {
        return Err(LedgerError::Validation("author is required".to_string()));
    }
    if !(1..=9999).contains(&txn.date.year()) {
        return Err(LedgerError::Validation(format!(
            "date {} is outside years 1-9999",
            txn.date
        )));
    }
    Ok(())
}

fn from_row(row: &Row) -> rusqlite::Result<Transaction> {
    Ok(Transaction {
        id: row.get(0)?,
        date: row.get(1)?,
        amount: from_cents(row.get(2)?),
        kind: row.get(3)?,
        category: row.get(4)?,
        description: row.get(5)?,
        author: row.get(6)?,
    })
}

const COLUMNS: &str = "id, date, amount_cents, kind, category, description, author";

pub fn insert(conn: &Connection, txn: &NewTransaction) -> Result<i64> {
    validate(txn)?;
    conn.execute(
        "INSERT INTO transactions (date, amount_cents, kind, category, description, author) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            txn.date,
            to_cents(txn.amount),
            txn.kind,
            txn.category,
            txn.description,
            txn.author.trim()
        ],
    )?;
    let id = conn.last_insert_rowid();
    tracing::debug!(id, date = %txn.date, amount = txn.amount, kind = txn.kind.as_str(), "inserted transaction");
    Ok(id)
}

pub fn get(conn: &Connection, id: i64) -> Result<Option<Transaction>> {
    let txn = conn
        .query_row(
            &format!("SELECT {COLUMNS} FROM transactions WHERE id = ?1"),
            [id],
            from_row,
        )
        .optional()?;
    Ok(txn)
}

/// Apply a partial update. Returns `false` when no row has this id.
pub fn update(conn: &Connection, id: i64, patch: &TransactionPatch) -> Result<bool> {
    let Some(current) = get(conn, id)? else {
        return Ok(false);
    };
    let merged = patch.apply(&current);
    validate(&merged)?;
    let changed = conn.execute(
        "UPDATE transactions \
         SET date = ?1, amount_cents = ?2, kind = ?3, category = ?4, description = ?5, author = ?6 \
         WHERE id = ?7",
        params![
            merged.date,
            to_cents(merged.amount),
            merged.kind,
            merged.category,
            merged.description,
            merged.author.trim(),
            id
        ],
    )?;
    tracing::debug!(id, changed, "updated transaction");
    Ok(changed > 0)
}

/// Delete by id. Returns `false` when no row has this id.
pub fn delete(conn: &Connection, id: i64) -> Result<bool> {
    let changed = conn.execute("DELETE FROM transactions WHERE id = ?1", [id])?;
    tracing::debug!(id, changed, "deleted transaction");
    Ok(changed > 0)
}

/// Transactions matching `filter`, ordered by date then id.
pub fn query(conn: &Connection, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
    let (clause, params) = where_clause(filter)?;
    let sql = format!("SELECT {COLUMNS} FROM transactions WHERE {clause} ORDER BY date, id");
    let mut stmt = conn.prepare(&sql)?;
    let param_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
    let rows = stmt
        .query_map(param_refs.as_slice(), from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Distinct authors, alphabetically.
pub fn authors(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT DISTINCT author FROM transactions ORDER BY author")?;
    let rows = stmt
        .query_map([], |row| row.get(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn count(conn: &Connection) -> Result<i64> {
    Ok(conn.query_row("SELECT count(*) FROM transactions", [], |r| r.get(0))?)
}
