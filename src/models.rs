use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::Serialize;

use crate::error::LedgerError;

/// Direction of a transaction. The amount itself is never signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Income,
    Expense,
}

impl Kind {
    pub const ALL: [Kind; 2] = [Kind::Income, Kind::Expense];

    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Income => "income",
            Kind::Expense => "expense",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Kind::Income => "Income",
            Kind::Expense => "Expense",
        }
    }
}

/// Purpose of a transaction. Only expense aggregates look at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Shared,
    Personal,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Shared, Category::Personal];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Shared => "shared",
            Category::Personal => "personal",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Shared => "Shared",
            Category::Personal => "Personal",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Kind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" | "in" | "i" => Ok(Kind::Income),
            "expense" | "out" | "e" => Ok(Kind::Expense),
            other => Err(LedgerError::Validation(format!(
                "unknown kind '{other}' (expected income or expense)"
            ))),
        }
    }
}

impl FromStr for Category {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "shared" | "s" => Ok(Category::Shared),
            "personal" | "p" => Ok(Category::Personal),
            other => Err(LedgerError::Validation(format!(
                "unknown category '{other}' (expected shared or personal)"
            ))),
        }
    }
}

impl ToSql for Kind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Kind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: LedgerError| FromSqlError::Other(Box::new(e)))
    }
}

impl ToSql for Category {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Category {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: LedgerError| FromSqlError::Other(Box::new(e)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDate,
    pub amount: f64,
    pub kind: Kind,
    pub category: Category,
    pub description: String,
    pub author: String,
}

/// A transaction before the store has assigned it an id.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub amount: f64,
    pub kind: Kind,
    pub category: Category,
    pub description: String,
    pub author: String,
}

/// Partial update. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct TransactionPatch {
    pub date: Option<NaiveDate>,
    pub amount: Option<f64>,
    pub kind: Option<Kind>,
    pub category: Option<Category>,
    pub description: Option<String>,
    pub author: Option<String>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.amount.is_none()
            && self.kind.is_none()
            && self.category.is_none()
            && self.description.is_none()
            && self.author.is_none()
    }

    /// Overlay the present fields onto a stored row.
    pub fn apply(&self, current: &Transaction) -> NewTransaction {
        NewTransaction {
            date: self.date.unwrap_or(current.date),
            amount: self.amount.unwrap_or(current.amount),
            kind: self.kind.unwrap_or(current.kind),
            category: self.category.unwrap_or(current.category),
            description: self
                .description
                .clone()
                .unwrap_or_else(|| current.description.clone()),
            author: self.author.clone().unwrap_or_else(|| current.author.clone()),
        }
    }
}

/// Largest accepted amount. Keeps cent sums far from `i64` overflow.
pub const MAX_AMOUNT: f64 = 1_000_000_000_000.0;

/// Amounts are stored and summed as whole cents.
pub fn to_cents(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

pub fn from_cents(cents: i64) -> f64 {
    cents as f64 / 100.0
}

/// Parse a `YYYY-MM-DD` date, rejecting anything else.
pub fn parse_date(s: &str) -> Result<NaiveDate, LedgerError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| LedgerError::Validation(format!("malformed date '{s}' (expected YYYY-MM-DD)")))
}
