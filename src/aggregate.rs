//! Period-scoped summaries over the transaction table.
//!
//! Author keyed results are sparse: an author appears only if they have at
//! least one matching row in the period. The category breakdown is dense and
//! always reports both categories.

use std::collections::BTreeMap;

use rusqlite::types::ToSql;
use rusqlite::Connection;
use serde::Serialize;

use crate::error::Result;
use crate::models::{from_cents, Category, Kind};
use crate::period::{MonthRange, Period};
use crate::store::{where_clause, TransactionFilter};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AuthorTotals {
    pub income: f64,
    pub expense: f64,
}

impl AuthorTotals {
    pub fn balance(&self) -> f64 {
        self.income - self.expense
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CategoryBreakdown {
    pub shared: f64,
    pub personal: f64,
}

impl CategoryBreakdown {
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Shared => self.shared,
            Category::Personal => self.personal,
        }
    }

    pub fn total(&self) -> f64 {
        self.shared + self.personal
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MonthlyFlow {
    pub month: u32,
    pub income: f64,
    pub expense: f64,
}

impl MonthlyFlow {
    pub fn net(&self) -> f64 {
        self.income - self.expense
    }
}

fn run_grouped<T, F>(conn: &Connection, sql: &str, params: &[Box<dyn ToSql>], map: F) -> Result<Vec<T>>
where
    F: FnMut(&rusqlite::Row<'_>) -> rusqlite::Result<T>,
{
    let mut stmt = conn.prepare(sql)?;
    let param_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
    let rows = stmt
        .query_map(param_refs.as_slice(), map)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Income and expense totals per author who transacted in the period.
pub fn totals_by_author(conn: &Connection, period: Period) -> Result<BTreeMap<String, AuthorTotals>> {
    let (clause, params) = where_clause(&TransactionFilter::period(period))?;
    let sql = format!(
        "SELECT author, kind, SUM(amount_cents) FROM transactions \
         WHERE {clause} GROUP BY author, kind"
    );
    let rows: Vec<(String, Kind, i64)> =
        run_grouped(conn, &sql, &params, |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?;

    let mut totals: BTreeMap<String, AuthorTotals> = BTreeMap::new();
    for (author, kind, cents) in rows {
        let entry = totals.entry(author).or_default();
        match kind {
            Kind::Income => entry.income = from_cents(cents),
            Kind::Expense => entry.expense = from_cents(cents),
        }
    }
    tracing::trace!(%period, authors = totals.len(), "totals by author");
    Ok(totals)
}

/// Expense totals for both categories. Income rows never count, whatever
/// category they carry.
pub fn expenses_by_category(conn: &Connection, period: Period) -> Result<CategoryBreakdown> {
    let filter = TransactionFilter::period(period).kind(Some(Kind::Expense));
    let (clause, params) = where_clause(&filter)?;
    let sql = format!(
        "SELECT category, SUM(amount_cents) FROM transactions \
         WHERE {clause} GROUP BY category"
    );
    let rows: Vec<(Category, i64)> =
        run_grouped(conn, &sql, &params, |row| Ok((row.get(0)?, row.get(1)?)))?;

    let mut breakdown = CategoryBreakdown::default();
    for (category, cents) in rows {
        match category {
            Category::Shared => breakdown.shared = from_cents(cents),
            Category::Personal => breakdown.personal = from_cents(cents),
        }
    }
    tracing::trace!(%period, shared = breakdown.shared, personal = breakdown.personal, "expenses by category");
    Ok(breakdown)
}

/// Sum of the per-author income, folded in author order so it matches any
/// sum taken over `totals_by_author` or `income_by_author`.
pub fn total_income(conn: &Connection, period: Period) -> Result<f64> {
    Ok(income_by_author(conn, period)?.values().sum())
}

pub fn total_expenses(conn: &Connection, period: Period) -> Result<f64> {
    Ok(expenses_by_category(conn, period)?.total())
}

/// Income per author, only for authors with at least one income row.
pub fn income_by_author(conn: &Connection, period: Period) -> Result<BTreeMap<String, f64>> {
    let filter = TransactionFilter::period(period).kind(Some(Kind::Income));
    let (clause, params) = where_clause(&filter)?;
    let sql = format!(
        "SELECT author, SUM(amount_cents) FROM transactions \
         WHERE {clause} GROUP BY author"
    );
    let rows: Vec<(String, i64)> =
        run_grouped(conn, &sql, &params, |row| Ok((row.get(0)?, row.get(1)?)))?;
    Ok(rows
        .into_iter()
        .map(|(author, cents)| (author, from_cents(cents)))
        .collect())
}

/// Income and expense for each month of `year`, January first. Months with
/// no activity are zero.
pub fn yearly_evolution(conn: &Connection, year: i32) -> Result<[MonthlyFlow; 12]> {
    let mut months = [MonthlyFlow::default(); 12];
    for (i, flow) in months.iter_mut().enumerate() {
        flow.month = i as u32 + 1;
    }

    let start = MonthRange::resolve(year, 1)?.start;
    let end = MonthRange::resolve(year, 12)?.end;

    let mut stmt = conn.prepare(
        "SELECT CAST(substr(date, 6, 2) AS INTEGER) AS m, kind, SUM(amount_cents) \
         FROM transactions WHERE date >= ?1 AND date < ?2 \
         GROUP BY m, kind",
    )?;
    let rows: Vec<(u32, Kind, i64)> = stmt
        .query_map(rusqlite::params![start, end], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    for (month, kind, cents) in rows {
        let Some(flow) = months.get_mut(month.saturating_sub(1) as usize) else {
            continue;
        };
        match kind {
            Kind::Income => flow.income = from_cents(cents),
            Kind::Expense => flow.expense = from_cents(cents),
        }
    }
    tracing::debug!(year, "yearly evolution computed");
    Ok(months)
}

/// Highest value in an author map. Ties go to the alphabetically first author.
pub fn top_contributor(amounts: &BTreeMap<String, f64>) -> Option<(&str, f64)> {
    amounts
        .iter()
        .fold(None::<(&str, f64)>, |best, (name, &value)| match best {
            Some((_, top)) if top >= value => best,
            _ => Some((name.as_str(), value)),
        })
}
