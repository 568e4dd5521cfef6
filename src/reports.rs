use std::collections::BTreeMap;

use rusqlite::Connection;
use serde::Serialize;

use crate::aggregate::{self, AuthorTotals, CategoryBreakdown, MonthlyFlow};
use crate::error::Result;
use crate::fmt::percent;
use crate::models::{from_cents, to_cents, Category, Kind, Transaction};
use crate::period::Period;
use crate::store::{self, TransactionFilter};

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct Listing {
    pub rows: Vec<Transaction>,
    pub total: f64,
    pub count: usize,
}

/// Transactions for a period, optionally one kind and one author. `total` is
/// the sum of the listed amounts, taken in cents.
pub fn get_listing(
    conn: &Connection,
    period: Period,
    kind: Option<Kind>,
    author: Option<&str>,
) -> Result<Listing> {
    let filter = TransactionFilter::period(period).kind(kind).author(author);
    let rows = store::query(conn, &filter)?;
    let total = from_cents(rows.iter().map(|t| to_cents(t.amount)).sum());
    let count = rows.len();
    Ok(Listing { rows, total, count })
}

// ---------------------------------------------------------------------------
// Totals per author
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct AuthorReport {
    pub authors: BTreeMap<String, AuthorTotals>,
    pub total: AuthorTotals,
}

pub fn get_author_report(conn: &Connection, period: Period) -> Result<AuthorReport> {
    let authors = aggregate::totals_by_author(conn, period)?;
    let total = authors.values().fold(AuthorTotals::default(), |acc, t| AuthorTotals {
        income: acc.income + t.income,
        expense: acc.expense + t.expense,
    });
    Ok(AuthorReport { authors, total })
}

// ---------------------------------------------------------------------------
// Spending by category
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct SpendingReport {
    pub breakdown: CategoryBreakdown,
    pub income: f64,
}

impl SpendingReport {
    /// Category spending as a share of all expenses.
    pub fn share_of_expenses(&self, category: Category) -> f64 {
        percent(self.breakdown.get(category), self.breakdown.total())
    }

    /// Category spending as a share of income for the same period.
    pub fn share_of_income(&self, category: Category) -> f64 {
        percent(self.breakdown.get(category), self.income)
    }

    pub fn remaining(&self) -> f64 {
        self.income - self.breakdown.total()
    }
}

pub fn get_spending(conn: &Connection, period: Period) -> Result<SpendingReport> {
    Ok(SpendingReport {
        breakdown: aggregate::expenses_by_category(conn, period)?,
        income: aggregate::total_income(conn, period)?,
    })
}

// ---------------------------------------------------------------------------
// Income per author
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct IncomeReport {
    pub by_author: BTreeMap<String, f64>,
    pub total: f64,
}

impl IncomeReport {
    pub fn share(&self, author: &str) -> f64 {
        percent(self.by_author.get(author).copied().unwrap_or(0.0), self.total)
    }

    pub fn top(&self) -> Option<(&str, f64)> {
        aggregate::top_contributor(&self.by_author)
    }
}

pub fn get_income(conn: &Connection, period: Period) -> Result<IncomeReport> {
    Ok(IncomeReport {
        by_author: aggregate::income_by_author(conn, period)?,
        total: aggregate::total_income(conn, period)?,
    })
}

// ---------------------------------------------------------------------------
// Evolution over a year
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct EvolutionReport {
    pub year: i32,
    pub months: [MonthlyFlow; 12],
    pub total_income: f64,
    pub total_expense: f64,
}

pub fn get_evolution(conn: &Connection, year: i32) -> Result<EvolutionReport> {
    let months = aggregate::yearly_evolution(conn, year)?;
    let total_income = months.iter().map(|m| m.income).sum();
    let total_expense = months.iter().map(|m| m.expense).sum();
    Ok(EvolutionReport {
        year,
        months,
        total_income,
        total_expense,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_db;
    use crate::models::NewTransaction;
    use chrono::NaiveDate;

    fn seed(conn: &Connection) {
        let rows = [
            ("2024-05-02", 2000.0, Kind::Income, Category::Shared, "Alice"),
            ("2024-05-03", 1000.0, Kind::Income, Category::Shared, "Bob"),
            ("2024-05-10", 600.0, Kind::Expense, Category::Shared, "Alice"),
            ("2024-05-12", 150.0, Kind::Expense, Category::Personal, "Bob"),
            ("2024-06-01", 99.0, Kind::Expense, Category::Personal, "Bob"),
        ];
        for (date, amount, kind, category, author) in rows {
            store::insert(
                conn,
                &NewTransaction {
                    date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
                    amount,
                    kind,
                    category,
                    description: format!("{author} {date}"),
                    author: author.to_string(),
                },
            )
            .unwrap();
        }
    }

    fn may() -> Period {
        Period::month(2024, 5).unwrap()
    }

    #[test]
    fn test_listing_total_sums_displayed_rows() {
        let (_dir, conn) = test_db();
        seed(&conn);
        let listing = get_listing(&conn, may(), Some(Kind::Expense), None).unwrap();
        assert_eq!(listing.count, 2);
        assert_eq!(listing.total, 750.0);

        let bob = get_listing(&conn, may(), Some(Kind::Expense), Some("Bob")).unwrap();
        assert_eq!(bob.rows[0].description, "Bob 2024-05-12");
        assert_eq!(bob.count, 1);
        assert_eq!(bob.total, 150.0);
    }

    #[test]
    fn test_author_report_grand_total() {
        let (_dir, conn) = test_db();
        seed(&conn);
        let report = get_author_report(&conn, may()).unwrap();
        assert_eq!(report.authors.len(), 2);
        assert_eq!(report.total.income, 3000.0);
        assert_eq!(report.total.expense, 750.0);
        assert_eq!(report.total.balance(), 2250.0);
    }

    #[test]
    fn test_spending_shares() {
        let (_dir, conn) = test_db();
        seed(&conn);
        let report = get_spending(&conn, may()).unwrap();
        assert_eq!(report.share_of_expenses(Category::Shared), 80.0);
        assert_eq!(report.share_of_income(Category::Shared), 20.0);
        assert_eq!(report.remaining(), 2250.0);
    }

    #[test]
    fn test_spending_without_income_is_zero_percent() {
        let (_dir, conn) = test_db();
        seed(&conn);
        let june = get_spending(&conn, Period::month(2024, 6).unwrap()).unwrap();
        assert_eq!(june.income, 0.0);
        assert_eq!(june.share_of_income(Category::Personal), 0.0);
        assert_eq!(june.share_of_expenses(Category::Personal), 100.0);
    }

    #[test]
    fn test_income_report_top_and_share() {
        let (_dir, conn) = test_db();
        seed(&conn);
        let report = get_income(&conn, Period::All).unwrap();
        assert_eq!(report.top(), Some(("Alice", 2000.0)));
        assert!((report.share("Bob") - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(report.share("Nobody"), 0.0);
    }

    #[test]
    fn test_evolution_totals() {
        let (_dir, conn) = test_db();
        seed(&conn);
        let report = get_evolution(&conn, 2024).unwrap();
        assert_eq!(report.total_income, 3000.0);
        assert_eq!(report.total_expense, 849.0);
        assert_eq!(report.months[4].net(), 2250.0);
    }
}
