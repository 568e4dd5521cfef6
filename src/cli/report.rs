use chrono::Datelike;
use colored::Colorize;
use comfy_table::{Cell, Table};
use serde::Serialize;

use crate::cli::{currency, open_ledger};
use crate::error::Result;
use crate::fmt::money_in;
use crate::models::{Category, Kind};
use crate::period::Period;
use crate::reports::{
    self, AuthorReport, EvolutionReport, IncomeReport, Listing, SpendingReport,
};

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn signed(val: f64, symbol: &str) -> String {
    if val < 0.0 {
        money_in(val, symbol).red().to_string()
    } else {
        money_in(val, symbol).green().to_string()
    }
}

pub fn list(
    month: Option<String>,
    kind: Option<Kind>,
    author: Option<String>,
    json: bool,
) -> Result<()> {
    let period = Period::parse(month.as_deref())?;
    let conn = open_ledger()?;
    let listing = reports::get_listing(&conn, period, kind, author.as_deref())?;
    if json {
        return print_json(&listing);
    }
    if listing.rows.is_empty() {
        println!("No transactions found.");
        return Ok(());
    }

    let mut title = format!("{} transaction(s), {period}", listing.count);
    if let Some(k) = kind {
        title.push_str(&format!(", {k} only"));
    }
    if let Some(a) = &author {
        title.push_str(&format!(", author {a}"));
    }
    println!("{title}\n{}", listing_table(&listing, &currency()));
    Ok(())
}

pub(crate) fn listing_table(listing: &Listing, symbol: &str) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["ID", "Date", "Kind", "Category", "Amount", "Author", "Description"]);
    for t in &listing.rows {
        let amt = match t.kind {
            Kind::Income => money_in(t.amount, symbol).green().to_string(),
            Kind::Expense => money_in(t.amount, symbol).red().to_string(),
        };
        table.add_row(vec![
            Cell::new(t.id),
            Cell::new(t.date),
            Cell::new(t.kind),
            Cell::new(t.category),
            Cell::new(amt),
            Cell::new(&t.author),
            Cell::new(&t.description),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL".bold()),
        Cell::new(""),
        Cell::new(""),
        Cell::new(""),
        Cell::new(money_in(listing.total, symbol).bold()),
        Cell::new(""),
        Cell::new(""),
    ]);
    table
}

pub fn totals(month: Option<String>, json: bool) -> Result<()> {
    let period = Period::parse(month.as_deref())?;
    let conn = open_ledger()?;
    let report = reports::get_author_report(&conn, period)?;
    if json {
        return print_json(&report);
    }
    if report.authors.is_empty() {
        println!("No transactions for {period}.");
        return Ok(());
    }
    println!("Totals per person, {period}\n{}", totals_table(&report, &currency()));
    Ok(())
}

pub(crate) fn totals_table(report: &AuthorReport, symbol: &str) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Author", "Income", "Expense", "Balance"]);
    for (author, t) in &report.authors {
        table.add_row(vec![
            Cell::new(author),
            Cell::new(money_in(t.income, symbol)),
            Cell::new(money_in(t.expense, symbol)),
            Cell::new(signed(t.balance(), symbol)),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL".bold()),
        Cell::new(money_in(report.total.income, symbol)),
        Cell::new(money_in(report.total.expense, symbol)),
        Cell::new(signed(report.total.balance(), symbol)),
    ]);
    table
}

pub fn categories(month: Option<String>, json: bool) -> Result<()> {
    let period = Period::parse(month.as_deref())?;
    let conn = open_ledger()?;
    let report = reports::get_spending(&conn, period)?;
    if json {
        return print_json(&report);
    }
    println!("Spending by category, {period}\n{}", categories_table(&report, &currency()));
    Ok(())
}

pub(crate) fn categories_table(report: &SpendingReport, symbol: &str) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Category", "Amount", "% of expenses", "% of income"]);
    for category in Category::ALL {
        table.add_row(vec![
            Cell::new(category),
            Cell::new(money_in(report.breakdown.get(category), symbol)),
            Cell::new(format!("{:.1}%", report.share_of_expenses(category))),
            Cell::new(format!("{:.1}%", report.share_of_income(category))),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL".bold()),
        Cell::new(money_in(report.breakdown.total(), symbol)),
        Cell::new(""),
        Cell::new(""),
    ]);
    table.add_row(vec![
        Cell::new("Income"),
        Cell::new(money_in(report.income, symbol)),
        Cell::new(""),
        Cell::new(""),
    ]);
    table.add_row(vec![
        Cell::new("Remaining"),
        Cell::new(signed(report.remaining(), symbol)),
        Cell::new(""),
        Cell::new(""),
    ]);
    table
}

pub fn income(month: Option<String>, json: bool) -> Result<()> {
    let period = Period::parse(month.as_deref())?;
    let conn = open_ledger()?;
    let report = reports::get_income(&conn, period)?;
    if json {
        return print_json(&report);
    }
    if report.by_author.is_empty() {
        println!("No income for {period}.");
        return Ok(());
    }
    let symbol = currency();
    println!("Income by author, {period}\n{}", income_table(&report, &symbol));
    if let Some((author, amount)) = report.top() {
        println!("Top contributor: {} ({})", author.bold(), money_in(amount, &symbol));
    }
    Ok(())
}

pub(crate) fn income_table(report: &IncomeReport, symbol: &str) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Author", "Income", "Share"]);
    for (author, amount) in &report.by_author {
        table.add_row(vec![
            Cell::new(author),
            Cell::new(money_in(*amount, symbol)),
            Cell::new(format!("{:.1}%", report.share(author))),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL".bold()),
        Cell::new(money_in(report.total, symbol)),
        Cell::new(""),
    ]);
    table
}

pub fn evolution(year: Option<i32>, json: bool) -> Result<()> {
    let year = year.unwrap_or_else(|| chrono::Local::now().year());
    let conn = open_ledger()?;
    let report = reports::get_evolution(&conn, year)?;
    if json {
        return print_json(&report);
    }
    println!("Monthly evolution, {year}\n{}", evolution_table(&report, &currency()));
    Ok(())
}

pub(crate) fn evolution_table(report: &EvolutionReport, symbol: &str) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Month", "Income", "Expense", "Net"]);
    for (m, name) in report.months.iter().zip(MONTH_NAMES) {
        table.add_row(vec![
            Cell::new(name),
            Cell::new(money_in(m.income, symbol)),
            Cell::new(money_in(m.expense, symbol)),
            Cell::new(signed(m.net(), symbol)),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL".bold()),
        Cell::new(money_in(report.total_income, symbol)),
        Cell::new(money_in(report.total_expense, symbol)),
        Cell::new(signed(report.total_income - report.total_expense, symbol)),
    ]);
    table
}
