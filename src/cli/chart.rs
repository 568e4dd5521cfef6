use chrono::Datelike;

use crate::charts::{
    author_groups, category_slices, evolution_groups, income_slices, income_use_slices, FlowView,
    ShareView,
};
use crate::cli::{currency, open_ledger};
use crate::error::Result;
use crate::fmt::money_in;
use crate::period::Period;
use crate::reports::{self, IncomeReport, SpendingReport};
use crate::tui::run_report_view;

/// Category shares of spending, then spending against income.
pub fn show_spending(report: &SpendingReport, period: Period, symbol: &str) -> Result<()> {
    let mut shares = ShareView::new(
        format!("Spending by category, {period}"),
        category_slices(report),
        symbol,
    );
    run_report_view(&mut shares)?;

    let mut against_income = ShareView::new(
        format!(
            "Spending as a share of income ({}), {period}",
            money_in(report.income, symbol)
        ),
        income_use_slices(report),
        symbol,
    );
    run_report_view(&mut against_income)
}

pub fn show_income(report: &IncomeReport, period: Period, symbol: &str) -> Result<()> {
    let title = match report.top() {
        Some((author, amount)) => format!(
            "Income by author, {period} (top: {author}, {})",
            money_in(amount, symbol)
        ),
        None => format!("Income by author, {period}"),
    };
    let mut view = ShareView::new(title, income_slices(report), symbol);
    run_report_view(&mut view)
}

pub fn categories(month: Option<String>) -> Result<()> {
    let period = Period::parse(month.as_deref())?;
    let conn = open_ledger()?;
    let report = reports::get_spending(&conn, period)?;
    show_spending(&report, period, &currency())
}

pub fn income(month: Option<String>) -> Result<()> {
    let period = Period::parse(month.as_deref())?;
    let conn = open_ledger()?;
    let report = reports::get_income(&conn, period)?;
    show_income(&report, period, &currency())
}

pub fn authors(month: Option<String>) -> Result<()> {
    let period = Period::parse(month.as_deref())?;
    let conn = open_ledger()?;
    let report = reports::get_author_report(&conn, period)?;
    let symbol = currency();
    let footer = format!(
        "Total income {}  Total expense {}",
        money_in(report.total.income, &symbol),
        money_in(report.total.expense, &symbol)
    );
    let mut view = FlowView::new(
        format!("Income vs expense per author, {period}"),
        author_groups(&report),
        footer,
    );
    run_report_view(&mut view)
}

pub fn evolution(year: Option<i32>) -> Result<()> {
    let year = year.unwrap_or_else(|| chrono::Local::now().year());
    let conn = open_ledger()?;
    let report = reports::get_evolution(&conn, year)?;
    let symbol = currency();
    let footer = format!(
        "Year income {}  Year expense {}",
        money_in(report.total_income, &symbol),
        money_in(report.total_expense, &symbol)
    );
    let mut view = FlowView::new(
        format!("Monthly evolution, {year}"),
        evolution_groups(&report),
        footer,
    );
    run_report_view(&mut view)
}
