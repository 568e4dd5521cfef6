use chrono::{Datelike, NaiveDate};
use colored::Colorize;
use dialoguer::{Confirm, Input, Select};
use rusqlite::Connection;

use crate::cli::open_ledger;
use crate::cli::report::{categories_table, income_table, listing_table, totals_table};
use crate::cli::transactions::detail_table;
use crate::error::{LedgerError, Result};
use crate::fmt::money_in;
use crate::models::{parse_date, Category, Kind, NewTransaction, TransactionPatch};
use crate::period::Period;
use crate::reports;
use crate::settings::load_settings;
use crate::store;

const MENU_ITEMS: &[&str] = &[
    "Add a transaction",
    "Edit a transaction",
    "Delete a transaction",
    "Transactions of a month",
    "Income of a month",
    "Expenses of a month",
    "Totals per person",
    "Spending by category",
    "Income by author",
    "Monthly evolution chart",
    "Author comparison chart",
    "Quit",
];

#[derive(Clone, Copy)]
enum Action {
    Add,
    Edit,
    Delete,
    ListAll,
    ListIncome,
    ListExpenses,
    Totals,
    Categories,
    Income,
    EvolutionChart,
    AuthorChart,
    Quit,
}

const ACTIONS: [Action; 12] = [
    Action::Add,
    Action::Edit,
    Action::Delete,
    Action::ListAll,
    Action::ListIncome,
    Action::ListExpenses,
    Action::Totals,
    Action::Categories,
    Action::Income,
    Action::EvolutionChart,
    Action::AuthorChart,
    Action::Quit,
];

struct Session {
    conn: Connection,
    currency: String,
    user_name: String,
}

/// Loop until the user quits. A failed action prints one line and returns
/// to the menu.
pub fn run() -> Result<()> {
    let settings = load_settings();
    let session = Session {
        conn: open_ledger()?,
        currency: settings.currency,
        user_name: settings.user_name,
    };

    loop {
        println!();
        let choice = Select::new()
            .with_prompt("What would you like to do?")
            .items(MENU_ITEMS)
            .default(0)
            .interact_opt()?;
        let action = match choice {
            Some(i) => ACTIONS[i],
            None => Action::Quit,
        };
        if matches!(action, Action::Quit) {
            return Ok(());
        }
        if let Err(e) = session.perform(action) {
            tracing::warn!(error = %e, "menu action failed");
            println!("{}", format!("\u{2717} {e}").red());
        }
    }
}

impl Session {
    fn perform(&self, action: Action) -> Result<()> {
        match action {
            Action::Add => self.add(),
            Action::Edit => self.edit(),
            Action::Delete => self.delete(),
            Action::ListAll => self.list(None),
            Action::ListIncome => self.list(Some(Kind::Income)),
            Action::ListExpenses => self.list(Some(Kind::Expense)),
            Action::Totals => {
                let period = prompt_period(true)?;
                let report = reports::get_author_report(&self.conn, period)?;
                if report.authors.is_empty() {
                    println!("No transactions for {period}.");
                } else {
                    println!("{}", totals_table(&report, &self.currency));
                }
                Ok(())
            }
            Action::Categories => {
                let period = prompt_period(true)?;
                let report = reports::get_spending(&self.conn, period)?;
                println!("{}", categories_table(&report, &self.currency));
                #[cfg(feature = "charts")]
                crate::cli::chart::show_spending(&report, period, &self.currency)?;
                Ok(())
            }
            Action::Income => {
                let period = prompt_period(true)?;
                let report = reports::get_income(&self.conn, period)?;
                if report.by_author.is_empty() {
                    println!("No income for {period}.");
                } else {
                    println!("{}", income_table(&report, &self.currency));
                    #[cfg(feature = "charts")]
                    crate::cli::chart::show_income(&report, period, &self.currency)?;
                }
                Ok(())
            }
            Action::EvolutionChart => self.evolution_chart(),
            Action::AuthorChart => self.author_chart(),
            Action::Quit => Ok(()),
        }
    }

    fn add(&self) -> Result<()> {
        let today = chrono::Local::now().date_naive();
        let date = prompt_date("Date (YYYY-MM-DD)", Some(today))?.unwrap_or(today);
        let amount: f64 = Input::new().with_prompt("Amount").interact_text()?;
        let kind = pick_kind(None)?.unwrap_or(Kind::Expense);
        let category = pick_category(None)?.unwrap_or(Category::Shared);
        let description: String = Input::new()
            .with_prompt("Description")
            .allow_empty(true)
            .interact_text()?;
        let mut author_input = Input::<String>::new().with_prompt("Author");
        if !self.user_name.is_empty() {
            author_input = author_input.default(self.user_name.clone());
        }
        let author = author_input.interact_text()?;

        let id = store::insert(
            &self.conn,
            &NewTransaction {
                date,
                amount,
                kind,
                category,
                description,
                author,
            },
        )?;
        println!("{}", format!("\u{2713} Added transaction {id}").green());
        Ok(())
    }

    fn edit(&self) -> Result<()> {
        let id: i64 = Input::new().with_prompt("Transaction ID").interact_text()?;
        let current = store::get(&self.conn, id)?
            .ok_or_else(|| LedgerError::Other(format!("No transaction with ID {id}")))?;
        println!("{}", detail_table(&current, &self.currency));
        println!("(Leave a field empty to keep its value)");

        let amount_str: String = Input::new()
            .with_prompt(format!("Amount [{}]", current.amount))
            .allow_empty(true)
            .interact_text()?;
        let amount = if amount_str.trim().is_empty() {
            None
        } else {
            Some(amount_str.trim().parse::<f64>().map_err(|_| {
                LedgerError::Validation(format!("'{amount_str}' is not a number"))
            })?)
        };

        let patch = TransactionPatch {
            date: prompt_date(&format!("Date [{}]", current.date), None)?,
            amount,
            kind: pick_kind(Some(current.kind))?,
            category: pick_category(Some(current.category))?,
            description: prompt_optional(&format!("Description [{}]", current.description))?,
            author: prompt_optional(&format!("Author [{}]", current.author))?,
        };
        if patch.is_empty() {
            println!("Nothing changed.");
            return Ok(());
        }
        if store::update(&self.conn, id, &patch)? {
            println!("{}", format!("\u{2713} Updated transaction {id}").green());
        } else {
            println!("{}", format!("\u{2717} No transaction with ID {id}").red());
        }
        Ok(())
    }

    fn delete(&self) -> Result<()> {
        let id: i64 = Input::new().with_prompt("Transaction ID").interact_text()?;
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete transaction {id}?"))
            .default(false)
            .interact()?;
        if !confirmed {
            return Ok(());
        }
        if store::delete(&self.conn, id)? {
            println!("{}", format!("\u{2713} Deleted transaction {id}").green());
        } else {
            println!("{}", format!("\u{2717} No transaction with ID {id}").red());
        }
        Ok(())
    }

    fn list(&self, kind: Option<Kind>) -> Result<()> {
        let period = prompt_period(false)?;
        let kind = match kind {
            Some(k) => Some(k),
            None => pick_kind_filter()?,
        };
        let author = prompt_optional("Author (empty for everyone)")?;
        let listing = reports::get_listing(&self.conn, period, kind, author.as_deref())?;
        if listing.rows.is_empty() {
            println!("No transactions found.");
            return Ok(());
        }
        println!("{} transaction(s) for {period}", listing.count);
        println!("{}", listing_table(&listing, &self.currency));
        Ok(())
    }

    #[cfg(feature = "charts")]
    fn evolution_chart(&self) -> Result<()> {
        use crate::charts::{evolution_groups, FlowView};

        let year: i32 = Input::new()
            .with_prompt("Year")
            .default(chrono::Local::now().year())
            .interact_text()?;
        let report = reports::get_evolution(&self.conn, year)?;
        let footer = format!(
            "Year income {}  Year expense {}",
            money_in(report.total_income, &self.currency),
            money_in(report.total_expense, &self.currency)
        );
        let mut view = FlowView::new(
            format!("Monthly evolution, {year}"),
            evolution_groups(&report),
            footer,
        );
        crate::tui::run_report_view(&mut view)
    }

    #[cfg(feature = "charts")]
    fn author_chart(&self) -> Result<()> {
        use crate::charts::{author_groups, FlowView};

        let period = prompt_period(true)?;
        let report = reports::get_author_report(&self.conn, period)?;
        let footer = format!(
            "Total income {}  Total expense {}",
            money_in(report.total.income, &self.currency),
            money_in(report.total.expense, &self.currency)
        );
        let mut view = FlowView::new(
            format!("Income vs expense per author, {period}"),
            author_groups(&report),
            footer,
        );
        crate::tui::run_report_view(&mut view)
    }

    #[cfg(not(feature = "charts"))]
    fn evolution_chart(&self) -> Result<()> {
        let year: i32 = Input::new()
            .with_prompt("Year")
            .default(chrono::Local::now().year())
            .interact_text()?;
        let report = reports::get_evolution(&self.conn, year)?;
        println!("{}", crate::cli::report::evolution_table(&report, &self.currency));
        Ok(())
    }

    #[cfg(not(feature = "charts"))]
    fn author_chart(&self) -> Result<()> {
        let period = prompt_period(true)?;
        let report = reports::get_author_report(&self.conn, period)?;
        println!("{}", totals_table(&report, &self.currency));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Prompt helpers
// ---------------------------------------------------------------------------

fn prompt_optional(label: &str) -> Result<Option<String>> {
    let value: String = Input::new()
        .with_prompt(label)
        .allow_empty(true)
        .interact_text()?;
    let value = value.trim();
    Ok(if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    })
}

fn prompt_date(label: &str, default: Option<NaiveDate>) -> Result<Option<NaiveDate>> {
    let mut input = Input::<String>::new().with_prompt(label).allow_empty(true);
    if let Some(d) = default {
        input = input.default(d.to_string());
    }
    let value = input.interact_text()?;
    if value.trim().is_empty() {
        return Ok(None);
    }
    parse_date(&value).map(Some)
}

/// Year and month from the user. With `allow_all`, an empty year means all time.
fn prompt_period(allow_all: bool) -> Result<Period> {
    let now = chrono::Local::now();
    let label = if allow_all { "Year (empty for all time)" } else { "Year" };
    let mut year_input = Input::<String>::new().with_prompt(label).allow_empty(allow_all);
    if !allow_all {
        year_input = year_input.default(now.year().to_string());
    }
    let year_str = year_input.interact_text()?;
    if allow_all && year_str.trim().is_empty() {
        return Ok(Period::All);
    }
    let year: i32 = year_str
        .trim()
        .parse()
        .map_err(|_| LedgerError::Validation(format!("'{year_str}' is not a year")))?;
    let month: u32 = Input::new()
        .with_prompt("Month (1-12)")
        .default(now.month())
        .interact_text()?;
    Period::month(year, month)
}

fn pick_kind(current: Option<Kind>) -> Result<Option<Kind>> {
    let mut items: Vec<String> = Kind::ALL.iter().map(|k| k.to_string()).collect();
    if let Some(c) = current {
        items.push(format!("Keep ({c})"));
    }
    let idx = Select::new()
        .with_prompt("Kind")
        .items(&items)
        .default(if current.is_some() { items.len() - 1 } else { 1 })
        .interact()?;
    Ok(Kind::ALL.get(idx).copied())
}

fn pick_category(current: Option<Category>) -> Result<Option<Category>> {
    let mut items: Vec<String> = Category::ALL.iter().map(|c| c.to_string()).collect();
    if let Some(c) = current {
        items.push(format!("Keep ({c})"));
    }
    let idx = Select::new()
        .with_prompt("Category")
        .items(&items)
        .default(if current.is_some() { items.len() - 1 } else { 0 })
        .interact()?;
    Ok(Category::ALL.get(idx).copied())
}

fn pick_kind_filter() -> Result<Option<Kind>> {
    let idx = Select::new()
        .with_prompt("Show")
        .items(&["Everything", "Income only", "Expenses only"])
        .default(0)
        .interact()?;
    Ok(match idx {
        1 => Some(Kind::Income),
        2 => Some(Kind::Expense),
        _ => None,
    })
}
