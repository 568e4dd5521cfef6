use chrono::NaiveDate;
use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::{currency, open_ledger};
use crate::error::{LedgerError, Result};
use crate::fmt::money_in;
use crate::models::{Category, Kind, NewTransaction, Transaction, TransactionPatch};
use crate::settings::load_settings;
use crate::store;

pub fn add(
    amount: f64,
    kind: Kind,
    category: Category,
    date: Option<NaiveDate>,
    description: String,
    author: Option<String>,
) -> Result<()> {
    let author = match author {
        Some(a) => a,
        None => {
            let settings = load_settings();
            if settings.user_name.is_empty() {
                return Err(LedgerError::Validation(
                    "--author is required (or set a default with `penny init --user`)".to_string(),
                ));
            }
            settings.user_name
        }
    };
    let txn = NewTransaction {
        date: date.unwrap_or_else(|| chrono::Local::now().date_naive()),
        amount,
        kind,
        category,
        description,
        author,
    };
    let conn = open_ledger()?;
    let id = store::insert(&conn, &txn)?;
    println!("{}", format!("\u{2713} Added transaction {id}").green());
    Ok(())
}

pub fn edit(id: i64, patch: TransactionPatch) -> Result<()> {
    if patch.is_empty() {
        return Err(LedgerError::Other(
            "Nothing to change: pass at least one field".to_string(),
        ));
    }
    let conn = open_ledger()?;
    if !store::update(&conn, id, &patch)? {
        return Err(LedgerError::Other(format!("No transaction with ID {id}")));
    }
    println!("{}", format!("\u{2713} Updated transaction {id}").green());
    Ok(())
}

pub fn delete(id: i64) -> Result<()> {
    let conn = open_ledger()?;
    if !store::delete(&conn, id)? {
        return Err(LedgerError::Other(format!("No transaction with ID {id}")));
    }
    println!("{}", format!("\u{2713} Deleted transaction {id}").green());
    Ok(())
}

pub fn show(id: i64) -> Result<()> {
    let conn = open_ledger()?;
    let txn = store::get(&conn, id)?
        .ok_or_else(|| LedgerError::Other(format!("No transaction with ID {id}")))?;
    println!("{}", detail_table(&txn, &currency()));
    Ok(())
}

pub(crate) fn detail_table(txn: &Transaction, symbol: &str) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Field", "Value"]);
    table.add_row(vec![Cell::new("ID"), Cell::new(txn.id)]);
    table.add_row(vec![Cell::new("Date"), Cell::new(txn.date)]);
    table.add_row(vec![Cell::new("Amount"), Cell::new(money_in(txn.amount, symbol))]);
    table.add_row(vec![Cell::new("Kind"), Cell::new(txn.kind)]);
    table.add_row(vec![Cell::new("Category"), Cell::new(txn.category)]);
    table.add_row(vec![Cell::new("Description"), Cell::new(&txn.description)]);
    table.add_row(vec![Cell::new("Author"), Cell::new(&txn.author)]);
    table
}
