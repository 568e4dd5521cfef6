use crate::cli::open_ledger;
use crate::error::Result;
use crate::fmt::money_in;
use crate::period::Period;
use crate::{aggregate, store};
use crate::settings::{db_path, load_settings};

pub fn run() -> Result<()> {
    let settings = load_settings();
    let path = db_path();

    println!("User:       {}", if settings.user_name.is_empty() { "(not set)" } else { &settings.user_name });
    println!("Data dir:   {}", settings.data_dir);
    println!("Database:   {}", path.display());

    if !path.exists() {
        println!();
        println!("Database not found. Run `penny init` to set up.");
        return Ok(());
    }

    let conn = open_ledger()?;
    let transactions = store::count(&conn)?;
    let authors = store::authors(&conn)?;
    let income = aggregate::total_income(&conn, Period::All)?;
    let expenses = aggregate::total_expenses(&conn, Period::All)?;

    println!();
    println!("Transactions:  {transactions}");
    println!("Authors:       {}", if authors.is_empty() { "-".to_string() } else { authors.join(", ") });
    println!("Income:        {}", money_in(income, &settings.currency));
    println!("Expenses:      {}", money_in(expenses, &settings.currency));
    println!("Balance:       {}", money_in(income - expenses, &settings.currency));
    Ok(())
}
