use std::io::Write;

use crate::cli::open_ledger;
use crate::error::Result;
use crate::models::{Kind, Transaction};
use crate::period::Period;
use crate::reports;

const HEADER: [&str; 7] = ["id", "date", "amount", "kind", "category", "description", "author"];

pub fn run(
    month: Option<String>,
    kind: Option<Kind>,
    author: Option<String>,
    output: Option<String>,
) -> Result<()> {
    let period = Period::parse(month.as_deref())?;
    let conn = open_ledger()?;
    let listing = reports::get_listing(&conn, period, kind, author.as_deref())?;

    match output {
        Some(path) => {
            let file = std::fs::File::create(&path)?;
            write_csv(file, &listing.rows)?;
            eprintln!("Exported {} transaction(s) to {path}", listing.count);
        }
        None => write_csv(std::io::stdout().lock(), &listing.rows)?,
    }
    Ok(())
}

pub(crate) fn write_csv<W: Write>(out: W, rows: &[Transaction]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(HEADER)?;
    for t in rows {
        writer.write_record([
            t.id.to_string(),
            t.date.to_string(),
            format!("{:.2}", t.amount),
            t.kind.as_str().to_string(),
            t.category.as_str().to_string(),
            t.description.clone(),
            t.author.clone(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
