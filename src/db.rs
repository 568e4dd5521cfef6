use std::path::Path;

use rusqlite::Connection;

use crate::error::Result;

pub const DB_FILE: &str = "penny.db";

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS transactions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    date TEXT NOT NULL,
    amount_cents INTEGER NOT NULL CHECK (amount_cents >= 0),
    kind TEXT NOT NULL CHECK (kind IN ('income', 'expense')),
    category TEXT NOT NULL CHECK (category IN ('shared', 'personal')),
    description TEXT NOT NULL DEFAULT '',
    author TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);
CREATE INDEX IF NOT EXISTS idx_transactions_author ON transactions(author);
";

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    Ok(conn)
}

/// Open the database and make sure the schema exists.
pub fn open(db_path: &Path) -> Result<Connection> {
    let conn = get_connection(db_path)?;
    init_db(&conn)?;
    Ok(conn)
}

pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    tracing::debug!("schema ready");
    Ok(())
}

#[cfg(test)]
pub(crate) fn test_db() -> (tempfile::TempDir, Connection) {
    let dir = tempfile::tempdir().unwrap();
    let conn = get_connection(&dir.path().join("test.db")).unwrap();
    init_db(&conn).unwrap();
    (dir, conn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_db_creates_table() {
        let (_dir, conn) = test_db();
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();
        assert!(tables.contains(&"transactions".to_string()), "got {tables:?}");
    }

    #[test]
    fn test_transactions_columns() {
        let (_dir, conn) = test_db();
        let columns: Vec<String> = conn
            .prepare("SELECT name FROM pragma_table_info('transactions')")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(
            columns,
            vec!["id", "date", "amount_cents", "kind", "category", "description", "author"]
        );
    }

    #[test]
    fn test_init_db_is_idempotent() {
        let (_dir, conn) = test_db();
        init_db(&conn).unwrap();
    }

    #[test]
    fn test_check_constraint_rejects_unknown_kind() {
        let (_dir, conn) = test_db();
        let result = conn.execute(
            "INSERT INTO transactions (date, amount_cents, kind, category, author) \
             VALUES ('2024-01-01', 1000, 'Revenu', 'shared', 'Alice')",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_check_constraint_rejects_negative_cents() {
        let (_dir, conn) = test_db();
        let result = conn.execute(
            "INSERT INTO transactions (date, amount_cents, kind, category, author) \
             VALUES ('2024-01-01', -1, 'income', 'shared', 'Alice')",
            [],
        );
        assert!(result.is_err());
    }
}
