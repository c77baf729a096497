use std::path::Path;

use rusqlite::types::{ToSql, ValueRef};
use rusqlite::{Connection, OpenFlags};
use serde_json::Value;

use crate::error::DashError;
use crate::table::Table;

/// Optional inclusive date bounds (ISO-8601 dates) applied against the
/// `timestamp` column of a query.
#[derive(Debug, Clone, Default)]
pub struct DateRange {
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Open a bot database read-only. A missing or unreadable file is an error
/// for the caller to surface.
pub fn open_ro(path: &Path) -> Result<Connection, DashError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_ONLY
        | OpenFlags::SQLITE_OPEN_NO_MUTEX
        | OpenFlags::SQLITE_OPEN_URI;
    Connection::open_with_flags(path, flags)
        .map_err(|e| DashError::Db(format!("open {}: {e}", path.display())))
}

/// All trade rows, newest first.
pub fn trades(conn: &Connection, range: &DateRange) -> Result<Table, DashError> {
    select_desc(conn, "trades", range)
}

/// All balance checkpoints, newest first.
pub fn balance_checks(conn: &Connection, range: &DateRange) -> Result<Table, DashError> {
    select_desc(conn, "balance_checks", range)
}

/// All error log rows, newest first.
pub fn errors(conn: &Connection, range: &DateRange) -> Result<Table, DashError> {
    select_desc(conn, "errors", range)
}

fn select_desc(conn: &Connection, table: &str, range: &DateRange) -> Result<Table, DashError> {
    let mut sql = format!("SELECT * FROM {table}");
    let mut clauses: Vec<&str> = Vec::new();
    let mut params: Vec<&dyn ToSql> = Vec::new();
    if let Some(start) = &range.start {
        clauses.push("date(timestamp) >= date(?)");
        params.push(start);
    }
    if let Some(end) = &range.end {
        clauses.push("date(timestamp) <= date(?)");
        params.push(end);
    }
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY timestamp DESC");
    fetch_table(conn, &sql, params.as_slice())
}

/// Run a query and materialize the full result as a schema-on-read table.
/// The column list comes from the prepared statement, not from row shapes.
pub fn fetch_table(
    conn: &Connection,
    sql: &str,
    params: &[&dyn ToSql],
) -> Result<Table, DashError> {
    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
    let ncols = columns.len();

    let mut table = Table::new(columns);
    let mut rows = stmt.query(params)?;
    while let Some(row) = rows.next()? {
        let mut cells = Vec::with_capacity(ncols);
        for i in 0..ncols {
            cells.push(cell_to_json(row.get_ref(i)?));
        }
        table.push_row(cells);
    }
    Ok(table)
}

fn cell_to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::String(String::from_utf8_lossy(b).into_owned()),
    }
}
