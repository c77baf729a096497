use serde_json::{Map, Value};

/// Schema-on-read table: an explicit ordered column list plus rows of JSON
/// cells aligned to it.
///
/// The column list is the single source of truth for what a table exposes;
/// downstream layers read it as data instead of reflecting over row shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Append a row. Cells must align with the column list.
    pub fn push_row(&mut self, cells: Vec<Value>) {
        debug_assert_eq!(cells.len(), self.columns.len());
        self.rows.push(cells);
    }

    /// All cells of one column, or `None` if the column does not exist.
    pub fn column(&self, name: &str) -> Option<Vec<Value>> {
        let idx = self.column_index(name)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.get(idx).cloned().unwrap_or(Value::Null))
                .collect(),
        )
    }

    /// Add an all-null column if `name` is not already present.
    pub fn ensure_column(&mut self, name: &str) {
        if self.has_column(name) {
            return;
        }
        self.columns.push(name.to_string());
        for row in &mut self.rows {
            row.push(Value::Null);
        }
    }

    /// Rows as JSON records keyed by column name.
    pub fn records(&self) -> Vec<Map<String, Value>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect()
            })
            .collect()
    }

    /// Concatenate several tables row-wise, tagging each row with a leading
    /// provenance label column.
    ///
    /// Columns are unioned in first-seen order; cells a part does not have
    /// come out null. Row order within each part is preserved.
    pub fn concat_labeled(label_column: &str, parts: Vec<(&str, Table)>) -> Table {
        let mut columns = vec![label_column.to_string()];
        for (_, part) in &parts {
            for col in part.columns() {
                if !columns.iter().any(|c| c == col) {
                    columns.push(col.clone());
                }
            }
        }

        let mut out = Table::new(columns);
        for (label, part) in parts {
            for row in &part.rows {
                let cells = out
                    .columns
                    .iter()
                    .map(|col| {
                        if col == label_column {
                            Value::String(label.to_string())
                        } else {
                            part.column_index(col)
                                .and_then(|i| row.get(i))
                                .cloned()
                                .unwrap_or(Value::Null)
                        }
                    })
                    .collect();
                out.rows.push(cells);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table(columns: &[&str], rows: &[&[Value]]) -> Table {
        let mut t = Table::new(columns.iter().map(|c| c.to_string()).collect());
        for row in rows {
            t.push_row(row.to_vec());
        }
        t
    }

    #[test]
    fn ensure_column_synthesizes_nulls() {
        let mut t = table(
            &["timestamp", "profit"],
            &[&[json!("2024-01-01"), json!(10.0)]],
        );
        t.ensure_column("entry_price");
        assert!(t.has_column("entry_price"));
        assert_eq!(t.column("entry_price").unwrap(), vec![Value::Null]);

        // Already present: no duplicate column, cells untouched.
        t.ensure_column("profit");
        assert_eq!(t.columns().len(), 3);
        assert_eq!(t.column("profit").unwrap(), vec![json!(10.0)]);
    }

    #[test]
    fn concat_unions_columns_and_labels_rows() {
        let t1 = table(
            &["timestamp", "profit"],
            &[
                &[json!("2024-01-02"), json!(5.0)],
                &[json!("2024-01-01"), json!(-2.0)],
            ],
        );
        let t2 = table(
            &["timestamp", "entry_price"],
            &[&[json!("2024-01-03"), json!(310.5)]],
        );

        let merged = Table::concat_labeled("bot", vec![("Bot 1", t1), ("Bot 2", t2)]);

        assert_eq!(
            merged.columns(),
            &["bot", "timestamp", "profit", "entry_price"]
        );
        assert_eq!(merged.len(), 3);
        assert_eq!(
            merged.column("bot").unwrap(),
            vec![json!("Bot 1"), json!("Bot 1"), json!("Bot 2")]
        );
        // Cells absent from a part come out null, present cells survive.
        assert_eq!(
            merged.column("entry_price").unwrap(),
            vec![Value::Null, Value::Null, json!(310.5)]
        );
        assert_eq!(
            merged.column("profit").unwrap(),
            vec![json!(5.0), json!(-2.0), Value::Null]
        );
    }

    #[test]
    fn concat_of_empty_parts_keeps_columns() {
        let t1 = table(&["timestamp"], &[]);
        let t2 = table(&["timestamp"], &[]);
        let merged = Table::concat_labeled("bot", vec![("Bot 1", t1), ("Bot 2", t2)]);
        assert_eq!(merged.columns(), &["bot", "timestamp"]);
        assert!(merged.is_empty());
    }

    #[test]
    fn records_follow_column_order() {
        let t = table(
            &["timestamp", "message"],
            &[&[json!("2024-01-01"), json!("order rejected")]],
        );
        let records = t.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["timestamp"], json!("2024-01-01"));
        assert_eq!(records[0]["message"], json!("order rejected"));
    }

    #[test]
    fn missing_column_reads_as_none() {
        let t = table(&["timestamp"], &[&[json!("2024-01-01")]]);
        assert_eq!(t.column("profit"), None);
    }
}
