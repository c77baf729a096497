use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::assemble::marker_columns;
use crate::table::Table;

/// Column definition for a rendered table, `{name, id}` pairs in the
/// table's column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDef {
    pub name: String,
    pub id: String,
}

/// A paginated table as the page renders it.
#[derive(Debug, Serialize)]
pub struct TableView {
    pub columns: Vec<ColumnDef>,
    pub rows: Vec<Map<String, Value>>,
    pub page_size: usize,
}

pub fn table_view(table: &Table, page_size: usize) -> TableView {
    TableView {
        columns: table
            .columns()
            .iter()
            .map(|c| ColumnDef {
                name: c.clone(),
                id: c.clone(),
            })
            .collect(),
        rows: table.records(),
        page_size,
    }
}

/// Build the chart figure: one candlestick trace plus entry/exit marker
/// traces over the trade table. Missing series come out as empty arrays,
/// never as a construction failure.
pub fn dashboard_figure(candles: &Table, trades: &Table) -> Value {
    let (entry_ts, exit_ts) = marker_columns(trades);
    json!({
        "data": [
            {
                "type": "candlestick",
                "x": candles.column("timestamp").unwrap_or_default(),
                "open": candles.column("open").unwrap_or_default(),
                "high": candles.column("high").unwrap_or_default(),
                "low": candles.column("low").unwrap_or_default(),
                "close": candles.column("close").unwrap_or_default(),
                "name": "OHLC Data",
            },
            {
                "type": "scatter",
                "x": trades.column(entry_ts).unwrap_or_default(),
                "y": trades.column("entry_price").unwrap_or_default(),
                "mode": "markers",
                "marker": {"color": "green", "size": 10, "symbol": "triangle-up"},
                "name": "Entry Price",
            },
            {
                "type": "scatter",
                "x": trades.column(exit_ts).unwrap_or_default(),
                "y": trades.column("exit_price").unwrap_or_default(),
                "mode": "markers",
                "marker": {"color": "red", "size": 10, "symbol": "triangle-down"},
                "name": "Exit Price",
            },
        ],
        "layout": {
            "title": "OHLC Data with Trade Entry/Exit Points",
            "xaxis": {"title": "Timestamp"},
            "yaxis": {"title": "Price"},
        },
    })
}
