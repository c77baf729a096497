use std::path::Path;

use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::config::DashConfig;
use crate::db::{self, DateRange};
use crate::error::DashError;
use crate::market::MarketClient;
use crate::table::Table;

/// Which bot's data to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BotSelect {
    Bot1,
    Bot2,
    Both,
}

impl BotSelect {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bot1 => "bot1",
            Self::Bot2 => "bot2",
            Self::Both => "both",
        }
    }
}

impl Default for BotSelect {
    fn default() -> Self {
        Self::Both
    }
}

/// The four tables behind one dashboard view.
#[derive(Debug)]
pub struct DashboardData {
    pub trades: Table,
    pub balances: Table,
    pub errors: Table,
    pub candles: Table,
}

/// Pull, merge, and normalize everything one view needs.
///
/// Trade/balance/error tables come from the selected bot database(s); the
/// combined selection concatenates bot1 then bot2 with a `bot` provenance
/// label. The trade table always leaves here with `entry_price` and
/// `exit_price` columns so chart construction cannot fail on a missing
/// column. The candle fetch degrades to an empty table on failure.
pub async fn assemble(
    config: &DashConfig,
    market: &MarketClient,
    selection: BotSelect,
    range: &DateRange,
) -> Result<DashboardData, DashError> {
    let (mut trades, balances, errors) = match selection {
        BotSelect::Bot1 => bot_tables(&config.bot1_db, range)?,
        BotSelect::Bot2 => bot_tables(&config.bot2_db, range)?,
        BotSelect::Both => {
            let (t1, b1, e1) = bot_tables(&config.bot1_db, range)?;
            let (t2, b2, e2) = bot_tables(&config.bot2_db, range)?;
            (
                Table::concat_labeled("bot", vec![("Bot 1", t1), ("Bot 2", t2)]),
                Table::concat_labeled("bot", vec![("Bot 1", b1), ("Bot 2", b2)]),
                Table::concat_labeled("bot", vec![("Bot 1", e1), ("Bot 2", e2)]),
            )
        }
    };

    trades.ensure_column("entry_price");
    trades.ensure_column("exit_price");

    let candles = market.fetch_ohlcv(config.market_for(selection)).await;

    Ok(DashboardData {
        trades,
        balances,
        errors,
        candles,
    })
}

fn bot_tables(path: &Path, range: &DateRange) -> Result<(Table, Table, Table), DashError> {
    let conn = db::open_ro(path)?;
    Ok((
        db::trades(&conn, range)?,
        db::balance_checks(&conn, range)?,
        db::errors(&conn, range)?,
    ))
}

/// Which columns provide the chart x-values for entry and exit markers:
/// the dedicated entry/exit timestamps when the table has both, otherwise
/// the plain `timestamp` column for both series.
pub fn marker_columns(trades: &Table) -> (&'static str, &'static str) {
    if trades.has_column("entry_timestamp") && trades.has_column("exit_timestamp") {
        ("entry_timestamp", "exit_timestamp")
    } else {
        ("timestamp", "timestamp")
    }
}

/// Running sum of the `profit` column in current row order. Empty when the
/// table has no `profit` column.
pub fn cumulative_pnl(trades: &Table) -> Vec<f64> {
    let Some(profits) = trades.column("profit") else {
        return Vec::new();
    };
    let mut total = 0.0;
    profits
        .iter()
        .map(|cell| {
            total += cell_f64(cell);
            total
        })
        .collect()
}

fn cell_f64(value: &Value) -> f64 {
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
        .unwrap_or(0.0)
}

/// Default date window for the page's pickers: the last `days` days,
/// inclusive of today.
pub fn default_window(days: i64) -> (String, String) {
    let today = Utc::now().date_naive();
    let start = today - Duration::days(days);
    (start.to_string(), today.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn trades_table(columns: &[&str]) -> Table {
        Table::new(columns.iter().map(|c| c.to_string()).collect())
    }

    #[test]
    fn marker_columns_prefer_entry_exit_timestamps() {
        let t = trades_table(&["timestamp", "entry_timestamp", "exit_timestamp"]);
        assert_eq!(marker_columns(&t), ("entry_timestamp", "exit_timestamp"));
    }

    #[test]
    fn marker_columns_fall_back_to_timestamp() {
        // One of the pair missing means both series use `timestamp`.
        let t = trades_table(&["timestamp", "entry_timestamp"]);
        assert_eq!(marker_columns(&t), ("timestamp", "timestamp"));

        let t = trades_table(&["timestamp"]);
        assert_eq!(marker_columns(&t), ("timestamp", "timestamp"));
    }

    #[test]
    fn cumulative_pnl_is_a_running_sum() {
        let mut t = trades_table(&["profit"]);
        for p in [10.0, -5.0, 20.0] {
            t.push_row(vec![json!(p)]);
        }
        assert_eq!(cumulative_pnl(&t), vec![10.0, 5.0, 25.0]);
    }

    #[test]
    fn cumulative_pnl_without_profit_column_is_empty() {
        let t = trades_table(&["timestamp"]);
        assert!(cumulative_pnl(&t).is_empty());
    }

    #[test]
    fn default_window_spans_the_requested_days() {
        let (start, end) = default_window(30);
        let start: chrono::NaiveDate = start.parse().unwrap();
        let end: chrono::NaiveDate = end.parse().unwrap();
        assert_eq!(end - start, Duration::days(30));
    }
}
