use chrono::{TimeZone, Utc};
use serde::de::IgnoredAny;
use serde::Deserialize;
use serde_json::Value;

use crate::config::MarketParams;
use crate::error::DashError;
use crate::table::Table;

/// Column contract of the candle table, present even when the fetch fails.
pub const OHLCV_COLUMNS: [&str; 6] = ["timestamp", "open", "high", "low", "close", "volume"];

/// One kline row as the exchange returns it: open time in ms, then
/// open/high/low/close/volume as decimal strings, then six fields we ignore.
#[derive(Debug, Deserialize)]
struct KlineRow(
    i64,
    String,
    String,
    String,
    String,
    String,
    IgnoredAny,
    IgnoredAny,
    IgnoredAny,
    IgnoredAny,
    IgnoredAny,
    IgnoredAny,
);

/// REST client for the exchange's kline endpoint.
pub struct MarketClient {
    http: reqwest::Client,
    base_url: String,
}

impl MarketClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, DashError> {
        let http = reqwest::Client::builder()
            .user_agent("botdash")
            .build()
            .map_err(|e| DashError::Internal(format!("build http client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    pub fn klines_url(&self, params: &MarketParams) -> String {
        format!(
            "{}/api/v3/klines?symbol={}&interval={}&limit={}",
            self.base_url,
            params.symbol.replace('/', "").to_uppercase(),
            params.timeframe,
            params.limit
        )
    }

    /// Fetch the most recent candle window, oldest first.
    ///
    /// Any failure is logged and degraded to the empty candle table;
    /// this call never fails out.
    pub async fn fetch_ohlcv(&self, params: &MarketParams) -> Table {
        match self.try_fetch(params).await {
            Ok(table) => table,
            Err(e) => {
                tracing::warn!("candle fetch failed for {}: {e}", params.symbol);
                empty_ohlcv()
            }
        }
    }

    async fn try_fetch(&self, params: &MarketParams) -> Result<Table, DashError> {
        let url = self.klines_url(params);
        let resp = self.http.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(DashError::Market(format!("http status {}", resp.status())));
        }
        let klines: Vec<KlineRow> = resp.json().await?;
        table_from_klines(klines)
    }
}

/// The candle table with its fixed columns and no rows.
pub fn empty_ohlcv() -> Table {
    Table::new(OHLCV_COLUMNS.iter().map(|c| c.to_string()).collect())
}

fn table_from_klines(klines: Vec<KlineRow>) -> Result<Table, DashError> {
    let mut table = empty_ohlcv();
    for k in klines {
        table.push_row(vec![
            Value::String(format_ts_ms(k.0)),
            price_cell(&k.1, "open")?,
            price_cell(&k.2, "high")?,
            price_cell(&k.3, "low")?,
            price_cell(&k.4, "close")?,
            price_cell(&k.5, "volume")?,
        ]);
    }
    Ok(table)
}

fn price_cell(raw: &str, field: &str) -> Result<Value, DashError> {
    let parsed: f64 = raw
        .trim()
        .parse()
        .map_err(|_| DashError::Market(format!("invalid {field} value: {raw:?}")))?;
    Ok(serde_json::Number::from_f64(parsed)
        .map(Value::Number)
        .unwrap_or(Value::Null))
}

fn format_ts_ms(ms: i64) -> String {
    Utc.timestamp_millis_opt(ms)
        .single()
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| ms.to_string())
}
