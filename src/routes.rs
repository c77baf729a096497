use axum::extract::{Query, State};
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::assemble::{self, BotSelect};
use crate::db::DateRange;
use crate::error::DashError;
use crate::state::AppState;
use crate::view;

const INDEX_HTML: &str = include_str!("../frontend/index.html");

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/api/health", get(api_health))
        .route("/api/dashboard", get(api_dashboard))
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn api_health() -> Json<Value> {
    Json(json!({
        "ok": true,
        "now": chrono::Utc::now().to_rfc3339(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    #[serde(default)]
    bot: BotSelect,
    #[serde(default)]
    start: Option<String>,
    #[serde(default)]
    end: Option<String>,
}

async fn api_dashboard(
    State(state): State<Arc<AppState>>,
    Query(q): Query<DashboardQuery>,
) -> Result<Json<Value>, DashError> {
    let range = DateRange {
        start: parse_date_param(q.start, "start")?,
        end: parse_date_param(q.end, "end")?,
    };

    let data = assemble::assemble(&state.config, &state.market, q.bot, &range).await?;

    let page_size = state.config.page_size;
    let (default_start, default_end) = assemble::default_window(state.config.default_window_days);

    Ok(Json(json!({
        "ok": true,
        "bot": q.bot.as_str(),
        "figure": view::dashboard_figure(&data.candles, &data.trades),
        "trade_table": view::table_view(&data.trades, page_size),
        "error_table": view::table_view(&data.errors, page_size),
        "balance_table": view::table_view(&data.balances, page_size),
        "window": {
            "default_start": default_start,
            "default_end": default_end,
        },
    })))
}

fn parse_date_param(raw: Option<String>, name: &str) -> Result<Option<String>, DashError> {
    let Some(raw) = raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    chrono::NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .map_err(|_| DashError::BadRequest(format!("invalid {name} date: {raw:?}")))?;
    Ok(Some(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_params_are_validated() {
        assert_eq!(parse_date_param(None, "start").unwrap(), None);
        assert_eq!(parse_date_param(Some("  ".to_string()), "start").unwrap(), None);
        assert_eq!(
            parse_date_param(Some("2024-03-01".to_string()), "start").unwrap(),
            Some("2024-03-01".to_string())
        );
        assert!(parse_date_param(Some("03/01/2024".to_string()), "start").is_err());
    }

    #[test]
    fn bot_param_defaults_to_both() {
        let q: DashboardQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.bot, BotSelect::Both);

        let q: DashboardQuery = serde_json::from_str(r#"{"bot": "bot1"}"#).unwrap();
        assert_eq!(q.bot, BotSelect::Bot1);
    }
}
