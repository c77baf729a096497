use std::env;
use std::path::PathBuf;

use crate::assemble::BotSelect;

/// Dashboard configuration derived from environment variables.
#[derive(Debug, Clone)]
pub struct DashConfig {
    pub bind: String,
    pub port: u16,

    // ── Bot log databases ──────────────────────────────────────────
    pub bot1_db: PathBuf,
    pub bot2_db: PathBuf,

    // ── Market data ────────────────────────────────────────────────
    pub market_base_url: String,
    pub bot1_market: MarketParams,
    pub bot2_market: MarketParams,

    // ── View ───────────────────────────────────────────────────────
    pub page_size: usize,
    pub default_window_days: i64,
}

/// Candle window parameters, configured per bot.
#[derive(Debug, Clone)]
pub struct MarketParams {
    /// Trading pair in `BASE/QUOTE` form, e.g. `BNB/USDC`.
    pub symbol: String,
    pub timeframe: String,
    pub limit: u32,
}

fn env_str(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_u16(name: &str, default: u16) -> u16 {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn env_u32(name: &str, default: u32) -> u32 {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn env_i64(name: &str, default: i64) -> i64 {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn env_path(name: &str, default: &str) -> PathBuf {
    PathBuf::from(env_str(name, default))
}

fn market_params(prefix: &str) -> MarketParams {
    MarketParams {
        symbol: env_str(&format!("{prefix}_SYMBOL"), "BNB/USDC"),
        timeframe: env_str(&format!("{prefix}_TIMEFRAME"), "1h"),
        limit: env_u32(&format!("{prefix}_CANDLE_LIMIT"), 100),
    }
}

impl DashConfig {
    pub fn from_env() -> Self {
        Self {
            bind: env_str("BOTDASH_BIND", "127.0.0.1"),
            port: env_u16("BOTDASH_PORT", 8050),
            bot1_db: env_path("BOTDASH_BOT1_DB", "dynamic_trading_V1.db"),
            bot2_db: env_path("BOTDASH_BOT2_DB", "dynamic_trading_V2.db"),
            market_base_url: env_str("BOTDASH_MARKET_BASE_URL", "https://api.binance.com"),
            bot1_market: market_params("BOTDASH_BOT1"),
            bot2_market: market_params("BOTDASH_BOT2"),
            page_size: env_usize("BOTDASH_PAGE_SIZE", 10),
            default_window_days: env_i64("BOTDASH_WINDOW_DAYS", 30),
        }
    }

    /// Candle window parameters for the given selection. The combined view
    /// fetches one window using bot1's parameters.
    pub fn market_for(&self, selection: BotSelect) -> &MarketParams {
        match selection {
            BotSelect::Bot2 => &self.bot2_market,
            BotSelect::Bot1 | BotSelect::Both => &self.bot1_market,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_symbols(s1: &str, s2: &str) -> DashConfig {
        DashConfig {
            bind: "127.0.0.1".to_string(),
            port: 8050,
            bot1_db: PathBuf::from("bot1.db"),
            bot2_db: PathBuf::from("bot2.db"),
            market_base_url: "https://api.binance.com".to_string(),
            bot1_market: MarketParams {
                symbol: s1.to_string(),
                timeframe: "1h".to_string(),
                limit: 100,
            },
            bot2_market: MarketParams {
                symbol: s2.to_string(),
                timeframe: "15m".to_string(),
                limit: 50,
            },
            page_size: 10,
            default_window_days: 30,
        }
    }

    #[test]
    fn market_params_are_per_bot() {
        let cfg = config_with_symbols("BNB/USDC", "ETH/USDC");
        assert_eq!(cfg.market_for(BotSelect::Bot1).symbol, "BNB/USDC");
        assert_eq!(cfg.market_for(BotSelect::Bot2).symbol, "ETH/USDC");
        assert_eq!(cfg.market_for(BotSelect::Both).symbol, "BNB/USDC");
    }
}
