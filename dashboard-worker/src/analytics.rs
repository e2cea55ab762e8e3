//! Portfolio metrics derived on every render
//!
//! Pure functions over the store snapshot: portfolio totals, per-holding
//! P&L, period performance against the oldest equity log, the equity curve
//! and the force-buy candidate list.

use serde::Serialize;

use crate::types::{
    EquityLog, Holding, Portfolio, WatchlistEntry, format_timestamp, timestamp_key,
};

/// Shown when there is no equity log to date the last engine run
pub const UNKNOWN_UPDATE: &str = "Unknown";

/// Headline numbers for the metrics row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSummary {
    pub total_value: f64,
    pub cash_balance: f64,
    pub holdings_value: f64,
    pub holdings_count: usize,
}

/// One row of the holdings table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoldingRow {
    pub coin: String,
    pub quantity: f64,
    pub entry_price: f64,
    pub current_price: f64,
    pub value: f64,
    pub pnl_usd: f64,
    pub pnl_percent: f64,
    pub url: Option<String>,
}

impl HoldingRow {
    pub fn from_holding(coin: &str, holding: &Holding) -> Self {
        let entry_price = holding.entry_price;
        let current_price = holding.mark_price();

        // An unset entry price would make any P&L meaningless
        let (pnl_usd, pnl_percent) = if entry_price > 0.0 {
            (
                (current_price - entry_price) * holding.quantity,
                (current_price / entry_price - 1.0) * 100.0,
            )
        } else {
            (0.0, 0.0)
        };

        Self {
            coin: coin.to_string(),
            quantity: holding.quantity,
            entry_price,
            current_price,
            value: holding.value(),
            pnl_usd,
            pnl_percent,
            url: holding.url.clone().filter(|u| !u.trim().is_empty()),
        }
    }
}

/// Performance since the oldest fetched equity log
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodPnl {
    pub start_value: f64,
    pub pnl: f64,
    pub pnl_percent: f64,
}

/// A point on the equity curve
#[derive(Debug, Clone, PartialEq)]
pub struct EquityPoint {
    pub timestamp: String,
    pub total_value: f64,
}

/// Cash plus every holding at its mark price
pub fn summarize(portfolio: &Portfolio) -> PortfolioSummary {
    let holdings_value: f64 = portfolio.holdings.values().map(Holding::value).sum();
    PortfolioSummary {
        total_value: portfolio.balance_usd + holdings_value,
        cash_balance: portfolio.balance_usd,
        holdings_value,
        holdings_count: portfolio.holdings.len(),
    }
}

/// Holdings table rows, largest position first
pub fn holding_rows(portfolio: &Portfolio) -> Vec<HoldingRow> {
    let mut rows: Vec<HoldingRow> = portfolio
        .holdings
        .iter()
        .map(|(coin, holding)| HoldingRow::from_holding(coin, holding))
        .collect();
    rows.sort_by(|a, b| b.value.total_cmp(&a.value));
    rows
}

/// Period P&L against the oldest log. Needs at least two logs.
pub fn period_pnl(current_total: f64, logs: &[EquityLog]) -> Option<PeriodPnl> {
    if logs.len() < 2 {
        return None;
    }
    let oldest = logs
        .iter()
        .min_by(|a, b| timestamp_key(&a.timestamp).cmp(&timestamp_key(&b.timestamp)))?;

    let start_value = oldest.total_value;
    let pnl = current_total - start_value;
    let pnl_percent = if start_value == 0.0 {
        0.0
    } else {
        pnl / start_value * 100.0
    };

    Some(PeriodPnl {
        start_value,
        pnl,
        pnl_percent,
    })
}

/// Timestamp of the newest equity log, or "Unknown"
pub fn last_update(logs: &[EquityLog]) -> String {
    logs.iter()
        .filter(|log| !log.timestamp.trim().is_empty())
        .max_by(|a, b| timestamp_key(&a.timestamp).cmp(&timestamp_key(&b.timestamp)))
        .map_or_else(
            || UNKNOWN_UPDATE.to_string(),
            |log| format_timestamp(&log.timestamp, "%Y-%m-%d %H:%M:%S"),
        )
}

/// Equity curve, oldest point first
pub fn equity_curve(logs: &[EquityLog]) -> Vec<EquityPoint> {
    let mut sorted: Vec<&EquityLog> = logs.iter().collect();
    sorted.sort_by(|a, b| timestamp_key(&a.timestamp).cmp(&timestamp_key(&b.timestamp)));
    sorted
        .into_iter()
        .map(|log| EquityPoint {
            timestamp: log.timestamp.clone(),
            total_value: log.total_value,
        })
        .collect()
}

/// Coins the operator may force-buy: not yet bought, unique, in display order
pub fn force_buy_candidates(watchlist: &[WatchlistEntry]) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::new();
    for entry in watchlist.iter().filter(|e| !e.is_bought()) {
        let coin = entry.coin.trim();
        if !coin.is_empty() && !candidates.iter().any(|c| c == coin) {
            candidates.push(coin.to_string());
        }
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn holding(quantity: f64, entry_price: f64, current_price: Option<f64>) -> Holding {
        Holding {
            quantity,
            entry_price,
            current_price,
            url: None,
        }
    }

    fn log(timestamp: &str, total_value: f64) -> EquityLog {
        EquityLog {
            timestamp: timestamp.to_string(),
            year: "2026".to_string(),
            total_value,
        }
    }

    fn watch(coin: &str, status: &str) -> WatchlistEntry {
        WatchlistEntry {
            coin: coin.to_string(),
            status: status.to_string(),
            ..WatchlistEntry::default()
        }
    }

    fn portfolio() -> Portfolio {
        let mut holdings = BTreeMap::new();
        holdings.insert("btc".to_string(), holding(0.01, 50_000.0, Some(60_000.0)));
        holdings.insert("eth".to_string(), holding(2.0, 3_000.0, None));
        holdings.insert("airdrop".to_string(), holding(500.0, 0.0, Some(0.5)));
        Portfolio {
            balance_usd: 1_000.0,
            holdings,
        }
    }

    #[test]
    fn test_zero_entry_price_has_zero_pnl() {
        let row = HoldingRow::from_holding("airdrop", &holding(500.0, 0.0, Some(0.5)));
        assert_eq!(row.pnl_usd, 0.0);
        assert_eq!(row.pnl_percent, 0.0);
        assert!((row.value - 250.0).abs() < 1e-9);

        let unpriced = HoldingRow::from_holding("dust", &holding(10.0, 0.0, None));
        assert_eq!(unpriced.pnl_usd, 0.0);
        assert_eq!(unpriced.pnl_percent, 0.0);
        assert_eq!(unpriced.value, 0.0);
    }

    #[test]
    fn test_holding_row_pnl() {
        let row = HoldingRow::from_holding("btc", &holding(0.01, 50_000.0, Some(60_000.0)));
        assert!((row.value - 600.0).abs() < 1e-9);
        assert!((row.pnl_usd - 100.0).abs() < 1e-9);
        assert!((row.pnl_percent - 20.0).abs() < 1e-9);

        let row = HoldingRow::from_holding("eth", &holding(2.0, 3_000.0, None));
        assert!((row.current_price - 3_000.0).abs() < f64::EPSILON);
        assert_eq!(row.pnl_usd, 0.0);
    }

    #[test]
    fn test_summary_totals() {
        let summary = summarize(&portfolio());
        // 600 + 6000 + 250
        assert!((summary.holdings_value - 6_850.0).abs() < 1e-9);
        assert!((summary.total_value - 7_850.0).abs() < 1e-9);
        assert_eq!(summary.holdings_count, 3);
        assert!((summary.cash_balance - 1_000.0).abs() < f64::EPSILON);

        let empty = summarize(&Portfolio::default());
        assert_eq!(empty.total_value, 0.0);
        assert_eq!(empty.holdings_count, 0);
    }

    #[test]
    fn test_rows_sorted_by_value_desc() {
        let coins: Vec<String> = holding_rows(&portfolio()).into_iter().map(|r| r.coin).collect();
        assert_eq!(coins, vec!["eth", "btc", "airdrop"]);
    }

    #[test]
    fn test_period_pnl() {
        let logs = vec![log("2026-01-03T00:00:00", 1_100.0), log("2026-01-01T00:00:00", 1_000.0)];
        let pnl = period_pnl(1_250.0, &logs).unwrap();
        assert!((pnl.start_value - 1_000.0).abs() < f64::EPSILON);
        assert!((pnl.pnl - 250.0).abs() < 1e-9);
        assert!((pnl.pnl_percent - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_period_pnl_zero_start() {
        let logs = vec![log("2026-01-02T00:00:00", 500.0), log("2026-01-01T00:00:00", 0.0)];
        let pnl = period_pnl(800.0, &logs).unwrap();
        assert!((pnl.pnl - 800.0).abs() < 1e-9);
        assert_eq!(pnl.pnl_percent, 0.0);
    }

    #[test]
    fn test_period_pnl_hidden_below_two_logs() {
        assert!(period_pnl(100.0, &[]).is_none());
        assert!(period_pnl(100.0, &[log("2026-01-01T00:00:00", 90.0)]).is_none());
    }

    #[test]
    fn test_last_update() {
        assert_eq!(last_update(&[]), "Unknown");
        assert_eq!(last_update(&[log("", 1.0)]), "Unknown");

        let logs = vec![log("2026-01-02T09:05:07.123456", 2.0), log("2026-01-01T00:00:00", 1.0)];
        assert_eq!(last_update(&logs), "2026-01-02 09:05:07");

        // Wall-clock time as the engine wrote it
        let logs = vec![log("2026-01-02T09:05:07+02:00", 2.0), log("2026-01-01T00:00:00+02:00", 1.0)];
        assert_eq!(last_update(&logs), "2026-01-02 09:05:07");
    }

    #[test]
    fn test_equity_curve_ascending() {
        let logs = vec![
            log("2026-01-03T00:00:00", 3.0),
            log("2026-01-01T00:00:00", 1.0),
            log("2026-01-02T00:00:00", 2.0),
        ];
        let values: Vec<f64> = equity_curve(&logs).iter().map(|p| p.total_value).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_force_buy_candidates_skip_bought() {
        let watchlist = vec![watch("WIF", "bought"), watch("BONK", "pending")];
        assert_eq!(force_buy_candidates(&watchlist), vec!["BONK"]);
    }

    #[test]
    fn test_force_buy_candidates_unique_in_order() {
        let watchlist = vec![
            watch("POPCAT", "pending"),
            watch("BONK", "pending"),
            watch("POPCAT", "rejected"),
            watch("", "pending"),
            watch("MEW", "BOUGHT"),
        ];
        assert_eq!(force_buy_candidates(&watchlist), vec!["POPCAT", "BONK"]);
        assert!(force_buy_candidates(&[]).is_empty());
    }
}
