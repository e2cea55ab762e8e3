//! Page model assembled once per render
//!
//! Turns a store snapshot plus the outcome of the operator's action into
//! everything the HTML layer prints. No I/O happens here.

use chrono::{DateTime, Utc};
use crate::analytics::{self, EquityPoint, HoldingRow, PeriodPnl, PortfolioSummary};
use crate::error::Result;
use crate::forms::SettingsForm;
use crate::store::Snapshot;
use crate::types::{Notice, TradeRecord, WatchlistEntry};

/// Metrics row; only present when the portfolio was read
#[derive(Debug, Clone)]
pub struct Metrics {
    pub last_update: String,
    pub summary: PortfolioSummary,
    /// Hidden with fewer than two equity logs
    pub period_pnl: Option<PeriodPnl>,
}

/// Everything the page shows
#[derive(Debug, Clone)]
pub struct DashboardView {
    /// Pre-filled settings form; `None` when the settings could not be read
    pub settings_form: Option<SettingsForm>,
    pub metrics: Option<Metrics>,
    pub equity_year: String,
    pub equity_curve: Vec<EquityPoint>,
    /// `None` when the portfolio could not be read
    pub holdings: Option<Vec<HoldingRow>>,
    pub trades: Vec<TradeRecord>,
    pub watchlist: Vec<WatchlistEntry>,
    pub force_buy_candidates: Vec<String>,
    pub notices: Vec<Notice>,
    /// Seconds before the page reloads itself
    pub refresh_after: Option<u32>,
    pub rendered_at: String,
}

impl DashboardView {
    pub fn build(
        snapshot: Snapshot,
        equity_year: String,
        notices: Vec<Notice>,
        refresh_after: Option<u32>,
        now: DateTime<Utc>,
    ) -> Self {
        let metrics = snapshot.portfolio.as_ref().map(|portfolio| {
            let summary = analytics::summarize(portfolio);
            Metrics {
                last_update: analytics::last_update(&snapshot.equity_logs),
                period_pnl: analytics::period_pnl(summary.total_value, &snapshot.equity_logs),
                summary,
            }
        });

        Self {
            settings_form: snapshot.settings.as_ref().map(SettingsForm::from_settings),
            metrics,
            equity_year,
            equity_curve: analytics::equity_curve(&snapshot.equity_logs),
            holdings: snapshot.portfolio.as_ref().map(analytics::holding_rows),
            force_buy_candidates: analytics::force_buy_candidates(&snapshot.watchlist),
            trades: snapshot.trades,
            watchlist: snapshot.watchlist,
            notices,
            refresh_after,
            rendered_at: now.format("%H:%M:%S").to_string(),
        }
    }
}

/// Notice and reload decision for a finished force-buy call.
///
/// Only an accepted order schedules a reload.
pub fn force_buy_outcome(result: Result<String>, refresh_delay: u32) -> (Notice, Option<u32>) {
    match result {
        Ok(message) => (Notice::success(format!("Success: {message}")), Some(refresh_delay)),
        Err(e) => (Notice::error(e.to_string()), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::UNKNOWN_UPDATE;
    use crate::error::DashboardError;
    use crate::force_buy::interpret_response;
    use crate::types::{EquityLog, NoticeLevel, Portfolio};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 6, 8, 15, 30).unwrap()
    }

    #[test]
    fn test_empty_snapshot_renders_placeholders() {
        let view = DashboardView::build(Snapshot::default(), "2026".into(), vec![], None, now());
        assert!(view.settings_form.is_none());
        assert!(view.metrics.is_none());
        assert!(view.holdings.is_none());
        assert!(view.equity_curve.is_empty());
        assert!(view.force_buy_candidates.is_empty());
        assert_eq!(view.rendered_at, "08:15:30");
    }

    #[test]
    fn test_no_equity_logs_means_unknown_and_no_pnl() {
        let snapshot = Snapshot {
            portfolio: Some(Portfolio { balance_usd: 500.0, ..Portfolio::default() }),
            ..Snapshot::default()
        };
        let view = DashboardView::build(snapshot, "2026".into(), vec![], None, now());
        let metrics = view.metrics.unwrap();
        assert_eq!(metrics.last_update, UNKNOWN_UPDATE);
        assert!(metrics.period_pnl.is_none());
        assert!((metrics.summary.total_value - 500.0).abs() < f64::EPSILON);
        assert_eq!(view.holdings, Some(vec![]));
    }

    #[test]
    fn test_metrics_with_equity_history() {
        let snapshot = Snapshot {
            portfolio: Some(Portfolio { balance_usd: 1_200.0, ..Portfolio::default() }),
            equity_logs: vec![
                EquityLog { timestamp: "2026-01-05T12:00:00".into(), year: "2026".into(), total_value: 1_100.0 },
                EquityLog { timestamp: "2026-01-01T12:00:00".into(), year: "2026".into(), total_value: 1_000.0 },
            ],
            ..Snapshot::default()
        };
        let view = DashboardView::build(snapshot, "2026".into(), vec![], None, now());
        let metrics = view.metrics.unwrap();
        assert_eq!(metrics.last_update, "2026-01-05 12:00:00");
        let pnl = metrics.period_pnl.unwrap();
        assert!((pnl.pnl - 200.0).abs() < 1e-9);
        assert!((pnl.pnl_percent - 20.0).abs() < 1e-9);
        assert_eq!(view.equity_curve[0].total_value, 1_000.0);
    }

    #[test]
    fn test_force_buy_failure_does_not_refresh() {
        let (notice, refresh) = force_buy_outcome(interpret_response(500, "engine exploded"), 1);
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.message, "Error: engine exploded");
        assert!(refresh.is_none());

        let (notice, refresh) =
            force_buy_outcome(Err(DashboardError::ForceBuyUnreachable("connection refused".into())), 1);
        assert_eq!(notice.level, NoticeLevel::Error);
        assert!(refresh.is_none());
    }

    #[test]
    fn test_force_buy_success_refreshes() {
        let (notice, refresh) = force_buy_outcome(interpret_response(200, r#"{"message":"Bought BONK"}"#), 1);
        assert_eq!(notice.level, NoticeLevel::Success);
        assert_eq!(notice.message, "Success: Bought BONK");
        assert_eq!(refresh, Some(1));
    }
}
