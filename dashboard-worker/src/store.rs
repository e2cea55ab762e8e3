//! Data access façade over the trading engine's Cosmos DB containers
//!
//! Every read or write failure becomes a warning notice plus an empty
//! result, so the page still renders while the store is unavailable.
//!
//! Equity logs are queried inside their year partition. Trades and the
//! watchlist span partitions, so they are read unordered and sorted here.

use crate::client::{CosmosClient, QueryResults, SqlQuery};
use crate::error::Result;
use crate::forms::SettingsForm;
use crate::types::{
    EquityLog, Notice, PORTFOLIO_ID, Portfolio, SETTINGS_ID, Settings, TradeRecord,
    WatchlistEntry, timestamp_key,
};

pub const SETTINGS_CONTAINER: &str = "settings";
pub const PORTFOLIO_CONTAINER: &str = "portfolio";
pub const TRADES_CONTAINER: &str = "trades";
pub const EQUITY_LOGS_CONTAINER: &str = "equity_logs";
pub const WATCHLIST_CONTAINER: &str = "watchlist";

/// Everything one page render reads from the store
#[derive(Debug, Default)]
pub struct Snapshot {
    pub settings: Option<Settings>,
    pub portfolio: Option<Portfolio>,
    /// Newest first
    pub equity_logs: Vec<EquityLog>,
    /// Newest first
    pub trades: Vec<TradeRecord>,
    /// Most recently added first
    pub watchlist: Vec<WatchlistEntry>,
}

/// Read/write operations used by the dashboard
pub struct DataStore {
    client: CosmosClient,
}

impl DataStore {
    pub fn new(client: CosmosClient) -> Self {
        Self { client }
    }

    pub async fn get_settings(&self, notices: &mut Vec<Notice>) -> Option<Settings> {
        let result = self
            .client
            .read_document(SETTINGS_CONTAINER, SETTINGS_ID, SETTINGS_ID)
            .await;
        settle(notices, "fetching settings", result)
    }

    /// Replace the settings document; `false` when the write failed
    pub async fn update_settings(&self, settings: &Settings, notices: &mut Vec<Notice>) -> bool {
        let mut document = settings.clone();
        document.ensure_id();
        let result = self
            .client
            .replace_document(SETTINGS_CONTAINER, SETTINGS_ID, SETTINGS_ID, &document)
            .await;
        settle(notices, "updating settings", result).is_some()
    }

    pub async fn get_portfolio(&self, notices: &mut Vec<Notice>) -> Option<Portfolio> {
        let result = self
            .client
            .read_document(PORTFOLIO_CONTAINER, PORTFOLIO_ID, PORTFOLIO_ID)
            .await;
        settle(notices, "fetching portfolio", result)
    }

    /// Read, edit and replace the settings document from a form submit.
    ///
    /// Returns the saved settings. Nothing is written when the document
    /// cannot be read or the form does not validate.
    pub async fn save_settings_form(&self, form: &SettingsForm, notices: &mut Vec<Notice>) -> Option<Settings> {
        let Some(mut settings) = self.get_settings(notices).await else {
            notices.push(Notice::warning("Settings could not be loaded, nothing was saved."));
            return None;
        };

        if let Err(e) = form.apply(&mut settings) {
            notices.push(Notice::error(e.to_string()));
            return None;
        }

        if self.update_settings(&settings, notices).await {
            notices.push(Notice::success("Settings updated successfully!"));
            Some(settings)
        } else {
            notices.push(Notice::error("Failed to update settings."));
            None
        }
    }

    /// Equity logs for one year partition, newest first
    pub async fn get_equity_logs(&self, year: &str, notices: &mut Vec<Notice>) -> Vec<EquityLog> {
        let result = self
            .client
            .query_documents(EQUITY_LOGS_CONTAINER, &equity_logs_query(year), Some(year))
            .await;
        let mut logs: Vec<EquityLog> = settle_documents(notices, "equity logs", result);
        newest_first(&mut logs, |log| log.timestamp.as_str());
        logs
    }

    /// The `limit` most recent trades, newest first
    pub async fn get_recent_trades(&self, limit: usize, notices: &mut Vec<Notice>) -> Vec<TradeRecord> {
        let result = self
            .client
            .query_documents(TRADES_CONTAINER, &SqlQuery::new("SELECT * FROM c"), None)
            .await;
        most_recent(settle_documents(notices, "trades", result), limit)
    }

    /// Screener discoveries, most recently added first
    pub async fn get_watchlist(&self, notices: &mut Vec<Notice>) -> Vec<WatchlistEntry> {
        let result = self
            .client
            .query_documents(WATCHLIST_CONTAINER, &SqlQuery::new("SELECT * FROM c"), None)
            .await;
        let mut entries: Vec<WatchlistEntry> = settle_documents(notices, "watchlist", result);
        newest_first(&mut entries, |entry| entry.added_at.as_str());
        entries
    }

    /// Read everything a page needs
    pub async fn snapshot(&self, year: &str, trades_limit: usize, notices: &mut Vec<Notice>) -> Snapshot {
        Snapshot {
            settings: self.get_settings(notices).await,
            portfolio: self.get_portfolio(notices).await,
            equity_logs: self.get_equity_logs(year, notices).await,
            trades: self.get_recent_trades(trades_limit, notices).await,
            watchlist: self.get_watchlist(notices).await,
        }
    }
}

fn equity_logs_query(year: &str) -> SqlQuery {
    SqlQuery::new("SELECT * FROM c WHERE c.year = @year ORDER BY c.timestamp DESC").bind("@year", year)
}

/// Newest `limit` trades; the cross-partition read cannot push `TOP` down
fn most_recent(mut trades: Vec<TradeRecord>, limit: usize) -> Vec<TradeRecord> {
    newest_first(&mut trades, |trade| trade.timestamp.as_str());
    trades.truncate(limit);
    trades
}

/// Turn a failed call into a warning notice and `None`
pub fn settle<T>(notices: &mut Vec<Notice>, action: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            notices.push(Notice::warning(format!("Error {action}: {e}")));
            None
        }
    }
}

/// Query results as a list. A failed query and any skipped documents each
/// leave a warning notice.
fn settle_documents<T>(notices: &mut Vec<Notice>, what: &str, result: Result<QueryResults<T>>) -> Vec<T> {
    let Some(results) = settle(notices, &format!("fetching {what}"), result) else {
        return Vec::new();
    };
    if let Some(first) = results.skipped.first() {
        notices.push(Notice::warning(format!(
            "Skipped {} unreadable {what} record(s): {first}",
            results.skipped.len()
        )));
    }
    results.documents
}

/// Sort descending by a timestamp field. The gateway may ignore ORDER BY on
/// cross-partition queries, so ordering is enforced here.
fn newest_first<T>(items: &mut [T], timestamp: impl Fn(&T) -> &str) {
    items.sort_by(|a, b| timestamp_key(timestamp(b)).cmp(&timestamp_key(timestamp(a))));
}
