//! Document types stored by the trading engine
//!
//! The store is schema-less, so every record defaults missing fields here at
//! the read boundary instead of in the presentation code. A JSON `null`
//! counts as missing.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

pub const SETTINGS_ID: &str = "main_settings";
pub const PORTFOLIO_ID: &str = "main_portfolio";

/// Risk parameters and tracked coins for the trading engine.
///
/// Fields the dashboard does not edit (`id`, system properties, anything the
/// engine adds later) are carried in `extra` so a replace never drops them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(rename = "TAKE_PROFIT", default, deserialize_with = "lenient_f64_or_zero")]
    pub take_profit: f64,

    #[serde(rename = "STOP_LOSS", default, deserialize_with = "lenient_f64_or_zero")]
    pub stop_loss: f64,

    /// Order size in USD
    #[serde(rename = "ORDER_AMOUNT", default, deserialize_with = "lenient_f64_or_zero")]
    pub order_amount: f64,

    #[serde(rename = "COINS_TO_TRACK", default, deserialize_with = "null_as_default")]
    pub coins_to_track: Vec<String>,

    #[serde(rename = "PROMPT_TEMPLATE", default, deserialize_with = "null_as_default")]
    pub prompt_template: String,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Settings {
    /// Make sure the document carries its fixed id before a replace
    pub fn ensure_id(&mut self) {
        self.extra
            .entry("id")
            .or_insert_with(|| serde_json::Value::from(SETTINGS_ID));
    }
}

/// Cash balance and open holdings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Portfolio {
    #[serde(default, deserialize_with = "lenient_f64_or_zero")]
    pub balance_usd: f64,

    /// Coin symbol -> holding
    #[serde(default, deserialize_with = "null_as_default")]
    pub holdings: BTreeMap<String, Holding>,
}

/// A single open holding
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Holding {
    #[serde(default, deserialize_with = "lenient_f64_or_zero")]
    pub quantity: f64,

    #[serde(default, deserialize_with = "lenient_f64_or_zero")]
    pub entry_price: f64,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub current_price: Option<f64>,

    /// Info page for the coin
    #[serde(default)]
    pub url: Option<String>,
}

impl Holding {
    /// Current price, falling back to the entry price when the engine has not priced it yet
    pub fn mark_price(&self) -> f64 {
        self.current_price.unwrap_or(self.entry_price)
    }

    pub fn value(&self) -> f64 {
        self.quantity * self.mark_price()
    }
}

/// An executed trade
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TradeRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub timestamp: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub coin: String,
    /// "buy" or "sell", as written by the engine
    #[serde(default, deserialize_with = "null_as_default")]
    pub action: String,
    #[serde(default, deserialize_with = "lenient_f64_or_zero")]
    pub price: f64,
    #[serde(default, deserialize_with = "lenient_f64_or_zero")]
    pub quantity: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reason: String,
}

/// Periodic snapshot of total portfolio value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EquityLog {
    #[serde(default, deserialize_with = "null_as_default")]
    pub timestamp: String,
    /// Partition field
    #[serde(default, deserialize_with = "null_as_default")]
    pub year: String,
    #[serde(default, deserialize_with = "lenient_f64_or_zero")]
    pub total_value: f64,
}

/// A coin discovered by the engine's screener
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub coin: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price_usd: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub liquidity_usd: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub volume_24h: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price_change_1h: Option<f64>,
    /// "pending" until the engine buys it, then "bought"
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub added_at: String,
}

impl WatchlistEntry {
    pub fn is_bought(&self) -> bool {
        self.status.trim().eq_ignore_ascii_case("bought")
    }
}

/// Severity of an inline message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

/// A message shown inline on the rendered page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, message: message.into() }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Warning, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, message: message.into() }
    }

    /// Warnings and errors are also written to the Worker log
    pub fn is_problem(&self) -> bool {
        matches!(self.level, NoticeLevel::Warning | NoticeLevel::Error)
    }
}

/// Parse the timestamp formats the engine writes, as a UTC instant.
///
/// Accepts RFC 3339, naive ISO-8601 with `T` or space and optional fractional
/// seconds, and bare dates. Used for ordering and the chart's time axis.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    parse_with(raw, |dt| dt.naive_utc())
}

/// Same formats, keeping the wall-clock time the engine wrote
fn parse_wall_clock(raw: &str) -> Option<NaiveDateTime> {
    parse_with(raw, |dt| dt.naive_local())
}

fn parse_with(raw: &str, offset: fn(DateTime<FixedOffset>) -> NaiveDateTime) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(offset(dt));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Sort key for timestamp strings; unparseable values sort first
pub fn timestamp_key(raw: &str) -> (Option<NaiveDateTime>, &str) {
    (parse_timestamp(raw), raw)
}

/// Render a timestamp with `format` in the offset it was written with, or the
/// raw text when it cannot be parsed
pub fn format_timestamp(raw: &str, format: &str) -> String {
    parse_wall_clock(raw).map_or_else(|| raw.to_string(), |dt| dt.format(format).to_string())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LenientNumber {
    Number(f64),
    Text(String),
}

/// Accept numbers, numeric strings and null
fn lenient_f64<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<LenientNumber>::deserialize(deserializer)? {
        Some(LenientNumber::Number(n)) => Some(n),
        Some(LenientNumber::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}

/// Treat `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn lenient_f64_or_zero<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_f64(deserializer).map(|v| v.unwrap_or(0.0))
}
