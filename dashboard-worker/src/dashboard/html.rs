//! Dashboard HTML sections
//!
//! One function per page region:
//! - Settings sidebar with the risk parameter form
//! - Notices, last update and metrics row
//! - Holdings and recent trades tables
//! - Watchlist table with the force-buy control

use std::fmt::Write as _;

use crate::analytics::{HoldingRow, PeriodPnl, PortfolioSummary};
use crate::forms::SettingsForm;
use crate::types::{Notice, NoticeLevel, TradeRecord, WatchlistEntry, format_timestamp};
use crate::view::{DashboardView, Metrics};

use super::chart::equity_chart;
use super::format::{escape, optional, percent, pnl_class, quantity, signed_percent, usd, usd_with};

/// Settings form and refresh control
pub fn sidebar(view: &DashboardView) -> String {
    let form = view
        .settings_form
        .as_ref()
        .map_or_else(
            || empty("Settings are unavailable."),
            |form| settings_form(form, &view.equity_year),
        );

    format!(
        r#"<aside class="sidebar">
        <h2>⚙️ Trading Settings</h2>
        {form}
        <div class="sidebar-footer">
            <div>Last refresh: {rendered_at} UTC</div>
            <a class="btn btn-secondary btn-block" href="/?year={year}">🔄 Refresh Data</a>
        </div>
    </aside>"#,
        rendered_at = escape(&view.rendered_at),
        year = escape(&view.equity_year),
    )
}

fn settings_form(form: &SettingsForm, year: &str) -> String {
    format!(
        r#"<form method="post" action="/settings?year={year}" data-busy>
            <h3>Risk Parameters</h3>
            <label for="take_profit">Take Profit (%)</label>
            <input id="take_profit" name="take_profit" type="number" step="0.1" value="{take_profit}">
            <label for="stop_loss">Stop Loss (%)</label>
            <input id="stop_loss" name="stop_loss" type="number" step="0.1" value="{stop_loss}">
            <label for="order_amount">Order Amount (USD)</label>
            <input id="order_amount" name="order_amount" type="number" step="1" value="{order_amount}">

            <h3>Tracking</h3>
            <label for="coins">Coins to Track (comma separated)</label>
            <textarea id="coins" name="coins" rows="3">{coins}</textarea>

            <h3>Templates</h3>
            <label for="prompt_template">Prompt Template</label>
            <textarea id="prompt_template" name="prompt_template" rows="10">{prompt_template}</textarea>

            <button class="btn btn-primary btn-block" type="submit">Update Settings</button>
        </form>"#,
        take_profit = escape(&form.take_profit),
        stop_loss = escape(&form.stop_loss),
        order_amount = escape(&form.order_amount),
        coins = escape(&form.coins),
        prompt_template = escape(&form.prompt_template),
        year = escape(year),
    )
}

pub fn notices(notices: &[Notice]) -> String {
    notices
        .iter()
        .map(|notice| {
            let class = match notice.level {
                NoticeLevel::Success => "notice-success",
                NoticeLevel::Warning => "notice-warning",
                NoticeLevel::Error => "notice-error",
            };
            format!(r#"<div class="notice {class}">{}</div>"#, escape(&notice.message))
        })
        .collect()
}

/// Last update line and the four headline metrics
pub fn metrics(metrics: Option<&Metrics>) -> String {
    let Some(metrics) = metrics else {
        return String::new();
    };
    let PortfolioSummary {
        total_value,
        cash_balance,
        holdings_count,
        ..
    } = metrics.summary;

    format!(
        r#"<p class="last-update"><strong>Last Update:</strong> <code>{last_update}</code></p>
        <section class="metrics">
            {total}
            {cash}
            {count}
            {pnl}
        </section>"#,
        last_update = escape(&metrics.last_update),
        total = metric("Total Portfolio Value", &usd(total_value), None),
        cash = metric("Cash Balance", &usd(cash_balance), None),
        count = metric("Holdings Count", &holdings_count.to_string(), None),
        pnl = metrics.period_pnl.as_ref().map(period_pnl).unwrap_or_default(),
    )
}

fn period_pnl(pnl: &PeriodPnl) -> String {
    metric(
        "Period PnL",
        &usd(pnl.pnl),
        Some((signed_percent(pnl.pnl_percent), pnl_class(pnl.pnl_percent))),
    )
}

fn metric(label: &str, value: &str, delta: Option<(String, &str)>) -> String {
    let delta = delta
        .map(|(text, class)| format!(r#"<div class="metric-delta {class}">{text}</div>"#))
        .unwrap_or_default();
    format!(
        r#"<div class="metric"><div class="metric-label">{label}</div><div class="metric-value">{value}</div>{delta}</div>"#
    )
}

pub fn performance(view: &DashboardView) -> String {
    if view.equity_curve.is_empty() {
        return String::new();
    }
    format!(
        r#"<section>
            <div class="section-title">Performance Over Time <span class="neutral">({year})</span></div>
            <div class="card">{chart}</div>
        </section>"#,
        year = escape(&view.equity_year),
        chart = equity_chart(&view.equity_curve),
    )
}

pub fn holdings(rows: Option<&[HoldingRow]>) -> String {
    let body = match rows {
        None => empty("Portfolio unavailable."),
        Some([]) => empty("No active holdings."),
        Some(rows) => {
            let mut out = String::from(
                r"<table class='data-table'><thead><tr>
                <th>Coin</th><th>Quantity</th><th>Avg Entry</th><th>Current Price</th>
                <th>Value (USD)</th><th>P&amp;L ($)</th><th>P&amp;L (%)</th><th>Info Link</th>
                </tr></thead><tbody>",
            );
            for row in rows {
                let link = row.url.as_ref().map_or_else(String::new, |url| {
                    format!(
                        r#"<a href="{}" target="_blank" rel="noopener noreferrer">View Coin</a>"#,
                        escape(url)
                    )
                });
                let class = pnl_class(row.pnl_usd);
                let _ = write!(
                    out,
                    r#"<tr><td><strong>{coin}</strong></td><td class="num">{qty}</td><td class="num">{entry}</td><td class="num">{current}</td><td class="num">{value}</td><td class="num {class}">{pnl_usd}</td><td class="num {class}">{pnl_pct}</td><td>{link}</td></tr>"#,
                    coin = escape(&row.coin),
                    qty = quantity(row.quantity),
                    entry = usd_with(row.entry_price, 4),
                    current = usd_with(row.current_price, 4),
                    value = usd(row.value),
                    pnl_usd = usd(row.pnl_usd),
                    pnl_pct = percent(row.pnl_percent),
                );
            }
            out.push_str("</tbody></table>");
            out
        }
    };
    card("Current Holdings", &body)
}

pub fn trades(trades: &[TradeRecord]) -> String {
    let body = if trades.is_empty() {
        empty("No recent trades found.")
    } else {
        let mut out = String::from(
            r"<table class='data-table'><thead><tr>
            <th>Timestamp</th><th>Coin</th><th>Action</th><th>Price</th><th>Quantity</th><th>Reason</th>
            </tr></thead><tbody>",
        );
        for trade in trades {
            let action_class = match trade.action.to_ascii_lowercase().as_str() {
                "buy" => "positive",
                "sell" => "negative",
                _ => "neutral",
            };
            let _ = write!(
                out,
                r#"<tr><td>{timestamp}</td><td><strong>{coin}</strong></td><td class="{action_class}">{action}</td><td class="num">{price}</td><td class="num">{qty}</td><td class="wrap">{reason}</td></tr>"#,
                timestamp = escape(&format_timestamp(&trade.timestamp, "%Y-%m-%d %H:%M")),
                coin = escape(&trade.coin),
                action = escape(&trade.action.to_uppercase()),
                price = usd_with(trade.price, 4),
                qty = quantity(trade.quantity),
                reason = escape(&trade.reason),
            );
        }
        out.push_str("</tbody></table>");
        out
    };
    card("Recent Trades", &body)
}

/// Watchlist table plus the force-buy selector for coins not yet bought
pub fn watchlist(entries: &[WatchlistEntry], candidates: &[String], year: &str) -> String {
    if entries.is_empty() {
        return format!(
            r#"<section><div class="section-title">Watchlist (DexScreener Discoveries)</div>{}</section>"#,
            empty("Watchlist is currently empty.")
        );
    }

    let mut table = String::from(
        r"<table class='data-table'><thead><tr>
        <th>Coin</th><th>Price (USD)</th><th>Liquidity (USD)</th><th>Volume 24h</th>
        <th>Change 1h</th><th>Status</th><th>Added</th>
        </tr></thead><tbody>",
    );
    for entry in entries {
        let status_class = if entry.is_bought() {
            "status status-bought"
        } else if entry.status.eq_ignore_ascii_case("pending") {
            "status status-pending"
        } else {
            "status"
        };
        let change_class = entry.price_change_1h.map_or("neutral", pnl_class);
        let _ = write!(
            table,
            r#"<tr><td><strong>{coin}</strong></td><td class="num">{price}</td><td class="num">{liquidity}</td><td class="num">{volume}</td><td class="num {change_class}">{change}</td><td><span class="{status_class}">{status}</span></td><td>{added}</td></tr>"#,
            coin = escape(&entry.coin),
            price = optional(entry.price_usd, |v| usd_with(v, 8)),
            liquidity = optional(entry.liquidity_usd, usd),
            volume = optional(entry.volume_24h, usd),
            change = optional(entry.price_change_1h, signed_percent),
            status = escape(&entry.status),
            added = escape(&format_timestamp(&entry.added_at, "%Y-%m-%d %H:%M")),
        );
    }
    table.push_str("</tbody></table>");

    format!(
        r#"<section>
            <div class="section-title">Watchlist (DexScreener Discoveries)</div>
            <div class="card">{table}{control}</div>
        </section>"#,
        control = force_buy_control(candidates, year),
    )
}

fn force_buy_control(candidates: &[String], year: &str) -> String {
    if candidates.is_empty() {
        return String::new();
    }
    let options: String = candidates
        .iter()
        .map(|coin| {
            let coin = escape(coin);
            format!(r#"<option value="{coin}">{coin}</option>"#)
        })
        .collect();

    format!(
        r#"<form class="force-buy" method="post" action="/force-buy?year={year}" data-busy>
            <div class="field">
                <label for="forceBuyCoin">Select coin to Force Buy</label>
                <select id="forceBuyCoin" name="coin">
                    <option value=""></option>
                    {options}
                </select>
            </div>
            <button class="btn btn-primary" type="submit" id="forceBuyBtn">Force Buy</button>
            <span class="spinner">⏳ Executing force buy...</span>
        </form>"#,
        year = escape(year),
    )
}

fn card(title: &str, body: &str) -> String {
    format!(
        r#"<div><div class="section-title">{title}</div><div class="card">{body}</div></div>"#
    )
}

fn empty(message: &str) -> String {
    format!(r#"<div class="empty">{}</div>"#, escape(message))
}
