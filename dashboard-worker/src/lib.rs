//! Trader Dashboard - Crypto trading bot dashboard for Cloudflare Workers
//!
//! Read-mostly operator UI over the trading engine's Cosmos DB containers.
//!
//! # Architecture
//! - Main entry point routes HTTP requests and renders the page server-side
//! - Cosmos DB SQL REST client for settings, portfolio, trades, equity logs
//!   and the screener watchlist
//! - ForceBuy client that forwards manual buy commands to the engine
//!
//! # Features
//! - Portfolio value, cash and period P&L
//! - Equity curve, holdings, recent trades, watchlist
//! - Risk parameter editing and force buy

// Clippy configuration for dashboard code patterns
#![allow(clippy::cast_precision_loss)] // Float casts OK for display
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::too_many_lines)] // Long HTML templates
#![allow(clippy::doc_markdown)] // Doc style flexibility
#![allow(clippy::needless_pass_by_value)] // Worker framework patterns
#![allow(clippy::map_unwrap_or)] // Explicit fallback preference

mod analytics;
mod auth;
mod client;
mod config;
mod dashboard;
mod error;
mod force_buy;
mod forms;
mod store;
mod types;
mod view;

use std::cell::OnceCell;
use std::rc::Rc;

use chrono::{Datelike, Utc};
use worker::{
    Context, Env, FormEntry, Request, Response, Router, console_error, console_log, console_warn,
    event,
};

pub use auth::CosmosAuth;
pub use client::{CosmosClient, SqlQuery};
pub use config::Config;
pub use error::DashboardError;
pub use force_buy::ForceBuyClient;
pub use forms::SettingsForm;
pub use store::{DataStore, Snapshot};
pub use types::*;

use view::{DashboardView, force_buy_outcome};

/// Result type alias for worker operations
type WResult<T> = std::result::Result<T, worker::Error>;

/// Per-isolate state, built on the first request that finds valid config
struct App {
    config: Config,
    store: DataStore,
    force_buy: ForceBuyClient,
}

thread_local! {
    static APP: OnceCell<Rc<App>> = const { OnceCell::new() };
}

/// What the operator asked for with this request
enum Action {
    View,
    UpdateSettings(SettingsForm),
    ForceBuy(String),
    /// Form body could not be read
    Malformed(String),
}

/// Main Worker entry point
#[event(fetch)]
async fn fetch(req: Request, env: Env, _ctx: Context) -> WResult<Response> {
    console_error_panic_hook::set_once();

    let router = Router::new();

    router
        // Health check
        .get_async("/health", |_req, ctx| async move {
            let app = match app(&ctx.env) {
                Ok(app) => app,
                Err(e) => return json_error(&e, 500),
            };

            Response::from_json(&serde_json::json!({
                "status": "healthy",
                "version": env!("CARGO_PKG_VERSION"),
                "environment": app.config.environment,
                "timestamp": Utc::now().to_rfc3339(),
            }))
        })
        // Dashboard UI
        .get_async("/", |req, ctx| async move {
            render_dashboard(&req, &ctx.env, Action::View).await
        })
        .get_async("/dashboard", |req, ctx| async move {
            render_dashboard(&req, &ctx.env, Action::View).await
        })
        // Settings form submit
        .post_async("/settings", |mut req, ctx| async move {
            let action = match req.form_data().await {
                Ok(form) => Action::UpdateSettings(SettingsForm {
                    take_profit: field(&form, "take_profit"),
                    stop_loss: field(&form, "stop_loss"),
                    order_amount: field(&form, "order_amount"),
                    coins: field(&form, "coins"),
                    prompt_template: field(&form, "prompt_template"),
                }),
                Err(e) => Action::Malformed(format!("Could not read settings form: {e}")),
            };
            render_dashboard(&req, &ctx.env, action).await
        })
        // Force buy submit
        .post_async("/force-buy", |mut req, ctx| async move {
            let action = match req.form_data().await {
                Ok(form) => Action::ForceBuy(field(&form, "coin").trim().to_string()),
                Err(e) => Action::Malformed(format!("Could not read force buy form: {e}")),
            };
            render_dashboard(&req, &ctx.env, action).await
        })
        // Derived metrics (same numbers the page shows)
        .get_async("/api/summary", |req, ctx| async move {
            let app = match app(&ctx.env) {
                Ok(app) => app,
                Err(e) => return json_error(&e, 500),
            };
            let now = Utc::now();
            let year = app
                .config
                .equity_year_or(query_param(&req, "year").as_deref(), now.year());

            let mut notices = Vec::new();
            let portfolio = app.store.get_portfolio(&mut notices).await;
            let logs = app.store.get_equity_logs(&year, &mut notices).await;
            log_problems(&notices);

            let summary = portfolio.as_ref().map(analytics::summarize);
            let period_pnl = summary
                .as_ref()
                .and_then(|s| analytics::period_pnl(s.total_value, &logs));

            Response::from_json(&serde_json::json!({
                "timestamp": now.to_rfc3339(),
                "equity_year": year,
                "last_update": analytics::last_update(&logs),
                "summary": summary,
                "period_pnl": period_pnl,
                "holdings": portfolio.as_ref().map(analytics::holding_rows),
                "notices": notices,
            }))
        })
        // Current settings document
        .get_async("/api/settings", |_req, ctx| async move {
            let app = match app(&ctx.env) {
                Ok(app) => app,
                Err(e) => return json_error(&e, 500),
            };

            let mut notices = Vec::new();
            match app.store.get_settings(&mut notices).await {
                Some(settings) => Response::from_json(&settings),
                None => {
                    log_problems(&notices);
                    let message = notices
                        .first()
                        .map(|n| n.message.clone())
                        .unwrap_or_else(|| "Settings unavailable".to_string());
                    Ok(Response::from_json(&serde_json::json!({ "error": message }))?
                        .with_status(502))
                }
            }
        })
        // Fallback
        .run(req, env)
        .await
}

/// Cached app state, or the configuration error that prevents building it
fn app(env: &Env) -> error::Result<Rc<App>> {
    if let Some(app) = APP.with(|cell| cell.get().cloned()) {
        return Ok(app);
    }

    let config = Config::from_env(env).inspect_err(|e| console_error!("{}", e))?;
    let client = CosmosClient::new(&config.cosmos_url, &config.cosmos_key, &config.database_name)
        .inspect_err(|e| console_error!("{}", e))?;
    console_log!(
        "Dashboard initialised ({}): database {}, ForceBuy at {}",
        config.environment,
        client.database(),
        config.force_buy_url
    );

    let app = Rc::new(App {
        force_buy: ForceBuyClient::new(&config.force_buy_url),
        store: DataStore::new(client),
        config,
    });
    APP.with(|cell| {
        let _ = cell.set(Rc::clone(&app));
    });
    Ok(app)
}

/// One full top-to-bottom render, after applying the operator's action
async fn render_dashboard(req: &Request, env: &Env, action: Action) -> WResult<Response> {
    let app = match app(env) {
        Ok(app) => app,
        Err(e) => {
            return Response::from_html(dashboard::config_error_page(&e.to_string()))
                .map(|r| r.with_status(500));
        }
    };

    if app.config.is_debug() {
        console_log!("{:?} {}", req.method(), req.path());
    }

    let now = Utc::now();
    let year = app
        .config
        .equity_year_or(query_param(req, "year").as_deref(), now.year());
    let mut notices = Vec::new();

    match &action {
        Action::UpdateSettings(form) => save_settings(&app, form, &mut notices).await,
        Action::Malformed(message) => notices.push(Notice::error(message.clone())),
        Action::View | Action::ForceBuy(_) => {}
    }

    let snapshot = app
        .store
        .snapshot(&year, app.config.recent_trades_limit, &mut notices)
        .await;

    let mut refresh_after = None;
    if let Action::ForceBuy(coin) = &action {
        let candidates = analytics::force_buy_candidates(&snapshot.watchlist);
        let result = if coin.is_empty() {
            Err(DashboardError::Validation("Select a coin to force buy.".into()))
        } else if !candidates.contains(coin) {
            Err(DashboardError::Validation(format!(
                "{coin} is not on the watchlist awaiting purchase."
            )))
        } else {
            console_log!("Force buy requested for {}", coin);
            app.force_buy.execute(coin).await
        };
        let (notice, refresh) = force_buy_outcome(result, app.config.refresh_delay_seconds);
        notices.push(notice);
        refresh_after = refresh;
    }

    log_problems(&notices);

    let view = DashboardView::build(snapshot, year, notices, refresh_after, now);
    Response::from_html(dashboard::render_page(&view))
}

/// Persist a settings form submit, reporting the outcome inline
async fn save_settings(app: &App, form: &SettingsForm, notices: &mut Vec<Notice>) {
    if let Some(settings) = app.store.save_settings_form(form, notices).await {
        console_log!(
            "Settings updated: TP {}%, SL {}%, order ${}, {} coins",
            settings.take_profit,
            settings.stop_loss,
            settings.order_amount,
            settings.coins_to_track.len()
        );
    }
}

fn log_problems(notices: &[Notice]) {
    for notice in notices.iter().filter(|n| n.is_problem()) {
        console_warn!("{}", notice.message);
    }
}

fn field(form: &worker::FormData, name: &str) -> String {
    match form.get(name) {
        Some(FormEntry::Field(value)) => value,
        _ => String::new(),
    }
}

fn query_param(req: &Request, name: &str) -> Option<String> {
    let url = req.url().ok()?;
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

fn json_error(err: &DashboardError, status: u16) -> WResult<Response> {
    Ok(Response::from_json(&serde_json::json!({ "error": err.to_string() }))?.with_status(status))
}
