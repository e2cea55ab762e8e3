//! Configuration management for the dashboard
//!
//! Every key is resolved from the Worker secrets store first and from plain
//! environment variables second, so a deployed secret always wins over a
//! `[vars]` entry or a local `.dev.vars` value.

use crate::error::{DashboardError, Result};
use worker::Env;

pub const DEFAULT_DATABASE_NAME: &str = "tradingdb";
pub const DEFAULT_FORCE_BUY_URL: &str = "http://localhost:7071/api/ForceBuy";
pub const DEFAULT_TRADES_LIMIT: usize = 50;
pub const DEFAULT_REFRESH_DELAY_SECONDS: u32 = 1;

/// Dashboard configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Environment (production, staging, development)
    pub environment: String,

    /// Log level ("debug" enables per-request logging)
    pub log_level: String,

    /// Cosmos DB account endpoint, e.g. `https://<account>.documents.azure.com:443/`
    pub cosmos_url: String,

    /// Cosmos DB primary or secondary master key (base64)
    pub cosmos_key: String,

    pub database_name: String,

    /// Trading engine ForceBuy endpoint
    pub force_buy_url: String,

    /// How many trades the recent-trades table shows
    pub recent_trades_limit: usize,

    /// Equity-log partition shown by default (None = current UTC year)
    pub equity_year: Option<String>,

    /// Pause before the page re-renders after a successful force buy
    pub refresh_delay_seconds: u32,
}

impl Config {
    /// Load configuration from Cloudflare secrets and environment variables
    pub fn from_env(env: &Env) -> Result<Self> {
        Self::from_lookup(|name| {
            env.secret(name)
                .map(|s| s.to_string())
                .or_else(|_| env.var(name).map(|v| v.to_string()))
                .ok()
        })
    }

    /// Build configuration from any key lookup. Blank values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let (Some(cosmos_url), Some(cosmos_key)) = (get("COSMOS_DB_URL"), get("COSMOS_DB_KEY"))
        else {
            return Err(DashboardError::Config(
                "Cosmos DB credentials not found. Set COSMOS_DB_URL and COSMOS_DB_KEY as Worker secrets or variables.".into(),
            ));
        };

        let config = Self {
            environment: get("ENVIRONMENT").unwrap_or_else(|| "production".to_string()),

            log_level: get("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),

            cosmos_url,
            cosmos_key,

            database_name: get("COSMOS_DB_NAME")
                .unwrap_or_else(|| DEFAULT_DATABASE_NAME.to_string()),

            force_buy_url: get("FORCE_BUY_URL")
                .unwrap_or_else(|| DEFAULT_FORCE_BUY_URL.to_string()),

            recent_trades_limit: get("RECENT_TRADES_LIMIT")
                .map(|v| v.parse().unwrap_or(DEFAULT_TRADES_LIMIT))
                .unwrap_or(DEFAULT_TRADES_LIMIT),

            equity_year: get("EQUITY_YEAR"),

            refresh_delay_seconds: get("REFRESH_DELAY_SECONDS")
                .map(|v| v.parse().unwrap_or(DEFAULT_REFRESH_DELAY_SECONDS))
                .unwrap_or(DEFAULT_REFRESH_DELAY_SECONDS),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("COSMOS_DB_URL", &self.cosmos_url),
            ("FORCE_BUY_URL", &self.force_buy_url),
        ] {
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                return Err(DashboardError::Config(format!(
                    "{name} must be an http(s) URL, got {url:?}"
                )));
            }
        }
        if self.recent_trades_limit == 0 {
            return Err(DashboardError::Config(
                "RECENT_TRADES_LIMIT must be positive".into(),
            ));
        }
        if let Some(year) = &self.equity_year {
            if !is_year(year) {
                return Err(DashboardError::Config(format!(
                    "EQUITY_YEAR must be a four-digit year, got {year:?}"
                )));
            }
        }
        Ok(())
    }

    /// Equity-log partition to show: explicit request, then config, then `current_year`
    pub fn equity_year_or(&self, requested: Option<&str>, current_year: i32) -> String {
        requested
            .filter(|y| is_year(y))
            .map(str::to_string)
            .or_else(|| self.equity_year.clone())
            .unwrap_or_else(|| current_year.to_string())
    }

    pub fn is_debug(&self) -> bool {
        self.log_level.eq_ignore_ascii_case("debug")
    }
}

fn is_year(value: &str) -> bool {
    value.len() == 4 && value.bytes().all(|b| b.is_ascii_digit())
}
