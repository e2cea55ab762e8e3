//! ForceBuy command client
//!
//! One synchronous GET to the trading engine with the chosen coin. Nothing is
//! retried and no side effect is assumed unless the engine answers 200.

use serde::Deserialize;

use crate::error::{DashboardError, Result};

/// Success body returned by the engine
#[derive(Debug, Deserialize)]
struct ForceBuyReply {
    #[serde(default)]
    message: Option<String>,
}

/// Client for the trading engine's ForceBuy endpoint
pub struct ForceBuyClient {
    endpoint: String,
    http: reqwest::Client,
}

impl ForceBuyClient {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn url_for(&self, coin: &str) -> String {
        let separator = if self.endpoint.contains('?') { '&' } else { '?' };
        format!("{}{separator}coin={}", self.endpoint, urlencoding::encode(coin))
    }

    /// Ask the engine to buy `coin` now; returns the engine's message
    pub async fn execute(&self, coin: &str) -> Result<String> {
        let response = self
            .http
            .get(self.url_for(coin))
            .send()
            .await
            .map_err(|e| DashboardError::ForceBuyUnreachable(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            DashboardError::ForceBuyUnreachable(format!("HTTP {status} with unreadable body: {e}"))
        })?;
        interpret_response(status, &body)
    }
}

/// 200 means the engine accepted the order; anything else is its error text
pub fn interpret_response(status: u16, body: &str) -> Result<String> {
    if status != 200 {
        return Err(DashboardError::ForceBuyRejected {
            status,
            body: body.trim().to_string(),
        });
    }
    let message = serde_json::from_str::<ForceBuyReply>(body)
        .ok()
        .and_then(|reply| reply.message)
        .unwrap_or_else(|| body.trim().to_string());
    Ok(message)
}
