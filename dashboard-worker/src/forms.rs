//! Operator form submissions
//!
//! The settings form always overwrites all five editable fields; anything
//! else in the stored document is left as it was read.

use crate::error::{DashboardError, Result};
use crate::types::Settings;

/// Raw values posted by the settings form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsForm {
    pub take_profit: String,
    pub stop_loss: String,
    pub order_amount: String,
    /// Comma separated coin symbols
    pub coins: String,
    pub prompt_template: String,
}

impl SettingsForm {
    /// Form pre-filled from the stored document
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            take_profit: settings.take_profit.to_string(),
            stop_loss: settings.stop_loss.to_string(),
            order_amount: settings.order_amount.to_string(),
            coins: settings.coins_to_track.join(", "),
            prompt_template: settings.prompt_template.clone(),
        }
    }

    /// Overwrite the editable fields of `settings`.
    ///
    /// All numbers are checked before anything is touched, so a bad value
    /// leaves `settings` unchanged.
    pub fn apply(&self, settings: &mut Settings) -> Result<()> {
        let take_profit = parse_number("Take Profit (%)", &self.take_profit)?;
        let stop_loss = parse_number("Stop Loss (%)", &self.stop_loss)?;
        let order_amount = parse_number("Order Amount (USD)", &self.order_amount)?;

        settings.take_profit = take_profit;
        settings.stop_loss = stop_loss;
        settings.order_amount = order_amount;
        settings.coins_to_track = parse_coin_list(&self.coins);
        settings.prompt_template.clone_from(&self.prompt_template);
        Ok(())
    }
}

/// Split a comma separated list, trimming whitespace and dropping empties
pub fn parse_coin_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|coin| !coin.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_number(label: &str, raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| DashboardError::Validation(format!("{label} must be a number, got {raw:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stored() -> Settings {
        serde_json::from_value(json!({
            "id": "main_settings",
            "TAKE_PROFIT": 10.0,
            "STOP_LOSS": 5.0,
            "ORDER_AMOUNT": 20.0,
            "COINS_TO_TRACK": ["btc"],
            "PROMPT_TEMPLATE": "old",
            "MODEL": "gpt-4o"
        }))
        .unwrap()
    }

    fn form(coins: &str) -> SettingsForm {
        SettingsForm {
            take_profit: "12.5".into(),
            stop_loss: " 4 ".into(),
            order_amount: "50".into(),
            coins: coins.into(),
            prompt_template: "Evaluate {coin} for a swing trade".into(),
        }
    }

    #[test]
    fn test_parse_coin_list() {
        assert_eq!(parse_coin_list("btc, eth ,, sol"), vec!["btc", "eth", "sol"]);
        assert!(parse_coin_list(" , ,").is_empty());
        assert!(parse_coin_list("").is_empty());
    }

    #[test]
    fn test_apply_overwrites_editable_fields() {
        let mut settings = stored();
        form("btc, eth ,, sol").apply(&mut settings).unwrap();

        assert!((settings.take_profit - 12.5).abs() < f64::EPSILON);
        assert!((settings.stop_loss - 4.0).abs() < f64::EPSILON);
        assert!((settings.order_amount - 50.0).abs() < f64::EPSILON);
        assert_eq!(settings.coins_to_track, vec!["btc", "eth", "sol"]);
        assert_eq!(settings.prompt_template, "Evaluate {coin} for a swing trade");
        assert_eq!(settings.extra["MODEL"], json!("gpt-4o"));
        assert_eq!(settings.extra["id"], json!("main_settings"));
    }

    #[test]
    fn test_resubmitting_normalized_list_is_idempotent() {
        let mut first = stored();
        form("btc, eth ,, sol").apply(&mut first).unwrap();
        let persisted = serde_json::to_value(&first).unwrap();

        // Re-read, pre-fill the form, submit again unchanged
        let reread: Settings = serde_json::from_value(persisted.clone()).unwrap();
        let prefilled = SettingsForm::from_settings(&reread);
        assert_eq!(prefilled.coins, "btc, eth, sol");

        let mut second = reread.clone();
        prefilled.apply(&mut second).unwrap();
        assert_eq!(serde_json::to_value(&second).unwrap(), persisted);
    }

    #[test]
    fn test_bad_number_leaves_settings_untouched() {
        let mut settings = stored();
        let mut bad = form("doge");
        bad.order_amount = "fifty".into();

        let err = bad.apply(&mut settings).unwrap_err();
        assert!(err.to_string().contains("Order Amount (USD) must be a number"));
        assert_eq!(settings, stored());

        bad.order_amount = "NaN".into();
        assert!(bad.apply(&mut settings).is_err());
    }
}
