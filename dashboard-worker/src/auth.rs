//! Cosmos DB master-key authentication
//!
//! Each REST call is signed with HMAC-SHA256 over the verb, resource type,
//! resource link and request date, keyed with the base64-decoded account key.
//! See "Access control in the Azure Cosmos DB SQL API" for the token format.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::{DashboardError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Cosmos DB request signer
pub struct CosmosAuth {
    /// Decoded master key
    key: Vec<u8>,
}

impl CosmosAuth {
    /// Create signer from the base64 master key
    pub fn new(master_key: &str) -> Result<Self> {
        let key = BASE64
            .decode(master_key.trim())
            .map_err(|e| DashboardError::Auth(format!("Failed to decode COSMOS_DB_KEY: {e}")))?;
        if key.is_empty() {
            return Err(DashboardError::Auth("COSMOS_DB_KEY is empty".into()));
        }
        Ok(Self { key })
    }

    /// Build the `Authorization` header value for one request.
    ///
    /// `date` must be the exact value sent as `x-ms-date`.
    pub fn authorization(
        &self,
        verb: &str,
        resource_type: &str,
        resource_link: &str,
        date: &str,
    ) -> Result<String> {
        let payload = Self::string_to_sign(verb, resource_type, resource_link, date);

        let mut mac = HmacSha256::new_from_slice(&self.key)
            .map_err(|e| DashboardError::Auth(format!("Invalid signing key: {e}")))?;
        mac.update(payload.as_bytes());
        let signature = BASE64.encode(mac.finalize().into_bytes());

        let token = format!("type=master&ver=1.0&sig={signature}");
        Ok(urlencoding::encode(&token).into_owned())
    }

    fn string_to_sign(verb: &str, resource_type: &str, resource_link: &str, date: &str) -> String {
        format!(
            "{}\n{}\n{}\n{}\n\n",
            verb.to_lowercase(),
            resource_type.to_lowercase(),
            resource_link,
            date.to_lowercase()
        )
    }
}

/// `x-ms-date` value (RFC 1123, always GMT)
pub fn http_date(now: chrono::DateTime<chrono::Utc>) -> String {
    now.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const KEY: &str = "dGVzdC1rZXktZm9yLWNvc21vcy1zaWduaW5n";
    const DATE: &str = "Tue, 06 Jan 2026 08:15:00 GMT";

    #[test]
    fn test_string_to_sign_layout() {
        let payload = CosmosAuth::string_to_sign(
            "GET",
            "docs",
            "dbs/tradingdb/colls/settings/docs/main_settings",
            DATE,
        );
        assert_eq!(
            payload,
            "get\ndocs\ndbs/tradingdb/colls/settings/docs/main_settings\ntue, 06 jan 2026 08:15:00 gmt\n\n"
        );
    }

    #[test]
    fn test_authorization_is_url_encoded_token() {
        let auth = CosmosAuth::new(KEY).unwrap();
        let header = auth
            .authorization("GET", "docs", "dbs/tradingdb/colls/settings/docs/main_settings", DATE)
            .unwrap();

        assert!(header.starts_with("type%3Dmaster%26ver%3D1.0%26sig%3D"));
        assert!(!header.contains('&'));
        assert!(!header.contains('='));
        assert!(!header.contains('+'));
        assert!(!header.contains('/'));

        let decoded = urlencoding::decode(&header).unwrap();
        let signature = decoded.strip_prefix("type=master&ver=1.0&sig=").unwrap();
        // HMAC-SHA256 is 32 bytes
        assert_eq!(BASE64.decode(signature).unwrap().len(), 32);
    }

    #[test]
    fn test_signature_depends_on_every_input() {
        let auth = CosmosAuth::new(KEY).unwrap();
        let link = "dbs/tradingdb/colls/trades";
        let base = auth.authorization("POST", "docs", link, DATE).unwrap();

        assert_eq!(base, auth.authorization("post", "DOCS", link, DATE).unwrap());
        assert_ne!(base, auth.authorization("GET", "docs", link, DATE).unwrap());
        assert_ne!(base, auth.authorization("POST", "colls", link, DATE).unwrap());
        assert_ne!(base, auth.authorization("POST", "docs", "dbs/tradingdb/colls/portfolio", DATE).unwrap());
        assert_ne!(
            base,
            auth.authorization("POST", "docs", link, "Tue, 06 Jan 2026 08:15:01 GMT").unwrap()
        );
    }

    #[test]
    fn test_invalid_key() {
        assert!(matches!(CosmosAuth::new("not base64!!"), Err(DashboardError::Auth(_))));
        assert!(matches!(CosmosAuth::new(""), Err(DashboardError::Auth(_))));
    }

    #[test]
    fn test_http_date() {
        let now = chrono::Utc.with_ymd_and_hms(2026, 1, 6, 8, 15, 0).unwrap();
        assert_eq!(http_date(now), DATE);
    }
}
