//! Cosmos DB SQL REST API client
//!
//! Implements the three calls the dashboard needs:
//! - Point read of a document
//! - Replace of a document
//! - Parameterised SQL query with continuation paging, scoped to one
//!   partition when the key is known
//!
//! No retries: a throttled or failed call is reported to the caller as-is.

use reqwest::Method;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::auth::{CosmosAuth, http_date};
use crate::error::{DashboardError, Result};

const API_VERSION: &str = "2018-12-31";

/// Cosmos DB client bound to one database
pub struct CosmosClient {
    endpoint: String,
    database: String,
    auth: CosmosAuth,
    http: reqwest::Client,
}

/// SQL query with bound parameters
#[derive(Debug, Clone, Serialize)]
pub struct SqlQuery {
    pub query: String,
    pub parameters: Vec<SqlParameter>,
}

/// Named query parameter (`@name`)
#[derive(Debug, Clone, Serialize)]
pub struct SqlParameter {
    pub name: String,
    pub value: serde_json::Value,
}

impl SqlQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            parameters: Vec::new(),
        }
    }

    /// Bind `@name`
    pub fn bind(mut self, name: &str, value: impl Into<serde_json::Value>) -> Self {
        self.parameters.push(SqlParameter {
            name: name.to_string(),
            value: value.into(),
        });
        self
    }
}

/// One page of query results, decoded per document later
#[derive(Debug, Deserialize)]
struct QueryPage {
    #[serde(rename = "Documents", default)]
    documents: Vec<serde_json::Value>,
}

/// Documents returned by a query. A document that does not decode is left
/// out and its error kept in `skipped`.
#[derive(Debug)]
pub struct QueryResults<T> {
    pub documents: Vec<T>,
    pub skipped: Vec<String>,
}

/// Error body returned by the gateway
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

impl CosmosClient {
    /// Create new client for `database` on the account at `endpoint`
    pub fn new(endpoint: &str, master_key: &str, database: &str) -> Result<Self> {
        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            database: database.to_string(),
            auth: CosmosAuth::new(master_key)?,
            http: reqwest::Client::new(),
        })
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    /// Read one document by id
    pub async fn read_document<T: DeserializeOwned>(
        &self,
        container: &str,
        id: &str,
        partition_key: &str,
    ) -> Result<T> {
        let link = self.document_link(container, id);
        let response = self
            .request(Method::GET, &link, &link)?
            .header("x-ms-documentdb-partitionkey", partition_key_header(partition_key)?)
            .send()
            .await?;

        let body = Self::handle_response(response, &link).await?;
        serde_json::from_str(&body).map_err(DashboardError::from)
    }

    /// Replace one document in full
    pub async fn replace_document<B: Serialize>(
        &self,
        container: &str,
        id: &str,
        partition_key: &str,
        document: &B,
    ) -> Result<()> {
        let link = self.document_link(container, id);
        let response = self
            .request(Method::PUT, &link, &link)?
            .header("x-ms-documentdb-partitionkey", partition_key_header(partition_key)?)
            .json(document)
            .send()
            .await?;

        Self::handle_response(response, &link).await?;
        Ok(())
    }

    /// Run a query, following continuation tokens until every page is read.
    ///
    /// With a `partition_key` the query stays inside that partition; without
    /// one it fans out, and the gateway then rejects `ORDER BY` and `TOP`.
    pub async fn query_documents<T: DeserializeOwned>(
        &self,
        container: &str,
        query: &SqlQuery,
        partition_key: Option<&str>,
    ) -> Result<QueryResults<T>> {
        let collection_link = self.collection_link(container);
        let url_path = format!("{collection_link}/docs");
        let body = serde_json::to_string(query)?;
        let partition = partition_key.map(partition_key_header).transpose()?;

        let mut values = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let mut request = self
                .request(Method::POST, &url_path, &collection_link)?
                .header("x-ms-documentdb-isquery", "True")
                .header("Content-Type", "application/query+json")
                .body(body.clone());
            request = match &partition {
                Some(key) => request.header("x-ms-documentdb-partitionkey", key.as_str()),
                None => request.header("x-ms-documentdb-query-enablecrosspartition", "True"),
            };
            if let Some(token) = &continuation {
                request = request.header("x-ms-continuation", token.as_str());
            }

            let response = request.send().await?;
            let next = response
                .headers()
                .get("x-ms-continuation")
                .and_then(|v| v.to_str().ok())
                .filter(|v| !v.is_empty())
                .map(str::to_string);

            let text = Self::handle_response(response, &collection_link).await?;
            let page: QueryPage = serde_json::from_str(&text)?;
            values.extend(page.documents);

            match next {
                Some(token) => continuation = Some(token),
                None => break,
            }
        }

        Ok(decode_documents(values))
    }

    fn collection_link(&self, container: &str) -> String {
        format!(
            "dbs/{}/colls/{}",
            urlencoding::encode(&self.database),
            urlencoding::encode(container)
        )
    }

    fn document_link(&self, container: &str, id: &str) -> String {
        format!("{}/docs/{}", self.collection_link(container), urlencoding::encode(id))
    }

    /// Start a signed request. `url_path` is appended to the endpoint,
    /// `resource_link` is what gets signed.
    fn request(
        &self,
        method: Method,
        url_path: &str,
        resource_link: &str,
    ) -> Result<reqwest::RequestBuilder> {
        let date = http_date(chrono::Utc::now());
        let authorization =
            self.auth
                .authorization(method.as_str(), "docs", resource_link, &date)?;
        let url = format!("{}/{url_path}", self.endpoint);

        Ok(self
            .http
            .request(method, &url)
            .header("Authorization", authorization)
            .header("x-ms-date", date)
            .header("x-ms-version", API_VERSION)
            .header("x-ms-activity-id", uuid::Uuid::new_v4().to_string())
            .header("Accept", "application/json"))
    }

    /// Handle API response, returning the body of a successful call
    async fn handle_response(response: reqwest::Response, resource: &str) -> Result<String> {
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let text = response.text().await;

        let body = text.as_deref().unwrap_or("Unknown error");
        if let Some(err) = status_error(status, &headers, body, resource) {
            return Err(err);
        }
        text.map_err(DashboardError::from)
    }
}

/// Typed error for a non-success status; `None` for 2xx
fn status_error(status: u16, headers: &HeaderMap, body: &str, resource: &str) -> Option<DashboardError> {
    match status {
        200..=299 => None,
        404 => Some(DashboardError::NotFound(resource.to_string())),
        429 => {
            let retry_after = headers
                .get("x-ms-retry-after-ms")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(1000);
            Some(DashboardError::Throttled(retry_after))
        }
        _ => Some(DashboardError::Store {
            status,
            message: error_message(body),
        }),
    }
}

/// Decode each document on its own so one bad record does not hide the rest
fn decode_documents<T: DeserializeOwned>(values: Vec<serde_json::Value>) -> QueryResults<T> {
    let mut results = QueryResults {
        documents: Vec::with_capacity(values.len()),
        skipped: Vec::new(),
    };
    for value in values {
        let id = value
            .get("id")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("<no id>")
            .to_string();
        match serde_json::from_value(value) {
            Ok(document) => results.documents.push(document),
            Err(e) => results.skipped.push(format!("{id}: {e}")),
        }
    }
    results
}

/// Partition key header value: a JSON array holding the key
fn partition_key_header(partition_key: &str) -> Result<String> {
    Ok(serde_json::to_string(&[partition_key])?)
}

/// Pull the readable part out of a gateway error body
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(err) if !err.message.is_empty() => {
            let first_line = err.message.lines().next().unwrap_or_default();
            if err.code.is_empty() {
                first_line.to_string()
            } else {
                format!("{}: {first_line}", err.code)
            }
        }
        _ => body.trim().to_string(),
    }
}
