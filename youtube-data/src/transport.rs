//! The network seam beneath the kernel.
//!
//! The kernel only ever asks a [`Transport`] for the decoded JSON body of one endpoint call.
//! [`HttpTransport`] is the production implementation; tests substitute a scripted fake.

use crate::config::Config;
use eyre::Context;
use http::Method;
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use tracing::instrument;

/// Query parameters, in the order they are sent.
pub type Query = Vec<(&'static str, String)>;

/// Something that can call a YouTube Data API endpoint.
///
/// Failures (network, non-2xx status, undecodable body) are reported as-is; the kernel neither
/// wraps nor retries them.
pub trait Transport: Send + Sync {
    /// Performs a read (`GET`) of `endpoint` and returns the decoded JSON body.
    fn api(
        &self,
        endpoint: &str,
        query: &[(&'static str, String)],
    ) -> impl Future<Output = eyre::Result<Value>> + Send;

    /// Whether requests are made on behalf of an authenticated user.
    fn has_access_token(&self) -> bool {
        false
    }
}

/// [`Transport`] over HTTPS using [`reqwest`].
///
/// Owns the credentials: the API key goes in the `key` query parameter and the access token in
/// the `Authorization` header.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    access_token: Option<String>,
}

impl HttpTransport {
    pub fn new(config: &Config) -> eyre::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .context("build HTTP client")?;
        Ok(Self::with_client(client, config))
    }

    /// Uses an existing HTTP client, e.g. one shared with other API clients.
    pub fn with_client(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            access_token: config.access_token.clone(),
        }
    }

    /// Makes a request to the YouTube API with common error handling.
    ///
    /// Attaches the credentials, the query parameters and (if given) a JSON body, and turns any
    /// non-2xx status into an error carrying the status and response text. An empty response
    /// body decodes to [`Value::Null`].
    #[instrument(skip(self, query, json_body), level = tracing::Level::TRACE)]
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&'static str, String)],
        json_body: Option<&(impl Serialize + Sync)>,
    ) -> eyre::Result<Value> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let mut request = self.client.request(method.clone(), &url).query(query);
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key)]);
        }
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = json_body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("send {} request to YouTube API: {}", method, url))?;

        let status_code = response.status();
        if !status_code.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(eyre::eyre!(
                "YouTube API {} request failed with status {}: {}",
                method,
                status_code,
                error_text
            ));
        }

        let body = response
            .text()
            .await
            .context("read YouTube API response body")?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).context("parse YouTube API response as JSON")
    }

    pub async fn get(&self, endpoint: &str, query: &[(&'static str, String)]) -> eyre::Result<Value> {
        self.request(Method::GET, endpoint, query, None::<&()>).await
    }

    pub async fn post(
        &self,
        endpoint: &str,
        query: &[(&'static str, String)],
        body: &(impl Serialize + Sync),
    ) -> eyre::Result<Value> {
        self.request(Method::POST, endpoint, query, Some(body)).await
    }

    pub async fn put(
        &self,
        endpoint: &str,
        query: &[(&'static str, String)],
        body: &(impl Serialize + Sync),
    ) -> eyre::Result<Value> {
        self.request(Method::PUT, endpoint, query, Some(body)).await
    }

    pub async fn delete(&self, endpoint: &str, query: &[(&'static str, String)]) -> eyre::Result<Value> {
        self.request(Method::DELETE, endpoint, query, None::<&()>).await
    }
}

impl Transport for HttpTransport {
    async fn api(&self, endpoint: &str, query: &[(&'static str, String)]) -> eyre::Result<Value> {
        self.get(endpoint, query).await
    }

    fn has_access_token(&self) -> bool {
        self.access_token.is_some()
    }
}
