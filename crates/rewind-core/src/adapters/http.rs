use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::data_source::{Endpoint, SnapshotSource, SourceError, SourceFuture};
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient};
use crate::{
    AccountInfo, Execution, Kline, Order, Position, Snapshot, Symbol, Timeframe, TradingDate,
    ValidationError,
};

/// Where the dashboard API lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSourceConfig {
    base_url: String,
    pub timeout_ms: u64,
}

impl HttpSourceConfig {
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:8080";
    pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

    pub fn new(base_url: impl AsRef<str>, timeout_ms: u64) -> Result<Self, ValidationError> {
        let raw = base_url.as_ref().trim();
        if !(raw.starts_with("http://") || raw.starts_with("https://")) {
            return Err(ValidationError::InvalidBaseUrl {
                value: raw.to_owned(),
            });
        }

        Ok(Self {
            base_url: raw.trim_end_matches('/').to_owned(),
            timeout_ms,
        })
    }

    /// Reads `REWIND_API_BASE` and `REWIND_TIMEOUT_MS`, falling back to
    /// defaults for unset or unusable values.
    pub fn from_env() -> Self {
        let timeout_ms = std::env::var("REWIND_TIMEOUT_MS")
            .ok()
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(Self::DEFAULT_TIMEOUT_MS);

        std::env::var("REWIND_API_BASE")
            .ok()
            .and_then(|base| Self::new(base, timeout_ms).ok())
            .unwrap_or_else(|| Self {
                base_url: String::from(Self::DEFAULT_BASE_URL),
                timeout_ms,
            })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for HttpSourceConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// REST client for the dashboard's `/api/*` endpoints.
#[derive(Clone)]
pub struct HttpSnapshotSource {
    config: HttpSourceConfig,
    http_client: Arc<dyn HttpClient>,
}

impl HttpSnapshotSource {
    pub fn new(config: HttpSourceConfig) -> Self {
        Self::with_http_client(config, Arc::new(ReqwestHttpClient::new()))
    }

    pub fn with_http_client(config: HttpSourceConfig, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            config,
            http_client,
        }
    }

    pub fn config(&self) -> &HttpSourceConfig {
        &self.config
    }

    fn url(&self, path: &str, query: &[(&str, &str)]) -> String {
        let mut url = format!("{}{}", self.config.base_url, path);
        for (index, (name, value)) in query.iter().enumerate() {
            url.push(if index == 0 { '?' } else { '&' });
            url.push_str(name);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        url: String,
    ) -> Result<T, SourceError> {
        debug!(%endpoint, %url, "requesting");
        let request = HttpRequest::get(url).with_timeout_ms(self.config.timeout_ms);
        let response = self
            .http_client
            .get(request)
            .await
            .map_err(|error| {
                SourceError::unavailable(format!("{endpoint} request failed: {error}"))
            })?;

        if !response.is_success() {
            return Err(SourceError::status(endpoint, response.status));
        }

        serde_json::from_str(&response.body)
            .map_err(|error| SourceError::malformed(endpoint, error))
    }

    /// Lists may come back as JSON `null` when empty.
    async fn fetch_list<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        url: String,
    ) -> Result<Vec<T>, SourceError> {
        self.fetch::<Option<Vec<T>>>(endpoint, url)
            .await
            .map(Option::unwrap_or_default)
    }
}

impl SnapshotSource for HttpSnapshotSource {
    fn snapshot<'a>(&'a self, date: TradingDate) -> SourceFuture<'a, Snapshot> {
        Box::pin(async move {
            let date = date.format_iso();
            let url = self.url("/api/snapshot", &[("date", date.as_str())]);
            self.fetch(Endpoint::Snapshot, url).await
        })
    }

    fn klines<'a>(
        &'a self,
        symbol: &'a Symbol,
        timeframe: Timeframe,
    ) -> SourceFuture<'a, Vec<Kline>> {
        Box::pin(async move {
            let url = self.url(
                "/api/klines",
                &[("symbol", symbol.as_str()), ("timeframe", timeframe.as_str())],
            );
            self.fetch_list(Endpoint::Klines, url).await
        })
    }

    fn orders<'a>(&'a self, status: Option<&'a str>) -> SourceFuture<'a, Vec<Order>> {
        Box::pin(async move {
            let url = match status.map(str::trim).filter(|status| !status.is_empty()) {
                Some(status) => self.url("/api/orders", &[("status", status)]),
                None => self.url("/api/orders", &[]),
            };
            self.fetch_list(Endpoint::Orders, url).await
        })
    }

    fn pending_orders<'a>(&'a self) -> SourceFuture<'a, Vec<Order>> {
        Box::pin(async move {
            let url = self.url("/api/orders/pending", &[]);
            self.fetch_list(Endpoint::PendingOrders, url).await
        })
    }

    fn executions<'a>(&'a self) -> SourceFuture<'a, Vec<Execution>> {
        Box::pin(async move {
            let url = self.url("/api/executions", &[]);
            self.fetch_list(Endpoint::Executions, url).await
        })
    }

    fn positions<'a>(&'a self) -> SourceFuture<'a, Vec<Position>> {
        Box::pin(async move {
            let url = self.url("/api/positions", &[]);
            self.fetch_list(Endpoint::Positions, url).await
        })
    }

    fn account<'a>(&'a self) -> SourceFuture<'a, AccountInfo> {
        Box::pin(async move {
            let url = self.url("/api/account", &[]);
            self.fetch(Endpoint::Account, url).await
        })
    }
}
