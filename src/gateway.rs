use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Url;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::ApiConfig;
use crate::fallback;
use crate::models::{ChecklistBundle, OrderBundle, ServiceHealth};
use crate::wire::{ChecklistPayload, HealthPayload, OrdersPayload};

const FORCE_REFRESH_PARAM: &str = "force_refresh";

/// Failures reading from the booth service. They stay inside the gateway,
/// which answers with demo data instead.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unexpected response status {0}")]
    Status(u16),
    #[error("malformed payload: {0}")]
    Decode(String),
    #[error("invalid base url: {0}")]
    InvalidUrl(String),
}

/// Raw reads against the booth service.
#[async_trait]
pub trait BoothSource: Send + Sync {
    async fn orders(
        &self,
        booth_number: &str,
        force_refresh: bool,
    ) -> Result<OrdersPayload, GatewayError>;

    async fn checklist(
        &self,
        booth_number: &str,
        force_refresh: bool,
    ) -> Result<ChecklistPayload, GatewayError>;

    async fn health(&self) -> Result<HealthPayload, GatewayError>;
}

pub struct HttpBoothSource {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpBoothSource {
    pub fn new(config: &ApiConfig) -> Result<Self, GatewayError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| GatewayError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(GatewayError::InvalidUrl(config.base_url.clone()));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        Ok(Self { client, base_url })
    }

    /// `{base}/{segments...}`, each segment percent-encoded, `/` included.
    pub fn endpoint(&self, segments: &[&str], force_refresh: bool) -> Result<Url, GatewayError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GatewayError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        if force_refresh {
            url.query_pairs_mut().append_pair(FORCE_REFRESH_PARAM, "true");
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, GatewayError> {
        debug!(%url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GatewayError::Status(response.status().as_u16()));
        }

        let text = response
            .text()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| GatewayError::Decode(e.to_string()))
    }
}

#[async_trait]
impl BoothSource for HttpBoothSource {
    async fn orders(
        &self,
        booth_number: &str,
        force_refresh: bool,
    ) -> Result<OrdersPayload, GatewayError> {
        let url = self.endpoint(&["orders", "booth", booth_number], force_refresh)?;
        self.get_json(url).await
    }

    async fn checklist(
        &self,
        booth_number: &str,
        force_refresh: bool,
    ) -> Result<ChecklistPayload, GatewayError> {
        let url = self.endpoint(&["checklist", "booth", booth_number], force_refresh)?;
        self.get_json(url).await
    }

    async fn health(&self) -> Result<HealthPayload, GatewayError> {
        let url = self.endpoint(&["health"], false)?;
        self.get_json(url).await
    }
}

/// Booth-scoped reads that always produce data: normalized service
/// responses, or the demo dataset when the service fails in any way.
#[derive(Clone)]
pub struct DataGateway {
    source: Arc<dyn BoothSource>,
}

impl DataGateway {
    pub fn new(source: Arc<dyn BoothSource>) -> Self {
        Self { source }
    }

    pub fn http(config: &ApiConfig) -> Result<Self, GatewayError> {
        Ok(Self::new(Arc::new(HttpBoothSource::new(config)?)))
    }

    pub async fn fetch_orders(&self, booth_number: &str, force_refresh: bool) -> OrderBundle {
        info!(booth = booth_number, force_refresh, "fetching orders");
        match self.source.orders(booth_number, force_refresh).await {
            Ok(payload) => payload.normalize(booth_number, Utc::now()),
            Err(e) => {
                warn!(booth = booth_number, error = %e, "orders unavailable, serving demo data");
                fallback::orders(booth_number, Utc::now())
            }
        }
    }

    pub async fn fetch_checklist(&self, booth_number: &str, force_refresh: bool) -> ChecklistBundle {
        info!(booth = booth_number, force_refresh, "fetching checklist");
        match self.source.checklist(booth_number, force_refresh).await {
            Ok(payload) => payload.normalize(booth_number, Utc::now()),
            Err(e) => {
                warn!(booth = booth_number, error = %e, "checklist unavailable, serving demo data");
                fallback::checklist(booth_number, Utc::now())
            }
        }
    }

    pub async fn check_health(&self) -> ServiceHealth {
        let checked_at = Utc::now();
        match self.source.health().await {
            Ok(payload) => ServiceHealth {
                reachable: true,
                status: payload.status.unwrap_or_else(|| "unknown".to_string()),
                checked_at,
            },
            Err(e) => {
                warn!(error = %e, "booth service health check failed");
                ServiceHealth {
                    reachable: false,
                    status: e.to_string(),
                    checked_at,
                }
            }
        }
    }
}
