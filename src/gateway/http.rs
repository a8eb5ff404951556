//! HTTP implementation of the gateway, speaking JSON to the backend.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use super::config::GatewayConfig;
use super::error::{GatewayError, GatewayResult};
use super::wire::{ComputationRequest, IsochroneRequest, PoiLookupRequest, PoiLookupResponse};
use super::CityGateway;
use crate::models::{FeatureCollection, Poi};

const COMPUTATION_ENDPOINT: &str = "/computation";
const POI_LOOKUP_ENDPOINT: &str = "/poi-lookup";
const DISTRICTS_ENDPOINT: &str = "/districts";
const ISOCHRONE_ENDPOINT: &str = "/isochrone";

/// Gateway backed by a real computation service over HTTP.
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    /// Build a gateway from explicit settings.
    pub fn new(config: &GatewayConfig) -> GatewayResult<Self> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                GatewayError::configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(HttpGateway {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build a gateway from `reachscope.toml` and environment overrides.
    pub fn from_default_config() -> GatewayResult<Self> {
        Self::new(&GatewayConfig::load()?)
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn post_json<B, T>(&self, endpoint: &str, body: &B) -> GatewayResult<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        tracing::debug!(endpoint, "sending gateway request");
        let response = self
            .client
            .post(self.url(endpoint))
            .json(body)
            .send()
            .await
            .map_err(|e| GatewayError::transport(endpoint, e))?;
        Self::read_json(endpoint, response).await
    }

    async fn get_json<T>(&self, endpoint: &str) -> GatewayResult<T>
    where
        T: DeserializeOwned,
    {
        tracing::debug!(endpoint, "sending gateway request");
        let response = self
            .client
            .get(self.url(endpoint))
            .send()
            .await
            .map_err(|e| GatewayError::transport(endpoint, e))?;
        Self::read_json(endpoint, response).await
    }

    /// Read the body before checking the status so a failure response can
    /// carry the backend's message.
    async fn read_json<T>(endpoint: &str, response: reqwest::Response) -> GatewayResult<T>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<empty response>".to_string());

        if !status.is_success() {
            return Err(GatewayError::status(endpoint, status.as_u16(), body));
        }

        serde_json::from_str(&body).map_err(|e| GatewayError::decode(endpoint, e))
    }
}

#[async_trait]
impl CityGateway for HttpGateway {
    async fn compute(&self, request: &ComputationRequest) -> GatewayResult<FeatureCollection> {
        self.post_json(COMPUTATION_ENDPOINT, request).await
    }

    async fn list_pois(&self, request: &PoiLookupRequest) -> GatewayResult<Vec<Poi>> {
        let response: PoiLookupResponse = self.post_json(POI_LOOKUP_ENDPOINT, request).await?;
        Ok(response.pois)
    }

    async fn districts(&self) -> GatewayResult<FeatureCollection> {
        self.get_json(DISTRICTS_ENDPOINT).await
    }

    async fn isochrone(&self, request: &IsochroneRequest) -> GatewayResult<serde_json::Value> {
        self.post_json(ISOCHRONE_ENDPOINT, request).await
    }
}
