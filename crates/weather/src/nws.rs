//! National Weather Service API client.

use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::{Error, Result};

/// Public NWS API root.
pub const NWS_API_BASE: &str = "https://api.weather.gov";

/// User agent sent with every request; NWS rejects anonymous clients.
pub const USER_AGENT: &str = "weather-app/1.0";

const GEO_JSON: &str = "application/geo+json";

/// Response of `GET /points/{lat},{lon}`.
#[derive(Debug, Deserialize)]
pub struct PointsResponse {
    #[serde(default)]
    pub properties: PointsProperties,
}

#[derive(Debug, Default, Deserialize)]
pub struct PointsProperties {
    /// URL of the gridpoint forecast for this location.
    #[serde(default)]
    pub forecast: Option<String>,
}

/// Response of a gridpoint forecast URL.
#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    pub properties: ForecastProperties,
}

#[derive(Debug, Deserialize)]
pub struct ForecastProperties {
    #[serde(default)]
    pub periods: Vec<ForecastPeriod>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPeriod {
    #[serde(default)]
    pub name: String,
    /// NWS sends null while a period's value is still being computed.
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub temperature_unit: String,
    #[serde(default)]
    pub wind_speed: String,
    #[serde(default)]
    pub wind_direction: String,
    #[serde(default)]
    pub detailed_forecast: String,
}

/// Response of `GET /alerts/active/area/{state}`.
#[derive(Debug, Deserialize)]
pub struct AlertsResponse {
    pub features: Vec<AlertFeature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlertFeature {
    #[serde(default)]
    pub properties: AlertProperties,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertProperties {
    #[serde(default)]
    pub event: Option<String>,
    #[serde(default)]
    pub area_desc: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub instruction: Option<String>,
}

/// Thin client over the three NWS endpoints the tools need.
#[derive(Debug, Clone)]
pub struct NwsClient {
    http: reqwest::Client,
    base_url: String,
}

impl NwsClient {
    /// Client for the public NWS API.
    pub fn new() -> Result<Self> {
        Self::with_base_url(NWS_API_BASE)
    }

    /// Client for an alternative API root (mirrors, test servers).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Client whose root comes from `NWS_API_BASE`, falling back to the public API.
    pub fn from_env() -> Result<Self> {
        match std::env::var("NWS_API_BASE") {
            Ok(base) if !base.trim().is_empty() => Self::with_base_url(base.trim()),
            _ => Self::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Look up the gridpoint metadata for a coordinate.
    pub async fn points(&self, latitude: f64, longitude: f64) -> Result<PointsResponse> {
        let url = format!("{}/points/{latitude},{longitude}", self.base_url);
        self.get(&url).await
    }

    /// Fetch a forecast from the URL a points lookup returned.
    pub async fn forecast(&self, url: &str) -> Result<ForecastResponse> {
        self.get(url).await
    }

    /// Active alerts for a state; the code is uppercased before the request.
    pub async fn active_alerts(&self, state: &str) -> Result<AlertsResponse> {
        let url = format!(
            "{}/alerts/active/area/{}",
            self.base_url,
            state.trim().to_uppercase()
        );
        self.get(&url).await
    }

    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!(%url, "NWS request");

        let response = self
            .http
            .get(url)
            .header(ACCEPT, GEO_JSON)
            .send()
            .await
            .map_err(|source| Error::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            warn!(%url, %status, "NWS request failed");
            return Err(Error::Status {
                url: url.to_string(),
                status,
                body,
            });
        }

        response.json::<T>().await.map_err(|source| Error::Decode {
            url: url.to_string(),
            source,
        })
    }
}
