//! MCP server exposing the forecast and alert tools.

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router,
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::format::{format_alerts, format_forecast};
use crate::nws::NwsClient;

pub const FORECAST_UNAVAILABLE: &str = "Unable to fetch forecast data for this location.";
pub const FORECAST_URL_MISSING: &str = "Unable to fetch forecast URL.";
pub const DETAILED_FORECAST_UNAVAILABLE: &str = "Unable to fetch detailed forecast.";
pub const ALERTS_UNAVAILABLE: &str = "Unable to fetch alerts or no alerts found.";

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ForecastRequest {
    /// Latitude of the location
    pub latitude: f64,
    /// Longitude of the location
    pub longitude: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AlertsRequest {
    /// Two-letter US state code (e.g. CA, NY)
    pub state: String,
}

/// Weather tools backed by the NWS API.
///
/// Every NWS failure is reported to the caller as plain text inside a
/// successful tool result.
#[derive(Clone)]
pub struct WeatherServer {
    nws: NwsClient,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl WeatherServer {
    pub fn new(nws: NwsClient) -> Self {
        Self {
            nws,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "Get weather forecast for a location")]
    async fn get_forecast(
        &self,
        Parameters(request): Parameters<ForecastRequest>,
    ) -> Result<CallToolResult, McpError> {
        let text = self.forecast(request.latitude, request.longitude).await;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(description = "Get weather alerts for a US state")]
    async fn get_alerts(
        &self,
        Parameters(request): Parameters<AlertsRequest>,
    ) -> Result<CallToolResult, McpError> {
        let text = self.alerts(&request.state).await;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

impl WeatherServer {
    /// Forecast text for a coordinate: points lookup, then the forecast URL it names.
    pub async fn forecast(&self, latitude: f64, longitude: f64) -> String {
        info!(latitude, longitude, "get_forecast");

        let points = match self.nws.points(latitude, longitude).await {
            Ok(points) => points,
            Err(e) => {
                warn!(error = %e, "points lookup failed");
                return FORECAST_UNAVAILABLE.to_string();
            }
        };

        let Some(url) = points.properties.forecast.filter(|u| !u.is_empty()) else {
            return FORECAST_URL_MISSING.to_string();
        };

        match self.nws.forecast(&url).await {
            Ok(forecast) => format_forecast(&forecast.properties.periods),
            Err(e) => {
                warn!(error = %e, "forecast lookup failed");
                DETAILED_FORECAST_UNAVAILABLE.to_string()
            }
        }
    }

    /// Alert text for a two-letter state code, in any case.
    pub async fn alerts(&self, state: &str) -> String {
        info!(state, "get_alerts");

        match self.nws.active_alerts(state).await {
            Ok(alerts) => format_alerts(&alerts.features),
            Err(e) => {
                warn!(error = %e, "alerts lookup failed");
                ALERTS_UNAVAILABLE.to_string()
            }
        }
    }
}

#[tool_handler]
impl ServerHandler for WeatherServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "weather".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            instructions: Some(
                "Weather forecasts by coordinate and active alerts by US state, from the National Weather Service."
                    .into(),
            ),
            ..Default::default()
        }
    }
}
