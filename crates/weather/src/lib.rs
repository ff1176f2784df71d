//! Weather tools served over MCP.
//!
//! Two tools are exposed by [`WeatherServer`]:
//!
//! - `get_forecast(latitude, longitude)`: the next few forecast periods for a
//!   coordinate, from the NWS points and gridpoint forecast endpoints.
//! - `get_alerts(state)`: every active alert for a US state.
//!
//! NWS failures never surface as MCP errors. Each tool answers with a fixed
//! fallback sentence instead, so clients always get text back.
//!
//! # Example
//!
//! ```no_run
//! use rmcp::{ServiceExt, transport::stdio};
//! use weather::{NwsClient, WeatherServer};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let server = WeatherServer::new(NwsClient::new()?);
//! let service = server.serve(stdio()).await?;
//! service.waiting().await?;
//! # Ok(())
//! # }
//! ```

mod error;
pub mod format;
pub mod nws;
mod server;

pub use error::{Error, Result};
pub use nws::NwsClient;
pub use server::{AlertsRequest, ForecastRequest, WeatherServer};
