use rmcp::{ServiceExt, transport::stdio};
use tracing::info;
use tracing_subscriber::EnvFilter;
use weather::{Error, NwsClient, Result, WeatherServer};

#[tokio::main]
async fn main() {
    // stdout carries the MCP stream; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let nws = NwsClient::from_env()?;
    info!(base_url = nws.base_url(), "starting weather MCP server");

    let service = WeatherServer::new(nws)
        .serve(stdio())
        .await
        .map_err(|e| Error::Serve(e.to_string()))?;

    let reason = service
        .waiting()
        .await
        .map_err(|e| Error::Serve(e.to_string()))?;
    info!(?reason, "weather MCP server stopped");

    Ok(())
}
