mod config;
mod error;

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use runtime::model::Backend;
use runtime::{AnthropicBackend, McpToolHost, Orchestrator, ToolHost};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::{Config, MODEL_ENV};
use error::{Error, Result};

#[derive(Parser)]
#[command(name = "weather-chat")]
#[command(about = "Chat with Claude using tools from an MCP server", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults to ./weather-chat.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Tool server executable followed by its arguments
    #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
    server: Vec<String>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            warn!(error = %e, "failed to load .env");
        }
    }

    let api_key = std::env::var("ANTHROPIC_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty())
        .ok_or(Error::MissingApiKey)?;

    let config = Config::discover(cli.config.as_deref())?
        .with_model_override(std::env::var(MODEL_ENV).ok());

    let mut builder = AnthropicBackend::builder(api_key, &config.backend.model)
        .max_tokens(config.backend.max_tokens);
    if let Some(system) = &config.backend.system {
        builder = builder.system(system);
    }
    let backend = builder.build();
    info!(%backend, "model backend ready");

    // clap guarantees at least one value
    let (command, args) = cli
        .server
        .split_first()
        .ok_or_else(|| runtime::Error::Connect("no server command given".into()))?;

    let host = McpToolHost::spawn(command, args)
        .await
        .map_err(|e| runtime::Error::Connect(e.to_string()))?;
    println!("Connected to server with tools: {:?}", host.tool_names());

    let mut orchestrator = Orchestrator::new(backend, host);

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = io::stdout();
    let result = chat_loop(&orchestrator, stdin, &mut stdout).await;

    let cleanup = orchestrator
        .host_mut()
        .cleanup()
        .await
        .map_err(|e| Error::Cleanup(e.to_string()));

    result?;
    cleanup
}

/// Read queries line by line until `quit` or end of input.
///
/// A failed query is reported and the loop keeps going.
async fn chat_loop<B, H, R, W>(
    orchestrator: &Orchestrator<B, H>,
    input: R,
    out: &mut W,
) -> Result<()>
where
    B: Backend,
    H: ToolHost,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out, "\nMCP Client Started!")?;
    writeln!(out, "Type your queries or 'quit' to exit.")?;

    let mut lines = input.lines();
    loop {
        write!(out, "\nQuery: ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let query = line.trim();
        if query.eq_ignore_ascii_case("quit") {
            break;
        }
        if query.is_empty() {
            continue;
        }

        match orchestrator.process_query(query).await {
            Ok(response) => writeln!(out, "\n{response}")?,
            Err(e) => writeln!(out, "\nError: {e}")?,
        }
    }

    Ok(())
}
