//! internet-search: fallback web search agent
//!
//! Entry point. Serves the HTTP agent surface by default, or the search tool
//! over stdio, or runs a single query from the command line.

use anyhow::Result;
use clap::{Parser, Subcommand};
use internet_search::{
    config::{self, Settings},
    metrics::Metrics,
    network::HttpClient,
    providers::ProviderLoader,
    router::FallbackRouter,
    tools::{stdio, ToolServer},
    web::{create_router, AppState},
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "internet-search",
    version,
    about = "Internet search agent with ordered provider fallback"
)]
struct Cli {
    /// Path to settings.yml
    #[arg(short, long, global = true, env = config::SETTINGS_PATH_ENV)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the agent card, search API and tool endpoint over HTTP
    Serve {
        /// Bind host
        #[arg(long)]
        host: Option<String>,
        /// Bind port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Serve the search tool as line-delimited JSON-RPC on stdin/stdout
    ToolServer,
    /// Run one query and print the answer
    Query {
        /// Print the full attempt report as JSON
        #[arg(long)]
        report: bool,
        /// Query text
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// List the configured provider chain
    Providers,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    debug!(?cli.command, config = ?cli.config, "CLI arguments parsed");

    let mut settings = config::load(cli.config.as_deref())?;

    match cli.command.unwrap_or(Command::Serve {
        host: None,
        port: None,
    }) {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                settings.server.host = host;
            }
            if let Some(port) = port {
                settings.server.port = port;
            }
            serve(settings).await
        }
        Command::ToolServer => {
            let (router, _) = build_router(&settings)?;
            stdio::run(ToolServer::new(router)).await?;
            Ok(())
        }
        Command::Query { report, text } => {
            let (router, _) = build_router(&settings)?;
            let query = text.join(" ");
            if report {
                let report = router.search_with_report(&query).await;
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", router.search(&query).await);
            }
            Ok(())
        }
        Command::Providers => {
            let (router, _) = build_router(&settings)?;
            let chain = router.chain();
            for config in settings.enabled_providers() {
                let Some(descriptor) = chain.get(&config.name) else {
                    continue;
                };
                let about = descriptor.provider.about();
                println!(
                    "{:<12} budget={:?} credential={} {}",
                    descriptor.name(),
                    descriptor.budget,
                    config.credential(),
                    about.website.unwrap_or_default()
                );
            }
            println!("worst case: {:?}", chain.total_budget());
            Ok(())
        }
    }
}

/// Logs go to stderr so stdout stays clean for the stdio tool transport
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn build_router(settings: &Settings) -> Result<(Arc<FallbackRouter>, Arc<Metrics>)> {
    let client = HttpClient::with_settings(&settings.outgoing)?;
    debug!("HTTP client initialized");

    let chain = ProviderLoader::load(settings, &client)?;
    if chain.is_empty() {
        warn!("No search providers enabled; every search will return the failure message");
    } else {
        info!(providers = ?chain.names(), "Loaded provider chain");
    }

    let metrics = Arc::new(Metrics::new());
    let router = FallbackRouter::new(Arc::new(chain)).with_metrics(metrics.clone());
    Ok((Arc::new(router), metrics))
}

async fn serve(settings: Settings) -> Result<()> {
    info!("Starting internet-search v{}", internet_search::VERSION);

    let (router, metrics) = build_router(&settings)?;
    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let advertised = settings.server.advertised_url();

    let state = AppState::new(settings, router, metrics);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, url = %advertised, "Starting server");

    axum::serve(listener, app).await?;
    Ok(())
}
