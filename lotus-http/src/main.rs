//! Lotus wisdom MCP server over streamable HTTP, one journey per session.

mod routes;
mod sse;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use lotus::io::config::{DEFAULT_CONFIG_FILE, load_config_with_env};
use tracing::info;

use crate::state::AppState;

#[derive(Parser)]
#[command(name = "lotus-http", version)]
#[command(about = "Streamable HTTP transport for the lotus wisdom MCP server")]
struct Args {
    /// Config file (missing file means defaults).
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Address to bind the server to (overrides config)
    #[arg(long)]
    bind: Option<String>,

    /// Port to listen on (overrides config and PORT)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("lotus_http=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let args = Args::parse();

    let mut config = load_config_with_env(&args.config)?;
    if let Some(bind) = args.bind {
        config.http.bind = bind;
    }
    if let Some(port) = args.port {
        config.http.port = port;
    }
    config.validate()?;

    let addr: SocketAddr = format!("{}:{}", config.http.bind, config.http.port).parse()?;
    let sweep_interval = Duration::from_secs(config.http.sweep_interval_secs);
    let state = AppState::new(config);

    start_idle_sweeper(state.clone(), sweep_interval);

    let app = routes::app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %addr, "listening");
    info!(endpoint = %format!("http://{addr}/mcp"), "mcp endpoint");
    axum::serve(listener, app).await?;

    Ok(())
}

/// Evict idle sessions in a background task.
fn start_idle_sweeper(state: AppState, every: Duration) {
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(every);
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            tick.tick().await;
            let evicted = state.evict_idle(Instant::now()).await;
            if !evicted.is_empty() {
                let remaining = state.session_count().await;
                info!(count = evicted.len(), remaining, "idle sweep");
            }
        }
    });
}
