use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};
use webscribe::engine::{probe, Capability};
use webscribe::{create_router, AppState, Config};

#[derive(Debug, Parser)]
#[command(name = "webscribe", about = "Dictation session service")]
struct Args {
    /// Configuration file (basename, .toml extension resolved)
    #[arg(long, default_value = "config/webscribe")]
    config: String,

    /// Override the configured HTTP port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));

    let capability = probe::detect(&cfg.recognition);
    match &capability {
        Capability::Available(factory) => {
            info!("recognition backend: {}", factory.name());
        }
        Capability::Unavailable { reason } => {
            // Sessions still run; they surface this to the user once.
            warn!("speech recognition unavailable: {}", reason);
        }
    }

    let state = AppState::new(capability, cfg.recognition.default_language.clone());
    let router = create_router(state);

    let port = args.port.unwrap_or(cfg.service.http.port);
    let addr = format!("{}:{}", cfg.service.http.bind, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("HTTP server listening on {}", addr);
    axum::serve(listener, router).await?;

    Ok(())
}
