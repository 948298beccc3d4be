use anyhow::Result;
use clap::Parser;
use med_scribe::{create_router, AppState, Config};
use tracing::info;

/// Clinical documentation assistant service
#[derive(Debug, Parser)]
#[command(name = "med-scribe", version)]
struct Args {
    /// Path to the YAML configuration file
    #[arg(long, default_value = "config/med-scribe.yaml")]
    config: String,

    /// Directory holding per-session JSON records
    #[arg(long, default_value = "sessions")]
    sessions_dir: String,

    /// Directory holding note template .txt files
    #[arg(long, default_value = "templates")]
    templates_dir: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let config = Config::load(&args.config)?;

    info!("med-scribe v0.1.0");
    info!(
        "LLM endpoint: {} (model {})",
        config.llm.endpoint, config.llm.model
    );
    info!(
        "STT endpoint: {} (model {})",
        config.stt.endpoint, config.stt.model
    );
    info!("Sessions dir: {}", args.sessions_dir);
    info!("Templates dir: {}", args.templates_dir);

    let addr = format!("{}:{}", config.server.host, config.server.port);

    let state = AppState::new(
        config,
        &args.config,
        &args.sessions_dir,
        &args.templates_dir,
    )?;
    let router = create_router(state);

    info!("HTTP server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
