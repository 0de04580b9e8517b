use std::io::Read;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use harf::api::{create_router, AppState};
use harf::config::Config;
use harf::correction::CorrectionPipeline;
use harf::morphology::MorphologyProvider;

#[derive(Parser)]
#[command(name = "harf")]
#[command(about = "Turkish handwriting OCR with morphological spell correction")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP service (default)
    Serve {
        /// Bind address, overrides HARF_HOST
        #[arg(long)]
        host: Option<String>,
        /// Bind port, overrides HARF_PORT
        #[arg(long)]
        port: Option<u16>,
    },
    /// Correct text read from stdin and print the outcome as JSON
    Correct {
        /// Skip the morphology engine and use the static table only
        #[arg(long)]
        basic: bool,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "harf=info,tower_http=debug".into());
    let json = std::env::var("HARF_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let (json_layer, text_layer) = if json {
        (
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            ),
            None,
        )
    } else {
        (
            None,
            Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
        )
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();
    init_tracing();

    match args.command {
        Some(Command::Correct { basic }) => correct(basic).await,
        Some(Command::Serve { host, port }) => serve(host, port).await,
        None => serve(None, None).await,
    }
}

async fn serve(host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let mut config = Config::from_env()?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    tracing::info!("Initializing OCR provider: {}...", config.ocr.model);
    tracing::info!(
        "Initializing morphology engine: {}...",
        config.morphology.backend
    );
    let state = AppState::from_config(config.clone())?;
    if !state.ocr.is_available() {
        tracing::warn!("OCR unavailable - /ocr requests will fail");
    }
    if !state.pipeline.has_primary() {
        tracing::warn!("Morphology engine unavailable - using basic correction only");
    }

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Harf starting on http://{}", addr);
    tracing::info!("  Health check: http://{}/health", addr);
    tracing::info!("  API docs:     http://{}/docs", addr);
    tracing::info!("  OpenAPI spec: http://{}/openapi.json", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn correct(basic: bool) -> anyhow::Result<()> {
    let mut raw_text = String::new();
    std::io::stdin()
        .read_to_string(&mut raw_text)
        .context("Failed to read stdin")?;

    let morphology = if basic {
        MorphologyProvider::disabled()
    } else {
        let config = Config::default();
        config.morphology.validate()?;
        MorphologyProvider::new(&config.morphology)
    };

    let pipeline = CorrectionPipeline::new(&morphology)?;
    let outcome = pipeline.run(raw_text).await;
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining in-flight requests...");
}
