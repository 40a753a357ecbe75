use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rutocr::api::{create_router, AppState};
use rutocr::config::Config;
use rutocr::ocr::{tracing_progress_sink, OcrProvider, TextRecognizer};
use rutocr::processing::OcrPipeline;

#[derive(Parser)]
#[command(name = "rutocr")]
#[command(about = "OCR service that extracts Chilean RUT numbers from remote images")]
#[command(version)]
struct Args {
    /// Interface to bind, overrides HOST
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on, overrides PORT
    #[arg(long)]
    port: Option<u16>,

    /// Directory for per-request temp files, overrides TMP_DIR
    #[arg(long)]
    tmp_dir: Option<PathBuf>,

    /// Log OCR progress and cleanup failures
    #[arg(long)]
    debug: bool,
}

/// Command-line flags win over the environment.
fn apply_overrides(config: &mut Config, args: Args) {
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(tmp_dir) = args.tmp_dir {
        config.processing.tmp_dir = tmp_dir;
    }
    config.processing.debug |= args.debug;
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rutocr=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = Config::from_env();
    apply_overrides(&mut config, args);

    tracing::info!(
        "Initializing Tesseract OCR (languages={})...",
        config.ocr.languages
    );
    let mut ocr = OcrProvider::new(&config.ocr)?;
    if config.processing.debug {
        ocr = ocr.with_progress_sink(tracing_progress_sink());
    }
    if !ocr.is_available() {
        tracing::warn!("OCR unavailable - /ocr requests will fail until Tesseract is installed");
    }

    let recognizer: Arc<dyn TextRecognizer> = Arc::new(ocr);
    let pipeline = OcrPipeline::new(recognizer, &config.processing, &config.ocr)?;

    tokio::fs::create_dir_all(&config.processing.tmp_dir).await?;
    tracing::info!(
        "Temp files go to {}",
        config.processing.tmp_dir.display()
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = create_router(AppState::new(config, pipeline));

    tracing::info!("rutocr starting on http://{}", addr);
    tracing::info!("  Health check: http://{}/health", addr);
    tracing::info!("  API docs:     http://{}/docs", addr);
    tracing::info!("  OpenAPI spec: http://{}/openapi.json", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining in-flight requests...");
}
