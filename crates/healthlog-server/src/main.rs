//! HealthLog: health-record ingestion server.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use healthlog_core::HealthLogConfig;
use healthlog_llm::LLMConfig;
use healthlog_server::{build_router, AppState};

fn resolve_data_dir() -> PathBuf {
    std::env::var("HEALTHLOG_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "--help" | "-h" | "help" => {
                println!("HealthLog: health-record ingestion server");
                println!();
                println!("Usage: healthlog");
                println!();
                println!("Environment:");
                println!("  HEALTHLOG_DATA_DIR          Data directory (default: data)");
                println!("  PORT                        Listen port (default: 3010)");
                println!("  HEALTHLOG_USE_MODEL         Use the generative extractor (default: true)");
                println!("  HEALTHLOG_MODEL_TIMEOUT_MS  Generative call budget (default: 8000)");
                println!("  GEMINI_API_KEY, ANTHROPIC_API_KEY, GROQ_API_KEY, OPENAI_API_KEY");
                return Ok(());
            }
            other => {
                eprintln!("Unknown command: {}. Use 'healthlog help' for usage.", other);
                std::process::exit(1);
            }
        }
    }

    let data_dir = resolve_data_dir();
    info!("Data directory: {}", data_dir.display());

    let config = HealthLogConfig::from_env(&data_dir)?;
    let port = config.port;
    let llm_config = LLMConfig::load(&config.data_paths.llm_config_file);

    let state = Arc::new(AppState::new(config, llm_config));
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("HealthLog server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
