//! RE-DACT: text redaction, masking and anonymization server.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use redact_server::{build_router, AppState};
use redact_store::FileStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

const GAZETTEER_FILE: &str = "gazetteer.json";

fn resolve_data_dir() -> PathBuf {
    std::env::var("REDACT_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let exe_dir = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()));
            if let Some(dir) = exe_dir {
                let parent_data = dir.join("../data");
                if parent_data.exists() {
                    return parent_data;
                }
            }
            PathBuf::from("data")
        })
}

/// Delete expired output files once and report the count.
fn run_cleanup(data_dir: &Path) -> anyhow::Result<usize> {
    let config = redact_core::RedactConfig::from_env(data_dir)?;
    let store = FileStore::new(&config.data_paths.uploads)?;
    Ok(store.cleanup_older_than(config.retention())?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "--cleanup" | "cleanup" => {
                let data_dir = if args.len() > 2 {
                    PathBuf::from(&args[2])
                } else {
                    resolve_data_dir()
                };
                match run_cleanup(&data_dir) {
                    Ok(deleted) => {
                        println!("Deleted {} expired file(s) from {}", deleted, data_dir.display());
                        return Ok(());
                    }
                    Err(e) => {
                        eprintln!("Cleanup failed: {}", e);
                        std::process::exit(1);
                    }
                }
            }
            "--help" | "-h" | "help" => {
                println!("RE-DACT - protect sensitive information in text");
                println!();
                println!("Usage: redact [command]");
                println!();
                println!("Commands:");
                println!("  (none)                   Start the server");
                println!("  cleanup [data-dir]       Delete output files past retention");
                println!("  help                     Show this help message");
                println!();
                println!("Environment:");
                println!("  PORT                     HTTP port (default 8501)");
                println!("  REDACT_DATA_DIR          Data directory (default ./data)");
                println!("  REDACT_RETENTION_DAYS    Output file retention (default 30)");
                return Ok(());
            }
            _ => {
                eprintln!("Unknown command: {}. Use 'redact help' for usage.", args[1]);
                std::process::exit(1);
            }
        }
    }

    let data_dir = resolve_data_dir();
    info!("Data directory: {}", data_dir.display());

    let config = redact_core::RedactConfig::from_env(&data_dir)?;
    let port = config.port;

    // A gazetteer that exists but fails to load stops startup.
    let recognizer = redact_infer::load_shared(&data_dir.join(GAZETTEER_FILE))
        .map_err(|e| anyhow::anyhow!("Failed to load entity recognizer: {}", e))?;

    let state = Arc::new(AppState::new(config, recognizer)?);
    state.spawn_sweep();

    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("RE-DACT server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
