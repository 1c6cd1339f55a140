use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use solfege_asr::recognizer::{ModelCache, ModelDirLoader};
use solfege_asr::solfege::Syllable;
use solfege_asr::{client, create_router, AppState, AudioFile, Config};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "solfege-asr", version, about = "Streaming solfège syllable recognition")]
struct Cli {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the recognition server (default)
    Serve {
        /// Listen host (overrides BACKEND_HOST)
        #[arg(long)]
        host: Option<String>,

        /// Listen port (overrides BACKEND_PORT)
        #[arg(long)]
        port: Option<u16>,

        /// Vosk model directory (overrides VOSK_MODEL_PATH)
        #[arg(long)]
        model: Option<PathBuf>,
    },

    /// Stream a 16-bit WAV file through a running server
    Replay {
        /// WAV file to send
        file: PathBuf,

        /// Server WebSocket URL
        #[arg(long, default_value = "ws://127.0.0.1:8000/ws")]
        url: String,

        /// Length of each segment in milliseconds
        #[arg(long, default_value_t = 1000)]
        segment_ms: u64,

        /// Size of each binary audio frame in milliseconds
        #[arg(long, default_value_t = 100)]
        frame_ms: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut cfg = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command.unwrap_or(Command::Serve {
        host: None,
        port: None,
        model: None,
    }) {
        Command::Serve { host, port, model } => {
            if let Some(host) = host {
                cfg.server.host = host;
            }
            if let Some(port) = port {
                cfg.server.port = port;
            }
            if let Some(model) = model {
                cfg.model.path = model;
            }
            serve(cfg).await
        }
        Command::Replay {
            file,
            url,
            segment_ms,
            frame_ms,
        } => {
            let audio = AudioFile::open(&file)?;
            let results = client::replay(&url, &audio, segment_ms, frame_ms)
                .await
                .context("Replay failed")?;

            for result in results {
                let degree = result
                    .word
                    .as_deref()
                    .and_then(Syllable::from_word)
                    .map(|s| s.degree().to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{:>4}  {:<6} {:>6}  degree {}",
                    result.segment_id,
                    result.word.as_deref().unwrap_or("-"),
                    result
                        .confidence
                        .map(|c| format!("{:.2}", c))
                        .unwrap_or_else(|| "-".to_string()),
                    degree
                );
            }
            Ok(())
        }
    }
}

async fn serve(cfg: Config) -> Result<()> {
    info!("Solfège ASR v{}", env!("CARGO_PKG_VERSION"));
    info!("Vosk model: {}", cfg.model.path.display());

    let models = Arc::new(ModelCache::new(Arc::new(ModelDirLoader::new(
        cfg.model.path.clone(),
    ))));
    let state = AppState::new(models).with_frame_queue(cfg.server.frame_queue);
    let app = create_router(state);

    let addr = cfg.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Listening on ws://{}/ws", addr);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
