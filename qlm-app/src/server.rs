use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use qlm_persist::SavePayload;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use crate::cli::ServeArgs;

#[derive(Clone)]
struct AppState {
    dir: PathBuf,
    /// Serializes appends so concurrent requests never interleave lines.
    write_lock: Arc<Mutex<()>>,
}

pub fn router(dir: impl Into<PathBuf>) -> Router {
    let state = AppState {
        dir: dir.into(),
        write_lock: Arc::new(Mutex::new(())),
    };
    Router::new()
        .route("/save_data", post(save_data))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(args: ServeArgs) -> Result<()> {
    tokio::fs::create_dir_all(&args.dir)
        .await
        .with_context(|| format!("creating data dir {}", args.dir.display()))?;

    let listener = TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("binding {}", args.bind))?;
    info!(
        addr = %args.bind,
        dir = %args.dir.display(),
        "save endpoint listening on /save_data"
    );

    axum::serve(listener, router(args.dir))
        .await
        .context("server error")
}

async fn save_data(State(state): State<AppState>, Json(payload): Json<SavePayload>) -> StatusCode {
    if !is_plain_file_name(&payload.filename) {
        warn!(filename = %payload.filename, "rejected unsafe filename");
        return StatusCode::BAD_REQUEST;
    }

    let path = state.dir.join(&payload.filename);
    let _guard = state.write_lock.lock().await;
    match append(&path, &payload.filedata).await {
        Ok(()) => {
            debug!(path = %path.display(), bytes = payload.filedata.len(), "appended");
            StatusCode::OK
        }
        Err(err) => {
            error!(path = %path.display(), error = %err, "append failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// A single path component that stays inside the data dir.
fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(['/', '\\'])
        && !name.contains("..")
}

async fn append(path: &Path, data: &str) -> std::io::Result<()> {
    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(data.as_bytes()).await?;
    file.flush().await
}
