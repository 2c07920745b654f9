//! HTTP Server for the WERS sequencer.
//!
//! # Endpoints
//!
//! | Method | Path                   | Description                          |
//! |--------|------------------------|--------------------------------------|
//! | GET    | `/`                    | Upload form                          |
//! | POST   | `/`                    | Upload from the form, HTML result    |
//! | GET    | `/download/{filename}` | Download a processed workbook        |
//! | POST   | `/api/upload`          | Upload a workbook, JSON result       |
//! | GET    | `/api/logs`            | SSE stream for real-time logs        |
//! | GET    | `/health`              | Health check                         |

use std::{convert::Infallible, sync::Arc, time::Duration};

use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, Path, State},
    http::{header, Method, StatusCode},
    response::{sse::Event, Html, IntoResponse, Json, Redirect, Response, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde_json::Value;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use uuid::Uuid;

use super::logs::{log_error, log_info, log_success, LOG_BROADCASTER};
use super::page::{download_page, error_page, index_page};
use super::types::{download_url, error_response, HealthResponse, UploadResponse};
use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult, StorageError, UploadError};
use crate::storage::{display_name, job_file_name, output_name, UploadStore};
use crate::transform::pipeline::{process_bytes, ProcessOptions, ProcessResult};
use crate::validation::{check_upload, extension};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<UploadStore>,
    pub options: ProcessOptions,
    /// Upload size limit, reported back when a body is rejected
    pub max_upload: usize,
}

impl AppState {
    pub fn new(store: UploadStore, max_upload: usize) -> Self {
        Self {
            store: Arc::new(store),
            options: ProcessOptions::default(),
            max_upload,
        }
    }
}

/// A processed upload
struct Processed {
    job_id: String,
    source_file: String,
    output_file: String,
    result: ProcessResult,
}

/// Build the application router.
pub fn router(state: AppState, config: &ServerConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE, header::CONTENT_DISPOSITION]);

    // The SSE stream is long-lived and must not be cut by the request timeout
    let timed = Router::new()
        .route("/", get(index).post(upload_form))
        .route("/download/{filename}", get(download_file))
        .route("/api/upload", post(upload_api))
        .route("/health", get(health))
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(DefaultBodyLimit::max(config.max_content_length));

    Router::new()
        .route("/api/logs", get(sse_logs))
        .merge(timed)
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = UploadStore::open(&config.upload_dir)?;
    let app = router(AppState::new(store, config.max_content_length), &config);

    let addr = config.socket_addr();
    println!("🚀 WERS sequencer running on http://{}", addr);
    println!("   GET  /                     - Upload form");
    println!("   POST /api/upload           - Upload workbook (JSON)");
    println!("   GET  /download/{{filename}}  - Download processed workbook");
    println!("   GET  /api/logs             - SSE log stream");
    println!("   GET  /health               - Health check");
    println!();
    println!(
        "📁 Upload folder: {} (max {} MB per file)",
        config.upload_dir.display(),
        config.max_content_length / (1024 * 1024)
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "wersmap".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Upload form
async fn index() -> Html<String> {
    Html(index_page())
}

/// Form upload: HTML page with a download link or an error block
async fn upload_form(State(state): State<AppState>, multipart: Multipart) -> Response {
    match handle_upload(&state, multipart).await {
        Ok(done) => {
            let url = download_url(&done.output_file);
            let name = display_name(&done.output_file);
            Html(download_page(name, &url, &done.result.stats)).into_response()
        }
        // Nothing chosen: back to the form
        Err(ServerError::Upload(UploadError::NoFile | UploadError::EmptyFilename)) => {
            Redirect::to("/").into_response()
        }
        Err(e) => (status_of(&e), Html(error_page(&e.to_string()))).into_response(),
    }
}

/// JSON upload endpoint
async fn upload_api(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, (StatusCode, Json<Value>)> {
    let done = handle_upload(&state, multipart)
        .await
        .map_err(|e| (status_of(&e), Json(error_response(&e.to_string()))))?;

    Ok(Json(UploadResponse::new(
        done.job_id,
        done.source_file,
        done.output_file,
        &done.result,
    )))
}

/// Serve a stored file as an attachment
async fn download_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, (StatusCode, Html<String>)> {
    let not_found = |name: &str| {
        (
            StatusCode::NOT_FOUND,
            Html(error_page(&StorageError::NotFound(name.to_string()).to_string())),
        )
    };

    let path = state.store.resolve(&filename).map_err(|_| not_found(&filename))?;
    let bytes = tokio::fs::read(&path).await.map_err(|_| not_found(&filename))?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(display_name)
        .unwrap_or("download.xlsx")
        .to_string();

    log_info(format!("📥 Download: {}", name));

    let headers = [
        (header::CONTENT_TYPE, content_type(&name).to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", name),
        ),
    ];
    Ok((headers, bytes).into_response())
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(entry) => {
            let json = serde_json::to_string(&entry).ok()?;
            Some(Ok(Event::default().data(json)))
        }
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Read the `file` part, store it, process it and store the output.
async fn handle_upload(state: &AppState, mut multipart: Multipart) -> ServerResult<Processed> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;

    let limit = state.max_upload;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        if field.name() == Some("file") {
            file_name = Some(field.file_name().unwrap_or("").to_string());
            file_data = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error(e, limit))?
                    .to_vec(),
            );
        }
    }

    let source_file = check_upload(file_name.as_deref())?;
    let bytes = file_data.ok_or(UploadError::NoFile)?;

    println!("\n{}", "=".repeat(70));
    println!("📄 NEW UPLOAD: {} ({} bytes)", source_file, bytes.len());
    println!("{}\n", "=".repeat(70));

    let store = Arc::clone(&state.store);
    let options = state.options.clone();
    let job_id = Uuid::new_v4();

    // Reading, sequencing and writing are CPU-bound
    let done = tokio::task::spawn_blocking(move || -> ServerResult<Processed> {
        store.save(&job_file_name(&job_id, &source_file), &bytes)?;
        let result = process_bytes(&bytes, &options)?;
        let output_file = job_file_name(&job_id, &output_name(&source_file));
        store.save(&output_file, &result.output)?;
        Ok(Processed {
            job_id: job_id.to_string(),
            source_file,
            output_file,
            result,
        })
    })
    .await
    .map_err(|e| ServerError::Internal(format!("Processing task failed: {}", e)))?;

    match &done {
        Ok(p) => log_success(format!("✅ Ready: {}", p.output_file)),
        Err(e) => log_error(format!("Processing failed: {}", e)),
    }
    done
}

/// Body-limit rejections become [`UploadError::TooLarge`].
fn multipart_error(err: MultipartError, limit: usize) -> UploadError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        UploadError::TooLarge(limit)
    } else {
        UploadError::Multipart(err.body_text())
    }
}

/// HTTP status for an error
fn status_of(err: &ServerError) -> StatusCode {
    match err {
        ServerError::Storage(StorageError::NotFound(_)) => StatusCode::NOT_FOUND,
        ServerError::Upload(UploadError::TooLarge(_)) => StatusCode::PAYLOAD_TOO_LARGE,
        e if e.is_client_error() => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn content_type(filename: &str) -> &'static str {
    match extension(filename).as_deref() {
        Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        Some("xls") => "application/vnd.ms-excel",
        _ => "application/octet-stream",
    }
}
