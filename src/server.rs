use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Redirect, Response},
    routing::{get, post},
    Router,
};
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::controller::Controller;
use crate::error::MenuError;
use crate::intake::{SelectedFile, MAX_FILE_BYTES};
use crate::page::render_page;
use crate::service::MenuService;

/// Room for the multipart envelope around the largest accepted file.
const BODY_LIMIT: usize = MAX_FILE_BYTES + 64 * 1024;

pub struct AppState {
    pub controller: Mutex<Controller<dyn MenuService>>,
}

impl AppState {
    pub fn new(service: Arc<dyn MenuService>) -> Arc<Self> {
        Arc::new(Self {
            controller: Mutex::new(Controller::new(service)),
        })
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/select", post(select_file))
        .route("/upload", post(upload))
        .route("/cancel", post(cancel))
        .route("/reset", post(reset))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

fn back_home() -> Redirect {
    Redirect::to("/")
}

async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    let controller = state.controller.lock().await;
    Html(render_page(&*controller))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy" }))
}

enum Picked {
    File(SelectedFile),
    Nothing,
    TooLarge,
}

async fn read_file_field(multipart: &mut Multipart) -> Result<Picked, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or_default().to_string();
        let mime = field
            .content_type()
            .map(str::to_string)
            .filter(|m| !m.is_empty() && m != "application/octet-stream");
        let bytes = field.bytes().await?.to_vec();

        // An empty file input still submits a nameless, empty part.
        if name.is_empty() && bytes.is_empty() {
            return Ok(Picked::Nothing);
        }
        let file = match mime {
            Some(mime) => SelectedFile::new(name, mime, bytes),
            None => SelectedFile::sniffed(name, bytes),
        };
        return Ok(Picked::File(file));
    }
    Ok(Picked::Nothing)
}

async fn select_file(State(state): State<Arc<AppState>>, mut multipart: Multipart) -> Response {
    let picked = match read_file_field(&mut multipart).await {
        Ok(picked) => picked,
        Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => Picked::TooLarge,
        Err(e) => {
            tracing::warn!(error = %e, "unreadable upload form");
            return (e.status(), e.body_text()).into_response();
        }
    };

    let mut controller = state.controller.lock().await;
    match picked {
        Picked::File(file) => {
            if let Err(err) = controller.select_file(file) {
                tracing::debug!(%err, "selection refused, error panel shown");
            }
        }
        Picked::TooLarge => {
            controller.reject_file(MenuError::TooLarge);
        }
        Picked::Nothing => {}
    }
    back_home().into_response()
}

async fn upload(State(state): State<Arc<AppState>>) -> Redirect {
    let (pending, service) = {
        let mut controller = state.controller.lock().await;
        (controller.begin_submit(), controller.service())
    };

    if let Some(pending) = pending {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            let outcome = pending.run(service.as_ref()).await;
            state.controller.lock().await.finish_submit(outcome);
        });
    }
    back_home()
}

async fn cancel(State(state): State<Arc<AppState>>) -> Redirect {
    state.controller.lock().await.soft_reset();
    back_home()
}

async fn reset(State(state): State<Arc<AppState>>) -> Redirect {
    state.controller.lock().await.full_reset();
    back_home()
}
