pub mod pipeline;

use axum::extract::{Form, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use inference_client::HfInferenceClient;
use instagram_client::ScrapeClient;
use moodscope_core::AppConfig;
use report::{html, SnapshotStore};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// Shared application state: configuration plus the three external-service
/// clients. Everything is immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub scraper: Arc<ScrapeClient>,
    pub inference: Arc<HfInferenceClient>,
    pub store: Arc<SnapshotStore>,
    /// Plain client for profile pages and image downloads.
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let scraper = ScrapeClient::new(config.apify_token.clone(), config.actor_id.clone())
            .with_run_wait(
                Duration::from_secs(config.run_wait_secs),
                Duration::from_secs(config.run_poll_secs),
            );
        let inference = HfInferenceClient::new(
            config.hf_token.clone(),
            config.emotion_model.clone(),
            config.sentiment_model.clone(),
        );
        let store = SnapshotStore::new(config.snapshot_path.clone());
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config: Arc::new(config),
            scraper: Arc::new(scraper),
            inference: Arc::new(inference),
            store: Arc::new(store),
            http,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index).post(analyze))
        .route("/display", get(display))
        .route("/static/:file", get(static_file))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct AnalyzeForm {
    #[serde(rename = "profileUrl")]
    profile_url: String,
}

async fn index() -> Html<String> {
    Html(html::index_page())
}

/// The whole analysis pipeline runs inside this handler; failures are
/// logged and surface as a 500 with a generic message.
async fn analyze(State(state): State<AppState>, Form(form): Form<AnalyzeForm>) -> Response {
    info!("Analyzing profile {}", form.profile_url);

    let username =
        match instagram_client::fetch_username(&state.http, &form.profile_url).await {
            Ok(username) => username,
            Err(e) => {
                error!("Failed to extract username: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An error occurred while fetching the username.",
                )
                    .into_response();
            }
        };

    match pipeline::analyze_profile(&state, &username, &form.profile_url).await {
        Ok(snapshot) => {
            info!(
                "Report for {} saved: {} posts, state {}",
                snapshot.username, snapshot.posts, snapshot.psychological_state
            );
            (StatusCode::OK, "The profile data has been scraped and saved.").into_response()
        }
        Err(e) => {
            error!("Profile analysis failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An error occurred while fetching the profile.",
            )
                .into_response()
        }
    }
}

async fn display(State(state): State<AppState>) -> Response {
    match state.store.load().await {
        Ok(snapshot) => Html(html::display_page(&snapshot)).into_response(),
        Err(e) => {
            error!("Failed to load report snapshot: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "No report has been generated yet.",
            )
                .into_response()
        }
    }
}

async fn static_file(State(state): State<AppState>, Path(file): Path<String>) -> Response {
    if !is_safe_filename(&file) {
        return StatusCode::NOT_FOUND.into_response();
    }

    let path = state.config.static_dir.join(&file);
    match tokio::fs::read(&path).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, content_type_for(&file))], bytes).into_response(),
        Err(_) => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Only bare filenames are served; anything that could escape the static
/// directory is rejected.
fn is_safe_filename(name: &str) -> bool {
    !name.is_empty() && !name.contains(['/', '\\']) && !name.contains("..")
}

fn content_type_for(name: &str) -> &'static str {
    match name.rsplit('.').next() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}
