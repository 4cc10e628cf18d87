//! Routes for the contact resource and the app shell

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use contacts_config::ServerConfig;
use contacts_fields::{Record, RecordId};
use contacts_store::RecordStore;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::error::ApiError;

/// Shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }
}

/// The API under `/api/contact`, static files and the shell for everything else.
pub fn router(state: AppState, config: &ServerConfig) -> Router {
    let api = Router::new()
        .route("/", get(list_contacts).post(create_contact))
        .route(
            "/:id",
            get(show_contact).put(update_contact).delete(delete_contact),
        )
        .with_state(state);

    let statics = ServeDir::new(&config.static_dir).fallback(ServeFile::new(config.shell_path()));

    Router::new()
        .nest("/api/contact", api)
        .fallback_service(statics)
        .layer(TraceLayer::new_for_http())
}

fn parse_id(raw: &str) -> Result<RecordId, ApiError> {
    raw.parse().map_err(|_| ApiError::InvalidId {
        raw: raw.to_string(),
    })
}

async fn list_contacts(State(state): State<AppState>) -> Result<Json<Vec<Record>>, ApiError> {
    Ok(Json(state.store.query().await?))
}

async fn create_contact(
    State(state): State<AppState>,
    Json(mut record): Json<Record>,
) -> Result<(StatusCode, Json<Record>), ApiError> {
    // The store assigns ids.
    record.set_id(None);
    let created = state.store.save(&record).await?;
    debug!(id = ?created.id(), "contact created");
    Ok((StatusCode::CREATED, Json(created)))
}

async fn show_contact(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Json<Record>, ApiError> {
    let id = parse_id(&raw)?;
    Ok(Json(state.store.get(id).await?))
}

async fn update_contact(
    State(state): State<AppState>,
    Path(raw): Path<String>,
    Json(mut record): Json<Record>,
) -> Result<Json<Record>, ApiError> {
    let id = parse_id(&raw)?;
    record.set_id(Some(id));
    Ok(Json(state.store.update(&record).await?))
}

async fn delete_contact(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&raw)?;
    state
        .store
        .delete(&Record::new().with_id(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
