use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{StatusCode, Uri};
use serde::de::DeserializeOwned;

use crate::store::{Content, Selection, Status, Topic, Viewport};
use crate::transport::http::SharedStore;
use crate::utils::error::ApiError;

/// Parses a facet from a raw request body.
///
/// Bodies are read as bytes rather than through the `Json` extractor so that
/// clients which omit or mislabel `Content-Type` are still served.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!("rejected request body ({} bytes): {}", body.len(), e);
        ApiError::from(e)
    })
}

/// GET /status
pub async fn get_status(State(store): State<SharedStore>) -> Json<Status> {
    Json(store.status())
}

/// POST /topic
pub async fn create_topic(State(store): State<SharedStore>) -> Result<Json<Topic>, ApiError> {
    let topic = store.create()?;
    tracing::info!("created topic {}", topic.id);
    Ok(Json(topic))
}

/// GET /topic
pub async fn list_topics(State(store): State<SharedStore>) -> Json<Vec<Topic>> {
    Json(store.list())
}

/// DELETE /topic/{id}
pub async fn delete_topic(State(store): State<SharedStore>, Path(id): Path<String>) -> StatusCode {
    store.delete(&id);
    StatusCode::NO_CONTENT
}

/// GET /topic/{id}/content
pub async fn get_content(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> Result<Json<Content>, ApiError> {
    Ok(Json(store.get_content(&id)?))
}

/// PUT /topic/{id}/content
pub async fn put_content(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let content: Content = parse_body(&body)?;
    store.set_content(&id, content)?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /topic/{id}/viewport
pub async fn get_viewport(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> Result<Json<Viewport>, ApiError> {
    Ok(Json(store.get_viewport(&id)?))
}

/// PUT /topic/{id}/viewport
pub async fn put_viewport(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let viewport: Viewport = parse_body(&body)?;
    store.set_viewport(&id, viewport)?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /topic/{id}/selection
pub async fn get_selection(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> Result<Json<Selection>, ApiError> {
    Ok(Json(store.get_selection(&id)?))
}

/// PUT /topic/{id}/selection
pub async fn put_selection(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let selection: Selection = parse_body(&body)?;
    store.set_selection(&id, selection)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("no route for {}", uri.path()))
}
