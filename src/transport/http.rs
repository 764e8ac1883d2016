use std::sync::Arc;

use axum::Router;
use axum::body::HttpBody;
use axum::extract::Request;
use axum::http::{HeaderValue, header};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{delete, get};
use tokio::net::TcpListener;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::store::TopicStore;
use crate::transport::handlers;

/// Handle to the store shared by every request handler.
pub type SharedStore = Arc<TopicStore>;

/// Builds the router for the topic API.
///
/// Every response with a body is labelled `application/json` unless the
/// handler already set a content type; bodiless replies (204, axum's 405)
/// carry no content type. Every request is logged.
pub fn router(store: SharedStore) -> Router {
    Router::new()
        .route("/status", get(handlers::get_status))
        .route(
            "/topic",
            get(handlers::list_topics).post(handlers::create_topic),
        )
        .route("/topic/{id}", delete(handlers::delete_topic))
        .route(
            "/topic/{id}/content",
            get(handlers::get_content).put(handlers::put_content),
        )
        .route(
            "/topic/{id}/viewport",
            get(handlers::get_viewport).put(handlers::put_viewport),
        )
        .route(
            "/topic/{id}/selection",
            get(handlers::get_selection).put(handlers::put_selection),
        )
        .fallback(handlers::not_found)
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CONTENT_TYPE,
            json_content_type,
        ))
        .layer(middleware::from_fn(log_requests))
        .with_state(store)
}

fn json_content_type(response: &Response) -> Option<HeaderValue> {
    let empty = response.body().size_hint().exact() == Some(0);
    (!empty).then(|| HeaderValue::from_static("application/json"))
}

async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    tracing::info!("{} {}", method, uri);

    let response = next.run(request).await;
    tracing::debug!("{} {} -> {}", method, uri, response.status());
    response
}

/// Binds `addr` and serves the topic API until Ctrl-C is received.
pub async fn serve(addr: &str, store: SharedStore) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(store))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
