pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod sse;

use axum::http::Request;
use axum::Router;
use middleware::correlation::CorrelationId;
use revu_core::{Hub, RevuError};
use revu_db::schema;
use revu_db::store::DbStore;
use revu_events::EventBus;
use tokio::net::TcpListener;

#[derive(Clone)]
pub struct AppState {
    pub db_path: String,
    pub event_bus: EventBus,
}

pub fn build_hub(state: &AppState) -> Result<Hub<DbStore>, RevuError> {
    let conn = schema::open_and_migrate(&state.db_path).map_err(|err| RevuError::Internal {
        message: err.to_string(),
    })?;
    let store = DbStore::new(conn);
    Ok(Hub::new(store, state.event_bus.clone()))
}

pub fn correlation_id_from_request<B>(request: &Request<B>) -> Option<String> {
    request
        .extensions()
        .get::<CorrelationId>()
        .map(|value| value.0.clone())
}

pub fn app(state: AppState) -> Router {
    routes::router(state)
}

pub async fn serve(state: AppState, addr: std::net::SocketAddr) -> Result<(), std::io::Error> {
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app(state)).await
}
