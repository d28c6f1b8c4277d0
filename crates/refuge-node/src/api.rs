//! HTTP API for Refuge.

use crate::error::Error;
use crate::node::NodeState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use refuge_core::{Shelter, ShelterId, ShelterRecord};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

type AppState = Arc<RwLock<NodeState>>;

/// Build the API router.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        // Shelters
        .route("/api/abrigos", get(list_shelters))
        .route("/api/abrigos/:id", get(get_shelter).put(replace_shelter))
        .route("/api/abrigos/:id/checkin", post(check_in))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Status code for a failed storage or capacity operation.
fn status_for(e: &Error) -> StatusCode {
    match e {
        Error::Core(refuge_core::Error::ShelterNotFound(_)) => StatusCode::NOT_FOUND,
        Error::Core(refuge_core::Error::ShelterFull(_)) => StatusCode::CONFLICT,
        Error::Core(refuge_core::Error::InvalidCapacity { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
        other => {
            tracing::error!("Request failed: {}", other);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

// --- Health endpoints ---

async fn health() -> &'static str {
    "OK"
}

async fn ready() -> &'static str {
    "OK"
}

// --- Shelter endpoints ---

async fn list_shelters(
    State(state): State<AppState>,
) -> Result<Json<Vec<ShelterRecord>>, StatusCode> {
    let state = state.read().await;
    let shelters = state.storage.list_shelters().map_err(|e| status_for(&e))?;
    Ok(Json(shelters.iter().map(ShelterRecord::from).collect()))
}

async fn get_shelter(
    State(state): State<AppState>,
    Path(id): Path<ShelterId>,
) -> Result<Json<ShelterRecord>, StatusCode> {
    let state = state.read().await;
    match state.storage.get_shelter(id) {
        Ok(Some(shelter)) => Ok(Json(ShelterRecord::from(&shelter))),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => Err(status_for(&e)),
    }
}

async fn replace_shelter(
    State(state): State<AppState>,
    Path(id): Path<ShelterId>,
    Json(record): Json<ShelterRecord>,
) -> Result<Json<ShelterRecord>, StatusCode> {
    if record.id != id {
        return Err(StatusCode::BAD_REQUEST);
    }

    let state = state.write().await;
    match state.storage.get_shelter(id) {
        Ok(Some(_)) => {}
        Ok(None) => return Err(StatusCode::NOT_FOUND),
        Err(e) => return Err(status_for(&e)),
    }

    let shelter = Shelter::try_from(record).map_err(|e| {
        tracing::debug!("Rejected update for shelter {}: {}", id, e);
        StatusCode::UNPROCESSABLE_ENTITY
    })?;
    state.storage.put_shelter(&shelter).map_err(|e| status_for(&e))?;
    tracing::info!(
        "Shelter {} updated ({}/{})",
        id,
        shelter.occupancy(),
        shelter.capacity()
    );

    Ok(Json(ShelterRecord::from(&shelter)))
}

async fn check_in(
    State(state): State<AppState>,
    Path(id): Path<ShelterId>,
) -> Result<Json<ShelterRecord>, StatusCode> {
    let state = state.write().await;
    let shelter = state.storage.check_in_shelter(id).map_err(|e| status_for(&e))?;
    tracing::info!(
        "Check-in at shelter {} ({}/{})",
        id,
        shelter.occupancy(),
        shelter.capacity()
    );
    Ok(Json(ShelterRecord::from(&shelter)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_errors_map_to_statuses() {
        let full = Error::from(refuge_core::Error::ShelterFull(1));
        let missing = Error::from(refuge_core::Error::ShelterNotFound(1));
        let invalid = Error::from(refuge_core::Error::InvalidCapacity {
            capacity: 1,
            occupancy: 2,
        });

        assert_eq!(status_for(&full), StatusCode::CONFLICT);
        assert_eq!(status_for(&missing), StatusCode::NOT_FOUND);
        assert_eq!(status_for(&invalid), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            status_for(&Error::Storage("disk".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
