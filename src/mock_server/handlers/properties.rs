//! Deal property endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tokio::sync::RwLock;

use crate::mock_server::state::MockState;
use crate::DealProperty;

fn property_error(status: StatusCode, message: String) -> Response {
    (status, Json(json!({"status": "error", "message": message}))).into_response()
}

/// GET /properties/v1/deals/properties
///
/// HubSpot returns a bare array here.
pub async fn list_properties(State(state): State<Arc<RwLock<MockState>>>) -> Response {
    let state = state.read().await;
    let properties: Vec<DealProperty> = state.properties.values().cloned().collect();
    Json(properties).into_response()
}

/// GET /properties/v1/deals/properties/named/{name}
pub async fn get_property(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(name): Path<String>,
) -> Response {
    let state = state.read().await;

    match state.properties.get(&name) {
        Some(property) => Json(property.clone()).into_response(),
        None => property_error(
            StatusCode::NOT_FOUND,
            format!("Property named '{name}' does not exist"),
        ),
    }
}

/// POST /properties/v1/deals/properties
pub async fn create_property(
    State(state): State<Arc<RwLock<MockState>>>,
    Json(property): Json<DealProperty>,
) -> Response {
    if property.name.is_empty() {
        return property_error(StatusCode::BAD_REQUEST, "Property name is required".to_string());
    }

    let mut state = state.write().await;
    if state.properties.contains_key(&property.name) {
        return property_error(
            StatusCode::CONFLICT,
            format!("Property named '{}' already exists", property.name),
        );
    }
    state
        .properties
        .insert(property.name.clone(), property.clone());
    Json(property).into_response()
}

/// PUT /properties/v1/deals/properties/named/{name}
pub async fn update_property(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(name): Path<String>,
    Json(mut property): Json<DealProperty>,
) -> Response {
    let mut state = state.write().await;

    let Some(existing) = state.properties.get_mut(&name) else {
        return property_error(
            StatusCode::NOT_FOUND,
            format!("Property named '{name}' does not exist"),
        );
    };
    property.name = name;
    *existing = property.clone();
    Json(property).into_response()
}

/// DELETE /properties/v1/deals/properties/named/{name}
pub async fn delete_property(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(name): Path<String>,
) -> Response {
    let mut state = state.write().await;

    match state.properties.remove(&name) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => property_error(
            StatusCode::NOT_FOUND,
            format!("Property named '{name}' does not exist"),
        ),
    }
}
