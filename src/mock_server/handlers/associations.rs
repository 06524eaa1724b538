//! Association endpoint handlers.

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
use crate::{AssociationKind, AssociationRecord, IdList, HUBSPOT_DEFINED};

fn unknown_definition(definition_id: u32) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "status": "error",
            "message": format!("Unsupported association definition: {definition_id}")
        })),
    )
        .into_response()
}

/// PUT /crm-associations/v1/associations
pub async fn create_association(
    State(state): State<Arc<RwLock<MockState>>>,
    Json(record): Json<AssociationRecord>,
) -> Response {
    if record.category != HUBSPOT_DEFINED {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "status": "error",
                "message": format!("Unsupported category: {}", record.category)
            })),
        )
            .into_response();
    }
    let Some(kind) = AssociationKind::from_definition_id(record.definition_id) else {
        return unknown_definition(record.definition_id);
    };

    let mut state = state.write().await;
    if state.associate(record.from_object_id, kind, record.to_object_id) {
        StatusCode::NO_CONTENT.into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(json!({
                "status": "error",
                "message": format!("Deal with id {} does not exist", record.from_object_id)
            })),
        )
            .into_response()
    }
}

/// GET /crm-associations/v1/associations/{id}/HUBSPOT_DEFINED/{definitionId}
pub async fn list_associations(
    State(state): State<Arc<RwLock<MockState>>>,
    Path((deal_id, definition_id)): Path<(i64, u32)>,
) -> Response {
    let Some(kind) = AssociationKind::from_definition_id(definition_id) else {
        return unknown_definition(definition_id);
    };

    let state = state.read().await;
    let results = state.association_ids(deal_id, kind);
    let offset = results.last().copied();

    Json(IdList {
        results,
        has_more: false,
        offset,
    })
    .into_response()
}
