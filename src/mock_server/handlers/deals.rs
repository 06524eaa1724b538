//! Deal endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Map, Value};
use tokio::sync::RwLock;

use crate::mock_server::state::MockState;
use crate::{
    deserialize, AssociationKind, Deal, PropertyBag, SchemaMode, SearchRequestOptions,
    DEFAULT_LIST_LIMIT, DEFAULT_RECENT_LIMIT, MAX_RECENT_LIMIT,
};

type SharedState = Arc<RwLock<MockState>>;

/// Paging parameters shared by the v1 list and feed endpoints.
///
/// Extracted from raw pairs because `properties` may repeat.
#[derive(Debug, Default)]
pub struct PageParams {
    pub limit: Option<usize>,
    pub offset: Option<i64>,
    pub include_associations: bool,
    pub properties: Vec<String>,
    pub since: Option<DateTime<Utc>>,
    pub include_property_versions: bool,
}

impl PageParams {
    fn from_pairs(pairs: &[(String, String)]) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "limit" | "count" => params.limit = value.parse().ok(),
                "offset" => params.offset = value.parse().ok(),
                "includeAssociations" => params.include_associations = value == "true",
                "properties" => params.properties.push(value.clone()),
                "since" => {
                    params.since = value
                        .parse()
                        .ok()
                        .and_then(|millis| Utc.timestamp_millis_opt(millis).single());
                }
                "includePropertyVersions" => params.include_property_versions = value == "true",
                _ => {}
            }
        }
        params
    }
}

/// Render a deal in the v1 shape: envelope fields at the top level,
/// properties as `{name: {value, source, versions}}`.
pub fn deal_to_v1(deal: &Deal, include_associations: bool, properties: &[String]) -> Value {
    let Ok(Value::Object(fields)) = serde_json::to_value(deal) else {
        return Value::Null;
    };

    let mut out = Map::new();
    let mut bag = Map::new();
    for (name, value) in fields {
        if name == "associations" {
            continue;
        }
        if Deal::ENVELOPE_FIELDS.contains(&name.as_str()) {
            out.insert(name, value);
        } else if properties.is_empty() || properties.contains(&name) {
            let record = json!({
                "value": value,
                "source": "API",
                "versions": [{"name": name, "value": value, "source": "API"}]
            });
            bag.insert(name, record);
        }
    }

    if include_associations {
        let ids = |kind: AssociationKind| kind.ids(&deal.associations).unwrap_or_default().to_vec();
        out.insert(
            "associations".to_string(),
            json!({
                "associatedCompanyIds": ids(AssociationKind::Company),
                "associatedVids": ids(AssociationKind::Contact),
            }),
        );
    }
    out.insert("properties".to_string(), Value::Object(bag));
    Value::Object(out)
}

/// Render a deal in the CRM v3 shape used by search.
pub fn deal_to_v3(deal: &Deal, properties: &[String]) -> Value {
    let id = deal.id.unwrap_or_default();
    let mut bag = Map::new();
    if let Ok(Value::Object(fields)) = serde_json::to_value(deal) {
        for (name, value) in fields {
            let wanted = properties.is_empty() || properties.contains(&name);
            if wanted && !Deal::ENVELOPE_FIELDS.contains(&name.as_str()) {
                bag.insert(name, value);
            }
        }
    }
    if let Some(closedate) = deal.closedate {
        if bag.contains_key("closedate") {
            let iso = closedate.to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
            bag.insert("closedate".to_string(), json!(iso));
        }
    }
    bag.insert("hs_object_id".to_string(), json!(id.to_string()));

    json!({
        "id": id.to_string(),
        "properties": bag,
        "archived": false
    })
}

fn not_found(deal_id: i64) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "status": "error",
            "message": format!("Deal with id {deal_id} does not exist")
        })),
    )
        .into_response()
}

fn bad_request(message: String) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"status": "error", "message": message})),
    )
        .into_response()
}

fn parse_deal(body: &str) -> Result<Deal, Response> {
    deserialize::<Deal>(body, SchemaMode::Properties)
        .map_err(|e| bad_request(format!("Invalid input JSON: {e}")))
}

/// POST /deals/v1/deal
pub async fn create_deal(State(state): State<SharedState>, body: String) -> Response {
    let deal = match parse_deal(&body) {
        Ok(deal) => Deal { id: None, ..deal },
        Err(response) => return response,
    };

    let mut state = state.write().await;
    let stored = state.insert_deal(deal);
    (StatusCode::OK, Json(deal_to_v1(stored, true, &[]))).into_response()
}

/// GET /deals/v1/deal/{id}
pub async fn get_deal(State(state): State<SharedState>, Path(deal_id): Path<i64>) -> Response {
    let state = state.read().await;

    match state.get_deal(deal_id) {
        Some(deal) => (StatusCode::OK, Json(deal_to_v1(deal, true, &[]))).into_response(),
        None => not_found(deal_id),
    }
}

/// PUT /deals/v1/deal/{id}
pub async fn update_deal(
    State(state): State<SharedState>,
    Path(deal_id): Path<i64>,
    body: String,
) -> Response {
    let patch = match parse_deal(&body) {
        Ok(deal) => deal,
        Err(response) => return response,
    };

    let mut state = state.write().await;
    match state.update_deal(deal_id, patch) {
        Some(deal) => (StatusCode::OK, Json(deal_to_v1(deal, true, &[]))).into_response(),
        None => not_found(deal_id),
    }
}

/// DELETE /deals/v1/deal/{id}
pub async fn delete_deal(State(state): State<SharedState>, Path(deal_id): Path<i64>) -> Response {
    let mut state = state.write().await;

    if state.delete_deal(deal_id) {
        StatusCode::NO_CONTENT.into_response()
    } else {
        not_found(deal_id)
    }
}

/// GET /deals/v1/deal/paged
pub async fn list_deals(
    State(state): State<SharedState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    let params = PageParams::from_pairs(&pairs);
    let state = state.read().await;
    let deals = state.deals_after(params.offset);
    Json(deal_page(&deals, &params)).into_response()
}

/// GET /deals/v1/deal/associated/{objectType}/{objectId}/paged
pub async fn list_associated_deals(
    State(state): State<SharedState>,
    Path((object_type, object_id)): Path<(String, i64)>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    let Some(kind) = AssociationKind::from_object_type(&object_type) else {
        return bad_request(format!("Unknown object type: {object_type}"));
    };

    let params = PageParams::from_pairs(&pairs);
    let state = state.read().await;
    let after = params.offset.unwrap_or(i64::MIN);
    let deals: Vec<&Deal> = state
        .deals_associated_with(kind, object_id)
        .into_iter()
        .filter(|deal| deal.id.is_some_and(|id| id > after))
        .collect();
    Json(deal_page(&deals, &params)).into_response()
}

/// `{deals, hasMore, offset}` where offset is the last returned deal id.
fn deal_page(deals: &[&Deal], params: &PageParams) -> Value {
    let limit = params.limit.unwrap_or(DEFAULT_LIST_LIMIT as usize);
    let page = &deals[..limit.min(deals.len())];
    let offset = page
        .last()
        .and_then(|deal| deal.id)
        .or(params.offset)
        .unwrap_or_default();

    json!({
        "deals": page
            .iter()
            .map(|deal| deal_to_v1(deal, params.include_associations, &params.properties))
            .collect::<Vec<_>>(),
        "hasMore": deals.len() > page.len(),
        "offset": offset
    })
}

/// GET /deals/v1/deal/recent/created
pub async fn recently_created(
    State(state): State<SharedState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    let params = PageParams::from_pairs(&pairs);
    let state = state.read().await;
    Json(recent_page(&state.recently_created(params.since), &params)).into_response()
}

/// GET /deals/v1/deal/recent/modified
pub async fn recently_modified(
    State(state): State<SharedState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    let params = PageParams::from_pairs(&pairs);
    let state = state.read().await;
    Json(recent_page(&state.recently_modified(params.since), &params)).into_response()
}

/// `{results, hasMore, offset, total}` where offset is a position in the feed.
///
/// Property versions are stripped unless `includePropertyVersions` was set.
fn recent_page(deals: &[&Deal], params: &PageParams) -> Value {
    let count = params
        .limit
        .unwrap_or(DEFAULT_RECENT_LIMIT as usize)
        .min(MAX_RECENT_LIMIT as usize);
    let start = usize::try_from(params.offset.unwrap_or(0))
        .unwrap_or(0)
        .min(deals.len());
    let end = start.saturating_add(count).min(deals.len());

    let render = |deal: &&Deal| {
        let mut value = deal_to_v1(deal, false, &[]);
        if !params.include_property_versions {
            if let Some(Value::Object(bag)) = value.get_mut("properties") {
                for record in bag.values_mut().filter_map(Value::as_object_mut) {
                    record.remove("versions");
                }
            }
        }
        value
    };

    json!({
        "results": deals[start..end].iter().map(render).collect::<Vec<_>>(),
        "hasMore": end < deals.len(),
        "offset": end,
        "total": deals.len()
    })
}

/// POST /crm/v3/objects/deals/search
pub async fn search_deals(
    State(state): State<SharedState>,
    Json(options): Json<SearchRequestOptions>,
) -> Response {
    let state = state.read().await;
    let matches = state.search(&options);

    let start = options
        .after
        .as_deref()
        .and_then(|after| after.parse::<usize>().ok())
        .unwrap_or(0)
        .min(matches.len());
    let end = (start + options.limit as usize).min(matches.len());

    let mut body = json!({
        "total": matches.len(),
        "results": matches[start..end]
            .iter()
            .map(|deal| deal_to_v3(deal, &options.properties))
            .collect::<Vec<_>>(),
    });
    if end < matches.len() {
        body["paging"] = json!({"next": {"after": end.to_string()}});
    }
    Json(body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored_deal() -> Deal {
        let mut deal = Deal::default().with_name("Stored").with_amount(250.0);
        deal.id = Some(9);
        deal.portal_id = Some(62515);
        deal
    }

    #[test]
    fn test_deal_to_v1_shape() {
        let value = deal_to_v1(&stored_deal(), true, &[]);
        assert_eq!(value["dealId"], 9);
        assert_eq!(value["portalId"], 62515);
        assert_eq!(value["properties"]["dealname"]["value"], "Stored");
        assert_eq!(value["properties"]["amount"]["value"], "250");
        assert_eq!(value["associations"]["associatedCompanyIds"], json!([]));
    }

    #[test]
    fn test_deal_to_v1_filters_properties() {
        let value = deal_to_v1(&stored_deal(), false, &["dealname".to_string()]);
        assert!(value["properties"].get("amount").is_none());
        assert!(value.get("associations").is_none());
    }

    #[test]
    fn test_deal_to_v1_reads_back() {
        let json = deal_to_v1(&stored_deal(), false, &[]).to_string();
        let deal: Deal = deserialize(&json, SchemaMode::Properties).unwrap();
        assert_eq!(deal, stored_deal());
    }

    #[test]
    fn test_deal_to_v3_shape() {
        let value = deal_to_v3(&stored_deal(), &[]);
        assert_eq!(value["id"], "9");
        assert_eq!(value["properties"]["dealname"], "Stored");
        assert_eq!(value["properties"]["hs_object_id"], "9");
    }

    #[test]
    fn test_deal_to_v3_close_date_is_iso() {
        let close = Utc.timestamp_millis_opt(1_575_737_406_678).unwrap();
        let deal = stored_deal().with_close_date(close);

        let value = deal_to_v3(&deal, &[]);
        assert_eq!(value["properties"]["closedate"], "2019-12-07T16:50:06.678Z");

        let back: Deal = deserialize(&value.to_string(), SchemaMode::Properties).unwrap();
        assert_eq!(back.closedate, Some(close));
    }

    #[test]
    fn test_recent_page_clamps_count() {
        let deal = stored_deal();
        let pairs = vec![
            ("count".to_string(), usize::MAX.to_string()),
            ("offset".to_string(), "1".to_string()),
        ];

        let page = recent_page(&[&deal, &deal], &PageParams::from_pairs(&pairs));
        assert_eq!(page["results"].as_array().unwrap().len(), 1);
        assert_eq!(page["hasMore"], false);
        assert_eq!(page["offset"], 2);
    }

    #[test]
    fn test_recent_page_property_versions() {
        let deal = stored_deal();

        let page = recent_page(&[&deal], &PageParams::default());
        assert!(page["results"][0]["properties"]["dealname"]
            .get("versions")
            .is_none());

        let params = PageParams::from_pairs(&[
            ("includePropertyVersions".to_string(), "true".to_string()),
            ("since".to_string(), "1463680280365".to_string()),
        ]);
        assert_eq!(params.since.map(|s| s.timestamp_millis()), Some(1_463_680_280_365));
        let page = recent_page(&[&deal], &params);
        assert!(page["results"][0]["properties"]["dealname"]["versions"].is_array());
    }

    #[test]
    fn test_page_params_repeated_properties() {
        let pairs = vec![
            ("limit".to_string(), "5".to_string()),
            ("properties".to_string(), "dealname".to_string()),
            ("properties".to_string(), "amount".to_string()),
            ("includeAssociations".to_string(), "true".to_string()),
        ];
        let params = PageParams::from_pairs(&pairs);
        assert_eq!(params.limit, Some(5));
        assert_eq!(params.properties, vec!["dealname", "amount"]);
        assert!(params.include_associations);
    }

    #[test]
    fn test_deal_page_offsets() {
        let mut first = stored_deal();
        first.id = Some(1);
        let mut second = stored_deal();
        second.id = Some(2);
        let params = PageParams {
            limit: Some(1),
            ..Default::default()
        };

        let page = deal_page(&[&first, &second], &params);
        assert_eq!(page["hasMore"], true);
        assert_eq!(page["offset"], 1);
        assert_eq!(page["deals"].as_array().unwrap().len(), 1);
    }
}
