//! Mock HubSpot API server.
//!
//! Provides an axum-based HTTP server that simulates the HubSpot deal,
//! association and deal property endpoints.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::fixtures::{DefaultScenario, Fixtures};
use super::handlers;
use super::state::MockState;

/// Credential accepted by a server started with [`MockServer::start`].
pub const MOCK_CREDENTIAL: &str = "mock-token";

/// A mock HubSpot API server for testing.
///
/// The server runs in the background and can be used to test the HubSpot
/// client against a stateful API implementation.
pub struct MockServer {
    /// The URL where the server is listening.
    url: String,
    /// Handle to the server task.
    handle: JoinHandle<()>,
    /// Shared state that can be modified during tests.
    state: Arc<RwLock<MockState>>,
}

impl MockServer {
    /// Start a new mock server with default fixtures.
    ///
    /// Requests must carry [`MOCK_CREDENTIAL`] as `hapikey` or bearer token.
    pub async fn start() -> Self {
        Self::with_state(Self::default_state()).await
    }

    /// Start a mock server with empty state and no credential check.
    ///
    /// Useful when you want to control exactly what data is available.
    pub async fn start_empty() -> Self {
        Self::with_state(MockState::new()).await
    }

    /// Start a mock server with custom state.
    pub async fn with_state(state: MockState) -> Self {
        let shared_state = state.shared();
        let app = Self::create_router(shared_state.clone());

        // Bind to a random available port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to address");
        let addr = listener.local_addr().expect("Failed to get local address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server error");
        });

        Self {
            url: format!("http://{}", addr),
            handle,
            state: shared_state,
        }
    }

    /// Get the base URL of the mock server.
    ///
    /// Use this URL when creating a `HubSpotClient` for testing.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get access to the server's shared state.
    ///
    /// This allows modifying the mock data during a test.
    pub fn state(&self) -> Arc<RwLock<MockState>> {
        self.state.clone()
    }

    /// Shutdown the server.
    ///
    /// This aborts the server task. It's safe to call multiple times.
    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }

    /// Create the default state with common test fixtures.
    fn default_state() -> MockState {
        Self::state_from_scenario(Fixtures::default_scenario())
            .with_required_credential(MOCK_CREDENTIAL)
    }

    /// Create state from a scenario.
    fn state_from_scenario(scenario: DefaultScenario) -> MockState {
        let state = scenario
            .deals
            .into_iter()
            .fold(MockState::new(), MockState::with_deal);

        scenario
            .properties
            .into_iter()
            .fold(state, MockState::with_property)
    }

    /// Create the axum router with all routes.
    pub(crate) fn create_router(state: Arc<RwLock<MockState>>) -> Router {
        Router::new()
            // Deal routes
            .route("/deals/v1/deal", post(handlers::create_deal))
            .route("/deals/v1/deal/paged", get(handlers::list_deals))
            .route(
                "/deals/v1/deal/:id",
                get(handlers::get_deal)
                    .put(handlers::update_deal)
                    .delete(handlers::delete_deal),
            )
            .route(
                "/deals/v1/deal/associated/:object_type/:object_id/paged",
                get(handlers::list_associated_deals),
            )
            .route(
                "/deals/v1/deal/recent/created",
                get(handlers::recently_created),
            )
            .route(
                "/deals/v1/deal/recent/modified",
                get(handlers::recently_modified),
            )
            .route("/crm/v3/objects/deals/search", post(handlers::search_deals))
            // Association routes
            .route(
                "/crm-associations/v1/associations",
                put(handlers::create_association),
            )
            .route(
                "/crm-associations/v1/associations/:id/HUBSPOT_DEFINED/:definition_id",
                get(handlers::list_associations),
            )
            // Property routes
            .route(
                "/properties/v1/deals/properties",
                get(handlers::list_properties).post(handlers::create_property),
            )
            .route(
                "/properties/v1/deals/properties/named/:name",
                get(handlers::get_property)
                    .put(handlers::update_property)
                    .delete(handlers::delete_property),
            )
            .layer(middleware::from_fn_with_state(
                state.clone(),
                require_credential,
            ))
            // Health check
            .route("/health", get(health_check))
            .with_state(state)
    }
}

/// Reject requests without the configured `hapikey` or bearer token.
async fn require_credential(
    State(state): State<Arc<RwLock<MockState>>>,
    request: Request,
    next: Next,
) -> Response {
    let required = state.read().await.required_credential.clone();

    if let Some(expected) = required {
        let bearer_ok = request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .is_some_and(|token| token == expected);
        let key_ok = request.uri().query().is_some_and(|query| {
            url::form_urlencoded::parse(query.as_bytes())
                .any(|(key, value)| key == "hapikey" && value == expected.as_str())
        });

        if !bearer_ok && !key_ok {
            return (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({
                    "status": "error",
                    "message": "Authentication credentials not found.",
                    "category": "INVALID_AUTHENTICATION"
                })),
            )
                .into_response();
        }
    }

    next.run(request).await
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "ok"
}
