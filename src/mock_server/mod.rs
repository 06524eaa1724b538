//! Mock HubSpot API server for E2E testing.
//!
//! This module provides an in-memory mock server that simulates the HubSpot
//! deal, association and deal property endpoints for integration and
//! end-to-end testing. Unlike wiremock which mocks at the HTTP level
//! per-test, this server maintains state across requests, so a deal created
//! in one call can be associated, listed and searched in the next.
//!
//! # Example
//!
//! ```ignore
//! use hubapi::mock_server::{MockServer, MOCK_CREDENTIAL};
//! use hubapi::{Credentials, Deal, HubSpotClient};
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let client = HubSpotClient::new(
//!         Credentials::ApiKey(MOCK_CREDENTIAL.to_string()),
//!         server.url(),
//!     )
//!     .unwrap();
//!
//!     // Server comes with default fixtures
//!     let deal: Deal = client.deals().get_by_id(1).await.unwrap().unwrap();
//!     assert_eq!(deal.dealname.as_deref(), Some("Enterprise renewal"));
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::{DefaultScenario, Fixtures};
pub use server::{MockServer, MOCK_CREDENTIAL};
pub use state::{MockState, MOCK_PORTAL_ID};
