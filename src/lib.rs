//! HubSpot CRM API client library.
//!
//! A Rust library for the HubSpot deal, deal property and association
//! endpoints. Typed entities are mapped to HTTP calls by a small generic
//! dispatcher; a serializer converts between plain entity fields and
//! HubSpot's `properties` name/value schema.
//!
//! # Quick Start
//!
//! ```no_run
//! use hubapi::{AssociationKind, Deal, HubSpotClient, ListRequestOptions};
//!
//! #[tokio::main]
//! async fn main() -> hubapi::Result<()> {
//!     // Create client from environment variables
//!     let client = HubSpotClient::from_env()?;
//!
//!     // Create a deal
//!     let deal = Deal::default().with_name("Enterprise renewal").with_amount(1000.0);
//!     let deal = client.deals().create(&deal).await?;
//!     println!("Created deal {:?}", deal.id);
//!
//!     // Link it to a company
//!     let deal = client
//!         .deals()
//!         .associate_to(deal, 184896670, AssociationKind::Company)
//!         .await?;
//!
//!     // List deals
//!     let page = client
//!         .deals()
//!         .list::<Deal>(true, &ListRequestOptions::default())
//!         .await?;
//!     println!("Found {} deals", page.deals.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`HubSpotClient`] - auth, URL building, one HTTP round trip per call
//! - [`serialize`] / [`deserialize`] - entity ↔ wire conversion, driven by [`SchemaMode`]
//! - [`DealsApi`] and [`DealPropertiesApi`] - resource facades
//!
//! Entities implement [`HubSpotModel`] (and [`DealModel`] for deals), so a
//! caller-defined struct with portal-specific properties works with every
//! deal operation.
//!
//! # Configuration
//!
//! [`HubSpotClient::from_env`] reads:
//!
//! - `HUBSPOT_ACCESS_TOKEN` - OAuth / private app token (bearer auth)
//! - `HUBSPOT_API_KEY` - legacy API key, used when no token is set
//! - `HUBSPOT_API_URL` (optional) - Base URL (defaults to `https://api.hubapi.com`)

mod api;
mod client;
mod error;
mod models;
mod pagination;
mod request;
mod serializer;
mod traits;

#[cfg(feature = "test-server")]
pub mod mock_server;

// Re-export core types
pub use client::{Credentials, HubSpotClient};
pub use error::{HubSpotError, Result};
pub use pagination::{
    ListRequestOptions, RecentRequestOptions, DEFAULT_LIST_LIMIT, DEFAULT_RECENT_LIMIT,
    MAX_LIST_LIMIT, MAX_RECENT_LIMIT,
};
pub use request::ApiRequest;
pub use reqwest::Method;
pub use serializer::{deserialize, deserialize_list, serialize, serialize_batch, SchemaMode};

// Re-export traits
pub use traits::{HubSpotModel, ListModel, PropertyBag};

// Re-export resource facades
pub use api::{DealPropertiesApi, DealsApi};

// Re-export models
pub use models::{
    // Deal types
    Deal,
    DealAssociations,
    DealList,
    DealModel,
    DealRecentList,
    // Association types
    AssociationKind,
    AssociationRecord,
    IdList,
    HUBSPOT_DEFINED,
    // Property types
    DealProperty,
    PropertyList,
    PropertyOption,
    // Search types
    FilterOperator,
    SearchFilter,
    SearchFilterGroup,
    SearchNextPage,
    SearchPaging,
    SearchRequestOptions,
    SearchResults,
    SearchSort,
    SortDirection,
    DEFAULT_SEARCH_LIMIT,
    MAX_SEARCH_LIMIT,
};
