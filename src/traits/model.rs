//! Entity traits.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// A value that can be sent in the HubSpot properties schema.
///
/// In [`SchemaMode::Properties`](crate::SchemaMode::Properties) every
/// serialized field is moved into a `properties` array of `{name, value}`
/// pairs, except the wire keys listed in [`ENVELOPE_FIELDS`](Self::ENVELOPE_FIELDS).
/// Request bodies that are only ever sent in plain mode keep the default.
pub trait PropertyBag: Serialize {
    /// Wire keys that stay at the top level of the payload.
    const ENVELOPE_FIELDS: &'static [&'static str] = &[];
}

/// A remote resource with a fixed route.
///
/// # Example
///
/// ```
/// use hubapi::{HubSpotModel, PropertyBag};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Default, Serialize, Deserialize)]
/// struct Ticket {
///     #[serde(rename = "objectId", skip_serializing_if = "Option::is_none")]
///     id: Option<i64>,
///     #[serde(skip_serializing_if = "Option::is_none")]
///     subject: Option<String>,
/// }
///
/// impl PropertyBag for Ticket {
///     const ENVELOPE_FIELDS: &'static [&'static str] = &["objectId"];
/// }
///
/// impl HubSpotModel for Ticket {
///     const ROUTE_BASE_PATH: &'static str = "/crm-objects/v1/objects/tickets";
/// }
/// ```
pub trait HubSpotModel: PropertyBag + DeserializeOwned + Default {
    /// Path prefix for this resource, e.g. `/deals/v1`.
    const ROUTE_BASE_PATH: &'static str;
}
