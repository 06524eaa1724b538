//! Capability traits shared by HubSpot models.
//!
//! The serializer and dispatcher are generic over these traits, so a
//! caller-defined record works anywhere a built-in model does.

mod list;
mod model;

pub use list::ListModel;
pub use model::{HubSpotModel, PropertyBag};
