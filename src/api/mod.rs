//! Resource facades over the dispatcher.

mod deals;
mod properties;

pub use deals::DealsApi;
pub use properties::DealPropertiesApi;
