//! HTTP request handlers for the mock server.

pub mod associations;
pub mod deals;
pub mod properties;

pub use associations::*;
pub use deals::*;
pub use properties::*;
