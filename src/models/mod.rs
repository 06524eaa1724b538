//! HubSpot API model types.

mod association;
mod deal;
mod property;
mod search;

pub use association::*;
pub use deal::*;
pub use property::*;
pub use search::*;
