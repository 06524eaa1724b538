//! List wrapper trait.

use serde::de::DeserializeOwned;

/// A list-shaped response.
///
/// The item sequence lives under [`RESULTS_KEY`](Self::RESULTS_KEY);
/// paging fields (`offset`, `hasMore`, cursors) sit next to it at the top
/// level and are read the same way in either schema mode.
pub trait ListModel: DeserializeOwned + Default {
    /// Item type of the sequence.
    type Item;

    /// Top-level key holding the items.
    const RESULTS_KEY: &'static str = "results";

    /// Items on this page.
    fn results(&self) -> &[Self::Item];

    /// Consume the wrapper, keeping only the items.
    fn into_results(self) -> Vec<Self::Item>;

    /// Number of items on this page.
    fn len(&self) -> usize {
        self.results().len()
    }

    /// Returns true if this page has no items.
    fn is_empty(&self) -> bool {
        self.results().is_empty()
    }
}
