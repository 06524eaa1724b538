//! CRM v3 search request and response types.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::pagination::check_limit;
use crate::traits::{ListModel, PropertyBag};

/// Default page size for search requests.
pub const DEFAULT_SEARCH_LIMIT: u32 = 100;

/// Largest page size the search endpoint accepts.
pub const MAX_SEARCH_LIMIT: u32 = 100;

/// Body of a CRM search request. Sent as-is.
///
/// # Example
///
/// ```
/// use hubapi::{FilterOperator, SearchFilter, SearchRequestOptions};
///
/// let opts = SearchRequestOptions::default()
///     .with_filter_group(vec![SearchFilter::new("dealstage", FilterOperator::Eq, "closedwon")])
///     .with_properties(["dealname", "amount"]);
/// assert_eq!(opts.limit, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequestOptions {
    /// Filter groups; groups are ORed, filters within a group are ANDed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filter_groups: Vec<SearchFilterGroup>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sorts: Vec<SearchSort>,

    /// Free-text query over the default searchable properties.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,

    /// Properties to return for each result.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<String>,

    /// Number of results per page (1..=100).
    pub limit: u32,

    /// Cursor from the previous page's `paging.next.after`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
}

impl Default for SearchRequestOptions {
    fn default() -> Self {
        Self {
            filter_groups: Vec::new(),
            sorts: Vec::new(),
            query: None,
            properties: Vec::new(),
            limit: DEFAULT_SEARCH_LIMIT,
            after: None,
        }
    }
}

impl SearchRequestOptions {
    /// Add a group of ANDed filters.
    #[must_use]
    pub fn with_filter_group(mut self, filters: Vec<SearchFilter>) -> Self {
        self.filter_groups.push(SearchFilterGroup { filters });
        self
    }

    /// Add a sort.
    #[must_use]
    pub fn with_sort(mut self, property_name: impl Into<String>, direction: SortDirection) -> Self {
        self.sorts.push(SearchSort {
            property_name: property_name.into(),
            direction,
        });
        self
    }

    /// Set the free-text query.
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Set the returned properties.
    #[must_use]
    pub fn with_properties<I, S>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.properties = properties.into_iter().map(Into::into).collect();
        self
    }

    /// Continue after a cursor.
    #[must_use]
    pub fn with_after(mut self, after: impl Into<String>) -> Self {
        self.after = Some(after.into());
        self
    }

    /// Check the limit range.
    ///
    /// # Errors
    ///
    /// Returns [`HubSpotError::Validation`](crate::HubSpotError::Validation)
    /// when the limit is 0 or above 100.
    pub fn validate(&self) -> Result<()> {
        check_limit(self.limit, MAX_SEARCH_LIMIT)
    }
}

impl PropertyBag for SearchRequestOptions {}

/// ANDed filters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchFilterGroup {
    pub filters: Vec<SearchFilter>,
}

/// A single property filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilter {
    pub property_name: String,
    pub operator: FilterOperator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Upper bound for [`FilterOperator::Between`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_value: Option<String>,
    /// Candidates for [`FilterOperator::In`] and [`FilterOperator::NotIn`].
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
}

impl SearchFilter {
    /// Compare a property against one value.
    pub fn new(
        property_name: impl Into<String>,
        operator: FilterOperator,
        value: impl Into<String>,
    ) -> Self {
        Self {
            property_name: property_name.into(),
            operator,
            value: Some(value.into()),
            high_value: None,
            values: Vec::new(),
        }
    }

    /// Test whether a property is set.
    pub fn has_property(property_name: impl Into<String>) -> Self {
        Self {
            property_name: property_name.into(),
            operator: FilterOperator::HasProperty,
            value: None,
            high_value: None,
            values: Vec::new(),
        }
    }
}

/// Filter comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterOperator {
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    Between,
    In,
    NotIn,
    HasProperty,
    NotHasProperty,
    ContainsToken,
    NotContainsToken,
}

/// Sort on one property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSort {
    pub property_name: String,
    pub direction: SortDirection,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// A page of search results.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResults<T> {
    /// Total number of matches.
    #[serde(default)]
    pub total: u64,
    /// Matches on this page.
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paging: Option<SearchPaging>,
}

impl<T> SearchResults<T> {
    /// Cursor for the next page, if any.
    pub fn next_after(&self) -> Option<&str> {
        self.paging
            .as_ref()
            .and_then(|p| p.next.as_ref())
            .map(|n| n.after.as_str())
    }
}

impl<T: serde::de::DeserializeOwned + Default> ListModel for SearchResults<T> {
    type Item = T;

    fn results(&self) -> &[T] {
        &self.results
    }

    fn into_results(self) -> Vec<T> {
        self.results
    }
}

/// Paging block of a search response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPaging {
    #[serde(default)]
    pub next: Option<SearchNextPage>,
}

/// Cursor to the next search page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchNextPage {
    pub after: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}
