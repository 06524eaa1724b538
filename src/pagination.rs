//! Paging options for HubSpot list endpoints.

use chrono::{DateTime, Utc};

use crate::error::{HubSpotError, Result};

/// Default page size for paged list endpoints.
pub const DEFAULT_LIST_LIMIT: u32 = 250;

/// Largest page size the paged list endpoints accept.
pub const MAX_LIST_LIMIT: u32 = 250;

/// Default page size for the recently created/modified feeds.
pub const DEFAULT_RECENT_LIMIT: u32 = 20;

/// Largest page size the recent feeds accept.
pub const MAX_RECENT_LIMIT: u32 = 100;

/// Options for paged list requests.
///
/// # Example
///
/// ```
/// use hubapi::ListRequestOptions;
///
/// let opts = ListRequestOptions::default()
///     .with_offset(10)
///     .with_properties(["dealname", "amount"]);
/// assert_eq!(opts.limit, 250);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequestOptions {
    /// Number of items per page (1..=250).
    pub limit: u32,
    /// Continuation offset returned by the previous page.
    pub offset: Option<i64>,
    /// Property names to include in each item. Empty means the server default.
    pub properties_to_include: Vec<String>,
}

impl Default for ListRequestOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIST_LIMIT,
            offset: None,
            properties_to_include: Vec::new(),
        }
    }
}

impl ListRequestOptions {
    /// Options with the given page size.
    #[must_use]
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            ..Default::default()
        }
    }

    /// Continue from a previous page.
    #[must_use]
    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Restrict the returned properties.
    #[must_use]
    pub fn with_properties<I, S>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.properties_to_include = properties.into_iter().map(Into::into).collect();
        self
    }

    /// Check the limit range.
    ///
    /// # Errors
    ///
    /// Returns [`HubSpotError::Validation`] when the limit is 0 or above 250.
    pub fn validate(&self) -> Result<()> {
        check_limit(self.limit, MAX_LIST_LIMIT)
    }

    /// Query pairs for this page: `limit`, then `offset` and one
    /// `properties` pair per name when set.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("limit", self.limit.to_string())];
        if let Some(offset) = self.offset {
            pairs.push(("offset", offset.to_string()));
        }
        pairs.extend(
            self.properties_to_include
                .iter()
                .map(|name| ("properties", name.clone())),
        );
        pairs
    }
}

/// Options for the recently created/modified feeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentRequestOptions {
    /// Number of items per page (1..=100), sent as `count`.
    pub limit: u32,
    /// Continuation offset returned by the previous page.
    pub offset: Option<i64>,
    /// Only return items changed after this instant.
    pub since: Option<DateTime<Utc>>,
    /// Include the version history of each property.
    pub include_property_versions: bool,
}

impl Default for RecentRequestOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_RECENT_LIMIT,
            offset: None,
            since: None,
            include_property_versions: false,
        }
    }
}

impl RecentRequestOptions {
    /// Options with a page size and no offset.
    #[must_use]
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            ..Default::default()
        }
    }

    /// Continue from a previous page's offset.
    #[must_use]
    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Only return deals changed after `since`.
    #[must_use]
    pub fn with_since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    /// Ask for the version history of each property.
    #[must_use]
    pub fn with_property_versions(mut self) -> Self {
        self.include_property_versions = true;
        self
    }

    /// Check the limit range.
    ///
    /// # Errors
    ///
    /// Returns [`HubSpotError::Validation`] when the limit is 0 or above 100.
    pub fn validate(&self) -> Result<()> {
        check_limit(self.limit, MAX_RECENT_LIMIT)
    }

    /// Query pairs for this feed page.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("count", self.limit.to_string())];
        if let Some(offset) = self.offset {
            pairs.push(("offset", offset.to_string()));
        }
        if self.include_property_versions {
            pairs.push(("includePropertyVersions", "true".to_string()));
        }
        if let Some(since) = self.since {
            pairs.push(("since", since.timestamp_millis().to_string()));
        }
        pairs
    }
}

pub(crate) fn check_limit(limit: u32, max: u32) -> Result<()> {
    if limit == 0 || limit > max {
        return Err(HubSpotError::Validation(format!(
            "limit must be between 1 and {max}, got {limit}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_list_defaults_send_limit_only() {
        let pairs = ListRequestOptions::default().query_pairs();
        assert_eq!(pairs, vec![("limit", "250".to_string())]);
    }

    #[test]
    fn test_list_offset_and_properties() {
        let pairs = ListRequestOptions::new(50)
            .with_offset(10)
            .with_properties(["dealname", "amount"])
            .query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("limit", "50".to_string()),
                ("offset", "10".to_string()),
                ("properties", "dealname".to_string()),
                ("properties", "amount".to_string()),
            ]
        );
    }

    #[test]
    fn test_list_limit_bounds() {
        assert!(ListRequestOptions::new(1).validate().is_ok());
        assert!(ListRequestOptions::new(250).validate().is_ok());
        assert!(matches!(
            ListRequestOptions::new(0).validate(),
            Err(HubSpotError::Validation(_))
        ));
        assert!(ListRequestOptions::new(251).validate().is_err());
    }

    #[test]
    fn test_recent_query_pairs() {
        let opts = RecentRequestOptions {
            offset: Some(40),
            since: Some(Utc.timestamp_millis_opt(1_463_680_280_365).unwrap()),
            include_property_versions: true,
            ..Default::default()
        };
        assert_eq!(
            opts.query_pairs(),
            vec![
                ("count", "20".to_string()),
                ("offset", "40".to_string()),
                ("includePropertyVersions", "true".to_string()),
                ("since", "1463680280365".to_string()),
            ]
        );
    }

    #[test]
    fn test_recent_new_keeps_other_defaults() {
        let opts = RecentRequestOptions::new(5).with_property_versions();
        assert_eq!(opts.limit, 5);
        assert_eq!(opts.offset, None);
        assert_eq!(opts.since, None);
        assert_eq!(
            opts.query_pairs(),
            vec![
                ("count", "5".to_string()),
                ("includePropertyVersions", "true".to_string()),
            ]
        );
    }

    #[test]
    fn test_recent_limit_bounds() {
        let opts = RecentRequestOptions {
            limit: 101,
            ..Default::default()
        };
        assert!(opts.validate().is_err());
        assert!(RecentRequestOptions::default().validate().is_ok());
    }
}
