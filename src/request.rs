//! Request descriptions handed to the dispatcher.

use reqwest::Method;

use crate::error::Result;
use crate::serializer::{self, SchemaMode};
use crate::traits::PropertyBag;

/// One HTTP call against the HubSpot API, before auth is applied.
///
/// Paths are relative to the client's base URL. Query pairs keep their
/// order and may repeat a key.
///
/// # Example
///
/// ```
/// use hubapi::{ApiRequest, Deal, SchemaMode};
///
/// # fn example() -> hubapi::Result<()> {
/// let deal = Deal::default().with_name("Renewal");
/// let request = ApiRequest::post("/deals/v1/deal").json(&deal, SchemaMode::Properties)?;
/// assert!(request.body().is_some());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<String>,
}

impl ApiRequest {
    /// Create a request with no query and no body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// A GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// A POST request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// A PUT request.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// A DELETE request.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append a query pair.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Append several query pairs.
    #[must_use]
    pub fn query_pairs<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity cannot be serialized.
    pub fn json<B: PropertyBag>(mut self, body: &B, mode: SchemaMode) -> Result<Self> {
        self.body = Some(serializer::serialize(body, mode)?);
        Ok(self)
    }

    /// Attach a JSON array body built from a list of entities.
    ///
    /// # Errors
    ///
    /// Returns an error if any entity cannot be serialized.
    pub fn json_batch<B: PropertyBag>(mut self, bodies: &[B], mode: SchemaMode) -> Result<Self> {
        self.body = Some(serializer::serialize_batch(bodies, mode)?);
        Ok(self)
    }

    /// HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Path relative to the base URL.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Query pairs in insertion order.
    pub fn query_params(&self) -> &[(String, String)] {
        &self.query
    }

    /// Serialized JSON body, if any.
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Deal;

    #[test]
    fn test_query_keeps_order_and_repeats() {
        let request = ApiRequest::get("/deals/v1/deal/paged")
            .query("limit", 250)
            .query_pairs([("properties", "dealname"), ("properties", "amount")]);

        assert_eq!(request.method(), &Method::GET);
        assert_eq!(
            request.query_params(),
            &[
                ("limit".to_string(), "250".to_string()),
                ("properties".to_string(), "dealname".to_string()),
                ("properties".to_string(), "amount".to_string()),
            ]
        );
        assert!(request.body().is_none());
    }

    #[test]
    fn test_json_body_uses_schema_mode() {
        let deal = Deal::default().with_name("Test");
        let plain = ApiRequest::post("/x").json(&deal, SchemaMode::Plain).unwrap();
        let bag = ApiRequest::post("/x")
            .json(&deal, SchemaMode::Properties)
            .unwrap();

        assert_eq!(plain.body(), Some(r#"{"dealname":"Test"}"#));
        assert_eq!(
            bag.body(),
            Some(r#"{"properties":[{"name":"dealname","value":"Test"}]}"#)
        );
    }

    #[test]
    fn test_json_batch_body_is_array() {
        let deals = vec![Deal::default().with_name("A"), Deal::default().with_name("B")];
        let request = ApiRequest::post("/x")
            .json_batch(&deals, SchemaMode::Plain)
            .unwrap();
        assert_eq!(request.body(), Some(r#"[{"dealname":"A"},{"dealname":"B"}]"#));
    }
}
