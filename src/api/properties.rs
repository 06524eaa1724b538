//! Deal property definition operations.

use crate::client::HubSpotClient;
use crate::error::{HubSpotError, Result};
use crate::models::{DealProperty, PropertyList};
use crate::request::ApiRequest;
use crate::serializer::SchemaMode;
use crate::traits::HubSpotModel;

/// Deal property endpoints, reached via [`HubSpotClient::deal_properties`].
///
/// Property definitions are plain JSON in both directions.
#[derive(Debug, Clone, Copy)]
pub struct DealPropertiesApi<'a> {
    client: &'a HubSpotClient,
}

impl<'a> DealPropertiesApi<'a> {
    /// Wrap a client.
    pub fn new(client: &'a HubSpotClient) -> Self {
        Self { client }
    }

    /// All deal property definitions.
    #[tracing::instrument(skip(self))]
    pub async fn get_all(&self) -> Result<PropertyList> {
        let request = ApiRequest::get(DealProperty::ROUTE_BASE_PATH);
        self.client.execute_list(request, SchemaMode::Plain).await
    }

    /// A single property definition by internal name.
    #[tracing::instrument(skip(self))]
    pub async fn get_property(&self, name: &str) -> Result<DealProperty> {
        let request = ApiRequest::get(named_path(name)?);
        self.client.execute(request, SchemaMode::Plain).await
    }

    /// Create a property definition.
    #[tracing::instrument(skip(self, property), fields(name = %property.name))]
    pub async fn create(&self, property: &DealProperty) -> Result<DealProperty> {
        let request =
            ApiRequest::post(DealProperty::ROUTE_BASE_PATH).json(property, SchemaMode::Plain)?;
        self.client.execute(request, SchemaMode::Plain).await
    }

    /// Replace a property definition, addressed by its name.
    #[tracing::instrument(skip(self, property), fields(name = %property.name))]
    pub async fn update(&self, property: &DealProperty) -> Result<DealProperty> {
        let request = ApiRequest::put(named_path(&property.name)?).json(property, SchemaMode::Plain)?;
        self.client.execute(request, SchemaMode::Plain).await
    }

    /// Delete a property definition.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, name: &str) -> Result<()> {
        let request = ApiRequest::delete(named_path(name)?);
        self.client.execute_void(request).await
    }
}

fn named_path(name: &str) -> Result<String> {
    if name.trim().is_empty() {
        return Err(HubSpotError::Validation(
            "property name must not be empty".to_string(),
        ));
    }
    Ok(format!(
        "{}/named/{}",
        DealProperty::ROUTE_BASE_PATH,
        urlencoding::encode(name)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_path_encodes_name() {
        assert_eq!(
            named_path("deal score").unwrap(),
            "/properties/v1/deals/properties/named/deal%20score"
        );
    }

    #[test]
    fn test_named_path_rejects_empty() {
        assert!(matches!(named_path("  "), Err(HubSpotError::Validation(_))));
    }
}
