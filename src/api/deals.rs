//! Deal operations.

use crate::client::HubSpotClient;
use crate::error::{HubSpotError, Result};
use crate::models::{
    AssociationKind, AssociationRecord, Deal, DealList, DealModel, DealRecentList, IdList,
    SearchRequestOptions, SearchResults, HUBSPOT_DEFINED,
};
use crate::pagination::{ListRequestOptions, RecentRequestOptions};
use crate::request::ApiRequest;
use crate::serializer::SchemaMode;

const SEARCH_PATH: &str = "/crm/v3/objects/deals/search";
const ASSOCIATIONS_PATH: &str = "/crm-associations/v1/associations";

/// Deal endpoints, reached via [`HubSpotClient::deals`].
///
/// Every operation is generic over the deal record type, so a
/// portal-specific struct implementing [`DealModel`] can be used in place
/// of [`Deal`](crate::Deal).
///
/// # Example
///
/// ```no_run
/// use hubapi::{Deal, HubSpotClient, ListRequestOptions};
///
/// # async fn example() -> hubapi::Result<()> {
/// let client = HubSpotClient::from_env()?;
/// let deals = client.deals();
///
/// let created = deals.create(&Deal::default().with_name("Renewal")).await?;
/// let page = deals.list::<Deal>(false, &ListRequestOptions::default()).await?;
/// println!("{} deals, more: {}", page.deals.len(), page.has_more);
///
/// if let Some(id) = created.id {
///     deals.delete(id).await?;
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DealsApi<'a> {
    client: &'a HubSpotClient,
}

impl<'a> DealsApi<'a> {
    /// Wrap a client.
    pub fn new(client: &'a HubSpotClient) -> Self {
        Self { client }
    }

    /// Create a deal and return it with its id set.
    #[tracing::instrument(skip(self, entity))]
    pub async fn create<T: DealModel>(&self, entity: &T) -> Result<T> {
        let request = ApiRequest::post(deal_path::<T>()).json(entity, SchemaMode::Properties)?;
        self.client.execute(request, SchemaMode::Properties).await
    }

    /// Fetch a deal. Returns `None` if the remote reports 404.
    #[tracing::instrument(skip(self))]
    pub async fn get_by_id<T: DealModel>(&self, deal_id: i64) -> Result<Option<T>> {
        let request = ApiRequest::get(format!("{}/{deal_id}", deal_path::<T>()));

        match self.client.execute(request, SchemaMode::Properties).await {
            Ok(deal) => Ok(Some(deal)),
            Err(err) if err.is_not_found() => {
                tracing::debug!(deal_id, "deal not found");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Update a deal's properties.
    ///
    /// # Errors
    ///
    /// Returns [`HubSpotError::Validation`] without sending anything if the
    /// deal has no id.
    #[tracing::instrument(skip(self, entity))]
    pub async fn update<T: DealModel>(&self, entity: &T) -> Result<T> {
        let deal_id = require_id(entity)?;
        let request = ApiRequest::put(format!("{}/{deal_id}", deal_path::<T>()))
            .json(entity, SchemaMode::Properties)?;
        self.client.execute(request, SchemaMode::Properties).await
    }

    /// List one page of deals.
    #[tracing::instrument(skip(self))]
    pub async fn list<T: DealModel>(
        &self,
        include_associations: bool,
        options: &ListRequestOptions,
    ) -> Result<DealList<T>> {
        options.validate()?;
        let request = paged_request(
            format!("{}/paged", deal_path::<T>()),
            include_associations,
            options,
        );
        self.client.execute_list(request, SchemaMode::Properties).await
    }

    /// List one page of deals associated with a company or contact.
    #[tracing::instrument(skip(self))]
    pub async fn list_associated_to<T: DealModel>(
        &self,
        include_associations: bool,
        related_id: i64,
        related_type: AssociationKind,
        options: &ListRequestOptions,
    ) -> Result<DealList<T>> {
        options.validate()?;
        let path = format!(
            "{}/associated/{}/{related_id}/paged",
            deal_path::<T>(),
            related_type.object_type()
        );
        let request = paged_request(path, include_associations, options);
        self.client.execute_list(request, SchemaMode::Properties).await
    }

    /// Delete a deal.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, deal_id: i64) -> Result<()> {
        let request = ApiRequest::delete(format!("{}/{deal_id}", deal_path::<Deal>()));
        self.client.execute_void(request).await
    }

    /// Deals created recently, newest first.
    #[tracing::instrument(skip(self))]
    pub async fn recently_created<T: DealModel>(
        &self,
        options: &RecentRequestOptions,
    ) -> Result<DealRecentList<T>> {
        self.recent("created", options).await
    }

    /// Deals modified recently, newest first.
    #[tracing::instrument(skip(self))]
    pub async fn recently_updated<T: DealModel>(
        &self,
        options: &RecentRequestOptions,
    ) -> Result<DealRecentList<T>> {
        self.recent("modified", options).await
    }

    async fn recent<T: DealModel>(
        &self,
        feed: &str,
        options: &RecentRequestOptions,
    ) -> Result<DealRecentList<T>> {
        options.validate()?;
        let request = ApiRequest::get(format!("{}/recent/{feed}", deal_path::<T>()))
            .query_pairs(options.query_pairs());
        self.client.execute_list(request, SchemaMode::Properties).await
    }

    /// Search deals with the CRM v3 search endpoint.
    ///
    /// The criteria are sent as plain JSON; results are read from the
    /// property-bag shape.
    #[tracing::instrument(skip(self, options))]
    pub async fn search<T: DealModel>(
        &self,
        options: &SearchRequestOptions,
    ) -> Result<SearchResults<T>> {
        options.validate()?;
        let request = ApiRequest::post(SEARCH_PATH).json(options, SchemaMode::Plain)?;
        self.client.execute_list(request, SchemaMode::Properties).await
    }

    /// Associate a deal with a company or contact.
    ///
    /// Returns the deal with that kind's associations set to exactly
    /// `[related_id]`; nothing is re-fetched.
    ///
    /// # Errors
    ///
    /// Returns [`HubSpotError::Validation`] if the deal has no id.
    #[tracing::instrument(skip(self, entity))]
    pub async fn associate_to<T: DealModel>(
        &self,
        mut entity: T,
        related_id: i64,
        kind: AssociationKind,
    ) -> Result<T> {
        let deal_id = require_id(&entity)?;
        let record = AssociationRecord::new(deal_id, related_id, kind);
        let request = ApiRequest::put(ASSOCIATIONS_PATH).json(&record, SchemaMode::Plain)?;
        self.client.execute_void(request).await?;

        *kind.slot(entity.associations_mut()) = Some(vec![related_id]);
        Ok(entity)
    }

    /// Fetch company and contact associations of a deal.
    ///
    /// A kind is populated only when the remote list is non-empty; otherwise
    /// it is left as it was.
    ///
    /// # Errors
    ///
    /// Returns [`HubSpotError::Validation`] if the deal has no id.
    #[tracing::instrument(skip(self, entity))]
    pub async fn get_associations<T: DealModel>(&self, mut entity: T) -> Result<T> {
        let deal_id = require_id(&entity)?;

        for kind in AssociationKind::ALL {
            let path = format!(
                "{ASSOCIATIONS_PATH}/{deal_id}/{HUBSPOT_DEFINED}/{}",
                kind.definition_id()
            );
            let ids: IdList = self
                .client
                .execute_list(ApiRequest::get(path), SchemaMode::Plain)
                .await?;

            if !ids.results.is_empty() {
                *kind.slot(entity.associations_mut()) = Some(ids.results);
            }
        }

        Ok(entity)
    }
}

fn deal_path<T: DealModel>() -> String {
    format!("{}/deal", T::ROUTE_BASE_PATH)
}

fn paged_request(
    path: String,
    include_associations: bool,
    options: &ListRequestOptions,
) -> ApiRequest {
    let mut request = ApiRequest::get(path).query_pairs(options.query_pairs());
    if include_associations {
        request = request.query("includeAssociations", "true");
    }
    request
}

fn require_id<T: DealModel>(entity: &T) -> Result<i64> {
    match entity.deal_id() {
        Some(id) if id > 0 => Ok(id),
        _ => Err(HubSpotError::Validation(
            "deal entity must have an id set".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_id() {
        assert!(matches!(
            require_id(&Deal::default()),
            Err(HubSpotError::Validation(_))
        ));
        let deal = Deal {
            id: Some(-1),
            ..Default::default()
        };
        assert!(require_id(&deal).is_err());
        let deal = Deal {
            id: Some(42),
            ..Default::default()
        };
        assert_eq!(require_id(&deal).unwrap(), 42);
    }

    #[test]
    fn test_paged_request_query_order() {
        let request = paged_request(
            deal_path::<Deal>() + "/paged",
            true,
            &ListRequestOptions::default().with_properties(["dealname"]),
        );
        assert_eq!(request.path(), "/deals/v1/deal/paged");
        assert_eq!(
            request.query_params(),
            &[
                ("limit".to_string(), "250".to_string()),
                ("properties".to_string(), "dealname".to_string()),
                ("includeAssociations".to_string(), "true".to_string()),
            ]
        );
    }
}
