//! Deal model and list wrappers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::formats::Flexible;
use serde_with::{serde_as, DisplayFromStr, NoneAsEmptyString, PickFirst, TimestampMilliSeconds};

use crate::traits::{HubSpotModel, ListModel, PropertyBag};

/// A deal record usable with [`DealsApi`](crate::DealsApi).
///
/// Implement this for a custom struct to read and write portal-specific
/// deal properties; [`Deal`] covers the built-in ones.
pub trait DealModel: HubSpotModel {
    /// Remote identifier, unset before creation.
    fn deal_id(&self) -> Option<i64>;

    /// Association ids attached to this deal.
    fn associations(&self) -> &DealAssociations;

    /// Mutable access to the association ids.
    fn associations_mut(&mut self) -> &mut DealAssociations;
}

/// A HubSpot deal.
///
/// `dealId`, `portalId`, `isDeleted` and `associations` travel at the top
/// level of the payload; everything else is a deal property. HubSpot sends
/// property values as strings, so numeric and date properties accept both
/// strings and JSON numbers and are written back as strings.
///
/// # Example
///
/// ```
/// use hubapi::{serialize, Deal, SchemaMode};
///
/// let deal = Deal::default().with_name("Test").with_amount(1000.0);
/// let json = serialize(&deal, SchemaMode::Properties).unwrap();
/// assert_eq!(
///     json,
///     r#"{"properties":[{"name":"amount","value":"1000"},{"name":"dealname","value":"Test"}]}"#
/// );
/// ```
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    /// Deal ID. The v3 search endpoint calls this `id` and sends it as a string.
    #[serde(rename = "dealId", alias = "id", skip_serializing_if = "Option::is_none")]
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub id: Option<i64>,

    /// Portal (account) the deal belongs to.
    #[serde(rename = "portalId", skip_serializing_if = "Option::is_none")]
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub portal_id: Option<i64>,

    /// Whether the deal is archived.
    #[serde(rename = "isDeleted", default, skip_serializing_if = "Option::is_none")]
    pub is_deleted: Option<bool>,

    /// Associated object ids. Only present when requested.
    #[serde(default, skip_serializing_if = "DealAssociations::is_empty")]
    pub associations: DealAssociations,

    /// Deal name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dealname: Option<String>,

    /// Pipeline stage ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dealstage: Option<String>,

    /// Pipeline ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline: Option<String>,

    /// Expected close date. Written as epoch millis; read from millis, an
    /// RFC 3339 string (v3 search) or an empty string (cleared).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde_as(as = "PickFirst<(Option<TimestampMilliSeconds<String, Flexible>>, NoneAsEmptyString)>")]
    pub closedate: Option<DateTime<Utc>>,

    /// Deal amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde_as(as = "PickFirst<(NoneAsEmptyString, Option<_>)>")]
    pub amount: Option<f64>,

    /// Deal type, e.g. `newbusiness`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dealtype: Option<String>,

    /// Owning user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde_as(as = "PickFirst<(NoneAsEmptyString, Option<_>)>")]
    pub hubspot_owner_id: Option<i64>,

    /// Free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Deal {
    /// Set the deal name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.dealname = Some(name.into());
        self
    }

    /// Set the amount.
    #[must_use]
    pub fn with_amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Set the pipeline stage.
    #[must_use]
    pub fn with_stage(mut self, stage: impl Into<String>) -> Self {
        self.dealstage = Some(stage.into());
        self
    }

    /// Set the pipeline.
    #[must_use]
    pub fn with_pipeline(mut self, pipeline: impl Into<String>) -> Self {
        self.pipeline = Some(pipeline.into());
        self
    }

    /// Set the close date.
    #[must_use]
    pub fn with_close_date(mut self, close_date: DateTime<Utc>) -> Self {
        self.closedate = Some(close_date);
        self
    }

    /// Whether the deal has been created remotely.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some_and(|id| id > 0)
    }
}

impl PropertyBag for Deal {
    const ENVELOPE_FIELDS: &'static [&'static str] =
        &["dealId", "portalId", "isDeleted", "associations"];
}

impl HubSpotModel for Deal {
    const ROUTE_BASE_PATH: &'static str = "/deals/v1";
}

impl DealModel for Deal {
    fn deal_id(&self) -> Option<i64> {
        self.id
    }

    fn associations(&self) -> &DealAssociations {
        &self.associations
    }

    fn associations_mut(&mut self) -> &mut DealAssociations {
        &mut self.associations
    }
}

/// Object ids associated with a deal.
///
/// `None` means the association was never fetched; `Some(vec![])` means
/// the remote reported none.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealAssociations {
    /// Associated company ids.
    #[serde(
        rename = "associatedCompanyIds",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub associated_companies: Option<Vec<i64>>,

    /// Associated contact ids (HubSpot calls them vids).
    #[serde(rename = "associatedVids", default, skip_serializing_if = "Option::is_none")]
    pub associated_contacts: Option<Vec<i64>>,
}

impl DealAssociations {
    /// Returns true if neither kind has been populated.
    pub fn is_empty(&self) -> bool {
        self.associated_companies.is_none() && self.associated_contacts.is_none()
    }
}

/// A page from `/deals/v1/deal/paged` or an associated-deals listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealList<T = Deal> {
    /// Deals on this page.
    #[serde(default = "Vec::new")]
    pub deals: Vec<T>,
    /// Whether another page exists.
    #[serde(default)]
    pub has_more: bool,
    /// Offset to pass for the next page.
    #[serde(default)]
    pub offset: Option<i64>,
}

impl<T: DealModel> ListModel for DealList<T> {
    type Item = T;
    const RESULTS_KEY: &'static str = "deals";

    fn results(&self) -> &[T] {
        &self.deals
    }

    fn into_results(self) -> Vec<T> {
        self.deals
    }
}

/// A page from the recently created/modified feeds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealRecentList<T = Deal> {
    /// Deals on this page, newest first.
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    /// Whether another page exists.
    #[serde(default)]
    pub has_more: bool,
    /// Offset to pass for the next page.
    #[serde(default)]
    pub offset: Option<i64>,
    /// Total number of deals in the feed.
    #[serde(default)]
    pub total: Option<u64>,
}

impl<T: DealModel> ListModel for DealRecentList<T> {
    type Item = T;

    fn results(&self) -> &[T] {
        &self.results
    }

    fn into_results(self) -> Vec<T> {
        self.results
    }
}
