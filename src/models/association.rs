//! CRM association types.

use serde::{Deserialize, Serialize};

use crate::models::deal::DealAssociations;
use crate::traits::{ListModel, PropertyBag};

/// Association category for HubSpot's built-in association types.
pub const HUBSPOT_DEFINED: &str = "HUBSPOT_DEFINED";

/// Kind of object a deal can be associated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssociationKind {
    /// Deal to company.
    Company,
    /// Deal to contact.
    Contact,
}

impl AssociationKind {
    /// Every kind, in the order associations are fetched.
    pub const ALL: [AssociationKind; 2] = [AssociationKind::Company, AssociationKind::Contact];

    /// HubSpot's association definition id for deal → this kind.
    pub fn definition_id(self) -> u32 {
        match self {
            Self::Company => 5,
            Self::Contact => 3,
        }
    }

    /// Object type segment used in associated-deal paths.
    pub fn object_type(self) -> &'static str {
        match self {
            Self::Company => "company",
            Self::Contact => "contact",
        }
    }

    /// Kind for a HubSpot-defined deal association definition id.
    pub fn from_definition_id(definition_id: u32) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.definition_id() == definition_id)
    }

    /// Kind for an associated-deal path segment.
    pub fn from_object_type(object_type: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.object_type().eq_ignore_ascii_case(object_type))
    }

    /// The slot in `associations` holding ids of this kind.
    pub fn slot(self, associations: &mut DealAssociations) -> &mut Option<Vec<i64>> {
        match self {
            Self::Company => &mut associations.associated_companies,
            Self::Contact => &mut associations.associated_contacts,
        }
    }

    /// Ids of this kind, if fetched.
    pub fn ids(self, associations: &DealAssociations) -> Option<&[i64]> {
        match self {
            Self::Company => associations.associated_companies.as_deref(),
            Self::Contact => associations.associated_contacts.as_deref(),
        }
    }
}

impl std::fmt::Display for AssociationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.object_type())
    }
}

/// Body of a `PUT /crm-associations/v1/associations` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssociationRecord {
    pub from_object_id: i64,
    pub to_object_id: i64,
    pub category: String,
    pub definition_id: u32,
}

impl AssociationRecord {
    /// A HubSpot-defined association from a deal to another object.
    pub fn new(deal_id: i64, related_id: i64, kind: AssociationKind) -> Self {
        Self {
            from_object_id: deal_id,
            to_object_id: related_id,
            category: HUBSPOT_DEFINED.to_string(),
            definition_id: kind.definition_id(),
        }
    }
}

impl PropertyBag for AssociationRecord {}

/// A page of associated object ids.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdList {
    /// Object ids.
    #[serde(default)]
    pub results: Vec<i64>,
    /// Whether another page exists.
    #[serde(default)]
    pub has_more: bool,
    /// Offset to pass for the next page.
    #[serde(default)]
    pub offset: Option<i64>,
}

impl ListModel for IdList {
    type Item = i64;

    fn results(&self) -> &[i64] {
        &self.results
    }

    fn into_results(self) -> Vec<i64> {
        self.results
    }
}
