//! Mock server state management.
//!
//! Provides the in-memory data store for the mock HubSpot API server.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::{AssociationKind, Deal, DealProperty, FilterOperator, SearchFilter, SearchRequestOptions};

/// Portal id stamped on every stored deal.
pub const MOCK_PORTAL_ID: i64 = 62515;

/// Shared state for the mock server.
///
/// This struct holds all the mock data that the server will serve.
/// It's wrapped in `Arc<RwLock<_>>` for concurrent access.
#[derive(Debug, Default)]
pub struct MockState {
    /// Deals indexed by id.
    pub deals: BTreeMap<i64, Deal>,

    /// Deal property definitions indexed by name.
    pub properties: BTreeMap<String, DealProperty>,

    /// Optional credential. If set, requests must carry it as `hapikey`
    /// or as a bearer token.
    pub required_credential: Option<String>,

    /// Creation time per deal.
    created_at: HashMap<i64, DateTime<Utc>>,
    /// Last modification per deal.
    last_modified: HashMap<i64, Modification>,
    sequence: u64,
}

/// Ordering key and wall-clock time of a deal's last write.
#[derive(Debug, Clone, Copy)]
struct Modification {
    sequence: u64,
    at: DateTime<Utc>,
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Add a deal, keeping its id if it has one.
    pub fn with_deal(mut self, deal: Deal) -> Self {
        self.insert_deal(deal);
        self
    }

    /// Add a property definition.
    pub fn with_property(mut self, property: DealProperty) -> Self {
        self.properties.insert(property.name.clone(), property);
        self
    }

    /// Set the required credential.
    pub fn with_required_credential(mut self, credential: &str) -> Self {
        self.required_credential = Some(credential.to_string());
        self
    }

    /// Store a deal, assigning the next free id when unset.
    pub fn insert_deal(&mut self, mut deal: Deal) -> &Deal {
        let id = match deal.id {
            Some(id) if id > 0 => id,
            _ => self.deals.keys().next_back().copied().unwrap_or(0) + 1,
        };
        deal.id = Some(id);
        deal.portal_id = Some(MOCK_PORTAL_ID);
        deal.is_deleted = Some(false);

        self.touch(id);
        self.created_at.entry(id).or_insert_with(Utc::now);
        self.deals.entry(id).or_insert(deal)
    }

    /// Get a deal by id.
    pub fn get_deal(&self, id: i64) -> Option<&Deal> {
        self.deals.get(&id)
    }

    /// Apply the properties set on `patch` to a stored deal.
    pub fn update_deal(&mut self, id: i64, patch: Deal) -> Option<&Deal> {
        let deal = self.deals.get_mut(&id)?;
        merge_properties(deal, patch);
        self.touch(id);
        self.deals.get(&id)
    }

    /// Remove a deal. Returns false if it did not exist.
    pub fn delete_deal(&mut self, id: i64) -> bool {
        self.last_modified.remove(&id);
        self.created_at.remove(&id);
        self.deals.remove(&id).is_some()
    }

    /// Deals with an id greater than `after`, in id order.
    pub fn deals_after(&self, after: Option<i64>) -> Vec<&Deal> {
        let start = after.map_or(i64::MIN, |a| a.saturating_add(1));
        self.deals.range(start..).map(|(_, deal)| deal).collect()
    }

    /// Deals associated with the given object.
    pub fn deals_associated_with(&self, kind: AssociationKind, object_id: i64) -> Vec<&Deal> {
        self.deals
            .values()
            .filter(|deal| {
                kind.ids(&deal.associations)
                    .is_some_and(|ids| ids.contains(&object_id))
            })
            .collect()
    }

    /// Deals created after `since`, newest id first.
    pub fn recently_created(&self, since: Option<DateTime<Utc>>) -> Vec<&Deal> {
        self.deals
            .values()
            .rev()
            .filter(|deal| {
                let created = deal.id.and_then(|id| self.created_at.get(&id));
                is_after(created.copied(), since)
            })
            .collect()
    }

    /// Deals modified after `since`, most recently modified first.
    pub fn recently_modified(&self, since: Option<DateTime<Utc>>) -> Vec<&Deal> {
        let modification = |deal: &Deal| deal.id.and_then(|id| self.last_modified.get(&id)).copied();

        let mut deals: Vec<&Deal> = self
            .deals
            .values()
            .filter(|deal| is_after(modification(*deal).map(|m| m.at), since))
            .collect();
        deals.sort_by_key(|deal| {
            std::cmp::Reverse(modification(*deal).map_or(0, |m| m.sequence))
        });
        deals
    }

    /// Record an association. Returns false if the deal does not exist.
    pub fn associate(&mut self, deal_id: i64, kind: AssociationKind, object_id: i64) -> bool {
        let Some(deal) = self.deals.get_mut(&deal_id) else {
            return false;
        };
        let ids = kind.slot(&mut deal.associations).get_or_insert_with(Vec::new);
        if !ids.contains(&object_id) {
            ids.push(object_id);
        }
        true
    }

    /// Ids associated with a deal, empty if none or the deal is unknown.
    pub fn association_ids(&self, deal_id: i64, kind: AssociationKind) -> Vec<i64> {
        self.deals
            .get(&deal_id)
            .and_then(|deal| kind.ids(&deal.associations))
            .map(<[i64]>::to_vec)
            .unwrap_or_default()
    }

    /// Deals matching any filter group and the free-text query.
    pub fn search(&self, options: &SearchRequestOptions) -> Vec<&Deal> {
        self.deals
            .values()
            .filter(|deal| {
                let fields = serde_json::to_value(deal).unwrap_or_default();
                let groups_match = options.filter_groups.is_empty()
                    || options
                        .filter_groups
                        .iter()
                        .any(|group| group.filters.iter().all(|f| filter_matches(&fields, f)));
                let query_matches = options.query.as_deref().map_or(true, |q| {
                    deal.dealname
                        .as_deref()
                        .is_some_and(|name| name.to_lowercase().contains(&q.to_lowercase()))
                });
                groups_match && query_matches
            })
            .collect()
    }

    fn touch(&mut self, id: i64) {
        self.sequence += 1;
        let modification = Modification {
            sequence: self.sequence,
            at: Utc::now(),
        };
        self.last_modified.insert(id, modification);
    }
}

fn is_after(at: Option<DateTime<Utc>>, since: Option<DateTime<Utc>>) -> bool {
    match (at, since) {
        (_, None) => true,
        (Some(at), Some(since)) => at > since,
        (None, Some(_)) => false,
    }
}

fn merge_properties(deal: &mut Deal, patch: Deal) {
    if patch.dealname.is_some() {
        deal.dealname = patch.dealname;
    }
    if patch.dealstage.is_some() {
        deal.dealstage = patch.dealstage;
    }
    if patch.pipeline.is_some() {
        deal.pipeline = patch.pipeline;
    }
    if patch.closedate.is_some() {
        deal.closedate = patch.closedate;
    }
    if patch.amount.is_some() {
        deal.amount = patch.amount;
    }
    if patch.dealtype.is_some() {
        deal.dealtype = patch.dealtype;
    }
    if patch.hubspot_owner_id.is_some() {
        deal.hubspot_owner_id = patch.hubspot_owner_id;
    }
    if patch.description.is_some() {
        deal.description = patch.description;
    }
}

/// Compare one plain-serialized deal field against a filter.
fn filter_matches(fields: &serde_json::Value, filter: &SearchFilter) -> bool {
    let actual = match fields.get(&filter.property_name) {
        Some(serde_json::Value::String(s)) => Some(s.clone()),
        Some(serde_json::Value::Null) | None => None,
        Some(other) => Some(other.to_string()),
    };
    let number = |s: &str| s.parse::<f64>().ok();
    let compare = |expected: Option<&String>, op: fn(f64, f64) -> bool| match (&actual, expected) {
        (Some(a), Some(e)) => matches!((number(a), number(e)), (Some(a), Some(e)) if op(a, e)),
        _ => false,
    };

    match filter.operator {
        FilterOperator::Eq => actual.as_ref() == filter.value.as_ref(),
        FilterOperator::Neq => actual.as_ref() != filter.value.as_ref(),
        FilterOperator::Gt => compare(filter.value.as_ref(), |a, e| a > e),
        FilterOperator::Gte => compare(filter.value.as_ref(), |a, e| a >= e),
        FilterOperator::Lt => compare(filter.value.as_ref(), |a, e| a < e),
        FilterOperator::Lte => compare(filter.value.as_ref(), |a, e| a <= e),
        FilterOperator::Between => {
            compare(filter.value.as_ref(), |a, e| a >= e)
                && compare(filter.high_value.as_ref(), |a, e| a <= e)
        }
        FilterOperator::In => actual.as_ref().is_some_and(|a| filter.values.contains(a)),
        FilterOperator::NotIn => !actual.as_ref().is_some_and(|a| filter.values.contains(a)),
        FilterOperator::HasProperty => actual.is_some(),
        FilterOperator::NotHasProperty => actual.is_none(),
        FilterOperator::ContainsToken => match (&actual, &filter.value) {
            (Some(a), Some(token)) => a.to_lowercase().contains(&token.to_lowercase()),
            _ => false,
        },
        FilterOperator::NotContainsToken => match (&actual, &filter.value) {
            (Some(a), Some(token)) => !a.to_lowercase().contains(&token.to_lowercase()),
            _ => true,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_deal(name: &str, amount: f64) -> Deal {
        Deal::default().with_name(name).with_amount(amount)
    }

    #[test]
    fn test_state_assigns_ids() {
        let mut state = MockState::new();
        let first = state.insert_deal(sample_deal("A", 1.0)).id;
        let second = state.insert_deal(sample_deal("B", 2.0)).id;

        assert_eq!(first, Some(1));
        assert_eq!(second, Some(2));
        assert_eq!(state.get_deal(2).unwrap().portal_id, Some(MOCK_PORTAL_ID));
    }

    #[test]
    fn test_state_update_merges_set_properties() {
        let mut state = MockState::new().with_deal(sample_deal("Original", 10.0));

        let patch = Deal::default().with_stage("closedwon");
        let updated = state.update_deal(1, patch).unwrap();

        assert_eq!(updated.dealname.as_deref(), Some("Original"));
        assert_eq!(updated.dealstage.as_deref(), Some("closedwon"));
        assert_eq!(updated.amount, Some(10.0));
        assert!(state.update_deal(99, Deal::default()).is_none());
    }

    #[test]
    fn test_state_recently_modified_order() {
        let mut state = MockState::new()
            .with_deal(sample_deal("A", 1.0))
            .with_deal(sample_deal("B", 2.0));
        state.update_deal(1, Deal::default().with_stage("closedwon"));

        let ids: Vec<_> = state.recently_modified(None).iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![Some(1), Some(2)]);
        let ids: Vec<_> = state.recently_created(None).iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![Some(2), Some(1)]);
    }

    #[test]
    fn test_state_recent_feeds_honor_since() {
        let state = MockState::new()
            .with_deal(sample_deal("A", 1.0))
            .with_deal(sample_deal("B", 2.0));
        let past = Utc::now() - chrono::Duration::hours(1);
        let future = Utc::now() + chrono::Duration::hours(1);

        assert_eq!(state.recently_created(Some(past)).len(), 2);
        assert_eq!(state.recently_modified(Some(past)).len(), 2);
        assert!(state.recently_created(Some(future)).is_empty());
        assert!(state.recently_modified(Some(future)).is_empty());
    }

    #[test]
    fn test_state_associations() {
        let mut state = MockState::new().with_deal(sample_deal("A", 1.0));

        assert!(state.associate(1, AssociationKind::Company, 500));
        assert!(state.associate(1, AssociationKind::Company, 500));
        assert!(!state.associate(7, AssociationKind::Company, 500));

        assert_eq!(state.association_ids(1, AssociationKind::Company), vec![500]);
        assert!(state.association_ids(1, AssociationKind::Contact).is_empty());
        assert_eq!(state.deals_associated_with(AssociationKind::Company, 500).len(), 1);
    }

    #[test]
    fn test_state_search_filters() {
        let state = MockState::new()
            .with_deal(sample_deal("Small", 100.0))
            .with_deal(sample_deal("Large", 5000.0));

        let opts = SearchRequestOptions::default().with_filter_group(vec![SearchFilter::new(
            "amount",
            FilterOperator::Gte,
            "1000",
        )]);
        let found = state.search(&opts);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].dealname.as_deref(), Some("Large"));

        let opts = SearchRequestOptions::default().with_query("small");
        assert_eq!(state.search(&opts).len(), 1);
    }

    #[test]
    fn test_state_deals_after() {
        let state = MockState::new()
            .with_deal(sample_deal("A", 1.0))
            .with_deal(sample_deal("B", 2.0))
            .with_deal(sample_deal("C", 3.0));

        assert_eq!(state.deals_after(None).len(), 3);
        assert_eq!(state.deals_after(Some(1)).len(), 2);
        assert!(state.deals_after(Some(3)).is_empty());
    }
}
