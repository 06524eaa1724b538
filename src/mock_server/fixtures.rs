//! Test data fixtures for the mock server.
//!
//! Provides factory functions for creating realistic test data.

use chrono::{TimeZone, Utc};

use crate::{Deal, DealAssociations, DealProperty, PropertyOption};

/// Collection of fixture factories for test data.
pub struct Fixtures;

impl Fixtures {
    // =========================================================================
    // Deal Fixtures
    // =========================================================================

    /// Create a deal with a name and amount only.
    pub fn minimal_deal(name: &str, amount: f64) -> Deal {
        Deal::default().with_name(name).with_amount(amount)
    }

    /// Create a stored deal with an id, stage and close date.
    pub fn closed_deal(id: i64, name: &str, amount: f64, stage: &str) -> Deal {
        let close_date = Utc
            .with_ymd_and_hms(2024, 3, 29, 0, 0, 0)
            .single()
            .unwrap_or_else(Utc::now);
        Deal {
            id: Some(id),
            ..Self::minimal_deal(name, amount)
                .with_stage(stage)
                .with_pipeline("default")
                .with_close_date(close_date)
        }
    }

    /// Create a stored deal linked to one company and one contact.
    pub fn associated_deal(id: i64, name: &str, company_id: i64, contact_id: i64) -> Deal {
        Deal {
            id: Some(id),
            associations: DealAssociations {
                associated_companies: Some(vec![company_id]),
                associated_contacts: Some(vec![contact_id]),
            },
            ..Self::minimal_deal(name, 0.0).with_stage("appointmentscheduled")
        }
    }

    // =========================================================================
    // Property Fixtures
    // =========================================================================

    /// Create a string text property.
    pub fn text_property(name: &str, label: &str) -> DealProperty {
        DealProperty::new(name, label, "string", "text").in_group("dealinformation")
    }

    /// Create an enumeration property with the given option values.
    pub fn select_property(name: &str, label: &str, values: &[&str]) -> DealProperty {
        values.iter().enumerate().fold(
            DealProperty::new(name, label, "enumeration", "select").in_group("dealinformation"),
            |property, (position, value)| {
                let mut option = PropertyOption::new(*value, *value);
                option.display_order = Some(position as i32);
                property.with_option(option)
            },
        )
    }

    // =========================================================================
    // Scenario Builders
    // =========================================================================

    /// Build a complete scenario with a small pipeline of deals and the
    /// standard deal properties.
    pub fn default_scenario() -> DefaultScenario {
        let deals = vec![
            Self::closed_deal(1, "Enterprise renewal", 12000.0, "closedwon"),
            Self::closed_deal(2, "Pilot program", 1500.0, "closedlost"),
            Self::associated_deal(3, "Expansion", 1001, 2001),
        ];

        let properties = vec![
            Self::text_property("dealname", "Deal Name"),
            DealProperty::new("amount", "Amount", "number", "number").in_group("dealinformation"),
            Self::select_property(
                "dealstage",
                "Deal Stage",
                &["appointmentscheduled", "closedwon", "closedlost"],
            ),
        ];

        DefaultScenario { deals, properties }
    }
}

/// A complete test scenario with deals and property definitions.
#[derive(Debug)]
pub struct DefaultScenario {
    pub deals: Vec<Deal>,
    pub properties: Vec<DealProperty>,
}
