//! Deal property definitions.

use serde::{Deserialize, Serialize};

use crate::traits::{HubSpotModel, ListModel, PropertyBag};

/// Definition of a deal property (a column of the deal object).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealProperty {
    /// Internal name, e.g. `dealname`.
    pub name: String,

    /// Human-readable label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Property group, e.g. `dealinformation`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,

    /// Data type: `string`, `number`, `date`, `datetime`, `enumeration`, `bool`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,

    /// Form control: `text`, `textarea`, `select`, `radio`, `checkbox`, ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,

    /// Allowed values for enumeration properties.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<PropertyOption>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_field: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_order: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_only_value: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_only_definition: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculated: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_options: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted: Option<bool>,
}

impl DealProperty {
    /// A property definition with the required fields set.
    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        property_type: impl Into<String>,
        field_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            label: Some(label.into()),
            property_type: Some(property_type.into()),
            field_type: Some(field_type.into()),
            ..Default::default()
        }
    }

    /// Place the property in a group.
    #[must_use]
    pub fn in_group(mut self, group_name: impl Into<String>) -> Self {
        self.group_name = Some(group_name.into());
        self
    }

    /// Add an enumeration option.
    #[must_use]
    pub fn with_option(mut self, option: PropertyOption) -> Self {
        self.options.push(option);
        self
    }
}

impl PropertyBag for DealProperty {}

impl HubSpotModel for DealProperty {
    const ROUTE_BASE_PATH: &'static str = "/properties/v1/deals/properties";
}

/// One allowed value of an enumeration property.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyOption {
    pub label: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_order: Option<i32>,
    #[serde(default)]
    pub hidden: bool,
}

impl PropertyOption {
    /// An option shown with `label` and stored as `value`.
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            ..Default::default()
        }
    }
}

/// All deal property definitions. The remote returns a bare array.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PropertyList {
    #[serde(default)]
    pub results: Vec<DealProperty>,
}

impl PropertyList {
    /// Find a property by internal name.
    pub fn find(&self, name: &str) -> Option<&DealProperty> {
        self.results.iter().find(|p| p.name == name)
    }
}

impl ListModel for PropertyList {
    type Item = DealProperty;

    fn results(&self) -> &[DealProperty] {
        &self.results
    }

    fn into_results(self) -> Vec<DealProperty> {
        self.results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serializer::{deserialize_list, serialize, SchemaMode};

    #[test]
    fn test_property_list_from_bare_array() {
        let json = r#"[
            {
                "name": "dealname",
                "label": "Deal Name",
                "groupName": "dealinformation",
                "type": "string",
                "fieldType": "text",
                "options": [],
                "formField": true,
                "readOnlyValue": false
            },
            {
                "name": "dealtype",
                "label": "Deal Type",
                "type": "enumeration",
                "fieldType": "radio",
                "options": [
                    {"label": "New Business", "value": "newbusiness", "displayOrder": 0, "hidden": false}
                ]
            }
        ]"#;
        let list: PropertyList = deserialize_list(json, SchemaMode::Plain).unwrap();
        assert_eq!(list.results.len(), 2);
        let dealname = list.find("dealname").unwrap();
        assert_eq!(dealname.group_name.as_deref(), Some("dealinformation"));
        assert_eq!(dealname.form_field, Some(true));
        let dealtype = list.find("dealtype").unwrap();
        assert_eq!(dealtype.options[0].value, "newbusiness");
        assert!(list.find("missing").is_none());
    }

    #[test]
    fn test_create_body_is_plain() {
        let property = DealProperty::new("priority", "Priority", "enumeration", "select")
            .in_group("dealinformation")
            .with_option(PropertyOption::new("High", "high"));
        let json = serialize(&property, SchemaMode::Plain).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "name": "priority",
                "label": "Priority",
                "groupName": "dealinformation",
                "type": "enumeration",
                "fieldType": "select",
                "options": [{"label": "High", "value": "high", "hidden": false}]
            })
        );
    }
}
