//! Records extracted from query results.

use hub_identity::{IdentityInput, RemoteField};
use serde::{Deserialize, Serialize};

use crate::types::{PageObject, PropertyScalar, PropertyValue};

/// Title used when a record has none.
pub const UNTITLED: &str = "Untitled";

/// Names of the fields with a fixed meaning.
#[derive(Debug, Clone)]
pub struct RecordFields {
    pub title: String,
    pub publish: String,
    pub public_id: String,
}

impl Default for RecordFields {
    fn default() -> Self {
        Self {
            title: "TITLE".to_owned(),
            publish: "PUBLISH".to_owned(),
            public_id: "DOC_ID".to_owned(),
        }
    }
}

/// Named display property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub value: PropertyScalar,
}

/// Find a property value by name.
#[must_use]
pub fn find_property<'a>(properties: &'a [Property], name: &str) -> Option<&'a PropertyScalar> {
    properties.iter().find(|p| p.name == name).map(|p| &p.value)
}

/// A remote record with its properties extracted.
#[derive(Debug, Clone)]
pub struct RemoteRecord {
    pub remote_id: String,
    pub title: String,
    pub published: bool,
    /// Remote copy of the public ID.
    pub public_id_field: RemoteField,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub remote_url: Option<String>,
    /// Display properties in source order, excluding the fixed fields.
    pub properties: Vec<Property>,
}

impl RemoteRecord {
    /// Extract a record from a query result.
    ///
    /// Properties whose payload cannot be parsed are skipped with a warning.
    /// An unparseable public ID field marks the record
    /// [`RemoteField::Unreadable`].
    #[must_use]
    pub fn from_page(page: &PageObject, fields: &RecordFields) -> Self {
        let mut title = None;
        let mut published = false;
        let mut public_id_field = RemoteField::Absent;
        let mut properties = Vec::new();

        for (name, raw) in page.properties.iter() {
            let value = match PropertyValue::from_json(raw) {
                Ok(parsed) => parsed.extract(),
                Err(e) => {
                    tracing::warn!(remote_id = %page.id, property = name, "unreadable property: {e}");
                    if name == fields.public_id {
                        public_id_field = RemoteField::Unreadable(e.to_string());
                    }
                    continue;
                }
            };

            if name == fields.title {
                title = value.and_then(|v| v.as_text().map(str::to_owned));
            } else if name == fields.publish {
                published = value.is_some_and(|v| v.is_truthy());
            } else if name == fields.public_id {
                public_id_field = match value {
                    None => RemoteField::Absent,
                    Some(PropertyScalar::Text(text)) => RemoteField::from_value(Some(&text)),
                    Some(other) => {
                        RemoteField::Unreadable(format!("expected text, found {other}"))
                    }
                };
            } else if let Some(value) = value {
                properties.push(Property {
                    name: name.to_owned(),
                    value,
                });
            }
        }

        Self {
            remote_id: page.id.clone(),
            title: title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| UNTITLED.to_owned()),
            published,
            public_id_field,
            created_at: page.created_time.clone(),
            updated_at: page.last_edited_time.clone(),
            remote_url: page.url.clone(),
            properties,
        }
    }

    /// Identity data for reconciliation.
    #[must_use]
    pub fn identity_input(&self) -> IdentityInput {
        IdentityInput {
            remote_id: self.remote_id.clone(),
            remote_field: self.public_id_field.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn page(properties: serde_json::Value) -> PageObject {
        serde_json::from_value(json!({
            "id": "page-1",
            "created_time": "2026-01-01T00:00:00.000Z",
            "last_edited_time": "2026-01-02T00:00:00.000Z",
            "url": "https://www.notion.so/page-1",
            "properties": properties
        }))
        .unwrap()
    }

    #[test]
    fn test_fixed_fields_extracted_and_excluded() {
        let record = RemoteRecord::from_page(
            &page(json!({
                "TITLE": {"type": "title", "title": [{"plain_text": "Handbook"}]},
                "CATEGORY": {"type": "select", "select": {"name": "HR"}},
                "PUBLISH": {"type": "checkbox", "checkbox": true},
                "DOC_ID": {"type": "rich_text", "rich_text": [{"plain_text": "DOC-0007"}]},
                "OWNER": {"type": "people", "people": []},
                "REVIEWED": {"type": "date", "date": null}
            })),
            &RecordFields::default(),
        );

        assert_eq!(record.title, "Handbook");
        assert!(record.published);
        assert_eq!(
            record.public_id_field,
            RemoteField::Present("DOC-0007".to_owned())
        );
        assert_eq!(
            record.properties,
            vec![
                Property {
                    name: "CATEGORY".to_owned(),
                    value: PropertyScalar::Text("HR".to_owned()),
                },
            ]
        );
        assert_eq!(record.remote_url.as_deref(), Some("https://www.notion.so/page-1"));
    }

    #[test]
    fn test_missing_title_defaults() {
        let record = RemoteRecord::from_page(
            &page(json!({"TITLE": {"type": "title", "title": []}})),
            &RecordFields::default(),
        );
        assert_eq!(record.title, UNTITLED);
        assert!(!record.published);
        assert_eq!(record.public_id_field, RemoteField::Absent);
    }

    #[test]
    fn test_empty_public_id_is_absent() {
        let record = RemoteRecord::from_page(
            &page(json!({"DOC_ID": {"type": "rich_text", "rich_text": []}})),
            &RecordFields::default(),
        );
        assert_eq!(record.public_id_field, RemoteField::Absent);
    }

    #[test]
    fn test_malformed_public_id_is_unreadable() {
        let record = RemoteRecord::from_page(
            &page(json!({"DOC_ID": {"type": "rich_text", "rich_text": "DOC-1"}})),
            &RecordFields::default(),
        );
        assert!(matches!(record.public_id_field, RemoteField::Unreadable(_)));
    }

    #[test]
    fn test_custom_field_names() {
        let fields = RecordFields {
            title: "Name".to_owned(),
            publish: "Live".to_owned(),
            public_id: "Ref".to_owned(),
        };
        let record = RemoteRecord::from_page(
            &page(json!({
                "Name": {"type": "title", "title": [{"plain_text": "Guide"}]},
                "Live": {"type": "checkbox", "checkbox": false},
                "Ref": {"type": "rich_text", "rich_text": [{"plain_text": "KB-0001"}]}
            })),
            &fields,
        );
        assert_eq!(record.title, "Guide");
        assert!(!record.published);
        assert!(record.properties.is_empty());
        assert_eq!(
            record.identity_input().remote_field,
            RemoteField::Present("KB-0001".to_owned())
        );
    }
}
