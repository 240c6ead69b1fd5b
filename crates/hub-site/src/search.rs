//! Machine-readable search index.

use hub_notion::find_property;
use hub_store::DocumentRecord;
use serde::Serialize;

use crate::index::ListingFields;

/// Search index entry for one published document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchEntry {
    pub id: String,
    pub title: String,
    pub category: String,
    pub author: String,
    pub tags: String,
    pub url: String,
}

/// Build entries for every record holding a public ID, in manifest order.
#[must_use]
pub fn search_entries(records: &[DocumentRecord], fields: &ListingFields) -> Vec<SearchEntry> {
    records
        .iter()
        .filter_map(|record| {
            let id = record.public_id.as_deref()?;
            let text = |name: &str| {
                find_property(&record.properties, name)
                    .map(ToString::to_string)
                    .unwrap_or_default()
            };
            Some(SearchEntry {
                id: id.to_owned(),
                title: record.title.clone(),
                category: text(&fields.category),
                author: text(&fields.author),
                tags: text(&fields.tags),
                url: format!("/documents/{id}.html"),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hub_notion::Property;
    use hub_notion::types::PropertyScalar;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_entries_from_properties() {
        let records = vec![
            DocumentRecord {
                remote_id: "page-1".to_owned(),
                public_id: Some("DOC-0001".to_owned()),
                title: "Onboarding".to_owned(),
                published: true,
                created_at: None,
                updated_at: None,
                remote_url: None,
                properties: vec![
                    Property {
                        name: "AUTHOR".to_owned(),
                        value: PropertyScalar::Text("Kim".to_owned()),
                    },
                    Property {
                        name: "TAGS".to_owned(),
                        value: PropertyScalar::Text("hr, intro".to_owned()),
                    },
                ],
            },
            DocumentRecord {
                remote_id: "page-2".to_owned(),
                public_id: None,
                title: "Unassigned".to_owned(),
                published: true,
                created_at: None,
                updated_at: None,
                remote_url: None,
                properties: Vec::new(),
            },
        ];

        let entries = search_entries(&records, &ListingFields::default());

        assert_eq!(
            entries,
            vec![SearchEntry {
                id: "DOC-0001".to_owned(),
                title: "Onboarding".to_owned(),
                category: String::new(),
                author: "Kim".to_owned(),
                tags: "hr, intro".to_owned(),
                url: "/documents/DOC-0001.html".to_owned(),
            }]
        );
    }

    #[test]
    fn test_entry_json_shape() {
        let entry = SearchEntry {
            id: "DOC-0002".to_owned(),
            title: "T".to_owned(),
            category: "C".to_owned(),
            author: "A".to_owned(),
            tags: String::new(),
            url: "/documents/DOC-0002.html".to_owned(),
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": "DOC-0002",
                "title": "T",
                "category": "C",
                "author": "A",
                "tags": "",
                "url": "/documents/DOC-0002.html"
            })
        );
    }
}
