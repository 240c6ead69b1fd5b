//! Page (record) and query response types.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Page returned by a database query.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PageObject {
    /// Page ID.
    pub id: String,
    #[serde(default)]
    pub created_time: Option<String>,
    #[serde(default)]
    pub last_edited_time: Option<String>,
    /// Web UI link.
    #[serde(default)]
    pub url: Option<String>,
    /// Raw property objects, in source order.
    #[serde(default)]
    pub properties: OrderedProperties,
}

/// Property name to raw property object, keeping the order of the response.
#[derive(Debug, Clone, Default)]
pub struct OrderedProperties(pub Vec<(String, serde_json::Value)>);

impl OrderedProperties {
    /// Look up a property by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Insert or replace a property, keeping its position when present.
    pub fn set(&mut self, name: &str, value: serde_json::Value) {
        match self.0.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = value,
            None => self.0.push((name.to_owned(), value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &serde_json::Value)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v))
    }
}

impl<'de> Deserialize<'de> for OrderedProperties {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = OrderedProperties;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of property objects")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, value)) = map.next_entry::<String, serde_json::Value>()? {
                    entries.push((name, value));
                }
                Ok(OrderedProperties(entries))
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}

impl Serialize for OrderedProperties {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(n, v)| (n, v)))
    }
}

/// Response of a database query.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub results: Vec<PageObject>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}
