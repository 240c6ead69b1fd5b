//! Typed record properties.
//!
//! A property value arrives as `{"type": "<tag>", "<tag>": <payload>}`.
//! [`PropertyValue`] has one variant per supported tag; any other tag parses
//! as [`PropertyValue::Unknown`] and extracts to nothing.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::rich_text::{WireRichText, plain_text};

/// Property value, one variant per type tag.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyValue {
    Title {
        #[serde(default)]
        title: Vec<WireRichText>,
    },
    RichText {
        #[serde(default)]
        rich_text: Vec<WireRichText>,
    },
    Select {
        #[serde(default)]
        select: Option<NamedOption>,
    },
    MultiSelect {
        #[serde(default)]
        multi_select: Vec<NamedOption>,
    },
    Checkbox {
        #[serde(default)]
        checkbox: bool,
    },
    Number {
        #[serde(default)]
        number: Option<f64>,
    },
    Date {
        #[serde(default)]
        date: Option<DateRange>,
    },
    People {
        #[serde(default)]
        people: Vec<Person>,
    },
    Email {
        #[serde(default)]
        email: Option<String>,
    },
    PhoneNumber {
        #[serde(default)]
        phone_number: Option<String>,
    },
    Url {
        #[serde(default)]
        url: Option<String>,
    },
    #[serde(other)]
    Unknown,
}

/// Option of a select or multi-select property.
#[derive(Debug, Clone, Deserialize)]
pub struct NamedOption {
    #[serde(default)]
    pub name: String,
}

/// Date property payload.
#[derive(Debug, Clone, Deserialize)]
pub struct DateRange {
    #[serde(default)]
    pub start: Option<String>,
}

/// Entry of a people property.
#[derive(Debug, Clone, Deserialize)]
pub struct Person {
    #[serde(default)]
    pub name: Option<String>,
}

/// Extracted property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyScalar {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl PropertyScalar {
    /// Truthiness used for the publish flag.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0,
            Self::Text(s) => !s.is_empty(),
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Whether the value displays as nothing.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(s) if s.is_empty())
    }
}

impl fmt::Display for PropertyScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl PropertyValue {
    /// Parse one property object.
    ///
    /// # Errors
    ///
    /// Returns an error when a known type tag carries a malformed payload.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(value)
    }

    /// Extract a scalar. Unknown types and empty values yield `None`.
    #[must_use]
    pub fn extract(&self) -> Option<PropertyScalar> {
        match self {
            Self::Title { title: text } | Self::RichText { rich_text: text } => {
                non_empty(plain_text(text))
            }
            Self::Select { select } => select.as_ref().and_then(|o| non_empty(o.name.clone())),
            Self::MultiSelect { multi_select } => {
                non_empty(join(multi_select.iter().map(|o| o.name.as_str())))
            }
            Self::Checkbox { checkbox } => Some(PropertyScalar::Bool(*checkbox)),
            Self::Number { number } => number.map(PropertyScalar::Number),
            Self::Date { date } => date.as_ref().and_then(|d| d.start.clone()).and_then(non_empty),
            Self::People { people } => {
                non_empty(join(people.iter().filter_map(|p| p.name.as_deref())))
            }
            Self::Email { email: value }
            | Self::PhoneNumber {
                phone_number: value,
            }
            | Self::Url { url: value } => value.clone().and_then(non_empty),
            Self::Unknown => None,
        }
    }
}

fn join<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names.filter(|n| !n.is_empty()).collect::<Vec<_>>().join(", ")
}

fn non_empty(text: String) -> Option<PropertyScalar> {
    (!text.is_empty()).then_some(PropertyScalar::Text(text))
}
