//! Wire types for the remote workspace API.

mod block;
mod page;
mod property;
mod rich_text;

pub use block::{BlockChildrenResponse, WireBlock};
pub use page::{OrderedProperties, PageObject, QueryResponse};
pub use property::{DateRange, NamedOption, Person, PropertyScalar, PropertyValue};
pub use rich_text::{WireAnnotations, WireEquation, WireRichText, plain_text, to_spans};
