//! Document page assembly.

use std::fmt::Write;

use hub_notion::Property;
use hub_renderer::{BlockRenderer, HtmlBackend, escape_html};
use hub_store::{Metrics, Snapshot};

use crate::template::{PageTemplate, PageValues};

/// Render the property table, or an empty string when no property has a
/// displayable value.
#[must_use]
pub fn property_table(properties: &[Property]) -> String {
    let mut rows = String::new();
    for property in properties.iter().filter(|p| !p.value.is_blank()) {
        let _ = write!(
            rows,
            "<tr><th>{}</th><td>{}</td></tr>",
            escape_html(&property.name),
            escape_html(&property.value.to_string()),
        );
    }
    if rows.is_empty() {
        return String::new();
    }

    let mut html = String::with_capacity(rows.len() + 128);
    html.push_str("<div class=\"document-properties\">\n");
    html.push_str("<h3>Document Properties</h3>\n");
    html.push_str("<table class=\"properties-table\">\n");
    html.push_str(&rows);
    html.push_str("\n</table>\n</div>");
    html
}

/// Assembles complete document pages from snapshots.
pub struct DocumentAssembler<'a> {
    template: &'a PageTemplate,
    renderer: BlockRenderer<HtmlBackend>,
    site_title: &'a str,
}

impl<'a> DocumentAssembler<'a> {
    #[must_use]
    pub fn new(template: &'a PageTemplate, site_title: &'a str) -> Self {
        Self {
            template,
            renderer: BlockRenderer::new(),
            site_title,
        }
    }

    /// Render one snapshot to a full HTML page.
    #[must_use]
    pub fn assemble(&self, snapshot: &Snapshot, metrics: Metrics, timestamp: &str) -> String {
        let title = escape_html(&snapshot.title);
        let head_title = format!("{title} - {}", escape_html(self.site_title));
        let doc_id = escape_html(&snapshot.public_id);
        let property_html = property_table(&snapshot.properties);
        let content_html = self.renderer.render(&snapshot.blocks);

        self.template.render(&PageValues {
            head_title: &head_title,
            title: &title,
            doc_id: &doc_id,
            views: metrics.views,
            downloads: metrics.downloads,
            shares: metrics.shares,
            property_html: &property_html,
            content_html: &content_html,
            timestamp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hub_notion::types::PropertyScalar;
    use hub_renderer::Block;
    use pretty_assertions::assert_eq;

    use crate::template::DEFAULT_DOCUMENT_TEMPLATE;

    fn property(name: &str, value: PropertyScalar) -> Property {
        Property {
            name: name.to_owned(),
            value,
        }
    }

    #[test]
    fn test_property_table_skips_blank_values() {
        let html = property_table(&[
            property("CATEGORY", PropertyScalar::Text("R&D".to_owned())),
            property("AUTHOR", PropertyScalar::Text(String::new())),
            property("PAGES", PropertyScalar::Number(12.0)),
            property("DRAFT", PropertyScalar::Bool(false)),
        ]);
        assert_eq!(
            html,
            "<div class=\"document-properties\">\n<h3>Document Properties</h3>\n\
             <table class=\"properties-table\">\n\
             <tr><th>CATEGORY</th><td>R&amp;D</td></tr>\
             <tr><th>PAGES</th><td>12</td></tr>\
             <tr><th>DRAFT</th><td>false</td></tr>\n</table>\n</div>"
        );
    }

    #[test]
    fn test_property_table_empty() {
        assert_eq!(property_table(&[]), "");
        assert_eq!(
            property_table(&[property("TAGS", PropertyScalar::Text(String::new()))]),
            ""
        );
    }

    #[test]
    fn test_assemble_document() {
        let template = PageTemplate::parse(DEFAULT_DOCUMENT_TEMPLATE).unwrap();
        let assembler = DocumentAssembler::new(&template, "INTRA-HUB");
        let snapshot = Snapshot::new(
            "DOC-0003",
            "page-3",
            "Q&A <draft>",
            vec![property("CATEGORY", PropertyScalar::Text("HR".to_owned()))],
            vec![Block::bulleted("one"), Block::bulleted("two")],
        );

        let html = assembler.assemble(
            &snapshot,
            Metrics {
                views: 7,
                downloads: 1,
                shares: 0,
            },
            "2026-01-01 10:00:00",
        );

        assert!(html.contains("<title>Q&amp;A &lt;draft&gt; - INTRA-HUB</title>"));
        assert!(html.contains("<h1 class=\"doc-title\">Q&amp;A &lt;draft&gt;</h1>"));
        assert!(html.contains("Document ID: DOC-0003"));
        assert!(html.contains("<strong>Views:</strong> 7"));
        assert!(html.contains("<ul><li>one</li><li>two</li></ul>"));
        assert!(html.contains("<th>CATEGORY</th><td>HR</td>"));
        assert!(html.contains("Last updated: 2026-01-01 10:00:00"));
        assert!(!html.contains("@@"));
    }
}
