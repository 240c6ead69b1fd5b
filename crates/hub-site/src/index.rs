//! Paginated listing of published documents.
//!
//! Page 1 is `index.html`; page N > 1 is `page-N.html`. Records are listed
//! by public ID, newest ordinal first.

use std::fmt::Write;

use hub_identity::IdScheme;
use hub_notion::find_property;
use hub_renderer::escape_html;
use hub_store::{DocumentRecord, MetricsStore};

/// Landing page of the listing.
pub const INDEX_FILE: &str = "index.html";

/// File name of listing page `page` (1-based).
#[must_use]
pub fn page_file_name(page: usize) -> String {
    if page <= 1 {
        INDEX_FILE.to_owned()
    } else {
        format!("page-{page}.html")
    }
}

/// Number of listing pages for `items` records; an empty listing still has
/// one page.
#[must_use]
pub fn page_count(items: usize, page_size: usize) -> usize {
    items.div_ceil(page_size.max(1)).max(1)
}

/// Previous, numbered and next links for page `current` of `total`.
///
/// Empty when there is a single page.
#[must_use]
pub fn pagination_html(current: usize, total: usize) -> String {
    if total <= 1 {
        return String::new();
    }

    let mut links: Vec<String> = Vec::with_capacity(total + 2);
    if current > 1 {
        links.push(format!(
            "<a href=\"/{}\" class=\"page-link\">&larr; Previous</a>",
            page_file_name(current - 1)
        ));
    }
    for page in 1..=total {
        if page == current {
            links.push(format!("<span class=\"page-link active\">{page}</span>"));
        } else {
            links.push(format!(
                "<a href=\"/{}\" class=\"page-link\">{page}</a>",
                page_file_name(page)
            ));
        }
    }
    if current < total {
        links.push(format!(
            "<a href=\"/{}\" class=\"page-link\">Next &rarr;</a>",
            page_file_name(current + 1)
        ));
    }
    format!("<div class=\"pagination\">{}</div>", links.join(" "))
}

/// Names of the properties shown as listing columns.
#[derive(Clone, Debug)]
pub struct ListingFields {
    pub category: String,
    pub author: String,
    pub version: String,
    pub tags: String,
}

impl Default for ListingFields {
    fn default() -> Self {
        Self {
            category: "CATEGORY".to_owned(),
            author: "AUTHOR".to_owned(),
            version: "VERSION".to_owned(),
            tags: "TAGS".to_owned(),
        }
    }
}

/// Order records for listing: highest ordinal first, IDs without an ordinal
/// last, ties broken by ID descending.
#[must_use]
pub fn listing_order(records: &[DocumentRecord]) -> Vec<&DocumentRecord> {
    let mut ordered: Vec<&DocumentRecord> =
        records.iter().filter(|r| r.public_id.is_some()).collect();
    ordered.sort_by(|a, b| sort_key(b).cmp(&sort_key(a)));
    ordered
}

fn sort_key(record: &DocumentRecord) -> (Option<u64>, &str) {
    let id = record.public_id.as_deref().unwrap_or_default();
    (IdScheme::ordinal_of(id), id)
}

/// One generated listing page.
#[derive(Debug)]
pub struct IndexPage {
    pub file_name: String,
    pub html: String,
    /// Records listed on this page.
    pub count: usize,
}

/// Builds the listing pages.
pub struct IndexBuilder<'a> {
    site_title: &'a str,
    page_size: usize,
    fields: &'a ListingFields,
}

impl<'a> IndexBuilder<'a> {
    #[must_use]
    pub fn new(site_title: &'a str, page_size: usize, fields: &'a ListingFields) -> Self {
        Self {
            site_title,
            page_size: page_size.max(1),
            fields,
        }
    }

    /// Render every listing page for the published `records`.
    ///
    /// Metrics of listed documents are initialized to zero when missing.
    pub fn build(
        &self,
        records: &[DocumentRecord],
        metrics: &mut MetricsStore,
        timestamp: &str,
    ) -> Vec<IndexPage> {
        let ordered = listing_order(records);
        let total = page_count(ordered.len(), self.page_size);

        (1..=total)
            .map(|page| {
                let start = (page - 1) * self.page_size;
                let end = (start + self.page_size).min(ordered.len());
                let slice = ordered.get(start..end).unwrap_or_default();
                IndexPage {
                    file_name: page_file_name(page),
                    html: self.render_page(slice, metrics, page, total, timestamp),
                    count: slice.len(),
                }
            })
            .collect()
    }

    fn render_page(
        &self,
        records: &[&DocumentRecord],
        metrics: &mut MetricsStore,
        page: usize,
        total: usize,
        timestamp: &str,
    ) -> String {
        let title = escape_html(self.site_title);
        let mut html = String::with_capacity(4096 + records.len() * 512);

        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        html.push_str("<meta charset=\"UTF-8\">\n");
        html.push_str(
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
        );
        let _ = writeln!(html, "<title>{title} - Internal Documentation</title>");
        html.push_str("<link rel=\"stylesheet\" href=\"/assets/index.css\">\n");
        html.push_str("</head>\n<body>\n");
        let _ = writeln!(
            html,
            "<div class=\"header\">\n<h1>{title}</h1>\n\
             <p class=\"subtitle\">Internal Documentation Portal</p>\n</div>"
        );
        html.push_str("<div class=\"container\">\n");
        let _ = writeln!(
            html,
            "<div class=\"stats\"><div class=\"stat-item\">\
             <div class=\"stat-number\">{}</div>\
             <div class=\"stat-label\">Documents on this page</div></div></div>",
            records.len()
        );

        html.push_str("<div class=\"table-container\">\n<table class=\"doc-table\">\n");
        html.push_str(
            "<thead>\n<tr><th>Document ID</th><th>Title</th><th>Category</th>\
             <th>Author</th><th>Version</th><th>Tags</th><th>Views</th>\
             <th>Downloads</th><th>Shares</th></tr>\n</thead>\n<tbody>\n",
        );
        if records.is_empty() {
            html.push_str(
                "<tr><td colspan=\"9\" class=\"empty-state\">No documents published</td></tr>\n",
            );
        }
        for record in records {
            self.render_row(&mut html, record, metrics);
        }
        html.push_str("</tbody>\n</table>\n</div>\n");

        html.push_str(&pagination_html(page, total));
        html.push('\n');

        let _ = writeln!(
            html,
            "<div class=\"footer\">\n<p>Last updated: {}</p>\n\
             <p class=\"notice\">Internal Use Only</p>\n</div>",
            escape_html(timestamp)
        );
        html.push_str("</div>\n</body>\n</html>\n");
        html
    }

    fn render_row(&self, html: &mut String, record: &DocumentRecord, metrics: &mut MetricsStore) {
        let Some(public_id) = record.public_id.as_deref() else {
            return;
        };
        let counts = metrics.get_or_init(public_id);
        let id = escape_html(public_id);
        let column = |name: &str| {
            find_property(&record.properties, name)
                .filter(|v| !v.is_blank())
                .map_or_else(|| "-".to_owned(), |v| escape_html(&v.to_string()))
        };

        let _ = writeln!(
            html,
            "<tr>\
             <td class=\"doc-id\"><a href=\"/documents/{id}.html\">{id}</a></td>\
             <td class=\"doc-title\"><a href=\"/documents/{id}.html\">{}</a></td>\
             <td>{}</td><td>{}</td><td>{}</td><td>{}</td>\
             <td>{}</td><td>{}</td><td>{}</td>\
             </tr>",
            escape_html(&record.title),
            column(&self.fields.category),
            column(&self.fields.author),
            column(&self.fields.version),
            column(&self.fields.tags),
            counts.views,
            counts.downloads,
            counts.shares,
        );
    }
}
