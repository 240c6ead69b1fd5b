//! Static portal generation.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use hub_identity::IdScheme;
use hub_store::{DocumentRecord, MetricsStore, SnapshotStore};

use crate::cleanup::remove_orphan_pages;
use crate::document::DocumentAssembler;
use crate::error::SiteError;
use crate::index::{IndexBuilder, ListingFields};
use crate::search::search_entries;
use crate::template::{DEFAULT_DOCUMENT_TEMPLATE, PageTemplate};

/// Directory of document pages under the public directory.
pub const DOCUMENTS_DIR: &str = "documents";

/// Search index file under the public directory.
pub const SEARCH_INDEX_FILE: &str = "search-index.json";

/// Options for [`SiteBuilder`].
#[derive(Clone, Debug)]
pub struct SiteOptions {
    pub public_dir: PathBuf,
    pub site_title: String,
    pub page_size: usize,
    /// Public ID prefix; only `<prefix>-*.html` pages are cleaned up.
    pub id_prefix: String,
    pub fields: ListingFields,
}

/// Counts from [`SiteBuilder::render_documents`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderReport {
    pub rendered: usize,
    pub errors: usize,
}

/// Load the document template at `path`, or the built-in one.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid template.
pub fn load_template(path: Option<&Path>) -> Result<PageTemplate, SiteError> {
    let (source, origin) = match path {
        Some(path) => (
            fs::read_to_string(path).map_err(|source| SiteError::Io {
                path: path.to_path_buf(),
                source,
            })?,
            path.to_path_buf(),
        ),
        None => (
            DEFAULT_DOCUMENT_TEMPLATE.to_owned(),
            PathBuf::from("<built-in>"),
        ),
    };
    PageTemplate::parse(&source).map_err(|source| SiteError::Template {
        path: origin,
        source,
    })
}

/// Writes document pages, listing pages and the search index, and prunes
/// pages of unpublished records.
pub struct SiteBuilder {
    options: SiteOptions,
    template: PageTemplate,
}

impl SiteBuilder {
    #[must_use]
    pub fn new(options: SiteOptions, template: PageTemplate) -> Self {
        Self { options, template }
    }

    #[must_use]
    pub fn documents_dir(&self) -> PathBuf {
        self.options.public_dir.join(DOCUMENTS_DIR)
    }

    /// Render every published record from its snapshot.
    ///
    /// Failures are logged with the record's public ID and counted; they do
    /// not stop the pass.
    pub fn render_documents(
        &self,
        records: &[DocumentRecord],
        snapshots: &SnapshotStore,
        metrics: &mut MetricsStore,
    ) -> RenderReport {
        let assembler = DocumentAssembler::new(&self.template, &self.options.site_title);
        let timestamp = timestamp();
        let dir = self.documents_dir();
        let mut report = RenderReport::default();

        for record in records.iter().filter(|r| r.is_publishable()) {
            let Some(public_id) = record.public_id.as_deref() else {
                continue;
            };
            match self.render_document(&assembler, &dir, public_id, snapshots, metrics, &timestamp)
            {
                Ok(path) => {
                    tracing::debug!(public_id, path = %path.display(), "rendered document");
                    report.rendered += 1;
                }
                Err(e) => {
                    tracing::error!(public_id, "failed to render document: {e}");
                    report.errors += 1;
                }
            }
        }

        tracing::info!(
            rendered = report.rendered,
            errors = report.errors,
            "rendered documents"
        );
        report
    }

    fn render_document(
        &self,
        assembler: &DocumentAssembler<'_>,
        dir: &Path,
        public_id: &str,
        snapshots: &SnapshotStore,
        metrics: &mut MetricsStore,
        timestamp: &str,
    ) -> Result<PathBuf, SiteError> {
        if !IdScheme::is_file_safe(public_id) {
            return Err(hub_store::StoreError::InvalidKey(public_id.to_owned()).into());
        }
        let snapshot = snapshots
            .read(public_id)?
            .ok_or_else(|| SiteError::MissingSnapshot(public_id.to_owned()))?;
        let html = assembler.assemble(&snapshot, metrics.get_or_init(public_id), timestamp);
        let path = dir.join(format!("{public_id}.html"));
        write_file(&path, html.as_bytes())?;
        Ok(path)
    }

    /// Write the listing pages and return how many were written.
    pub fn build_index(
        &self,
        records: &[DocumentRecord],
        metrics: &mut MetricsStore,
    ) -> Result<usize, SiteError> {
        let published: Vec<DocumentRecord> = records
            .iter()
            .filter(|r| r.is_publishable())
            .cloned()
            .collect();
        let builder = IndexBuilder::new(
            &self.options.site_title,
            self.options.page_size,
            &self.options.fields,
        );
        let pages = builder.build(&published, metrics, &timestamp());

        for page in &pages {
            write_file(&self.options.public_dir.join(&page.file_name), page.html.as_bytes())?;
            tracing::debug!(file = %page.file_name, count = page.count, "wrote listing page");
        }
        tracing::info!(
            pages = pages.len(),
            documents = published.len(),
            "built index"
        );
        Ok(pages.len())
    }

    /// Write the search index and return its entry count.
    pub fn write_search_index(&self, records: &[DocumentRecord]) -> Result<usize, SiteError> {
        let published: Vec<DocumentRecord> = records
            .iter()
            .filter(|r| r.is_publishable())
            .cloned()
            .collect();
        let entries = search_entries(&published, &self.options.fields);
        let json = serde_json::to_vec_pretty(&entries)?;
        write_file(&self.options.public_dir.join(SEARCH_INDEX_FILE), &json)?;
        tracing::info!(entries = entries.len(), "wrote search index");
        Ok(entries.len())
    }

    /// Remove document pages of records absent from `records`' published set.
    ///
    /// `known_ids` are every public ID ever assigned, so pages of adopted IDs
    /// outside the configured prefix are found too.
    pub fn cleanup(
        &self,
        records: &[DocumentRecord],
        known_ids: &HashSet<&str>,
    ) -> Result<Vec<String>, SiteError> {
        let keep: HashSet<&str> = records
            .iter()
            .filter(|r| r.is_publishable())
            .filter_map(|r| r.public_id.as_deref())
            .collect();
        let removed = remove_orphan_pages(
            &self.documents_dir(),
            &self.options.id_prefix,
            known_ids,
            &keep,
        )?;
        tracing::info!(removed = removed.len(), "cleanup complete");
        Ok(removed)
    }
}

fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

fn write_file(path: &Path, contents: &[u8]) -> Result<(), SiteError> {
    let io_err = |source| SiteError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, contents).map_err(io_err)
}
