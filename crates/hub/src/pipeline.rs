//! Ordered publishing phases.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use hub_config::Config;
use hub_identity::{IdScheme, ReconcileReport, Reconciler};
use hub_notion::{Fetcher, RecordFields, RemoteIdSink, RemoteRecord, RemoteSource};
use hub_site::{ListingFields, RenderReport, SiteBuilder, SiteOptions, load_template};
use hub_store::{
    DocumentRecord, IdentityStore, ManifestStore, MetricsStore, Snapshot, SnapshotStore,
};

use crate::error::PipelineError;

/// Counts from the content caching phase.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheReport {
    pub cached: usize,
    /// Snapshots written from an incomplete content tree.
    pub partial: usize,
    pub errors: usize,
}

/// Outcome of a full run.
#[derive(Clone, Debug, Default)]
pub struct PipelineSummary {
    pub total: usize,
    pub published: usize,
    pub identity: ReconcileReport,
    pub cache: CacheReport,
    pub render: RenderReport,
    pub index_pages: usize,
    pub search_entries: usize,
    /// Public IDs whose pages were removed.
    pub removed: Vec<String>,
    pub duration: Duration,
}

impl PipelineSummary {
    /// Per-record failures across all phases.
    #[must_use]
    pub fn errors(&self) -> usize {
        self.identity.unassigned
            + self.identity.write_failures
            + self.cache.errors
            + self.render.errors
    }
}

/// Output of the reconcile phase.
struct Resolved {
    documents: Vec<DocumentRecord>,
    report: ReconcileReport,
    /// Every public ID in the identity mapping.
    known_ids: Vec<String>,
}

/// One publishing run over a remote source.
pub struct Pipeline<'a, S: RemoteSource> {
    config: &'a Config,
    source: &'a S,
}

impl<'a, S: RemoteSource> Pipeline<'a, S> {
    #[must_use]
    pub fn new(config: &'a Config, source: &'a S) -> Self {
        Self { config, source }
    }

    /// Run every phase.
    ///
    /// # Errors
    ///
    /// Fails when the collection cannot be fetched or local state cannot be
    /// read or written. Per-record failures are counted in the summary.
    pub fn run(&self) -> Result<PipelineSummary, PipelineError> {
        let start = Instant::now();
        let paths = &self.config.paths_resolved;

        // Template errors are configuration errors: fail before touching state.
        let template = load_template(self.config.site_resolved.document_template.as_deref())?;

        let records = self.fetch_records()?;
        let Resolved {
            documents,
            report: identity,
            known_ids,
        } = self.reconcile(&records)?;

        let manifests = ManifestStore::new(paths.cache_dir());
        let published = manifests.write(&documents)?;

        let snapshots = SnapshotStore::new(paths.cache_dir());
        let cache = self.cache_content(&records, &published, &snapshots);

        let mut metrics = MetricsStore::load(paths.metrics_file())?;
        let site = SiteBuilder::new(self.site_options(), template);
        let render = site.render_documents(&published, &snapshots, &mut metrics);
        let index_pages = site.build_index(&published, &mut metrics)?;
        let search_entries = site.write_search_index(&published)?;
        let known: HashSet<&str> = known_ids.iter().map(String::as_str).collect();
        let removed = site.cleanup(&published, &known)?;
        metrics.save_if_dirty()?;

        Ok(PipelineSummary {
            total: documents.len(),
            published: published.len(),
            identity,
            cache,
            render,
            index_pages,
            search_entries,
            removed,
            duration: start.elapsed(),
        })
    }

    fn fetcher(&self) -> Fetcher<'a, S> {
        Fetcher::new(self.source)
    }

    fn record_fields(&self) -> RecordFields {
        let names = &self.config.notion.properties;
        RecordFields {
            title: names.title.clone(),
            publish: names.publish.clone(),
            public_id: names.public_id.clone(),
        }
    }

    fn site_options(&self) -> SiteOptions {
        let names = &self.config.notion.properties;
        SiteOptions {
            public_dir: self.config.paths_resolved.public_dir.clone(),
            site_title: self.config.site_resolved.title.clone(),
            page_size: self.config.site_resolved.page_size,
            id_prefix: self.config.ids.prefix.clone(),
            fields: ListingFields {
                category: names.category.clone(),
                author: names.author.clone(),
                version: names.version.clone(),
                tags: names.tags.clone(),
            },
        }
    }

    fn fetch_records(&self) -> Result<Vec<RemoteRecord>, PipelineError> {
        let fields = self.record_fields();
        let pages = self.fetcher().fetch_pages()?;
        let records: Vec<RemoteRecord> = pages
            .iter()
            .map(|page| RemoteRecord::from_page(page, &fields))
            .collect();
        tracing::info!(
            total = records.len(),
            published = records.iter().filter(|r| r.published).count(),
            "fetched records"
        );
        Ok(records)
    }

    /// Resolve public IDs and persist the identity state once, if it changed.
    fn reconcile(&self, records: &[RemoteRecord]) -> Result<Resolved, PipelineError> {
        let paths = &self.config.paths_resolved;
        let store = IdentityStore::new(paths.counter_file(), paths.mapping_file());
        let state = store.load()?;

        let scheme = IdScheme::new(self.config.ids.prefix.clone(), self.config.ids.width);
        let inputs: Vec<_> = records.iter().map(RemoteRecord::identity_input).collect();
        let mut sink = RemoteIdSink::new(self.source, &self.config.notion.properties.public_id);
        let reconciled = Reconciler::new(&scheme).reconcile(state, &inputs, &mut sink);

        if reconciled.changed {
            store.save(&reconciled.state)?;
        }

        let documents = records
            .iter()
            .zip(&reconciled.assignments)
            .map(|(record, assignment)| DocumentRecord::new(record, assignment.public_id.clone()))
            .collect();

        let known_ids = reconciled.state.mapping.values().cloned().collect();
        let report = reconciled.report;
        tracing::info!(
            steady = report.steady,
            minted = report.minted,
            adopted = report.adopted,
            pushed = report.pushed,
            reassigned = report.reassigned,
            diverged = report.diverged,
            unassigned = report.unassigned,
            write_failures = report.write_failures,
            "reconciled public IDs"
        );
        Ok(Resolved {
            documents,
            report,
            known_ids,
        })
    }

    /// Fetch the content tree of each published record and replace its snapshot.
    fn cache_content(
        &self,
        records: &[RemoteRecord],
        published: &[DocumentRecord],
        snapshots: &SnapshotStore,
    ) -> CacheReport {
        let fetcher = self.fetcher();
        let by_remote_id: HashMap<&str, &RemoteRecord> =
            records.iter().map(|r| (r.remote_id.as_str(), r)).collect();
        let mut report = CacheReport::default();

        for document in published {
            let Some(public_id) = document.public_id.as_deref() else {
                continue;
            };
            let Some(record) = by_remote_id.get(document.remote_id.as_str()) else {
                continue;
            };

            let tree = fetcher.fetch_tree(&record.remote_id);
            if tree.errors > 0 {
                tracing::warn!(
                    public_id,
                    remote_id = %record.remote_id,
                    failed_subtrees = tree.errors,
                    "content fetched partially"
                );
                report.partial += 1;
            }

            let snapshot = Snapshot::new(
                public_id,
                record.remote_id.as_str(),
                record.title.as_str(),
                record.properties.clone(),
                tree.blocks,
            );
            match snapshots.write(&snapshot) {
                Ok(_) => report.cached += 1,
                Err(e) => {
                    tracing::error!(public_id, "failed to cache content: {e}");
                    report.errors += 1;
                }
            }
        }

        tracing::info!(
            cached = report.cached,
            partial = report.partial,
            errors = report.errors,
            "cached content"
        );
        report
    }
}
