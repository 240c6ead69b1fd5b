//! Colored run summary on stderr.

use std::fmt::Display;

use console::{Style, Term};
use hub::PipelineSummary;

/// Width of the label column in summary lines.
const LABEL_WIDTH: usize = 15;

/// Width of the rule framing the summary heading.
const RULE_WIDTH: usize = 60;

/// Summary printer writing to stderr.
pub(crate) struct Output {
    term: Term,
    green: Style,
    yellow: Style,
    red: Style,
    heading: Style,
}

impl Output {
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
            heading: Style::new().cyan().bold(),
        }
    }

    fn line(&self, text: &str) {
        let _ = self.term.write_line(text);
    }

    pub(crate) fn error(&self, msg: &str) {
        self.line(&self.red.apply_to(msg).to_string());
    }

    fn warning(&self, msg: &str) {
        self.line(&self.yellow.apply_to(msg).to_string());
    }

    fn stat(&self, label: &str, value: impl Display) {
        self.line(&stat_line(label, value));
    }

    /// Print the per-phase counts of a finished run.
    pub(crate) fn summary(&self, summary: &PipelineSummary) {
        let rule = "=".repeat(RULE_WIDTH);
        self.line(&rule);
        self.line(&self.heading.apply_to("Sync complete").to_string());
        self.line(&rule);

        let identity = &summary.identity;
        self.stat("Records", summary.total);
        self.stat("Published", summary.published);
        self.stat(
            "Public IDs",
            format_args!(
                "{} new, {} adopted, {} restored, {} reassigned",
                identity.minted, identity.adopted, identity.pushed, identity.reassigned
            ),
        );
        self.stat("Cached", summary.cache.cached);
        self.stat("Rendered", summary.render.rendered);
        self.stat("Index pages", summary.index_pages);
        self.stat("Search entries", summary.search_entries);
        self.stat("Removed", summary.removed.len());
        self.stat(
            "Duration",
            format_args!("{:.2}s", summary.duration.as_secs_f64()),
        );

        if identity.diverged > 0 {
            self.warning(&format!(
                "{} record(s) carry a remote public ID different from the local one; local kept",
                identity.diverged
            ));
        }
        if summary.cache.partial > 0 {
            self.warning(&format!(
                "{} document(s) cached with incomplete content",
                summary.cache.partial
            ));
        }

        match summary.errors() {
            0 => self.line(&self.green.apply_to("No errors").to_string()),
            errors => self.error(&stat_line("Errors", format_args!("{errors} (see log)"))),
        }
    }
}

/// `label:` padded to the label column, then the value.
fn stat_line(label: &str, value: impl Display) -> String {
    format!("{:<width$}{value}", format!("{label}:"), width = LABEL_WIDTH + 1)
}
