//! Identity reconciliation over a batch of records.

use std::collections::HashMap;
use std::fmt::Display;

use crate::decision::{Action, Observation, decide};
use crate::scheme::IdScheme;
use crate::state::IdentityState;

/// The remote copy of a record's public ID, as read from the source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RemoteField {
    /// Field missing or empty.
    Absent,
    /// Field carries a value.
    Present(String),
    /// Field could not be read; the record is left unassigned this run.
    Unreadable(String),
}

impl RemoteField {
    /// Build from an optional raw value, treating blank text as absent.
    #[must_use]
    pub fn from_value(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if !v.is_empty() => Self::Present(v.to_owned()),
            _ => Self::Absent,
        }
    }
}

/// One record entering reconciliation.
#[derive(Clone, Debug)]
pub struct IdentityInput {
    pub remote_id: String,
    pub remote_field: RemoteField,
}

/// Destination for public IDs written back to the remote source.
pub trait IdentitySink {
    type Error: Display;

    /// Write `public_id` into the remote field of `remote_id`.
    fn write_public_id(&mut self, remote_id: &str, public_id: &str) -> Result<(), Self::Error>;
}

/// Resolved public ID for one record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assignment {
    pub remote_id: String,
    /// `None` means unassigned for this run.
    pub public_id: Option<String>,
    pub action: Option<Action>,
}

/// Per-action counts for a reconciliation pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub total: usize,
    pub steady: usize,
    pub pushed: usize,
    pub adopted: usize,
    pub minted: usize,
    pub reassigned: usize,
    /// Local and remote both present and different; local kept.
    pub diverged: usize,
    /// Records left without a public ID.
    pub unassigned: usize,
    /// Remote write-backs that failed; retried next run.
    pub write_failures: usize,
}

/// Result of [`Reconciler::reconcile`].
#[derive(Debug)]
pub struct Reconciled {
    /// Updated state to persist.
    pub state: IdentityState,
    /// Whether `state` differs from the input state.
    pub changed: bool,
    /// One entry per input record, in input order.
    pub assignments: Vec<Assignment>,
    pub report: ReconcileReport,
}

/// Assigns public IDs to a batch of records.
///
/// The reconciler holds no state of its own: the caller loads an
/// [`IdentityState`], passes it in, and persists the returned one.
pub struct Reconciler<'a> {
    scheme: &'a IdScheme,
}

impl<'a> Reconciler<'a> {
    #[must_use]
    pub fn new(scheme: &'a IdScheme) -> Self {
        Self { scheme }
    }

    /// Reconcile every record against `state`, writing repairs through `sink`.
    ///
    /// Per-record failures are logged and counted; they never stop the batch.
    /// A failed remote write leaves the local state advanced so the next run
    /// repairs the remote copy.
    pub fn reconcile<S: IdentitySink>(
        &self,
        state: IdentityState,
        records: &[IdentityInput],
        sink: &mut S,
    ) -> Reconciled {
        let before = state.clone();
        let mut counter = state.effective_counter();
        let mut mapping = state.mapping;
        let mut owners: HashMap<String, String> = mapping
            .iter()
            .map(|(remote, public)| (public.clone(), remote.clone()))
            .collect();

        let mut report = ReconcileReport {
            total: records.len(),
            ..ReconcileReport::default()
        };
        let mut assignments = Vec::with_capacity(records.len());

        for record in records {
            let remote = match &record.remote_field {
                RemoteField::Unreadable(reason) => {
                    tracing::error!(
                        remote_id = %record.remote_id,
                        "cannot read public ID field, leaving unassigned: {reason}"
                    );
                    report.unassigned += 1;
                    assignments.push(Assignment {
                        remote_id: record.remote_id.clone(),
                        public_id: None,
                        action: None,
                    });
                    continue;
                }
                RemoteField::Absent => None,
                RemoteField::Present(value) => Some(value.as_str()),
            };

            let local = mapping.get(&record.remote_id).map(String::as_str);
            let remote_taken = remote.is_some_and(|id| {
                owners
                    .get(id)
                    .is_some_and(|owner| owner != &record.remote_id)
            });
            let decision = decide(
                Observation {
                    local,
                    remote,
                    remote_taken,
                },
                counter,
                self.scheme,
            );

            match decision.action {
                Action::Exhausted => {
                    tracing::error!(
                        remote_id = %record.remote_id,
                        counter,
                        "public ID counter exhausted, leaving unassigned"
                    );
                    report.unassigned += 1;
                    assignments.push(Assignment {
                        remote_id: record.remote_id.clone(),
                        public_id: None,
                        action: Some(Action::Exhausted),
                    });
                    continue;
                }
                Action::Steady => report.steady += 1,
                Action::PushLocal => {
                    tracing::info!(
                        remote_id = %record.remote_id,
                        public_id = %decision.public_id,
                        "remote public ID missing, restoring from local mapping"
                    );
                    report.pushed += 1;
                }
                Action::Adopt => {
                    if IdScheme::ordinal_of(&decision.public_id).is_none() {
                        tracing::warn!(
                            remote_id = %record.remote_id,
                            public_id = %decision.public_id,
                            "adopted public ID has no ordinal, counter unchanged"
                        );
                    } else {
                        tracing::info!(
                            remote_id = %record.remote_id,
                            public_id = %decision.public_id,
                            "adopted public ID from remote"
                        );
                    }
                    report.adopted += 1;
                }
                Action::Mint => {
                    tracing::info!(
                        remote_id = %record.remote_id,
                        public_id = %decision.public_id,
                        "assigned new public ID"
                    );
                    report.minted += 1;
                }
                Action::Reassign => {
                    tracing::warn!(
                        remote_id = %record.remote_id,
                        duplicate = remote.unwrap_or_default(),
                        public_id = %decision.public_id,
                        "remote public ID belongs to another record, assigned new ID"
                    );
                    report.reassigned += 1;
                }
                Action::KeepLocal => {
                    tracing::warn!(
                        remote_id = %record.remote_id,
                        local = local.unwrap_or_default(),
                        remote = remote.unwrap_or_default(),
                        "local and remote public IDs differ, keeping local"
                    );
                    report.diverged += 1;
                }
            }

            counter = decision.counter;
            if let Some(new_local) = &decision.new_local {
                owners.insert(new_local.clone(), record.remote_id.clone());
                mapping.insert(record.remote_id.clone(), new_local.clone());
            }
            if let Some(new_remote) = &decision.new_remote
                && let Err(e) = sink.write_public_id(&record.remote_id, new_remote)
            {
                tracing::error!(
                    remote_id = %record.remote_id,
                    public_id = %new_remote,
                    "failed to write public ID to remote: {e}"
                );
                report.write_failures += 1;
            }

            assignments.push(Assignment {
                remote_id: record.remote_id.clone(),
                public_id: Some(decision.public_id),
                action: Some(decision.action),
            });
        }

        let state = IdentityState { counter, mapping };
        let changed = state != before;

        tracing::info!(
            total = report.total,
            minted = report.minted,
            adopted = report.adopted,
            pushed = report.pushed,
            diverged = report.diverged,
            unassigned = report.unassigned,
            write_failures = report.write_failures,
            "reconciliation complete"
        );

        Reconciled {
            state,
            changed,
            assignments,
            report,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::{BTreeMap, HashSet};

    /// Records writes; fails for remote IDs listed in `failing`.
    #[derive(Default)]
    struct RecordingSink {
        writes: Vec<(String, String)>,
        failing: HashSet<String>,
    }

    impl IdentitySink for RecordingSink {
        type Error = String;

        fn write_public_id(&mut self, remote_id: &str, public_id: &str) -> Result<(), String> {
            if self.failing.contains(remote_id) {
                return Err("rejected".to_owned());
            }
            self.writes.push((remote_id.to_owned(), public_id.to_owned()));
            Ok(())
        }
    }

    fn input(remote_id: &str, remote: Option<&str>) -> IdentityInput {
        IdentityInput {
            remote_id: remote_id.to_owned(),
            remote_field: RemoteField::from_value(remote),
        }
    }

    fn state(counter: u64, entries: &[(&str, &str)]) -> IdentityState {
        IdentityState {
            counter,
            mapping: entries
                .iter()
                .map(|(r, p)| ((*r).to_owned(), (*p).to_owned()))
                .collect(),
        }
    }

    fn public_ids(reconciled: &Reconciled) -> Vec<Option<String>> {
        reconciled
            .assignments
            .iter()
            .map(|a| a.public_id.clone())
            .collect()
    }

    #[test]
    fn test_matrix_local_only_writes_remote() {
        let scheme = IdScheme::default();
        let mut sink = RecordingSink::default();
        let before = state(1, &[("a", "DOC-0001")]);
        let out = Reconciler::new(&scheme).reconcile(before.clone(), &[input("a", None)], &mut sink);

        assert_eq!(sink.writes, vec![("a".to_owned(), "DOC-0001".to_owned())]);
        assert_eq!(out.state, before);
        assert!(!out.changed);
        assert_eq!(out.report.pushed, 1);
    }

    #[test]
    fn test_matrix_remote_only_adopts() {
        let scheme = IdScheme::default();
        let mut sink = RecordingSink::default();
        let out = Reconciler::new(&scheme).reconcile(
            state(3, &[]),
            &[input("a", Some("DOC-0042"))],
            &mut sink,
        );

        assert!(sink.writes.is_empty());
        assert_eq!(out.state, state(42, &[("a", "DOC-0042")]));
        assert!(out.changed);
        assert_eq!(out.report.adopted, 1);
    }

    #[test]
    fn test_matrix_neither_mints() {
        let scheme = IdScheme::default();
        let mut sink = RecordingSink::default();
        let out = Reconciler::new(&scheme).reconcile(state(3, &[]), &[input("a", None)], &mut sink);

        assert_eq!(sink.writes, vec![("a".to_owned(), "DOC-0004".to_owned())]);
        assert_eq!(out.state, state(4, &[("a", "DOC-0004")]));
        assert_eq!(out.report.minted, 1);
    }

    #[test]
    fn test_matrix_both_equal_is_noop() {
        let scheme = IdScheme::default();
        let mut sink = RecordingSink::default();
        let before = state(1, &[("a", "DOC-0001")]);
        let out = Reconciler::new(&scheme).reconcile(
            before.clone(),
            &[input("a", Some("DOC-0001"))],
            &mut sink,
        );

        assert!(sink.writes.is_empty());
        assert_eq!(out.state, before);
        assert!(!out.changed);
        assert_eq!(out.report.steady, 1);
    }

    #[test]
    fn test_adopted_max_ordinal_does_not_wrap_counter() {
        let scheme = IdScheme::default();
        let mut sink = RecordingSink::default();
        let out = Reconciler::new(&scheme).reconcile(
            state(3, &[]),
            &[input("a", Some("DOC-18446744073709551615")), input("b", None)],
            &mut sink,
        );

        assert_eq!(
            public_ids(&out),
            vec![Some("DOC-18446744073709551615".to_owned()), None]
        );
        assert_eq!(out.state.counter, u64::MAX);
        assert!(!out.state.mapping.contains_key("b"));
        assert!(sink.writes.is_empty());
        assert_eq!(out.report.adopted, 1);
        assert_eq!(out.report.unassigned, 1);
        assert_eq!(out.assignments[1].action, Some(Action::Exhausted));
    }

    #[test]
    fn test_divergence_keeps_local_and_counts() {
        let scheme = IdScheme::default();
        let mut sink = RecordingSink::default();
        let before = state(5, &[("a", "DOC-0001")]);
        let out = Reconciler::new(&scheme).reconcile(
            before.clone(),
            &[input("a", Some("DOC-0005"))],
            &mut sink,
        );

        assert!(sink.writes.is_empty());
        assert_eq!(out.state, before);
        assert_eq!(public_ids(&out), vec![Some("DOC-0001".to_owned())]);
        assert_eq!(out.report.diverged, 1);
    }

    #[test]
    fn test_idempotent_second_run() {
        let scheme = IdScheme::default();
        let reconciler = Reconciler::new(&scheme);
        let mut sink = RecordingSink::default();
        let records = vec![input("a", None), input("b", Some("DOC-0010")), input("c", None)];

        let first = reconciler.reconcile(IdentityState::default(), &records, &mut sink);

        // The remote now carries what was written back.
        let written: BTreeMap<String, String> = sink.writes.iter().cloned().collect();
        let records_after: Vec<IdentityInput> = records
            .iter()
            .map(|r| {
                let remote = match &r.remote_field {
                    RemoteField::Present(v) => Some(v.clone()),
                    _ => written.get(&r.remote_id).cloned(),
                };
                input(&r.remote_id, remote.as_deref())
            })
            .collect();

        let mut second_sink = RecordingSink::default();
        let second = reconciler.reconcile(first.state.clone(), &records_after, &mut second_sink);

        assert_eq!(public_ids(&first), public_ids(&second));
        assert_eq!(second.state, first.state);
        assert!(!second.changed);
        assert!(second_sink.writes.is_empty());
        assert_eq!(second.report.steady, 3);
    }

    #[test]
    fn test_injective_within_batch() {
        let scheme = IdScheme::default();
        let mut sink = RecordingSink::default();
        let records: Vec<IdentityInput> = (0..50)
            .map(|i| {
                let remote = match i % 5 {
                    0 => Some(format!("DOC-{:04}", 100 + i)),
                    _ => None,
                };
                input(&format!("page-{i}"), remote.as_deref())
            })
            .collect();

        let out = Reconciler::new(&scheme).reconcile(state(7, &[]), &records, &mut sink);

        let ids: Vec<String> = out
            .assignments
            .iter()
            .filter_map(|a| a.public_id.clone())
            .collect();
        let unique: HashSet<&String> = ids.iter().collect();
        assert_eq!(ids.len(), 50);
        assert_eq!(unique.len(), 50);
    }

    #[test]
    fn test_counter_monotonic_and_covers_observed() {
        let scheme = IdScheme::default();
        let mut sink = RecordingSink::default();
        let out = Reconciler::new(&scheme).reconcile(
            state(20, &[]),
            &[input("a", Some("DOC-0005")), input("b", Some("DOC-0031")), input("c", None)],
            &mut sink,
        );

        assert!(out.state.counter >= 20);
        assert!(out.state.counter >= 31);
        // Fresh IDs are minted above every observed ordinal.
        assert_eq!(out.assignments[2].public_id.as_deref(), Some("DOC-0032"));
    }

    #[test]
    fn test_duplicate_remote_value_is_reassigned() {
        let scheme = IdScheme::default();
        let mut sink = RecordingSink::default();
        let out = Reconciler::new(&scheme).reconcile(
            state(1, &[("a", "DOC-0001")]),
            &[input("a", Some("DOC-0001")), input("copy-of-a", Some("DOC-0001"))],
            &mut sink,
        );

        assert_eq!(
            public_ids(&out),
            vec![Some("DOC-0001".to_owned()), Some("DOC-0002".to_owned())]
        );
        assert_eq!(
            sink.writes,
            vec![("copy-of-a".to_owned(), "DOC-0002".to_owned())]
        );
        assert_eq!(out.report.reassigned, 1);
    }

    #[test]
    fn test_write_failure_does_not_abort_batch() {
        let scheme = IdScheme::default();
        let mut sink = RecordingSink {
            failing: HashSet::from(["a".to_owned()]),
            ..RecordingSink::default()
        };
        let out = Reconciler::new(&scheme).reconcile(
            IdentityState::default(),
            &[input("a", None), input("b", None)],
            &mut sink,
        );

        assert_eq!(out.report.write_failures, 1);
        assert_eq!(out.state, state(2, &[("a", "DOC-0001"), ("b", "DOC-0002")]));
        assert_eq!(sink.writes, vec![("b".to_owned(), "DOC-0002".to_owned())]);
    }

    #[test]
    fn test_unreadable_field_left_unassigned() {
        let scheme = IdScheme::default();
        let mut sink = RecordingSink::default();
        let records = vec![
            IdentityInput {
                remote_id: "a".to_owned(),
                remote_field: RemoteField::Unreadable("unexpected type".to_owned()),
            },
            input("b", None),
        ];
        let out = Reconciler::new(&scheme).reconcile(IdentityState::default(), &records, &mut sink);

        assert_eq!(public_ids(&out), vec![None, Some("DOC-0001".to_owned())]);
        assert_eq!(out.report.unassigned, 1);
        assert!(!out.state.mapping.contains_key("a"));
    }

    #[test]
    fn test_blank_remote_value_is_absent() {
        assert_eq!(RemoteField::from_value(Some("   ")), RemoteField::Absent);
        assert_eq!(RemoteField::from_value(None), RemoteField::Absent);
        assert_eq!(
            RemoteField::from_value(Some(" DOC-0001 ")),
            RemoteField::Present("DOC-0001".to_owned())
        );
    }
}
