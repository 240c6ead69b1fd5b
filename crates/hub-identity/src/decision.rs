//! Per-record identity decision table.
//!
//! [`decide`] is a pure function of the local mapping entry, the remote field
//! and the counter. It performs no I/O; the [`Reconciler`](crate::Reconciler)
//! applies the returned [`Decision`].
//!
//! | local   | remote  | action                                    |
//! |---------|---------|-------------------------------------------|
//! | present | absent  | [`Action::PushLocal`]: write local to remote |
//! | absent  | present | [`Action::Adopt`]: record remote locally, raise counter |
//! | absent  | absent  | [`Action::Mint`]: next ordinal, record and write |
//! | present | equal   | [`Action::Steady`]                          |
//! | present | differs | [`Action::KeepLocal`]: local wins, no writes |

use crate::scheme::IdScheme;

/// What the reconciler does for one record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Local entry exists, remote field is empty: repair the remote copy.
    PushLocal,
    /// Remote field carries an ID unknown locally: record it.
    Adopt,
    /// Neither side has an ID: assign the next ordinal.
    Mint,
    /// Remote carries an ID already held by another record: assign a fresh one.
    Reassign,
    /// Both sides agree.
    Steady,
    /// Both sides present and different: the local entry is kept.
    KeepLocal,
    /// A new ID is needed but the counter cannot advance; nothing changes.
    Exhausted,
}

/// Outcome of [`decide`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decision {
    pub action: Action,
    /// Resolved public ID for the record.
    pub public_id: String,
    /// Counter after this record.
    pub counter: u64,
    /// New local mapping value, if the mapping changes.
    pub new_local: Option<String>,
    /// Value to write to the remote field, if any.
    pub new_remote: Option<String>,
}

/// What is known about one record before deciding.
#[derive(Clone, Copy, Debug)]
pub struct Observation<'a> {
    /// Public ID from the local mapping.
    pub local: Option<&'a str>,
    /// Non-empty public ID from the remote field.
    pub remote: Option<&'a str>,
    /// Whether `remote` is already mapped to a different record locally.
    pub remote_taken: bool,
}

/// Decide the action for one record.
///
/// Cases are evaluated in priority order; the first match wins.
#[must_use]
pub fn decide(observation: Observation<'_>, counter: u64, scheme: &IdScheme) -> Decision {
    match (observation.local, observation.remote) {
        (Some(local), None) => Decision {
            action: Action::PushLocal,
            public_id: local.to_owned(),
            counter,
            new_local: None,
            new_remote: Some(local.to_owned()),
        },
        (None, Some(remote)) if !observation.remote_taken => Decision {
            action: Action::Adopt,
            public_id: remote.to_owned(),
            counter: IdScheme::ordinal_of(remote).map_or(counter, |ordinal| counter.max(ordinal)),
            new_local: Some(remote.to_owned()),
            new_remote: None,
        },
        (None, remote) => {
            let next = remote
                .and_then(IdScheme::ordinal_of)
                .map_or(counter, |ordinal| counter.max(ordinal))
                .checked_add(1);
            let Some(counter) = next else {
                return Decision {
                    action: Action::Exhausted,
                    public_id: String::new(),
                    counter,
                    new_local: None,
                    new_remote: None,
                };
            };
            let public_id = scheme.format(counter);
            Decision {
                action: if remote.is_some() {
                    Action::Reassign
                } else {
                    Action::Mint
                },
                public_id: public_id.clone(),
                counter,
                new_local: Some(public_id.clone()),
                new_remote: Some(public_id),
            }
        }
        (Some(local), Some(remote)) => Decision {
            action: if local == remote {
                Action::Steady
            } else {
                Action::KeepLocal
            },
            public_id: local.to_owned(),
            counter,
            new_local: None,
            new_remote: None,
        },
    }
}
