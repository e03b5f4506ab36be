//! Merge engine: decide what, if anything, replaces the persisted baseline.
//!
//! The two artifacts merge differently. Currency records have no stable key
//! (several countries share a code), so a trusted candidate replaces the whole
//! list. Language names are keyed by locale code and only ever grow.

use crate::currency::CurrencyRecord;
use crate::error::{Result, SyncError};
use crate::locale::{LanguageNames, LocaleReconciliation};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    /// The candidate replaces the baseline wholesale.
    FullReplace,
    /// The baseline is kept and only absent keys are added.
    AdditiveByKey,
}

impl fmt::Display for MergePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergePolicy::FullReplace => f.write_str("full replace"),
            MergePolicy::AdditiveByKey => f.write_str("additive by key"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnchangedReason {
    /// The source answered successfully but with nothing in it.
    EmptyCandidate,
    /// The merged result equals the baseline.
    Identical,
}

impl fmt::Display for UnchangedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnchangedReason::EmptyCandidate => f.write_str("candidate is empty"),
            UnchangedReason::Identical => f.write_str("no changes"),
        }
    }
}

#[derive(Debug)]
pub enum MergeOutcome<T> {
    Unchanged(UnchangedReason),
    Changed { policy: MergePolicy, merged: T },
    /// Acquiring the candidate failed; the baseline must not be touched.
    Fatal(SyncError),
}

/// Replace `baseline` with `candidate` unless the candidate is empty or equal.
pub fn full_replace<T: PartialEq>(baseline: &[T], candidate: Vec<T>) -> MergeOutcome<Vec<T>> {
    if candidate.is_empty() {
        return MergeOutcome::Unchanged(UnchangedReason::EmptyCandidate);
    }
    if candidate.as_slice() == baseline {
        return MergeOutcome::Unchanged(UnchangedReason::Identical);
    }
    MergeOutcome::Changed {
        policy: MergePolicy::FullReplace,
        merged: candidate,
    }
}

/// Add every `(key, value)` whose key is absent from `baseline`.
///
/// Existing keys keep their baseline value; nothing is ever removed.
pub fn additive_by_key<K, V>(
    baseline: &BTreeMap<K, V>,
    additions: impl IntoIterator<Item = (K, V)>,
) -> MergeOutcome<BTreeMap<K, V>>
where
    K: Ord + Clone,
    V: Clone + PartialEq,
{
    let mut merged = baseline.clone();
    for (key, value) in additions {
        merged.entry(key).or_insert(value);
    }

    if &merged == baseline {
        return MergeOutcome::Unchanged(UnchangedReason::Identical);
    }
    MergeOutcome::Changed {
        policy: MergePolicy::AdditiveByKey,
        merged,
    }
}

pub fn merge_currencies(
    baseline: &[CurrencyRecord],
    candidate: Result<Vec<CurrencyRecord>>,
) -> MergeOutcome<Vec<CurrencyRecord>> {
    match candidate {
        Ok(records) => full_replace(baseline, records),
        Err(e) => MergeOutcome::Fatal(e),
    }
}

pub fn merge_language_names(
    baseline: &LanguageNames,
    candidate: Result<LocaleReconciliation>,
) -> MergeOutcome<LanguageNames> {
    let reconciliation = match candidate {
        Ok(reconciliation) => reconciliation,
        Err(e) => return MergeOutcome::Fatal(e),
    };

    if reconciliation.considered == 0 {
        return MergeOutcome::Unchanged(UnchangedReason::EmptyCandidate);
    }

    additive_by_key(
        baseline,
        reconciliation
            .resolved
            .into_iter()
            .map(|entry| (entry.code, entry.display_name)),
    )
}
