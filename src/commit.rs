//! Commit gate: turn a merge outcome into a write (or not) and an exit signal.

use crate::error::Result;
use crate::merge::MergeOutcome;
use std::process::ExitCode;
use tracing::{error, info};

/// Process-level result of one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitSignal {
    Success,
    Failure,
}

impl ExitSignal {
    pub fn code(self) -> u8 {
        match self {
            ExitSignal::Success => 0,
            ExitSignal::Failure => 1,
        }
    }

    /// Failure if either signal is a failure.
    pub fn combine(self, other: ExitSignal) -> ExitSignal {
        if self == ExitSignal::Failure || other == ExitSignal::Failure {
            ExitSignal::Failure
        } else {
            ExitSignal::Success
        }
    }

    pub fn is_success(self) -> bool {
        self == ExitSignal::Success
    }
}

impl From<ExitSignal> for ExitCode {
    fn from(signal: ExitSignal) -> Self {
        ExitCode::from(signal.code())
    }
}

/// Persist `outcome` with `write` only when it carries a change.
///
/// `artifact` names the artifact in diagnostics.
pub fn commit<T, F>(outcome: MergeOutcome<T>, artifact: &str, write: F) -> ExitSignal
where
    F: FnOnce(&T) -> Result<()>,
{
    match outcome {
        MergeOutcome::Fatal(e) => {
            error!("{}: {} stage failed: {}", artifact, e.stage(), e);
            ExitSignal::Failure
        }
        MergeOutcome::Unchanged(reason) => {
            info!("{}: up-to-date ({}); skipping write", artifact, reason);
            ExitSignal::Success
        }
        MergeOutcome::Changed { policy, merged } => match write(&merged) {
            Ok(()) => {
                info!("{}: updated ({})", artifact, policy);
                ExitSignal::Success
            }
            Err(e) => {
                error!("{}: {} stage failed: {}", artifact, e.stage(), e);
                ExitSignal::Failure
            }
        },
    }
}
