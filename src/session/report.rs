//! Per-file outcomes of an import batch.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ViewerError};

/// What happens to the rest of a batch after a file fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportPolicy {
    /// Keep loading the remaining files and report every failure.
    #[default]
    Continue,
    /// Stop at the first failure; later files are reported as skipped.
    Abort,
}

/// Outcome for one file of a batch.
#[derive(Debug)]
pub enum FileOutcome {
    /// The file was parsed and merged.
    Imported {
        /// Source identifier.
        file: String,
        /// Messages retained.
        messages: usize,
        /// Messages dropped for blank content.
        dropped: usize,
    },
    /// The file could not be read or parsed.
    Failed {
        /// Source identifier.
        file: String,
        /// Why it failed.
        error: ViewerError,
    },
    /// The file was not attempted because the batch was aborted.
    Skipped {
        /// Source identifier.
        file: String,
    },
}

impl FileOutcome {
    /// Source identifier of the file.
    #[must_use]
    pub fn file(&self) -> &str {
        match self {
            Self::Imported { file, .. } | Self::Failed { file, .. } | Self::Skipped { file } => file,
        }
    }
}

/// Result of importing a batch of files.
#[derive(Debug, Default)]
pub struct ImportReport {
    outcomes: Vec<FileOutcome>,
    aborted: bool,
}

impl ImportReport {
    pub(crate) fn push(&mut self, outcome: FileOutcome) {
        self.outcomes.push(outcome);
    }

    pub(crate) fn abort(&mut self) {
        self.aborted = true;
    }

    /// Outcomes in batch order.
    #[must_use]
    pub fn outcomes(&self) -> &[FileOutcome] {
        &self.outcomes
    }

    /// Whether the batch stopped early.
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    /// Whether every file was imported.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.outcomes
            .iter()
            .all(|o| matches!(o, FileOutcome::Imported { .. }))
    }

    /// Number of files imported.
    #[must_use]
    pub fn imported_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FileOutcome::Imported { .. }))
            .count()
    }

    /// Number of files that failed.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.failures().count()
    }

    /// Number of files skipped after an abort.
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FileOutcome::Skipped { .. }))
            .count()
    }

    /// Failed files with their errors.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &ViewerError)> {
        self.outcomes.iter().filter_map(|o| match o {
            FileOutcome::Failed { file, error } => Some((file.as_str(), error)),
            _ => None,
        })
    }

    /// All-or-nothing view: the first failure, if any, as an error.
    pub fn into_result(self) -> Result<Self> {
        let Self { outcomes, aborted } = self;
        let mut kept = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            match outcome {
                FileOutcome::Failed { error, .. } => return Err(error),
                other => kept.push(other),
            }
        }
        Ok(Self {
            outcomes: kept,
            aborted,
        })
    }
}
