use crate::pipeline::FileOutcome;
use crate::scanner::CandidateFile;
use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameOperation {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedFile {
    pub file: String,
    pub reason: String,
    pub message: String,
}

/// Everything one run did, in scan order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub dry_run: bool,
    pub renamed: Vec<RenameOperation>,
    pub skipped: Vec<SkippedFile>,
}

impl RunReport {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            renamed: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn record(&mut self, file: &CandidateFile, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Renamed { to } | FileOutcome::Planned { to } => {
                let to_name = to
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| to.to_string_lossy().to_string());
                self.renamed.push(RenameOperation {
                    from: file.name.clone(),
                    to: to_name,
                });
            }
            FileOutcome::Skipped(reason) => {
                self.skipped.push(SkippedFile {
                    file: file.name.clone(),
                    reason: reason.slug().to_string(),
                    message: reason.message(),
                });
            }
        }
    }

    pub fn to_json(&self) -> Result<String> {
        // Sorted copy for deterministic output
        let mut sorted = self.clone();
        sorted.renamed.sort_by(|a, b| a.from.cmp(&b.from));
        sorted.skipped.sort_by(|a, b| {
            a.reason.cmp(&b.reason).then_with(|| a.file.cmp(&b.file))
        });
        Ok(serde_json::to_string_pretty(&sorted)?)
    }
}
