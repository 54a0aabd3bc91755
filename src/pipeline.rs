use crate::config::Config;
use crate::error::{ExtractError, LlmError, ParseError, Rejection};
use crate::extractor::extract_leading_text;
use crate::llm::MetadataService;
use crate::naming::{generate_new_filename, resolve_destination, resolve_destination_with};
use crate::prompts::{build_task_prompt, SYSTEM_PROMPT};
use crate::report::RunReport;
use crate::response::{parse_reply, InferredMetadata};
use crate::scanner::CandidateFile;
use crate::writer::{replace_original, DocumentInfo};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// What the inference stage produced for one file.
#[derive(Debug)]
pub enum Inference {
    Record(InferredMetadata),
    ExtractionFailed(ExtractError),
    ExtractionEmpty,
    ServiceError(LlmError),
    ParseError(ParseError),
    Rejected(Rejection),
}

/// Why a file was left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    ExtractionFailed(String),
    NoText,
    ServiceError(String),
    ParseError(String),
    Rejected(String),
    AlreadyNamed,
    WriteFailed(String),
}

impl SkipReason {
    pub fn slug(&self) -> &'static str {
        match self {
            SkipReason::ExtractionFailed(_) => "extraction_failed",
            SkipReason::NoText => "no_text",
            SkipReason::ServiceError(_) => "service_error",
            SkipReason::ParseError(_) => "parse_error",
            SkipReason::Rejected(_) => "rejected",
            SkipReason::AlreadyNamed => "already_named",
            SkipReason::WriteFailed(_) => "write_failed",
        }
    }

    pub fn message(&self) -> String {
        match self {
            SkipReason::ExtractionFailed(detail) => format!("text extraction failed: {}", detail),
            SkipReason::NoText => "no text found".to_string(),
            SkipReason::ServiceError(detail) => format!("LLM error: {}", detail),
            SkipReason::ParseError(detail) => format!("LLM reply could not be parsed: {}", detail),
            SkipReason::Rejected(detail) => format!("LLM metadata guess unreliable: {}", detail),
            SkipReason::AlreadyNamed => "already has the inferred name".to_string(),
            SkipReason::WriteFailed(detail) => format!("metadata/write error: {}", detail),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Renamed { to: PathBuf },
    Planned { to: PathBuf },
    Skipped(SkipReason),
}

/// Names a dry run has handed out or freed, so later plans see the
/// directory as a real run would leave it.
#[derive(Debug, Default)]
struct PlannedNames {
    claimed: HashSet<PathBuf>,
    vacated: HashSet<PathBuf>,
}

impl PlannedNames {
    fn is_taken(&self, path: &Path) -> bool {
        self.claimed.contains(path) || (path.exists() && !self.vacated.contains(path))
    }
}

pub struct Renamer {
    service: Box<dyn MetadataService>,
    page_limit: usize,
    dry_run: bool,
    planned: PlannedNames,
}

impl Renamer {
    pub fn new(service: Box<dyn MetadataService>, config: &Config) -> Self {
        Self {
            service,
            page_limit: config.page_limit,
            dry_run: config.dry_run,
            planned: PlannedNames::default(),
        }
    }

    /// Extracts the leading text of `path` and asks the model what the document is.
    pub async fn infer(&self, path: &Path) -> Inference {
        let text = match extract_leading_text(path, self.page_limit) {
            Ok(Some(text)) => text,
            Ok(None) => return Inference::ExtractionEmpty,
            Err(e) => return Inference::ExtractionFailed(e),
        };

        let task = build_task_prompt(&text, self.page_limit);
        let reply = match self.service.complete(SYSTEM_PROMPT, &task).await {
            Ok(reply) => reply,
            Err(e) => return Inference::ServiceError(e),
        };
        debug!("Model reply for {:?}: {}", path, reply);

        let record = match parse_reply(&reply) {
            Ok(record) => record,
            Err(e) => return Inference::ParseError(e),
        };

        match record.validate() {
            Ok(()) => Inference::Record(record),
            Err(rejection) => Inference::Rejected(rejection),
        }
    }

    pub async fn process_file(&mut self, file: &CandidateFile) -> FileOutcome {
        let record = match self.infer(&file.path).await {
            Inference::Record(record) => record,
            Inference::ExtractionFailed(e) => {
                warn!("Failed to extract from {}: {}", file.name, e);
                return FileOutcome::Skipped(SkipReason::ExtractionFailed(e.to_string()));
            }
            Inference::ExtractionEmpty => {
                info!("No text found in {}", file.name);
                return FileOutcome::Skipped(SkipReason::NoText);
            }
            Inference::ServiceError(e) => {
                warn!("LLM error for {}: {}", file.name, e);
                return FileOutcome::Skipped(SkipReason::ServiceError(e.to_string()));
            }
            Inference::ParseError(e) => {
                warn!("LLM error (after cleaning) for {}: {}", file.name, e);
                return FileOutcome::Skipped(SkipReason::ParseError(e.to_string()));
            }
            Inference::Rejected(rejection) => {
                info!("Unreliable metadata for {}: {}", file.name, rejection);
                return FileOutcome::Skipped(SkipReason::Rejected(rejection.to_string()));
            }
        };

        let dir = file.path.parent().unwrap_or_else(|| Path::new("."));
        let new_name = generate_new_filename(&record);
        if dir.join(&new_name) == file.path {
            info!("{} already has its inferred name", file.name);
            return FileOutcome::Skipped(SkipReason::AlreadyNamed);
        }

        if self.dry_run {
            let planned = &self.planned;
            let destination = resolve_destination_with(dir, &new_name, |p| planned.is_taken(p));
            self.planned.claimed.insert(destination.clone());
            self.planned.vacated.insert(file.path.clone());
            return FileOutcome::Planned { to: destination };
        }

        let destination = resolve_destination(dir, &new_name);

        let doc_info = DocumentInfo::from_metadata(&record);
        match replace_original(&file.path, &destination, &doc_info) {
            Ok(()) => {
                info!("Renamed: {} -> {:?}", file.name, destination);
                FileOutcome::Renamed { to: destination }
            }
            Err(e) => {
                warn!("Error updating/writing PDF ({}): {}", file.name, e);
                FileOutcome::Skipped(SkipReason::WriteFailed(e.to_string()))
            }
        }
    }

    /// Processes `files` one after another, reporting each outcome as it lands.
    pub async fn process_all<F>(&mut self, files: &[CandidateFile], mut on_file: F) -> RunReport
    where
        F: FnMut(&CandidateFile, &FileOutcome),
    {
        let mut report = RunReport::new(self.dry_run);
        for file in files {
            let outcome = self.process_file(file).await;
            on_file(file, &outcome);
            report.record(file, &outcome);
        }
        report
    }
}
