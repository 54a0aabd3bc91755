use crate::error::ScanError;
use anyhow::Result;
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct CandidateFile {
    pub path: PathBuf,
    pub name: String,
    pub modified_time: SystemTime,
}

pub struct Scanner {
    root_path: PathBuf,
}

impl Scanner {
    pub fn new(path: &Path) -> Result<Self> {
        let root_path = path
            .canonicalize()
            .map_err(|_| ScanError::InvalidDirectory(path.to_path_buf()))?;
        if !root_path.is_dir() {
            return Err(ScanError::InvalidDirectory(path.to_path_buf()).into());
        }
        Ok(Scanner { root_path })
    }

    pub fn root(&self) -> &Path {
        &self.root_path
    }

    /// Lists the top-level PDFs, most recently modified first.
    pub fn scan(&self) -> Result<Vec<CandidateFile>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(&self.root_path)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            if !path.is_file() || !is_pdf(path) {
                continue;
            }

            match self.create_candidate(path) {
                Ok(candidate) => files.push(candidate),
                Err(e) => warn!("Ignoring {:?}: {}", path, e),
            }
        }

        files.sort_by(|a, b| b.modified_time.cmp(&a.modified_time));

        debug!("Scanner found {} PDFs", files.len());
        Ok(files)
    }

    fn create_candidate(&self, path: &Path) -> Result<CandidateFile> {
        let metadata = fs::metadata(path)?;
        let modified_time = metadata.modified()?;

        // Display only; `path` keeps the exact bytes.
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        Ok(CandidateFile {
            path: path.to_path_buf(),
            name,
            modified_time,
        })
    }
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}
