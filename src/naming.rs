use crate::response::InferredMetadata;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

pub const MAX_NAME_LEN: usize = 200;
/// Leaves room for `_N.pdf.tmp` under the usual 255-byte file name limit.
pub const MAX_NAME_BYTES: usize = 240;
const PDF_SUFFIX: &str = ".pdf";

static RE_DISALLOWED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s()\-&]").unwrap());
static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// `"{author} - {title} ({pubdate})"`, before any cleaning.
pub fn compose_candidate(metadata: &InferredMetadata) -> String {
    format!(
        "{} - {} ({})",
        metadata.author, metadata.title, metadata.pubdate
    )
}

/// Keeps letters, digits, underscores, whitespace, parentheses, hyphens and
/// ampersands, collapses whitespace and cuts the result to `limit` characters
/// and at most [`MAX_NAME_BYTES`] bytes.
pub fn sanitize(raw: &str, limit: usize) -> String {
    let cleaned = RE_DISALLOWED.replace_all(raw, "");
    let cleaned = RE_WHITESPACE.replace_all(&cleaned, " ");
    let truncated: String = cleaned.trim().chars().take(limit).collect();
    truncate_bytes(&truncated, MAX_NAME_BYTES).to_string()
}

fn truncate_bytes(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

pub fn with_pdf_suffix(name: &str) -> String {
    if name.to_lowercase().ends_with(PDF_SUFFIX) {
        name.to_string()
    } else {
        format!("{}{}", name, PDF_SUFFIX)
    }
}

/// First path in `dir` for `name` that does not exist yet, adding `_1`, `_2`, ...
/// before the extension on collision.
///
/// The check is not atomic: another process may claim the name before it is used.
pub fn resolve_destination(dir: &Path, name: &str) -> PathBuf {
    resolve_destination_with(dir, name, |path| path.exists())
}

/// Like [`resolve_destination`], with the caller deciding which paths are taken.
pub fn resolve_destination_with<F>(dir: &Path, name: &str, is_taken: F) -> PathBuf
where
    F: Fn(&Path) -> bool,
{
    let file_name = with_pdf_suffix(name);
    let mut candidate = dir.join(&file_name);
    if !is_taken(&candidate) {
        return candidate;
    }

    let (stem, ext) = match file_name.rsplit_once('.') {
        Some((stem, ext)) => (stem, format!(".{}", ext)),
        None => (file_name.as_str(), String::new()),
    };

    let mut counter = 1;
    while is_taken(&candidate) {
        candidate = dir.join(format!("{}_{}{}", stem, counter, ext));
        counter += 1;
    }

    debug!("{} taken, using {:?}", file_name, candidate.file_name());
    candidate
}

/// Sanitized file name for a validated record, not yet checked for collisions.
pub fn generate_new_filename(metadata: &InferredMetadata) -> String {
    with_pdf_suffix(&sanitize(&compose_candidate(metadata), MAX_NAME_LEN))
}
