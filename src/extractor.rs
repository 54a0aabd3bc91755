use crate::error::ExtractError;
use log::debug;
use lopdf::Document;
use std::path::Path;

/// Text of the first `page_limit` pages, trimmed and separated by blank lines.
///
/// Returns `Ok(None)` when the document has no pages or none of the leading
/// pages carry extractable text (scanned or image-only PDFs).
pub fn extract_leading_text(path: &Path, page_limit: usize) -> Result<Option<String>, ExtractError> {
    let doc = Document::load(path).map_err(|source| ExtractError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let pages = doc.get_pages();
    if pages.is_empty() {
        return Ok(None);
    }

    let mut texts = Vec::new();
    for &page_num in pages.keys().take(page_limit) {
        match doc.extract_text(&[page_num]) {
            Ok(text) => {
                let text = text.trim();
                if !text.is_empty() {
                    texts.push(text.to_string());
                }
            }
            Err(e) => debug!("No text on page {} of {:?}: {}", page_num, path, e),
        }
    }

    debug!(
        "Extracted text from {} of {} pages in {:?}",
        texts.len(),
        pages.len().min(page_limit),
        path
    );

    if texts.is_empty() {
        Ok(None)
    } else {
        Ok(Some(texts.join("\n\n")))
    }
}
