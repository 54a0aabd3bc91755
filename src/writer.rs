use crate::error::WriteError;
use crate::naming::{sanitize, MAX_NAME_LEN};
use crate::response::InferredMetadata;
use chrono::NaiveDate;
use log::{debug, warn};
use lopdf::{Dictionary, Document, Object, StringFormat};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const PRODUCER: &str = concat!("pdf-renamer ", env!("CARGO_PKG_VERSION"));

static RE_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(19|20)\d{2}\b").unwrap());

/// Values written into the document information dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentInfo {
    pub author: String,
    pub title: String,
    pub year: Option<i32>,
}

impl DocumentInfo {
    pub fn from_metadata(metadata: &InferredMetadata) -> Self {
        DocumentInfo {
            author: sanitize(&metadata.author, MAX_NAME_LEN),
            title: sanitize(&metadata.title, MAX_NAME_LEN),
            year: publication_year(&metadata.pubdate),
        }
    }
}

/// Last 19xx/20xx year mentioned in a free-form date such as "Apr, 2017".
pub fn publication_year(pubdate: &str) -> Option<i32> {
    RE_YEAR
        .find_iter(pubdate)
        .filter_map(|m| m.as_str().parse().ok())
        .last()
}

/// January 1st of `year`, midnight UTC, as a PDF date string.
pub fn creation_date(year: i32) -> Option<String> {
    let midnight = NaiveDate::from_ymd_opt(year, 1, 1)?.and_hms_opt(0, 0, 0)?;
    Some(midnight.format("D:%Y%m%d%H%M%SZ").to_string())
}

fn text_string(value: &str) -> Object {
    if value.is_ascii() {
        return Object::string_literal(value);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in value.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

fn set_info(doc: &mut Document, info: &DocumentInfo) {
    let mut dict = Dictionary::new();
    dict.set("Author", text_string(&info.author));
    dict.set("Title", text_string(&info.title));
    if let Some(date) = info.year.and_then(creation_date) {
        dict.set("CreationDate", Object::string_literal(date));
    }
    dict.set("Producer", Object::string_literal(PRODUCER));

    let info_id = doc.add_object(dict);
    doc.trailer.set("Info", info_id);
}

fn temp_path(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    destination.with_file_name(name)
}

/// Rewrites `source` with new document info at `destination`.
///
/// The document is serialized next to the destination and renamed into
/// place, so the destination never holds a partial write.
pub fn write_with_metadata(
    source: &Path,
    destination: &Path,
    info: &DocumentInfo,
) -> Result<(), WriteError> {
    let mut doc = Document::load(source).map_err(|source_err| WriteError::Load {
        path: source.to_path_buf(),
        source: source_err,
    })?;

    set_info(&mut doc, info);

    let temp = temp_path(destination);
    let saved = doc.save(&temp).and_then(|file| file.sync_all());
    if let Err(e) = saved {
        discard(&temp);
        return Err(WriteError::Save {
            path: temp,
            source: e,
        });
    }

    if let Err(e) = fs::rename(&temp, destination) {
        discard(&temp);
        return Err(WriteError::Replace {
            from: temp,
            to: destination.to_path_buf(),
            source: e,
        });
    }

    debug!("Wrote {:?} with updated metadata", destination);
    Ok(())
}

/// Writes the renamed copy, then removes the original.
///
/// The original is only deleted once the new file is fully in place.
pub fn replace_original(
    source: &Path,
    destination: &Path,
    info: &DocumentInfo,
) -> Result<(), WriteError> {
    write_with_metadata(source, destination, info)?;

    match fs::remove_file(source) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!("Wrote {:?} but could not remove {:?}: {}", destination, source, e),
    }
    Ok(())
}

fn discard(temp: &Path) {
    if let Err(e) = fs::remove_file(temp) {
        if e.kind() != ErrorKind::NotFound {
            warn!("Could not remove temp file {:?}: {}", temp, e);
        }
    }
}
