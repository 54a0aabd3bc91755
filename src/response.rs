//! Recovering a metadata record from a free-form model reply.
//!
//! Replies are not guaranteed to be strict JSON: the object may sit inside a
//! fenced code block, be surrounded by prose, use single quotes, or carry a
//! trailing comma. [`clean_reply`] normalises those cases before parsing.

use crate::error::{ParseError, Rejection};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer};

static RE_FENCED_OBJECT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```(?:json)?\s*(\{.*?\})\s*```").unwrap());
static RE_LEADING_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^```(?:json)?").unwrap());
static RE_TRAILING_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"```$").unwrap());
static RE_OBJECT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*\}").unwrap());
static RE_TRAILING_COMMA: Lazy<Regex> = Lazy::new(|| Regex::new(r",\s*([}\]])").unwrap());

const PLACEHOLDER_AUTHORS: &[&str] = &["unknown", "various"];
const PLACEHOLDER_TITLE: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InferredMetadata {
    #[serde(default, deserialize_with = "lenient_string")]
    pub author: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "nullable_string")]
    pub pubdate: String,
}

impl InferredMetadata {
    /// Rejects records the model flagged (or should have flagged) as guesses.
    pub fn validate(&self) -> Result<(), Rejection> {
        let author = self.author.trim().to_lowercase();
        if PLACEHOLDER_AUTHORS.contains(&author.as_str()) {
            return Err(Rejection::PlaceholderAuthor(self.author.clone()));
        }

        let title = self.title.trim();
        if title.is_empty() {
            return Err(Rejection::EmptyTitle);
        }
        if title.to_lowercase() == PLACEHOLDER_TITLE {
            return Err(Rejection::PlaceholderTitle(self.title.clone()));
        }

        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient {
    Text(String),
    Number(serde_json::Number),
}

impl From<Lenient> for String {
    fn from(value: Lenient) -> Self {
        match value {
            Lenient::Text(s) => s,
            Lenient::Number(n) => n.to_string(),
        }
    }
}

/// Models sometimes answer `"pubdate": 2024`; numbers are taken as their text.
/// `null` is refused.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Lenient::deserialize(deserializer).map(String::from)
}

/// As [`lenient_string`], but `null` reads as an empty string.
fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Lenient>::deserialize(deserializer)?
        .map(String::from)
        .unwrap_or_default())
}

/// Normalises a model reply into text that should parse as a JSON object.
pub fn clean_reply(reply: &str) -> String {
    let fenced = match RE_FENCED_OBJECT.captures(reply) {
        Some(caps) => caps[1].to_string(),
        None => reply.to_string(),
    };

    let unfenced = RE_LEADING_FENCE.replace(fenced.trim(), "");
    let unfenced = RE_TRAILING_FENCE.replace(unfenced.trim(), "");
    let unfenced = unfenced.trim();

    let mut content = match RE_OBJECT.find(unfenced) {
        Some(m) => m.as_str().to_string(),
        None => unfenced.to_string(),
    };

    // Single quotes only get swapped when no double quote is present, so
    // apostrophes inside proper JSON values survive.
    if !content.contains('"') {
        content = content.replace('\'', "\"");
    }

    RE_TRAILING_COMMA.replace_all(&content, "$1").into_owned()
}

pub fn parse_reply(reply: &str) -> Result<InferredMetadata, ParseError> {
    let cleaned = clean_reply(reply);
    serde_json::from_str(&cleaned).map_err(|source| ParseError::Json { cleaned, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(author: &str, title: &str, pubdate: &str) -> InferredMetadata {
        InferredMetadata {
            author: author.to_string(),
            title: title.to_string(),
            pubdate: pubdate.to_string(),
        }
    }

    #[test]
    fn test_fenced_block() {
        let reply = "```{\"author\": \"OECD\", \"title\": \"Test Title\", \"pubdate\": \"2024\"}```";
        assert_eq!(
            parse_reply(reply).unwrap(),
            record("OECD", "Test Title", "2024")
        );
    }

    #[test]
    fn test_json_fence_with_surrounding_prose() {
        let reply = "Here is my best guess:\n```json\n{\"author\": \"NBER\", \"title\": \"Flood Risk\", \"pubdate\": \"2022\"}\n```\nLet me know if you need more.";
        assert_eq!(parse_reply(reply).unwrap(), record("NBER", "Flood Risk", "2022"));
    }

    #[test]
    fn test_object_inside_prose_without_fence() {
        let reply = "Sure! {\"author\": \"IMF\", \"title\": \"Outlook\", \"pubdate\": \"Apr, 2024\"} Hope that helps.";
        assert_eq!(parse_reply(reply).unwrap(), record("IMF", "Outlook", "Apr, 2024"));
    }

    #[test]
    fn test_single_quotes_are_normalised() {
        let reply = "{'author': 'OECD', 'title': 'Test', 'pubdate': '2024'}";
        assert_eq!(parse_reply(reply).unwrap(), record("OECD", "Test", "2024"));
    }

    #[test]
    fn test_apostrophes_survive_when_double_quoted() {
        let reply = "{\"author\": \"Banca d'Italia & IMF\", \"title\": \"Embedding sustainability\", \"pubdate\": \"Mar, 2025\"}";
        assert_eq!(
            parse_reply(reply).unwrap(),
            record("Banca d'Italia & IMF", "Embedding sustainability", "Mar, 2025")
        );
    }

    #[test]
    fn test_trailing_comma_is_removed() {
        let reply = "{\"author\":\"A\",\"title\":\"B\",\"pubdate\":\"2024\",}";
        assert_eq!(parse_reply(reply).unwrap(), record("A", "B", "2024"));
    }

    #[test]
    fn test_numeric_pubdate_is_accepted() {
        let reply = "{\"author\": \"WEF\", \"title\": \"Global Risks\", \"pubdate\": 2024}";
        assert_eq!(parse_reply(reply).unwrap(), record("WEF", "Global Risks", "2024"));
    }

    #[test]
    fn test_missing_author_defaults_to_empty() {
        let reply = "{\"title\": \"Orphan Report\", \"pubdate\": \"2020\"}";
        assert_eq!(parse_reply(reply).unwrap(), record("", "Orphan Report", "2020"));
    }

    #[test]
    fn test_null_author_or_title_is_a_parse_error() {
        assert!(parse_reply("{\"author\": \"OECD\", \"title\": null, \"pubdate\": \"2024\"}").is_err());
        assert!(parse_reply("{\"author\": null, \"title\": \"Report\", \"pubdate\": \"2024\"}").is_err());
    }

    #[test]
    fn test_null_pubdate_reads_as_empty() {
        let reply = "{\"author\": \"OECD\", \"title\": \"Report\", \"pubdate\": null}";
        assert_eq!(parse_reply(reply).unwrap(), record("OECD", "Report", ""));
    }

    #[test]
    fn test_garbage_reports_cleaned_text() {
        let err = parse_reply("I could not find any metadata.").unwrap_err();
        let ParseError::Json { cleaned, .. } = err;
        assert_eq!(cleaned, "I could not find any metadata.");
    }

    #[test]
    fn test_missing_pubdate_is_a_parse_error() {
        assert!(parse_reply("{\"author\": \"A\", \"title\": \"B\"}").is_err());
    }

    #[test]
    fn test_placeholder_author_rejected() {
        for author in ["Various", "  UNKNOWN ", "various"] {
            let err = record(author, "Real Title", "2024").validate().unwrap_err();
            assert_eq!(err, Rejection::PlaceholderAuthor(author.to_string()));
        }
    }

    #[test]
    fn test_placeholder_title_rejected() {
        assert_eq!(
            record("OECD", " Unknown ", "2024").validate(),
            Err(Rejection::PlaceholderTitle(" Unknown ".to_string()))
        );
        assert_eq!(
            record("OECD", "   ", "2024").validate(),
            Err(Rejection::EmptyTitle)
        );
    }

    #[test]
    fn test_usable_record_passes() {
        assert!(record("OECD", "Test Title", "2024").validate().is_ok());
        // Only placeholder authors are rejected; a blank author still passes.
        assert!(record("", "Test Title", "2024").validate().is_ok());
    }
}
