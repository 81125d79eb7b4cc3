//! Citation keys for normalized records.
//!
//! The key has the shape used by WoS "cited reference" entries:
//!
//! ```text
//! Doe J, 2016, J9, V4, P102, DOI 123
//! ```
//!
//! Keys are not unique: two records by the same first author in the same
//! journal issue and page collide.

use crate::error::{Result, WosError};
use crate::record::{FieldValue, Record};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Greedy, so only the last `", "` of the name is replaced.
    static ref NAME_RE: Regex = Regex::new(r"^(.*), (.*)$").expect("author name pattern is valid");
}

/// Journal tags in order of preference; the first one present is used.
const JOURNAL_TAGS: [&str; 3] = ["J9", "BS", "SO"];

/// Derive the citation key of `record`.
///
/// Components, joined with `", "`: first author with the comma between last
/// and first name removed, `PY`, the first of `J9`/`BS`/`SO` present in the
/// record, `V` + `VL`, `P` + `BP`, `DOI ` + `DI`. Absent or empty components
/// other than the author are left out. A journal tag that is present but
/// empty (kept when `skip_empty` is off) still takes precedence, so the key
/// then has no journal.
///
/// # Examples
///
/// ```
/// use wosfile::{RawRecord, Record};
///
/// let mut raw = RawRecord::new();
/// for (tag, value) in [("AU", "Doe, J; Foo, B"), ("PY", "2016"), ("J9", "J9"), ("VL", "4")] {
///     raw.insert(tag.to_string(), value.to_string());
/// }
/// let record = Record::from_raw(&raw);
/// assert_eq!(wosfile::identifier::record_id(&record)?, "Doe J, 2016, J9, V4");
/// # Ok::<(), wosfile::WosError>(())
/// ```
///
/// # Errors
///
/// Returns [`WosError::MissingField`] if `AU` is absent or empty.
pub fn record_id(record: &Record) -> Result<String> {
    let first_author = component(record, "AU").ok_or_else(|| WosError::MissingField("AU".to_string()))?;

    let mut parts = vec![NAME_RE.replace(first_author, "$1 $2").into_owned()];
    if let Some(year) = component(record, "PY") {
        parts.push(year.to_string());
    }
    let journal = JOURNAL_TAGS
        .iter()
        .find_map(|tag| record.get(tag))
        .and_then(FieldValue::first)
        .filter(|journal| !journal.is_empty());
    if let Some(journal) = journal {
        parts.push(journal.to_string());
    }
    if let Some(volume) = component(record, "VL") {
        parts.push(format!("V{volume}"));
    }
    if let Some(page) = component(record, "BP") {
        parts.push(format!("P{page}"));
    }
    if let Some(doi) = component(record, "DI") {
        parts.push(format!("DOI {doi}"));
    }

    Ok(parts.join(", "))
}

/// Single value or first list item of `tag`, if non-empty.
fn component<'r>(record: &'r Record, tag: &str) -> Option<&'r str> {
    record
        .get(tag)
        .and_then(FieldValue::first)
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RawRecord;
    use crate::tags::TagRegistry;

    fn record(pairs: &[(&str, &str)]) -> Record {
        let raw: RawRecord = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Record::from_raw_with(&raw, false, TagRegistry::wos())
    }

    #[test]
    fn test_full_key() {
        let r = record(&[
            ("AU", "Doe, J;  Foo, B"),
            ("PY", "2016"),
            ("J9", "J9"),
            ("BS", "BS"),
            ("SO", "SO"),
            ("VL", "4"),
            ("BP", "102"),
            ("DI", "123"),
        ]);
        assert_eq!(record_id(&r).unwrap(), "Doe J, 2016, J9, V4, P102, DOI 123");
    }

    #[test]
    fn test_journal_fallback() {
        let r = record(&[("AU", "Doe, J"), ("BS", "BS"), ("SO", "SO")]);
        assert_eq!(record_id(&r).unwrap(), "Doe J, BS");

        let r = record(&[("AU", "Doe, J"), ("J9", ""), ("SO", "SO")]);
        assert_eq!(record_id(&r).unwrap(), "Doe J");
    }

    #[test]
    fn test_skipped_empty_journal_falls_back() {
        let mut raw = RawRecord::new();
        raw.insert("AU".to_string(), "Doe, J".to_string());
        raw.insert("J9".to_string(), String::new());
        raw.insert("SO".to_string(), "SO".to_string());
        assert_eq!(record_id(&Record::from_raw(&raw)).unwrap(), "Doe J, SO");
    }

    #[test]
    fn test_optional_components_omitted() {
        let r = record(&[("AU", "Doe, J"), ("PY", ""), ("DI", "10.1/x")]);
        assert_eq!(record_id(&r).unwrap(), "Doe J, DOI 10.1/x");
    }

    #[test]
    fn test_only_last_comma_replaced() {
        let r = record(&[("AU", "van der Berg, Jr., A")]);
        assert_eq!(record_id(&r).unwrap(), "van der Berg, Jr. A");
    }

    #[test]
    fn test_name_without_comma() {
        let r = record(&[("AU", "Anonymous")]);
        assert_eq!(record_id(&r).unwrap(), "Anonymous");
    }

    #[test]
    fn test_missing_author() {
        let r = record(&[("PY", "2016")]);
        assert!(matches!(record_id(&r), Err(WosError::MissingField(tag)) if tag == "AU"));

        let r = record(&[("AU", ""), ("PY", "2016")]);
        assert!(matches!(record_id(&r), Err(WosError::MissingField(_))));
    }
}
