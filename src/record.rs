//! Raw and normalized WoS records.
//!
//! - [`RawRecord`] — tag → string map exactly as a reader produced it
//! - [`Record`] — normalized record in which list fields are split
//! - [`FieldValue`] — a single string or a list of strings
//!
//! # Examples
//!
//! ```
//! use wosfile::{FieldValue, RawRecord, Record};
//!
//! let mut raw = RawRecord::new();
//! raw.insert("AU".to_string(), "Doe, J; Foo, B".to_string());
//! raw.insert("PY".to_string(), "2016".to_string());
//! raw.insert("AB".to_string(), String::new());
//!
//! let record = Record::from_raw(&raw);
//! assert_eq!(record.get_list("AU"), Some(&["Doe, J".to_string(), "Foo, B".to_string()][..]));
//! assert_eq!(record.get_str("PY"), Some("2016"));
//! assert!(!record.contains("AB"));
//! ```

use crate::address::{parse_address_field, AddressMapping};
use crate::error::Result;
use crate::identifier;
use crate::tags::TagRegistry;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::ops::Index;

/// A record as read from an export file: field tag → raw value, in file order.
pub type RawRecord = IndexMap<String, String>;

/// Default delimiter between the items of a splittable field.
pub const ITEM_DELIMITER: &str = ";";

/// Tag of the composite author/address field.
pub const ADDRESS_TAG: &str = "C1";

/// Value of a normalized field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Value of a single-valued field, unchanged
    Single(String),
    /// Trimmed items of a splittable field, in order
    Multi(Vec<String>),
}

impl FieldValue {
    /// The string of a single-valued field.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Single(value) => Some(value),
            FieldValue::Multi(_) => None,
        }
    }

    /// The items of a splittable field.
    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::Single(_) => None,
            FieldValue::Multi(items) => Some(items),
        }
    }

    /// The single value, or the first item of a list.
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        match self {
            FieldValue::Single(value) => Some(value),
            FieldValue::Multi(items) => items.first().map(String::as_str),
        }
    }

    /// Whether this is a list value
    #[must_use]
    pub fn is_multi(&self) -> bool {
        matches!(self, FieldValue::Multi(_))
    }

    /// Whether the value carries no text at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Single(value) => value.is_empty(),
            FieldValue::Multi(items) => items.iter().all(String::is_empty),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Single(value) => f.write_str(value),
            FieldValue::Multi(items) => f.write_str(&items.join("; ")),
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Single(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Single(value.to_string())
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        FieldValue::Multi(items)
    }
}

/// A normalized WoS record.
///
/// Built from a [`RawRecord`] by splitting every field the tag registry marks
/// as splittable on `;` and trimming the items. Tags unknown to the registry
/// are kept as single strings. Fields are kept in file order.
///
/// Items are split on `;` unless another delimiter is set with
/// [`with_subdelimiter`](Self::with_subdelimiter); this must match the string
/// the reader joined one-item-per-line fields with.
///
/// With `skip_empty` (the default) fields whose raw value is the empty string
/// are left out. The option can be changed and the raw data parsed again;
/// only the presence of empty fields changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    fields: IndexMap<String, FieldValue>,
    skip_empty: bool,
    subdelimiter: String,
}

impl Default for Record {
    fn default() -> Self {
        Record {
            fields: IndexMap::new(),
            skip_empty: true,
            subdelimiter: ITEM_DELIMITER.to_string(),
        }
    }
}

impl Record {
    /// Create an empty record that skips empty fields when parsing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether [`parse`](Self::parse) leaves out empty fields.
    #[must_use]
    pub fn with_skip_empty(mut self, skip_empty: bool) -> Self {
        self.skip_empty = skip_empty;
        self
    }

    /// Set the delimiter that [`parse`](Self::parse) splits list fields on.
    ///
    /// Surrounding whitespace is ignored, since items are trimmed anyway: the
    /// reader's default `"; "` splits like `";"`. An empty delimiter keeps
    /// the default.
    ///
    /// ```
    /// use wosfile::{RawRecord, Record};
    ///
    /// let mut raw = RawRecord::new();
    /// raw.insert("AU".to_string(), "Doe, J##Foo, B".to_string());
    ///
    /// let mut record = Record::new().with_subdelimiter("##");
    /// record.parse(&raw);
    /// assert_eq!(record.get_list("AU").unwrap(), ["Doe, J", "Foo, B"]);
    /// ```
    #[must_use]
    pub fn with_subdelimiter(mut self, subdelimiter: &str) -> Self {
        let trimmed = subdelimiter.trim();
        self.subdelimiter = match (trimmed.is_empty(), subdelimiter.is_empty()) {
            (false, _) => trimmed.to_string(),
            (true, false) => subdelimiter.to_string(),
            (true, true) => ITEM_DELIMITER.to_string(),
        };
        self
    }

    /// Delimiter list fields are split on
    #[must_use]
    pub fn subdelimiter(&self) -> &str {
        &self.subdelimiter
    }

    /// Normalize `raw` with the bundled WoS tag registry, skipping empty fields.
    #[must_use]
    pub fn from_raw(raw: &RawRecord) -> Self {
        let mut record = Self::new();
        record.parse(raw);
        record
    }

    /// Normalize `raw` with an explicit `skip_empty` setting and registry.
    #[must_use]
    pub fn from_raw_with(raw: &RawRecord, skip_empty: bool, tags: &TagRegistry) -> Self {
        let mut record = Self::new().with_skip_empty(skip_empty);
        record.parse_with(raw, tags);
        record
    }

    /// Whether empty fields are left out when parsing
    #[must_use]
    pub fn skip_empty(&self) -> bool {
        self.skip_empty
    }

    /// Change the `skip_empty` setting for subsequent calls to [`parse`](Self::parse).
    pub fn set_skip_empty(&mut self, skip_empty: bool) {
        self.skip_empty = skip_empty;
    }

    /// Replace the contents of this record with the normalized form of `raw`.
    pub fn parse(&mut self, raw: &RawRecord) {
        self.parse_with(raw, TagRegistry::wos());
    }

    /// Like [`parse`](Self::parse), looking up splittable tags in `tags`.
    pub fn parse_with(&mut self, raw: &RawRecord, tags: &TagRegistry) {
        self.fields.clear();
        for (tag, value) in raw {
            if self.skip_empty && value.is_empty() {
                continue;
            }
            let value = if tags.is_splittable(tag) {
                FieldValue::Multi(split_items(value, &self.subdelimiter))
            } else {
                FieldValue::Single(value.clone())
            };
            self.fields.insert(tag.clone(), value);
        }
    }

    /// Get the value of `tag`.
    #[must_use]
    pub fn get(&self, tag: &str) -> Option<&FieldValue> {
        self.fields.get(tag)
    }

    /// Get the value of a single-valued field.
    #[must_use]
    pub fn get_str(&self, tag: &str) -> Option<&str> {
        self.get(tag).and_then(FieldValue::as_str)
    }

    /// Get the items of a splittable field.
    #[must_use]
    pub fn get_list(&self, tag: &str) -> Option<&[String]> {
        self.get(tag).and_then(FieldValue::as_list)
    }

    /// Whether `tag` is present
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.fields.contains_key(tag)
    }

    /// Set the value of `tag`, returning the previous value.
    pub fn insert(&mut self, tag: impl Into<String>, value: impl Into<FieldValue>) -> Option<FieldValue> {
        self.fields.insert(tag.into(), value.into())
    }

    /// Remove `tag`, keeping the order of the remaining fields.
    pub fn remove(&mut self, tag: &str) -> Option<FieldValue> {
        self.fields.shift_remove(tag)
    }

    /// Iterate over `(tag, value)` pairs in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(tag, value)| (tag.as_str(), value))
    }

    /// Iterate over the tags present, in file order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Number of fields
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Citation key of this record, e.g. `Doe J, 2016, J9, V4, P102, DOI 123`.
    ///
    /// Computed from the current field values on every call.
    ///
    /// # Errors
    ///
    /// Returns [`WosError::MissingField`](crate::WosError::MissingField) if
    /// the record has no first author.
    pub fn record_id(&self) -> Result<String> {
        identifier::record_id(self)
    }

    /// Parsed author/address field (`C1`), or `None` if the record has none.
    ///
    /// Computed from the current field value on every call.
    ///
    /// # Errors
    ///
    /// Returns [`WosError::MalformedAddress`](crate::WosError::MalformedAddress)
    /// if the field cannot be parsed.
    pub fn author_address(&self) -> Result<Option<AddressMapping>> {
        match self.get(ADDRESS_TAG) {
            Some(FieldValue::Single(field)) => parse_address_field(field).map(Some),
            Some(value @ FieldValue::Multi(_)) => parse_address_field(&value.to_string()).map(Some),
            None => Ok(None),
        }
    }
}

impl From<&RawRecord> for Record {
    fn from(raw: &RawRecord) -> Self {
        Record::from_raw(raw)
    }
}

impl Index<&str> for Record {
    type Output = FieldValue;

    fn index(&self, tag: &str) -> &FieldValue {
        &self.fields[tag]
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

fn split_items(value: &str, delimiter: &str) -> Vec<String> {
    value
        .split(delimiter)
        .map(|item| item.trim().to_string())
        .collect()
}
