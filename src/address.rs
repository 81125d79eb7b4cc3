//! Parsing of the author/address field (`C1`).
//!
//! WoS writes the address field in one of two shapes. Older records list the
//! addresses only:
//!
//! ```text
//! Univ A, Dept X, Amsterdam, Netherlands; Univ B, Leiden, Netherlands
//! ```
//!
//! Newer records prefix every address with the authors affiliated with it:
//!
//! ```text
//! [Doe, J; Foo, B] Univ A, Amsterdam, Netherlands; [Foo, B] Univ B, Leiden, Netherlands
//! ```
//!
//! A segment boundary is a `;` followed (after optional whitespace) by `[`;
//! any other `;` belongs to an author list or an address.
//!
//! Some records start with unattributed addresses and continue with
//! attributed ones. The unattributed head cannot be assigned to any author
//! and is dropped; only the attributed tail is returned.

use crate::error::{Result, WosError};
use indexmap::{IndexMap, IndexSet};
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use serde::Serialize;

lazy_static! {
    /// `[Author; Author] Address`
    static ref SEGMENT_RE: Regex =
        Regex::new(r"^\s*\[(.*?)\]\s+(.*)").expect("address segment pattern is valid");
}

/// Separator between addresses in an unattributed address field.
const ADDRESS_SEPARATOR: &str = "; ";

/// A parsed address field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AddressMapping {
    /// Addresses without author information, in field order
    Unattributed(Vec<String>),
    /// Author name → addresses of that author, both in order of first appearance
    ByAuthor(IndexMap<String, Vec<String>>),
}

impl AddressMapping {
    /// Whether addresses are attributed to authors
    #[must_use]
    pub fn is_attributed(&self) -> bool {
        matches!(self, AddressMapping::ByAuthor(_))
    }

    /// Addresses of `author`; `None` for unknown authors and unattributed fields.
    #[must_use]
    pub fn addresses_of(&self, author: &str) -> Option<&[String]> {
        match self {
            AddressMapping::ByAuthor(map) => map.get(author).map(Vec::as_slice),
            AddressMapping::Unattributed(_) => None,
        }
    }

    /// Authors named in the field, in order of first appearance.
    #[must_use]
    pub fn authors(&self) -> Vec<&str> {
        match self {
            AddressMapping::ByAuthor(map) => map.keys().map(String::as_str).collect(),
            AddressMapping::Unattributed(_) => Vec::new(),
        }
    }

    /// Distinct addresses, in order of first appearance.
    #[must_use]
    pub fn addresses(&self) -> Vec<&str> {
        let distinct: IndexSet<&str> = match self {
            AddressMapping::Unattributed(list) => list.iter().map(String::as_str).collect(),
            AddressMapping::ByAuthor(map) => map.values().flatten().map(String::as_str).collect(),
        };
        distinct.into_iter().collect()
    }
}

/// Parse the raw value of an address field.
///
/// # Examples
///
/// ```
/// use wosfile::{parse_address_field, AddressMapping};
///
/// let plain = parse_address_field("Address A, Q; Address B, C")?;
/// assert_eq!(
///     plain,
///     AddressMapping::Unattributed(vec!["Address A, Q".into(), "Address B, C".into()])
/// );
///
/// let linked = parse_address_field("[A; B] addr AB; [C] addr C1; [C] addr C2")?;
/// assert_eq!(linked.addresses_of("C").unwrap(), ["addr C1", "addr C2"]);
/// # Ok::<(), wosfile::WosError>(())
/// ```
///
/// # Errors
///
/// Returns [`WosError::MalformedAddress`] if an attributed segment does not
/// have the `[Authors] Address` shape.
pub fn parse_address_field(field: &str) -> Result<AddressMapping> {
    if field.starts_with('[') {
        return parse_attributed(field, field);
    }

    let addresses: Vec<&str> = field.split(ADDRESS_SEPARATOR).collect();
    if !addresses.iter().any(|address| address.starts_with('[')) {
        return Ok(AddressMapping::Unattributed(
            addresses
                .iter()
                .map(|address| address.trim().to_string())
                .collect(),
        ));
    }

    // Unattributed head, attributed tail.
    let Some(boundary) = segment_boundaries(field).next() else {
        return Err(malformed(field, field));
    };
    let tail = field[boundary + 1..].trim_start();
    debug!(
        "dropping unattributed addresses {:?} in front of attributed ones",
        &field[..boundary]
    );
    parse_attributed(tail, field)
}

fn parse_attributed(text: &str, field: &str) -> Result<AddressMapping> {
    let mut parsed: IndexMap<String, Vec<String>> = IndexMap::new();

    for segment in split_segments(text) {
        let captures = SEGMENT_RE
            .captures(segment)
            .ok_or_else(|| malformed(segment, field))?;
        let address = &captures[2];
        for author in captures[1].split(';').map(str::trim) {
            parsed
                .entry(author.to_string())
                .or_default()
                .push(address.to_string());
        }
    }

    Ok(AddressMapping::ByAuthor(parsed))
}

/// Byte offsets of every `;` followed, after optional whitespace, by `[`.
fn segment_boundaries(text: &str) -> impl Iterator<Item = usize> + '_ {
    text.match_indices(';')
        .map(|(index, _)| index)
        .filter(move |&index| text[index + 1..].trim_start().starts_with('['))
}

fn split_segments(text: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    for boundary in segment_boundaries(text) {
        segments.push(&text[start..boundary]);
        start = boundary + 1;
    }
    segments.push(&text[start..]);
    segments
}

fn malformed(segment: &str, field: &str) -> WosError {
    WosError::MalformedAddress {
        segment: segment.to_string(),
        field: field.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_unattributed_addresses() {
        let parsed = parse_address_field("Address A, Q; Address B, C").unwrap();
        assert_eq!(
            parsed,
            AddressMapping::Unattributed(strings(&["Address A, Q", "Address B, C"]))
        );
        assert!(!parsed.is_attributed());
        assert!(parsed.authors().is_empty());
    }

    #[test]
    fn test_single_unattributed_address() {
        let parsed = parse_address_field("Univ Amsterdam, Amsterdam, Netherlands").unwrap();
        assert_eq!(
            parsed,
            AddressMapping::Unattributed(strings(&["Univ Amsterdam, Amsterdam, Netherlands"]))
        );
    }

    #[test]
    fn test_attributed_addresses() {
        let parsed =
            parse_address_field("[A; B] addr AB; [C] addr C1; [C] addr C2; [C; D] addr CD").unwrap();

        let mut expected = IndexMap::new();
        expected.insert("A".to_string(), strings(&["addr AB"]));
        expected.insert("B".to_string(), strings(&["addr AB"]));
        expected.insert("C".to_string(), strings(&["addr C1", "addr C2", "addr CD"]));
        expected.insert("D".to_string(), strings(&["addr CD"]));
        assert_eq!(parsed, AddressMapping::ByAuthor(expected));
        assert_eq!(parsed.authors(), ["A", "B", "C", "D"]);
    }

    #[test]
    fn test_semicolon_inside_address_is_not_a_boundary() {
        let parsed = parse_address_field("[A] Dept X; Univ Y; [B] Univ Z").unwrap();
        assert_eq!(parsed.addresses_of("A").unwrap(), ["Dept X; Univ Y"]);
        assert_eq!(parsed.addresses_of("B").unwrap(), ["Univ Z"]);
    }

    #[test]
    fn test_author_names_with_commas() {
        let parsed = parse_address_field("[Doe, John; Foo, B.] Univ A, NL").unwrap();
        assert_eq!(parsed.authors(), ["Doe, John", "Foo, B."]);
    }

    #[test]
    fn test_malformed_address() {
        let err = parse_address_field("[a; b x").unwrap_err();
        match err {
            WosError::MalformedAddress { segment, field } => {
                assert_eq!(segment, "[a; b x");
                assert_eq!(field, "[a; b x");
            },
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_malformed_second_segment() {
        assert!(parse_address_field("[A] addr A; [B]").is_err());
    }

    #[test]
    fn test_unattributed_head_is_dropped() {
        let parsed = parse_address_field("Univ X; [A] addr A; [B; A] addr B").unwrap();
        let mut expected = IndexMap::new();
        expected.insert("A".to_string(), strings(&["addr A", "addr B"]));
        expected.insert("B".to_string(), strings(&["addr B"]));
        assert_eq!(parsed, AddressMapping::ByAuthor(expected));
    }

    #[test]
    fn test_several_unattributed_addresses_dropped() {
        let parsed = parse_address_field("Univ X; Univ Y; [A] Univ X").unwrap();
        assert_eq!(parsed.authors(), ["A"]);
        assert_eq!(parsed.addresses(), ["Univ X"]);
    }

    #[test]
    fn test_distinct_addresses() {
        let parsed = parse_address_field("[A; B] addr AB; [C] addr C").unwrap();
        assert_eq!(parsed.addresses(), ["addr AB", "addr C"]);
    }

    #[test]
    fn test_distinct_addresses_many_authors() {
        let field = (0..200)
            .map(|i| format!("[A{i}; B{i}] addr {}", i % 7))
            .collect::<Vec<_>>()
            .join("; ");
        let parsed = parse_address_field(&field).unwrap();
        assert_eq!(
            parsed.addresses(),
            ["addr 0", "addr 1", "addr 2", "addr 3", "addr 4", "addr 5", "addr 6"]
        );

        let plain = parse_address_field("X; Y; X").unwrap();
        assert_eq!(plain.addresses(), ["X", "Y"]);
    }

    #[test]
    fn test_unknown_author() {
        let parsed = parse_address_field("[A] addr").unwrap();
        assert_eq!(parsed.addresses_of("Z"), None);
    }
}
