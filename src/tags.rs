//! Web of Science field tag registry.
//!
//! Every field in a WoS export is identified by a two-character tag such as
//! `AU` (authors) or `PY` (publication year). The registry records, per tag:
//!
//! - the full label used by Clarivate,
//! - whether the field is *splittable*, i.e. holds a `;`-separated list that
//!   the normalizer turns into a sequence,
//! - whether the plain text format puts *one item per line*, i.e. whether
//!   continuation lines are list items rather than wrapped text.
//!
//! Readers and the normalizer take a `&TagRegistry`, so tests and callers can
//! substitute a reduced or fabricated table. [`TagRegistry::wos`] returns the
//! bundled table built from [`WOS_TAGS`].

use indexmap::IndexMap;
use lazy_static::lazy_static;

/// Properties of a single field tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSpec {
    /// Full human-readable label
    pub label: String,
    /// Whether the value is a `;`-separated list
    pub splittable: bool,
    /// Whether plain text exports put each list item on its own line
    pub item_per_line: bool,
}

/// Lookup table from field tag to [`TagSpec`].
#[derive(Debug, Clone, Default)]
pub struct TagRegistry {
    entries: IndexMap<String, TagSpec>,
}

impl TagRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from `(tag, label, splittable, item_per_line)` rows.
    #[must_use]
    pub fn from_table(table: &[(&str, &str, bool, bool)]) -> Self {
        let mut registry = Self::new();
        for &(tag, label, splittable, item_per_line) in table {
            registry.insert(tag, label, splittable, item_per_line);
        }
        registry
    }

    /// The registry of all tags found in Web of Science exports.
    #[must_use]
    pub fn wos() -> &'static TagRegistry {
        &WOS_REGISTRY
    }

    /// Add or replace a tag definition.
    pub fn insert(&mut self, tag: &str, label: &str, splittable: bool, item_per_line: bool) {
        self.entries.insert(
            tag.to_string(),
            TagSpec {
                label: label.to_string(),
                splittable,
                item_per_line,
            },
        );
    }

    /// Get the definition of `tag`, if registered.
    #[must_use]
    pub fn get(&self, tag: &str) -> Option<&TagSpec> {
        self.entries.get(tag)
    }

    /// Whether `tag` is registered.
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.entries.contains_key(tag)
    }

    /// Full label of `tag`, if registered.
    #[must_use]
    pub fn label(&self, tag: &str) -> Option<&str> {
        self.get(tag).map(|spec| spec.label.as_str())
    }

    /// Whether `tag` holds a list. Unregistered tags are treated as single-valued.
    #[must_use]
    pub fn is_splittable(&self, tag: &str) -> bool {
        self.get(tag).is_some_and(|spec| spec.splittable)
    }

    /// Whether `tag` puts one item per line in plain text exports.
    /// Unregistered tags are treated as wrapped free text.
    #[must_use]
    pub fn has_item_per_line(&self, tag: &str) -> bool {
        self.get(tag).is_some_and(|spec| spec.item_per_line)
    }

    /// Number of registered tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(tag, spec)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TagSpec)> {
        self.entries.iter().map(|(tag, spec)| (tag.as_str(), spec))
    }
}

lazy_static! {
    static ref WOS_REGISTRY: TagRegistry = TagRegistry::from_table(WOS_TAGS);
}

/// Web of Science field tags: `(tag, label, splittable, item_per_line)`.
///
/// Only the core collection tags have verified list semantics; the remaining
/// tags are registered as plain single-valued fields.
pub const WOS_TAGS: &[(&str, &str, bool, bool)] = &[
    ("A2", "Other Abstract", false, false),
    ("AA", "Additional Authors", false, false),
    ("AB", "Abstract / BHTD Critical Abstract", false, false),
    ("AD", "Application Details and Date", false, false),
    ("AE", "Patent Assignee", false, false),
    ("AF", "Author Full Names", true, true),
    ("AK", "Abstract (Korean)", false, false),
    ("AN", "Accession Number or PubMedID", false, false),
    ("AR", "Article Number", false, false),
    ("AU", "Authors or Inventors", true, true),
    ("AW", "Item URL", false, false),
    ("BA", "Book Authors", true, true),
    ("BD", "Broad Descriptors or Broad Terms", false, false),
    ("BE", "Book Editor", true, true),
    ("BF", "Book Author Full Names", true, true),
    ("BN", "ISBN", false, false),
    ("BP", "Start Page", false, false),
    ("BS", "Book Series Subtitle", false, false),
    ("C1", "Addresses", false, true),
    ("C2", "Address (non-English)", false, false),
    ("C3", "Author Affiliations", true, false),
    ("CA", "Group Authors", false, false),
    ("CC", "Concept Codes or CABI Codes", false, false),
    ("CE", "Edition", false, false),
    ("CH", "Chemicals & Biochemicals", false, false),
    ("CI", "Derwent Compound Number", false, false),
    ("CL", "Conference Location", false, false),
    ("CN", "CAS Registry Numbers; Commercial Names; Chemical", false, false),
    ("CO", "CODEN", false, false),
    ("CP", "Cited Patent(s)", false, false),
    ("CR", "Cited References", true, true),
    ("CT", "Conference Title", false, false),
    ("CY", "Conference Date", false, false),
    ("D2", "Book DOI", false, false),
    ("DA", "Date of Export", false, false),
    ("DC", "Derwent Class Code(s)", false, false),
    ("DE", "Author Keywords; Descriptors", true, false),
    ("DF", "Date Filed or Submitted", false, false),
    ("DI", "DOI", false, false),
    ("DL", "DOI Link", false, false),
    ("DM", "Demography", false, false),
    ("DN", "DCR Number", false, false),
    ("DP", "Discipline; Diseases", false, false),
    ("DS", "Designated States", false, false),
    ("DT", "Document Type", false, false),
    ("DY", "Data Type", false, false),
    ("EA", "Early access date; Equivalent Abstract, Editor Address", false, false),
    ("EC", "Category", false, false),
    ("ED", "Editors", false, false),
    ("EF", "End of File", false, false),
    ("EI", "eISSN", false, false),
    ("EM", "E-mail Address", true, false),
    ("EP", "End Page", false, false),
    ("ER", "End of Record", false, false),
    ("EY", "Early access year", false, false),
    ("FD", "Further Application Details", false, false),
    ("FN", "File Name", false, false),
    ("FP", "Funding Name Preferred", false, false),
    ("FS", "Field of Search", false, false),
    ("FT", "Foreign Title", false, false),
    ("FU", "Funding Orgs", false, false),
    ("FX", "Funding Text", false, false),
    ("GA", "IDS Number", false, false),
    ("GE", "Geographic Data", false, false),
    ("GI", "Grant Information", false, false),
    ("GN", "Gene Name", false, false),
    ("GP", "Group Authors", false, false),
    ("GS", "Geospatial", false, false),
    ("GT", "Time", false, false),
    ("HC", "Highly Cited Status", false, false),
    ("HO", "Conference Host", false, false),
    ("HP", "Hot Paper Status", false, false),
    ("ID", "Keywords; Identifying Codes", true, false),
    ("IO", "Issuing Organization", false, false),
    ("IP", "International Patent Classification", false, false),
    ("IS", "Issue", false, false),
    ("IV", "Investigators", false, false),
    ("J9", "Journal Abbreviation", false, false),
    ("JC", "NLM Unique ID", false, false),
    ("JI", "Journal ISO Abbreviation", false, false),
    ("LA", "Language", false, false),
    ("LS", "Language of Summary", false, false),
    ("LT", "Literature Type", false, false),
    ("MA", "Meeting Abstract", false, false),
    ("MC", "Major Concepts or Derwent Manual Code(s)", false, false),
    ("ME", "Medium", false, false),
    ("MH", "MeSH Terms", false, false),
    ("MI", "Miscellaneous Descriptors", false, false),
    ("MN", "Markush Number", false, false),
    ("MQ", "Methods & Equipment", false, false),
    ("NM", "Personal Name Subject", false, false),
    ("NO", "Comments, Corrections, Erratum", false, false),
    ("NP", "Named Person", false, false),
    ("NR", "Cited Reference Count", false, false),
    ("NT", "Notes", false, false),
    ("OA", "Open Access Designations", false, false),
    ("OB", "Record Owner", false, false),
    ("OC", "Country of Original Patent Application Number", false, false),
    ("OD", "Method", false, false),
    ("OI", "ORCID numbers", true, false),
    ("OP", "Original Patent Application Number", false, false),
    ("OR", "Organism Descriptors; Systematics", false, false),
    ("OS", "Original Source", false, false),
    ("P1", "Part Number", false, false),
    ("P2", "Chapter Count", false, false),
    ("PA", "Publisher Address", false, false),
    ("PC", "Country of Patent", false, false),
    ("PD", "Publication Date; Patent Details", false, false),
    ("PE", "Published Electronically", false, false),
    ("PG", "Number of Pages", false, false),
    ("PI", "Publisher City; Patent Priority Information", false, false),
    ("PM", "PubMedID", false, false),
    ("PN", "Part Number; Patent Number", false, false),
    ("PR", "Parts, Structures & Systems; Price", false, false),
    ("PS", "Pages", false, false),
    ("PT", "Publication Type", false, false),
    ("PU", "Publisher", false, false),
    ("PV", "Place of Publication", false, false),
    ("PY", "Publication Year", false, false),
    ("RC", "Date Created, Date Completed, Date Revised", false, false),
    ("RG", "Derwent Registry Number", false, false),
    ("RI", "ResearcherIDs; Ring Index Number", true, false),
    ("RP", "Reprint Address", false, false),
    ("S1", "Source Title (non-English)", false, false),
    ("SA", "Status", false, false),
    ("SC", "Research Areas", true, false),
    ("SD", "Molecular Sequence Data", false, false),
    ("SE", "Book Series Title; Series", false, false),
    ("SF", "Space Flight Mission", false, false),
    ("SI", "Special Issue", false, false),
    ("SN", "ISSN", false, false),
    ("SO", "Source Title", false, false),
    ("SP", "Conference Sponsors", false, false),
    ("SS", "FSTA Section/Subsection; Citation Subset", false, false),
    ("ST", "Super Taxa", false, false),
    ("SU", "Supplement; Research Area", false, false),
    ("TA", "Taxonomic Data", false, false),
    ("TC", "Times Cited Count", false, false),
    ("TF", "Technology Focus Abstract", false, false),
    ("TI", "Article Title", false, false),
    ("TL", "Country of Translation", false, false),
    ("TM", "Geologic Time Data", false, false),
    ("TN", "Taxa Notes", false, false),
    ("TR", "Translators", false, false),
    ("TS", "Translated Source", false, false),
    ("U1", "180 Day Usage Count", false, false),
    ("U2", "Since 2013 Usage Count", false, false),
    ("UC", "Document Selection URL", false, false),
    ("UR", "URL", false, false),
    ("UT", "Accession Number", false, false),
    ("VL", "Volume", false, false),
    ("VN", "Version", false, false),
    ("VR", "Version Number", false, false),
    ("WC", "Web of Science Subject Categories", true, false),
    ("WE", "Web of Science Index", true, false),
    ("WP", "Publisher Web Address", false, false),
    ("X1", "Article Title (non-English)", false, false),
    ("X2", "Article Title (Transliterated)", false, false),
    ("X4", "Spanish Abstract", false, false),
    ("X5", "Spanish Author Keywords", false, false),
    ("Y1", "Portuguese Document Title", false, false),
    ("Y4", "Portuguese Abstract", false, false),
    ("Y5", "Author Keywords (non-English); Portuguese Author Keywords", false, false),
    ("Z1", "Article Title (Other Languages)", false, false),
    ("Z2", "Authors (non-English)", false, false),
    ("Z3", "Publication Name (Chinese)", false, false),
    ("Z4", "Abstract (non-English)", false, false),
    ("Z5", "Author Keywords (non-English)", false, false),
    ("Z6", "Author Address (non-English)", false, false),
    ("Z7", "E-mail Address (non-English)", false, false),
    ("Z8", "CSCD Times Cited Count", false, false),
    ("Z9", "Times Cited, All Databases", false, false),
    ("ZK", "Author Keywords (Korean)", false, false),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wos_registry_lookups() {
        let tags = TagRegistry::wos();
        assert!(tags.is_splittable("AU"));
        assert!(tags.has_item_per_line("AU"));
        assert_eq!(tags.label("PY"), Some("Publication Year"));
    }

    #[test]
    fn test_address_is_item_per_line_but_not_splittable() {
        let tags = TagRegistry::wos();
        assert!(!tags.is_splittable("C1"));
        assert!(tags.has_item_per_line("C1"));
    }

    #[test]
    fn test_keywords_split_but_wrap() {
        let tags = TagRegistry::wos();
        assert!(tags.is_splittable("DE"));
        assert!(!tags.has_item_per_line("DE"));
    }

    #[test]
    fn test_unregistered_tag_defaults() {
        let tags = TagRegistry::wos();
        assert!(!tags.contains("QQ"));
        assert!(!tags.is_splittable("QQ"));
        assert!(!tags.has_item_per_line("QQ"));
        assert_eq!(tags.label("QQ"), None);
    }

    #[test]
    fn test_tags_are_unique() {
        assert_eq!(TagRegistry::wos().len(), WOS_TAGS.len());
    }

    #[test]
    fn test_custom_registry() {
        let mut tags = TagRegistry::new();
        assert!(tags.is_empty());
        tags.insert("XX", "Custom", true, false);
        assert!(tags.is_splittable("XX"));
        assert_eq!(tags.iter().count(), 1);
    }
}
