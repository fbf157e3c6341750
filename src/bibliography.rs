//! Bibliography - item registry, numbering and citation markers
//!
//! Items are registered while the tree is built. Unlabeled items receive a
//! sequence number counted per bibliography list; items with an explicit
//! marker keep it verbatim. The [`CitationTable`] maps each key to the marker
//! printed at citation sites and accepts overrides from an auxiliary file
//! produced by an external reference formatter (`\bibcite{key}{marker}`).

use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::element::ElementId;

/// Identity of one `thebibliography` list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct BibListId(pub u32);

/// One entry of a bibliography list.
#[derive(Debug, Clone, Serialize)]
pub struct BibItem {
    /// Citation key
    pub key: String,
    /// Element carrying the item in the document tree
    pub element: ElementId,
    /// List the item was registered in
    pub list: BibListId,
    /// Explicit marker, e.g. `[Knu84]`
    pub label: Option<String>,
    /// Sequence number, only for unlabeled items
    pub number: Option<u32>,
}

impl BibItem {
    /// Marker derived from the item itself (explicit label or sequence number)
    pub fn own_marker(&self) -> String {
        match (&self.label, self.number) {
            (Some(label), _) => label.clone(),
            (None, Some(n)) => n.to_string(),
            (None, None) => String::new(),
        }
    }

    pub fn is_unlabeled(&self) -> bool {
        self.label.is_none()
    }
}

/// Registry of bibliography items keyed by citation key.
#[derive(Debug, Default)]
pub struct Bibliography {
    items: HashMap<String, BibItem>,
    /// Keys in first-registration order
    order: Vec<String>,
    /// Unlabeled items currently registered, per list
    unlabeled: HashMap<BibListId, u32>,
    next_list: u32,
}

impl Bibliography {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new bibliography list
    pub fn new_list(&mut self) -> BibListId {
        let id = BibListId(self.next_list);
        self.next_list += 1;
        id
    }

    /// Register an item and return its sequence number, if one was assigned.
    ///
    /// Unlabeled items are numbered `1 + count of unlabeled items already in
    /// the list`. Re-registering a key replaces the earlier entry.
    pub fn register(
        &mut self,
        list: BibListId,
        key: impl Into<String>,
        element: ElementId,
        label: Option<String>,
    ) -> Option<u32> {
        let key = key.into();

        if let Some(previous) = self.items.get(&key).filter(|item| item.is_unlabeled()) {
            if let Some(count) = self.unlabeled.get_mut(&previous.list) {
                *count = count.saturating_sub(1);
            }
        }

        let number = if label.is_none() {
            let count = self.unlabeled.entry(list).or_insert(0);
            *count += 1;
            Some(*count)
        } else {
            None
        };

        let item = BibItem {
            key: key.clone(),
            element,
            list,
            label,
            number,
        };

        if self.items.insert(key.clone(), item).is_some() {
            tracing::debug!("Bibliography key `{}` registered twice, keeping the latest entry", key);
        } else {
            self.order.push(key);
        }

        number
    }

    pub fn lookup(&self, key: &str) -> Option<&BibItem> {
        self.items.get(key)
    }

    /// Items in registration order
    pub fn items(&self) -> impl Iterator<Item = &BibItem> {
        self.order.iter().filter_map(|key| self.items.get(key))
    }

    /// Items of one list in registration order
    pub fn items_in(&self, list: BibListId) -> Vec<&BibItem> {
        self.items().filter(|item| item.list == list).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Resolve citation keys to items, skipping (and warning about) unknown keys
    pub fn cite<'a, S: AsRef<str>>(&'a self, keys: &[S], pretext: Option<&str>) -> Citation<'a> {
        let mut items = Vec::with_capacity(keys.len());
        let mut missing = Vec::new();

        for key in keys {
            let key = key.as_ref();
            match self.lookup(key) {
                Some(item) => items.push(item),
                None => {
                    tracing::warn!("Bibliography item \"{}\" has no entry", key);
                    missing.push(key.to_string());
                }
            }
        }

        Citation {
            items,
            pretext: pretext.unwrap_or_default().to_string(),
            missing,
        }
    }
}

/// Resolved citation: the items found, in request order, plus the pretext.
#[derive(Debug, Clone)]
pub struct Citation<'a> {
    pub items: Vec<&'a BibItem>,
    pub pretext: String,
    /// Keys that had no entry
    pub missing: Vec<String>,
}

impl Citation<'_> {
    pub fn keys(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.key.as_str()).collect()
    }
}

/// A citation command seen while building, resolved after draining.
#[derive(Debug, Clone, Serialize)]
pub struct CiteRequest {
    pub element: ElementId,
    pub keys: Vec<String>,
    pub pretext: Option<String>,
}

/// Citation key → marker table.
#[derive(Debug, Default)]
pub struct CitationTable {
    markers: HashMap<String, String>,
    requests: Vec<CiteRequest>,
}

impl CitationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marker from item registration. Keeps any marker already set for `key`.
    pub fn register_default(&mut self, key: &str, marker: impl Into<String>) -> bool {
        if self.markers.contains_key(key) {
            return false;
        }
        self.markers.insert(key.to_string(), marker.into());
        true
    }

    /// Externally computed marker. Always replaces what is there.
    pub fn apply_override(&mut self, key: impl Into<String>, marker: impl Into<String>) {
        self.markers.insert(key.into(), marker.into());
    }

    /// Apply many overrides, returning how many were applied
    pub fn apply_overrides<I>(&mut self, overrides: I) -> usize
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut count = 0;
        for (key, marker) in overrides {
            self.apply_override(key, marker);
            count += 1;
        }
        count
    }

    pub fn marker(&self, key: &str) -> Option<&str> {
        self.markers.get(key).map(String::as_str)
    }

    pub fn record(&mut self, request: CiteRequest) {
        self.requests.push(request);
    }

    pub fn requests(&self) -> &[CiteRequest] {
        &self.requests
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

fn bibcite_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*\\bibcite\{([^}]*)\}\{(.*)\}\s*$").ok())
        .as_ref()
}

/// Content of the first brace group of `s`, or `s` itself when it does not
/// start with one.
fn first_group(s: &str) -> &str {
    if !s.starts_with('{') {
        return s;
    }
    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return &s[1..i];
                }
            }
            _ => {}
        }
    }
    s
}

/// Extract `\bibcite{key}{marker}` entries from auxiliary file content.
pub fn parse_bibcite_lines(content: &str) -> Vec<(String, String)> {
    let Some(re) = bibcite_regex() else {
        return Vec::new();
    };
    content
        .lines()
        .filter_map(|line| re.captures(line))
        .map(|caps| {
            let key = caps[1].trim().to_string();
            let marker = first_group(caps[2].trim()).trim().to_string();
            (key, marker)
        })
        .collect()
}

/// Read marker overrides from an auxiliary file.
///
/// A missing or unreadable file is logged and yields no overrides.
pub fn load_aux_file(path: &Path) -> Vec<(String, String)> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let entries = parse_bibcite_lines(&content);
            tracing::debug!("Read {} citation overrides from {}", entries.len(), path.display());
            entries
        }
        Err(e) => {
            tracing::warn!("Could not read auxiliary file {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlabeled_numbering_skips_labeled_items() {
        let mut bib = Bibliography::new();
        let list = bib.new_list();

        assert_eq!(bib.register(list, "a", ElementId(1), None), Some(1));
        assert_eq!(bib.register(list, "b", ElementId(2), Some("Knu84".into())), None);
        assert_eq!(bib.register(list, "c", ElementId(3), None), Some(2));
        assert_eq!(bib.register(list, "d", ElementId(4), Some("Tur36".into())), None);
        assert_eq!(bib.register(list, "e", ElementId(5), None), Some(3));

        assert_eq!(bib.lookup("b").unwrap().own_marker(), "Knu84");
        assert_eq!(bib.lookup("e").unwrap().own_marker(), "3");
    }

    #[test]
    fn test_numbering_is_per_list() {
        let mut bib = Bibliography::new();
        let first = bib.new_list();
        let second = bib.new_list();

        bib.register(first, "a", ElementId(1), None);
        bib.register(first, "b", ElementId(2), None);
        assert_eq!(bib.register(second, "c", ElementId(3), None), Some(1));
        assert_eq!(bib.items_in(first).len(), 2);
    }

    #[test]
    fn test_reregistration_overwrites() {
        let mut bib = Bibliography::new();
        let list = bib.new_list();
        bib.register(list, "dup", ElementId(1), None);
        bib.register(list, "other", ElementId(2), None);
        let number = bib.register(list, "dup", ElementId(3), None);

        let item = bib.lookup("dup").unwrap();
        assert_eq!(item.element, ElementId(3));
        assert_eq!(number, Some(2));
        assert_eq!(bib.len(), 2);
        assert_eq!(bib.items().map(|i| i.key.as_str()).collect::<Vec<_>>(), vec!["dup", "other"]);
    }

    #[test]
    fn test_relabeled_key_releases_its_number() {
        let mut bib = Bibliography::new();
        let list = bib.new_list();
        bib.register(list, "a", ElementId(1), None);
        bib.register(list, "b", ElementId(2), None);

        assert_eq!(bib.register(list, "a", ElementId(3), Some("X".into())), None);
        assert_eq!(bib.register(list, "c", ElementId(4), None), Some(2));
    }

    #[test]
    fn test_long_list_numbers_stay_sequential() {
        let mut bib = Bibliography::new();
        let list = bib.new_list();
        let numbers: Vec<_> = (0..5000)
            .filter_map(|i| bib.register(list, format!("k{}", i), ElementId(i), None))
            .collect();

        assert_eq!(numbers.len(), 5000);
        assert!(numbers.iter().zip(1..).all(|(n, expected)| *n == expected));
    }

    #[test]
    fn test_cite_skips_missing_keys() {
        let mut bib = Bibliography::new();
        let list = bib.new_list();
        bib.register(list, "k1", ElementId(1), None);
        bib.register(list, "k3", ElementId(3), None);

        let citation = bib.cite(&["k1", "k2", "k3"], Some("p. 4"));
        assert_eq!(citation.keys(), vec!["k1", "k3"]);
        assert_eq!(citation.missing, vec!["k2".to_string()]);
        assert_eq!(citation.pretext, "p. 4");

        let bare = bib.cite(&["k1"], None);
        assert_eq!(bare.pretext, "");
    }

    #[test]
    fn test_citation_table_override_order() {
        let mut table = CitationTable::new();

        // registration first, override later: override wins
        table.register_default("a", "1");
        table.apply_override("a", "Abc90");
        assert_eq!(table.marker("a"), Some("Abc90"));

        // override first: registration does not replace it
        table.apply_override("b", "Bcd91");
        assert!(!table.register_default("b", "2"));
        assert_eq!(table.marker("b"), Some("Bcd91"));

        // last override wins
        table.apply_override("b", "Bcd92");
        assert_eq!(table.marker("b"), Some("Bcd92"));
    }

    #[test]
    fn test_parse_bibcite_lines() {
        let aux = "\\relax\n\\bibcite{knuth}{Knu84}\n\\bibcite{turing}{{1}{1936}{{Turing}}{}}\n\\@writefile{toc}{x}\n";
        let entries = parse_bibcite_lines(aux);
        assert_eq!(
            entries,
            vec![
                ("knuth".to_string(), "Knu84".to_string()),
                ("turing".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_missing_aux_file_yields_nothing() {
        let entries = load_aux_file(Path::new("/nonexistent/dir/doc.aux"));
        assert!(entries.is_empty());
    }
}
