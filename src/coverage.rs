//! Coverage reports
//!
//! For every sectioning element, theorem-like descendants are tallied by
//! whether anything covers them. Percentages are integer-truncated, and the
//! document-wide figure is computed from summed counts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::depgraph::DependencyGraph;
use crate::element::ElementId;
use crate::tree::DocumentTree;
use crate::Error;

/// Coverage status of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverageStatus {
    /// Everything covered (or nothing to cover)
    Ok,
    Partial,
    /// Nothing covered
    Void,
}

impl CoverageStatus {
    pub fn from_percentage(coverage: u32) -> Self {
        match coverage {
            100 => CoverageStatus::Ok,
            0 => CoverageStatus::Void,
            _ => CoverageStatus::Partial,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CoverageStatus::Ok => "ok",
            CoverageStatus::Partial => "partial",
            CoverageStatus::Void => "void",
        }
    }
}

impl FromStr for CoverageStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ok" => Ok(CoverageStatus::Ok),
            "partial" => Ok(CoverageStatus::Partial),
            "void" => Ok(CoverageStatus::Void),
            _ => Err(Error::UnknownStatus(s.to_string())),
        }
    }
}

impl fmt::Display for CoverageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// `100 * (total - uncovered) / total`, truncated; 100 for an empty set.
pub fn percentage(total: usize, uncovered: usize) -> u32 {
    if total == 0 {
        return 100;
    }
    (100 * total.saturating_sub(uncovered) / total) as u32
}

/// Reference to an element covering a statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoveringRef {
    pub id: String,
    pub caption: String,
}

/// One theorem-like element in a report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageEntry {
    pub id: String,
    pub caption: String,
    /// Rendered statement
    pub statement: String,
    pub covered_by: Vec<CoveringRef>,
}

impl CoverageEntry {
    fn from_element(tree: &DocumentTree, graph: &DependencyGraph, id: ElementId) -> Option<Self> {
        let element = tree.get(id)?;
        let covered_by = graph
            .covered_by(id)
            .iter()
            .filter_map(|c| tree.get(*c))
            .map(|c| CoveringRef {
                id: c.anchor_id(),
                caption: c.full_caption(),
            })
            .collect();

        Some(Self {
            id: element.anchor_id(),
            caption: element.full_caption(),
            statement: element.text.clone(),
            covered_by,
        })
    }

    pub fn is_covered(&self) -> bool {
        !self.covered_by.is_empty()
    }
}

/// Coverage of one section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartialReport {
    pub title: String,
    pub total: usize,
    pub uncovered: usize,
    pub coverage: u32,
    pub status: CoverageStatus,
    pub entries: Vec<CoverageEntry>,
}

impl PartialReport {
    pub fn new(title: impl Into<String>, entries: Vec<CoverageEntry>) -> Self {
        let total = entries.len();
        let uncovered = entries.iter().filter(|e| !e.is_covered()).count();
        let coverage = percentage(total, uncovered);

        Self {
            title: title.into(),
            total,
            uncovered,
            coverage,
            status: CoverageStatus::from_percentage(coverage),
            entries,
        }
    }

    /// Build the report for one section element.
    ///
    /// Matches of each kind form one block, blocks follow the order of `kinds`.
    pub fn from_section<S: AsRef<str>>(
        tree: &DocumentTree,
        graph: &DependencyGraph,
        section: ElementId,
        kinds: &[S],
    ) -> Self {
        let title = tree.get(section).map(|s| s.heading()).unwrap_or_default();
        let entries = kinds
            .iter()
            .flat_map(|kind| tree.descendants_of_kind(section, kind.as_ref()))
            .filter_map(|id| CoverageEntry::from_element(tree, graph, id))
            .collect();

        Self::new(title, entries)
    }
}

/// Coverage of a whole document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub partials: Vec<PartialReport>,
    pub total: usize,
    pub uncovered: usize,
    pub coverage: u32,
}

impl Report {
    pub fn new(partials: Vec<PartialReport>) -> Self {
        let total = partials.iter().map(|p| p.total).sum();
        let uncovered = partials.iter().map(|p| p.uncovered).sum();

        Self {
            coverage: percentage(total, uncovered),
            partials,
            total,
            uncovered,
        }
    }

    pub fn status(&self) -> CoverageStatus {
        CoverageStatus::from_percentage(self.coverage)
    }
}

/// Build a report over every `section_kind` element in document order
pub fn build_report<S: AsRef<str>>(
    tree: &DocumentTree,
    graph: &DependencyGraph,
    kinds: &[S],
    section_kind: &str,
) -> Report {
    let partials = tree
        .elements_of_kind(section_kind)
        .into_iter()
        .map(|section| PartialReport::from_section(tree, graph, section, kinds))
        .collect();

    Report::new(partials)
}
