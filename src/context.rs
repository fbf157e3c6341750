//! Document Context - registries owned by one compilation
//!
//! Resolution runs in three phases:
//!
//! 1. **Building**: the host appends elements to a [`DocumentContext`],
//!    declares labels, registers bibliography items and queues resolution
//!    tasks. No label lookups are possible in this phase.
//! 2. **Draining**: [`DocumentContext::drain`] consumes the context, runs
//!    every queued task once against the now complete label registry and
//!    returns a [`ResolvedDocument`].
//! 3. **Reporting**: the resolved document exposes the frozen registries and
//!    graph read-only, plus citation resolution and coverage reports.

use std::path::Path;

use crate::bibliography::{self, BibListId, Bibliography, Citation, CitationTable, CiteRequest};
use crate::coverage::{self, Report};
use crate::depgraph::DependencyGraph;
use crate::element::{Element, ElementId};
use crate::labels::LabelRegistry;
use crate::queue::{ResolutionQueue, ResolutionTask};
use crate::resolver::{Resolver, ResolverStats};
use crate::tree::DocumentTree;

/// Building-phase state of one document.
#[derive(Debug, Default)]
pub struct DocumentContext {
    tree: DocumentTree,
    labels: LabelRegistry,
    bibliography: Bibliography,
    citations: CitationTable,
    queue: ResolutionQueue,
}

impl DocumentContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tree(&self) -> &DocumentTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut DocumentTree {
        &mut self.tree
    }

    pub fn add_element(&mut self, parent: Option<ElementId>, element: Element) -> ElementId {
        self.tree.add_element(parent, element)
    }

    pub fn declare_label(&mut self, name: impl Into<String>, element: ElementId) {
        self.labels.declare(name, element);
    }

    /// Number of labels declared so far
    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    /// Open a new bibliography list
    pub fn begin_bibliography(&mut self) -> BibListId {
        self.bibliography.new_list()
    }

    /// Register a bibliography item and its default citation marker.
    ///
    /// Returns the assigned sequence number for unlabeled items.
    pub fn register_bibitem(
        &mut self,
        list: BibListId,
        key: &str,
        element: ElementId,
        label: Option<String>,
    ) -> Option<u32> {
        let number = self.bibliography.register(list, key, element, label.clone());
        let marker = match (label, number) {
            (Some(label), _) => label,
            (None, Some(n)) => n.to_string(),
            (None, None) => String::new(),
        };
        self.citations.register_default(key, marker);
        number
    }

    /// Apply externally computed citation markers
    pub fn apply_citation_overrides<I>(&mut self, overrides: I) -> usize
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.citations.apply_overrides(overrides)
    }

    /// Read `\bibcite` overrides from an auxiliary file, if it exists
    pub fn load_aux(&mut self, path: &Path) -> usize {
        let entries = bibliography::load_aux_file(path);
        self.apply_citation_overrides(entries)
    }

    /// Record a citation command for resolution after draining
    pub fn record_cite(&mut self, element: ElementId, keys: Vec<String>, pretext: Option<String>) {
        self.citations.record(CiteRequest { element, keys, pretext });
    }

    pub fn uses(&mut self, node: ElementId, labels: Vec<String>) {
        self.queue.push(ResolutionTask::Uses { node, labels });
    }

    pub fn proves(&mut self, node: ElementId, label: impl Into<String>) {
        self.queue.push(ResolutionTask::Proves { node, label: label.into() });
    }

    pub fn covers(&mut self, node: ElementId, labels: Vec<String>) {
        self.queue.push(ResolutionTask::Covers { node, labels });
    }

    pub fn pending_tasks(&self) -> usize {
        self.queue.len()
    }

    /// End the building phase and run every queued task exactly once
    pub fn drain(self) -> ResolvedDocument {
        let DocumentContext {
            tree,
            labels,
            bibliography,
            citations,
            queue,
        } = self;

        tracing::debug!("Draining {} resolution tasks against {} labels", queue.len(), labels.len());
        let (graph, stats) = Resolver::new(&labels).run(queue);

        ResolvedDocument {
            tree,
            labels,
            bibliography,
            citations,
            graph,
            stats,
        }
    }
}

/// A document whose references have all been resolved.
#[derive(Debug)]
pub struct ResolvedDocument {
    tree: DocumentTree,
    labels: LabelRegistry,
    bibliography: Bibliography,
    citations: CitationTable,
    graph: DependencyGraph,
    stats: ResolverStats,
}

impl ResolvedDocument {
    pub fn tree(&self) -> &DocumentTree {
        &self.tree
    }

    pub fn labels(&self) -> &LabelRegistry {
        &self.labels
    }

    pub fn bibliography(&self) -> &Bibliography {
        &self.bibliography
    }

    pub fn citations(&self) -> &CitationTable {
        &self.citations
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn stats(&self) -> &ResolverStats {
        &self.stats
    }

    /// Store the renderer's output for an element before reporting
    pub fn set_rendered_text(&mut self, element: ElementId, text: impl Into<String>) {
        self.tree.set_text(element, text);
    }

    /// Resolve a list of citation keys
    pub fn cite<S: AsRef<str>>(&self, keys: &[S], pretext: Option<&str>) -> Citation<'_> {
        self.bibliography.cite(keys, pretext)
    }

    /// Marker printed for `key` at citation sites
    pub fn marker(&self, key: &str) -> Option<&str> {
        self.citations.marker(key)
    }

    /// Resolve every citation command recorded while building
    pub fn resolved_citations(&self) -> Vec<(ElementId, Citation<'_>)> {
        self.citations
            .requests()
            .iter()
            .map(|req| (req.element, self.cite(req.keys.as_slice(), req.pretext.as_deref())))
            .collect()
    }

    /// Citation elements referencing `key`, in document order of recording
    pub fn cited_by(&self, key: &str) -> Vec<ElementId> {
        self.citations
            .requests()
            .iter()
            .filter(|req| req.keys.iter().any(|k| k == key))
            .map(|req| req.element)
            .collect()
    }

    /// Build the coverage report for the given theorem kinds
    pub fn coverage_report<S: AsRef<str>>(&self, kinds: &[S], section_kind: &str) -> Report {
        coverage::build_report(&self.tree, &self.graph, kinds, section_kind)
    }
}
