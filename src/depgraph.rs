//! Dependency Graph - relations between theorem-like elements
//!
//! Nodes carry the resolved attributes of a declaration site:
//! - `uses`: prerequisites, in declaration order (duplicates kept)
//! - `proved`: the statement a proof proves
//! - `covers`: statements the node addresses
//! - `covered_by` / `proved_by`: back-references written by other nodes
//!
//! Edges model the prerequisite relation only, as ordered pairs
//! `(used, user)` with set semantics. Only elements taking part in a
//! prerequisite relation are members of the graph; proofs and covers are
//! attributes and never add members.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::Serialize;

use crate::element::ElementId;
use crate::tree::DocumentTree;

/// Directed edge from a prerequisite to the element using it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DepEdge {
    pub from: ElementId,
    pub to: ElementId,
}

impl DepEdge {
    pub fn new(from: ElementId, to: ElementId) -> Self {
        Self { from, to }
    }
}

/// Resolved relations attached to one element.
#[derive(Debug, Clone, Serialize)]
pub struct DependencyNode {
    pub element: ElementId,
    pub uses: Vec<ElementId>,
    pub proved: Option<ElementId>,
    pub proved_by: Option<ElementId>,
    pub covers: Vec<ElementId>,
    pub covered_by: Vec<ElementId>,
}

impl DependencyNode {
    fn new(element: ElementId) -> Self {
        Self {
            element,
            uses: Vec::new(),
            proved: None,
            proved_by: None,
            covers: Vec::new(),
            covered_by: Vec::new(),
        }
    }

    pub fn is_covered(&self) -> bool {
        !self.covered_by.is_empty()
    }
}

/// Graph built once while the resolution queue drains.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    /// Attributes of every element touched by a task
    nodes: HashMap<ElementId, DependencyNode>,
    /// Graph members in first-seen order
    members: Vec<ElementId>,
    member_set: HashSet<ElementId>,
    edges: Vec<DepEdge>,
    edge_set: HashSet<DepEdge>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the attributes of `element` without making it a member
    pub(crate) fn node_mut(&mut self, element: ElementId) -> &mut DependencyNode {
        self.nodes
            .entry(element)
            .or_insert_with(|| DependencyNode::new(element))
    }

    /// Make `element` a graph member
    pub(crate) fn add_member(&mut self, element: ElementId) -> &mut DependencyNode {
        if self.member_set.insert(element) {
            self.members.push(element);
        }
        self.node_mut(element)
    }

    /// Add an edge, returning false when the exact pair already exists
    pub(crate) fn add_edge(&mut self, edge: DepEdge) -> bool {
        if !self.edge_set.insert(edge) {
            return false;
        }
        self.edges.push(edge);
        true
    }

    pub fn node(&self, element: ElementId) -> Option<&DependencyNode> {
        self.nodes.get(&element)
    }

    /// Whether `element` is a graph member
    pub fn contains(&self, element: ElementId) -> bool {
        self.member_set.contains(&element)
    }

    /// Graph members in first-seen order
    pub fn nodes(&self) -> impl Iterator<Item = &DependencyNode> {
        self.members.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Edges in insertion order
    pub fn edges(&self) -> &[DepEdge] {
        &self.edges
    }

    pub fn has_edge(&self, from: ElementId, to: ElementId) -> bool {
        self.edge_set.contains(&DepEdge::new(from, to))
    }

    /// Elements covering `element`, in resolution order
    pub fn covered_by(&self, element: ElementId) -> &[ElementId] {
        self.nodes
            .get(&element)
            .map(|n| n.covered_by.as_slice())
            .unwrap_or(&[])
    }

    pub fn proved_by(&self, element: ElementId) -> Option<ElementId> {
        self.nodes.get(&element).and_then(|n| n.proved_by)
    }

    /// Elements using `element` as a prerequisite
    pub fn dependents(&self, element: ElementId) -> Vec<ElementId> {
        self.edges
            .iter()
            .filter(|e| e.from == element)
            .map(|e| e.to)
            .collect()
    }

    /// Prerequisites of `element`
    pub fn prerequisites(&self, element: ElementId) -> Vec<ElementId> {
        self.edges
            .iter()
            .filter(|e| e.to == element)
            .map(|e| e.from)
            .collect()
    }

    pub fn stats(&self) -> GraphStats {
        let nodes = self.nodes.values();
        GraphStats {
            nodes: self.members.len(),
            edges: self.edges.len(),
            proofs: nodes.clone().filter(|n| n.proved.is_some()).count(),
            covers: nodes.clone().map(|n| n.covers.len()).sum(),
            covered: nodes.filter(|n| n.is_covered()).count(),
        }
    }

    /// Export nodes and links for a force-directed graph viewer
    pub fn export(&self, tree: &DocumentTree) -> GraphExport {
        let anchor = |id: ElementId| {
            tree.get(id)
                .map(|e| e.anchor_id())
                .unwrap_or_else(|| format!("a{:010}", id.0))
        };

        let nodes = self
            .members
            .iter()
            .map(|id| ExportNode {
                id: anchor(*id),
                caption: tree.get(*id).map(|e| e.full_caption()).unwrap_or_default(),
                kind: tree.get(*id).map(|e| e.kind.clone()).unwrap_or_default(),
            })
            .collect();

        let links = self
            .edges
            .iter()
            .map(|e| ExportLink {
                source: anchor(e.from),
                target: anchor(e.to),
            })
            .collect();

        GraphExport { nodes, links }
    }
}

/// Serializable graph for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct GraphExport {
    pub nodes: Vec<ExportNode>,
    pub links: Vec<ExportLink>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportNode {
    pub id: String,
    pub caption: String,
    pub kind: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportLink {
    pub source: String,
    pub target: String,
}

/// Statistics about a dependency graph
#[derive(Debug, Clone, Serialize)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
    pub proofs: usize,
    pub covers: usize,
    pub covered: usize,
}

impl fmt::Display for GraphStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Dependency Graph Statistics:")?;
        writeln!(f, "  Nodes: {}", self.nodes)?;
        writeln!(f, "  Edges: {}", self.edges)?;
        writeln!(f, "  Proofs: {}", self.proofs)?;
        writeln!(f, "  Covers: {} ({} elements covered)", self.covers, self.covered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;

    #[test]
    fn test_edge_set_semantics() {
        let mut graph = DependencyGraph::new();
        assert!(graph.add_edge(DepEdge::new(ElementId(1), ElementId(2))));
        assert!(!graph.add_edge(DepEdge::new(ElementId(1), ElementId(2))));
        assert!(graph.add_edge(DepEdge::new(ElementId(2), ElementId(1))));

        assert_eq!(graph.edges().len(), 2);
        assert!(graph.has_edge(ElementId(2), ElementId(1)));
        assert_eq!(graph.dependents(ElementId(1)), vec![ElementId(2)]);
        assert_eq!(graph.prerequisites(ElementId(1)), vec![ElementId(2)]);
    }

    #[test]
    fn test_node_order_and_export() {
        let mut tree = DocumentTree::new();
        let lemma = tree.add_element(
            None,
            Element::new("lemma").with_caption("Lemma").with_reference("1").with_anchor("lem:a"),
        );
        let thm = tree.add_element(None, Element::new("theorem").with_caption("Theorem").with_reference("2"));

        let mut graph = DependencyGraph::new();
        graph.add_member(thm).uses.push(lemma);
        graph.add_member(lemma);
        graph.add_edge(DepEdge::new(lemma, thm));

        let export = graph.export(&tree);
        assert_eq!(export.nodes[0].caption, "Theorem 2");
        assert_eq!(export.nodes[1].id, "lem:a");
        assert_eq!(export.links[0].source, "lem:a");
        assert_eq!(export.links[0].target, "a0000000001");

        let stats = graph.stats();
        assert_eq!(stats.nodes, 2);
        assert_eq!(stats.edges, 1);
    }

    #[test]
    fn test_attributes_do_not_add_members() {
        let tree = DocumentTree::new();
        let mut graph = DependencyGraph::new();
        graph.node_mut(ElementId(2)).proved = Some(ElementId(1));
        graph.node_mut(ElementId(1)).covered_by.push(ElementId(3));

        assert!(!graph.contains(ElementId(1)));
        assert!(graph.node(ElementId(1)).unwrap().is_covered());
        assert_eq!(graph.nodes().count(), 0);
        assert_eq!(graph.stats().nodes, 0);
        assert_eq!(graph.stats().proofs, 1);
        assert!(graph.export(&tree).nodes.is_empty());
    }
}
