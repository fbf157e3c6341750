//! Document Tree - arena of elements in document order
//!
//! Stand-in for the host tree builder: elements are appended while the
//! source is consumed and queried in document (pre-order) order afterwards.

use crate::element::{Element, ElementId};

/// Arena-backed document tree.
///
/// Parent/child links are stored as ids, so the tree holds no reference
/// cycles and elements can be looked up in O(1).
#[derive(Debug, Default)]
pub struct DocumentTree {
    elements: Vec<Element>,
    parents: Vec<Option<ElementId>>,
    children: Vec<Vec<ElementId>>,
    roots: Vec<ElementId>,
}

impl DocumentTree {
    /// Create a new empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element under `parent` (or as a root) and return its id.
    /// An unknown parent is logged and the element becomes a root.
    pub fn add_element(&mut self, parent: Option<ElementId>, mut element: Element) -> ElementId {
        let id = ElementId(self.elements.len() as u32);
        element.id = id;

        let parent = parent.filter(|p| {
            let known = p.index() < self.children.len();
            if !known {
                tracing::warn!("Unknown parent {} for {} element, adding it as a root", p, element.kind);
            }
            known
        });

        match parent.and_then(|p| self.children.get_mut(p.index())) {
            Some(siblings) => siblings.push(id),
            None => self.roots.push(id),
        }

        self.elements.push(element);
        self.parents.push(parent);
        self.children.push(Vec::new());

        id
    }

    /// Get an element by id
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.index())
    }

    /// Get a mutable element by id
    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(id.index())
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.parents.get(id.index()).copied().flatten()
    }

    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.children.get(id.index()).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn roots(&self) -> &[ElementId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// All descendants of `id` in document order, excluding `id` itself
    pub fn descendants(&self, id: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = self.children(id).iter().rev().copied().collect();

        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev());
        }

        out
    }

    /// Descendants of `id` with the given kind, in document order
    pub fn descendants_of_kind(&self, id: ElementId, kind: &str) -> Vec<ElementId> {
        self.descendants(id)
            .into_iter()
            .filter(|d| self.get(*d).is_some_and(|e| e.kind == kind))
            .collect()
    }

    /// Every element in document order
    pub fn walk(&self) -> Vec<ElementId> {
        let mut out = Vec::with_capacity(self.elements.len());
        for root in &self.roots {
            out.push(*root);
            out.extend(self.descendants(*root));
        }
        out
    }

    /// Every element of the given kind, in document order
    pub fn elements_of_kind(&self, kind: &str) -> Vec<ElementId> {
        self.walk()
            .into_iter()
            .filter(|id| self.get(*id).is_some_and(|e| e.kind == kind))
            .collect()
    }

    /// Set the rendered text of an element. Unknown ids are ignored.
    pub fn set_text(&mut self, id: ElementId, text: impl Into<String>) {
        if let Some(element) = self.get_mut(id) {
            element.text = text.into();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_parent_becomes_root() {
        let mut tree = DocumentTree::new();
        let first = tree.add_element(None, Element::new("chapter"));
        let orphan = tree.add_element(Some(ElementId(42)), Element::new("theorem"));

        assert_eq!(tree.roots(), &[first, orphan]);
        assert_eq!(tree.parent(orphan), None);
        assert!(tree.children(first).is_empty());
    }

    #[test]
    fn test_document_order() {
        let mut tree = DocumentTree::new();
        let ch1 = tree.add_element(None, Element::new("chapter"));
        let sec = tree.add_element(Some(ch1), Element::new("section"));
        let thm = tree.add_element(Some(sec), Element::new("theorem"));
        let lem = tree.add_element(Some(ch1), Element::new("lemma"));
        let ch2 = tree.add_element(None, Element::new("chapter"));

        assert_eq!(tree.walk(), vec![ch1, sec, thm, lem, ch2]);
        assert_eq!(tree.descendants(ch1), vec![sec, thm, lem]);
        assert_eq!(tree.parent(thm), Some(sec));
        assert_eq!(tree.parent(ch2), None);
    }

    #[test]
    fn test_kind_filtering() {
        let mut tree = DocumentTree::new();
        let ch = tree.add_element(None, Element::new("chapter"));
        let sec = tree.add_element(Some(ch), Element::new("section"));
        let t1 = tree.add_element(Some(sec), Element::new("theorem"));
        let _l = tree.add_element(Some(ch), Element::new("lemma"));
        let t2 = tree.add_element(Some(ch), Element::new("theorem"));

        assert_eq!(tree.descendants_of_kind(ch, "theorem"), vec![t1, t2]);
        assert_eq!(tree.elements_of_kind("chapter"), vec![ch]);
        assert!(tree.descendants_of_kind(sec, "lemma").is_empty());
    }
}
