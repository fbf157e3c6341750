//! Document elements - the nodes handed over by the host tree builder
//!
//! An element is identified by an [`ElementId`] index into the
//! [`DocumentTree`](crate::tree::DocumentTree) arena. Registries and the
//! dependency graph only ever store ids, never the elements themselves.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable index of an element inside its document tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub u32);

impl ElementId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One element of the document tree.
///
/// Kinds are free-form (`"theorem"`, `"chapter"`, `"bibitem"`...) since the
/// set of theorem-like environments is defined by the document itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Element {
    /// Assigned by the tree on insertion
    pub id: ElementId,
    /// Element kind, e.g. `theorem` or `section`
    pub kind: String,
    /// Display caption, e.g. `Theorem`
    pub caption: String,
    /// Reference number, e.g. `2.1`
    pub reference: Option<String>,
    /// Title for sectioning elements
    pub title: Option<String>,
    /// Explicit anchor used in rendered output
    pub anchor: Option<String>,
    /// Rendered textual form, filled in by the renderer
    pub text: String,
}

impl Element {
    /// Create a new element of the given kind
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            id: ElementId(0),
            kind: kind.into(),
            caption: String::new(),
            reference: None,
            title: None,
            anchor: None,
            text: String::new(),
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = caption.into();
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_anchor(mut self, anchor: impl Into<String>) -> Self {
        self.anchor = Some(anchor.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Anchor id for output, generated from the index when none was given
    pub fn anchor_id(&self) -> String {
        self.anchor
            .clone()
            .unwrap_or_else(|| format!("a{:010}", self.id.0))
    }

    /// Caption followed by the reference number, e.g. `Theorem 2.1`
    pub fn full_caption(&self) -> String {
        match &self.reference {
            Some(reference) if !self.caption.is_empty() => format!("{} {}", self.caption, reference),
            Some(reference) => reference.clone(),
            None => self.caption.clone(),
        }
    }

    /// Title used for sectioning elements in reports
    pub fn heading(&self) -> String {
        match &self.title {
            Some(title) => match &self.reference {
                Some(reference) => format!("{} {}", reference, title),
                None => title.clone(),
            },
            None => self.full_caption(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_caption() {
        let thm = Element::new("theorem").with_caption("Theorem").with_reference("2.1");
        assert_eq!(thm.full_caption(), "Theorem 2.1");

        let unnumbered = Element::new("remark").with_caption("Remark");
        assert_eq!(unnumbered.full_caption(), "Remark");
    }

    #[test]
    fn test_anchor_fallback() {
        let mut elem = Element::new("lemma");
        elem.id = ElementId(7);
        assert_eq!(elem.anchor_id(), "a0000000007");

        let named = elem.with_anchor("lem:key");
        assert_eq!(named.anchor_id(), "lem:key");
    }

    #[test]
    fn test_section_heading() {
        let chapter = Element::new("chapter").with_title("Groups").with_reference("3");
        assert_eq!(chapter.heading(), "3 Groups");
    }
}
