//! JSON document sources
//!
//! A small stand-in for the markup front end: a nested element description
//! whose directives are replayed, in document order, as building-phase
//! calls on a [`DocumentContext`].
//!
//! ```json
//! { "elements": [
//!   { "kind": "chapter", "title": "Basics", "children": [
//!     { "kind": "lemma", "caption": "Lemma", "ref": "1.1", "label": "lem:a" },
//!     { "kind": "proof", "proves": "lem:a", "uses": ["thm:later"] }
//!   ]}
//! ]}
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::bibliography::BibListId;
use crate::context::DocumentContext;
use crate::element::{Element, ElementId};
use crate::{Error, Result};

/// Kind of the element opening a bibliography list
pub const BIBLIOGRAPHY_KIND: &str = "thebibliography";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentSource {
    pub elements: Vec<SourceElement>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceElement {
    pub kind: String,
    pub caption: String,
    #[serde(rename = "ref")]
    pub reference: Option<String>,
    pub title: Option<String>,
    pub label: Option<String>,
    /// Rendered text, as produced by the renderer
    pub text: String,
    pub uses: Vec<String>,
    pub proves: Option<String>,
    pub covers: Vec<String>,
    pub bibitem: Option<SourceBibItem>,
    pub cite: Option<SourceCite>,
    pub children: Vec<SourceElement>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceBibItem {
    pub key: String,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceCite {
    pub keys: Vec<String>,
    #[serde(default)]
    pub pretext: Option<String>,
}

impl DocumentSource {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Replay the source into a fresh building-phase context
    pub fn build(&self) -> Result<DocumentContext> {
        let mut ctx = DocumentContext::new();
        let mut builder = Builder { ctx: &mut ctx, list: None };
        for element in &self.elements {
            builder.visit(None, element)?;
        }
        Ok(ctx)
    }
}

struct Builder<'a> {
    ctx: &'a mut DocumentContext,
    /// Bibliography list currently open
    list: Option<BibListId>,
}

impl Builder<'_> {
    fn visit(&mut self, parent: Option<ElementId>, source: &SourceElement) -> Result<()> {
        if source.kind.is_empty() {
            return Err(Error::Source("element without a kind".to_string()));
        }

        let mut element = Element::new(&source.kind)
            .with_caption(&source.caption)
            .with_text(&source.text);
        if let Some(reference) = &source.reference {
            element = element.with_reference(reference);
        }
        if let Some(title) = &source.title {
            element = element.with_title(title);
        }
        if let Some(label) = &source.label {
            element = element.with_anchor(label);
        }

        let id = self.ctx.add_element(parent, element);

        if let Some(label) = &source.label {
            self.ctx.declare_label(label, id);
        }
        if !source.uses.is_empty() {
            self.ctx.uses(id, source.uses.clone());
        }
        if let Some(target) = &source.proves {
            self.ctx.proves(id, target);
        }
        if !source.covers.is_empty() {
            self.ctx.covers(id, source.covers.clone());
        }
        if let Some(cite) = &source.cite {
            if cite.keys.is_empty() {
                return Err(Error::Source(format!("cite at {} has no keys", id)));
            }
            self.ctx.record_cite(id, cite.keys.clone(), cite.pretext.clone());
        }

        let enclosing = self.list;
        if source.kind == BIBLIOGRAPHY_KIND {
            self.list = Some(self.ctx.begin_bibliography());
        }
        if let Some(item) = &source.bibitem {
            let list = match self.list {
                Some(list) => list,
                None => {
                    let list = self.ctx.begin_bibliography();
                    self.list = Some(list);
                    list
                }
            };
            let number = self.ctx.register_bibitem(list, &item.key, id, item.label.clone());
            if let (Some(n), Some(element)) = (number, self.ctx.tree_mut().get_mut(id)) {
                element.reference = Some(n.to_string());
            }
        }

        for child in &source.children {
            self.visit(Some(id), child)?;
        }

        if source.kind == BIBLIOGRAPHY_KIND {
            self.list = enclosing;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "elements": [
            { "kind": "chapter", "title": "Basics", "children": [
                { "kind": "proof", "proves": "thm:main", "uses": ["lem:a", "lem:ghost"] },
                { "kind": "lemma", "caption": "Lemma", "ref": "1.1", "label": "lem:a" },
                { "kind": "theorem", "caption": "Theorem", "ref": "1.2", "label": "thm:main" }
            ]},
            { "kind": "thebibliography", "children": [
                { "kind": "bibitem", "bibitem": { "key": "knuth" } },
                { "kind": "bibitem", "bibitem": { "key": "turing", "label": "Tur36" } },
                { "kind": "bibitem", "bibitem": { "key": "church" } }
            ]}
        ]
    }"#;

    #[test]
    fn test_build_queues_without_resolving() {
        let source = DocumentSource::from_json(SAMPLE).unwrap();
        let ctx = source.build().unwrap();

        assert_eq!(ctx.pending_tasks(), 2);
        assert_eq!(ctx.label_count(), 2);
        assert_eq!(ctx.tree().len(), 8);
    }

    #[test]
    fn test_bibitems_numbered_in_list() {
        let source = DocumentSource::from_json(SAMPLE).unwrap();
        let doc = source.build().unwrap().drain();

        assert_eq!(doc.marker("knuth"), Some("1"));
        assert_eq!(doc.marker("turing"), Some("Tur36"));
        assert_eq!(doc.marker("church"), Some("2"));
    }

    #[test]
    fn test_element_without_kind_is_rejected() {
        let source = DocumentSource::from_json(r#"{ "elements": [ { "caption": "x" } ] }"#).unwrap();
        assert!(source.build().is_err());
    }
}
