//! Label Registry - label name → owning element

use std::collections::HashMap;
use crate::element::ElementId;

/// Global label table, filled while the tree is built.
///
/// Lookups are only exposed once the building phase has finished, through
/// [`ResolvedDocument`](crate::context::ResolvedDocument) and the drain-time
/// [`Resolver`](crate::resolver::Resolver).
#[derive(Debug, Default)]
pub struct LabelRegistry {
    labels: HashMap<String, ElementId>,
}

impl LabelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a label. A redeclared label points to the latest element.
    pub fn declare(&mut self, name: impl Into<String>, element: ElementId) -> Option<ElementId> {
        let name = name.into();
        let previous = self.labels.insert(name.clone(), element);
        if let Some(prev) = previous {
            tracing::warn!("Label `{}` multiply defined ({} replaced by {})", name, prev, element);
        }
        previous
    }

    pub fn lookup(&self, name: &str) -> Option<ElementId> {
        self.labels.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.labels.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Labels owned by `element`
    pub fn labels_of(&self, element: ElementId) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .labels
            .iter()
            .filter(|(_, owner)| **owner == element)
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }
}
