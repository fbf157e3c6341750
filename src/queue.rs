//! Deferred Resolution Queue
//!
//! Tasks are appended while the tree is built and handed out exactly once,
//! in enqueue order, when the queue is consumed by the drain step.

use serde::Serialize;
use crate::element::ElementId;

/// A deferred resolution request recorded at its declaration site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ResolutionTask {
    /// `node` depends on each labelled element
    Uses { node: ElementId, labels: Vec<String> },
    /// `node` is a proof of the labelled element
    Proves { node: ElementId, label: String },
    /// `node` addresses each labelled element
    Covers { node: ElementId, labels: Vec<String> },
}

impl ResolutionTask {
    /// Element that declared the task
    pub fn node(&self) -> ElementId {
        match self {
            ResolutionTask::Uses { node, .. }
            | ResolutionTask::Proves { node, .. }
            | ResolutionTask::Covers { node, .. } => *node,
        }
    }

    pub fn kind_str(&self) -> &'static str {
        match self {
            ResolutionTask::Uses { .. } => "uses",
            ResolutionTask::Proves { .. } => "proves",
            ResolutionTask::Covers { .. } => "covers",
        }
    }

    /// Label names referenced by the task
    pub fn labels(&self) -> Vec<&str> {
        match self {
            ResolutionTask::Uses { labels, .. } | ResolutionTask::Covers { labels, .. } => {
                labels.iter().map(String::as_str).collect()
            }
            ResolutionTask::Proves { label, .. } => vec![label.as_str()],
        }
    }
}

/// Append-only FIFO of resolution tasks.
#[derive(Debug, Default)]
pub struct ResolutionQueue {
    tasks: Vec<ResolutionTask>,
}

impl ResolutionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, task: ResolutionTask) {
        self.tasks.push(task);
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Consume the queue, yielding tasks in enqueue order
    pub fn into_tasks(self) -> std::vec::IntoIter<ResolutionTask> {
        self.tasks.into_iter()
    }
}
