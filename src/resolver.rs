//! Drain-phase resolver
//!
//! Interprets queued [`ResolutionTask`]s against the frozen label registry
//! and builds the [`DependencyGraph`]. Missing labels are dropped one at a
//! time; a task never fails.

use std::fmt;

use serde::Serialize;

use crate::depgraph::{DepEdge, DependencyGraph};
use crate::element::ElementId;
use crate::labels::LabelRegistry;
use crate::queue::{ResolutionQueue, ResolutionTask};

#[derive(Debug, Clone, Default, Serialize)]
pub struct ResolverStats {
    /// Tasks executed
    pub tasks: usize,
    /// Label references that resolved
    pub resolved: usize,
    /// Label references with no declaration
    pub missing: usize,
}

impl fmt::Display for ResolverStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Resolver Stats:")?;
        writeln!(f, "  Tasks: {}", self.tasks)?;
        writeln!(f, "  ✅ Resolved: {}", self.resolved)?;
        writeln!(f, "  ❌ Missing: {}", self.missing)
    }
}

pub struct Resolver<'a> {
    labels: &'a LabelRegistry,
    graph: DependencyGraph,
    stats: ResolverStats,
}

impl<'a> Resolver<'a> {
    pub fn new(labels: &'a LabelRegistry) -> Self {
        Self {
            labels,
            graph: DependencyGraph::new(),
            stats: ResolverStats::default(),
        }
    }

    /// Drain the queue in FIFO order and return the finished graph
    pub fn run(mut self, queue: ResolutionQueue) -> (DependencyGraph, ResolverStats) {
        for task in queue.into_tasks() {
            self.apply(task);
        }

        tracing::info!(
            "Resolved {} of {} label references from {} tasks",
            self.stats.resolved,
            self.stats.resolved + self.stats.missing,
            self.stats.tasks
        );
        (self.graph, self.stats)
    }

    fn apply(&mut self, task: ResolutionTask) {
        self.stats.tasks += 1;
        tracing::debug!("Resolving {} task from {}", task.kind_str(), task.node());

        match task {
            ResolutionTask::Uses { node, labels } => {
                let used = self.resolve_all(&labels);
                self.graph.add_member(node);
                for target in used {
                    self.graph.add_member(target);
                    self.graph.add_edge(DepEdge::new(target, node));
                    self.graph.node_mut(node).uses.push(target);
                }
            }
            ResolutionTask::Proves { node, label } => {
                self.graph.node_mut(node);
                if let Some(target) = self.resolve(&label) {
                    self.graph.node_mut(node).proved = Some(target);
                    self.graph.node_mut(target).proved_by = Some(node);
                }
            }
            ResolutionTask::Covers { node, labels } => {
                let covered = self.resolve_all(&labels);
                self.graph.node_mut(node);
                for target in covered {
                    self.graph.node_mut(node).covers.push(target);
                    self.graph.node_mut(target).covered_by.push(node);
                }
            }
        }
    }

    fn resolve(&mut self, label: &str) -> Option<ElementId> {
        match self.labels.lookup(label) {
            Some(target) => {
                self.stats.resolved += 1;
                Some(target)
            }
            None => {
                self.stats.missing += 1;
                tracing::warn!("Reference to undefined label `{}` dropped", label);
                None
            }
        }
    }

    fn resolve_all(&mut self, labels: &[String]) -> Vec<ElementId> {
        labels.iter().filter_map(|label| self.resolve(label)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(entries: &[(&str, u32)]) -> LabelRegistry {
        let mut labels = LabelRegistry::new();
        for (name, id) in entries {
            labels.declare(*name, ElementId(*id));
        }
        labels
    }

    #[test]
    fn test_uses_drops_missing_labels_individually() {
        let labels = registry(&[("a", 1), ("c", 3)]);
        let mut queue = ResolutionQueue::new();
        queue.push(ResolutionTask::Uses {
            node: ElementId(9),
            labels: vec!["a".into(), "b".into(), "c".into()],
        });

        let (graph, stats) = Resolver::new(&labels).run(queue);

        assert_eq!(graph.node(ElementId(9)).unwrap().uses, vec![ElementId(1), ElementId(3)]);
        assert!(graph.has_edge(ElementId(1), ElementId(9)));
        assert!(graph.has_edge(ElementId(3), ElementId(9)));
        assert_eq!(graph.edges().len(), 2);
        assert_eq!(stats.resolved, 2);
        assert_eq!(stats.missing, 1);
    }

    #[test]
    fn test_repeated_uses_keep_duplicates_but_not_edges() {
        let labels = registry(&[("a", 1)]);
        let mut queue = ResolutionQueue::new();
        for _ in 0..2 {
            queue.push(ResolutionTask::Uses { node: ElementId(5), labels: vec!["a".into()] });
        }

        let (graph, _) = Resolver::new(&labels).run(queue);

        assert_eq!(graph.node(ElementId(5)).unwrap().uses, vec![ElementId(1), ElementId(1)]);
        assert_eq!(graph.edges().len(), 1);
    }

    #[test]
    fn test_last_proof_wins() {
        let labels = registry(&[("thm", 1)]);
        let mut queue = ResolutionQueue::new();
        queue.push(ResolutionTask::Proves { node: ElementId(2), label: "thm".into() });
        queue.push(ResolutionTask::Proves { node: ElementId(3), label: "thm".into() });

        let (graph, _) = Resolver::new(&labels).run(queue);

        assert_eq!(graph.proved_by(ElementId(1)), Some(ElementId(3)));
        assert_eq!(graph.node(ElementId(2)).unwrap().proved, Some(ElementId(1)));
        assert_eq!(graph.node(ElementId(3)).unwrap().proved, Some(ElementId(1)));
    }

    #[test]
    fn test_proves_missing_label_is_noop() {
        let labels = registry(&[]);
        let mut queue = ResolutionQueue::new();
        queue.push(ResolutionTask::Proves { node: ElementId(2), label: "ghost".into() });

        let (graph, stats) = Resolver::new(&labels).run(queue);

        assert!(graph.node(ElementId(2)).unwrap().proved.is_none());
        assert!(graph.edges().is_empty());
        assert_eq!(stats.missing, 1);
    }

    #[test]
    fn test_covered_by_accumulates_in_execution_order() {
        let labels = registry(&[("t", 1), ("u", 2)]);
        let mut queue = ResolutionQueue::new();
        queue.push(ResolutionTask::Covers { node: ElementId(7), labels: vec!["t".into(), "u".into()] });
        queue.push(ResolutionTask::Covers { node: ElementId(8), labels: vec!["t".into(), "nope".into()] });

        let (graph, _) = Resolver::new(&labels).run(queue);

        assert_eq!(graph.covered_by(ElementId(1)), &[ElementId(7), ElementId(8)]);
        assert_eq!(graph.covered_by(ElementId(2)), &[ElementId(7)]);
        assert_eq!(graph.node(ElementId(8)).unwrap().covers, vec![ElementId(1)]);
        assert!(graph.edges().is_empty());
    }

    #[test]
    fn test_only_uses_adds_graph_members() {
        let labels = registry(&[("t", 1), ("l", 4)]);
        let mut queue = ResolutionQueue::new();
        queue.push(ResolutionTask::Proves { node: ElementId(2), label: "t".into() });
        queue.push(ResolutionTask::Covers { node: ElementId(3), labels: vec!["t".into()] });

        let (graph, _) = Resolver::new(&labels).run(queue);
        assert_eq!(graph.stats().nodes, 0);
        assert!(!graph.contains(ElementId(2)));
        assert_eq!(graph.proved_by(ElementId(1)), Some(ElementId(2)));

        let mut queue = ResolutionQueue::new();
        queue.push(ResolutionTask::Uses { node: ElementId(2), labels: vec!["l".into()] });
        let (graph, _) = Resolver::new(&labels).run(queue);
        let members: Vec<_> = graph.nodes().map(|n| n.element).collect();
        assert_eq!(members, vec![ElementId(2), ElementId(4)]);
    }
}
