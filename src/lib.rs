//! # Docref - Deferred cross-reference resolution for compiled documents
//!
//! Resolves references that may point forward or backward in a document
//! source once the whole source has been consumed.
//!
//! Docref provides:
//! - Label, bibliography and citation registries filled while the tree is built
//! - A FIFO queue of deferred resolution tasks drained exactly once
//! - A dependency graph over theorem-like elements ("uses", "proves", "covers")
//! - Coverage reports aggregated per section from the finished graph

pub mod element;
pub mod tree;
pub mod labels;
pub mod bibliography;
pub mod queue;
pub mod depgraph;
pub mod resolver;
pub mod context;
pub mod coverage;
pub mod source;
pub mod config;
pub mod ui;

// Re-exports for convenient access
pub use element::{Element, ElementId};
pub use tree::DocumentTree;
pub use labels::LabelRegistry;
pub use bibliography::{BibItem, BibListId, Bibliography, Citation, CitationTable};
pub use queue::{ResolutionQueue, ResolutionTask};
pub use depgraph::{DependencyGraph, DependencyNode, DepEdge};
pub use context::{DocumentContext, ResolvedDocument};
pub use coverage::{CoverageEntry, CoverageStatus, PartialReport, Report};

/// Result type alias for Docref operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Docref operations
///
/// Resolution itself never fails; these cover the host-facing edges
/// (configuration, document sources, report parsing).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Source error: {0}")]
    Source(String),

    #[error("Unknown coverage status: {0}")]
    UnknownStatus(String),
}
