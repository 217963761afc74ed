//! jardiet - Bytecode-level detection of bloated (unused) JVM dependencies
//!
//! This library classifies every dependency of a JVM project as used or
//! unused by looking at compiled bytecode rather than source code.
//!
//! # Architecture
//!
//! The analysis pipeline consists of:
//! 1. **Reference Extraction** - Parse the project's .class files and collect
//!    every symbolically referenced type
//! 2. **Graph Building** - Build a directed reference graph over classes
//! 3. **Reachability** - Compute the closure of types reachable from the
//!    project's own classes
//! 4. **Artifact Indexing** - Enumerate the classes each dependency ships
//! 5. **Classification** - Partition dependencies into used/unused by
//!    direct/transitive/inherited origin
//! 6. **Reporting** - Output results in various formats

pub mod analyzer;
pub mod artifact;
pub mod class_name;
pub mod classfile;
pub mod classify;
pub mod config;
pub mod depgraph;
pub mod graph;
pub mod imports;
pub mod report;
pub mod usage;

pub use analyzer::{AnalysisReport, DebloatAnalyzer, DependencyDetail};
pub use artifact::{ArtifactIndex, Coordinate, Dependency};
pub use class_name::ClassName;
pub use classfile::{ExtractionStats, COUNTER_NOT_FOUND};
pub use classify::{DebloatResult, DependencyClassifier};
pub use config::Config;
pub use depgraph::{DependencyGraph, ResolvedGraph};
pub use graph::ReferenceGraph;
pub use report::{ReportFormat, Reporter};
pub use usage::UsageContext;
