//! End-to-end analysis pipeline: extract references from compiled classes,
//! build the reference graph, index artifacts, classify dependencies.

use crate::artifact::{ArtifactIndex, Dependency};
use crate::class_name::ClassName;
use crate::classfile::{extract, ExtractedClass, ExtractionStats};
use crate::classify::{DebloatResult, DependencyClassifier};
use crate::config::Config;
use crate::depgraph::DependencyGraph;
use crate::graph::ReferenceGraph;
use crate::imports::ImportScanner;
use crate::usage::UsageContext;
use miette::Result;
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Per-dependency figures for reporting.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DependencyDetail {
    pub size_bytes: u64,
    pub total_classes: usize,
    pub used_classes: BTreeSet<ClassName>,
}

impl DependencyDetail {
    /// Fraction of the dependency's classes the project actually touches.
    /// `None` for artifacts with no classes at all.
    pub fn usage_ratio(&self) -> Option<f64> {
        if self.total_classes == 0 {
            None
        } else {
            Some(self.used_classes.len() as f64 / self.total_classes as f64)
        }
    }
}

/// Everything a reporter needs from one analysis run.
#[derive(Debug)]
pub struct AnalysisReport {
    pub result: DebloatResult,
    pub details: BTreeMap<Dependency, DependencyDetail>,
    pub stats: ExtractionStats,
    pub project_class_count: usize,
    pub reference_count: usize,
}

impl AnalysisReport {
    pub fn detail(&self, dependency: &Dependency) -> Option<&DependencyDetail> {
        self.details.get(dependency)
    }

    /// Bytes held by unused dependencies, the figure a debloat would reclaim.
    pub fn potential_savings(&self) -> u64 {
        self.result
            .all_unused()
            .iter()
            .filter_map(|dep| self.details.get(dep))
            .map(|detail| detail.size_bytes)
            .sum()
    }
}

/// One analysis run over a project. Owns all intermediate state; two
/// analyzers never share a graph.
pub struct DebloatAnalyzer {
    config: Config,
    class_dirs: Vec<PathBuf>,
    test_class_dirs: Vec<PathBuf>,
    source_dirs: Vec<PathBuf>,
}

impl DebloatAnalyzer {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            class_dirs: Vec::new(),
            test_class_dirs: Vec::new(),
            source_dirs: Vec::new(),
        }
    }

    /// Directories holding the project's compiled classes.
    pub fn with_class_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.class_dirs = dirs;
        self
    }

    /// Directories holding compiled test classes; skipped when the
    /// configuration ignores tests.
    pub fn with_test_class_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.test_class_dirs = dirs;
        self
    }

    /// Java source roots scanned for import declarations.
    pub fn with_source_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.source_dirs = dirs;
        self
    }

    pub fn analyze(&self, graph: &dyn DependencyGraph) -> Result<AnalysisReport> {
        let mut stats = ExtractionStats::default();
        let mut references = ReferenceGraph::new();

        let mut scan_dirs: Vec<&Path> = self.class_dirs.iter().map(PathBuf::as_path).collect();
        if self.config.ignore_tests {
            debug!("test classes excluded from reachability seeds");
        } else {
            scan_dirs.extend(self.test_class_dirs.iter().map(PathBuf::as_path));
        }

        let mut any_dir_found = false;
        for dir in &scan_dirs {
            if !dir.exists() {
                warn!("class directory not found: {}", dir.display());
                continue;
            }
            any_dir_found = true;
            self.extract_dir(dir, &mut references, &mut stats);
        }
        if !any_dir_found {
            stats = ExtractionStats::not_found();
        }

        info!(
            "reference graph: {} classes, {} references",
            references.class_count(),
            references.reference_count()
        );

        let closure = references.reachable_from(references.project_classes());

        let mut used_classes: HashSet<ClassName> = closure;
        if !self.source_dirs.is_empty() {
            let imports = ImportScanner::new().scan(&self.source_dirs);
            debug!("{} types referenced through imports", imports.len());
            used_classes.extend(imports);
        }
        used_classes.extend(
            self.config
                .extra_used_classes
                .iter()
                .map(|name| ClassName::new(name)),
        );

        let all_deps = graph.all();
        let artifacts = ArtifactIndex::build(all_deps.iter());
        let ignored_scopes: HashSet<String> = self.config.ignored_scopes.iter().cloned().collect();
        let usage = UsageContext::build(graph, &artifacts, &ignored_scopes);

        let result = DependencyClassifier::new(graph, &usage)
            .with_ignored_dependencies(self.config.ignored_dependencies.clone())
            .with_ignored_scopes(ignored_scopes)
            .classify(&used_classes);

        let mut details = BTreeMap::new();
        for dependency in result.all_used().iter().chain(result.all_unused().iter()) {
            let classes = usage.classes_of(dependency);
            let used: BTreeSet<ClassName> = classes
                .iter()
                .filter(|class| used_classes.contains(*class))
                .cloned()
                .collect();
            details.insert(
                dependency.clone(),
                DependencyDetail {
                    size_bytes: artifacts.size_of(dependency),
                    total_classes: classes.len(),
                    used_classes: used,
                },
            );
        }

        Ok(AnalysisReport {
            result,
            details,
            stats,
            project_class_count: references.project_classes().len(),
            reference_count: references.reference_count(),
        })
    }

    /// Extract references from every class file under one directory. Files
    /// are parsed in parallel; the graph is populated afterwards from the
    /// isolated per-file results.
    fn extract_dir(
        &self,
        dir: &Path,
        references: &mut ReferenceGraph,
        stats: &mut ExtractionStats,
    ) {
        let files: Vec<PathBuf> = WalkDir::new(dir)
            .follow_links(false)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| entry.path().extension() == Some(OsStr::new("class")))
            .map(|entry| entry.into_path())
            .collect();
        debug!("extracting {} class files from {}", files.len(), dir.display());

        let extracted: Vec<(ExtractedClass, ExtractionStats)> = files
            .par_iter()
            .filter_map(|path| {
                let bytes = match std::fs::read(path) {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        warn!("cannot read {}: {}", path.display(), e);
                        return None;
                    }
                };
                let mut file_stats = ExtractionStats::default();
                match extract::extract_references(&bytes, &mut file_stats) {
                    Ok(class) => Some((class, file_stats)),
                    Err(e) => {
                        // a corrupt class file invalidates itself, not the run
                        warn!("skipping {}: {}", path.display(), e);
                        None
                    }
                }
            })
            .collect();

        for (class, file_stats) in extracted {
            stats.merge(&file_stats);
            references.add_edges(class.name, class.references);
        }
    }
}
