//! Bidirectional dependency-to-class ownership index.

use crate::artifact::{ArtifactIndex, Dependency};
use crate::class_name::ClassName;
use crate::depgraph::DependencyGraph;
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::debug;

/// Which dependency owns which classes, and the exact inverse.
///
/// A class bundled into several artifacts (shaded or duplicated jars) maps to
/// every owning dependency. Scope filtering happens once, at construction;
/// every later query is a pure lookup.
#[derive(Debug, Default)]
pub struct UsageContext {
    classes_by_dependency: HashMap<Dependency, BTreeSet<ClassName>>,
    dependencies_by_class: HashMap<ClassName, BTreeSet<Dependency>>,
}

impl UsageContext {
    /// Build the index from every dependency subset, skipping dependencies
    /// whose scope case-insensitively matches an ignored scope.
    pub fn build(
        graph: &dyn DependencyGraph,
        artifacts: &ArtifactIndex,
        ignored_scopes: &HashSet<String>,
    ) -> Self {
        let mut context = Self::default();

        let subsets = [
            graph.direct(),
            graph.inherited_direct(),
            graph.inherited_transitive(),
            graph.transitive(),
        ];
        for subset in subsets {
            for dependency in subset {
                if is_ignored_scope(&dependency.scope, ignored_scopes) {
                    debug!("skipping {} (scope {})", dependency, dependency.scope);
                    continue;
                }
                context.insert(dependency, artifacts.classes_of(dependency));
            }
        }

        context
    }

    fn insert(&mut self, dependency: &Dependency, classes: BTreeSet<ClassName>) {
        for class in &classes {
            self.dependencies_by_class
                .entry(class.clone())
                .or_default()
                .insert(dependency.clone());
        }
        self.classes_by_dependency
            .entry(dependency.clone())
            .or_default()
            .extend(classes);
    }

    /// Classes contained in a dependency; empty for unknown dependencies.
    pub fn classes_of(&self, dependency: &Dependency) -> BTreeSet<ClassName> {
        self.classes_by_dependency
            .get(dependency)
            .cloned()
            .unwrap_or_default()
    }

    /// Dependencies that contain a class; empty for unknown classes.
    pub fn dependencies_of(&self, class: &ClassName) -> BTreeSet<Dependency> {
        self.dependencies_by_class
            .get(class)
            .cloned()
            .unwrap_or_default()
    }

    /// True when no known dependency contains the class.
    pub fn has_no_owner(&self, class: &ClassName) -> bool {
        !self.dependencies_by_class.contains_key(class)
    }

    pub fn dependency_count(&self) -> usize {
        self.classes_by_dependency.len()
    }
}

fn is_ignored_scope(scope: &str, ignored: &HashSet<String>) -> bool {
    ignored.iter().any(|s| s.eq_ignore_ascii_case(scope))
}
