//! Partitioning dependencies into usage/origin buckets.

use crate::artifact::{Coordinate, Dependency};
use crate::class_name::ClassName;
use crate::depgraph::DependencyGraph;
use crate::usage::UsageContext;
use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};
use tracing::debug;

/// The classification outcome: six disjoint buckets that together cover every
/// known dependency, plus the companion sets needed to keep a debloated
/// manifest correct.
#[derive(Debug, Clone)]
pub struct DebloatResult {
    pub project: Coordinate,
    pub used_direct: BTreeSet<Dependency>,
    pub used_transitive: BTreeSet<Dependency>,
    pub used_inherited: BTreeSet<Dependency>,
    pub unused_direct: BTreeSet<Dependency>,
    pub unused_transitive: BTreeSet<Dependency>,
    pub unused_inherited: BTreeSet<Dependency>,
    /// For each used dependency: used-transitive dependencies it pulls in
    /// that are not independently declared. Removing the unused dependencies
    /// around them requires promoting these to direct declarations.
    pub needed_transitively: BTreeMap<Dependency, BTreeSet<Dependency>>,
}

impl DebloatResult {
    pub fn all_used(&self) -> BTreeSet<Dependency> {
        let mut used = self.used_direct.clone();
        used.extend(self.used_transitive.iter().cloned());
        used.extend(self.used_inherited.iter().cloned());
        used
    }

    pub fn all_unused(&self) -> BTreeSet<Dependency> {
        let mut unused = self.unused_direct.clone();
        unused.extend(self.unused_transitive.iter().cloned());
        unused.extend(self.unused_inherited.iter().cloned());
        unused
    }

    pub fn has_unused(&self) -> bool {
        !self.unused_direct.is_empty()
            || !self.unused_transitive.is_empty()
            || !self.unused_inherited.is_empty()
    }

    /// The minimal direct-dependency set for a debloated manifest: every used
    /// direct dependency plus the promoted companions.
    pub fn debloated_direct_set(&self) -> BTreeSet<Dependency> {
        let mut set = self.used_direct.clone();
        for companions in self.needed_transitively.values() {
            set.extend(companions.iter().cloned());
        }
        set
    }
}

/// Classifier over already-built indices. Pure computation: no I/O, no
/// failure path; a dependency with no resolvable classes is simply unused.
pub struct DependencyClassifier<'a> {
    graph: &'a dyn DependencyGraph,
    usage: &'a UsageContext,
    /// Substring filters over `group:artifact:version`; matches are treated
    /// as used-direct regardless of evidence.
    ignored_dependencies: Vec<String>,
    /// Scopes left out of the report entirely, matching the usage index.
    ignored_scopes: HashSet<String>,
}

impl<'a> DependencyClassifier<'a> {
    pub fn new(graph: &'a dyn DependencyGraph, usage: &'a UsageContext) -> Self {
        Self {
            graph,
            usage,
            ignored_dependencies: Vec::new(),
            ignored_scopes: HashSet::new(),
        }
    }

    pub fn with_ignored_dependencies(mut self, filters: Vec<String>) -> Self {
        self.ignored_dependencies = filters;
        self
    }

    pub fn with_ignored_scopes(mut self, scopes: HashSet<String>) -> Self {
        self.ignored_scopes = scopes;
        self
    }

    /// Partition all dependencies given the set of used classes (reachability
    /// closure plus any extra evidence the caller unioned in).
    pub fn classify(&self, used_classes: &HashSet<ClassName>) -> DebloatResult {
        // A class owned by several artifacts marks every owner used.
        let mut used_dependencies: HashSet<Dependency> = HashSet::new();
        for class in used_classes {
            used_dependencies.extend(self.usage.dependencies_of(class));
        }
        debug!(
            "{} used classes resolve to {} used dependencies",
            used_classes.len(),
            used_dependencies.len()
        );

        let (used_direct, unused_direct) =
            self.partition(self.graph.direct(), &used_dependencies);
        let (used_transitive, unused_transitive) =
            self.partition(self.graph.transitive(), &used_dependencies);

        // Inherited-direct and inherited-transitive fold into one bucket.
        let (mut used_inherited, mut unused_inherited) =
            self.partition(self.graph.inherited_direct(), &used_dependencies);
        let (used_it, unused_it) =
            self.partition(self.graph.inherited_transitive(), &used_dependencies);
        used_inherited.extend(used_it);
        unused_inherited.extend(unused_it);

        let mut result = DebloatResult {
            project: self.graph.project().clone(),
            used_direct,
            used_transitive,
            used_inherited,
            unused_direct,
            unused_transitive,
            unused_inherited,
            needed_transitively: BTreeMap::new(),
        };

        self.apply_ignore_filters(&mut result);
        self.compute_companions(&mut result);

        result
    }

    /// Ignoring a dependency is a guarantee that it is used: matches move to
    /// used-direct no matter where the evidence put them.
    fn apply_ignore_filters(&self, result: &mut DebloatResult) {
        if self.ignored_dependencies.is_empty() {
            return;
        }

        let matches: Vec<Dependency> = self
            .graph
            .all()
            .into_iter()
            .filter(|dep| {
                !self
                    .ignored_scopes
                    .iter()
                    .any(|scope| scope.eq_ignore_ascii_case(&dep.scope))
            })
            .filter(|dep| {
                let coordinate = dep.coordinate.to_string();
                self.ignored_dependencies
                    .iter()
                    .any(|filter| coordinate.contains(filter.as_str()))
            })
            .collect();

        for dependency in matches {
            debug!("force-classifying {} as used (ignore filter)", dependency);
            result.used_transitive.remove(&dependency);
            result.used_inherited.remove(&dependency);
            result.unused_direct.remove(&dependency);
            result.unused_transitive.remove(&dependency);
            result.unused_inherited.remove(&dependency);
            result.used_direct.insert(dependency);
        }
    }

    /// For every used dependency, walk the resolved tree below it and collect
    /// the used-transitive dependencies that are not independently declared.
    fn compute_companions(&self, result: &mut DebloatResult) {
        let declared_direct = self.graph.direct();

        for dependency in result.all_used() {
            let mut companions = BTreeSet::new();
            let mut queue: VecDeque<Dependency> =
                self.graph.children_of(&dependency).into_iter().collect();
            let mut seen: HashSet<Dependency> = queue.iter().cloned().collect();

            while let Some(child) = queue.pop_front() {
                if result.used_transitive.contains(&child) && !declared_direct.contains(&child) {
                    companions.insert(child.clone());
                }
                for grandchild in self.graph.children_of(&child) {
                    if seen.insert(grandchild.clone()) {
                        queue.push_back(grandchild);
                    }
                }
            }

            result.needed_transitively.insert(dependency, companions);
        }
    }

    /// Split one origin subset into used and unused. Ignored-scope
    /// dependencies land in neither.
    fn partition(
        &self,
        subset: &BTreeSet<Dependency>,
        used: &HashSet<Dependency>,
    ) -> (BTreeSet<Dependency>, BTreeSet<Dependency>) {
        subset
            .iter()
            .filter(|dependency| {
                !self
                    .ignored_scopes
                    .iter()
                    .any(|scope| scope.eq_ignore_ascii_case(&dependency.scope))
            })
            .cloned()
            .partition(|dependency| used.contains(dependency))
    }
}
