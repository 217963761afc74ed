//! Abstraction over the host build tool's resolution result.
//!
//! The core never talks to a build tool. It consumes a [`DependencyGraph`]:
//! the project's coordinate, the four origin subsets, and parent-to-children
//! adjacency. `ResolvedGraph` is the in-memory variant; [`file`] loads one
//! from a resolution file emitted by a build-tool plugin.

pub mod file;

use crate::artifact::{Coordinate, Dependency};
use std::collections::{BTreeSet, HashMap};

/// Resolution result supplied by a build-tool adapter.
///
/// Invariant: `all()` is the disjoint union of the four origin subsets.
pub trait DependencyGraph {
    /// The project's own coordinate.
    fn project(&self) -> &Coordinate;

    /// Dependencies declared directly by the project.
    fn direct(&self) -> &BTreeSet<Dependency>;

    /// Dependencies declared directly by a parent/ancestor build definition.
    fn inherited_direct(&self) -> &BTreeSet<Dependency>;

    /// Transitive dependencies pulled in through inherited declarations.
    fn inherited_transitive(&self) -> &BTreeSet<Dependency>;

    /// Dependencies pulled in indirectly by the project's own declarations.
    fn transitive(&self) -> &BTreeSet<Dependency>;

    /// Every known dependency.
    fn all(&self) -> BTreeSet<Dependency> {
        let mut all = self.direct().clone();
        all.extend(self.inherited_direct().iter().cloned());
        all.extend(self.inherited_transitive().iter().cloned());
        all.extend(self.transitive().iter().cloned());
        all
    }

    /// Children of a dependency in the resolved tree; empty for leaves and
    /// unknown dependencies.
    fn children_of(&self, dependency: &Dependency) -> BTreeSet<Dependency>;
}

/// In-memory dependency graph, the variant every adapter produces.
#[derive(Debug)]
pub struct ResolvedGraph {
    project: Coordinate,
    direct: BTreeSet<Dependency>,
    inherited_direct: BTreeSet<Dependency>,
    inherited_transitive: BTreeSet<Dependency>,
    transitive: BTreeSet<Dependency>,
    children: HashMap<Coordinate, BTreeSet<Coordinate>>,
    by_coordinate: HashMap<Coordinate, Dependency>,
}

impl ResolvedGraph {
    pub fn builder(project: Coordinate) -> ResolvedGraphBuilder {
        ResolvedGraphBuilder {
            graph: Self {
                project,
                direct: BTreeSet::new(),
                inherited_direct: BTreeSet::new(),
                inherited_transitive: BTreeSet::new(),
                transitive: BTreeSet::new(),
                children: HashMap::new(),
                by_coordinate: HashMap::new(),
            },
        }
    }
}

impl DependencyGraph for ResolvedGraph {
    fn project(&self) -> &Coordinate {
        &self.project
    }

    fn direct(&self) -> &BTreeSet<Dependency> {
        &self.direct
    }

    fn inherited_direct(&self) -> &BTreeSet<Dependency> {
        &self.inherited_direct
    }

    fn inherited_transitive(&self) -> &BTreeSet<Dependency> {
        &self.inherited_transitive
    }

    fn transitive(&self) -> &BTreeSet<Dependency> {
        &self.transitive
    }

    fn children_of(&self, dependency: &Dependency) -> BTreeSet<Dependency> {
        self.children
            .get(&dependency.coordinate)
            .map(|coords| {
                coords
                    .iter()
                    .filter_map(|coord| self.by_coordinate.get(coord).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }
}

pub struct ResolvedGraphBuilder {
    graph: ResolvedGraph,
}

impl ResolvedGraphBuilder {
    pub fn direct(mut self, dependency: Dependency) -> Self {
        self.register(&dependency);
        self.graph.direct.insert(dependency);
        self
    }

    pub fn inherited_direct(mut self, dependency: Dependency) -> Self {
        self.register(&dependency);
        self.graph.inherited_direct.insert(dependency);
        self
    }

    pub fn inherited_transitive(mut self, dependency: Dependency) -> Self {
        self.register(&dependency);
        self.graph.inherited_transitive.insert(dependency);
        self
    }

    pub fn transitive(mut self, dependency: Dependency) -> Self {
        self.register(&dependency);
        self.graph.transitive.insert(dependency);
        self
    }

    /// Record a parent-to-child edge in the resolved tree.
    pub fn edge(mut self, parent: &Coordinate, child: &Coordinate) -> Self {
        self.graph
            .children
            .entry(parent.clone())
            .or_default()
            .insert(child.clone());
        self
    }

    pub fn build(self) -> ResolvedGraph {
        self.graph
    }

    fn register(&mut self, dependency: &Dependency) {
        self.graph
            .by_coordinate
            .insert(dependency.coordinate.clone(), dependency.clone());
    }
}
