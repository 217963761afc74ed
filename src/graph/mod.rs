//! The global reference graph: classes as vertices, symbolic references as
//! directed edges. Populated from extracted class files, queried for the
//! reachability closure, then discarded with its owning analyzer. The graph
//! is never shared between runs; `clear` exists for callers that reuse one.

use crate::class_name::ClassName;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Default)]
pub struct ReferenceGraph {
    inner: DiGraph<ClassName, ()>,
    node_map: HashMap<ClassName, NodeIndex>,
    /// Classes the project itself compiled; these are the DFS roots.
    project_classes: HashSet<ClassName>,
}

impl ReferenceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one class and its outgoing references. Vertices are created on
    /// first sight; the source is recorded as a project class, since edges are
    /// only ever emitted for classes the extractor visited in the project's
    /// own output directories.
    pub fn add_edges(&mut self, class: ClassName, referenced: impl IntoIterator<Item = ClassName>) {
        let from = self.intern(class.clone());
        self.project_classes.insert(class);
        for target in referenced {
            let to = self.intern(target);
            self.inner.add_edge(from, to, ());
        }
    }

    fn intern(&mut self, class: ClassName) -> NodeIndex {
        match self.node_map.get(&class) {
            Some(&index) => index,
            None => {
                let index = self.inner.add_node(class.clone());
                self.node_map.insert(class, index);
                index
            }
        }
    }

    /// All classes reachable from the given seeds, the seeds included when
    /// they are known vertices. Cycles terminate through DFS visited-marking.
    pub fn reachable_from<'a>(
        &self,
        seeds: impl IntoIterator<Item = &'a ClassName>,
    ) -> HashSet<ClassName> {
        let mut reachable = HashSet::new();
        for seed in seeds {
            let Some(&start) = self.node_map.get(seed) else {
                continue;
            };
            let mut dfs = Dfs::new(&self.inner, start);
            while let Some(index) = dfs.next(&self.inner) {
                reachable.insert(self.inner[index].clone());
            }
        }
        reachable
    }

    pub fn project_classes(&self) -> &HashSet<ClassName> {
        &self.project_classes
    }

    pub fn contains(&self, class: &ClassName) -> bool {
        self.node_map.contains_key(class)
    }

    pub fn class_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn reference_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Drop all vertices, edges and project roots. Required between analysis
    /// runs that reuse the same graph value; leaked state across runs is a
    /// defect.
    pub fn clear(&mut self) {
        self.inner.clear();
        self.node_map.clear();
        self.project_classes.clear();
    }
}
