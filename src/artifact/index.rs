//! Per-artifact class enumeration and byte sizes.

use super::Dependency;
use crate::class_name::ClassName;
use rayon::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Classes contained in one artifact plus its size on disk.
#[derive(Debug, Clone, Default)]
pub struct ArtifactInfo {
    pub classes: BTreeSet<ClassName>,
    pub size_bytes: u64,
}

/// Index of every known dependency's contained classes.
///
/// A missing or unreadable artifact is never an error: it contributes an
/// empty class set and size 0, so dependencies that failed to resolve stay
/// zero-weight instead of aborting the run.
#[derive(Debug, Default)]
pub struct ArtifactIndex {
    entries: HashMap<Dependency, ArtifactInfo>,
}

impl ArtifactIndex {
    /// Index all given dependencies. Per-artifact enumeration is independent,
    /// so artifacts are processed in parallel.
    pub fn build<'a>(dependencies: impl IntoIterator<Item = &'a Dependency>) -> Self {
        let dependencies: Vec<&Dependency> = dependencies.into_iter().collect();
        let entries = dependencies
            .par_iter()
            .map(|dep| ((*dep).clone(), index_dependency(dep)))
            .collect();
        Self { entries }
    }

    pub fn info(&self, dependency: &Dependency) -> Option<&ArtifactInfo> {
        self.entries.get(dependency)
    }

    /// Classes contained in the dependency's artifact; empty for unknown or
    /// unresolvable dependencies.
    pub fn classes_of(&self, dependency: &Dependency) -> BTreeSet<ClassName> {
        self.entries
            .get(dependency)
            .map(|info| info.classes.clone())
            .unwrap_or_default()
    }

    pub fn size_of(&self, dependency: &Dependency) -> u64 {
        self.entries
            .get(dependency)
            .map_or(0, |info| info.size_bytes)
    }
}

fn index_dependency(dependency: &Dependency) -> ArtifactInfo {
    let Some(path) = &dependency.file else {
        debug!("{} has no resolved artifact", dependency);
        return ArtifactInfo::default();
    };

    if path.is_dir() {
        index_class_dir(path)
    } else if path.is_file() {
        index_jar(path)
    } else {
        debug!("artifact for {} not found: {}", dependency, path.display());
        ArtifactInfo::default()
    }
}

fn index_jar(path: &Path) -> ArtifactInfo {
    let size_bytes = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);

    let file = match std::fs::File::open(path) {
        Ok(file) => file,
        Err(e) => {
            warn!("cannot open {}: {}", path.display(), e);
            return ArtifactInfo::default();
        }
    };
    let mut archive = match zip::ZipArchive::new(file) {
        Ok(archive) => archive,
        Err(e) => {
            warn!("cannot read archive {}: {}", path.display(), e);
            return ArtifactInfo {
                classes: BTreeSet::new(),
                size_bytes,
            };
        }
    };

    let mut classes = BTreeSet::new();
    for i in 0..archive.len() {
        let entry = match archive.by_index(i) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("bad entry in {}: {}", path.display(), e);
                continue;
            }
        };
        if !entry.is_file() {
            continue;
        }
        let name = entry.name();
        if !name.ends_with(".class") || name.starts_with("META-INF/") {
            continue;
        }
        if is_synthetic_module_class(name) {
            continue;
        }
        classes.insert(ClassName::new(name));
    }

    ArtifactInfo {
        classes,
        size_bytes,
    }
}

fn index_class_dir(dir: &Path) -> ArtifactInfo {
    let mut classes = BTreeSet::new();
    let mut size_bytes = 0;

    for entry in WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_map(Result::ok)
    {
        if !entry.file_type().is_file() {
            continue;
        }
        size_bytes += entry.metadata().map(|m| m.len()).unwrap_or(0);

        if entry.path().extension() != Some(OsStr::new("class")) {
            continue;
        }
        let relative = entry.path().strip_prefix(dir).unwrap_or(entry.path());
        let name = relative.to_string_lossy();
        if is_synthetic_module_class(&name) {
            continue;
        }
        classes.insert(ClassName::new(name.as_ref()));
    }

    ArtifactInfo {
        classes,
        size_bytes,
    }
}

/// `module-info` and `package-info` are compiler artifacts, not usable types.
fn is_synthetic_module_class(entry_name: &str) -> bool {
    let stem = entry_name
        .trim_end_matches(".class")
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or("");
    stem == "module-info" || stem == "package-info"
}
