//! Import scanning over Java sources.
//!
//! Bytecode misses a handful of compile-time-only references (constants
//! inlined by the compiler, annotations with source retention). Scanning
//! `import` declarations recovers that evidence. Imprecise on purpose: an
//! import of an unused type still counts, which errs toward keeping a
//! dependency rather than removing one that is actually needed.

use crate::class_name::ClassName;
use ignore::WalkBuilder;
use rayon::prelude::*;
use regex::Regex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

pub struct ImportScanner {
    import_re: Regex,
}

impl Default for ImportScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl ImportScanner {
    pub fn new() -> Self {
        Self {
            // group 1: "static", group 2: dotted name, group 3: ".*" wildcard
            import_re: Regex::new(
                r"(?m)^\s*import\s+(static\s+)?([A-Za-z_$][\w$]*(?:\.[A-Za-z_$][\w$]*)*)(\.\*)?\s*;",
            )
            .unwrap(),
        }
    }

    /// Scan every `.java` file under the given roots and collect the imported
    /// type names. Missing roots are skipped; unreadable files are logged and
    /// skipped.
    pub fn scan(&self, source_dirs: &[PathBuf]) -> HashSet<ClassName> {
        let files: Vec<PathBuf> = source_dirs
            .iter()
            .flat_map(|dir| find_java_files(dir))
            .collect();
        debug!("scanning {} source files for imports", files.len());

        files
            .par_iter()
            .map(|path| self.scan_file(path))
            .reduce(HashSet::new, |mut acc, found| {
                acc.extend(found);
                acc
            })
    }

    fn scan_file(&self, path: &Path) -> HashSet<ClassName> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("cannot read {}: {}", path.display(), e);
                return HashSet::new();
            }
        };
        self.scan_source(&contents)
    }

    /// Extract imported type names from one compilation unit.
    pub fn scan_source(&self, source: &str) -> HashSet<ClassName> {
        let mut imports = HashSet::new();

        for capture in self.import_re.captures_iter(source) {
            let is_static = capture.get(1).is_some();
            let is_wildcard = capture.get(3).is_some();
            let name = &capture[2];

            if is_static {
                // `import static com.example.Foo.CONST;` references Foo; a
                // static wildcard already names the owning type.
                if is_wildcard {
                    imports.insert(ClassName::new(name));
                } else if let Some((owner, _member)) = name.rsplit_once('.') {
                    imports.insert(ClassName::new(owner));
                }
            } else if !is_wildcard {
                imports.insert(ClassName::new(name));
            } else {
                // `import com.example.*;` names a package, not a type.
                trace!("skipping wildcard import {name}.*");
            }
        }

        imports
    }
}

fn find_java_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.exists() {
        trace!("source directory does not exist: {}", dir.display());
        return Vec::new();
    }

    WalkBuilder::new(dir)
        .hidden(true)
        .git_ignore(true)
        .follow_links(false)
        .build()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter(|entry| entry.path().extension().and_then(|e| e.to_str()) == Some("java"))
        .map(|entry| entry.into_path())
        .collect()
}
