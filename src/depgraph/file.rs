//! Resolution-file adapter.
//!
//! Build-tool plugins hand the core a small JSON or YAML file describing the
//! already-resolved dependency graph; nothing here invokes a build tool.

use super::{ResolvedGraph, ResolvedGraphBuilder};
use crate::artifact::{Coordinate, Dependency};
use miette::{miette, IntoDiagnostic, Result, WrapErr};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct ResolutionFile {
    /// Project coordinate, `group:artifact:version`.
    project: String,
    #[serde(default)]
    dependencies: Vec<ResolutionEntry>,
}

#[derive(Debug, Deserialize)]
struct ResolutionEntry {
    coordinate: String,
    #[serde(default = "default_scope")]
    scope: String,
    origin: Origin,
    #[serde(default)]
    file: Option<PathBuf>,
    /// Child coordinates in the resolved tree.
    #[serde(default)]
    children: Vec<String>,
}

fn default_scope() -> String {
    "compile".to_string()
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum Origin {
    Direct,
    Inherited,
    InheritedTransitive,
    Transitive,
}

/// Load a resolution file (JSON or YAML, by extension with YAML fallback).
pub fn load(path: &Path) -> Result<ResolvedGraph> {
    let contents = std::fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read resolution file: {}", path.display()))?;

    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let parsed: ResolutionFile = match extension {
        "json" => serde_json::from_str(&contents)
            .into_diagnostic()
            .wrap_err("Failed to parse JSON resolution file")?,
        "yml" | "yaml" => serde_yaml::from_str(&contents)
            .into_diagnostic()
            .wrap_err("Failed to parse YAML resolution file")?,
        _ => {
            if let Ok(parsed) = serde_json::from_str(&contents) {
                parsed
            } else {
                serde_yaml::from_str(&contents)
                    .into_diagnostic()
                    .wrap_err("Failed to parse resolution file")?
            }
        }
    };

    build_graph(parsed)
}

fn build_graph(file: ResolutionFile) -> Result<ResolvedGraph> {
    let project = parse_coordinate(&file.project)?;
    let mut builder = ResolvedGraph::builder(project);

    for entry in &file.dependencies {
        let coordinate = parse_coordinate(&entry.coordinate)?;
        let mut dependency = Dependency::new(coordinate.clone(), entry.scope.clone());
        if let Some(file) = &entry.file {
            dependency = dependency.with_file(file);
        }

        builder = match entry.origin {
            Origin::Direct => builder.direct(dependency),
            Origin::Inherited => builder.inherited_direct(dependency),
            Origin::InheritedTransitive => builder.inherited_transitive(dependency),
            Origin::Transitive => builder.transitive(dependency),
        };

        builder = add_children(builder, &coordinate, &entry.children)?;
    }

    Ok(builder.build())
}

fn add_children(
    mut builder: ResolvedGraphBuilder,
    parent: &Coordinate,
    children: &[String],
) -> Result<ResolvedGraphBuilder> {
    for child in children {
        let child = parse_coordinate(child)?;
        builder = builder.edge(parent, &child);
    }
    Ok(builder)
}

fn parse_coordinate(text: &str) -> Result<Coordinate> {
    Coordinate::parse(text)
        .ok_or_else(|| miette!("invalid coordinate '{text}', expected group:artifact:version"))
}
