use crate::analyzer::AnalysisReport;
use crate::artifact::Dependency;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// JSON reporter for programmatic output
pub struct JsonReporter {
    output_path: Option<PathBuf>,
}

impl JsonReporter {
    pub fn new(output_path: Option<PathBuf>) -> Self {
        Self { output_path }
    }

    pub fn report(&self, analysis: &AnalysisReport) -> Result<()> {
        let report = JsonReport::from_analysis(analysis);
        let json = serde_json::to_string_pretty(&report).into_diagnostic()?;

        if let Some(path) = &self.output_path {
            std::fs::write(path, &json).into_diagnostic()?;
            println!("Report written to: {}", path.display());
        } else {
            println!("{}", json);
        }

        Ok(())
    }
}

#[derive(Serialize)]
struct JsonReport {
    version: &'static str,
    project: String,
    used_direct: Vec<JsonDependency>,
    used_transitive: Vec<JsonDependency>,
    used_inherited: Vec<JsonDependency>,
    unused_direct: Vec<JsonDependency>,
    unused_transitive: Vec<JsonDependency>,
    unused_inherited: Vec<JsonDependency>,
    summary: JsonSummary,
}

#[derive(Serialize)]
struct JsonDependency {
    coordinate: String,
    scope: String,
    size_bytes: u64,
    total_classes: usize,
    used_classes: Vec<String>,
    /// Transitive dependencies to promote when this one's unused siblings go.
    needed_transitively: Vec<String>,
}

#[derive(Serialize)]
struct JsonSummary {
    used: usize,
    unused: usize,
    potential_savings_bytes: u64,
    class_visits: i64,
    field_visits: i64,
    method_visits: i64,
    annotation_visits: i64,
}

impl JsonReport {
    fn from_analysis(analysis: &AnalysisReport) -> Self {
        let result = &analysis.result;
        let bucket = |deps: &BTreeSet<Dependency>| -> Vec<JsonDependency> {
            deps.iter()
                .map(|dep| JsonDependency::from_dependency(dep, analysis))
                .collect()
        };

        Self {
            version: "1.0",
            project: result.project.to_string(),
            used_direct: bucket(&result.used_direct),
            used_transitive: bucket(&result.used_transitive),
            used_inherited: bucket(&result.used_inherited),
            unused_direct: bucket(&result.unused_direct),
            unused_transitive: bucket(&result.unused_transitive),
            unused_inherited: bucket(&result.unused_inherited),
            summary: JsonSummary {
                used: result.all_used().len(),
                unused: result.all_unused().len(),
                potential_savings_bytes: analysis.potential_savings(),
                class_visits: analysis.stats.types,
                field_visits: analysis.stats.fields,
                method_visits: analysis.stats.methods,
                annotation_visits: analysis.stats.annotations,
            },
        }
    }
}

impl JsonDependency {
    fn from_dependency(dependency: &Dependency, analysis: &AnalysisReport) -> Self {
        let detail = analysis.detail(dependency);
        Self {
            coordinate: dependency.coordinate.to_string(),
            scope: dependency.scope.clone(),
            size_bytes: detail.map_or(0, |d| d.size_bytes),
            total_classes: detail.map_or(0, |d| d.total_classes),
            used_classes: detail
                .map(|d| d.used_classes.iter().map(ToString::to_string).collect())
                .unwrap_or_default(),
            needed_transitively: analysis
                .result
                .needed_transitively
                .get(dependency)
                .map(|companions| {
                    companions
                        .iter()
                        .map(|dep| dep.coordinate.to_string())
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}
