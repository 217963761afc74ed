use crate::analyzer::AnalysisReport;
use crate::artifact::Dependency;
use miette::{IntoDiagnostic, Result};
use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::path::PathBuf;

/// CSV reporter, one row per classified dependency
pub struct CsvReporter {
    output_path: Option<PathBuf>,
}

impl CsvReporter {
    pub fn new(output_path: Option<PathBuf>) -> Self {
        Self { output_path }
    }

    pub fn report(&self, analysis: &AnalysisReport) -> Result<()> {
        let csv = render(analysis);

        if let Some(path) = &self.output_path {
            std::fs::write(path, &csv).into_diagnostic()?;
            println!("Report written to: {}", path.display());
        } else {
            print!("{csv}");
        }

        Ok(())
    }
}

fn render(analysis: &AnalysisReport) -> String {
    let mut out = String::from("coordinate,scope,status,origin,size_bytes,used_classes,total_classes\n");

    let result = &analysis.result;
    let buckets: [(&BTreeSet<Dependency>, &str, &str); 6] = [
        (&result.used_direct, "used", "direct"),
        (&result.used_transitive, "used", "transitive"),
        (&result.used_inherited, "used", "inherited"),
        (&result.unused_direct, "unused", "direct"),
        (&result.unused_transitive, "unused", "transitive"),
        (&result.unused_inherited, "unused", "inherited"),
    ];

    for (bucket, status, origin) in buckets {
        for dependency in bucket {
            let detail = analysis.detail(dependency);
            let _ = writeln!(
                out,
                "{},{},{},{},{},{},{}",
                dependency.coordinate,
                dependency.scope,
                status,
                origin,
                detail.map_or(0, |d| d.size_bytes),
                detail.map_or(0, |d| d.used_classes.len()),
                detail.map_or(0, |d| d.total_classes),
            );
        }
    }

    out
}
