use super::format_bytes;
use crate::analyzer::AnalysisReport;
use crate::artifact::Dependency;
use crate::config::ReportConfig;
use colored::Colorize;
use miette::Result;
use std::collections::BTreeSet;

/// Terminal reporter with colored output
pub struct TerminalReporter<'a> {
    config: &'a ReportConfig,
}

impl<'a> TerminalReporter<'a> {
    pub fn new(config: &'a ReportConfig) -> Self {
        Self { config }
    }

    pub fn report(&self, analysis: &AnalysisReport) -> Result<()> {
        let result = &analysis.result;

        println!();
        println!(
            "{}",
            format!("Dependency usage for {}", result.project)
                .cyan()
                .bold()
        );
        println!(
            "{}",
            format!(
                "  {} project classes, {} references",
                analysis.project_class_count, analysis.reference_count
            )
            .dimmed()
        );
        println!();

        self.print_bucket("Used direct dependencies", &result.used_direct, analysis, true);
        self.print_bucket(
            "Used transitive dependencies",
            &result.used_transitive,
            analysis,
            true,
        );
        self.print_bucket(
            "Used inherited dependencies",
            &result.used_inherited,
            analysis,
            true,
        );
        self.print_bucket(
            "Unused direct dependencies",
            &result.unused_direct,
            analysis,
            false,
        );
        self.print_bucket(
            "Unused transitive dependencies",
            &result.unused_transitive,
            analysis,
            false,
        );
        self.print_bucket(
            "Unused inherited dependencies",
            &result.unused_inherited,
            analysis,
            false,
        );

        if self.config.show_companions {
            self.print_companions(analysis);
        }

        self.print_summary(analysis);

        Ok(())
    }

    fn print_bucket(
        &self,
        title: &str,
        bucket: &BTreeSet<Dependency>,
        analysis: &AnalysisReport,
        used: bool,
    ) {
        if bucket.is_empty() {
            return;
        }

        let header = format!("{} ({}):", title, bucket.len());
        if used {
            println!("{}", header.green().bold());
        } else {
            println!("{}", header.yellow().bold());
        }

        for dependency in bucket {
            let mut line = format!("  {} [{}]", dependency.coordinate, dependency.scope);
            if let Some(detail) = analysis.detail(dependency) {
                line.push_str(&format!(" ({})", format_bytes(detail.size_bytes)));
                if self.config.show_usage_ratio {
                    if let Some(ratio) = detail.usage_ratio() {
                        line.push_str(&format!(
                            " {}/{} classes, {:.0}%",
                            detail.used_classes.len(),
                            detail.total_classes,
                            ratio * 100.0
                        ));
                    }
                }
            }
            println!("{line}");
        }
        println!();
    }

    fn print_companions(&self, analysis: &AnalysisReport) {
        let promoted: BTreeSet<&Dependency> = analysis
            .result
            .needed_transitively
            .values()
            .flatten()
            .collect();
        if promoted.is_empty() {
            return;
        }

        println!(
            "{}",
            "Transitive dependencies a debloated build must declare:"
                .blue()
                .bold()
        );
        for dependency in promoted {
            println!("  {}", dependency.coordinate);
        }
        println!();
    }

    fn print_summary(&self, analysis: &AnalysisReport) {
        let unused = analysis.result.all_unused().len();
        if unused == 0 {
            println!("{}", "No unused dependencies found!".green().bold());
            return;
        }

        println!(
            "{}",
            format!(
                "{} unused dependencies, potential savings {}",
                unused,
                format_bytes(analysis.potential_savings())
            )
            .yellow()
            .bold()
        );
    }
}
