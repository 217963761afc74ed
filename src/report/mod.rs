mod csv;
mod json;
mod terminal;

pub use csv::CsvReporter;
pub use json::JsonReporter;
pub use terminal::TerminalReporter;

use crate::analyzer::AnalysisReport;
use crate::config::ReportConfig;
use miette::{miette, Result};
use std::path::PathBuf;
use std::str::FromStr;

/// Output format for reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Terminal,
    Json,
    Csv,
}

impl FromStr for ReportFormat {
    type Err = miette::Report;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "terminal" => Ok(Self::Terminal),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(miette!(
                "unknown report format '{other}', expected terminal, json or csv"
            )),
        }
    }
}

/// Reporter for outputting classification results
pub struct Reporter {
    format: ReportFormat,
    output_path: Option<PathBuf>,
    config: ReportConfig,
}

impl Reporter {
    pub fn new(format: ReportFormat, output_path: Option<PathBuf>, config: ReportConfig) -> Self {
        Self {
            format,
            output_path,
            config,
        }
    }

    pub fn report(&self, analysis: &AnalysisReport) -> Result<()> {
        match self.format {
            ReportFormat::Terminal => TerminalReporter::new(&self.config).report(analysis),
            ReportFormat::Json => JsonReporter::new(self.output_path.clone()).report(analysis),
            ReportFormat::Csv => CsvReporter::new(self.output_path.clone()).report(analysis),
        }
    }
}

/// Human-readable byte size, powers of 1024.
pub(crate) fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}
