use miette::{IntoDiagnostic, Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for a debloat analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Dependency scopes excluded from classification (e.g. "test", "provided")
    pub ignored_scopes: Vec<String>,

    /// Substring filters over `group:artifact:version`; matches are always
    /// reported as used
    pub ignored_dependencies: Vec<String>,

    /// Fully qualified class names treated as used regardless of bytecode
    /// evidence (reflection targets, SPI implementations)
    pub extra_used_classes: Vec<String>,

    /// Exclude test classes from the reachability seeds
    pub ignore_tests: bool,

    /// Report configuration
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Output format: terminal, json, csv
    pub format: String,

    /// Show the per-dependency class usage ratio
    pub show_usage_ratio: bool,

    /// List the companion dependencies a debloated manifest must declare
    pub show_companions: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ignored_scopes: vec![],
            ignored_dependencies: vec![],
            extra_used_classes: vec![],
            ignore_tests: false,
            report: ReportConfig::default(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: "terminal".to_string(),
            show_usage_ratio: true,
            show_companions: true,
        }
    }
}

impl Config {
    /// Load configuration from a file (YAML or TOML)
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match extension {
            "yml" | "yaml" => serde_yaml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse YAML config"),
            "toml" => toml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse TOML config"),
            _ => {
                // Try YAML first, then TOML
                if let Ok(config) = serde_yaml::from_str(&contents) {
                    Ok(config)
                } else {
                    toml::from_str(&contents)
                        .into_diagnostic()
                        .wrap_err("Failed to parse config file")
                }
            }
        }
    }

    /// Try to load configuration from default locations
    pub fn from_default_locations(project_root: &Path) -> Result<Self> {
        let default_names = [
            ".jardiet.yml",
            ".jardiet.yaml",
            ".jardiet.toml",
            "jardiet.yml",
            "jardiet.yaml",
            "jardiet.toml",
        ];

        for name in &default_names {
            let path = project_root.join(name);
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        // No config file found, use defaults
        Ok(Self::default())
    }

    /// Fold command-line overrides into a file-loaded configuration. List
    /// options append; flags override.
    pub fn merge_cli(
        mut self,
        ignored_scopes: Vec<String>,
        ignored_dependencies: Vec<String>,
        extra_used_classes: Vec<String>,
        ignore_tests: bool,
        format: Option<String>,
    ) -> Self {
        self.ignored_scopes.extend(ignored_scopes);
        self.ignored_dependencies.extend(ignored_dependencies);
        self.extra_used_classes.extend(extra_used_classes);
        if ignore_tests {
            self.ignore_tests = true;
        }
        if let Some(format) = format {
            self.report.format = format;
        }
        self
    }
}
