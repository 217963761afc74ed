use clap::Parser;
use colored::Colorize;
use miette::Result;
use std::path::PathBuf;
use tracing::info;

use jardiet::config::Config;
use jardiet::depgraph;
use jardiet::report::{ReportFormat, Reporter};
use jardiet::DebloatAnalyzer;

/// jardiet - Detect bloated (unused) JVM dependencies at the bytecode level
#[derive(Parser, Debug)]
#[command(name = "jardiet")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Resolution file describing the project's dependency graph
    /// (emitted by a build-tool plugin, JSON or YAML)
    resolution: PathBuf,

    /// Directory of compiled project classes (can be specified multiple times)
    #[arg(long, value_name = "DIR")]
    classes: Vec<PathBuf>,

    /// Directory of compiled test classes (can be specified multiple times)
    #[arg(long, value_name = "DIR")]
    test_classes: Vec<PathBuf>,

    /// Java source root scanned for import declarations
    /// (can be specified multiple times)
    #[arg(long, value_name = "DIR")]
    sources: Vec<PathBuf>,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Dependency scope to exclude from classification
    /// (can be specified multiple times)
    #[arg(long, value_name = "SCOPE")]
    ignore_scope: Vec<String>,

    /// Dependency to always report as used, matched as a substring of
    /// group:artifact:version (can be specified multiple times)
    #[arg(long, value_name = "PATTERN")]
    ignore_dependency: Vec<String>,

    /// Fully qualified class treated as used regardless of bytecode evidence
    /// (can be specified multiple times)
    #[arg(long, value_name = "CLASS")]
    extra_class: Vec<String>,

    /// Exclude test classes from the reachability seeds
    #[arg(long)]
    ignore_tests: bool,

    /// Output format (defaults to the config file's, then terminal)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Output file (for json/csv formats)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Exit with a non-zero status when unused dependencies are found
    #[arg(long)]
    fail_if_unused: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode - only output results
    #[arg(short, long)]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum OutputFormat {
    Terminal,
    Json,
    Csv,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    info!("jardiet v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&cli)?;

    run_analysis(&config, &cli)
}

fn init_logging(verbose: bool, quiet: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else {
        let root = cli
            .resolution
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        Config::from_default_locations(&root)?
    };

    let format = cli.format.map(|format| {
        match format {
            OutputFormat::Terminal => "terminal",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
        .to_string()
    });

    Ok(config.merge_cli(
        cli.ignore_scope.clone(),
        cli.ignore_dependency.clone(),
        cli.extra_class.clone(),
        cli.ignore_tests,
        format,
    ))
}

fn run_analysis(config: &Config, cli: &Cli) -> Result<()> {
    use indicatif::{ProgressBar, ProgressStyle};
    use std::time::Instant;

    let start_time = Instant::now();

    info!("Loading resolution file {}", cli.resolution.display());
    let graph = depgraph::file::load(&cli.resolution)?;

    let spinner = if cli.quiet {
        ProgressBar::hidden()
    } else {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        spinner.set_message("Analyzing bytecode...");
        spinner
    };

    let analyzer = DebloatAnalyzer::new(config.clone())
        .with_class_dirs(cli.classes.clone())
        .with_test_class_dirs(cli.test_classes.clone())
        .with_source_dirs(cli.sources.clone());
    let analysis = analyzer.analyze(&graph)?;

    spinner.finish_and_clear();

    if analysis.stats.is_not_found() {
        eprintln!(
            "{}",
            "Warning: no class directories found; every dependency will look unused".yellow()
        );
    }

    let format: ReportFormat = config.report.format.parse()?;
    let reporter = Reporter::new(format, cli.output.clone(), config.report.clone());
    reporter.report(&analysis)?;

    let elapsed = start_time.elapsed();
    info!("Analysis completed in {:.2}s", elapsed.as_secs_f64());

    if cli.fail_if_unused && analysis.result.has_unused() {
        std::process::exit(1);
    }

    Ok(())
}
