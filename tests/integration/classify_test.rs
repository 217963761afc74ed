//! Classification behavior over synthesized projects: real class files for
//! the project, stub jars for dependencies.

#[path = "fixtures.rs"]
mod fixtures;

use fixtures::{write_class_dir, write_stub_jar, ClassFileBuilder};
use jardiet::{Config, Coordinate, DebloatAnalyzer, Dependency, ResolvedGraph};
use std::collections::BTreeSet;
use std::path::PathBuf;
use tempfile::TempDir;

struct Project {
    tmp: TempDir,
    classes_dir: PathBuf,
}

impl Project {
    fn new(classes: &[(&str, Vec<u8>)]) -> Self {
        let tmp = TempDir::new().unwrap();
        let classes_dir = tmp.path().join("classes");
        std::fs::create_dir(&classes_dir).unwrap();
        write_class_dir(&classes_dir, classes);
        Self { tmp, classes_dir }
    }

    fn dependency(&self, artifact: &str, scope: &str, classes: &[&str]) -> Dependency {
        let jar = self.tmp.path().join(format!("{artifact}.jar"));
        write_stub_jar(&jar, classes);
        Dependency::new(Coordinate::new("com.example", artifact, "1.0"), scope).with_file(jar)
    }

    fn analyze(&self, config: Config, graph: &ResolvedGraph) -> jardiet::AnalysisReport {
        DebloatAnalyzer::new(config)
            .with_class_dirs(vec![self.classes_dir.clone()])
            .analyze(graph)
            .unwrap()
    }
}

#[test]
fn buckets_cover_all_dependencies_exactly_once() {
    let project = Project::new(&[(
        "com/app/Main",
        ClassFileBuilder::new("com/app/Main")
            .field("stream", "Lcom/io/Stream;")
            .build(),
    )]);

    let lib_io = project.dependency("lib-io", "compile", &["com/io/Stream", "com/io/Buffer"]);
    let lib_core = project.dependency("lib-core", "compile", &["com/core/Core"]);
    let parent_util = project.dependency("parent-util", "compile", &["com/parent/Util"]);

    let graph = ResolvedGraph::builder(Coordinate::new("com.example", "app", "1.0"))
        .direct(lib_io.clone())
        .transitive(lib_core.clone())
        .inherited_direct(parent_util.clone())
        .edge(&lib_io.coordinate, &lib_core.coordinate)
        .build();

    let report = project.analyze(Config::default(), &graph);
    let result = &report.result;

    assert_eq!(result.used_direct, [lib_io].into());
    assert_eq!(result.unused_transitive, [lib_core].into());
    assert_eq!(result.unused_inherited, [parent_util].into());
    assert!(result.used_transitive.is_empty());
    assert!(result.used_inherited.is_empty());
    assert!(result.unused_direct.is_empty());

    let mut seen = BTreeSet::new();
    for dep in result.all_used().iter().chain(result.all_unused().iter()) {
        assert!(seen.insert(dep.clone()), "{dep} classified twice");
    }
    assert_eq!(seen.len(), 3);
}

#[test]
fn usage_ratio_counts_touched_classes() {
    let project = Project::new(&[(
        "com/app/Main",
        ClassFileBuilder::new("com/app/Main")
            .method("open", "()Lcom/io/Stream;")
            .build(),
    )]);

    let lib_io = project.dependency(
        "lib-io",
        "compile",
        &[
            "com/io/Stream",
            "com/io/Buffer",
            "com/io/Channel",
            "com/io/Pipe",
        ],
    );
    let graph = ResolvedGraph::builder(Coordinate::new("com.example", "app", "1.0"))
        .direct(lib_io.clone())
        .build();

    let report = project.analyze(Config::default(), &graph);
    let detail = report.detail(&lib_io).unwrap();
    assert_eq!(detail.total_classes, 4);
    assert_eq!(detail.used_classes.len(), 1);
    assert_eq!(detail.usage_ratio(), Some(0.25));
    assert!(detail.size_bytes > 0);
}

#[test]
fn ignored_scope_is_left_out_of_the_report() {
    let project = Project::new(&[(
        "com/app/Main",
        ClassFileBuilder::new("com/app/Main").build(),
    )]);

    let junit = project.dependency("junit", "test", &["org/junit/Test"]);
    let lib = project.dependency("lib", "compile", &["com/lib/Lib"]);
    let graph = ResolvedGraph::builder(Coordinate::new("com.example", "app", "1.0"))
        .direct(junit.clone())
        .direct(lib.clone())
        .build();

    let config = Config {
        ignored_scopes: vec!["test".to_string()],
        ..Config::default()
    };
    let report = project.analyze(config, &graph);

    assert_eq!(report.result.unused_direct, [lib].into());
    assert!(!report.result.all_used().contains(&junit));
    assert!(!report.result.all_unused().contains(&junit));
}

#[test]
fn ignored_dependency_is_forced_into_used_direct() {
    let project = Project::new(&[(
        "com/app/Main",
        ClassFileBuilder::new("com/app/Main").build(),
    )]);

    let lombok = project.dependency("lombok", "provided", &["lombok/Data"]);
    let graph = ResolvedGraph::builder(Coordinate::new("com.example", "app", "1.0"))
        .transitive(lombok.clone())
        .build();

    let config = Config {
        ignored_dependencies: vec!["lombok".to_string()],
        ..Config::default()
    };
    let report = project.analyze(config, &graph);

    assert_eq!(report.result.used_direct, [lombok].into());
    assert!(!report.result.has_unused());
}

#[test]
fn used_transitives_are_promoted_for_a_debloated_build() {
    let project = Project::new(&[(
        "com/app/Main",
        ClassFileBuilder::new("com/app/Main")
            .field("stream", "Lcom/io/Stream;")
            .field("core", "Lcom/core/Core;")
            .build(),
    )]);

    let lib_io = project.dependency("lib-io", "compile", &["com/io/Stream"]);
    let lib_core = project.dependency("lib-core", "compile", &["com/core/Core"]);
    let lib_extra = project.dependency("lib-extra", "compile", &["com/extra/Extra"]);

    let graph = ResolvedGraph::builder(Coordinate::new("com.example", "app", "1.0"))
        .direct(lib_io.clone())
        .transitive(lib_core.clone())
        .transitive(lib_extra.clone())
        .edge(&lib_io.coordinate, &lib_core.coordinate)
        .edge(&lib_core.coordinate, &lib_extra.coordinate)
        .build();

    let report = project.analyze(Config::default(), &graph);
    let result = &report.result;

    assert!(result.used_transitive.contains(&lib_core));
    assert!(result.unused_transitive.contains(&lib_extra));

    let companions = &result.needed_transitively[&lib_io];
    assert!(companions.contains(&lib_core));
    assert!(!companions.contains(&lib_extra));

    let debloated = result.debloated_direct_set();
    assert_eq!(debloated, [lib_io, lib_core].into());
}

#[test]
fn potential_savings_sum_unused_artifact_sizes() {
    let project = Project::new(&[(
        "com/app/Main",
        ClassFileBuilder::new("com/app/Main").build(),
    )]);

    let unused_one = project.dependency("unused-one", "compile", &["com/u1/A"]);
    let unused_two = project.dependency("unused-two", "compile", &["com/u2/B"]);
    let graph = ResolvedGraph::builder(Coordinate::new("com.example", "app", "1.0"))
        .direct(unused_one.clone())
        .transitive(unused_two.clone())
        .build();

    let report = project.analyze(Config::default(), &graph);

    let expected: u64 = [&unused_one, &unused_two]
        .iter()
        .map(|dep| std::fs::metadata(dep.file.as_ref().unwrap()).unwrap().len())
        .sum();
    assert_eq!(report.potential_savings(), expected);
}
