//! Full-pipeline behavior: extraction, reachability through project classes,
//! import evidence, and resilience to bad inputs.

#[path = "fixtures.rs"]
mod fixtures;

use fixtures::{write_class_dir, write_resolution, write_stub_jar, ClassFileBuilder, ResolutionDep};
use jardiet::{depgraph, Config, Coordinate, DebloatAnalyzer, Dependency, ResolvedGraph};
use std::path::PathBuf;
use tempfile::TempDir;

fn dependency(tmp: &TempDir, artifact: &str, classes: &[&str]) -> Dependency {
    let jar = tmp.path().join(format!("{artifact}.jar"));
    write_stub_jar(&jar, classes);
    Dependency::new(Coordinate::new("com.example", artifact, "1.0"), "compile").with_file(jar)
}

#[test]
fn dependency_reached_only_through_a_chain_of_project_classes() {
    let tmp = TempDir::new().unwrap();
    let classes_dir = tmp.path().join("classes");
    std::fs::create_dir(&classes_dir).unwrap();

    // Main -> Service -> Repository -> com.dep.Client
    write_class_dir(
        &classes_dir,
        &[
            (
                "com/app/Main",
                ClassFileBuilder::new("com/app/Main")
                    .field("service", "Lcom/app/Service;")
                    .build(),
            ),
            (
                "com/app/Service",
                ClassFileBuilder::new("com/app/Service")
                    .method("repo", "()Lcom/app/Repository;")
                    .build(),
            ),
            (
                "com/app/Repository",
                ClassFileBuilder::new("com/app/Repository")
                    .references("com/dep/Client")
                    .build(),
            ),
        ],
    );

    let dep = dependency(&tmp, "client", &["com/dep/Client"]);
    let graph = ResolvedGraph::builder(Coordinate::new("com.example", "app", "1.0"))
        .direct(dep.clone())
        .build();

    let report = DebloatAnalyzer::new(Config::default())
        .with_class_dirs(vec![classes_dir])
        .analyze(&graph)
        .unwrap();

    assert!(report.result.used_direct.contains(&dep));
    assert_eq!(report.project_class_count, 3);
    assert_eq!(report.stats.types, 3);
}

#[test]
fn inheritance_counts_as_usage() {
    let tmp = TempDir::new().unwrap();
    let classes_dir = tmp.path().join("classes");
    std::fs::create_dir(&classes_dir).unwrap();

    write_class_dir(
        &classes_dir,
        &[(
            "com/app/Handler",
            ClassFileBuilder::new("com/app/Handler")
                .extends("com/framework/BaseHandler")
                .implements("com/framework/Lifecycle")
                .build(),
        )],
    );

    let framework = dependency(
        &tmp,
        "framework",
        &["com/framework/BaseHandler", "com/framework/Lifecycle"],
    );
    let graph = ResolvedGraph::builder(Coordinate::new("com.example", "app", "1.0"))
        .direct(framework.clone())
        .build();

    let report = DebloatAnalyzer::new(Config::default())
        .with_class_dirs(vec![classes_dir])
        .analyze(&graph)
        .unwrap();

    assert!(report.result.used_direct.contains(&framework));
    let detail = report.detail(&framework).unwrap();
    assert_eq!(detail.used_classes.len(), 2);
}

#[test]
fn corrupt_class_file_is_skipped_not_fatal() {
    let tmp = TempDir::new().unwrap();
    let classes_dir = tmp.path().join("classes");
    std::fs::create_dir(&classes_dir).unwrap();

    write_class_dir(
        &classes_dir,
        &[(
            "com/app/Main",
            ClassFileBuilder::new("com/app/Main")
                .field("used", "Lcom/dep/Client;")
                .build(),
        )],
    );
    std::fs::write(classes_dir.join("Broken.class"), [0xCA, 0xFE, 0x00]).unwrap();
    std::fs::write(classes_dir.join("NotAClass.class"), b"garbage").unwrap();

    let dep = dependency(&tmp, "client", &["com/dep/Client"]);
    let graph = ResolvedGraph::builder(Coordinate::new("com.example", "app", "1.0"))
        .direct(dep.clone())
        .build();

    let report = DebloatAnalyzer::new(Config::default())
        .with_class_dirs(vec![classes_dir])
        .analyze(&graph)
        .unwrap();

    // the good class still produces evidence
    assert!(report.result.used_direct.contains(&dep));
    assert_eq!(report.stats.types, 1);
}

#[test]
fn imports_provide_evidence_bytecode_misses() {
    let tmp = TempDir::new().unwrap();
    let classes_dir = tmp.path().join("classes");
    std::fs::create_dir(&classes_dir).unwrap();
    write_class_dir(
        &classes_dir,
        &[(
            "com/app/Main",
            ClassFileBuilder::new("com/app/Main").build(),
        )],
    );

    // compile-time constant usage leaves no bytecode trace
    let sources_dir = tmp.path().join("src");
    std::fs::create_dir_all(sources_dir.join("com/app")).unwrap();
    std::fs::write(
        sources_dir.join("com/app/Main.java"),
        "package com.app;\n\
         import static com.constants.Names.DEFAULT;\n\
         public class Main { String name = DEFAULT; }\n",
    )
    .unwrap();

    let constants = dependency(&tmp, "constants", &["com/constants/Names"]);
    let graph = ResolvedGraph::builder(Coordinate::new("com.example", "app", "1.0"))
        .direct(constants.clone())
        .build();

    let report = DebloatAnalyzer::new(Config::default())
        .with_class_dirs(vec![classes_dir])
        .with_source_dirs(vec![sources_dir])
        .analyze(&graph)
        .unwrap();

    assert!(report.result.used_direct.contains(&constants));
}

#[test]
fn ignore_tests_drops_test_only_evidence() {
    let tmp = TempDir::new().unwrap();
    let classes_dir = tmp.path().join("classes");
    let test_classes_dir = tmp.path().join("test-classes");
    std::fs::create_dir(&classes_dir).unwrap();
    std::fs::create_dir(&test_classes_dir).unwrap();

    write_class_dir(
        &classes_dir,
        &[(
            "com/app/Main",
            ClassFileBuilder::new("com/app/Main").build(),
        )],
    );
    write_class_dir(
        &test_classes_dir,
        &[(
            "com/app/MainTest",
            ClassFileBuilder::new("com/app/MainTest")
                .field("mock", "Lcom/mock/Mock;")
                .build(),
        )],
    );

    let mock = dependency(&tmp, "mock", &["com/mock/Mock"]);
    let graph = ResolvedGraph::builder(Coordinate::new("com.example", "app", "1.0"))
        .direct(mock.clone())
        .build();

    let with_tests = DebloatAnalyzer::new(Config::default())
        .with_class_dirs(vec![classes_dir.clone()])
        .with_test_class_dirs(vec![test_classes_dir.clone()])
        .analyze(&graph)
        .unwrap();
    assert!(with_tests.result.used_direct.contains(&mock));

    let config = Config {
        ignore_tests: true,
        ..Config::default()
    };
    let without_tests = DebloatAnalyzer::new(config)
        .with_class_dirs(vec![classes_dir])
        .with_test_class_dirs(vec![test_classes_dir])
        .analyze(&graph)
        .unwrap();
    assert!(without_tests.result.unused_direct.contains(&mock));
}

#[test]
fn resolution_file_drives_the_full_pipeline() {
    let tmp = TempDir::new().unwrap();
    let classes_dir = tmp.path().join("classes");
    std::fs::create_dir(&classes_dir).unwrap();
    write_class_dir(
        &classes_dir,
        &[(
            "com/app/Main",
            ClassFileBuilder::new("com/app/Main")
                .field("stream", "Lcom/io/Stream;")
                .build(),
        )],
    );

    let io_jar = tmp.path().join("lib-io.jar");
    write_stub_jar(&io_jar, &["com/io/Stream"]);
    let core_jar = tmp.path().join("lib-core.jar");
    write_stub_jar(&core_jar, &["com/core/Core"]);

    let resolution = tmp.path().join("resolution.yml");
    write_resolution(
        &resolution,
        "com.example:app:1.0",
        &[
            ResolutionDep::new("com.example:lib-io:1.0", "direct")
                .file(&io_jar)
                .child("com.example:lib-core:1.0"),
            ResolutionDep::new("com.example:lib-core:1.0", "transitive").file(&core_jar),
        ],
    );

    let graph = depgraph::file::load(&resolution).unwrap();
    let report = DebloatAnalyzer::new(Config::default())
        .with_class_dirs(vec![classes_dir])
        .analyze(&graph)
        .unwrap();

    let coordinates: Vec<String> = report
        .result
        .used_direct
        .iter()
        .map(|dep| dep.coordinate.to_string())
        .collect();
    assert_eq!(coordinates, vec!["com.example:lib-io:1.0"]);
    assert_eq!(report.result.unused_transitive.len(), 1);
}

#[test]
fn missing_everything_reports_sentinel_stats() {
    let graph = ResolvedGraph::builder(Coordinate::new("com.example", "app", "1.0")).build();
    let report = DebloatAnalyzer::new(Config::default())
        .with_class_dirs(vec![PathBuf::from("/nonexistent/build/classes")])
        .analyze(&graph)
        .unwrap();

    assert!(report.stats.is_not_found());
    assert!(!report.result.has_unused());
}
