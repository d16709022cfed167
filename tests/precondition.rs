use std::fs;

use caraway::{Cached, Error};
use tempfile::TempDir;

/// Lays out the given `(name, content)` feature files in a fresh
/// temporary directory.
fn features(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (name, content) in files {
        fs::write(dir.path().join(name), content).unwrap();
    }
    dir
}

#[test]
fn resolves_precondition_scenario() {
    let dir = features(&[
        (
            "base.feature",
            "Feature: Base\n\
             Scenario: Set up\n\
             \x20 Given an empty database\n",
        ),
        (
            "main.feature",
            "Feature: Main\n\
             @precondition(base.feature: Set up)\n\
             Scenario: Work\n\
             \x20 Given a step\n",
        ),
    ]);

    let resolver = Cached::new();
    let main = resolver
        .parse_feature(&dir.path().join("main.feature"))
        .unwrap();

    let scenario = &main.scenarios[0];
    assert_eq!(scenario.preconditions.len(), 1);

    let precondition = &scenario.preconditions[0];
    assert_eq!(precondition.feature().sentence, "Base");
    assert_eq!(precondition.scenario().sentence, "Set up");
    assert_eq!(
        precondition.scenario().steps[0].sentence,
        "Given an empty database",
    );
    // The tag itself stays attached as ordinary metadata too.
    assert!(scenario.tags[0].is_precondition());
}

#[test]
fn reuses_parsed_features_across_references() {
    let dir = features(&[
        (
            "base.feature",
            "Feature: Base\n\
             Scenario: Set up\n\
             \x20 Given an empty database\n\
             Scenario: Tear down\n\
             \x20 Given a dropped database\n",
        ),
        (
            "main.feature",
            "Feature: Main\n\
             @precondition(base.feature: Set up)\n\
             Scenario: First\n\
             \x20 Given a step\n\
             @precondition(base.feature: Tear down)\n\
             Scenario: Second\n\
             \x20 Given a step\n",
        ),
    ]);

    let resolver = Cached::new();
    let main = resolver
        .parse_feature(&dir.path().join("main.feature"))
        .unwrap();

    let first = &main.scenarios[0].preconditions[0];
    let second = &main.scenarios[1].preconditions[0];
    // One parse, one feature identifier: the second reference hits the
    // cache.
    assert_eq!(first.feature().id, second.feature().id);
    assert_eq!(second.scenario().sentence, "Tear down");
}

#[test]
fn rejects_missing_precondition_scenario() {
    let dir = features(&[
        (
            "base.feature",
            "Feature: Base\n\
             Scenario: Set up\n\
             \x20 Given an empty database\n",
        ),
        (
            "main.feature",
            "Feature: Main\n\
             @precondition(base.feature: No such thing)\n\
             Scenario: Work\n\
             \x20 Given a step\n",
        ),
    ]);

    let result = Cached::new().parse_feature(&dir.path().join("main.feature"));

    match result {
        Err(Error::NoSuchPrecondition { sentence, .. }) => {
            assert_eq!(sentence, "No such thing");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn rejects_malformed_precondition_argument() {
    let dir = features(&[(
        "main.feature",
        "Feature: Main\n\
         @precondition(base: Set up)\n\
         Scenario: Work\n\
         \x20 Given a step\n",
    )]);

    let result = Cached::new().parse_feature(&dir.path().join("main.feature"));

    match result {
        Err(Error::PreconditionArgument { line: 2, .. }) => {}
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn rejects_cyclic_precondition_chain() {
    let dir = features(&[
        (
            "a.feature",
            "Feature: A\n\
             @precondition(b.feature: In b)\n\
             Scenario: In a\n\
             \x20 Given a step\n",
        ),
        (
            "b.feature",
            "Feature: B\n\
             @precondition(a.feature: In a)\n\
             Scenario: In b\n\
             \x20 Given a step\n",
        ),
    ]);

    let result = Cached::new().parse_feature(&dir.path().join("a.feature"));

    match result {
        Err(Error::CyclicPrecondition { sentence, .. }) => {
            assert_eq!(sentence, "In a");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn rejects_self_referencing_precondition() {
    let dir = features(&[(
        "a.feature",
        "Feature: A\n\
         @precondition(a.feature: Myself)\n\
         Scenario: Myself\n\
         \x20 Given a step\n",
    )]);

    let result = Cached::new().parse_feature(&dir.path().join("a.feature"));

    match result {
        Err(Error::CyclicPrecondition { sentence, .. }) => {
            assert_eq!(sentence, "Myself");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn propagates_unreadable_precondition_target() {
    let dir = features(&[(
        "main.feature",
        "Feature: Main\n\
         @precondition(missing.feature: Anything)\n\
         Scenario: Work\n\
         \x20 Given a step\n",
    )]);

    let result = Cached::new().parse_feature(&dir.path().join("main.feature"));

    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn discovers_feature_files_in_directory() {
    let dir = features(&[
        ("one.feature", "Feature: One\n"),
        ("two.FEATURE", "Feature: Two\n"),
        ("ignored.txt", "Feature: Ignored\n"),
    ]);

    let resolver = Cached::new();
    let parsed = resolver.parse_path(dir.path()).unwrap();

    let mut sentences = parsed
        .iter()
        .map(|f| f.sentence.clone())
        .collect::<Vec<_>>();
    sentences.sort();
    assert_eq!(sentences, vec!["One", "Two"]);
}
