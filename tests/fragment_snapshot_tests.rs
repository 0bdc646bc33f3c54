//! Golden snapshot tests for generated fragments
//!
//! These tests run the generator over `tests/fixtures/suite` (a small C test suite with the usual suspects:
//! trailing comments, braces on the declaration line, commented-out and indented declarations, a test file with
//! no tests, a non-test `main.c`) and compare the output against stored snapshots.
//!
//! Run with: `cargo test --test fragment_snapshot_tests`
//! Review changes: `cargo insta review`

use std::path::Path;

use ctestgen::{Generator, GeneratorConfig};

const SUITE: &str = "tests/fixtures/suite";

fn render(config: GeneratorConfig) -> String {
    let generator = Generator::new(config).expect("valid config");
    let (bytes, _) = generator.render(Path::new(SUITE)).expect("generation failed");
    String::from_utf8(bytes).expect("fragment is utf-8")
}

#[test]
fn test_suite_fragment() {
    let fragment = render(GeneratorConfig::default());
    insta::assert_snapshot!("suite_fragment", fragment);
}

#[test]
fn test_suite_listing() {
    let generator = Generator::new(GeneratorConfig::default()).unwrap();
    let (_, report) = generator.render(Path::new(SUITE)).unwrap();

    let listing: String = report
        .tests
        .iter()
        .map(|t| {
            let file = t.file.file_name().unwrap().to_string_lossy();
            format!("{}:{}: {}\n", file, t.declaration.line, t.name())
        })
        .collect();
    insta::assert_snapshot!("suite_listing", listing);
}

#[test]
fn test_suite_custom_runner() {
    let fragment = render(GeneratorConfig::new().with_runner_macro("CHECKED_RUN"));
    insta::assert_snapshot!("suite_custom_runner", fragment);
}

#[test]
fn test_suite_scans_every_test_file() {
    let generator = Generator::new(GeneratorConfig::default()).unwrap();
    let (_, report) = generator.render(Path::new(SUITE)).unwrap();
    let names: Vec<_> = report
        .files
        .iter()
        .map(|f| f.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["test_list.c", "test_nothing.c", "test_strings.c"]);
}
