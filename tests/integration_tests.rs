//! Integration tests for ctestgen on a real filesystem

use std::fs;
use std::path::Path;
use std::process::Command;

use ctestgen::{GenerateError, Generator, GeneratorConfig, NamePolicy, generate};
use tempfile::TempDir;

/// Helper to lay out a test directory
fn write_files(dir: &Path, files: &[(&str, &str)]) {
    for (name, contents) in files {
        fs::write(dir.join(name), contents).unwrap();
    }
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn test_scenario_math_and_io() {
    let temp = TempDir::new().unwrap();
    write_files(
        temp.path(),
        &[("test_math.c", "TEST(add)\n{\n}\n\nTEST(sub)\n{\n}\n"), ("test_io.c", "TEST(read)\n")],
    );
    let output = temp.path().join("tests.inc");

    let report = generate(temp.path(), &output).unwrap();

    assert_eq!(read(&output), "RUN_TEST(read);\nRUN_TEST(add);\nRUN_TEST(sub);\n");
    assert_eq!(report.test_count(), 3);
}

#[test]
fn test_coverage_line_count_matches_declarations() {
    let temp = TempDir::new().unwrap();
    let mut body = String::new();
    for i in 0..50 {
        body.push_str(&format!("TEST(case_{})\n{{\n    CHECK(1);\n}}\n\n", i));
    }
    write_files(temp.path(), &[("test_many.c", &body), ("test_other.c", "TEST(last)\n")]);
    let output = temp.path().join("tests.inc");

    generate(temp.path(), &output).unwrap();

    let fragment = read(&output);
    assert_eq!(fragment.lines().count(), 51);
    assert_eq!(fragment.lines().next(), Some("RUN_TEST(case_0);"));
    assert_eq!(fragment.lines().last(), Some("RUN_TEST(last);"));
}

#[test]
fn test_idempotent_output() {
    let temp = TempDir::new().unwrap();
    write_files(
        temp.path(),
        &[("test_b.c", "TEST(b1)\nTEST(b2)\n"), ("test_a.c", "TEST(a1)\n"), ("test_c.c", "TEST(c1)\n")],
    );
    let output = temp.path().join("tests.inc");

    generate(temp.path(), &output).unwrap();
    let first = fs::read(&output).unwrap();
    generate(temp.path(), &output).unwrap();
    let second = fs::read(&output).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_no_matching_files_gives_empty_output() {
    let temp = TempDir::new().unwrap();
    write_files(temp.path(), &[("helpers.c", "TEST(nope)\n"), ("test_x.h", "TEST(nope)\n")]);
    let output = temp.path().join("tests.inc");

    let report = generate(temp.path(), &output).unwrap();

    assert_eq!(fs::metadata(&output).unwrap().len(), 0);
    assert!(report.files.is_empty());
}

#[test]
fn test_output_is_truncated() {
    let temp = TempDir::new().unwrap();
    write_files(temp.path(), &[("test_a.c", "TEST(a)\n")]);
    let output = temp.path().join("tests.inc");
    fs::write(&output, "RUN_TEST(stale_1);\nRUN_TEST(stale_2);\nRUN_TEST(stale_3);\n").unwrap();

    generate(temp.path(), &output).unwrap();

    assert_eq!(read(&output), "RUN_TEST(a);\n");
}

#[test]
fn test_capture_fidelity_and_trailing_content() {
    let temp = TempDir::new().unwrap();
    write_files(temp.path(), &[("test_p.c", "TEST(foo_bar_123)\nTEST(baz) // comment\n")]);
    let output = temp.path().join("tests.inc");

    generate(temp.path(), &output).unwrap();

    assert_eq!(read(&output), "RUN_TEST(foo_bar_123);\nRUN_TEST(baz);\n");
}

#[test]
fn test_missing_test_dir_is_empty_by_default() {
    let temp = TempDir::new().unwrap();
    let output = temp.path().join("tests.inc");

    let report = generate(temp.path().join("absent"), &output).unwrap();

    assert!(report.test_dir_missing);
    assert_eq!(read(&output), "");
}

#[test]
fn test_missing_test_dir_strict_leaves_output_alone() {
    let temp = TempDir::new().unwrap();
    let output = temp.path().join("tests.inc");
    fs::write(&output, "RUN_TEST(previous);\n").unwrap();

    let generator = Generator::new(GeneratorConfig::new().strict()).unwrap();
    let err = generator.generate_file(&temp.path().join("absent"), &output).unwrap_err();

    assert!(matches!(err, GenerateError::MissingTestDir { .. }));
    assert_eq!(read(&output), "RUN_TEST(previous);\n");
}

#[test]
fn test_output_parent_missing_fails_before_scanning() {
    let temp = TempDir::new().unwrap();
    write_files(temp.path(), &[("test_a.c", "TEST(a)\n")]);

    let err = generate(temp.path(), temp.path().join("_build").join("tests.inc")).unwrap_err();

    assert!(matches!(err, GenerateError::CreateOutput { .. }));
    assert!(err.is_io());
}

#[cfg(unix)]
#[test]
fn test_dangling_symlink_aborts() {
    let temp = TempDir::new().unwrap();
    write_files(temp.path(), &[("test_a.c", "TEST(a)\n")]);
    std::os::unix::fs::symlink(temp.path().join("gone.c"), temp.path().join("test_b.c")).unwrap();
    let output = temp.path().join("tests.inc");

    let err = generate(temp.path(), &output).unwrap_err();

    match err {
        GenerateError::ReadTestFile { ref path, ref source } => {
            assert_eq!(path, &temp.path().join("test_b.c"));
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("expected ReadTestFile, got {other:?}"),
    }
}

#[test]
fn test_classic_mac_line_endings() {
    let temp = TempDir::new().unwrap();
    write_files(temp.path(), &[("test_mac.c", "TEST(a)\rTEST(b)\n")]);
    let output = temp.path().join("tests.inc");

    generate(temp.path(), &output).unwrap();

    assert_eq!(read(&output), "RUN_TEST(a);\nRUN_TEST(b);\n");
}

#[test]
fn test_reject_mode_stops_at_bad_name() {
    let temp = TempDir::new().unwrap();
    write_files(temp.path(), &[("test_a.c", "TEST(good)\nTEST(bad name)\nTEST(never)\n")]);
    let output = temp.path().join("tests.inc");

    let generator = Generator::new(GeneratorConfig::new().with_names(NamePolicy::Reject)).unwrap();
    let err = generator.generate_file(temp.path(), &output).unwrap_err();

    match err {
        GenerateError::InvalidTestName { name, line, .. } => {
            assert_eq!(name, "bad name");
            assert_eq!(line, 2);
        }
        other => panic!("expected InvalidTestName, got {other:?}"),
    }
    // Partial output: everything before the failure was already written
    assert_eq!(read(&output), "RUN_TEST(good);\n");
}

// ============================================================================
// Binary
// ============================================================================

fn ctestgen() -> Command {
    Command::new(env!("CARGO_BIN_EXE_ctestgen"))
}

#[test]
fn test_binary_generates_fragment() {
    let temp = TempDir::new().unwrap();
    write_files(temp.path(), &[("test_math.c", "TEST(add)\nTEST(sub)\n")]);
    let output = temp.path().join("tests.inc");

    let status = ctestgen().arg(temp.path()).arg(&output).status().unwrap();

    assert!(status.success());
    assert_eq!(read(&output), "RUN_TEST(add);\nRUN_TEST(sub);\n");
}

#[test]
fn test_binary_fails_on_unwritable_output() {
    let temp = TempDir::new().unwrap();
    let output = temp.path().join("no_such_dir").join("tests.inc");

    let result = ctestgen().arg(temp.path()).arg(&output).output().unwrap();

    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("failed to create output file"), "stderr was: {stderr}");
}

#[test]
fn test_binary_check_and_list_json() {
    let temp = TempDir::new().unwrap();
    write_files(temp.path(), &[("test_math.c", "TEST(add)\n")]);
    let output = temp.path().join("tests.inc");

    let stale = ctestgen().arg("--check").arg(temp.path()).arg(&output).output().unwrap();
    assert_eq!(stale.status.code(), Some(1));
    assert!(!output.exists());

    let listed = ctestgen().arg(temp.path()).arg(&output).arg("--list=json").output().unwrap();
    assert!(listed.status.success());
    let value: serde_json::Value = serde_json::from_slice(&listed.stdout).unwrap();
    assert_eq!(value["tests"][0]["name"], "add");

    let fresh = ctestgen().arg("--check").arg(temp.path()).arg(&output).status().unwrap();
    assert!(fresh.success());
}

#[test]
fn test_binary_usage_error_for_bad_pattern() {
    let temp = TempDir::new().unwrap();
    let result = ctestgen()
        .arg(temp.path())
        .arg(temp.path().join("tests.inc"))
        .args(["--pattern", "test_[.c"])
        .output()
        .unwrap();
    assert_eq!(result.status.code(), Some(2));
}
