use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn osdet() -> Command {
    Command::cargo_bin("osdet").unwrap()
}

#[test]
fn test_classifier_prints_single_line() {
    osdet()
        .arg("classifier")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^[a-z0-9_]+-[a-z0-9_]+\n$").unwrap());
}

#[test]
fn test_classifier_known_scenario() {
    osdet()
        .args(["classifier", "--os-name", "Windows 10", "--os-arch", "amd64"])
        .assert()
        .success()
        .stdout("windows-x86_64\n");
}

#[test]
fn test_classifier_override_verbatim() {
    osdet()
        .args(["classifier", "--classifier", "Exact-Override"])
        .assert()
        .success()
        .stdout("Exact-Override\n");
}

#[test]
fn test_classifier_release_qualified() {
    let mut release_file = NamedTempFile::new().unwrap();
    release_file
        .write_all(b"ID=alpine\nVERSION_ID=3.19.1\n")
        .unwrap();

    osdet()
        .args([
            "classifier",
            "--release",
            "--os-name",
            "Linux",
            "--os-arch",
            "aarch64",
            "--release-file",
            release_file.path().to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout("linux_alpine-aarch_64\n");
}

#[test]
fn test_classifier_release_flag_falls_back_off_linux() {
    osdet()
        .args([
            "classifier",
            "--release",
            "--os-name",
            "Mac OS X",
            "--os-arch",
            "arm64",
        ])
        .assert()
        .success()
        .stdout("osx-aarch_64\n");
}

#[test]
fn test_classifier_fail_on_unknown() {
    osdet()
        .args([
            "classifier",
            "--fail-on-unknown",
            "--os-name",
            "TempleOS",
            "--os-arch",
            "holychip",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("TempleOS").and(predicate::str::contains("holychip")));
}
