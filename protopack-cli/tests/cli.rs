//! Binary-level tests for the protopack CLI.

#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

fn protopack() -> Command {
    Command::cargo_bin("protopack").expect("protopack binary")
}

fn write(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn set_mtime(path: &Path, when: SystemTime) {
    fs::File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(when)
        .unwrap();
}

fn create_temp_project() -> TempDir {
    let td = tempfile::tempdir().expect("tempdir");
    let root = td.path();

    write(&root.join("__init__.py"), "");
    write(&root.join("proto/__init__.py"), "");
    write(&root.join("proto/block.proto"), "syntax = \"proto2\";\n");
    write(&root.join("conformance/__init__.py"), "");
    write(&root.join("schemas/sales-reports/v1/dsrf.xsd"), "<xs:schema/>");
    write(&root.join("schemas/ugc/v1/ugc.xsd"), "<xs:schema/>");

    td
}

fn mark_outputs_current(root: &Path) {
    let older = SystemTime::now() - Duration::from_secs(600);
    let out = root.join("proto/block_pb2.py");
    write(&out, "# generated\n");
    set_mtime(&root.join("proto/block.proto"), older);
    set_mtime(&out, older + Duration::from_secs(60));
}

#[cfg(unix)]
fn install_fake_protoc(root: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;
    let exe = root.join("toolchain/bin/protoc");
    write(&exe, body);
    fs::set_permissions(&exe, fs::Permissions::from_mode(0o755)).unwrap();
    exe
}

const GENERATING_PROTOC: &str = "#!/bin/sh\n\
                                 for last; do :; done\n\
                                 echo '# generated' > \"${last%.proto}_pb2.py\"\n";

#[test]
fn test_help_lists_subcommands() {
    protopack()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("locate-compiler"))
        .stdout(predicate::str::contains("manifest"));
}

#[cfg(unix)]
#[test]
fn test_locate_compiler_returns_override_exactly() {
    let temp = create_temp_project();
    let exe = install_fake_protoc(temp.path(), "#!/bin/sh\nexit 0\n");

    protopack()
        .current_dir(temp.path())
        .env("PROTOC", &exe)
        .env("PATH", "")
        .arg("locate-compiler")
        .assert()
        .success()
        .stdout(format!("{}\n", exe.display()));
}

#[test]
fn test_locate_compiler_without_any_compiler_exits_nonzero() {
    let temp = create_temp_project();

    protopack()
        .current_dir(temp.path())
        .env_remove("PROTOC")
        .env("PATH", "")
        .arg("locate-compiler")
        .assert()
        .failure()
        .code(255)
        .stderr(predicate::str::contains("protoc not found"));
}

#[test]
fn test_fatal_error_reaches_stderr_with_logging_off() {
    let temp = create_temp_project();

    protopack()
        .current_dir(temp.path())
        .env_remove("PROTOC")
        .env("PATH", "")
        .env("RUST_LOG", "off")
        .arg("build")
        .assert()
        .failure()
        .code(255)
        .stderr(predicate::str::contains("protoc not found"));
}

#[test]
fn test_manifest_json_lists_packages_and_data_files() {
    let temp = create_temp_project();

    let output = protopack()
        .current_dir(temp.path())
        .args(["manifest", "--format", "json"])
        .output()
        .expect("run");
    assert!(output.status.success());

    let manifest: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(
        manifest["packages"],
        serde_json::json!(["dsrf", "dsrf.conformance", "dsrf.proto"])
    );
    assert_eq!(
        manifest["data_files"]["dsrf/schemas/ugc/v1"],
        serde_json::json!(["schemas/ugc/v1/ugc.xsd"])
    );
}

#[test]
fn test_manifest_respects_config_namespace() {
    let temp = create_temp_project();
    fs::write(
        temp.path().join("protopack.toml"),
        "[package]\nname = \"ddex\"\nnamespace = \"ddex\"\n",
    )
    .unwrap();

    protopack()
        .current_dir(temp.path())
        .arg("manifest")
        .assert()
        .success()
        .stdout(predicate::str::contains("  ddex.conformance\n"))
        .stdout(predicate::str::contains("  ddex/schemas/sales-reports/v1:\n"));
}

#[test]
fn test_build_with_current_outputs_needs_no_compiler() {
    let temp = create_temp_project();
    mark_outputs_current(temp.path());

    protopack()
        .current_dir(temp.path())
        .env_remove("PROTOC")
        .env("PATH", "")
        .arg("build")
        .assert()
        .success()
        .stdout(predicate::str::contains("0 generated, 1 up to date"));

    let build = temp.path().join("build");
    assert!(build.join("manifest.json").is_file());
    assert!(build.join("report.json").is_file());
    assert!(build.join("lib/dsrf/proto/block_pb2.py").is_file());
    assert!(build.join("dsrf/schemas/sales-reports/v1/dsrf.xsd").is_file());
    assert!(build.join("dsrf/schemas/ugc/v1/ugc.xsd").is_file());
}

#[cfg(unix)]
#[test]
fn test_build_regenerates_with_override_compiler() {
    let temp = create_temp_project();
    let exe = install_fake_protoc(temp.path(), GENERATING_PROTOC);
    let out = temp.path().join("dist");

    protopack()
        .current_dir(temp.path())
        .env("PROTOC", &exe)
        .env("RUST_LOG", "info")
        .arg("build")
        .arg("--out-dir")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 generated"))
        .stderr(predicate::str::contains("Running command:"));

    assert!(temp.path().join("proto/block_pb2.py").is_file());
    assert!(out.join("lib/dsrf/proto/block_pb2.py").is_file());
}

#[cfg(unix)]
#[test]
fn test_build_fails_when_compiler_fails() {
    let temp = create_temp_project();
    let exe = install_fake_protoc(temp.path(), "#!/bin/sh\nexit 3\n");

    protopack()
        .current_dir(temp.path())
        .env("PROTOC", &exe)
        .arg("build")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "Error encountered while compiling proto file",
        ));

    assert!(!temp.path().join("build/manifest.json").exists());
}

#[test]
fn test_generate_without_proto_dir_fails() {
    let temp = create_temp_project();

    protopack()
        .current_dir(temp.path())
        .args(["generate", "--proto-dir", "missing"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("does not exist"));
}

#[cfg(unix)]
#[test]
fn test_generate_reports_each_output() {
    let temp = create_temp_project();
    let exe = install_fake_protoc(temp.path(), GENERATING_PROTOC);

    protopack()
        .current_dir(temp.path())
        .env("PROTOC", &exe)
        .arg("generate")
        .assert()
        .success()
        .stdout(predicate::str::contains("block_pb2.py: generated"));
}
