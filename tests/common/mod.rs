#![allow(dead_code)]

use assert_cmd::Command;
use predicates::prelude::predicate;
use std::path::Path;

pub const HELLO_BLOB_OID: &str = "ce013625030ba8dba906f756967f9e9ca394464a";
pub const EMPTY_TREE_OID: &str = "4b825dc642cb6eb9a060e54bf8d69288fbee4904";

pub fn bitstore(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("bitstore").expect("Failed to find bitstore binary");
    cmd.current_dir(dir);
    cmd
}

pub fn init_repository(dir: &Path) {
    bitstore(dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Initialized empty Git repository in",
        ));
}

/// Run a command that prints a single object id and return the id
pub fn run_for_oid(cmd: &mut Command) -> String {
    let output = cmd.output().expect("Failed to run bitstore");
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    String::from_utf8(output.stdout)
        .expect("Output is not UTF-8")
        .trim()
        .to_string()
}

#[cfg(unix)]
pub fn set_mode(path: &Path, mode: u32) {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
        .unwrap_or_else(|e| panic!("Failed to set permissions on {:?}: {}", path, e));
}

#[cfg(not(unix))]
pub fn set_mode(_path: &Path, _mode: u32) {}
