use assert_fs::prelude::PathChild;
use predicates::prelude::predicate;

mod common;

#[test]
fn init_repository_at_path_successfully() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    let git_path = dir.path().canonicalize()?.join(".git");
    let mut sut = assert_cmd::Command::cargo_bin("bitstore")?;

    sut.arg("init").arg(dir.path());

    sut.assert()
        .success()
        .stdout(predicate::str::is_match(
            r"^Initialized empty Git repository in .+\n$",
        )?)
        .stdout(predicate::str::contains(git_path.display().to_string()));

    assert!(dir.child(".git/objects").path().is_dir());
    assert!(dir.child(".git/refs").path().is_dir());
    pretty_assertions::assert_eq!(
        std::fs::read_to_string(dir.child(".git/HEAD").path())?,
        "ref: refs/heads/master\n"
    );

    Ok(())
}

#[test]
fn init_repository_creates_missing_directory() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    let target = dir.child("nested/repo");

    common::bitstore(dir.path())
        .arg("init")
        .arg(target.path())
        .assert()
        .success();

    assert!(target.child(".git/objects").path().is_dir());

    Ok(())
}

#[test]
fn init_repository_in_current_directory() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;

    common::init_repository(dir.path());

    assert!(dir.child(".git/objects").path().is_dir());

    Ok(())
}

#[test]
fn reinit_keeps_existing_head() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    common::init_repository(dir.path());
    std::fs::write(dir.child(".git/HEAD").path(), "ref: refs/heads/main\n")?;

    common::init_repository(dir.path());

    pretty_assertions::assert_eq!(
        std::fs::read_to_string(dir.child(".git/HEAD").path())?,
        "ref: refs/heads/main\n"
    );

    Ok(())
}
