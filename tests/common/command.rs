use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_keg_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    repository_dir
}

pub fn run_keg_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("keg").expect("Failed to find keg binary");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}
