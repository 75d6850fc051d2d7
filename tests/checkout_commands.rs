use assert_fs::TempDir;
use assert_fs::fixture::{FileWriteStr, PathChild};
use keg::areas::refs::Refs;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;
use common::command::{init_repository_dir, run_keg_command};
use common::store::{database_at, store_blob, store_commit, store_tree};

const HELLO_BLOB_OID: &str = "ce013625030ba8dba906f756967f9e9ca394464a";

#[rstest]
fn checkout_materializes_a_tree_into_an_empty_directory(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;
    let database = database_at(dir.path());

    let blob = store_blob(&database, b"hello\n");
    assert_eq!(blob.as_ref(), HELLO_BLOB_OID);
    let tree = store_tree(&database, &[("100644", "greeting.txt", &blob)]);

    run_keg_command(dir.path(), &["checkout", tree.as_ref(), "out"])
        .assert()
        .success();

    let content = std::fs::read_to_string(dir.path().join("out").join("greeting.txt"))?;
    assert_eq!(content, "hello\n");

    Ok(())
}

#[rstest]
fn checkout_recurses_into_nested_trees(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;
    let database = database_at(dir.path());

    let blob = store_blob(&database, b"fn main() {}\n");
    let nested = store_tree(&database, &[("100644", "main.rs", &blob)]);
    let root = store_tree(
        &database,
        &[("40000", "src", &nested), ("100644", "main.rs", &blob)],
    );

    run_keg_command(dir.path(), &["checkout", root.as_ref(), "out"])
        .assert()
        .success();

    assert!(dir.path().join("out").join("main.rs").is_file());
    assert!(dir.path().join("out").join("src").join("main.rs").is_file());

    Ok(())
}

#[rstest]
fn checkout_resolves_a_commit_revision_to_its_tree(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;
    let database = database_at(dir.path());

    let blob = store_blob(&database, b"hello\n");
    let tree = store_tree(&database, &[("100644", "greeting.txt", &blob)]);
    let commit = store_commit(&database, &tree, &[], "root\n");

    let refs = Refs::new(dir.path().join(".keg").into_boxed_path());
    refs.update_ref_file("refs/heads/master", commit.to_string())?;

    run_keg_command(dir.path(), &["checkout", "HEAD", "out"])
        .assert()
        .success();

    let content = std::fs::read_to_string(dir.path().join("out").join("greeting.txt"))?;
    assert_eq!(content, "hello\n");

    Ok(())
}

#[rstest]
fn checkout_refuses_a_non_empty_destination_and_writes_nothing(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;
    let database = database_at(dir.path());

    let blob = store_blob(&database, b"hello\n");
    let tree = store_tree(&database, &[("100644", "greeting.txt", &blob)]);

    dir.child("out/existing.txt").write_str("keep me")?;

    run_keg_command(dir.path(), &["checkout", tree.as_ref(), "out"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not empty"));

    let out = dir.path().join("out");
    assert!(!out.join("greeting.txt").exists());
    assert_eq!(std::fs::read_to_string(out.join("existing.txt"))?, "keep me");

    Ok(())
}

#[rstest]
fn commit_entry_in_a_tree_is_an_unsupported_entry_kind(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;
    let database = database_at(dir.path());

    let blob = store_blob(&database, b"hello\n");
    let snapshot = store_tree(&database, &[("100644", "greeting.txt", &blob)]);
    let commit = store_commit(&database, &snapshot, &[], "root\n");

    // a submodule-shaped entry: the tree points at a commit object
    let tree = store_tree(&database, &[("160000", "vendored", &commit)]);

    run_keg_command(dir.path(), &["checkout", tree.as_ref(), "out"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported entry kind"));

    Ok(())
}

#[rstest]
fn checkout_refuses_a_file_destination(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;
    let database = database_at(dir.path());

    let blob = store_blob(&database, b"hello\n");
    let tree = store_tree(&database, &[("100644", "greeting.txt", &blob)]);

    dir.child("out").write_str("a file, not a directory")?;

    run_keg_command(dir.path(), &["checkout", tree.as_ref(), "out"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a directory"));

    Ok(())
}
