use assert_fs::TempDir;
use keg::areas::refs::Refs;
use keg::artifacts::objects::object_kind::ObjectKind;
use keg::artifacts::objects::tag::Tag;
use predicates::prelude::predicate;
use rstest::rstest;

mod common;
use common::command::{init_repository_dir, run_keg_command};
use common::store::{AUTHOR, database_at, store_blob, store_commit, store_tree};

const HELLO_BLOB_OID: &str = "ce013625030ba8dba906f756967f9e9ca394464a";

#[rstest]
fn annotated_tags_peel_down_to_their_target(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;
    let database = database_at(dir.path());

    let blob = store_blob(&database, b"hello\n");
    let tree = store_tree(&database, &[("100644", "greeting.txt", &blob)]);
    let commit = store_commit(&database, &tree, &[], "root\n");

    let tag = Tag::new(&commit, ObjectKind::Commit, "v1.0", AUTHOR, "First release\n");
    let tag_oid = database.store(&tag)?;

    let refs = Refs::new(dir.path().join(".keg").into_boxed_path());
    refs.update_ref_file("refs/tags/v1.0", tag_oid.to_string())?;

    // cat-file shows the tag object itself
    run_keg_command(dir.path(), &["cat-file", "v1.0"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("object {commit}")))
        .stdout(predicate::str::contains("First release"));

    // ls-tree peels tag -> commit -> tree
    let expected = format!("100644 blob {HELLO_BLOB_OID}\tgreeting.txt\n");
    run_keg_command(dir.path(), &["ls-tree", "v1.0"])
        .assert()
        .success()
        .stdout(expected);

    // log peels too; a root commit has no edges
    run_keg_command(dir.path(), &["log", "v1.0"])
        .assert()
        .success()
        .stdout("digraph log{\n}\n");

    Ok(())
}
