use assert_fs::TempDir;
use keg::areas::refs::Refs;
use keg::artifacts::log::rev_walk::RevWalk;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;
use common::command::{init_repository_dir, run_keg_command};
use common::store::{database_at, store_blob, store_commit, store_tree};

/// Seed a diamond-shaped history and return (a, b, c, d):
/// `d` merges `b` and `c`, which both descend from the root `a`.
fn seed_diamond(dir: &TempDir) -> Vec<keg::artifacts::objects::object_id::ObjectId> {
    let database = database_at(dir.path());
    let blob = store_blob(&database, b"hello\n");
    let tree = store_tree(&database, &[("100644", "greeting.txt", &blob)]);

    let a = store_commit(&database, &tree, &[], "root\n");
    let b = store_commit(&database, &tree, std::slice::from_ref(&a), "left\n");
    let c = store_commit(&database, &tree, std::slice::from_ref(&a), "right\n");
    let d = store_commit(&database, &tree, &[b.clone(), c.clone()], "merge\n");

    vec![a, b, c, d]
}

#[rstest]
fn diamond_history_yields_each_edge_once_in_depth_first_order(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;
    let oids = seed_diamond(&dir);
    let (a, b, c, d) = (&oids[0], &oids[1], &oids[2], &oids[3]);

    let database = database_at(dir.path());
    let edges = RevWalk::new(&database, d)?.collect::<Result<Vec<_>, _>>()?;

    assert_eq!(
        edges,
        vec![
            (d.clone(), b.clone()),
            (b.clone(), a.clone()),
            (d.clone(), c.clone()),
            (c.clone(), a.clone()),
        ]
    );

    Ok(())
}

#[rstest]
fn root_commit_history_has_no_edges(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;
    let oids = seed_diamond(&dir);
    let a = &oids[0];

    let database = database_at(dir.path());
    let edges = RevWalk::new(&database, a)?.collect::<Result<Vec<_>, _>>()?;

    assert!(edges.is_empty());

    Ok(())
}

#[rstest]
fn log_prints_the_history_as_a_digraph(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;
    let oids = seed_diamond(&dir);
    let (a, b, c, d) = (&oids[0], &oids[1], &oids[2], &oids[3]);

    let refs = Refs::new(dir.path().join(".keg").into_boxed_path());
    refs.update_ref_file("refs/heads/master", d.to_string())?;

    let expected = format!(
        "digraph log{{\n  c_{d} -> c_{b};\n  c_{b} -> c_{a};\n  c_{d} -> c_{c};\n  c_{c} -> c_{a};\n}}\n"
    );

    run_keg_command(dir.path(), &["log"])
        .assert()
        .success()
        .stdout(expected);

    Ok(())
}
