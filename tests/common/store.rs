//! Library-level seeding helpers for integration tests

use bytes::Bytes;
use keg::areas::database::Database;
use keg::artifacts::objects::blob::Blob;
use keg::artifacts::objects::commit::Commit;
use keg::artifacts::objects::object_id::ObjectId;
use keg::artifacts::objects::tree::{EntryMode, Tree, TreeEntry};
use std::path::Path;

pub const AUTHOR: &str = "Alice Example <alice@example.com> 1700000000 +0000";

pub fn database_at(repository_dir: &Path) -> Database {
    Database::new(
        repository_dir
            .join(".keg")
            .join("objects")
            .into_boxed_path(),
    )
}

pub fn store_blob(database: &Database, content: &[u8]) -> ObjectId {
    database
        .store(&Blob::new(Bytes::copy_from_slice(content)))
        .expect("Failed to store blob")
}

pub fn store_tree(database: &Database, entries: &[(&str, &str, &ObjectId)]) -> ObjectId {
    let entries = entries
        .iter()
        .map(|(mode, name, oid)| {
            TreeEntry::new(
                EntryMode::try_parse(mode).expect("invalid mode"),
                name.to_string(),
                (*oid).clone(),
            )
        })
        .collect::<Vec<_>>();

    database
        .store(&Tree::new(entries))
        .expect("Failed to store tree")
}

pub fn store_commit(
    database: &Database,
    tree: &ObjectId,
    parents: &[ObjectId],
    message: &str,
) -> ObjectId {
    database
        .store(&Commit::new(tree, parents, AUTHOR, AUTHOR, message))
        .expect("Failed to store commit")
}
