//! Commit object
//!
//! Commits tie a tree snapshot into history. Their payload is a key-value
//! list with message: a `tree` address, zero or more `parent` addresses
//! (zero only for a root commit, two or more for a merge), `author` and
//! `committer` lines, and a free-text message.
//!
//! Unknown keys (a `gpgsig` signature, for instance) are preserved verbatim
//! and survive a parse/serialize round trip, so a commit re-encoded by this
//! crate hashes to the same address it was stored under.

use crate::artifacts::objects::kvlm::Kvlm;
use crate::artifacts::objects::object::Unpackable;
use crate::artifacts::objects::object::{Object, Packable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_kind::ObjectKind;
use anyhow::Context;
use bytes::Bytes;
use std::io::{BufRead, Write};

/// Commit object backed by its key-value field list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    kvlm: Kvlm,
}

impl Commit {
    /// Build a commit with the canonical key order:
    /// `tree`, `parent`*, `author`, `committer`, message.
    pub fn new(
        tree_oid: &ObjectId,
        parents: &[ObjectId],
        author: &str,
        committer: &str,
        message: &str,
    ) -> Self {
        let mut kvlm = Kvlm::default();

        kvlm.push(
            Bytes::from_static(b"tree"),
            Bytes::copy_from_slice(tree_oid.as_ref().as_bytes()),
        );
        for parent in parents {
            kvlm.push(
                Bytes::from_static(b"parent"),
                Bytes::copy_from_slice(parent.as_ref().as_bytes()),
            );
        }
        kvlm.push(
            Bytes::from_static(b"author"),
            Bytes::copy_from_slice(author.as_bytes()),
        );
        kvlm.push(
            Bytes::from_static(b"committer"),
            Bytes::copy_from_slice(committer.as_bytes()),
        );
        kvlm.set_message(Bytes::copy_from_slice(message.as_bytes()));

        Commit { kvlm }
    }

    /// The tree snapshot this commit records
    pub fn tree_oid(&self) -> anyhow::Result<ObjectId> {
        let tree = self
            .kvlm
            .first(b"tree")
            .context("commit has no tree field")?;
        ObjectId::try_parse(String::from_utf8(tree.to_vec())?)
    }

    /// Parent addresses in listed order: empty for a root commit,
    /// two or more for a merge commit
    pub fn parents(&self) -> anyhow::Result<Vec<ObjectId>> {
        self.kvlm
            .get(b"parent")
            .unwrap_or_default()
            .iter()
            .map(|parent| ObjectId::try_parse(String::from_utf8(parent.to_vec())?))
            .collect()
    }

    pub fn author(&self) -> Option<&Bytes> {
        self.kvlm.first(b"author")
    }

    pub fn committer(&self) -> Option<&Bytes> {
        self.kvlm.first(b"committer")
    }

    pub fn message(&self) -> Bytes {
        self.kvlm.message()
    }

    /// First line of the message, for short-form display
    pub fn short_message(&self) -> String {
        String::from_utf8_lossy(&self.message())
            .lines()
            .next()
            .unwrap_or("")
            .to_string()
    }
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let content_bytes = self.kvlm.serialize();

        let mut commit_bytes = Vec::new();
        let header = format!("{} {}\0", self.object_kind().as_str(), content_bytes.len());
        commit_bytes.write_all(header.as_bytes())?;
        commit_bytes.write_all(&content_bytes)?;

        Ok(Bytes::from(commit_bytes))
    }
}

impl Unpackable for Commit {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let content = reader
            .bytes()
            .collect::<Result<Vec<u8>, std::io::Error>>()?;

        Ok(Commit {
            kvlm: Kvlm::parse(&content).context("invalid commit payload")?,
        })
    }
}

impl Object for Commit {
    fn object_kind(&self) -> ObjectKind {
        ObjectKind::Commit
    }

    fn display(&self) -> String {
        String::from_utf8_lossy(&self.kvlm.serialize()).to_string()
    }
}
