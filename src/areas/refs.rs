//! References (branches, tags, HEAD)
//!
//! References are human-readable names pointing at objects. A reference
//! file holds either:
//! - a 40-character object ID (direct reference), or
//! - `ref: <path>` naming another reference (symbolic reference)
//!
//! References live in a namespace tree under the control directory:
//! `refs/heads/` for branches, `refs/tags/` for tags, plus the
//! distinguished `HEAD`.

use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::KegError;
use anyhow::Context;
use derive_new::new;
use file_guard::Lock;
use std::collections::{BTreeMap, HashSet};
use std::io::Write;
use std::ops::DerefMut;
use std::path::Path;
use walkdir::WalkDir;

/// Regex pattern for parsing symbolic references
const SYMREF_REGEX: &str = r"^ref: (.+)$";

/// Name of the HEAD reference
pub const HEAD_REF_NAME: &str = "HEAD";

/// One level of a reference listing: leaf addresses or nested namespaces,
/// lexicographically ordered by name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefNode {
    Direct(ObjectId),
    Namespace(BTreeMap<String, RefNode>),
}

/// Reference reader/writer rooted at the control directory
#[derive(Debug, new)]
pub struct Refs {
    /// Path to the control directory holding `HEAD` and `refs/`
    path: Box<Path>,
}

impl Refs {
    /// Resolve a reference path to the object ID it ultimately names
    ///
    /// Symbolic references are followed recursively. The chain is bounded
    /// by a visited set: revisiting a path fails with `ReferenceCycle`
    /// instead of recursing forever, and a chain ending at a missing file
    /// fails with `DanglingReference`.
    pub fn resolve(&self, ref_path: &str) -> anyhow::Result<ObjectId> {
        let mut visited = HashSet::new();
        self.resolve_with_visited(ref_path, &mut visited)
    }

    fn resolve_with_visited(
        &self,
        ref_path: &str,
        visited: &mut HashSet<String>,
    ) -> anyhow::Result<ObjectId> {
        if !visited.insert(ref_path.to_string()) {
            return Err(KegError::ReferenceCycle(ref_path.to_string()).into());
        }

        let file_path = self.path.join(ref_path);
        if !file_path.exists() {
            return Err(KegError::DanglingReference(ref_path.to_string()).into());
        }

        let content = std::fs::read_to_string(&file_path)
            .with_context(|| format!("failed to read ref file at {file_path:?}"))?;
        // strip exactly one trailing newline; the rest of the record is verbatim
        let content = content.strip_suffix('\n').unwrap_or(&content);

        let symref_match = regex::Regex::new(SYMREF_REGEX)?.captures(content);
        match symref_match {
            Some(symref_match) => self.resolve_with_visited(&symref_match[1], visited),
            None => ObjectId::try_parse(content.to_string())
                .with_context(|| format!("ref {ref_path} does not hold a valid object ID")),
        }
    }

    /// List a reference namespace as a sorted name tree
    ///
    /// Directories nest recursively; every leaf is resolved to its concrete
    /// address. Listing order is lexicographic at each level, which makes
    /// reference listings deterministic.
    pub fn list(&self, namespace: &str) -> anyhow::Result<BTreeMap<String, RefNode>> {
        let dir_path = self.path.join(namespace);
        if !dir_path.is_dir() {
            return Err(KegError::NotADirectory(dir_path).into());
        }

        self.list_dir(&dir_path, namespace)
    }

    fn list_dir(&self, dir_path: &Path, namespace: &str) -> anyhow::Result<BTreeMap<String, RefNode>> {
        let mut listing = BTreeMap::new();

        for entry in std::fs::read_dir(dir_path)
            .with_context(|| format!("failed to list refs under {dir_path:?}"))?
        {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();
            let ref_path = format!("{namespace}/{name}");

            let node = if entry.path().is_dir() {
                RefNode::Namespace(self.list_dir(&entry.path(), &ref_path)?)
            } else {
                RefNode::Direct(self.resolve(&ref_path)?)
            };

            listing.insert(name, node);
        }

        Ok(listing)
    }

    /// Flat, sorted list of every reference path under `refs/`
    pub fn list_all_refs(&self) -> anyhow::Result<Vec<String>> {
        Ok(WalkDir::new(self.refs_path())
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                if entry.path().is_file() {
                    let relative_path = entry.path().strip_prefix(self.path.as_ref()).ok()?;
                    Some(relative_path.to_string_lossy().to_string())
                } else {
                    None
                }
            })
            .collect::<Vec<_>>())
    }

    /// Overwrite a reference file, creating parent directories as needed
    ///
    /// The write happens under an exclusive file lock: object writes are
    /// idempotent by content addressing, but a reference can be legitimately
    /// repointed, so concurrent writers need mutual exclusion.
    pub fn update_ref_file(&self, ref_path: &str, raw_ref: String) -> anyhow::Result<()> {
        let file_path = self.path.join(ref_path);

        std::fs::create_dir_all(file_path.parent().with_context(|| {
            format!("failed to create parent directories for ref file at {file_path:?}")
        })?)?;

        let mut ref_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&file_path)
            .with_context(|| format!("failed to open ref file at {file_path:?}"))?;
        let mut lock = file_guard::lock(&mut ref_file, Lock::Exclusive, 0, 1)?;
        lock.deref_mut().write_all(raw_ref.as_bytes())?;
        lock.deref_mut().write_all(b"\n")?;

        Ok(())
    }

    /// Whether a reference file exists at this path
    pub fn ref_exists(&self, ref_path: &str) -> bool {
        self.path.join(ref_path).exists()
    }

    pub fn head_path(&self) -> Box<Path> {
        self.path.join(HEAD_REF_NAME).into_boxed_path()
    }

    pub fn refs_path(&self) -> Box<Path> {
        self.path.join("refs").into_boxed_path()
    }

    pub fn heads_path(&self) -> Box<Path> {
        self.refs_path().join("heads").into_boxed_path()
    }

    pub fn tags_path(&self) -> Box<Path> {
        self.refs_path().join("tags").into_boxed_path()
    }
}
