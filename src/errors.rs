//! Error kinds surfaced by the object store core
//!
//! Every fallible operation in the core reports one of these kinds inside an
//! `anyhow::Error`, so callers can downcast to the specific failure while the
//! surrounding context strings stay attached.

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_kind::ObjectKind;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KegError {
    /// No object file exists at the address' sharded path
    #[error("object {0} not found")]
    ObjectNotFound(ObjectId),

    /// The stored bytes cannot be decompressed or the envelope is malformed
    #[error("corrupt object {oid}: {reason}")]
    CorruptObject { oid: ObjectId, reason: String },

    /// A tree payload ends in the middle of an entry record
    #[error("truncated tree entry after {parsed} complete entries")]
    TruncatedTree { parsed: usize },

    /// The envelope names a kind outside blob/tree/commit/tag
    #[error("unknown object kind {0:?}")]
    UnknownObjectKind(String),

    /// A reference chain ends at a path that does not exist
    #[error("dangling reference {0}")]
    DanglingReference(String),

    /// Symbolic resolution revisited a reference already on the chain
    #[error("reference cycle through {0}")]
    ReferenceCycle(String),

    /// Checkout destination is missing or not a directory
    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),

    /// Checkout destination already contains entries
    #[error("destination {0} is not empty")]
    NotEmptyDestination(PathBuf),

    /// A tree entry points at an object kind that cannot be materialized
    #[error("unsupported entry kind {0} in tree")]
    UnsupportedEntryKind(ObjectKind),
}
