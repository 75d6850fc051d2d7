//! Object types and codecs
//!
//! Everything in the store is an object identified by the SHA-1 hash of its
//! framed envelope. There are four kinds:
//!
//! - **Blob**: file content (raw bytes)
//! - **Tree**: directory listing (modes, names, and object IDs)
//! - **Commit**: snapshot with metadata (tree, parents, author, message)
//! - **Tag**: annotated reference to another object
//!
//! All objects serialize to the envelope format `<kind> <size>\0<payload>`;
//! commit and tag payloads share the key-value-list-with-message codec.

pub mod blob;
pub mod commit;
pub mod kvlm;
pub mod object;
pub mod object_id;
pub mod object_kind;
pub mod tag;
pub mod tree;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;
