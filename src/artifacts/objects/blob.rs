//! Blob object
//!
//! Blobs store raw file content. They carry no metadata; names and modes
//! live in the trees that reference them.
//!
//! ## Format
//!
//! On disk: `blob <size>\0<content>`

use crate::artifacts::objects::object::Unpackable;
use crate::artifacts::objects::object::{Object, Packable};
use crate::artifacts::objects::object_kind::ObjectKind;
use bytes::Bytes;
use derive_new::new;
use std::io::{BufRead, Write};

/// Blob object holding opaque file content
///
/// The codec is the identity function: the payload is the literal file
/// content, byte for byte.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Blob {
    content: Bytes,
}

impl Blob {
    pub fn content(&self) -> &Bytes {
        &self.content
    }
}

impl Packable for Blob {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut blob_bytes = Vec::new();
        let header = format!("{} {}\0", self.object_kind().as_str(), self.content.len());
        blob_bytes.write_all(header.as_bytes())?;
        blob_bytes.write_all(&self.content)?;

        Ok(Bytes::from(blob_bytes))
    }
}

impl Unpackable for Blob {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        // the header has already been read
        let content = reader
            .bytes()
            .collect::<Result<Vec<u8>, std::io::Error>>()?;

        Ok(Self::new(content.into()))
    }
}

impl Object for Blob {
    fn object_kind(&self) -> ObjectKind {
        ObjectKind::Blob
    }

    fn display(&self) -> String {
        String::from_utf8_lossy(&self.content).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn hashes_hello_to_the_reference_address() {
        let blob = Blob::new(Bytes::from_static(b"hello\n"));

        assert_eq!(
            blob.serialize().unwrap(),
            Bytes::from_static(b"blob 6\0hello\n")
        );
        assert_eq!(
            blob.object_id().unwrap().as_ref(),
            "ce013625030ba8dba906f756967f9e9ca394464a"
        );
    }

    #[test]
    fn deserializes_payload_verbatim() {
        let payload = b"\x00\xffbinary\n";
        let blob = Blob::deserialize(&payload[..]).unwrap();

        assert_eq!(blob.content().as_ref(), payload);
    }
}
