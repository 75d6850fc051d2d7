//! Tag object
//!
//! Annotated tags share the commit payload shape: a key-value list with
//! message. The `object` key names the tagged target, `type` its kind,
//! `tag` the tag name, and `tagger` the identity line.

use crate::artifacts::objects::kvlm::Kvlm;
use crate::artifacts::objects::object::Unpackable;
use crate::artifacts::objects::object::{Object, Packable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_kind::ObjectKind;
use anyhow::Context;
use bytes::Bytes;
use std::io::{BufRead, Write};

/// Annotated tag object backed by its key-value field list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    kvlm: Kvlm,
}

impl Tag {
    pub fn new(
        target_oid: &ObjectId,
        target_kind: ObjectKind,
        name: &str,
        tagger: &str,
        message: &str,
    ) -> Self {
        let mut kvlm = Kvlm::default();

        kvlm.push(
            Bytes::from_static(b"object"),
            Bytes::copy_from_slice(target_oid.as_ref().as_bytes()),
        );
        kvlm.push(
            Bytes::from_static(b"type"),
            Bytes::copy_from_slice(target_kind.as_str().as_bytes()),
        );
        kvlm.push(
            Bytes::from_static(b"tag"),
            Bytes::copy_from_slice(name.as_bytes()),
        );
        kvlm.push(
            Bytes::from_static(b"tagger"),
            Bytes::copy_from_slice(tagger.as_bytes()),
        );
        kvlm.set_message(Bytes::copy_from_slice(message.as_bytes()));

        Tag { kvlm }
    }

    /// The object this tag points at
    pub fn target_oid(&self) -> anyhow::Result<ObjectId> {
        let target = self
            .kvlm
            .first(b"object")
            .context("tag has no object field")?;
        ObjectId::try_parse(String::from_utf8(target.to_vec())?)
    }

    /// The declared kind of the tagged object
    pub fn target_kind(&self) -> anyhow::Result<ObjectKind> {
        let kind = self.kvlm.first(b"type").context("tag has no type field")?;
        ObjectKind::try_from(std::str::from_utf8(kind)?)
    }

    pub fn name(&self) -> Option<&Bytes> {
        self.kvlm.first(b"tag")
    }

    pub fn tagger(&self) -> Option<&Bytes> {
        self.kvlm.first(b"tagger")
    }

    pub fn message(&self) -> Bytes {
        self.kvlm.message()
    }
}

impl Packable for Tag {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let content_bytes = self.kvlm.serialize();

        let mut tag_bytes = Vec::new();
        let header = format!("{} {}\0", self.object_kind().as_str(), content_bytes.len());
        tag_bytes.write_all(header.as_bytes())?;
        tag_bytes.write_all(&content_bytes)?;

        Ok(Bytes::from(tag_bytes))
    }
}

impl Unpackable for Tag {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let content = reader
            .bytes()
            .collect::<Result<Vec<u8>, std::io::Error>>()?;

        Ok(Tag {
            kvlm: Kvlm::parse(&content).context("invalid tag payload")?,
        })
    }
}

impl Object for Tag {
    fn object_kind(&self) -> ObjectKind {
        ObjectKind::Tag
    }

    fn display(&self) -> String {
        String::from_utf8_lossy(&self.kvlm.serialize()).to_string()
    }
}
