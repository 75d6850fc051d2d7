use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, ObjectBox};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_kind::ObjectKind;
use crate::artifacts::objects::tag::Tag;
use crate::artifacts::objects::tree::Tree;
use crate::errors::KegError;
use anyhow::Context;
use bytes::Bytes;
use fake::rand;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};

/// Content-addressable object database
///
/// Maps an object ID to a zlib-compressed envelope on disk, sharded as
/// `<objects>/<id[0..2]>/<id[2..]>`. Objects are immutable and write-once:
/// storing the same content twice is a no-op, and a stored file is never
/// modified afterwards.
#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    /// Store an object, returning its content address
    ///
    /// If an object with the same address already exists on disk the write
    /// is skipped: content addressing makes the second write byte-identical
    /// to the first, so there is nothing to arbitrate.
    pub fn store(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        let oid = object.object_id()?;
        let object_path = self.path.join(oid.to_path());

        if !object_path.exists() {
            std::fs::create_dir_all(
                object_path
                    .parent()
                    .context(format!("Invalid object path {}", object_path.display()))?,
            )
            .context(format!(
                "Unable to create object directory {}",
                object_path.display()
            ))?;

            self.write_object(object_path, object.serialize()?)?;
        }

        Ok(oid)
    }

    /// Whether an object with this address exists on disk
    pub fn exists(&self, object_id: &ObjectId) -> bool {
        self.path.join(object_id.to_path()).exists()
    }

    /// Load an object's kind and payload, validating the envelope
    ///
    /// Fails with `ObjectNotFound` if the sharded path is absent, and with
    /// `CorruptObject` if decompression fails, the header is malformed, or
    /// the declared length disagrees with the actual payload length.
    pub fn load(&self, object_id: &ObjectId) -> anyhow::Result<(ObjectKind, Bytes)> {
        let envelope = self.read_object(object_id)?;

        let mut reader = Cursor::new(envelope.as_ref());
        let (kind, declared_size) =
            ObjectKind::parse_header(&mut reader).map_err(|err| {
                if err.downcast_ref::<KegError>().is_some() {
                    err
                } else {
                    anyhow::Error::from(KegError::CorruptObject {
                        oid: object_id.clone(),
                        reason: err.to_string(),
                    })
                }
            })?;

        let payload = envelope.slice(reader.position() as usize..);
        if payload.len() != declared_size {
            return Err(KegError::CorruptObject {
                oid: object_id.clone(),
                reason: format!(
                    "declared size {declared_size} but payload is {} bytes",
                    payload.len()
                ),
            }
            .into());
        }

        Ok((kind, payload))
    }

    /// Load and decode an object into its typed form
    pub fn parse_object(&self, object_id: &ObjectId) -> anyhow::Result<ObjectBox> {
        let (kind, payload) = self.load(object_id)?;

        ObjectBox::parse(kind, Cursor::new(payload))
            .with_context(|| format!("Unable to decode object {object_id}"))
    }

    pub fn parse_object_as_blob(&self, object_id: &ObjectId) -> anyhow::Result<Option<Blob>> {
        match self.parse_object(object_id)? {
            ObjectBox::Blob(blob) => Ok(Some(*blob)),
            _ => Ok(None),
        }
    }

    pub fn parse_object_as_tree(&self, object_id: &ObjectId) -> anyhow::Result<Option<Tree>> {
        match self.parse_object(object_id)? {
            ObjectBox::Tree(tree) => Ok(Some(*tree)),
            _ => Ok(None),
        }
    }

    pub fn parse_object_as_commit(&self, object_id: &ObjectId) -> anyhow::Result<Option<Commit>> {
        match self.parse_object(object_id)? {
            ObjectBox::Commit(commit) => Ok(Some(*commit)),
            _ => Ok(None),
        }
    }

    pub fn parse_object_as_tag(&self, object_id: &ObjectId) -> anyhow::Result<Option<Tag>> {
        match self.parse_object(object_id)? {
            ObjectBox::Tag(tag) => Ok(Some(*tag)),
            _ => Ok(None),
        }
    }

    /// Get the kind of an object without decoding its payload
    pub fn kind_of(&self, object_id: &ObjectId) -> anyhow::Result<ObjectKind> {
        let (kind, _) = self.load(object_id)?;
        Ok(kind)
    }

    fn read_object(&self, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        let object_path = self.path.join(object_id.to_path());

        if !object_path.exists() {
            return Err(KegError::ObjectNotFound(object_id.clone()).into());
        }

        let compressed = std::fs::read(&object_path).context(format!(
            "Unable to read object file {}",
            object_path.display()
        ))?;

        Self::decompress(compressed.into()).map_err(|err| {
            KegError::CorruptObject {
                oid: object_id.clone(),
                reason: err.to_string(),
            }
            .into()
        })
    }

    fn write_object(&self, object_path: PathBuf, object_content: Bytes) -> anyhow::Result<()> {
        let object_dir = object_path
            .parent()
            .context(format!("Invalid object path {}", object_path.display()))?;
        let temp_object_path = object_dir.join(Self::generate_temp_name());

        // compress the object content
        let object_content = Self::compress(object_content)?;

        let mut file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_object_path)
            .context(format!(
                "Unable to open object file {}",
                temp_object_path.display()
            ))?;

        file.write_all(&object_content).context(format!(
            "Unable to write object file {}",
            temp_object_path.display()
        ))?;

        // rename the temp file to the object file to make it atomic
        std::fs::rename(&temp_object_path, &object_path).context(format!(
            "Unable to rename object file to {}",
            object_path.display()
        ))?;

        Ok(())
    }

    fn compress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(&data)
            .context("Unable to compress object content")?;

        encoder
            .finish()
            .map(|compressed_content| compressed_content.into())
            .context("Unable to finish compressing object content")
    }

    fn decompress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(&*data);
        let mut decompressed_content = Vec::new();
        decoder
            .read_to_end(&mut decompressed_content)
            .context("Unable to decompress object content")?;

        Ok(decompressed_content.into())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }
}
