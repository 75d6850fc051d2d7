use crate::errors::KegError;
use std::io::BufRead;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Blob,
    Tree,
    Commit,
    Tag,
}

impl ObjectKind {
    pub fn as_str(&self) -> &str {
        match self {
            ObjectKind::Blob => "blob",
            ObjectKind::Tree => "tree",
            ObjectKind::Commit => "commit",
            ObjectKind::Tag => "tag",
        }
    }

    /// Parse the envelope header `<kind> <size>\0` from the reader.
    ///
    /// Leaves the reader positioned at the first payload byte and returns the
    /// kind together with the declared payload size, which the caller must
    /// check against the actual payload length.
    pub fn parse_header(data_reader: &mut impl BufRead) -> anyhow::Result<(ObjectKind, usize)> {
        let mut kind = Vec::new();
        data_reader.read_until(b' ', &mut kind)?;
        if kind.pop() != Some(b' ') {
            anyhow::bail!("truncated object header: missing kind separator");
        }

        let kind = String::from_utf8(kind)?;
        let kind = ObjectKind::try_from(kind.as_str())?;

        let mut size = Vec::new();
        data_reader.read_until(b'\0', &mut size)?;
        if size.pop() != Some(b'\0') {
            anyhow::bail!("truncated object header: missing size terminator");
        }

        let size = String::from_utf8(size)?
            .parse::<usize>()
            .map_err(|err| anyhow::anyhow!("invalid object size: {err}"))?;

        Ok((kind, size))
    }
}

impl TryFrom<&str> for ObjectKind {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> anyhow::Result<Self> {
        match value {
            "blob" => Ok(ObjectKind::Blob),
            "tree" => Ok(ObjectKind::Tree),
            "commit" => Ok(ObjectKind::Commit),
            "tag" => Ok(ObjectKind::Tag),
            _ => Err(KegError::UnknownObjectKind(value.to_string()).into()),
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
