//! Key-value list with message
//!
//! The text structure shared by commit and tag objects: a run of
//! `key value` header lines, a blank line, then a free-text message.
//!
//! ## Format
//!
//! ```text
//! tree 29ff16c9c14e2652b22f8b78bb08a5a07930c147
//! parent 206941306e8a8af65b66eaaaea388a7ae24d49a0
//! author Alice <alice@example.com> 1527025023 +0200
//!
//! Initial commit
//! ```
//!
//! Values may span lines: every line after the first is emitted with a
//! single leading space, and folded back with an embedded newline on parse.
//! Repeated keys (such as the parents of a merge commit) accumulate into a
//! value list in encounter order. Key order, intra-key value order, and
//! unknown keys all survive a parse/serialize round trip byte for byte.
//!
//! The message is held under a reserved empty key so it travels through the
//! same field list as everything else, but it is always serialized last,
//! after the blank separator line.

use bytes::Bytes;

/// Reserved key holding the trailing free-text message
const MESSAGE_KEY: &[u8] = b"";

/// Order-preserving multimap backing commit and tag objects
///
/// Implemented as a sequence of `(key, values)` pairs rather than a hash
/// map: both the key order and the order of values within a repeated key
/// are part of the on-disk contract.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Kvlm {
    fields: Vec<(Bytes, Vec<Bytes>)>,
}

impl Kvlm {
    /// Parse the payload of a commit or tag object
    ///
    /// Scans header lines until the blank separator; everything after it is
    /// the verbatim message. Continuation lines (single leading space) are
    /// un-indented and folded into the current value with a newline.
    pub fn parse(data: &[u8]) -> anyhow::Result<Self> {
        let mut kvlm = Kvlm::default();
        let mut pos = 0;

        loop {
            if pos >= data.len() {
                // headers ran out without a separator line: empty message
                kvlm.fields.push((Bytes::new(), vec![Bytes::new()]));
                break;
            }

            if data[pos] == b'\n' {
                // blank line: the rest of the payload is the message
                let message = Bytes::copy_from_slice(&data[pos + 1..]);
                kvlm.fields.push((Bytes::new(), vec![message]));
                break;
            }

            let line_end = find_byte(data, pos, b'\n').unwrap_or(data.len());
            let space = match find_byte(&data[..line_end], pos, b' ') {
                Some(space) => space,
                None => anyhow::bail!("malformed header line: missing key separator"),
            };

            let key = Bytes::copy_from_slice(&data[pos..space]);
            if key.is_empty() {
                anyhow::bail!("malformed header line: empty key");
            }

            // Collect the value, folding continuation lines
            let mut value = Vec::new();
            let mut cursor = space + 1;
            loop {
                let nl = find_byte(data, cursor, b'\n').unwrap_or(data.len());
                value.extend_from_slice(&data[cursor..nl]);

                if nl + 1 < data.len() && data[nl + 1] == b' ' {
                    value.push(b'\n');
                    cursor = nl + 2;
                } else {
                    pos = (nl + 1).min(data.len());
                    break;
                }
            }

            kvlm.push(key, Bytes::from(value));
        }

        Ok(kvlm)
    }

    /// Serialize back to the on-disk payload
    ///
    /// Keys are emitted in stored order, each value on its own header line
    /// with embedded newlines indented by one space; the message always
    /// comes last, after the blank separator.
    pub fn serialize(&self) -> Bytes {
        let mut out = Vec::new();

        for (key, values) in &self.fields {
            if key.as_ref() == MESSAGE_KEY {
                continue;
            }

            for value in values {
                out.extend_from_slice(key);
                out.push(b' ');
                for &byte in value.iter() {
                    out.push(byte);
                    if byte == b'\n' {
                        out.push(b' ');
                    }
                }
                out.push(b'\n');
            }
        }

        out.push(b'\n');
        out.extend_from_slice(&self.message());

        Bytes::from(out)
    }

    /// Append a value under the given key, preserving encounter order
    ///
    /// A repeated key extends its existing value list; it is never
    /// overwritten.
    pub fn push(&mut self, key: Bytes, value: Bytes) {
        match self.fields.iter_mut().find(|(k, _)| k == &key) {
            Some((_, values)) => values.push(value),
            None => self.fields.push((key, vec![value])),
        }
    }

    pub fn set_message(&mut self, message: Bytes) {
        match self
            .fields
            .iter_mut()
            .find(|(k, _)| k.as_ref() == MESSAGE_KEY)
        {
            Some((_, values)) => *values = vec![message],
            None => self.fields.push((Bytes::new(), vec![message])),
        }
    }

    /// All values stored under a key, in original order
    pub fn get(&self, key: &[u8]) -> Option<&[Bytes]> {
        self.fields
            .iter()
            .find(|(k, _)| k.as_ref() == key)
            .map(|(_, values)| values.as_slice())
    }

    /// First value stored under a key
    pub fn first(&self, key: &[u8]) -> Option<&Bytes> {
        self.get(key).and_then(|values| values.first())
    }

    /// The trailing free-text message (empty if never set)
    pub fn message(&self) -> Bytes {
        self.first(MESSAGE_KEY).cloned().unwrap_or_default()
    }
}

fn find_byte(data: &[u8], from: usize, needle: u8) -> Option<usize> {
    data[from..]
        .iter()
        .position(|&byte| byte == needle)
        .map(|offset| from + offset)
}
