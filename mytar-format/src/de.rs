use std::io::{BufRead, Seek};

use byteorder::{LittleEndian, ReadBytesExt};

use crate::{Header, HeaderEntry};

// Entries reserved ahead of parsing. The declared count is untrusted.
const MAX_PREALLOCATED_ENTRIES: usize = 1024;

pub(crate) trait DeserializeOwned {
    fn deserialize_owned<R: BufRead + Seek>(reader: &mut R) -> std::io::Result<Self>
    where
        Self: Sized;
}

/// Reads a NUL-terminated UTF-8 string, leaving the reader one byte past the terminator.
pub fn read_string<R: BufRead + ?Sized>(reader: &mut R) -> std::io::Result<String> {
    let mut buf = vec![];
    reader.read_until(0, &mut buf)?;

    if buf.pop() != Some(0) {
        return Err(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "string is missing its NUL terminator",
        ));
    }

    String::from_utf8(buf).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

/// Parses the archive header. On success the reader sits at the start of the data section.
pub fn read_header<R: BufRead + Seek>(reader: &mut R) -> std::io::Result<Header> {
    Header::deserialize_owned(reader)
}

impl DeserializeOwned for String {
    fn deserialize_owned<R: BufRead + Seek>(reader: &mut R) -> std::io::Result<Self> {
        let start = reader.stream_position()?;
        let value = read_string(reader)?;
        let end = reader.stream_position()?;
        tracing::debug!(
            start = format_args!("{:#x}", start),
            end = format_args!("{:#x}", end),
            bytes = end - start,
            len = value.len(),
            "deserialized String"
        );
        Ok(value)
    }
}

impl DeserializeOwned for HeaderEntry {
    fn deserialize_owned<R: BufRead + Seek>(reader: &mut R) -> std::io::Result<Self> {
        let start = reader.stream_position()?;
        let name = String::deserialize_owned(reader)?;
        let size = reader.read_u32::<LittleEndian>()?;
        let end = reader.stream_position()?;
        tracing::debug!(start = format_args!("{:#x}", start), end = format_args!("{:#x}", end), bytes = end - start, %name, size, "deserialized HeaderEntry");

        Ok(HeaderEntry { name, size })
    }
}

impl DeserializeOwned for Header {
    fn deserialize_owned<R: BufRead + Seek>(reader: &mut R) -> std::io::Result<Self> {
        let start = reader.stream_position()?;
        let count = reader.read_u32::<LittleEndian>()?;

        let mut entries = Vec::with_capacity((count as usize).min(MAX_PREALLOCATED_ENTRIES));
        for index in 0..count {
            let entry = HeaderEntry::deserialize_owned(reader).map_err(|e| {
                std::io::Error::new(e.kind(), format!("header entry {}: {}", index, e))
            })?;
            entries.push(entry);
        }

        let end = reader.stream_position()?;
        tracing::debug!(
            start = format_args!("{:#x}", start),
            end = format_args!("{:#x}", end),
            bytes = end - start,
            count,
            "deserialized Header"
        );

        Ok(Header { entries })
    }
}
