use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};

use crate::{Header, HeaderEntry};

pub(crate) trait Serialize {
    fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()>;
}

impl Serialize for str {
    fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(self.as_bytes())?;
        writer.write_u8(0)
    }
}

impl Serialize for HeaderEntry {
    fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        self.name.as_str().write(writer)?;
        writer.write_u32::<LittleEndian>(self.size)
    }
}

impl Serialize for Header {
    fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_u32::<LittleEndian>(self.file_count())?;

        for entry in self.entries.iter() {
            entry.write(writer)?;
        }

        tracing::debug!(
            bytes = self.byte_size(),
            count = self.file_count(),
            "serialized Header"
        );
        Ok(())
    }
}

impl Header {
    /// Writes the header at the writer's current position.
    pub fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        Serialize::write(self, writer)
    }
}
