/// Bytes occupied on disk by the leading file count.
pub const FILE_COUNT_SIZE: u64 = 4;

/// Bytes occupied on disk by each entry's size field.
pub const ENTRY_SIZE_SIZE: u64 = 4;

/// One `(name, size)` pair of the archive header.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HeaderEntry {
    pub(crate) name: String,
    pub(crate) size: u32,
}

impl HeaderEntry {
    pub fn new<S: Into<String>>(name: S, size: u32) -> HeaderEntry {
        HeaderEntry {
            name: name.into(),
            size,
        }
    }

    #[inline(always)]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline(always)]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Bytes this entry occupies in the header: the name, its terminator, and the size field.
    #[inline(always)]
    pub fn encoded_len(&self) -> u64 {
        encoded_name_len(&self.name) + ENTRY_SIZE_SIZE
    }
}

#[inline(always)]
pub(crate) fn encoded_name_len(name: &str) -> u64 {
    name.len() as u64 + 1
}

/// Size of a header holding entries with the given names, independent of their sizes.
pub fn header_size<I, S>(names: I) -> u64
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names.into_iter().fold(FILE_COUNT_SIZE, |acc, name| {
        acc + encoded_name_len(name.as_ref()) + ENTRY_SIZE_SIZE
    })
}

/// The in-memory form of an archive header. Entry order is the data section order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    pub(crate) entries: Vec<HeaderEntry>,
}

impl Header {
    pub fn new(entries: Vec<HeaderEntry>) -> Header {
        Header { entries }
    }

    #[inline(always)]
    pub fn entries(&self) -> &[HeaderEntry] {
        &self.entries
    }

    #[inline(always)]
    pub fn into_entries(self) -> Vec<HeaderEntry> {
        self.entries
    }

    #[inline(always)]
    pub fn file_count(&self) -> u32 {
        self.entries.len() as u32
    }

    /// Exact number of bytes the serialized header occupies.
    pub fn byte_size(&self) -> u64 {
        header_size(self.entries.iter().map(|e| e.name()))
    }

    /// Offset of the first byte of entry `index` from the start of the archive.
    pub fn data_offset(&self, index: usize) -> Option<u64> {
        if index >= self.entries.len() {
            return None;
        }

        let preceding: u64 = self.entries[..index].iter().map(|e| e.size as u64).sum();
        Some(self.byte_size() + preceding)
    }

    /// Sum of every entry's size.
    pub fn data_size(&self) -> u64 {
        self.entries.iter().map(|e| e.size as u64).sum()
    }

    /// Length of a well-formed archive with this header.
    pub fn archive_size(&self) -> u64 {
        self.byte_size() + self.data_size()
    }
}
