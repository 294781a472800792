use std::fs::File;
use std::io::{prelude::*, BufReader, BufWriter, SeekFrom};
use std::path::Path;

use crate::{
    copy::copy_bytes,
    error::{Error, Result},
    header::{header_size, Header, HeaderEntry},
    path::{entry_name, validate_name},
};

const MAX_ENTRY_SIZE: u64 = u32::MAX as u64;

/// Remembers whether a write to `inner` failed, so a copy error can be attributed
/// to the archive rather than to the source.
struct WriteTracker<'a, W: Write> {
    inner: &'a mut W,
    failed: bool,
}

impl<'a, W: Write> WriteTracker<'a, W> {
    fn new(inner: &'a mut W) -> WriteTracker<'a, W> {
        WriteTracker {
            inner,
            failed: false,
        }
    }

    fn track<T>(&mut self, result: std::io::Result<T>) -> std::io::Result<T> {
        if let Err(e) = &result {
            if e.kind() != std::io::ErrorKind::Interrupted {
                self.failed = true;
            }
        }
        result
    }
}

impl<'a, W: Write> Write for WriteTracker<'a, W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let result = self.inner.write(buf);
        self.track(result)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        let result = self.inner.flush();
        self.track(result)
    }
}

/// Writes an archive whose entry names are fixed up front.
///
/// The header space is reserved on creation, entry data is appended in name order,
/// and the header is back-filled by [`ArchiveWriter::finish`].
#[derive(Debug)]
pub struct ArchiveWriter<W: Write + Seek> {
    inner: W,
    names: std::vec::IntoIter<String>,
    expected: usize,
    header: Header,
}

impl<W: Write + Seek> ArchiveWriter<W> {
    /// Validates `names` and positions `inner` just past the space their header needs.
    pub fn new(mut inner: W, names: Vec<String>) -> Result<ArchiveWriter<W>> {
        if names.len() > u32::MAX as usize {
            return Err(Error::TooManyEntries { count: names.len() });
        }

        for name in names.iter() {
            validate_name(name)?;
        }

        let header_size = header_size(&names);
        inner
            .seek(SeekFrom::Start(header_size))
            .map_err(|source| Error::WriteArchive { source })?;
        tracing::debug!(header_size, count = names.len(), "reserved header");

        Ok(ArchiveWriter {
            inner,
            expected: names.len(),
            header: Header::new(Vec::with_capacity(names.len())),
            names: names.into_iter(),
        })
    }

    /// Copies the whole of `source` as the next declared entry.
    pub fn append<R: Read>(&mut self, source: &mut R) -> Result<HeaderEntry> {
        let name = self.names.next().ok_or(Error::UnexpectedEntry {
            expected: self.expected,
        })?;

        let mut dest = WriteTracker::new(&mut self.inner);
        let size = match copy_bytes(source, &mut dest, MAX_ENTRY_SIZE) {
            Ok(size) => size,
            Err(source) if dest.failed => return Err(Error::WriteArchive { source }),
            Err(source) => return Err(Error::ReadFile { name, source }),
        };

        if size == MAX_ENTRY_SIZE {
            let mut extra = [0u8; 1];
            let more = source.read(&mut extra).map_err(|source| Error::ReadFile {
                name: name.clone(),
                source,
            })?;
            if more != 0 {
                return Err(Error::EntryTooLarge { name });
            }
        }

        tracing::info!(%name, size, "archived entry");
        let entry = HeaderEntry {
            name,
            size: size as u32,
        };
        self.header.entries.push(entry.clone());

        Ok(entry)
    }

    /// Entries appended so far.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Back-fills the header and returns it along with the underlying writer.
    pub fn finish(mut self) -> Result<(Header, W)> {
        let written = self.header.entries.len();
        if written != self.expected {
            return Err(Error::MissingEntries {
                written,
                expected: self.expected,
            });
        }

        let back_fill = |inner: &mut W, header: &Header| -> std::io::Result<()> {
            inner.seek(SeekFrom::Start(0))?;
            header.write(inner)?;
            inner.flush()
        };
        back_fill(&mut self.inner, &self.header).map_err(|source| Error::WriteArchive { source })?;

        tracing::debug!(
            header_size = self.header.byte_size(),
            data_size = self.header.data_size(),
            "finished archive"
        );
        Ok((self.header, self.inner))
    }
}

/// Creates the archive at `archive_path` holding `file_names` in the given order.
///
/// Each entry is named by its path exactly as supplied. On failure a partially
/// written archive may remain on disk.
pub fn create_archive<P, Q>(file_names: &[P], archive_path: Q) -> Result<Header>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let archive_path = archive_path.as_ref();
    let names = file_names
        .iter()
        .map(entry_name)
        .collect::<Result<Vec<_>>>()?;

    ensure_not_input(archive_path, file_names)?;
    let file = File::create(archive_path).map_err(|source| Error::CreateArchive {
        path: archive_path.to_path_buf(),
        source,
    })?;
    // A dangling symlink among the inputs may only resolve now the archive exists.
    ensure_not_input(archive_path, file_names)?;
    let mut writer = ArchiveWriter::new(BufWriter::new(file), names)?;

    for path in file_names.iter() {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::OpenFile {
            path: path.to_path_buf(),
            source,
        })?;
        writer.append(&mut BufReader::new(file))?;
    }

    let (header, _) = writer.finish()?;
    tracing::info!(
        path = %archive_path.display(),
        count = header.file_count(),
        bytes = header.archive_size(),
        "created archive"
    );
    Ok(header)
}

/// Fails if any input resolves to the same file as `archive_path`.
fn ensure_not_input<P: AsRef<Path>>(archive_path: &Path, file_names: &[P]) -> Result<()> {
    let archive = match archive_path.canonicalize() {
        Ok(path) => path,
        Err(_) => return Ok(()),
    };

    let is_archive = |path: &P| {
        path.as_ref()
            .canonicalize()
            .map_or(false, |path| path == archive)
    };
    if file_names.iter().any(is_archive) {
        return Err(Error::ArchiveIsInput {
            path: archive_path.to_path_buf(),
        });
    }
    Ok(())
}
