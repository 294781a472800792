use std::fs::File;
use std::io::{prelude::*, BufReader, SeekFrom};
use std::path::{Path, PathBuf};

use crate::{
    de::read_header,
    error::{Error, Result},
    header::{Header, HeaderEntry},
    path::output_path,
};

/// Controls how [`ArchiveReader::extract_all`] writes entries.
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Write entries whose names escape the destination directory.
    pub allow_unsafe_paths: bool,
}

/// Totals for one extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractStats {
    pub files_extracted: u64,
    pub bytes_extracted: u64,
}

impl std::ops::AddAssign for ExtractStats {
    fn add_assign(&mut self, other: Self) {
        self.files_extracted += other.files_extracted;
        self.bytes_extracted += other.bytes_extracted;
    }
}

/// An archive on disk with its header already parsed.
#[derive(Debug)]
pub struct ArchiveReader {
    pub(crate) file: BufReader<File>,
    pub(crate) path: PathBuf,
    pub(crate) header: Header,
}

impl ArchiveReader {
    /// Opens an existing archive and parses its header.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<ArchiveReader> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::OpenArchive {
            path: path.to_path_buf(),
            source,
        })?;

        let mut file = BufReader::new(file);
        let header = read_header(&mut file).map_err(|source| Error::ReadHeader { source })?;

        Ok(ArchiveReader {
            file,
            path: path.to_path_buf(),
            header,
        })
    }

    #[inline(always)]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline(always)]
    pub fn header(&self) -> &Header {
        &self.header
    }

    #[inline(always)]
    pub fn entries(&self) -> &[HeaderEntry] {
        self.header.entries()
    }

    /// Extracts every entry, in header order, into `destination`.
    pub fn extract_all<P: AsRef<Path>>(
        &mut self,
        destination: P,
        options: &ExtractOptions,
    ) -> Result<ExtractStats> {
        let destination = destination.as_ref();
        if options.allow_unsafe_paths {
            tracing::warn!("extracting without path containment checks");
        }

        self.file
            .seek(SeekFrom::Start(self.header.byte_size()))
            .map_err(|source| Error::ReadArchive {
                path: self.path.clone(),
                source,
            })?;

        let mut stats = ExtractStats::default();
        for entry in self.header.entries.iter() {
            stats += extract_entry(&mut self.file, entry, destination, options)?;
        }

        Ok(stats)
    }
}

/// Reads the next `entry.size` bytes of `reader` into a file named after the entry.
///
/// The file is only created once all of its bytes have been read.
pub(crate) fn extract_entry<R: Read>(
    reader: &mut R,
    entry: &HeaderEntry,
    destination: &Path,
    options: &ExtractOptions,
) -> Result<ExtractStats> {
    let path = output_path(destination, entry.name(), options.allow_unsafe_paths)?;

    let mut buf = vec![];
    let actual = Read::take(&mut *reader, entry.size() as u64)
        .read_to_end(&mut buf)
        .map_err(|source| Error::ReadEntry {
            name: entry.name().to_string(),
            source,
        })? as u64;

    if actual != entry.size() as u64 {
        return Err(Error::TruncatedEntry {
            name: entry.name().to_string(),
            expected: entry.size(),
            actual,
        });
    }

    let mut out_file = File::create(&path).map_err(|source| Error::CreateFile {
        path: path.clone(),
        source,
    })?;
    out_file
        .write_all(&buf)
        .and_then(|_| out_file.flush())
        .map_err(|source| Error::WriteFile {
            path: path.clone(),
            source,
        })?;

    tracing::info!(name = %entry.name(), size = entry.size(), path = %path.display(), "extracted entry");

    Ok(ExtractStats {
        files_extracted: 1,
        bytes_extracted: actual,
    })
}

/// Extracts every entry of the archive at `archive_path` into `destination`.
pub fn extract_archive<P, Q>(archive_path: P, destination: Q) -> Result<ExtractStats>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    extract_archive_with_options(archive_path, destination, &ExtractOptions::default())
}

/// Like [`extract_archive`], with explicit [`ExtractOptions`].
pub fn extract_archive_with_options<P, Q>(
    archive_path: P,
    destination: Q,
    options: &ExtractOptions,
) -> Result<ExtractStats>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let mut reader = ArchiveReader::open(archive_path)?;
    let stats = reader.extract_all(destination, options)?;
    tracing::info!(
        path = %reader.path().display(),
        files = stats.files_extracted,
        bytes = stats.bytes_extracted,
        "extracted archive"
    );
    Ok(stats)
}
