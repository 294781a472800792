use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Cannot create archive `{}`", .path.display())]
    CreateArchive {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot open archive `{}`", .path.display())]
    OpenArchive {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot read archive header")]
    ReadHeader {
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot read archive `{}`", .path.display())]
    ReadArchive {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot read entry `{name}` from archive")]
    ReadEntry {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write to archive")]
    WriteArchive {
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot open file `{}`", .path.display())]
    OpenFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot read entry `{name}` from its source")]
    ReadFile {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot create file `{}`", .path.display())]
    CreateFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write file `{}`", .path.display())]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid entry name {name:?}: {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("Entry `{name}` is larger than {} bytes", u32::MAX)]
    EntryTooLarge { name: String },

    #[error("Cannot store {count} entries in a single archive")]
    TooManyEntries { count: usize },

    #[error("All {expected} declared entries have already been written")]
    UnexpectedEntry { expected: usize },

    #[error("Only {written} of {expected} declared entries were written")]
    MissingEntries { written: usize, expected: usize },

    #[error("Entry `{name}` declares {expected} bytes but the archive holds only {actual}")]
    TruncatedEntry {
        name: String,
        expected: u32,
        actual: u64,
    },

    #[error("Cowardly refusing to archive `{}` into itself", .path.display())]
    ArchiveIsInput { path: PathBuf },

    #[error("Refusing to extract `{name}` outside of the destination directory")]
    UnsafePath { name: String },
}
