//! Reading and writing of the mytar flat archive format.
//!
//! An archive is a header followed by a data section:
//!
//! ```text
//! [u32 file count]
//! file count times:
//!     [name bytes..., 0x00]
//!     [u32 size]
//! [size_0 bytes of entry 0][size_1 bytes of entry 1]...
//! ```
//!
//! All integers are little-endian. Data immediately follows the header, in header
//! order, with no padding.

mod copy;
mod de;
pub mod error;
mod file;
mod header;
pub mod path;
mod ser;

pub use copy::copy_bytes;
pub use de::{read_header, read_string};
pub use error::{Error, Result};
pub use file::{
    create_archive, extract_archive, extract_archive_with_options, ArchiveReader, ArchiveWriter,
    ExtractOptions, ExtractStats,
};
pub use header::{header_size, Header, HeaderEntry};
