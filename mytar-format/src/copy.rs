use std::io::{Read, Write};

/// Copies at most `max_bytes` from `source` into `destination`, stopping early if the
/// source runs out. Returns the number of bytes moved.
///
/// A failed write is reported as an error, never as a partial count.
pub fn copy_bytes<R, W>(source: &mut R, destination: &mut W, max_bytes: u64) -> std::io::Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut limited = Read::take(&mut *source, max_bytes);
    std::io::copy(&mut limited, destination)
}
