pub mod reader;
pub mod writer;

pub use self::reader::{
    extract_archive, extract_archive_with_options, ArchiveReader, ExtractOptions, ExtractStats,
};
pub use self::writer::{create_archive, ArchiveWriter};

#[cfg(test)]
mod tests {
    use crate::*;
    use std::io::Cursor;
    use std::path::Path;

    fn scenario_bytes() -> Vec<u8> {
        let writer = ArchiveWriter::new(
            Cursor::new(vec![]),
            vec!["a.txt".to_string(), "b.txt".to_string()],
        )
        .unwrap();
        write_entries(writer, &[b"hi", b""])
    }

    fn write_entries(mut writer: ArchiveWriter<Cursor<Vec<u8>>>, data: &[&[u8]]) -> Vec<u8> {
        for bytes in data {
            writer.append(&mut Cursor::new(bytes.to_vec())).unwrap();
        }
        let (_, cursor) = writer.finish().unwrap();
        cursor.into_inner()
    }

    fn write_archive_file(dir: &Path, bytes: &[u8]) -> std::path::PathBuf {
        let path = dir.join("test.mtar");
        std::fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn scenario_layout() {
        let bytes = scenario_bytes();

        let mut expected = vec![];
        expected.extend_from_slice(&2u32.to_le_bytes());
        expected.extend_from_slice(b"a.txt\0");
        expected.extend_from_slice(&2u32.to_le_bytes());
        expected.extend_from_slice(b"b.txt\0");
        expected.extend_from_slice(&0u32.to_le_bytes());
        expected.extend_from_slice(b"hi");

        assert_eq!(bytes, expected);
    }

    #[test]
    fn append_records_copied_size() {
        let mut writer =
            ArchiveWriter::new(Cursor::new(vec![]), vec!["one".to_string()]).unwrap();
        let entry = writer.append(&mut Cursor::new(b"12345".to_vec())).unwrap();
        assert_eq!(entry, HeaderEntry::new("one", 5));

        let (header, _) = writer.finish().unwrap();
        assert_eq!(header.entries(), &[entry]);
    }

    #[test]
    fn data_offsets_follow_entry_order() {
        let writer = ArchiveWriter::new(
            Cursor::new(vec![]),
            vec!["x".to_string(), "yy".to_string(), "zzz".to_string()],
        )
        .unwrap();
        let bytes = write_entries(writer, &[b"first", b"", b"third!"]);

        let header = read_header(&mut Cursor::new(&bytes)).unwrap();
        assert_eq!(header.byte_size(), 4 + (1 + 1 + 4) + (2 + 1 + 4) + (3 + 1 + 4));
        assert_eq!(header.archive_size(), bytes.len() as u64);

        let ranges = (0..header.entries().len())
            .map(|i| {
                let start = header.data_offset(i).unwrap() as usize;
                let end = start + header.entries()[i].size() as usize;
                &bytes[start..end]
            })
            .collect::<Vec<_>>();
        assert_eq!(ranges, vec![&b"first"[..], &b""[..], &b"third!"[..]]);
        assert_eq!(header.data_offset(3), None);
    }

    #[test]
    fn empty_archive() {
        let writer = ArchiveWriter::new(Cursor::new(vec![]), vec![]).unwrap();
        assert_eq!(write_entries(writer, &[]), vec![0, 0, 0, 0]);
    }

    #[test]
    fn too_many_appends() {
        let mut writer =
            ArchiveWriter::new(Cursor::new(vec![]), vec!["only".to_string()]).unwrap();
        writer.append(&mut Cursor::new(vec![1u8])).unwrap();
        assert!(matches!(
            writer.append(&mut Cursor::new(vec![2u8])),
            Err(Error::UnexpectedEntry { expected: 1 })
        ));
    }

    #[test]
    fn finish_before_all_entries() {
        let mut writer = ArchiveWriter::new(
            Cursor::new(vec![]),
            vec!["a".to_string(), "b".to_string()],
        )
        .unwrap();
        writer.append(&mut Cursor::new(vec![1u8])).unwrap();
        assert!(matches!(
            writer.finish(),
            Err(Error::MissingEntries {
                written: 1,
                expected: 2
            })
        ));
    }

    #[test]
    fn invalid_names_are_rejected_up_front() {
        let result = ArchiveWriter::new(
            Cursor::new(vec![]),
            vec!["fine".to_string(), "bad\0name".to_string()],
        );
        assert!(matches!(result, Err(Error::InvalidName { .. })));
    }

    #[test]
    fn reader_extracts_into_destination() {
        let dir = tempfile::tempdir().unwrap();
        let archive = write_archive_file(dir.path(), &scenario_bytes());
        let out = dir.path().join("out");
        std::fs::create_dir(&out).unwrap();

        let mut reader = ArchiveReader::open(&archive).unwrap();
        assert_eq!(reader.entries().len(), 2);
        assert_eq!(reader.path(), archive.as_path());

        let stats = reader.extract_all(&out, &ExtractOptions::default()).unwrap();
        assert_eq!(
            stats,
            ExtractStats {
                files_extracted: 2,
                bytes_extracted: 2
            }
        );
        assert_eq!(std::fs::read(out.join("a.txt")).unwrap(), b"hi");
        assert_eq!(std::fs::read(out.join("b.txt")).unwrap(), b"");

        // A second pass re-reads from the data section.
        let again = reader.extract_all(&out, &ExtractOptions::default()).unwrap();
        assert_eq!(again, stats);
    }

    #[test]
    fn truncated_entry_writes_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut bytes = scenario_bytes();
        bytes.pop();
        let archive = write_archive_file(dir.path(), &bytes);

        let mut reader = ArchiveReader::open(&archive).unwrap();
        let result = reader.extract_all(dir.path(), &ExtractOptions::default());
        assert!(matches!(
            result,
            Err(Error::TruncatedEntry {
                expected: 2,
                actual: 1,
                ..
            })
        ));
        assert!(!dir.path().join("a.txt").exists());
        assert!(!dir.path().join("b.txt").exists());
    }

    #[test]
    fn unsafe_names_need_opt_in() {
        let dir = tempfile::tempdir().unwrap();
        let inner = dir.path().join("inner");
        std::fs::create_dir(&inner).unwrap();

        let writer =
            ArchiveWriter::new(Cursor::new(vec![]), vec!["../escaped.txt".to_string()]).unwrap();
        let archive = write_archive_file(dir.path(), &write_entries(writer, &[b"out"]));

        let mut reader = ArchiveReader::open(&archive).unwrap();
        assert!(matches!(
            reader.extract_all(&inner, &ExtractOptions::default()),
            Err(Error::UnsafePath { .. })
        ));
        assert!(!dir.path().join("escaped.txt").exists());

        let options = ExtractOptions {
            allow_unsafe_paths: true,
        };
        reader.extract_all(&inner, &options).unwrap();
        assert_eq!(std::fs::read(dir.path().join("escaped.txt")).unwrap(), b"out");
    }

    #[test]
    fn missing_parent_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let writer =
            ArchiveWriter::new(Cursor::new(vec![]), vec!["nope/file.txt".to_string()]).unwrap();
        let archive = write_archive_file(dir.path(), &write_entries(writer, &[b"x"]));

        let mut reader = ArchiveReader::open(&archive).unwrap();
        assert!(matches!(
            reader.extract_all(dir.path(), &ExtractOptions::default()),
            Err(Error::CreateFile { .. })
        ));
    }

    #[test]
    fn open_missing_archive() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ArchiveReader::open(dir.path().join("missing.mtar")),
            Err(Error::OpenArchive { .. })
        ));
    }

    #[test]
    fn open_garbage_archive() {
        let dir = tempfile::tempdir().unwrap();
        let archive = write_archive_file(dir.path(), b"\x05\x00\x00\x00no terminator");
        assert!(matches!(
            ArchiveReader::open(&archive),
            Err(Error::ReadHeader { .. })
        ));
    }
}
