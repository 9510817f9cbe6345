use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

/// Reports whether the file at `path` is gzip-compressed.
///
/// Detection attempts to decompress a single byte rather than trusting the
/// file extension, since structure files are routinely renamed in bulk.
pub fn is_gzipped(path: &Path) -> io::Result<bool> {
    let file = File::open(path)?;
    let mut decoder = GzDecoder::new(BufReader::new(file));
    let mut probe = [0u8; 1];
    match decoder.read(&mut probe) {
        Ok(_) => Ok(true),
        Err(e)
            if matches!(
                e.kind(),
                io::ErrorKind::InvalidInput
                    | io::ErrorKind::InvalidData
                    | io::ErrorKind::UnexpectedEof
            ) =>
        {
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

/// Opens `path` for buffered reading, transparently decompressing gzip input.
pub fn open(path: &Path) -> io::Result<Box<dyn BufRead>> {
    if is_gzipped(path)? {
        let file = File::open(path)?;
        Ok(Box::new(BufReader::new(GzDecoder::new(BufReader::new(
            file,
        )))))
    } else {
        Ok(Box::new(BufReader::new(File::open(path)?)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    fn write_plain(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn write_gzipped(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let file = File::create(&path).unwrap();
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder.write_all(content.as_bytes()).unwrap();
        encoder.finish().unwrap();
        path
    }

    #[test]
    fn plain_file_is_not_reported_as_gzipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_plain(dir.path(), "plain.cif", "data_test\n");
        assert!(!is_gzipped(&path).unwrap());
    }

    #[test]
    fn gzipped_file_is_detected_regardless_of_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_gzipped(dir.path(), "no_gz_suffix.cif", "data_test\n");
        assert!(is_gzipped(&path).unwrap());
    }

    #[test]
    fn empty_file_is_treated_as_plain() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_plain(dir.path(), "empty", "");
        assert!(!is_gzipped(&path).unwrap());
    }

    #[test]
    fn open_reads_identical_content_from_both_encodings() {
        let dir = tempfile::tempdir().unwrap();
        let content = "data_test\n_entry.id X\n";
        let plain = write_plain(dir.path(), "a.cif", content);
        let zipped = write_gzipped(dir.path(), "a.cif.gz", content);

        for path in [plain, zipped] {
            let mut text = String::new();
            open(&path).unwrap().read_to_string(&mut text).unwrap();
            assert_eq!(text, content);
        }
    }

    #[test]
    fn open_propagates_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = open(&dir.path().join("nope.cif")).err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
