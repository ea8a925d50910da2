use std::{
    io::{self, Read, BufRead, BufReader, Write, BufWriter, stdin, stdout},
    fs::{self, File},
    path::{Path, PathBuf},
    ffi::OsStr,
};
use flate2::bufread::MultiGzDecoder;

/// Returns
/// - stdin if filename is `-`,
/// - gzip reader if the file starts with the gzip magic number,
/// - regular text file otherwise.
pub fn open(filename: &Path) -> io::Result<Box<dyn BufRead + Send>> {
    if filename == OsStr::new("-") || filename == OsStr::new("/dev/stdin") {
        Ok(Box::new(BufReader::new(stdin())))
    } else {
        let mut stream = BufReader::new(File::open(filename)?);
        let mut two_bytes = [0_u8; 2];
        let bytes_read = stream.read(&mut two_bytes)?;
        stream.seek_relative(-(bytes_read as i64))?;
        // Check gzip magic number.
        if bytes_read == 2 && two_bytes[0] == 0x1f && two_bytes[1] == 0x8b {
            Ok(Box::new(BufReader::new(MultiGzDecoder::new(stream))))
        } else {
            Ok(Box::new(stream))
        }
    }
}

/// Creates a buffered file OR stdout if filename is `-`.
pub fn create_uncompressed(filename: &Path) -> io::Result<Box<dyn Write>> {
    if filename == OsStr::new("-") {
        Ok(Box::new(BufWriter::new(stdout())))
    } else {
        Ok(Box::new(BufWriter::new(File::create(filename)?)))
    }
}

/// Returns true if the filename ends with one of the extensions (case-insensitive),
/// optionally followed by `.gz`.
pub fn has_ext(path: &Path, extensions: &[&str]) -> bool {
    let Some(name) = path.file_name().and_then(OsStr::to_str) else { return false };
    let name = name.to_ascii_lowercase();
    let name = name.strip_suffix(".gz").unwrap_or(name.as_str());
    extensions.iter().any(|ext| name.len() > ext.len() + 1
        && name.ends_with(ext) && name.as_bytes()[name.len() - ext.len() - 1] == b'.')
}

/// Finds all files with appropriate extensions in the directory, sorted by name.
pub fn filenames_with_ext(dir: &Path, extensions: &[&str]) -> io::Result<Vec<PathBuf>> {
    let mut res = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_file() && has_ext(&path, extensions) {
            res.push(path);
        }
    }
    res.sort();
    Ok(res)
}

/// Returns filename without directory and without the extensions (including `.gz`).
pub fn file_stem(path: &Path) -> String {
    let name = path.file_name().map(OsStr::to_string_lossy).unwrap_or_default();
    let name = name.strip_suffix(".gz").or_else(|| name.strip_suffix(".GZ")).unwrap_or(&*name);
    match name.rfind('.') {
        Some(i) if i > 0 => name[..i].to_owned(),
        _ => name.to_owned(),
    }
}

/// Create directory, if it does not exist yet.
pub fn mkdir(path: impl AsRef<Path>) -> io::Result<()> {
    let path = path.as_ref();
    if !path.exists() {
        fs::create_dir_all(path)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::{write::GzEncoder, Compression};

    const FASTA_EXT: &[&str] = &["fasta", "fa", "fna"];

    #[test]
    fn extensions() {
        assert!(has_ext(Path::new("dir/genome.fa"), FASTA_EXT));
        assert!(has_ext(Path::new("genome.FASTA"), FASTA_EXT));
        assert!(has_ext(Path::new("genome.fna.gz"), FASTA_EXT));
        assert!(!has_ext(Path::new("genome.fastq"), FASTA_EXT));
        assert!(!has_ext(Path::new("notfa"), FASTA_EXT));
        assert!(!has_ext(Path::new(".fa"), FASTA_EXT));
    }

    #[test]
    fn stems() {
        assert_eq!(file_stem(Path::new("dir/genome.fa")), "genome");
        assert_eq!(file_stem(Path::new("dir/genome.v2.fa.gz")), "genome.v2");
        assert_eq!(file_stem(Path::new("genome")), "genome");
    }

    #[test]
    fn list_directory() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.fa", "a.fasta", "c.txt", "d.fna.gz"] {
            File::create(dir.path().join(name)).unwrap();
        }
        let found: Vec<_> = filenames_with_ext(dir.path(), FASTA_EXT).unwrap().into_iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(found, vec!["a.fasta", "b.fa", "d.fna.gz"]);
    }

    #[test]
    fn open_plain_and_gzip() {
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("x.fa");
        fs::write(&plain, b">s\nACGT\n").unwrap();
        let gz = dir.path().join("x.fa.gz");
        let mut enc = GzEncoder::new(File::create(&gz).unwrap(), Compression::default());
        enc.write_all(b">s\nACGT\n").unwrap();
        enc.finish().unwrap();

        for path in [&plain, &gz] {
            let mut s = String::new();
            open(path).unwrap().read_to_string(&mut s).unwrap();
            assert_eq!(s, ">s\nACGT\n");
        }
    }
}
