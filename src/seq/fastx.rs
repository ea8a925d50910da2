use std::{
    io::BufRead,
    path::{Path, PathBuf},
};
use bio::io::fasta::{self, FastaRead};
use crate::{
    Error,
    ext::{sys as sys_ext, fmt as fmt_ext},
    err::{error, add_path},
};
use super::NamedSeq;

/// Streaming reader over FASTA records, returns one named sequence at a time.
pub struct FastaRecords<R: BufRead> {
    reader: fasta::Reader<R>,
    record: fasta::Record,
    filename: PathBuf,
    finished: bool,
}

impl FastaRecords<Box<dyn BufRead + Send>> {
    /// Opens FASTA file (possibly gzip-compressed), or stdin if filename is `-`.
    pub fn open(filename: &Path) -> Result<Self, Error> {
        let stream = sys_ext::open(filename).map_err(add_path!(filename))?;
        Ok(Self::new(stream, filename))
    }
}

impl<R: BufRead> FastaRecords<R> {
    /// Wraps buffered stream. Filename is only used for error messages.
    pub fn new(stream: R, filename: &Path) -> Self {
        Self {
            reader: fasta::Reader::from_bufread(stream),
            record: fasta::Record::new(),
            filename: filename.to_owned(),
            finished: false,
        }
    }
}

impl<R: BufRead> Iterator for FastaRecords<R> {
    type Item = Result<NamedSeq, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        if let Err(e) = self.reader.read(&mut self.record) {
            self.finished = true;
            return Some(Err(Error::Io(e, vec![self.filename.clone()])));
        }
        if self.record.is_empty() {
            self.finished = true;
            None
        } else if self.record.id().is_empty() {
            self.finished = true;
            Some(Err(error!(InvalidData, "FASTA record without a name in {}", fmt_ext::path(&self.filename))))
        } else {
            Some(Ok(NamedSeq::new(self.record.id().to_owned(), self.record.seq().to_vec())))
        }
    }
}

/// Loads all records from the FASTA file.
pub fn load_all(filename: &Path) -> Result<Vec<NamedSeq>, Error> {
    let seqs = FastaRecords::open(filename)?.collect::<Result<Vec<_>, _>>()?;
    log::debug!("    Loaded {} sequences from {}", seqs.len(), fmt_ext::path(filename));
    Ok(seqs)
}
