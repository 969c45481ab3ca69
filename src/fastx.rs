//! Sequence input for the driver: FASTA or FASTQ through `bio`, with gzip
//! detected by file extension and the format sniffed from the first byte.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use bio::io::{fasta, fastq};
use flate2::read::GzDecoder;

use crate::error::{Error, Result};

enum Records {
    Fasta(fasta::Records<BufReader<Box<dyn Read>>>),
    Fastq(fastq::Records<BufReader<Box<dyn Read>>>),
}

/// Iterator over raw sequence bytes, one record at a time.
pub struct SeqReader {
    records: Records,
}

/// Open a FASTA/FASTQ file (`.gz` handled transparently).
pub fn open(path: &Path) -> Result<SeqReader> {
    let file = File::open(path).map_err(|e| Error::io("open input", e))?;
    let gz = path.extension().and_then(|s| s.to_str()) == Some("gz");
    let raw: Box<dyn Read> = if gz {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };
    let mut buf = BufReader::new(raw);
    let first = buf
        .fill_buf()
        .map_err(|e| Error::io("read input", e))?
        .first()
        .copied();
    let records = match first {
        Some(b'>') | None => Records::Fasta(fasta::Reader::from_bufread(buf).records()),
        Some(b'@') => Records::Fastq(fastq::Reader::from_bufread(buf).records()),
        Some(c) => {
            return Err(Error::InputInvalid(format!(
                "input does not look like FASTA or FASTQ (starts with {:?})",
                c as char
            )))
        }
    };
    Ok(SeqReader { records })
}

impl Iterator for SeqReader {
    type Item = Result<Vec<u8>>;

    fn next(&mut self) -> Option<Result<Vec<u8>>> {
        match &mut self.records {
            Records::Fasta(r) => r.next().map(|rec| {
                rec.map(|rec| rec.seq().to_vec())
                    .map_err(|e| Error::io("read sequence record", io::Error::other(e)))
            }),
            Records::Fastq(r) => r.next().map(|rec| {
                rec.map(|rec| rec.seq().to_vec())
                    .map_err(|e| Error::io("read sequence record", io::Error::other(e)))
            }),
        }
    }
}
