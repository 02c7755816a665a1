use std::fs;
use std::io::Read;

use tracing::{debug, info, warn};

use crate::config::Input;
use crate::error::{Error, Result};
use crate::record::{parse_line, FileRecord};

/// What to do with a snapshot file line whose size is not a number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MalformedSize {
    /// Log it and carry on with the next line.
    #[default]
    Skip,
    /// Fail the whole run.
    Abort,
}

/// Every file record of one listing, with line counts for reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    pub records: Vec<FileRecord>,
    /// Lines read, including ignored ones.
    pub lines: usize,
    /// Lines with an unparseable size that were skipped.
    pub malformed: usize,
}

impl Listing {
    /// Lines that carried no file record.
    pub fn ignored(&self) -> usize {
        self.lines - self.records.len() - self.malformed
    }
}

/// Reads the whole input into memory, taking `stdin` when the input is `-`.
/// Invalid UTF-8 is replaced rather than rejected.
pub fn read_input<R: Read>(input: &Input, mut stdin: R) -> Result<String> {
    let bytes = match input {
        Input::Stdin => {
            let mut buf = Vec::new();
            stdin.read_to_end(&mut buf).map_err(Error::ReadStdin)?;
            buf
        }
        Input::File(path) => fs::read(path).map_err(|source| Error::ReadInput {
            path: path.clone(),
            source,
        })?,
    };
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Runs every line of `text` through the line parser.
pub fn parse_listing(text: &str, malformed_size: MalformedSize) -> Result<Listing> {
    let mut listing = Listing::default();
    for (idx, line) in text.lines().enumerate() {
        let line_number = idx + 1;
        listing.lines += 1;
        match parse_line(line) {
            Ok(Some(record)) => listing.records.push(record),
            Ok(None) => debug!(line = line_number, "not a snapshot file line"),
            Err(source) => match malformed_size {
                MalformedSize::Skip => {
                    warn!(line = line_number, error = %source, "skipping snapshot file line");
                    listing.malformed += 1;
                }
                MalformedSize::Abort => {
                    return Err(Error::MalformedLine {
                        line: line_number,
                        source,
                    })
                }
            },
        }
    }
    info!(
        lines = listing.lines,
        records = listing.records.len(),
        ignored = listing.ignored(),
        malformed = listing.malformed,
        "parsed listing"
    );
    Ok(listing)
}

/// Reads and parses a listing in one go.
pub fn load<R: Read>(
    input: &Input,
    stdin: R,
    malformed_size: MalformedSize,
) -> Result<Listing> {
    debug!(%input, "reading listing");
    let text = read_input(input, stdin)?;
    parse_listing(&text, malformed_size)
}
