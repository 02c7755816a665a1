use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::record::InvalidSize;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read input `{}`", path.display())]
    ReadInput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read standard input")]
    ReadStdin(#[source] io::Error),
    /// A snapshot file line whose size field is not a number, under the
    /// abort policy.
    #[error("line {line}: {source}")]
    MalformedLine {
        line: usize,
        #[source]
        source: InvalidSize,
    },
    #[error("failed to write output `{}`", path.display())]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize path tree")]
    Serialize(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}
