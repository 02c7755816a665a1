use std::num::ParseIntError;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Log type marking one file entry of a listed snapshot.
pub const SNAPSHOT_FILE: &str = "SNAPSHOT_FILE";

// Field layout of a `duplicacy -log list -files` line:
// 0 = log date, 1 = log time, 2 = log level, 3 = log type, 4 = file size,
// 5 = modified date, 6 = modified time, 7 = file hash, 8 = path.
// The hash is blank for empty files, which shifts the path into field 7 and
// leaves one field less.
const MAX_FIELDS: usize = 9;
const EMPTY_FILE_MAX_FIELDS: usize = 8;
const LOG_TYPE_FIELD: usize = 3;
const SIZE_FIELD: usize = 4;
const HASHED_PATH_FIELD: usize = 8;
const EMPTY_FILE_PATH_FIELD: usize = 7;

static FIELD_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("field separator pattern is valid"));

/// A single file listed in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileRecord {
    path: String,
    size: u64,
}

impl FileRecord {
    pub fn new(path: impl Into<String>, size: u64) -> Self {
        Self {
            path: path.into(),
            size,
        }
    }

    /// Slash separated path, file name included.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.split('/')
    }

    /// All segments but the file name.
    pub fn directories(&self) -> impl Iterator<Item = &str> {
        let path = self.path.as_str();
        path.rfind('/')
            .map(move |end| path[..end].split('/'))
            .into_iter()
            .flatten()
    }

    pub fn name(&self) -> &str {
        match self.path.rfind('/') {
            Some(idx) => &self.path[idx + 1..],
            None => &self.path,
        }
    }

    /// Suffix of the file name from its last dot, dot included.
    ///
    /// Leading dots never start an extension, so `.bashrc` has none while
    /// `archive.tar.gz` has `.gz`.
    pub fn extension(&self) -> &str {
        let name = self.name();
        let stem_start = name.len() - name.trim_start_matches('.').len();
        match name[stem_start..].rfind('.') {
            Some(idx) => &name[stem_start + idx..],
            None => "",
        }
    }
}

/// The size field of a snapshot file line is not a non-negative integer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid file size `{value}`")]
pub struct InvalidSize {
    pub value: String,
    #[source]
    pub source: ParseIntError,
}

/// Parses one raw log line.
///
/// Lines that are not snapshot file entries, or that are too short to carry
/// a path, yield `Ok(None)`. Only a snapshot file line with an unparseable
/// size is an error, leaving it to the caller to decide whether that aborts.
pub fn parse_line(line: &str) -> Result<Option<FileRecord>, InvalidSize> {
    let line = line.trim();
    let fields: Vec<&str> = FIELD_SEPARATOR.splitn(line, MAX_FIELDS).collect();
    if fields.get(LOG_TYPE_FIELD) != Some(&SNAPSHOT_FILE) {
        return Ok(None);
    }
    let Some(raw_size) = fields.get(SIZE_FIELD) else {
        return Ok(None);
    };
    let size = raw_size.parse::<u64>().map_err(|source| InvalidSize {
        value: raw_size.to_string(),
        source,
    })?;
    let path = if size > 0 {
        fields.get(HASHED_PATH_FIELD).copied()
    } else {
        FIELD_SEPARATOR
            .splitn(line, EMPTY_FILE_MAX_FIELDS)
            .nth(EMPTY_FILE_PATH_FIELD)
    };
    Ok(path.map(|path| FileRecord::new(path, size)))
}
