use std::convert::Infallible;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDateTime;

use crate::listing::MalformedSize;
use crate::sample::Filters;

const STDIO_MARKER: &str = "-";

/// Where the listing is read from. `-` means standard input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Stdin,
    File(PathBuf),
}

impl FromStr for Input {
    type Err = Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            STDIO_MARKER => Ok(Self::Stdin),
            path => Ok(Self::File(PathBuf::from(path))),
        }
    }
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdin => f.write_str("<stdin>"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Where the JSON tree is written. `-` means standard output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Stdout,
    File(PathBuf),
}

impl Output {
    /// The timestamped default, resolved against the given moment.
    pub fn default_at(now: NaiveDateTime) -> Self {
        Self::File(default_output_file(now))
    }
}

impl FromStr for Output {
    type Err = Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            STDIO_MARKER => Ok(Self::Stdout),
            path => Ok(Self::File(PathBuf::from(path))),
        }
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout => f.write_str("<stdout>"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// `dux_<timestamp>.json`, e.g. `dux_2024-03-09_17-05-42.json`.
pub fn default_output_file(now: NaiveDateTime) -> PathBuf {
    PathBuf::from(format!("dux_{}.json", now.format("%Y-%m-%d_%H-%M-%S")))
}

/// Config for exporting a listing as a JSON tree.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub input: Input,
    pub output: Output,
    /// Spaces per nesting level; `None` writes compact JSON.
    pub indent: Option<usize>,
    pub malformed_size: MalformedSize,
}

/// Config for picking random files out of a listing.
#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub input: Input,
    pub count: usize,
    pub filters: Filters,
    pub malformed_size: MalformedSize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn dash_means_standard_streams() {
        assert_eq!("-".parse::<Input>(), Ok(Input::Stdin));
        assert_eq!("-".parse::<Output>(), Ok(Output::Stdout));
        assert_eq!(
            "logs/list.txt".parse::<Input>(),
            Ok(Input::File(PathBuf::from("logs/list.txt")))
        );
    }

    #[test]
    fn default_file_name_carries_the_timestamp() {
        let now = NaiveDate::from_ymd_opt(2024, 3, 9)
            .and_then(|date| date.and_hms_opt(17, 5, 42))
            .unwrap();
        assert_eq!(
            Output::default_at(now),
            Output::File(PathBuf::from("dux_2024-03-09_17-05-42.json"))
        );
    }
}
