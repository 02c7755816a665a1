/*!
# Dux
Converts the file listing of a [Duplicacy](https://github.com/gilbertchen/duplicacy) snapshot into something easier to work with. Duplicacy only prints one log line per file, so answering "what was in that folder in revision 45" or "how big was it" means grepping through thousands of lines.

- **Export** - folds every listed file into a nested JSON object mirroring the directory hierarchy, leaves holding the file size in bytes.
- **Random selection** - picks a handful of files, optionally filtered by size and extension, to restore as a spot check of the backup.

# Input
The listing must be produced with both `-log` and `-files`, e.g. `duplicacy -log list -r 45 -files`. Only `SNAPSHOT_FILE` lines are used, everything else is ignored.

# Example
```
use dux::{parse_line, PathTree};

let lines = [
    "2023-01-01 00:00:00 INFO SNAPSHOT_FILE 10 2022-12-01 10:00:00 aaaa a/b/c.txt",
    "2023-01-01 00:00:00 INFO SNAPSHOT_FILE 0 2022-12-01 10:00:00 a/e.txt",
];
let tree: PathTree = lines
    .iter()
    .filter_map(|line| parse_line(line).ok().flatten())
    .collect();
assert_eq!(tree.to_json(None).unwrap(), r#"{"a":{"b":{"c.txt":10},"e.txt":0}}"#);
```
*/

pub mod commands;
pub mod config;
mod error;
pub mod listing;
mod record;
pub mod sample;
mod size;
mod tree;

pub use error::{Error, Result};
pub use record::{parse_line, FileRecord, InvalidSize, SNAPSHOT_FILE};
pub use size::format_size;
pub use tree::{Children, Files, Insertion, PathNode, PathTree};
