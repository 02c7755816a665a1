use std::fs;
use std::io::{self, Read, Write};

use rand::Rng;
use tracing::{info, warn};

use crate::config::{ExportConfig, Output, SampleConfig};
use crate::error::{Error, Result};
use crate::listing;
use crate::record::FileRecord;
use crate::sample::{select_random, Selection};
use crate::size::format_size;
use crate::tree::{Insertion, PathTree};

/// Counts gathered while exporting a listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    /// File records parsed from the listing.
    pub records: usize,
    /// Lines skipped because of an unparseable size.
    pub malformed: usize,
    /// Records that replaced an earlier record with the same path.
    pub overwritten: usize,
    /// Records that turned a file into a directory or the other way round.
    pub collisions: usize,
    /// Leaves in the finished tree.
    pub files: usize,
}

/// Folds records into a tree, logging every file/directory clash.
pub fn build_tree<I>(records: I) -> (PathTree, ExportReport)
where
    I: IntoIterator<Item = FileRecord>,
{
    let mut tree = PathTree::new();
    let mut report = ExportReport::default();
    for record in records {
        report.records += 1;
        match tree.insert(&record) {
            Insertion::Created => {}
            Insertion::Overwritten => report.overwritten += 1,
            Insertion::Collided => {
                warn!(
                    path = record.path(),
                    "path is both a file and a directory, keeping the latest"
                );
                report.collisions += 1;
            }
        }
    }
    report.files = tree.file_count();
    (tree, report)
}

/// Reads a listing and writes it out as a JSON tree.
///
/// `stdin` and `stdout` stand in for `-` on either side. Nothing is written
/// when reading or parsing fails.
pub fn export_json<R, W>(config: &ExportConfig, stdin: R, stdout: &mut W) -> Result<ExportReport>
where
    R: Read,
    W: Write,
{
    let listing = listing::load(&config.input, stdin, config.malformed_size)?;
    let malformed = listing.malformed;
    let (tree, mut report) = build_tree(listing.records);
    report.malformed = malformed;

    let json = tree.to_json(config.indent)?;
    match &config.output {
        Output::Stdout => {
            stdout.write_all(json.as_bytes())?;
            stdout.write_all(b"\n")?;
            stdout.flush()?;
        }
        Output::File(path) => fs::write(path, json).map_err(|source| Error::WriteOutput {
            path: path.clone(),
            source,
        })?,
    }
    info!(
        records = report.records,
        files = report.files,
        overwritten = report.overwritten,
        collisions = report.collisions,
        malformed = report.malformed,
        output = %config.output,
        "exported path tree"
    );
    Ok(report)
}

/// Picks random files out of a listing and describes them on `out`.
pub fn select_random_files<I, R, W>(
    config: &SampleConfig,
    stdin: I,
    rng: &mut R,
    out: &mut W,
) -> Result<Selection>
where
    I: Read,
    R: Rng + ?Sized,
    W: Write,
{
    let listing = listing::load(&config.input, stdin, config.malformed_size)?;
    let selection = select_random(listing.records, config.count, &config.filters, rng);
    write_selection(&selection, out)?;
    info!(
        requested = selection.requested,
        selected = selection.files.len(),
        "selected random files"
    );
    Ok(selection)
}

/// One block per file, then a warning when too few files matched.
pub fn write_selection<W: Write>(selection: &Selection, out: &mut W) -> io::Result<()> {
    for (idx, file) in selection.files.iter().enumerate() {
        if idx > 0 {
            writeln!(out)?;
        }
        writeln!(out, "{}", file.path())?;
        writeln!(out, "    {} ({} bytes)", format_size(file.size()), file.size())?;
    }
    if selection.is_short() {
        if !selection.files.is_empty() {
            writeln!(out)?;
        }
        writeln!(
            out,
            "Warning: only found {} of the {} requested files matching the filters.",
            selection.files.len(),
            selection.requested
        )?;
    }
    Ok(())
}
