use rand::seq::SliceRandom;
use rand::Rng;

use crate::record::FileRecord;

/// Which records may be picked by [`select_random`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    /// Smallest accepted size in bytes, inclusive.
    pub min_size: Option<u64>,
    /// Largest accepted size in bytes, inclusive.
    pub max_size: Option<u64>,
    /// Extensions never picked, each with its leading dot (`.bak`).
    pub excluded_extensions: Vec<String>,
}

impl Filters {
    /// Adds an extension to exclude. The leading dot is optional.
    pub fn exclude_extension(mut self, extension: &str) -> Self {
        let extension = if extension.starts_with('.') {
            extension.to_string()
        } else {
            format!(".{extension}")
        };
        self.excluded_extensions.push(extension);
        self
    }

    pub fn accepts(&self, record: &FileRecord) -> bool {
        let size = record.size();
        self.min_size.map_or(true, |min| size >= min)
            && self.max_size.map_or(true, |max| size <= max)
            && !self
                .excluded_extensions
                .iter()
                .any(|excluded| excluded == record.extension())
    }
}

/// Result of a random selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub files: Vec<FileRecord>,
    pub requested: usize,
}

impl Selection {
    /// Fewer files matched the filters than were asked for.
    pub fn is_short(&self) -> bool {
        self.files.len() < self.requested
    }

    pub fn shortfall(&self) -> usize {
        self.requested.saturating_sub(self.files.len())
    }
}

/// Picks up to `count` records passing `filters`, without replacement.
///
/// The whole population is shuffled before any filter runs, so every
/// matching record is equally likely to be picked.
pub fn select_random<R: Rng + ?Sized>(
    mut records: Vec<FileRecord>,
    count: usize,
    filters: &Filters,
    rng: &mut R,
) -> Selection {
    records.shuffle(rng);
    let files = records
        .into_iter()
        .filter(|record| filters.accepts(record))
        .take(count)
        .collect();
    Selection {
        files,
        requested: count,
    }
}
