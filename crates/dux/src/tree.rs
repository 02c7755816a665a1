use std::io;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::record::FileRecord;

/// Children of a directory, in the order they were first logged.
pub type Children = IndexMap<String, PathNode>;

/// A node of the path tree: either a file with its size in bytes, or a
/// directory holding further nodes keyed by segment name.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum PathNode {
    Leaf(u64),
    Directory(Children),
}

impl PathNode {
    fn directory() -> Self {
        Self::Directory(Children::new())
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    /// Turns a leaf into an empty directory and returns the directory's
    /// children, along with whether a leaf had to be replaced.
    fn make_directory(&mut self) -> (&mut Children, bool) {
        let mut replaced = false;
        loop {
            match self {
                Self::Directory(children) => return (children, replaced),
                Self::Leaf(_) => {
                    *self = Self::directory();
                    replaced = true;
                }
            }
        }
    }
}

/// What a single [`PathTree::insert`] did to the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    /// A new leaf was added.
    Created,
    /// A leaf with the same full path already existed and took the new size.
    Overwritten,
    /// The record disagreed with the tree about whether a segment is a file
    /// or a directory. The record won.
    Collided,
}

/// Nested mapping mirroring the directory hierarchy of a snapshot, leaves
/// holding file sizes.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct PathTree {
    root: Children,
}

impl PathTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> &Children {
        &self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Folds one record into the tree.
    ///
    /// Existing directories along the record's path are followed, missing ones
    /// created, and the file name is then set to the record's size. The last
    /// record for a given path wins, including when it changes a file into a
    /// directory or the other way round.
    pub fn insert(&mut self, record: &FileRecord) -> Insertion {
        let mut collided = false;
        let mut cursor = &mut self.root;
        for segment in record.directories() {
            let node = cursor
                .entry(segment.to_owned())
                .or_insert_with(PathNode::directory);
            let (children, replaced) = node.make_directory();
            collided |= replaced;
            cursor = children;
        }
        let previous = cursor.insert(record.name().to_owned(), PathNode::Leaf(record.size()));
        match previous {
            Some(PathNode::Directory(_)) => Insertion::Collided,
            _ if collided => Insertion::Collided,
            Some(PathNode::Leaf(_)) => Insertion::Overwritten,
            None => Insertion::Created,
        }
    }

    /// Looks up the node at a slash separated path.
    pub fn get(&self, path: &str) -> Option<&PathNode> {
        let mut segments = path.split('/');
        let mut node = self.root.get(segments.next()?)?;
        for segment in segments {
            match node {
                PathNode::Directory(children) => node = children.get(segment)?,
                PathNode::Leaf(_) => return None,
            }
        }
        Some(node)
    }

    /// Number of leaves.
    pub fn file_count(&self) -> usize {
        let mut count = 0;
        let mut pending: Vec<&Children> = vec![&self.root];
        while let Some(children) = pending.pop() {
            for node in children.values() {
                match node {
                    PathNode::Leaf(_) => count += 1,
                    PathNode::Directory(nested) => pending.push(nested),
                }
            }
        }
        count
    }

    /// Every leaf as a reconstructed `(path, size)` pair, depth first and in
    /// insertion order.
    pub fn files(&self) -> Files<'_> {
        Files {
            stack: vec![(String::new(), self.root.iter())],
        }
    }

    /// Writes the tree as a single JSON object. `None` writes it compactly;
    /// `Some(n)` puts every entry on its own line indented by `n` spaces per
    /// level.
    pub fn write_json<W: io::Write>(
        &self,
        writer: W,
        indent: Option<usize>,
    ) -> serde_json::Result<()> {
        match indent {
            None => serde_json::to_writer(writer, self),
            Some(width) => {
                let indent = vec![b' '; width];
                let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent);
                let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
                self.serialize(&mut serializer)
            }
        }
    }

    pub fn to_json(&self, indent: Option<usize>) -> serde_json::Result<String> {
        let mut buf = Vec::new();
        self.write_json(&mut buf, indent)?;
        // serde_json only ever emits valid UTF-8.
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

impl Extend<FileRecord> for PathTree {
    fn extend<I: IntoIterator<Item = FileRecord>>(&mut self, records: I) {
        for record in records {
            self.insert(&record);
        }
    }
}

impl FromIterator<FileRecord> for PathTree {
    fn from_iter<I: IntoIterator<Item = FileRecord>>(records: I) -> Self {
        let mut tree = Self::new();
        tree.extend(records);
        tree
    }
}

/// Iterator returned by [`PathTree::files`].
pub struct Files<'a> {
    stack: Vec<(String, indexmap::map::Iter<'a, String, PathNode>)>,
}

impl Iterator for Files<'_> {
    type Item = (String, u64);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let depth = self.stack.len();
            let (prefix, entries) = self.stack.last_mut()?;
            let Some((name, node)) = entries.next() else {
                self.stack.pop();
                continue;
            };
            let path = if depth == 1 {
                name.clone()
            } else {
                format!("{prefix}/{name}")
            };
            match node {
                PathNode::Leaf(size) => return Some((path, *size)),
                PathNode::Directory(children) => self.stack.push((path, children.iter())),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tree_of(records: &[(&str, u64)]) -> PathTree {
        records
            .iter()
            .map(|(path, size)| FileRecord::new(*path, *size))
            .collect()
    }

    #[test]
    fn folds_paths_into_nested_directories() {
        let tree = tree_of(&[("a/b/c.txt", 10), ("a/b/d.txt", 20), ("a/e.txt", 5)]);
        let value = serde_json::to_value(&tree).unwrap();
        assert_eq!(
            value,
            json!({"a": {"b": {"c.txt": 10, "d.txt": 20}, "e.txt": 5}})
        );
        assert_eq!(tree.file_count(), 3);
    }

    #[test]
    fn file_at_root() {
        let tree = tree_of(&[("readme.md", 3)]);
        assert_eq!(tree.get("readme.md"), Some(&PathNode::Leaf(3)));
    }

    #[test]
    fn same_record_twice_is_idempotent() {
        let mut tree = PathTree::new();
        let record = FileRecord::new("x/y.bin", 42);
        assert_eq!(tree.insert(&record), Insertion::Created);
        let once = tree.clone();
        assert_eq!(tree.insert(&record), Insertion::Overwritten);
        assert_eq!(tree, once);
    }

    #[test]
    fn later_record_wins_on_same_path() {
        let tree = tree_of(&[("x/y.bin", 1), ("x/y.bin", 2)]);
        assert_eq!(tree.get("x/y.bin"), Some(&PathNode::Leaf(2)));
        assert_eq!(tree.file_count(), 1);
    }

    #[test]
    fn leaf_replaced_by_directory() {
        let mut tree = tree_of(&[("a/b", 7)]);
        assert_eq!(
            tree.insert(&FileRecord::new("a/b/c", 1)),
            Insertion::Collided
        );
        assert_eq!(
            serde_json::to_value(&tree).unwrap(),
            json!({"a": {"b": {"c": 1}}})
        );
    }

    #[test]
    fn top_level_leaf_becomes_directory_once() {
        let mut tree = tree_of(&[("a", 1), ("x/y", 2)]);
        assert_eq!(
            tree.insert(&FileRecord::new("a/b/c", 3)),
            Insertion::Collided
        );
        assert_eq!(
            tree.insert(&FileRecord::new("a/b/d", 4)),
            Insertion::Created
        );
        assert_eq!(
            serde_json::to_value(&tree).unwrap(),
            json!({"a": {"b": {"c": 3, "d": 4}}, "x": {"y": 2}})
        );
    }

    #[test]
    fn directory_replaced_by_leaf() {
        let mut tree = tree_of(&[("a/b/c", 1), ("a/b/d", 2)]);
        assert_eq!(tree.insert(&FileRecord::new("a/b", 9)), Insertion::Collided);
        assert_eq!(serde_json::to_value(&tree).unwrap(), json!({"a": {"b": 9}}));
        assert_eq!(tree.file_count(), 1);
    }

    #[test]
    fn siblings_keep_log_order() {
        let tree = tree_of(&[("z.txt", 1), ("a.txt", 2), ("m/n.txt", 3)]);
        assert_eq!(
            tree.to_json(None).unwrap(),
            r#"{"z.txt":1,"a.txt":2,"m":{"n.txt":3}}"#
        );
    }

    #[test]
    fn every_leaf_reconstructs_a_record_path() {
        let records = [
            ("docs/a.txt", 1),
            ("docs/nested/deeper/b.txt", 2),
            ("c.txt", 3),
            ("docs/nested/e.txt", 4),
        ];
        let tree = tree_of(&records);
        let files: Vec<(String, u64)> = tree.files().collect();
        assert_eq!(
            files,
            vec![
                ("docs/a.txt".to_string(), 1),
                ("docs/nested/deeper/b.txt".to_string(), 2),
                ("docs/nested/e.txt".to_string(), 4),
                ("c.txt".to_string(), 3),
            ]
        );
    }

    #[test]
    fn empty_segments_are_kept() {
        let tree = tree_of(&[("/abs/file", 1), ("a//b", 2)]);
        let mut files: Vec<(String, u64)> = tree.files().collect();
        files.sort();
        assert_eq!(
            files,
            vec![("/abs/file".to_string(), 1), ("a//b".to_string(), 2)]
        );
        assert_eq!(tree.get("/abs/file"), Some(&PathNode::Leaf(1)));
    }

    #[test]
    fn deep_paths_do_not_recurse() {
        let path = vec!["d"; 1_000].join("/") + "/leaf";
        let tree = tree_of(&[(path.as_str(), 1)]);
        assert_eq!(tree.file_count(), 1);
        assert_eq!(tree.get(&path), Some(&PathNode::Leaf(1)));
        assert_eq!(tree.files().next(), Some((path, 1)));
    }

    #[test]
    fn get_through_a_leaf_is_none() {
        let tree = tree_of(&[("a/b", 1)]);
        assert_eq!(tree.get("a/b/c"), None);
        assert_eq!(tree.get("missing"), None);
        assert!(matches!(tree.get("a"), Some(PathNode::Directory(_))));
    }

    #[test]
    fn indented_json() {
        let tree = tree_of(&[("a/b.txt", 1)]);
        assert_eq!(
            tree.to_json(Some(2)).unwrap(),
            "{\n  \"a\": {\n    \"b.txt\": 1\n  }\n}"
        );
        assert_eq!(
            tree.to_json(Some(0)).unwrap(),
            "{\n\"a\": {\n\"b.txt\": 1\n}\n}"
        );
    }

    #[test]
    fn empty_tree_is_an_empty_object() {
        let tree = PathTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.to_json(None).unwrap(), "{}");
        assert_eq!(tree.to_json(Some(4)).unwrap(), "{}");
    }

    #[test]
    fn json_round_trips_back_into_a_tree() {
        let tree = tree_of(&[("a/b.txt", 1), ("c", 0)]);
        let parsed: PathTree = serde_json::from_str(&tree.to_json(Some(2)).unwrap()).unwrap();
        assert_eq!(parsed, tree);
    }
}
