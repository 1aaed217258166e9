//! Git tree object
//!
//! Trees represent directory snapshots. They contain entries for files (blobs)
//! and subdirectories (other trees), along with their names and modes.
//!
//! ## Format
//!
//! On disk: `tree <size>\0<entries>`
//! Each entry: `<mode> <name>\0<20-byte-sha1>`
//!
//! Names are raw bytes, written and read back untouched; only display is
//! lossy. Entries are framed in the order they are held. [`Tree::sort_entries`] puts
//! them in canonical order: by name, with directory names compared as if they
//! ended in `/`.

use crate::artifacts::objects::OBJECT_ID_SIZE;
use crate::artifacts::objects::cursor::ByteCursor;
use crate::artifacts::objects::entry_mode::EntryMode;
use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{ObjectError, ObjectResult};
use bytes::{BufMut, Bytes, BytesMut};
use derive_new::new;

/// A single `(mode, name, oid)` record of a tree
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct TreeEntry {
    pub mode: EntryMode,
    pub name: Bytes,
    pub oid: ObjectId,
}

impl TreeEntry {
    pub fn is_tree(&self) -> bool {
        self.mode.is_tree()
    }

    fn sort_key(&self) -> Vec<u8> {
        let mut key = self.name.to_vec();
        if self.is_tree() {
            key.push(b'/');
        }
        key
    }

    fn write_to(&self, buffer: &mut BytesMut) {
        buffer.put_slice(self.mode.as_string().as_bytes());
        buffer.put_u8(b' ');
        buffer.put_slice(&self.name);
        buffer.put_u8(b'\0');
        buffer.put_slice(self.oid.as_bytes());
    }
}

/// Git tree object representing a directory snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    entries: Vec<TreeEntry>,
}

impl Tree {
    pub fn new(entries: Vec<TreeEntry>) -> Self {
        Tree { entries }
    }

    pub fn push(&mut self, entry: TreeEntry) {
        self.entries.push(entry);
    }

    pub fn sort_entries(&mut self) {
        self.entries.sort_by_cached_key(TreeEntry::sort_key);
    }

    pub fn entries(&self) -> impl Iterator<Item = &TreeEntry> {
        self.entries.iter()
    }

    pub fn into_entries(self) -> impl Iterator<Item = TreeEntry> {
        self.entries.into_iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Packable for Tree {
    fn payload(&self) -> Bytes {
        let mut payload = BytesMut::new();
        for entry in &self.entries {
            entry.write_to(&mut payload);
        }

        payload.freeze()
    }
}

impl Unpackable for Tree {
    fn deserialize(payload: Bytes) -> ObjectResult<Self> {
        let entries = iterate_tree(&payload).collect::<ObjectResult<Vec<_>>>()?;
        Ok(Tree::new(entries))
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }

    fn display(&self) -> String {
        self.entries
            .iter()
            .map(|entry| {
                format!(
                    "{:06o} {} {}\t{}",
                    entry.mode.as_u32(),
                    entry.mode.object_type(),
                    entry.oid,
                    String::from_utf8_lossy(&entry.name)
                )
            })
            .collect::<Vec<String>>()
            .join("\n")
    }
}

/// Iterate over the entries of a tree payload
///
/// Records are read as "up to space" (mode), "up to NUL" (name) and a fixed
/// 20-byte raw id, until the payload is exhausted. A record truncated in any
/// field yields `MalformedObject` and ends the iteration.
pub fn iterate_tree(payload: &[u8]) -> TreeEntries<'_> {
    TreeEntries {
        cursor: ByteCursor::new(payload),
        failed: false,
    }
}

#[derive(Debug, Clone)]
pub struct TreeEntries<'p> {
    cursor: ByteCursor<'p>,
    failed: bool,
}

impl TreeEntries<'_> {
    fn read_entry(&mut self) -> ObjectResult<TreeEntry> {
        let offset = self.cursor.position();

        let mode = self.cursor.read_until(b' ').ok_or_else(|| {
            ObjectError::malformed(format!("tree entry at offset {offset}: truncated mode"))
        })?;
        let mode = EntryMode::try_from(mode)?;

        let name = self.cursor.read_until(b'\0').ok_or_else(|| {
            ObjectError::malformed(format!("tree entry at offset {offset}: truncated name"))
        })?;
        if name.is_empty() || name.contains(&b'/') {
            return Err(ObjectError::malformed(format!(
                "tree entry at offset {offset}: invalid name {:?}",
                String::from_utf8_lossy(name)
            )));
        }
        let name = Bytes::copy_from_slice(name);

        let oid = self.cursor.read_exact(OBJECT_ID_SIZE).ok_or_else(|| {
            ObjectError::malformed(format!(
                "tree entry {:?}: truncated object id ({} of {OBJECT_ID_SIZE} bytes)",
                String::from_utf8_lossy(&name),
                self.cursor.remaining().len()
            ))
        })?;
        let oid = ObjectId::from_raw(oid)?;

        Ok(TreeEntry::new(mode, name, oid))
    }
}

impl Iterator for TreeEntries<'_> {
    type Item = ObjectResult<TreeEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.cursor.is_exhausted() {
            return None;
        }

        let entry = self.read_entry();
        self.failed = entry.is_err();
        Some(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::frame::{frame, identify};
    use rstest::{fixture, rstest};

    fn oid(seed: &[u8]) -> ObjectId {
        identify(&frame(ObjectType::Blob, seed))
    }

    #[fixture]
    fn tree() -> Tree {
        Tree::new(vec![
            TreeEntry::new(EntryMode::from_permissions(0o644), "hello.txt".into(), oid(b"world")),
            TreeEntry::new(EntryMode::Directory, "sub".into(), oid(b"")),
            TreeEntry::new(EntryMode::from_permissions(0o755), "run.sh".into(), oid(b"#!/bin/sh")),
        ])
    }

    #[rstest]
    fn test_payload_layout(tree: Tree) {
        let payload = tree.payload();

        let hello = b"100644 hello.txt\0";
        assert_eq!(&payload[..hello.len()], hello);
        assert_eq!(
            &payload[hello.len()..hello.len() + OBJECT_ID_SIZE],
            oid(b"world").as_bytes()
        );
        assert_eq!(
            payload.len(),
            (17 + 20) + ("40000 sub\0".len() + 20) + ("100755 run.sh\0".len() + 20)
        );
    }

    #[rstest]
    fn test_iterate_tree_yields_entries_in_payload_order(tree: Tree) {
        let payload = tree.payload();

        let entries = iterate_tree(&payload)
            .collect::<ObjectResult<Vec<_>>>()
            .unwrap();

        pretty_assertions::assert_eq!(entries, tree.entries().cloned().collect::<Vec<_>>());
    }

    #[test]
    fn test_iterate_empty_payload() {
        assert_eq!(iterate_tree(b"").count(), 0);
        assert!(Tree::deserialize(Bytes::new()).unwrap().is_empty());
    }

    #[rstest]
    fn test_truncated_object_id_is_malformed(tree: Tree) {
        let payload = tree.payload();
        let truncated = &payload[..payload.len() - 5];

        let entries = iterate_tree(truncated).collect::<Vec<_>>();

        assert_eq!(entries.len(), 3);
        assert!(entries[0].is_ok());
        assert!(entries[1].is_ok());
        assert!(matches!(entries[2], Err(ObjectError::MalformedObject(_))));
    }

    #[rstest]
    #[case::mode(&b"100644"[..])]
    #[case::name(&b"100644 hello.txt"[..])]
    #[case::oid(&b"100644 hello.txt\0\x01\x02"[..])]
    #[case::bad_mode(&b"abc hello.txt\0"[..])]
    #[case::empty_name(&b"100644 \0aaaaaaaaaaaaaaaaaaaa"[..])]
    fn test_truncated_record_is_malformed(#[case] payload: &'static [u8]) {
        let result = Tree::deserialize(Bytes::from_static(payload));

        assert!(matches!(result, Err(ObjectError::MalformedObject(_))));
    }

    #[rstest]
    fn test_sort_entries_compares_directories_with_trailing_slash() {
        let mut tree = Tree::new(vec![
            TreeEntry::new(EntryMode::from_permissions(0o644), "foo.txt".into(), oid(b"1")),
            TreeEntry::new(EntryMode::Directory, "foo".into(), oid(b"2")),
            TreeEntry::new(EntryMode::from_permissions(0o644), "foo-bar".into(), oid(b"3")),
            TreeEntry::new(EntryMode::from_permissions(0o644), "a".into(), oid(b"4")),
        ]);

        tree.sort_entries();

        let names = tree.entries().map(|e| e.name.clone()).collect::<Vec<_>>();
        // '-' (0x2d) < '.' (0x2e) < '/' (0x2f)
        pretty_assertions::assert_eq!(names, vec!["a", "foo-bar", "foo.txt", "foo"]);
    }

    #[rstest]
    fn test_display_lists_entries(tree: Tree) {
        let display = tree.display();
        let lines = display.lines().collect::<Vec<_>>();

        pretty_assertions::assert_eq!(
            lines[0],
            format!("100644 blob {}\thello.txt", oid(b"world"))
        );
        pretty_assertions::assert_eq!(lines[1], format!("040000 tree {}\tsub", oid(b"")));
    }

    #[test]
    fn test_non_utf8_name_is_kept_verbatim() {
        let name = Bytes::from_static(b"caf\xe9.txt");
        let tree = Tree::new(vec![TreeEntry::new(
            EntryMode::from_permissions(0o644),
            name.clone(),
            oid(b"latin-1"),
        )]);

        let payload = tree.payload();
        assert_eq!(&payload[..b"100644 caf\xe9.txt\0".len()], b"100644 caf\xe9.txt\0");

        let decoded = Tree::deserialize(payload).unwrap();
        pretty_assertions::assert_eq!(decoded, tree);
        assert_eq!(decoded.entries().next().unwrap().name, name);
        assert!(decoded.display().ends_with("\tcaf\u{fffd}.txt"));
    }
}
