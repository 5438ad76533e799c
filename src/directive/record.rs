// src/directive/record.rs

//! Sub-entity records
//!
//! Some directives may appear many times, each occurrence defining one
//! structured value (one btrfs volume, for example). Those values are records:
//! they have their own type tag, compare structurally, and render one canonical
//! line each. A directive keeps its records in a [`RecordList`], which refuses
//! to hold two identical definitions.

use std::fmt;
use strum_macros::IntoStaticStr;

/// Stable identifier of a record type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum RecordTag {
    BtrfsVolume,
}

impl RecordTag {
    /// Get the string form of the tag
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

/// A repeatable structured value owned by a directive
///
/// `PartialEq` is full structural equality, with member identifiers compared
/// as an unordered collection. [`Record::same_definition`] ignores members
/// entirely and is what directive-level equality uses.
pub trait Record: fmt::Display + fmt::Debug + Clone + PartialEq {
    /// Record type tag
    fn tag(&self) -> RecordTag;

    /// Member identifiers (devices, partitions) referenced by this record
    fn members(&self) -> &[String];

    /// Compare every field except member identifiers
    fn same_definition(&self, other: &Self) -> bool;
}

/// Compare two member lists as multisets
pub(crate) fn same_members(a: &[String], b: &[String]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut a: Vec<&String> = a.iter().collect();
    let mut b: Vec<&String> = b.iter().collect();
    a.sort();
    b.sort();
    a == b
}

/// Ordered records accumulated across repeated dispatches
#[derive(Debug, Clone)]
pub struct RecordList<R: Record> {
    records: Vec<R>,
}

impl<R: Record> Default for RecordList<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<R: Record> RecordList<R> {
    /// Create an empty record list
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether an identical record is already present
    pub fn contains(&self, record: &R) -> bool {
        self.records.iter().any(|r| r == record)
    }

    /// Append a record unless an identical one exists
    ///
    /// The rejected record is handed back so the caller can report it.
    pub fn push_unique(&mut self, record: R) -> std::result::Result<(), R> {
        if self.contains(&record) {
            return Err(record);
        }
        self.records.push(record);
        Ok(())
    }

    /// Records in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.records.iter()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the list is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a, R: Record> IntoIterator for &'a RecordList<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Unordered comparison using [`Record::same_definition`]
impl<R: Record> PartialEq for RecordList<R> {
    fn eq(&self, other: &Self) -> bool {
        if self.records.len() != other.records.len() {
            return false;
        }
        let mut matched = vec![false; other.records.len()];
        self.records.iter().all(|mine| {
            let hit = other
                .records
                .iter()
                .enumerate()
                .position(|(i, theirs)| !matched[i] && mine.same_definition(theirs));
            match hit {
                Some(i) => {
                    matched[i] = true;
                    true
                }
                None => false,
            }
        })
    }
}

impl<R: Record> fmt::Display for RecordList<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for record in &self.records {
            write!(f, "{}", record)?;
        }
        Ok(())
    }
}
