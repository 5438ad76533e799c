// src/registry/write_order.rs

//! Output ordering of directives
//!
//! Directives are written by ascending write priority; directives sharing a
//! priority are written in ascending tag order. This table is the only source
//! of render sequencing.

use crate::directive::DirectiveTag;
use std::collections::BTreeMap;

/// Priority → tags, each slot kept sorted by tag
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteOrder {
    slots: BTreeMap<i32, Vec<DirectiveTag>>,
}

impl WriteOrder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a tag at the given priority
    ///
    /// A tag already present in that slot keeps its position. A tag present
    /// at a different priority moves to the new one.
    pub fn insert(&mut self, tag: DirectiveTag, priority: i32) {
        if self.priority_of(tag).is_some_and(|p| p != priority) {
            self.remove(tag);
        }

        let slot = self.slots.entry(priority).or_default();
        match slot.binary_search(&tag) {
            Ok(pos) => slot[pos] = tag,
            Err(pos) => slot.insert(pos, tag),
        }
    }

    /// Remove a tag, dropping its slot if it becomes empty
    pub fn remove(&mut self, tag: DirectiveTag) -> bool {
        let Some(priority) = self.priority_of(tag) else {
            return false;
        };
        if let Some(slot) = self.slots.get_mut(&priority) {
            slot.retain(|t| *t != tag);
            if slot.is_empty() {
                self.slots.remove(&priority);
            }
        }
        true
    }

    /// Priority a tag is currently written at
    pub fn priority_of(&self, tag: DirectiveTag) -> Option<i32> {
        self.slots
            .iter()
            .find(|(_, slot)| slot.contains(&tag))
            .map(|(priority, _)| *priority)
    }

    /// Tags written at one priority
    pub fn slot(&self, priority: i32) -> Option<&[DirectiveTag]> {
        self.slots.get(&priority).map(Vec::as_slice)
    }

    /// Priorities in use, ascending
    pub fn priorities(&self) -> impl Iterator<Item = i32> + '_ {
        self.slots.keys().copied()
    }

    /// All tags in render order
    pub fn iter(&self) -> impl Iterator<Item = DirectiveTag> + '_ {
        self.slots.values().flat_map(|slot| slot.iter().copied())
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_is_priority_then_tag() {
        let mut order = WriteOrder::new();
        order.insert(DirectiveTag::Zerombr, 110);
        order.insert(DirectiveTag::Lang, 0);
        order.insert(DirectiveTag::Btrfs, 132);
        order.insert(DirectiveTag::Autostep, 0);
        order.insert(DirectiveTag::Keyboard, 0);

        let tags: Vec<DirectiveTag> = order.iter().collect();
        assert_eq!(
            tags,
            vec![
                DirectiveTag::Autostep,
                DirectiveTag::Keyboard,
                DirectiveTag::Lang,
                DirectiveTag::Zerombr,
                DirectiveTag::Btrfs,
            ]
        );
        assert_eq!(order.priorities().collect::<Vec<_>>(), vec![0, 110, 132]);
    }

    #[test]
    fn test_reinsert_keeps_position() {
        let mut order = WriteOrder::new();
        order.insert(DirectiveTag::Autostep, 0);
        order.insert(DirectiveTag::Lang, 0);
        order.insert(DirectiveTag::SkipX, 0);
        order.insert(DirectiveTag::Lang, 0);
        assert_eq!(
            order.slot(0).unwrap(),
            &[DirectiveTag::Autostep, DirectiveTag::Lang, DirectiveTag::SkipX]
        );
    }

    #[test]
    fn test_reinsert_at_new_priority_moves() {
        let mut order = WriteOrder::new();
        order.insert(DirectiveTag::Btrfs, 132);
        order.insert(DirectiveTag::Btrfs, 140);
        assert_eq!(order.priority_of(DirectiveTag::Btrfs), Some(140));
        assert!(order.slot(132).is_none());
    }

    #[test]
    fn test_remove_drops_empty_slot() {
        let mut order = WriteOrder::new();
        order.insert(DirectiveTag::Zerombr, 110);
        order.insert(DirectiveTag::Lang, 0);
        assert!(order.remove(DirectiveTag::Zerombr));
        assert!(order.slot(110).is_none());
        assert!(!order.remove(DirectiveTag::Zerombr));
        assert_eq!(order.iter().collect::<Vec<_>>(), vec![DirectiveTag::Lang]);
    }
}
