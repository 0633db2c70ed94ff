pub mod zone;

use std::cell::Cell;

use crate::num::number::Numeric;

pub use zone::{Block, Zones};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Null,
    False,
    True,
    Number,
    String,
    Array,
    Object,
}

/// A string payload living in one of the arena's zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrRef {
    pub block: Block,
    pub len: usize,
}

#[derive(Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub next: Option<usize>,
    pub first_child: Option<usize>,
    pub child_len: usize,
    pub name: Option<StrRef>,
    pub string: Option<StrRef>,
    pub numeric: Cell<Numeric>,
}

impl Node {
    fn empty() -> Self {
        Self {
            kind: NodeKind::Null,
            next: None,
            first_child: None,
            child_len: 0,
            name: None,
            string: None,
            numeric: Cell::new(Numeric::NotNumeric),
        }
    }
}

/// Owns everything produced by one parse: the node table and the zones
/// holding string payloads. Dropping or clearing it releases both at once.
#[derive(Debug, Default)]
pub struct Arena {
    pub nodes: Vec<Node>,
    pub zones: Zones,
}

impl Arena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_zone_size(zone_size: usize) -> Self {
        Self {
            nodes: Vec::new(),
            zones: Zones::with_zone_size(zone_size),
        }
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.zones.deallocate();
    }

    pub fn push_node(&mut self) -> usize {
        let id = self.nodes.len();
        self.nodes.push(Node::empty());
        id
    }

    pub fn node(&self, id: usize) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn get_str(&self, string: StrRef) -> &str {
        let bytes = self.zones.bytes(string.block);
        bytes
            .get(..string.len)
            .and_then(|bytes| std::str::from_utf8(bytes).ok())
            .unwrap_or("")
    }

    pub fn alloc_str(&mut self, value: &str) -> StrRef {
        let block = self.zones.allocate(value.len());
        self.zones.bytes_mut(block)[..value.len()].copy_from_slice(value.as_bytes());
        StrRef {
            block,
            len: value.len(),
        }
    }

    /// Ids of the direct children of `id`, following the sibling links.
    pub fn child_ids(&self, id: usize) -> SiblingIds<'_> {
        SiblingIds {
            nodes: &self.nodes,
            cursor: self.nodes.get(id).and_then(|node| node.first_child),
        }
    }
}

pub struct SiblingIds<'a> {
    nodes: &'a [Node],
    cursor: Option<usize>,
}

impl Iterator for SiblingIds<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let current = self.cursor?;
        self.cursor = self.nodes.get(current).and_then(|node| node.next);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    fn test_strings_round_trip_through_zones() {
        let mut arena = Arena::new();
        let hello = arena.alloc_str("hello");
        let empty = arena.alloc_str("");
        assert_eq!(arena.get_str(hello), "hello");
        assert_eq!(arena.get_str(empty), "");
        assert_eq!(arena.zones.zone_count(), 1);
    }

    #[rstest::rstest]
    fn test_child_ids_follow_links() {
        let mut arena = Arena::new();
        let parent = arena.push_node();
        let first = arena.push_node();
        let second = arena.push_node();
        arena.nodes[parent].first_child = Some(first);
        arena.nodes[first].next = Some(second);
        assert_eq!(arena.child_ids(parent).collect::<Vec<_>>(), vec![first, second]);
        assert_eq!(arena.child_ids(first).count(), 0);
    }

    #[rstest::rstest]
    fn test_clear_releases_nodes_and_zones() {
        let mut arena = Arena::with_zone_size(64);
        arena.push_node();
        arena.alloc_str("x");
        arena.clear();
        assert!(arena.nodes.is_empty());
        assert_eq!(arena.zones.zone_count(), 0);
        assert_eq!(arena.zones.zone_size(), 64);
    }
}
