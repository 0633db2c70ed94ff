//! Read-only views over a parsed node forest.

use std::cmp::Ordering;
use std::fmt;

use tracing::trace;

use crate::arena::{Arena, Node, NodeKind};
use crate::num::number::{parse_number_prefix, NumberViews, Numeric};
use crate::text::string::compare_names;

#[derive(Clone, Copy)]
pub struct JsonRef<'a> {
    arena: &'a Arena,
    id: usize,
}

impl<'a> JsonRef<'a> {
    pub(crate) fn new(arena: &'a Arena, id: usize) -> Self {
        Self { arena, id }
    }

    /// Looks a node up by id; `None` when the id is not in the arena.
    pub fn from_arena(arena: &'a Arena, id: usize) -> Option<Self> {
        arena.node(id).map(|_| Self { arena, id })
    }

    fn node(&self) -> &'a Node {
        &self.arena.nodes[self.id]
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.node().kind
    }

    pub fn is_null(&self) -> bool {
        self.kind() == NodeKind::Null
    }

    pub fn name(&self) -> Option<&'a str> {
        self.node().name.map(|name| self.arena.get_str(name))
    }

    pub fn as_str(&self) -> Option<&'a str> {
        self.node().string.map(|string| self.arena.get_str(string))
    }

    /// Numeric views of this node. A string payload that was never read as a
    /// number is coerced once and the result cached on the node.
    pub fn views(&self) -> NumberViews {
        let node = self.node();
        if node.numeric.get() == Numeric::Pending {
            let coerced = self
                .as_str()
                .and_then(|text| parse_number_prefix(text.as_bytes()))
                .map_or(Numeric::NotNumeric, |(views, _)| Numeric::Parsed(views));
            trace!(node = self.id, ?coerced, "coerced string payload");
            node.numeric.set(coerced);
        }
        node.numeric.get().views()
    }

    pub fn as_float(&self) -> f32 {
        self.views().float
    }

    pub fn as_int(&self) -> i32 {
        self.views().int
    }

    pub fn as_long(&self) -> i64 {
        self.views().long
    }

    /// Child count recorded while parsing.
    pub fn size(&self) -> usize {
        self.node().child_len
    }

    pub fn children(&self) -> Children<'a> {
        Children {
            arena: self.arena,
            cursor: self.node().first_child,
        }
    }

    /// First direct child whose name matches `name`, ignoring ASCII case.
    pub fn item(&self, name: &str) -> Option<JsonRef<'a>> {
        self.children()
            .find(|child| compare_names(child.name(), Some(name)) == Ordering::Equal)
    }

    pub fn item_at(&self, index: usize) -> Option<JsonRef<'a>> {
        self.children().nth(index)
    }

    pub fn get_string(&self, name: &str, default: Option<&'a str>) -> Option<&'a str> {
        self.item(name).and_then(|item| item.as_str()).or(default)
    }

    pub fn get_float(&self, name: &str, default: f32) -> f32 {
        self.item(name).map_or(default, |item| item.as_float())
    }

    pub fn get_int(&self, name: &str, default: i32) -> i32 {
        self.item(name).map_or(default, |item| item.as_int())
    }

    pub fn get_long(&self, name: &str, default: i64) -> i64 {
        self.item(name).map_or(default, |item| item.as_long())
    }

    pub fn get_bool(&self, name: &str, default: bool) -> bool {
        self.get_int(name, default as i32) != 0
    }

    /// Calls `callback` for every child of the item named `name`, or of this
    /// node when `name` is `None`. Returns whether the named item exists.
    pub fn for_each<F>(&self, name: Option<&str>, mut callback: F) -> bool
    where
        F: FnMut(JsonRef<'a>),
    {
        let list = match name {
            Some(name) => match self.item(name) {
                Some(item) => item,
                None => return false,
            },
            None => *self,
        };
        list.children().for_each(&mut callback);
        true
    }

    pub fn get_string_array(&self, name: &str) -> Vec<String> {
        self.get_string_array_or(name, Vec::new())
    }

    /// Non-string elements contribute an empty string.
    pub fn get_string_array_or(&self, name: &str, default: Vec<String>) -> Vec<String> {
        let mut result = Vec::new();
        let found = self.for_each(Some(name), |item| {
            result.push(item.as_str().unwrap_or_default().to_string());
        });
        if found {
            result
        } else {
            default
        }
    }

    pub fn get_int_array(&self, name: &str) -> Vec<i32> {
        self.get_int_array_or(name, Vec::new())
    }

    /// Elements are read from their parsed views without string coercion.
    pub fn get_int_array_or(&self, name: &str, default: Vec<i32>) -> Vec<i32> {
        let mut result = Vec::new();
        let found = self.for_each(Some(name), |item| result.push(item.cached_views().int));
        if found {
            result
        } else {
            default
        }
    }

    pub fn get_long_array(&self, name: &str) -> Vec<i64> {
        self.get_long_array_or(name, Vec::new())
    }

    pub fn get_long_array_or(&self, name: &str, default: Vec<i64>) -> Vec<i64> {
        let mut result = Vec::new();
        let found = self.for_each(Some(name), |item| result.push(item.cached_views().long));
        if found {
            result
        } else {
            default
        }
    }

    fn cached_views(&self) -> NumberViews {
        self.node().numeric.get().views()
    }
}

impl fmt::Debug for JsonRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonRef")
            .field("id", &self.id)
            .field("kind", &self.kind())
            .field("name", &self.name())
            .field("size", &self.size())
            .finish()
    }
}

pub struct Children<'a> {
    arena: &'a Arena,
    cursor: Option<usize>,
}

impl<'a> Iterator for Children<'a> {
    type Item = JsonRef<'a>;

    fn next(&mut self) -> Option<JsonRef<'a>> {
        let current = self.cursor?;
        let node = self.arena.node(current)?;
        self.cursor = node.next;
        Some(JsonRef::new(self.arena, current))
    }
}
