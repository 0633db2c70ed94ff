use crate::arena::{Arena, NodeKind, StrRef};
use crate::constants::is_whitespace_byte;
use crate::num::number::{parse_number_prefix, NumberViews, Numeric};
use crate::text::string::{scan_string_end, unescape_into};
use crate::{Error, ParseOptions, Result};

/// Parses one JSON value from `input` into `arena` and returns the root
/// node id. Content after the root value is not inspected.
///
/// On failure the arena may hold a partial tree; clear or drop it.
pub fn parse_into(arena: &mut Arena, input: &[u8], options: &ParseOptions) -> Result<usize> {
    let mut parser = JsonParser {
        arena,
        input,
        pos: 0,
        depth: 0,
        max_depth: options.max_depth,
    };
    parser.parse_document()
}

struct JsonParser<'a, 'b> {
    arena: &'b mut Arena,
    input: &'a [u8],
    pos: usize,
    depth: usize,
    max_depth: usize,
}

impl JsonParser<'_, '_> {
    fn parse_document(&mut self) -> Result<usize> {
        self.skip_whitespace();
        let root = self.arena.push_node();
        self.parse_value(root)?;
        Ok(root)
    }

    #[inline]
    fn peek(&self) -> u8 {
        self.input.get(self.pos).copied().unwrap_or(0)
    }

    #[inline]
    fn skip_whitespace(&mut self) {
        while is_whitespace_byte(self.peek()) {
            self.pos += 1;
        }
    }

    fn fail<T>(&self, at: usize) -> Result<T> {
        Err(Error::malformed_json(self.input, at))
    }

    fn matches_keyword(&self, keyword: &[u8]) -> bool {
        self.input
            .get(self.pos..)
            .is_some_and(|rest| rest.starts_with(keyword))
    }

    fn parse_value(&mut self, id: usize) -> Result<()> {
        match self.peek() {
            b'n' if self.matches_keyword(b"null") => {
                self.set_scalar(id, NodeKind::Null, Numeric::NotNumeric);
                self.pos += 4;
                Ok(())
            }
            b'f' if self.matches_keyword(b"false") => {
                let views = NumberViews::from_bool(false);
                self.set_scalar(id, NodeKind::False, Numeric::Parsed(views));
                self.pos += 5;
                Ok(())
            }
            b't' if self.matches_keyword(b"true") => {
                let views = NumberViews::from_bool(true);
                self.set_scalar(id, NodeKind::True, Numeric::Parsed(views));
                self.pos += 4;
                Ok(())
            }
            b'"' => self.parse_string(id),
            b'[' => self.parse_array(id),
            b'{' => self.parse_object(id),
            b'-' | b'0'..=b'9' => self.parse_number(id),
            _ => self.fail(self.pos),
        }
    }

    fn set_scalar(&mut self, id: usize, kind: NodeKind, numeric: Numeric) {
        let node = &mut self.arena.nodes[id];
        node.kind = kind;
        node.numeric.set(numeric);
    }

    fn parse_number(&mut self, id: usize) -> Result<()> {
        match parse_number_prefix(&self.input[self.pos..]) {
            Some((views, consumed)) => {
                self.set_scalar(id, NodeKind::Number, Numeric::Parsed(views));
                self.pos += consumed;
                Ok(())
            }
            None => self.fail(self.pos),
        }
    }

    fn parse_string(&mut self, id: usize) -> Result<()> {
        let string = self.read_string()?;
        let node = &mut self.arena.nodes[id];
        node.kind = NodeKind::String;
        node.string = Some(string);
        node.numeric.set(Numeric::Pending);
        Ok(())
    }

    fn read_string(&mut self) -> Result<StrRef> {
        if self.peek() != b'"' {
            return self.fail(self.pos);
        }
        let start = self.pos + 1;
        let end = scan_string_end(self.input, start);
        let block = self.arena.zones.allocate(end - start);
        let len = unescape_into(self.input, start, end, self.arena.zones.bytes_mut(block));
        self.pos = if self.input.get(end) == Some(&b'"') {
            end + 1
        } else {
            end
        };
        Ok(StrRef { block, len })
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return self.fail(self.pos);
        }
        Ok(())
    }

    fn parse_array(&mut self, id: usize) -> Result<()> {
        self.enter()?;
        self.arena.nodes[id].kind = NodeKind::Array;
        self.pos += 1;
        self.skip_whitespace();
        if self.peek() == b']' {
            self.pos += 1;
            self.depth -= 1;
            return Ok(());
        }

        let mut child = self.arena.push_node();
        self.arena.nodes[id].first_child = Some(child);
        self.parse_value(child)?;
        self.skip_whitespace();
        self.arena.nodes[id].child_len = 1;

        while self.peek() == b',' {
            let next = self.arena.push_node();
            self.arena.nodes[child].next = Some(next);
            child = next;
            self.pos += 1;
            self.skip_whitespace();
            self.parse_value(child)?;
            self.skip_whitespace();
            self.arena.nodes[id].child_len += 1;
        }

        if self.peek() == b']' {
            self.pos += 1;
            self.depth -= 1;
            return Ok(());
        }
        self.fail(self.pos)
    }

    fn parse_object(&mut self, id: usize) -> Result<()> {
        self.enter()?;
        self.arena.nodes[id].kind = NodeKind::Object;
        self.pos += 1;
        self.skip_whitespace();
        if self.peek() == b'}' {
            self.pos += 1;
            self.depth -= 1;
            return Ok(());
        }

        let mut child = self.arena.push_node();
        self.arena.nodes[id].first_child = Some(child);
        self.parse_member(child)?;
        self.arena.nodes[id].child_len = 1;

        while self.peek() == b',' {
            let next = self.arena.push_node();
            self.arena.nodes[child].next = Some(next);
            child = next;
            self.pos += 1;
            self.skip_whitespace();
            self.parse_member(child)?;
            self.arena.nodes[id].child_len += 1;
        }

        if self.peek() == b'}' {
            self.pos += 1;
            self.depth -= 1;
            return Ok(());
        }
        self.fail(self.pos)
    }

    /// `"key" : value`, leaving the cursor on the byte after the value.
    fn parse_member(&mut self, id: usize) -> Result<()> {
        let key = self.read_string()?;
        self.arena.nodes[id].name = Some(key);
        self.skip_whitespace();
        if self.peek() != b':' {
            return self.fail(self.pos);
        }
        self.pos += 1;
        self.skip_whitespace();
        self.parse_value(id)?;
        self.skip_whitespace();
        Ok(())
    }
}
