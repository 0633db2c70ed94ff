mod parser;

use std::io::Read;

use tracing::debug;

use crate::arena::Arena;
use crate::query::JsonRef;
use crate::{Error, ErrorKind, ParseOptions, Result};

pub use parser::parse_into;

/// A parsed document: the arena holding every node and string, plus the id
/// of the root node.
#[derive(Debug)]
pub struct Document {
    arena: Arena,
    root: usize,
}

impl Document {
    pub fn root(&self) -> JsonRef<'_> {
        JsonRef::new(&self.arena, self.root)
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn node_count(&self) -> usize {
        self.arena.nodes.len()
    }

    /// Hands the arena back so it can be cleared and reused.
    pub fn into_arena(self) -> Arena {
        self.arena
    }
}

pub fn from_str(input: &str, options: &ParseOptions) -> Result<Document> {
    let mut arena = Arena::with_zone_size(options.zone_size);
    let root = match parse_into(&mut arena, input.as_bytes(), options) {
        Ok(root) => root,
        Err(err) => {
            debug!(offset = ?err.location.map(|loc| loc.offset), "JSON parse failed");
            return Err(err);
        }
    };
    debug!(
        nodes = arena.nodes.len(),
        zones = arena.zones.zone_count(),
        "parsed JSON document"
    );
    Ok(Document { arena, root })
}

pub fn from_slice(input: &[u8], options: &ParseOptions) -> Result<Document> {
    let text = std::str::from_utf8(input)
        .map_err(|err| Error::malformed_json(input, err.valid_up_to()))?;
    from_str(text, options)
}

pub fn from_reader<R: Read>(mut reader: R, options: &ParseOptions) -> Result<Document> {
    let mut buf = Vec::new();
    reader
        .read_to_end(&mut buf)
        .map_err(|err| {
            Error::new(ErrorKind::MissingFile, "Unable to read input: ", err.to_string())
        })?;
    from_slice(&buf, options)
}
