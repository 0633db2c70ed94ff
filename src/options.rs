use crate::constants::{MAX_DEPTH, ZONE_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub zone_size: usize,
    pub max_depth: usize,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_zone_size(mut self, zone_size: usize) -> Self {
        self.zone_size = zone_size;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            zone_size: ZONE_SIZE,
            max_depth: MAX_DEPTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReadOptions {
    /// Applied to every positional and size field read from the document.
    pub scale: f32,
    pub parse: ParseOptions,
}

impl ReadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_parse_options(mut self, parse: ParseOptions) -> Self {
        self.parse = parse;
        self
    }
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            parse: ParseOptions::default(),
        }
    }
}
