/// Standard capacity of one arena zone, header included.
pub const ZONE_SIZE: usize = 4096;

/// Bytes at the start of every zone reserved for its bookkeeping.
pub const ZONE_HEADER_SIZE: usize = 16;

pub const ALLOC_ALIGN: usize = 8;

pub const MAX_DEPTH: usize = 256;

/// Longest error message, in bytes.
pub const MAX_ERROR_LEN: usize = 255;

pub const BEZIER_SEGMENTS: usize = 10;

pub const DEFAULT_SKIN_NAME: &str = "default";

pub const DEFAULT_REGION_SIZE: f32 = 32.0;

#[inline]
pub fn is_whitespace_byte(byte: u8) -> bool {
    byte != 0 && byte <= b' '
}

#[inline]
pub fn align_size(size: usize) -> usize {
    (size + ALLOC_ALIGN - 1) & !(ALLOC_ALIGN - 1)
}
