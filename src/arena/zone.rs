//! Fixed-size-zone bump allocator.
//!
//! Zones are chained newest-first through `next`. Small requests bump the
//! head zone; a request that misses opens a fresh standard zone as the new
//! head, while an oversized request gets a dedicated zone spliced in right
//! after the head so the head keeps serving small requests.

use tracing::trace;

use crate::constants::{align_size, ZONE_HEADER_SIZE, ZONE_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub zone: usize,
    pub offset: usize,
    pub len: usize,
}

#[derive(Debug)]
struct Zone {
    data: Box<[u8]>,
    used: usize,
    next: Option<usize>,
}

#[derive(Debug)]
pub struct Zones {
    zones: Vec<Zone>,
    head: Option<usize>,
    zone_size: usize,
    allocations: usize,
}

impl Zones {
    pub fn new() -> Self {
        Self::with_zone_size(ZONE_SIZE)
    }

    pub fn with_zone_size(zone_size: usize) -> Self {
        Self {
            zones: Vec::new(),
            head: None,
            zone_size: zone_size.max(ZONE_HEADER_SIZE),
            allocations: 0,
        }
    }

    pub fn zone_size(&self) -> usize {
        self.zone_size
    }

    pub fn allocate(&mut self, size: usize) -> Block {
        let size = align_size(size);
        self.allocations += 1;

        if let Some(head) = self.head {
            let zone = &mut self.zones[head];
            if zone.used + size <= self.zone_size {
                let offset = zone.used;
                zone.used += size;
                return Block {
                    zone: head,
                    offset,
                    len: size,
                };
            }
        }

        let alloc_size = ZONE_HEADER_SIZE + size;
        let capacity = alloc_size.max(self.zone_size);
        let id = self.zones.len();
        let current_head = self.head;
        let next = match current_head {
            Some(head) if alloc_size > self.zone_size => {
                let next = self.zones[head].next;
                self.zones[head].next = Some(id);
                trace!(zone = id, capacity, "spliced oversized zone after head");
                next
            }
            previous => {
                self.head = Some(id);
                trace!(zone = id, capacity, "opened head zone");
                previous
            }
        };
        self.zones.push(Zone {
            data: vec![0u8; capacity].into_boxed_slice(),
            used: alloc_size,
            next,
        });
        Block {
            zone: id,
            offset: ZONE_HEADER_SIZE,
            len: size,
        }
    }

    /// Releases every zone at once. Calling it again is a no-op.
    pub fn deallocate(&mut self) {
        let released = self.chain().count();
        if released > 0 {
            trace!(released, "released arena zones");
        }
        self.zones.clear();
        self.head = None;
        self.allocations = 0;
    }

    pub fn head(&self) -> Option<usize> {
        self.head
    }

    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    pub fn allocations(&self) -> usize {
        self.allocations
    }

    pub fn used(&self, zone: usize) -> Option<usize> {
        self.zones.get(zone).map(|zone| zone.used)
    }

    pub fn capacity(&self, zone: usize) -> Option<usize> {
        self.zones.get(zone).map(|zone| zone.data.len())
    }

    /// Zone ids from the head towards the oldest zone.
    pub fn chain(&self) -> Chain<'_> {
        Chain {
            zones: self,
            cursor: self.head,
        }
    }

    pub fn bytes(&self, block: Block) -> &[u8] {
        self.zones
            .get(block.zone)
            .and_then(|zone| zone.data.get(block.offset..block.offset + block.len))
            .unwrap_or(&[])
    }

    pub fn bytes_mut(&mut self, block: Block) -> &mut [u8] {
        match self.zones.get_mut(block.zone) {
            Some(zone) => zone
                .data
                .get_mut(block.offset..block.offset + block.len)
                .unwrap_or(&mut []),
            None => &mut [],
        }
    }
}

impl Default for Zones {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Chain<'a> {
    zones: &'a Zones,
    cursor: Option<usize>,
}

impl Iterator for Chain<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let current = self.cursor?;
        self.cursor = self.zones.zones.get(current).and_then(|zone| zone.next);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    fn test_sizes_round_up_to_eight() {
        let mut zones = Zones::new();
        let block = zones.allocate(5);
        assert_eq!(block.len, 8);
        assert_eq!(block.offset, ZONE_HEADER_SIZE);
        assert_eq!(zones.used(block.zone), Some(ZONE_HEADER_SIZE + 8));
    }

    #[rstest::rstest]
    fn test_small_allocations_share_a_zone() {
        let mut zones = Zones::new();
        let first = zones.allocate(100);
        let second = zones.allocate(200);
        assert_eq!(zones.zone_count(), 1);
        assert_eq!(first.zone, second.zone);
        assert_eq!(second.offset, first.offset + 104);
    }

    #[rstest::rstest]
    fn test_full_head_is_replaced() {
        let mut zones = Zones::with_zone_size(64);
        let first = zones.allocate(40);
        let second = zones.allocate(16);
        assert_eq!(zones.zone_count(), 2);
        assert_ne!(first.zone, second.zone);
        assert_eq!(zones.head(), Some(second.zone));
        assert_eq!(zones.chain().collect::<Vec<_>>(), vec![second.zone, first.zone]);
    }

    #[rstest::rstest]
    fn test_oversized_allocation_keeps_head() {
        let mut zones = Zones::with_zone_size(128);
        let small = zones.allocate(16);
        let large = zones.allocate(1000);
        assert_eq!(zones.zone_count(), 2);
        assert_eq!(zones.head(), Some(small.zone));
        assert_eq!(zones.capacity(large.zone), Some(ZONE_HEADER_SIZE + 1000));
        assert_eq!(zones.chain().collect::<Vec<_>>(), vec![small.zone, large.zone]);

        let next_small = zones.allocate(16);
        assert_eq!(next_small.zone, small.zone);
        assert_eq!(zones.zone_count(), 2);
    }

    #[rstest::rstest]
    fn test_oversized_splice_preserves_older_zones() {
        let mut zones = Zones::with_zone_size(64);
        let oldest = zones.allocate(40);
        let head = zones.allocate(40);
        let large = zones.allocate(500);
        assert_eq!(
            zones.chain().collect::<Vec<_>>(),
            vec![head.zone, large.zone, oldest.zone]
        );
    }

    #[rstest::rstest]
    fn test_oversized_first_allocation_becomes_head() {
        let mut zones = Zones::with_zone_size(64);
        let large = zones.allocate(200);
        assert_eq!(zones.head(), Some(large.zone));
        let small = zones.allocate(8);
        assert_ne!(small.zone, large.zone);
        assert_eq!(zones.head(), Some(small.zone));
    }

    #[rstest::rstest]
    fn test_blocks_are_writable() {
        let mut zones = Zones::new();
        let block = zones.allocate(3);
        zones.bytes_mut(block)[..3].copy_from_slice(b"abc");
        assert_eq!(&zones.bytes(block)[..3], b"abc");
    }

    #[rstest::rstest]
    fn test_deallocate_is_idempotent() {
        let mut zones = Zones::new();
        zones.allocate(10);
        zones.allocate(5000);
        zones.deallocate();
        assert_eq!(zones.zone_count(), 0);
        assert_eq!(zones.head(), None);
        zones.deallocate();
        assert_eq!(zones.zone_count(), 0);
    }

    #[rstest::rstest]
    fn test_take_transfers_ownership() {
        let mut zones = Zones::new();
        zones.allocate(10);
        let moved = std::mem::take(&mut zones);
        assert_eq!(moved.zone_count(), 1);
        assert_eq!(zones.zone_count(), 0);
        assert_eq!(zones.head(), None);
    }
}
