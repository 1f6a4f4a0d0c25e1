use fclink_wire::{BlockHeader, BlockPayload, BlockType, ControlLoopData, LogBlock};

/// Hands out sequential log block ids.
///
/// Owned by whichever component fabricates synthetic records and passed by
/// handle; there is deliberately no process-wide counter state.
#[derive(Debug, Default)]
pub struct BlockIdCounter {
    next: u32,
}

impl BlockIdCounter {
    /// A counter starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// A counter starting at an arbitrary id.
    pub fn starting_at(next: u32) -> Self {
        Self { next }
    }

    /// Take the next id.
    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next = self.next.wrapping_add(1);
        id
    }
}

/// Fabricates control-loop log blocks for bench runs.
///
/// Readings are deterministic functions of the block id so a consumer can
/// verify what it received.
pub struct BlockSource {
    counter: BlockIdCounter,
}

impl BlockSource {
    /// A source with a fresh counter.
    pub fn new() -> Self {
        Self::with_counter(BlockIdCounter::new())
    }

    /// A source using an existing counter.
    pub fn with_counter(counter: BlockIdCounter) -> Self {
        Self { counter }
    }

    /// Fabricate the next block, stamped with the caller's `timestamp`.
    pub fn next_block(&mut self, timestamp: u32) -> LogBlock {
        let id = self.counter.next_id();
        let base = (id % 1000) as i16;
        LogBlock {
            header: BlockHeader {
                block_type: BlockType::ControlLoop,
                timestamp,
                id,
            },
            payload: BlockPayload::ControlLoop(ControlLoopData {
                raw_gyro_x: base,
                raw_gyro_y: -base,
                raw_gyro_z: base / 2,
            }),
        }
    }
}

impl Default for BlockSource {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_is_sequential() {
        let mut counter = BlockIdCounter::new();
        assert_eq!(counter.next_id(), 0);
        assert_eq!(counter.next_id(), 1);
        assert_eq!(counter.next_id(), 2);
    }

    #[test]
    fn counter_can_start_anywhere() {
        let mut counter = BlockIdCounter::starting_at(u32::MAX);
        assert_eq!(counter.next_id(), u32::MAX);
        assert_eq!(counter.next_id(), 0);
    }

    #[test]
    fn source_ids_are_monotonic() {
        let mut source = BlockSource::new();
        let a = source.next_block(10);
        let b = source.next_block(11);
        let c = source.next_block(12);

        assert_eq!(a.header.id, 0);
        assert_eq!(b.header.id, 1);
        assert_eq!(c.header.id, 2);
        assert_eq!(b.header.timestamp, 11);
        assert_eq!(a.header.block_type, BlockType::ControlLoop);
    }

    #[test]
    fn readings_are_deterministic_in_id() {
        let mut source = BlockSource::with_counter(BlockIdCounter::starting_at(5));
        let block = source.next_block(0);
        let BlockPayload::ControlLoop(data) = block.payload;
        assert_eq!(data.raw_gyro_x, 5);
        assert_eq!(data.raw_gyro_y, -5);
        assert_eq!(data.raw_gyro_z, 2);
    }

    #[test]
    fn independent_sources_do_not_share_state() {
        let mut a = BlockSource::new();
        let mut b = BlockSource::new();
        assert_eq!(a.next_block(0).header.id, 0);
        assert_eq!(b.next_block(0).header.id, 0);
        assert_eq!(a.next_block(0).header.id, 1);
    }
}
