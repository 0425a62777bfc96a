//! Demand splitting into vehicle-sized chunks

use std::num::NonZeroU32;

/// Split `weight` greedily into chunks of at most `capacity`.
///
/// Full chunks come first and the remainder last, so at most the final chunk
/// is below capacity. Callers skip zero demand.
pub fn split_demand(weight: u32, capacity: NonZeroU32) -> Vec<u32> {
    let capacity = capacity.get();
    let mut chunks = Vec::with_capacity((weight / capacity) as usize + 1);
    let mut remainder = weight;
    while remainder > capacity {
        chunks.push(capacity);
        remainder -= capacity;
    }
    chunks.push(remainder);
    chunks
}
