//! Splitting the search space into near-equal contiguous shares

use std::ops::Range;

use tracing::debug;

use crate::error::{CrackError, CrackResult};

/// Half-open rank range owned by share `part_number` (1-based) of `part_count`
///
/// The first `total % part_count` shares get one extra rank. Concatenating
/// the ranges for `1..=part_count` reproduces `0..total` exactly; shares past
/// the end of a small space get an empty range.
pub fn shares_range(total: u64, part_count: u32, part_number: u32) -> CrackResult<Range<u64>> {
    debug!(total, part_count, part_number, "shares_range: called");
    if part_count == 0 {
        return Err(CrackError::Validation("partCount must be positive".to_string()));
    }
    if part_number == 0 || part_number > part_count {
        return Err(CrackError::Validation(format!(
            "partNumber {} outside 1..={}",
            part_number, part_count
        )));
    }

    let count = u64::from(part_count);
    let before = u64::from(part_number - 1);
    let size = total / count;
    let remainder = total % count;

    let start = before * size + before.min(remainder);
    let end = start + size + u64::from(before < remainder);

    debug!(start, end, "shares_range: computed");
    Ok(start..end)
}
