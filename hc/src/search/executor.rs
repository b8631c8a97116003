//! Brute-force search over one share

use tracing::{debug, info};

use crate::combinations::{Alphabet, shares_range, total_combinations, word_by_index};
use crate::digest::DigestComparator;
use crate::error::CrackResult;
use crate::models::Share;

/// Test every candidate of `share` against `comparator`
///
/// Recomputes the space size from the share's own alphabet and length, then
/// walks its rank range in order. Matches come back in rank order. A decode
/// failure for an in-range rank aborts this search with the error.
pub fn run_share(share: &Share, comparator: &dyn DigestComparator) -> CrackResult<Vec<String>> {
    debug!(
        request_id = %share.request_id,
        part = share.part_number,
        parts = share.part_count,
        "run_share: called"
    );
    let alphabet = Alphabet::new(&share.alphabet)?;
    let total = total_combinations(alphabet.len(), share.max_length)?;
    let range = shares_range(total, share.part_count, share.part_number)?;
    info!(
        request_id = %share.request_id,
        part = share.part_number,
        start = range.start,
        end = range.end,
        "Searching index range"
    );

    let mut found = Vec::new();
    for index in range {
        let word = word_by_index(index, &alphabet, share.max_length)?;
        if comparator.matches(&word) {
            info!(request_id = %share.request_id, %word, "Found match");
            found.push(word);
        }
    }

    debug!(request_id = %share.request_id, found = found.len(), "run_share: finished");
    Ok(found)
}
