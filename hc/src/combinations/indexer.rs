//! Bijection between integer ranks and candidate strings
//!
//! Candidates are ordered first by length (1..=max_length), then, within a
//! length, as base-`b` numerals with the most significant symbol first.
//! Rank 0 is the single-symbol word made of `alphabet.symbol(0)`.

use tracing::debug;

use super::alphabet::Alphabet;
use crate::error::{CrackError, CrackResult};

/// Size of the enumerable space: `sum(b^l for l in 1..=max_length)`
///
/// Fails closed with `Overflow` as soon as a power or the running sum leaves
/// the u64 range. An empty alphabet yields an empty space.
pub fn total_combinations(alphabet_size: usize, max_length: usize) -> CrackResult<u64> {
    debug!(alphabet_size, max_length, "total_combinations: called");
    if alphabet_size == 0 {
        return Ok(0);
    }

    let overflow = || CrackError::Overflow {
        alphabet_size,
        max_length,
    };
    let base = alphabet_size as u64;

    // One word per length, so the sum is just the length
    if base == 1 {
        return u64::try_from(max_length).map_err(|_| overflow());
    }

    let mut total: u64 = 0;
    let mut power: u64 = 1;
    for _ in 0..max_length {
        power = power.checked_mul(base).ok_or_else(overflow)?;
        total = total.checked_add(power).ok_or_else(overflow)?;
    }

    debug!(total, "total_combinations: computed");
    Ok(total)
}

/// Decode the candidate at `index`
///
/// Subtracts the count of every shorter length until the remainder fits the
/// current length, then spells the remainder as a zero-padded numeral.
pub fn word_by_index(index: u64, alphabet: &Alphabet, max_length: usize) -> CrackResult<String> {
    let base = alphabet.len() as u64;
    if base == 0 {
        return Err(CrackError::IndexOutOfRange { index, total: 0 });
    }

    let mut remaining = index;
    let mut count: u64 = 1;
    let mut skipped: u64 = 0;
    for length in 1..=max_length {
        count = match count.checked_mul(base) {
            Some(count) => count,
            // Words of this length outnumber u64, so any remainder lands here
            None => return Ok(spell(remaining, length, alphabet)),
        };
        if remaining < count {
            return Ok(spell(remaining, length, alphabet));
        }
        remaining -= count;
        skipped += count;
    }

    Err(CrackError::IndexOutOfRange { index, total: skipped })
}

/// Rank of `word`, the inverse of [`word_by_index`]
pub fn index_of_word(word: &str, alphabet: &Alphabet, max_length: usize) -> CrackResult<u64> {
    debug!(%word, max_length, "index_of_word: called");
    let length = word.chars().count();
    if length == 0 || length > max_length {
        return Err(CrackError::Validation(format!(
            "word length {} outside 1..={}",
            length, max_length
        )));
    }

    let overflow = || CrackError::Overflow {
        alphabet_size: alphabet.len(),
        max_length: length,
    };
    let base = alphabet.len() as u64;

    // Ranks taken by all shorter words
    let mut offset: u64 = 0;
    let mut power: u64 = 1;
    for _ in 1..length {
        power = power.checked_mul(base).ok_or_else(overflow)?;
        offset = offset.checked_add(power).ok_or_else(overflow)?;
    }

    let mut value: u64 = 0;
    for c in word.chars() {
        let digit = alphabet
            .position(c)
            .ok_or_else(|| CrackError::Validation(format!("symbol '{}' is not in the alphabet", c)))?;
        value = value
            .checked_mul(base)
            .and_then(|v| v.checked_add(digit as u64))
            .ok_or_else(overflow)?;
    }

    offset.checked_add(value).ok_or_else(overflow)
}

/// Spell `value` as a base-`b` numeral of exactly `length` symbols
fn spell(mut value: u64, length: usize, alphabet: &Alphabet) -> String {
    let base = alphabet.len() as u64;
    let mut symbols = vec![alphabet.symbol(0); length];
    for slot in symbols.iter_mut().rev() {
        *slot = alphabet.symbol((value % base) as usize);
        value /= base;
    }
    symbols.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ab() -> Alphabet {
        Alphabet::new("ab").unwrap()
    }

    #[test]
    fn test_total_combinations_small() {
        assert_eq!(total_combinations(2, 2).unwrap(), 6);
        assert_eq!(total_combinations(36, 1).unwrap(), 36);
        assert_eq!(total_combinations(36, 2).unwrap(), 36 + 1296);
        assert_eq!(total_combinations(1, 5).unwrap(), 5);
    }

    #[test]
    fn test_total_combinations_empty_alphabet() {
        assert_eq!(total_combinations(0, 10).unwrap(), 0);
    }

    #[test]
    fn test_total_combinations_zero_length() {
        assert_eq!(total_combinations(36, 0).unwrap(), 0);
    }

    #[test]
    fn test_total_combinations_overflow_trips() {
        // 36^12 fits, 36^13 does not
        assert!(total_combinations(36, 12).is_ok());
        let err = total_combinations(36, 13).unwrap_err();
        assert!(matches!(
            err,
            CrackError::Overflow {
                alphabet_size: 36,
                max_length: 13
            }
        ));
    }

    #[test]
    fn test_total_combinations_single_symbol() {
        assert_eq!(total_combinations(1, 5).unwrap(), 5);
        assert_eq!(total_combinations(1, usize::MAX).unwrap(), usize::MAX as u64);
    }

    #[test]
    fn test_total_combinations_binary_edge() {
        // 2 + 4 + ... + 2^63 = 2^64 - 2 is the largest binary space that fits
        assert_eq!(total_combinations(2, 63).unwrap(), u64::MAX - 1);
        assert!(total_combinations(2, 64).is_err());
    }

    #[test]
    fn test_word_by_index_end_to_end_order() {
        let alphabet = ab();
        let words: Vec<String> = (0..6).map(|i| word_by_index(i, &alphabet, 2).unwrap()).collect();
        assert_eq!(words, vec!["a", "b", "aa", "ab", "ba", "bb"]);
    }

    #[test]
    fn test_word_by_index_out_of_range() {
        let err = word_by_index(6, &ab(), 2).unwrap_err();
        assert!(matches!(err, CrackError::IndexOutOfRange { index: 6, total: 6 }));
    }

    #[test]
    fn test_word_by_index_empty_alphabet() {
        let alphabet = Alphabet::new("").unwrap();
        assert!(word_by_index(0, &alphabet, 3).is_err());
    }

    #[test]
    fn test_word_by_index_default_alphabet_boundaries() {
        let alphabet = Alphabet::default();
        assert_eq!(word_by_index(0, &alphabet, 4).unwrap(), "a");
        assert_eq!(word_by_index(35, &alphabet, 4).unwrap(), "9");
        assert_eq!(word_by_index(36, &alphabet, 4).unwrap(), "aa");
        assert_eq!(word_by_index(36 + 1295, &alphabet, 4).unwrap(), "99");
    }

    #[test]
    fn test_word_by_index_beyond_representable_total() {
        // Space for length 13 overflows u64 but low ranks still decode
        let alphabet = Alphabet::default();
        assert_eq!(word_by_index(0, &alphabet, 13).unwrap(), "a");
        assert!(word_by_index(u64::MAX, &alphabet, 13).is_ok());
    }

    #[test]
    fn test_index_of_word() {
        let alphabet = ab();
        assert_eq!(index_of_word("a", &alphabet, 2).unwrap(), 0);
        assert_eq!(index_of_word("ba", &alphabet, 2).unwrap(), 4);
        assert_eq!(index_of_word("bb", &alphabet, 2).unwrap(), 5);
    }

    #[test]
    fn test_index_of_word_rejects_bad_input() {
        let alphabet = ab();
        assert!(index_of_word("", &alphabet, 2).is_err());
        assert!(index_of_word("aaa", &alphabet, 2).is_err());
        assert!(index_of_word("ac", &alphabet, 2).is_err());
    }

    proptest! {
        #[test]
        fn prop_word_by_index_inverts_rank(b in 1usize..7, l in 1usize..5, seed in any::<u64>()) {
            let symbols: String = "abcdefg".chars().take(b).collect();
            let alphabet = Alphabet::new(&symbols).unwrap();
            let total = total_combinations(b, l).unwrap();
            let index = seed % total;

            let word = word_by_index(index, &alphabet, l).unwrap();
            prop_assert!(word.chars().count() >= 1);
            prop_assert!(word.chars().count() <= l);
            prop_assert!(word.chars().all(|c| alphabet.contains(c)));
            prop_assert_eq!(index_of_word(&word, &alphabet, l).unwrap(), index);
        }

        #[test]
        fn prop_every_rank_decodes_to_a_distinct_word(b in 1usize..5, l in 1usize..4) {
            let symbols: String = "wxyz".chars().take(b).collect();
            let alphabet = Alphabet::new(&symbols).unwrap();
            let total = total_combinations(b, l).unwrap();

            let words: std::collections::HashSet<String> =
                (0..total).map(|i| word_by_index(i, &alphabet, l).unwrap()).collect();
            prop_assert_eq!(words.len() as u64, total);
            prop_assert!(word_by_index(total, &alphabet, l).is_err());
        }
    }
}
