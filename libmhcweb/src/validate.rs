use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::alphabet::is_common_amino_acid;

/// Batches smaller than this are checked on the calling thread.
const PARALLEL_BATCH_SIZE: usize = 4096;

/// Returns true if every character of `sequence` is a common amino acid
/// and its length (in characters) lies in `[min_length, max_length]`.
pub fn is_valid(sequence: &str, min_length: usize, max_length: usize) -> bool {
    let mut length = 0usize;

    for c in sequence.chars() {
        if !is_common_amino_acid(c) {
            return false;
        }
        length += 1;
        if length > max_length {
            return false;
        }
    }

    length >= min_length && length > 0
}

/// Check a batch of candidate peptides, producing one flag per input in input order.
pub fn check_validity<S>(sequences: &[S], min_length: usize, max_length: usize) -> Vec<bool>
where
    S: AsRef<str> + Sync,
{
    if sequences.len() < PARALLEL_BATCH_SIZE {
        sequences
            .iter()
            .map(|s| is_valid(s.as_ref(), min_length, max_length))
            .collect()
    } else {
        sequences
            .par_iter()
            .map(|s| is_valid(s.as_ref(), min_length, max_length))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;

    #[test]
    fn test_length_bounds() {
        check!(!is_valid("ACDEFG", 8, 15));
        check!(is_valid("ACDEFGHIK", 8, 15));
        check!(is_valid("ACDEFGHI", 8, 15));
        check!(is_valid("ACDEFGHIKLMNPQR", 8, 15));
        check!(!is_valid("ACDEFGHIKLMNPQRS", 8, 15));
    }

    #[test]
    fn test_alphabet() {
        check!(!is_valid("XXXXXXXXX", 8, 15));
        check!(!is_valid("SIINFEKLX", 8, 15));
        check!(!is_valid("siinfekl", 8, 15));
        check!(!is_valid("SIIN FEKL", 8, 15));
        check!(is_valid("SIINFEKL", 8, 15));
    }

    #[test]
    fn test_empty_is_invalid() {
        check!(!is_valid("", 1, 15));
        check!(!is_valid("", 0, 15));
    }

    #[test]
    fn test_batch_is_elementwise() {
        let peptides = vec!["SIINFEKL", "XXXXXXXXX", "AAA", "GILGFVFTL"];
        check!(check_validity(&peptides, 8, 15) == vec![true, false, false, true]);
    }

    #[test]
    fn test_large_batch_matches_serial() {
        let peptides: Vec<String> = (0..PARALLEL_BATCH_SIZE * 2)
            .map(|i| match i % 3 {
                0 => "SIINFEKL".to_string(),
                1 => "SIINFEKLX".to_string(),
                _ => "A".repeat(i % 20),
            })
            .collect();

        let flags = check_validity(&peptides, 8, 15);
        check!(flags.len() == peptides.len());
        peptides
            .iter()
            .zip(flags)
            .for_each(|(p, flag)| { check!(flag == is_valid(p, 8, 15)); });
    }
}
