use phf::{phf_set, Set};

pub const UTF8_SPACE: u8 = 32;
pub const UTF8_GT: u8 = 62;

/// The common amino acids, in the order the predictor reports them.
pub const COMMON_AMINO_ACIDS: [char; 20] = [
    'A', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'K', 'L', 'M', 'N', 'P', 'Q', 'R', 'S', 'T', 'V', 'W',
    'Y',
];

/// Membership set for [`COMMON_AMINO_ACIDS`].
///
/// Only upper case symbols are members; callers upper-case
/// free-form peptide input before it gets here.
pub const COMMON_AMINO_ACID_SET: Set<char> = phf_set! {
    'A', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'K', 'L',
    'M', 'N', 'P', 'Q', 'R', 'S', 'T', 'V', 'W', 'Y',
};

pub fn is_common_amino_acid(c: char) -> bool {
    COMMON_AMINO_ACID_SET.contains(&c)
}
