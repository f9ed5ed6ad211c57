use crate::error::{Notice, Notices, PredictorError};
use crate::predictor::Predictor;
use crate::structs::PredictionRecord;
use crate::validate::check_validity;

/// At most this many excluded peptides are listed in the exclusion notice.
pub const MAX_EXCLUDED_SHOWN: usize = 100;

/// Excluded peptides longer than this are shortened in the notice.
pub const MAX_EXCLUDED_SHOWN_CHARS: usize = 20;

/// `peptide`, cut to [`MAX_EXCLUDED_SHOWN_CHARS`] characters with a trailing `…`.
fn shorten_for_notice(peptide: &str) -> String {
    match peptide.char_indices().nth(MAX_EXCLUDED_SHOWN_CHARS) {
        Some((end, _)) => format!("{}…", &peptide[..end]),
        None => peptide.to_string(),
    }
}

/// Validate `peptides` and predict the survivors against `alleles`.
///
/// Returns `Ok(None)` when there is nothing to predict. Excluded
/// peptides are reported through `notices`, not in the return value.
pub fn predict_peptides(
    predictor: &dyn Predictor,
    peptides: &[String],
    alleles: &[String],
    notices: &mut Notices,
) -> Result<Option<Vec<PredictionRecord>>, PredictorError> {
    if peptides.is_empty() {
        return Ok(None);
    }

    let lengths = predictor.supported_peptide_lengths();
    let flags = check_validity(peptides, lengths.min, lengths.max);

    let (valid, invalid): (Vec<_>, Vec<_>) = peptides
        .iter()
        .zip(flags)
        .partition(|(_, is_valid)| *is_valid);

    if !invalid.is_empty() {
        notices.push(Notice::Excluded {
            total: invalid.len(),
            shown: invalid
                .iter()
                .take(MAX_EXCLUDED_SHOWN)
                .map(|(p, _)| shorten_for_notice(p))
                .collect(),
        });
    }

    let valid: Vec<String> = valid.into_iter().map(|(p, _)| p.clone()).collect();
    if valid.is_empty() {
        return Ok(None);
    }

    predictor.predict(&valid, alleles).map(Some)
}
