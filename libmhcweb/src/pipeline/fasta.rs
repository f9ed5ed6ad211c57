use indexmap::IndexMap;

use crate::error::PipelineError;
use crate::predictor::Predictor;
use crate::structs::{PredictionRecord, Protein};
use crate::validate::is_valid;

/// The longest protein accepted for subsequence scanning.
pub const MAX_PROTEIN_LENGTH: usize = 10_000;

/// Parse `fasta_text` and predict every supported-length subsequence of each protein.
///
/// Proteins shorter than the shortest supported peptide, longer than
/// [`MAX_PROTEIN_LENGTH`], or with residues outside the common alphabet
/// are dropped. Returns `Ok(None)` when nothing is left to scan.
pub fn predict_fasta(
    predictor: &dyn Predictor,
    fasta_text: &str,
    alleles: &[String],
) -> Result<Option<Vec<PredictionRecord>>, PipelineError> {
    if fasta_text.trim().is_empty() {
        return Ok(None);
    }

    let lengths = predictor.supported_peptide_lengths();
    let proteins = Protein::from_fasta_str(fasta_text)?;
    let total = proteins.len();

    // later records with a repeated id replace earlier ones in place
    let mut sequences: IndexMap<String, String> = IndexMap::new();
    proteins
        .into_iter()
        .filter(|p| is_valid(&p.sequence, lengths.min, MAX_PROTEIN_LENGTH))
        .for_each(|p| {
            sequences.insert(p.name, p.sequence);
        });

    // TODO: excluded proteins are only logged; decide whether they
    //       should raise a Notice like excluded peptides do
    if sequences.len() < total {
        log::warn!(
            "excluded {} of {} FASTA records with unsupported length or residues",
            total - sequences.len(),
            total
        );
    }

    if sequences.is_empty() {
        return Ok(None);
    }

    let records = predictor.predict_subsequences(&sequences, lengths.range(), alleles)?;
    Ok(Some(records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PredictorError;
    use crate::predictor::stub::StubPredictor;
    use assert2::{check, let_assert};

    fn alleles() -> Vec<String> {
        vec!["HLA-A*02:01".to_string()]
    }

    fn predictor() -> StubPredictor {
        StubPredictor::new(&["HLA-A*02:01"], 8, 9)
    }

    #[test]
    fn test_blank_input() {
        let_assert!(Ok(None) = predict_fasta(&predictor(), "  \n\t ", &alleles()));
    }

    #[test]
    fn test_scans_every_supported_length() -> anyhow::Result<()> {
        let records = predict_fasta(&predictor(), ">p\nACDEFGHIKL\n", &alleles())?;

        let_assert!(Some(records) = records);
        // 3 windows of length 8 and 2 of length 9
        check!(records.len() == 5);
        check!(records.iter().filter(|r| r.length == 8).count() == 3);
        check!(records.iter().filter(|r| r.length == 9).count() == 2);
        check!(records
            .iter()
            .all(|r| r.source_sequence_name.as_deref() == Some("p")));
        Ok(())
    }

    #[test]
    fn test_long_protein_is_accepted() -> anyhow::Result<()> {
        // far longer than the longest supported peptide
        let sequence = "ACDEFGHIKLMNPQRSTVWY".repeat(5);
        let records = predict_fasta(
            &predictor(),
            &format!(">long\n{sequence}\n"),
            &alleles(),
        )?;

        let_assert!(Some(records) = records);
        check!(records.len() == (100 - 8 + 1) + (100 - 9 + 1));
        Ok(())
    }

    #[test]
    fn test_unsupported_proteins_are_dropped() -> anyhow::Result<()> {
        let text = ">short\nACDEF\n>bad\nACDEFGHXK\n>lower\nacdefghik\n>ok\nACDEFGHIK\n";
        let records = predict_fasta(&predictor(), text, &alleles())?;

        let_assert!(Some(records) = records);
        check!(records
            .iter()
            .all(|r| r.source_sequence_name.as_deref() == Some("ok")));
        Ok(())
    }

    #[test]
    fn test_nothing_survives() {
        let_assert!(
            Ok(None) = predict_fasta(&predictor(), ">short\nACDEF\n", &alleles())
        );
    }

    #[test]
    fn test_duplicate_ids_keep_last_sequence() -> anyhow::Result<()> {
        let text = ">a\nAAAAAAAA\n>b\nCCCCCCCC\n>a\nDDDDDDDD\n";
        let records = predict_fasta(&predictor(), text, &alleles())?;

        let_assert!(Some(records) = records);
        let peptides: Vec<_> = records.iter().map(|r| r.peptide.as_str()).collect();
        check!(peptides == vec!["DDDDDDDD", "CCCCCCCC"]);
        Ok(())
    }

    #[test]
    fn test_predictor_error() {
        let result = predict_fasta(
            &predictor(),
            ">a\nACDEFGHIK\n",
            &["HLA-Z*99:99".to_string()],
        );
        let_assert!(Err(PipelineError::Predictor(PredictorError::UnsupportedAllele(_))) = result);
    }
}
