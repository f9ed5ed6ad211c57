use serde::Serialize;

use crate::error::OutputError;
use crate::predictor::Predictor;
use crate::structs::PredictionRecord;

pub const PREDICTION_TSV_HEADER: [&str; 4] = ["peptide", "length", "allele", "affinity"];

/// One line of the prediction TSV, with the affinity already formatted.
#[derive(Serialize)]
struct PredictionRow<'a> {
    peptide: &'a str,
    length: usize,
    allele: &'a str,
    affinity: String,
}

impl<'a> From<&'a PredictionRecord> for PredictionRow<'a> {
    fn from(record: &'a PredictionRecord) -> Self {
        Self {
            peptide: &record.peptide,
            length: record.length,
            allele: &record.allele,
            affinity: format!("{:.4}", record.affinity),
        }
    }
}

/// Long-format predictions as TSV, one line per record, affinities to 4 decimal places.
///
/// The header is always written, even when there are no records.
pub fn predictions_tsv(records: &[PredictionRecord]) -> Result<String, OutputError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(vec![]);

    writer.write_record(PREDICTION_TSV_HEADER)?;
    for record in records {
        writer.serialize(PredictionRow::from(record))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))?;

    Ok(String::from_utf8(bytes)?)
}

/// One `<allele>\t<lengths>` line per supported allele.
pub fn allele_listing(predictor: &dyn Predictor) -> String {
    let lengths = predictor.supported_peptide_lengths().to_string();

    predictor
        .supported_alleles()
        .iter()
        .map(|allele| format!("{allele}\t{lengths}"))
        .collect::<Vec<_>>()
        .join("\n")
}
