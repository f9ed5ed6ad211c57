mod command;
pub use command::*;

#[cfg(any(test, feature = "test-utils"))]
pub mod stub;

use std::collections::HashMap;
use std::ops::RangeInclusive;

use indexmap::{IndexMap, IndexSet};

use crate::error::PredictorError;
use crate::structs::{PeptideLengths, PredictionRecord};

/// A loaded binding-affinity model.
///
/// Implementations are constructed once and then only read,
/// so a single instance is shared by every request.
pub trait Predictor: Send + Sync {
    /// A human readable version string for the loaded model
    fn version(&self) -> &str;

    fn supported_alleles(&self) -> &[String];

    fn supported_peptide_lengths(&self) -> PeptideLengths;

    /// Predict every peptide against every allele.
    fn predict(
        &self,
        peptides: &[String],
        alleles: &[String],
    ) -> Result<Vec<PredictionRecord>, PredictorError>;

    /// Predict every subsequence of each protein whose length is in `lengths`.
    ///
    /// Each distinct peptide is predicted once; the records are then
    /// repeated for every window it occurs in, ordered by protein,
    /// peptide length, then offset.
    fn predict_subsequences(
        &self,
        proteins: &IndexMap<String, String>,
        lengths: RangeInclusive<usize>,
        alleles: &[String],
    ) -> Result<Vec<PredictionRecord>, PredictorError> {
        let windows = subsequence_windows(proteins, lengths);

        let peptides: Vec<String> = windows
            .iter()
            .map(|w| w.peptide.as_str())
            .collect::<IndexSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect();

        if peptides.is_empty() {
            return Ok(vec![]);
        }

        let predictions = self.predict(&peptides, alleles)?;

        let mut by_peptide: HashMap<&str, Vec<&PredictionRecord>> = HashMap::new();
        predictions
            .iter()
            .for_each(|p| by_peptide.entry(p.peptide.as_str()).or_default().push(p));

        Ok(windows
            .iter()
            .flat_map(|w| {
                by_peptide
                    .get(w.peptide.as_str())
                    .into_iter()
                    .flatten()
                    .map(move |p| (*p).clone().with_source(w.source, w.offset))
            })
            .collect())
    }
}

pub struct Window<'a> {
    pub source: &'a str,
    pub offset: usize,
    pub peptide: String,
}

/// Enumerate every window of every length in `lengths` across `proteins`.
pub fn subsequence_windows(
    proteins: &IndexMap<String, String>,
    lengths: RangeInclusive<usize>,
) -> Vec<Window<'_>> {
    let mut windows = vec![];

    for (name, sequence) in proteins {
        let residues: Vec<char> = sequence.chars().collect();

        for length in lengths.clone().filter(|&l| l > 0) {
            residues
                .windows(length)
                .enumerate()
                .for_each(|(offset, residues)| {
                    windows.push(Window {
                        source: name,
                        offset,
                        peptide: residues.iter().collect(),
                    })
                });
        }
    }

    windows
}
