//! An in-memory predictor for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::PredictorError;
use crate::predictor::Predictor;
use crate::structs::{PeptideLengths, PredictionRecord};

/// Produces deterministic affinities without a model.
///
/// Affinities can be pinned per peptide/allele pair; everything else
/// gets a value derived from the peptide's residues and the allele's
/// position in the supported list.
pub struct StubPredictor {
    alleles: Vec<String>,
    lengths: PeptideLengths,
    pinned: HashMap<(String, String), f64>,
    predicted: AtomicUsize,
}

impl StubPredictor {
    pub fn new(alleles: &[&str], min_length: usize, max_length: usize) -> Self {
        Self {
            alleles: alleles.iter().map(|a| a.to_string()).collect(),
            lengths: PeptideLengths::new(min_length, max_length),
            pinned: HashMap::new(),
            predicted: AtomicUsize::new(0),
        }
    }

    pub fn with_affinity(mut self, peptide: &str, allele: &str, affinity: f64) -> Self {
        self.pinned
            .insert((peptide.to_string(), allele.to_string()), affinity);
        self
    }

    /// The number of peptides passed to `predict` so far.
    pub fn predicted_peptide_count(&self) -> usize {
        self.predicted.load(Ordering::SeqCst)
    }

    fn affinity(&self, peptide: &str, allele: &str, allele_idx: usize) -> f64 {
        match self.pinned.get(&(peptide.to_string(), allele.to_string())) {
            Some(&affinity) => affinity,
            None => {
                let residue_sum: u32 = peptide.chars().map(|c| c as u32).sum();
                (residue_sum % 997) as f64 * (allele_idx + 1) as f64 + 0.5
            }
        }
    }
}

impl Predictor for StubPredictor {
    fn version(&self) -> &str {
        "stub 0.0.0"
    }

    fn supported_alleles(&self) -> &[String] {
        &self.alleles
    }

    fn supported_peptide_lengths(&self) -> PeptideLengths {
        self.lengths
    }

    fn predict(
        &self,
        peptides: &[String],
        alleles: &[String],
    ) -> Result<Vec<PredictionRecord>, PredictorError> {
        let allele_indices = alleles
            .iter()
            .map(|allele| {
                self.alleles
                    .iter()
                    .position(|a| a == allele)
                    .ok_or_else(|| PredictorError::UnsupportedAllele(allele.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.predicted.fetch_add(peptides.len(), Ordering::SeqCst);

        Ok(alleles
            .iter()
            .zip(allele_indices)
            .flat_map(|(allele, idx)| {
                peptides.iter().map(move |peptide| {
                    PredictionRecord::new(peptide, allele, self.affinity(peptide, allele, idx))
                })
            })
            .collect())
    }
}
