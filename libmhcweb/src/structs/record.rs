use std::fmt::{Display, Formatter};
use std::ops::RangeInclusive;

/// One predicted binding affinity for a single peptide/allele pair.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRecord {
    /// The protein the peptide was cut from, when it came from a FASTA scan
    pub source_sequence_name: Option<String>,
    /// The 0-based offset of the peptide in its source protein
    pub offset: usize,
    pub peptide: String,
    pub allele: String,
    /// Predicted affinity; lower is tighter binding
    pub affinity: f64,
    pub percentile_rank: Option<f64>,
    pub length: usize,
}

impl PredictionRecord {
    pub fn new(peptide: &str, allele: &str, affinity: f64) -> Self {
        Self {
            source_sequence_name: None,
            offset: 0,
            peptide: peptide.to_string(),
            allele: allele.to_string(),
            affinity,
            percentile_rank: None,
            length: peptide.chars().count(),
        }
    }

    pub fn with_source(mut self, name: &str, offset: usize) -> Self {
        self.source_sequence_name = Some(name.to_string());
        self.offset = offset;
        self
    }
}

/// The inclusive range of peptide lengths a predictor supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeptideLengths {
    pub min: usize,
    pub max: usize,
}

impl PeptideLengths {
    pub fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub fn range(&self) -> RangeInclusive<usize> {
        self.min..=self.max
    }

    pub fn contains(&self, length: usize) -> bool {
        self.range().contains(&length)
    }
}

/// Every supported length, comma separated: `8,9,10,11`
impl Display for PeptideLengths {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let lengths: Vec<String> = self.range().map(|l| l.to_string()).collect();
        write!(f, "{}", lengths.join(","))
    }
}
