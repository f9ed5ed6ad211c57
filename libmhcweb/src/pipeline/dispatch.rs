use strum::Display;

use crate::error::{Notice, Notices, RequestError};
use crate::output::{predictions_tsv, tabulate, WideResultTable};
use crate::pipeline::{predict_fasta, predict_peptides};
use crate::predictor::Predictor;

/// Peptide/protein input beyond this many bytes is dropped.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 10_000_000;

/// How the free-text peptide field is interpreted.
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Fasta,
    PeptideList,
}

impl InputMode {
    /// Any `>` in the text means FASTA.
    ///
    /// This is a heuristic, not format detection: a peptide
    /// list containing a stray `>` is treated as FASTA.
    pub fn detect(text: &str) -> Self {
        if text.contains('>') {
            InputMode::Fasta
        } else {
            InputMode::PeptideList
        }
    }
}

/// The result of a request along with any notices raised on the way.
///
/// Notices are kept even when the request fails so they can be shown with the error.
#[derive(Debug)]
pub struct Outcome<T> {
    pub notices: Notices,
    pub result: Result<T, RequestError>,
}

impl<T> Outcome<T> {
    /// Every notice followed by the error message, if there is one.
    pub fn messages(&self) -> Vec<String> {
        let mut messages = self.notices.messages();
        if let Err(err) = &self.result {
            messages.push(err.to_string());
        }
        messages
    }
}

pub fn split_alleles(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

/// Cut `text` down to at most `max_bytes`, on a char boundary.
pub fn truncate_input<'a>(text: &'a str, max_bytes: usize, notices: &mut Notices) -> &'a str {
    if text.len() <= max_bytes {
        return text;
    }

    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }

    notices.push(Notice::Truncated { max_bytes });
    &text[..end]
}

/// Run a form query: validate, predict, and tabulate.
pub fn dispatch(
    predictor: &dyn Predictor,
    alleles_text: &str,
    peptides_text: &str,
    max_input_bytes: usize,
) -> Outcome<WideResultTable> {
    let mut notices = Notices::new();
    let result = dispatch_inner(
        predictor,
        alleles_text,
        peptides_text,
        max_input_bytes,
        &mut notices,
    );

    if let Err(err) = &result {
        log::info!("query failed ({}): {err}", err.kind());
    }

    Outcome { notices, result }
}

fn dispatch_inner(
    predictor: &dyn Predictor,
    alleles_text: &str,
    peptides_text: &str,
    max_input_bytes: usize,
    notices: &mut Notices,
) -> Result<WideResultTable, RequestError> {
    let alleles = split_alleles(alleles_text);
    if alleles.is_empty() {
        return Err(RequestError::NoAlleles);
    }

    let input = truncate_input(peptides_text.trim(), max_input_bytes, notices);
    if input.is_empty() {
        return Err(RequestError::NoInput);
    }

    let mode = InputMode::detect(peptides_text);
    log::debug!("dispatching {} bytes as {mode} for {alleles:?}", input.len());

    let records = match mode {
        InputMode::Fasta => predict_fasta(predictor, input, &alleles)?,
        InputMode::PeptideList => {
            let peptides: Vec<String> = input
                .to_uppercase()
                .split_whitespace()
                .map(str::to_string)
                .collect();
            predict_peptides(predictor, &peptides, &alleles, notices)?
        }
    };

    match records {
        Some(records) if !records.is_empty() => Ok(tabulate(&records)),
        _ => Err(RequestError::NoPredictions),
    }
}

/// Run an API query, producing the TSV body.
///
/// `peptides_text` is comma separated; notices are dropped since the
/// API has nowhere to put them.
pub fn dispatch_api(
    predictor: &dyn Predictor,
    alleles_text: &str,
    peptides_text: &str,
    max_input_bytes: usize,
) -> Result<String, RequestError> {
    let mut notices = Notices::new();

    let input = truncate_input(peptides_text.trim(), max_input_bytes, &mut notices);
    let peptides: Vec<String> = input
        .to_uppercase()
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect();
    if peptides.is_empty() {
        return Err(RequestError::NoInput);
    }

    let alleles = split_alleles(alleles_text);
    if alleles.is_empty() {
        return Err(RequestError::NoAlleles);
    }

    match predict_peptides(predictor, &peptides, &alleles, &mut notices)? {
        Some(records) if !records.is_empty() => Ok(predictions_tsv(&records)?),
        _ => Err(RequestError::NoPredictions),
    }
}
