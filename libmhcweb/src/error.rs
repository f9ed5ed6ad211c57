use std::fmt::{Display, Formatter};

use strum::Display as StrumDisplay;
use thiserror::Error;

/// The coarse kind of anything reported back to the user.
#[derive(StrumDisplay, Debug, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "kebab-case")]
pub enum ErrorKind {
    UserInput,
    ValidationExclusion,
    Predictor,
}

#[derive(Error, Debug)]
pub enum InputError {
    #[error("failed to parse FASTA input: {0}")]
    MalformedFasta(String),
}

#[derive(Error, Debug)]
pub enum PredictorError {
    #[error("unsupported allele: {0}")]
    UnsupportedAllele(String),
    #[error("{command} exited without success: {stderr}")]
    Failed { command: String, stderr: String },
    #[error("unexpected predictor output: {0}")]
    MalformedOutput(String),
    #[error(transparent)]
    Io(#[from] anyhow::Error),
}

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("failed to write TSV output: {0}")]
    Csv(#[from] csv::Error),
    #[error("TSV output is not UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Predictor(#[from] PredictorError),
}

/// Everything that can stop a request from producing a result table.
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("Select at least one allele")]
    NoAlleles,
    #[error("Enter peptides or FASTA protein sequences")]
    NoInput,
    #[error("Your query resulted in no predictions.")]
    NoPredictions,
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Predictor(#[from] PredictorError),
    #[error(transparent)]
    Output(#[from] OutputError),
}

impl From<PipelineError> for RequestError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Input(err) => RequestError::Input(err),
            PipelineError::Predictor(err) => RequestError::Predictor(err),
        }
    }
}

impl RequestError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RequestError::NoAlleles
            | RequestError::NoInput
            | RequestError::NoPredictions
            | RequestError::Input(_) => ErrorKind::UserInput,
            RequestError::Predictor(_) | RequestError::Output(_) => ErrorKind::Predictor,
        }
    }

    /// The wording used by the plain-text prediction API.
    pub fn api_message(&self) -> String {
        match self {
            RequestError::NoInput => "no peptide given".to_string(),
            RequestError::NoAlleles => "no alleles given".to_string(),
            err => err.to_string(),
        }
    }
}

/// Informational messages raised while a request is processed.
///
/// These never stop processing; they are shown alongside the result
/// (or alongside the error, if one follows).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Peptides dropped by validation. `shown` is a bounded prefix of the excluded peptides.
    Excluded { total: usize, shown: Vec<String> },
    /// The peptide/protein input was cut down to `max_bytes`.
    Truncated { max_bytes: usize },
}

impl Notice {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Notice::Excluded { .. } => ErrorKind::ValidationExclusion,
            Notice::Truncated { .. } => ErrorKind::UserInput,
        }
    }
}

impl Display for Notice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::Excluded { total, shown } => write!(
                f,
                "Excluded {total} unsupported peptides: {}",
                shown.join(" ")
            ),
            Notice::Truncated { max_bytes } => {
                write!(f, "Peptide/protein input truncated to {max_bytes} bytes")
            }
        }
    }
}

/// The user-facing notification channel for a single request.
#[derive(Debug, Default, Clone)]
pub struct Notices(Vec<Notice>);

impl Notices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notice: Notice) {
        log::info!("{notice}");
        self.0.push(notice);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(|n| n.to_string()).collect()
    }
}
