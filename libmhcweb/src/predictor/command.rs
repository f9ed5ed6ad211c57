use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::Context;
use tempfile::TempDir;

use crate::error::PredictorError;
use crate::predictor::Predictor;
use crate::structs::{PeptideLengths, PredictionRecord};
use crate::util::CommandExt;

/// Column names the predictor has used for the affinity, newest first.
const AFFINITY_COLUMNS: [&str; 2] = ["mhcflurry_affinity", "mhcflurry_prediction"];
const PERCENTILE_COLUMN: &str = "mhcflurry_affinity_percentile";

/// A predictor backed by the `mhcflurry-predict` command line tool.
///
/// The model metadata is queried once in [`CommandPredictor::load`];
/// each prediction call runs the tool on a temporary CSV file.
#[derive(Debug, Clone)]
pub struct CommandPredictor {
    program: PathBuf,
    models_dir: Option<PathBuf>,
    version: String,
    alleles: Vec<String>,
    lengths: PeptideLengths,
}

impl CommandPredictor {
    pub fn load(program: impl AsRef<Path>, models_dir: Option<&Path>) -> anyhow::Result<Self> {
        let mut predictor = Self {
            program: program.as_ref().to_path_buf(),
            models_dir: models_dir.map(Path::to_path_buf),
            version: String::new(),
            alleles: vec![],
            lengths: PeptideLengths::new(0, 0),
        };

        predictor.alleles = predictor
            .command()
            .arg("--list-supported-alleles")
            .run()
            .context("failed to list supported alleles")?
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();

        predictor.lengths = parse_peptide_lengths(
            &predictor
                .command()
                .arg("--list-supported-peptide-lengths")
                .run()
                .context("failed to list supported peptide lengths")?,
        )?;

        predictor.version = match predictor.command().arg("--version").run() {
            Ok(version) => version.trim().to_string(),
            Err(err) => {
                log::warn!("failed to read predictor version: {err}");
                "unknown".to_string()
            }
        };

        log::info!(
            "loaded {} ({} alleles, peptide lengths {}-{})",
            predictor.version,
            predictor.alleles.len(),
            predictor.lengths.min,
            predictor.lengths.max
        );

        Ok(predictor)
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        if let Some(dir) = &self.models_dir {
            command.arg("--models").arg(dir);
        }
        command
    }
}

impl Predictor for CommandPredictor {
    fn version(&self) -> &str {
        &self.version
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
        let dir = TempDir::new().context("failed to create temporary directory")?;
        let input_path = dir.path().join("input.csv");
        let output_path = dir.path().join("output.csv");

        write_input_csv(&input_path, peptides, alleles)?;

        log::debug!(
            "predicting {} peptides for {} alleles",
            peptides.len(),
            alleles.len()
        );

        self.command()
            .arg(&input_path)
            .arg("--out")
            .arg(&output_path)
            .run()?;

        read_output_csv(&output_path)
    }
}

/// Reduce the newline separated list of supported lengths to its bounds.
pub fn parse_peptide_lengths(text: &str) -> Result<PeptideLengths, PredictorError> {
    let lengths = text
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .map(|t| {
            t.parse::<usize>()
                .map_err(|_| PredictorError::MalformedOutput(format!("bad peptide length: {t}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    match (lengths.iter().min(), lengths.iter().max()) {
        (Some(&min), Some(&max)) => Ok(PeptideLengths::new(min, max)),
        _ => Err(PredictorError::MalformedOutput(
            "no supported peptide lengths".to_string(),
        )),
    }
}

/// Write the cross product of `alleles` and `peptides` as `allele,peptide` rows.
pub fn write_input_csv(
    path: &Path,
    peptides: &[String],
    alleles: &[String],
) -> Result<(), PredictorError> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.to_string_lossy()))?;

    writer
        .write_record(["allele", "peptide"])
        .context("failed to write predictor input")?;

    for allele in alleles {
        for peptide in peptides {
            writer
                .write_record([allele, peptide])
                .context("failed to write predictor input")?;
        }
    }

    writer.flush().context("failed to flush predictor input")?;
    Ok(())
}

pub fn read_output_csv(path: &Path) -> Result<Vec<PredictionRecord>, PredictorError> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open {}", path.to_string_lossy()))?;

    let headers = reader
        .headers()
        .context("failed to read predictor output header")?
        .clone();

    let column = |name: &str| headers.iter().position(|h| h == name);

    let missing = |name: &str| PredictorError::MalformedOutput(format!("missing column: {name}"));

    let allele_idx = column("allele").ok_or_else(|| missing("allele"))?;
    let peptide_idx = column("peptide").ok_or_else(|| missing("peptide"))?;
    let affinity_idx = AFFINITY_COLUMNS
        .iter()
        .find_map(|name| column(*name))
        .ok_or_else(|| missing(AFFINITY_COLUMNS[0]))?;
    let percentile_idx = column(PERCENTILE_COLUMN);

    let mut records = vec![];
    for row in reader.records() {
        let row = row.context("failed to read predictor output row")?;

        let field = |idx: usize| {
            row.get(idx)
                .ok_or_else(|| PredictorError::MalformedOutput(format!("short row: {row:?}")))
        };

        let affinity = field(affinity_idx)?.parse::<f64>().map_err(|_| {
            PredictorError::MalformedOutput(format!("bad affinity in row: {row:?}"))
        })?;

        let mut record = PredictionRecord::new(field(peptide_idx)?, field(allele_idx)?, affinity);

        record.percentile_rank = percentile_idx
            .and_then(|idx| row.get(idx))
            .and_then(|v| v.parse::<f64>().ok());

        records.push(record);
    }

    Ok(records)
}
