use crate::core::models::prediction::{
    CleavagePrediction, PredictionParseError, TargetpPlantRow, TargetpRow,
};
use crate::engine::config::{Organism, PredictorConfig};
use std::collections::HashMap;
use std::io::{self, Write};
use std::process::{Command, ExitStatus};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum PredictorError {
    #[error("failed to launch predictor '{command}': {source}")]
    Launch {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("predictor exited with {status}\nSTDERR: {stderr}\nSTDOUT: {stdout}")]
    Failed {
        status: ExitStatus,
        stdout: String,
        stderr: String,
    },

    #[error("malformed predictor output: {0}")]
    MalformedRow(#[from] PredictionParseError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Runs the signal-peptide predictor over one chunk of sequences and returns
/// its predictions keyed by sequence id.
///
/// The sequences are written to a temporary FASTA file whose lifetime is
/// scoped to this call; it is removed on every exit path, including predictor
/// failure. The subprocess is synchronous and carries no timeout, so a
/// hanging predictor blocks the batch.
pub fn predict(
    config: &PredictorConfig,
    sequences: &[(&str, &str)],
) -> Result<HashMap<String, CleavagePrediction>, PredictorError> {
    let mut fasta = NamedTempFile::new()?;
    for (id, sequence) in sequences {
        writeln!(fasta, ">{id}")?;
        writeln!(fasta, "{sequence}")?;
    }
    fasta.flush()?;

    debug!(
        "Running {} over {} sequence(s).",
        config.command.display(),
        sequences.len()
    );
    let output = Command::new(&config.command)
        .arg("-org")
        .arg(config.organism.flag())
        .arg("-fasta")
        .arg(fasta.path())
        .arg("-stdout")
        .output()
        .map_err(|source| PredictorError::Launch {
            command: config.command.display().to_string(),
            source,
        })?;

    if !output.status.success() {
        return Err(PredictorError::Failed {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    parse_report(&String::from_utf8_lossy(&output.stdout), config.organism)
}

/// Parses a TargetP report into predictions keyed by sequence id.
///
/// Blank lines and `#`-prefixed comment lines are skipped; any data row that
/// does not satisfy the column grammar is an error, never silently dropped,
/// since it means the predictor's output contract changed.
pub fn parse_report(
    report: &str,
    organism: Organism,
) -> Result<HashMap<String, CleavagePrediction>, PredictorError> {
    let mut predictions = HashMap::new();
    for line in report.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let prediction = match organism {
            Organism::Plant => CleavagePrediction::Plant(TargetpPlantRow::from_line(line)?),
            Organism::NonPlant => CleavagePrediction::Standard(TargetpRow::from_line(line)?),
        };
        predictions.insert(prediction.id().to_string(), prediction);
    }
    Ok(predictions)
}
