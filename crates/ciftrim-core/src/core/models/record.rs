use crate::core::io::cif::{self, CifError};
use crate::core::io::gz;
use crate::core::trim;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Per-residue local confidence metric (pLDDT in AlphaFold output).
pub const METRIC_TAG: &str = "_ma_qa_metric_local.metric_value";
/// Canonical one-letter sequence of the modeled entity.
pub const SEQUENCE_TAG: &str = "_entity_poly.pdbx_seq_one_letter_code_can";
/// Entry identifier used to match predictor output back to structures.
pub const ENTRY_ID_TAG: &str = "_entry.id";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Cif(#[from] CifError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("confidence value '{0}' is not a number")]
    InvalidConfidence(String),

    #[error("sequence has {sequence} residues but {confidence} confidence values")]
    LengthMismatch { sequence: usize, confidence: usize },

    #[error("no region of {path} passes the confidence threshold", path = path.display())]
    NoConfidentRegion { path: PathBuf },
}

/// One loaded structure: identity, sequence, confidence profile, and the
/// confidence-derived trim boundaries.
///
/// Records are only built through [`StructureRecord::from_path`] and never
/// mutated afterwards; the reconciliation step derives a fresh interval
/// instead of editing the record.
#[derive(Debug, Clone, PartialEq)]
pub struct StructureRecord {
    pub source_path: PathBuf,
    pub id: String,
    pub sequence: String,
    pub confidence: Vec<f64>,
    pub left_trim: usize,  // inclusive start of the confident region
    pub right_trim: usize, // exclusive end of the confident region
}

impl StructureRecord {
    /// Loads one structure file (plain or gzipped mmCIF) and computes its
    /// trim boundaries with the given confidence threshold and window size.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::NoConfidentRegion`] when no part of the profile
    /// passes the threshold; callers treat this, like every other `LoadError`,
    /// as a per-file condition that must not abort the surrounding batch.
    pub fn from_path(path: &Path, threshold: f64, window: usize) -> Result<Self, LoadError> {
        let reader = gz::open(path)?;
        let dict = cif::read_dict(reader)?;

        let confidence = dict
            .require(METRIC_TAG)?
            .iter()
            .map(|value| {
                value
                    .parse::<f64>()
                    .map_err(|_| LoadError::InvalidConfidence(value.clone()))
            })
            .collect::<Result<Vec<f64>, LoadError>>()?;

        // The canonical sequence field embeds line breaks and `*` padding.
        let sequence: String = dict
            .require_first(SEQUENCE_TAG)?
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '*')
            .collect();

        let id = dict.require_first(ENTRY_ID_TAG)?.to_string();

        if sequence.len() != confidence.len() {
            return Err(LoadError::LengthMismatch {
                sequence: sequence.len(),
                confidence: confidence.len(),
            });
        }

        let left_trim = trim::trim_left(&confidence, threshold, window);
        let right_trim = trim::trim_right(&confidence, threshold, window);
        if left_trim > right_trim {
            return Err(LoadError::NoConfidentRegion {
                path: path.to_path_buf(),
            });
        }

        Ok(Self {
            source_path: path.to_path_buf(),
            id,
            sequence,
            confidence,
            left_trim,
            right_trim,
        })
    }
}
