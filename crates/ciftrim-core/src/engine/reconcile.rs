use crate::core::models::prediction::CleavagePrediction;
use crate::core::models::record::StructureRecord;

/// The final residue interval to keep, `[start, end)` over 0-based indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrimInterval {
    pub start: usize,
    pub end: usize,
}

impl TrimInterval {
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Merges a structure's confidence-derived trim with an optional predicted
/// cleavage position into the authoritative interval.
///
/// A cleavage site can only push the left boundary further right; the right
/// boundary is never affected by the predictor. Returns `None` when the
/// merged boundaries cross, in which case the structure is excluded from
/// output rather than clamped.
pub fn reconcile(
    record: &StructureRecord,
    prediction: Option<&CleavagePrediction>,
) -> Option<TrimInterval> {
    let cleavage = prediction.and_then(|p| p.cleavage_position()).unwrap_or(0);
    let start = record.left_trim.max(cleavage);
    let end = record.right_trim;
    if start > end {
        None
    } else {
        Some(TrimInterval { start, end })
    }
}
