use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

/// Grammar of one embedded cleavage-site fragment in a TargetP diagnostic
/// column: the `CS pos` label, an optional signal kind, a `start-end` residue
/// range, an optional residue-pair code, and a probability. The plant model
/// can embed several fragments in one column.
const CS_POS_PATTERN: &str = r"CS\s+pos\s*(?P<kind>luTP|cTP|mTP|SP)?:\s+\d+-(?P<cs>\d+)\.?\s+(?:[A-Za-z]+-[A-Za-z]+)?\.?\s*Pr: (?P<prob>[-+]?\d*\.?\d+)";

fn cs_pos_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(CS_POS_PATTERN).expect("cleavage-site pattern is valid"))
}

#[derive(Debug, Error, PartialEq)]
pub enum PredictionParseError {
    #[error("expected {expected} tab-separated columns, found {found} in: '{line}'")]
    ColumnCount {
        expected: &'static str,
        found: usize,
        line: String,
    },
    #[error("expected column {column} to be a float, got '{value}'")]
    InvalidFloat {
        column: &'static str,
        value: String,
    },
    #[error("unknown prediction class '{0}'")]
    UnknownClass(String),
    #[error("no cleavage site found in diagnostic column: '{0}'")]
    UnmatchedDiagnostic(String),
}

/// Localization signal kinds TargetP can attach to a cleavage site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    Secretory,     // SP
    Mitochondrial, // mTP
    Chloroplast,   // cTP
    Lumenal,       // luTP
}

impl SignalKind {
    fn from_code(code: &str) -> Option<Self> {
        match code {
            "SP" => Some(SignalKind::Secretory),
            "mTP" => Some(SignalKind::Mitochondrial),
            "cTP" => Some(SignalKind::Chloroplast),
            "luTP" => Some(SignalKind::Lumenal),
            _ => None,
        }
    }
}

/// The closed set of labels the predictor assigns to a whole sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredictionClass {
    NoSignal,
    Secretory,
    Mitochondrial,
    Chloroplast,
    Lumenal,
}

impl FromStr for PredictionClass {
    type Err = PredictionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "noTP" => Ok(PredictionClass::NoSignal),
            "SP" => Ok(PredictionClass::Secretory),
            "mTP" => Ok(PredictionClass::Mitochondrial),
            "cTP" => Ok(PredictionClass::Chloroplast),
            "luTP" => Ok(PredictionClass::Lumenal),
            other => Err(PredictionParseError::UnknownClass(other.to_string())),
        }
    }
}

impl fmt::Display for PredictionClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                PredictionClass::NoSignal => "noTP",
                PredictionClass::Secretory => "SP",
                PredictionClass::Mitochondrial => "mTP",
                PredictionClass::Chloroplast => "cTP",
                PredictionClass::Lumenal => "luTP",
            }
        )
    }
}

/// One cleavage-site fragment parsed out of a diagnostic column.
#[derive(Debug, Clone, PartialEq)]
pub struct CleavageSite {
    pub kind: Option<SignalKind>,
    pub position: usize,
    pub probability: f64,
}

/// Parses every cleavage-site fragment embedded in `text`, in order.
pub fn cleavage_candidates(text: &str) -> Vec<CleavageSite> {
    cs_pos_regex()
        .captures_iter(text)
        .filter_map(|caps| {
            let position = caps.name("cs")?.as_str().parse().ok()?;
            let probability = caps.name("prob")?.as_str().parse().ok()?;
            let kind = caps
                .name("kind")
                .and_then(|m| SignalKind::from_code(m.as_str()));
            Some(CleavageSite {
                kind,
                position,
                probability,
            })
        })
        .collect()
}

fn parse_float(column: &'static str, value: &str) -> Result<f64, PredictionParseError> {
    value.parse().map_err(|_| PredictionParseError::InvalidFloat {
        column,
        value: value.to_string(),
    })
}

/// One data row of a non-plant TargetP report.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetpRow {
    pub id: String,
    pub class: PredictionClass,
    pub no_tp: f64,
    pub sp: f64,
    pub m_tp: f64,
    pub cleavage: Option<usize>,
}

impl TargetpRow {
    /// Parses one tab-separated report row of the form
    /// `id  class  noTP  SP  mTP  [diagnostic]`.
    ///
    /// The non-plant model occasionally reports lumenal or chloroplast-transit
    /// cleavage sites anyway; those are out of scope for this model and are
    /// treated as no cleavage.
    pub fn from_line(line: &str) -> Result<Self, PredictionParseError> {
        let columns: Vec<&str> = line.trim().split('\t').collect();
        if columns.len() != 5 && columns.len() != 6 {
            return Err(PredictionParseError::ColumnCount {
                expected: "5-6",
                found: columns.len(),
                line: line.to_string(),
            });
        }

        let cleavage = if columns.len() == 6 && !columns[5].is_empty() {
            let candidates = cleavage_candidates(columns[5]);
            let site = candidates.first().ok_or_else(|| {
                PredictionParseError::UnmatchedDiagnostic(columns[5].to_string())
            })?;
            match site.kind {
                Some(SignalKind::Lumenal) | Some(SignalKind::Chloroplast) => None,
                _ => Some(site.position),
            }
        } else {
            None
        };

        Ok(Self {
            id: columns[0].to_string(),
            class: columns[1].parse()?,
            no_tp: parse_float("noTP", columns[2])?,
            sp: parse_float("SP", columns[3])?,
            m_tp: parse_float("mTP", columns[4])?,
            cleavage,
        })
    }
}

/// One data row of a plant TargetP report.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetpPlantRow {
    pub id: String,
    pub class: PredictionClass,
    pub no_tp: f64,
    pub sp: f64,
    pub m_tp: f64,
    pub c_tp: f64,
    pub lu_tp: f64,
    pub cleavage: Option<usize>,
}

impl TargetpPlantRow {
    /// Parses one tab-separated report row of the form
    /// `id  class  noTP  SP  mTP  cTP  luTP  [diagnostic]`.
    ///
    /// The plant model may report lumenal, chloroplast, mitochondrial, and
    /// secretory cleavage sites together in one diagnostic column; the
    /// furthest-right position wins as the most conservative cut.
    pub fn from_line(line: &str) -> Result<Self, PredictionParseError> {
        let columns: Vec<&str> = line.trim().split('\t').collect();
        if columns.len() != 7 && columns.len() != 8 {
            return Err(PredictionParseError::ColumnCount {
                expected: "7-8",
                found: columns.len(),
                line: line.to_string(),
            });
        }

        let cleavage = if columns.len() == 8 && !columns[7].is_empty() {
            let candidates = cleavage_candidates(columns[7]);
            if candidates.is_empty() {
                return Err(PredictionParseError::UnmatchedDiagnostic(
                    columns[7].to_string(),
                ));
            }
            candidates.iter().map(|site| site.position).max()
        } else {
            None
        };

        Ok(Self {
            id: columns[0].to_string(),
            class: columns[1].parse()?,
            no_tp: parse_float("noTP", columns[2])?,
            sp: parse_float("SP", columns[3])?,
            m_tp: parse_float("mTP", columns[4])?,
            c_tp: parse_float("cTP", columns[5])?,
            lu_tp: parse_float("luTP", columns[6])?,
            cleavage,
        })
    }
}

/// A parsed signal-peptide prediction for one sequence.
///
/// The two report grammars stay distinct variants rather than one record with
/// optional columns; both supply an optional cleavage position per id.
#[derive(Debug, Clone, PartialEq)]
pub enum CleavagePrediction {
    Standard(TargetpRow),
    Plant(TargetpPlantRow),
}

impl CleavagePrediction {
    pub fn id(&self) -> &str {
        match self {
            CleavagePrediction::Standard(row) => &row.id,
            CleavagePrediction::Plant(row) => &row.id,
        }
    }

    pub fn class(&self) -> PredictionClass {
        match self {
            CleavagePrediction::Standard(row) => row.class,
            CleavagePrediction::Plant(row) => row.class,
        }
    }

    pub fn cleavage_position(&self) -> Option<usize> {
        match self {
            CleavagePrediction::Standard(row) => row.cleavage,
            CleavagePrediction::Plant(row) => row.cleavage,
        }
    }

    /// Class probabilities as label/value pairs, in report column order.
    pub fn probabilities(&self) -> Vec<(PredictionClass, f64)> {
        match self {
            CleavagePrediction::Standard(row) => vec![
                (PredictionClass::NoSignal, row.no_tp),
                (PredictionClass::Secretory, row.sp),
                (PredictionClass::Mitochondrial, row.m_tp),
            ],
            CleavagePrediction::Plant(row) => vec![
                (PredictionClass::NoSignal, row.no_tp),
                (PredictionClass::Secretory, row.sp),
                (PredictionClass::Mitochondrial, row.m_tp),
                (PredictionClass::Chloroplast, row.c_tp),
                (PredictionClass::Lumenal, row.lu_tp),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_row_with_cleavage_site_parses() {
        let row =
            TargetpRow::from_line("seq1\tSP\t0.0123\t0.9742\t0.0135\tCS pos: 22-23. VSA-AT. Pr: 0.7423")
                .unwrap();
        assert_eq!(row.id, "seq1");
        assert_eq!(row.class, PredictionClass::Secretory);
        assert_eq!(row.no_tp, 0.0123);
        assert_eq!(row.sp, 0.9742);
        assert_eq!(row.m_tp, 0.0135);
        assert_eq!(row.cleavage, Some(23));
    }

    #[test]
    fn standard_row_without_diagnostic_has_no_cleavage() {
        let row = TargetpRow::from_line("seq2\tnoTP\t0.9981\t0.0007\t0.0012").unwrap();
        assert_eq!(row.class, PredictionClass::NoSignal);
        assert_eq!(row.cleavage, None);

        let row = TargetpRow::from_line("seq3\tnoTP\t0.9981\t0.0007\t0.0012\t").unwrap();
        assert_eq!(row.cleavage, None);
    }

    #[test]
    fn standard_row_ignores_lumenal_and_chloroplast_cleavage() {
        let row = TargetpRow::from_line(
            "seq4\tSP\t0.1\t0.8\t0.1\tCS pos luTP: 70-71. Pr: 0.4412",
        )
        .unwrap();
        assert_eq!(row.cleavage, None);

        let row = TargetpRow::from_line(
            "seq5\tSP\t0.1\t0.8\t0.1\tCS pos cTP: 51-52. Pr: 0.5123",
        )
        .unwrap();
        assert_eq!(row.cleavage, None);

        let row = TargetpRow::from_line(
            "seq6\tmTP\t0.1\t0.1\t0.8\tCS pos mTP: 31-32. Pr: 0.6001",
        )
        .unwrap();
        assert_eq!(row.cleavage, Some(32));
    }

    #[test]
    fn standard_row_with_wrong_column_count_is_rejected() {
        let err = TargetpRow::from_line("seq7\tSP\t0.1\t0.9").unwrap_err();
        assert!(matches!(
            err,
            PredictionParseError::ColumnCount { found: 4, .. }
        ));

        let err =
            TargetpRow::from_line("seq8\tSP\t0.1\t0.8\t0.1\t0.0\t0.0\textra").unwrap_err();
        assert!(matches!(err, PredictionParseError::ColumnCount { .. }));
    }

    #[test]
    fn standard_row_with_unparseable_probability_is_rejected() {
        let err = TargetpRow::from_line("seq9\tSP\tnot-a-float\t0.8\t0.1").unwrap_err();
        assert!(matches!(
            err,
            PredictionParseError::InvalidFloat { column: "noTP", .. }
        ));
    }

    #[test]
    fn unknown_class_label_is_rejected() {
        let err = TargetpRow::from_line("seq10\tWEIRD\t0.9\t0.05\t0.05").unwrap_err();
        assert_eq!(
            err,
            PredictionParseError::UnknownClass("WEIRD".to_string())
        );
    }

    #[test]
    fn plant_row_with_single_cleavage_site_parses() {
        let row = TargetpPlantRow::from_line(
            "pl1\tcTP\t0.01\t0.02\t0.03\t0.90\t0.04\tCS pos cTP: 47-48. Pr: 0.8812",
        )
        .unwrap();
        assert_eq!(row.class, PredictionClass::Chloroplast);
        assert_eq!(row.c_tp, 0.90);
        assert_eq!(row.cleavage, Some(48));
    }

    #[test]
    fn plant_row_takes_the_maximum_of_multiple_cleavage_sites() {
        let row = TargetpPlantRow::from_line(
            "pl2\tluTP\t0.01\t0.02\t0.03\t0.30\t0.64\tCS pos cTP: 19-20. Pr: 0.5521 CS pos luTP: 34-35. Pr: 0.4419",
        )
        .unwrap();
        assert_eq!(row.cleavage, Some(35));
    }

    #[test]
    fn plant_row_without_diagnostic_has_no_cleavage() {
        let row =
            TargetpPlantRow::from_line("pl3\tnoTP\t0.95\t0.01\t0.02\t0.01\t0.01").unwrap();
        assert_eq!(row.cleavage, None);
    }

    #[test]
    fn plant_row_with_wrong_column_count_is_rejected() {
        let err = TargetpPlantRow::from_line("pl4\tSP\t0.1\t0.8\t0.1").unwrap_err();
        assert!(matches!(
            err,
            PredictionParseError::ColumnCount {
                expected: "7-8",
                ..
            }
        ));
    }

    #[test]
    fn non_matching_diagnostic_column_is_rejected() {
        let err = TargetpPlantRow::from_line(
            "pl5\tSP\t0.1\t0.8\t0.05\t0.03\t0.02\tsomething unexpected",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            PredictionParseError::UnmatchedDiagnostic(_)
        ));
    }

    #[test]
    fn cleavage_candidates_parse_in_order_with_kinds() {
        let candidates = cleavage_candidates(
            "CS pos cTP: 19-20. Pr: 0.5521 CS pos luTP: 34-35. Pr: 0.4419 CS pos: 40-41. ALA-AT. Pr: 0.9",
        );
        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates[0].kind, Some(SignalKind::Chloroplast));
        assert_eq!(candidates[0].position, 20);
        assert_eq!(candidates[1].kind, Some(SignalKind::Lumenal));
        assert_eq!(candidates[1].probability, 0.4419);
        assert_eq!(candidates[2].kind, None);
        assert_eq!(candidates[2].position, 41);
    }

    #[test]
    fn cleavage_candidates_return_empty_for_unrelated_text() {
        assert!(cleavage_candidates("no site here").is_empty());
    }

    #[test]
    fn prediction_accessors_dispatch_to_the_active_variant() {
        let standard = CleavagePrediction::Standard(
            TargetpRow::from_line("s\tSP\t0.1\t0.8\t0.1\tCS pos: 20-21. Pr: 0.9").unwrap(),
        );
        assert_eq!(standard.id(), "s");
        assert_eq!(standard.class(), PredictionClass::Secretory);
        assert_eq!(standard.cleavage_position(), Some(21));
        assert_eq!(standard.probabilities().len(), 3);

        let plant = CleavagePrediction::Plant(
            TargetpPlantRow::from_line("p\tnoTP\t0.9\t0.02\t0.03\t0.03\t0.02").unwrap(),
        );
        assert_eq!(plant.cleavage_position(), None);
        assert_eq!(plant.probabilities().len(), 5);
    }
}
