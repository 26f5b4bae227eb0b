//! Core data structures and types for accident processing.
//!
//! Defines the severity scale, the year-quarter time bucket, the year
//! selection filter and the statistics objects reported by a run.

use crate::constants::SELECTABLE_YEARS;
use crate::error::{AccidentsError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Accident severity on the fixed four-step ordinal scale.
///
/// The derived `Ord` is the domain order `Low < Medium < High < Critical`
/// and is what every severity-keyed table sorts and stacks by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// All severities, lowest first
    pub const ALL: [Severity; 4] = [
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];

    /// Map a raw severity code; anything outside 1..=4 is rejected
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Severity::Low),
            2 => Some(Severity::Medium),
            3 => Some(Severity::High),
            4 => Some(Severity::Critical),
            _ => None,
        }
    }

    /// Ordinal code as stored in the canonical dataset
    pub fn code(self) -> i32 {
        match self {
            Severity::Low => 1,
            Severity::Medium => 2,
            Severity::High => 3,
            Severity::Critical => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
        }
    }

    /// Column name used by wide-form severity tables
    pub fn column_name(self) -> &'static str {
        use crate::constants::columns;
        match self {
            Severity::Low => columns::LOW,
            Severity::Medium => columns::MEDIUM,
            Severity::High => columns::HIGH,
            Severity::Critical => columns::CRITICAL,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A specific quarter of a specific year.
///
/// Ordering is numeric on `(year, quarter)`; the `"YYYY-Qn"` label is for
/// display only and never used as a sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearQuarter {
    pub year: i32,
    pub quarter: u8,
}

impl YearQuarter {
    pub fn new(year: i32, quarter: u8) -> Result<Self> {
        if !(1..=4).contains(&quarter) {
            return Err(AccidentsError::InvalidYearQuarter {
                label: format!("{}-Q{}", year, quarter),
                reason: format!("quarter {} is outside 1..=4", quarter),
            });
        }
        Ok(Self { year, quarter })
    }

    /// Quarter containing a calendar month (1-12)
    pub fn from_month(year: i32, month: u32) -> Self {
        let quarter = ((month.clamp(1, 12) - 1) / 3 + 1) as u8;
        Self { year, quarter }
    }

    pub fn label(&self) -> String {
        format!("{}-Q{}", self.year, self.quarter)
    }
}

impl fmt::Display for YearQuarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-Q{}", self.year, self.quarter)
    }
}

impl FromStr for YearQuarter {
    type Err = AccidentsError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason: &str| AccidentsError::InvalidYearQuarter {
            label: s.to_string(),
            reason: reason.to_string(),
        };

        let (year, quarter) = s
            .trim()
            .split_once("-Q")
            .ok_or_else(|| invalid("expected the form YYYY-Qn"))?;
        let year: i32 = year.parse().map_err(|_| invalid("year is not a number"))?;
        let quarter: u8 = quarter
            .parse()
            .map_err(|_| invalid("quarter is not a number"))?;

        if !(1..=4).contains(&quarter) {
            return Err(invalid("quarter is outside 1..=4"));
        }
        Ok(Self { year, quarter })
    }
}

/// The single filtering dimension: which years feed the summary tables
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum YearSelection {
    /// Every row, including rows whose start time could not be parsed
    #[default]
    All,
    /// Only rows whose derived year is in the set
    Years(BTreeSet<i32>),
}

impl YearSelection {
    /// Whether a row with this derived year is kept
    pub fn includes(&self, year: Option<i32>) -> bool {
        match self {
            YearSelection::All => true,
            YearSelection::Years(years) => year.is_some_and(|y| years.contains(&y)),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, YearSelection::All)
    }
}

impl fmt::Display for YearSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearSelection::All => f.write_str("all years"),
            YearSelection::Years(years) => {
                let list: Vec<String> = years.iter().map(|y| y.to_string()).collect();
                f.write_str(&list.join(","))
            }
        }
    }
}

impl FromStr for YearSelection {
    type Err = AccidentsError;

    /// Accepts `all`, a single year, an inclusive range such as `2016-2023`,
    /// or a comma-separated mix of both.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(YearSelection::All);
        }

        let mut years = BTreeSet::new();
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let parse_year = |text: &str| -> Result<i32> {
                let year = text.trim().parse::<i32>().map_err(|_| {
                    AccidentsError::configuration(format!(
                        "invalid year '{}' in year selection '{}'",
                        text.trim(),
                        s
                    ))
                })?;
                if !SELECTABLE_YEARS.contains(&year) {
                    return Err(AccidentsError::configuration(format!(
                        "year {} in year selection '{}' is outside {}-{}",
                        year,
                        s,
                        SELECTABLE_YEARS.start(),
                        SELECTABLE_YEARS.end()
                    )));
                }
                Ok(year)
            };

            match part.split_once('-') {
                Some((start, end)) => {
                    let (start, end) = (parse_year(start)?, parse_year(end)?);
                    if start > end {
                        return Err(AccidentsError::configuration(format!(
                            "year range '{}' is reversed",
                            part
                        )));
                    }
                    years.extend(start..=end);
                }
                None => {
                    years.insert(parse_year(part)?);
                }
            }
        }

        if years.is_empty() {
            return Err(AccidentsError::configuration(format!(
                "year selection '{}' selects no years",
                s
            )));
        }
        Ok(YearSelection::Years(years))
    }
}

/// Row-level accounting from ingestion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub rows_read: usize,
    pub rows_kept: usize,
    pub rejected_severity: usize,
    pub rejected_state: usize,
    /// Rows kept without derived time fields
    pub unparsed_start_time: usize,
    /// Rows dropped by the year selection
    pub outside_year_selection: usize,
}

impl IngestStats {
    pub fn rows_rejected(&self) -> usize {
        self.rejected_severity + self.rejected_state
    }
}

/// Result of building and writing one summary table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableOutcome {
    Written { rows: usize, path: PathBuf },
    Failed { reason: String },
}

impl TableOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, TableOutcome::Written { .. })
    }
}

/// Processing statistics
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub ingest: IngestStats,
    pub tables_written: usize,
    pub tables_failed: usize,
    /// Outcome per table, in catalog order
    pub outcomes: Vec<(String, TableOutcome)>,
    pub output_path: PathBuf,
    pub processing_time_ms: u128,
}

impl ProcessingStats {
    pub fn outcome(&self, table: &str) -> Option<&TableOutcome> {
        self.outcomes
            .iter()
            .find(|(name, _)| name == table)
            .map(|(_, outcome)| outcome)
    }

    pub fn failed_tables(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| !outcome.is_written())
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_mapping_and_order() {
        assert_eq!(Severity::from_code(1), Some(Severity::Low));
        assert_eq!(Severity::from_code(4), Some(Severity::Critical));
        assert_eq!(Severity::from_code(0), None);
        assert_eq!(Severity::from_code(5), None);

        assert!(Severity::Critical > Severity::High);
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);

        for severity in Severity::ALL {
            assert_eq!(Severity::from_code(severity.code() as i64), Some(severity));
        }
    }

    #[test]
    fn test_year_quarter_orders_numerically() {
        let mut buckets: Vec<YearQuarter> = ["2020-Q1", "2019-Q2", "2019-Q4", "2019-Q1"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        buckets.sort();

        let labels: Vec<String> = buckets.iter().map(YearQuarter::label).collect();
        assert_eq!(labels, vec!["2019-Q1", "2019-Q2", "2019-Q4", "2020-Q1"]);
    }

    #[test]
    fn test_year_quarter_rejects_malformed_quarter() {
        let inputs = ["2019-Q10", "2020-Q1", "2019-Q2"];
        let (valid, invalid): (Vec<_>, Vec<_>) = inputs
            .iter()
            .map(|s| s.parse::<YearQuarter>())
            .partition(|r| r.is_ok());

        assert_eq!(invalid.len(), 1);
        assert!(matches!(
            invalid[0],
            Err(AccidentsError::InvalidYearQuarter { ref label, .. }) if label == "2019-Q10"
        ));

        let mut valid: Vec<YearQuarter> = valid.into_iter().map(|r| r.unwrap()).collect();
        valid.sort();
        assert_eq!(valid[0].label(), "2019-Q2");
        assert_eq!(valid[1].label(), "2020-Q1");
    }

    #[test]
    fn test_year_quarter_from_month() {
        assert_eq!(YearQuarter::from_month(2021, 1).quarter, 1);
        assert_eq!(YearQuarter::from_month(2021, 3).quarter, 1);
        assert_eq!(YearQuarter::from_month(2021, 4).quarter, 2);
        assert_eq!(YearQuarter::from_month(2021, 12).quarter, 4);
        assert!(YearQuarter::new(2021, 0).is_err());
        assert!(YearQuarter::new(2021, 5).is_err());
    }

    #[test]
    fn test_year_selection_parsing() {
        assert_eq!("all".parse::<YearSelection>().unwrap(), YearSelection::All);
        assert_eq!("".parse::<YearSelection>().unwrap(), YearSelection::All);

        let range: YearSelection = "2016-2018".parse().unwrap();
        assert_eq!(
            range,
            YearSelection::Years(BTreeSet::from([2016, 2017, 2018]))
        );

        let mixed: YearSelection = "2019, 2021-2022".parse().unwrap();
        assert_eq!(
            mixed,
            YearSelection::Years(BTreeSet::from([2019, 2021, 2022]))
        );

        assert!("2020-2018".parse::<YearSelection>().is_err());
        assert!("twenty".parse::<YearSelection>().is_err());
        assert!(",".parse::<YearSelection>().is_err());
    }

    #[test]
    fn test_year_selection_rejects_implausible_years() {
        for text in ["1-3000000", "0-2000000000", "2016-2101", "1899"] {
            match text.parse::<YearSelection>() {
                Err(AccidentsError::Configuration { message }) => {
                    assert!(message.contains("outside 1900-2100"), "{message}");
                }
                other => panic!("expected configuration error for {text}, got {:?}", other),
            }
        }

        let widest: YearSelection = "1900-2100".parse().unwrap();
        let YearSelection::Years(years) = widest else {
            panic!("expected explicit years");
        };
        assert_eq!(years.len(), 201);
    }

    #[test]
    fn test_year_selection_includes() {
        let selection: YearSelection = "2020".parse().unwrap();
        assert!(selection.includes(Some(2020)));
        assert!(!selection.includes(Some(2021)));
        assert!(!selection.includes(None));
        assert!(YearSelection::All.includes(None));
    }
}
