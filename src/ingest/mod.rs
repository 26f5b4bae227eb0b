//! Ingestion of the raw accidents CSV into the canonical dataset.
//!
//! The header is validated first, the file is then read with polars as
//! all-string columns, and every row is normalized in a single pass:
//! severity and state lookups (rejecting rows that fail), timestamp
//! parsing, derived calendar fields and the year selection. The result is
//! an immutable polars frame shared by every aggregation.

pub mod normalize;

use self::normalize::{TimeParts, clean_text, parse_flag, parse_number, parse_severity, parse_timestamp};

use crate::constants::{MAX_REJECTION_WARNINGS, NUMERIC_FIELDS, ROAD_FEATURES, TEXT_FIELDS, columns, input};
use crate::error::{AccidentsError, Result};
use crate::models::{IngestStats, YearSelection};
use crate::reference::lookup_state;
use crate::schema::InputSchema;

use polars::prelude::*;
use std::path::Path;
use tracing::{debug, info, warn};

/// The normalized, row-level accident frame plus its ingest accounting
#[derive(Debug, Clone)]
pub struct CanonicalDataset {
    pub frame: DataFrame,
    pub stats: IngestStats,
}

impl CanonicalDataset {
    pub fn height(&self) -> usize {
        self.frame.height()
    }
}

/// Reads and normalizes the accidents CSV
#[derive(Debug, Clone, Default)]
pub struct Ingestor {
    years: YearSelection,
}

impl Ingestor {
    pub fn new(years: YearSelection) -> Self {
        Self { years }
    }

    /// Validate, read and normalize the CSV at `path`
    pub fn ingest(&self, path: &Path) -> Result<CanonicalDataset> {
        if !path.exists() {
            return Err(AccidentsError::InputNotFound {
                path: path.to_path_buf(),
            });
        }

        let schema = InputSchema::from_file(path)?;

        debug!("Reading {} as string columns", path.display());
        let raw = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()
            .map_err(|e| AccidentsError::InvalidInput {
                path: path.to_path_buf(),
                reason: format!("failed to read CSV: {}", e),
            })?;

        let dataset = normalize_frame(&raw, &schema, &self.years)?;
        let stats = &dataset.stats;

        info!(
            "Ingested {} rows from {}: {} kept, {} rejected (severity: {}, state: {}), {} outside {}",
            stats.rows_read,
            path.display(),
            stats.rows_kept,
            stats.rows_rejected(),
            stats.rejected_severity,
            stats.rejected_state,
            stats.outside_year_selection,
            self.years
        );
        if stats.unparsed_start_time > 0 {
            warn!(
                "{} kept rows have an unparseable start time and are excluded from time-based tables",
                stats.unparsed_start_time
            );
        }

        Ok(dataset)
    }
}

/// Column buffers for the canonical frame, filled row by row
#[derive(Default)]
struct CanonicalColumns {
    id: Vec<Option<String>>,
    severity: Vec<i32>,
    severity_label: Vec<&'static str>,
    start_time: Vec<Option<i64>>,
    end_time: Vec<Option<i64>>,
    state: Vec<&'static str>,
    state_name: Vec<&'static str>,
    numeric: Vec<Vec<Option<f64>>>,
    text: Vec<Vec<Option<String>>>,
    flags: Vec<Vec<Option<bool>>>,
    year: Vec<Option<i32>>,
    month: Vec<Option<i32>>,
    weekday: Vec<Option<i32>>,
    weekday_name: Vec<Option<&'static str>>,
    hour: Vec<Option<i32>>,
    quarter: Vec<Option<i32>>,
    year_quarter: Vec<Option<String>>,
}

impl CanonicalColumns {
    fn new() -> Self {
        Self {
            numeric: vec![Vec::new(); NUMERIC_FIELDS.len()],
            text: vec![Vec::new(); TEXT_FIELDS.len()],
            flags: vec![Vec::new(); ROAD_FEATURES.len()],
            ..Default::default()
        }
    }

    fn push_time(&mut self, parts: Option<TimeParts>) {
        self.year.push(parts.map(|p| p.year));
        self.month.push(parts.map(|p| p.month));
        self.weekday.push(parts.map(|p| p.weekday));
        self.weekday_name.push(parts.map(|p| p.weekday_name()));
        self.hour.push(parts.map(|p| p.hour));
        self.quarter.push(parts.map(|p| p.year_quarter.quarter as i32));
        self.year_quarter.push(parts.map(|p| p.year_quarter.label()));
    }

    fn into_frame(self) -> Result<DataFrame> {
        let datetime = DataType::Datetime(TimeUnit::Milliseconds, None);

        let mut frame_columns = vec![
            Column::new(columns::ID.into(), self.id),
            Column::new(columns::SEVERITY.into(), self.severity),
            Column::new(columns::SEVERITY_LABEL.into(), self.severity_label),
            Column::new(columns::START_TIME.into(), self.start_time).cast(&datetime)?,
            Column::new(columns::END_TIME.into(), self.end_time).cast(&datetime)?,
            Column::new(columns::STATE.into(), self.state),
            Column::new(columns::STATE_NAME.into(), self.state_name),
        ];

        for ((_, name), values) in NUMERIC_FIELDS.iter().zip(self.numeric) {
            frame_columns.push(Column::new((*name).into(), values));
        }
        for ((_, name), values) in TEXT_FIELDS.iter().zip(self.text) {
            frame_columns.push(Column::new((*name).into(), values));
        }
        for ((_, name), values) in ROAD_FEATURES.iter().zip(self.flags) {
            frame_columns.push(Column::new((*name).into(), values));
        }

        frame_columns.extend([
            Column::new(columns::YEAR.into(), self.year),
            Column::new(columns::MONTH.into(), self.month),
            Column::new(columns::WEEKDAY.into(), self.weekday),
            Column::new(columns::WEEKDAY_NAME.into(), self.weekday_name),
            Column::new(columns::HOUR.into(), self.hour),
            Column::new(columns::QUARTER.into(), self.quarter),
            Column::new(columns::YEAR_QUARTER.into(), self.year_quarter),
        ]);

        Ok(DataFrame::new(frame_columns)?)
    }
}

/// Look up a raw string column by its expected input header
fn raw_column<'a>(raw: &'a DataFrame, schema: &InputSchema, expected: &str) -> Result<&'a StringChunked> {
    let name = schema.column(expected)?;
    let column = raw.column(name).map_err(|e| AccidentsError::InvalidInput {
        path: schema.path().to_path_buf(),
        reason: format!("column '{}' could not be read: {}", name, e),
    })?;
    Ok(column.str()?)
}

/// Normalize a raw all-string frame into the canonical dataset
pub fn normalize_frame(
    raw: &DataFrame,
    schema: &InputSchema,
    years: &YearSelection,
) -> Result<CanonicalDataset> {
    let ids = raw_column(raw, schema, input::ID)?;
    let severities = raw_column(raw, schema, input::SEVERITY)?;
    let states = raw_column(raw, schema, input::STATE)?;
    let starts = raw_column(raw, schema, input::START_TIME)?;
    let ends = raw_column(raw, schema, input::END_TIME)?;

    let numeric = NUMERIC_FIELDS
        .iter()
        .map(|(header, _)| raw_column(raw, schema, header))
        .collect::<Result<Vec<_>>>()?;
    let text = TEXT_FIELDS
        .iter()
        .map(|(header, _)| raw_column(raw, schema, header))
        .collect::<Result<Vec<_>>>()?;
    let flags = ROAD_FEATURES
        .iter()
        .map(|(header, _)| raw_column(raw, schema, header))
        .collect::<Result<Vec<_>>>()?;

    let mut stats = IngestStats {
        rows_read: raw.height(),
        ..Default::default()
    };
    let mut out = CanonicalColumns::new();

    for row in 0..raw.height() {
        let id = ids.get(row);

        let Some(severity) = parse_severity(severities.get(row)) else {
            stats.rejected_severity += 1;
            report_rejection(&stats, id, "severity", severities.get(row));
            continue;
        };
        let Some((state, state_name)) = states.get(row).and_then(lookup_state) else {
            stats.rejected_state += 1;
            report_rejection(&stats, id, "state", states.get(row));
            continue;
        };

        let start = parse_timestamp(starts.get(row));
        let parts = start.as_ref().map(TimeParts::from_timestamp);
        if !years.includes(parts.map(|p| p.year)) {
            stats.outside_year_selection += 1;
            continue;
        }
        if start.is_none() {
            stats.unparsed_start_time += 1;
        }

        out.id.push(clean_text(id));
        out.severity.push(severity.code());
        out.severity_label.push(severity.label());
        out.start_time
            .push(start.map(|ts| ts.and_utc().timestamp_millis()));
        out.end_time.push(
            parse_timestamp(ends.get(row)).map(|ts| ts.and_utc().timestamp_millis()),
        );
        out.state.push(state);
        out.state_name.push(state_name);

        for (values, source) in out.numeric.iter_mut().zip(&numeric) {
            values.push(parse_number(source.get(row)));
        }
        for (values, source) in out.text.iter_mut().zip(&text) {
            values.push(clean_text(source.get(row)));
        }
        for (values, source) in out.flags.iter_mut().zip(&flags) {
            values.push(parse_flag(source.get(row)));
        }
        out.push_time(parts);

        stats.rows_kept += 1;
    }

    Ok(CanonicalDataset {
        frame: out.into_frame()?,
        stats,
    })
}

fn report_rejection(stats: &IngestStats, id: Option<&str>, field: &str, value: Option<&str>) {
    let id = id.unwrap_or("<no id>");
    let value = value.unwrap_or("<missing>");
    if stats.rows_rejected() <= MAX_REJECTION_WARNINGS {
        warn!("Rejected row {}: unrecognized {} '{}'", id, field, value);
    } else {
        debug!("Rejected row {}: unrecognized {} '{}'", id, field, value);
    }
}
