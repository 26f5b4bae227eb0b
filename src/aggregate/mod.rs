//! Summary table catalog.
//!
//! Each entry is a pure function from the canonical dataset to one named
//! summary table. Builders share the same policies: rows with a null in
//! any group-by key are excluded, `accident_count` is a row count,
//! percentages are taken over the table's own rows, severity breakdowns
//! are complete over all four severities, and every table has a total
//! output order.

pub mod common;
pub mod conditions;
pub mod geography;
pub mod temporal;
pub mod topn;

use crate::config::PipelineConfig;
use crate::constants::tables;
use crate::error::{AccidentsError, Result};
use polars::prelude::DataFrame;

/// Parameters the builders need beyond the canonical frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregationContext {
    pub top_states_per_quarter: usize,
    pub top_cities: usize,
}

impl From<&PipelineConfig> for AggregationContext {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            top_states_per_quarter: config.top_states_per_quarter,
            top_cities: config.top_cities,
        }
    }
}

impl Default for AggregationContext {
    fn default() -> Self {
        Self::from(&PipelineConfig::default())
    }
}

type BuildFn = fn(&DataFrame, &AggregationContext) -> Result<DataFrame>;

/// One named summary table and how to build it
#[derive(Clone, Copy)]
pub struct TableSpec {
    pub name: &'static str,
    pub description: &'static str,
    /// Keyed on fields derived from the start time; rows with an
    /// unparseable start time never contribute
    pub time_keyed: bool,
    build: BuildFn,
}

impl std::fmt::Debug for TableSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableSpec")
            .field("name", &self.name)
            .field("time_keyed", &self.time_keyed)
            .finish()
    }
}

impl TableSpec {
    /// Build the table; any failure is reported as scoped to this table
    pub fn build(&self, frame: &DataFrame, ctx: &AggregationContext) -> Result<DataFrame> {
        (self.build)(frame, ctx).map_err(|e| match e {
            AccidentsError::Aggregation { .. } => e,
            other => AccidentsError::aggregation(self.name, other.to_string()),
        })
    }
}

const fn spec(name: &'static str, description: &'static str, time_keyed: bool, build: BuildFn) -> TableSpec {
    TableSpec {
        name,
        description,
        time_keyed,
        build,
    }
}

static CATALOG: &[TableSpec] = &[
    spec(tables::STATE_COUNTS, "Accidents per observed state with share of total", false, geography::state_counts),
    spec(tables::STATE_CHOROPLETH_COUNTS, "Accidents for each of the 50 states, zero where absent", false, geography::state_choropleth_counts),
    spec(tables::SEVERITY_COUNTS, "Accidents per severity with share of total", false, conditions::severity_counts),
    spec(tables::WEATHER_SEVERITY_COUNTS, "Accidents per weather condition and severity", false, conditions::weather_severity_counts),
    spec(tables::WEATHER_CONDITION_COUNTS, "Accidents per weather condition with share of total", false, conditions::weather_condition_counts),
    spec(tables::ROAD_CONDITIONS_BY_SEVERITY, "Road-feature flag counts per severity", false, conditions::road_conditions_by_severity),
    spec(tables::STATE_YEARLY_COUNTS, "Accidents per state and year", true, geography::state_yearly_counts),
    spec(tables::STATE_YEARLY_SEVERITY, "Accidents per state, year and severity", true, geography::state_yearly_severity),
    spec(tables::STATE_YEARLY_SUMMARY, "Per state and year severity breakdown in wide form", true, geography::state_yearly_summary),
    spec(tables::CITY_COUNTS_TOP_N, "Cities with the most accidents", false, geography::city_counts_top_n),
    spec(tables::ACCIDENTS_BY_YEAR, "Accidents per year", true, temporal::accidents_by_year),
    spec(tables::ACCIDENTS_BY_YEAR_SEVERITY, "Accidents per year and severity", true, temporal::accidents_by_year_severity),
    spec(tables::ACCIDENTS_BY_YEAR_MONTH, "Accidents per year and month", true, temporal::accidents_by_year_month),
    spec(tables::ACCIDENTS_BY_MONTH, "Accidents per calendar month", true, temporal::accidents_by_month),
    spec(tables::ACCIDENTS_BY_WEEKDAY, "Accidents per day of week", true, temporal::accidents_by_weekday),
    spec(tables::ACCIDENTS_BY_HOUR, "Accidents per hour of day", true, temporal::accidents_by_hour),
    spec(tables::SEVERITY_BY_HOUR, "Accidents per hour of day and severity", true, temporal::severity_by_hour),
    spec(tables::STATE_MONTHLY_COUNTS, "Accidents per state and calendar month", true, temporal::state_monthly_counts),
    spec(tables::STATE_WEEKDAY_COUNTS, "Accidents per state and day of week", true, temporal::state_weekday_counts),
    spec(tables::STATE_HOURLY_COUNTS, "Accidents per state and hour of day", true, temporal::state_hourly_counts),
    spec(tables::TOP_STATES_BY_QUARTER, "Highest-accident states in each year-quarter", true, temporal::top_states_by_quarter),
    spec(tables::STATE_YEAR_QUARTER_SEVERITY, "Accidents per state, year-quarter and severity", true, temporal::state_year_quarter_severity),
];

/// Every summary table, in publication order
pub fn catalog() -> &'static [TableSpec] {
    CATALOG
}

pub fn lookup(name: &str) -> Option<&'static TableSpec> {
    CATALOG.iter().find(|spec| spec.name == name)
}

/// Resolve a table selection against the catalog.
///
/// `None` selects everything. Unknown names are a configuration error
/// listing all of them; the result keeps catalog order.
pub fn select(names: Option<&[String]>) -> Result<Vec<&'static TableSpec>> {
    let Some(names) = names else {
        return Ok(CATALOG.iter().collect());
    };

    let unknown: Vec<&str> = names
        .iter()
        .map(String::as_str)
        .filter(|name| lookup(name).is_none())
        .collect();
    if !unknown.is_empty() {
        return Err(AccidentsError::configuration(format!(
            "unknown summary tables: {}",
            unknown.join(", ")
        )));
    }

    Ok(CATALOG
        .iter()
        .filter(|spec| names.iter().any(|n| n == spec.name))
        .collect())
}
