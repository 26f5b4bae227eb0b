//! Time-keyed summary tables.
//!
//! All of these key on calendar fields derived from the start time, so
//! rows whose start time could not be parsed drop out through the null-key
//! rule. Only observed keys appear; there is no calendar gap filling.

use super::AggregationContext;
use super::common::{count_by, ordered, project, severity_long};
use super::topn::{RankedEntry, top_n};
use crate::constants::columns::{
    ACCIDENT_COUNT, HOUR, MONTH, QUARTER, RANK, SEVERITY, SEVERITY_LABEL, STATE, STATE_NAME, WEEKDAY,
    WEEKDAY_NAME, YEAR, YEAR_QUARTER,
};
use crate::constants::tables;
use crate::error::{AccidentsError, Result};
use crate::models::YearQuarter;
use crate::reference::state_name;
use polars::prelude::*;

pub fn accidents_by_year(frame: &DataFrame, _ctx: &AggregationContext) -> Result<DataFrame> {
    let lf = ordered(count_by(frame, &[YEAR]), &[(YEAR, false)]);
    Ok(project(lf, &[YEAR, ACCIDENT_COUNT]).collect()?)
}

pub fn accidents_by_year_severity(frame: &DataFrame, _ctx: &AggregationContext) -> Result<DataFrame> {
    let lf = ordered(severity_long(frame, &[YEAR])?, &[(YEAR, false), (SEVERITY, false)]);
    Ok(project(lf, &[YEAR, SEVERITY, SEVERITY_LABEL, ACCIDENT_COUNT]).collect()?)
}

pub fn accidents_by_year_month(frame: &DataFrame, _ctx: &AggregationContext) -> Result<DataFrame> {
    let lf = ordered(count_by(frame, &[YEAR, MONTH]), &[(YEAR, false), (MONTH, false)]);
    Ok(project(lf, &[YEAR, MONTH, ACCIDENT_COUNT]).collect()?)
}

pub fn accidents_by_month(frame: &DataFrame, _ctx: &AggregationContext) -> Result<DataFrame> {
    let lf = ordered(count_by(frame, &[MONTH]), &[(MONTH, false)]);
    Ok(project(lf, &[MONTH, ACCIDENT_COUNT]).collect()?)
}

/// Ordered Monday first by the numeric weekday, never by name
pub fn accidents_by_weekday(frame: &DataFrame, _ctx: &AggregationContext) -> Result<DataFrame> {
    let lf = ordered(count_by(frame, &[WEEKDAY, WEEKDAY_NAME]), &[(WEEKDAY, false)]);
    Ok(project(lf, &[WEEKDAY, WEEKDAY_NAME, ACCIDENT_COUNT]).collect()?)
}

pub fn accidents_by_hour(frame: &DataFrame, _ctx: &AggregationContext) -> Result<DataFrame> {
    let lf = ordered(count_by(frame, &[HOUR]), &[(HOUR, false)]);
    Ok(project(lf, &[HOUR, ACCIDENT_COUNT]).collect()?)
}

pub fn severity_by_hour(frame: &DataFrame, _ctx: &AggregationContext) -> Result<DataFrame> {
    let lf = ordered(severity_long(frame, &[HOUR])?, &[(HOUR, false), (SEVERITY, false)]);
    Ok(project(lf, &[HOUR, SEVERITY, SEVERITY_LABEL, ACCIDENT_COUNT]).collect()?)
}

pub fn state_monthly_counts(frame: &DataFrame, _ctx: &AggregationContext) -> Result<DataFrame> {
    let lf = ordered(count_by(frame, &[STATE, MONTH]), &[(STATE, false), (MONTH, false)]);
    Ok(project(lf, &[STATE, MONTH, ACCIDENT_COUNT]).collect()?)
}

pub fn state_weekday_counts(frame: &DataFrame, _ctx: &AggregationContext) -> Result<DataFrame> {
    let lf = ordered(
        count_by(frame, &[STATE, WEEKDAY, WEEKDAY_NAME]),
        &[(STATE, false), (WEEKDAY, false)],
    );
    Ok(project(lf, &[STATE, WEEKDAY, WEEKDAY_NAME, ACCIDENT_COUNT]).collect()?)
}

pub fn state_hourly_counts(frame: &DataFrame, _ctx: &AggregationContext) -> Result<DataFrame> {
    let lf = ordered(count_by(frame, &[STATE, HOUR]), &[(STATE, false), (HOUR, false)]);
    Ok(project(lf, &[STATE, HOUR, ACCIDENT_COUNT]).collect()?)
}

/// The `top_states_per_quarter` states with the most accidents in each
/// year-quarter, chronologically ordered on `(year, quarter)`
pub fn top_states_by_quarter(frame: &DataFrame, ctx: &AggregationContext) -> Result<DataFrame> {
    let counts = count_by(frame, &[YEAR, QUARTER, STATE]).collect()?;

    let years = counts.column(YEAR)?.i32()?;
    let quarters = counts.column(QUARTER)?.i32()?;
    let states = counts.column(STATE)?.str()?;
    let totals = counts.column(ACCIDENT_COUNT)?.i64()?;

    let mut entries = Vec::with_capacity(counts.height());
    for (((year, quarter), state), total) in years.into_iter().zip(quarters).zip(states).zip(totals) {
        let (Some(year), Some(quarter), Some(state), Some(total)) = (year, quarter, state, total) else {
            continue;
        };
        let quarter = u8::try_from(quarter).map_err(|_| {
            AccidentsError::aggregation(
                tables::TOP_STATES_BY_QUARTER,
                format!("quarter {} out of range", quarter),
            )
        })?;
        entries.push(RankedEntry {
            partition: YearQuarter::new(year, quarter)?,
            entity: state.to_string(),
            measure: total,
        });
    }

    let ranked = top_n(entries, ctx.top_states_per_quarter);

    let mut year = Vec::with_capacity(ranked.len());
    let mut quarter = Vec::with_capacity(ranked.len());
    let mut year_quarter = Vec::with_capacity(ranked.len());
    let mut state = Vec::with_capacity(ranked.len());
    let mut name = Vec::with_capacity(ranked.len());
    let mut accident_count = Vec::with_capacity(ranked.len());
    let mut rank = Vec::with_capacity(ranked.len());
    for entry in ranked {
        year.push(entry.partition.year);
        quarter.push(entry.partition.quarter as i32);
        year_quarter.push(entry.partition.label());
        name.push(state_name(&entry.entity));
        state.push(entry.entity);
        accident_count.push(entry.measure);
        rank.push(entry.rank as i32);
    }

    Ok(DataFrame::new(vec![
        Column::new(YEAR.into(), year),
        Column::new(QUARTER.into(), quarter),
        Column::new(YEAR_QUARTER.into(), year_quarter),
        Column::new(STATE.into(), state),
        Column::new(STATE_NAME.into(), name),
        Column::new(ACCIDENT_COUNT.into(), accident_count),
        Column::new(RANK.into(), rank),
    ])?)
}

pub fn state_year_quarter_severity(frame: &DataFrame, _ctx: &AggregationContext) -> Result<DataFrame> {
    let lf = severity_long(frame, &[STATE, YEAR, QUARTER, YEAR_QUARTER])?;
    let lf = ordered(
        lf,
        &[(YEAR, false), (QUARTER, false), (STATE, false), (SEVERITY, false)],
    );
    Ok(project(
        lf,
        &[STATE, YEAR, QUARTER, YEAR_QUARTER, SEVERITY, SEVERITY_LABEL, ACCIDENT_COUNT],
    )
    .collect()?)
}
