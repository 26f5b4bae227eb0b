//! State- and city-keyed summary tables.

use super::AggregationContext;
use super::common::{count_by, ordered, project, severity_long, severity_wide, with_percentage};
use super::topn::{RankedEntry, top_n};
use crate::constants::columns::{
    ACCIDENT_COUNT, CITY, CRITICAL, HIGH, LOW, MEDIUM, PERCENTAGE, RANK, SEVERITY, SEVERITY_LABEL,
    STATE, STATE_NAME, YEAR,
};
use crate::error::Result;
use crate::models::Severity;
use crate::reference::state_universe;
use polars::prelude::*;

/// Observed states only; counts sum to the rows with a state
pub fn state_counts(frame: &DataFrame, _ctx: &AggregationContext) -> Result<DataFrame> {
    let lf = with_percentage(count_by(frame, &[STATE, STATE_NAME]));
    let lf = ordered(lf, &[(ACCIDENT_COUNT, true), (STATE, false)]);
    Ok(project(lf, &[STATE, STATE_NAME, ACCIDENT_COUNT, PERCENTAGE]).collect()?)
}

/// Exactly the 50 states, zero where no accidents were recorded
pub fn state_choropleth_counts(frame: &DataFrame, _ctx: &AggregationContext) -> Result<DataFrame> {
    let (codes, names): (Vec<&str>, Vec<&str>) = state_universe().into_iter().unzip();
    let universe = DataFrame::new(vec![
        Column::new(STATE_NAME.into(), names),
        Column::new(STATE.into(), codes),
    ])?;

    let counts = count_by(frame, &[STATE]);
    let lf = universe
        .lazy()
        .join(counts, [col(STATE)], [col(STATE)], JoinArgs::new(JoinType::Left))
        .with_column(col(ACCIDENT_COUNT).fill_null(lit(0i64)));

    let lf = ordered(with_percentage(lf), &[(STATE_NAME, false)]);
    Ok(project(lf, &[STATE_NAME, STATE, ACCIDENT_COUNT, PERCENTAGE]).collect()?)
}

pub fn state_yearly_counts(frame: &DataFrame, _ctx: &AggregationContext) -> Result<DataFrame> {
    let lf = count_by(frame, &[STATE, STATE_NAME, YEAR]);
    let lf = ordered(lf, &[(STATE, false), (YEAR, false)]);
    Ok(project(lf, &[STATE, STATE_NAME, YEAR, ACCIDENT_COUNT]).collect()?)
}

pub fn state_yearly_severity(frame: &DataFrame, _ctx: &AggregationContext) -> Result<DataFrame> {
    let lf = severity_long(frame, &[STATE, YEAR])?;
    let lf = ordered(lf, &[(STATE, false), (YEAR, false), (SEVERITY, false)]);
    Ok(project(lf, &[STATE, YEAR, SEVERITY, SEVERITY_LABEL, ACCIDENT_COUNT]).collect()?)
}

/// Wide form: one row per state and year with a count column per severity
pub fn state_yearly_summary(frame: &DataFrame, _ctx: &AggregationContext) -> Result<DataFrame> {
    let total = Severity::ALL
        .iter()
        .map(|s| col(s.column_name()))
        .reduce(|acc, c| acc + c)
        .unwrap_or_else(|| lit(0i64));

    let lf = severity_wide(frame, &[STATE, STATE_NAME, YEAR]).with_column(total.alias(ACCIDENT_COUNT));
    let lf = ordered(lf, &[(STATE, false), (YEAR, false)]);
    Ok(project(
        lf,
        &[STATE, STATE_NAME, YEAR, LOW, MEDIUM, HIGH, CRITICAL, ACCIDENT_COUNT],
    )
    .collect()?)
}

/// Top cities by accident count; a city is identified by (city, state)
pub fn city_counts_top_n(frame: &DataFrame, ctx: &AggregationContext) -> Result<DataFrame> {
    let counts = count_by(frame, &[CITY, STATE]).collect()?;

    let cities = counts.column(CITY)?.str()?;
    let states = counts.column(STATE)?.str()?;
    let totals = counts.column(ACCIDENT_COUNT)?.i64()?;

    let entries: Vec<RankedEntry<(), (String, String)>> = cities
        .into_iter()
        .zip(states)
        .zip(totals)
        .filter_map(|((city, state), total)| {
            Some(RankedEntry {
                partition: (),
                entity: (city?.to_string(), state?.to_string()),
                measure: total?,
            })
        })
        .collect();

    let ranked = top_n(entries, ctx.top_cities);

    let mut city = Vec::with_capacity(ranked.len());
    let mut state = Vec::with_capacity(ranked.len());
    let mut accident_count = Vec::with_capacity(ranked.len());
    let mut rank = Vec::with_capacity(ranked.len());
    for entry in ranked {
        let (c, s) = entry.entity;
        city.push(c);
        state.push(s);
        accident_count.push(entry.measure);
        rank.push(entry.rank as i32);
    }

    Ok(DataFrame::new(vec![
        Column::new(CITY.into(), city),
        Column::new(STATE.into(), state),
        Column::new(ACCIDENT_COUNT.into(), accident_count),
        Column::new(RANK.into(), rank),
    ])?)
}
