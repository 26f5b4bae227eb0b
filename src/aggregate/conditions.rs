//! Severity, weather and road-feature summary tables.

use super::AggregationContext;
use super::common::{
    count_by, ordered, project, severity_long, severity_reference, with_percentage, with_severity_label,
};
use crate::constants::ROAD_FEATURES;
use crate::constants::columns::{ACCIDENT_COUNT, PERCENTAGE, SEVERITY, SEVERITY_LABEL, WEATHER_CONDITION};
use crate::error::Result;
use polars::prelude::*;

/// Always four rows, one per severity
pub fn severity_counts(frame: &DataFrame, _ctx: &AggregationContext) -> Result<DataFrame> {
    let lf = with_percentage(severity_long(frame, &[])?);
    let lf = ordered(lf, &[(SEVERITY, false)]);
    Ok(project(lf, &[SEVERITY, SEVERITY_LABEL, ACCIDENT_COUNT, PERCENTAGE]).collect()?)
}

pub fn weather_severity_counts(frame: &DataFrame, _ctx: &AggregationContext) -> Result<DataFrame> {
    let lf = severity_long(frame, &[WEATHER_CONDITION])?;
    let lf = ordered(
        lf,
        &[(ACCIDENT_COUNT, true), (WEATHER_CONDITION, false), (SEVERITY, false)],
    );
    Ok(project(lf, &[WEATHER_CONDITION, SEVERITY, SEVERITY_LABEL, ACCIDENT_COUNT]).collect()?)
}

pub fn weather_condition_counts(frame: &DataFrame, _ctx: &AggregationContext) -> Result<DataFrame> {
    let lf = with_percentage(count_by(frame, &[WEATHER_CONDITION]));
    let lf = ordered(lf, &[(ACCIDENT_COUNT, true), (WEATHER_CONDITION, false)]);
    Ok(project(lf, &[WEATHER_CONDITION, ACCIDENT_COUNT, PERCENTAGE]).collect()?)
}

/// Per severity: total accidents and how many had each road feature flagged
pub fn road_conditions_by_severity(frame: &DataFrame, _ctx: &AggregationContext) -> Result<DataFrame> {
    let mut aggs = vec![len().cast(DataType::Int64).alias(ACCIDENT_COUNT)];
    aggs.extend(
        ROAD_FEATURES
            .iter()
            .map(|(_, feature)| col(*feature).cast(DataType::Int64).sum().alias(*feature)),
    );

    let observed = frame.clone().lazy().group_by([col(SEVERITY)]).agg(aggs);

    let mut fills = vec![col(ACCIDENT_COUNT).fill_null(lit(0i64))];
    fills.extend(
        ROAD_FEATURES
            .iter()
            .map(|(_, feature)| col(*feature).fill_null(lit(0i64))),
    );

    let lf = severity_reference()?
        .lazy()
        .select([col(SEVERITY)])
        .join(observed, [col(SEVERITY)], [col(SEVERITY)], JoinArgs::new(JoinType::Left))
        .with_columns(fills);
    let lf = ordered(with_severity_label(lf)?, &[(SEVERITY, false)]);

    let mut published = vec![SEVERITY, SEVERITY_LABEL, ACCIDENT_COUNT];
    published.extend(ROAD_FEATURES.iter().map(|(_, feature)| *feature));
    Ok(project(lf, &published).collect()?)
}
