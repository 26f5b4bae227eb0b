//! Building blocks shared by the summary table builders.

use crate::constants::columns::{ACCIDENT_COUNT, PERCENTAGE, SEVERITY, SEVERITY_LABEL};
use crate::error::Result;
use crate::models::Severity;
use polars::prelude::*;

fn key_exprs(keys: &[&str]) -> Vec<Expr> {
    keys.iter().map(|k| col(*k)).collect()
}

/// Drop rows with a null in any of `keys`
pub fn drop_null_keys(lf: LazyFrame, keys: &[&str]) -> LazyFrame {
    match keys
        .iter()
        .map(|k| col(*k).is_not_null())
        .reduce(|acc, e| acc.and(e))
    {
        Some(predicate) => lf.filter(predicate),
        None => lf,
    }
}

/// Row count per key tuple, as `accident_count` (Int64)
pub fn count_by(frame: &DataFrame, keys: &[&str]) -> LazyFrame {
    drop_null_keys(frame.clone().lazy(), keys)
        .group_by(key_exprs(keys))
        .agg([len().cast(DataType::Int64).alias(ACCIDENT_COUNT)])
}

/// Share of each row's count in the table total, in percent
pub fn with_percentage(lf: LazyFrame) -> LazyFrame {
    let total = col(ACCIDENT_COUNT).sum().cast(DataType::Float64);
    lf.with_column(
        when(total.clone().gt(lit(0.0)))
            .then(col(ACCIDENT_COUNT).cast(DataType::Float64) / total * lit(100.0))
            .otherwise(lit(0.0))
            .alias(PERCENTAGE),
    )
}

/// Total order: `(column, descending)` pairs, first pair most significant
pub fn ordered(lf: LazyFrame, order: &[(&str, bool)]) -> LazyFrame {
    let exprs: Vec<Expr> = order.iter().map(|(c, _)| col(*c)).collect();
    let descending: Vec<bool> = order.iter().map(|(_, d)| *d).collect();
    lf.sort_by_exprs(
        exprs,
        SortMultipleOptions::default()
            .with_order_descending_multi(descending)
            .with_maintain_order(true),
    )
}

/// Restrict and reorder to the published column list
pub fn project(lf: LazyFrame, names: &[&str]) -> LazyFrame {
    lf.select(key_exprs(names))
}

/// The four severities with their labels, lowest first
pub fn severity_reference() -> Result<DataFrame> {
    let codes: Vec<i32> = Severity::ALL.iter().map(|s| s.code()).collect();
    let labels: Vec<&str> = Severity::ALL.iter().map(|s| s.label()).collect();
    Ok(DataFrame::new(vec![
        Column::new(SEVERITY.into(), codes),
        Column::new(SEVERITY_LABEL.into(), labels),
    ])?)
}

/// Attach `severity_label` from the ordinal `severity` column
pub fn with_severity_label(lf: LazyFrame) -> Result<LazyFrame> {
    Ok(lf.join(
        severity_reference()?.lazy(),
        [col(SEVERITY)],
        [col(SEVERITY)],
        JoinArgs::new(JoinType::Left),
    ))
}

/// Per-key severity counts as one Int64 column per severity.
///
/// With no keys the result is a single row, zero-filled on empty input.
pub fn severity_wide(frame: &DataFrame, keys: &[&str]) -> LazyFrame {
    let counts: Vec<Expr> = Severity::ALL
        .iter()
        .map(|s| {
            col(SEVERITY)
                .eq(lit(s.code()))
                .cast(DataType::Int64)
                .sum()
                .cast(DataType::Int64)
                .alias(s.column_name())
        })
        .collect();

    let lf = drop_null_keys(frame.clone().lazy(), keys);
    if keys.is_empty() {
        lf.select(counts)
    } else {
        lf.group_by(key_exprs(keys)).agg(counts)
    }
}

/// Long-form severity counts complete over all four severities.
///
/// Every key tuple that occurs gets exactly one row per severity, with
/// `accident_count = 0` where no rows match, plus `severity_label`.
pub fn severity_long(frame: &DataFrame, keys: &[&str]) -> Result<LazyFrame> {
    let wide = severity_wide(frame, keys);

    let parts: Vec<LazyFrame> = Severity::ALL
        .iter()
        .map(|s| {
            let mut exprs = key_exprs(keys);
            exprs.push(lit(s.code()).cast(DataType::Int32).alias(SEVERITY));
            exprs.push(col(s.column_name()).alias(ACCIDENT_COUNT));
            wide.clone().select(exprs)
        })
        .collect();

    with_severity_label(concat(parts, UnionArgs::default())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataFrame {
        df!(
            "state" => [Some("CA"), Some("CA"), Some("TX"), None],
            "severity" => [1i32, 3, 1, 2],
        )
        .unwrap()
    }

    #[test]
    fn test_count_by_skips_null_keys() {
        let out = ordered(count_by(&sample(), &["state"]), &[("state", false)])
            .collect()
            .unwrap();

        assert_eq!(out.height(), 2);
        let counts = out.column(ACCIDENT_COUNT).unwrap().i64().unwrap();
        assert_eq!(counts.get(0), Some(2));
        assert_eq!(counts.get(1), Some(1));
    }

    #[test]
    fn test_percentage_sums_to_hundred() {
        let out = with_percentage(count_by(&sample(), &["state"]))
            .collect()
            .unwrap();
        let total: f64 = out.column(PERCENTAGE).unwrap().f64().unwrap().sum().unwrap();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_severity_long_is_complete() {
        let out = ordered(
            severity_long(&sample(), &["state"]).unwrap(),
            &[("state", false), (SEVERITY, false)],
        )
        .collect()
        .unwrap();

        // two observed states x four severities
        assert_eq!(out.height(), 8);
        let labels = out.column(SEVERITY_LABEL).unwrap().str().unwrap();
        assert_eq!(labels.get(0), Some("Low"));
        assert_eq!(labels.get(3), Some("Critical"));

        let counts: Vec<Option<i64>> = out
            .column(ACCIDENT_COUNT)
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(
            counts,
            vec![Some(1), Some(0), Some(1), Some(0), Some(1), Some(0), Some(0), Some(0)]
        );
    }

    #[test]
    fn test_severity_wide_without_keys_on_empty_input() {
        let empty = sample().head(Some(0));
        let out = severity_wide(&empty, &[]).collect().unwrap();
        assert_eq!(out.height(), 1);
        assert_eq!(out.column("low").unwrap().i64().unwrap().get(0), Some(0));
    }

    #[test]
    fn test_severity_counts_are_int64() {
        let wide = severity_wide(&sample(), &["state"]).collect().unwrap();
        for name in ["low", "medium", "high", "critical"] {
            assert_eq!(wide.column(name).unwrap().dtype(), &DataType::Int64, "{name}");
        }

        let long = severity_long(&sample(), &["state"]).unwrap().collect().unwrap();
        assert_eq!(long.column(ACCIDENT_COUNT).unwrap().dtype(), &DataType::Int64);
    }
}
