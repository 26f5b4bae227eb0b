//! Error handling tests: fatal input problems and per-table isolation

use crate::config::PipelineConfig;
use crate::constants::{input, tables};
use crate::error::AccidentsError;
use crate::fixtures::{AccidentRow, write_accidents_csv, write_csv_with_header};
use crate::models::TableOutcome;
use crate::processor::PipelineProcessor;
use crate::store::ParquetStore;
use std::fs;
use tempfile::TempDir;

#[tokio::test]
async fn test_missing_input_file() {
    let temp_dir = TempDir::new().unwrap();
    let result = PipelineProcessor::new(
        temp_dir.path().join("absent.csv"),
        temp_dir.path().join("analytics"),
    );
    assert!(matches!(result, Err(AccidentsError::InputNotFound { .. })));
}

#[tokio::test]
async fn test_object_store_uri_is_not_a_local_input() {
    let temp_dir = TempDir::new().unwrap();
    let result = PipelineProcessor::new(
        "s3://accidents/US_Accidents_March23.csv".into(),
        temp_dir.path().join("analytics"),
    );
    assert!(matches!(result, Err(AccidentsError::InputNotFound { .. })));
}

#[tokio::test]
async fn test_missing_columns_fail_before_any_table_is_written() {
    let temp_dir = TempDir::new().unwrap();
    let header: Vec<&str> = input::EXPECTED
        .iter()
        .copied()
        .filter(|h| *h != input::SEVERITY && *h != input::TIMEZONE)
        .collect();
    let path = write_csv_with_header(
        &temp_dir,
        &header,
        &[AccidentRow::new("A-1", "1", "CA", "2020-01-01 00:00:00")],
    );
    let output = temp_dir.path().join("analytics");

    let result = PipelineProcessor::new(path, output.clone())
        .unwrap()
        .with_progress(false)
        .process()
        .await;

    match result {
        Err(AccidentsError::MissingColumns { missing, .. }) => {
            assert_eq!(missing, vec![input::SEVERITY, input::TIMEZONE]);
        }
        other => panic!("expected MissingColumns, got {:?}", other.map(|s| s.tables_written)),
    }
    assert!(ParquetStore::new(&output).list().unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_input_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("empty.csv");
    fs::write(&path, "").unwrap();

    let result = PipelineProcessor::new(path, temp_dir.path().join("analytics"))
        .unwrap()
        .with_progress(false)
        .process()
        .await;
    assert!(matches!(result, Err(AccidentsError::InvalidInput { .. })));
}

#[tokio::test]
async fn test_unknown_table_selection_is_configuration_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_accidents_csv(
        &temp_dir,
        &[AccidentRow::new("A-1", "1", "CA", "2020-01-01 00:00:00")],
    );

    let config = PipelineConfig::default().with_tables(vec!["kde_samples".to_string()]);
    let result = PipelineProcessor::new(path, temp_dir.path().join("analytics"))
        .unwrap()
        .with_config(config)
        .with_progress(false)
        .process()
        .await;
    assert!(matches!(result, Err(AccidentsError::Configuration { .. })));
}

#[tokio::test]
async fn test_failed_table_does_not_block_others() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_accidents_csv(
        &temp_dir,
        &[
            AccidentRow::new("A-1", "2", "WA", "2022-05-01 12:00:00"),
            AccidentRow::new("A-2", "2", "OR", "2022-05-01 13:00:00"),
        ],
    );
    let output = temp_dir.path().join("analytics");

    // A directory squatting on the target path makes that one write fail
    fs::create_dir_all(output.join(format!("{}.parquet", tables::ACCIDENTS_BY_HOUR))).unwrap();

    let stats = PipelineProcessor::new(path, output.clone())
        .unwrap()
        .with_progress(false)
        .process()
        .await
        .unwrap();

    assert_eq!(stats.tables_failed, 1);
    assert_eq!(stats.failed_tables(), vec![tables::ACCIDENTS_BY_HOUR]);
    assert!(matches!(
        stats.outcome(tables::ACCIDENTS_BY_HOUR),
        Some(TableOutcome::Failed { .. })
    ));
    assert!(matches!(
        stats.outcome(tables::STATE_COUNTS),
        Some(TableOutcome::Written { rows: 2, .. })
    ));
    assert!(ParquetStore::new(&output).read(tables::STATE_COUNTS).is_ok());
}

#[tokio::test]
async fn test_all_rows_rejected_still_writes_complete_tables() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_accidents_csv(
        &temp_dir,
        &[
            AccidentRow::new("A-1", "7", "CA", "2020-01-01 00:00:00"),
            AccidentRow::new("A-2", "1", "ZZ", "2020-01-01 00:00:00"),
        ],
    );
    let output = temp_dir.path().join("analytics");

    let stats = PipelineProcessor::new(path, output.clone())
        .unwrap()
        .with_progress(false)
        .process()
        .await
        .unwrap();

    assert_eq!(stats.ingest.rows_kept, 0);
    assert_eq!(stats.tables_failed, 0);

    let store = ParquetStore::new(&output);
    assert_eq!(store.read(tables::SEVERITY_COUNTS).unwrap().height(), 4);
    assert_eq!(store.read(tables::STATE_CHOROPLETH_COUNTS).unwrap().height(), 50);
    assert_eq!(store.read(tables::STATE_COUNTS).unwrap().height(), 0);
}
