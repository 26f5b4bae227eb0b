//! Summary table store: one Parquet file per table under a root directory.
//!
//! Writes go to a temporary file in the same directory and are renamed
//! over `<root>/<name>.parquet`, so a reader sees either the previous
//! version or the new one, never a partial file.

use crate::config::CompressionAlgorithm;
use crate::constants::TABLE_FILE_EXTENSION;
use crate::error::{AccidentsError, Result};
use polars::prelude::{DataFrame, ParquetReader, ParquetWriter, SerReader};
use regex::Regex;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tempfile::NamedTempFile;
use tracing::debug;

static TABLE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_]+$").unwrap_or_else(|e| panic!("invalid table name pattern: {e}"))
});

#[cfg(unix)]
const PUBLISHED_MODE: u32 = 0o644;

/// Parquet-backed store of named summary tables
#[derive(Debug, Clone)]
pub struct ParquetStore {
    root: PathBuf,
    compression: CompressionAlgorithm,
}

impl ParquetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            compression: CompressionAlgorithm::default(),
        }
    }

    pub fn with_compression(mut self, compression: CompressionAlgorithm) -> Self {
        self.compression = compression;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File path backing a table name
    pub fn path_for(&self, name: &str) -> Result<PathBuf> {
        validate_name(name)?;
        Ok(self.root.join(format!("{}.{}", name, TABLE_FILE_EXTENSION)))
    }

    /// Replace the stored table `name` with `table`.
    ///
    /// On failure the previous version, if any, is left untouched.
    pub fn write(&self, name: &str, table: &mut DataFrame) -> Result<PathBuf> {
        let compression = self.compression.to_polars_compression();
        let rows = table.height();

        let path = self.replace_with(name, |file| {
            ParquetWriter::new(file)
                .with_compression(compression)
                .finish(table)
                .map(|_| ())
                .map_err(|e| e.to_string())
        })?;

        debug!("Wrote {} rows to {}", rows, path.display());
        Ok(path)
    }

    /// Stage the new contents of `name` in a temporary file next to the
    /// target and rename it into place once `stage` succeeded.
    ///
    /// If staging fails the temporary file is removed and the published
    /// file is not touched.
    fn replace_with<F>(&self, name: &str, stage: F) -> Result<PathBuf>
    where
        F: FnOnce(&mut File) -> std::result::Result<(), String>,
    {
        let path = self.path_for(name)?;
        let write_error = |reason: String| AccidentsError::StoreWrite {
            name: name.to_string(),
            path: path.clone(),
            reason,
        };

        fs::create_dir_all(&self.root).map_err(|e| write_error(e.to_string()))?;

        let mut staged = NamedTempFile::new_in(&self.root).map_err(|e| write_error(e.to_string()))?;
        stage(staged.as_file_mut()).map_err(|reason| write_error(reason))?;
        staged
            .as_file()
            .sync_all()
            .map_err(|e| write_error(e.to_string()))?;

        // Temp files are created owner-only; published tables are world-readable
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            staged
                .as_file()
                .set_permissions(fs::Permissions::from_mode(PUBLISHED_MODE))
                .map_err(|e| write_error(e.to_string()))?;
        }

        staged
            .persist(&path)
            .map_err(|e| write_error(e.error.to_string()))?;
        Ok(path)
    }

    /// The most recently written version of `name`
    pub fn read(&self, name: &str) -> Result<DataFrame> {
        let path = self.path_for(name)?;
        if !path.exists() {
            return Err(AccidentsError::TableNotFound {
                name: name.to_string(),
            });
        }

        let corrupt = |reason: String| AccidentsError::CorruptTable {
            name: name.to_string(),
            path: path.clone(),
            reason,
        };

        let file = File::open(&path).map_err(|e| corrupt(e.to_string()))?;
        ParquetReader::new(file)
            .finish()
            .map_err(|e| corrupt(e.to_string()))
    }

    /// Sorted names of the tables present
    pub fn list(&self) -> Result<Vec<String>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut names: Vec<String> = fs::read_dir(&self.root)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == TABLE_FILE_EXTENSION))
            .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(str::to_string))
            .filter(|name| TABLE_NAME.is_match(name))
            .collect();

        names.sort();
        Ok(names)
    }
}

fn validate_name(name: &str) -> Result<()> {
    if TABLE_NAME.is_match(name) {
        Ok(())
    } else {
        Err(AccidentsError::InvalidTableName {
            name: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;
    use tempfile::TempDir;

    fn sample_table(rows: i64) -> DataFrame {
        let states: Vec<String> = (0..rows).map(|i| format!("S{}", i)).collect();
        let counts: Vec<i64> = (0..rows).collect();
        DataFrame::new(vec![
            Column::new("state".into(), states),
            Column::new("accident_count".into(), counts),
        ])
        .unwrap()
    }

    #[test]
    fn test_write_then_read_returns_latest() {
        let temp_dir = TempDir::new().unwrap();
        let store = ParquetStore::new(temp_dir.path().join("analytics"));

        store.write("state_counts", &mut sample_table(3)).unwrap();
        let path = store.write("state_counts", &mut sample_table(5)).unwrap();
        assert!(path.ends_with("state_counts.parquet"));

        let table = store.read("state_counts").unwrap();
        assert_eq!(table.height(), 5);
        assert!(table.equals(&sample_table(5)));
    }

    #[test]
    fn test_failed_staging_keeps_previous_version() {
        let temp_dir = TempDir::new().unwrap();
        let store = ParquetStore::new(temp_dir.path());
        store.write("state_counts", &mut sample_table(3)).unwrap();

        let result = store.replace_with("state_counts", |file| {
            use std::io::Write;
            file.write_all(b"PAR1 half a table").map_err(|e| e.to_string())?;
            Err("disk full".to_string())
        });
        match result {
            Err(AccidentsError::StoreWrite { name, reason, .. }) => {
                assert_eq!(name, "state_counts");
                assert_eq!(reason, "disk full");
            }
            other => panic!("expected StoreWrite, got {:?}", other),
        }

        let table = store.read("state_counts").unwrap();
        assert!(table.equals(&sample_table(3)));

        let entries: Vec<String> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(entries, vec!["state_counts.parquet".to_string()]);
    }

    #[cfg(unix)]
    #[test]
    fn test_published_tables_are_world_readable() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let store = ParquetStore::new(temp_dir.path());
        let path = store.write("severity_counts", &mut sample_table(2)).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[test]
    fn test_mixed_case_names_are_valid() {
        let temp_dir = TempDir::new().unwrap();
        let store = ParquetStore::new(temp_dir.path());

        store.write("city_counts_topN", &mut sample_table(2)).unwrap();
        assert_eq!(store.read("city_counts_topN").unwrap().height(), 2);
        assert_eq!(store.list().unwrap(), vec!["city_counts_topN".to_string()]);
    }

    #[test]
    fn test_read_missing_and_corrupt() {
        let temp_dir = TempDir::new().unwrap();
        let store = ParquetStore::new(temp_dir.path());

        let missing = store.read("never_written").unwrap_err();
        assert!(missing.is_not_found());

        fs::write(temp_dir.path().join("broken.parquet"), b"not parquet").unwrap();
        assert!(matches!(
            store.read("broken"),
            Err(AccidentsError::CorruptTable { .. })
        ));
    }

    #[test]
    fn test_rejects_invalid_names() {
        let temp_dir = TempDir::new().unwrap();
        let store = ParquetStore::new(temp_dir.path());

        for name in ["../escape", "state counts", "", "a.b", "top-n"] {
            assert!(matches!(
                store.write(name, &mut sample_table(1)),
                Err(AccidentsError::InvalidTableName { .. })
            ));
        }
    }

    #[test]
    fn test_list_is_sorted_and_ignores_other_files() {
        let temp_dir = TempDir::new().unwrap();
        let store = ParquetStore::new(temp_dir.path()).with_compression(CompressionAlgorithm::Zstd);

        store.write("severity_counts", &mut sample_table(1)).unwrap();
        store.write("accidents_by_year", &mut sample_table(1)).unwrap();
        fs::write(temp_dir.path().join("notes.txt"), b"x").unwrap();

        assert_eq!(
            store.list().unwrap(),
            vec!["accidents_by_year".to_string(), "severity_counts".to_string()]
        );
        assert!(ParquetStore::new(temp_dir.path().join("absent")).list().unwrap().is_empty());
    }
}
