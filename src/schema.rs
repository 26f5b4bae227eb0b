//! Input header validation.
//!
//! Reads the header line of the accidents CSV before any data and resolves
//! every expected column to the header actually present in the file. The
//! dataset ships unit-suffixed headers (`Temperature(F)`, `Distance(mi)`);
//! exports that drop the unit suffix (`Temperature`, `Distance`) are
//! accepted as well.

use crate::constants::input;
use crate::error::{AccidentsError, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Expected columns resolved against a concrete file header
#[derive(Debug, Clone)]
pub struct InputSchema {
    path: PathBuf,
    resolved: HashMap<&'static str, String>,
}

impl InputSchema {
    /// Read and validate the header of `path`
    pub fn from_file(path: &Path) -> Result<Self> {
        let headers = read_header(path)?;
        Self::resolve(path, &headers)
    }

    /// Resolve every expected column against `headers`.
    ///
    /// Fails with [`AccidentsError::MissingColumns`] listing every expected
    /// column that matched neither its canonical nor its bare name.
    pub fn resolve(path: &Path, headers: &[String]) -> Result<Self> {
        let mut resolved = HashMap::with_capacity(input::EXPECTED.len());
        let mut missing = Vec::new();

        for &expected in input::EXPECTED {
            let bare = bare_name(expected);
            let found = headers
                .iter()
                .find(|h| h.as_str() == expected)
                .or_else(|| headers.iter().find(|h| h.as_str() == bare));

            match found {
                Some(actual) => {
                    resolved.insert(expected, actual.clone());
                }
                None => missing.push(expected.to_string()),
            }
        }

        if !missing.is_empty() {
            return Err(AccidentsError::MissingColumns {
                path: path.to_path_buf(),
                missing,
            });
        }

        debug!(
            "Resolved {} expected columns in {}",
            resolved.len(),
            path.display()
        );

        Ok(Self {
            path: path.to_path_buf(),
            resolved,
        })
    }

    /// Header name in the file for an expected column
    pub fn column<'a>(&'a self, expected: &str) -> Result<&'a str> {
        self.resolved
            .get(expected)
            .map(String::as_str)
            .ok_or_else(|| AccidentsError::InvalidInput {
                path: self.path.clone(),
                reason: format!("column '{}' is not part of the input schema", expected),
            })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Header name with any parenthesised unit suffix removed
fn bare_name(header: &str) -> &str {
    header
        .split_once('(')
        .map(|(name, _)| name)
        .unwrap_or(header)
        .trim()
}

/// Read the header line of a CSV file as a list of column names
pub fn read_header(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            AccidentsError::InputNotFound {
                path: path.to_path_buf(),
            }
        } else {
            AccidentsError::Io(e)
        }
    })?;

    let mut line = String::new();
    BufReader::new(file).read_line(&mut line)?;

    let line = line.trim_start_matches('\u{feff}').trim_end();
    if line.is_empty() {
        return Err(AccidentsError::InvalidInput {
            path: path.to_path_buf(),
            reason: "file is empty or has no header line".to_string(),
        });
    }

    Ok(line
        .split(',')
        .map(|name| name.trim().trim_matches('"').to_string())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn full_header() -> Vec<String> {
        input::EXPECTED.iter().map(|h| h.to_string()).collect()
    }

    #[test]
    fn test_bare_name() {
        assert_eq!(bare_name("Temperature(F)"), "Temperature");
        assert_eq!(bare_name("Distance(mi)"), "Distance");
        assert_eq!(bare_name("Severity"), "Severity");
    }

    #[test]
    fn test_resolve_full_header() {
        let schema = InputSchema::resolve(Path::new("a.csv"), &full_header()).unwrap();
        assert_eq!(schema.column(input::TEMPERATURE).unwrap(), "Temperature(F)");
        assert_eq!(schema.column(input::STATE).unwrap(), "State");
    }

    #[test]
    fn test_resolve_accepts_bare_names() {
        let headers: Vec<String> = input::EXPECTED
            .iter()
            .map(|h| bare_name(h).to_string())
            .collect();

        let schema = InputSchema::resolve(Path::new("a.csv"), &headers).unwrap();
        assert_eq!(schema.column(input::TEMPERATURE).unwrap(), "Temperature");
        assert_eq!(schema.column(input::DISTANCE).unwrap(), "Distance");
    }

    #[test]
    fn test_missing_columns_are_all_reported() {
        let headers: Vec<String> = full_header()
            .into_iter()
            .filter(|h| h != "Severity" && h != "Weather_Condition")
            .collect();

        match InputSchema::resolve(Path::new("a.csv"), &headers) {
            Err(AccidentsError::MissingColumns { missing, .. }) => {
                assert_eq!(missing, vec!["Severity", "Weather_Condition"]);
            }
            other => panic!("expected MissingColumns, got {:?}", other),
        }
    }

    #[test]
    fn test_read_header() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("header.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "\u{feff}ID,\"Severity\",State").unwrap();
        writeln!(file, "A-1,2,CA").unwrap();

        let headers = read_header(&path).unwrap();
        assert_eq!(headers, vec!["ID", "Severity", "State"]);
    }

    #[test]
    fn test_read_header_empty_and_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.csv");
        File::create(&path).unwrap();

        assert!(matches!(
            read_header(&path),
            Err(AccidentsError::InvalidInput { .. })
        ));
        assert!(matches!(
            read_header(&temp_dir.path().join("absent.csv")),
            Err(AccidentsError::InputNotFound { .. })
        ));
    }
}
