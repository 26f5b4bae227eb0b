//! Integration tests for the processor module
//!
//! Runs the complete pipeline over small accidents CSVs written to temp
//! directories.

pub mod error_handling;
