// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::path::Path;

use anyhow::Result;
use tally::application::TrackerService;
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(TrackerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = TrackerService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Place an upload file with the given contents under `dir`.
pub fn write_upload(dir: &Path, file_name: &str, contents: &str) -> Result<()> {
    std::fs::write(dir.join(file_name), contents)?;
    Ok(())
}
