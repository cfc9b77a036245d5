use std::fs;
use std::io::Read;
use std::path::PathBuf;

use csv::{ReaderBuilder, Trim};
use tracing::debug;

use crate::application::{AppError, TrackerService};
use crate::domain::{Transaction, TransactionDraft, TransactionKind, parse_cents};

/// Importer for bulk-loading transactions from uploaded CSV files.
///
/// Files are resolved by name under the upload directory, fully parsed
/// before any database interaction, and deleted only after every write has
/// succeeded, so a failed import leaves the file in place for retry.
pub struct Importer<'a> {
    service: &'a TrackerService,
    upload_dir: PathBuf,
}

impl<'a> Importer<'a> {
    pub fn new(service: &'a TrackerService, upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            service,
            upload_dir: upload_dir.into(),
        }
    }

    /// Import every transaction found in `upload_dir/file_name`.
    /// Returns the persisted transactions in file order.
    pub async fn import(&self, file_name: &str) -> Result<Vec<Transaction>, AppError> {
        let path = self.upload_dir.join(file_name);

        let file = fs::File::open(&path)?;
        let drafts = parse_transactions_csv(file)?;
        debug!(file = %path.display(), rows = drafts.len(), "parsed import file");

        let transactions = self.service.import_drafts(drafts).await?;

        fs::remove_file(&path)?;
        Ok(transactions)
    }
}

/// Parse transactions from CSV data.
///
/// The first line is a header and is skipped; every field is trimmed on
/// both sides. Four positional columns per row: title, type, value,
/// category. A malformed row fails the whole parse with its 1-based line
/// number, so a bad file never produces a partial batch.
pub fn parse_transactions_csv<R: Read>(reader: R) -> Result<Vec<TransactionDraft>, AppError> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

    let mut drafts = Vec::new();
    for (index, result) in csv_reader.records().enumerate() {
        let line = index + 2; // +2 for header and 0-indexing
        let row_error = |reason: String| AppError::InvalidCsvRow { line, reason };

        let record = result.map_err(|e| row_error(format!("CSV parse error: {e}")))?;

        let title = record
            .get(0)
            .ok_or_else(|| row_error("missing column: title".to_string()))?;
        let kind_str = record
            .get(1)
            .ok_or_else(|| row_error("missing column: type".to_string()))?;
        let value_str = record
            .get(2)
            .ok_or_else(|| row_error("missing column: value".to_string()))?;
        let category_title = record
            .get(3)
            .ok_or_else(|| row_error("missing column: category".to_string()))?;

        let kind = kind_str
            .parse::<TransactionKind>()
            .map_err(|e| row_error(e.to_string()))?;
        let value_cents = parse_cents(value_str).map_err(|e| row_error(e.to_string()))?;
        if value_cents <= 0 {
            return Err(row_error(format!(
                "value must be positive, got {value_str:?}"
            )));
        }

        drafts.push(TransactionDraft {
            title: title.to_string(),
            kind,
            value_cents,
            category_title: category_title.to_string(),
        });
    }

    Ok(drafts)
}
