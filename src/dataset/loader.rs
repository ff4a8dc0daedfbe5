use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, error};

use crate::dataset::columns::{self, CURRENCY_COLUMN, REQUIRED_COLUMNS};
use crate::dataset::errors::DatasetError;
use crate::models::{DatasetInfo, Transaction};

/// Extension a dataset filename must carry, matched case-insensitively.
const DATASET_EXTENSION: &str = ".csv";

/// Loads and validates dataset files from a fixed data directory.
///
/// Every call reads the file from disk and rebuilds the table; nothing is
/// cached between requests.
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    data_dir: PathBuf,
}

impl DatasetLoader {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Produces the validated table for `filename`, or the first failure the
    /// pipeline detects: extension, existence, parse, structure, null scan,
    /// then per-column coercion.
    ///
    /// # Errors
    /// Returns `DatasetError`:
    /// - `UnsupportedFileType` for filenames without the CSV extension.
    /// - `FileNotFound` when the file is absent from the data directory.
    /// - `InvalidStructure` when required columns are missing.
    /// - `DataIntegrity` for any null cell or any value failing its column
    ///   format.
    /// - `InternalProcessing` for unparseable files and anything otherwise
    ///   unclassified.
    pub fn load(&self, filename: &str) -> Result<Vec<Transaction>, DatasetError> {
        if !filename.to_lowercase().ends_with(DATASET_EXTENSION) {
            return Err(DatasetError::UnsupportedFileType);
        }

        // Filenames join the data directory verbatim; dataset files are
        // externally managed and treated as trusted input.
        let path = self.data_dir.join(filename);
        if !path.exists() {
            return Err(DatasetError::FileNotFound);
        }

        let table = read_raw_table(&path).map_err(|cause| {
            error!("Failed to parse dataset [{filename}]: {cause}");
            DatasetError::InternalProcessing
        })?;

        let resolved = resolve_columns(&table.headers)
            .map_err(|missing| DatasetError::InvalidStructure { missing })?;

        scan_for_nulls(&table)?;
        let transactions = coerce_rows(&table, &resolved, filename)?;

        debug!("Dataset [{filename}] validated with {} rows", transactions.len());

        Ok(transactions)
    }

    /// Enumerates every dataset directly inside the data directory with a
    /// best-effort row count, sorted by descending count. Files that fail to
    /// parse are skipped silently; a missing data directory yields an empty
    /// list rather than an error.
    pub fn list(&self) -> Result<Vec<DatasetInfo>, DatasetError> {
        if !self.data_dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.data_dir).map_err(|cause| {
            error!("Failed to read data directory [{}]: {cause}", self.data_dir.display());
            DatasetError::InternalProcessing
        })?;

        let mut datasets = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|cause| {
                error!("Failed to read data directory entry: {cause}");
                DatasetError::InternalProcessing
            })?;

            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.to_lowercase().ends_with(DATASET_EXTENSION) || !entry.path().is_file() {
                continue;
            }

            match read_raw_table(&entry.path()) {
                Ok(table) => datasets.push(DatasetInfo {
                    name,
                    transactions_count: table.rows.len(),
                }),
                Err(cause) => debug!("Skipping unreadable dataset [{name}]: {cause}"),
            }
        }

        datasets.sort_by(|a, b| b.transactions_count.cmp(&a.transactions_count));

        Ok(datasets)
    }
}

struct RawTable {
    headers: Vec<String>,
    rows: Vec<StringRecord>,
}

/// Positions of the schema columns within a dataset's header row.
struct ResolvedColumns {
    id: usize,
    date: usize,
    description: usize,
    amount: usize,
    category: usize,
    source: usize,
    currency: Option<usize>,
}

fn read_raw_table(path: &Path) -> anyhow::Result<RawTable> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;

    // Rows shorter than the header are tolerated here and surface as nulls
    // during validation; rows longer than the header are a parse failure.
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_reader(BufReader::new(file));

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.is_empty() {
        bail!("file has no header row");
    }

    let mut rows = Vec::new();

    for (index, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("decoding record {}", index + 1))?;

        if row.len() > headers.len() {
            bail!(
                "record {} has {} fields but the header declares {}",
                index + 1,
                row.len(),
                headers.len()
            );
        }

        rows.push(row);
    }

    Ok(RawTable { headers, rows })
}

fn resolve_columns(headers: &[String]) -> Result<ResolvedColumns, Vec<String>> {
    let position = |name: &str| headers.iter().position(|header| header == name);

    match (
        position("id"),
        position("date"),
        position("description"),
        position("amount"),
        position("category"),
        position("source"),
    ) {
        (Some(id), Some(date), Some(description), Some(amount), Some(category), Some(source)) => {
            Ok(ResolvedColumns {
                id,
                date,
                description,
                amount,
                category,
                source,
                currency: position(CURRENCY_COLUMN),
            })
        }
        _ => Err(REQUIRED_COLUMNS
            .iter()
            .filter(|name| position(name).is_none())
            .map(|name| name.to_string())
            .collect()),
    }
}

/// A null is an empty cell or a missing trailing field. One null anywhere in
/// the table, schema column or not, fails the whole load.
fn scan_for_nulls(table: &RawTable) -> Result<(), DatasetError> {
    for row in &table.rows {
        for column in 0..table.headers.len() {
            if row.get(column).is_none_or(str::is_empty) {
                return Err(DatasetError::DataIntegrity);
            }
        }
    }

    Ok(())
}

/// Column-ordered coercion: every id, then every date, then every amount,
/// so integrity failures in required columns surface before the currency
/// column is even resolved. Free-text columns coerce unconditionally.
fn coerce_rows(
    table: &RawTable,
    resolved: &ResolvedColumns,
    filename: &str,
) -> Result<Vec<Transaction>, DatasetError> {
    for row in &table.rows {
        columns::parse_id(cell(row, resolved.id)).ok_or(DatasetError::DataIntegrity)?;
    }

    for row in &table.rows {
        columns::parse_date(cell(row, resolved.date)).ok_or(DatasetError::DataIntegrity)?;
    }

    for row in &table.rows {
        columns::parse_amount(cell(row, resolved.amount)).ok_or(DatasetError::DataIntegrity)?;
    }

    let Some(currency) = resolved.currency else {
        error!("Dataset [{filename}] has no `{CURRENCY_COLUMN}` column");
        return Err(DatasetError::InternalProcessing);
    };

    for row in &table.rows {
        columns::parse_currency(cell(row, currency)).ok_or(DatasetError::DataIntegrity)?;
    }

    table
        .rows
        .iter()
        .map(|row| build_row(row, resolved, currency))
        .collect()
}

fn build_row(
    row: &StringRecord,
    resolved: &ResolvedColumns,
    currency: usize,
) -> Result<Transaction, DatasetError> {
    Ok(Transaction {
        id: columns::parse_id(cell(row, resolved.id))
            .ok_or(DatasetError::DataIntegrity)?
            .to_string(),
        date: columns::parse_date(cell(row, resolved.date)).ok_or(DatasetError::DataIntegrity)?,
        description: cell(row, resolved.description).to_string(),
        category: cell(row, resolved.category).to_string(),
        source: cell(row, resolved.source).to_string(),
        amount: columns::parse_amount(cell(row, resolved.amount))
            .ok_or(DatasetError::DataIntegrity)?,
        currency: columns::parse_currency(cell(row, currency))
            .ok_or(DatasetError::DataIntegrity)?
            .to_string(),
    })
}

fn cell(row: &StringRecord, column: usize) -> &str {
    row.get(column).unwrap_or_default()
}
