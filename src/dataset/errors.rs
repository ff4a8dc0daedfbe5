use thiserror::Error;

/// Terminal failure kinds for a dataset request. The display strings are the
/// exact client-facing messages; anything else must be downgraded to
/// `InternalProcessing` before it reaches the response layer.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Only CSV files are supported.")]
    UnsupportedFileType,
    #[error("The requested file was not found in the data directory.")]
    FileNotFound,
    #[error("Invalid CSV structure. Missing required columns: {}", .missing.join(", "))]
    InvalidStructure { missing: Vec<String> },
    #[error("Data integrity error: one or more rows contain invalid values.")]
    DataIntegrity,
    #[error("An internal error occurred while processing the data.")]
    InternalProcessing,
}
