use thiserror::Error;

/// Unified error type for pdf-workshop-core
///
/// This enum encompasses all error cases that can occur in the library:
/// - Document lookup (unknown or unsafe identifiers)
/// - Page editing (malformed or out-of-range indices)
/// - Upload admission (signature check)
/// - PDF codec operations (loading, saving, page tree rewriting)
/// - External compressor invocation
/// - Configuration and general I/O
#[derive(Error, Debug)]
pub enum Error {
    // ==========================================================================
    // Lookup Errors
    // ==========================================================================
    /// No stored document exists for the identifier
    #[error("PDF file not found for the specified ID: {0}")]
    NotFound(String),

    // ==========================================================================
    // Argument Errors
    // ==========================================================================
    /// Malformed argument (non-integer index, missing parameter, empty path)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Page index outside the current page range
    #[error("invalid page index {index} (document has {total} pages)")]
    InvalidPageIndex { index: i64, total: usize },

    /// Uploaded bytes are not a PDF
    #[error("invalid file format: {0}")]
    InvalidFormat(String),

    // ==========================================================================
    // PDF Errors
    // ==========================================================================
    /// Failed to open or parse a PDF
    #[error("failed to open PDF: {0}")]
    PdfOpen(String),

    /// Failed to serialize a PDF
    #[error("failed to save PDF: {0}")]
    PdfSave(String),

    /// Error from the lopdf library while restructuring a document
    #[error("lopdf error: {0}")]
    Lopdf(String),

    // ==========================================================================
    // Compressor Errors
    // ==========================================================================
    /// The external optimizer could not be run or reported failure
    #[error("compressor failed: {0}")]
    ExternalTool(String),

    /// The external optimizer did not finish in time
    #[error("compressor timed out after {0} seconds")]
    Timeout(u64),

    // ==========================================================================
    // Configuration Errors
    // ==========================================================================
    /// Failed to load configuration file
    #[error("failed to load config: {0}")]
    ConfigLoad(String),

    // ==========================================================================
    // Runtime Errors
    // ==========================================================================
    /// A blocking worker task panicked or was cancelled
    #[error("background task failed: {0}")]
    Task(String),

    /// General I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse failure classes callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidArgument,
    InvalidFormat,
    ExternalToolFailure,
    IoFailure,
}

impl Error {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::InvalidArgument(_) | Self::InvalidPageIndex { .. } => ErrorKind::InvalidArgument,
            Self::InvalidFormat(_) | Self::PdfOpen(_) => ErrorKind::InvalidFormat,
            Self::ExternalTool(_) | Self::Timeout(_) => ErrorKind::ExternalToolFailure,
            Self::PdfSave(_) | Self::Lopdf(_) | Self::ConfigLoad(_) | Self::Task(_) | Self::Io(_) => {
                ErrorKind::IoFailure
            }
        }
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(e: tokio::task::JoinError) -> Self {
        Self::Task(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
