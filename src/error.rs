use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigLibError {
    #[error("invalid index id: {0}")]
    InvalidIndexId(String),

    #[error("failed to read config file at {0}")]
    ConfigRead(Utf8PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("failed to read credentials file at {0}")]
    CredentialsRead(Utf8PathBuf),

    #[error("malformed credentials file: {0}")]
    CredentialsFormat(String),

    #[error("search service request failed: {0}")]
    SearchHttp(String),

    #[error("authentication rejected: {0}")]
    Authentication(String),

    #[error("search index not found: {0}")]
    IndexNotFound(String),

    #[error("search service returned status {status}: {message}")]
    Service { status: u16, message: String },

    #[error("source transfer failed: {0}")]
    Transfer(String),

    #[error("source returned status {status}: {message}")]
    TransferStatus { status: u16, message: String },

    #[error("failed to open workbook: {0}")]
    Workbook(String),

    #[error("sheet not found in workbook: {0}")]
    SheetNotFound(String),

    #[error("required column not found: {0}")]
    MissingColumn(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),
}
