use thiserror::Error;

#[derive(Error, Debug)]
pub enum SplitError {
    #[error("Invalid split plan: {0}")]
    InvalidPlan(String),

    #[error("Unreadable PDF: {0}")]
    UnreadableSource(String),

    #[error("Page count mismatch: PDF has {actual} pages, expected {expected}")]
    PageCountMismatch { actual: u32, expected: u64 },

    #[error("Unsupported name list: {0}")]
    UnsupportedNameListFormat(String),

    #[error("Failed to write PDF: {0}")]
    Serialize(String),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SplitError>;
