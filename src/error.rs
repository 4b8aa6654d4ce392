use thiserror::Error;

/// Errors surfaced by exports and by loading inputs.
///
/// Drag and edit operations never produce one of these: out-of-range input
/// there is clamped or ignored instead.
#[derive(Error, Debug)]
pub enum CardError {
    #[error("Failed to read image: {0}")]
    Image(String),
    #[error("Failed to rasterize card for {name}: {reason}")]
    Raster { name: String, reason: String },
    #[error("Failed to build archive: {0}")]
    Archive(String),
    #[error("Failed to create PDF: {0}")]
    Pdf(String),
    #[error("Failed to read design: {0}")]
    Design(String),
    #[error("Failed to read roster file: {0}")]
    Roster(String),
    #[error("Style suggestion unavailable: {0}")]
    Suggestion(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<zip::result::ZipError> for CardError {
    fn from(err: zip::result::ZipError) -> Self {
        CardError::Archive(err.to_string())
    }
}
