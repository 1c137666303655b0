//! Error types for slot loading, composition, and export.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for combiner operations
pub type Result<T> = std::result::Result<T, CombineError>;

/// Errors that can occur while filling slots or exporting the grid
#[derive(Error, Debug)]
pub enum CombineError {
    /// Export width or height is missing, non-numeric, not positive, or too large
    #[error("Invalid export {field}: '{value}' ({reason})")]
    InvalidDimension {
        field: &'static str,
        value: String,
        reason: &'static str,
    },

    /// Dropped file does not carry a `.png` extension
    #[error("Unsupported file (only .png is accepted): {}", .0.display())]
    UnsupportedFile(PathBuf),

    /// File is named `.png` but its contents could not be decoded
    #[error("Failed to decode image: {}", path.display())]
    DecodeFailure {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Copy requested with no source selected, or the source slot is empty
    #[error("No copy source selected")]
    EmptySlotCopy,

    /// The user dismissed the save dialog
    #[error("Export cancelled")]
    SaveCancelled,

    /// Writing the composite PNG failed
    #[error("Failed to write {}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl CombineError {
    /// Kinds the interactive shell swallows without telling the user.
    pub fn is_silent(&self) -> bool {
        matches!(
            self,
            CombineError::UnsupportedFile(_)
                | CombineError::EmptySlotCopy
                | CombineError::SaveCancelled
        )
    }

    /// Full message including the underlying cause, for dialogs and stderr.
    pub fn detailed(&self) -> String {
        match self {
            CombineError::DecodeFailure { source, .. } | CombineError::Encode { source, .. } => {
                format!("{}: {}", self, source)
            }
            _ => self.to_string(),
        }
    }
}
