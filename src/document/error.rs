//! Error types for document operations.

use std::path::PathBuf;

use thiserror::Error;

use crate::base::Position;

/// A failure to derive the tree from the text.
///
/// Clonable because the document keeps the most recent parse failure
/// for later inspection (a view showing a validation message) in
/// addition to returning it to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The text is not well-formed XML.
    #[error("malformed XML at {position}: {message}")]
    MalformedXml { message: String, position: Position },

    /// Well-formed, but the root element is not the required one.
    #[error("invalid root element: {message}")]
    InvalidRootElement { message: String },
}

impl ParseError {
    /// Create a malformed-XML error.
    pub fn malformed(message: impl Into<String>, position: Position) -> Self {
        Self::MalformedXml {
            message: message.into(),
            position,
        }
    }

    /// Create an invalid-root-element error.
    pub fn invalid_root(message: impl Into<String>) -> Self {
        Self::InvalidRootElement {
            message: message.into(),
        }
    }

    /// The failure location, when the parser knows one.
    ///
    /// Structural failures (wrong root element) have none.
    pub fn position(&self) -> Option<Position> {
        match self {
            Self::MalformedXml { position, .. } => Some(*position),
            Self::InvalidRootElement { .. } => None,
        }
    }
}

/// Errors from document operations.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The text could not be parsed into a tree.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Storage read or write failure, cause preserved.
    #[error("{}: {source}", path.display())]
    FileIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DocumentError {
    /// Wrap a storage failure with the path it occurred on.
    pub fn file_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileIo {
            path: path.into(),
            source,
        }
    }
}
