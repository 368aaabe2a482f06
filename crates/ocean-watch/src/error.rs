//! Error types for the content catalog.

use std::path::PathBuf;

use crate::content::Listing;

/// Errors that can occur while loading static listings.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// The listing file could not be read.
    #[error("failed to read {listing} listing from {}: {source}", .path.display())]
    Io {
        /// Which listing failed.
        listing: Listing,
        /// Path of the listing file.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The listing is not valid JSON of the expected shape.
    #[error("failed to parse {listing} listing: {source}")]
    Parse {
        /// Which listing failed.
        listing: Listing,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },

    /// An intensity name was not recognised.
    #[error("unknown intensity '{0}', expected low, medium or high")]
    UnknownIntensity(String),
}

impl ContentError {
    /// Message suitable for showing in place of the listing.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io { listing, .. } | Self::Parse { listing, .. } => listing.failure_message(),
            Self::UnknownIntensity(_) => self.to_string(),
        }
    }
}

/// Result type for content operations.
pub type Result<T> = std::result::Result<T, ContentError>;
