//! Error types for the dish list.
//!
//! Two error families live here. [`ProviderError`] describes a failed search
//! provider call; the list controller recovers from it locally and only ever
//! reports it. [`DishlistError`] covers everything around the controller:
//! configuration, catalog loading and command line parsing.

use thiserror::Error;

/// A search provider call that did not produce a page of results.
///
/// The controller never propagates this past its boundary. It clears the
/// loading flags, restores the pre-fetch cursor and surfaces the error as a
/// non-fatal report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The provider did not settle within its deadline.
    #[error("search timed out after {after_ms}ms")]
    Timeout {
        /// Deadline that elapsed, in milliseconds.
        after_ms: u64,
    },

    /// The request could not be delivered or the connection dropped.
    #[error("transport error: {0}")]
    Transport(String),

    /// A response arrived but could not be decoded into dishes.
    #[error("malformed response: {0}")]
    Decode(String),

    /// The provider refused the request (for example page 0).
    #[error("request rejected: {0}")]
    Rejected(String),
}

/// The main error type for configuration, catalog and CLI operations.
///
/// # Examples
///
/// ```
/// use dishlist::DishlistError;
///
/// fn validate_page_size(size: usize) -> Result<(), DishlistError> {
///     if size == 0 {
///         return Err(DishlistError::Config("page_size must be positive".to_string()));
///     }
///     Ok(())
/// }
///
/// assert!(validate_page_size(0).is_err());
/// ```
#[derive(Debug, Error)]
pub enum DishlistError {
    /// Configuration is invalid or could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The dish catalog file exists but is not a valid catalog.
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// A filter value given as text does not name a known variant.
    #[error("unknown {kind} '{value}'")]
    UnknownValue {
        /// Which filter the value was meant for (`canteen`, `flavor`).
        kind: &'static str,
        /// The rejected input.
        value: String,
    },

    /// A provider failure surfaced outside the controller (CLI runs).
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// A specialized `Result` type for dish list operations.
pub type Result<T> = std::result::Result<T, DishlistError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_messages() {
        assert_eq!(
            ProviderError::Timeout { after_ms: 250 }.to_string(),
            "search timed out after 250ms"
        );
        assert_eq!(
            ProviderError::Transport("connection reset".into()).to_string(),
            "transport error: connection reset"
        );
    }

    #[test]
    fn test_provider_error_converts_transparently() {
        let err: DishlistError = ProviderError::Decode("missing id".into()).into();
        assert_eq!(err.to_string(), "malformed response: missing id");
    }

    #[test]
    fn test_unknown_value_message() {
        let err = DishlistError::UnknownValue {
            kind: "canteen",
            value: "Nowhere".into(),
        };
        assert_eq!(err.to_string(), "unknown canteen 'Nowhere'");
    }
}
