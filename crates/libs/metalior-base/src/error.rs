//! Error type for metalior.

use std::{
    error::Error,
    fmt::{Debug, Display, Formatter},
};

/// Custom error type for metalior.
///
/// Carries a human readable message together with the underlying cause, if
/// any. Lower level errors are kept as the source so that callers can still
/// inspect them.
#[derive(Debug)]
pub struct MetaliorError {
    message: String,
    source: Option<Box<dyn Error + Send + Sync>>,
}

impl Display for MetaliorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.source {
            Some(cause) => write!(f, "Error: {}, caused by {}", self.message, cause),
            None => write!(f, "Error: {}", self.message),
        }
    }
}

impl Error for MetaliorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_ref()
            .map(|err| err.as_ref() as &(dyn Error + 'static))
    }
}

impl MetaliorError {
    /// Creates a new MetaliorError.
    pub fn new<S>(message: S, source: Option<Box<dyn Error + Send + Sync>>) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            source,
        }
    }

    /// Creates a new MetaliorError from a std::io::Error.
    pub fn from_io_error<S>(err: std::io::Error, message: S) -> Self
    where
        S: Into<String>,
    {
        Self::new(message, Some(Box::new(err)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = MetaliorError::from_io_error(io, "Failed to read presets");
        assert_eq!(
            err.to_string(),
            "Error: Failed to read presets, caused by no such file"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn display_without_cause() {
        let err = MetaliorError::new("Invalid output directory", None);
        assert_eq!(err.to_string(), "Error: Invalid output directory");
        assert!(err.source().is_none());
    }
}
