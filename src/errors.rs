use thiserror::Error;

/// Errors that can occur while loading a corpus or its configuration.
///
/// The validator itself never fails: malformed documents simply produce no
/// mentions. Only the I/O-facing layers return these.
#[derive(Error, Debug)]
pub enum LintError {
    #[error("file error: {message} (path: {path})")]
    File { message: String, path: String },

    #[error("pattern error: {message} (pattern: {pattern})")]
    Pattern { message: String, pattern: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results using `LintError`.
pub type Result<T> = std::result::Result<T, LintError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn read_missing() -> Result<std::path::PathBuf> {
        Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"))?
    }

    #[test]
    fn test_io_error_converts_through_question_mark() {
        let err = read_missing().unwrap_err();
        assert!(matches!(err, LintError::Io(_)));
        assert_eq!(err.to_string(), "io error: gone");
    }
}
