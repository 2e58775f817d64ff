use thiserror::Error;

/// Errors produced while compiling attachment patterns
#[derive(Debug, Error)]
pub enum PatternError {
    /// Empty pattern is invalid
    #[error("Empty attachment pattern provided")]
    InvalidEmpty,
    /// Glob failed to parse
    #[error("Invalid glob pattern '{pattern}': {reason}")]
    InvalidGlob { pattern: String, reason: String },
    /// No patterns were configured at all
    #[error("No attachment patterns configured")]
    NoPatterns,
}

impl PatternError {
    #[must_use]
    pub fn glob_parse(pattern: &str, reason: &str) -> Self {
        Self::InvalidGlob {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glob_parse_display() {
        let err = PatternError::glob_parse("[a", "unclosed bracket");
        assert_eq!(
            err.to_string(),
            "Invalid glob pattern '[a': unclosed bracket"
        );
    }

    #[test]
    fn test_no_patterns_display() {
        assert_eq!(
            PatternError::NoPatterns.to_string(),
            "No attachment patterns configured"
        );
    }
}
