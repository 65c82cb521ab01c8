//! Crate error type.

use std::fmt;

/// Errors raised while loading an instance, validating parameters, or
/// auditing a solution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimetableError {
    /// The instance text could not be parsed.
    Parse {
        /// 1-based line number of the offending line (0 when not line-bound).
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// The instance is structurally inconsistent (unknown ids, duplicates, ...).
    InvalidModel(String),

    /// Annealing parameters failed validation.
    InvalidParams(String),

    /// Annealing was asked to start from an incomplete or hard-infeasible
    /// solution.
    InfeasibleStart(String),

    /// A solution index disagrees with the assignment table.
    Invariant(String),

    /// Reading the instance file failed.
    Io(String),
}

impl TimetableError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        TimetableError::Parse {
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for TimetableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimetableError::Parse { line, message } => {
                write!(f, "parse error at line {line}: {message}")
            }
            TimetableError::InvalidModel(msg) => write!(f, "invalid model: {msg}"),
            TimetableError::InvalidParams(msg) => write!(f, "invalid annealing parameters: {msg}"),
            TimetableError::InfeasibleStart(msg) => {
                write!(f, "annealing needs a hard-feasible start: {msg}")
            }
            TimetableError::Invariant(msg) => write!(f, "solution invariant violated: {msg}"),
            TimetableError::Io(msg) => write!(f, "i/o error: {msg}"),
        }
    }
}

impl std::error::Error for TimetableError {}

impl From<std::io::Error> for TimetableError {
    fn from(err: std::io::Error) -> Self {
        TimetableError::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_parse_error() {
        let err = TimetableError::parse(12, "expected 5 fields");
        assert_eq!(err.to_string(), "parse error at line 12: expected 5 fields");
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.ctt");
        let err: TimetableError = io.into();
        assert!(matches!(err, TimetableError::Io(ref m) if m.contains("missing.ctt")));
    }
}
