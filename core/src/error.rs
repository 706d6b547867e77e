//! Error types for parsing and keyword validation.
//!
//! [`ParseError`] covers the token-parsing path, including the
//! [`HelpRequested`](ParseError::HelpRequested) control signal.
//! [`ArgumentError`] is raised only by [`OptFunc`](crate::OptFunc).
//! [`Error`] unifies them with [`TableError`] for callers that do not care
//! which stage failed.

use std::collections::BTreeSet;
use std::fmt;

use thiserror::Error;

use crate::validate::TableError;

fn join(names: &BTreeSet<String>) -> String {
    names.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

/// What was wrong with an invocation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageErrorKind {
    /// Token is not a declared flag.
    #[error("Unrecognized option '{0}'")]
    UnrecognizedOption(String),
    /// Too few tokens follow the flag.
    #[error("Option '{flag}' requires {required} arguments")]
    MissingArguments { flag: String, required: usize },
    /// The option's value type rejected the token.
    #[error("Invalid argument to option '{flag}': '{value}' ({reason})")]
    InvalidArgument {
        flag: String,
        value: String,
        reason: String,
    },
}

/// Malformed invocation, rendered with the program name when one is known.
///
/// # Examples
///
/// ```
/// use simopt_core::{UsageError, UsageErrorKind};
///
/// let err = UsageError {
///     program: Some("tool".into()),
///     kind: UsageErrorKind::UnrecognizedOption("--bogus".into()),
/// };
/// assert_eq!(
///     err.to_string(),
///     "tool: Unrecognized option '--bogus'\nTry 'tool --help' for more information."
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageError {
    pub program: Option<String>,
    pub kind: UsageErrorKind,
}

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.program {
            Some(program) => write!(
                f,
                "{program}: {}\nTry '{program} --help' for more information.",
                self.kind
            ),
            None => write!(f, "Failed to parse options: {}", self.kind),
        }
    }
}

impl std::error::Error for UsageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

/// Outcome of a failed parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// `-h` or `--help` was given; the caller should print help.
    #[error("help requested")]
    HelpRequested,
    #[error(transparent)]
    Usage(#[from] UsageError),
    /// Every mandatory flag that never appeared.
    #[error("missing mandatory options: {}", join(.0))]
    MissingMandatory(BTreeSet<String>),
}

impl ParseError {
    pub fn is_help(&self) -> bool {
        matches!(self, ParseError::HelpRequested)
    }
}

/// Keyword call rejected by [`OptFunc`](crate::OptFunc).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    #[error("{function}() takes no positional arguments ({given} given)")]
    Positional { function: String, given: usize },
    #[error("{function}() missing mandatory keyword arguments: {}", join(.names))]
    MissingKeywords {
        function: String,
        names: BTreeSet<String>,
    },
    #[error("{function}() got unexpected keyword arguments: {}", join(.names))]
    UnknownKeywords {
        function: String,
        names: BTreeSet<String>,
    },
}

/// Any error raised by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Table(#[from] TableError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Argument(#[from] ArgumentError),
}

/// Convenience alias for results with [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_without_program() {
        let err = UsageError {
            program: None,
            kind: UsageErrorKind::MissingArguments {
                flag: "-f".into(),
                required: 1,
            },
        };
        assert_eq!(
            err.to_string(),
            "Failed to parse options: Option '-f' requires 1 arguments"
        );
    }

    #[test]
    fn test_missing_mandatory_lists_all() {
        let err = ParseError::MissingMandatory(BTreeSet::from(["-o".into(), "-c".into()]));
        assert_eq!(err.to_string(), "missing mandatory options: -c, -o");
    }

    #[test]
    fn test_argument_error_messages() {
        let err = ArgumentError::UnknownKeywords {
            function: "run".into(),
            names: BTreeSet::from(["bogus".into()]),
        };
        assert_eq!(err.to_string(), "run() got unexpected keyword arguments: bogus");

        let err = ArgumentError::Positional {
            function: "run".into(),
            given: 2,
        };
        assert_eq!(
            err.to_string(),
            "run() takes no positional arguments (2 given)"
        );
    }

    #[test]
    fn test_umbrella_conversion() {
        let err: Error = ParseError::HelpRequested.into();
        assert_eq!(err.to_string(), "help requested");
    }
}
