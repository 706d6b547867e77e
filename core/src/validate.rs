//! Option table validation.
//!
//! Checks structural invariants of a declaration list before it is compiled,
//! catching duplicate flags, malformed flag tokens, reserved help flags and
//! empty attribute names.
//!
//! # Examples
//!
//! ```
//! use simopt_core::*;
//!
//! let table = vec![
//!     Declaration::from(OptionDecl::new("-f", "input", ValueType::String)),
//!     Declaration::from(OptionDecl::new("-f", "other", ValueType::String)),
//! ];
//! assert_eq!(
//!     validate_declarations(&table),
//!     vec![TableError::DuplicateFlag("-f".to_string())]
//! );
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::{Declaration, OptionDecl, ValueType};

/// Tokens reserved for the help signal.
pub const HELP_FLAGS: [&str; 2] = ["--help", "-h"];

/// Option table configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// Two declarations share the same flag token.
    #[error("duplicate flag in option table: {0}")]
    DuplicateFlag(String),
    /// Flag token does not start with a dash or has nothing after the dashes.
    #[error("invalid flag format: {0:?}")]
    InvalidFlag(String),
    /// `-h` and `--help` cannot be declared.
    #[error("flag is reserved for help: {0}")]
    ReservedFlag(String),
    /// Attribute name is empty or whitespace-only.
    #[error("option {0} has an empty attribute name")]
    EmptyAttribute(String),
    /// A choice type lists no choices.
    #[error("option {0} declares a choice type without choices")]
    EmptyChoices(String),
}

/// Validates a declaration list, returning every problem found.
pub fn validate_declarations(declarations: &[Declaration]) -> Vec<TableError> {
    let mut errors = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for decl in declarations.iter().filter_map(Declaration::as_option) {
        let flag = decl.flag.as_str();

        if let Some(err) = check_flag(flag) {
            errors.push(err);
        } else if !seen.insert(flag) {
            errors.push(TableError::DuplicateFlag(flag.to_string()));
        }

        errors.extend(check_option(decl));
    }

    errors
}

fn check_flag(flag: &str) -> Option<TableError> {
    if HELP_FLAGS.contains(&flag) {
        return Some(TableError::ReservedFlag(flag.to_string()));
    }
    if !flag.starts_with('-') || flag.trim_start_matches('-').is_empty() {
        return Some(TableError::InvalidFlag(flag.to_string()));
    }
    if flag.chars().any(char::is_whitespace) {
        return Some(TableError::InvalidFlag(flag.to_string()));
    }
    None
}

fn check_option(decl: &OptionDecl) -> Vec<TableError> {
    let mut errors = Vec::new();
    if decl.attribute.trim().is_empty() {
        errors.push(TableError::EmptyAttribute(decl.flag.clone()));
    }
    if let ValueType::Choice(choices) = &decl.value_type {
        if choices.is_empty() {
            errors.push(TableError::EmptyChoices(decl.flag.clone()));
        }
    }
    errors
}
