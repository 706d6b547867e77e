//! Keyword-argument validation for plain functions.
//!
//! [`OptFunc`] lets a function taking an [`OptionMap`] be called with only
//! some of the table's attributes, as if each were a keyword parameter with
//! a default. Unknown keywords are rejected, mandatory keywords enforced, and
//! the rest filled from the table's defaults.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::error::ArgumentError;
use crate::table::OptionTable;
use crate::{OptionMap, Value};

/// Arguments of one call through an [`OptFunc`].
///
/// Positional arguments are always rejected; they exist so a caller's
/// mistake is reported rather than silently dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    pub positional: Vec<Value>,
    pub keywords: OptionMap,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keyword(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.keywords.insert(name.to_string(), value.into());
        self
    }

    pub fn positional(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }
}

impl From<OptionMap> for Arguments {
    fn from(keywords: OptionMap) -> Self {
        Self {
            positional: Vec::new(),
            keywords,
        }
    }
}

/// A function wrapped with keyword validation against an option table.
///
/// Created by [`Options::opt_func`](crate::Options::opt_func).
///
/// # Examples
///
/// ```
/// use simopt_core::*;
///
/// let options = Options::new(vec![
///     OptionDecl::new("-o", "output", ValueType::String).mandatory().into(),
///     OptionDecl::new("-n", "count", ValueType::Integer).with_default(3).into(),
/// ])
/// .unwrap();
///
/// let run = options.opt_func("run", |kw: OptionMap| kw["count"].as_int());
/// let count = run.call(Arguments::new().keyword("output", "out.txt")).unwrap();
/// assert_eq!(count, Some(3));
///
/// let err = run.call(Arguments::new().keyword("count", 1)).unwrap_err();
/// assert_eq!(err.to_string(), "run() missing mandatory keyword arguments: output");
/// ```
#[derive(Clone)]
pub struct OptFunc<F> {
    name: String,
    table: Arc<OptionTable>,
    check_mandatory: bool,
    func: F,
}

impl<F> OptFunc<F> {
    /// Wraps `func`, enforcing mandatory keywords.
    pub fn new(name: &str, table: Arc<OptionTable>, func: F) -> Self {
        Self {
            name: name.to_string(),
            table,
            check_mandatory: true,
            func,
        }
    }

    /// Enables or disables the mandatory keyword check.
    pub fn check_mandatory(mut self, check: bool) -> Self {
        self.check_mandatory = check;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Validates `args` and returns the complete keyword map the wrapped
    /// function would receive.
    ///
    /// # Errors
    ///
    /// - [`ArgumentError::Positional`] if any positional argument is given.
    /// - [`ArgumentError::MissingKeywords`] if mandatory keywords are absent
    ///   and the check is enabled.
    /// - [`ArgumentError::UnknownKeywords`] if a keyword is not a declared
    ///   attribute.
    pub fn validate(&self, args: Arguments) -> Result<OptionMap, ArgumentError> {
        if !args.positional.is_empty() {
            return Err(ArgumentError::Positional {
                function: self.name.clone(),
                given: args.positional.len(),
            });
        }

        let supplied: BTreeSet<&str> = args.keywords.keys().map(String::as_str).collect();

        if self.check_mandatory {
            let missing: BTreeSet<String> = self
                .table
                .mandatory_attributes()
                .into_iter()
                .filter(|name| !supplied.contains(name.as_str()))
                .collect();
            if !missing.is_empty() {
                return Err(ArgumentError::MissingKeywords {
                    function: self.name.clone(),
                    names: missing,
                });
            }
        }

        let mut keywords = self.table.defaults();
        let unknown: BTreeSet<String> = supplied
            .iter()
            .filter(|name| !keywords.contains_key(**name))
            .map(|name| name.to_string())
            .collect();
        if !unknown.is_empty() {
            return Err(ArgumentError::UnknownKeywords {
                function: self.name.clone(),
                names: unknown,
            });
        }

        debug!(function = %self.name, supplied = supplied.len(), "Keyword call validated");
        keywords.extend(args.keywords);
        Ok(keywords)
    }

    /// Validates `args` and calls the wrapped function.
    ///
    /// # Errors
    ///
    /// See [`validate`](OptFunc::validate); the function is not called on
    /// error.
    pub fn call<R>(&self, args: Arguments) -> Result<R, ArgumentError>
    where
        F: Fn(OptionMap) -> R,
    {
        let keywords = self.validate(args)?;
        Ok((self.func)(keywords))
    }

    /// Calls with keyword arguments only.
    pub fn call_keywords<R>(&self, keywords: OptionMap) -> Result<R, ArgumentError>
    where
        F: Fn(OptionMap) -> R,
    {
        self.call(Arguments::from(keywords))
    }
}

impl<F> fmt::Debug for OptFunc<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptFunc")
            .field("name", &self.name)
            .field("check_mandatory", &self.check_mandatory)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::{OptionDecl, Options, ValueType};

    fn engine() -> Options {
        Options::new(vec![
            OptionDecl::new("-f", "input", ValueType::String)
                .multi()
                .into(),
            OptionDecl::new("-o", "output", ValueType::String)
                .mandatory()
                .into(),
            OptionDecl::new("-c", "config", ValueType::String)
                .mandatory()
                .into(),
            OptionDecl::new("-n", "count", ValueType::Integer)
                .with_default(2)
                .into(),
            OptionDecl::switch("-v", "verbose").into(),
        ])
        .unwrap()
    }

    #[test]
    fn test_fills_defaults_for_omitted_keywords() {
        let received = RefCell::new(None);
        {
            let func = engine().opt_func("convert", |kw: OptionMap| {
                *received.borrow_mut() = Some(kw);
            });
            func.call(
                Arguments::new()
                    .keyword("output", "out.pdb")
                    .keyword("config", "c.yml"),
            )
            .unwrap();
        }

        let kw = received.into_inner().unwrap();
        assert_eq!(kw["output"], Value::from("out.pdb"));
        assert_eq!(kw["input"], Value::List(vec![]));
        assert_eq!(kw["count"], Value::Int(2));
        assert_eq!(kw["verbose"], Value::Bool(false));
        assert_eq!(kw.len(), 5);
    }

    #[test]
    fn test_rejects_positional() {
        let func = engine().opt_func("convert", |_: OptionMap| ());
        let err = func
            .call(Arguments::new().positional("a").positional(1))
            .unwrap_err();
        assert_eq!(
            err,
            ArgumentError::Positional {
                function: "convert".into(),
                given: 2
            }
        );
    }

    #[test]
    fn test_reports_every_missing_keyword() {
        let func = engine().opt_func("convert", |_: OptionMap| ());
        let err = func.call_keywords(OptionMap::new()).unwrap_err();
        assert_eq!(
            err,
            ArgumentError::MissingKeywords {
                function: "convert".into(),
                names: BTreeSet::from(["config".to_string(), "output".to_string()]),
            }
        );
    }

    #[test]
    fn test_mandatory_check_can_be_disabled() {
        let func = engine()
            .opt_func("convert", |kw: OptionMap| kw["output"].clone())
            .check_mandatory(false);
        assert_eq!(func.call(Arguments::new()).unwrap(), Value::None);
    }

    #[test]
    fn test_rejects_unknown_keywords() {
        let func = engine()
            .opt_func("convert", |_: OptionMap| ())
            .check_mandatory(false);
        let err = func
            .call(Arguments::new().keyword("bogus", 1).keyword("count", 3))
            .unwrap_err();
        assert_eq!(
            err,
            ArgumentError::UnknownKeywords {
                function: "convert".into(),
                names: BTreeSet::from(["bogus".to_string()]),
            }
        );
    }

    #[test]
    fn test_validate_returns_final_keywords() {
        let func = engine().opt_func("convert", |_: OptionMap| ());
        let kw = func
            .validate(
                Arguments::new()
                    .keyword("output", "o")
                    .keyword("config", "c")
                    .keyword("count", 10),
            )
            .unwrap();
        assert_eq!(kw["count"], Value::Int(10));
    }
}
