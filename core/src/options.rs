//! The options engine.
//!
//! [`Options`] owns a compiled [`OptionTable`] and turns token lists into
//! [`OptionMap`]s. Each parse works on its own copy of the defaults, so one
//! engine can serve any number of parses, from any number of threads.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::error::{ParseError, UsageError, UsageErrorKind};
use crate::table::{OptionRecord, OptionTable};
use crate::validate::{HELP_FLAGS, TableError};
use crate::{Declaration, OptFunc, OptionMap, Value};

/// Option parser driven by a declaration table.
///
/// # Examples
///
/// ```
/// use simopt_core::*;
///
/// let options = Options::new(vec![
///     OptionDecl::new("-f", "input", ValueType::String).multi().into(),
///     OptionDecl::new("-o", "output", ValueType::String).mandatory().into(),
/// ])
/// .unwrap();
///
/// let parsed = options.parse(&["-f", "a.txt", "-f", "b.txt", "-o", "out.txt"]).unwrap();
/// assert_eq!(parsed["input"], Value::List(vec!["a.txt".into(), "b.txt".into()]));
/// assert_eq!(parsed["output"], Value::from("out.txt"));
///
/// let err = options.parse(&["-f", "a.txt"]).unwrap_err();
/// assert!(matches!(err, ParseError::MissingMandatory(missing) if missing.contains("-o")));
/// ```
#[derive(Debug, Clone)]
pub struct Options {
    table: Arc<OptionTable>,
    program: Option<String>,
    args: Option<Vec<String>>,
    attributes: OptionMap,
}

impl Options {
    /// Compiles `declarations` into a new engine.
    ///
    /// # Errors
    ///
    /// Returns a [`TableError`] if the declarations are malformed.
    pub fn new<I>(declarations: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = Declaration>,
    {
        let table = OptionTable::compile(declarations)?;
        Ok(Self::from_table(Arc::new(table)))
    }

    /// Creates an engine over an already compiled table.
    pub fn from_table(table: Arc<OptionTable>) -> Self {
        let attributes = table
            .records()
            .map(|r| (r.attribute.clone(), r.initial_value()))
            .collect();
        Self {
            table,
            program: None,
            args: None,
            attributes,
        }
    }

    /// Sets the program name used in usage errors and help output.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = Some(program.into());
        self
    }

    /// Parses `args` right away and keeps them for [`Display`](std::fmt::Display).
    ///
    /// The parsed values replace the instance attributes. An empty token
    /// list is stored but not parsed.
    ///
    /// # Errors
    ///
    /// Any [`ParseError`] raised by [`parse`](Options::parse).
    pub fn with_args<S: AsRef<str>>(mut self, args: &[S]) -> Result<Self, ParseError> {
        if !args.is_empty() {
            let parsed = self.parse(args)?;
            self.attributes.extend(parsed);
        }
        self.args = Some(args.iter().map(|a| a.as_ref().to_string()).collect());
        Ok(self)
    }

    pub fn table(&self) -> &OptionTable {
        &self.table
    }

    pub fn program(&self) -> Option<&str> {
        self.program.as_deref()
    }

    /// Tokens given to [`with_args`](Options::with_args), if any.
    pub fn args(&self) -> Option<&[String]> {
        self.args.as_deref()
    }

    /// Current attribute values of this instance.
    pub fn attributes(&self) -> &OptionMap {
        &self.attributes
    }

    pub fn get(&self, attribute: &str) -> Option<&Value> {
        self.attributes.get(attribute)
    }

    /// Default value of every attribute.
    pub fn defaults(&self) -> OptionMap {
        self.table.defaults()
    }

    /// Flag tokens of mandatory options.
    pub fn mandatory_arguments(&self) -> BTreeSet<String> {
        self.table.mandatory_flags()
    }

    /// Attribute names of mandatory options.
    pub fn mandatory_keys(&self) -> BTreeSet<String> {
        self.table.mandatory_attributes()
    }

    /// Parses command-line tokens.
    ///
    /// # Errors
    ///
    /// - [`ParseError::HelpRequested`] on `-h` or `--help`.
    /// - [`ParseError::Usage`] on an unknown flag, too few arguments, or an
    ///   argument the value type rejects.
    /// - [`ParseError::MissingMandatory`] listing every mandatory flag that
    ///   did not appear.
    pub fn parse<S: AsRef<str>>(&self, tokens: &[S]) -> Result<OptionMap, ParseError> {
        self.parse_tokens(tokens, false)
    }

    /// Parses like [`parse`](Options::parse), but skips help tokens and
    /// does not check mandatory options.
    pub fn parse_ignoring_help<S: AsRef<str>>(
        &self,
        tokens: &[S],
    ) -> Result<OptionMap, ParseError> {
        self.parse_tokens(tokens, true)
    }

    /// Wraps `func` so keyword calls are validated against this table.
    pub fn opt_func<F>(&self, name: &str, func: F) -> OptFunc<F> {
        OptFunc::new(name, Arc::clone(&self.table), func)
    }

    fn parse_tokens<S: AsRef<str>>(
        &self,
        tokens: &[S],
        ignore_help: bool,
    ) -> Result<OptionMap, ParseError> {
        let mut options = self.table.defaults();
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        let mut remaining = tokens.iter().map(|token| token.as_ref());

        debug!(tokens = tokens.len(), ignore_help, "Parsing options");

        while let Some(token) = remaining.next() {
            if HELP_FLAGS.contains(&token) {
                if ignore_help {
                    trace!(token, "Skipping help flag");
                    continue;
                }
                return Err(ParseError::HelpRequested);
            }

            let Some(record) = self.table.get(token) else {
                return Err(
                    self.usage_error(UsageErrorKind::UnrecognizedOption(token.to_string()))
                );
            };
            seen.insert(record.flag.as_str());

            if record.arity > remaining.len() {
                return Err(self.usage_error(UsageErrorKind::MissingArguments {
                    flag: record.flag.clone(),
                    required: record.arity,
                }));
            }

            let value = if record.arity == 0 {
                // Presence of a non-bool switch is recorded as a 1-tuple.
                Value::Tuple(vec![Value::Bool(true)])
            } else {
                // A single token is consumed and converted once per unit of
                // arity.
                let Some(raw) = remaining.next() else {
                    return Err(self.usage_error(UsageErrorKind::MissingArguments {
                        flag: record.flag.clone(),
                        required: record.arity,
                    }));
                };
                self.convert(record, raw)?
            };

            trace!(flag = %record.flag, attribute = %record.attribute, %value, "Matched option");
            assign(&mut options, record, value);
        }

        if !ignore_help {
            let missing: BTreeSet<String> = self
                .table
                .mandatory_flags()
                .into_iter()
                .filter(|flag| !seen.contains(flag.as_str()))
                .collect();
            if !missing.is_empty() {
                debug!(missing = ?missing, "Mandatory options not given");
                return Err(ParseError::MissingMandatory(missing));
            }
        }

        Ok(options)
    }

    fn convert(&self, record: &OptionRecord, raw: &str) -> Result<Value, ParseError> {
        let mut converted = (0..record.arity)
            .map(|_| record.value_type.convert(raw))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|reason| {
                self.usage_error(UsageErrorKind::InvalidArgument {
                    flag: record.flag.clone(),
                    value: raw.to_string(),
                    reason,
                })
            })?;

        if converted.len() == 1 {
            Ok(converted.pop().unwrap_or_default())
        } else {
            Ok(Value::Tuple(converted))
        }
    }

    fn usage_error(&self, kind: UsageErrorKind) -> ParseError {
        ParseError::Usage(UsageError {
            program: self.program.clone(),
            kind,
        })
    }
}

fn assign(options: &mut OptionMap, record: &OptionRecord, value: Value) {
    if record.value_type.is_bool() {
        options.insert(record.attribute.clone(), Value::Bool(true));
    } else if record.behavior.multi {
        options
            .entry(record.attribute.clone())
            .or_insert_with(|| Value::List(Vec::new()))
            .append_occurrence(value);
    } else {
        options.insert(record.attribute.clone(), value);
    }
}
