//! Option table compilation.
//!
//! [`OptionTable::compile`] turns a declaration list into a lookup table
//! keyed by flag token. Section labels are kept for help rendering but never
//! consulted while parsing.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::validate::{TableError, validate_declarations};
use crate::{Behavior, Declaration, OptionMap, Value, ValueType};

/// Compiled form of one option declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionRecord {
    pub flag: String,
    pub attribute: String,
    pub value_type: ValueType,
    pub arity: usize,
    pub default: Value,
    pub behavior: Behavior,
    pub description: String,
    /// Effective user level (explicit or [`DEFAULT_LEVEL`](crate::DEFAULT_LEVEL)).
    pub level: u32,
}

impl OptionRecord {
    /// Default reported for this option: an empty list for a multi option
    /// without a default, the literal default otherwise.
    pub fn default_value(&self) -> Value {
        if self.behavior.multi && self.default.is_none() {
            Value::List(Vec::new())
        } else {
            self.default.clone()
        }
    }

    /// Value the attribute starts with on a fresh [`Options`](crate::Options).
    ///
    /// Multi options always start as a list; a scalar default becomes its
    /// only element.
    pub fn initial_value(&self) -> Value {
        if !self.behavior.multi {
            return self.default.clone();
        }
        match &self.default {
            Value::None => Value::List(Vec::new()),
            Value::List(items) => Value::List(items.clone()),
            other => Value::List(vec![other.clone()]),
        }
    }
}

/// Immutable option table compiled from declarations.
///
/// # Examples
///
/// ```
/// use simopt_core::*;
///
/// let table = OptionTable::compile(vec![
///     Declaration::section("Files:"),
///     OptionDecl::new("-f", "input", ValueType::String).multi().into(),
///     OptionDecl::new("-o", "output", ValueType::String).mandatory().into(),
/// ])
/// .unwrap();
///
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.get("-f").unwrap().attribute, "input");
/// assert!(table.get("Files:").is_none());
/// assert_eq!(table.defaults()["input"], Value::List(vec![]));
/// ```
#[derive(Debug, Clone, Default)]
pub struct OptionTable {
    declarations: Vec<Declaration>,
    records: Vec<OptionRecord>,
    index: HashMap<String, usize>,
}

impl OptionTable {
    /// Validates and compiles a declaration list.
    ///
    /// # Errors
    ///
    /// Returns the first [`TableError`] reported by
    /// [`validate_declarations`](crate::validate_declarations).
    pub fn compile<I>(declarations: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = Declaration>,
    {
        let declarations: Vec<Declaration> = declarations.into_iter().collect();
        if let Some(err) = validate_declarations(&declarations).into_iter().next() {
            return Err(err);
        }

        let records: Vec<OptionRecord> = declarations
            .iter()
            .filter_map(Declaration::as_option)
            .map(|decl| OptionRecord {
                flag: decl.flag.clone(),
                attribute: decl.attribute.clone(),
                value_type: decl.value_type.clone(),
                arity: decl.arity,
                default: decl.default.clone(),
                behavior: decl.behavior,
                description: decl.description.clone(),
                level: decl.effective_level(),
            })
            .collect();
        let index = records
            .iter()
            .enumerate()
            .map(|(i, record)| (record.flag.clone(), i))
            .collect();

        debug!(
            options = records.len(),
            sections = declarations.len() - records.len(),
            "Compiled option table"
        );

        Ok(Self {
            declarations,
            records,
            index,
        })
    }

    /// Looks up an option by flag token.
    pub fn get(&self, flag: &str) -> Option<&OptionRecord> {
        self.index.get(flag).map(|&i| &self.records[i])
    }

    pub fn contains(&self, flag: &str) -> bool {
        self.index.contains_key(flag)
    }

    /// Compiled options in declaration order.
    pub fn records(&self) -> impl Iterator<Item = &OptionRecord> {
        self.records.iter()
    }

    /// The declarations the table was compiled from, sections included.
    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    /// Distinct attribute names in declaration order.
    pub fn attributes(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.records
            .iter()
            .map(|r| r.attribute.as_str())
            .filter(|attr| seen.insert(*attr))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Default value of every attribute.
    ///
    /// When several flags share an attribute the last declaration wins.
    pub fn defaults(&self) -> OptionMap {
        self.records
            .iter()
            .map(|r| (r.attribute.clone(), r.default_value()))
            .collect()
    }

    /// Flag tokens of mandatory options.
    pub fn mandatory_flags(&self) -> BTreeSet<String> {
        self.records
            .iter()
            .filter(|r| r.behavior.mandatory)
            .map(|r| r.flag.clone())
            .collect()
    }

    /// Attribute names of mandatory options.
    pub fn mandatory_attributes(&self) -> BTreeSet<String> {
        self.records
            .iter()
            .filter(|r| r.behavior.mandatory)
            .map(|r| r.attribute.clone())
            .collect()
    }
}
