//! Declaration and value types for option tables.
//!
//! This module defines the data model an option table is written in: the
//! [`Declaration`] entries a caller supplies, the [`ValueType`] that converts
//! raw tokens, the [`Behavior`] switches, and the dynamically typed [`Value`]
//! produced by parsing. The types derive [`serde`] traits so tables can be
//! stored as YAML or JSON.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Level assigned to option declarations that do not carry one.
///
/// Level 0 is the lowest priority, so unleveled options are always shown by
/// [`Options::help`](crate::Options::help).
pub const DEFAULT_LEVEL: u32 = 0;

/// Attribute name to value mapping produced by parsing.
pub type OptionMap = BTreeMap<String, Value>;

/// A parsed or default option value.
///
/// `Value::None` is the "no default" unit: an attribute holding it should be
/// treated as unset.
///
/// # Examples
///
/// ```
/// use simopt_core::Value;
///
/// assert_eq!(Value::from("out.txt").to_string(), "out.txt");
/// assert_eq!(Value::from(vec![Value::from(1), Value::from(2)]).to_string(), "[1, 2]");
/// assert_eq!(Value::None.to_string(), "unset");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Value {
    /// No value (the default default).
    #[default]
    None,
    /// Boolean presence or converted boolean.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// String value.
    Str(String),
    /// Growing sequence, one element per occurrence of a multi option.
    List(Vec<Value>),
    /// Fixed-size group of values from an option with arity above one.
    Tuple(Vec<Value>),
}

impl Value {
    /// Returns `true` for [`Value::None`].
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the elements of a list or tuple.
    pub fn as_slice(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) | Value::Tuple(items) => Some(items),
            _ => None,
        }
    }

    /// Appends one occurrence of a multi option.
    ///
    /// An unset value becomes a one-element list; a scalar left over from a
    /// declared default is kept as the first element.
    pub fn append_occurrence(&mut self, item: Value) {
        match self {
            Value::List(items) => items.push(item),
            Value::None => *self = Value::List(vec![item]),
            other => {
                let first = std::mem::take(other);
                *other = Value::List(vec![first, item]);
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_items(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{item}")?;
            }
            Ok(())
        }

        match self {
            Value::None => f.write_str("unset"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            // Debug keeps the fractional part, so 500.0 is not shown as 500.
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Str(s) => f.write_str(s),
            Value::List(items) => {
                f.write_str("[")?;
                write_items(f, items)?;
                f.write_str("]")
            }
            Value::Tuple(items) => {
                f.write_str("(")?;
                write_items(f, items)?;
                f.write_str(")")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

/// Signature of a user-supplied conversion function.
pub type ConvertFn = dyn Fn(&str) -> Result<Value, String> + Send + Sync;

/// A named conversion function for [`ValueType::Custom`].
///
/// Converters compare equal when their names match.
///
/// # Examples
///
/// ```
/// use simopt_core::{Converter, Value};
///
/// let upper = Converter::new("upper", |raw| Ok(Value::from(raw.to_uppercase())));
/// assert_eq!(upper.convert("abc"), Ok(Value::from("ABC")));
/// ```
#[derive(Clone)]
pub struct Converter {
    name: String,
    func: Arc<ConvertFn>,
}

impl Converter {
    pub fn new<F>(name: &str, func: F) -> Self
    where
        F: Fn(&str) -> Result<Value, String> + Send + Sync + 'static,
    {
        Self {
            name: name.to_string(),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn convert(&self, raw: &str) -> Result<Value, String> {
        (self.func)(raw)
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converter").field("name", &self.name).finish()
    }
}

impl PartialEq for Converter {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Converter {}

/// Value type of an option.
///
/// Converts each raw token that follows an option's flag. [`ValueType::Bool`]
/// is the marker type for presence switches: an option of this type is set
/// to `true` whenever its flag appears.
///
/// # Examples
///
/// ```
/// use simopt_core::{Value, ValueType};
///
/// assert_eq!(ValueType::Integer.convert("42"), Ok(Value::Int(42)));
/// assert!(ValueType::Integer.convert("forty-two").is_err());
///
/// let format = ValueType::Choice(vec!["json".into(), "yaml".into()]);
/// assert_eq!(format.convert("yaml"), Ok(Value::from("yaml")));
/// assert!(format.convert("toml").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// Boolean switch.
    Bool,
    /// String value (the default).
    #[default]
    String,
    /// Signed integer value.
    Integer,
    /// Floating point value.
    Float,
    /// One of specific choices (e.g., `--format json|yaml`).
    Choice(Vec<String>),
    /// User-supplied conversion; cannot be stored in table files.
    #[serde(skip)]
    Custom(Converter),
}

impl ValueType {
    /// Converts one raw token.
    ///
    /// `Bool` conversion never fails: `""`, `0`, `false`, `no` and `off`
    /// (any case) are `false`, everything else is `true`.
    pub fn convert(&self, raw: &str) -> Result<Value, String> {
        match self {
            ValueType::Bool => {
                let falsy = raw.is_empty()
                    || ["0", "false", "no", "off"]
                        .iter()
                        .any(|word| raw.eq_ignore_ascii_case(word));
                Ok(Value::Bool(!falsy))
            }
            ValueType::String => Ok(Value::Str(raw.to_string())),
            ValueType::Integer => raw
                .trim()
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|e| e.to_string()),
            ValueType::Float => raw
                .trim()
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|e| e.to_string()),
            ValueType::Choice(choices) => {
                if choices.iter().any(|c| c == raw) {
                    Ok(Value::Str(raw.to_string()))
                } else {
                    Err(format!("expected one of: {}", choices.join(", ")))
                }
            }
            ValueType::Custom(converter) => converter.convert(raw),
        }
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, ValueType::Bool)
    }
}

/// Behavior switches of an option.
///
/// `multi` accumulates repeated occurrences into a list instead of
/// overwriting; `mandatory` requires the flag to appear during parsing.
///
/// # Examples
///
/// ```
/// use simopt_core::Behavior;
///
/// let both = Behavior::MULTI.union(Behavior::MANDATORY);
/// assert!(both.multi && both.mandatory);
/// assert!(Behavior::NONE.is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Behavior {
    /// Repeated occurrences accumulate into a list.
    pub multi: bool,
    /// The flag must appear at least once.
    pub mandatory: bool,
}

impl Behavior {
    pub const NONE: Behavior = Behavior {
        multi: false,
        mandatory: false,
    };
    pub const MULTI: Behavior = Behavior {
        multi: true,
        mandatory: false,
    };
    pub const MANDATORY: Behavior = Behavior {
        multi: false,
        mandatory: true,
    };

    /// Combines two behaviors; a switch set in either is set in the result.
    pub const fn union(self, other: Behavior) -> Behavior {
        Behavior {
            multi: self.multi || other.multi,
            mandatory: self.mandatory || other.mandatory,
        }
    }

    pub fn is_none(&self) -> bool {
        !self.multi && !self.mandatory
    }
}

/// Declaration of one option.
///
/// Use [`new`](OptionDecl::new) or [`switch`](OptionDecl::switch) and chain
/// the builder methods.
///
/// # Examples
///
/// ```
/// use simopt_core::{Behavior, OptionDecl, Value, ValueType};
///
/// let input = OptionDecl::new("-f", "input", ValueType::String)
///     .multi()
///     .with_description("Input file");
/// assert_eq!(input.arity, 1);
/// assert_eq!(input.behavior, Behavior::MULTI);
///
/// let verbose = OptionDecl::switch("-v", "verbose").at_level(2);
/// assert_eq!(verbose.arity, 0);
/// assert_eq!(verbose.default, Value::Bool(false));
/// assert_eq!(verbose.effective_level(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredOptionDecl")]
pub struct OptionDecl {
    /// User level; absent means [`DEFAULT_LEVEL`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    /// Flag token (e.g. `-f`, `--file`).
    pub flag: String,
    /// Attribute the parsed value is stored under.
    pub attribute: String,
    /// Conversion applied to the option's argument.
    #[serde(rename = "type")]
    pub value_type: ValueType,
    /// Number of following tokens required; 0 for presence switches.
    pub arity: usize,
    #[serde(skip_serializing_if = "Value::is_none")]
    pub default: Value,
    #[serde(skip_serializing_if = "Behavior::is_none")]
    pub behavior: Behavior,
    pub description: String,
}

/// Option declaration as written in a table file, before the arity is
/// resolved from the value type.
#[derive(Deserialize)]
struct StoredOptionDecl {
    #[serde(default)]
    level: Option<u32>,
    flag: String,
    attribute: String,
    #[serde(rename = "type", default)]
    value_type: ValueType,
    #[serde(default)]
    arity: Option<usize>,
    #[serde(default)]
    default: Value,
    #[serde(default)]
    behavior: Behavior,
    #[serde(default)]
    description: String,
}

impl From<StoredOptionDecl> for OptionDecl {
    fn from(stored: StoredOptionDecl) -> Self {
        let arity = stored
            .arity
            .unwrap_or(if stored.value_type.is_bool() { 0 } else { 1 });
        Self {
            level: stored.level,
            flag: stored.flag,
            attribute: stored.attribute,
            value_type: stored.value_type,
            arity,
            default: stored.default,
            behavior: stored.behavior,
            description: stored.description,
        }
    }
}

impl OptionDecl {
    /// Creates an option with no default.
    ///
    /// The arity is 1, or 0 for [`ValueType::Bool`].
    pub fn new(flag: &str, attribute: &str, value_type: ValueType) -> Self {
        let arity = if value_type.is_bool() { 0 } else { 1 };
        Self {
            level: None,
            flag: flag.to_string(),
            attribute: attribute.to_string(),
            value_type,
            arity,
            default: Value::None,
            behavior: Behavior::NONE,
            description: String::new(),
        }
    }

    /// Creates a boolean presence switch defaulting to `false`.
    pub fn switch(flag: &str, attribute: &str) -> Self {
        Self::new(flag, attribute, ValueType::Bool).with_default(false)
    }

    pub fn with_arity(mut self, arity: usize) -> Self {
        self.arity = arity;
        self
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = default.into();
        self
    }

    pub fn with_behavior(mut self, behavior: Behavior) -> Self {
        self.behavior = behavior;
        self
    }

    /// Marks as accumulating repeated occurrences.
    pub fn multi(mut self) -> Self {
        self.behavior.multi = true;
        self
    }

    /// Marks as required on the command line.
    pub fn mandatory(mut self) -> Self {
        self.behavior.mandatory = true;
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn at_level(mut self, level: u32) -> Self {
        self.level = Some(level);
        self
    }

    pub fn effective_level(&self) -> u32 {
        self.level.unwrap_or(DEFAULT_LEVEL)
    }
}

/// One entry of an option table.
///
/// A plain string is a section label printed verbatim in help output; every
/// other entry declares an option. In YAML or JSON a section is written as a
/// bare string.
///
/// # Examples
///
/// ```
/// use simopt_core::{Declaration, OptionDecl, ValueType};
///
/// let table = vec![
///     Declaration::section("Input options:"),
///     OptionDecl::new("-f", "input", ValueType::String).into(),
/// ];
/// assert!(table[0].as_option().is_none());
/// assert_eq!(table[1].as_option().unwrap().flag, "-f");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Declaration {
    /// Help text line; not an option.
    Section(String),
    /// Option declaration.
    Option(OptionDecl),
}

impl Declaration {
    pub fn section(text: &str) -> Self {
        Declaration::Section(text.to_string())
    }

    pub fn as_option(&self) -> Option<&OptionDecl> {
        match self {
            Declaration::Option(decl) => Some(decl),
            Declaration::Section(_) => None,
        }
    }
}

impl From<OptionDecl> for Declaration {
    fn from(decl: OptionDecl) -> Self {
        Declaration::Option(decl)
    }
}

impl From<&str> for Declaration {
    fn from(text: &str) -> Self {
        Declaration::section(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_conversion_never_fails() {
        assert_eq!(ValueType::Bool.convert("yes"), Ok(Value::Bool(true)));
        assert_eq!(ValueType::Bool.convert("OFF"), Ok(Value::Bool(false)));
        assert_eq!(ValueType::Bool.convert(""), Ok(Value::Bool(false)));
        assert_eq!(ValueType::Bool.convert("anything"), Ok(Value::Bool(true)));
    }

    #[test]
    fn test_numeric_conversion() {
        assert_eq!(ValueType::Integer.convert("-7"), Ok(Value::Int(-7)));
        assert_eq!(ValueType::Float.convert("2.5"), Ok(Value::Float(2.5)));
        assert!(ValueType::Float.convert("abc").is_err());
    }

    #[test]
    fn test_custom_converter() {
        let even = Converter::new("even", |raw| {
            let n: i64 = raw.parse().map_err(|_| "not a number".to_string())?;
            if n % 2 == 0 {
                Ok(Value::Int(n))
            } else {
                Err(format!("{n} is odd"))
            }
        });
        let ty = ValueType::Custom(even);
        assert_eq!(ty.convert("4"), Ok(Value::Int(4)));
        assert_eq!(ty.convert("3"), Err("3 is odd".to_string()));
    }

    #[test]
    fn test_append_occurrence() {
        let mut v = Value::None;
        v.append_occurrence(Value::from("a"));
        v.append_occurrence(Value::from("b"));
        assert_eq!(v, Value::List(vec!["a".into(), "b".into()]));

        let mut scalar = Value::from("seed");
        scalar.append_occurrence(Value::from("x"));
        assert_eq!(scalar, Value::List(vec!["seed".into(), "x".into()]));
    }

    #[test]
    fn test_display_nested() {
        let v = Value::List(vec![
            Value::Tuple(vec![Value::Int(1), Value::Int(1)]),
            Value::Tuple(vec![Value::Int(2), Value::Int(2)]),
        ]);
        assert_eq!(v.to_string(), "[(1, 1), (2, 2)]");
    }

    #[test]
    fn test_display_float_keeps_fraction() {
        assert_eq!(Value::Float(500.0).to_string(), "500.0");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
        assert_eq!(Value::Int(500).to_string(), "500");
    }

    #[test]
    fn test_stored_arity_follows_value_type() {
        let yaml = r#"
- {flag: -v, attribute: verbose, type: bool}
- {flag: -o, attribute: output, type: string}
- {flag: -q, attribute: quiet, type: bool, arity: 1}
"#;
        let decls: Vec<Declaration> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(decls[0].as_option().unwrap().arity, 0);
        assert_eq!(decls[1].as_option().unwrap().arity, 1);
        assert_eq!(decls[2].as_option().unwrap().arity, 1);
        assert_eq!(
            decls[0].as_option().unwrap(),
            &OptionDecl::new("-v", "verbose", ValueType::Bool)
        );
    }

    #[test]
    fn test_declaration_yaml_shapes() {
        let yaml = r#"
- "Section"
- flag: -n
  attribute: count
  type: integer
  default: 3
  behavior: { mandatory: true }
- flag: --fmt
  attribute: format
  type:
    choice: [json, yaml]
"#;
        let decls: Vec<Declaration> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(decls[0], Declaration::section("Section"));
        let count = decls[1].as_option().unwrap();
        assert_eq!(count.value_type, ValueType::Integer);
        assert_eq!(count.default, Value::Int(3));
        assert_eq!(count.arity, 1);
        assert!(count.behavior.mandatory);
        let format = decls[2].as_option().unwrap();
        assert_eq!(
            format.value_type,
            ValueType::Choice(vec!["json".into(), "yaml".into()])
        );
        assert!(format.default.is_none());
    }

    #[test]
    fn test_custom_type_is_not_serializable() {
        let decl = OptionDecl::new(
            "-x",
            "x",
            ValueType::Custom(Converter::new("x", |raw| Ok(Value::from(raw)))),
        );
        assert!(serde_json::to_string(&decl).is_err());
    }
}
