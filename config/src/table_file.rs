//! Loading and saving table files.

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};
use simopt_core::{Declaration, Options};
use tracing::debug;

use crate::error::{ConfigError, Result};

/// On-disk format of a table file, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// `.yaml` or `.yml`
    Yaml,
    /// `.json`
    Json,
}

impl TableFormat {
    /// Detects the format from a path's extension.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedFormat`](ConfigError::UnsupportedFormat) for any
    /// other extension.
    ///
    /// # Examples
    ///
    /// ```
    /// use simopt_config::TableFormat;
    ///
    /// assert_eq!(TableFormat::from_path("opts.yml").unwrap(), TableFormat::Yaml);
    /// assert_eq!(TableFormat::from_path("opts.JSON").unwrap(), TableFormat::Json);
    /// assert!(TableFormat::from_path("opts.toml").is_err());
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("yaml") | Some("yml") => Ok(TableFormat::Yaml),
            Some("json") => Ok(TableFormat::Json),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// An option table as stored on disk.
///
/// # Examples
///
/// ```
/// use simopt_config::TableFile;
/// use simopt_core::Value;
///
/// let table = TableFile::from_yaml_str(r#"
/// program: convert
/// declarations:
///   - "Options:"
///   - flag: -n
///     attribute: count
///     type: integer
///     default: 2
/// "#).unwrap();
///
/// let options = table.into_options().unwrap();
/// assert_eq!(options.program(), Some("convert"));
/// assert_eq!(options.parse(&["-n", "5"]).unwrap()["count"], Value::Int(5));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableFile {
    /// Program name shown in help and usage errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
    /// Section labels and option declarations, in display order.
    pub declarations: Vec<Declaration>,
}

impl TableFile {
    pub fn new(program: Option<&str>, declarations: Vec<Declaration>) -> Self {
        Self {
            program: program.map(String::from),
            declarations,
        }
    }

    /// Loads a table file, choosing the format by extension.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](ConfigError::Io) if the file cannot be read,
    /// [`UnsupportedFormat`](ConfigError::UnsupportedFormat) for an unknown
    /// extension, or a [`Json`](ConfigError::Json) /
    /// [`Yaml`](ConfigError::Yaml) error if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = TableFormat::from_path(path)?;
        let reader = BufReader::new(std::fs::File::open(path)?);
        let table: TableFile = match format {
            TableFormat::Yaml => serde_yaml::from_reader(reader)?,
            TableFormat::Json => serde_json::from_reader(reader)?,
        };
        debug!(
            path = %path.display(),
            entries = table.declarations.len(),
            "Loaded table file"
        );
        Ok(table)
    }

    /// Saves the table, choosing the format by extension.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](ConfigError::Io) if the file cannot be written,
    /// [`UnsupportedFormat`](ConfigError::UnsupportedFormat) for an unknown
    /// extension, or a serialization error (custom value types cannot be
    /// stored).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let format = TableFormat::from_path(path)?;
        let writer = BufWriter::new(std::fs::File::create(path)?);
        match format {
            TableFormat::Yaml => serde_yaml::to_writer(writer, self)?,
            TableFormat::Json => serde_json::to_writer_pretty(writer, self)?,
        }
        Ok(())
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Compiles the declarations into an [`Options`] engine.
    ///
    /// # Errors
    ///
    /// Returns [`Table`](ConfigError::Table) if the declarations are invalid.
    pub fn into_options(self) -> Result<Options> {
        let options = Options::new(self.declarations)?;
        Ok(match self.program {
            Some(program) => options.with_program(program),
            None => options,
        })
    }
}

#[cfg(test)]
mod tests {
    use simopt_core::{Behavior, OptionDecl, TableError, Value, ValueType};

    use super::*;

    #[test]
    fn test_json_table() {
        let table = TableFile::from_json_str(
            r#"{
                "declarations": [
                    "Files",
                    {"flag": "-f", "attribute": "input", "type": "string",
                     "behavior": {"multi": true}},
                    {"flag": "-v", "attribute": "verbose", "type": "bool", "arity": 0}
                ]
            }"#,
        )
        .unwrap();
        assert!(table.program.is_none());
        assert_eq!(table.declarations.len(), 3);

        let flag = table.declarations[1].as_option().unwrap();
        assert_eq!(flag.behavior, Behavior::MULTI);
        let verbose = table.declarations[2].as_option().unwrap();
        assert_eq!(verbose.arity, 0);
        assert_eq!(verbose.value_type, ValueType::Bool);
    }

    #[test]
    fn test_levels_and_choices_from_yaml() {
        let table = TableFile::from_yaml_str(
            r#"
declarations:
  - flag: --format
    attribute: format
    level: 2
    type:
      choice: [pdb, gro]
    default: pdb
"#,
        )
        .unwrap();
        let decl = table.declarations[0].as_option().unwrap();
        assert_eq!(decl.effective_level(), 2);
        assert_eq!(decl.default, Value::from("pdb"));
    }

    #[test]
    fn test_invalid_table_is_reported() {
        let table = TableFile::new(
            None,
            vec![
                OptionDecl::new("-x", "a", ValueType::String).into(),
                OptionDecl::new("-x", "b", ValueType::String).into(),
            ],
        );
        let err = table.into_options().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Table(TableError::DuplicateFlag(ref flag)) if flag == "-x"
        ));
    }

    #[test]
    fn test_unknown_value_type_fails() {
        let err = TableFile::from_yaml_str(
            "declarations:\n  - {flag: -x, attribute: x, type: complex}\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }
}
