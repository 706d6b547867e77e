//! Help text rendering.
//!
//! Help lists every section label and every option up to a user level,
//! showing each option's current value next to its description.

use std::fmt;

use crate::error::ParseError;
use crate::table::OptionTable;
use crate::{Declaration, OptionMap, Options, Value};

/// User level that shows every option.
pub const ALL_LEVELS: u32 = u32::MAX;

const INDENT: &str = "     ";

/// First help line when no program name is configured.
const UNNAMED_PROGRAM: &str = "Options:";

impl Options {
    /// Renders help text.
    ///
    /// Values are taken from parsing `tokens` with help and mandatory
    /// checking disabled, or from the defaults when `tokens` is `None`.
    /// Options above `user_level` are left out.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError::Usage`] if `tokens` cannot be parsed.
    ///
    /// # Examples
    ///
    /// ```
    /// use simopt_core::*;
    ///
    /// let options = Options::new(vec![
    ///     Declaration::section("Basic:"),
    ///     OptionDecl::new("-n", "count", ValueType::Integer)
    ///         .with_default(1)
    ///         .with_description("Repeat count")
    ///         .into(),
    ///     OptionDecl::switch("-debug", "debug")
    ///         .at_level(5)
    ///         .with_description("Dump internals")
    ///         .into(),
    /// ])
    /// .unwrap()
    /// .with_program("tool");
    ///
    /// let help = options.help(Some(&["-n", "3"][..]), 1).unwrap();
    /// assert_eq!(
    ///     help,
    ///     "tool\n\n     Basic:\n             -n   Repeat count ( 3 )\n"
    /// );
    /// assert!(options.usage().contains("-debug"));
    /// ```
    pub fn help<S: AsRef<str>>(
        &self,
        tokens: Option<&[S]>,
        user_level: u32,
    ) -> Result<String, ParseError> {
        let values = match tokens {
            Some(tokens) => self.parse_ignoring_help(tokens)?,
            None => self.defaults(),
        };
        Ok(render(self.table(), self.program(), &values, user_level))
    }

    /// Help for every level, showing default values.
    pub fn usage(&self) -> String {
        render(self.table(), self.program(), &self.defaults(), ALL_LEVELS)
    }
}

impl fmt::Display for Options {
    /// Help for the tokens given to [`with_args`](Options::with_args).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let help = self.help(self.args(), ALL_LEVELS).map_err(|_| fmt::Error)?;
        f.write_str(&help)
    }
}

fn render(
    table: &OptionTable,
    program: Option<&str>,
    values: &OptionMap,
    user_level: u32,
) -> String {
    let mut out = vec![format!("{}\n", program.unwrap_or(UNNAMED_PROGRAM))];

    for declaration in table.declarations() {
        match declaration {
            Declaration::Section(text) => out.push(format!("{INDENT}{text}")),
            Declaration::Option(decl) if decl.effective_level() <= user_level => {
                let value = values.get(&decl.attribute).unwrap_or(&Value::None);
                out.push(format!(
                    "{INDENT}{:>10}   {} ( {} )",
                    decl.flag, decl.description, value
                ));
            }
            Declaration::Option(_) => {}
        }
    }

    out.join("\n") + "\n"
}

#[cfg(test)]
mod tests {
    use crate::*;

    fn engine() -> Options {
        Options::new(vec![
            Declaration::section("Files:"),
            OptionDecl::new("-f", "input", ValueType::String)
                .multi()
                .with_description("Input")
                .into(),
            OptionDecl::new("-o", "output", ValueType::String)
                .mandatory()
                .with_description("Output")
                .into(),
            Declaration::section("Expert:"),
            OptionDecl::new("-seed", "seed", ValueType::Integer)
                .with_default(42)
                .at_level(7)
                .with_description("Random seed")
                .into(),
        ])
        .unwrap()
    }

    #[test]
    fn test_defaults_without_program() {
        let help = engine().help::<&str>(None, ALL_LEVELS).unwrap();
        let lines: Vec<&str> = help.lines().collect();
        assert_eq!(lines[0], "Options:");
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], "     Files:");
        assert_eq!(lines[3], "             -f   Input ( [] )");
        assert_eq!(lines[4], "             -o   Output ( unset )");
        assert_eq!(lines[5], "     Expert:");
        assert_eq!(lines[6], "          -seed   Random seed ( 42 )");
    }

    #[test]
    fn test_levels_hide_options_not_sections() {
        let help = engine().help::<&str>(None, 6).unwrap();
        assert!(help.contains("Expert:"));
        assert!(!help.contains("-seed"));
    }

    #[test]
    fn test_help_with_tokens_ignores_help_and_mandatory() {
        let help = engine()
            .help(Some(&["-f", "a", "--help", "-f", "b"][..]), ALL_LEVELS)
            .unwrap();
        assert!(help.contains("Input ( [a, b] )"));
        assert!(help.contains("Output ( unset )"));
    }

    #[test]
    fn test_help_propagates_usage_errors() {
        let err = engine().help(Some(&["-x"][..]), ALL_LEVELS).unwrap_err();
        assert!(matches!(err, ParseError::Usage(_)));
    }

    #[test]
    fn test_display_uses_constructor_args() {
        let options = engine()
            .with_program("prog")
            .with_args(&["-o", "result.txt"])
            .unwrap();
        let text = options.to_string();
        assert!(text.starts_with("prog\n"));
        assert!(text.contains("Output ( result.txt )"));
    }
}
