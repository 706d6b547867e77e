//! Declarative command-line option parsing.
//!
//! A caller describes every accepted option in a table of [`Declaration`]s
//! and the engine turns token lists into attribute maps:
//!
//! - [`OptionDecl`]: one option with flag, attribute, [`ValueType`], arity,
//!   default, [`Behavior`] and help text, with an optional user level.
//! - [`OptionTable`]: the compiled, immutable form of a declaration list.
//! - [`Options`]: parses tokens into an [`OptionMap`], raises
//!   [`ParseError::HelpRequested`] on `-h`/`--help`, and renders help.
//! - [`OptFunc`]: validates keyword calls of a plain function against the
//!   same table and fills in defaults.
//!
//! Tables are checked when compiled ([`validate_declarations`]): duplicate
//! or malformed flags are configuration errors.
//!
//! # Example
//!
//! ```
//! use simopt_core::*;
//!
//! let options = Options::new(vec![
//!     Declaration::section("Input/output options:"),
//!     OptionDecl::new("-f", "input", ValueType::String)
//!         .multi()
//!         .with_description("Input file")
//!         .into(),
//!     OptionDecl::new("-o", "output", ValueType::String)
//!         .mandatory()
//!         .with_description("Output file")
//!         .into(),
//!     OptionDecl::switch("-v", "verbose").at_level(1).into(),
//! ])
//! .unwrap()
//! .with_program("convert");
//!
//! let parsed = options.parse(&["-f", "a.txt", "-o", "out.txt", "-v"]).unwrap();
//! assert_eq!(parsed["output"], Value::from("out.txt"));
//! assert_eq!(parsed["verbose"], Value::Bool(true));
//!
//! assert_eq!(options.parse(&["--help"]), Err(ParseError::HelpRequested));
//! assert!(options.usage().starts_with("convert\n"));
//! ```

mod error;
mod help;
mod opt_func;
mod options;
mod table;
mod types;
mod validate;

pub use error::{ArgumentError, Error, ParseError, Result, UsageError, UsageErrorKind};
pub use help::ALL_LEVELS;
pub use opt_func::{Arguments, OptFunc};
pub use options::Options;
pub use table::{OptionRecord, OptionTable};
pub use types::*;
pub use validate::{HELP_FLAGS, TableError, validate_declarations};
