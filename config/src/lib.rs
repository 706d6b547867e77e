//! Option tables stored as YAML or JSON files.
//!
//! A table file names the program and lists its declarations. Section labels
//! are bare strings; options are mappings using the field names of
//! [`OptionDecl`](simopt_core::OptionDecl), with the value type under `type`.
//!
//! ```yaml
//! program: convert
//! declarations:
//!   - "Input/output options:"
//!   - flag: -f
//!     attribute: input
//!     type: string
//!     behavior: { multi: true }
//!     description: Input file
//!   - flag: -o
//!     attribute: output
//!     type: string
//!     behavior: { mandatory: true }
//!     description: Output file
//! ```
//!
//! # Quick start
//!
//! ```no_run
//! use simopt_config::TableFile;
//!
//! let options = TableFile::load("convert.yaml").unwrap().into_options().unwrap();
//! let parsed = options.parse(&["-o", "out.pdb"]).unwrap();
//! println!("{parsed:?}");
//! ```

mod error;
mod table_file;

pub use error::{ConfigError, Result};
pub use table_file::{TableFile, TableFormat};
