//! Localization file engine
//!
//!     The localization format is a flat list of `key=value` lines followed by a mandatory cut
//!     line (`!!!`). The parser is strict: a non-blank line without a separator aborts the
//!     whole parse, and so does a document that never reaches the cut line. Everything derived
//!     from a file (canonical formatting, generated constants) is only produced from a table
//!     that parsed cleanly.
//!
//! Pipeline
//!
//!     text -> parser -> Table -> formatter (canonical text)
//!                             -> exporter  (constants listing)
//!                             -> validation (diagnostics)
//!
//!     [save] runs the parser once and fans out to the formatter and exporter according to
//!     the host's options.

pub mod exporter;
pub mod formatter;
pub mod parser;
pub mod save;
pub mod table;
pub mod validation;

pub use exporter::{export_constants, ExportOptions};
pub use formatter::{format_source, format_table, format_text};
pub use parser::{parse, parse_lines, ParseError, CUT_MARKER, SEPARATOR};
pub use save::{on_save, SaveOptions, SaveOutput};
pub use table::{DuplicateKey, Entry, Table};
pub use validation::validate;
