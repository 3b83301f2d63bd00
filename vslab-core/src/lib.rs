//! # vslab-core
//!
//! Algorithms behind the vslab editor tooling. Everything here is a pure function of its
//! input: hosts (the CLI and the language server) read files, call into this crate, and write
//! whatever comes back.
//!
//! Modules
//!
//!     localization    The key=value localization format: parser, validator, canonical
//!                     formatter, constants exporter and the save pipeline tying them together.
//!     highlight       Per-line semantic tokenizer plus the static token legend.
//!     references      `${name}` expansion over a document's `references` section.
//!     shortcuts       Aggregation of `shortcuts` sections across several tool documents.
//!     events          Event-definition documents rendered as a generated registry listing.
//!     convert         YAML <-> JSON conversion.
//!
//! The localization format
//!
//!     A localization file is a block of `key=value` lines terminated by a cut line starting
//!     with `!!!`. Everything from the cut line on is an opaque trailer kept verbatim:
//!
//!         Greeting    =Hello {0}!
//!         Farewell    =Bye\nSee you
//!
//!
//!
//!
//!         !!! everything below is ignored by the parser

pub mod convert;
pub mod diagnostics;
pub mod events;
pub mod highlight;
pub mod localization;
pub mod references;
pub mod shortcuts;
pub mod text;

pub use diagnostics::{Diagnostic, Severity};
pub use localization::{parse, parse_lines, ParseError, Table};
