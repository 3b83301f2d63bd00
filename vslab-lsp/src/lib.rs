//! Language Server Protocol (LSP) implementation for vslab
//!
//!     Editor support for localization tables and event definition documents, served over
//!     stdin/stdout with tower-lsp. All document semantics live in vslab-core; this crate
//!     only routes requests to it and translates the results into protocol types.
//!
//! Document routing
//!
//!     Documents are classified by path using the configured markers:
//!
//!         localization table   path contains `localization.path_marker`
//!         event definitions    path contains `events.path_marker`
//!
//!     Anything else is stored but otherwise ignored.
//!
//! Feature Set
//!
//!     1. Diagnostics (textDocument/publishDiagnostics):
//!         - parse failures (missing separator, missing cut line) as a single error
//!         - duplicate keys and keys that are not valid identifiers as warnings
//!
//!     2. Semantic Tokens (textDocument/semanticTokens/full):
//!         - keys, values, escape sequences, {placeholders} and the cut line
//!
//!     3. Document Formatting (textDocument/formatting):
//!         - canonical order and alignment, sent as line-granular edits
//!
//!     4. Save pipeline (textDocument/didSave):
//!         - tables are formatted through a workspace edit and the constants listing is
//!           written next to the project sources
//!         - event definitions are rendered into the registry listing
//!
//!     5. Commands (workspace/executeCommand):
//!         - vslab.version, vslab.yaml2json, vslab.json2yaml, vslab.shortcuts
//!
//! Architecture
//!
//!     Server Layer (server.rs):
//!         - implements LanguageServer, keeps the open documents, applies configuration
//!         - talks to the editor through [`server::LspClient`] so tests can record traffic
//!
//!     Feature Layer (features/):
//!         - stateless functions over document text, reached through
//!           [`server::FeatureProvider`]
//!
//! Usage
//!
//!     $ vslab-lsp
//!     Starts the language server on stdin/stdout. Logs go to stderr, filtered by RUST_LOG.

pub mod features;
pub mod server;

pub use server::VslabLanguageServer;
