//! Main language server implementation

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::features::commands::{self, COMMANDS};
use crate::features::diagnostics::{collect_diagnostics, to_lsp_diagnostics};
use crate::features::formatting::{compute_edits, format_document, to_text_edits, TextEditSpan};
use crate::features::semantic_tokens::{
    collect_semantic_tokens, encode_semantic_tokens, semantic_tokens_legend,
};
use serde_json::Value;
use tokio::sync::RwLock;
use tower_lsp::async_trait;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::{
    DidChangeTextDocumentParams, DidCloseTextDocumentParams, DidOpenTextDocumentParams,
    DidSaveTextDocumentParams, DocumentFormattingParams, ExecuteCommandOptions,
    ExecuteCommandParams, InitializeParams, InitializeResult, InitializedParams, MessageType,
    OneOf, SemanticTokens, SemanticTokensFullOptions, SemanticTokensOptions, SemanticTokensParams,
    SemanticTokensResult, SemanticTokensServerCapabilities, ServerCapabilities, ServerInfo,
    TextDocumentItem, TextDocumentSyncCapability, TextDocumentSyncKind, TextDocumentSyncOptions,
    TextDocumentSyncSaveOptions, TextEdit, Url, WorkDoneProgressOptions, WorkspaceEdit,
};
use tower_lsp::Client;
use tracing::{debug, warn};
use vslab_config::VslabConfig;
use vslab_core::events::export_events;
use vslab_core::highlight::Token;
use vslab_core::localization::on_save;
use vslab_core::text::split_lines;
use vslab_core::Diagnostic;

/// Outgoing half of the protocol, narrowed to what the server sends.
#[async_trait]
pub trait LspClient: Send + Sync + Clone + 'static {
    async fn publish(&self, uri: Url, diagnostics: Vec<lsp_types::Diagnostic>);
    /// Ask the editor to apply `edit`; true when it did.
    async fn request_edit(&self, edit: WorkspaceEdit) -> bool;
    async fn notify(&self, kind: MessageType, message: String);
}

#[async_trait]
impl LspClient for Client {
    async fn publish(&self, uri: Url, diagnostics: Vec<lsp_types::Diagnostic>) {
        self.publish_diagnostics(uri, diagnostics, None).await;
    }

    async fn request_edit(&self, edit: WorkspaceEdit) -> bool {
        match self.apply_edit(edit).await {
            Ok(response) => response.applied,
            Err(err) => {
                warn!(%err, "workspace edit request failed");
                false
            }
        }
    }

    async fn notify(&self, kind: MessageType, message: String) {
        self.show_message(kind, message).await;
    }
}

pub trait FeatureProvider: Send + Sync + 'static {
    fn semantic_tokens(&self, text: &str, highlight_placeholders: bool) -> Vec<Token>;
    fn format(&self, text: &str) -> Vec<TextEditSpan>;
    fn diagnostics(&self, text: &str) -> Vec<Diagnostic>;
}

#[derive(Default)]
pub struct DefaultFeatureProvider;

impl DefaultFeatureProvider {
    pub fn new() -> Self {
        Self
    }
}

impl FeatureProvider for DefaultFeatureProvider {
    fn semantic_tokens(&self, text: &str, highlight_placeholders: bool) -> Vec<Token> {
        collect_semantic_tokens(text, highlight_placeholders)
    }

    fn format(&self, text: &str) -> Vec<TextEditSpan> {
        format_document(text)
    }

    fn diagnostics(&self, text: &str) -> Vec<Diagnostic> {
        collect_diagnostics(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentKind {
    Localization,
    Events,
    Other,
}

#[derive(Default)]
struct DocumentStore {
    entries: RwLock<HashMap<Url, Arc<String>>>,
}

impl DocumentStore {
    async fn upsert(&self, uri: Url, text: String) -> Arc<String> {
        let text = Arc::new(text);
        self.entries.write().await.insert(uri, text.clone());
        text
    }

    async fn get(&self, uri: &Url) -> Option<Arc<String>> {
        self.entries.read().await.get(uri).cloned()
    }

    async fn remove(&self, uri: &Url) {
        self.entries.write().await.remove(uri);
    }
}

pub struct VslabLanguageServer<C = Client, P = DefaultFeatureProvider> {
    client: C,
    documents: DocumentStore,
    features: Arc<P>,
    config: Arc<VslabConfig>,
}

impl VslabLanguageServer<Client, DefaultFeatureProvider> {
    pub fn new(client: Client, config: VslabConfig) -> Self {
        Self::with_features(client, Arc::new(DefaultFeatureProvider::new()), config)
    }
}

impl<C, P> VslabLanguageServer<C, P>
where
    C: LspClient,
    P: FeatureProvider,
{
    pub fn with_features(client: C, features: Arc<P>, config: VslabConfig) -> Self {
        Self {
            client,
            documents: DocumentStore::default(),
            features,
            config: Arc::new(config),
        }
    }

    fn document_kind(&self, uri: &Url) -> DocumentKind {
        match uri.to_file_path() {
            Ok(path) if self.config.is_localization_file(&path) => DocumentKind::Localization,
            Ok(path) if self.config.is_events_file(&path) => DocumentKind::Events,
            _ => DocumentKind::Other,
        }
    }

    async fn store_and_check(&self, uri: Url, text: String) {
        let text = self.documents.upsert(uri.clone(), text).await;
        if self.document_kind(&uri) == DocumentKind::Localization {
            let diagnostics = self.features.diagnostics(&text);
            self.client
                .publish(uri, to_lsp_diagnostics(&text, &diagnostics))
                .await;
        }
    }

    async fn localization_text(&self, uri: &Url) -> Option<Arc<String>> {
        if self.document_kind(uri) != DocumentKind::Localization {
            return None;
        }
        self.documents.get(uri).await
    }

    async fn save_localization(&self, uri: &Url, path: &Path, text: &str) {
        let output = match on_save(text, &self.config.save_options()) {
            Ok(output) => output,
            Err(err) => {
                let diagnostic = err.to_diagnostic(split_lines(text).len());
                self.client
                    .publish(uri.clone(), to_lsp_diagnostics(text, &[diagnostic]))
                    .await;
                self.client
                    .notify(MessageType::ERROR, format!("{}: {err}", path.display()))
                    .await;
                return;
            }
        };

        self.client
            .publish(uri.clone(), to_lsp_diagnostics(text, &output.diagnostics))
            .await;

        if let Some(formatted) = output.formatting_change(text) {
            let edits = to_text_edits(text, &compute_edits(text, formatted));
            let edit = WorkspaceEdit {
                changes: Some(HashMap::from([(uri.clone(), edits)])),
                ..WorkspaceEdit::default()
            };
            if !self.client.request_edit(edit).await {
                warn!(%uri, "editor rejected the formatting edit");
            }
        }

        if let Some(listing) = output.exported {
            self.export(self.config.export_target_for(path), listing)
                .await;
        }
    }

    async fn save_events(&self, path: &Path, text: &str) {
        match export_events(text, &self.config.events_options()) {
            Ok(lines) => {
                self.export(self.config.events_target_for(path), lines.join("\n"))
                    .await
            }
            Err(err) => {
                self.client
                    .notify(MessageType::ERROR, format!("{}: {err}", path.display()))
                    .await
            }
        }
    }

    async fn export(&self, target: PathBuf, listing: String) {
        match write_listing(&target, &listing).await {
            Ok(()) => {
                debug!(target = %target.display(), "wrote generated listing");
                self.client
                    .notify(MessageType::INFO, format!("Exported {}", target.display()))
                    .await;
            }
            Err(err) => {
                self.client
                    .notify(
                        MessageType::ERROR,
                        format!("failed to write {}: {err}", target.display()),
                    )
                    .await;
            }
        }
    }
}

async fn write_listing(target: &Path, listing: &str) -> io::Result<()> {
    if let Some(dir) = target.parent() {
        tokio::fs::create_dir_all(dir).await?;
    }
    tokio::fs::write(target, listing).await
}

#[async_trait]
impl<C, P> tower_lsp::LanguageServer for VslabLanguageServer<C, P>
where
    C: LspClient,
    P: FeatureProvider,
{
    async fn initialize(&self, _: InitializeParams) -> Result<InitializeResult> {
        let capabilities = ServerCapabilities {
            text_document_sync: Some(TextDocumentSyncCapability::Options(
                TextDocumentSyncOptions {
                    open_close: Some(true),
                    change: Some(TextDocumentSyncKind::FULL),
                    save: Some(TextDocumentSyncSaveOptions::SaveOptions(
                        lsp_types::SaveOptions {
                            include_text: Some(false),
                        },
                    )),
                    ..TextDocumentSyncOptions::default()
                },
            )),
            semantic_tokens_provider: Some(
                SemanticTokensServerCapabilities::SemanticTokensOptions(SemanticTokensOptions {
                    work_done_progress_options: WorkDoneProgressOptions::default(),
                    legend: semantic_tokens_legend(),
                    range: None,
                    full: Some(SemanticTokensFullOptions::Bool(true)),
                }),
            ),
            document_formatting_provider: Some(OneOf::Left(true)),
            execute_command_provider: Some(ExecuteCommandOptions {
                commands: COMMANDS.iter().map(|command| command.to_string()).collect(),
                work_done_progress_options: WorkDoneProgressOptions::default(),
            }),
            ..ServerCapabilities::default()
        };

        Ok(InitializeResult {
            capabilities,
            server_info: Some(ServerInfo {
                name: "vslab-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        debug!("vslab language server initialized");
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let TextDocumentItem { uri, text, .. } = params.text_document;
        self.store_and_check(uri, text).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        if let Some(change) = params.content_changes.into_iter().last() {
            self.store_and_check(params.text_document.uri, change.text)
                .await;
        }
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        let uri = params.text_document.uri;
        let Ok(path) = uri.to_file_path() else {
            return;
        };
        let text = match self.documents.get(&uri).await {
            Some(text) => text,
            None => match params.text {
                Some(text) => self.documents.upsert(uri.clone(), text).await,
                None => return,
            },
        };

        match self.document_kind(&uri) {
            DocumentKind::Localization => self.save_localization(&uri, &path, &text).await,
            DocumentKind::Events => self.save_events(&path, &text).await,
            DocumentKind::Other => {}
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        self.documents.remove(&uri).await;
        if self.document_kind(&uri) == DocumentKind::Localization {
            self.client.publish(uri, Vec::new()).await;
        }
    }

    async fn semantic_tokens_full(
        &self,
        params: SemanticTokensParams,
    ) -> Result<Option<SemanticTokensResult>> {
        if let Some(text) = self.localization_text(&params.text_document.uri).await {
            let highlight = self.config.localization.semantic_highlight;
            let tokens = self.features.semantic_tokens(&text, highlight);
            Ok(Some(SemanticTokensResult::Tokens(SemanticTokens {
                result_id: None,
                data: encode_semantic_tokens(&tokens),
            })))
        } else {
            Ok(None)
        }
    }

    async fn formatting(&self, params: DocumentFormattingParams) -> Result<Option<Vec<TextEdit>>> {
        if let Some(text) = self.localization_text(&params.text_document.uri).await {
            let spans = self.features.format(&text);
            Ok(Some(to_text_edits(&text, &spans)))
        } else {
            Ok(None)
        }
    }

    async fn execute_command(&self, params: ExecuteCommandParams) -> Result<Option<Value>> {
        commands::execute_command(&params.command, &params.arguments, &self.config)
    }
}
