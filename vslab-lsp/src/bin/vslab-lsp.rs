use tokio::io::{stdin, stdout};
use tower_lsp::{LspService, Server};
use tracing_subscriber::EnvFilter;
use vslab_config::Loader;
use vslab_lsp::VslabLanguageServer;

/// Workspace-local overrides, read from the directory the editor starts the server in.
const WORKSPACE_CONFIG: &str = "vslab.toml";

#[tokio::main]
async fn main() {
    // stdout carries the protocol
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let config = match Loader::new()
        .with_optional_file(WORKSPACE_CONFIG)
        .with_env()
        .build()
    {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(%err, "invalid configuration");
            std::process::exit(1);
        }
    };

    let stdin = stdin();
    let stdout = stdout();
    let (service, socket) = LspService::new(|client| VslabLanguageServer::new(client, config));
    Server::new(stdin, stdout, socket).serve(service).await;
}
