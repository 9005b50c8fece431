//! Linear MCP - stdio MCP server for the Linear issue tracker.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use linear_api::LinearClient;
use linear_mcp_core::{config, Config, Credentials, IssueTracker};
use linear_mcp_server::{CapabilityRegistry, McpServer};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "linear-mcp")]
#[command(author, version, about = "Linear MCP server over stdio", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Dotenv file to load instead of `.env` next to the install directory
    #[arg(long, value_name = "PATH")]
    env_file: Option<PathBuf>,

    /// Config file to load instead of the default location
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Stdout is reserved for protocol frames
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    if let Err(e) = run(cli).await {
        tracing::error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut server = prepare(&cli, |name| std::env::var(name).ok(), build_server)?;

    tracing::info!("Linear MCP Server running on stdio");
    server.run().await?;
    Ok(())
}

/// Load dotenv, settings and credentials, then hand them to `build`.
///
/// `build` is only invoked once a credential is present.
fn prepare<L, B>(cli: &Cli, lookup: L, build: B) -> anyhow::Result<McpServer>
where
    L: Fn(&str) -> Option<String>,
    B: FnOnce(&Config, &Credentials) -> anyhow::Result<McpServer>,
{
    config::load_dotenv(cli.env_file.as_deref());

    let config = match cli.config.as_deref() {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    }
    .with_overrides(&lookup);

    let credentials = Credentials::from_lookup(&lookup)?;
    build(&config, &credentials)
}

/// Wire the Linear client into an MCP server.
fn build_server(config: &Config, credentials: &Credentials) -> anyhow::Result<McpServer> {
    let client = match config.linear.api_url.as_deref() {
        Some(url) => LinearClient::with_base_url(url, credentials.api_key()),
        None => LinearClient::new(credentials.api_key()),
    };
    tracing::debug!(url = %client.base_url(), "Using Linear API");

    let tracker: Arc<dyn IssueTracker> = Arc::new(client);
    let registry = CapabilityRegistry::linear(tracker)?;
    Ok(McpServer::new(registry).with_server_config(&config.server))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from([
            "linear-mcp",
            "-v",
            "--env-file",
            "/tmp/linear.env",
            "--config",
            "/tmp/config.toml",
        ]);

        assert!(cli.verbose);
        assert_eq!(cli.env_file, Some(PathBuf::from("/tmp/linear.env")));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/config.toml")));
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["linear-mcp"]);

        assert!(!cli.verbose);
        assert!(cli.env_file.is_none());
        assert!(cli.config.is_none());
    }

    fn cli_in(dir: &std::path::Path) -> Cli {
        Cli {
            verbose: false,
            env_file: Some(dir.join("missing.env")),
            config: Some(dir.join("missing.toml")),
        }
    }

    #[test]
    fn test_missing_credential_fails_before_build() {
        let dir = tempfile::tempdir().unwrap();
        let mut built = false;

        let result = prepare(&cli_in(dir.path()), |_| None, |config, credentials| {
            built = true;
            build_server(config, credentials)
        });

        let err = result.err().unwrap();
        assert!(err.to_string().contains("LINEAR_API_KEY"), "{}", err);
        assert!(!built);
    }

    #[test]
    fn test_prepare_with_credential_builds_server() {
        let dir = tempfile::tempdir().unwrap();
        let mut built = false;

        let server = prepare(
            &cli_in(dir.path()),
            |name| (name == "LINEAR_API_KEY").then(|| "lin_api_test".to_string()),
            |config, credentials| {
                built = true;
                assert_eq!(credentials.api_key(), "lin_api_test");
                assert!(config.linear.api_url.is_none());
                build_server(config, credentials)
            },
        )
        .unwrap();

        assert!(built);
        assert!(server.registry().tool("create-issue").is_some());
    }

    #[test]
    fn test_build_server_registers_linear_capabilities() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[linear]\napi_url = \"http://localhost:9999/graphql\"\n\n[server]\nname = \"linear-dev\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        let server = build_server(&config, &Credentials::new("lin_api_test")).unwrap();

        let registry = server.registry();
        assert!(registry.tool("create-issue").is_some());
        assert!(registry.resource("linear://teams").is_some());
        assert!(registry.prompt("create-task-template").is_some());
    }
}
