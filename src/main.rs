use anyhow::Result;
use arxiv_paper_mcp::config::{find_config_file, load_layered, Config};
use arxiv_paper_mcp::mcp::{McpServer, ToolRegistry};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// arXiv Paper MCP - search arXiv and extract the full text of papers
#[derive(Parser, Debug)]
#[command(name = "arxiv-paper-mcp")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Search arXiv and extract paper content (HTML first, PDF fallback)", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (-v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short)]
    quiet: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the MCP server (stdio unless --http is given)
    Serve {
        /// Serve streamable HTTP instead of stdio
        #[arg(long)]
        http: bool,

        /// Port for HTTP mode
        #[arg(long, short, default_value_t = 3000)]
        port: u16,

        /// Host to bind to for HTTP mode
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Search arXiv
    #[command(alias = "s")]
    Search {
        /// Search keywords
        query: String,

        /// Maximum number of results
        #[arg(long, short, default_value_t = 5)]
        max_results: usize,
    },

    /// Print the PDF download link for a paper
    PdfUrl {
        /// arXiv URL or identifier
        input: String,
    },

    /// Extract the full text of a paper
    Parse {
        /// arXiv URL or identifier
        input: String,

        /// JSON file with paper metadata (title, summary, published, authors)
        #[arg(long)]
        info: Option<PathBuf>,
    },

    /// Print the raw recent-submissions listing
    Recent,

    /// Print the effective configuration as TOML
    Config,
}

fn resolve_config(path: Option<&PathBuf>) -> Result<Config> {
    let path = path.cloned().or_else(find_config_file);
    if let Some(path) = &path {
        tracing::info!("Using config file: {}", path.display());
    }
    Ok(load_layered(path.as_deref())?)
}

fn init_tracing(cli: &Cli, config: &Config) {
    let level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => config.logging.level.as_str(),
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| format!("arxiv_paper_mcp={}", level)),
    );

    // stdout carries the stdio protocol
    if config.logging.format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Run one tool and print its text, failing on an error-flagged response
async fn run_tool(config: &Config, name: &str, args: serde_json::Value) -> Result<()> {
    let registry = ToolRegistry::from_config(config)?;
    let response = registry.call(name, args).await;
    if response.is_error {
        anyhow::bail!("{}", response.first_text());
    }
    println!("{}", response.first_text());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(cli.config.as_ref())?;
    init_tracing(&cli, &config);

    match cli.command {
        None | Some(Commands::Serve { http: false, .. }) => {
            let server = McpServer::new(&config)?;
            server.run().await?;
        }

        Some(Commands::Serve {
            http: true,
            port,
            host,
        }) => {
            let server = McpServer::new(&config)?;
            let addr = format!("{}:{}", host, port);
            let (bound_addr, handle) = server.run_http(&addr).await?;
            tracing::info!("MCP server listening on {}", bound_addr);

            handle
                .await
                .map_err(|e| anyhow::anyhow!("Server task failed: {}", e))?;
        }

        Some(Commands::Search { query, max_results }) => {
            run_tool(
                &config,
                "search_arxiv",
                serde_json::json!({ "query": query, "maxResults": max_results }),
            )
            .await?;
        }

        Some(Commands::PdfUrl { input }) => {
            run_tool(&config, "get_arxiv_pdf_url", serde_json::json!({ "input": input })).await?;
        }

        Some(Commands::Parse { input, info }) => {
            let mut args = serde_json::json!({ "input": input });
            if let Some(path) = info {
                let paper_info: serde_json::Value =
                    serde_json::from_str(&std::fs::read_to_string(&path)?)?;
                args["paperInfo"] = paper_info;
            }
            run_tool(&config, "parse_paper_content", args).await?;
        }

        Some(Commands::Recent) => {
            run_tool(&config, "get_recent_ai_papers", serde_json::json!({})).await?;
        }

        Some(Commands::Config) => {
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["arxiv-paper-mcp"]);
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
        assert!(cli.config.is_none());
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_verbose_flag() {
        let cli = Cli::parse_from(["arxiv-paper-mcp", "-vv"]);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::parse_from(["arxiv-paper-mcp", "serve"]);
        match cli.command {
            Some(Commands::Serve { http, port, host }) => {
                assert!(!http);
                assert_eq!(port, 3000);
                assert_eq!(host, "127.0.0.1");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_serve_http() {
        let cli = Cli::parse_from(["arxiv-paper-mcp", "serve", "--http", "-p", "8080"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Serve { http: true, port: 8080, .. })
        ));
    }

    #[test]
    fn test_search_command() {
        let cli = Cli::parse_from(["arxiv-paper-mcp", "search", "graph networks", "-m", "10"]);
        match cli.command {
            Some(Commands::Search { query, max_results }) => {
                assert_eq!(query, "graph networks");
                assert_eq!(max_results, 10);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_command_with_info() {
        let cli = Cli::parse_from([
            "arxiv-paper-mcp",
            "--config",
            "custom.toml",
            "parse",
            "2403.15137v1",
            "--info",
            "paper.json",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        match cli.command {
            Some(Commands::Parse { input, info }) => {
                assert_eq!(input, "2403.15137v1");
                assert_eq!(info, Some(PathBuf::from("paper.json")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_pdf_url_and_config_commands() {
        let cli = Cli::parse_from(["arxiv-paper-mcp", "pdf-url", "2403.15137"]);
        assert!(matches!(cli.command, Some(Commands::PdfUrl { .. })));

        let cli = Cli::parse_from(["arxiv-paper-mcp", "config"]);
        assert!(matches!(cli.command, Some(Commands::Config)));
    }

    #[test]
    fn test_resolve_config_missing_file() {
        assert!(resolve_config(Some(&PathBuf::from("/nonexistent/config.toml"))).is_err());
    }
}
