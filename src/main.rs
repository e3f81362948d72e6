//! CLI entry point for content-gate

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use content_gate::content::ContentRepository;
use content_gate::gate::RouteGate;

#[derive(Parser)]
#[command(name = "content-gate")]
#[command(version = "0.1.0")]
#[command(about = "Read-only content API with route allow-listing", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on (defaults to the configured port)
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to (defaults to the configured address)
        #[arg(short, long)]
        ip: Option<String>,
    },

    /// Validate configuration, gate policy, and content
    Check,

    /// List loaded content
    List {
        /// Type of content to list (post, page, category)
        #[arg(default_value = "post")]
        r#type: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "content_gate=debug,info"
    } else {
        "content_gate=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_dir = cli.cwd.unwrap_or_else(|| std::env::current_dir().unwrap());
    let app = content_gate::ContentGate::new(&base_dir)?;

    match cli.command {
        Commands::Serve { port, ip } => {
            let port = port.unwrap_or(app.config.port);
            let ip = ip.unwrap_or_else(|| app.config.bind.clone());
            tracing::info!("Starting API server at http://{}:{}", ip, port);
            content_gate::server::start(&app, &ip, port).await?;
        }

        Commands::Check => {
            RouteGate::from_config(&app.config.gate)?;
            let store = app.load_store()?;
            content_gate::api::fields::validate(&app.config.fields, &store)?;
            println!(
                "OK: {} items, {} categories, {} allow patterns",
                store.items().len(),
                store.category_slugs().len(),
                app.config.gate.allowed_patterns.len()
            );
        }

        Commands::List { r#type } => {
            let store = app.load_store()?;
            list_content(&store, &r#type);
        }
    }

    Ok(())
}

/// List loaded content by type
fn list_content(store: &content_gate::content::MemoryStore, content_type: &str) {
    use content_gate::content::ContentKind;

    match content_type {
        "post" | "posts" => {
            let posts: Vec<_> = store
                .items()
                .iter()
                .filter(|i| i.kind == ContentKind::Post)
                .collect();
            println!("Posts ({}):", posts.len());
            for post in posts {
                println!(
                    "  {} - {} [{}]",
                    post.date.format("%Y-%m-%d"),
                    post.title,
                    post.categories.join(",")
                );
            }
        }
        "page" | "pages" => {
            let pages: Vec<_> = store
                .items()
                .iter()
                .filter(|i| i.kind == ContentKind::Page)
                .collect();
            println!("Pages ({}):", pages.len());
            for page in pages {
                println!("  {} [{}]", page.title, page.slug);
            }
        }
        "category" | "categories" => {
            let slugs = store.category_slugs();
            println!("Categories ({}):", slugs.len());
            for slug in slugs {
                println!("  {}", slug);
            }
        }
        other => {
            println!("Unknown content type: {}", other);
        }
    }
}
