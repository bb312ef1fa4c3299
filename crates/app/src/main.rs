mod server;

use anyhow::Context;
use catalog_search_core::{
    load_products, IndexConfig, OpenSearchStore, ProductIndex, SearchParameters, SearchService,
};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "catalog-search", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Search index base URL
    #[arg(long, env = "CATALOG_SEARCH_URL", default_value = "http://localhost:9200")]
    index_url: String,

    /// Search index name
    #[arg(long, env = "CATALOG_SEARCH_INDEX", default_value = "products")]
    index_name: String,

    /// Language analyzer for name and description
    #[arg(long, env = "CATALOG_SEARCH_ANALYZER", default_value = "spanish")]
    analyzer: String,

    /// Connect timeout towards the index, in milliseconds
    #[arg(long, env = "CATALOG_SEARCH_CONNECT_TIMEOUT_MS", default_value = "2000")]
    connect_timeout_ms: u64,

    /// Timeout for a whole index round-trip, in milliseconds
    #[arg(long, env = "CATALOG_SEARCH_TIMEOUT_MS", default_value = "10000")]
    timeout_ms: u64,

    /// Maximum number of hits returned per search
    #[arg(long, env = "CATALOG_SEARCH_MAX_RESULTS", default_value = "100")]
    max_results: usize,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the search endpoint over HTTP.
    Serve {
        #[arg(long, env = "CATALOG_SEARCH_BIND", default_value = "127.0.0.1:8000")]
        bind: SocketAddr,
    },
    /// Run one search and print the JSON response.
    Search {
        #[arg(long, default_value = "")]
        query: String,
        #[arg(long, allow_hyphen_values = true)]
        price_min: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        price_max: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, default_value_t = false)]
        available: bool,
    },
    /// Create the index if needed and load products from a JSON file.
    Index {
        /// JSON array of products.
        #[arg(long)]
        file: PathBuf,
    },
}

impl Cli {
    fn index_config(&self) -> IndexConfig {
        IndexConfig {
            endpoint: self.index_url.clone(),
            index_name: self.index_name.clone(),
            analyzer: self.analyzer.clone(),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.timeout_ms),
            max_results: self.max_results,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_version = env!("CARGO_PKG_VERSION");

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = cli.index_config();
    let store = OpenSearchStore::new(&config).context("invalid index configuration")?;

    info!(
        version = app_version,
        index = %config.index_name,
        endpoint = %config.endpoint,
        started_at = %Utc::now().to_rfc3339(),
        "catalog-search boot"
    );

    match cli.command {
        Command::Serve { bind } => {
            let service = Arc::new(SearchService::new(store, &config));
            let app = server::router(service);

            let listener = tokio::net::TcpListener::bind(bind)
                .await
                .with_context(|| format!("failed to bind {bind}"))?;
            info!(%bind, "serving search endpoint");

            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await?;
        }
        Command::Search {
            query,
            price_min,
            price_max,
            category,
            available,
        } => {
            let mut pairs = vec![("query", query)];
            pairs.extend(price_min.map(|value| ("price_min", value)));
            pairs.extend(price_max.map(|value| ("price_max", value)));
            pairs.extend(category.map(|value| ("category", value)));
            if available {
                pairs.push(("available", "true".to_string()));
            }

            let params = SearchParameters::from_pairs(pairs)
                .map_err(|error| anyhow::anyhow!(error.to_string()))?;
            let service = SearchService::new(store, &config);
            let response = service
                .search(&params)
                .await
                .map_err(|error| anyhow::anyhow!(error.public_message()))?;

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::Index { file } => {
            let products = load_products(&file)
                .with_context(|| format!("failed to load {}", file.display()))?;

            store
                .ensure_index()
                .await
                .map_err(|error| anyhow::anyhow!(error.to_string()))?;
            store
                .index_products(&products)
                .await
                .map_err(|error| anyhow::anyhow!(error.to_string()))?;

            info!(count = products.len(), index = %store.index_name(), "products indexed");
            println!(
                "{} products indexed at {}",
                products.len(),
                Utc::now().to_rfc3339()
            );
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
