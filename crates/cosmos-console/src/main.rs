//! CLI entry point for the Cosmos DB Gremlin console sample.

use std::io::{self, Write};

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use cosmos_graph::{GraphConfig, GremlinDriver};

use cosmos_console::catalog::QueryCatalog;
use cosmos_console::runner::QueryRunner;

#[derive(Parser)]
#[command(name = "cosmos-console")]
#[command(about = "Runs the Gremlin getting-started queries against a Cosmos DB graph")]
struct Cli {
    /// Config file prefix (default: cosmos).
    #[arg(short, long, default_value = "cosmos")]
    config: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // Keep stdout for query output; logs go to stderr.
    fmt().with_env_filter(filter).with_writer(io::stderr).init();

    let cli = Cli::parse();
    let config = load_graph_config(&cli.config);
    let catalog = QueryCatalog::getting_started(&config.partition_key_property);

    let session = GremlinDriver::connect(&config).await?;

    let mut runner = QueryRunner::new(io::stdout());
    runner.run(session, &catalog).await?;

    tracing::info!(queries = catalog.len(), "Catalog run finished");

    // Hold the console open until the user acknowledges.
    println!("Done. Press any key to exit...");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;

    Ok(())
}

fn load_graph_config(file_prefix: &str) -> GraphConfig {
    let cfg = config::Config::builder()
        .add_source(config::File::with_name(file_prefix).required(false))
        .add_source(
            config::Environment::with_prefix("COSMOS")
                .separator("__")
                .try_parsing(true),
        )
        .build();

    match cfg {
        Ok(c) => c.get::<GraphConfig>("cosmos").unwrap_or_default(),
        Err(_) => GraphConfig::default(),
    }
}
