use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use itemstore::cli::{execute, Cli};
use itemstore::storage::DynamoDbStore;
use itemstore::{metadata, Config, TableRepository};
use itemstore_core::{RequestContext, RequestId};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = Config::from_env();
    if let Some(table) = cli.table.clone() {
        config.table_name = table;
    }
    if let Some(region) = cli.region.clone() {
        config.region = region;
    }
    if let Some(url) = cli.endpoint_url.clone() {
        config.endpoint_url = Some(url);
    }
    if let Some(policy) = cli.read_errors {
        config.read_error_policy = policy;
    }

    let ctx = RequestContext::new(RequestId::from_header(cli.request_id.as_deref()));
    metadata::log_input(&ctx, &format!("{:?}", cli.command));
    tracing::info!(request_id = %ctx.request_id, table = %config.table_name, "Using {}", config.target_display());

    let store = DynamoDbStore::connect(&config).await;
    let repository =
        TableRepository::new(store, &config.table_name).with_read_error_policy(config.read_error_policy);

    let response = execute(&repository, &ctx, cli.command).await;
    println!("{}", serde_json::to_string_pretty(&response)?);

    if !response.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

/// Logs go to stderr so stdout carries only the response envelope.
/// `LOG_FORMAT=json` switches to one JSON object per event.
fn init_tracing() {
    let json = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "itemstore=info".into()),
        )
        .with(json.then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();
}
