use anyhow::{Context, Result};
use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::Client as DynamoClient;
use tracing::info;
use trip_handler::provision::ensure_table;
use trip_handler::Config;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .json()
        .init();

    let config = Config::from_env();
    let sdk_config = aws_config::defaults(BehaviorVersion::latest()).load().await;
    let client = DynamoClient::new(&sdk_config);

    let outcome = ensure_table(&client, &config.table_name)
        .await
        .with_context(|| format!("provisioning table {}", config.table_name))?;

    info!(table = %config.table_name, outcome = %outcome, "Trips table ready");
    Ok(())
}
