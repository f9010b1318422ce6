use super::{PageRequest, TripPage, TripStore};
use crate::config::Config;
use crate::error::TripResult;
use crate::trip::{Trip, ID_ATTRIBUTE};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::{types::AttributeValue, Client as DynamoClient};
use serde_dynamo::{from_items, to_item};
use std::collections::HashMap;
use tracing::debug;

pub struct DynamoTripStore {
    dynamo_client: DynamoClient,
    table_name: String,
}

impl DynamoTripStore {
    pub fn new(dynamo_client: DynamoClient, table_name: impl Into<String>) -> Self {
        Self {
            dynamo_client,
            table_name: table_name.into(),
        }
    }

    /// Builds a store from the ambient AWS configuration (region, credentials
    /// and `AWS_ENDPOINT_URL` come from the environment).
    pub async fn from_config(config: &Config) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest()).load().await;
        Self::new(DynamoClient::new(&sdk_config), config.table_name.clone())
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

#[async_trait]
impl TripStore for DynamoTripStore {
    async fn scan(&self, page: PageRequest) -> TripResult<TripPage> {
        let mut scan_request = self.dynamo_client.scan().table_name(&self.table_name);

        if let Some(limit) = page.limit {
            scan_request = scan_request.limit(scan_limit(limit));
        }

        if let Some(cursor) = page.cursor {
            scan_request = scan_request.set_exclusive_start_key(Some(cursor_key(cursor)));
        }

        let result = scan_request.send().await?;

        let items: Vec<Trip> = from_items(result.items.unwrap_or_default())?;
        let next_cursor = result.last_evaluated_key.as_ref().and_then(cursor_from_key);

        debug!(
            table = %self.table_name,
            returned = items.len(),
            has_more = next_cursor.is_some(),
            "Scanned trips table"
        );

        Ok(TripPage { items, next_cursor })
    }

    async fn put(&self, trip: Trip) -> TripResult<()> {
        let item = to_item(&trip)?;

        self.dynamo_client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await?;

        Ok(())
    }

    async fn delete(&self, id: &str) -> TripResult<()> {
        self.dynamo_client
            .delete_item()
            .table_name(&self.table_name)
            .key(ID_ATTRIBUTE, AttributeValue::S(id.to_string()))
            .send()
            .await?;

        Ok(())
    }
}

fn scan_limit(limit: usize) -> i32 {
    i32::try_from(limit).unwrap_or(i32::MAX)
}

fn cursor_key(cursor: String) -> HashMap<String, AttributeValue> {
    HashMap::from([(ID_ATTRIBUTE.to_string(), AttributeValue::S(cursor))])
}

fn cursor_from_key(key: &HashMap<String, AttributeValue>) -> Option<String> {
    key.get(ID_ATTRIBUTE)
        .and_then(|value| value.as_s().ok())
        .cloned()
}
