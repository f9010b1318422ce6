//! Declares the trips table: partition key `id` (S), pay-per-request billing,
//! deletion protection on. Existing tables are checked, never modified.

use crate::trip::ID_ATTRIBUTE;
use aws_sdk_dynamodb::error::{BuildError, SdkError};
use aws_sdk_dynamodb::operation::create_table::CreateTableError;
use aws_sdk_dynamodb::operation::describe_table::DescribeTableError;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, KeySchemaElement, KeyType, ScalarAttributeType,
};
use aws_sdk_dynamodb::Client as DynamoClient;
use std::fmt;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("Failed to describe table: {0:?}")]
    Describe(#[from] SdkError<DescribeTableError>),

    #[error("Failed to create table: {0:?}")]
    Create(#[from] SdkError<CreateTableError>),

    #[error("Invalid table definition: {0}")]
    Definition(#[from] BuildError),

    #[error("Table {0} exists but is not keyed by a single string `id` partition key")]
    KeySchemaMismatch(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionOutcome {
    Created,
    AlreadyExists,
}

impl fmt::Display for ProvisionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::AlreadyExists => write!(f, "already_exists"),
        }
    }
}

pub fn key_schema() -> Result<KeySchemaElement, BuildError> {
    KeySchemaElement::builder()
        .attribute_name(ID_ATTRIBUTE)
        .key_type(KeyType::Hash)
        .build()
}

pub fn key_attribute() -> Result<AttributeDefinition, BuildError> {
    AttributeDefinition::builder()
        .attribute_name(ID_ATTRIBUTE)
        .attribute_type(ScalarAttributeType::S)
        .build()
}

/// True when the table is keyed by `id` (S) alone, with no sort key.
pub fn key_schema_matches(
    key_schema: &[KeySchemaElement],
    attribute_definitions: &[AttributeDefinition],
) -> bool {
    let [partition_key] = key_schema else {
        return false;
    };

    partition_key.attribute_name() == ID_ATTRIBUTE
        && *partition_key.key_type() == KeyType::Hash
        && attribute_definitions.iter().any(|definition| {
            definition.attribute_name() == ID_ATTRIBUTE
                && *definition.attribute_type() == ScalarAttributeType::S
        })
}

pub async fn ensure_table(
    client: &DynamoClient,
    table_name: &str,
) -> Result<ProvisionOutcome, ProvisionError> {
    match client.describe_table().table_name(table_name).send().await {
        Ok(output) => {
            let matches = output.table().is_some_and(|table| {
                key_schema_matches(table.key_schema(), table.attribute_definitions())
            });

            if !matches {
                return Err(ProvisionError::KeySchemaMismatch(table_name.to_string()));
            }

            info!("Table {} already exists", table_name);
            Ok(ProvisionOutcome::AlreadyExists)
        }
        Err(err)
            if err
                .as_service_error()
                .is_some_and(|e| e.is_resource_not_found_exception()) =>
        {
            warn!("Table {} not found, creating it", table_name);
            create_table(client, table_name).await?;
            Ok(ProvisionOutcome::Created)
        }
        Err(err) => Err(err.into()),
    }
}

async fn create_table(client: &DynamoClient, table_name: &str) -> Result<(), ProvisionError> {
    client
        .create_table()
        .table_name(table_name)
        .attribute_definitions(key_attribute()?)
        .key_schema(key_schema()?)
        .billing_mode(BillingMode::PayPerRequest)
        .deletion_protection_enabled(true)
        .send()
        .await?;

    info!("Created table {}", table_name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(name: &str, key_type: KeyType) -> KeySchemaElement {
        KeySchemaElement::builder()
            .attribute_name(name)
            .key_type(key_type)
            .build()
            .unwrap()
    }

    fn definition(name: &str, attribute_type: ScalarAttributeType) -> AttributeDefinition {
        AttributeDefinition::builder()
            .attribute_name(name)
            .attribute_type(attribute_type)
            .build()
            .unwrap()
    }

    #[test]
    fn test_declared_schema_matches() {
        let schema = [key_schema().unwrap()];
        let definitions = [key_attribute().unwrap()];
        assert!(key_schema_matches(&schema, &definitions));
    }

    #[test]
    fn test_sort_key_does_not_match() {
        let schema = [
            element("id", KeyType::Hash),
            element("started_at", KeyType::Range),
        ];
        let definitions = [
            definition("id", ScalarAttributeType::S),
            definition("started_at", ScalarAttributeType::N),
        ];
        assert!(!key_schema_matches(&schema, &definitions));
    }

    #[test]
    fn test_numeric_id_does_not_match() {
        let schema = [element("id", KeyType::Hash)];
        let definitions = [definition("id", ScalarAttributeType::N)];
        assert!(!key_schema_matches(&schema, &definitions));
    }

    #[test]
    fn test_other_partition_key_does_not_match() {
        let schema = [element("pk", KeyType::Hash)];
        let definitions = [definition("pk", ScalarAttributeType::S)];
        assert!(!key_schema_matches(&schema, &definitions));
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(ProvisionOutcome::Created.to_string(), "created");
        assert_eq!(ProvisionOutcome::AlreadyExists.to_string(), "already_exists");
    }
}
