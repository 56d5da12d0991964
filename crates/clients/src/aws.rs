//! AWS implementations of the collaborator traits
//!
//! - Lookup table: DynamoDB `GetItem` on (`application`, `version`)
//! - Queues: SQS `GetQueueUrl` / `SendMessage` / `DeleteMessage`
//! - Object store: S3 `PutObject`, private ACL, one client per target region

use std::collections::HashMap;

use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_sdk_sqs::operation::get_queue_url::GetQueueUrlError;
use aws_sdk_sqs::types::MessageAttributeValue;
use bytes::Bytes;
use contracts::{
    ApplicationRecord, ContractError, LookupKey, LookupTable, ObjectStore, QueueClient,
};
use tracing::{debug, instrument};

/// Item attribute holding the application name (partition key)
pub const ITEM_APPLICATION: &str = "application";
/// Item attribute holding the version (sort key)
pub const ITEM_VERSION: &str = "version";
/// Item attribute holding the configured sink name
pub const ITEM_SINK_NAME: &str = "loghandler";

/// Load shared SDK configuration for `region`
pub async fn load_sdk_config(region: &str) -> SdkConfig {
    aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.to_string()))
        .load()
        .await
}

/// DynamoDB-backed application lookup table
pub struct DynamoLookupTable {
    client: aws_sdk_dynamodb::Client,
    table_name: String,
}

impl DynamoLookupTable {
    pub fn new(sdk_config: &SdkConfig, table_name: impl Into<String>) -> Self {
        Self {
            client: aws_sdk_dynamodb::Client::new(sdk_config),
            table_name: table_name.into(),
        }
    }
}

/// Build a record from a table item
///
/// An absent attribute reads as empty; one of any type other than string is
/// a lookup error.
fn record_from_item(
    table: &str,
    item: &HashMap<String, AttributeValue>,
) -> Result<ApplicationRecord, ContractError> {
    let string_attribute = |name: &str| match item.get(name) {
        None => Ok(String::new()),
        Some(AttributeValue::S(value)) => Ok(value.clone()),
        Some(_) => Err(ContractError::lookup(
            table,
            format!("item attribute '{name}' is not a string"),
        )),
    };

    Ok(ApplicationRecord::new(
        string_attribute(ITEM_APPLICATION)?,
        string_attribute(ITEM_VERSION)?,
        string_attribute(ITEM_SINK_NAME)?,
    ))
}

impl LookupTable for DynamoLookupTable {
    fn table_name(&self) -> &str {
        &self.table_name
    }

    #[instrument(name = "dynamo_lookup_get", skip(self), fields(table = %self.table_name, key = %key))]
    async fn get(&self, key: &LookupKey) -> Result<Option<ApplicationRecord>, ContractError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(ITEM_APPLICATION, AttributeValue::S(key.application().to_string()))
            .key(ITEM_VERSION, AttributeValue::S(key.version().to_string()))
            .send()
            .await
            .map_err(|e| ContractError::lookup(&self.table_name, e.to_string()))?;

        output
            .item()
            .map(|item| record_from_item(&self.table_name, item))
            .transpose()
    }
}

/// SQS queue system
pub struct SqsQueues {
    client: aws_sdk_sqs::Client,
}

impl SqsQueues {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self {
            client: aws_sdk_sqs::Client::new(sdk_config),
        }
    }
}

impl QueueClient for SqsQueues {
    #[instrument(name = "sqs_resolve_address", skip(self), fields(queue = %name))]
    async fn resolve_address(&self, name: &str) -> Result<Option<String>, ContractError> {
        let output = match self.client.get_queue_url().queue_name(name).send().await {
            Ok(output) => output,
            Err(e) if e.as_service_error().is_some_and(is_missing_queue) => {
                debug!("Queue does not exist");
                return Ok(None);
            }
            Err(e) => return Err(ContractError::queue(name, e.to_string())),
        };
        Ok(output.queue_url().map(str::to_string))
    }

    #[instrument(
        name = "sqs_send",
        skip(self, body, attributes),
        fields(address = %address, attributes = attributes.len())
    )]
    async fn send(
        &self,
        address: &str,
        body: &str,
        attributes: &HashMap<String, String>,
    ) -> Result<(), ContractError> {
        let mut request = self.client.send_message().queue_url(address).message_body(body);

        for (name, value) in attributes {
            let attr = MessageAttributeValue::builder()
                .data_type("String")
                .string_value(value)
                .build()
                .map_err(|e| ContractError::queue(address, e.to_string()))?;
            request = request.message_attributes(name, attr);
        }

        let output = request
            .send()
            .await
            .map_err(|e| ContractError::queue(address, e.to_string()))?;
        debug!(message_id = ?output.message_id(), "Message forwarded");
        Ok(())
    }

    #[instrument(name = "sqs_delete", skip(self, deletion_token), fields(address = %address))]
    async fn delete(&self, address: &str, deletion_token: &str) -> Result<(), ContractError> {
        self.client
            .delete_message()
            .queue_url(address)
            .receipt_handle(deletion_token)
            .send()
            .await
            .map_err(|e| ContractError::queue(address, e.to_string()))?;
        Ok(())
    }
}

fn is_missing_queue(error: &GetQueueUrlError) -> bool {
    error.is_queue_does_not_exist()
}

/// S3 object store
///
/// The target region comes with every put, so the client is rebuilt from the
/// shared SDK config when it differs from the config's own region.
pub struct S3ObjectStore {
    sdk_config: SdkConfig,
    client: aws_sdk_s3::Client,
}

impl S3ObjectStore {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self {
            sdk_config: sdk_config.clone(),
            client: aws_sdk_s3::Client::new(sdk_config),
        }
    }

    fn client_for(&self, region: &str) -> aws_sdk_s3::Client {
        let same_region = self
            .sdk_config
            .region()
            .is_some_and(|r| r.as_ref() == region);
        if same_region {
            return self.client.clone();
        }
        let config = aws_sdk_s3::config::Builder::from(&self.sdk_config)
            .region(Region::new(region.to_string()))
            .build();
        aws_sdk_s3::Client::from_conf(config)
    }
}

impl ObjectStore for S3ObjectStore {
    #[instrument(
        name = "s3_put_object",
        skip(self, body),
        fields(region = %region, bucket = %bucket, key = %key, bytes = body.len())
    )]
    async fn put(
        &self,
        region: &str,
        bucket: &str,
        key: &str,
        body: Bytes,
    ) -> Result<(), ContractError> {
        let size = body.len();
        self.client_for(region)
            .put_object()
            .bucket(bucket)
            .key(key)
            .acl(ObjectCannedAcl::Private)
            .content_type("application/octet-stream")
            .content_length(size as i64)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| ContractError::object_store(bucket, key, e.to_string()))?;
        Ok(())
    }
}
