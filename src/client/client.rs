use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::client::{auth::AirtableAuth, error::ClientError, types::*};
use crate::config::AirtableConfig;

pub type Result<T> = std::result::Result<T, ClientError>;

/// HTTP client for one Airtable base.
///
/// Cheap to clone: the underlying `reqwest::Client` shares its connection pool.
#[derive(Debug, Clone)]
pub struct AirtableClient {
    base_url: String,
    client: Client,
    auth: AirtableAuth,
}

impl AirtableClient {
    pub fn new(config: &AirtableConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: &AirtableConfig) -> Self {
        let auth = AirtableAuth::new(config.token.clone());
        if !auth.is_configured() {
            tracing::warn!("Airtable token is empty; every outbound call will be rejected");
        }
        Self {
            base_url: config.base_url(),
            client,
            auth,
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.base_url, urlencoding::encode(table))
    }

    fn record_url(&self, table: &str, id: &str) -> String {
        format!("{}/{}", self.table_url(table), urlencoding::encode(id))
    }

    // Record operations
    pub async fn create_record(&self, table: &str, fields: Fields) -> Result<Record> {
        let url = self.table_url(table);
        let request = CreateRecordRequest { fields, typecast: true };

        tracing::debug!("Creating record in {} with {} fields", table, request.fields.len());
        self.send(self.client.post(&url).json(&request), &url).await
    }

    /// Create records through the batch form, which returns a `records` array.
    pub async fn create_records(&self, table: &str, records: Vec<Fields>) -> Result<Vec<Record>> {
        let url = self.table_url(table);
        let request = CreateRecordsRequest {
            records: records.into_iter().map(|fields| NewRecord { fields }).collect(),
            typecast: true,
        };

        tracing::debug!("Creating {} record(s) in {}", request.records.len(), table);
        let created: CreatedRecords = self.send(self.client.post(&url).json(&request), &url).await?;
        Ok(created.records)
    }

    /// List records. Decode into [`RecordList`], or into `serde_json::Value` to
    /// keep Airtable's body exactly as sent.
    pub async fn list_records<T: DeserializeOwned>(&self, table: &str, params: &ListParams) -> Result<T> {
        let mut url = self.table_url(table);
        let query = params.to_query();
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }

        tracing::debug!("Listing records from {}", table);
        self.send(self.client.get(&url), &url).await
    }

    /// Fetch one record. With `by_field_id` the `fields` map is keyed by field id.
    pub async fn get_record<T: DeserializeOwned>(&self, table: &str, id: &str, by_field_id: bool) -> Result<T> {
        let mut url = self.record_url(table, id);
        if by_field_id {
            url.push_str("?returnFieldsByFieldId=true");
        }

        self.send(self.client.get(&url), &url).await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, url: &str) -> Result<T> {
        tracing::debug!(
            "Making request to: {} (token {})",
            url,
            self.auth.token_preview()
        );

        let response = request
            .header("Authorization", self.auth.auth_header())
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Network error calling Airtable: {}", e);
                ClientError::Transport(e)
            })?;

        let status = response.status();
        tracing::debug!("Airtable response status: {}", status);

        let bytes = response.bytes().await.map_err(ClientError::Transport)?;

        if !status.is_success() {
            let body = serde_json::from_slice::<Value>(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
            tracing::error!("Airtable request failed with status {}: {}", status, body);
            return Err(ClientError::Upstream { status, body });
        }

        serde_json::from_slice(&bytes).map_err(|e| {
            tracing::error!("Failed to parse Airtable response: {}", e);
            ClientError::Decode(e.to_string())
        })
    }
}
