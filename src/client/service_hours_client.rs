use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use crate::{
    models::DayScheduleRecord,
    schedule::{FetchError, SaveError, SchedulePort},
};

/// `SchedulePort` over the service-hours REST API.
#[derive(Clone)]
pub struct HttpScheduleClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpScheduleClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    fn url(&self, restaurant_id: i32) -> String {
        format!("{}/api/restaurants/{}/service-hours", self.base_url, restaurant_id)
    }
}

#[async_trait]
impl SchedulePort for HttpScheduleClient {
    async fn fetch_schedule(&self, restaurant_id: i32) -> Result<Vec<DayScheduleRecord>, FetchError> {
        let url = self.url(restaurant_id);
        tracing::debug!(restaurant_id, url, "Fetching service hours");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, restaurant_id, "Failed to call service hours API");
                FetchError::new(e.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body, restaurant_id, "Service hours API returned error");
            return Err(FetchError::new(format!("Service hours API error: {} - {}", status, body)));
        }

        let records: Vec<DayScheduleRecord> = response.json().await.map_err(|e| {
            tracing::error!(error = %e, restaurant_id, "Failed to parse service hours response");
            FetchError::new(format!("Failed to parse service hours response: {}", e))
        })?;

        tracing::debug!(restaurant_id, count = records.len(), "Fetched service hours");
        Ok(records)
    }

    async fn replace_schedule(&self, restaurant_id: i32, records: Vec<DayScheduleRecord>) -> Result<(), SaveError> {
        let url = self.url(restaurant_id);
        tracing::debug!(restaurant_id, url, count = records.len(), "Replacing service hours");

        let response = self
            .client
            .put(&url)
            .header("X-Api-Key", &self.api_key)
            .json(&records)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, restaurant_id, "Failed to call service hours API");
                SaveError::new(Some(e.to_string()))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body, restaurant_id, "Service hours API rejected write");
            return Err(SaveError::new(error_message(&body)));
        }

        Ok(())
    }
}

/// Pulls the `error` field out of an `{"error": "..."}` body, falling back
/// to the raw body when it is not JSON.
fn error_message(body: &str) -> Option<String> {
    if body.trim().is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(body) {
        Ok(value) => value
            .get("error")
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| Some(body.to_string())),
        Err(_) => Some(body.to_string()),
    }
}
