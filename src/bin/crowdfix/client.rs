//! CrowdfundFix API Client
//!
//! Thin reqwest wrapper over the `/api/v1` routes.

use anyhow::{anyhow, Result};
use crowdfundfix::marketplace::Dashboard;
use crowdfundfix::storage::BugRecord;
use crowdfundfix::types::MatchResult;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub struct CrowdfixClient {
    client: Client,
    base_url: String,
}

impl CrowdfixClient {
    pub fn new(server_url: &str) -> Self {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: server_url.trim_end_matches('/').to_string(),
        }
    }

    fn api_url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/api/v1/{}", self.base_url, path)
    }

    pub async fn list_bugs(&self) -> Result<Vec<BugRecord>> {
        let resp = self.client.get(self.api_url("bugs")).send().await?;
        read_json(resp, "Failed to fetch bugs").await
    }

    pub async fn match_developers(&self, bug_id: &str) -> Result<Vec<MatchResult>> {
        let url = self.api_url(&format!("ai/match-developers/{}", bug_id));
        let resp = self.client.get(url).send().await?;
        read_json(resp, "Failed to match developers").await
    }

    pub async fn dashboard(&self) -> Result<Dashboard> {
        let resp = self
            .client
            .get(self.api_url("analytics/dashboard"))
            .send()
            .await?;
        read_json(resp, "Failed to fetch dashboard").await
    }
}

async fn read_json<T: DeserializeOwned>(resp: Response, context: &str) -> Result<T> {
    let status = resp.status();
    if status.is_success() {
        Ok(resp.json().await?)
    } else {
        let error_text = resp.text().await.unwrap_or_else(|_| "Unknown error".into());
        Err(anyhow!("{} ({}): {}", context, status, error_text))
    }
}
