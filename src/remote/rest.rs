//! HTTP client for the hosted backend.
//!
//! Speaks PostgREST conventions: per-table endpoints under /rest/v1,
//! equality filters in the query string, and upserts expressed as inserts
//! with an explicit conflict key plus a merge-duplicates preference.

use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{RemoteDailyLog, RemoteError, RemoteProfile, RemoteStore, RemoteWeightLog};

pub struct RestRemote {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl RestRemote {
    pub fn new(server_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: server_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(value) = self.api_key.parse() {
            headers.insert("apikey", value);
        }
        if let Ok(value) = format!("Bearer {}", self.api_key).parse() {
            headers.insert("Authorization", value);
        }
        headers
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        filter: &str,
    ) -> Result<Vec<T>, RemoteError> {
        let url = format!("{}?select=*&{}", self.table_url(table), filter);
        let response = self
            .client
            .get(&url)
            .headers(self.auth_headers())
            .send()
            .await
            .map_err(|e| RemoteError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RemoteError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))
    }

    async fn write<T: Serialize>(
        &self,
        table: &str,
        row: &T,
        on_conflict: Option<&str>,
    ) -> Result<(), RemoteError> {
        let url = match on_conflict {
            Some(key) => format!("{}?on_conflict={}", self.table_url(table), key),
            None => self.table_url(table),
        };
        let prefer = if on_conflict.is_some() {
            "resolution=merge-duplicates,return=minimal"
        } else {
            "return=minimal"
        };

        // PostgREST takes an array of rows.
        let response = self
            .client
            .post(&url)
            .headers(self.auth_headers())
            .header("Prefer", prefer)
            .json(&[row])
            .send()
            .await
            .map_err(|e| RemoteError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RemoteError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}

impl RemoteStore for RestRemote {
    async fn fetch_profile(&self, user_id: &str) -> Result<Option<RemoteProfile>, RemoteError> {
        let mut rows: Vec<RemoteProfile> = self
            .select("profiles", &format!("id=eq.{}", user_id))
            .await?;
        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.swap_remove(0))
        })
    }

    async fn upsert_profile(&self, row: &RemoteProfile) -> Result<(), RemoteError> {
        self.write("profiles", row, Some("id")).await
    }

    async fn fetch_weight_logs(&self, user_id: &str) -> Result<Vec<RemoteWeightLog>, RemoteError> {
        self.select("weight_logs", &format!("user_id=eq.{}", user_id))
            .await
    }

    async fn insert_weight_log(&self, row: &RemoteWeightLog) -> Result<(), RemoteError> {
        self.write("weight_logs", row, None).await
    }

    async fn upsert_weight_log(&self, row: &RemoteWeightLog) -> Result<(), RemoteError> {
        self.write("weight_logs", row, Some("user_id,date")).await
    }

    async fn fetch_daily_logs(&self, user_id: &str) -> Result<Vec<RemoteDailyLog>, RemoteError> {
        self.select("daily_logs", &format!("user_id=eq.{}", user_id))
            .await
    }

    async fn insert_daily_log(&self, row: &RemoteDailyLog) -> Result<(), RemoteError> {
        self.write("daily_logs", row, None).await
    }

    async fn upsert_daily_log(&self, row: &RemoteDailyLog) -> Result<(), RemoteError> {
        self.write("daily_logs", row, Some("user_id,date")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let remote = RestRemote::new("https://example.supabase.co/", "key");
        assert_eq!(
            remote.table_url("weight_logs"),
            "https://example.supabase.co/rest/v1/weight_logs"
        );
    }

    #[test]
    fn test_auth_headers_present() {
        let remote = RestRemote::new("https://example.supabase.co", "secret-key");
        let headers = remote.auth_headers();
        assert_eq!(headers.get("apikey").unwrap(), "secret-key");
        assert_eq!(headers.get("Authorization").unwrap(), "Bearer secret-key");
    }
}
