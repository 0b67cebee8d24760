//! Authenticated JSON client for the plan backend

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::Config;
use crate::envelope::extract_list;
use crate::error::{ApiError, ApiResult};

/// Thin wrapper over `reqwest::Client` that knows the backend's header and
/// envelope conventions. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Reuse an existing connection pool
    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.api_base_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// GET `path` and return the parsed JSON body
    ///
    /// Anything other than `200 OK` is an error. No retries and no timeout
    /// beyond the transport default.
    pub async fn get_json(
        &self,
        path: &str,
        query: &[(&str, String)],
        access_token: &str,
    ) -> ApiResult<Value> {
        let response = self
            .http
            .get(self.url(path))
            .query(query)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, format!("bearer {}", access_token))
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                path: path.to_string(),
                source,
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ApiError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }

        let text = response.text().await.map_err(|source| ApiError::Transport {
            path: path.to_string(),
            source,
        })?;

        serde_json::from_str(&text).map_err(|source| ApiError::Decode {
            path: path.to_string(),
            source,
        })
    }

    /// GET `path` and unwrap its list envelope
    async fn get_records(
        &self,
        path: &str,
        query: &[(&str, String)],
        access_token: &str,
    ) -> ApiResult<Vec<Value>> {
        let body = self.get_json(path, query, access_token).await?;

        let (shape, records) = extract_list(&body).ok_or_else(|| ApiError::MissingEnvelope {
            path: path.to_string(),
        })?;

        tracing::debug!(
            path = path,
            envelope = %shape,
            records = records.len(),
            "Unwrapped list envelope"
        );

        Ok(records.to_vec())
    }

    /// GET `path`, unwrap its list envelope and decode every record
    ///
    /// Records are returned in server order. One undecodable record fails
    /// the whole list.
    pub async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        access_token: &str,
    ) -> ApiResult<Vec<T>> {
        self.get_records(path, query, access_token)
            .await?
            .into_iter()
            .map(|record| {
                T::deserialize(record).map_err(|source| ApiError::Decode {
                    path: path.to_string(),
                    source,
                })
            })
            .collect()
    }

    /// Like [`get_list`](Self::get_list), but records that fail to decode
    /// are logged and skipped. Transport, status and envelope errors still
    /// fail the call.
    pub async fn get_list_lenient<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        access_token: &str,
    ) -> ApiResult<Vec<T>> {
        let records = self.get_records(path, query, access_token).await?;

        Ok(records
            .into_iter()
            .enumerate()
            .filter_map(|(index, record)| match T::deserialize(record) {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::warn!(
                        path = path,
                        index = index,
                        error = %e,
                        "Skipping undecodable record"
                    );
                    None
                }
            })
            .collect())
    }
}
