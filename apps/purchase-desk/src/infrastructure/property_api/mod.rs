//! Property Data Provider Client
//!
//! HTTP adapter for [`PropertyDataPort`]:
//! `GET {base_url}/v1/properties?address=...` authenticated with an
//! `X-Api-Key` header.
//!
//! | Status      | Result                                  |
//! |-------------|-----------------------------------------|
//! | 2xx         | body mapped to a `PropertyRecord`       |
//! | 404         | `NotFound`                              |
//! | 429, 5xx    | `Provider` (retryable)                  |
//! | other 4xx   | `Provider` (not retryable)              |
//! | no response | `Transport` (retryable)                 |

mod dto;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use tracing::{debug, instrument};

use crate::application::ports::{PropertyDataPort, PropertyLookupError};
use crate::domain::property::PropertyRecord;
use crate::infrastructure::config::{ApiKey, PropertyApiSettings};
use dto::PropertyResponse;

/// Longest provider error body echoed into an error message.
const MAX_ERROR_BODY: usize = 200;

/// Header carrying the provider API key.
pub const API_KEY_HEADER: &str = "X-Api-Key";

/// reqwest-backed property data client.
#[derive(Debug, Clone)]
pub struct PropertyApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: ApiKey,
}

impl PropertyApiClient {
    /// Build a client for the configured provider.
    ///
    /// # Errors
    ///
    /// Returns `Transport` if the HTTP client cannot be constructed.
    pub fn new(settings: &PropertyApiSettings) -> Result<Self, PropertyLookupError> {
        let http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .user_agent(concat!("purchase-desk/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| transport(&e))?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
        })
    }
}

fn transport(err: &reqwest::Error) -> PropertyLookupError {
    PropertyLookupError::Transport {
        message: err.to_string(),
    }
}

fn truncate(body: &str) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(MAX_ERROR_BODY) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}

#[async_trait]
impl PropertyDataPort for PropertyApiClient {
    #[instrument(skip(self))]
    async fn lookup_by_address(
        &self,
        address: &str,
    ) -> Result<PropertyRecord, PropertyLookupError> {
        let response = self
            .http
            .get(format!("{}/v1/properties", self.base_url))
            .query(&[("address", address)])
            .header(API_KEY_HEADER, self.api_key.expose())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| transport(&e))?;

        let status = response.status();
        debug!(status = status.as_u16(), "Property provider responded");

        if status == StatusCode::NOT_FOUND {
            return Err(PropertyLookupError::NotFound {
                address: address.to_string(),
            });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_string()
            } else {
                truncate(&body)
            };
            return Err(PropertyLookupError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let body: PropertyResponse = response.json().await.map_err(|e| transport(&e))?;
        Ok(body.into_record(address, Utc::now()))
    }
}
