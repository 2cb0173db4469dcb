//! REST gateway for the field-operations backend.
//!
//! Wraps the backend's JSON/multipart endpoints using [`reqwest`].  Every
//! response body shares one envelope shape: `{ success, message, data }`;
//! a 2xx with `success: false` carries the server's rejection message.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{ClientError, ClientResult, GENERIC_FAILURE_MESSAGE};

/// HTTP client for one backend instance.
#[derive(Debug, Clone)]
pub struct ApiGateway {
    client: reqwest::Client,
    base_url: String,
}

/// The backend's uniform response envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// Unwrap the payload, turning `success: false` into
    /// [`ClientError::Rejected`] with the server's message or the generic
    /// fallback.
    pub fn into_data(self) -> ClientResult<Option<T>> {
        if self.success {
            Ok(self.data)
        } else {
            Err(ClientError::Rejected(
                self.message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string()),
            ))
        }
    }

    /// Like [`into_data`](Self::into_data) but requires a payload.
    pub fn require_data(self, what: &'static str) -> ClientResult<T> {
        self.into_data()?.ok_or_else(|| {
            ClientError::Rejected(format!("Server response is missing {what}"))
        })
    }
}

impl ApiGateway {
    /// Create a gateway with a fresh connection pool.
    ///
    /// * `base_url` - API root, e.g. `http://host:3000/api/v1`.
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Create a gateway reusing an existing [`reqwest::Client`] (shares the
    /// connection pool, carries the caller's timeout settings).
    pub fn with_client(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// GET a JSON endpoint and parse its envelope.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> ClientResult<ApiEnvelope<T>> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// POST a JSON body and parse the response envelope.
    pub async fn post_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<ApiEnvelope<T>> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// POST a `multipart/form-data` body and parse the response envelope.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> ClientResult<ApiEnvelope<T>> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .multipart(form)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    // ---- private helpers ----

    /// Ensure a success status code, then parse the envelope.
    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> ClientResult<ApiEnvelope<T>> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ClientError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json::<ApiEnvelope<T>>().await?)
    }
}
