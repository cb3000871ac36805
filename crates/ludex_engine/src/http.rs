//! HTTP binding for the remote API.
//!
//! The actual HTTP client is abstracted via a trait to allow different
//! implementations (reqwest, ureq, a scripted client in tests, ...).
//! Request and response bodies are JSON.

use crate::api::{ApiError, ApiResult, GameApi};
use ludex_protocol::{EditConflict, GameRecord};

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// GET.
    Get,
    /// POST.
    Post,
    /// PUT.
    Put,
    /// DELETE.
    Delete,
}

/// A request handed to the [`HttpClient`].
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// Method.
    pub method: HttpMethod,
    /// Absolute URL.
    pub url: String,
    /// Header name/value pairs.
    pub headers: Vec<(String, String)>,
    /// JSON body, when the method carries one.
    pub body: Option<String>,
}

/// A response from the [`HttpClient`].
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: String,
}

impl HttpResponse {
    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP client abstraction.
///
/// Implement this trait to provide the actual transport. Errors are the
/// cases where no response was produced at all; a response with an error
/// status is still `Ok`.
pub trait HttpClient: Send + Sync {
    /// Sends a request and returns the response.
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, String>;
}

/// [`GameApi`] over HTTP + JSON.
///
/// Talks to `{base_url}/api/games` with an optional bearer token.
pub struct HttpApi<C: HttpClient> {
    base_url: String,
    token: Option<String>,
    client: C,
}

impl<C: HttpClient> HttpApi<C> {
    /// Creates an unauthenticated API binding.
    pub fn new(base_url: impl Into<String>, client: C) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            client,
        }
    }

    /// Sets the bearer token sent with every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<String>,
    ) -> ApiResult<HttpResponse> {
        let mut headers = vec![("Accept".to_string(), "application/json".to_string())];
        if body.is_some() {
            headers.push((
                "Content-Type".to_string(),
                "application/json".to_string(),
            ));
        }
        if let Some(token) = &self.token {
            headers.push(("Authorization".to_string(), format!("Bearer {token}")));
        }

        let request = HttpRequest {
            method,
            url: format!("{}/api/games{}", self.base_url, path),
            headers,
            body,
        };

        tracing::debug!(url = %request.url, ?method, "sending request");
        self.client
            .send(&request)
            .map_err(|message| ApiError::Transport { message })
    }

    fn decode_record(response: &HttpResponse) -> ApiResult<GameRecord> {
        GameRecord::decode(&response.body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn status_error(response: HttpResponse) -> ApiError {
        ApiError::Status {
            code: response.status,
            message: response.body,
        }
    }
}

impl<C: HttpClient> GameApi for HttpApi<C> {
    fn list(&self) -> ApiResult<Vec<GameRecord>> {
        let response = self.request(HttpMethod::Get, "", None)?;
        if !response.is_success() {
            return Err(Self::status_error(response));
        }
        serde_json::from_str(&response.body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn create(&self, record: &GameRecord) -> ApiResult<GameRecord> {
        let body = record
            .encode()
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        let response = self.request(HttpMethod::Post, "", Some(body))?;
        if !response.is_success() {
            return Err(Self::status_error(response));
        }
        Self::decode_record(&response)
    }

    fn update(&self, record: &GameRecord) -> ApiResult<GameRecord> {
        let id = record
            .id
            .ok_or_else(|| ApiError::InvalidRequest("update without an id".into()))?;
        let body = record
            .encode()
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        let response = self.request(HttpMethod::Put, &format!("/{id}"), Some(body))?;

        if response.status == 409 {
            let conflict: EditConflict = serde_json::from_str(&response.body)
                .map_err(|e| ApiError::Decode(e.to_string()))?;
            return Err(ApiError::Conflict(Box::new(conflict)));
        }
        if !response.is_success() {
            return Err(Self::status_error(response));
        }
        Self::decode_record(&response)
    }

    fn delete_by_id(&self, id: i64) -> ApiResult<()> {
        let response = self.request(HttpMethod::Delete, &format!("/{id}"), None)?;
        if !response.is_success() {
            return Err(Self::status_error(response));
        }
        Ok(())
    }
}
