use std::time::Duration;

use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION},
    Method,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

use shared_config::AppConfig;
use shared_models::error::AppError;

/// Failures from the hosted data service. Timeouts get their own variant so
/// callers can report an unavailable backend instead of a generic failure.
#[derive(Error, Debug)]
pub enum DataServiceError {
    #[error("Data service did not respond in time")]
    Timeout,

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid response body: {0}")]
    Decode(String),
}

impl DataServiceError {
    /// True for unique-constraint rejections from the data service, which the
    /// booking path treats as a lost slot race rather than a server fault.
    pub fn is_conflict(&self) -> bool {
        matches!(self, DataServiceError::Conflict(_))
    }
}

impl From<DataServiceError> for AppError {
    fn from(err: DataServiceError) -> Self {
        match err {
            DataServiceError::Timeout => AppError::RemoteUnavailable(err.to_string()),
            DataServiceError::Auth(msg) => AppError::Auth(msg),
            DataServiceError::NotFound(msg) => AppError::NotFound(msg),
            DataServiceError::Conflict(msg) => AppError::Conflict(msg),
            _ => AppError::ExternalService(err.to_string()),
        }
    }
}

pub struct SupabaseClient {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.data_service_timeout_secs))
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            base_url: config.supabase_url.clone(),
            anon_key: config.supabase_anon_key.clone(),
        }
    }

    fn get_headers(&self, auth_token: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();

        headers.insert("apikey", HeaderValue::from_str(&self.anon_key).unwrap());
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = auth_token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
            );
        }

        headers
    }

    pub async fn request<T>(&self, method: Method, path: &str,
                            auth_token: Option<&str>, body: Option<Value>)
                            -> Result<T, DataServiceError>
    where T: DeserializeOwned {
        self.request_with_headers(method, path, auth_token, body, None).await
    }

    pub async fn request_with_headers<T>(&self, method: Method, path: &str,
                                         auth_token: Option<&str>, body: Option<Value>,
                                         extra_headers: Option<HeaderMap>)
                                         -> Result<T, DataServiceError>
    where T: DeserializeOwned {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making request to {}", url);

        let mut headers = self.get_headers(auth_token);
        if let Some(extra) = extra_headers {
            headers.extend(extra);
        }

        let mut req = self.client.request(method, &url)
            .headers(headers);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await.map_err(classify_transport)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("API error ({}): {}", status, error_text);

            return Err(match status.as_u16() {
                401 | 403 => DataServiceError::Auth(error_text),
                404 => DataServiceError::NotFound(error_text),
                409 => DataServiceError::Conflict(error_text),
                code => DataServiceError::Api { status: code, message: error_text },
            });
        }

        response.json::<T>().await
            .map_err(|e| DataServiceError::Decode(e.to_string()))
    }

    /// Call a server-side function through the PostgREST RPC surface. Used for
    /// operations that must be atomic on the server, like status transitions.
    pub async fn rpc<T>(&self, function: &str, params: Value, auth_token: Option<&str>)
                        -> Result<T, DataServiceError>
    where T: DeserializeOwned {
        let path = format!("/rest/v1/rpc/{}", function);
        self.request(Method::POST, &path, auth_token, Some(params)).await
    }

    /// Exact row count for a filtered path, without fetching rows. Issues a
    /// zero-length range request and reads the total off the Content-Range
    /// header (`0-0/42` or `*/42`).
    pub async fn count(&self, path: &str, auth_token: Option<&str>)
                       -> Result<i64, DataServiceError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Counting rows at {}", url);

        let mut headers = self.get_headers(auth_token);
        headers.insert("Prefer", HeaderValue::from_static("count=exact"));
        headers.insert("Range", HeaderValue::from_static("0-0"));

        let response = self.client.request(Method::GET, &url)
            .headers(headers)
            .send()
            .await
            .map_err(classify_transport)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Count request failed ({}): {}", status, error_text);
            return Err(DataServiceError::Api { status: status.as_u16(), message: error_text });
        }

        let content_range = response.headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| DataServiceError::Decode("missing Content-Range header".to_string()))?;

        parse_content_range_total(content_range)
            .ok_or_else(|| DataServiceError::Decode(
                format!("unparseable Content-Range header: {}", content_range)
            ))
    }

    pub fn get_base_url(&self) -> &str {
        &self.base_url
    }
}

fn classify_transport(err: reqwest::Error) -> DataServiceError {
    if err.is_timeout() {
        DataServiceError::Timeout
    } else {
        DataServiceError::Transport(err.to_string())
    }
}

fn parse_content_range_total(header: &str) -> Option<i64> {
    header.rsplit('/').next()?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::parse_content_range_total;

    #[test]
    fn parses_total_from_range() {
        assert_eq!(parse_content_range_total("0-0/42"), Some(42));
    }

    #[test]
    fn parses_total_from_star_range() {
        assert_eq!(parse_content_range_total("*/7"), Some(7));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_content_range_total("whatever"), None);
    }
}
