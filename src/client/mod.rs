//! HTTP client for the Stockroom API, used by frontend-facing Rust callers.
//!
//! Thin wrapper around `reqwest`: fixed base URL, JSON default headers, and a
//! diagnostic log line for every error response. Errors are propagated to the
//! caller unchanged; no retries, no transformation, no business logic.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Default API base URL for local development.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Client-side error: either an API error response or a transport failure.
#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    /// The server answered with a non-2xx status. `body` is the raw response
    /// body, passed through unchanged.
    #[error("API error: HTTP {status}: {body}")]
    Api { status: StatusCode, body: String },

    /// The request never produced a response (connect, timeout, decode).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Stockroom API client.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ApiClient {
    /// Build a client for the given base URL with JSON default headers.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .unwrap_or_default();

        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// GET a path and deserialize the response body.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiClientError> {
        let response = self.http.get(self.url(path)).send().await;
        Self::handle(response).await
    }

    /// GET a path with query parameters.
    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiClientError> {
        let response = self.http.get(self.url(path)).query(query).send().await;
        Self::handle(response).await
    }

    /// POST a JSON body to a path.
    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiClientError> {
        let response = self.http.post(self.url(path)).json(body).send().await;
        Self::handle(response).await
    }

    /// PUT a JSON body to a path.
    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiClientError> {
        let response = self.http.put(self.url(path)).json(body).send().await;
        Self::handle(response).await
    }

    /// DELETE a path.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiClientError> {
        let response = self.http.delete(self.url(path)).send().await;
        Self::handle(response).await
    }

    /// Log every error on the diagnostic channel and propagate it unchanged.
    async fn handle<T: DeserializeOwned>(
        response: Result<reqwest::Response, reqwest::Error>,
    ) -> Result<T, ApiClientError> {
        let response = match response {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(error = %e, "API Error");
                return Err(ApiClientError::Transport(e));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "API Error");
            return Err(ApiClientError::Api { status, body });
        }

        Ok(response.json::<T>().await?)
    }
}

/// Format a currency amount en-US style: thousands separators, two decimals,
/// "0.00" for absent values.
pub fn format_currency(value: Option<f64>) -> String {
    let Some(value) = value else {
        return "0.00".to_string();
    };

    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let frac = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{}{grouped}.{frac:02}", if negative { "-" } else { "" })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use axum::{http::StatusCode as AxumStatus, Json, Router};
    use serde_json::{json, Value};

    #[test]
    fn format_currency_groups_thousands() {
        assert_eq!(format_currency(Some(1500.0)), "1,500.00");
        assert_eq!(format_currency(Some(1234567.891)), "1,234,567.89");
        assert_eq!(format_currency(Some(999.9)), "999.90");
        assert_eq!(format_currency(Some(0.0)), "0.00");
    }

    #[test]
    fn format_currency_handles_absent_and_negative() {
        assert_eq!(format_currency(None), "0.00");
        assert_eq!(format_currency(Some(-1500.5)), "-1,500.50");
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let client = ApiClient::new("http://localhost:8000/api/");
        assert_eq!(client.base_url(), "http://localhost:8000/api");
        assert_eq!(client.url("/products"), "http://localhost:8000/api/products");
        assert_eq!(client.url("products"), "http://localhost:8000/api/products");
    }

    /// Spin up an in-process stub server and return its base URL.
    async fn stub_server() -> String {
        let app = Router::new()
            .route(
                "/api/dashboard-stats",
                get(|| async {
                    Json(json!({
                        "data": {
                            "total_value": 25.5,
                            "low_stock": 2,
                            "total_products": 4,
                            "top_category": "Peripherals"
                        },
                        "error": null
                    }))
                }),
            )
            .route(
                "/api/products/missing",
                get(|| async {
                    (
                        AxumStatus::NOT_FOUND,
                        Json(json!({
                            "data": null,
                            "error": {"code": "NOT_FOUND", "message": "Product not found"}
                        })),
                    )
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });
        format!("http://{addr}/api")
    }

    #[tokio::test]
    async fn get_deserializes_success_body() {
        let client = ApiClient::new(stub_server().await);
        let body: Value = client.get("/dashboard-stats").await.unwrap();
        assert_eq!(body["data"]["top_category"], "Peripherals");
        assert_eq!(body["data"]["total_value"], json!(25.5));
    }

    #[tokio::test]
    async fn error_response_is_propagated_unchanged() {
        let client = ApiClient::new(stub_server().await);
        let err = client.get::<Value>("/products/missing").await.unwrap_err();
        match err {
            ApiClientError::Api { status, body } => {
                assert_eq!(status, StatusCode::NOT_FOUND);
                let parsed: Value = serde_json::from_str(&body).unwrap();
                assert_eq!(parsed["error"]["code"], "NOT_FOUND");
            }
            other => panic!("expected Api error, got {other}"),
        }
    }
}
