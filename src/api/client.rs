use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

use super::error::ApiError;
use super::transport::{ApiRequest, ApiResponse, HttpTransport, Method};

const ERROR_SNIPPET_LEN: usize = 200;

/// Generic JSON request wrapper. Each call is a single request: no retries,
/// no batching.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn HttpTransport>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.execute(Method::Get, path, None).await?;
        decode(&response)
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let bytes = serde_json::to_vec(body)?;
        let response = self.execute(Method::Post, path, Some(bytes)).await?;
        decode(&response)
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let bytes = serde_json::to_vec(body)?;
        let response = self.execute(Method::Put, path, Some(bytes)).await?;
        decode(&response)
    }

    /// DELETE ignores whatever body the backend returns.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.execute(Method::Delete, path, None).await?;
        Ok(())
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<ApiResponse, ApiError> {
        debug!(method = method.as_str(), path, "sending request");
        let request = ApiRequest {
            method,
            path: path.to_string(),
            body,
        };
        let response = match self.transport.send(request).await {
            Ok(r) => r,
            Err(e) => {
                warn!(method = method.as_str(), path, error = %e, "request failed");
                return Err(e);
            }
        };
        debug!(method = method.as_str(), path, status = response.status, "response");
        match response.status {
            200..=299 => Ok(response),
            404 => Err(ApiError::NotFound {
                path: path.to_string(),
            }),
            status => {
                let message = error_snippet(&response.body, status);
                warn!(method = method.as_str(), path, status, "backend rejected request");
                Err(ApiError::Server { status, message })
            }
        }
    }
}

fn decode<T: DeserializeOwned>(response: &ApiResponse) -> Result<T, ApiError> {
    serde_json::from_slice(&response.body).map_err(ApiError::from)
}

fn error_snippet(body: &[u8], status: u16) -> String {
    let text = String::from_utf8_lossy(body);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return format!("HTTP {status}");
    }
    trimmed.chars().take(ERROR_SNIPPET_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    struct Canned {
        status: u16,
        body: &'static str,
        seen: Mutex<Vec<ApiRequest>>,
    }

    impl Canned {
        fn new(status: u16, body: &'static str) -> Arc<Self> {
            Arc::new(Self {
                status,
                body,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl HttpTransport for Canned {
        async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
            self.seen.lock().unwrap().push(request);
            Ok(ApiResponse {
                status: self.status,
                body: self.body.as_bytes().to_vec(),
            })
        }
    }

    struct Offline;

    #[async_trait]
    impl HttpTransport for Offline {
        async fn send(&self, _request: ApiRequest) -> Result<ApiResponse, ApiError> {
            Err(ApiError::Network("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn get_decodes_json_body() {
        let t = Canned::new(200, r#"{"a":1}"#);
        let client = ApiClient::new(t.clone());
        let v: serde_json::Value = client.get("/thing").await.unwrap();
        assert_eq!(v["a"], 1);
        let seen = t.seen.lock().unwrap();
        assert_eq!(seen[0].method, Method::Get);
        assert_eq!(seen[0].path, "/thing");
        assert!(seen[0].body.is_none());
    }

    #[tokio::test]
    async fn post_sends_json_body() {
        let t = Canned::new(201, r#"{"ok":true}"#);
        let client = ApiClient::new(t.clone());
        let _: serde_json::Value = client.post("/thing", &json!({"x": "y"})).await.unwrap();
        let seen = t.seen.lock().unwrap();
        let sent: serde_json::Value =
            serde_json::from_slice(seen[0].body.as_ref().unwrap()).unwrap();
        assert_eq!(sent, json!({"x": "y"}));
    }

    #[tokio::test]
    async fn status_404_maps_to_not_found() {
        let client = ApiClient::new(Canned::new(404, ""));
        let err = client.get::<serde_json::Value>("/thing/9").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn other_failures_map_to_server_error() {
        let client = ApiClient::new(Canned::new(500, "  boom  "));
        match client.delete("/thing/1").await.unwrap_err() {
            ApiError::Server { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_error_body_reports_status() {
        let client = ApiClient::new(Canned::new(503, ""));
        match client.get::<serde_json::Value>("/x").await.unwrap_err() {
            ApiError::Server { message, .. } => assert_eq!(message, "HTTP 503"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn delete_ignores_body() {
        let client = ApiClient::new(Canned::new(204, ""));
        client.delete("/thing/1").await.unwrap();
    }

    #[tokio::test]
    async fn garbage_body_is_decode_error() {
        let client = ApiClient::new(Canned::new(200, "<html>"));
        let err = client.get::<serde_json::Value>("/x").await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn transport_failure_propagates_as_network_error() {
        let client = ApiClient::new(Arc::new(Offline));
        let err = client.get::<serde_json::Value>("/x").await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }
}
