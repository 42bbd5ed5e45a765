use crate::config::UpstreamConfig;
use crate::utils::lenient;
use crate::yaya::signing::{RequestSigner, HEADER_API_KEY, HEADER_SIGNATURE, HEADER_TIMESTAMP};
use bigdecimal::BigDecimal;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

pub const FIND_BY_USER_PATH: &str = "/api/en/transaction/find-by-user";
pub const SEARCH_PATH: &str = "/api/en/transaction/search";

const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug)]
pub enum YayaError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("YaYa API responded with status {status}")]
    Status { status: u16, body: Value },
    #[error("Invalid response from YaYa API: {0}")]
    InvalidResponse(String),
}

impl YayaError {
    /// The upstream error body when there is one, otherwise the error message.
    pub fn details(&self) -> Value {
        match self {
            YayaError::Status { body, .. } if !body.is_null() && body.as_str() != Some("") => {
                body.clone()
            }
            other => Value::String(other.to_string()),
        }
    }
}

/// One page of `find-by-user`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamPage {
    #[serde(default, deserialize_with = "deserialize_items")]
    pub data: Vec<Value>,
    #[serde(default, deserialize_with = "lenient::deserialize_u64")]
    pub total: u64,
    #[serde(default, deserialize_with = "lenient::deserialize_opt_u32")]
    pub last_page: Option<u32>,
    #[serde(default, deserialize_with = "lenient::deserialize_decimal")]
    pub incoming_sum: BigDecimal,
    #[serde(default, deserialize_with = "lenient::deserialize_decimal")]
    pub outgoing_sum: BigDecimal,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpstreamSearch {
    #[serde(default, deserialize_with = "deserialize_items")]
    pub data: Vec<Value>,
}

fn deserialize_items<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(items),
        _ => Ok(Vec::new()),
    }
}

/// Signed HTTP client for the YaYa Wallet API.
#[derive(Clone)]
pub struct YayaClient {
    client: Client,
    base_url: String,
    api_key: String,
    signer: RequestSigner,
}

impl YayaClient {
    pub fn new(config: &UpstreamConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        YayaClient {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            signer: RequestSigner::new(&config.api_secret),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches one page of the current user's transactions.
    pub async fn find_by_user(&self, page: u32) -> Result<UpstreamPage, YayaError> {
        self.send(
            Method::GET,
            FIND_BY_USER_PATH,
            None,
            &[("page", page.to_string())],
        )
        .await
    }

    /// Runs a free-text search over the current user's transactions.
    pub async fn search(&self, query: &str) -> Result<UpstreamSearch, YayaError> {
        let body = json!({ "query": query }).to_string();
        self.send(Method::POST, SEARCH_PATH, Some(body), &[]).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
        query: &[(&str, String)],
    ) -> Result<T, YayaError> {
        let body = body.unwrap_or_default();
        let signed = self.signer.sign_now(method.as_str(), path, &body);

        let mut request = self
            .client
            .request(method.clone(), format!("{}{}", self.base_url, path))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(HEADER_API_KEY, &self.api_key)
            .header(HEADER_TIMESTAMP, &signed.timestamp)
            .header(HEADER_SIGNATURE, &signed.signature);
        if !query.is_empty() {
            request = request.query(query);
        }
        if !body.is_empty() {
            request = request.body(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let body = serde_json::from_slice::<Value>(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
            tracing::error!(
                method = %method,
                path = %path,
                status = status.as_u16(),
                "YaYa API error: {}",
                body
            );
            return Err(YayaError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_slice(&bytes).map_err(|e| YayaError::InvalidResponse(e.to_string()))
    }
}

impl std::fmt::Debug for YayaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YayaClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use std::str::FromStr;

    fn upstream(base_url: String) -> UpstreamConfig {
        UpstreamConfig {
            base_url,
            api_key: "test-key".to_string(),
            api_secret: "test-secret".to_string(),
        }
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = YayaClient::new(&upstream("https://sandbox.yayawallet.com/".to_string()));
        assert_eq!(client.base_url(), "https://sandbox.yayawallet.com");
    }

    #[tokio::test]
    async fn test_find_by_user_sends_signed_headers() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", FIND_BY_USER_PATH)
            .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
            .match_header("yaya-api-key", "test-key")
            .match_header("yaya-api-timestamp", Matcher::Regex(r"^\d{13}$".into()))
            .match_header("yaya-api-sign", Matcher::Regex(r"^[A-Za-z0-9+/]{43}=$".into()))
            .match_header("content-type", "application/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"data":[{"id":"a"},{"id":"b"}],"total":"12","lastPage":3,
                    "incomingSum":150.5,"outgoingSum":"20"}"#,
            )
            .create_async()
            .await;

        let client = YayaClient::new(&upstream(server.url()));
        let page = client.find_by_user(2).await.unwrap();

        mock.assert_async().await;
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.total, 12);
        assert_eq!(page.last_page, Some(3));
        assert_eq!(page.incoming_sum, BigDecimal::from_str("150.5").unwrap());
        assert_eq!(page.outgoing_sum, BigDecimal::from_str("20").unwrap());
    }

    #[tokio::test]
    async fn test_search_posts_exact_signed_body() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("POST", SEARCH_PATH)
            .match_body(r#"{"query":"alice"}"#)
            .match_header("yaya-api-key", "test-key")
            .match_header("yaya-api-sign", Matcher::Any)
            .with_status(200)
            .with_body(r#"{"data":[{"id":"x"}]}"#)
            .create_async()
            .await;

        let client = YayaClient::new(&upstream(server.url()));
        let result = client.search("alice").await.unwrap();

        mock.assert_async().await;
        assert_eq!(result.data.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_fields_default() {
        let mut server = mockito::Server::new_async().await;

        let _mock = server
            .mock("GET", FIND_BY_USER_PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let client = YayaClient::new(&upstream(server.url()));
        let page = client.find_by_user(1).await.unwrap();

        assert!(page.data.is_empty());
        assert_eq!(page.total, 0);
        assert_eq!(page.last_page, None);
        assert_eq!(page.incoming_sum, BigDecimal::default());
    }

    #[tokio::test]
    async fn test_error_status_carries_upstream_body() {
        let mut server = mockito::Server::new_async().await;

        let _mock = server
            .mock("POST", SEARCH_PATH)
            .with_status(401)
            .with_body(r#"{"message":"Invalid signature"}"#)
            .create_async()
            .await;

        let client = YayaClient::new(&upstream(server.url()));
        let err = client.search("bob").await.unwrap_err();

        match &err {
            YayaError::Status { status, body } => {
                assert_eq!(*status, 401);
                assert_eq!(body["message"], "Invalid signature");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(err.details()["message"], "Invalid signature");
    }

    #[tokio::test]
    async fn test_error_status_with_text_body() {
        let mut server = mockito::Server::new_async().await;

        let _mock = server
            .mock("GET", FIND_BY_USER_PATH)
            .match_query(Matcher::Any)
            .with_status(502)
            .with_body("Bad Gateway")
            .create_async()
            .await;

        let client = YayaClient::new(&upstream(server.url()));
        let err = client.find_by_user(1).await.unwrap_err();

        assert_eq!(err.details(), Value::String("Bad Gateway".to_string()));
    }

    #[tokio::test]
    async fn test_undecodable_body_is_invalid_response() {
        let mut server = mockito::Server::new_async().await;

        let _mock = server
            .mock("GET", FIND_BY_USER_PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let client = YayaClient::new(&upstream(server.url()));
        let err = client.find_by_user(1).await.unwrap_err();

        assert!(matches!(err, YayaError::InvalidResponse(_)));
        assert!(err.details().as_str().unwrap().contains("Invalid response"));
    }

    #[tokio::test]
    async fn test_transport_failure_is_request_error() {
        let client = YayaClient::new(&upstream("http://127.0.0.1:1".to_string()));
        let err = client.find_by_user(1).await.unwrap_err();
        assert!(matches!(err, YayaError::Request(_)));
    }
}
