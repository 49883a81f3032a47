//! Async HTTP client for the conversation memory service.

use crate::ClientConfig;
use mem_types::{ClientError, MemoryApi, Params};
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, RwLock};
use std::task::{Context, Poll};
use tokio::task::JoinHandle;

struct Inner {
    base_url: String,
    /// `None` once closed.
    http: RwLock<Option<reqwest::Client>>,
}

/// Client for `{base_url}{endpoint}` GET/POST returning decoded JSON.
///
/// Cloning is cheap: clones share the connection pool and the open/closed state.
/// The pool is released by `close` or when the last clone is dropped.
#[derive(Clone)]
pub struct MemoryClient {
    inner: Arc<Inner>,
}

impl MemoryClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_config(ClientConfig::new(base_url))
    }

    pub fn with_config(config: ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ClientError::request)?;
        tracing::debug!(
            base_url = %config.base_url,
            timeout = ?config.timeout,
            "memory client created"
        );
        Ok(Self {
            inner: Arc::new(Inner {
                base_url: config.base_url,
                http: RwLock::new(Some(http)),
            }),
        })
    }

    pub fn from_env() -> Result<Self, ClientError> {
        Self::with_config(ClientConfig::from_env()?)
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub fn is_closed(&self) -> bool {
        self.inner
            .http
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_none()
    }

    /// Release the connection pool. Idempotent; requests already in flight finish normally.
    pub fn close(&self) {
        let taken = self
            .inner
            .http
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if taken.is_some() {
            tracing::debug!(base_url = %self.inner.base_url, "memory client closed");
        }
    }

    fn http(&self) -> Result<reqwest::Client, ClientError> {
        self.inner
            .http
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
            .ok_or(ClientError::Closed)
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.inner.base_url, endpoint)
    }

    /// GET `{base_url}{endpoint}` with `params` as query parameters.
    pub async fn get(&self, endpoint: &str, params: Option<&Params>) -> Result<Value, ClientError> {
        let http = self.http()?;
        let url = self.url(endpoint);
        let mut req = http.get(&url);
        if let Some(params) = params {
            req = req.query(&query_pairs(params)?);
        }
        send_json(req, "GET", &url).await
    }

    /// POST `data` serialized as the JSON body to `{base_url}{endpoint}`.
    pub async fn post<B>(&self, endpoint: &str, data: &B) -> Result<Value, ClientError>
    where
        B: Serialize + ?Sized,
    {
        let http = self.http()?;
        let url = self.url(endpoint);
        send_json(http.post(&url).json(data), "POST", &url).await
    }

    /// Spawn a GET on the current tokio runtime and return a handle to its result.
    ///
    /// Panics if called outside a tokio runtime (as `tokio::spawn` does).
    pub fn spawn_get(
        &self,
        endpoint: impl Into<String>,
        params: Option<Params>,
    ) -> PendingResponse {
        let client = self.clone();
        let endpoint = endpoint.into();
        PendingResponse {
            handle: tokio::spawn(async move { client.get(&endpoint, params.as_ref()).await }),
        }
    }

    /// Spawn a POST on the current tokio runtime and return a handle to its result.
    pub fn spawn_post<B>(&self, endpoint: impl Into<String>, data: B) -> PendingResponse
    where
        B: Serialize + Send + Sync + 'static,
    {
        let client = self.clone();
        let endpoint = endpoint.into();
        PendingResponse {
            handle: tokio::spawn(async move { client.post(&endpoint, &data).await }),
        }
    }
}

impl std::fmt::Debug for MemoryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryClient")
            .field("base_url", &self.inner.base_url)
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Flatten params into query pairs: arrays repeat the key, null becomes an empty value.
fn query_pairs(params: &Params) -> Result<Vec<(String, String)>, ClientError> {
    let mut pairs = Vec::with_capacity(params.len());
    for (key, value) in params {
        match value {
            Value::Array(items) => {
                for item in items {
                    pairs.push((key.clone(), scalar_param(key, item)?));
                }
            }
            other => pairs.push((key.clone(), scalar_param(key, other)?)),
        }
    }
    Ok(pairs)
}

fn scalar_param(key: &str, value: &Value) -> Result<String, ClientError> {
    match value {
        Value::Null => Ok(String::new()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::String(s) => Ok(s.clone()),
        Value::Array(_) => Err(ClientError::InvalidParam {
            key: key.to_string(),
            reason: "nested arrays are not supported".to_string(),
        }),
        Value::Object(_) => Err(ClientError::InvalidParam {
            key: key.to_string(),
            reason: "objects are not supported".to_string(),
        }),
    }
}

async fn send_json(
    req: reqwest::RequestBuilder,
    method: &'static str,
    url: &str,
) -> Result<Value, ClientError> {
    let res = req.send().await.map_err(ClientError::request)?;
    let status = res.status();
    tracing::debug!(method, url, status = status.as_u16(), "memory api response");
    if !status.is_success() {
        let body = res.text().await.map_err(ClientError::request)?;
        tracing::warn!(method, url, status = status.as_u16(), "memory api error");
        return Err(ClientError::HttpStatus {
            status: status.as_u16(),
            body,
        });
    }
    res.json::<Value>().await.map_err(ClientError::request)
}

/// Result of a spawned request; await it to get the decoded JSON.
#[must_use = "the response is only observable by awaiting the handle"]
pub struct PendingResponse {
    handle: JoinHandle<Result<Value, ClientError>>,
}

impl PendingResponse {
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Cancel the request; awaiting afterwards yields `ClientError::Join`.
    pub fn abort(&self) {
        self.handle.abort();
    }
}

impl Future for PendingResponse {
    type Output = Result<Value, ClientError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.handle)
            .poll(cx)
            .map(|joined| joined.unwrap_or_else(|e| Err(ClientError::Join(e.to_string()))))
    }
}

#[async_trait::async_trait]
impl MemoryApi for MemoryClient {
    async fn get(&self, endpoint: &str, params: Option<&Params>) -> Result<Value, ClientError> {
        MemoryClient::get(self, endpoint, params).await
    }

    async fn post(&self, endpoint: &str, data: &Value) -> Result<Value, ClientError> {
        MemoryClient::post(self, endpoint, data).await
    }

    async fn close(&self) {
        MemoryClient::close(self)
    }
}
