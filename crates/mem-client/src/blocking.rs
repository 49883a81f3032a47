//! Blocking wrapper: runs the async client to completion on an owned runtime.

use crate::{ClientConfig, MemoryClient};
use mem_types::{ClientError, ConversationMessage, MemoryApi, Params, RetrieveMemoryQuery};
use serde::Serialize;
use serde_json::Value;
use std::future::Future;

/// Blocking client for callers without an async runtime.
///
/// Every call returns the response. Calls made from inside a tokio runtime fail
/// with `ClientError::RuntimeActive`. Dropping it is safe anywhere: the owned
/// runtime is shut down in the background.
pub struct BlockingMemoryClient {
    inner: MemoryClient,
    /// Always `Some` until dropped.
    runtime: Option<tokio::runtime::Runtime>,
}

impl BlockingMemoryClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_config(ClientConfig::new(base_url))
    }

    pub fn with_config(config: ClientConfig) -> Result<Self, ClientError> {
        ensure_no_runtime()?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ClientError::Runtime)?;
        let inner = MemoryClient::with_config(config)?;
        Ok(Self {
            inner,
            runtime: Some(runtime),
        })
    }

    pub fn from_env() -> Result<Self, ClientError> {
        Self::with_config(ClientConfig::from_env()?)
    }

    pub fn base_url(&self) -> &str {
        self.inner.base_url()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }

    pub fn close(&self) {
        self.inner.close()
    }

    pub fn get(&self, endpoint: &str, params: Option<&Params>) -> Result<Value, ClientError> {
        self.block_on(self.inner.get(endpoint, params))
    }

    pub fn post<B>(&self, endpoint: &str, data: &B) -> Result<Value, ClientError>
    where
        B: Serialize + ?Sized,
    {
        self.block_on(self.inner.post(endpoint, data))
    }

    pub fn add_message(
        &self,
        user_id: &str,
        conversation_id: &str,
        message: &ConversationMessage,
    ) -> Result<Value, ClientError> {
        self.block_on(self.inner.add_message(user_id, conversation_id, message))
    }

    pub fn retrieve_memory(&self, query: &RetrieveMemoryQuery) -> Result<Value, ClientError> {
        self.block_on(self.inner.retrieve_memory(query))
    }

    fn block_on<F>(&self, fut: F) -> Result<Value, ClientError>
    where
        F: Future<Output = Result<Value, ClientError>>,
    {
        ensure_no_runtime()?;
        match &self.runtime {
            Some(runtime) => runtime.block_on(fut),
            None => Err(ClientError::Closed),
        }
    }
}

impl Drop for BlockingMemoryClient {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

impl std::fmt::Debug for BlockingMemoryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockingMemoryClient")
            .field("inner", &self.inner)
            .finish()
    }
}

fn ensure_no_runtime() -> Result<(), ClientError> {
    if tokio::runtime::Handle::try_current().is_ok() {
        return Err(ClientError::RuntimeActive);
    }
    Ok(())
}
