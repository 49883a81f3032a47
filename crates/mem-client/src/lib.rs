//! Conversation memory client: async `MemoryClient` and `BlockingMemoryClient`.

mod blocking;
mod client;
mod config;

pub use blocking::BlockingMemoryClient;
pub use client::{MemoryClient, PendingResponse};
pub use config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use mem_types::{
    ClientError, ConversationMessage, MemoryApi, MessageType, Params, RetrieveMemoryQuery,
};
