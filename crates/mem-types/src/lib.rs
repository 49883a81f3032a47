//! Core types and traits for the conversation memory client.
//!
//! Request DTOs match the memory service's JSON (`{type, text}` messages,
//! `{user_id, text}` retrieval queries).

mod dto;
mod traits;

pub use dto::*;
pub use traits::*;
