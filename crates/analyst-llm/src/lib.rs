//! LLM provider abstraction layer for analyst-rs
//!
//! This crate provides provider-agnostic chat-completion types and a
//! concrete client for OpenAI-compatible APIs. It includes:
//!
//! - Message and request/response types for chat completions
//! - Provider trait for LLM implementations
//! - An OpenAI-compatible provider that also works with local servers
//!   such as Ollama and LM Studio

pub mod chat;
pub mod error;
pub mod provider;
pub mod providers;

// Re-export main types
pub use chat::{ChatMessage, ChatRequest, ChatResponse, Role, TokenUsage};
pub use error::{LLMError, Result};
pub use provider::LLMProvider;
pub use providers::{OpenAIConfig, OpenAIProvider};
