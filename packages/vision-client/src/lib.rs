//! REST clients for vision-capable language models
//!
//! Two wire contracts, no domain logic:
//!
//! - [`GeminiClient`] posts to `generateContent` with inline document bytes
//!   and a response schema; the provider guarantees schema-shaped JSON text.
//! - [`ChatClient`] posts to any OpenAI-compatible `/chat/completions`
//!   endpoint with a text part and an `image_url` part, asking for a JSON
//!   object response.
//!
//! # Example
//!
//! ```rust,ignore
//! use vision_client::{ChatClient, ChatMessage, ChatRequest, ContentPart};
//!
//! let client = ChatClient::new("http://localhost:11434/v1", "ollama");
//! let request = ChatRequest::new("llava")
//!     .message(ChatMessage::user(vec![
//!         ContentPart::text("Return the title block as JSON"),
//!         ContentPart::image_url(data_url),
//!     ]))
//!     .json_object()
//!     .temperature(0.1);
//!
//! let content = client.chat_completion(&request).await?;
//! ```

pub mod chat;
pub mod error;
pub mod gemini;
pub mod types;

pub use chat::{normalize_endpoint, ChatClient, CHAT_COMPLETIONS_PATH};
pub use error::{error_message_from_body, Result, VisionClientError};
pub use gemini::GeminiClient;
pub use types::*;
