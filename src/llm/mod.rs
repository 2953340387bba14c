//! LLM integration: completion client, stream framing and aggregation.

mod backend;
mod client;
pub mod framing;
pub mod stream;

pub use backend::{
    ByteStream, ChatMessage, CompletionBackend, ContentPart, ImageUrl, MessageContent, Role,
};
pub use client::{
    LlmClient, LlmConfig, DEFAULT_IMAGE_PROMPT, IMAGE_THOROUGHNESS_SUFFIX,
    STREAMING_ANALYSIS_PROMPT, TEXT_ANALYSIS_PROMPT,
};
pub use framing::{FrameDecoder, LineFrames, RawText};
pub use stream::{StreamAggregator, StreamState, Utf8ChunkDecoder};
