//! LLM Adapter - 外部大模型推理客户端

mod fake_llm_client;
mod openai_client;
pub mod parser;
pub mod prompts;

pub use fake_llm_client::{FakeLlmClient, FakeLlmClientConfig};
pub use openai_client::*;
