//! 助手服务 - 线程/运行协议的客户端与编排

mod client;
mod orchestrator;
pub mod types;

pub use client::{AssistantService, OpenAiAssistantClient};
pub use orchestrator::{AssistantOrchestrator, PollPolicy};
pub use types::Run;
