//! Upstream inference provider integration.

pub mod deepseek_api_agent;
pub mod prompt;

pub use deepseek_api_agent::DeepSeekApiAgent;
pub use prompt::MINDMAP_SYSTEM_PROMPT;
