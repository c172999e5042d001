//! Wire schemas of the supported LLM providers

pub mod openai;
pub mod gemini;

pub use gemini::GEMINI_API_BASE;
