//! Tool framework for the news research crew
//!
//! Tools are named async functions an LLM agent may call while it works,
//! such as news search and web search.

pub mod registry;
pub mod tool;

pub use registry::ToolRegistry;
pub use tool::{Tool, render_output};
