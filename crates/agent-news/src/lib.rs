//! News research crew
//!
//! Routes a free-text query to one of two agent pipelines and runs it with
//! bounded retries:
//!
//! - Search clients for GNews and Serper, exposed to agents as tools
//! - Agent profiles and task templates
//! - `QueryClassifier`: decides news vs. general with one LLM call
//! - `Orchestrator`: builds the pipeline and retries timeouts
//!
//! # Example
//!
//! ```rust,ignore
//! use agent_news::{NewsConfig, build_orchestrator};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Arc::new(NewsConfig::from_env()?);
//!     let orchestrator = build_orchestrator(config)?;
//!
//!     let result = orchestrator.run("Latest developments in fusion energy").await;
//!     if let Some(report) = result.report() {
//!         println!("{report}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod agents;
pub mod api;
pub mod classifier;
pub mod config;
pub mod crew;
pub mod error;
pub mod logs;
pub mod orchestrator;
pub mod pipeline;
pub mod tasks;
pub mod tools;

pub use agents::AgentProfile;
pub use classifier::{Category, Classifier, QueryClassifier};
pub use config::NewsConfig;
pub use crew::{build_orchestrator, build_runtime};
pub use error::{NewsError, Result};
pub use logs::LogCapture;
pub use orchestrator::{Attempt, AttemptOutcome, FailureKind, Orchestrator, RunResult};
pub use pipeline::{CrewPipelineFactory, Pipeline, PipelineFactory, PipelineKind, split_topics};
pub use tasks::{SearchDepth, TaskSpec};
pub use tools::{NewsSearchTool, WebSearchTool};
