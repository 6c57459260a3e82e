//! Search tools exposed to the research agents
//!
//! Both tools report upstream failures as text so the model can read them.

pub mod news_search;
pub mod web_search;

pub use news_search::NewsSearchTool;
pub use web_search::WebSearchTool;

use agent_llm::tools::schema;
use serde::Deserialize;
use serde_json::{Value, json};

/// Line closing every result block
pub const SEPARATOR: &str = "\n-----------------";

/// Arguments shared by the search tools
#[derive(Debug, Deserialize)]
pub(crate) struct QueryParams {
    pub query: String,
}

impl QueryParams {
    pub(crate) fn parse(params: Value) -> agent_core::Result<Self> {
        serde_json::from_value(params)
            .map_err(|e| agent_core::Error::ProcessingFailed(format!("Invalid parameters: {e}")))
    }
}

pub(crate) fn query_schema(description: &str) -> Value {
    schema::object(json!({ "query": schema::string(description) }), &["query"])
}

/// Join `lines` into one block terminated by [`SEPARATOR`]
pub(crate) fn block(lines: &[String]) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out.push_str(SEPARATOR);
    out
}
