//! Agent pipelines and the factory that builds them
//!
//! A pipeline is one agent working one task to a final text report. The
//! factory maps a [`PipelineKind`] to the right profile and task; nothing
//! else branches on the kind.

use agent_core::Context;
use agent_runtime::{AgentRuntime, ToolAgent};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

use crate::agents::{
    AgentProfile, NEWS_ANALYST, NEWS_RESEARCHER, SOURCE_VERIFICATION_SPECIALIST,
    TRENDING_TOPICS_MONITOR,
};
use crate::error::Result;
use crate::logs::LogCapture;
use crate::tasks::{self, SearchDepth, TaskSpec};

/// What a pipeline should do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineKind {
    /// Research current news on a list of topics
    NewsResearch {
        /// Topics to cover, in order
        topics: Vec<String>,
        /// Requested depth
        depth: SearchDepth,
    },
    /// Answer a general question
    GeneralInquiry {
        /// The question
        query: String,
    },
    /// Analyse recent coverage of one topic
    ArticleAnalysis {
        /// Topic to analyse
        topic: String,
        /// Articles to look at
        article_count: usize,
        /// Aspects to focus on
        focus_areas: Vec<String>,
    },
    /// Rate the sources covering a topic
    SourceEvaluation {
        /// Topic to evaluate sources for
        topic: String,
        /// Kinds of outlet to consider
        source_types: Vec<String>,
        /// What makes a source credible
        credibility_criteria: Vec<String>,
    },
    /// Report on trending stories
    TrendMonitoring {
        /// News categories to watch
        categories: Vec<String>,
        /// Time frame of the report
        time_period: String,
        /// Regions to focus on
        regions: Vec<String>,
    },
}

impl PipelineKind {
    /// Agent profile that runs this kind
    pub fn profile(&self) -> AgentProfile {
        match self {
            Self::NewsResearch { .. } | Self::GeneralInquiry { .. } => NEWS_RESEARCHER,
            Self::ArticleAnalysis { .. } => NEWS_ANALYST,
            Self::SourceEvaluation { .. } => SOURCE_VERIFICATION_SPECIALIST,
            Self::TrendMonitoring { .. } => TRENDING_TOPICS_MONITOR,
        }
    }

    /// Rendered task for this kind
    pub fn task(&self) -> Result<TaskSpec> {
        match self {
            Self::NewsResearch { topics, depth } => tasks::research_news(topics, *depth),
            Self::GeneralInquiry { query } => tasks::general_inquiry(query),
            Self::ArticleAnalysis {
                topic,
                article_count,
                focus_areas,
            } => tasks::analyze_articles(topic, *article_count, focus_areas),
            Self::SourceEvaluation {
                topic,
                source_types,
                credibility_criteria,
            } => tasks::evaluate_sources(topic, source_types, credibility_criteria),
            Self::TrendMonitoring {
                categories,
                time_period,
                regions,
            } => tasks::monitor_trending_topics(categories, time_period, regions),
        }
    }

    /// Short label for logs
    pub fn label(&self) -> &'static str {
        match self {
            Self::NewsResearch { .. } => "news research",
            Self::GeneralInquiry { .. } => "general inquiry",
            Self::ArticleAnalysis { .. } => "article analysis",
            Self::SourceEvaluation { .. } => "source evaluation",
            Self::TrendMonitoring { .. } => "trend monitoring",
        }
    }
}

/// Split a comma-separated query into trimmed, non-empty topics
pub fn split_topics(query: &str) -> Vec<String> {
    query
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// One runnable agent task
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Pipeline: Send + Sync {
    /// Run to a final report, writing diagnostics into `log`
    async fn run(&self, context: &Context, log: Arc<LogCapture>) -> Result<String>;
}

/// Builds pipelines from kinds
#[cfg_attr(test, mockall::automock)]
pub trait PipelineFactory: Send + Sync {
    /// Build a pipeline for `kind`
    fn build(&self, kind: &PipelineKind) -> Result<Box<dyn Pipeline>>;
}

/// A single agent working a single task
pub struct CrewPipeline {
    agent: ToolAgent,
    profile: AgentProfile,
    task: TaskSpec,
}

impl CrewPipeline {
    /// Create a pipeline from an agent and its task
    pub fn new(agent: ToolAgent, profile: AgentProfile, task: TaskSpec) -> Self {
        Self {
            agent,
            profile,
            task,
        }
    }

    /// The task this pipeline runs
    pub fn task(&self) -> &TaskSpec {
        &self.task
    }
}

#[async_trait]
impl Pipeline for CrewPipeline {
    async fn run(&self, context: &Context, log: Arc<LogCapture>) -> Result<String> {
        log.line(format!("# Agent: {}", self.profile.role));
        log.line(format!(
            "## Task: {}",
            self.task.description.lines().next().unwrap_or_default()
        ));

        let report = self
            .agent
            .run_with_handler(self.task.prompt(), context, log.clone())
            .await?;

        log.line(format!("## Final Answer from {}", self.profile.role));
        Ok(report)
    }
}

/// Default factory: one tool-calling agent per task over the shared runtime
#[derive(Clone)]
pub struct CrewPipelineFactory {
    runtime: AgentRuntime,
}

impl CrewPipelineFactory {
    /// Create a factory over `runtime`
    pub fn new(runtime: AgentRuntime) -> Self {
        Self { runtime }
    }
}

impl PipelineFactory for CrewPipelineFactory {
    fn build(&self, kind: &PipelineKind) -> Result<Box<dyn Pipeline>> {
        let profile = kind.profile();
        let task = kind.task()?;
        debug!(kind = kind.label(), agent = profile.role, "Building pipeline");

        let agent = self.runtime.create_scoped_tool_agent(
            self.runtime.executor_config(profile.system_prompt()),
            profile.role,
            profile.tools,
        );
        info!(kind = kind.label(), agent = profile.role, "Pipeline ready");

        Ok(Box::new(CrewPipeline::new(agent, profile, task)))
    }
}
