//! Query routing and retrying execution
//!
//! The orchestrator classifies a query (unless told the category), builds
//! the matching pipeline and runs it:
//! 1. Success ends the run
//! 2. A timeout is retried while attempts remain
//! 3. Any other failure ends the run immediately
//!
//! Attempts run one after another and each gets a fresh log capture. The
//! orchestrator never sets its own deadline; timeouts come from the HTTP
//! layer underneath the pipeline.

use agent_core::Context;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::classifier::{Category, Classifier};
use crate::logs::LogCapture;
use crate::pipeline::{PipelineFactory, PipelineKind, split_topics};
use crate::tasks::SearchDepth;

/// Default number of attempts per run
pub const DEFAULT_MAX_ATTEMPTS: usize = 3;

/// How one attempt ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Final report produced
    Success(String),
    /// Timed out; may be retried
    Timeout(String),
    /// Failed for any other reason
    Failed(String),
}

/// A recorded attempt, numbered from 1
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    /// 1-based attempt number
    pub index: usize,
    /// What happened
    pub outcome: AttemptOutcome,
}

/// Why a run failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Nothing to run; no attempt was made
    EmptyInput,
    /// Every attempt timed out
    TimedOut,
    /// The pipeline failed with a non-timeout error
    Pipeline,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::EmptyInput => "empty input",
            Self::TimedOut => "timed out",
            Self::Pipeline => "pipeline error",
        })
    }
}

/// Result of one orchestrator run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunResult {
    /// A report was produced
    Success {
        /// Final report
        report: String,
        /// Captured logs of every attempt
        logs: String,
        /// Attempts made, in order
        attempts: Vec<Attempt>,
    },
    /// No report was produced
    Failure {
        /// Failure class
        kind: FailureKind,
        /// User-facing reason
        reason: String,
        /// Captured logs of every attempt
        logs: String,
        /// Attempts made, in order
        attempts: Vec<Attempt>,
    },
}

impl RunResult {
    fn empty_input() -> Self {
        Self::Failure {
            kind: FailureKind::EmptyInput,
            reason: "empty input".to_string(),
            logs: String::new(),
            attempts: Vec::new(),
        }
    }

    /// Whether a report was produced
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The report, if any
    pub fn report(&self) -> Option<&str> {
        match self {
            Self::Success { report, .. } => Some(report),
            Self::Failure { .. } => None,
        }
    }

    /// Captured logs
    pub fn logs(&self) -> &str {
        match self {
            Self::Success { logs, .. } | Self::Failure { logs, .. } => logs,
        }
    }

    /// Recorded attempts
    pub fn attempts(&self) -> &[Attempt] {
        match self {
            Self::Success { attempts, .. } | Self::Failure { attempts, .. } => attempts,
        }
    }

    /// Number of recorded attempts
    pub fn attempts_made(&self) -> usize {
        self.attempts().len()
    }
}

/// Routes queries to pipelines and retries timeouts
pub struct Orchestrator {
    classifier: Arc<dyn Classifier>,
    factory: Arc<dyn PipelineFactory>,
    max_attempts: usize,
    retry_pause: Duration,
    search_depth: SearchDepth,
}

impl Orchestrator {
    /// Create an orchestrator with the default retry budget
    pub fn new(classifier: Arc<dyn Classifier>, factory: Arc<dyn PipelineFactory>) -> Self {
        Self {
            classifier,
            factory,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_pause: Duration::ZERO,
            search_depth: SearchDepth::default(),
        }
    }

    /// Set attempts per run; 0 is treated as 1
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Wait this long before retrying a timed-out attempt
    pub fn with_retry_pause(mut self, pause: Duration) -> Self {
        self.retry_pause = pause;
        self
    }

    /// Depth used for news research runs
    pub fn with_search_depth(mut self, depth: SearchDepth) -> Self {
        self.search_depth = depth;
        self
    }

    /// Attempts per run
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Classify `query` and run the matching pipeline
    pub async fn run(&self, query: &str) -> RunResult {
        self.run_with_category(query, None).await
    }

    /// Run `query`, skipping classification when `category` is given
    pub async fn run_with_category(&self, query: &str, category: Option<Category>) -> RunResult {
        let query = query.trim();
        if split_topics(query).is_empty() {
            warn!("Rejecting empty query");
            return RunResult::empty_input();
        }

        let category = match category {
            Some(forced) => {
                info!(category = %forced, "Category forced by caller");
                forced
            }
            None => self.classifier.classify(query).await,
        };

        let kind = match category {
            Category::News => PipelineKind::NewsResearch {
                topics: split_topics(query),
                depth: self.search_depth,
            },
            Category::General => PipelineKind::GeneralInquiry {
                query: query.to_string(),
            },
        };

        self.run_kind(kind).await
    }

    /// Run an explicit pipeline kind under the retry policy
    pub async fn run_kind(&self, kind: PipelineKind) -> RunResult {
        let pipeline = match self.factory.build(&kind) {
            Ok(pipeline) => pipeline,
            Err(e) => {
                error!(kind = kind.label(), error = %e, "Could not build pipeline");
                return RunResult::Failure {
                    kind: FailureKind::Pipeline,
                    reason: e.to_string(),
                    logs: String::new(),
                    attempts: Vec::new(),
                };
            }
        };

        let max_attempts = self.max_attempts;
        let mut logs = String::new();
        let mut attempts = Vec::with_capacity(max_attempts);

        for index in 1..=max_attempts {
            info!(attempt = index, max_attempts, kind = kind.label(), "Starting attempt");

            let context = Context::new()
                .with_attempt(index)
                .with_pipeline(kind.label());
            let capture = Arc::new(LogCapture::new());
            let result = pipeline.run(&context, capture.clone()).await;
            append_attempt_logs(&mut logs, index, max_attempts, &capture);

            match result {
                Ok(report) => {
                    info!(attempt = index, "Attempt succeeded");
                    attempts.push(Attempt {
                        index,
                        outcome: AttemptOutcome::Success(report.clone()),
                    });
                    return RunResult::Success {
                        report,
                        logs,
                        attempts,
                    };
                }
                Err(e) if e.is_timeout() => {
                    warn!(attempt = index, max_attempts, error = %e, "Attempt timed out");
                    attempts.push(Attempt {
                        index,
                        outcome: AttemptOutcome::Timeout(e.to_string()),
                    });
                    if index < max_attempts && !self.retry_pause.is_zero() {
                        tokio::time::sleep(self.retry_pause).await;
                    }
                }
                Err(e) => {
                    error!(attempt = index, error = %e, "Attempt failed");
                    let reason = e.to_string();
                    attempts.push(Attempt {
                        index,
                        outcome: AttemptOutcome::Failed(reason.clone()),
                    });
                    return RunResult::Failure {
                        kind: FailureKind::Pipeline,
                        reason,
                        logs,
                        attempts,
                    };
                }
            }
        }

        let last = match attempts.last() {
            Some(Attempt {
                outcome: AttemptOutcome::Timeout(reason),
                ..
            }) => reason.clone(),
            _ => String::new(),
        };
        RunResult::Failure {
            kind: FailureKind::TimedOut,
            reason: format!("timed out after {} attempts: {last}", attempts.len()),
            logs,
            attempts,
        }
    }
}

fn append_attempt_logs(logs: &mut String, index: usize, max_attempts: usize, capture: &LogCapture) {
    if !logs.is_empty() {
        logs.push('\n');
    }
    logs.push_str(&format!("=== Attempt {index}/{max_attempts} ==="));

    let text = capture.text();
    if !text.is_empty() {
        logs.push('\n');
        logs.push_str(&text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::MockClassifier;
    use crate::error::NewsError;
    use crate::pipeline::{MockPipeline, MockPipelineFactory};

    fn timeout() -> NewsError {
        NewsError::Agent(agent_core::Error::Timeout("llm deadline".to_string()))
    }

    fn no_classifier() -> Arc<dyn Classifier> {
        let mut classifier = MockClassifier::new();
        classifier.expect_classify().never();
        Arc::new(classifier)
    }

    fn classifying(category: Category) -> Arc<dyn Classifier> {
        let mut classifier = MockClassifier::new();
        classifier
            .expect_classify()
            .times(1)
            .returning(move |_| category);
        Arc::new(classifier)
    }

    fn factory_for(pipeline: MockPipeline) -> Arc<dyn PipelineFactory> {
        let mut factory = MockPipelineFactory::new();
        factory
            .expect_build()
            .times(1)
            .return_once(move |_| Ok(Box::new(pipeline)));
        Arc::new(factory)
    }

    fn never_built() -> Arc<dyn PipelineFactory> {
        let mut factory = MockPipelineFactory::new();
        factory.expect_build().never();
        Arc::new(factory)
    }

    #[tokio::test]
    async fn test_empty_input_rejected_before_any_work() {
        let orchestrator = Orchestrator::new(no_classifier(), never_built());

        for query in ["", "   ", " , ,"] {
            let result = orchestrator.run(query).await;
            assert_eq!(result, RunResult::empty_input(), "{query:?}");
            assert_eq!(result.attempts_made(), 0);
        }

        let forced = orchestrator
            .run_with_category(" , ", Some(Category::News))
            .await;
        assert!(matches!(
            forced,
            RunResult::Failure {
                kind: FailureKind::EmptyInput,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_success_on_first_attempt() {
        let mut pipeline = MockPipeline::new();
        pipeline.expect_run().times(1).returning(|_, log| {
            log.line("# Agent: News Researcher");
            Ok("Report".to_string())
        });

        let orchestrator = Orchestrator::new(classifying(Category::General), factory_for(pipeline));
        let result = orchestrator.run("What is photosynthesis?").await;

        assert_eq!(result.report(), Some("Report"));
        assert_eq!(result.attempts_made(), 1);
        assert_eq!(result.logs(), "=== Attempt 1/3 ===\n# Agent: News Researcher");
    }

    #[tokio::test]
    async fn test_classified_news_splits_topics() {
        let mut pipeline = MockPipeline::new();
        pipeline
            .expect_run()
            .returning(|_, _| Ok("Sports and tech".to_string()));

        let mut factory = MockPipelineFactory::new();
        factory
            .expect_build()
            .withf(|kind| {
                *kind
                    == PipelineKind::NewsResearch {
                        topics: vec!["Sports".to_string(), "Technology".to_string()],
                        depth: SearchDepth::Detailed,
                    }
            })
            .times(1)
            .return_once(move |_| Ok(Box::new(pipeline)));

        let orchestrator = Orchestrator::new(classifying(Category::News), Arc::new(factory))
            .with_search_depth(SearchDepth::Detailed);
        let result = orchestrator.run("  Sports, Technology ").await;

        assert!(result.is_success());
    }

    #[tokio::test]
    async fn test_general_keeps_trimmed_query() {
        let mut pipeline = MockPipeline::new();
        pipeline.expect_run().returning(|_, _| Ok("Answer".to_string()));

        let mut factory = MockPipelineFactory::new();
        factory
            .expect_build()
            .withf(|kind| {
                *kind
                    == PipelineKind::GeneralInquiry {
                        query: "How do vaccines work?".to_string(),
                    }
            })
            .return_once(move |_| Ok(Box::new(pipeline)));

        let orchestrator = Orchestrator::new(classifying(Category::General), Arc::new(factory));
        assert!(orchestrator.run(" How do vaccines work? ").await.is_success());
    }

    #[tokio::test]
    async fn test_forced_category_skips_classifier() {
        let mut pipeline = MockPipeline::new();
        pipeline.expect_run().returning(|_, _| Ok("AI news".to_string()));

        let orchestrator = Orchestrator::new(no_classifier(), factory_for(pipeline));
        let result = orchestrator
            .run_with_category("AI", Some(Category::News))
            .await;

        assert_eq!(result.report(), Some("AI news"));
    }

    #[tokio::test]
    async fn test_timeouts_then_success() {
        let mut pipeline = MockPipeline::new();
        let mut calls = 0;
        pipeline.expect_run().times(3).returning(move |_, log| {
            calls += 1;
            log.line(format!("call {calls}"));
            if calls < 3 {
                Err(timeout())
            } else {
                Ok("Late report".to_string())
            }
        });

        let orchestrator = Orchestrator::new(no_classifier(), factory_for(pipeline));
        let result = orchestrator
            .run_with_category("Markets", Some(Category::News))
            .await;

        assert_eq!(result.report(), Some("Late report"));
        let outcomes: Vec<_> = result.attempts().iter().map(|a| &a.outcome).collect();
        assert!(matches!(outcomes[0], AttemptOutcome::Timeout(_)));
        assert!(matches!(outcomes[1], AttemptOutcome::Timeout(_)));
        assert_eq!(outcomes[2], &AttemptOutcome::Success("Late report".to_string()));
        assert_eq!(
            result.attempts().iter().map(|a| a.index).collect::<Vec<_>>(),
            [1, 2, 3]
        );
    }

    #[tokio::test]
    async fn test_all_attempts_time_out() {
        let mut pipeline = MockPipeline::new();
        pipeline.expect_run().times(3).returning(|_, log| {
            log.line("waiting on model");
            Err(timeout())
        });

        let orchestrator = Orchestrator::new(no_classifier(), factory_for(pipeline));
        let result = orchestrator
            .run_with_category("Elections", Some(Category::News))
            .await;

        match &result {
            RunResult::Failure { kind, reason, .. } => {
                assert_eq!(*kind, FailureKind::TimedOut);
                assert_eq!(
                    reason,
                    "timed out after 3 attempts: Request timed out: llm deadline"
                );
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(result.attempts_made(), 3);
        for header in ["=== Attempt 1/3 ===", "=== Attempt 2/3 ===", "=== Attempt 3/3 ==="] {
            assert!(result.logs().contains(header), "{header}");
        }
        assert_eq!(result.logs().matches("waiting on model").count(), 3);
    }

    #[tokio::test]
    async fn test_non_timeout_failure_stops_immediately() {
        let mut pipeline = MockPipeline::new();
        pipeline.expect_run().times(1).returning(|_, _| {
            Err(NewsError::Agent(agent_core::Error::ProcessingFailed(
                "Invalid API key or authentication failed".to_string(),
            )))
        });

        let orchestrator = Orchestrator::new(no_classifier(), factory_for(pipeline));
        let result = orchestrator
            .run_with_category("AI", Some(Category::News))
            .await;

        match result {
            RunResult::Failure {
                kind,
                reason,
                attempts,
                ..
            } => {
                assert_eq!(kind, FailureKind::Pipeline);
                assert!(reason.contains("Invalid API key"));
                assert_eq!(attempts.len(), 1);
                assert!(matches!(attempts[0].outcome, AttemptOutcome::Failed(_)));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_timeout_then_other_error_stops() {
        let mut pipeline = MockPipeline::new();
        let mut calls = 0;
        pipeline.expect_run().times(2).returning(move |_, _| {
            calls += 1;
            if calls == 1 {
                Err(timeout())
            } else {
                Err(NewsError::Api("bad payload".to_string()))
            }
        });

        let orchestrator = Orchestrator::new(no_classifier(), factory_for(pipeline));
        let result = orchestrator
            .run_with_category("AI", Some(Category::News))
            .await;

        assert!(matches!(
            result,
            RunResult::Failure {
                kind: FailureKind::Pipeline,
                ..
            }
        ));
        assert_eq!(result.attempts_made(), 2);
    }

    #[tokio::test]
    async fn test_attempt_budget() {
        let mut pipeline = MockPipeline::new();
        pipeline.expect_run().times(1).returning(|_, _| Err(timeout()));

        let orchestrator =
            Orchestrator::new(no_classifier(), factory_for(pipeline)).with_max_attempts(0);
        assert_eq!(orchestrator.max_attempts(), 1);

        let result = orchestrator
            .run_with_category("AI", Some(Category::News))
            .await;
        assert_eq!(result.attempts_made(), 1);
        assert!(matches!(
            result,
            RunResult::Failure {
                kind: FailureKind::TimedOut,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_build_failure_makes_no_attempt() {
        let mut factory = MockPipelineFactory::new();
        factory
            .expect_build()
            .returning(|_| Err(NewsError::Api("template".to_string())));

        let orchestrator = Orchestrator::new(no_classifier(), Arc::new(factory));
        let result = orchestrator
            .run_kind(PipelineKind::GeneralInquiry {
                query: "x".to_string(),
            })
            .await;

        assert_eq!(result.attempts_made(), 0);
        assert!(!result.is_success());
    }

    #[tokio::test]
    async fn test_manual_retry_restarts_budget() {
        let mut factory = MockPipelineFactory::new();
        let mut builds = 0;
        factory.expect_build().times(2).returning(move |_| {
            builds += 1;
            let mut pipeline = MockPipeline::new();
            if builds == 1 {
                pipeline.expect_run().times(2).returning(|_, _| Err(timeout()));
            } else {
                pipeline
                    .expect_run()
                    .times(1)
                    .returning(|_, _| Ok("Second run".to_string()));
            }
            Ok(Box::new(pipeline))
        });

        let orchestrator =
            Orchestrator::new(no_classifier(), Arc::new(factory)).with_max_attempts(2);

        let first = orchestrator
            .run_with_category("AI", Some(Category::News))
            .await;
        assert_eq!(first.attempts_made(), 2);
        assert!(!first.is_success());

        let second = orchestrator
            .run_with_category("AI", Some(Category::News))
            .await;
        assert_eq!(second.report(), Some("Second run"));
        assert_eq!(second.attempts()[0].index, 1);
        assert!(!second.logs().contains("Attempt 2/2"));
    }
}
