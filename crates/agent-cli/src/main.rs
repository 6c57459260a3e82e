//! news-crew command-line interface
//!
//! # Usage
//!
//! ```bash
//! export GROQ_API_KEY=...
//! export GNEWS_API_KEY=...
//! export SERPER_API_KEY=...
//!
//! # Research news topics (always news, no classification)
//! news-crew research --topics "AI, Climate"
//!
//! # Ask anything; the query is routed to news or general
//! news-crew ask "How do vaccines work?" --show-logs
//! news-crew ask --quick Technology
//! ```

use agent_news::{
    Category, FailureKind, NewsConfig, Orchestrator, PipelineKind, RunResult, SearchDepth,
    build_orchestrator, split_topics,
};
use clap::{Args, Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "news-crew")]
#[command(about = "Research news and answer questions with a crew of LLM agents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Research comma-separated news topics
    Research {
        /// Topics, separated by commas; prompted for when absent
        #[arg(short, long)]
        topics: Option<String>,

        #[command(flatten)]
        depth: DepthArg,
    },

    /// Ask a question; news or general is decided automatically
    Ask {
        /// Free-text query; prompted for when absent
        query: Option<String>,

        /// Research a topic as news without classification
        #[arg(short, long, conflicts_with = "query")]
        quick: Option<String>,

        /// Print the captured agent logs
        #[arg(long)]
        show_logs: bool,

        #[command(flatten)]
        depth: DepthArg,
    },

    /// Analyse recent articles on one topic
    Analyze {
        /// Topic to analyse
        #[arg(short, long)]
        topic: String,

        /// Number of articles to analyse
        #[arg(long, default_value_t = 5)]
        article_count: usize,

        /// Comma-separated focus areas
        #[arg(long, default_value = "key developments, perspectives, sentiment")]
        focus_areas: String,
    },

    /// Rate the credibility of sources covering a topic
    Sources {
        /// Topic to evaluate sources for
        #[arg(short, long)]
        topic: String,

        /// Comma-separated source types
        #[arg(long, default_value = "newspapers, broadcast, online outlets")]
        source_types: String,

        /// Comma-separated credibility criteria
        #[arg(long, default_value = "accuracy, transparency, editorial standards")]
        criteria: String,
    },

    /// Report on trending topics
    Trends {
        /// Comma-separated news categories
        #[arg(short, long, default_value = "politics, technology, business")]
        categories: String,

        /// Time frame of the report
        #[arg(long, default_value = "last 24 hours")]
        time_period: String,

        /// Comma-separated regions
        #[arg(long, default_value = "global")]
        regions: String,
    },
}

#[derive(Args, Debug, Clone, Copy)]
struct DepthArg {
    /// Search depth: basic, comprehensive or detailed
    #[arg(short, long, default_value_t = SearchDepth::Comprehensive)]
    depth: SearchDepth,
}

fn print_banner() {
    println!("## Welcome to the News Research Crew");
    println!("-------------------------------");
}

fn print_report(report: &str) {
    println!("\n\n########################");
    println!("## Here is your News Research Report");
    println!("########################\n");
    println!("{report}");
}

/// Print `prompt` and read one trimmed line; `None` on end of input
fn read_line(prompt: &str) -> io::Result<Option<String>> {
    print!("{prompt}");
    io::stdout().flush()?;

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input)? == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim().to_string()))
}

fn show_logs(logs: &str) {
    if logs.is_empty() {
        return;
    }
    println!("\n--- Crew logs ---");
    println!("{logs}");
    println!("-----------------");
}

/// Text shown for a failed run
fn failure_message(kind: FailureKind, reason: &str) -> String {
    match kind {
        FailureKind::EmptyInput => "Please enter at least one topic.".to_string(),
        FailureKind::TimedOut => format!("Crew run {reason}"),
        FailureKind::Pipeline => format!("Crew run failed: {reason}"),
    }
}

/// Print a run result; returns whether a manual retry makes sense
fn present(result: &RunResult, with_logs: bool) -> bool {
    match result {
        RunResult::Success { report, logs, .. } => {
            if with_logs {
                show_logs(logs);
            }
            println!("\nRun complete ({} attempt(s))", result.attempts_made());
            print_report(report);
            false
        }
        RunResult::Failure {
            kind, reason, logs, ..
        } => {
            show_logs(logs);
            eprintln!("\n{}", failure_message(*kind, reason));
            *kind != FailureKind::EmptyInput
        }
    }
}

async fn research(orchestrator: &Orchestrator, topics: Option<String>) -> anyhow::Result<()> {
    print_banner();

    let topics = match topics {
        Some(topics) => topics,
        None => read_line(
            "What news topics would you like to research? (separate multiple topics with commas)\n",
        )?
        .unwrap_or_default(),
    };

    let result = orchestrator
        .run_with_category(&topics, Some(Category::News))
        .await;
    present(&result, false);

    match result {
        RunResult::Success { .. } => Ok(()),
        RunResult::Failure { kind, reason, .. } => {
            anyhow::bail!("{}", failure_message(kind, &reason))
        }
    }
}

async fn ask(
    orchestrator: &Orchestrator,
    query: Option<String>,
    quick: Option<String>,
    with_logs: bool,
) -> anyhow::Result<()> {
    let (query, forced) = match (quick, query) {
        (Some(topic), _) => (topic, Some(Category::News)),
        (None, Some(query)) => (query, None),
        (None, None) => (
            read_line("What would you like to know?\n")?.unwrap_or_default(),
            None,
        ),
    };

    loop {
        info!(query = %query, forced = ?forced, "Running query");
        let result = orchestrator.run_with_category(&query, forced).await;

        if !present(&result, with_logs) {
            return Ok(());
        }

        let answer = read_line("\nRetry from the first attempt? [y/N] ")?.unwrap_or_default();
        if !answer.eq_ignore_ascii_case("y") {
            return Ok(());
        }
    }
}

async fn run_task(orchestrator: &Orchestrator, kind: PipelineKind) -> anyhow::Result<()> {
    let result = orchestrator.run_kind(kind).await;
    present(&result, false);

    match result {
        RunResult::Success { .. } => Ok(()),
        RunResult::Failure { kind, reason, .. } => {
            anyhow::bail!("{}", failure_message(kind, &reason))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    agent_utils::init_tracing_with_default("warn,agent_news=info");

    let cli = Cli::parse();
    let config = Arc::new(NewsConfig::from_env()?);
    info!(model = %config.model, max_attempts = config.max_attempts, "Configuration loaded");

    let orchestrator = build_orchestrator(config)?;

    match cli.command {
        Command::Research { topics, depth } => {
            research(&orchestrator.with_search_depth(depth.depth), topics).await
        }
        Command::Ask {
            query,
            quick,
            show_logs,
            depth,
        } => ask(&orchestrator.with_search_depth(depth.depth), query, quick, show_logs).await,
        Command::Analyze {
            topic,
            article_count,
            focus_areas,
        } => {
            run_task(
                &orchestrator,
                PipelineKind::ArticleAnalysis {
                    topic,
                    article_count,
                    focus_areas: split_topics(&focus_areas),
                },
            )
            .await
        }
        Command::Sources {
            topic,
            source_types,
            criteria,
        } => {
            run_task(
                &orchestrator,
                PipelineKind::SourceEvaluation {
                    topic,
                    source_types: split_topics(&source_types),
                    credibility_criteria: split_topics(&criteria),
                },
            )
            .await
        }
        Command::Trends {
            categories,
            time_period,
            regions,
        } => {
            run_task(
                &orchestrator,
                PipelineKind::TrendMonitoring {
                    categories: split_topics(&categories),
                    time_period,
                    regions: split_topics(&regions),
                },
            )
            .await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_ask() {
        let cli = Cli::parse_from(["news-crew", "ask", "--quick", "AI", "--depth", "Detailed"]);
        match cli.command {
            Command::Ask {
                query,
                quick,
                show_logs,
                depth,
            } => {
                assert!(query.is_none());
                assert_eq!(quick.as_deref(), Some("AI"));
                assert!(!show_logs);
                assert_eq!(depth.depth, SearchDepth::Detailed);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_quick_conflicts_with_query() {
        assert!(Cli::try_parse_from(["news-crew", "ask", "what", "--quick", "AI"]).is_err());
    }

    #[test]
    fn test_failure_messages() {
        assert_eq!(
            failure_message(FailureKind::EmptyInput, "empty input"),
            "Please enter at least one topic."
        );
        assert_eq!(
            failure_message(FailureKind::TimedOut, "timed out after 3 attempts: slow"),
            "Crew run timed out after 3 attempts: slow"
        );
    }
}
