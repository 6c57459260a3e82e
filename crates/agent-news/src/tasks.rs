//! Task templates for the news research crew
//!
//! Descriptions are rendered with MiniJinja. The user message an agent
//! receives is the description followed by the expected output section.

use crate::error::{NewsError, Result};
use agent_utils::ConfigError;
use minijinja::Environment;
use serde_json::{Value, json};
use std::fmt;
use std::str::FromStr;

/// How deep the news research should go
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchDepth {
    /// Headlines only
    Basic,
    /// Key developments with context
    #[default]
    Comprehensive,
    /// Background, perspectives and figures
    Detailed,
}

impl SearchDepth {
    /// Instruction woven into the research task
    pub fn guidance(self) -> &'static str {
        match self {
            Self::Basic => {
                "Keep the report brief: cover the most important headlines for each topic."
            }
            Self::Comprehensive => {
                "Cover each topic thoroughly with key developments, context and implications."
            }
            Self::Detailed => {
                "Go in depth on each topic: include background, multiple perspectives, \
                 statistics and a detailed timeline."
            }
        }
    }
}

impl fmt::Display for SearchDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Basic => "basic",
            Self::Comprehensive => "comprehensive",
            Self::Detailed => "detailed",
        })
    }
}

impl FromStr for SearchDepth {
    type Err = NewsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "comprehensive" => Ok(Self::Comprehensive),
            "detailed" => Ok(Self::Detailed),
            other => Err(ConfigError::Invalid {
                name: "search depth".to_string(),
                detail: format!("'{other}' (expected basic, comprehensive or detailed)"),
            }
            .into()),
        }
    }
}

/// A rendered task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSpec {
    /// What the agent must do
    pub description: String,
    /// Shape of the final answer
    pub expected_output: String,
}

impl TaskSpec {
    /// User message handed to the agent
    pub fn prompt(&self) -> String {
        format!(
            "{}\n\nExpected output:\n{}",
            self.description, self.expected_output
        )
    }
}

const RESEARCH_NEWS: &str = "\
**Task**: Comprehensive News Research and Analysis
**Objective**: Research and analyze current news on the specified topics, providing a detailed report with insights, trends, and key developments.

**Research Requirements**:
- Search for the latest news articles on each topic
- Identify key trends, patterns, and developments
- Analyze the significance and implications of major events
- Summarize findings in a clear, structured format
- Include relevant dates, sources, and context

**Output Format**:
- Executive summary of key findings
- Detailed analysis for each topic
- Timeline of important events
- Trend analysis and implications
- Source citations and reliability assessment

**Research Parameters**:
- Topics: {{ topics | join(\", \") }}
- Focus: Current events and recent developments
- Search Depth: {{ depth }} ({{ guidance }})";

const RESEARCH_NEWS_OUTPUT: &str = "\
A comprehensive report covering:
- Executive summary
- Topic-by-topic analysis
- Event timeline
- Trend implications
- Source citations";

const GENERAL_INQUIRY: &str = "\
**Task**: Answer General Inquiry Question
**Objective**: Research and provide a comprehensive answer to the following question:

{{ query }}

**Requirements**:
- Search for accurate, relevant information
- Synthesize information from multiple reliable sources
- Provide clear, well-structured explanation
- Include context, examples, and relevant details
- Cite sources and maintain objectivity

**Output Format**:
- Direct answer to the question
- Supporting details and explanation
- Relevant context and examples
- Source citations";

const GENERAL_INQUIRY_OUTPUT: &str = "\
A comprehensive answer including:
- Clear response to the inquiry
- Supporting details and explanation
- Relevant context and examples
- Source citations";

const ANALYZE_ARTICLES: &str = "\
**Task**: Analyze News Articles on Specific Topic
**Description**: Conduct a thorough analysis of recent news articles on {{ topic }}. Extract key information, identify different perspectives, analyze sentiment, and provide a comprehensive summary with insights. Focus on credible sources and verify information across multiple outlets to ensure accuracy and completeness.
**Parameters**:
- Topic: {{ topic }}
- Article Count: {{ article_count }}
- Focus Areas: {{ focus_areas | join(\", \") }}";

const ANALYZE_ARTICLES_OUTPUT: &str = "\
A structured analysis including:
- Key findings and insights
- Perspectives and sentiment overview
- Notable quotes and statistics
- Summary with actionable takeaways";

const EVALUATE_SOURCES: &str = "\
**Task**: Evaluate News Source Credibility and Reliability
**Objective**: Analyze multiple news sources and assess their reliability for covering {{ topic }}. Provide rankings based on credibility and quality metrics.

**Key Considerations**:
- Assess source credibility, fact-checking standards, and editorial policies.
- Analyze potential bias, political leanings, and reporting objectivity.
- Evaluate coverage quality, depth, and journalistic standards.
- Consider source track record and reputation in the industry.

**Evaluation Details**:
- Topic Focus: {{ topic }}
- Source Types: {{ source_types | join(\", \") }}
- Credibility Criteria: {{ credibility_criteria | join(\", \") }}";

const EVALUATE_SOURCES_OUTPUT: &str = "\
A ranked list of sources with:
- Credibility scores and justifications
- Bias analysis and leanings
- Reporting quality notes
- Coverage breadth/depth assessment";

const MONITOR_TRENDING: &str = "\
**Task**: Monitor and Analyze Trending News Topics
**Objective**: Track trending topics across {{ categories | join(\", \") }} to identify emerging stories, viral content, and developing news events. Provide insights into story momentum and public interest.
**Key Insights to Include**:
- Top trending topics and their growth patterns.
- Social media engagement metrics and viral potential.
- Geographic distribution of interest and regional variations.
- Timeline analysis showing how topics develop and spread.
**Monitoring Parameters**:
- Categories: {{ categories | join(\", \") }}
- Time Period: {{ time_period }}
- Regions: {{ regions | join(\", \") }}";

const MONITOR_TRENDING_OUTPUT: &str = "\
A trends report including:
- Top trending topics with momentum
- Engagement metrics
- Regional interest patterns
- Timeline of development";

fn render(template: &str, vars: &Value, expected_output: &str) -> Result<TaskSpec> {
    let env = Environment::new();
    let description = env.render_str(template, minijinja::value::Value::from_serialize(vars))?;

    Ok(TaskSpec {
        description,
        expected_output: expected_output.to_string(),
    })
}

/// Research the latest news on `topics`
pub fn research_news(topics: &[String], depth: SearchDepth) -> Result<TaskSpec> {
    render(
        RESEARCH_NEWS,
        &json!({
            "topics": topics,
            "depth": depth.to_string(),
            "guidance": depth.guidance(),
        }),
        RESEARCH_NEWS_OUTPUT,
    )
}

/// Answer a question that is not about current events
pub fn general_inquiry(query: &str) -> Result<TaskSpec> {
    render(
        GENERAL_INQUIRY,
        &json!({ "query": query }),
        GENERAL_INQUIRY_OUTPUT,
    )
}

/// Analyse recent coverage of one topic
pub fn analyze_articles(
    topic: &str,
    article_count: usize,
    focus_areas: &[String],
) -> Result<TaskSpec> {
    render(
        ANALYZE_ARTICLES,
        &json!({
            "topic": topic,
            "article_count": article_count,
            "focus_areas": focus_areas,
        }),
        ANALYZE_ARTICLES_OUTPUT,
    )
}

/// Rank news sources for a topic by credibility
pub fn evaluate_sources(
    topic: &str,
    source_types: &[String],
    credibility_criteria: &[String],
) -> Result<TaskSpec> {
    render(
        EVALUATE_SOURCES,
        &json!({
            "topic": topic,
            "source_types": source_types,
            "credibility_criteria": credibility_criteria,
        }),
        EVALUATE_SOURCES_OUTPUT,
    )
}

/// Report on trending topics
pub fn monitor_trending_topics(
    categories: &[String],
    time_period: &str,
    regions: &[String],
) -> Result<TaskSpec> {
    render(
        MONITOR_TRENDING,
        &json!({
            "categories": categories,
            "time_period": time_period,
            "regions": regions,
        }),
        MONITOR_TRENDING_OUTPUT,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_search_depth_parsing() {
        assert_eq!("Basic".parse::<SearchDepth>().unwrap(), SearchDepth::Basic);
        assert_eq!(" DETAILED ".parse::<SearchDepth>().unwrap(), SearchDepth::Detailed);
        assert!("deep".parse::<SearchDepth>().is_err());
        assert_eq!(SearchDepth::default(), SearchDepth::Comprehensive);
        assert_eq!(SearchDepth::Comprehensive.to_string(), "comprehensive");
    }

    #[test]
    fn test_research_news_embeds_topics_and_depth() {
        let task = research_news(&strings(&["AI", "Climate"]), SearchDepth::Basic).unwrap();

        assert!(task.description.contains("- Topics: AI, Climate"));
        assert!(task.description.contains("- Search Depth: basic (Keep the report brief"));
        assert!(task.expected_output.starts_with("A comprehensive report covering:"));
    }

    #[test]
    fn test_general_inquiry_embeds_query() {
        let task = general_inquiry("How does photosynthesis work?").unwrap();
        assert!(
            task.description
                .contains("question:\n\nHow does photosynthesis work?\n\n**Requirements**")
        );
    }

    #[test]
    fn test_supplementary_tasks() {
        let analysis = analyze_articles("AI", 5, &strings(&["policy", "markets"])).unwrap();
        assert!(analysis.description.contains("- Article Count: 5"));
        assert!(analysis.description.contains("- Focus Areas: policy, markets"));

        let sources =
            evaluate_sources("AI", &strings(&["newspapers"]), &strings(&["accuracy"])).unwrap();
        assert!(sources.description.contains("covering AI."));
        assert!(sources.description.contains("- Credibility Criteria: accuracy"));

        let trends =
            monitor_trending_topics(&strings(&["tech", "sports"]), "24 hours", &strings(&["EU"]))
                .unwrap();
        assert!(trends.description.contains("across tech, sports to identify"));
        assert!(trends.description.contains("- Time Period: 24 hours"));
    }

    #[test]
    fn test_prompt_layout() {
        let task = TaskSpec {
            description: "Do it".to_string(),
            expected_output: "A thing".to_string(),
        };
        assert_eq!(task.prompt(), "Do it\n\nExpected output:\nA thing");
    }
}
