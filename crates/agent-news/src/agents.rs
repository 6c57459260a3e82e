//! Agent profiles for the news research crew
//!
//! A profile is the role/goal/backstory bundle that becomes the system
//! prompt of a tool-calling executor.

/// Name of the news search tool
pub const SEARCH_NEWS: &str = "search_news";

/// Name of the web search tool
pub const SEARCH_INTERNET: &str = "search_internet";

/// Role, goal, backstory and tool set of one agent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentProfile {
    /// Role name, also used as the agent name
    pub role: &'static str,
    /// What the agent is trying to achieve
    pub goal: &'static str,
    /// Persona text
    pub backstory: &'static str,
    /// Tools the agent may call
    pub tools: &'static [&'static str],
}

impl AgentProfile {
    /// System prompt for an executor running this profile
    pub fn system_prompt(&self) -> String {
        format!(
            "You are {}. {}\nYour goal: {}",
            self.role, self.backstory, self.goal
        )
    }
}

/// Primary researcher for news topics and general questions
pub const NEWS_RESEARCHER: AgentProfile = AgentProfile {
    role: "News Researcher",
    goal: "Conduct thorough research on specified topics, gather information from multiple \
           reliable sources, and provide comprehensive, well-structured reports on current \
           events and news topics.",
    backstory: "A comprehensive news research specialist with expertise in gathering \
                information from multiple sources, synthesizing complex topics, and providing \
                thorough analysis of current events.",
    tools: &[SEARCH_NEWS, SEARCH_INTERNET],
};

/// Breaks down articles and trends
pub const NEWS_ANALYST: AgentProfile = AgentProfile {
    role: "News Analyst",
    goal: "Analyze news articles, identify key trends, extract meaningful insights, and \
           provide comprehensive analysis of current events and their broader implications.",
    backstory: "I'm a seasoned expert in news analysis and interpretation. With years of \
                experience in journalism and media analysis, I specialize in breaking down \
                complex news stories and identifying key trends and implications.",
    tools: &[SEARCH_NEWS, SEARCH_INTERNET],
};

/// Fact-checks and rates news sources
pub const SOURCE_VERIFICATION_SPECIALIST: AgentProfile = AgentProfile {
    role: "Source Verification Specialist",
    goal: "Verify the credibility of news sources, fact-check information, assess bias \
           levels, and ensure the reliability of news content before it's reported or \
           analyzed.",
    backstory: "A professional fact-checker and source verification expert who specializes \
                in evaluating the credibility of news sources and verifying the accuracy of \
                information.",
    tools: &[SEARCH_INTERNET, SEARCH_NEWS],
};

/// Tracks viral and emerging stories
pub const TRENDING_TOPICS_MONITOR: AgentProfile = AgentProfile {
    role: "Trending Topics Monitor",
    goal: "Monitor trending topics, identify viral news stories, track story development \
           over time, and provide insights into what content is gaining traction and why.",
    backstory: "A social media and news trend expert who specializes in identifying viral \
                content, emerging stories, and breaking news across multiple platforms and \
                sources.",
    tools: &[SEARCH_NEWS, SEARCH_INTERNET],
};

/// Every profile, in declaration order
pub const ALL: [AgentProfile; 4] = [
    NEWS_RESEARCHER,
    NEWS_ANALYST,
    SOURCE_VERIFICATION_SPECIALIST,
    TRENDING_TOPICS_MONITOR,
];
