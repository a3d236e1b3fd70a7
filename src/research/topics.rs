//! Topic lists produced by the language model, with a fixed fallback.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Topics used when no model is configured or its answer cannot be parsed.
pub const FALLBACK_TOPICS: [(&str, &str); 3] = [
    ("Agentic AI & Reward Hacking", "Anthropic reward hacking"),
    ("Vibe Coding vs AI Engineering", "vibe coding debate"),
    ("Model Context Protocol (MCP)", "Model Context Protocol adoption"),
];

/// A subject to research, with the search query used for its deep dive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    /// Section title.
    pub title: String,
    /// Search query.
    pub query: String,
}

impl Topic {
    /// Creates a topic.
    pub fn new(title: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            query: query.into(),
        }
    }
}

/// [`FALLBACK_TOPICS`] as owned topics.
pub fn fallback_topics() -> Vec<Topic> {
    FALLBACK_TOPICS
        .iter()
        .map(|(title, query)| Topic::new(*title, *query))
        .collect()
}

/// Why a model answer did not yield topics.
#[derive(Debug)]
pub enum TopicParseError {
    /// The answer is not the expected JSON.
    Json(serde_json::Error),
    /// The answer parsed but listed no usable topic.
    Empty,
}

impl fmt::Display for TopicParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(err) => write!(f, "topic list is not valid JSON: {err}"),
            Self::Empty => f.write_str("topic list is empty"),
        }
    }
}

impl std::error::Error for TopicParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::Empty => None,
        }
    }
}

impl From<serde_json::Error> for TopicParseError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TopicList {
    Wrapped { topics: Vec<Topic> },
    Bare(Vec<Topic>),
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening fence line.
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Parses `{"topics": [{"title", "query"}]}`, or a bare array of topics.
///
/// Answers wrapped in a markdown code fence are accepted. Topics with a blank title or query
/// are dropped.
pub fn parse_topics(content: &str) -> Result<Vec<Topic>, TopicParseError> {
    let list: TopicList = serde_json::from_str(strip_code_fence(content))?;
    let topics = match list {
        TopicList::Wrapped { topics } | TopicList::Bare(topics) => topics,
    };
    let topics: Vec<Topic> = topics
        .into_iter()
        .filter(|topic| !topic.title.trim().is_empty() && !topic.query.trim().is_empty())
        .collect();
    if topics.is_empty() {
        Err(TopicParseError::Empty)
    } else {
        Ok(topics)
    }
}
