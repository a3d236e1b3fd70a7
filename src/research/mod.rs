//! Topic research that produces the markdown a report is rendered from.
//!
//! Data sources implement [`DataSourcePlugin`] and are looked up by name in a
//! [`PluginRegistry`].  Every source performs a single HTTP attempt; a failing source is logged
//! and contributes no records.

pub mod academic;
pub mod http;
pub mod llm;
pub mod news;
pub mod pipeline;
pub mod social;
pub mod topics;
pub mod web;

use std::env;
use std::fmt;
use std::time::Duration;

use log::{info, warn};
use serde::Serialize;

pub use self::http::HttpClient;
pub use self::pipeline::{compose_markdown, ReportSection, Researcher};
pub use self::topics::{parse_topics, Topic, TopicParseError, FALLBACK_TOPICS};

/// API key of the OpenAI-compatible chat endpoint.
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";
/// Base URL of the chat endpoint, e.g. a local server.
pub const OPENAI_BASE_URL_ENV: &str = "OPENAI_BASE_URL";
/// Model name sent with chat requests.
pub const MODEL_ENV: &str = "TECHSPRING_MODEL";
/// NewsAPI key.
pub const NEWS_API_KEY_ENV: &str = "NEWS_API_KEY";
/// Bearer token of the social search API.
pub const SNS_BEARER_TOKEN_ENV: &str = "SNS_BEARER_TOKEN";

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-oss";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// One search hit, normalized across sources.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SearchRecord {
    /// Headline of the hit.
    pub title: String,
    /// Snippet, abstract or post text.
    pub body: String,
    /// Link to the original, when the source provides one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl SearchRecord {
    /// Creates a record without a link.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            url: None,
        }
    }

    /// Attaches a link.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// Failure of a single data source.
#[derive(Debug)]
pub enum SourceError {
    /// A credential needed by the source is not configured.
    MissingCredential {
        /// Source name.
        source: &'static str,
        /// Environment variable that would provide the credential.
        variable: &'static str,
    },
    /// The HTTP request failed or returned an error status.
    Http(ureq::Error),
    /// The response body could not be interpreted.
    Decode(String),
    /// No plugin is registered under the requested name.
    UnknownSource(String),
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCredential { source, variable } => {
                write!(f, "{source} source needs the {variable} environment variable")
            }
            Self::Http(err) => write!(f, "request failed: {err}"),
            Self::Decode(message) => write!(f, "unexpected response: {message}"),
            Self::UnknownSource(name) => write!(f, "no data source named {name:?}"),
        }
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ureq::Error> for SourceError {
    fn from(err: ureq::Error) -> Self {
        Self::Http(err)
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<roxmltree::Error> for SourceError {
    fn from(err: roxmltree::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// A searchable data source.
pub trait DataSourcePlugin {
    /// Registry name of the source.
    fn name(&self) -> &str;

    /// Returns at most `max_results` records for `query`, best match first.
    fn query(&self, query: &str, max_results: usize) -> Result<Vec<SearchRecord>, SourceError>;
}

/// Data sources in registration order, addressable by name.
#[derive(Default)]
pub struct PluginRegistry {
    plugins: Vec<Box<dyn DataSourcePlugin>>,
}

impl PluginRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every source that `config` has credentials for.
    pub fn from_config(config: &ResearchConfig, http: &HttpClient) -> Self {
        let mut registry = Self::new();
        registry.register(web::WebSearchPlugin::new(http.clone()));
        registry.register(academic::AcademicPlugin::new(http.clone()));

        match news::NewsPlugin::from_config(config, http.clone()) {
            Ok(plugin) => registry.register(plugin),
            Err(err) => info!("news source disabled: {err}"),
        }
        match social::SocialPlugin::from_config(config, http.clone()) {
            Ok(plugin) => registry.register(plugin),
            Err(err) => info!("social source disabled: {err}"),
        }
        registry
    }

    /// Adds a source; a source with the same name is replaced.
    pub fn register(&mut self, plugin: impl DataSourcePlugin + 'static) {
        self.plugins.retain(|existing| existing.name() != plugin.name());
        self.plugins.push(Box::new(plugin));
    }

    /// Registered names in order.
    pub fn names(&self) -> Vec<&str> {
        self.plugins.iter().map(|plugin| plugin.name()).collect()
    }

    /// Looks up a source by name.
    pub fn get(&self, name: &str) -> Option<&dyn DataSourcePlugin> {
        self.plugins
            .iter()
            .find(|plugin| plugin.name() == name)
            .map(|plugin| plugin.as_ref())
    }

    /// Queries the named source.
    pub fn query(
        &self,
        name: &str,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchRecord>, SourceError> {
        self.get(name)
            .ok_or_else(|| SourceError::UnknownSource(name.to_owned()))?
            .query(query, max_results)
    }

    /// Queries every source in order; failing sources are logged and skipped.
    pub fn query_all(&self, query: &str, max_results: usize) -> Vec<SearchRecord> {
        let mut records = Vec::new();
        for plugin in &self.plugins {
            match plugin.query(query, max_results) {
                Ok(mut found) => records.append(&mut found),
                Err(err) => warn!("{} search for {:?} failed: {}", plugin.name(), query, err),
            }
        }
        records
    }
}

/// Credentials and endpoints of the research collaborators.
#[derive(Clone, Debug)]
pub struct ResearchConfig {
    /// Key for the chat endpoint; without it topics and summaries use the fallbacks.
    pub openai_api_key: Option<String>,
    /// Base URL of the OpenAI-compatible API.
    pub llm_base_url: String,
    /// Model name.
    pub model: String,
    /// NewsAPI key.
    pub news_api_key: Option<String>,
    /// Social search bearer token.
    pub sns_bearer_token: Option<String>,
    /// Timeout of every HTTP request.
    pub timeout: Duration,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            llm_base_url: DEFAULT_BASE_URL.to_owned(),
            model: DEFAULT_MODEL.to_owned(),
            news_api_key: None,
            sns_bearer_token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ResearchConfig {
    /// Reads the configuration from the environment.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            openai_api_key: env_value(OPENAI_API_KEY_ENV),
            llm_base_url: env_value(OPENAI_BASE_URL_ENV).unwrap_or(defaults.llm_base_url),
            model: env_value(MODEL_ENV).unwrap_or(defaults.model),
            news_api_key: env_value(NEWS_API_KEY_ENV),
            sns_bearer_token: env_value(SNS_BEARER_TOKEN_ENV),
            timeout: defaults.timeout,
        }
    }
}

fn env_value(var: &str) -> Option<String> {
    env::var(var)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

/// Collapses runs of whitespace (including newlines) into single spaces.
pub(crate) fn squash_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::Cell;

    /// In-memory source returning canned records.
    pub(crate) struct StaticSource {
        pub name: &'static str,
        pub records: Vec<SearchRecord>,
        pub fail: bool,
        pub calls: Cell<usize>,
    }

    impl StaticSource {
        pub(crate) fn new(name: &'static str, records: Vec<SearchRecord>) -> Self {
            Self {
                name,
                records,
                fail: false,
                calls: Cell::new(0),
            }
        }

        pub(crate) fn failing(name: &'static str) -> Self {
            Self {
                fail: true,
                ..Self::new(name, Vec::new())
            }
        }
    }

    impl DataSourcePlugin for StaticSource {
        fn name(&self) -> &str {
            self.name
        }

        fn query(&self, _query: &str, max_results: usize) -> Result<Vec<SearchRecord>, SourceError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                return Err(SourceError::Decode("offline".into()));
            }
            Ok(self.records.iter().take(max_results).cloned().collect())
        }
    }

    #[test]
    fn registry_dispatches_by_name() {
        let mut registry = PluginRegistry::new();
        registry.register(StaticSource::new("web", vec![SearchRecord::new("a", "b")]));
        registry.register(StaticSource::new("news", Vec::new()));

        assert_eq!(registry.names(), vec!["web", "news"]);
        assert_eq!(registry.query("web", "q", 5).expect("web answers").len(), 1);
        assert!(matches!(
            registry.query("missing", "q", 5),
            Err(SourceError::UnknownSource(name)) if name == "missing"
        ));
    }

    #[test]
    fn registering_same_name_replaces() {
        let mut registry = PluginRegistry::new();
        registry.register(StaticSource::new("web", Vec::new()));
        registry.register(StaticSource::new("web", vec![SearchRecord::new("x", "y")]));
        assert_eq!(registry.names(), vec!["web"]);
        assert_eq!(registry.query_all("q", 5).len(), 1);
    }

    #[test]
    fn failing_sources_are_skipped() {
        let mut registry = PluginRegistry::new();
        registry.register(StaticSource::failing("news"));
        registry.register(StaticSource::new(
            "web",
            vec![SearchRecord::new("1", ""), SearchRecord::new("2", "")],
        ));

        let records = registry.query_all("q", 1);
        assert_eq!(records, vec![SearchRecord::new("1", "")]);
    }

    #[test]
    fn whitespace_is_squashed() {
        assert_eq!(squash_whitespace("  Paper\n   Title \t"), "Paper Title");
    }
}
