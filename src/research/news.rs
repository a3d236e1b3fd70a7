//! News articles from NewsAPI.

use serde::Deserialize;

use super::{
    DataSourcePlugin, HttpClient, ResearchConfig, SearchRecord, SourceError, NEWS_API_KEY_ENV,
};

const ENDPOINT: &str = "https://newsapi.org/v2/everything";

/// News source, registered as `news`.
pub struct NewsPlugin {
    http: HttpClient,
    api_key: String,
}

impl NewsPlugin {
    /// Creates the source with an explicit API key.
    pub fn new(http: HttpClient, api_key: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
        }
    }

    /// Creates the source from the configured key.
    pub fn from_config(config: &ResearchConfig, http: HttpClient) -> Result<Self, SourceError> {
        config
            .news_api_key
            .as_deref()
            .map(|key| Self::new(http, key))
            .ok_or(SourceError::MissingCredential {
                source: "news",
                variable: NEWS_API_KEY_ENV,
            })
    }
}

impl DataSourcePlugin for NewsPlugin {
    fn name(&self) -> &str {
        "news"
    }

    fn query(&self, query: &str, max_results: usize) -> Result<Vec<SearchRecord>, SourceError> {
        let page_size = max_results.to_string();
        let body = self.http.get_text(
            ENDPOINT,
            &[
                ("q", query),
                ("pageSize", &page_size),
                ("apiKey", &self.api_key),
                ("language", "en"),
            ],
            &[],
        )?;
        parse_response(&body, max_results)
    }
}

#[derive(Deserialize)]
struct NewsResponse {
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Deserialize)]
struct Article {
    title: Option<String>,
    description: Option<String>,
    content: Option<String>,
    url: Option<String>,
}

/// Converts a NewsAPI `everything` response into records.
///
/// The body is the article description, or its content when there is no description.
pub fn parse_response(body: &str, max_results: usize) -> Result<Vec<SearchRecord>, SourceError> {
    let response: NewsResponse = serde_json::from_str(body)?;
    Ok(response
        .articles
        .into_iter()
        .take(max_results)
        .map(|article| {
            let body = article
                .description
                .filter(|text| !text.is_empty())
                .or(article.content)
                .unwrap_or_default();
            let record = SearchRecord::new(article.title.unwrap_or_default(), body);
            match article.url {
                Some(url) => record.with_url(url),
                None => record,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn articles_become_records() {
        let body = r#"{"articles": [
            {"title": "Test News", "description": "Desc", "url": "http://example.com"}
        ]}"#;
        let records = parse_response(body, 1).expect("valid response");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Test News");
        assert_eq!(records[0].body, "Desc");
        assert_eq!(records[0].url.as_deref(), Some("http://example.com"));
    }

    #[test]
    fn content_replaces_missing_description() {
        let body = r#"{"articles": [
            {"title": "A", "description": null, "content": "Full text", "url": null},
            {"title": "B", "description": "", "content": "Other"}
        ]}"#;
        let records = parse_response(body, 10).expect("valid response");
        assert_eq!(records[0].body, "Full text");
        assert_eq!(records[0].url, None);
        assert_eq!(records[1].body, "Other");
    }

    #[test]
    fn missing_key_is_reported() {
        let config = ResearchConfig::default();
        let http = HttpClient::new(config.timeout);
        let err = NewsPlugin::from_config(&config, http).err().expect("no key configured");
        assert!(err.to_string().contains(NEWS_API_KEY_ENV));
    }
}
