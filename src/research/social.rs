//! Recent posts from the Twitter/X v2 search API.

use serde::Deserialize;

use super::{
    DataSourcePlugin, HttpClient, ResearchConfig, SearchRecord, SourceError, SNS_BEARER_TOKEN_ENV,
};

const ENDPOINT: &str = "https://api.twitter.com/2/tweets/search/recent";
const TITLE_CHARS: usize = 60;

/// Social media source, registered as `social`.
pub struct SocialPlugin {
    http: HttpClient,
    bearer_token: String,
}

impl SocialPlugin {
    /// Creates the source with an explicit bearer token.
    pub fn new(http: HttpClient, bearer_token: impl Into<String>) -> Self {
        Self {
            http,
            bearer_token: bearer_token.into(),
        }
    }

    /// Creates the source from the configured token.
    pub fn from_config(config: &ResearchConfig, http: HttpClient) -> Result<Self, SourceError> {
        config
            .sns_bearer_token
            .as_deref()
            .map(|token| Self::new(http, token))
            .ok_or(SourceError::MissingCredential {
                source: "social",
                variable: SNS_BEARER_TOKEN_ENV,
            })
    }
}

impl DataSourcePlugin for SocialPlugin {
    fn name(&self) -> &str {
        "social"
    }

    fn query(&self, query: &str, max_results: usize) -> Result<Vec<SearchRecord>, SourceError> {
        // The API rejects page sizes outside 10..=100.
        let page_size = max_results.clamp(10, 100).to_string();
        let authorization = format!("Bearer {}", self.bearer_token);
        let body = self.http.get_text(
            ENDPOINT,
            &[
                ("query", query),
                ("max_results", &page_size),
                ("tweet.fields", "author_id,created_at,text"),
            ],
            &[("Authorization", &authorization)],
        )?;
        parse_response(&body, max_results)
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<Post>,
}

#[derive(Deserialize)]
struct Post {
    id: String,
    #[serde(default)]
    text: String,
}

fn title_of(text: &str) -> String {
    let first_line = text.lines().next().unwrap_or_default().trim();
    if first_line.chars().count() <= TITLE_CHARS {
        first_line.to_owned()
    } else {
        let mut title: String = first_line.chars().take(TITLE_CHARS).collect();
        title.push_str("...");
        title
    }
}

/// Converts a recent search response into records linking to each post.
pub fn parse_response(body: &str, max_results: usize) -> Result<Vec<SearchRecord>, SourceError> {
    let response: SearchResponse = serde_json::from_str(body)?;
    Ok(response
        .data
        .into_iter()
        .take(max_results)
        .map(|post| {
            SearchRecord::new(title_of(&post.text), post.text)
                .with_url(format!("https://twitter.com/i/web/status/{}", post.id))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn posts_become_records() {
        let body = r#"{"data": [
            {"id": "1", "text": "Tweet content", "author_id": "123", "created_at": "2025-01-01T00:00:00Z"}
        ]}"#;
        let records = parse_response(body, 1).expect("valid response");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].body, "Tweet content");
        assert_eq!(records[0].title, "Tweet content");
        assert_eq!(
            records[0].url.as_deref(),
            Some("https://twitter.com/i/web/status/1")
        );
    }

    #[test]
    fn long_posts_get_short_titles() {
        let text = "x".repeat(100);
        assert_eq!(title_of(&text).chars().count(), TITLE_CHARS + 3);
        assert_eq!(title_of("first line\nsecond"), "first line");
    }

    #[test]
    fn empty_result_has_no_data_key() {
        let records = parse_response(r#"{"meta": {"result_count": 0}}"#, 10).expect("valid");
        assert!(records.is_empty());
    }
}
