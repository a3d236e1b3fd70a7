//! General web search through the DuckDuckGo instant answer API.

use serde::Deserialize;

use super::{DataSourcePlugin, HttpClient, SearchRecord, SourceError};

const ENDPOINT: &str = "https://api.duckduckgo.com/";

/// Web search source, registered as `web`.
pub struct WebSearchPlugin {
    http: HttpClient,
}

impl WebSearchPlugin {
    /// Creates the source.
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

impl DataSourcePlugin for WebSearchPlugin {
    fn name(&self) -> &str {
        "web"
    }

    fn query(&self, query: &str, max_results: usize) -> Result<Vec<SearchRecord>, SourceError> {
        let body = self.http.get_text(
            ENDPOINT,
            &[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ],
            &[],
        )?;
        parse_response(&body, max_results)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InstantAnswer {
    #[serde(default)]
    heading: String,
    #[serde(default)]
    abstract_text: String,
    #[serde(default, rename = "AbstractURL")]
    abstract_url: String,
    #[serde(default)]
    related_topics: Vec<RelatedTopic>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RelatedTopic {
    Entry {
        #[serde(rename = "Text")]
        text: String,
        #[serde(rename = "FirstURL", default)]
        first_url: String,
    },
    Group {
        #[serde(rename = "Topics")]
        topics: Vec<RelatedTopic>,
    },
}

fn flatten(topics: Vec<RelatedTopic>, out: &mut Vec<SearchRecord>) {
    for topic in topics {
        match topic {
            RelatedTopic::Entry { text, first_url } => {
                let title = text
                    .split_once(" - ")
                    .map_or(text.as_str(), |(title, _)| title)
                    .to_owned();
                let mut record = SearchRecord::new(title, text.clone());
                if !first_url.is_empty() {
                    record = record.with_url(first_url);
                }
                out.push(record);
            }
            RelatedTopic::Group { topics } => flatten(topics, out),
        }
    }
}

/// Converts an instant answer response into records: the abstract first, then related topics.
pub fn parse_response(body: &str, max_results: usize) -> Result<Vec<SearchRecord>, SourceError> {
    let answer: InstantAnswer = serde_json::from_str(body)?;
    let mut records = Vec::new();

    if !answer.abstract_text.is_empty() {
        let mut record = SearchRecord::new(answer.heading, answer.abstract_text);
        if !answer.abstract_url.is_empty() {
            record = record.with_url(answer.abstract_url);
        }
        records.push(record);
    }
    flatten(answer.related_topics, &mut records);

    records.truncate(max_results);
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = r#"{
        "Heading": "Model Context Protocol",
        "AbstractText": "An open protocol for connecting models to tools.",
        "AbstractURL": "https://example.com/mcp",
        "RelatedTopics": [
            {"Text": "MCP servers - Tool adapters", "FirstURL": "https://example.com/servers"},
            {"Name": "See also", "Topics": [
                {"Text": "Agents - Autonomous programs", "FirstURL": "https://example.com/agents"}
            ]}
        ]
    }"#;

    #[test]
    fn abstract_comes_first_then_related_topics() {
        let records = parse_response(RESPONSE, 10).expect("valid response");
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].title, "Model Context Protocol");
        assert_eq!(records[0].url.as_deref(), Some("https://example.com/mcp"));
        assert_eq!(records[1].title, "MCP servers");
        assert_eq!(records[1].body, "MCP servers - Tool adapters");
        assert_eq!(records[2].title, "Agents");
    }

    #[test]
    fn results_are_truncated() {
        let records = parse_response(RESPONSE, 2).expect("valid response");
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn empty_answer_has_no_records() {
        let records = parse_response(r#"{"Heading": "", "RelatedTopics": []}"#, 5).expect("valid");
        assert!(records.is_empty());
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        assert!(matches!(
            parse_response("<html>", 5),
            Err(SourceError::Decode(_))
        ));
    }
}
