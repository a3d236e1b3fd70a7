//! Scholarly articles from the arXiv Atom API.

use super::{squash_whitespace, DataSourcePlugin, HttpClient, SearchRecord, SourceError};

const ENDPOINT: &str = "http://export.arxiv.org/api/query";

/// Academic source, registered as `academic`.
pub struct AcademicPlugin {
    http: HttpClient,
}

impl AcademicPlugin {
    /// Creates the source.
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

impl DataSourcePlugin for AcademicPlugin {
    fn name(&self) -> &str {
        "academic"
    }

    fn query(&self, query: &str, max_results: usize) -> Result<Vec<SearchRecord>, SourceError> {
        let search = format!("all:{query}");
        let max = max_results.to_string();
        let body = self.http.get_text(
            ENDPOINT,
            &[("search_query", &search), ("start", "0"), ("max_results", &max)],
            &[],
        )?;
        parse_feed(&body, max_results)
    }
}

fn child_text<'a, 'input>(entry: roxmltree::Node<'a, 'input>, name: &str) -> Option<&'a str> {
    entry
        .children()
        .find(|node| node.is_element() && node.tag_name().name() == name)
        .and_then(|node| node.text())
}

/// Extracts `<entry>` titles, summaries and ids from an Atom feed.
pub fn parse_feed(xml: &str, max_results: usize) -> Result<Vec<SearchRecord>, SourceError> {
    let document = roxmltree::Document::parse(xml)?;
    Ok(document
        .descendants()
        .filter(|node| node.is_element() && node.tag_name().name() == "entry")
        .take(max_results)
        .map(|entry| {
            let title = squash_whitespace(child_text(entry, "title").unwrap_or_default());
            let summary = squash_whitespace(child_text(entry, "summary").unwrap_or_default());
            let record = SearchRecord::new(title, summary);
            match child_text(entry, "id") {
                Some(id) => record.with_url(id.trim()),
                None => record,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_entry_is_parsed() {
        let xml = r#"
        <entry>
            <title>Paper Title</title>
            <summary>Paper summary.</summary>
        </entry>
        "#;
        let records = parse_feed(xml, 1).expect("valid xml");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Paper Title");
        assert_eq!(records[0].body, "Paper summary.");
        assert_eq!(records[0].url, None);
    }

    #[test]
    fn namespaced_feed_is_parsed() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>ArXiv Query</title>
  <entry>
    <id>http://arxiv.org/abs/2501.00001v1</id>
    <title>Reward Hacking in
      Agentic Systems</title>
    <summary>  We study agents.  </summary>
  </entry>
  <entry>
    <id>http://arxiv.org/abs/2501.00002v1</id>
    <title>Second</title>
    <summary>More.</summary>
  </entry>
</feed>"#;
        let records = parse_feed(xml, 5).expect("valid xml");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title, "Reward Hacking in Agentic Systems");
        assert_eq!(records[0].body, "We study agents.");
        assert_eq!(
            records[0].url.as_deref(),
            Some("http://arxiv.org/abs/2501.00001v1")
        );

        assert_eq!(parse_feed(xml, 1).expect("valid xml").len(), 1);
    }

    #[test]
    fn broken_xml_is_a_decode_error() {
        assert!(matches!(
            parse_feed("<entry><title>", 5),
            Err(SourceError::Decode(_))
        ));
    }
}
