//! Broad search, topic selection and per-topic deep dives.

use std::fmt::Write as _;

use chrono::NaiveDate;
use log::{info, warn};

use super::llm::{ChatClient, LanguageModel};
use super::topics::{fallback_topics, parse_topics, Topic};
use super::{HttpClient, PluginRegistry, ResearchConfig, SearchRecord};

/// Query used to discover what is being discussed.
pub const BROAD_QUERY: &str = "technology trends viral active discussion last week";
const BROAD_RESULTS: usize = 10;
const DEEP_DIVE_SUFFIX: &str = " latest discussion opinions analysis";
const DEEP_DIVE_RESULTS: usize = 5;
const SUMMARY_RECORDS: usize = 3;

const TOPIC_SYSTEM_PROMPT: &str = "You are a helpful tech researcher.";
const SUMMARY_SYSTEM_PROMPT: &str = "You are a technical research assistant.";

/// One researched topic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportSection {
    /// Topic title, used as the section heading.
    pub title: String,
    /// Markdown body.
    pub content: String,
}

/// Runs the research flow over a set of data sources and an optional language model.
pub struct Researcher {
    registry: PluginRegistry,
    model: Option<Box<dyn LanguageModel>>,
}

impl Researcher {
    /// Creates a researcher without a language model; topics and summaries use the fallbacks.
    pub fn new(registry: PluginRegistry) -> Self {
        Self {
            registry,
            model: None,
        }
    }

    /// Uses `model` for topic selection and summaries.
    pub fn with_model(mut self, model: impl LanguageModel + 'static) -> Self {
        self.model = Some(Box::new(model));
        self
    }

    /// Wires every configured source and, when a key is present, the chat client.
    pub fn from_config(config: &ResearchConfig) -> Self {
        let http = HttpClient::new(config.timeout);
        let registry = PluginRegistry::from_config(config, &http);
        info!("research sources: {}", registry.names().join(", "));

        let researcher = Self::new(registry);
        match ChatClient::from_config(config, http) {
            Some(client) => researcher.with_model(client),
            None => {
                info!("no chat API key configured, using fallback topics and summaries");
                researcher
            }
        }
    }

    /// Searches every source for currently discussed technology.
    pub fn broad_search(&self) -> Vec<SearchRecord> {
        info!("broad search for {BROAD_QUERY:?}");
        self.registry.query_all(BROAD_QUERY, BROAD_RESULTS)
    }

    /// Asks the model for three debated topics, or returns the fallback list.
    pub fn select_topics(&self, records: &[SearchRecord]) -> Vec<Topic> {
        let Some(model) = &self.model else {
            return fallback_topics();
        };

        let prompt = format!(
            "Analyze the following search results and identify 3 distinct technology topics \
             that are currently generating active debate or controversy.\n\
             Return a JSON object of the form {{\"topics\": [{{\"title\": ..., \"query\": ...}}]}}.\n\n\
             Search Results:\n{}",
            records_json(records)
        );
        let topics = model
            .complete(TOPIC_SYSTEM_PROMPT, &prompt, true)
            .map_err(|err| err.to_string())
            .and_then(|answer| parse_topics(&answer).map_err(|err| err.to_string()));

        match topics {
            Ok(topics) => topics,
            Err(err) => {
                warn!("topic selection failed: {err}; using fallback topics");
                fallback_topics()
            }
        }
    }

    /// Researches each topic and summarizes what was found.
    pub fn deep_dive(&self, topics: &[Topic]) -> Vec<ReportSection> {
        topics
            .iter()
            .map(|topic| {
                info!("researching {}", topic.title);
                let query = format!("{}{}", topic.query, DEEP_DIVE_SUFFIX);
                let records = self.registry.query_all(&query, DEEP_DIVE_RESULTS);
                ReportSection {
                    title: topic.title.clone(),
                    content: self.summarize(topic, &records),
                }
            })
            .collect()
    }

    /// Runs the whole flow.
    pub fn run(&self) -> Vec<ReportSection> {
        let records = self.broad_search();
        let topics = self.select_topics(&records);
        self.deep_dive(&topics)
    }

    fn summarize(&self, topic: &Topic, records: &[SearchRecord]) -> String {
        let Some(model) = &self.model else {
            return fallback_summary(&topic.title, records);
        };

        let prompt = format!(
            "Synthesize the following search results into a concise technical summary for the \
             topic '{}'.\n\
             Focus on:\n\
             1. What is the core technology?\n\
             2. Why is it controversial or actively discussed right now?\n\
             3. Key arguments from different sides.\n\n\
             Search Results:\n{}",
            topic.title,
            records_json(records)
        );
        match model.complete(SUMMARY_SYSTEM_PROMPT, &prompt, false) {
            Ok(summary) => summary,
            Err(err) => {
                warn!("summary for {} failed: {err}; listing search results", topic.title);
                fallback_summary(&topic.title, records)
            }
        }
    }
}

fn records_json(records: &[SearchRecord]) -> String {
    serde_json::to_string_pretty(records).unwrap_or_else(|_| String::from("[]"))
}

/// Lists the first three records under a "Summary of" line.
pub fn fallback_summary(title: &str, records: &[SearchRecord]) -> String {
    let mut summary = format!("Summary of {title}:\n");
    for record in records.iter().take(SUMMARY_RECORDS) {
        let _ = writeln!(summary, "- {}: {}", record.title, record.body);
    }
    summary
}

/// Assembles the report markdown: a title, the date, then one `##` section per topic.
///
/// Headings inside a summary are demoted to `###` so they stay below their topic.
pub fn compose_markdown(title: &str, date: NaiveDate, sections: &[ReportSection]) -> String {
    let mut markdown = format!("# {title}\n\n{}\n", date.format("%Y-%m-%d"));
    for section in sections {
        let _ = write!(
            markdown,
            "\n## {}\n\n{}\n",
            section.title,
            demote_headings(section.content.trim_end())
        );
    }
    markdown
}

fn demote_headings(content: &str) -> String {
    let mut fenced = false;
    content
        .lines()
        .map(|line| {
            let trimmed = line.trim_start();
            if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
                fenced = !fenced;
            }
            let level = trimmed.bytes().take_while(|&byte| byte == b'#').count();
            let text = &trimmed[level..];
            let heading = (1..3).contains(&level)
                && line.len() - trimmed.len() <= 3
                && (text.is_empty() || text.starts_with(' '));
            if heading && !fenced {
                format!("###{text}")
            } else {
                line.to_owned()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::MarkdownStrategy;
    use crate::model::{BlockKind, RenderBlock};
    use crate::research::llm::LlmError;
    use crate::research::tests::StaticSource;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct CannedModel {
        answers: RefCell<Vec<Result<String, LlmError>>>,
        prompts: Rc<RefCell<Vec<(String, bool)>>>,
    }

    impl CannedModel {
        fn new(answers: Vec<Result<String, LlmError>>) -> (Self, Rc<RefCell<Vec<(String, bool)>>>) {
            let prompts = Rc::new(RefCell::new(Vec::new()));
            let model = Self {
                answers: RefCell::new(answers),
                prompts: Rc::clone(&prompts),
            };
            (model, prompts)
        }
    }

    impl LanguageModel for CannedModel {
        fn complete(&self, system: &str, _user: &str, json_mode: bool) -> Result<String, LlmError> {
            self.prompts.borrow_mut().push((system.to_owned(), json_mode));
            let mut answers = self.answers.borrow_mut();
            if answers.is_empty() {
                Err(LlmError::EmptyResponse)
            } else {
                answers.remove(0)
            }
        }
    }

    fn registry_with(records: Vec<SearchRecord>) -> PluginRegistry {
        let mut registry = PluginRegistry::new();
        registry.register(StaticSource::failing("news"));
        registry.register(StaticSource::new("web", records));
        registry
    }

    fn records() -> Vec<SearchRecord> {
        (1..=4)
            .map(|n| SearchRecord::new(format!("Hit {n}"), format!("Body {n}")))
            .collect()
    }

    #[test]
    fn without_model_fallbacks_are_used() {
        let researcher = Researcher::new(registry_with(records()));
        let sections = researcher.run();

        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].title, "Agentic AI & Reward Hacking");
        assert_eq!(
            sections[0].content,
            "Summary of Agentic AI & Reward Hacking:\n\
             - Hit 1: Body 1\n- Hit 2: Body 2\n- Hit 3: Body 3\n"
        );
    }

    #[test]
    fn model_topics_and_summaries_are_used() {
        let (model, prompts) = CannedModel::new(vec![
            Ok(r#"{"topics": [{"title": "WebGPU", "query": "webgpu"}]}"#.to_owned()),
            Ok("WebGPU is shipping.".to_owned()),
        ]);
        let researcher = Researcher::new(registry_with(records())).with_model(model);
        let sections = researcher.run();

        assert_eq!(
            sections,
            vec![ReportSection {
                title: "WebGPU".into(),
                content: "WebGPU is shipping.".into(),
            }]
        );
        let prompts = prompts.borrow();
        assert_eq!(prompts[0], (TOPIC_SYSTEM_PROMPT.to_owned(), true));
        assert_eq!(prompts[1], (SUMMARY_SYSTEM_PROMPT.to_owned(), false));
    }

    #[test]
    fn unusable_model_answers_fall_back() {
        let (model, _) = CannedModel::new(vec![Ok("not json".to_owned())]);
        let researcher = Researcher::new(registry_with(Vec::new())).with_model(model);

        let topics = researcher.select_topics(&[]);
        assert_eq!(topics, fallback_topics());

        // The model has no answers left, so the summary degrades to the record list.
        let sections = researcher.deep_dive(&topics[..1]);
        assert_eq!(sections[0].content, "Summary of Agentic AI & Reward Hacking:\n");
    }

    #[test]
    fn markdown_has_one_section_per_topic() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date");
        let sections = vec![
            ReportSection {
                title: "A".into(),
                content: "Summary of A:\n- x: y\n".into(),
            },
            ReportSection {
                title: "B".into(),
                content: "Text".into(),
            },
        ];
        assert_eq!(
            compose_markdown("Tech Trends", date, &sections),
            "# Tech Trends\n\n2025-01-01\n\n## A\n\nSummary of A:\n- x: y\n\n## B\n\nText\n"
        );
    }

    #[test]
    fn summary_headings_nest_under_their_topic() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date");
        let sections = vec![ReportSection {
            title: "MCP".into(),
            content: "# Overview\nText\n## Details\n#### Deep\n#hashtag\n```\n# shell comment\n```\n"
                .into(),
        }];
        let markdown = compose_markdown("Tech Trends", date, &sections);
        assert_eq!(
            markdown,
            "# Tech Trends\n\n2025-01-01\n\n## MCP\n\n### Overview\nText\n### Details\n\
             #### Deep\n#hashtag\n```\n# shell comment\n```\n"
        );

        let kinds: Vec<BlockKind> = MarkdownStrategy::Structural
            .to_blocks(&markdown)
            .iter()
            .map(RenderBlock::kind)
            .filter(|kind| matches!(kind, BlockKind::Title | BlockKind::Heading))
            .collect();
        assert_eq!(kinds, vec![BlockKind::Title, BlockKind::Heading]);
    }
}
