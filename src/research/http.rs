//! Blocking HTTP transport shared by the data sources and the chat client.

use std::time::Duration;

use serde::Serialize;

/// A `ureq` agent with a global timeout. Requests are attempted once.
#[derive(Clone)]
pub struct HttpClient {
    agent: ureq::Agent,
}

impl HttpClient {
    /// Creates a client whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        Self { agent }
    }

    /// Performs a GET request and returns the body as text.
    ///
    /// Non-success status codes are reported as errors.
    pub fn get_text(
        &self,
        url: &str,
        query: &[(&str, &str)],
        headers: &[(&str, &str)],
    ) -> Result<String, ureq::Error> {
        let mut request = self.agent.get(url);
        for (key, value) in query {
            request = request.query(*key, *value);
        }
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        let mut response = request.call()?;
        response.body_mut().read_to_string()
    }

    /// POSTs `body` as JSON and returns the response body as text.
    pub fn post_json<T: Serialize>(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &T,
    ) -> Result<String, ureq::Error> {
        let mut request = self.agent.post(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        let mut response = request.send_json(body)?;
        response.body_mut().read_to_string()
    }
}
