use std::time::Duration;

use anyhow::Context as _;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, USER_AGENT};

pub const DEFAULT_USER_AGENT: &str = "resume-harvest/0.1";

/// The stages' view of the network: one page of HTML per URL, or a failure.
pub trait Fetcher {
    fn fetch(&self, url: &str) -> anyhow::Result<String>;
}

pub struct HttpFetcher {
    client: Client,
    user_agent: String,
    delay: Duration,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, delay_ms: u64) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .context("build http client")?;

        Ok(Self {
            client,
            user_agent: user_agent.to_owned(),
            delay: Duration::from_millis(delay_ms),
        })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> anyhow::Result<String> {
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }

        let response = self
            .client
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8")
            .send()
            .with_context(|| format!("GET {url}"))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("GET {url} returned {status}");
        }

        response.text().with_context(|| format!("read body: {url}"))
    }
}

#[cfg(test)]
pub(crate) mod stub {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use super::Fetcher;

    /// In-memory fetcher for stage tests; records every requested URL.
    pub(crate) struct StubFetcher {
        pages: HashMap<String, String>,
        pub(crate) requests: RefCell<Vec<String>>,
    }

    impl StubFetcher {
        pub(crate) fn new(pages: impl IntoIterator<Item = (String, String)>) -> Self {
            Self {
                pages: pages.into_iter().collect(),
                requests: RefCell::new(Vec::new()),
            }
        }

        pub(crate) fn request_count(&self, url: &str) -> usize {
            self.requests
                .borrow()
                .iter()
                .filter(|requested| requested.as_str() == url)
                .count()
        }
    }

    impl Fetcher for StubFetcher {
        fn fetch(&self, url: &str) -> anyhow::Result<String> {
            self.requests.borrow_mut().push(url.to_owned());
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("no stub page for {url}"))
        }
    }
}
