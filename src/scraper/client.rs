// client.rs
use crate::scraper::ScraperError;
use reqwest::blocking::Client;
use std::time::Duration;

/// A fetched HTML page.
#[derive(Debug, Clone)]
pub struct Page {
    /// Final URL after redirects.
    pub url: String,
    pub body: String,
}

/// Anything that can turn a URL into a page. The HTTP client implements it;
/// tests substitute canned pages.
pub trait Fetch {
    fn fetch(&self, url: &str) -> Result<Page, ScraperError>;
}

impl<T: Fetch + ?Sized> Fetch for &T {
    fn fetch(&self, url: &str) -> Result<Page, ScraperError> {
        (**self).fetch(url)
    }
}

#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Page, ScraperError> {
        let resp = self.client.get(url).send()?;

        let status = resp.status();
        let final_url = resp.url().to_string();

        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: final_url,
            });
        }

        let body = resp.text()?;
        Ok(Page {
            url: final_url,
            body,
        })
    }
}
