use std::{future::Future, num::NonZeroU32, time::Duration};

use log::{error, info, warn};
use reqwest::StatusCode;
use tokio::time::sleep;
use url::Url;

/// Default `User-Agent`; the site rejects the stock client identifier.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Server returned {0}")]
    Status(StatusCode),
}

#[derive(Debug, thiserror::Error)]
#[error("Failed to fetch data from {url} after {attempts} attempts")]
pub struct RetrievalError {
    pub url: Url,
    pub attempts: u32,
    #[source]
    pub last: FetchError,
}

/// Something that can GET a page body.
pub trait PageSource {
    fn get_text(&self, url: &Url) -> impl Future<Output = Result<String, FetchError>>;
}

impl PageSource for reqwest::Client {
    async fn get_text(&self, url: &Url) -> Result<String, FetchError> {
        let response = self.get(url.clone()).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }
        Ok(response.text().await?)
    }
}

pub fn reqwest_client(user_agent: &str, timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RetryPolicy {
    pub max_retries: NonZeroU32,
    pub base_delay: Duration,
}
impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: NonZeroU32::new(3).unwrap(),
            base_delay: Duration::from_secs(2),
        }
    }
}
impl RetryPolicy {
    /// Wait before the 1-indexed `attempt`: `base_delay * (attempt - 1)`, saturating.
    pub fn delay_before(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt.saturating_sub(1))
    }
}

pub struct Retriever<S> {
    source: S,
    policy: RetryPolicy,
}

impl<S: PageSource> Retriever<S> {
    pub fn new(source: S, policy: RetryPolicy) -> Self {
        Self { source, policy }
    }

    /// Fetches `url`, retrying on any transport error or non-2xx status.
    pub async fn fetch(&self, url: &Url) -> Result<String, RetrievalError> {
        let max = self.policy.max_retries.get();
        let mut attempt = 1;
        loop {
            info!("Fetching data from {url}, attempt {attempt}/{max}");
            let e = match self.source.get_text(url).await {
                Ok(text) => return Ok(text),
                Err(e) => e,
            };
            warn!("Request failed: {e}");
            if attempt >= max {
                error!("Failed to fetch data after {max} attempts.");
                return Err(RetrievalError {
                    url: url.clone(),
                    attempts: attempt,
                    last: e,
                });
            }
            attempt += 1;
            let wait = self.policy.delay_before(attempt);
            info!("Retrying in {} seconds...", wait.as_secs_f64());
            sleep(wait).await;
        }
    }
}
