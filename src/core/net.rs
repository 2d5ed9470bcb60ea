// src/core/net.rs
// Blocking HTTP GET with retries. The decoder never touches the network;
// this is only used by the runner to obtain the documents.

use reqwest::blocking::{Client, Response};
use reqwest::header::CONTENT_TYPE;

use crate::config::options::FetchOptions;
use crate::core::charset::{charset_of, decode_html, tld_of};
use crate::error::{Result, ScrapeError};

/// A fetched page: final URL after redirects plus decoded body.
#[derive(Clone, Debug)]
pub struct Fetched {
    pub url: String,
    pub body: String,
}

pub struct Fetcher {
    client: Client,
    retries: u32,
}

impl Fetcher {
    pub fn new(opts: &FetchOptions) -> Result<Self> {
        let client = Client::builder()
            .timeout(opts.timeout())
            .user_agent(opts.user_agent.clone())
            .build()
            .map_err(|e| ScrapeError::Config(format!("cannot build HTTP client: {e}")))?;
        Ok(Self { client, retries: opts.retries.max(1) })
    }

    /// GET `url`, retrying transport failures and non-2xx answers.
    /// Returns the last error once all attempts are spent.
    pub fn get(&self, url: &str) -> Result<Fetched> {
        let mut last_err = None;
        for attempt in 1..=self.retries {
            match self.get_once(url) {
                Ok(page) => return Ok(page),
                Err(e) => {
                    loge!("Attempt {attempt}/{} failed for {url}: {e}", self.retries);
                    last_err = Some(e);
                }
            }
        }
        Err(last_err.unwrap_or_else(|| ScrapeError::Config(s!("retries must be at least 1"))))
    }

    fn get_once(&self, url: &str) -> Result<Fetched> {
        let fetch_err = |source| ScrapeError::Fetch { url: url.to_string(), source };

        let resp = self.client.get(url).send().map_err(fetch_err)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ScrapeError::Status { url: url.to_string(), status: status.as_u16() });
        }
        let final_url = resp.url().to_string();
        let body = decode_body(resp).map_err(fetch_err)?;
        Ok(Fetched { url: final_url, body })
    }
}

/// Raw body bytes decoded by `charset::decode_html`, with the header
/// charset and the host's top-level domain as hints.
fn decode_body(resp: Response) -> reqwest::Result<String> {
    let declared = resp
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(charset_of);
    let tld = resp.url().host_str().and_then(tld_of).map(str::to_string);

    let bytes = resp.bytes()?;
    Ok(decode_html(&bytes, declared.as_deref(), tld.as_deref()))
}
