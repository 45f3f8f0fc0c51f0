//! HTTP client with explicit timeouts
//!
//! Thin wrapper over reqwest. The portal protocol is a single GET; status
//! handling and body interpretation belong to the response interpreter, so
//! this layer inspects neither. No automatic retries: a failed attempt is
//! reported and the user re-runs the command.

use anyhow::Result;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::{Client, Response};
use std::time::Duration;

use crate::config::HttpConfig;

pub struct HttpClient {
    inner: Client,
}

impl HttpClient {
    pub fn new(cfg: &HttpConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static("Mozilla/5.0 (Windows NT 10.0; Win64; x64) Chrome/120.0"),
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json, text/plain, */*"),
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("zh-CN,zh;q=0.9,en;q=0.8"),
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout))
            .connect_timeout(Duration::from_secs(cfg.connect_timeout))
            .default_headers(headers)
            .build()?;

        Ok(Self { inner: client })
    }

    /// Issue a GET with the given query parameters
    ///
    /// Errors come back as raw `reqwest::Error` so the caller can classify
    /// timeout/connect faults; a non-2xx status is a normal return value
    /// here, not an error.
    pub async fn get_query<T: serde::Serialize + ?Sized>(
        &self,
        url: &str,
        query: &T,
    ) -> reqwest::Result<Response> {
        self.inner.get(url).query(query).send().await
    }
}
