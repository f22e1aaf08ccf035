use std::time::Duration;

use bytes::Bytes;
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};

use crate::{EngineEvent, FailureKind, FetchError, FetchMetadata, FetchOutput};

/// Browser-like headers sent with every request.
const DEFAULT_HEADERS: &[(&str, &str)] = &[
    (
        "accept",
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.9",
    ),
    (
        "accept-language",
        "en-IN,en-GB;q=0.9,en-US;q=0.8,en;q=0.7,fr;q=0.6",
    ),
    (
        "sec-ch-ua",
        "\" Not;A Brand\";v=\"99\", \"Google Chrome\";v=\"91\", \"Chromium\";v=\"91\"",
    ),
    ("sec-ch-ua-mobile", "?0"),
    ("sec-fetch-dest", "document"),
    ("sec-fetch-mode", "navigate"),
    ("sec-fetch-site", "same-origin"),
    ("sec-fetch-user", "?1"),
    ("upgrade-insecure-requests", "1"),
    (
        "user-agent",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
    ),
];

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    /// Whole-request bound for listing and detail pages. Artifact streams
    /// only get `connect_timeout`.
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub headers: Vec<(String, String)>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(10),
            redirect_limit: 10,
            headers: DEFAULT_HEADERS
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        }
    }
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

/// Sink for callers that do not care about progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgressSink;

impl ProgressSink for NullProgressSink {
    fn emit(&self, _event: EngineEvent) {}
}

/// A response body being received chunk by chunk.
pub struct ByteStream {
    /// Advertised body length, used for progress display only.
    pub content_length: Option<u64>,
    pub chunks: BoxStream<'static, Result<Bytes, FetchError>>,
}

#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches a whole markup page, bounded by the request timeout.
    async fn fetch_page(&self, url: &str) -> Result<FetchOutput, FetchError>;

    /// Opens a streaming download. Only connecting is time-bounded.
    async fn open_stream(&self, url: &str) -> Result<ByteStream, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    page_client: reqwest::Client,
    stream_client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let headers = build_headers(&settings.headers)?;
        let page_client = base_builder(&settings, headers.clone())
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::ClientBuild, err.to_string()))?;
        let stream_client = base_builder(&settings, headers)
            .build()
            .map_err(|err| FetchError::new(FailureKind::ClientBuild, err.to_string()))?;
        Ok(Self {
            page_client,
            stream_client,
        })
    }

    async fn send(
        &self,
        client: &reqwest::Client,
        url: &str,
    ) -> Result<reqwest::Response, FetchError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let response = client.get(parsed).send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        Ok(response)
    }
}

fn base_builder(settings: &FetchSettings, headers: HeaderMap) -> reqwest::ClientBuilder {
    reqwest::Client::builder()
        .connect_timeout(settings.connect_timeout)
        .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit))
        .default_headers(headers)
}

fn build_headers(pairs: &[(String, String)]) -> Result<HeaderMap, FetchError> {
    let mut headers = HeaderMap::with_capacity(pairs.len());
    for (name, value) in pairs {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|err| FetchError::new(FailureKind::ClientBuild, err.to_string()))?;
        let value = HeaderValue::from_str(value)
            .map_err(|err| FetchError::new(FailureKind::ClientBuild, err.to_string()))?;
        headers.insert(name, value);
    }
    Ok(headers)
}

fn content_type_of(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string())
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch_page(&self, url: &str) -> Result<FetchOutput, FetchError> {
        let response = self.send(&self.page_client, url).await?;
        let final_url = response.url().to_string();
        let content_type = content_type_of(&response);
        let bytes = response.bytes().await.map_err(map_reqwest_error)?.to_vec();

        let metadata = FetchMetadata {
            original_url: url.to_string(),
            final_url,
            content_type,
            byte_len: bytes.len() as u64,
        };
        Ok(FetchOutput { bytes, metadata })
    }

    async fn open_stream(&self, url: &str) -> Result<ByteStream, FetchError> {
        let response = self.send(&self.stream_client, url).await?;
        let content_length = response.content_length();
        let chunks = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(map_reqwest_error))
            .boxed();

        Ok(ByteStream {
            content_length,
            chunks,
        })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_redirect() {
        return FetchError::new(FailureKind::RedirectLimitExceeded, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
