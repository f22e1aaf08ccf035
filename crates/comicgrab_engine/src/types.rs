use std::fmt;

use comicgrab_core::ItemOutcome;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Resolving,
    Downloading,
    Writing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadProgress {
    pub title: String,
    pub stage: Stage,
    pub bytes: u64,
    /// Advertised content length, used for display only.
    pub total: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    PageRequested {
        page: u32,
        url: String,
    },
    PageParsed {
        page: u32,
        entries: usize,
    },
    /// `position` is 1-based within the batch.
    ItemStarted {
        position: usize,
        total: usize,
        title: String,
    },
    Progress(DownloadProgress),
    ItemCompleted {
        title: String,
        outcome: ItemOutcome,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub bytes: Vec<u8>,
    pub metadata: FetchMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchMetadata {
    pub original_url: String,
    pub final_url: String,
    pub content_type: Option<String>,
    pub byte_len: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    ClientBuild,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::ClientBuild => write!(f, "http client setup failed"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
