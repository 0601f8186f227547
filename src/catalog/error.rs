use thiserror::Error;

/// Reasons a page could not be turned into a record batch. Every variant is
/// treated the same way by the view: the previous batch stays on screen.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request for page {page} failed: {source}")]
    Transport {
        page: u32,
        #[source]
        source: reqwest::Error,
    },

    #[error("catalog answered HTTP {status} for page {page}")]
    Status { page: u32, status: u16 },

    #[error("malformed catalog response for page {page}: {source}")]
    Malformed {
        page: u32,
        #[source]
        source: serde_json::Error,
    },

    #[error("fetch worker for page {page} stopped without a result")]
    WorkerLost { page: u32 },
}

impl FetchError {
    pub fn page(&self) -> u32 {
        match self {
            FetchError::Transport { page, .. }
            | FetchError::Status { page, .. }
            | FetchError::Malformed { page, .. }
            | FetchError::WorkerLost { page } => *page,
        }
    }
}
