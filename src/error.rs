use thiserror::Error;

/// Why a submission was rejected. The `Display` text is what the user sees.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShortenError {
    #[error("URL required")]
    UrlRequired,

    #[error("Invalid URL format")]
    InvalidUrl,

    #[error("No short codes left, try again later")]
    CodeSpaceExhausted,
}

/// Why a simulated visit did not count.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VisitError {
    #[error("URL expired")]
    Expired,

    #[error("URL not found")]
    NotFound,
}
