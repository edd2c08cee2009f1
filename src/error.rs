use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The page no longer contains a tag the scraper relies on. Fatal: the
    /// site structure changed and any further extraction would be wrong.
    #[error("No tag matched selector `{0}`")]
    TagNotFound(String),

    #[error("The selector you are trying to scrape for is malformed. Selector: {0}")]
    BadSelector(String),

    /// Transport failure or non-2xx response. Callers treat the page as
    /// unavailable and keep going.
    #[error("Failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Io Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Url Error: {0}")]
    Url(#[from] url::ParseError),
}
