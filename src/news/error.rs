use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("page is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("no next-page link found on the page")]
    MissingNextPage,

    #[error("no entries found on the page")]
    NoEntries,
}

#[derive(Error, Debug)]
pub enum NewsError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("page too large (>{limit} bytes): {url}")]
    PageTooLarge { url: String, limit: usize },

    #[error("failed to parse {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: ParseError,
    },

    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
