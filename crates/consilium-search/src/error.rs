use consilium_client::ClientError;
use consilium_core::QueryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid query: {0}")]
    Query(#[from] QueryError),

    #[error("request failed: {0}")]
    Client(#[from] ClientError),

    /// The API returned a direct list with neither a presearch marker nor a
    /// resolvable record. A real data/query mismatch, not a transient
    /// failure; never retried.
    #[error("unresolvable response: {0}")]
    MalformedResponse(String),

    /// The server-declared total kept the pagination alive past the hard
    /// page bound.
    #[error("pagination exceeded {max_pages} pages without reaching the declared total")]
    PaginationOverflow { max_pages: u32 },
}
