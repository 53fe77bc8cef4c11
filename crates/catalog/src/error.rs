/// Failure to load the catalog. The store stays empty after any of these.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    /// The request never produced a response (DNS, connect, timeout, body read).
    #[error("network error: {0}")]
    Transport(String),
    /// The source answered with a non-success status.
    #[error("catalog source returned HTTP {0}")]
    Status(u16),
    /// The payload was not a JSON array of products.
    #[error("malformed catalog payload: {0}")]
    Decode(String),
}

impl LoadError {
    /// Message shown to shoppers; the details go to the logs.
    pub fn user_message(&self) -> &'static str {
        "Error loading products. Please try again later."
    }
}
