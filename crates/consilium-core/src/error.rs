use thiserror::Error;

/// Classification failure for a raw search string. Never retried; the
/// message is surfaced to the caller as-is.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("search query must not be empty")]
    Empty,

    #[error("party name must include at least one surname")]
    MissingSurname,

    #[error(
        "query format not recognised: '{0}' (expected CNJ, CPF, CNPJ, OAB, \
         party name, or police inquiry)"
    )]
    Unrecognized(String),
}
