/// Errors reported by a script backend (the remote job API or a test fake).
///
/// The `Http` message format is what operators see verbatim when a save or
/// delete fails, so it must stay stable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("HTTP error! status: {status}")]
    Http { status: u16 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed response: {0}")]
    Decode(String),
}
