use thiserror::Error;

/// Errors surfaced by the fallible construction paths (option validation,
/// genome index building). Alignment-time invariant breaches panic instead.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("invalid mapping option: {0}")]
    InvalidOption(String),

    #[error("reference genome has no chromosomes")]
    EmptyReference,
}
