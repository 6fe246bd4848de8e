//! Failure taxonomy for the analysis engine.
//!
//! Every variant here is the fatal, contract-violation class: the tree
//! producer or caller handed in something the node-shape contract rules out.
//! Nothing is retried; the checker aborts for the offending file and leaves
//! other files untouched.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The source-line index was queried past the end of the file.
    #[error("line {0} is out of range for the provided source")]
    LineOutOfRange(usize),

    /// A definition node arrived with zero body statements.
    #[error("definition `{0}` has no body statements")]
    EmptyBody(String),

    /// The colon closing a parameter list could not be located.
    #[error("no closing colon found for definition `{0}`")]
    ColonNotFound(String),

    /// The parser failed to produce a tree for the source.
    #[error("source could not be parsed as Python")]
    Parse,
}

pub type Result<T> = std::result::Result<T, Error>;
