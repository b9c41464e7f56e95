//! Library error type.
//!
//! Only the layers around the resolver produce these. A resolution attempt that can't be
//! satisfied is not an error, it's a `None` from [`crate::algorithm::InputCandidates::resolve`].

pub type Result<T> = std::result::Result<T, Error>;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
	#[error("IO error: {0}")]
	IO(#[from] std::io::Error),
	#[error("JSON error: {0}")]
	SerdeJSON(#[from] serde_json::Error),
	#[error("validation error: {0}")]
	Validation(String),
}
