use thiserror::Error;

/// Failure to load one static JSON resource.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DataError {
	#[error("request for {url} failed: {message}")]
	Network { url: String, message: String },
	#[error("{url} responded with HTTP {status}")]
	Status { url: String, status: u16 },
	#[error("could not decode {url}: {message}")]
	Decode { url: String, message: String },
}

impl DataError {
	pub(crate) fn decode(url: &str, err: serde_json::Error) -> Self {
		Self::Decode {
			url: url.to_string(),
			message: err.to_string(),
		}
	}
}
