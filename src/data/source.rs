use gloo_net::http::Request;
use log::debug;

use super::error::DataError;

/// Where static JSON documents come from.
///
/// The browser build uses [`HttpSource`]; tests substitute an in-memory source.
#[allow(async_fn_in_trait)]
pub trait JsonSource {
	/// Fetch the body at `url`; non-2xx statuses are errors.
	async fn fetch_text(&self, url: &str) -> Result<String, DataError>;
}

/// `fetch`-backed source for the browser.
#[derive(Clone, Copy, Debug, Default)]
pub struct HttpSource;

impl JsonSource for HttpSource {
	async fn fetch_text(&self, url: &str) -> Result<String, DataError> {
		debug!("GET {url}");
		let response = Request::get(url)
			.send()
			.await
			.map_err(|err| DataError::Network {
				url: url.to_string(),
				message: err.to_string(),
			})?;

		if !response.ok() {
			return Err(DataError::Status {
				url: url.to_string(),
				status: response.status(),
			});
		}

		response.text().await.map_err(|err| DataError::Network {
			url: url.to_string(),
			message: err.to_string(),
		})
	}
}
