//! In-memory [`JsonSource`] for loader tests.

use std::cell::RefCell;
use std::collections::HashMap;

use futures::channel::oneshot;

use super::error::DataError;
use super::source::JsonSource;

#[derive(Default)]
pub(crate) struct MemorySource {
	files: HashMap<String, String>,
	gates: RefCell<HashMap<String, oneshot::Receiver<()>>>,
	calls: RefCell<Vec<String>>,
}

impl MemorySource {
	pub fn with_file(mut self, url: &str, body: &str) -> Self {
		self.files.insert(url.to_string(), body.to_string());
		self
	}

	/// Hold the next response for `url` until the returned sender fires.
	pub fn gate(&self, url: &str) -> oneshot::Sender<()> {
		let (tx, rx) = oneshot::channel();
		self.gates.borrow_mut().insert(url.to_string(), rx);
		tx
	}

	pub fn calls(&self) -> usize {
		self.calls.borrow().len()
	}

	pub fn calls_to(&self, url: &str) -> usize {
		self.calls.borrow().iter().filter(|u| *u == url).count()
	}
}

impl JsonSource for MemorySource {
	async fn fetch_text(&self, url: &str) -> Result<String, DataError> {
		self.calls.borrow_mut().push(url.to_string());
		let gate = self.gates.borrow_mut().remove(url);
		if let Some(gate) = gate {
			let _ = gate.await;
		}
		self.files.get(url).cloned().ok_or_else(|| DataError::Status {
			url: url.to_string(),
			status: 404,
		})
	}
}

/// Two-node network file for `sector`.
pub(crate) fn network_json(sector: &str) -> String {
	format!(
		r#"{{
			"sector": "{sector}",
			"metadata": {{ "nodeCount": 2, "edgeCount": 1, "generatedAt": "2025-01-01" }},
			"nodes": [
				{{ "id": "A", "label": "Analyst", "soc": "13-2051", "ptr": 0.7, "nfc": 0.6,
				   "quadrant": "HH", "size": 20, "aiExposure": 0.5 }},
				{{ "id": "B", "label": "Senior Analyst", "soc": "13-2051", "ptr": 0.3, "nfc": 0.2,
				   "quadrant": "LL", "size": 5, "aiExposure": 0.4 }}
			],
			"edges": [{{ "source": "A", "target": "B", "weight": 1 }}]
		}}"#
	)
}
