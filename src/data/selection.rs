use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use log::debug;

use super::client::DataClient;
use super::error::DataError;
use super::model::SectorNetwork;
use super::source::JsonSource;

/// Orders sector switches so that only the latest request may commit.
///
/// Every [`begin`](Self::begin) bumps a generation counter; a response whose
/// ticket is no longer current belongs to a sector the user already left.
#[derive(Clone, Debug, Default)]
pub struct SectorRequests {
	generation: Rc<Cell<u64>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectorTicket {
	generation: u64,
	sector: String,
}

impl SectorTicket {
	pub fn sector(&self) -> &str {
		&self.sector
	}
}

impl SectorRequests {
	pub fn begin(&self, sector: &str) -> SectorTicket {
		let generation = self.generation.get() + 1;
		self.generation.set(generation);
		SectorTicket {
			generation,
			sector: sector.to_string(),
		}
	}

	pub fn is_current(&self, ticket: &SectorTicket) -> bool {
		ticket.generation == self.generation.get()
	}

	/// Load `sector`, returning `None` if another switch happened while waiting.
	///
	/// A superseded response still lands in the client cache.
	pub async fn load<S: JsonSource>(
		&self,
		client: &DataClient<S>,
		sector: &str,
	) -> Option<Result<Arc<SectorNetwork>, DataError>> {
		let ticket = self.begin(sector);
		let result = client.sector_network(sector).await;
		if self.is_current(&ticket) {
			Some(result)
		} else {
			debug!("discarding stale response for {}", ticket.sector());
			None
		}
	}
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;

	use futures::executor::LocalPool;
	use futures::task::LocalSpawnExt;

	use super::*;
	use crate::config::AppConfig;
	use crate::data::testing::{MemorySource, network_json};

	#[test]
	fn only_latest_ticket_is_current() {
		let requests = SectorRequests::default();
		let first = requests.begin("Finance");
		assert!(requests.is_current(&first));
		let second = requests.begin("Healthcare");
		assert!(!requests.is_current(&first));
		assert!(requests.is_current(&second));
		assert_eq!(second.sector(), "Healthcare");
	}

	#[test]
	fn same_sector_twice_still_supersedes() {
		let requests = SectorRequests::default();
		let first = requests.begin("Finance");
		let second = requests.begin("Finance");
		assert!(!requests.is_current(&first));
		assert!(requests.is_current(&second));
	}

	#[test]
	fn late_response_for_abandoned_sector_is_discarded() {
		let finance = "/data/networks/finance.json";
		let healthcare = "/data/networks/healthcare.json";
		let source = MemorySource::default()
			.with_file(finance, &network_json("Finance"))
			.with_file(healthcare, &network_json("Healthcare"));
		let release_finance = source.gate(finance);

		let client = DataClient::new(source, &AppConfig::with_base_path("/"));
		let requests = SectorRequests::default();
		let shown: Rc<RefCell<Option<String>>> = Rc::new(RefCell::new(None));
		let discarded = Rc::new(Cell::new(0));

		let mut pool = LocalPool::new();
		let spawner = pool.spawner();
		for sector in ["Finance", "Healthcare"] {
			let (client, requests, shown, discarded) = (
				client.clone(),
				requests.clone(),
				shown.clone(),
				discarded.clone(),
			);
			spawner
				.spawn_local(async move {
					match requests.load(&client, sector).await {
						Some(Ok(network)) => *shown.borrow_mut() = Some(network.sector.clone()),
						Some(Err(err)) => panic!("unexpected error: {err}"),
						None => discarded.set(discarded.get() + 1),
					}
				})
				.unwrap();
			pool.run_until_stalled();
		}

		assert_eq!(shown.borrow().as_deref(), Some("Healthcare"));

		release_finance.send(()).unwrap();
		pool.run();

		assert_eq!(shown.borrow().as_deref(), Some("Healthcare"));
		assert_eq!(discarded.get(), 1);
		assert!(client.is_cached("Finance"));
	}
}
