use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use std::sync::Arc;

use log::{debug, info, warn};
use serde::de::DeserializeOwned;

use super::error::DataError;
use super::model::{CascadeResult, ResearchStats, Role, SectorNetwork, SectorSummary};
use super::slug::slugify;
use super::source::{HttpSource, JsonSource};
use crate::config::AppConfig;

pub const ROLES_FILE: &str = "data/roles.json";
pub const SECTORS_FILE: &str = "data/sectors.json";
pub const STATS_FILE: &str = "data/stats.json";
pub const CASCADE_FILE: &str = "data/cascade.json";

/// Loader for the report's static data, with a per-session network cache.
///
/// Clones share the same source and cache. The cache is write-once per sector
/// and lives as long as the last clone (the report page holds one).
pub struct DataClient<S = HttpSource> {
	source: Rc<S>,
	config: Rc<AppConfig>,
	networks: Rc<RefCell<HashMap<String, Arc<SectorNetwork>>>>,
	in_flight: Rc<RefCell<HashSet<String>>>,
}

impl<S> Clone for DataClient<S> {
	fn clone(&self) -> Self {
		Self {
			source: self.source.clone(),
			config: self.config.clone(),
			networks: self.networks.clone(),
			in_flight: self.in_flight.clone(),
		}
	}
}

impl DataClient<HttpSource> {
	pub fn http(config: &AppConfig) -> Self {
		Self::new(HttpSource, config)
	}
}

impl<S: JsonSource> DataClient<S> {
	pub fn new(source: S, config: &AppConfig) -> Self {
		Self {
			source: Rc::new(source),
			config: Rc::new(config.clone()),
			networks: Rc::new(RefCell::new(HashMap::new())),
			in_flight: Rc::new(RefCell::new(HashSet::new())),
		}
	}

	#[cfg(test)]
	pub fn source(&self) -> &S {
		&self.source
	}

	/// Public URL of a data file, also used for the download links.
	pub fn download_url(&self, file: &str) -> String {
		self.config.asset_url(file)
	}

	pub fn network_url(&self, sector: &str) -> String {
		self.download_url(&format!("data/networks/{}.json", slugify(sector)))
	}

	pub fn is_cached(&self, sector: &str) -> bool {
		self.networks.borrow().contains_key(sector)
	}

	/// A fetch for `sector` has started and not yet finished.
	pub fn is_loading(&self, sector: &str) -> bool {
		self.in_flight.borrow().contains(sector)
	}

	/// Network for `sector`, from the cache when this session already loaded it.
	pub async fn sector_network(&self, sector: &str) -> Result<Arc<SectorNetwork>, DataError> {
		if let Some(network) = self.networks.borrow().get(sector) {
			debug!("network cache hit for {sector}");
			return Ok(network.clone());
		}

		self.in_flight.borrow_mut().insert(sector.to_string());
		let fetched = self.fetch_json::<SectorNetwork>(&self.network_url(sector)).await;
		self.in_flight.borrow_mut().remove(sector);
		let network = fetched?;
		info!(
			"loaded {sector}: {} nodes, {} edges",
			network.nodes.len(),
			network.edges.len()
		);
		// A concurrent load may have landed first; keep whichever was stored.
		let mut networks = self.networks.borrow_mut();
		let stored = networks
			.entry(sector.to_string())
			.or_insert_with(|| Arc::new(network));
		Ok(stored.clone())
	}

	/// Sector summaries, most HH-heavy first.
	pub async fn sectors(&self) -> Result<Vec<SectorSummary>, DataError> {
		let mut sectors: Vec<SectorSummary> = self.fetch_json(&self.download_url(SECTORS_FILE)).await?;
		sectors.sort_by(|a, b| b.hh_share.total_cmp(&a.hh_share));
		Ok(sectors)
	}

	pub async fn roles(&self) -> Result<Vec<Role>, DataError> {
		self.fetch_json(&self.download_url(ROLES_FILE)).await
	}

	/// Headline stats; falls back to the published figures on any failure.
	pub async fn stats(&self) -> ResearchStats {
		match self.fetch_json(&self.download_url(STATS_FILE)).await {
			Ok(stats) => stats,
			Err(err) => {
				warn!("{err}; using built-in stats");
				ResearchStats::fallback()
			}
		}
	}

	/// Cascade simulation results; empty on any failure.
	pub async fn cascade(&self) -> Vec<CascadeResult> {
		match self.fetch_json(&self.download_url(CASCADE_FILE)).await {
			Ok(results) => results,
			Err(err) => {
				warn!("{err}; hiding cascade results");
				Vec::new()
			}
		}
	}

	/// Warm the cache for `sectors`. Failures are logged and skipped, as are
	/// sectors already cached or being fetched.
	pub async fn preload(&self, sectors: &[String]) {
		for sector in sectors {
			if self.is_cached(sector) || self.is_loading(sector) {
				debug!("preload of {sector} not needed");
				continue;
			}
			if let Err(err) = self.sector_network(sector).await {
				warn!("preload of {sector} skipped: {err}");
			}
		}
	}

	async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, DataError> {
		let body = self.source.fetch_text(url).await?;
		serde_json::from_str(&body).map_err(|err| DataError::decode(url, err))
	}
}
