//! Build-time and presentation configuration.

/// Static asset prefix baked in at build time (`APP_BASE_PATH=/report/ trunk build`).
const BASE_PATH: Option<&str> = option_env!("APP_BASE_PATH");

/// Top-level configuration, provided as Leptos context by [`crate::App`].
#[derive(Clone, Debug)]
pub struct AppConfig {
	/// Prefix for every static asset URL; always starts and ends with `/`.
	pub base_path: String,
	/// How many of the leading sectors are fetched in the background.
	pub preload_count: usize,
	/// Force simulation constants.
	pub layout: LayoutConfig,
	/// Drawing surface and zoom constants.
	pub view: ViewConfig,
	/// Filter dimming levels.
	pub opacity: FilterOpacity,
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			base_path: normalize_base_path(BASE_PATH.unwrap_or("/")),
			preload_count: 5,
			layout: LayoutConfig::default(),
			view: ViewConfig::default(),
			opacity: FilterOpacity::default(),
		}
	}
}

impl AppConfig {
	/// Config with an explicit asset prefix.
	#[cfg(test)]
	pub fn with_base_path(base_path: &str) -> Self {
		Self {
			base_path: normalize_base_path(base_path),
			..Self::default()
		}
	}

	/// Resolve a path relative to the deployment root, e.g. `data/stats.json`.
	pub fn asset_url(&self, relative: &str) -> String {
		format!("{}{}", self.base_path, relative.trim_start_matches('/'))
	}

	/// Router base: the asset prefix without its trailing slash (`""` at the root).
	pub fn router_base(&self) -> String {
		self.base_path.trim_end_matches('/').to_string()
	}
}

fn normalize_base_path(raw: &str) -> String {
	let trimmed = raw.trim().trim_matches('/');
	if trimmed.is_empty() {
		"/".to_string()
	} else {
		format!("/{trimmed}/")
	}
}

/// Constants for the force-directed layout.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
	/// Rest length of every link spring.
	pub link_distance: f64,
	/// Base link strength, divided by the smaller endpoint degree.
	pub link_strength: f64,
	/// Many-body strength; negative repels.
	pub charge: f64,
	/// Collision radius is node size plus this margin.
	pub collision_margin: f64,
	/// The simulation freezes once alpha drops below this.
	pub alpha_min: f64,
	/// Fraction of velocity lost each tick.
	pub velocity_decay: f64,
	/// Hard tick budget; alpha decay is tuned to reach `alpha_min` here.
	pub max_ticks: usize,
	/// Width of the square around the centre in which nodes start.
	pub initial_jitter: f64,
	/// Ticks advanced per animation frame.
	pub ticks_per_frame: usize,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			link_distance: 80.0,
			link_strength: 0.3,
			charge: -150.0,
			collision_margin: 3.0,
			alpha_min: 0.001,
			velocity_decay: 0.4,
			max_ticks: 300,
			initial_jitter: 100.0,
			ticks_per_frame: 1,
		}
	}
}

impl LayoutConfig {
	/// Per-tick alpha decay so that alpha reaches `alpha_min` after `max_ticks`.
	pub fn alpha_decay(&self) -> f64 {
		1.0 - self.alpha_min.powf(1.0 / self.max_ticks.max(1) as f64)
	}
}

/// Drawing surface and zoom behaviour.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewConfig {
	pub min_zoom: f64,
	pub max_zoom: f64,
	/// Scale applied when a network is first shown.
	pub initial_scale: f64,
	/// Multiplicative step for one wheel notch or zoom button press.
	pub zoom_step: f64,
	/// Height is `width * aspect`, capped at `max_height`.
	pub aspect: f64,
	pub max_height: f64,
	pub default_width: f64,
	pub default_height: f64,
	/// Nodes larger than this get a text label.
	pub label_min_size: f64,
	/// Labels longer than this are cut to `label_keep` chars plus an ellipsis.
	pub label_max_chars: usize,
	pub label_keep: usize,
}

impl Default for ViewConfig {
	fn default() -> Self {
		Self {
			min_zoom: 0.2,
			max_zoom: 4.0,
			initial_scale: 0.8,
			zoom_step: 1.1,
			aspect: 0.75,
			max_height: 700.0,
			default_width: 800.0,
			default_height: 600.0,
			label_min_size: 12.0,
			label_max_chars: 20,
			label_keep: 18,
		}
	}
}

impl ViewConfig {
	/// Surface height for a container of the given width.
	pub fn height_for(&self, width: f64) -> f64 {
		(width * self.aspect).min(self.max_height)
	}
}

/// Opacity levels for the search and quadrant filters.
///
/// Only the ordering matters: a full match is brighter than a single-filter
/// mismatch, which is at least as bright as failing both filters.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterOpacity {
	pub full: f64,
	pub quadrant_mismatch: f64,
	pub search_mismatch: f64,
	pub both_mismatch: f64,
}

impl Default for FilterOpacity {
	fn default() -> Self {
		Self {
			full: 1.0,
			quadrant_mismatch: 0.15,
			search_mismatch: 0.15,
			both_mismatch: 0.1,
		}
	}
}

impl FilterOpacity {
	/// `full > partial >= both > 0`.
	pub fn is_ordered(&self) -> bool {
		let partial = self.quadrant_mismatch.min(self.search_mismatch);
		self.full > self.quadrant_mismatch
			&& self.full > self.search_mismatch
			&& partial >= self.both_mismatch
			&& self.both_mismatch > 0.0
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn base_path_is_normalized() {
		assert_eq!(AppConfig::with_base_path("").base_path, "/");
		assert_eq!(AppConfig::with_base_path("/").base_path, "/");
		assert_eq!(AppConfig::with_base_path("report").base_path, "/report/");
		assert_eq!(AppConfig::with_base_path("/report/").base_path, "/report/");
	}

	#[test]
	fn asset_urls_join_cleanly() {
		let config = AppConfig::with_base_path("/report");
		assert_eq!(config.asset_url("data/stats.json"), "/report/data/stats.json");
		assert_eq!(config.asset_url("/data/stats.json"), "/report/data/stats.json");
		assert_eq!(config.router_base(), "/report");
		assert_eq!(AppConfig::with_base_path("/").router_base(), "");
	}

	#[test]
	fn alpha_decay_reaches_minimum_within_budget() {
		let layout = LayoutConfig::default();
		let alpha = (1.0 - layout.alpha_decay()).powi(layout.max_ticks as i32);
		assert!((alpha - layout.alpha_min).abs() < 1e-9);
	}

	#[test]
	fn default_opacity_levels_are_ordered() {
		assert!(FilterOpacity::default().is_ordered());
		let inverted = FilterOpacity {
			both_mismatch: 0.5,
			..FilterOpacity::default()
		};
		assert!(!inverted.is_ordered());
	}

	#[test]
	fn height_is_capped() {
		let view = ViewConfig::default();
		assert_eq!(view.height_for(400.0), 300.0);
		assert_eq!(view.height_for(2000.0), 700.0);
	}
}
