use std::collections::HashSet;
use std::sync::Arc;

use super::filter::NodeFilter;
use super::layout::Simulation;
use crate::config::{FilterOpacity, LayoutConfig, ViewConfig};
use crate::data::{NetworkNode, ResolvedEdge, SectorNetwork};

/// Pointer travel (screen px) below which a press counts as a click.
pub const CLICK_SLOP: f64 = 3.0;
/// Extra screen-independent reach around small nodes for hit testing.
pub const HIT_PADDING: f64 = 2.0;

/// Everything the graph needs that is not part of the network itself.
#[derive(Clone, Debug, Default)]
pub struct GraphSettings {
	pub layout: LayoutConfig,
	pub view: ViewConfig,
	pub opacity: FilterOpacity,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl ViewTransform {
	pub fn svg_attr(&self) -> String {
		format!("translate({:.2},{:.2}) scale({:.4})", self.x, self.y, self.k)
	}
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<usize>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f64,
	pub node_start_y: f64,
	pub moved: bool,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<usize>,
	pub neighbors: HashSet<usize>,
}

/// Result of releasing the pointer.
#[derive(Clone, Debug, PartialEq)]
pub enum PointerRelease {
	Nothing,
	/// A node was pressed and released in place; carries the new selection.
	Clicked(Option<usize>),
	/// A node was dragged to a new pinned position.
	Dropped(usize),
}

/// Layout, view and interaction state for one sector network.
///
/// The simulation owns every position; rendering only reads them.
pub struct NetworkGraphState {
	pub network: Arc<SectorNetwork>,
	pub edges: Vec<ResolvedEdge>,
	pub sim: Simulation,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub selected: Option<usize>,
	pub filter: NodeFilter,
	pub settings: GraphSettings,
	pub width: f64,
	pub height: f64,
}

impl NetworkGraphState {
	pub fn new(
		network: Arc<SectorNetwork>,
		width: f64,
		height: f64,
		seed: u64,
		settings: GraphSettings,
	) -> Self {
		let edges = network.resolve_edges();
		let radii: Vec<f64> = network.nodes.iter().map(NetworkNode::radius).collect();
		let sim = Simulation::new(
			&radii,
			&edges,
			(width / 2.0, height / 2.0),
			settings.layout.clone(),
			seed,
		);
		let k = settings.view.initial_scale;

		Self {
			network,
			edges,
			sim,
			transform: ViewTransform {
				x: width * 0.1,
				y: height * 0.1,
				k,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			selected: None,
			filter: NodeFilter::default(),
			settings,
			width,
			height,
		}
	}

	pub fn node(&self, idx: usize) -> Option<&NetworkNode> {
		self.network.nodes.get(idx)
	}

	pub fn position(&self, idx: usize) -> Option<(f64, f64)> {
		self.sim.body(idx).map(|b| (b.x, b.y))
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Topmost node under a screen point.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		for (idx, node) in self.network.nodes.iter().enumerate() {
			let Some((x, y)) = self.position(idx) else {
				continue;
			};
			let (dx, dy) = (x - gx, y - gy);
			if (dx * dx + dy * dy).sqrt() <= node.radius() + HIT_PADDING {
				found = Some(idx);
			}
		}
		found
	}

	/// Returns `true` when the hovered node changed.
	pub fn set_hover(&mut self, node: Option<usize>) -> bool {
		if self.hover.node == node {
			return false;
		}
		self.hover.node = node;
		self.hover.neighbors.clear();
		if let Some(idx) = node {
			for edge in &self.edges {
				if edge.source == idx {
					self.hover.neighbors.insert(edge.target);
				} else if edge.target == idx {
					self.hover.neighbors.insert(edge.source);
				}
			}
		}
		true
	}

	pub fn is_hovered(&self, idx: usize) -> bool {
		self.hover.node == Some(idx)
	}

	pub fn is_neighbor(&self, idx: usize) -> bool {
		self.hover.neighbors.contains(&idx)
	}

	pub fn pointer_down(&mut self, x: f64, y: f64) {
		if let Some(idx) = self.node_at_position(x, y) {
			let (nx, ny) = self.position(idx).unwrap_or_default();
			self.drag = DragState {
				active: true,
				node_idx: Some(idx),
				start_x: x,
				start_y: y,
				node_start_x: nx,
				node_start_y: ny,
				moved: false,
			};
		} else {
			self.pan = PanState {
				active: true,
				start_x: x,
				start_y: y,
				transform_start_x: self.transform.x,
				transform_start_y: self.transform.y,
			};
		}
	}

	/// Returns `true` when anything visible changed.
	pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
		if self.drag.active {
			let Some(idx) = self.drag.node_idx else {
				return false;
			};
			let (sdx, sdy) = (x - self.drag.start_x, y - self.drag.start_y);
			if !self.drag.moved && sdx.hypot(sdy) < CLICK_SLOP {
				return false;
			}
			self.drag.moved = true;
			let k = self.transform.k;
			self.sim.pin(
				idx,
				self.drag.node_start_x + sdx / k,
				self.drag.node_start_y + sdy / k,
			);
			true
		} else if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (x - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (y - self.pan.start_y);
			true
		} else {
			let hovered = self.node_at_position(x, y);
			self.set_hover(hovered)
		}
	}

	pub fn pointer_up(&mut self) -> PointerRelease {
		let release = match (self.drag.active, self.drag.node_idx) {
			(true, Some(idx)) if self.drag.moved => PointerRelease::Dropped(idx),
			(true, Some(idx)) => {
				self.selected = if self.selected == Some(idx) {
					None
				} else {
					Some(idx)
				};
				PointerRelease::Clicked(self.selected)
			}
			_ => PointerRelease::Nothing,
		};
		self.drag = DragState::default();
		self.pan = PanState::default();
		release
	}

	pub fn pointer_leave(&mut self) -> bool {
		self.drag = DragState::default();
		self.pan = PanState::default();
		self.set_hover(None)
	}

	/// Zoom by `factor` keeping the screen point `(x, y)` fixed.
	pub fn zoom_at(&mut self, x: f64, y: f64, factor: f64) {
		let view = &self.settings.view;
		let new_k = (self.transform.k * factor).clamp(view.min_zoom, view.max_zoom);
		let ratio = new_k / self.transform.k;
		self.transform.x = x - (x - self.transform.x) * ratio;
		self.transform.y = y - (y - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	/// Zoom around the middle of the surface.
	pub fn zoom_by(&mut self, factor: f64) {
		self.zoom_at(self.width / 2.0, self.height / 2.0, factor);
	}

	/// Scale and centre so every node fits with a small margin.
	pub fn fit_to_view(&mut self) {
		let mut bounds: Option<(f64, f64, f64, f64)> = None;
		for body in self.sim.bodies() {
			let (x, y, r) = (body.x, body.y, body.radius);
			bounds = Some(match bounds {
				None => (x - r, y - r, x + r, y + r),
				Some((x0, y0, x1, y1)) => (x0.min(x - r), y0.min(y - r), x1.max(x + r), y1.max(y + r)),
			});
		}
		let Some((x0, y0, x1, y1)) = bounds else {
			return;
		};

		let view = &self.settings.view;
		let margin = 0.9;
		let (bw, bh) = ((x1 - x0).max(1.0), (y1 - y0).max(1.0));
		let k = (margin * (self.width / bw).min(self.height / bh)).clamp(view.min_zoom, view.max_zoom);
		self.transform = ViewTransform {
			x: self.width / 2.0 - k * (x0 + x1) / 2.0,
			y: self.height / 2.0 - k * (y0 + y1) / 2.0,
			k,
		};
	}

	/// Run one frame's worth of ticks. Returns `true` while the layout is still moving.
	pub fn advance(&mut self) -> bool {
		let mut running = !self.sim.is_frozen();
		for _ in 0..self.settings.layout.ticks_per_frame.max(1) {
			running = self.sim.tick();
			if !running {
				break;
			}
		}
		running
	}

	pub fn is_animating(&self) -> bool {
		!self.sim.is_frozen()
	}

	/// New surface size; positions are kept and a running layout re-centres.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.sim.set_center(width / 2.0, height / 2.0);
	}

	pub fn set_filter(&mut self, filter: NodeFilter) -> bool {
		if self.filter == filter {
			return false;
		}
		self.filter = filter;
		true
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::data::{NetworkEdge, NetworkMetadata, QuadrantCode};

	fn node(id: &str, size: f64) -> NetworkNode {
		NetworkNode {
			id: id.to_string(),
			label: format!("Role {id}"),
			soc: "00-0000".to_string(),
			ptr: 0.5,
			nfc: 0.5,
			quadrant: QuadrantCode::HL,
			size,
			ai_exposure: 0.5,
			betweenness: None,
		}
	}

	fn network() -> Arc<SectorNetwork> {
		Arc::new(SectorNetwork {
			sector: "Healthcare".into(),
			metadata: NetworkMetadata::default(),
			nodes: vec![node("A", 20.0), node("B", 5.0), node("C", 8.0)],
			edges: vec![
				NetworkEdge {
					source: "A".into(),
					target: "B".into(),
					weight: 1.0,
				},
				NetworkEdge {
					source: "A".into(),
					target: "missing".into(),
					weight: 1.0,
				},
			],
		})
	}

	fn settled_state() -> NetworkGraphState {
		let mut state = NetworkGraphState::new(network(), 800.0, 600.0, 17, GraphSettings::default());
		state.sim.run_to_rest();
		state
	}

	fn screen_of(state: &NetworkGraphState, idx: usize) -> (f64, f64) {
		let (x, y) = state.position(idx).unwrap();
		let t = &state.transform;
		(x * t.k + t.x, y * t.k + t.y)
	}

	#[test]
	fn unresolved_edges_are_dropped() {
		let state = NetworkGraphState::new(network(), 800.0, 600.0, 1, GraphSettings::default());
		assert_eq!(state.edges.len(), 1);
	}

	#[test]
	fn hit_testing_respects_transform() {
		let state = settled_state();
		let (sx, sy) = screen_of(&state, 0);
		assert_eq!(state.node_at_position(sx, sy), Some(0));
		assert_eq!(state.node_at_position(-5000.0, -5000.0), None);
	}

	#[test]
	fn zoom_is_clamped() {
		let mut state = settled_state();
		for _ in 0..100 {
			state.zoom_at(10.0, 10.0, 1.5);
		}
		assert_eq!(state.transform.k, 4.0);
		for _ in 0..100 {
			state.zoom_by(0.5);
		}
		assert_eq!(state.transform.k, 0.2);
	}

	#[test]
	fn zoom_keeps_anchor_fixed() {
		let mut state = settled_state();
		let before = state.screen_to_graph(300.0, 200.0);
		state.zoom_at(300.0, 200.0, 1.1);
		let after = state.screen_to_graph(300.0, 200.0);
		assert!((before.0 - after.0).abs() < 1e-9 && (before.1 - after.1).abs() < 1e-9);
	}

	#[test]
	fn drag_pins_node_and_moves_its_edge() {
		let mut state = settled_state();
		let (sx, sy) = screen_of(&state, 1);
		state.pointer_down(sx, sy);
		assert!(state.pointer_move(sx + 40.0, sy + 20.0));
		assert_eq!(state.pointer_up(), PointerRelease::Dropped(1));

		let (nx, ny) = screen_of(&state, 1);
		assert!((nx - (sx + 40.0)).abs() < 1e-6 && (ny - (sy + 20.0)).abs() < 1e-6);
		assert!(state.sim.bodies()[1].is_pinned());
		assert_eq!(state.selected, None);
	}

	#[test]
	fn click_toggles_selection() {
		let mut state = settled_state();
		let (sx, sy) = screen_of(&state, 0);
		state.pointer_down(sx, sy);
		assert!(!state.pointer_move(sx + 1.0, sy));
		assert_eq!(state.pointer_up(), PointerRelease::Clicked(Some(0)));
		state.pointer_down(sx, sy);
		assert_eq!(state.pointer_up(), PointerRelease::Clicked(None));
	}

	#[test]
	fn background_drag_pans() {
		let mut state = settled_state();
		let (x0, y0) = (state.transform.x, state.transform.y);
		state.pointer_down(-5000.0, -5000.0);
		state.pointer_move(-4990.0, -4995.0);
		assert_eq!(state.pointer_up(), PointerRelease::Nothing);
		assert_eq!((state.transform.x, state.transform.y), (x0 + 10.0, y0 + 5.0));
	}

	#[test]
	fn hover_tracks_neighbors() {
		let mut state = settled_state();
		let (sx, sy) = screen_of(&state, 0);
		assert!(state.pointer_move(sx, sy));
		assert!(state.is_hovered(0));
		assert!(state.is_neighbor(1));
		assert!(!state.is_neighbor(2));
		assert!(!state.pointer_move(sx, sy));
		assert!(state.pointer_leave());
		assert_eq!(state.hover.node, None);
	}

	#[test]
	fn resize_keeps_positions() {
		let mut state = settled_state();
		let before: Vec<_> = (0..3).map(|i| state.position(i).unwrap()).collect();
		state.resize(400.0, 300.0);
		let after: Vec<_> = (0..3).map(|i| state.position(i).unwrap()).collect();
		assert_eq!(before, after);
		assert_eq!((state.width, state.height), (400.0, 300.0));
	}

	#[test]
	fn fit_to_view_frames_every_node() {
		let mut state = settled_state();
		state.zoom_by(0.3);
		state.fit_to_view();
		for idx in 0..3 {
			let (sx, sy) = screen_of(&state, idx);
			assert!((0.0..=800.0).contains(&sx) && (0.0..=600.0).contains(&sy));
		}
	}

	#[test]
	fn advance_stops_when_frozen() {
		let mut state = NetworkGraphState::new(network(), 800.0, 600.0, 2, GraphSettings::default());
		let mut frames = 0;
		while state.advance() {
			frames += 1;
			assert!(frames <= 300);
		}
		assert!(!state.is_animating());
		assert!(!state.advance());
	}
}
