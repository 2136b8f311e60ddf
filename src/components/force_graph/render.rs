use super::state::{NetworkGraphState, ViewTransform};

const EDGE_COLOR: &str = "#94A3B8";
const EDGE_HIGHLIGHT: &str = "#334155";
const EDGE_ALPHA: f64 = 0.6;
const NODE_STROKE: &str = "#FFFFFF";
const HOVER_STROKE: &str = "#000000";
const SELECTED_STROKE: &str = "#2563EB";
const NEIGHBOR_STROKE: &str = "#334155";

#[derive(Clone, Debug, PartialEq)]
pub struct EdgeGlyph {
	pub x1: f64,
	pub y1: f64,
	pub x2: f64,
	pub y2: f64,
	pub width: f64,
	pub color: &'static str,
	pub opacity: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeGlyph {
	pub x: f64,
	pub y: f64,
	pub r: f64,
	pub fill: &'static str,
	pub stroke: &'static str,
	pub stroke_width: f64,
	pub opacity: f64,
	pub label: Option<String>,
}

/// One frame of the network, in graph coordinates, ready to become SVG.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
	pub transform: ViewTransform,
	pub edges: Vec<EdgeGlyph>,
	pub nodes: Vec<NodeGlyph>,
}

impl Default for Scene {
	fn default() -> Self {
		Self {
			transform: ViewTransform {
				x: 0.0,
				y: 0.0,
				k: 1.0,
			},
			edges: Vec::new(),
			nodes: Vec::new(),
		}
	}
}

/// Shorten long titles to `keep` chars plus an ellipsis.
pub fn truncate_label(label: &str, max_chars: usize, keep: usize) -> String {
	if label.chars().count() > max_chars {
		let mut short: String = label.chars().take(keep).collect();
		short.push_str("...");
		short
	} else {
		label.to_string()
	}
}

pub fn build_scene(state: &NetworkGraphState) -> Scene {
	let view = &state.settings.view;
	let levels = &state.settings.opacity;

	let mut opacity = Vec::with_capacity(state.network.nodes.len());
	let mut nodes = Vec::with_capacity(state.network.nodes.len());
	for (index, node) in state.network.nodes.iter().enumerate() {
		let alpha = state.filter.opacity(node, levels);
		opacity.push(alpha);
		let Some((x, y)) = state.position(index) else {
			continue;
		};

		let (stroke, stroke_width) = if state.is_hovered(index) {
			(HOVER_STROKE, 3.0)
		} else if state.selected == Some(index) {
			(SELECTED_STROKE, 3.0)
		} else if state.is_neighbor(index) {
			(NEIGHBOR_STROKE, 2.5)
		} else {
			(NODE_STROKE, 2.0)
		};
		let label = (node.size > view.label_min_size)
			.then(|| truncate_label(&node.label, view.label_max_chars, view.label_keep));

		nodes.push(NodeGlyph {
			x,
			y,
			r: node.radius(),
			fill: node.quadrant.color(),
			stroke,
			stroke_width,
			opacity: alpha,
			label,
		});
	}

	let edges = state
		.edges
		.iter()
		.filter_map(|edge| {
			let (x1, y1) = state.position(edge.source)?;
			let (x2, y2) = state.position(edge.target)?;
			if (x2 - x1).hypot(y2 - y1) < 0.001 {
				return None;
			}
			let touches_hover =
				state.is_hovered(edge.source) || state.is_hovered(edge.target);
			Some(EdgeGlyph {
				x1,
				y1,
				x2,
				y2,
				width: (edge.weight * 2.0).max(1.0),
				color: if touches_hover { EDGE_HIGHLIGHT } else { EDGE_COLOR },
				opacity: EDGE_ALPHA * opacity[edge.source].min(opacity[edge.target]),
			})
		})
		.collect();

	Scene {
		transform: state.transform.clone(),
		edges,
		nodes,
	}
}
