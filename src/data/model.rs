use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Sector-relative median split of PTR (first letter) and NFC (second letter).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuadrantCode {
	HH,
	HL,
	LH,
	LL,
}

impl QuadrantCode {
	pub const ALL: [QuadrantCode; 4] = [Self::HH, Self::HL, Self::LH, Self::LL];

	pub fn code(self) -> &'static str {
		match self {
			Self::HH => "HH",
			Self::HL => "HL",
			Self::LH => "LH",
			Self::LL => "LL",
		}
	}

	pub fn name(self) -> &'static str {
		match self {
			Self::HH => "Double Jeopardy",
			Self::HL => "Exposed but Mobile",
			Self::LH => "Network Trapped",
			Self::LL => "Structurally Resilient",
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			Self::HH => "High PTR, High NFC",
			Self::HL => "High PTR, Low NFC",
			Self::LH => "Low PTR, High NFC",
			Self::LL => "Low PTR, Low NFC",
		}
	}

	pub fn description(self) -> &'static str {
		match self {
			Self::HH => "High direct AI exposure combined with constrained escape routes",
			Self::HL => "High AI exposure, but the career network provides viable alternatives",
			Self::LH => {
				"Currently safe from direct AI impact, but surrounded by constrained positions"
			}
			Self::LL => "Low AI exposure and high network flexibility",
		}
	}

	pub fn color(self) -> &'static str {
		match self {
			Self::HH => "#DC2626",
			Self::HL => "#EA580C",
			Self::LH => "#9333EA",
			Self::LL => "#16A34A",
		}
	}
}

impl fmt::Display for QuadrantCode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.code())
	}
}

/// One job title with its precomputed risk indices (`data/roles.json`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Role {
	pub id: String,
	pub title: String,
	pub sector: String,
	pub soc: String,
	pub ptr: f64,
	pub nfc: f64,
	pub quadrant_code: QuadrantCode,
	pub ai_exposure_eloundou: f64,
	pub ai_exposure_microsoft: f64,
	pub betweenness: f64,
}

/// Smallest radius a node is drawn or collided with.
pub const MIN_NODE_SIZE: f64 = 2.0;

/// A role as it appears in one sector's network file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkNode {
	pub id: String,
	pub label: String,
	pub soc: String,
	pub ptr: f64,
	pub nfc: f64,
	pub quadrant: QuadrantCode,
	/// Visual size, derived offline from betweenness.
	pub size: f64,
	pub ai_exposure: f64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub betweenness: Option<f64>,
}

impl NetworkNode {
	/// Drawn radius; sizes that are missing, negative or NaN fall back to the minimum.
	pub fn radius(&self) -> f64 {
		if self.size.is_finite() {
			self.size.max(MIN_NODE_SIZE)
		} else {
			MIN_NODE_SIZE
		}
	}
}

fn default_weight() -> f64 {
	1.0
}

/// Directed promotion pathway between two roles, by node id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NetworkEdge {
	pub source: String,
	pub target: String,
	#[serde(default = "default_weight")]
	pub weight: f64,
}

/// An edge whose endpoints were found in the node list.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedEdge {
	pub source: usize,
	pub target: usize,
	pub weight: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkMetadata {
	pub node_count: usize,
	pub edge_count: usize,
	#[serde(default)]
	pub generated_at: String,
}

/// One sector's promotion graph (`data/networks/<slug>.json`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SectorNetwork {
	pub sector: String,
	#[serde(default)]
	pub metadata: NetworkMetadata,
	pub nodes: Vec<NetworkNode>,
	#[serde(default)]
	pub edges: Vec<NetworkEdge>,
}

impl SectorNetwork {
	/// Map edge endpoints to node indices. Edges naming an unknown node are dropped.
	pub fn resolve_edges(&self) -> Vec<ResolvedEdge> {
		let index: HashMap<&str, usize> = self
			.nodes
			.iter()
			.enumerate()
			.map(|(i, node)| (node.id.as_str(), i))
			.collect();

		self.edges
			.iter()
			.filter_map(|edge| {
				let source = *index.get(edge.source.as_str())?;
				let target = *index.get(edge.target.as_str())?;
				Some(ResolvedEdge {
					source,
					target,
					weight: edge.weight,
				})
			})
			.collect()
	}

	pub fn quadrant_count(&self, quadrant: QuadrantCode) -> usize {
		self.nodes.iter().filter(|n| n.quadrant == quadrant).count()
	}

	pub fn mean_ptr(&self) -> Option<f64> {
		mean(self.nodes.iter().map(|n| n.ptr))
	}

	pub fn mean_nfc(&self) -> Option<f64> {
		mean(self.nodes.iter().map(|n| n.nfc))
	}
}

fn mean(values: impl ExactSizeIterator<Item = f64>) -> Option<f64> {
	let len = values.len();
	(len > 0).then(|| values.sum::<f64>() / len as f64)
}

/// Per-sector aggregates (`data/sectors.json`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SectorSummary {
	pub sector: String,
	pub total_roles: u32,
	pub roles_with_indices: u32,
	pub avg_ptr: f64,
	pub avg_nfc: f64,
	pub avg_ai_exposure: f64,
	pub hh_count: u32,
	pub hh_share: f64,
	pub high_ptr_count: u32,
	pub high_nfc_count: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuadrantDistribution {
	pub quadrant: QuadrantCode,
	pub count: u32,
	pub share: f64,
}

/// Headline figures (`data/stats.json`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchStats {
	pub total_roles: u32,
	pub total_sectors: u32,
	pub ptr_nfc_correlation: f64,
	pub hh_roles: u32,
	pub hh_share: f64,
	#[serde(default)]
	pub quadrant_distribution: Vec<QuadrantDistribution>,
}

impl ResearchStats {
	/// Figures reported in the paper, shown when `stats.json` is unavailable.
	pub fn fallback() -> Self {
		Self {
			total_roles: 15759,
			total_sectors: 20,
			ptr_nfc_correlation: 0.10,
			hh_roles: 6398,
			hh_share: 0.406,
			quadrant_distribution: Vec::new(),
		}
	}
}

/// Outcome of removing the top roles under one targeting strategy (`data/cascade.json`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CascadeResult {
	pub strategy: String,
	pub components_after: u32,
	pub fragmentation_increase: f64,
	pub giant_size_after: u32,
}

#[cfg(test)]
mod tests {
	use super::*;

	const NETWORK_JSON: &str = r#"{
		"sector": "Healthcare",
		"metadata": { "nodeCount": 3, "edgeCount": 3, "generatedAt": "2025-01-01T00:00:00Z" },
		"nodes": [
			{ "id": "A", "label": "Registered Nurse", "soc": "29-1141", "ptr": 0.4, "nfc": 0.7,
			  "quadrant": "LH", "size": 20, "aiExposure": 0.3, "betweenness": 0.12 },
			{ "id": "B", "label": "Nurse Manager", "soc": "11-9111", "ptr": 0.8, "nfc": 0.6,
			  "quadrant": "HH", "size": 5, "aiExposure": 0.6 },
			{ "id": "C", "label": "Charge Nurse", "soc": "29-1141", "ptr": 0.2, "nfc": 0.1,
			  "quadrant": "LL", "size": 8, "aiExposure": 0.1 }
		],
		"edges": [
			{ "source": "A", "target": "B", "weight": 1 },
			{ "source": "B", "target": "ghost", "weight": 2 },
			{ "source": "C", "target": "A" }
		]
	}"#;

	#[test]
	fn parses_network_file() {
		let network: SectorNetwork = serde_json::from_str(NETWORK_JSON).unwrap();
		assert_eq!(network.sector, "Healthcare");
		assert_eq!(network.metadata.node_count, 3);
		assert_eq!(network.nodes[0].quadrant, QuadrantCode::LH);
		assert_eq!(network.nodes[0].betweenness, Some(0.12));
		assert_eq!(network.nodes[1].betweenness, None);
		assert_eq!(network.edges[2].weight, 1.0);
	}

	#[test]
	fn unknown_edge_endpoints_are_dropped() {
		let network: SectorNetwork = serde_json::from_str(NETWORK_JSON).unwrap();
		let edges = network.resolve_edges();
		assert_eq!(
			edges,
			vec![
				ResolvedEdge {
					source: 0,
					target: 1,
					weight: 1.0
				},
				ResolvedEdge {
					source: 2,
					target: 0,
					weight: 1.0
				},
			]
		);
		for edge in &edges {
			assert!(edge.source < network.nodes.len());
			assert!(edge.target < network.nodes.len());
		}
	}

	#[test]
	fn network_aggregates() {
		let network: SectorNetwork = serde_json::from_str(NETWORK_JSON).unwrap();
		assert_eq!(network.quadrant_count(QuadrantCode::HH), 1);
		assert_eq!(network.quadrant_count(QuadrantCode::HL), 0);
		let ptr = network.mean_ptr().unwrap();
		assert!((ptr - (0.4 + 0.8 + 0.2) / 3.0).abs() < 1e-12);

		let empty = SectorNetwork {
			sector: "Empty".into(),
			metadata: NetworkMetadata::default(),
			nodes: vec![],
			edges: vec![],
		};
		assert_eq!(empty.mean_nfc(), None);
	}

	#[test]
	fn radius_is_positive() {
		let mut node: NetworkNode = serde_json::from_str(
			r#"{ "id": "x", "label": "x", "soc": "", "ptr": 0, "nfc": 0,
			     "quadrant": "LL", "size": 0, "aiExposure": 0 }"#,
		)
		.unwrap();
		assert_eq!(node.radius(), MIN_NODE_SIZE);
		node.size = f64::NAN;
		assert_eq!(node.radius(), MIN_NODE_SIZE);
		node.size = 14.0;
		assert_eq!(node.radius(), 14.0);
	}

	#[test]
	fn parses_role_and_stats_records() {
		let role: Role = serde_json::from_str(
			r#"{ "id": "r1", "title": "Teller", "sector": "Finance", "soc": "43-3071",
			     "ptr": 0.9, "nfc": 0.8, "quadrant_code": "HH",
			     "ai_exposure_eloundou": 0.7, "ai_exposure_microsoft": 0.65, "betweenness": 0.01 }"#,
		)
		.unwrap();
		assert_eq!(role.quadrant_code, QuadrantCode::HH);

		let stats: ResearchStats = serde_json::from_str(
			r#"{ "totalRoles": 100, "totalSectors": 3, "ptrNfcCorrelation": 0.2,
			     "hhRoles": 40, "hhShare": 0.4,
			     "quadrantDistribution": [{ "quadrant": "HH", "count": 40, "share": 0.4 }] }"#,
		)
		.unwrap();
		assert_eq!(stats.total_roles, 100);
		assert_eq!(stats.quadrant_distribution[0].quadrant, QuadrantCode::HH);
	}
}
