use crate::config::FilterOpacity;
use crate::data::{NetworkNode, QuadrantCode};

/// Quadrant and text filters. They only dim nodes; nothing is hidden or re-laid out.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeFilter {
	quadrant: Option<QuadrantCode>,
	/// Trimmed, lowercased; empty means inactive.
	search: String,
}

impl NodeFilter {
	pub fn new(quadrant: Option<QuadrantCode>, search: &str) -> Self {
		Self {
			quadrant,
			search: search.trim().to_lowercase(),
		}
	}

	pub fn has_search(&self) -> bool {
		!self.search.is_empty()
	}

	pub fn is_active(&self) -> bool {
		self.quadrant.is_some() || self.has_search()
	}

	pub fn matches_quadrant(&self, node: &NetworkNode) -> bool {
		self.quadrant.is_none_or(|q| node.quadrant == q)
	}

	/// Case-insensitive substring match on the title or SOC code.
	pub fn matches_search(&self, node: &NetworkNode) -> bool {
		!self.has_search()
			|| node.label.to_lowercase().contains(&self.search)
			|| node.soc.to_lowercase().contains(&self.search)
	}

	pub fn opacity(&self, node: &NetworkNode, levels: &FilterOpacity) -> f64 {
		if !self.is_active() {
			return levels.full;
		}
		let quadrant_ok = self.matches_quadrant(node);
		let search_ok = self.matches_search(node);
		match (self.quadrant.is_some(), self.has_search()) {
			(true, true) if quadrant_ok && search_ok => levels.full,
			(true, true) => levels.both_mismatch,
			(true, false) if !quadrant_ok => levels.quadrant_mismatch,
			(false, true) if !search_ok => levels.search_mismatch,
			_ => levels.full,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn node(label: &str, soc: &str, quadrant: QuadrantCode) -> NetworkNode {
		NetworkNode {
			id: label.to_string(),
			label: label.to_string(),
			soc: soc.to_string(),
			ptr: 0.5,
			nfc: 0.5,
			quadrant,
			size: 8.0,
			ai_exposure: 0.5,
			betweenness: None,
		}
	}

	fn nodes() -> Vec<NetworkNode> {
		vec![
			node("Loan Officer", "13-2072", QuadrantCode::HH),
			node("Bank Teller", "43-3071", QuadrantCode::HH),
			node("Loan Processor", "43-4131", QuadrantCode::LL),
			node("Branch Manager", "11-3031", QuadrantCode::HL),
		]
	}

	fn opacities(filter: &NodeFilter) -> Vec<f64> {
		let levels = FilterOpacity::default();
		nodes().iter().map(|n| filter.opacity(n, &levels)).collect()
	}

	#[test]
	fn no_filter_shows_everything() {
		let filter = NodeFilter::new(None, "   ");
		assert!(!filter.is_active());
		assert_eq!(opacities(&filter), [1.0; 4]);
	}

	#[test]
	fn quadrant_only() {
		let levels = FilterOpacity::default();
		let filter = NodeFilter::new(Some(QuadrantCode::HH), "");
		assert_eq!(
			opacities(&filter),
			[
				levels.full,
				levels.full,
				levels.quadrant_mismatch,
				levels.quadrant_mismatch
			]
		);
	}

	#[test]
	fn search_only_is_case_insensitive_on_label_and_code() {
		let levels = FilterOpacity::default();
		let filter = NodeFilter::new(None, "LOAN");
		assert_eq!(
			opacities(&filter),
			[
				levels.full,
				levels.search_mismatch,
				levels.full,
				levels.search_mismatch
			]
		);

		let by_code = NodeFilter::new(None, "43-");
		assert_eq!(
			opacities(&by_code),
			[
				levels.search_mismatch,
				levels.full,
				levels.full,
				levels.search_mismatch
			]
		);
	}

	#[test]
	fn both_filters_compose_with_and() {
		let levels = FilterOpacity::default();
		let filter = NodeFilter::new(Some(QuadrantCode::HH), "loan");
		assert_eq!(
			opacities(&filter),
			[
				levels.full,
				levels.both_mismatch,
				levels.both_mismatch,
				levels.both_mismatch
			]
		);
	}

	#[test]
	fn dimmed_levels_keep_their_order() {
		let levels = FilterOpacity::default();
		let teller = &nodes()[1];
		let both = NodeFilter::new(Some(QuadrantCode::LL), "zzz").opacity(teller, &levels);
		let one = NodeFilter::new(Some(QuadrantCode::LL), "").opacity(teller, &levels);
		let none = NodeFilter::default().opacity(teller, &levels);
		assert!(none > one && one >= both && both > 0.0);
	}
}
