use leptos::prelude::*;

use crate::components::report_nav::{ReportFooter, ReportNav};
use crate::config::AppConfig;
use crate::data::DataClient;
use crate::sections::explorer::NetworkExplorer;
use crate::sections::findings::Findings;
use crate::sections::framework::Framework;
use crate::sections::hero::Hero;
use crate::sections::methodology::Methodology;
use crate::sections::sectors::SectorDeepDive;

/// The report: every section shares one data client and its network cache.
///
/// Sections handle their own load failures, so nothing here needs an error
/// boundary.
#[component]
pub fn Home() -> impl IntoView {
	let config = use_context::<AppConfig>().unwrap_or_default();
	let client = DataClient::http(&config);

	view! {
		<ReportNav />
		<main class="report">
			<Hero client=client.clone() />
			<Framework />
			<NetworkExplorer client=client.clone() />
			<Findings client=client.clone() />
			<SectorDeepDive client=client.clone() />
			<Methodology client=client />
		</main>
		<ReportFooter />
	}
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
	use wasm_bindgen_test::*;

	use super::*;
	use crate::components::report_nav::NAV_SECTIONS;

	wasm_bindgen_test_configure!(run_in_browser);

	#[wasm_bindgen_test]
	fn report_mounts_every_nav_target() {
		let document = web_sys::window()
			.and_then(|w| w.document())
			.expect("browser document");
		let body = document.body().expect("document body");
		let _mounted = leptos::mount::mount_to(body, Home);

		for (id, _) in NAV_SECTIONS {
			assert!(document.get_element_by_id(id).is_some(), "missing #{id}");
		}
		assert!(document.query_selector(".report-nav").unwrap().is_some());
		assert!(document.query_selector(".report-footer").unwrap().is_some());
	}
}
