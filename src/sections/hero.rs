use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::stat_card::StatCard;
use crate::data::{DataClient, ResearchStats};
use crate::format::{format_number, format_percent};

/// Headline and the four summary statistics.
///
/// Renders the built-in fallback figures until the stats file arrives, and
/// keeps them if it never does.
#[component]
pub fn Hero(client: DataClient) -> impl IntoView {
	let (stats, set_stats) = signal(ResearchStats::fallback());
	spawn_local(async move {
		set_stats.set(client.stats().await);
	});

	let total_roles = Signal::derive(move || stats.with(|s| format_number(s.total_roles.into())));
	let total_sectors = Signal::derive(move || stats.with(|s| s.total_sectors.to_string()));
	let hh_share = Signal::derive(move || stats.with(|s| format_percent(s.hh_share)));
	let correlation = Signal::derive(move || stats.with(|s| format!("{:.2}", s.ptr_nfc_correlation)));

	view! {
		<header id="top" class="hero">
			<p class="hero__eyebrow">"Career Mobility Research"</p>
			<h1>"Where Do Careers Go When Work Changes?"</h1>
			<p class="hero__lead">
				"We mapped promotion pathways between roles to measure two things for each of them: "
				"its personal transition risk and how constrained its network neighbourhood is. "
				"Roles high on both are the ones most likely to strand workers when AI reshapes demand."
			</p>
			<div class="hero__stats">
				<StatCard label="Roles analysed" value=total_roles />
				<StatCard label="Sectors" value=total_sectors />
				<StatCard label="Double jeopardy (HH)" value=hh_share accent="hh" />
				<StatCard label="PTR / NFC correlation" value=correlation />
			</div>
			<p class="hero__footnote">
				{move || {
					stats
						.with(|s| {
							format!(
								"{} roles face both high transition risk and high network constraint.",
								format_number(s.hh_roles.into()),
							)
						})
				}}
			</p>
		</header>
	}
}
