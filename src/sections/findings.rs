use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::data::{CascadeResult, DataClient, QuadrantDistribution, ResearchStats};
use crate::format::{format_number, format_percent};

fn distribution_row(entry: QuadrantDistribution) -> impl IntoView + use<> {
	let quadrant = entry.quadrant;
	let bar = format!(
		"width: {:.1}%; background-color: {}",
		(entry.share * 100.0).clamp(0.0, 100.0),
		quadrant.color()
	);
	view! {
		<li class="distribution__row">
			<span class="distribution__label">{quadrant.label()}</span>
			<div class="distribution__bar"><div class="distribution__fill" style=bar></div></div>
			<span class="distribution__value">
				{format!("{} ({})", format_number(entry.count.into()), format_percent(entry.share))}
			</span>
		</li>
	}
}

fn cascade_row(result: CascadeResult) -> impl IntoView + use<> {
	view! {
		<tr>
			<td>{result.strategy}</td>
			<td>{format_number(result.components_after.into())}</td>
			<td>{format_percent(result.fragmentation_increase)}</td>
			<td>{format_number(result.giant_size_after.into())}</td>
		</tr>
	}
}

/// Key findings: how roles split across quadrants and how the network
/// fragments when its most central roles are removed.
#[component]
pub fn Findings(client: DataClient) -> impl IntoView {
	let (stats, set_stats) = signal(ResearchStats::fallback());
	let (cascade, set_cascade) = signal(Vec::<CascadeResult>::new());

	let stats_client = client.clone();
	spawn_local(async move {
		set_stats.set(stats_client.stats().await);
	});
	spawn_local(async move {
		set_cascade.set(client.cascade().await);
	});

	view! {
		<section id="findings" class="section">
			<h2>"Key Findings"</h2>

			<h3>"Quadrant distribution"</h3>
			<Show
				when=move || stats.with(|s| !s.quadrant_distribution.is_empty())
				fallback=move || {
					view! {
						<p class="muted">
							{move || {
								stats
									.with(|s| {
										format!(
											"{} of {} roles ({}) face both high transition risk and high network constraint.",
											format_number(s.hh_roles.into()),
											format_number(s.total_roles.into()),
											format_percent(s.hh_share),
										)
									})
							}}
						</p>
					}
				}
			>
				<ul class="distribution">
					{move || {
						stats
							.get()
							.quadrant_distribution
							.into_iter()
							.map(distribution_row)
							.collect_view()
					}}
				</ul>
			</Show>

			<Show when=move || cascade.with(|c| !c.is_empty())>
				<h3>"Cascade simulation"</h3>
				<p class="section__lead">
					"Removing roles in order of centrality shows how quickly mobility pathways collapse."
				</p>
				<table class="cascade-table">
					<thead>
						<tr>
							<th>"Strategy"</th>
							<th>"Components after"</th>
							<th>"Fragmentation increase"</th>
							<th>"Giant component after"</th>
						</tr>
					</thead>
					<tbody>{move || cascade.get().into_iter().map(cascade_row).collect_view()}</tbody>
				</table>
			</Show>
		</section>
	}
}
