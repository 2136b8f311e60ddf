use leptos::prelude::*;

use crate::data::{DataClient, ROLES_FILE, SECTORS_FILE};

#[component]
fn Detail(title: &'static str, children: Children) -> impl IntoView {
	view! {
		<details class="expandable">
			<summary>{title}</summary>
			<div class="expandable__body">{children()}</div>
		</details>
	}
}

#[component]
pub fn Methodology(client: DataClient) -> impl IntoView {
	let roles_href = client.download_url(ROLES_FILE);
	let sectors_href = client.download_url(SECTORS_FILE);

	view! {
		<section id="methodology" class="section">
			<h2>"Methodology"</h2>

			<Detail title="Index construction">
				<h4>"Personal Transition Risk (PTR)"</h4>
				<p>
					"A role's direct exposure to AI, discounted by how many promotion pathways lead out of it."
				</p>
				<pre class="formula">"PTR = AI_Exposure × (1 - out_degree / max_out_degree)"</pre>
				<h4>"Network Flexibility Constraint (NFC)"</h4>
				<p>
					"Neighbourhood-level constraint: the average PTR of neighbouring roles weighted by "
					"local clustering. High NFC means being surrounded by equally vulnerable positions."
				</p>
				<pre class="formula">"NFC = avg_neighbor_PTR × neighborhood_density"</pre>
				<p>
					"Roles are assigned to quadrants by sector-specific median splits of PTR and NFC, "
					"giving four categories: HH, HL, LH and LL."
				</p>
			</Detail>

			<Detail title="Network analysis">
				<p>
					"Each sector network is built from validated promotion transitions. Edges are "
					"weighted by transition frequency; node size follows betweenness centrality."
				</p>
				<p>
					"The explorer computes a force-directed layout in the browser, so positions differ "
					"slightly between visits while the structure stays the same."
				</p>
			</Detail>

			<Detail title="Limitations">
				<p>
					"High PTR or NFC marks structural vulnerability, not a forecast. Correlation is not "
					"causation, and exposure scores describe tasks rather than whole jobs."
				</p>
			</Detail>

			<h3>"Data"</h3>
			<ul class="downloads">
				<li>
					<a href=roles_href download="roles.json">"Download role indices (roles.json)"</a>
				</li>
				<li>
					<a href=sectors_href download="sectors.json">"Download sector summaries (sectors.json)"</a>
				</li>
			</ul>
		</section>
	}
}
