use leptos::prelude::*;

use crate::data::QuadrantCode;

fn quadrant_cell(quadrant: QuadrantCode) -> impl IntoView + use<> {
	view! {
		<div
			class=format!("quadrant-diagram__cell quadrant-diagram__cell--{}", quadrant.code().to_lowercase())
			style=format!("border-color: {}", quadrant.color())
		>
			<span class="quadrant-diagram__code" style=format!("color: {}", quadrant.color())>
				{quadrant.code()}
			</span>
			<h4>{quadrant.name()}</h4>
			<p>{quadrant.description()}</p>
		</div>
	}
}

/// The two indices and the quadrant grid they produce.
#[component]
pub fn Framework() -> impl IntoView {
	// High NFC on the top row, high PTR on the right.
	let grid = [QuadrantCode::LH, QuadrantCode::HH, QuadrantCode::LL, QuadrantCode::HL];

	view! {
		<section id="framework" class="section">
			<h2>"The PTR-NFC Framework"</h2>
			<p class="section__lead">
				"A two-dimensional approach to structural vulnerability in career networks."
			</p>
			<p>
				"Task-level AI exposure says how much of a job can be automated. It says nothing about "
				"where a worker can go next. Two roles with identical exposure can face very different "
				"prospects: one with many pathways into less exposed roles, the other in a career cul-de-sac."
			</p>
			<div class="framework__indices">
				<div>
					<h3>"Personal Transition Risk (PTR)"</h3>
					<p>
						"Direct vulnerability: AI exposure, reduced when a role has many outbound promotion pathways."
					</p>
				</div>
				<div>
					<h3>"Network Flexibility Constraint (NFC)"</h3>
					<p>
						"Neighbourhood vulnerability: how exposed and tightly clustered the surrounding roles are."
					</p>
				</div>
			</div>
			<div class="quadrant-diagram" role="img" aria-label="PTR by NFC quadrant grid">
				<span class="quadrant-diagram__axis quadrant-diagram__axis--y">"NFC →"</span>
				{grid.map(quadrant_cell).into_iter().collect_view()}
				<span class="quadrant-diagram__axis quadrant-diagram__axis--x">"PTR →"</span>
			</div>
		</section>
	}
}
