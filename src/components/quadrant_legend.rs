use leptos::prelude::*;

use crate::data::QuadrantCode;

/// Quadrant key that doubles as the quadrant filter. Clicking the active entry clears it.
#[component]
pub fn QuadrantLegend(
	#[prop(into)] selected: Signal<Option<QuadrantCode>>,
	#[prop(into)] on_select: Callback<Option<QuadrantCode>>,
) -> impl IntoView {
	let entries = QuadrantCode::ALL.map(|quadrant| {
		let is_active = move || selected.get() == Some(quadrant);
		let toggle = move |_| {
			let next = if selected.get_untracked() == Some(quadrant) {
				None
			} else {
				Some(quadrant)
			};
			on_select.run(next);
		};
		view! {
			<button
				type="button"
				class="quadrant-legend__item"
				class:active=is_active
				aria-pressed=move || is_active().to_string()
				title=quadrant.description()
				on:click=toggle
			>
				<span class="quadrant-legend__swatch" style=format!("background-color: {}", quadrant.color())></span>
				<span class="quadrant-legend__code">{quadrant.code()}</span>
				<span class="quadrant-legend__name">{quadrant.name()}</span>
			</button>
		}
	});

	view! {
		<div class="quadrant-legend" role="group" aria-label="Filter by quadrant">
			{entries.into_iter().collect_view()}
		</div>
	}
}
