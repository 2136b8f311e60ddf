use leptos::prelude::*;

#[component]
pub fn StatCard(
	#[prop(into)] label: String,
	#[prop(into)] value: Signal<String>,
	#[prop(optional, into)] accent: Option<&'static str>,
) -> impl IntoView {
	let class = match accent {
		Some(accent) => format!("stat-card stat-card--{accent}"),
		None => "stat-card".to_string(),
	};
	view! {
		<div class=class>
			<div class="stat-card__value">{move || value.get()}</div>
			<div class="stat-card__label">{label}</div>
		</div>
	}
}
