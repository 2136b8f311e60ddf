use leptos::prelude::*;
use leptos_router::components::A;

/// 404 Not Found Page
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<section class="section not-found">
			<h1>"Page not found"</h1>
			<p>"This report only has one page."</p>
			<A href="/">"Back to the report"</A>
		</section>
	}
}
