use leptos::prelude::*;
use log::{debug, warn};

/// In-page anchors, in page order.
pub const NAV_SECTIONS: [(&str, &str); 6] = [
	("top", "Overview"),
	("framework", "Framework"),
	("explorer", "Network"),
	("findings", "Findings"),
	("sectors", "Sectors"),
	("methodology", "Methodology"),
];

/// Scroll distance after which the bar gets its solid background.
const SCROLLED_AFTER: f64 = 50.0;
/// A section becomes current once its top edge rises above this line.
const ACTIVE_LINE: f64 = 120.0;

/// Last section, in page order, whose top edge is at or above `line`.
pub fn active_section<'a>(
	tops: impl IntoIterator<Item = (&'a str, f64)>,
	line: f64,
) -> Option<&'a str> {
	tops.into_iter()
		.filter(|(_, top)| *top <= line)
		.map(|(id, _)| id)
		.last()
}

fn section_tops() -> Vec<(&'static str, f64)> {
	let Some(document) = web_sys::window().and_then(|w| w.document()) else {
		return Vec::new();
	};
	NAV_SECTIONS
		.iter()
		.filter_map(|(id, _)| {
			let el = document.get_element_by_id(id)?;
			Some((*id, el.get_bounding_client_rect().top()))
		})
		.collect()
}

/// Sticky report navigation with scroll tracking and a dark-mode switch.
#[component]
pub fn ReportNav() -> impl IntoView {
	let (active, set_active) = signal(None::<&'static str>);
	let (scrolled, set_scrolled) = signal(false);
	let (dark, set_dark) = signal(false);

	let handle = window_event_listener(leptos::ev::scroll, move |_| {
		let y = web_sys::window()
			.and_then(|w| w.scroll_y().ok())
			.unwrap_or_default();
		set_scrolled.set(y > SCROLLED_AFTER);
		let current = active_section(section_tops(), ACTIVE_LINE);
		if active.get_untracked() != current {
			debug!("active section: {}", current.unwrap_or("none"));
			set_active.set(current);
		}
	});
	on_cleanup(move || handle.remove());

	let toggle_dark = move |_| {
		let Some(root) = web_sys::window()
			.and_then(|w| w.document())
			.and_then(|d| d.document_element())
		else {
			return;
		};
		match root.class_list().toggle("dark") {
			Ok(on) => set_dark.set(on),
			Err(err) => warn!("could not toggle dark mode: {err:?}"),
		}
	};

	view! {
		<nav class="report-nav" class:report-nav--scrolled=move || scrolled.get()>
			<a class="report-nav__brand" href="#top">
				"AI Pathways"
			</a>
			<div class="report-nav__links">
				{NAV_SECTIONS
					.iter()
					.skip(1)
					.map(|&(id, label)| {
						let current = move || active.get() == Some(id);
						view! {
							<a
								href=format!("#{id}")
								class:active=current
								aria-current=move || current().then_some("location")
							>
								{label}
							</a>
						}
					})
					.collect_view()}
			</div>
			<button
				type="button"
				class="report-nav__theme"
				aria-label="Toggle dark mode"
				aria-pressed=move || dark.get().to_string()
				on:click=toggle_dark
			>
				{move || if dark.get() { "Light" } else { "Dark" }}
			</button>
		</nav>
	}
}

#[component]
pub fn ReportFooter() -> impl IntoView {
	view! {
		<footer class="report-footer">
			<span>"© 2026 Alex Farach. Research presented at workforcefutures.net"</span>
			<a href="https://github.com/farach/ai-labor-networks" target="_blank" rel="noopener noreferrer">
				"GitHub"
			</a>
			<a href="https://workforcefutures.net" target="_blank" rel="noopener noreferrer">
				"Workforce Futures"
			</a>
		</footer>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn nothing_is_active_above_the_first_anchor() {
		let tops = [("top", 300.0), ("framework", 900.0)];
		assert_eq!(active_section(tops, ACTIVE_LINE), None);
	}

	#[test]
	fn latest_section_past_the_line_is_active() {
		let tops = [
			("top", -1400.0),
			("framework", -600.0),
			("explorer", 80.0),
			("findings", 700.0),
		];
		assert_eq!(active_section(tops, ACTIVE_LINE), Some("explorer"));
		assert_eq!(active_section(tops, 0.0), Some("framework"));
	}

	#[test]
	fn anchors_are_unique() {
		for (i, (id, _)) in NAV_SECTIONS.iter().enumerate() {
			assert!(NAV_SECTIONS[i + 1..].iter().all(|(other, _)| other != id));
		}
	}
}
