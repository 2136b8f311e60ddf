use std::cmp::Ordering;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::warn;

use crate::data::{DataClient, SectorSummary};
use crate::format::{format_number, format_percent};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortKey {
	Sector,
	TotalRoles,
	HhShare,
	AvgPtr,
	AvgNfc,
	AvgAiExposure,
}

impl SortKey {
	pub const COLUMNS: [SortKey; 6] = [
		Self::Sector,
		Self::TotalRoles,
		Self::HhShare,
		Self::AvgPtr,
		Self::AvgNfc,
		Self::AvgAiExposure,
	];

	pub fn label(self) -> &'static str {
		match self {
			Self::Sector => "Sector",
			Self::TotalRoles => "Roles",
			Self::HhShare => "HH Share",
			Self::AvgPtr => "Avg PTR",
			Self::AvgNfc => "Avg NFC",
			Self::AvgAiExposure => "AI Exposure",
		}
	}

	fn compare(self, a: &SectorSummary, b: &SectorSummary) -> Ordering {
		match self {
			Self::Sector => a.sector.to_lowercase().cmp(&b.sector.to_lowercase()),
			Self::TotalRoles => a.total_roles.cmp(&b.total_roles),
			Self::HhShare => a.hh_share.total_cmp(&b.hh_share),
			Self::AvgPtr => a.avg_ptr.total_cmp(&b.avg_ptr),
			Self::AvgNfc => a.avg_nfc.total_cmp(&b.avg_nfc),
			Self::AvgAiExposure => a.avg_ai_exposure.total_cmp(&b.avg_ai_exposure),
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
	Asc,
	Desc,
}

/// Table ordering; most HH-heavy sectors first by default.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SectorOrder {
	pub key: SortKey,
	pub direction: SortDirection,
}

impl Default for SectorOrder {
	fn default() -> Self {
		Self {
			key: SortKey::HhShare,
			direction: SortDirection::Desc,
		}
	}
}

impl SectorOrder {
	/// Header click: the active column flips, a new column starts descending.
	pub fn toggled(self, key: SortKey) -> Self {
		if self.key == key {
			let direction = match self.direction {
				SortDirection::Asc => SortDirection::Desc,
				SortDirection::Desc => SortDirection::Asc,
			};
			Self { key, direction }
		} else {
			Self {
				key,
				direction: SortDirection::Desc,
			}
		}
	}

	pub fn sort(self, rows: &mut [SectorSummary]) {
		rows.sort_by(|a, b| {
			let ord = self.key.compare(a, b);
			match self.direction {
				SortDirection::Asc => ord,
				SortDirection::Desc => ord.reverse(),
			}
		});
	}
}

/// Sortable table of every sector, with the three most exposed highlighted.
#[component]
pub fn SectorDeepDive(client: DataClient) -> impl IntoView {
	let (sectors, set_sectors) = signal(Vec::<SectorSummary>::new());
	let (error, set_error) = signal(None::<String>);
	let (loading, set_loading) = signal(true);
	let (order, set_order) = signal(SectorOrder::default());
	let (expanded, set_expanded) = signal(None::<String>);

	spawn_local(async move {
		match client.sectors().await {
			Ok(rows) => set_sectors.set(rows),
			Err(err) => {
				warn!("sector table unavailable: {err}");
				set_error.set(Some(err.to_string()));
			}
		}
		set_loading.set(false);
	});

	let sorted = Memo::new(move |_| {
		let mut rows = sectors.get();
		order.get().sort(&mut rows);
		rows
	});
	let max_hh_share = Memo::new(move |_| {
		sectors.with(|rows| rows.iter().map(|s| s.hh_share).fold(0.0_f64, f64::max))
	});

	let header = move |key: SortKey| {
		view! {
			<th>
				<button
					type="button"
					class="sort-button"
					class:active=move || order.get().key == key
					on:click=move |_| set_order.update(|o| *o = o.toggled(key))
				>
					{key.label()}
					<span class="sort-indicator">
						{move || {
							let o = order.get();
							match (o.key == key, o.direction) {
								(false, _) => "↕",
								(true, SortDirection::Asc) => "↑",
								(true, SortDirection::Desc) => "↓",
							}
						}}
					</span>
				</button>
			</th>
		}
	};

	let row = move |sector: SectorSummary| {
		let name = sector.sector.clone();
		let is_open = {
			let name = name.clone();
			move || expanded.get().as_deref() == Some(name.as_str())
		};
		let toggle = {
			let name = name.clone();
			move |_| {
				set_expanded.update(|open| {
					*open = if open.as_deref() == Some(name.as_str()) {
						None
					} else {
						Some(name.clone())
					};
				})
			}
		};
		let bar = format!(
			"width: {:.1}%",
			100.0 * sector.hh_share / max_hh_share.get_untracked().max(f64::EPSILON)
		);
		let details = sector.clone();
		view! {
			<tr class="sector-row" on:click=toggle>
				<td>{name}</td>
				<td>{format_number(sector.total_roles.into())}</td>
				<td>
					<div class="share-bar"><div class="share-bar__fill" style=bar></div></div>
					{format_percent(sector.hh_share)}
				</td>
				<td>{format_percent(sector.avg_ptr)}</td>
				<td>{format_percent(sector.avg_nfc)}</td>
				<td>{format_percent(sector.avg_ai_exposure)}</td>
			</tr>
			<Show when=is_open>
				<tr class="sector-row__details">
					<td colspan="6">
						<span>"Roles with indices: " {format_number(details.roles_with_indices.into())}</span>
						<span>"HH roles: " {format_number(details.hh_count.into())}</span>
						<span>"High PTR: " {format_number(details.high_ptr_count.into())}</span>
						<span>"High NFC: " {format_number(details.high_nfc_count.into())}</span>
					</td>
				</tr>
			</Show>
		}
	};

	view! {
		<section id="sectors" class="section">
			<h2>"Sector Deep Dive"</h2>
			<p class="section__lead">
				"The table below is sorted by HH share by default, highlighting the sectors with the "
				"largest concentration of roles facing both high transition risk and high network constraint."
			</p>

			<div class="highlight-cards">
				{move || {
					sectors
						.get()
						.into_iter()
						.take(3)
						.enumerate()
						.map(|(i, s)| {
							view! {
								<div class=format!("highlight-card highlight-card--rank{}", i + 1)>
									<div class="highlight-card__rank">{format!("#{}", i + 1)}</div>
									<h3>{s.sector.clone()}</h3>
									<div class="highlight-card__share">{format_percent(s.hh_share)}</div>
									<div class="highlight-card__roles">
										{format!("{} roles", format_number(s.total_roles.into()))}
									</div>
								</div>
							}
						})
						.collect_view()
				}}
			</div>

			<table class="sector-table">
				<thead>
					<tr>{SortKey::COLUMNS.map(header).into_iter().collect_view()}</tr>
				</thead>
				<tbody>
					{move || {
						if loading.get() {
							view! { <tr><td colspan="6">"Loading sectors..."</td></tr> }.into_any()
						} else if let Some(err) = error.get() {
							view! {
								<tr><td colspan="6" class="error">{format!("Failed to load sector data: {err}")}</td></tr>
							}
								.into_any()
						} else {
							sorted.get().into_iter().map(row).collect_view().into_any()
						}
					}}
				</tbody>
			</table>
		</section>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn summary(sector: &str, total_roles: u32, hh_share: f64, avg_ptr: f64) -> SectorSummary {
		SectorSummary {
			sector: sector.to_string(),
			total_roles,
			roles_with_indices: total_roles,
			avg_ptr,
			avg_nfc: 0.5,
			avg_ai_exposure: 0.4,
			hh_count: (total_roles as f64 * hh_share) as u32,
			hh_share,
			high_ptr_count: 0,
			high_nfc_count: 0,
		}
	}

	fn rows() -> Vec<SectorSummary> {
		vec![
			summary("retail", 900, 0.30, 0.55),
			summary("Finance", 1200, 0.52, 0.61),
			summary("Mining", 150, 0.12, 0.35),
		]
	}

	fn names(rows: &[SectorSummary]) -> Vec<&str> {
		rows.iter().map(|r| r.sector.as_str()).collect()
	}

	#[test]
	fn default_is_hh_share_descending() {
		let mut rows = rows();
		SectorOrder::default().sort(&mut rows);
		assert_eq!(names(&rows), ["Finance", "retail", "Mining"]);
	}

	#[test]
	fn clicking_active_column_flips_direction() {
		let order = SectorOrder::default().toggled(SortKey::HhShare);
		assert_eq!(order.direction, SortDirection::Asc);
		let mut rows = rows();
		order.sort(&mut rows);
		assert_eq!(names(&rows), ["Mining", "retail", "Finance"]);
		assert_eq!(order.toggled(SortKey::HhShare), SectorOrder::default());
	}

	#[test]
	fn new_column_starts_descending() {
		let order = SectorOrder::default()
			.toggled(SortKey::HhShare)
			.toggled(SortKey::TotalRoles);
		assert_eq!(
			order,
			SectorOrder {
				key: SortKey::TotalRoles,
				direction: SortDirection::Desc
			}
		);
		let mut rows = rows();
		order.sort(&mut rows);
		assert_eq!(names(&rows), ["Finance", "retail", "Mining"]);
	}

	#[test]
	fn sector_names_sort_case_insensitively() {
		let order = SectorOrder {
			key: SortKey::Sector,
			direction: SortDirection::Asc,
		};
		let mut rows = rows();
		order.sort(&mut rows);
		assert_eq!(names(&rows), ["Finance", "Mining", "retail"]);
	}
}
