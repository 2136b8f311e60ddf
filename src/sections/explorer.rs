use std::collections::HashMap;
use std::sync::Arc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, info, warn};

use crate::components::force_graph::NetworkGraph;
use crate::components::quadrant_legend::QuadrantLegend;
use crate::components::stat_card::StatCard;
use crate::config::AppConfig;
use crate::data::{
	DataClient, NetworkNode, QuadrantCode, Role, SectorNetwork, SectorRequests, SectorSummary,
};
use crate::format::{format_number, format_percent};

/// Roles by id, with the SOC code as a second key for nodes whose id differs.
#[derive(Clone, Debug, Default)]
pub struct RoleIndex {
	by_id: HashMap<String, Role>,
	by_soc: HashMap<String, String>,
}

impl RoleIndex {
	pub fn new(roles: Vec<Role>) -> Self {
		let mut index = Self::default();
		for role in roles {
			index
				.by_soc
				.entry(role.soc.clone())
				.or_insert_with(|| role.id.clone());
			index.by_id.insert(role.id.clone(), role);
		}
		index
	}

	pub fn lookup(&self, node: &NetworkNode) -> Option<&Role> {
		self.by_id.get(&node.id).or_else(|| {
			self.by_soc
				.get(&node.soc)
				.and_then(|id| self.by_id.get(id))
		})
	}
}

#[derive(Clone, Debug)]
enum RoleLookup {
	Loading,
	Ready(Arc<RoleIndex>),
	Failed(String),
}

fn detail_row(label: &'static str, value: String) -> impl IntoView + use<> {
	view! {
		<div class="node-detail__row">
			<dt>{label}</dt>
			<dd>{value}</dd>
		</div>
	}
}

fn node_detail(node: NetworkNode, roles: RoleLookup, pinned: bool) -> impl IntoView + use<> {
	let quadrant = node.quadrant;
	let exposure = match &roles {
		RoleLookup::Ready(index) => match index.lookup(&node) {
			Some(role) => view! {
				{detail_row("AI exposure (Eloundou)", format_percent(role.ai_exposure_eloundou))}
				{detail_row("AI exposure (Microsoft)", format_percent(role.ai_exposure_microsoft))}
			}
			.into_any(),
			None => detail_row("AI exposure", format_percent(node.ai_exposure)).into_any(),
		},
		RoleLookup::Loading => detail_row("AI exposure", format_percent(node.ai_exposure)).into_any(),
		RoleLookup::Failed(reason) => view! {
			{detail_row("AI exposure", format_percent(node.ai_exposure))}
			<p class="muted" title=reason.clone()>"Per-source exposure unavailable."</p>
		}
		.into_any(),
	};
	let betweenness = node
		.betweenness
		.map(|b| detail_row("Betweenness", format!("{b:.4}")));

	view! {
		<aside class=if pinned { "node-detail node-detail--pinned" } else { "node-detail" }>
			<h4>{node.label.clone()}</h4>
			<span
				class="quadrant-badge"
				style=format!("background-color: {}", quadrant.color())
				title=quadrant.description()
			>
				{quadrant.label()}
			</span>
			<dl>
				{detail_row("SOC", node.soc.clone())}
				{detail_row("PTR", format!("{:.3}", node.ptr))}
				{detail_row("NFC", format!("{:.3}", node.nfc))}
				{exposure}
				{betweenness}
			</dl>
		</aside>
	}
}

/// Sector picker, filters and the interactive network for one sector.
#[component]
pub fn NetworkExplorer(client: DataClient) -> impl IntoView {
	let config = use_context::<AppConfig>().unwrap_or_default();

	let (sectors, set_sectors) = signal(Vec::<SectorSummary>::new());
	let (sectors_error, set_sectors_error) = signal(None::<String>);
	let (sector, set_sector) = signal(String::new());
	let (network, set_network) = signal(None::<Arc<SectorNetwork>>);
	let (loading, set_loading) = signal(false);
	let (network_error, set_network_error) = signal(None::<String>);
	let (quadrant, set_quadrant) = signal(None::<QuadrantCode>);
	let (search, set_search) = signal(String::new());
	let (hovered, set_hovered) = signal(None::<NetworkNode>);
	let (selected, set_selected) = signal(None::<NetworkNode>);
	let (roles, set_roles) = signal(RoleLookup::Loading);

	let requests = SectorRequests::default();
	let switch_sector = {
		let client = client.clone();
		move |name: String| {
			info!("switching to sector {name}");
			set_sector.set(name.clone());
			set_hovered.set(None);
			set_selected.set(None);
			set_network_error.set(None);
			set_loading.set(!client.is_cached(&name));

			let (client, requests) = (client.clone(), requests.clone());
			spawn_local(async move {
				let Some(result) = requests.load(&client, &name).await else {
					return;
				};
				set_loading.set(false);
				match result {
					Ok(loaded) => set_network.set(Some(loaded)),
					Err(err) => {
						warn!("network for {name} unavailable: {err}");
						set_network.set(None);
						set_network_error.set(Some(err.to_string()));
					}
				}
			});
		}
	};

	// Sector list first, then the first sector, then warm the cache behind it.
	{
		let client = client.clone();
		let switch_sector = switch_sector.clone();
		let preload_count = config.preload_count;
		spawn_local(async move {
			match client.sectors().await {
				Ok(list) => {
					let names: Vec<String> = list.iter().map(|s| s.sector.clone()).collect();
					set_sectors.set(list);
					let Some(first) = names.first() else {
						warn!("sector list is empty");
						return;
					};
					switch_sector(first.clone());
					// The first sector is already on its way through `switch_sector`.
					let preload: Vec<String> = names.into_iter().take(preload_count).skip(1).collect();
					debug!("preloading {} sectors", preload.len());
					client.preload(&preload).await;
				}
				Err(err) => {
					warn!("sector list unavailable: {err}");
					set_sectors_error.set(Some(err.to_string()));
				}
			}
		});
	}

	spawn_local(async move {
		match client.roles().await {
			Ok(list) => set_roles.set(RoleLookup::Ready(Arc::new(RoleIndex::new(list)))),
			Err(err) => {
				warn!("role list unavailable: {err}");
				set_roles.set(RoleLookup::Failed(err.to_string()));
			}
		}
	});

	let on_sector_change = move |ev: leptos::ev::Event| switch_sector(event_target_value(&ev));
	let on_hover = Callback::new(move |node| set_hovered.set(node));
	let on_select = Callback::new(move |node| set_selected.set(node));
	let on_quadrant = Callback::new(move |q| set_quadrant.set(q));

	let summary = move || {
		network.get().map(|n| {
			let roles = n.nodes.len().to_string();
			let hh = n.quadrant_count(QuadrantCode::HH).to_string();
			let ptr = n.mean_ptr().map_or_else(|| "n/a".to_string(), |v| format!("{v:.3}"));
			let nfc = n.mean_nfc().map_or_else(|| "n/a".to_string(), |v| format!("{v:.3}"));
			let mut meta = format!(
				"{} roles · {} connections",
				format_number(n.nodes.len() as u64),
				format_number(n.edges.len() as u64),
			);
			if !n.metadata.generated_at.is_empty() {
				meta.push_str(&format!(" · generated {}", n.metadata.generated_at));
			}
			view! {
				<div class="explorer__summary">
					<StatCard label="Roles" value=roles />
					<StatCard label="HH roles" value=hh accent="hh" />
					<StatCard label="Mean PTR" value=ptr />
					<StatCard label="Mean NFC" value=nfc />
				</div>
				<p class="explorer__meta">{meta}</p>
			}
		})
	};

	let detail = move || {
		let (node, pinned) = match (hovered.get(), selected.get()) {
			(Some(node), _) => (node, false),
			(None, Some(node)) => (node, true),
			(None, None) => return None,
		};
		Some(node_detail(node, roles.get(), pinned))
	};

	view! {
		<section id="explorer" class="section">
			<h2>"Explore the Network"</h2>
			<p class="section__lead">
				"Each circle is a role; lines are observed career transitions. Drag to rearrange, "
				"scroll to zoom, and click a role to keep its details open."
			</p>

			<div class="explorer__controls">
				<label class="explorer__sector">
					"Sector "
					<select prop:value=move || sector.get() on:change=on_sector_change>
						{move || {
							sectors
								.get()
								.into_iter()
								.map(|s| {
									let name = s.sector.clone();
									view! {
										<option value=name.clone()>
											{format!("{} ({} roles)", name, format_number(s.total_roles.into()))}
										</option>
									}
								})
								.collect_view()
						}}
					</select>
				</label>
				<input
					type="search"
					class="explorer__search"
					placeholder="Search roles or SOC codes..."
					prop:value=move || search.get()
					on:input=move |ev| set_search.set(event_target_value(&ev))
				/>
				<QuadrantLegend selected=quadrant on_select=on_quadrant />
			</div>

			{move || {
				sectors_error
					.get()
					.map(|err| {
						view! { <p class="error">{format!("Failed to load sectors: {err}")}</p> }
					})
			}}

			<div class="explorer__body">
				<div class="explorer__graph">
					<Show when=move || loading.get()>
						<div class="explorer__loading">"Loading network..."</div>
					</Show>
					{move || {
						network_error
							.get()
							.map(|err| {
								view! {
									<p class="error">
										{format!("Failed to load network data for {}: {err}", sector.get())}
									</p>
								}
							})
					}}
					<NetworkGraph
						network=network
						quadrant=quadrant
						search=search
						on_hover=on_hover
						on_select=on_select
					/>
				</div>
				{detail}
			</div>

			{summary}
		</section>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn role(id: &str, soc: &str) -> Role {
		Role {
			id: id.to_string(),
			title: format!("Role {id}"),
			sector: "Healthcare".to_string(),
			soc: soc.to_string(),
			ptr: 0.7,
			nfc: 0.6,
			quadrant_code: QuadrantCode::HH,
			ai_exposure_eloundou: 0.3,
			ai_exposure_microsoft: 0.5,
			betweenness: 0.01,
		}
	}

	fn node(id: &str, soc: &str) -> NetworkNode {
		NetworkNode {
			id: id.to_string(),
			label: format!("Node {id}"),
			soc: soc.to_string(),
			ptr: 0.7,
			nfc: 0.6,
			quadrant: QuadrantCode::HH,
			size: 10.0,
			ai_exposure: 0.4,
			betweenness: None,
		}
	}

	#[test]
	fn lookup_prefers_id_then_soc() {
		let index = RoleIndex::new(vec![role("r1", "29-1141"), role("r2", "11-9111")]);
		assert_eq!(index.lookup(&node("r2", "29-1141")).map(|r| r.id.as_str()), Some("r2"));
		assert_eq!(index.lookup(&node("other", "29-1141")).map(|r| r.id.as_str()), Some("r1"));
		assert!(index.lookup(&node("other", "00-0000")).is_none());
	}

	#[test]
	fn first_role_wins_a_shared_soc() {
		let index = RoleIndex::new(vec![role("a", "43-4051"), role("b", "43-4051")]);
		assert_eq!(index.lookup(&node("x", "43-4051")).map(|r| r.id.as_str()), Some("a"));
		assert!(RoleIndex::default().lookup(&node("a", "43-4051")).is_none());
	}
}
