use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use leptos::prelude::*;
use log::{debug, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{HtmlDivElement, MouseEvent, WheelEvent};

use super::filter::NodeFilter;
use super::render::{self, EdgeGlyph, NodeGlyph, Scene};
use super::state::{GraphSettings, NetworkGraphState, PointerRelease};
use crate::config::{AppConfig, ViewConfig};
use crate::data::{NetworkNode, QuadrantCode, SectorNetwork};

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

fn request_frame(frame: &FrameCallback, scheduled: &Cell<bool>) {
	if scheduled.get() {
		return;
	}
	let Some(window) = web_sys::window() else {
		warn!("no window; layout will not animate");
		return;
	};
	if let Some(ref cb) = *frame.borrow() {
		if window.request_animation_frame(cb.as_ref().unchecked_ref()).is_ok() {
			scheduled.set(true);
		}
	}
}

/// Run `on_resize` on every window resize until the current owner is cleaned up.
fn watch_resize(on_resize: impl Fn() + 'static) {
	let handle = window_event_listener(leptos::ev::resize, move |_| on_resize());
	on_cleanup(move || handle.remove());
}

/// Surface size for the container's current width.
fn measure(el: &HtmlDivElement, view: &ViewConfig) -> (f64, f64) {
	let width = match el.client_width() {
		w if w > 0 => w as f64,
		_ => view.default_width,
	};
	(width, view.height_for(width))
}

fn edge_view(edge: &EdgeGlyph) -> impl IntoView + use<> {
	view! {
		<line
			class="network-link"
			x1=format!("{:.2}", edge.x1)
			y1=format!("{:.2}", edge.y1)
			x2=format!("{:.2}", edge.x2)
			y2=format!("{:.2}", edge.y2)
			stroke=edge.color
			stroke-width=format!("{:.2}", edge.width)
			stroke-opacity=format!("{:.3}", edge.opacity)
		/>
	}
}

fn node_view(node: &NodeGlyph) -> impl IntoView + use<> {
	let label = node.label.clone().map(|text| {
		view! {
			<text
				class="node-label"
				dy=format!("{:.1}", node.r + 12.0)
				text-anchor="middle"
				pointer-events="none"
				opacity=format!("{:.3}", node.opacity)
			>
				{text}
			</text>
		}
	});
	view! {
		<g class="node-group" transform=format!("translate({:.2},{:.2})", node.x, node.y)>
			<circle
				r=format!("{:.2}", node.r)
				fill=node.fill
				stroke=node.stroke
				stroke-width=format!("{:.1}", node.stroke_width)
				opacity=format!("{:.3}", node.opacity)
				style="transition: opacity 300ms"
			/>
			{label}
		</g>
	}
}

/// SVG force-directed view of one sector network.
///
/// A new network rebuilds the layout from a fresh seed; filter changes only
/// restyle. Hover and click report the affected node to the host.
#[component]
pub fn NetworkGraph(
	#[prop(into)] network: Signal<Option<Arc<SectorNetwork>>>,
	#[prop(into)] quadrant: Signal<Option<QuadrantCode>>,
	#[prop(into)] search: Signal<String>,
	#[prop(optional, into)] on_hover: Option<Callback<Option<NetworkNode>>>,
	#[prop(optional, into)] on_select: Option<Callback<Option<NetworkNode>>>,
) -> impl IntoView {
	let config = use_context::<AppConfig>().unwrap_or_default();
	if !config.opacity.is_ordered() {
		warn!("filter opacity levels are not ordered; dimmed nodes may look brighter than matches");
	}
	let settings = GraphSettings {
		layout: config.layout.clone(),
		view: config.view.clone(),
		opacity: config.opacity.clone(),
	};
	let view_cfg = config.view.clone();
	let zoom_step = view_cfg.zoom_step;

	let container_ref = NodeRef::<leptos::html::Div>::new();
	let (scene, set_scene) = signal(Scene::default());
	let (size, set_size) = signal((view_cfg.default_width, view_cfg.default_height));

	let state: Rc<RefCell<Option<NetworkGraphState>>> = Rc::new(RefCell::new(None));
	let frame: FrameCallback = Rc::new(RefCell::new(None));
	let scheduled = Rc::new(Cell::new(false));
	let alive = Arc::new(AtomicBool::new(true));

	let alive_cleanup = alive.clone();
	on_cleanup(move || alive_cleanup.store(false, Ordering::Relaxed));

	// One animation loop per component; it stops itself once the layout freezes.
	let (state_anim, frame_inner, scheduled_anim) = (state.clone(), frame.clone(), scheduled.clone());
	*frame.borrow_mut() = Some(Closure::new(move || {
		scheduled_anim.set(false);
		if !alive.load(Ordering::Relaxed) {
			return;
		}
		let mut running = false;
		if let Some(ref mut s) = *state_anim.borrow_mut() {
			running = s.advance();
			set_scene.set(render::build_scene(s));
			if !running {
				info!(
					"layout for {} settled after {} ticks",
					s.network.sector,
					s.sim.ticks()
				);
			}
		}
		if running {
			request_frame(&frame_inner, &scheduled_anim);
		}
	}));

	let (state_init, frame_init, scheduled_init) = (state.clone(), frame.clone(), scheduled.clone());
	let view_init = view_cfg.clone();
	Effect::new(move |_| {
		let Some(network) = network.get() else {
			*state_init.borrow_mut() = None;
			set_scene.set(Scene::default());
			return;
		};
		let Some(el) = container_ref.get() else {
			return;
		};
		let (w, h) = measure(&el, &view_init);
		set_size.set((w, h));

		let seed = (js_sys::Math::random() * u32::MAX as f64) as u64;
		debug!(
			"building layout for {} ({} nodes, seed {seed})",
			network.sector,
			network.nodes.len()
		);
		let mut next = NetworkGraphState::new(network, w, h, seed, settings.clone());
		next.set_filter(NodeFilter::new(
			quadrant.get_untracked(),
			&search.get_untracked(),
		));
		set_scene.set(render::build_scene(&next));
		let animate = next.is_animating();
		*state_init.borrow_mut() = Some(next);
		if animate {
			request_frame(&frame_init, &scheduled_init);
		}
	});

	let state_filter = state.clone();
	Effect::new(move |_| {
		let filter = NodeFilter::new(quadrant.get(), &search.get());
		if let Some(ref mut s) = *state_filter.borrow_mut() {
			if s.set_filter(filter) {
				set_scene.set(render::build_scene(s));
			}
		}
	});

	let state_resize = state.clone();
	Effect::new(move |_| {
		let Some(el) = container_ref.get() else {
			return;
		};
		let (state_resize, view) = (state_resize.clone(), view_cfg.clone());
		watch_resize(move || {
			let (w, h) = measure(&el, &view);
			set_size.set((w, h));
			if let Some(ref mut s) = *state_resize.borrow_mut() {
				s.resize(w, h);
				set_scene.set(render::build_scene(s));
			}
		});
	});

	let local_point = move |ev: &MouseEvent| {
		let el = container_ref.get_untracked()?;
		let rect = el.get_bounding_client_rect();
		Some((
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		))
	};

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(&ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.pointer_down(x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(&ev) else {
			return;
		};
		let mut hovered = None;
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			let before = s.hover.node;
			if s.pointer_move(x, y) {
				set_scene.set(render::build_scene(s));
			}
			if s.hover.node != before {
				hovered = Some(s.hover.node.and_then(|i| s.node(i).cloned()));
			}
		}
		if let (Some(cb), Some(node)) = (on_hover, hovered) {
			cb.run(node);
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		let mut selected = None;
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			match s.pointer_up() {
				PointerRelease::Clicked(idx) => {
					selected = Some(idx.and_then(|i| s.node(i).cloned()));
					set_scene.set(render::build_scene(s));
				}
				PointerRelease::Dropped(idx) => debug!("node {idx} pinned by drag"),
				PointerRelease::Nothing => {}
			}
		}
		if let (Some(cb), Some(node)) = (on_select, selected) {
			cb.run(node);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		let mut cleared = false;
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			cleared = s.pointer_leave();
			set_scene.set(render::build_scene(s));
		}
		if let (Some(cb), true) = (on_hover, cleared) {
			cb.run(None);
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_point(&ev) else {
			return;
		};
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 {
				1.0 / zoom_step
			} else {
				zoom_step
			};
			s.zoom_at(x, y, factor);
			set_scene.set(render::build_scene(s));
		}
	};

	let view_action = {
		let state = state.clone();
		move |action: fn(&mut NetworkGraphState)| {
			if let Some(ref mut s) = *state.borrow_mut() {
				action(s);
				set_scene.set(render::build_scene(s));
			}
		}
	};
	let zoom_in = {
		let view_action = view_action.clone();
		move |_| view_action(|s| s.zoom_by(s.settings.view.zoom_step))
	};
	let zoom_out = {
		let view_action = view_action.clone();
		move |_| view_action(|s| s.zoom_by(1.0 / s.settings.view.zoom_step))
	};
	let fit = move |_| view_action(NetworkGraphState::fit_to_view);

	view! {
		<div
			node_ref=container_ref
			class="network-container"
			style="position: relative; width: 100%; cursor: grab;"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
		>
			<svg
				class="network-graph"
				width=move || format!("{:.0}", size.get().0)
				height=move || format!("{:.0}", size.get().1)
				role="img"
				aria-label=move || {
					network
						.with(|n| n.as_ref().map(|n| n.nodes.len()).unwrap_or(0))
						.to_string() + " roles in the career network"
				}
			>
				<g class="zoom-container" transform=move || scene.with(|s| s.transform.svg_attr())>
					<g class="links">
						{move || scene.with(|s| s.edges.iter().map(edge_view).collect_view())}
					</g>
					<g class="nodes">
						{move || scene.with(|s| s.nodes.iter().map(node_view).collect_view())}
					</g>
				</g>
			</svg>
			<div class="graph-controls">
				<button type="button" title="Zoom in" aria-label="Zoom in" on:click=zoom_in>
					"+"
				</button>
				<button type="button" title="Zoom out" aria-label="Zoom out" on:click=zoom_out>
					"−"
				</button>
				<button type="button" title="Fit to view" aria-label="Fit to view" on:click=fit>
					"⤢"
				</button>
			</div>
		</div>
	}
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
	use wasm_bindgen_test::*;

	use super::*;

	wasm_bindgen_test_configure!(run_in_browser);

	fn fire_resize() {
		let window = web_sys::window().expect("browser window");
		let event = web_sys::Event::new("resize").expect("resize event");
		window.dispatch_event(&event).expect("dispatch");
	}

	#[wasm_bindgen_test]
	fn resize_listener_is_removed_with_its_owner() {
		let calls = Rc::new(Cell::new(0));
		let owner = Owner::new();
		let seen = calls.clone();
		owner.with(|| watch_resize(move || seen.set(seen.get() + 1)));

		fire_resize();
		assert_eq!(calls.get(), 1);

		owner.cleanup();
		fire_resize();
		assert_eq!(calls.get(), 1);
	}
}
