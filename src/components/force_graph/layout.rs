//! Force-directed layout over an index arena of bodies.
//!
//! Four forces act each tick: link springs, pairwise charge, centring and
//! collision. Alpha decays geometrically; once it falls below the configured
//! minimum (or the tick budget runs out) every body is pinned where it stands
//! and the simulation stops for good.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::LayoutConfig;
use crate::data::ResolvedEdge;

/// Squared distance below which charge stops growing.
const CHARGE_DISTANCE_MIN2: f64 = 1.0;
/// Passes of the final overlap cleanup before freezing.
const SEPARATION_PASSES: usize = 64;

/// Position and velocity of one node. `fx`/`fy` pin it in place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Body {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub fx: Option<f64>,
	pub fy: Option<f64>,
	/// Collision radius: node size plus margin.
	pub radius: f64,
}

impl Body {
	pub fn is_pinned(&self) -> bool {
		self.fx.is_some() && self.fy.is_some()
	}
}

#[derive(Clone, Debug)]
struct Link {
	source: usize,
	target: usize,
	strength: f64,
	/// Share of the correction applied to the target.
	bias: f64,
}

pub struct Simulation {
	bodies: Vec<Body>,
	links: Vec<Link>,
	params: LayoutConfig,
	center: (f64, f64),
	alpha: f64,
	alpha_decay: f64,
	ticks: usize,
	frozen: bool,
	rng: SmallRng,
}

impl Simulation {
	/// Bodies start jittered around `center`. `radii` are visual node sizes.
	pub fn new(
		radii: &[f64],
		edges: &[ResolvedEdge],
		center: (f64, f64),
		params: LayoutConfig,
		seed: u64,
	) -> Self {
		let mut rng = SmallRng::seed_from_u64(seed);
		let jitter = params.initial_jitter;
		let bodies: Vec<Body> = radii
			.iter()
			.map(|&r| Body {
				x: center.0 + (rng.r#gen::<f64>() - 0.5) * jitter,
				y: center.1 + (rng.r#gen::<f64>() - 0.5) * jitter,
				radius: r + params.collision_margin,
				..Body::default()
			})
			.collect();

		let n = bodies.len();
		let usable: Vec<&ResolvedEdge> = edges
			.iter()
			.filter(|e| e.source < n && e.target < n && e.source != e.target)
			.collect();

		let mut degree = vec![0usize; n];
		for edge in &usable {
			degree[edge.source] += 1;
			degree[edge.target] += 1;
		}
		let links = usable
			.iter()
			.map(|edge| {
				let (ds, dt) = (degree[edge.source] as f64, degree[edge.target] as f64);
				Link {
					source: edge.source,
					target: edge.target,
					strength: params.link_strength / ds.min(dt),
					bias: ds / (ds + dt),
				}
			})
			.collect();

		Self {
			bodies,
			links,
			alpha_decay: params.alpha_decay(),
			params,
			center,
			alpha: 1.0,
			ticks: 0,
			frozen: false,
			rng,
		}
	}

	pub fn bodies(&self) -> &[Body] {
		&self.bodies
	}

	pub fn body(&self, index: usize) -> Option<&Body> {
		self.bodies.get(index)
	}

	#[cfg(test)]
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn ticks(&self) -> usize {
		self.ticks
	}

	pub fn is_frozen(&self) -> bool {
		self.frozen
	}

	pub fn set_center(&mut self, x: f64, y: f64) {
		self.center = (x, y);
	}

	/// Pin a body at `(x, y)`. Other bodies keep relaxing around it.
	pub fn pin(&mut self, index: usize, x: f64, y: f64) {
		if let Some(body) = self.bodies.get_mut(index) {
			body.x = x;
			body.y = y;
			body.vx = 0.0;
			body.vy = 0.0;
			body.fx = Some(x);
			body.fy = Some(y);
		}
	}

	/// Advance one step. Returns `false` once the layout is frozen.
	pub fn tick(&mut self) -> bool {
		if self.frozen {
			return false;
		}

		self.alpha += (0.0 - self.alpha) * self.alpha_decay;
		self.apply_links();
		self.apply_charge();
		self.apply_center();
		self.apply_collision();

		let retain = 1.0 - self.params.velocity_decay;
		for body in &mut self.bodies {
			match body.fx {
				Some(fx) => {
					body.x = fx;
					body.vx = 0.0;
				}
				None => {
					body.vx *= retain;
					body.x += body.vx;
				}
			}
			match body.fy {
				Some(fy) => {
					body.y = fy;
					body.vy = 0.0;
				}
				None => {
					body.vy *= retain;
					body.y += body.vy;
				}
			}
		}

		self.ticks += 1;
		if self.alpha < self.params.alpha_min || self.ticks >= self.params.max_ticks {
			self.freeze();
		}
		!self.frozen
	}

	/// Tick until frozen; returns the number of ticks taken.
	#[cfg(test)]
	pub fn run_to_rest(&mut self) -> usize {
		while self.tick() {}
		self.ticks
	}

	fn jiggle(rng: &mut SmallRng) -> f64 {
		(rng.r#gen::<f64>() - 0.5) * 1e-6
	}

	fn apply_links(&mut self) {
		let Self {
			bodies,
			links,
			params,
			alpha,
			rng,
			..
		} = self;
		for link in links.iter() {
			let (s, t) = (&bodies[link.source], &bodies[link.target]);
			let mut dx = t.x + t.vx - s.x - s.vx;
			let mut dy = t.y + t.vy - s.y - s.vy;
			if dx == 0.0 {
				dx = Self::jiggle(rng);
			}
			if dy == 0.0 {
				dy = Self::jiggle(rng);
			}
			let len = (dx * dx + dy * dy).sqrt();
			let k = (len - params.link_distance) / len * *alpha * link.strength;
			dx *= k;
			dy *= k;

			let target = &mut bodies[link.target];
			target.vx -= dx * link.bias;
			target.vy -= dy * link.bias;
			let source = &mut bodies[link.source];
			source.vx += dx * (1.0 - link.bias);
			source.vy += dy * (1.0 - link.bias);
		}
	}

	fn apply_charge(&mut self) {
		let strength = self.params.charge * self.alpha;
		let n = self.bodies.len();
		for i in 0..n {
			for j in (i + 1)..n {
				let mut dx = self.bodies[j].x - self.bodies[i].x;
				let mut dy = self.bodies[j].y - self.bodies[i].y;
				let mut l2 = dx * dx + dy * dy;
				if dx == 0.0 {
					dx = Self::jiggle(&mut self.rng);
					l2 += dx * dx;
				}
				if dy == 0.0 {
					dy = Self::jiggle(&mut self.rng);
					l2 += dy * dy;
				}
				if l2 < CHARGE_DISTANCE_MIN2 {
					l2 = (CHARGE_DISTANCE_MIN2 * l2).sqrt();
				}
				let w = strength / l2;
				self.bodies[i].vx += dx * w;
				self.bodies[i].vy += dy * w;
				self.bodies[j].vx -= dx * w;
				self.bodies[j].vy -= dy * w;
			}
		}
	}

	fn apply_center(&mut self) {
		let n = self.bodies.len();
		if n == 0 {
			return;
		}
		let (sx, sy) = self
			.bodies
			.iter()
			.fold((0.0, 0.0), |(sx, sy), b| (sx + b.x, sy + b.y));
		let dx = sx / n as f64 - self.center.0;
		let dy = sy / n as f64 - self.center.1;
		for body in &mut self.bodies {
			body.x -= dx;
			body.y -= dy;
		}
	}

	fn apply_collision(&mut self) {
		let n = self.bodies.len();
		for i in 0..n {
			let (xi, yi) = (
				self.bodies[i].x + self.bodies[i].vx,
				self.bodies[i].y + self.bodies[i].vy,
			);
			let ri = self.bodies[i].radius;
			for j in (i + 1)..n {
				let rj = self.bodies[j].radius;
				let r = ri + rj;
				let mut dx = xi - self.bodies[j].x - self.bodies[j].vx;
				let mut dy = yi - self.bodies[j].y - self.bodies[j].vy;
				let mut l2 = dx * dx + dy * dy;
				if l2 >= r * r {
					continue;
				}
				if dx == 0.0 {
					dx = Self::jiggle(&mut self.rng);
					l2 += dx * dx;
				}
				if dy == 0.0 {
					dy = Self::jiggle(&mut self.rng);
					l2 += dy * dy;
				}
				let len = l2.sqrt();
				let k = (r - len) / len;
				dx *= k;
				dy *= k;
				let ratio = (rj * rj) / (ri * ri + rj * rj);
				self.bodies[i].vx += dx * ratio;
				self.bodies[i].vy += dy * ratio;
				self.bodies[j].vx -= dx * (1.0 - ratio);
				self.bodies[j].vy -= dy * (1.0 - ratio);
			}
		}
	}

	/// Push overlapping pairs apart until none remain. Pinned bodies hold still.
	fn separate_overlaps(&mut self) {
		let n = self.bodies.len();
		for _ in 0..SEPARATION_PASSES {
			let mut moved = false;
			for i in 0..n {
				for j in (i + 1)..n {
					let (a, b) = (&self.bodies[i], &self.bodies[j]);
					let wa = if a.is_pinned() { 0.0 } else { 1.0 };
					let wb = if b.is_pinned() { 0.0 } else { 1.0 };
					if wa + wb == 0.0 {
						continue;
					}
					let r = a.radius + b.radius;
					let mut dx = b.x - a.x;
					let mut dy = b.y - a.y;
					let mut len = (dx * dx + dy * dy).sqrt();
					if len >= r {
						continue;
					}
					if len < 1e-9 {
						let angle = self.rng.r#gen::<f64>() * std::f64::consts::TAU;
						(dx, dy, len) = (angle.cos(), angle.sin(), 1.0);
					}
					let push = (r - len) / (wa + wb);
					let (ux, uy) = (dx / len, dy / len);
					self.bodies[i].x -= ux * push * wa;
					self.bodies[i].y -= uy * push * wa;
					self.bodies[j].x += ux * push * wb;
					self.bodies[j].y += uy * push * wb;
					moved = true;
				}
			}
			if !moved {
				break;
			}
		}
	}

	fn freeze(&mut self) {
		self.separate_overlaps();
		for body in &mut self.bodies {
			body.vx = 0.0;
			body.vy = 0.0;
			body.fx = Some(body.x);
			body.fy = Some(body.y);
		}
		self.alpha = 0.0;
		self.frozen = true;
	}
}
