//! Force-directed layout
//!
//! Per tick, in order: many-body repulsion, centering on x, centering on y,
//! collision. Then velocities decay and positions integrate.
//!
//! ```text
//! alpha += (alpha_target - alpha) * alpha_decay
//! charge:    v_i += (p_j - p_i) * strength * alpha / |p_j - p_i|²     (all pairs)
//! center:    v_i += (0 - p_i) * center_strength * alpha
//! collide:   push overlapping pairs apart, weighted by rj² / (ri² + rj²)
//! integrate: v *= 1 - velocity_decay;  p += v
//! ```

use super::LayoutStepper;
use crate::scene::Bubble;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Default seed for the jiggle applied to coincident bubbles
pub const DEFAULT_SEED: u64 = 0x5eed_b0bb1e5;

const INITIAL_RADIUS: f64 = 10.0;

/// Tunables of [`ForceSimulation`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationParams {
    pub alpha_target: f64,
    pub alpha_decay: f64,
    pub velocity_decay: f64,
    pub charge_strength: f64,
    /// Squared distance below which charge is softened
    pub charge_distance_min2: f64,
    pub center_strength: f64,
    pub collide_strength: f64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            // Never cools down: bubbles keep drifting
            alpha_target: 1.0,
            // 1 - 0.001^(1/300)
            alpha_decay: 1.0 - 0.001f64.powf(1.0 / 300.0),
            velocity_decay: 0.4,
            charge_strength: -3.0,
            charge_distance_min2: 1.0,
            center_strength: 0.1,
            collide_strength: 1.0,
        }
    }
}

/// Many-body + centering + collision simulation
pub struct ForceSimulation {
    params: SimulationParams,
    alpha: f64,
    rng: StdRng,
}

impl Default for ForceSimulation {
    fn default() -> Self {
        Self::new(SimulationParams::default())
    }
}

impl ForceSimulation {
    pub fn new(params: SimulationParams) -> Self {
        Self::with_seed(params, DEFAULT_SEED)
    }

    pub fn with_seed(params: SimulationParams, seed: u64) -> Self {
        Self {
            params,
            alpha: 1.0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Override the current energy
    pub fn set_alpha(&mut self, alpha: f64) {
        self.alpha = alpha;
    }

    /// Tiny random offset for coincident nodes
    fn jiggle(&mut self) -> f64 {
        (self.rng.gen::<f64>() - 0.5) * 1e-6
    }

    fn apply_charge(&mut self, nodes: &mut [Bubble], alpha: f64) {
        let strength = self.params.charge_strength;
        let min2 = self.params.charge_distance_min2;

        for i in 0..nodes.len() {
            let (xi, yi) = (nodes[i].x, nodes[i].y);
            let (mut dvx, mut dvy) = (0.0, 0.0);

            for j in 0..nodes.len() {
                if i == j {
                    continue;
                }
                let mut dx = nodes[j].x - xi;
                let mut dy = nodes[j].y - yi;
                let mut l = dx * dx + dy * dy;

                if dx == 0.0 {
                    dx = self.jiggle();
                    l += dx * dx;
                }
                if dy == 0.0 {
                    dy = self.jiggle();
                    l += dy * dy;
                }
                if l < min2 {
                    l = (min2 * l).sqrt();
                }

                let w = strength * alpha / l;
                dvx += dx * w;
                dvy += dy * w;
            }

            nodes[i].vx += dvx;
            nodes[i].vy += dvy;
        }
    }

    fn apply_center(&self, nodes: &mut [Bubble], alpha: f64) {
        let k = self.params.center_strength * alpha;
        for node in nodes.iter_mut() {
            node.vx -= node.x * k;
        }
        for node in nodes.iter_mut() {
            node.vy -= node.y * k;
        }
    }

    fn apply_collide(&mut self, nodes: &mut [Bubble]) {
        let strength = self.params.collide_strength;

        for i in 0..nodes.len() {
            let ri = nodes[i].radius;
            let ri2 = ri * ri;
            let xi = nodes[i].x + nodes[i].vx;
            let yi = nodes[i].y + nodes[i].vy;

            for j in (i + 1)..nodes.len() {
                let rj = nodes[j].radius;
                let r = ri + rj;
                let mut x = xi - nodes[j].x - nodes[j].vx;
                let mut y = yi - nodes[j].y - nodes[j].vy;
                let mut l = x * x + y * y;

                if l >= r * r {
                    continue;
                }

                if x == 0.0 {
                    x = self.jiggle();
                    l += x * x;
                }
                if y == 0.0 {
                    y = self.jiggle();
                    l += y * y;
                }

                let dist = l.sqrt();
                let push = (r - dist) / dist * strength;
                x *= push;
                y *= push;

                let rj2 = rj * rj;
                let weight = rj2 / (ri2 + rj2);
                nodes[i].vx += x * weight;
                nodes[i].vy += y * weight;

                let weight = 1.0 - weight;
                nodes[j].vx -= x * weight;
                nodes[j].vy -= y * weight;
            }
        }
    }
}

impl LayoutStepper for ForceSimulation {
    fn restart(&mut self) {
        self.alpha = 1.0;
    }

    fn step(&mut self, nodes: &mut [Bubble]) {
        self.alpha += (self.params.alpha_target - self.alpha) * self.params.alpha_decay;
        let alpha = self.alpha;

        self.apply_charge(nodes, alpha);
        self.apply_center(nodes, alpha);
        self.apply_collide(nodes);

        let keep = 1.0 - self.params.velocity_decay;
        for node in nodes.iter_mut() {
            node.vx *= keep;
            node.vy *= keep;
            node.x += node.vx;
            node.y += node.vy;
        }
    }

    fn alpha(&self) -> f64 {
        self.alpha
    }
}

/// Initial position of the `index`-th node: a phyllotaxis spiral
pub fn phyllotaxis_position(index: usize) -> (f64, f64) {
    let i = index as f64;
    let radius = INITIAL_RADIUS * (0.5 + i).sqrt();
    let angle = i * std::f64::consts::PI * (3.0 - 5f64.sqrt());
    (radius * angle.cos(), radius * angle.sin())
}
