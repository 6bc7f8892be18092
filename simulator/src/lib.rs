//! Handles the simulation of the solar system

pub mod bodies;
pub mod stars;
pub mod texture;

use crate::bodies::{Lighting, Orbiter, Sun};
use crate::stars::Starfield;
use euclid::default::Point3D;
use tracing::trace;

/// Everything in the scene. Built once at startup and then ticked by whoever owns it.
pub struct SolarSystem {
    sun: Sun,
    lighting: Lighting,
    /// Everything going around the sun.
    orbiters: Vec<Orbiter>,
    /// One per orbiter, same order.
    orbit_lines: Vec<OrbitLine>,
    starfield: Starfield,
    /// Amplitude of the little vertical bob every orbiter does
    bob: f64,
    ticks_elapsed: u64,
}

impl SolarSystem {
    /// Makes a solar system, along with an orbit line for each orbiter.
    pub fn new(
        sun: Sun,
        lighting: Lighting,
        orbiters: Vec<Orbiter>,
        starfield: Starfield,
        bob: f64,
        orbit_segments: usize,
    ) -> Self {
        let orbit_lines = orbiters
            .iter()
            .map(|Orbiter(_, kmat)| OrbitLine::new(kmat.orbit_radius, orbit_segments))
            .collect();
        SolarSystem {
            sun,
            lighting,
            orbiters,
            orbit_lines,
            starfield,
            bob,
            ticks_elapsed: 0,
        }
    }

    /// Advance everything by one tick.
    pub fn update(&mut self) {
        self.advance(1);
    }

    /// Advance everything by `ticks` ticks.
    pub fn advance(&mut self, ticks: u32) {
        advance(&mut self.orbiters, ticks, self.bob);
        for _ in 0..ticks {
            self.starfield.update();
        }
        self.ticks_elapsed += ticks as u64;
        trace!(ticks, total = self.ticks_elapsed, "advanced solar system");
    }

    pub fn orbiters(&self) -> &[Orbiter] {
        &self.orbiters
    }

    /// Find an orbiter by name. Case matters.
    pub fn orbiter(&self, name: &str) -> Option<&Orbiter> {
        self.orbiters.iter().find(|Orbiter(body, _)| body.name == name)
    }

    pub fn orbit_lines(&self) -> &[OrbitLine] {
        &self.orbit_lines
    }

    pub fn starfield(&self) -> &Starfield {
        &self.starfield
    }

    pub fn sun(&self) -> &Sun {
        &self.sun
    }

    pub fn lighting(&self) -> &Lighting {
        &self.lighting
    }

    pub fn bob(&self) -> f64 {
        self.bob
    }

    pub fn ticks_elapsed(&self) -> u64 {
        self.ticks_elapsed
    }
}

/// Step every orbiter forward `ticks` times.
/// Orbiters don't affect each other, so the order doesn't matter.
pub fn advance(orbiters: &mut [Orbiter], ticks: u32, bob: f64) {
    for Orbiter(_, kmat) in orbiters.iter_mut() {
        for _ in 0..ticks {
            kmat.update(bob);
        }
    }
}

/// The circle an orbiter travels along, drawn as a closed loop.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitLine {
    pub radius: f64,
    pub points: Vec<Point3D<f64>>,
    /// Color is stored as 0xRRGGBB
    pub color: u32,
    pub opacity: f64,
}

impl OrbitLine {
    pub fn new(radius: f64, segments: usize) -> Self {
        Self {
            radius,
            points: orbit_ring(radius, segments),
            color: ORBIT_LINE_COLOR,
            opacity: ORBIT_LINE_OPACITY,
        }
    }
}

/// `segments` points evenly spaced around a circle of `radius` in the XZ plane.
/// The last point does not repeat the first; treat it as a loop.
pub fn orbit_ring(radius: f64, segments: usize) -> Vec<Point3D<f64>> {
    (0..segments)
        .map(|i| {
            let t = (i as f64 / segments as f64) * std::f64::consts::PI * 2.0;
            Point3D::new(t.cos() * radius, 0.0, t.sin() * radius)
        })
        .collect()
}

pub const BOB_AMPLITUDE: f64 = 0.03;
pub const ORBIT_SEGMENTS: usize = 256;
const ORBIT_LINE_COLOR: u32 = 0x888888;
const ORBIT_LINE_OPACITY: f64 = 0.35;
