//! Handles the state for the viewer.

use crate::camera::{Basis, OrbitCamera, Projected};
use crate::shading;

use simulator::bodies::{Orbiter, Surface};
use simulator::SolarSystem;

use euclid::default::Point3D;
use ggez::event::{EventHandler, KeyCode, MouseButton};
use ggez::nalgebra::Point2;
use ggez::{
    graphics::{self, Color, DrawMode, DrawParam, Image, Mesh, MeshBuilder, Text, Vertex, WrapMode},
    input::{keyboard, mouse},
    timer, Context, GameError, GameResult,
};
use tracing::{debug, error, info};

use std::cmp::Ordering;
use std::collections::HashSet;
use std::convert::TryFrom;

/// The state of the viewer.
pub struct State {
    solar_system: SolarSystem,
    camera: OrbitCamera,
    paused: bool,
    /// How many simulation ticks happen per frame
    ticks_per_frame: u32,
    /// All the keypresses last frame
    prev_keys: HashSet<KeyCode>,
    /// What I'm focusing on
    focus: Focus,
    /// One per orbiter, same order. None for flat-colored bodies.
    textures: Vec<Option<Image>>,
}

/// What my focus is on
#[derive(Copy, Clone, Debug, PartialEq)]
enum Focus {
    /// Index of the orbiter I'm following
    Body(usize),
    /// I'm looking at wherever the camera was left
    Position,
}

impl State {
    pub fn new(ctx: &mut Context, solar_system: SolarSystem) -> GameResult<Self> {
        let textures = solar_system
            .orbiters()
            .iter()
            .map(|Orbiter(body, _)| -> GameResult<Option<Image>> {
                match &body.surface {
                    Surface::Flat => Ok(None),
                    Surface::Procedural(texture) => {
                        let side = u16::try_from(texture.size()).map_err(|_| {
                            GameError::ResourceLoadError(format!(
                                "texture for {} is too big ({} px)",
                                body.name,
                                texture.size()
                            ))
                        })?;
                        let mut image = Image::from_rgba8(ctx, side, side, texture.rgba())?;
                        // Spin scrolls the texture sideways forever
                        image.set_wrap(WrapMode::Tile, WrapMode::Clamp);
                        debug!(body = %body.name, side, "uploaded texture");
                        Ok(Some(image))
                    }
                }
            })
            .collect::<GameResult<Vec<_>>>()?;

        info!(
            bodies = solar_system.orbiters().len(),
            stars = solar_system.starfield().stars.len(),
            "viewer ready"
        );
        Ok(State {
            solar_system,
            camera: OrbitCamera::default(),
            paused: false,
            ticks_per_frame: 1,
            prev_keys: HashSet::new(),
            focus: Focus::Position,
            textures,
        })
    }

    /// Fix the screen space to always have (0, 0) in the corner and (w, h) in the other.
    fn fix_coordinates(&mut self, ctx: &mut Context, width: f32, height: f32) -> GameResult<()> {
        let rect = graphics::Rect::new(0.0, 0.0, width, height);
        graphics::set_screen_coordinates(ctx, rect)
    }

    /// True only on the frame the key goes down.
    fn just_pressed(&self, ctx: &Context, key: KeyCode) -> bool {
        keyboard::is_key_pressed(ctx, key) && !self.prev_keys.contains(&key)
    }

    fn handle_keys(&mut self, ctx: &Context) {
        // Press tilde to put everything back how it started
        if keyboard::is_key_pressed(ctx, KeyCode::Grave) {
            self.camera = OrbitCamera::default();
            self.ticks_per_frame = 1;
            self.paused = false;
            self.focus = Focus::Position;
            return;
        }

        if self.just_pressed(ctx, KeyCode::Space) {
            self.paused = !self.paused;
        }
        if self.just_pressed(ctx, KeyCode::LBracket) {
            self.ticks_per_frame = (self.ticks_per_frame / 2).max(1);
        }
        if self.just_pressed(ctx, KeyCode::RBracket) {
            self.ticks_per_frame = (self.ticks_per_frame * 2).min(MAX_TICKS_PER_FRAME);
        }

        if keyboard::is_key_pressed(ctx, KeyCode::Q) {
            self.camera.zoom(ZOOM_SPEED.recip());
        }
        if keyboard::is_key_pressed(ctx, KeyCode::Z) {
            self.camera.zoom(ZOOM_SPEED);
        }

        let pan_speed = PAN_SPEED * self.camera.distance;
        let mut pan = (0.0, 0.0);
        if keyboard::is_key_pressed(ctx, KeyCode::W) {
            pan.1 += pan_speed;
        }
        if keyboard::is_key_pressed(ctx, KeyCode::S) {
            pan.1 -= pan_speed;
        }
        if keyboard::is_key_pressed(ctx, KeyCode::A) {
            pan.0 -= pan_speed;
        }
        if keyboard::is_key_pressed(ctx, KeyCode::D) {
            pan.0 += pan_speed;
        }
        if pan != (0.0, 0.0) {
            // Panning lets go of whatever we were following
            self.focus = Focus::Position;
            self.camera.pan(pan.0, pan.1);
        }

        let count = self.solar_system.orbiters().len();
        let step = if self.just_pressed(ctx, KeyCode::Right) {
            Some(1)
        } else if self.just_pressed(ctx, KeyCode::Left) {
            Some(count.saturating_sub(1))
        } else {
            None
        };
        if let Some(step) = step {
            self.focus = cycle_focus(self.focus, step, count);
        }
    }

    fn draw_stars(&self, ctx: &mut Context, width: f32, height: f32) -> GameResult<()> {
        let starfield = self.solar_system.starfield();
        let mut batch = Batch::new();
        for star in &starfield.stars {
            if let Some(p) = self.camera.project(starfield.rotated(star), width, height) {
                let side = ((STAR_SIZE * p.scale) as f32).max(1.0).min(4.0);
                let [r, g, b] = star.color;
                batch.builder.rectangle(
                    DrawMode::fill(),
                    graphics::Rect::new(p.screen.x - side / 2.0, p.screen.y - side / 2.0, side, side),
                    Color::new(r, g, b, 1.0),
                );
                batch.empty = false;
            }
        }
        batch.draw(ctx)
    }

    fn draw_orbit_lines(&self, ctx: &mut Context, width: f32, height: f32) -> GameResult<()> {
        let mut batch = Batch::new();
        for line in self.solar_system.orbit_lines() {
            let color = with_alpha(line.color, line.opacity);
            let projected: Vec<Option<Projected>> = line
                .points
                .iter()
                .map(|&p| self.camera.project(p, width, height))
                .collect();
            let n = projected.len();
            for i in 0..n {
                if let (Some(a), Some(b)) = (projected[i], projected[(i + 1) % n]) {
                    batch.builder.line(&[to_point(a), to_point(b)], 1.0, color)?;
                    batch.empty = false;
                }
            }
        }
        batch.draw(ctx)
    }

    fn draw_sun(&self, ctx: &mut Context, p: Projected) -> GameResult<()> {
        let sun = self.solar_system.sun();
        let radius = ((sun.radius * p.scale) as f32).max(MIN_BODY_PX);
        let glow = MeshBuilder::new()
            .circle(
                DrawMode::fill(),
                to_point(p),
                radius * sun.glow_scale as f32,
                0.1,
                with_alpha(sun.glow_color, sun.glow_opacity),
            )
            .circle(DrawMode::fill(), to_point(p), radius, 0.1, Color::from_rgb_u32(sun.color))
            .build(ctx)?;
        graphics::draw(ctx, &glow, DrawParam::default())
    }

    fn draw_orbiter(
        &self,
        ctx: &mut Context,
        index: usize,
        p: Projected,
        basis: &Basis,
        eye: Point3D<f64>,
        (width, height): (f32, f32),
    ) -> GameResult<()> {
        let Orbiter(body, kmat) = &self.solar_system.orbiters()[index];
        let radius = ((body.size * p.scale) as f32).max(MIN_BODY_PX);

        // Rings go halfway round behind the planet, then it, then the near half.
        let (back, front) = match &body.rings {
            Some(rings) => {
                let mid = (rings.inner + rings.outer) / 2.0;
                let points: Vec<Option<Projected>> = ring_points(kmat.pos, mid, body.tilt, RING_SEGMENTS)
                    .into_iter()
                    .map(|q| self.camera.project(q, width, height))
                    .collect();
                let thickness = ((rings.outer - rings.inner) * p.scale) as f32;
                let color = with_alpha(rings.color, rings.opacity);
                let n = points.len();
                let mut back = Batch::new();
                let mut front = Batch::new();
                for i in 0..n {
                    if let (Some(a), Some(b)) = (points[i], points[(i + 1) % n]) {
                        let side = if (a.depth + b.depth) / 2.0 > p.depth {
                            &mut back
                        } else {
                            &mut front
                        };
                        side.builder
                            .line(&[to_point(a), to_point(b)], thickness.max(1.0), color)?;
                        side.empty = false;
                    }
                }
                (back, front)
            }
            None => (Batch::new(), Batch::new()),
        };
        back.draw(ctx)?;

        if body.glow {
            let halo = MeshBuilder::new()
                .circle(
                    DrawMode::fill(),
                    to_point(p),
                    radius * GLOW_SCALE,
                    0.1,
                    with_alpha(body.color, GLOW_OPACITY),
                )
                .build(ctx)?;
            graphics::draw(ctx, &halo, DrawParam::default())?;
        }

        match &self.textures[index] {
            Some(image) => {
                let (verts, indices) = disc_mesh(p, radius, kmat.spin, body.tilt);
                let disc = Mesh::from_raw(ctx, &verts, &indices, Some(image.clone()))?;
                graphics::draw(ctx, &disc, DrawParam::default())?;
            }
            None => {
                let disc = MeshBuilder::new()
                    .circle(DrawMode::fill(), to_point(p), radius, 0.1, Color::from_rgb_u32(body.color))
                    .build(ctx)?;
                graphics::draw(ctx, &disc, DrawParam::default())?;
            }
        }

        let outline = shading::shadow_outline(
            p.screen,
            radius,
            kmat.pos,
            Point3D::origin(),
            eye,
            basis,
            SHADOW_SEGMENTS,
        );
        if outline.len() >= 3 {
            let points: Vec<Point2<f32>> = outline.iter().map(|q| Point2::new(q.x, q.y)).collect();
            let alpha = shading::shadow_alpha(self.solar_system.lighting());
            let shadow = MeshBuilder::new()
                .polygon(DrawMode::fill(), &points, Color::new(0.0, 0.0, 0.0, alpha))?
                .build(ctx)?;
            graphics::draw(ctx, &shadow, DrawParam::default())?;
        }

        front.draw(ctx)
    }

    fn draw_hud(&self, ctx: &mut Context) -> GameResult<()> {
        let focus = match self.focus {
            Focus::Body(id) => self
                .solar_system
                .orbiters()
                .get(id)
                .map(|Orbiter(body, _)| body.name.as_str())
                .unwrap_or("nothing"),
            Focus::Position => "free",
        };
        let text = Text::new(format!(
            "{}{} ticks/frame | following: {} | {:.0} fps",
            if self.paused { "PAUSED | " } else { "" },
            self.ticks_per_frame,
            focus,
            timer::fps(ctx),
        ));
        graphics::draw(ctx, &text, (Point2::new(10.0, 10.0), Color::from_rgb_u32(0xdddddd)))
    }
}

impl EventHandler for State {
    fn update(&mut self, ctx: &mut Context) -> GameResult<()> {
        const DESIRED_FPS: u32 = 60;
        while timer::check_update_time(ctx, DESIRED_FPS) {
            self.handle_keys(ctx);

            if !self.paused {
                self.solar_system.advance(self.ticks_per_frame);
            }

            if let Focus::Body(id) = self.focus {
                match self.solar_system.orbiters().get(id) {
                    Some(Orbiter(_, kmat)) => self.camera.target = kmat.pos,
                    // Focusing on something that doesn't exist
                    None => self.focus = Focus::Position,
                }
            }

            // Update previous keys
            self.prev_keys = keyboard::pressed_keys(ctx).to_owned();
        }
        Ok(())
    }

    fn draw(&mut self, ctx: &mut Context) -> GameResult<()> {
        graphics::clear(ctx, Color::from_rgb_u32(0x000000));

        let screen = graphics::screen_coordinates(ctx);
        let (width, height) = (screen.w, screen.h);
        self.draw_stars(ctx, width, height)?;
        self.draw_orbit_lines(ctx, width, height)?;

        let basis = self.camera.basis();
        let eye = self.camera.eye();
        let mut scene: Vec<(Thing, Projected)> = Vec::new();
        if let Some(p) = self.camera.project(Point3D::origin(), width, height) {
            scene.push((Thing::Sun, p));
        }
        for (id, Orbiter(_, kmat)) in self.solar_system.orbiters().iter().enumerate() {
            if let Some(p) = self.camera.project(kmat.pos, width, height) {
                scene.push((Thing::Orbiter(id), p));
            }
        }
        // Painter's algorithm: far things first
        scene.sort_by(|a, b| b.1.depth.partial_cmp(&a.1.depth).unwrap_or(Ordering::Equal));

        for (thing, p) in scene {
            match thing {
                Thing::Sun => self.draw_sun(ctx, p)?,
                Thing::Orbiter(id) => self.draw_orbiter(ctx, id, p, &basis, eye, (width, height))?,
            }
        }

        self.draw_hud(ctx)?;
        graphics::present(ctx)
    }

    fn mouse_motion_event(&mut self, ctx: &mut Context, _x: f32, _y: f32, dx: f32, dy: f32) {
        if mouse::button_pressed(ctx, MouseButton::Left) {
            self.camera
                .orbit(-dx as f64 * ORBIT_SENSITIVITY, dy as f64 * ORBIT_SENSITIVITY);
        }
    }

    fn mouse_wheel_event(&mut self, _ctx: &mut Context, _x: f32, y: f32) {
        self.camera.zoom(WHEEL_ZOOM.powf(-y as f64));
    }

    fn resize_event(&mut self, ctx: &mut Context, width: f32, height: f32) {
        if let Err(e) = self.fix_coordinates(ctx, width, height) {
            error!(%e, width, height, "couldn't fix screen coordinates");
        }
    }
}

/// Something drawn in depth order.
#[derive(Copy, Clone, Debug)]
enum Thing {
    Sun,
    Orbiter(usize),
}

/// A MeshBuilder that remembers whether anything went into it.
/// Building an empty mesh is an error.
struct Batch {
    builder: MeshBuilder,
    empty: bool,
}

impl Batch {
    fn new() -> Self {
        Batch {
            builder: MeshBuilder::new(),
            empty: true,
        }
    }

    fn draw(self, ctx: &mut Context) -> GameResult<()> {
        if self.empty {
            return Ok(());
        }
        let mesh = self.builder.build(ctx)?;
        graphics::draw(ctx, &mesh, DrawParam::default())
    }
}

/// Move the focus `step` bodies along, wrapping around.
/// Coming from a free camera, lands on the first body.
fn cycle_focus(focus: Focus, step: usize, count: usize) -> Focus {
    if count == 0 {
        return Focus::Position;
    }
    match focus {
        Focus::Body(id) => Focus::Body((id + step) % count),
        Focus::Position => Focus::Body(0),
    }
}

/// Points around a ring in a body's equatorial plane, tipped over by `tilt` about Z.
fn ring_points(center: Point3D<f64>, radius: f64, tilt: f64, segments: usize) -> Vec<Point3D<f64>> {
    let (sin_tilt, cos_tilt) = tilt.sin_cos();
    simulator::orbit_ring(radius, segments)
        .into_iter()
        .map(|q| Point3D::new(center.x + q.x * cos_tilt, center.y + q.x * sin_tilt, center.z + q.z))
        .collect()
}

/// Where on an equirectangular texture the point (x, y) of a unit disc lands, once the
/// sphere behind it has turned by `spin`. y points down the screen.
fn sphere_uv(x: f64, y: f64, spin: f64) -> [f32; 2] {
    let y = y.max(-1.0).min(1.0);
    let lat = y.asin();
    let ring = lat.cos();
    let lon = if ring < 1e-6 {
        0.0
    } else {
        (x / ring).max(-1.0).min(1.0).asin()
    };
    let spin = spin.rem_euclid(std::f64::consts::PI * 2.0);
    [
        (0.5 + (lon + spin) / (std::f64::consts::PI * 2.0)) as f32,
        (0.5 + lat / std::f64::consts::PI) as f32,
    ]
}

/// A polar grid over the disc with texture coordinates that look like a turning sphere.
fn disc_mesh(p: Projected, radius: f32, spin: f64, tilt: f64) -> (Vec<Vertex>, Vec<u32>) {
    let (sin_tilt, cos_tilt) = (-tilt).sin_cos();
    let (rings, sectors) = (DISC_RINGS, DISC_SECTORS);
    let mut verts = Vec::with_capacity((rings as usize + 1) * sectors as usize);
    for i in 0..=rings {
        let rho = i as f64 / rings as f64;
        for j in 0..sectors {
            let theta = j as f64 / sectors as f64 * std::f64::consts::PI * 2.0;
            let (x, y) = (rho * theta.cos(), rho * theta.sin());
            let (sx, sy) = (x * cos_tilt - y * sin_tilt, x * sin_tilt + y * cos_tilt);
            verts.push(Vertex {
                pos: [
                    p.screen.x + sx as f32 * radius,
                    p.screen.y + sy as f32 * radius,
                ],
                uv: sphere_uv(x, y, spin),
                color: [1.0, 1.0, 1.0, 1.0],
            });
        }
    }

    let mut indices = Vec::with_capacity(rings as usize * sectors as usize * 6);
    for i in 0..rings {
        for j in 0..sectors {
            let a = i * sectors + j;
            let b = i * sectors + (j + 1) % sectors;
            let c = (i + 1) * sectors + j;
            let d = (i + 1) * sectors + (j + 1) % sectors;
            indices.extend_from_slice(&[a, c, d, a, d, b]);
        }
    }
    (verts, indices)
}

fn to_point(p: Projected) -> Point2<f32> {
    Point2::new(p.screen.x, p.screen.y)
}

fn with_alpha(color: u32, alpha: f64) -> Color {
    let mut color = Color::from_rgb_u32(color);
    color.a = alpha as f32;
    color
}

const PAN_SPEED: f64 = 0.01; // Fraction of the camera distance to pan per frame
const ZOOM_SPEED: f64 = 1.03; // multiply / divide the distance by this much per frame
const WHEEL_ZOOM: f64 = 1.15; // same, per wheel notch
const ORBIT_SENSITIVITY: f64 = 0.005; // radians per pixel dragged
const MAX_TICKS_PER_FRAME: u32 = 64;

/// Bodies never get smaller than this many pixels across, or you'd lose them
const MIN_BODY_PX: f32 = 1.5;
/// Star size in scene units
const STAR_SIZE: f64 = 0.6;
const GLOW_SCALE: f32 = 1.15;
const GLOW_OPACITY: f64 = 0.25;

const RING_SEGMENTS: usize = 96;
const SHADOW_SEGMENTS: usize = 24;
const DISC_RINGS: u32 = 8;
const DISC_SECTORS: u32 = 32;
