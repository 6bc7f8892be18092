//! Lets you construct solar systems from planet descriptions more easily.

use crate::color;
use crate::error::{check_finite, check_non_negative, check_positive, LoadError};
use crate::procgen::{generate_texture, sample_starfield, StarfieldParams, TextureParams};

use simulator::bodies::{Body, Kinemat, Lighting, Orbiter, Rings, Sun, Surface};
use simulator::stars::Starfield;
use simulator::SolarSystem;

use rand::{rngs::SmallRng, Rng, SeedableRng};
use tracing::{debug, info, warn};

/// Describes a planet in human terms: sizes relative to Earth, distances in AU.
/// The builder turns these into scene units.
#[derive(Clone, Debug, PartialEq)]
pub struct PlanetSpec {
    pub name: String,
    /// Color is stored as 0xRRGGBB
    pub color: u32,
    /// Radius, where Earth is 1
    pub radius: f64,
    /// Distance from the sun in astronomical units
    pub au: f64,
    /// Radians per tick
    pub orbit_speed: f64,
    /// Radians per tick
    pub spin_speed: f64,
    /// Radians
    pub tilt: f64,
    pub rings: Option<RingSpec>,
    pub glow: bool,
    /// Gradient endpoints for a procedural surface. None means a flat color.
    pub texture: Option<(u32, u32)>,
    /// Whether to pump up the color so it stands out. Procedural surfaces ignore this.
    pub boost: bool,
}

impl PlanetSpec {
    pub fn validate(&self) -> Result<(), LoadError> {
        let field = |name: &str| format!("{}.{}", self.name, name);
        if self.name.trim().is_empty() {
            return Err(LoadError::invalid("bodies.name", "must not be empty"));
        }
        check_positive(&field("radius"), self.radius)?;
        check_positive(&field("au"), self.au)?;
        check_finite(&field("orbit_speed"), self.orbit_speed)?;
        check_finite(&field("spin_speed"), self.spin_speed)?;
        check_finite(&field("tilt"), self.tilt)?;
        if let Some(rings) = &self.rings {
            check_non_negative(&field("rings.inner"), rings.inner)?;
            check_non_negative(&field("rings.outer"), rings.outer)?;
            if rings.inner > rings.outer {
                return Err(LoadError::invalid(field("rings.inner"), "must not exceed rings.outer"));
            }
            check_non_negative(&field("rings.opacity"), rings.opacity)?;
        }
        Ok(())
    }
}

/// Rings, sized relative to the planet they go around.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RingSpec {
    /// Inner edge, in planet radii
    pub inner: f64,
    /// Outer edge, in planet radii
    pub outer: f64,
    /// Color is stored as 0xRRGGBB
    pub color: u32,
    pub opacity: f64,
}

/// Describes the sun. Its radius is relative to Earth, like planets.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SunSpec {
    pub radius: f64,
    /// Color is stored as 0xRRGGBB
    pub color: u32,
    /// Color is stored as 0xRRGGBB
    pub glow_color: u32,
    pub glow_scale: f64,
    pub glow_opacity: f64,
}

impl SunSpec {
    pub fn validate(&self) -> Result<(), LoadError> {
        check_non_negative("sun.radius", self.radius)?;
        check_non_negative("sun.glow_scale", self.glow_scale)?;
        check_non_negative("sun.glow_opacity", self.glow_opacity)
    }
}

/// Everything about the scene that isn't a specific body.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Settings {
    /// None means pick one at random
    pub seed: Option<u64>,
    /// Amplitude of the vertical bob
    pub bob: f64,
    /// Scene units per astronomical unit
    pub au: f64,
    /// Scene units per Earth radius
    pub size_scale: f64,
    pub orbit_segments: usize,
    pub stars: StarfieldParams,
    pub texture: TextureParams,
    pub lighting: Lighting,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            bob: simulator::BOB_AMPLITUDE,
            au: AU,
            size_scale: SIZE_SCALE,
            orbit_segments: simulator::ORBIT_SEGMENTS,
            stars: StarfieldParams::default(),
            texture: TextureParams::default(),
            lighting: Lighting::default(),
        }
    }
}

impl Settings {
    /// Complain about anything that would make NaNs or degenerate geometry.
    pub fn validate(&self) -> Result<(), LoadError> {
        check_non_negative("bob", self.bob)?;
        check_positive("au", self.au)?;
        check_positive("size_scale", self.size_scale)?;
        if self.orbit_segments < 3 {
            return Err(LoadError::invalid(
                "orbit_segments",
                format!("needs at least 3 points to make a loop, got {}", self.orbit_segments),
            ));
        }
        check_non_negative("lighting.sun_intensity", self.lighting.sun_intensity)?;
        check_non_negative("lighting.ambient", self.lighting.ambient)?;
        self.stars.validate()?;
        self.texture.validate()
    }
}

/// Use this struct to construct a solar system easily
pub struct SolarSystemBuilder {
    settings: Settings,
    sun: SunSpec,
    /// The stuff in the solar system
    planets: Vec<PlanetSpec>,
    /// This is set to true after .construct() is called.
    /// Trying to construct again after that is an error.
    used_up: bool,
}

impl SolarSystemBuilder {
    /// Make a new Builder with no planets.
    pub fn new(settings: Settings, sun: SunSpec) -> Self {
        SolarSystemBuilder {
            settings,
            sun,
            planets: Vec::new(),
            used_up: false,
        }
    }

    /// Add a planet to the Builder.
    pub fn add(&mut self, planet: PlanetSpec) -> &mut Self {
        self.planets.push(planet);
        self
    }

    /// Validates everything, rolls the dice, and hands back a SolarSystem.
    /// Uses the seed from the settings, or entropy if there isn't one.
    pub fn construct(&mut self) -> Result<SolarSystem, LoadError> {
        let mut rng = match self.settings.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        self.construct_with(&mut rng)
    }

    /// Like `construct` but with the caller's random source.
    pub fn construct_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<SolarSystem, LoadError> {
        if self.used_up {
            return Err(LoadError::AlreadyConstructed);
        }
        self.settings.validate()?;
        self.sun.validate()?;
        for planet in &self.planets {
            planet.validate()?;
        }
        self.used_up = true;

        let settings = self.settings;
        if settings.stars.count == 0 {
            warn!("the starfield is empty");
        }
        let orbiters: Vec<Orbiter> = self
            .planets
            .drain(0..)
            .map(|planet| build_orbiter(planet, &settings, rng))
            .collect();

        let stars = sample_starfield(&settings.stars, rng);
        let starfield = Starfield::new(stars, settings.stars.spin_speed);

        let sun = Sun {
            radius: self.sun.radius * settings.size_scale * SUN_SCALE_FACTOR,
            color: self.sun.color,
            glow_color: self.sun.glow_color,
            glow_scale: self.sun.glow_scale,
            glow_opacity: self.sun.glow_opacity,
        };

        info!(
            orbiters = orbiters.len(),
            stars = starfield.stars.len(),
            seed = ?settings.seed,
            "constructed solar system"
        );
        Ok(SolarSystem::new(
            sun,
            settings.lighting,
            orbiters,
            starfield,
            settings.bob,
            settings.orbit_segments,
        ))
    }
}

/// Turn one planet description into an Orbiter at a random point along its orbit.
fn build_orbiter<R: Rng + ?Sized>(planet: PlanetSpec, settings: &Settings, rng: &mut R) -> Orbiter {
    let size = planet.radius * settings.size_scale;
    let orbit_radius = planet.au * settings.au;
    let angle = rng.gen::<f64>() * std::f64::consts::PI * 2.0;

    let (color, surface) = match planet.texture {
        Some((from, to)) => {
            // Give each texture its own stream so adding speckles doesn't shift everything after it.
            let mut tex_rng = SmallRng::seed_from_u64(rng.gen());
            let texture = generate_texture(from, to, &settings.texture, &mut tex_rng);
            (texture.average_color(), Surface::Procedural(texture))
        }
        None if planet.boost => (color::boost(planet.color), Surface::Flat),
        None => (planet.color, Surface::Flat),
    };

    let rings = planet.rings.map(|r| Rings {
        inner: r.inner * size,
        outer: r.outer * size,
        color: r.color,
        opacity: r.opacity,
    });

    debug!(
        name = %planet.name,
        size,
        orbit_radius,
        angle,
        "placed orbiter"
    );
    Orbiter(
        Body {
            name: planet.name,
            size,
            color,
            tilt: planet.tilt,
            rings,
            glow: planet.glow,
            surface,
        },
        Kinemat::new(angle, orbit_radius, planet.orbit_speed, planet.spin_speed, settings.bob),
    )
}

/// Scene units per astronomical unit
pub const AU: f64 = 4.0;
/// Scene units per Earth radius
pub const SIZE_SCALE: f64 = 0.6;
/// The sun would swallow the inner planets at true scale, so it's shrunk further.
pub const SUN_SCALE_FACTOR: f64 = 0.02;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefabs;
    use approx::assert_relative_eq;

    fn small_settings() -> Settings {
        Settings {
            seed: Some(11),
            stars: StarfieldParams {
                count: 300,
                ..Default::default()
            },
            texture: TextureParams {
                size: 32,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn ours(settings: Settings) -> SolarSystemBuilder {
        let mut builder = SolarSystemBuilder::new(settings, prefabs::suns::sol());
        for planet in prefabs::systems::ours() {
            builder.add(planet);
        }
        builder
    }

    #[test]
    fn builds_every_planet_on_its_orbit() {
        let system = ours(small_settings()).construct().unwrap();
        assert_eq!(system.orbiters().len(), 8);
        assert_eq!(system.starfield().stars.len(), 300);
        for Orbiter(body, kmat) in system.orbiters() {
            assert!(kmat.angle >= 0.0 && kmat.angle < std::f64::consts::PI * 2.0);
            assert_relative_eq!(kmat.pos.x.hypot(kmat.pos.z), kmat.orbit_radius, max_relative = 1e-12);
            assert!(body.size > 0.0);
        }
        let saturn = system.orbiter("Saturn").unwrap();
        assert_relative_eq!(saturn.1.orbit_radius, 9.582 * AU);
        let rings = saturn.0.rings.unwrap();
        assert_relative_eq!(rings.inner, 1.2 * saturn.0.size);
        assert_relative_eq!(rings.outer, 2.0 * saturn.0.size);
        assert_relative_eq!(system.sun().radius, 109.0 * SIZE_SCALE * SUN_SCALE_FACTOR);
    }

    #[test]
    fn outer_planets_get_procedural_surfaces() {
        let system = ours(small_settings()).construct().unwrap();
        for name in &["Uranus", "Neptune"] {
            match &system.orbiter(name).unwrap().0.surface {
                Surface::Procedural(tex) => assert_eq!(tex.size(), 32),
                Surface::Flat => panic!("{} should be textured", name),
            }
        }
        assert!(matches!(system.orbiter("Jupiter").unwrap().0.surface, Surface::Flat));
    }

    #[test]
    fn same_seed_same_system() {
        let a = ours(small_settings()).construct().unwrap();
        let b = ours(small_settings()).construct().unwrap();
        for (x, y) in a.orbiters().iter().zip(b.orbiters()) {
            assert_eq!(x.1, y.1);
        }
        assert_eq!(a.starfield().stars, b.starfield().stars);
    }

    #[test]
    fn only_constructs_once() {
        let mut builder = ours(small_settings());
        assert!(builder.construct().is_ok());
        assert!(matches!(builder.construct(), Err(LoadError::AlreadyConstructed)));
    }

    #[test]
    fn rejects_bad_planets_before_building() {
        let mut builder = SolarSystemBuilder::new(small_settings(), prefabs::suns::sol());
        let mut bad = prefabs::bodies::mars();
        bad.au = -1.0;
        builder.add(bad);
        assert!(matches!(builder.construct(), Err(LoadError::Invalid { .. })));
    }

    #[test]
    fn rejects_planets_with_nowhere_to_be() {
        for tweak in &[
            (|p: &mut PlanetSpec| p.au = 0.0) as fn(&mut PlanetSpec),
            |p: &mut PlanetSpec| p.radius = 0.0,
        ] {
            let mut planet = prefabs::bodies::mars();
            tweak(&mut planet);
            assert!(matches!(planet.validate(), Err(LoadError::Invalid { .. })));
            let mut builder = SolarSystemBuilder::new(small_settings(), prefabs::suns::sol());
            builder.add(planet);
            assert!(matches!(builder.construct(), Err(LoadError::Invalid { .. })));
        }
    }

    #[test]
    fn rejects_zero_scales() {
        let settings = Settings {
            size_scale: 0.0,
            ..small_settings()
        };
        assert!(matches!(settings.validate(), Err(LoadError::Invalid { ref field, .. }) if field == "size_scale"));
        let settings = Settings {
            au: 0.0,
            ..small_settings()
        };
        assert!(matches!(settings.validate(), Err(LoadError::Invalid { ref field, .. }) if field == "au"));
    }

    #[test]
    fn empty_starfield_still_builds() {
        let settings = Settings {
            stars: StarfieldParams {
                count: 0,
                ..Default::default()
            },
            ..small_settings()
        };
        let system = ours(settings).construct().unwrap();
        assert!(system.starfield().stars.is_empty());
        assert_eq!(system.orbiters().len(), 8);
    }

    #[test]
    fn rejects_bad_settings() {
        let settings = Settings {
            orbit_segments: 2,
            ..small_settings()
        };
        assert!(ours(settings).construct().is_err());
        let settings = Settings {
            bob: std::f64::NAN,
            ..small_settings()
        };
        assert!(ours(settings).construct().is_err());
    }
}
