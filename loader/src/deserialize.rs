//! Lets you load a SolarSystem from a file.

use crate::builder::{PlanetSpec, RingSpec, Settings, SolarSystemBuilder, SunSpec};
use crate::error::LoadError;
use crate::prefabs;
use crate::procgen::{StarfieldParams, TextureParams};

use simulator::bodies::Lighting;
use simulator::SolarSystem;

use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::Deserialize;
use tracing::info;

use std::convert::TryFrom;
use std::fmt;
use std::marker::PhantomData;

/// The whole file. Every field is optional; missing ones get the usual values.
#[derive(Deserialize, Clone, Debug)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    #[serde(deserialize_with = "optional_whole_number")]
    pub seed: Option<u64>,
    pub bob: f64,
    pub au: f64,
    pub size_scale: f64,
    #[serde(deserialize_with = "whole_number")]
    pub orbit_segments: usize,
    pub stars: StarfieldParams,
    pub texture: TextureParams,
    pub lighting: LightingConfig,
    pub sun: SunEntry,
    pub bodies: Vec<BodyEntry>,
}

impl Default for Config {
    fn default() -> Self {
        let settings = Settings::default();
        Self {
            seed: settings.seed,
            bob: settings.bob,
            au: settings.au,
            size_scale: settings.size_scale,
            orbit_segments: settings.orbit_segments,
            stars: settings.stars,
            texture: settings.texture,
            lighting: LightingConfig::default(),
            sun: SunEntry::Prefab("sol".to_string()),
            bodies: prefabs::systems::ours()
                .into_iter()
                .map(|p| BodyEntry::Prefab(p.name.to_lowercase()))
                .collect(),
        }
    }
}

impl Config {
    /// The parts of the config that aren't about a particular body.
    pub fn settings(&self) -> Settings {
        Settings {
            seed: self.seed,
            bob: self.bob,
            au: self.au,
            size_scale: self.size_scale,
            orbit_segments: self.orbit_segments,
            stars: self.stars,
            texture: self.texture,
            lighting: Lighting {
                sun_intensity: self.lighting.sun_intensity,
                ambient: self.lighting.ambient,
            },
        }
    }

    /// Resolve prefabs and check every number, without building anything.
    pub fn validate(&self) -> Result<(), LoadError> {
        self.settings().validate()?;
        self.sun.resolve()?.validate()?;
        for body in &self.bodies {
            body.resolve()?.validate()?;
        }
        Ok(())
    }

    /// Turn this into a builder with every body added.
    pub fn into_builder(self) -> Result<SolarSystemBuilder, LoadError> {
        let mut builder = SolarSystemBuilder::new(self.settings(), self.sun.resolve()?);
        for body in &self.bodies {
            builder.add(body.resolve()?);
        }
        Ok(builder)
    }
}

#[derive(Deserialize, Copy, Clone, Debug)]
#[serde(default, deny_unknown_fields)]
pub struct LightingConfig {
    pub sun_intensity: f64,
    pub ambient: f64,
}

impl Default for LightingConfig {
    fn default() -> Self {
        let lighting = Lighting::default();
        Self {
            sun_intensity: lighting.sun_intensity,
            ambient: lighting.ambient,
        }
    }
}

/// The sun, either premade or spelled out.
#[derive(Deserialize, Clone, Debug)]
#[serde(untagged)]
pub enum SunEntry {
    Prefab(String),
    Custom {
        /// Earth radii
        radius: f64,
        color: u32,
        #[serde(default = "default_glow_color")]
        glow_color: u32,
        #[serde(default = "default_glow_scale")]
        glow_scale: f64,
        #[serde(default = "default_glow_opacity")]
        glow_opacity: f64,
    },
}

impl SunEntry {
    fn resolve(&self) -> Result<SunSpec, LoadError> {
        match self {
            SunEntry::Prefab(id) => prefabs::sun(id),
            &SunEntry::Custom {
                radius,
                color,
                glow_color,
                glow_scale,
                glow_opacity,
            } => Ok(SunSpec {
                radius,
                color,
                glow_color,
                glow_scale,
                glow_opacity,
            }),
        }
    }
}

fn default_glow_color() -> u32 {
    0xffd88c
}

fn default_glow_scale() -> f64 {
    1.6
}

fn default_glow_opacity() -> f64 {
    0.08
}

/// A body, either premade or spelled out.
#[derive(Deserialize, Clone, Debug)]
#[serde(untagged)]
pub enum BodyEntry {
    Prefab(String), // A pre-made pre-defined planet
    Custom {
        name: String,
        color: u32,
        /// Earth radii
        radius: f64,
        au: f64,
        orbit_speed: f64,
        spin_speed: f64,
        /// Degrees, because nobody thinks of axial tilt in radians
        #[serde(default)]
        tilt: f64,
        #[serde(default)]
        rings: Option<RingsEntry>,
        #[serde(default)]
        glow: bool,
        /// Two colors to make a procedural texture from
        #[serde(default)]
        texture: Option<(u32, u32)>,
        #[serde(default = "get_true_for_serde")]
        boost: bool,
    },
}

impl BodyEntry {
    fn resolve(&self) -> Result<PlanetSpec, LoadError> {
        match self {
            BodyEntry::Prefab(id) => prefabs::planet(id),
            BodyEntry::Custom {
                name,
                color,
                radius,
                au,
                orbit_speed,
                spin_speed,
                tilt,
                rings,
                glow,
                texture,
                boost,
            } => Ok(PlanetSpec {
                name: name.clone(),
                color: *color,
                radius: *radius,
                au: *au,
                orbit_speed: *orbit_speed,
                spin_speed: *spin_speed,
                tilt: tilt.to_radians(),
                rings: rings.map(|r| RingSpec {
                    inner: r.inner,
                    outer: r.outer,
                    color: r.color,
                    opacity: r.opacity,
                }),
                glow: *glow,
                texture: *texture,
                boost: *boost,
            }),
        }
    }
}

/// Rings in planet radii.
#[derive(Deserialize, Copy, Clone, Debug)]
pub struct RingsEntry {
    inner: f64,
    outer: f64,
    color: u32,
    #[serde(default = "get_one_for_serde")]
    opacity: f64,
}

/// Returns `1f64` because Serde needs a function
fn get_one_for_serde() -> f64 {
    1f64
}

/// Returns `true` because Serde needs a function
fn get_true_for_serde() -> bool {
    true
}

/// Reads a count or a seed.
/// Going straight to an unsigned field would quietly turn -3 into 0 and 2.9 into 2.
pub(crate) fn whole_number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64>,
{
    deserializer.deserialize_any(WholeNumberVisitor(PhantomData))
}

pub(crate) fn optional_whole_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64>,
{
    whole_number(deserializer).map(Some)
}

struct WholeNumberVisitor<T>(PhantomData<T>);

impl<'de, T: TryFrom<u64>> Visitor<'de> for WholeNumberVisitor<T> {
    type Value = T;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "a whole number, zero or more")
    }

    fn visit_u64<E>(self, v: u64) -> Result<T, E>
    where
        E: de::Error,
    {
        T::try_from(v).map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &"a smaller number"))
    }

    fn visit_i64<E>(self, v: i64) -> Result<T, E>
    where
        E: de::Error,
    {
        match u64::try_from(v) {
            Ok(v) => self.visit_u64(v),
            Err(_) => Err(E::invalid_value(Unexpected::Signed(v), &self)),
        }
    }

    fn visit_f64<E>(self, v: f64) -> Result<T, E>
    where
        E: de::Error,
    {
        if v >= 0.0 && v.fract() == 0.0 && v <= u64::MAX as f64 {
            self.visit_u64(v as u64)
        } else {
            Err(E::invalid_value(Unexpected::Float(v), &self))
        }
    }
}

/// Parses a JSON5 config. Doesn't validate it.
pub fn parse(contents: &str) -> Result<Config, LoadError> {
    Ok(json5::from_str(contents)?)
}

/// Loads a file's contents and returns a ready-to-run solar system.
pub fn load(contents: &str) -> Result<SolarSystem, LoadError> {
    let config = parse(contents)?;
    info!(bodies = config.bodies.len(), seed = ?config.seed, "loaded config");
    // Everything gets checked once, inside construct
    config.into_builder()?.construct()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn empty_object_is_our_solar_system() {
        let config = parse("{}").unwrap();
        assert_eq!(config.bodies.len(), 8);
        assert_eq!(config.stars.count, 8000);
        assert_eq!(config.texture.size, 1024);
        assert_relative_eq!(config.bob, 0.03);
        config.validate().unwrap();
    }

    #[test]
    fn prefabs_and_custom_bodies_mix() {
        let config = parse(
            r#"{
                seed: 3,
                stars: { count: 10 },
                texture: { size: 16 },
                bodies: [
                    "earth",
                    {
                        name: "Vulcan",
                        color: 0xff3300,
                        radius: 0.3,
                        au: 0.2,
                        orbit_speed: 0.02,
                        spin_speed: 0.01,
                        tilt: 90,
                        rings: { inner: 1.5, outer: 1.8, color: 0xffffff },
                        texture: [0xffffff, 0x000000],
                    },
                ],
            }"#,
        )
        .unwrap();
        let system = config.into_builder().unwrap().construct().unwrap();
        assert_eq!(system.orbiters().len(), 2);
        let vulcan = system.orbiter("Vulcan").unwrap();
        assert_relative_eq!(vulcan.0.tilt, std::f64::consts::FRAC_PI_2, max_relative = 1e-12);
        assert_relative_eq!(vulcan.1.orbit_radius, 0.2 * crate::builder::AU);
        assert_relative_eq!(vulcan.0.rings.unwrap().opacity, 1.0);
        assert_eq!(system.starfield().stars.len(), 10);
    }

    #[test]
    fn custom_sun() {
        let config = parse(r#"{ sun: { radius: 50, color: 0xff0000 }, bodies: [] }"#).unwrap();
        match config.sun {
            SunEntry::Custom { glow_color, .. } => assert_eq!(glow_color, 0xffd88c),
            SunEntry::Prefab(_) => panic!("should be custom"),
        }
    }

    #[test]
    fn unknown_prefab_is_rejected() {
        let config = parse(r#"{ bodies: ["earth", "vulcan"] }"#).unwrap();
        assert!(matches!(config.validate(), Err(LoadError::UnknownPrefab(_))));
    }

    #[test]
    fn bad_numbers_are_rejected_eagerly() {
        for text in &[
            r#"{ stars: { min_radius: -5 } }"#,
            r#"{ stars: { min_radius: 300, max_radius: 250 } }"#,
            r#"{ texture: { size: 0 } }"#,
            r#"{ orbit_segments: 1 }"#,
            r#"{ au: -4 }"#,
            r#"{ au: 0 }"#,
            r#"{ bodies: [{ name: "X", color: 0, radius: 1, au: 0, orbit_speed: 0, spin_speed: 0 }] }"#,
            r#"{ bodies: [{ name: "X", color: 0, radius: -1, au: 1, orbit_speed: 0, spin_speed: 0 }] }"#,
        ] {
            let config = parse(text).unwrap();
            assert!(
                matches!(config.validate(), Err(LoadError::Invalid { .. })),
                "{} should be invalid",
                text
            );
        }
    }

    #[test]
    fn counts_must_be_whole_and_not_negative() {
        for text in &[
            "{ stars: { count: -3 } }",
            "{ stars: { count: 2.9 } }",
            "{ texture: { size: -1 } }",
            "{ texture: { speckles: -5 } }",
            "{ texture: { streaks: 1.5 } }",
            "{ orbit_segments: -4 }",
            "{ seed: -7 }",
            "{ stars: { count: 5000000000 } }",
        ] {
            assert!(
                matches!(parse(text), Err(LoadError::Parse(_))),
                "{} should not parse",
                text
            );
        }
        assert!(matches!(load("{ stars: { count: -3 }, bodies: [] }"), Err(LoadError::Parse(_))));
    }

    #[test]
    fn whole_numbers_still_parse() {
        let config = parse("{ seed: 7, orbit_segments: 64, stars: { count: 12 }, texture: { size: 16.0 } }")
            .unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.orbit_segments, 64);
        assert_eq!(config.stars.count, 12);
        assert_eq!(config.texture.size, 16);
        assert_eq!(parse("{ stars: { count: 0 } }").unwrap().stars.count, 0);
    }

    #[test]
    fn load_checks_without_a_separate_validate() {
        assert!(matches!(load("{ au: -4, bodies: [] }"), Err(LoadError::Invalid { .. })));
        assert!(matches!(load("{ size_scale: 0, bodies: [] }"), Err(LoadError::Invalid { .. })));
        assert!(matches!(load(r#"{ bodies: ["vulcan"] }"#), Err(LoadError::UnknownPrefab(_))));
        let system = load("{ stars: { count: 0 }, texture: { size: 8 }, bodies: [] }").unwrap();
        assert!(system.starfield().stars.is_empty());
    }

    #[test]
    fn typos_do_not_parse() {
        assert!(matches!(parse("{ bobb: 0.1 }"), Err(LoadError::Parse(_))));
    }
}
