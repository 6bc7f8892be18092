//! Turns config files and prefab tables into a ready-to-run SolarSystem.
//! Also home to the random generators: starting angles, stars and planet textures.

pub mod builder;
pub use builder::{PlanetSpec, Settings, SolarSystemBuilder, SunSpec};
pub mod color;
pub mod deserialize;
pub mod error;
pub use error::LoadError;
pub mod prefabs; // prefabs::bodies::whatever
pub mod procgen;
pub use deserialize::*;

#[macro_use]
extern crate lazy_static;
