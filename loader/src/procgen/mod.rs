//! Randomly generated bits of the scene.
//! Everything here takes its randomness from the caller so a seed reproduces it exactly.

pub mod starfield;
pub mod texture;

pub use starfield::{sample_starfield, StarfieldParams};
pub use texture::{generate_texture, TextureParams};
