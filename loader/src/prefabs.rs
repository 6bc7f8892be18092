//! Prefabricated planets, suns and solar systems.
//! Sizes and distances are roughly real; speeds are whatever looks nice.

use crate::builder::{PlanetSpec, SunSpec};
use crate::error::LoadError;

use std::collections::HashMap;

pub mod bodies {
    use crate::builder::{PlanetSpec, RingSpec};

    fn planet(name: &str, color: u32, radius: f64, au: f64, orbit_speed: f64, spin_speed: f64) -> PlanetSpec {
        PlanetSpec {
            name: name.to_string(),
            color,
            radius,
            au,
            orbit_speed,
            spin_speed,
            tilt: 0.0,
            rings: None,
            glow: false,
            texture: None,
            boost: true,
        }
    }

    /// Returns Mercury.
    pub fn mercury() -> PlanetSpec {
        planet("Mercury", 0x9e9e9e, 0.383, 0.387, 0.015, 0.004)
    }

    /// Returns Venus.
    pub fn venus() -> PlanetSpec {
        planet("Venus", 0xe0c28f, 0.949, 0.723, 0.009, 0.0025)
    }

    /// Returns the Earth, tipped over and wrapped in a bit of atmosphere.
    pub fn earth() -> PlanetSpec {
        PlanetSpec {
            tilt: (-23.4f64).to_radians(),
            glow: true,
            boost: false,
            ..planet("Earth", 0x2f6fd6, 1.0, 1.0, 0.006, 0.002)
        }
    }

    /// Returns Mars
    pub fn mars() -> PlanetSpec {
        PlanetSpec {
            tilt: (-25f64).to_radians(),
            glow: true,
            boost: false,
            ..planet("Mars", 0xc1440e, 0.53, 1.524, 0.005, 0.0018)
        }
    }

    /// Returns Jupiter.
    pub fn jupiter() -> PlanetSpec {
        planet("Jupiter", 0xd8a26b, 11.21, 5.204, 0.0012, 0.01)
    }

    /// Returns Saturn, rings and all.
    pub fn saturn() -> PlanetSpec {
        PlanetSpec {
            tilt: -0.05,
            rings: Some(RingSpec {
                inner: 1.2,
                outer: 2.0,
                color: 0xccc0a8,
                opacity: 0.8,
            }),
            ..planet("Saturn", 0xe3d2a5, 9.45, 9.582, 0.0008, 0.009)
        }
    }

    /// Returns Uranus. Pale and featureless, so it gets a generated texture.
    pub fn uranus() -> PlanetSpec {
        PlanetSpec {
            texture: Some((0xbfe7ef, 0x79c7d6)),
            ..planet("Uranus", 0x7fcbd6, 4.01, 19.218, 0.0005, 0.005)
        }
    }

    /// Returns Neptune.
    pub fn neptune() -> PlanetSpec {
        PlanetSpec {
            texture: Some((0x5aa1e6, 0x134e7a)),
            ..planet("Neptune", 0x2a6fb5, 3.88, 30.11, 0.00035, 0.004)
        }
    }
}

pub mod suns {
    use crate::builder::SunSpec;

    /// Returns our Sun. Will not move.
    pub fn sol() -> SunSpec {
        SunSpec {
            radius: 109.0,
            color: 0xffcc33,
            glow_color: 0xffd88c,
            glow_scale: 1.6,
            glow_opacity: 0.08,
        }
    }
}

pub mod systems {
    use super::bodies::*;
    use crate::builder::PlanetSpec;

    /// The eight planets, innermost first.
    pub fn ours() -> Vec<PlanetSpec> {
        vec![
            mercury(),
            venus(),
            earth(),
            mars(),
            jupiter(),
            saturn(),
            uranus(),
            neptune(),
        ]
    }
}

macro_rules! maker {
    (
        $ty:ty; $module:ident : $($name:ident),*
    ) => {
        {
            let mut h: HashMap<&'static str, fn() -> $ty> = HashMap::new();
            $( h.insert(stringify!($name), $module::$name as fn() -> $ty); )*
            h
        }
    };
}

lazy_static! {
    static ref PLANETS: HashMap<&'static str, fn() -> PlanetSpec> = maker![
        PlanetSpec; bodies: mercury, venus, earth, mars, jupiter, saturn, uranus, neptune
    ];
    static ref SUNS: HashMap<&'static str, fn() -> SunSpec> = maker![SunSpec; suns: sol];
}

/// Gets a premade planet by name. Case doesn't matter.
pub fn planet(id: &str) -> Result<PlanetSpec, LoadError> {
    PLANETS
        .get(id.to_lowercase().as_str())
        .map(|make| make())
        .ok_or_else(|| LoadError::UnknownPrefab(id.to_string()))
}

/// Gets a premade sun by name. Case doesn't matter.
pub fn sun(id: &str) -> Result<SunSpec, LoadError> {
    SUNS.get(id.to_lowercase().as_str())
        .map(|make| make())
        .ok_or_else(|| LoadError::UnknownPrefab(id.to_string()))
}
