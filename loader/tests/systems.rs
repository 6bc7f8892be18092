use loader::{load, parse, LoadError};
use simulator::bodies::{Orbiter, Surface};

use approx::assert_relative_eq;

/// Shrink the expensive parts so the tests stay fast.
fn shrink(text: &str) -> String {
    text.replace("size: 1024", "size: 32")
        .replace("size: 512", "size: 32")
        .replace("count: 8000", "count: 500")
        .replace("count: 3000", "count: 500")
}

#[test]
fn sol_loads() {
    let text = shrink(include_str!("../../systems/sol.json5"));
    let mut system = load(&text).unwrap();
    let names: Vec<&str> = system.orbiters().iter().map(|o| o.0.name.as_str()).collect();
    assert_eq!(
        names,
        ["Mercury", "Venus", "Earth", "Mars", "Jupiter", "Saturn", "Uranus", "Neptune"]
    );
    assert_eq!(system.starfield().stars.len(), 500);
    assert_eq!(system.orbit_lines().len(), 8);

    let before: Vec<f64> = system.orbiters().iter().map(|o| o.1.angle).collect();
    system.advance(600);
    for (Orbiter(_, kmat), a0) in system.orbiters().iter().zip(before) {
        assert_relative_eq!(kmat.angle, a0 + 600.0 * kmat.orbit_speed, epsilon = 1e-9);
        assert!(kmat.pos.y.abs() <= system.bob());
    }
}

#[test]
fn custom_system_loads() {
    let text = shrink(include_str!("../../systems/binary_rings.json5"));
    let system = load(&text).unwrap();
    assert_eq!(system.orbiters().len(), 3);
    let halo = system.orbiter("Halo").unwrap();
    assert!(matches!(halo.0.surface, Surface::Procedural(_)));
    assert!(halo.0.rings.is_some());
    assert_relative_eq!(system.sun().radius, 80.0 * 0.6 * 0.02);
    for star in &system.starfield().stars {
        let d = star.pos.to_vector().length();
        assert!(d >= 40.0 - 1e-9 && d <= 120.0 + 1e-9);
    }
}

#[test]
fn seeded_configs_are_reproducible() {
    let text = shrink(include_str!("../../systems/binary_rings.json5"));
    let a = load(&text).unwrap();
    let b = load(&text).unwrap();
    for (x, y) in a.orbiters().iter().zip(b.orbiters()) {
        assert_eq!(x.1, y.1);
    }
    assert_eq!(a.starfield().stars, b.starfield().stars);
}

#[test]
fn garbage_is_a_parse_error() {
    assert!(matches!(load("{ bodies: [ }"), Err(LoadError::Parse(_))));
    assert!(matches!(parse("[]"), Err(LoadError::Parse(_))));
}

#[test]
fn errors_say_what_is_wrong() {
    let err = load("{ stars: { min_radius: 10, max_radius: 5 } }").err().unwrap();
    assert!(err.to_string().contains("stars.min_radius"), "{}", err);
    let err = load(r#"{ bodies: ["pluto"] }"#).err().unwrap();
    assert_eq!(err.to_string(), "no prefab named `pluto`");
}
