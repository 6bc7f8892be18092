mod camera;
mod shading;
mod state;
use state::State;

use ggez::{
    conf::{Conf, WindowMode, WindowSetup},
    event, ContextBuilder, GameError, GameResult,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

pub fn main() -> GameResult {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,gfx_device_gl=warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let path_to_system = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "systems/sol.json5".to_string());
    info!(path = %path_to_system, "loading solar system");
    let contents = std::fs::read_to_string(&path_to_system)
        .map_err(|e| GameError::ResourceLoadError(format!("{}: {}", path_to_system, e)))?;
    let system = loader::load(&contents)
        .map_err(|e| GameError::ResourceLoadError(format!("{}: {}", path_to_system, e)))?;

    let c = Conf::new();
    let (ref mut ctx, ref mut event_loop) = ContextBuilder::new("orrery", "gamma-delta")
        .conf(c)
        .window_setup(WindowSetup {
            title: "Orrery".to_owned(),
            ..Default::default()
        })
        .window_mode(WindowMode {
            resizable: true,
            ..Default::default()
        })
        .build()?;

    let state = &mut State::new(ctx, system)?;

    event::run(ctx, event_loop, state)
}
