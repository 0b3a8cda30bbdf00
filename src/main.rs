//! # Voxel Forge Demo Entry Point
//!
//! Builds a demo scene and runs a few headless frames over it.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release -- [config.json]
//! ```
//!
//! Without a path the built-in default scene is used. Set `RUST_LOG=debug` to see
//! per-rebuild statistics.

use log::info;
use voxel_forge::demo::{self, DemoConfig};

fn main() -> anyhow::Result<()> {
    voxel_forge::init_logger();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            info!("Loading demo config from {}", path);
            DemoConfig::load(path)?
        }
        None => DemoConfig::default(),
    };

    demo::run(&config)
}
