//! Ring Burst entry point
//!
//! Native builds run the simulation headless against a recording surface.
//! The browser build mounts itself through `platform::web::mount` instead.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::Parser;
    use serde::Serialize;

    use ring_burst::Settings;
    use ring_burst::platform::{Driver, FixedRateTicker, TickSource};
    use ring_burst::renderer::{RecordingSurface, RenderStyle, Renderer};
    use ring_burst::sim::{Snapshot, Viewport, World};

    #[derive(Parser, Debug)]
    #[command(about = "Run the ring burst simulation headless", version)]
    struct Args {
        /// RNG seed (random if omitted)
        #[arg(long)]
        seed: Option<u64>,
        /// Number of frames to simulate
        #[arg(long, default_value_t = 3600)]
        ticks: u64,
        /// Surface width in physical pixels
        #[arg(long, default_value_t = 1280.0)]
        width: f32,
        /// Surface height in physical pixels
        #[arg(long, default_value_t = 720.0)]
        height: f32,
        /// Device pixel ratio
        #[arg(long, default_value_t = 1.0)]
        scale: f32,
        /// JSON settings file overriding the defaults
        #[arg(long)]
        settings: Option<PathBuf>,
        /// Pace frames at the nominal display rate instead of as fast as possible
        #[arg(long)]
        realtime: bool,
        /// Print the final world state as JSON
        #[arg(long)]
        json: bool,
    }

    #[derive(Serialize)]
    struct Report<'a> {
        seed: u64,
        frames: u64,
        draw_calls_last_frame: usize,
        world: Snapshot<'a>,
    }

    pub fn run() -> Result<()> {
        env_logger::init();
        let args = Args::parse();

        let settings = match &args.settings {
            Some(path) => Settings::load(path)
                .with_context(|| format!("loading settings from {}", path.display()))?,
            None => Settings::default(),
        };

        let seed = args.seed.unwrap_or_else(rand::random);
        let viewport = Viewport::from_physical(args.width, args.height, args.scale);
        log::info!(
            "Ring Burst (native) starting: seed {}, {}x{} logical",
            seed,
            viewport.width,
            viewport.height
        );

        let renderer = Renderer::new(RenderStyle::from_settings(&settings));
        let world = World::with_seed(seed, settings, viewport);
        let mut driver = Driver::new(world, renderer, RecordingSurface::new(viewport));

        let mut ticker: Box<dyn TickSource> = if args.realtime {
            Box::new(FixedRateTicker::nominal().with_limit(args.ticks))
        } else {
            Box::new(FixedRateTicker::unpaced().with_limit(args.ticks))
        };
        let frames = driver.run(ticker.as_mut());

        let world = driver.world();
        log::info!(
            "{} of {} rings shattered after {} frames",
            world.rings().len() - world.active_rings(),
            world.rings().len(),
            frames
        );

        if args.json {
            let report = Report {
                seed,
                frames,
                draw_calls_last_frame: driver.surface().commands.len(),
                world: world.snapshot(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::mount, this is just to satisfy the compiler
}
