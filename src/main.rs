//! Cubefield - noise-animated cube grids
//!
//! Builds one of the demo grids, advances it at a fixed frame rate and writes
//! every frame to disk, or dumps the raw noise field as a heightmap.

use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

use cubefield::cli::{Cli, Commands, RecordArgs};
use cubefield::noise::{NoiseField, Seed};
use cubefield::palette::Palette;
use cubefield::rendering::{render_heightmap, RenderSystem};
use cubefield::scene::RenderContext;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Record(args) => record(&args),
        Commands::Heightmap {
            seed,
            frequency,
            size,
            output,
        } => {
            let noise = NoiseField::new(seed)?;
            render_heightmap(&noise, size, frequency)
                .save(&output)
                .with_context(|| format!("writing {}", output.display()))?;
            tracing::info!(path = %output.display(), size, "heightmap saved");
            Ok(())
        }
    }
}

/// Run the frame loop and write one PNG per frame
fn record(args: &RecordArgs) -> anyhow::Result<()> {
    let variant = args.parse_variant();
    let mut preset = variant.preset();
    args.debug_controls().apply(&mut preset);

    let recording = args.recording_config();
    let frames_dir = recording.frames_dir();
    std::fs::create_dir_all(&frames_dir)
        .with_context(|| format!("creating {}", frames_dir.display()))?;

    let mut rng = match args.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let seed = Seed::from(args.seed.unwrap_or_else(|| rng.gen::<f64>()));

    let palette = args.palette.as_ref().map(Palette::load_or_builtin);

    let mut context = RenderContext::setup(preset, seed, palette.as_ref(), &mut rng)
        .context("setting up scene")?;

    let render_config = args.render_config();
    let aspect = render_config.aspect_ratio();
    let mut renderer = RenderSystem::new(render_config);

    let total = recording.total_frames();
    tracing::info!(
        variant = variant.name(),
        frames = total,
        fps = recording.fps,
        dir = %frames_dir.display(),
        "recording"
    );

    for frame in 0..total {
        context.tick(recording.frame_time(frame));
        renderer.render(&context.frame(aspect));

        let path = recording.frame_path(frame);
        renderer
            .save_frame(&path)
            .with_context(|| format!("writing {}", path.display()))?;

        if frame % recording.fps.max(1) as usize == 0 {
            tracing::debug!(frame, total, "frame saved");
        }
    }

    tracing::info!(frames = total, "recording complete");
    Ok(())
}
