//! Command-line argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::params::{DebugControls, DemoVariant, RecordingConfig, RenderConfig};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "cubefield")]
#[command(about = "Noise-animated cube grids rendered to PNG frames", long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Animate a demo grid and write its frames as PNG
    Record(RecordArgs),

    /// Write a grayscale image of the noise field
    Heightmap {
        /// Noise seed
        #[arg(long, default_value = "42")]
        seed: u32,

        /// Noise units per pixel
        #[arg(long, default_value = "0.05")]
        frequency: f32,

        /// Image width and height (pixels)
        #[arg(long, default_value = "512")]
        size: u32,

        /// Output PNG path
        #[arg(short, long, default_value = "heightmap.png")]
        output: PathBuf,
    },
}

#[derive(clap::Args, Debug)]
pub struct RecordArgs {
    /// Demo variant: single-colour (default), gradient, gradient-advanced, wall
    #[arg(long, value_name = "VARIANT", default_value = "single-colour")]
    pub variant: String,

    /// Duration to record (seconds)
    #[arg(long, value_name = "SECONDS", default_value = "4")]
    pub duration: f32,

    /// Frame rate
    #[arg(long, default_value = "30")]
    pub fps: u32,

    /// Output directory (frames land in <OUTPUT>/frames)
    #[arg(short, long, default_value = "recording")]
    pub output: PathBuf,

    /// Noise seed: a fraction in [0, 1) or an integer; random when omitted
    #[arg(long, allow_negative_numbers = true)]
    pub seed: Option<f64>,

    /// Seed for selection, footprint and colour draws; random when omitted
    #[arg(long)]
    pub rng_seed: Option<u64>,

    /// JSON palette file (array of colour schemes)
    #[arg(long, value_name = "FILE")]
    pub palette: Option<PathBuf>,

    /// Frame width (pixels)
    #[arg(long, default_value = "960")]
    pub width: u32,

    /// Frame height (pixels)
    #[arg(long, default_value = "540")]
    pub height: u32,

    /// Override lattice spacing (world units between cells)
    #[arg(long, allow_negative_numbers = true)]
    pub spacing: Option<f32>,

    /// Override noise scale
    #[arg(long)]
    pub noise_scale: Option<f32>,

    /// Override animation speed (noise units per second)
    #[arg(long, allow_negative_numbers = true)]
    pub animation_speed: Option<f32>,

    /// Override group position x
    #[arg(long, allow_negative_numbers = true)]
    pub group_x: Option<f32>,

    /// Override group position y
    #[arg(long, allow_negative_numbers = true)]
    pub group_y: Option<f32>,

    /// Override group rotation about x (radians)
    #[arg(long, allow_negative_numbers = true)]
    pub rotation_x: Option<f32>,

    /// Override group rotation about y (radians)
    #[arg(long, allow_negative_numbers = true)]
    pub rotation_y: Option<f32>,

    /// Override group rotation about z (radians)
    #[arg(long, allow_negative_numbers = true)]
    pub rotation_z: Option<f32>,
}

impl RecordArgs {
    /// Parse demo variant, falling back to the default on unknown names
    pub fn parse_variant(&self) -> DemoVariant {
        match DemoVariant::from_name(&self.variant) {
            Some(variant) => {
                tracing::info!(variant = variant.name(), "selected demo");
                variant
            }
            None => {
                let fallback = DemoVariant::default();
                tracing::warn!(
                    "unknown variant '{}', using {}",
                    self.variant,
                    fallback.name()
                );
                fallback
            }
        }
    }

    pub fn debug_controls(&self) -> DebugControls {
        DebugControls {
            spacing: self.spacing,
            noise_scale: self.noise_scale,
            animation_speed: self.animation_speed,
            group_x: self.group_x,
            group_y: self.group_y,
            rotation_x: self.rotation_x,
            rotation_y: self.rotation_y,
            rotation_z: self.rotation_z,
        }
    }

    pub fn recording_config(&self) -> RecordingConfig {
        RecordingConfig {
            fps: self.fps,
            output_dir: self.output.clone(),
            ..RecordingConfig::new(self.duration)
        }
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            width: self.width,
            height: self.height,
            ..RenderConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(args: &[&str]) -> RecordArgs {
        let argv = ["cubefield", "record"].into_iter().chain(args.iter().copied());
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Record(args) => args,
            other => panic!("expected record, got {other:?}"),
        }
    }

    #[test]
    fn test_record_defaults() {
        let args = record(&[]);
        assert_eq!(args.parse_variant(), DemoVariant::SingleColour);
        assert_eq!(args.seed, None);

        let recording = args.recording_config();
        assert_eq!(recording.fps, 30);
        assert_eq!(recording.total_frames(), 120);
        assert_eq!(recording.output_dir, PathBuf::from("recording"));

        let controls = args.debug_controls();
        assert!(controls.spacing.is_none() && controls.rotation_y.is_none());
    }

    #[test]
    fn test_record_overrides() {
        let args = record(&[
            "--variant",
            "Wall",
            "--seed",
            "0.42",
            "--group-x",
            "-3.5",
            "--noise-scale",
            "0.2",
            "--width",
            "320",
        ]);
        assert_eq!(args.parse_variant(), DemoVariant::Wall);
        assert_eq!(args.seed, Some(0.42));
        assert_eq!(args.debug_controls().group_x, Some(-3.5));
        assert_eq!(args.debug_controls().noise_scale, Some(0.2));
        assert_eq!(args.render_config().width, 320);
        assert_eq!(args.render_config().height, 540);
    }

    #[test]
    fn test_unknown_variant_falls_back() {
        let args = record(&["--variant", "plasma"]);
        assert_eq!(args.parse_variant(), DemoVariant::SingleColour);
    }

    #[test]
    fn test_heightmap_command() {
        let cli = Cli::try_parse_from(["cubefield", "-v", "heightmap", "--seed", "7", "--size", "128"])
            .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Heightmap { seed, size, .. } => {
                assert_eq!(seed, 7);
                assert_eq!(size, 128);
            }
            other => panic!("expected heightmap, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_subcommand_is_an_error() {
        assert!(Cli::try_parse_from(["cubefield"]).is_err());
    }
}
