//! Rendering and recording configuration.

use std::path::PathBuf;

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Frame width (pixels)
    pub width: u32,

    /// Frame height (pixels)
    pub height: u32,

    /// Resolution of cached gradient textures (pixels per side)
    pub texture_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 960,
            height: 540,
            texture_size: 64,
        }
    }
}

impl RenderConfig {
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Recording mode configuration
#[derive(Debug, Clone)]
pub struct RecordingConfig {
    /// Duration to record (seconds)
    pub duration_secs: f32,

    /// Output directory for frames
    pub output_dir: PathBuf,

    /// Frame rate (FPS)
    pub fps: u32,
}

impl RecordingConfig {
    pub fn new(duration_secs: f32) -> Self {
        Self {
            duration_secs,
            output_dir: PathBuf::from("recording"),
            fps: 60,
        }
    }

    /// Total number of frames to capture
    pub fn total_frames(&self) -> usize {
        (self.duration_secs * self.fps as f32).ceil().max(0.0) as usize
    }

    /// Elapsed scene time at the start of a frame (seconds)
    pub fn frame_time(&self, frame: usize) -> f32 {
        frame as f32 / self.fps.max(1) as f32
    }

    /// Frame directory path
    pub fn frames_dir(&self) -> PathBuf {
        self.output_dir.join("frames")
    }

    /// Path of one frame image
    pub fn frame_path(&self, frame: usize) -> PathBuf {
        self.frames_dir().join(format!("frame_{frame:05}.png"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_frame_count_and_times() {
        let config = RecordingConfig {
            fps: 30,
            ..RecordingConfig::new(2.5)
        };
        assert_eq!(config.total_frames(), 75);
        assert_eq!(config.frame_time(0), 0.0);
        assert_eq!(config.frame_time(45), 1.5);
    }

    #[test]
    fn test_frame_paths() {
        let config = RecordingConfig::new(1.0);
        assert_eq!(
            config.frame_path(12),
            PathBuf::from("recording").join("frames").join("frame_00012.png")
        );
    }
}
