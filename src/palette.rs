//! Colour schemes for palette-driven grids.
//!
//! A palette file is a JSON array of schemes, each scheme an array of hex colour
//! strings:
//!
//! ```json
//! [["#69d2e7", "#a7dbd8", "#e0e4cc"], ["#fe4365", "#fc9d9a"]]
//! ```

use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Colours used when no palette resource is available
pub const DEFAULT_SCHEME: [&str; 5] = ["#ffe66d", "#ff6b6b", "#4ecdc4", "#1a535c", "#f7fff7"];

/// Errors from palette parsing and loading
#[derive(Debug, thiserror::Error)]
pub enum PaletteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid colour {0:?}")]
    InvalidColour(String),
    #[error("colour scheme {0} is empty")]
    EmptyScheme(usize),
    #[error("palette has no colour schemes")]
    Empty,
}

/// 8-bit sRGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Colour {
    pub const WHITE: Colour = Colour::rgb(0xff, 0xff, 0xff);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `#rgb` (leading `#` optional)
    pub fn from_hex(text: &str) -> Result<Self, PaletteError> {
        let invalid = || PaletteError::InvalidColour(text.to_string());
        let digits = text.trim().trim_start_matches('#');
        if !digits.is_ascii() {
            return Err(invalid());
        }

        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        match digits.len() {
            6 => Ok(Self::rgb(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            3 => {
                // #abc is shorthand for #aabbcc
                let short = |s: &str| channel(s).map(|v| v * 17);
                Ok(Self::rgb(
                    short(&digits[0..1])?,
                    short(&digits[1..2])?,
                    short(&digits[2..3])?,
                ))
            }
            _ => Err(invalid()),
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Linear interpolation in sRGB space, as a canvas gradient does
    pub fn lerp(self, other: Colour, t: f32) -> Colour {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Colour::rgb(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
        )
    }

    /// Multiply every channel by `factor` (clamped to [0, 1])
    pub fn shade(self, factor: f32) -> Colour {
        let factor = factor.clamp(0.0, 1.0);
        let scale = |c: u8| (c as f32 * factor).round() as u8;
        Colour::rgb(scale(self.r), scale(self.g), scale(self.b))
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        [self.r, self.g, self.b, 0xff]
    }
}

impl TryFrom<String> for Colour {
    type Error = PaletteError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        Colour::from_hex(&text)
    }
}

impl From<Colour> for String {
    fn from(colour: Colour) -> Self {
        colour.to_hex()
    }
}

/// Ordered collection of colour schemes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette {
    schemes: Vec<Vec<Colour>>,
}

impl Palette {
    /// Build a palette, rejecting empty palettes and empty schemes
    pub fn new(schemes: Vec<Vec<Colour>>) -> Result<Self, PaletteError> {
        if schemes.is_empty() {
            return Err(PaletteError::Empty);
        }
        if let Some(index) = schemes.iter().position(Vec::is_empty) {
            return Err(PaletteError::EmptyScheme(index));
        }
        Ok(Self { schemes })
    }

    /// Built-in single-scheme palette
    pub fn builtin() -> Self {
        let scheme = DEFAULT_SCHEME
            .iter()
            .map(|hex| Colour::from_hex(hex).unwrap_or(Colour::WHITE))
            .collect();
        Self {
            schemes: vec![scheme],
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, PaletteError> {
        let palette: Palette = serde_json::from_str(json)?;
        Self::new(palette.schemes)
    }

    /// Load a palette from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PaletteError> {
        let data = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&data)
    }

    /// Load a palette, falling back to [`Palette::builtin`] with a warning
    pub fn load_or_builtin(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(palette) => {
                tracing::debug!(
                    path = %path.display(),
                    schemes = palette.len(),
                    "loaded colour palette"
                );
                palette
            }
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "could not load colour palette, using built-in colours"
                );
                Self::builtin()
            }
        }
    }

    pub fn schemes(&self) -> &[Vec<Colour>] {
        &self.schemes
    }

    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }

    /// Pick one scheme uniformly at random
    pub fn choose_scheme<R: Rng + ?Sized>(&self, rng: &mut R) -> &[Colour] {
        self.schemes
            .choose(rng)
            .map(Vec::as_slice)
            .unwrap_or(&[Colour::WHITE])
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::io::Write;

    #[test]
    fn test_parse_long_and_short_hex() {
        assert_eq!(Colour::from_hex("#ff6b6b").unwrap(), Colour::rgb(255, 107, 107));
        assert_eq!(Colour::from_hex("1a535c").unwrap(), Colour::rgb(0x1a, 0x53, 0x5c));
        assert_eq!(Colour::from_hex("#fa0").unwrap(), Colour::rgb(0xff, 0xaa, 0x00));
    }

    #[test]
    fn test_reject_bad_hex() {
        for bad in ["", "#12", "#12345", "#gggggg", "#ééé"] {
            assert!(
                matches!(Colour::from_hex(bad), Err(PaletteError::InvalidColour(_))),
                "{bad:?} should not parse"
            );
        }
    }

    #[test]
    fn test_hex_round_trip_through_serde() {
        let colour = Colour::rgb(0x4e, 0xcd, 0xc4);
        let json = serde_json::to_string(&colour).unwrap();
        assert_eq!(json, "\"#4ecdc4\"");
    }

    #[test]
    fn test_lerp_endpoints() {
        let a = Colour::rgb(0, 0, 0);
        let b = Colour::rgb(200, 100, 50);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Colour::rgb(100, 50, 25));
    }

    #[test]
    fn test_palette_from_json() {
        let palette =
            Palette::from_json_str(r##"[["#69d2e7", "#a7dbd8"], ["#fe4365"]]"##).unwrap();
        assert_eq!(palette.len(), 2);
        assert_eq!(palette.schemes()[1], vec![Colour::rgb(0xfe, 0x43, 0x65)]);
    }

    #[test]
    fn test_palette_rejects_empty() {
        assert!(matches!(
            Palette::from_json_str("[]"),
            Err(PaletteError::Empty)
        ));
        assert!(matches!(
            Palette::from_json_str(r##"[["#ffffff"], []]"##),
            Err(PaletteError::EmptyScheme(1))
        ));
        assert!(matches!(
            Palette::from_json_str(r##"[["#nothex"]]"##),
            Err(PaletteError::Json(_))
        ));
    }

    #[test]
    fn test_builtin_palette() {
        let palette = Palette::builtin();
        assert_eq!(palette.len(), 1);
        assert_eq!(palette.schemes()[0].len(), DEFAULT_SCHEME.len());
        assert_eq!(palette.schemes()[0][0], Colour::rgb(0xff, 0xe6, 0x6d));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r##"[["#000000", "#ffffff"]]"##).unwrap();

        let palette = Palette::load(file.path()).unwrap();
        assert_eq!(palette.schemes()[0][1], Colour::WHITE);
    }

    #[test]
    fn test_missing_file_falls_back_to_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let palette = Palette::load_or_builtin(dir.path().join("missing.json"));
        assert_eq!(palette, Palette::builtin());
    }

    #[test]
    fn test_choose_scheme_from_palette() {
        let palette =
            Palette::from_json_str(r##"[["#000000"], ["#ffffff"], ["#ff0000"]]"##).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            let scheme = palette.choose_scheme(&mut rng);
            assert!(palette.schemes().iter().any(|s| s.as_slice() == scheme));
        }
    }
}
