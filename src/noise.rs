//! Coherent noise for the cube grids.
//!
//! Wraps classic Perlin gradient noise behind a seed type that accepts both the
//! integer seeds the `noise` crate uses and the `[0, 1)` fractions the scenes draw
//! from their random source at startup.

use ::noise::{NoiseFn, Perlin};

/// The permutation table hashes lattice corners modulo 256, so the field repeats
/// with this period along both axes.
const LATTICE_PERIOD: f64 = 256.0;

/// Errors from noise field construction
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NoiseError {
    #[error("seed {0} is not a finite number")]
    InvalidSeed(f64),
}

/// Seed for a [`NoiseField`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Seed {
    /// Real-valued seed. Values in `[0, 1)` are spread over 16 bits, other finite
    /// values are truncated to their integer magnitude.
    Fraction(f64),

    /// Integer seed, used as-is
    Integer(u32),
}

impl Seed {
    /// Resolve to the integer seed of the permutation table
    pub fn to_u32(self) -> Result<u32, NoiseError> {
        match self {
            Seed::Integer(seed) => Ok(seed),
            Seed::Fraction(seed) if !seed.is_finite() => Err(NoiseError::InvalidSeed(seed)),
            Seed::Fraction(seed) if (0.0..1.0).contains(&seed) => {
                Ok((seed * 65536.0).floor() as u32)
            }
            Seed::Fraction(seed) => Ok(seed.abs().floor().rem_euclid(4_294_967_296.0) as u32),
        }
    }
}

impl From<f64> for Seed {
    fn from(seed: f64) -> Self {
        Seed::Fraction(seed)
    }
}

impl From<u32> for Seed {
    fn from(seed: u32) -> Self {
        Seed::Integer(seed)
    }
}

/// Seeded 2D Perlin noise field
///
/// Immutable after construction, so it can be shared by reference across every
/// instance of a grid within a frame.
#[derive(Debug, Clone)]
pub struct NoiseField {
    perlin: Perlin,
    seed: u32,
}

impl NoiseField {
    /// Create a noise field from a seed
    pub fn new(seed: impl Into<Seed>) -> Result<Self, NoiseError> {
        let seed = seed.into().to_u32()?;
        Ok(Self {
            perlin: Perlin::new(seed),
            seed,
        })
    }

    /// Integer seed of the permutation table
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Sample 2D Perlin noise at position
    ///
    /// Returns value in range [-1, 1]. Non-finite coordinates yield NaN.
    pub fn sample_2d(&self, x: f32, y: f32) -> f32 {
        if !x.is_finite() || !y.is_finite() {
            return f32::NAN;
        }

        // Folding by a whole period keeps the fractional part and the hashed corner
        // unchanged, and keeps the corner index far from isize overflow.
        let x = (x as f64).rem_euclid(LATTICE_PERIOD);
        let y = (y as f64).rem_euclid(LATTICE_PERIOD);

        self.perlin.get([x, y]).clamp(-1.0, 1.0) as f32
    }
}
