//! The heightmap contract consumed by the triangulator.

/// Largest supported width or height.
///
/// The incircle determinant (see [`crate::geometry`]) sums squared pixel
/// differences in `i64` arithmetic; its worst-case magnitude is
/// `~4 * max(W,H)^4`. At this cap (`4 * 20_000^4 ≈ 6.4e17`) that stays well
/// under `i64::MAX` (`~9.2e18`), leaving headroom for the sum-of-products
/// structure of the determinant rather than widening to 128-bit arithmetic.
pub const MAX_DIMENSION: u32 = 20_000;

/// An immutable, rectangular grid of elevation samples in `[0, 1]`.
///
/// Implementations must be stable for the lifetime of a [`crate::Triangulator`]:
/// `width`/`height` never change, and `at(x, y)` always returns the same value
/// for a given `(x, y)`.
pub trait Heightmap {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Elevation at `(x, y)`, in `[0, 1]`. Panics if out of bounds.
    fn at(&self, x: u32, y: u32) -> f64;
}

/// A heightmap backed by an owned, row-major `f64` buffer.
///
/// This is the in-memory representation the CLI builds after decoding an
/// image and applying filters; it also backs the test suite so tests never
/// need real image fixtures.
#[derive(Debug, Clone)]
pub struct SampleGrid {
    width: u32,
    height: u32,
    samples: Vec<f64>,
}

impl SampleGrid {
    /// Builds a grid from row-major samples. Panics if `samples.len() != width * height`.
    pub fn new(width: u32, height: u32, samples: Vec<f64>) -> Self {
        assert_eq!(
            samples.len(),
            width as usize * height as usize,
            "sample buffer length must equal width * height"
        );
        Self {
            width,
            height,
            samples,
        }
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn samples_mut(&mut self) -> &mut [f64] {
        &mut self.samples
    }
}

impl Heightmap for SampleGrid {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn at(&self, x: u32, y: u32) -> f64 {
        self.samples[self.width as usize * y as usize + x as usize]
    }
}

impl<T: Heightmap + ?Sized> Heightmap for &T {
    fn width(&self) -> u32 {
        (**self).width()
    }

    fn height(&self) -> u32 {
        (**self).height()
    }

    fn at(&self, x: u32, y: u32) -> f64 {
        (**self).at(x, y)
    }
}
