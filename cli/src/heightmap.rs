//! Image-backed heightmap construction and the pre-triangulation filter chain.

use anyhow::{Context, Result};
use image::GrayImage;
use reliefmesh_core::{Heightmap, MAX_DIMENSION};

use crate::cli::Cli;

/// A heightmap backed by an owned `f64` sample buffer, built from a decoded
/// image and the filter chain in [`apply_filters`].
pub struct ImageHeightmap {
    width: u32,
    height: u32,
    samples: Vec<f64>,
}

impl ImageHeightmap {
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let image = image::open(path).with_context(|| format!("failed to decode {}", path.display()))?;
        let gray = image.to_luma8();
        Self::from_gray(&gray)
    }

    fn from_gray(gray: &GrayImage) -> Result<Self> {
        let width = gray.width();
        let height = gray.height();
        anyhow::ensure!(
            width <= MAX_DIMENSION && height <= MAX_DIMENSION,
            "heightmap {}x{} exceeds the supported maximum dimension of {}",
            width,
            height,
            MAX_DIMENSION
        );
        let samples = gray.pixels().map(|p| p.0[0] as f64 / 255.0).collect();
        Ok(ImageHeightmap { width, height, samples })
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn samples_mut(&mut self) -> &mut [f64] {
        &mut self.samples
    }

    pub fn resize_with_border(&self, border_size: u32, border_height: f64) -> Self {
        if border_size == 0 {
            return ImageHeightmap {
                width: self.width,
                height: self.height,
                samples: self.samples.clone(),
            };
        }
        let new_width = self.width + 2 * border_size;
        let new_height = self.height + 2 * border_size;
        let mut samples = vec![border_height; new_width as usize * new_height as usize];
        for y in 0..self.height {
            for x in 0..self.width {
                let dst_x = x + border_size;
                let dst_y = y + border_size;
                samples[(dst_y * new_width + dst_x) as usize] = self.at(x, y);
            }
        }
        ImageHeightmap {
            width: new_width,
            height: new_height,
            samples,
        }
    }
}

impl Heightmap for ImageHeightmap {
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

/// Applies the optional pre-triangulation filter chain, in the order fixed
/// by the CLI surface: border pad, blur, auto-level, gamma, invert.
pub fn apply_filters(mut heightmap: ImageHeightmap, cli: &Cli) -> Result<ImageHeightmap> {
    if cli.border_size > 0 {
        log::info!(
            "padding with a {}px border at height {}",
            cli.border_size,
            cli.border_height
        );
        heightmap = heightmap.resize_with_border(cli.border_size, cli.border_height);
    }

    if cli.blur > 0.0 {
        log::info!("applying gaussian blur (sigma = {})", cli.blur);
        crate::filters::gaussian_blur(&mut heightmap, cli.blur as f32);
    }

    if cli.level {
        log::info!("auto-levelling sample range");
        crate::filters::auto_level(heightmap.samples_mut());
    }

    if (cli.gamma - 1.0).abs() > f64::EPSILON {
        anyhow::ensure!(cli.gamma > 0.0, crate::error::CliError::NonPositiveGamma(cli.gamma));
        log::info!("applying gamma curve (gamma = {})", cli.gamma);
        crate::filters::apply_gamma(heightmap.samples_mut(), cli.gamma);
    }

    if cli.invert {
        log::info!("inverting elevations");
        crate::filters::invert(heightmap.samples_mut());
    }

    Ok(heightmap)
}
