//! Per-sample filters applied to the `[0, 1]` elevation buffer before
//! triangulation. Everything here except [`gaussian_blur`] is a direct
//! pass over the owned `f64` buffer; blur goes through `imageproc` on an
//! intermediate single-precision float image so smoothing happens at the
//! same precision the triangulator will later read.

use image::{ImageBuffer, Luma};
use imageproc::filter::gaussian_blur_f32;

use crate::heightmap::ImageHeightmap;

pub fn gaussian_blur(heightmap: &mut ImageHeightmap, sigma: f32) {
    let w = heightmap_width(heightmap);
    let h = heightmap_height(heightmap);

    let float_image: ImageBuffer<Luma<f32>, Vec<f32>> =
        ImageBuffer::from_raw(w, h, heightmap.samples().iter().map(|&z| z as f32).collect())
            .expect("sample buffer length matches width * height");

    let blurred = gaussian_blur_f32(&float_image, sigma);

    for (dst, src) in heightmap.samples_mut().iter_mut().zip(blurred.pixels()) {
        *dst = src.0[0] as f64;
    }
}

fn heightmap_width(heightmap: &ImageHeightmap) -> u32 {
    use reliefmesh_core::Heightmap;
    heightmap.width()
}

fn heightmap_height(heightmap: &ImageHeightmap) -> u32 {
    use reliefmesh_core::Heightmap;
    heightmap.height()
}

pub fn auto_level(samples: &mut [f64]) {
    let min = samples.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if range <= f64::EPSILON {
        return;
    }
    for z in samples.iter_mut() {
        *z = (*z - min) / range;
    }
}

pub fn apply_gamma(samples: &mut [f64], gamma: f64) {
    for z in samples.iter_mut() {
        *z = z.powf(gamma);
    }
}

pub fn invert(samples: &mut [f64]) {
    for z in samples.iter_mut() {
        *z = 1.0 - *z;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_level_stretches_to_unit_range() {
        let mut samples = vec![0.2, 0.4, 0.6];
        auto_level(&mut samples);
        assert_eq!(samples, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn auto_level_is_a_no_op_on_a_constant_buffer() {
        let mut samples = vec![0.5, 0.5, 0.5];
        auto_level(&mut samples);
        assert_eq!(samples, vec![0.5, 0.5, 0.5]);
    }

    #[test]
    fn gamma_one_is_a_no_op() {
        let mut samples = vec![0.1, 0.5, 0.9];
        let before = samples.clone();
        apply_gamma(&mut samples, 1.0);
        assert_eq!(samples, before);
    }

    #[test]
    fn invert_flips_the_range() {
        let mut samples = vec![0.0, 0.25, 1.0];
        invert(&mut samples);
        assert_eq!(samples, vec![1.0, 0.75, 0.0]);
    }
}
