//! Normal-map and hillshade PNGs, computed straight from the heightmap
//! (after filters, before triangulation) and independent of the mesh (§10.8).

use image::{Rgb, RgbImage};
use reliefmesh_core::Heightmap;

/// Central-difference gradient at `(x, y)`, clamped to the heightmap edges.
fn gradient(heightmap: &impl Heightmap, x: u32, y: u32, zscale: f64) -> (f64, f64) {
    let w = heightmap.width();
    let h = heightmap.height();
    let x0 = x.saturating_sub(1);
    let x1 = (x + 1).min(w - 1);
    let y0 = y.saturating_sub(1);
    let y1 = (y + 1).min(h - 1);

    let dz_dx = (heightmap.at(x1, y) - heightmap.at(x0, y)) * zscale / (x1 - x0).max(1) as f64;
    let dz_dy = (heightmap.at(x, y1) - heightmap.at(x, y0)) * zscale / (y1 - y0).max(1) as f64;
    (dz_dx, dz_dy)
}

fn surface_normal(heightmap: &impl Heightmap, x: u32, y: u32, zscale: f64) -> (f64, f64, f64) {
    let (dz_dx, dz_dy) = gradient(heightmap, x, y, zscale);
    let normal = (-dz_dx, -dz_dy, 1.0);
    let length = (normal.0 * normal.0 + normal.1 * normal.1 + normal.2 * normal.2).sqrt();
    (normal.0 / length, normal.1 / length, normal.2 / length)
}

pub fn normal_map(heightmap: &impl Heightmap, zscale: f64) -> RgbImage {
    let w = heightmap.width();
    let h = heightmap.height();
    let mut image = RgbImage::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let (nx, ny, nz) = surface_normal(heightmap, x, y, zscale);
            let encode = |n: f64| (((n + 1.0) * 0.5).clamp(0.0, 1.0) * 255.0) as u8;
            image.put_pixel(x, y, Rgb([encode(nx), encode(ny), encode(nz)]));
        }
    }
    image
}

/// Lambertian hillshade from a light source at `alt_deg` above the horizon
/// and `az_deg` clockwise from north.
pub fn hillshade(heightmap: &impl Heightmap, zscale: f64, alt_deg: f64, az_deg: f64) -> RgbImage {
    let alt = alt_deg.to_radians();
    let az = az_deg.to_radians();
    // Light direction in (x, y, z): north is -y (raster rows increase downward).
    let light = (
        az.sin() * alt.cos(),
        -az.cos() * alt.cos(),
        alt.sin(),
    );

    let w = heightmap.width();
    let h = heightmap.height();
    let mut image = RgbImage::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let (nx, ny, nz) = surface_normal(heightmap, x, y, zscale);
            let intensity = (nx * light.0 + ny * light.1 + nz * light.2).max(0.0);
            let shade = (intensity * 255.0) as u8;
            image.put_pixel(x, y, Rgb([shade, shade, shade]));
        }
    }
    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use reliefmesh_core::SampleGrid;

    #[test]
    fn flat_heightmap_has_a_purely_upward_normal() {
        let grid = SampleGrid::new(4, 4, vec![0.5; 16]);
        let image = normal_map(&grid, 1.0);
        let px = image.get_pixel(2, 2);
        assert_eq!(px.0[0], 127); // nx ~ 0 -> encoded 127 or 128
        assert_eq!(px.0[2], 255); // nz ~ 1 -> encoded 255
    }

    #[test]
    fn flat_heightmap_is_fully_lit_from_directly_above() {
        let grid = SampleGrid::new(4, 4, vec![0.5; 16]);
        let image = hillshade(&grid, 1.0, 90.0, 0.0);
        let px = image.get_pixel(2, 2);
        assert_eq!(px.0[0], 255);
    }
}
