/*!
Greedy Delaunay triangulation of rectangular heightmaps into error-bounded
triangle meshes, following Garland & Heckbert's "Fast Polygonal Approximation
of Terrains and Height Fields".

# Example

```rust
use reliefmesh_core::{triangulate, Bounds, SampleGrid};

let heights = vec![0.0, 0.0, 0.0, 1.0]; // 2x2, one corner raised
let grid = SampleGrid::new(2, 2, heights);
let bounds = Bounds { max_error: 0.01, max_triangles: 0, max_points: 0 };
let (points, triangles, error) = triangulate(&grid, bounds).unwrap();
assert_eq!(points.len(), 4);
assert_eq!(triangles.len(), 2);
assert_eq!(error, 0.0);
```
*/

mod candidate;
mod error;
mod geometry;
mod heightmap;
mod mesh;
mod queue;
mod refine;

pub use error::TriangulationError;
pub use heightmap::{Heightmap, SampleGrid, MAX_DIMENSION};
pub use refine::{Bounds, Triangulator};

/// A sample-grid pixel coordinate: `0 <= x < width`, `0 <= y < height`.
pub type Point = (u32, u32);

/// A triangle as three indices into the vertex list returned by [`triangulate`].
pub type Triangle = (usize, usize, usize);

/// Runs greedy Delaunay refinement to completion against `bounds` and returns
/// `(points, triangles, terminal_error)`.
///
/// `points` are `(x, y, z)` in pixel/elevation units; `z` is read from the
/// heightmap for each vertex. `triangles` are counter-clockwise index triples
/// into `points`. `terminal_error` is the candidate error of whichever
/// triangle would have been processed next (§4.2/§4.6).
///
/// # Errors
///
/// Returns [`TriangulationError::EmptyHeightmap`] if either dimension is
/// smaller than 2, or [`TriangulationError::HeightmapTooLarge`] if either
/// dimension exceeds [`MAX_DIMENSION`].
pub fn triangulate(
    heightmap: &impl Heightmap,
    bounds: Bounds,
) -> Result<(Vec<(Point, f64)>, Vec<Triangle>, f64), TriangulationError> {
    let mut triangulator = Triangulator::new(heightmap)?;
    let error = triangulator.run(bounds);
    Ok((triangulator.points(), triangulator.triangles(), error))
}
