//! Turns the triangulator's pixel-indexed output into a physical-unit mesh:
//! rescaling, UV assignment, and optional solid-base extrusion.

use reliefmesh_core::{Point, Triangle};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: (f64, f64, f64),
    pub uv: (f64, f64),
}

pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub triangles: Vec<Triangle>,
}

/// Maps pixel-indexed `(points, triangles)` to physical units (§10.5) and
/// assigns UVs in `[0,1]` normalised space (§10.6).
pub fn rescale(
    points: &[(Point, f64)],
    triangles: &[Triangle],
    width: u32,
    height: u32,
    xsize: f64,
    ysize: f64,
    zscale: f64,
) -> Mesh {
    let x_denom = (width.max(2) - 1) as f64;
    let y_denom = (height.max(2) - 1) as f64;

    let vertices = points
        .iter()
        .map(|&((x, y), z)| {
            let px = x as f64 / x_denom * xsize;
            let py = y as f64 / y_denom * ysize;
            Vertex {
                position: (px, py, z * zscale),
                uv: (px / xsize, py / ysize),
            }
        })
        .collect();

    Mesh {
        vertices,
        triangles: triangles.to_vec(),
    }
}

/// Extrudes the mesh's hull (always the input rectangle's boundary, per
/// §10.7) into a closed solid: a bottom plane at `z = -base`, side walls,
/// and a triangulated bottom face.
pub fn add_solid_base(mesh: &mut Mesh, base: f64) {
    if base <= 0.0 {
        return;
    }

    let hull = boundary_loop(mesh);
    if hull.len() < 3 {
        return;
    }

    let lowest_z = mesh
        .vertices
        .iter()
        .map(|v| v.position.2)
        .fold(f64::INFINITY, f64::min);
    let floor_z = lowest_z - base;

    let mut bottom_indices = Vec::with_capacity(hull.len());
    for &top_index in &hull {
        let top = mesh.vertices[top_index];
        bottom_indices.push(mesh.vertices.len());
        mesh.vertices.push(Vertex {
            position: (top.position.0, top.position.1, floor_z),
            uv: top.uv,
        });
    }

    let n = hull.len();
    for i in 0..n {
        let j = (i + 1) % n;
        let top_a = hull[i];
        let top_b = hull[j];
        let bottom_a = bottom_indices[i];
        let bottom_b = bottom_indices[j];
        // Outward-facing quad between top_a-top_b (ccw on the top surface)
        // and its downward twin, split into two ccw triangles.
        mesh.triangles.push((top_a, bottom_a, bottom_b));
        mesh.triangles.push((top_a, bottom_b, top_b));
    }

    // Fan the floor from the first boundary vertex; floor faces downward (-z)
    // so its winding is reversed relative to the top fan order.
    for i in 1..n - 1 {
        mesh.triangles.push((bottom_indices[0], bottom_indices[i + 1], bottom_indices[i]));
    }
}

/// Recovers the hull vertex order by walking boundary half-edges
/// (`twin() == None`). Rebuilds the half-edge map from the triangle list
/// rather than threading the core's internal `Mesh` type across the crate
/// boundary.
fn boundary_loop(mesh: &Mesh) -> Vec<usize> {
    use std::collections::BTreeMap;
    use std::collections::BTreeSet;

    let mut edges: BTreeSet<(usize, usize)> = BTreeSet::new();
    for &(a, b, c) in &mesh.triangles {
        edges.insert((a, b));
        edges.insert((b, c));
        edges.insert((c, a));
    }

    let mut next_of: BTreeMap<usize, usize> = BTreeMap::new();
    for &(a, b) in &edges {
        if !edges.contains(&(b, a)) {
            next_of.insert(a, b);
        }
    }

    let Some((&start, _)) = next_of.iter().next() else {
        return Vec::new();
    };

    let mut loop_vertices = vec![start];
    let mut current = start;
    loop {
        match next_of.get(&current) {
            Some(&next) if next != start => {
                loop_vertices.push(next);
                current = next;
            }
            _ => break,
        }
    }
    loop_vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rescale_maps_corners_to_requested_physical_size() {
        let points = vec![((0u32, 0u32), 0.0), ((9, 0), 0.0), ((9, 9), 1.0), ((0, 9), 1.0)];
        let triangles = vec![(0usize, 1usize, 2usize), (2, 3, 0)];
        let mesh = rescale(&points, &triangles, 10, 10, 100.0, 50.0, 20.0);
        assert_eq!(mesh.vertices[0].position, (0.0, 0.0, 0.0));
        assert_eq!(mesh.vertices[1].position, (100.0, 0.0, 0.0));
        assert_eq!(mesh.vertices[2].position, (100.0, 50.0, 20.0));
        assert_eq!(mesh.vertices[0].uv, (0.0, 0.0));
        assert_eq!(mesh.vertices[2].uv, (1.0, 1.0));
    }

    #[test]
    fn solid_base_adds_a_bottom_vertex_per_hull_vertex() {
        let points = vec![((0u32, 0u32), 0.5), ((1, 0), 0.5), ((1, 1), 0.5), ((0, 1), 0.5)];
        let triangles = vec![(1usize, 2usize, 0usize), (2, 3, 0)];
        let mut mesh = rescale(&points, &triangles, 2, 2, 1.0, 1.0, 1.0);
        let top_vertex_count = mesh.vertices.len();
        add_solid_base(&mut mesh, 0.5);
        assert_eq!(mesh.vertices.len(), top_vertex_count * 2);
        assert!(mesh.vertices.iter().any(|v| v.position.2 < 0.0));
    }

    #[test]
    fn zero_base_leaves_the_mesh_unchanged() {
        let points = vec![((0u32, 0u32), 0.5), ((1, 0), 0.5), ((1, 1), 0.5), ((0, 1), 0.5)];
        let triangles = vec![(1usize, 2usize, 0usize), (2, 3, 0)];
        let mut mesh = rescale(&points, &triangles, 2, 2, 1.0, 1.0, 1.0);
        let before = mesh.vertices.len();
        add_solid_base(&mut mesh, 0.0);
        assert_eq!(mesh.vertices.len(), before);
    }
}
