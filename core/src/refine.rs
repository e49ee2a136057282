//! The refinement control loop: initial triangulation, point insertion,
//! Delaunay restoration by edge flipping, and the three termination bounds.

use crate::candidate::find_candidate;
use crate::error::TriangulationError;
use crate::geometry::{in_circumcircle, signed_area};
use crate::heightmap::{Heightmap, MAX_DIMENSION};
use crate::mesh::{Mesh, SlotStrategy};
use crate::queue::CandidateQueue;
use crate::Point;

/// Optional termination bounds for [`Triangulator::run`]. `0` means unbounded
/// for `max_triangles`/`max_points`; `max_error` is always an active bound.
#[derive(Debug, Clone, Copy)]
pub struct Bounds {
    pub max_error: f64,
    pub max_triangles: usize,
    pub max_points: usize,
}

impl Default for Bounds {
    fn default() -> Self {
        Bounds {
            max_error: 0.0,
            max_triangles: 0,
            max_points: 0,
        }
    }
}

#[derive(Debug)]
pub struct Triangulator<H> {
    heightmap: H,
    mesh: Mesh,
    queue: CandidateQueue,
}

impl<H: Heightmap> Triangulator<H> {
    pub fn new(heightmap: H) -> Result<Self, TriangulationError> {
        let width = heightmap.width();
        let height = heightmap.height();

        if width < 2 || height < 2 {
            return Err(TriangulationError::EmptyHeightmap);
        }
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(TriangulationError::HeightmapTooLarge { width, height });
        }

        let mut mesh = Mesh::new();
        let a = mesh.add_vertex((0, 0));
        let b = mesh.add_vertex((width - 1, 0));
        let c = mesh.add_vertex((width - 1, height - 1));
        let d = mesh.add_vertex((0, height - 1));

        // Split the rectangle along the c-a diagonal into two ccw triangles.
        let t0 = mesh.set_triangle((c, a, d), None, None, None, SlotStrategy::Append);
        let t0_base = t0 * 3;
        let _t1 = mesh.set_triangle((a, c, b), Some(t0_base), None, None, SlotStrategy::Append);

        let mut triangulator = Triangulator {
            heightmap,
            mesh,
            queue: CandidateQueue::new(),
        };
        triangulator.finalize_new_triangle(t0);
        triangulator.finalize_new_triangle(_t1);

        Ok(triangulator)
    }

    pub fn points(&self) -> Vec<(Point, f64)> {
        self.mesh
            .vertices()
            .iter()
            .map(|&p| (p, self.heightmap.at(p.0, p.1)))
            .collect()
    }

    pub fn triangles(&self) -> Vec<(usize, usize, usize)> {
        self.mesh.snapshot_triangles()
    }

    /// Runs the refinement loop until a termination bound is met or the
    /// queue drains. Returns the reported terminal error (§4.2, §4.6).
    pub fn run(&mut self, bounds: Bounds) -> f64 {
        loop {
            let mesh = &self.mesh;
            let top = self
                .queue
                .pop_valid(|slot, generation| mesh.generation(slot) == generation);

            let (slot, error) = match top {
                Some(entry) => entry,
                None => return 0.0,
            };

            if error <= bounds.max_error {
                return error;
            }
            if bounds.max_triangles > 0 && self.mesh.triangle_slot_count() >= bounds.max_triangles {
                return error;
            }
            if bounds.max_points > 0 && self.mesh.vertex_count() >= bounds.max_points {
                return error;
            }

            self.step(slot);
        }
    }

    fn finalize_new_triangle(&mut self, slot: usize) {
        let (pa, pb, pc) = self.mesh.triangle_points(slot);
        let candidate = find_candidate(&self.heightmap, pa, pb, pc);
        self.mesh.set_candidate(slot, candidate);
        self.queue.push(slot, self.mesh.generation(slot), candidate.error);
    }

    fn step(&mut self, slot: usize) {
        let (va, vb, vc) = self.mesh.triangle_vertices(slot);
        let (pa, pb, pc) = self.mesh.triangle_points(slot);
        let candidate_point = self.mesh.candidate(slot).point;
        let new_vertex = self.mesh.add_vertex(candidate_point);

        let base = slot * 3;
        if signed_area(pa, pb, candidate_point) == 0 {
            self.split_on_edge(new_vertex, base);
        } else if signed_area(pb, pc, candidate_point) == 0 {
            self.split_on_edge(new_vertex, base + 1);
        } else if signed_area(pc, pa, candidate_point) == 0 {
            self.split_on_edge(new_vertex, base + 2);
        } else {
            self.split_interior(slot, new_vertex, (va, vb, vc));
        }
    }

    /// Interior candidate: fan triangle `t` into three new triangles around `new_vertex`.
    fn split_interior(&mut self, slot: usize, new_vertex: usize, (va, vb, vc): (usize, usize, usize)) {
        let base = slot * 3;
        let he_ab = self.mesh.half_edge(base);
        let he_bc = self.mesh.half_edge(base + 1);
        let he_ca = self.mesh.half_edge(base + 2);

        let t0 = self
            .mesh
            .set_triangle((va, vb, new_vertex), he_ab, None, None, SlotStrategy::Overwrite(slot));
        let t0_base = t0 * 3;
        let t1 = self
            .mesh
            .set_triangle((vb, vc, new_vertex), he_bc, None, Some(t0_base + 1), SlotStrategy::Append);
        let t1_base = t1 * 3;
        let t2 = self.mesh.set_triangle(
            (vc, va, new_vertex),
            he_ca,
            Some(t0_base + 2),
            Some(t1_base + 1),
            SlotStrategy::Append,
        );

        self.finalize_new_triangle(t0);
        self.finalize_new_triangle(t1);
        self.finalize_new_triangle(t2);

        self.legalize(vec![t0_base, t1_base, t2 * 3]);
    }

    /// Candidate lies on the edge at half-edge `edge_he` of its triangle (shared with
    /// a neighbour across `twin(edge_he)`, or a hull edge if there is none).
    fn split_on_edge(&mut self, new_vertex: usize, edge_he: usize) {
        let base = edge_he - edge_he % 3;
        let left_he = Mesh::next(edge_he); // origin = far endpoint "b"
        let right_he = Mesh::prev(edge_he); // origin = far endpoint "a"

        // Vertices named to match the edge endpoints and the opposite apex.
        let v_a = self.vertex_at(right_he);
        let v_b = self.vertex_at(left_he);
        let v_collinear = self.vertex_at(edge_he);

        let he_a = self.mesh.half_edge(right_he);
        let he_b = self.mesh.half_edge(left_he);

        match self.mesh.half_edge(edge_he) {
            Some(twin) => {
                let adjacent_base = twin - twin % 3;
                let adjacent_left_he = Mesh::prev(twin);
                let adjacent_right_he = Mesh::next(twin);
                let v1 = self.vertex_at(adjacent_left_he);
                let he_adjacent_left = self.mesh.half_edge(adjacent_left_he);
                let he_adjacent_right = self.mesh.half_edge(adjacent_right_he);

                let t0 = self.mesh.set_triangle(
                    (v_b, v_collinear, new_vertex),
                    he_b,
                    None,
                    None,
                    SlotStrategy::Overwrite(base / 3),
                );
                let t0_base = t0 * 3;
                let t1 = self.mesh.set_triangle(
                    (v_collinear, v1, new_vertex),
                    he_adjacent_right,
                    None,
                    Some(t0_base + 1),
                    SlotStrategy::Overwrite(adjacent_base / 3),
                );
                let t1_base = t1 * 3;
                let t2 = self.mesh.set_triangle(
                    (v1, v_a, new_vertex),
                    he_adjacent_left,
                    Some(t1_base + 1),
                    None,
                    SlotStrategy::Append,
                );
                let t2_base = t2 * 3;
                let t3 = self.mesh.set_triangle(
                    (v_a, v_b, new_vertex),
                    he_a,
                    Some(t0_base + 2),
                    Some(t2_base + 1),
                    SlotStrategy::Append,
                );

                self.finalize_new_triangle(t0);
                self.finalize_new_triangle(t1);
                self.finalize_new_triangle(t2);
                self.finalize_new_triangle(t3);

                self.legalize(vec![t0_base, t1_base, t2_base, t3 * 3]);
            }
            None => {
                let t0 = self.mesh.set_triangle(
                    (new_vertex, v_b, v_collinear),
                    None,
                    he_b,
                    None,
                    SlotStrategy::Overwrite(base / 3),
                );
                let t0_base = t0 * 3;
                let t1 = self.mesh.set_triangle(
                    (v_b, new_vertex, v_a),
                    Some(t0_base),
                    None,
                    he_a,
                    SlotStrategy::Append,
                );
                let t1_base = t1 * 3;

                self.finalize_new_triangle(t0);
                self.finalize_new_triangle(t1);

                self.legalize(vec![t0_base + 1, t1_base + 2]);
            }
        }
    }

    fn vertex_at(&self, he: usize) -> usize {
        let slot = he / 3;
        let k = he % 3;
        let (a, b, c) = self.mesh.triangle_vertices(slot);
        match k {
            0 => a,
            1 => b,
            _ => c,
        }
    }

    /// Iteratively checks and flips half-edges until the stack drains,
    /// restoring the local Delaunay property around the most recent insertion.
    fn legalize(&mut self, seeds: Vec<usize>) {
        let mut stack = seeds;
        while let Some(he) = stack.pop() {
            if let Some(new_edges) = self.try_flip(he) {
                stack.extend(new_edges);
            }
        }
    }

    /// Attempts to flip the quadrilateral across `he`. Returns the four outer
    /// half-edges of the resulting pair of triangles if a flip happened.
    fn try_flip(&mut self, he: usize) -> Option<[usize; 4]> {
        let twin = self.mesh.half_edge(he)?;

        let t = he / 3;
        let t2 = twin / 3;

        let left_he = Mesh::next(he);
        let right_he = Mesh::prev(he);
        let adjacent_left_he = Mesh::prev(twin);
        let adjacent_right_he = Mesh::next(twin);

        let apex_t = self.vertex_at(right_he);
        let v_right = self.vertex_at(he);
        let v_left = self.vertex_at(left_he);
        let apex_t2 = self.vertex_at(adjacent_left_he);

        let p_apex_t = self.mesh.point(apex_t);
        let p_right = self.mesh.point(v_right);
        let p_left = self.mesh.point(v_left);
        let p_apex_t2 = self.mesh.point(apex_t2);

        if !in_circumcircle(p_apex_t2, p_apex_t, p_right, p_left) {
            return None;
        }

        let he_left = self.mesh.half_edge(left_he);
        let he_right = self.mesh.half_edge(right_he);
        let he_adjacent_left = self.mesh.half_edge(adjacent_left_he);
        let he_adjacent_right = self.mesh.half_edge(adjacent_right_he);

        let t0 = self.mesh.set_triangle(
            (apex_t, apex_t2, v_left),
            None,
            he_adjacent_left,
            he_left,
            SlotStrategy::Overwrite(t),
        );
        let t0_base = t0 * 3;
        let t1 = self.mesh.set_triangle(
            (apex_t2, apex_t, v_right),
            Some(t0_base),
            he_right,
            he_adjacent_right,
            SlotStrategy::Overwrite(t2),
        );
        let t1_base = t1 * 3;

        self.finalize_new_triangle(t0);
        self.finalize_new_triangle(t1);

        Some([t0_base + 1, t0_base + 2, t1_base + 1, t1_base + 2])
    }
}
