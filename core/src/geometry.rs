//! Exact integer predicates over sample-grid pixel coordinates.
//!
//! Both predicates below are evaluated with `i64` arithmetic on raw pixel
//! differences. The heightmap dimension cap in [`crate::heightmap::MAX_DIMENSION`]
//! keeps the incircle determinant's worst-case magnitude (`~4 * max(W,H)^4`,
//! per the squared terms in the last matrix row) well inside `i64::MAX`.

use crate::Point;

/// Twice the signed area of triangle `a, b, c`. Positive for counter-clockwise
/// orientation (in pixel coordinates with +Y downward, matching raster row order).
/// Exactly zero iff `a`, `b`, `c` are collinear.
pub(crate) fn signed_area(a: Point, b: Point, c: Point) -> i64 {
    let (bx, by) = diff(b, c);
    let (ax, ay) = diff(a, c);
    bx * ay - by * ax
}

/// `true` iff `test` lies strictly inside the circumcircle of `a, b, c`.
/// `a, b, c` must be in counter-clockwise order; cocircular points return `false`
/// so that exact ties never trigger a flip.
pub(crate) fn in_circumcircle(test: Point, a: Point, b: Point, c: Point) -> bool {
    let (ax, ay) = diff(a, test);
    let (bx, by) = diff(b, test);
    let (cx, cy) = diff(c, test);

    let sq_a = ax * ax + ay * ay;
    let sq_b = bx * bx + by * by;
    let sq_c = cx * cx + cy * cy;

    let det = ax * (by * sq_c - sq_b * cy) - ay * (bx * sq_c - sq_b * cx) + sq_a * (bx * cy - by * cx);

    det < 0
}

fn diff(p: Point, q: Point) -> (i64, i64) {
    (p.0 as i64 - q.0 as i64, p.1 as i64 - q.1 as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ccw_triangle_has_positive_area() {
        assert!(signed_area((0, 0), (4, 0), (0, 4)) > 0);
    }

    #[test]
    fn cw_triangle_has_negative_area() {
        assert!(signed_area((0, 0), (0, 4), (4, 0)) < 0);
    }

    #[test]
    fn collinear_points_have_zero_area() {
        assert_eq!(signed_area((0, 0), (1, 1), (2, 2)), 0);
    }

    #[test]
    fn point_inside_circumcircle_of_unit_square_half() {
        // Triangle (0,0) (4,0) (0,4); circumcircle contains (4,4) exactly
        // (cocircular, the square's fourth corner) and strictly contains (1,1).
        assert!(in_circumcircle((1, 1), (0, 0), (4, 0), (0, 4)));
    }

    #[test]
    fn cocircular_point_is_not_strictly_inside() {
        assert!(!in_circumcircle((4, 4), (0, 0), (4, 0), (0, 4)));
    }

    #[test]
    fn far_point_is_outside_circumcircle() {
        assert!(!in_circumcircle((100, 100), (0, 0), (4, 0), (0, 4)));
    }
}
