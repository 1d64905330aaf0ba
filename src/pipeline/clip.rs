//! Homogeneous clip-space line clipping
//!
//! The view volume is `-w <= x, y, z <= w`. Segments with both endpoints
//! inside pass untouched and segments with both endpoints outside are dropped,
//! even if they cross the volume. A segment with exactly one endpoint inside
//! is walked through the six planes in the order x+, x-, y+, y-, z+, z-; at
//! each plane it straddles, the outside endpoint moves to the crossing.
//!
//! Plane distances and crossings are computed on the raw 16.16 values in
//! wider integers. `w - x` alone spans 33 bits, so doing it in `Fixed32`
//! would wrap for large clip-space coordinates.

use super::Vertex;
use crate::error::PipelineError;
use crate::fixed::Fixed32;
use crate::math::Vec4;

/// Signed raw distance of `p` to the plane `sign * p[axis] = w`.
/// Non-negative means inside that half-space.
#[inline]
fn plane_distance(p: &Vec4, axis: usize, sign: i64) -> i64 {
    i64::from(p.w.raw()) - sign * i64::from(p[axis].raw())
}

/// True when `p` lies in the closed view volume.
pub fn clip_point(p: &Vec4) -> bool {
    (0..3).all(|axis| plane_distance(p, axis, 1) >= 0 && plane_distance(p, axis, -1) >= 0)
}

/// Point where `outside -> inside` meets the plane, given both plane
/// distances. Equivalent to `outside.lerp(inside, t)` with
/// `t = out_dist / (out_dist - in_dist)`, but with the ratio kept exact. The
/// plane component is then set from w so the result lies on the plane.
fn crossing(
    outside: &Vec4,
    inside: &Vec4,
    out_dist: i64,
    in_dist: i64,
    axis: usize,
    sign: i64,
) -> Result<Vec4, PipelineError> {
    let den = i128::from(out_dist - in_dist);
    if den == 0 {
        return Err(PipelineError::DivisionByZero);
    }

    let mut p = Vec4::ZERO;
    for i in 0..4 {
        let from = i64::from(outside[i].raw());
        let delta = i128::from(i64::from(inside[i].raw()) - from);
        // The crossing lies between the endpoints, so it fits in i32
        let step = (delta * i128::from(out_dist) / den) as i64;
        p[i] = Fixed32::from_raw((from + step) as i32);
    }
    p[axis] = if sign > 0 { p.w } else { -p.w };
    Ok(p)
}

/// Clip one segment in place. Returns `false` if it should be dropped.
pub fn clip_segment(a: &mut Vec4, b: &mut Vec4) -> Result<bool, PipelineError> {
    match (clip_point(a), clip_point(b)) {
        (true, true) => return Ok(true),
        (false, false) => return Ok(false),
        _ => {}
    }

    for axis in 0..3 {
        for sign in [1, -1] {
            let a_dist = plane_distance(a, axis, sign);
            let b_dist = plane_distance(b, axis, sign);
            let a_inside = a_dist >= 0;
            if a_inside == (b_dist >= 0) {
                continue;
            }

            if a_inside {
                *b = crossing(b, a, b_dist, a_dist, axis, sign)?;
            } else {
                *a = crossing(a, b, a_dist, b_dist, axis, sign)?;
            }
        }
    }

    Ok(true)
}

/// Clip every pair in `vertices`, compacting survivors in order.
/// A trailing unpaired vertex is discarded.
pub fn clip_lines(vertices: &mut Vec<Vertex>) -> Result<(), PipelineError> {
    let mut kept = 0;
    for i in 0..vertices.len() / 2 {
        let mut a = vertices[2 * i];
        let mut b = vertices[2 * i + 1];
        if clip_segment(&mut a.position, &mut b.position)? {
            vertices[kept] = a;
            vertices[kept + 1] = b;
            kept += 2;
        }
    }
    vertices.truncate(kept);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f32, y: f32, z: f32, w: f32) -> Vec4 {
        Vec4::from_f32(x, y, z, w)
    }

    fn clip(a: Vec4, b: Vec4) -> Option<(Vec4, Vec4)> {
        let (mut a, mut b) = (a, b);
        clip_segment(&mut a, &mut b).unwrap().then_some((a, b))
    }

    #[test]
    fn test_clip_point_closed_interval() {
        assert!(clip_point(&v(0.0, 0.0, 0.0, 1.0)));
        assert!(clip_point(&v(1.0, -1.0, 1.0, 1.0)));
        assert!(clip_point(&v(-2.0, 2.0, -2.0, 2.0)));
        assert!(!clip_point(&v(1.0001, 0.0, 0.0, 1.0)));
        assert!(!clip_point(&v(0.0, -1.5, 0.0, 1.0)));
        assert!(!clip_point(&v(0.0, 0.0, 3.0, 2.0)));
    }

    #[test]
    fn test_clip_point_nonpositive_w() {
        assert!(clip_point(&v(0.0, 0.0, 0.0, 0.0)));
        assert!(!clip_point(&v(0.1, 0.0, 0.0, 0.0)));
        assert!(!clip_point(&v(0.0, 0.0, 0.0, -1.0)));
    }

    #[test]
    fn test_inside_segment_unchanged() {
        let a = v(-0.5, 0.25, 0.0, 1.0);
        let b = v(1.0, -1.0, 1.0, 1.0);
        assert_eq!(clip(a, b), Some((a, b)));
    }

    #[test]
    fn test_outside_segment_dropped() {
        assert_eq!(clip(v(2.0, 0.0, 0.0, 1.0), v(3.0, 0.5, 0.0, 1.0)), None);
    }

    #[test]
    fn test_crossing_segment_with_both_ends_outside_is_dropped() {
        assert_eq!(clip(v(-2.0, 0.0, 0.0, 1.0), v(2.0, 0.0, 0.0, 1.0)), None);
    }

    #[test]
    fn test_clip_single_plane() {
        let a = v(0.0, 0.0, 0.0, 1.0);
        assert_eq!(
            clip(a, v(4.0, 2.0, 0.0, 1.0)),
            Some((a, v(1.0, 0.5, 0.0, 1.0)))
        );
    }

    #[test]
    fn test_clip_replaces_outside_first_endpoint() {
        let b = v(0.0, 0.0, 0.0, 1.0);
        assert_eq!(
            clip(v(-4.0, 2.0, 0.0, 1.0), b),
            Some((v(-1.0, 0.5, 0.0, 1.0), b))
        );
    }

    #[test]
    fn test_clip_accumulates_across_planes() {
        // x+ brings b to (1, 2), then y+ brings it to (0.5, 1)
        let a = v(0.0, 0.0, 0.0, 1.0);
        assert_eq!(
            clip(a, v(2.0, 4.0, 0.0, 1.0)),
            Some((a, v(0.5, 1.0, 0.0, 1.0)))
        );
    }

    #[test]
    fn test_clip_interpolates_w() {
        let a = v(0.0, 0.0, 0.0, 1.0);
        let (_, b) = clip(a, v(3.0, 0.0, 0.0, 2.0)).unwrap();
        assert_eq!(b, v(1.5, 0.0, 0.0, 1.5));
    }

    #[test]
    fn test_clip_near_plane() {
        let a = v(0.0, 0.0, 0.0, 1.0);
        let (_, b) = clip(a, v(0.0, 0.0, -3.0, 0.0)).unwrap();
        assert_eq!(b, v(0.0, 0.0, -0.75, 0.75));
        assert!(clip_point(&b));
    }

    #[test]
    fn test_clip_first_endpoint_through_x_minus_then_y_minus() {
        // x- brings a to (-1, -2), then y- brings it to (-0.5, -1)
        let b = v(0.0, 0.0, 0.0, 1.0);
        assert_eq!(
            clip(v(-2.0, -4.0, 0.0, 1.0), b),
            Some((v(-0.5, -1.0, 0.0, 1.0), b))
        );
    }

    #[test]
    fn test_clip_far_plane_with_w_two() {
        let a = v(0.0, 0.0, 0.0, 2.0);
        assert_eq!(
            clip(a, v(0.0, 0.0, 6.0, 0.0)),
            Some((a, v(0.0, 0.0, 1.5, 1.5)))
        );
    }

    #[test]
    fn test_clip_x_minus_then_y_plus_with_varying_w() {
        // x- gives (-1.5, 3.5, 0, 1.5), which is still above y+
        let a = v(0.0, 0.0, 0.0, 2.0);
        assert_eq!(
            clip(a, v(-6.0, 14.0, 0.0, 0.0)),
            Some((a, v(-0.75, 1.75, 0.0, 1.75)))
        );
    }

    #[test]
    fn test_large_coordinates_classify_without_wrapping() {
        // w - x is 40000 here, past the 16.16 range
        assert!(clip_point(&v(-20000.0, 0.0, 0.0, 20000.0)));
        assert!(clip_point(&v(0.0, 30000.0, -30000.0, 30000.0)));
        assert!(!clip_point(&v(20000.0, 0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_clip_large_coordinates() {
        let a = v(-20000.0, 0.0, 0.0, 20000.0);
        let (a2, b2) = clip(a, v(20000.0, 0.0, 0.0, 1.0)).unwrap();
        assert_eq!(a2, a);
        assert!(clip_point(&b2));
        assert_eq!(b2.x, b2.w);
        assert!(b2.w > Fixed32::from_int(6667) && b2.w < Fixed32::from_int(6668));

        // Outside first endpoint with w != 1, through y-
        let b = v(0.0, 10000.0, 5000.0, 12000.0);
        let (a3, b3) = clip(v(0.0, -30000.0, 0.0, 2.0), b).unwrap();
        assert_eq!(b3, b);
        assert!(clip_point(&a3));
        assert_eq!(a3.y, -a3.w);
    }

    #[test]
    fn test_clip_lines_compacts_in_order() {
        let white = crate::color::WHITE;
        let mut list = vec![
            Vertex::new(v(0.0, 0.0, 0.0, 1.0), 1),
            Vertex::new(v(0.5, 0.0, 0.0, 1.0), 1),
            Vertex::new(v(5.0, 0.0, 0.0, 1.0), 2),
            Vertex::new(v(6.0, 0.0, 0.0, 1.0), 2),
            Vertex::new(v(0.0, 0.0, 0.0, 1.0), 3),
            Vertex::new(v(0.0, 4.0, 0.0, 1.0), 3),
            Vertex::new(v(0.0, 0.0, 0.0, 1.0), white),
        ];
        clip_lines(&mut list).unwrap();
        assert_eq!(list.len(), 4);
        assert_eq!(list[0].color, 1);
        assert_eq!(list[2].color, 3);
        assert_eq!(list[3].position, v(0.0, 1.0, 0.0, 1.0));
        // Clipping moves positions only
        assert_eq!(list[3].color, 3);
    }
}
