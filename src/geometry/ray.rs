// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Scene Bridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Ray representation and basic ray-geometry tests.

use nalgebra::Unit;

use crate::host::Triangle;
use crate::model::{Aabb, Handle, Pos3, Vec3};

const EPSILON: f64 = 1e-9;

/// A ray in 3D space defined by origin and unit direction.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Pos3,
    pub direction: Unit<Vec3>,
}

impl Ray {
    /// Create a new ray. Returns `None` for a zero-length direction.
    pub fn new(origin: Pos3, direction: Vec3) -> Option<Self> {
        let direction = Unit::try_new(direction, EPSILON)?;
        Some(Self { origin, direction })
    }

    #[inline]
    pub fn at(&self, t: f64) -> Pos3 {
        self.origin + self.direction.as_ref() * t
    }

    /// Möller–Trumbore ray/triangle test. Returns the ray parameter of the hit, which is also
    /// the distance from the origin since the direction is unit length.
    ///
    /// Both faces count as hits.
    pub fn intersect_triangle(&self, tri: &Triangle) -> Option<f64> {
        let edge1 = tri[1] - tri[0];
        let edge2 = tri[2] - tri[0];
        let pvec = self.direction.cross(&edge2);
        let det = edge1.dot(&pvec);
        if det.abs() < EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;

        let tvec = self.origin - tri[0];
        let u = tvec.dot(&pvec) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let qvec = tvec.cross(&edge1);
        let v = self.direction.dot(&qvec) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = edge2.dot(&qvec) * inv_det;
        (t > EPSILON).then_some(t)
    }

    /// Slab test. Returns `(t_enter, t_exit)` with `t_enter` clamped to zero when the origin is
    /// inside the box.
    pub fn intersect_aabb(&self, aabb: &Aabb) -> Option<(f64, f64)> {
        let mut t_min = f64::NEG_INFINITY;
        let mut t_max = f64::INFINITY;

        for axis in 0..3 {
            let inv = 1.0 / self.direction[axis];
            let mut t0 = (aabb.min[axis] - self.origin[axis]) * inv;
            let mut t1 = (aabb.max[axis] - self.origin[axis]) * inv;
            if inv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            // NaN from 0 * inf (origin on a slab plane of an axis-parallel ray) is skipped by
            // max/min, which keep the non-NaN operand.
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
        }

        (t_max >= t_min && t_max >= 0.0).then(|| (t_min.max(0.0), t_max))
    }
}

/// Geometric normal following the triangle's winding, or `None` for a degenerate triangle.
pub fn triangle_normal(tri: &Triangle) -> Option<Unit<Vec3>> {
    let n = (tri[1] - tri[0]).cross(&(tri[2] - tri[0]));
    Unit::try_new(n, EPSILON)
}

/// Result of casting a ray into the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub node: Handle,
    pub position: Pos3,
    /// Unit-length world normal of the surface that was hit.
    pub normal: Unit<Vec3>,
    pub distance: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor_triangle() -> Triangle {
        [Pos3::new(-10.0, 0.0, -10.0), Pos3::new(0.0, 0.0, 10.0), Pos3::new(10.0, 0.0, -10.0)]
    }

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Pos3::origin(), Vec3::new(2.0, 0.0, 0.0)).expect("ray");
        let p = ray.at(5.0);
        assert!((p.x - 5.0).abs() < 1e-12);
        assert!(p.y.abs() < 1e-12);
    }

    #[test]
    fn test_zero_direction_is_rejected() {
        assert!(Ray::new(Pos3::origin(), Vec3::zeros()).is_none());
    }

    #[test]
    fn test_ray_triangle_hit_from_above() {
        let ray = Ray::new(Pos3::new(0.0, 5.0, 0.0), -Vec3::y()).expect("ray");
        let t = ray.intersect_triangle(&floor_triangle()).expect("hit");
        assert!((t - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_ray_triangle_miss_outside() {
        let ray = Ray::new(Pos3::new(50.0, 5.0, 0.0), -Vec3::y()).expect("ray");
        assert!(ray.intersect_triangle(&floor_triangle()).is_none());
    }

    #[test]
    fn test_ray_triangle_behind_origin() {
        let ray = Ray::new(Pos3::new(0.0, -5.0, 0.0), -Vec3::y()).expect("ray");
        assert!(ray.intersect_triangle(&floor_triangle()).is_none());
    }

    #[test]
    fn test_ray_triangle_parallel() {
        let ray = Ray::new(Pos3::new(-20.0, 0.0, 0.0), Vec3::x()).expect("ray");
        assert!(ray.intersect_triangle(&floor_triangle()).is_none());
    }

    #[test]
    fn test_ray_aabb_hit_and_inside() {
        let aabb = Aabb::new(Pos3::new(0.0, 0.0, 0.0), Pos3::new(1.0, 1.0, 1.0));
        let ray = Ray::new(Pos3::new(-5.0, 0.5, 0.5), Vec3::x()).expect("ray");
        let (t_min, t_max) = ray.intersect_aabb(&aabb).expect("hit");
        assert!((t_min - 5.0).abs() < 1e-10);
        assert!((t_max - 6.0).abs() < 1e-10);

        let inside = Ray::new(Pos3::new(0.5, 0.5, 0.5), Vec3::x()).expect("ray");
        let (t_min, t_max) = inside.intersect_aabb(&aabb).expect("hit");
        assert_eq!(t_min, 0.0);
        assert!((t_max - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_ray_aabb_miss_and_behind() {
        let aabb = Aabb::new(Pos3::new(0.0, 0.0, 0.0), Pos3::new(1.0, 1.0, 1.0));
        let miss = Ray::new(Pos3::new(-5.0, 5.0, 5.0), Vec3::x()).expect("ray");
        assert!(miss.intersect_aabb(&aabb).is_none());
        let behind = Ray::new(Pos3::new(-5.0, 0.5, 0.5), -Vec3::x()).expect("ray");
        assert!(behind.intersect_aabb(&aabb).is_none());
    }

    #[test]
    fn test_triangle_normal_follows_winding() {
        let n = triangle_normal(&floor_triangle()).expect("normal");
        assert!((n.y - 1.0).abs() < 1e-12);
    }
}
