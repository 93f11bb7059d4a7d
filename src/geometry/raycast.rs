// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Scene Bridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashSet;

use tracing::debug;

use super::ray::{triangle_normal, Ray, RayHit};
use super::units::UnitScale;
use crate::host::SceneHost;
use crate::model::{Aabb, Handle, Pos3, Vec3};

/// Casts a ray against the geometry inside the active viewport.
///
/// `origin`, `max_distance` and the returned hit are in the host's current working units;
/// intersection runs in centimetres. Excluded handles hide their whole subtree. Candidates are
/// scanned linearly in host enumeration order and the strictly closest hit wins, so ties go to
/// the first candidate visited. Returns `None` when no viewport is active, nothing is
/// intersected within `max_distance`, or the direction is zero.
pub fn cast<H: SceneHost + ?Sized>(
    host: &H,
    origin: Pos3,
    direction: Vec3,
    max_distance: Option<f64>,
    exclude: &[Handle],
) -> Option<RayHit> {
    let candidates = host.visible_geometry()?;
    let units = UnitScale::of(host);
    let ray = Ray::new(units.point_to_cm(&origin), direction)?;
    let limit = max_distance.map_or(f64::INFINITY, |d| units.to_cm(d));

    let mut excluded: HashSet<Handle> = exclude.iter().copied().collect();
    for node in exclude {
        excluded.extend(host.descendants(*node));
    }

    let mut best: Option<RayHit> = None;
    for node in candidates.into_iter().filter(|c| !excluded.contains(c)) {
        let triangles = match host.world_triangles(node) {
            Ok(triangles) => triangles,
            Err(err) => {
                debug!(%node, error = %err, "skipping candidate without readable geometry");
                continue;
            }
        };

        // Reject the whole mesh before testing its triangles.
        let Some(bounds) = Aabb::from_points(triangles.iter().flatten()) else {
            continue;
        };
        match ray.intersect_aabb(&bounds) {
            Some((enter, _)) if enter <= limit => {}
            _ => continue,
        }

        for tri in &triangles {
            let Some(t) = ray.intersect_triangle(tri) else {
                continue;
            };
            if t > limit || best.as_ref().is_some_and(|b| t >= b.distance) {
                continue;
            }
            let Some(normal) = triangle_normal(tri) else {
                continue;
            };
            best = Some(RayHit {
                node,
                position: ray.at(t),
                normal,
                distance: t,
            });
        }
    }

    best.map(|hit| RayHit {
        position: units.point_from_cm(&hit.position),
        distance: units.from_cm(hit.distance),
        ..hit
    })
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::cast;
    use crate::geometry::primitives::box_triangles;
    use crate::host::{MemoryScene, SceneHost, Triangle};
    use crate::model::{Handle, Pos3, Vec3};

    struct Stack {
        scene: MemoryScene,
        low: Handle,
        high: Handle,
    }

    /// Two slabs under the origin: tops at y = 0 and y = 50.
    #[fixture]
    fn stack() -> Stack {
        let mut scene = MemoryScene::new();
        let slab = box_triangles(Pos3::new(-100.0, -10.0, -100.0), Pos3::new(100.0, 0.0, 100.0));
        let low = scene.create_mesh("low", &slab).expect("low");
        let high = scene.create_mesh("high", &block()).expect("high");
        Stack { scene, low, high }
    }

    fn block() -> Vec<Triangle> {
        box_triangles(Pos3::new(-10.0, 40.0, -10.0), Pos3::new(10.0, 50.0, 10.0))
    }

    fn above() -> Pos3 {
        Pos3::new(1.0, 100.0, 2.0)
    }

    #[rstest]
    fn closest_candidate_wins(stack: Stack) {
        let hit = cast(&stack.scene, above(), -Vec3::y(), None, &[]).expect("hit");
        assert_eq!(hit.node, stack.high);
        assert!((hit.position.y - 50.0).abs() < 1e-9);
        assert!((hit.distance - 50.0).abs() < 1e-9);
        assert!(hit.normal.y > 0.99);
    }

    #[rstest]
    fn excluded_nodes_are_transparent(stack: Stack) {
        let hit = cast(&stack.scene, above(), -Vec3::y(), None, &[stack.high]).expect("hit");
        assert_eq!(hit.node, stack.low);
        assert!(hit.position.y.abs() < 1e-9);
    }

    #[rstest]
    fn max_distance_limits_the_search(stack: Stack) {
        let short = cast(&stack.scene, above(), -Vec3::y(), Some(40.0), &[]);
        assert!(short.is_none());
        let long = cast(&stack.scene, above(), -Vec3::y(), Some(60.0), &[]);
        assert!(long.is_some());
    }

    #[rstest]
    fn out_of_view_geometry_is_ignored(mut stack: Stack) {
        stack.scene.set_in_view(stack.high, false);
        let hit = cast(&stack.scene, above(), -Vec3::y(), None, &[]).expect("hit");
        assert_eq!(hit.node, stack.low);
    }

    #[rstest]
    fn no_viewport_means_no_hit(mut stack: Stack) {
        stack.scene.set_viewport_active(false);
        assert!(cast(&stack.scene, above(), -Vec3::y(), None, &[]).is_none());
    }

    #[rstest]
    fn working_units_are_converted_at_the_boundary(mut stack: Stack) {
        // One working unit is a metre: the slab top at 50 cm is 0.5 units.
        stack.scene.set_centimeters_per_unit(100.0);
        let origin = Pos3::new(0.01, 1.0, 0.02);
        let hit = cast(&stack.scene, origin, -Vec3::y(), Some(0.6), &[]).expect("hit");
        assert!((hit.position.y - 0.5).abs() < 1e-9);
        assert!((hit.distance - 0.5).abs() < 1e-9);
        assert!(cast(&stack.scene, origin, -Vec3::y(), Some(0.4), &[]).is_none());
    }

    #[rstest]
    fn ties_go_to_the_first_candidate(mut stack: Stack) {
        let twin = stack.scene.create_mesh("twin", &block()).expect("twin");
        let hit = cast(&stack.scene, above(), -Vec3::y(), None, &[]).expect("hit");
        assert_eq!(hit.node, stack.high);
        assert_ne!(hit.node, twin);
        assert!(stack.scene.exists(twin));
    }
}
