// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Scene Bridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use nalgebra::Matrix4;

use crate::host::Triangle;
use crate::model::{Pos3, Vec3};

/// Edge length, in centimetres, of the placeholder cube created when a placement has no
/// usable asset.
pub const PLACEHOLDER_EDGE_CM: f64 = 100.0;

/// Reverses `tri` when its winding disagrees with `normal`.
pub fn fix_winding(mut tri: Triangle, normal: &Vec3) -> Triangle {
    let face = (tri[1] - tri[0]).cross(&(tri[2] - tri[0]));
    if face.dot(normal) < 0.0 {
        tri.swap(1, 2);
    }
    tri
}

/// Closed box with outward-facing triangles.
pub fn box_triangles(min: Pos3, max: Pos3) -> Vec<Triangle> {
    let center = nalgebra::center(&min, &max);
    let mut out = Vec::with_capacity(12);
    for axis in 0..3 {
        let (u, v) = ((axis + 1) % 3, (axis + 2) % 3);
        for (side, sign) in [(min[axis], -1.0), (max[axis], 1.0)] {
            let corner = |a: f64, b: f64| {
                let mut p = center;
                p[axis] = side;
                p[u] = a;
                p[v] = b;
                p
            };
            let quad = [
                corner(min[u], min[v]),
                corner(max[u], min[v]),
                corner(max[u], max[v]),
                corner(min[u], max[v]),
            ];
            let mut outward = Vec3::zeros();
            outward[axis] = sign;
            out.push(fix_winding([quad[0], quad[1], quad[2]], &outward));
            out.push(fix_winding([quad[0], quad[2], quad[3]], &outward));
        }
    }
    out
}

/// Cube of edge `edge` centred on the origin.
pub fn cube_triangles(edge: f64) -> Vec<Triangle> {
    let h = edge * 0.5;
    box_triangles(Pos3::new(-h, -h, -h), Pos3::new(h, h, h))
}

/// Fan-triangulates a convex polygon.
pub fn fan_triangulate(points: &[Pos3]) -> Vec<Triangle> {
    match points.split_first() {
        Some((first, rest)) if rest.len() >= 2 => {
            rest.windows(2).map(|w| [*first, w[0], w[1]]).collect()
        }
        _ => Vec::new(),
    }
}

/// Applies a column-major 4x4 world matrix to a point.
pub fn apply_matrix(matrix: &[f64; 16], p: &Pos3) -> Pos3 {
    Matrix4::from_column_slice(matrix).transform_point(p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ray::triangle_normal;

    #[test]
    fn box_faces_point_outward() {
        let tris = cube_triangles(2.0);
        assert_eq!(tris.len(), 12);
        for tri in &tris {
            let n = triangle_normal(tri).expect("normal");
            let centroid = (tri[0].coords + tri[1].coords + tri[2].coords) / 3.0;
            assert!(n.dot(&centroid) > 0.0, "inward face {tri:?}");
        }
    }

    #[test]
    fn fix_winding_flips_against_normal() {
        let tri = [Pos3::new(0.0, 0.0, 0.0), Pos3::new(1.0, 0.0, 0.0), Pos3::new(1.0, 0.0, 1.0)];
        // This winding faces -Y.
        let fixed = fix_winding(tri, &Vec3::y());
        let n = triangle_normal(&fixed).expect("normal");
        assert!(n.y > 0.99);
        assert_eq!(fix_winding(tri, &-Vec3::y()), tri);
    }

    #[test]
    fn fan_of_quad_and_degenerate_input() {
        let quad = [
            Pos3::new(0.0, 0.0, 0.0),
            Pos3::new(1.0, 0.0, 0.0),
            Pos3::new(1.0, 0.0, 1.0),
            Pos3::new(0.0, 0.0, 1.0),
        ];
        assert_eq!(fan_triangulate(&quad).len(), 2);
        assert!(fan_triangulate(&quad[..2]).is_empty());
    }

    #[test]
    fn matrix_translation_is_last_column() {
        let mut m = [0.0; 16];
        m[0] = 1.0;
        m[5] = 1.0;
        m[10] = 1.0;
        m[15] = 1.0;
        m[12] = 5.0;
        m[14] = -2.0;
        let p = apply_matrix(&m, &Pos3::new(1.0, 1.0, 1.0));
        assert_eq!(p, Pos3::new(6.0, 1.0, -1.0));
    }
}
