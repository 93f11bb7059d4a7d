// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Scene Bridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use super::reference::reference_asset;
use super::{OpError, OpResult, Output, SceneContext};
use crate::geometry::primitives::{
    apply_matrix, cube_triangles, fan_triangulate, fix_winding, PLACEHOLDER_EDGE_CM,
};
use crate::geometry::rotation::{align_keeping_yaw, angle_between_up};
use crate::geometry::{cast, row_positions, AlignmentPolicy, RowSlot, SurfaceFit, UnitScale};
use crate::host::Triangle;
use crate::model::transform::from_array;
use crate::model::{
    Aabb, Handle, PlacementRequest, PolygonGeometry, Pos3, StableName, TransformPatch,
    TriangleGeometry, Vec3,
};

fn label_or<'a>(name: &'a str, fallback: &'a str) -> &'a str {
    if name.is_empty() { fallback } else { name }
}

/// Creates and places one object, or returns `None` when the surface below rejects it.
pub(super) fn add_object(
    ctx: &mut SceneContext<'_>,
    request: &PlacementRequest,
) -> OpResult<Option<Handle>> {
    let units = ctx.units();
    let mut location = units.vec_from_cm(&from_array(request.location));
    let mut rotation = from_array(request.rotation);

    let policy = AlignmentPolicy::new(request.alignment_threshold, request.reject_threshold);
    if policy.is_inverted() {
        warn!(
            name = %request.name,
            align = ?policy.align_above,
            reject = ?policy.reject_below,
            "align threshold is below reject threshold"
        );
    }

    if let Some(distance_cm) = request.raytrace_distance.filter(|d| *d > 0.0) {
        let distance = units.from_cm(distance_cm);
        // Start half the distance above the target so surfaces slightly above it are found too.
        let origin = Pos3::from(location + Vec3::y() * (distance * 0.5));
        if let Some(hit) = cast(&*ctx.host, origin, -Vec3::y(), Some(distance), &[]) {
            location = hit.position.coords;
            match policy.classify(&hit.normal) {
                SurfaceFit::Reject => {
                    debug!(name = %request.name, node = %hit.node, "surface rejected placement");
                    return Ok(None);
                }
                SurfaceFit::Align => rotation = align_keeping_yaw(&hit.normal, request.rotation[1]),
                SurfaceFit::Keep => {}
            }
        }
    }

    let node = if request.group {
        ctx.host.create_group(label_or(&request.name, "group"), &[])?
    } else {
        let asset = match request.asset_path.as_deref() {
            Some(path) => reference_asset(ctx, path)?,
            None => None,
        };
        match asset {
            Some(node) => node,
            None => {
                let cube = cube_triangles(units.from_cm(PLACEHOLDER_EDGE_CM));
                ctx.host.create_mesh(label_or(&request.name, "cube"), &cube)?
            }
        }
    };

    ctx.host.set_transform(
        node,
        TransformPatch {
            translation: Some(location),
            rotation: Some(rotation),
            scale: Some(from_array(request.scale)),
        },
    )?;

    if let Some(parent_name) = request.parent.as_deref().filter(|p| !p.is_empty()) {
        match ctx.resolve(parent_name) {
            Some(parent) => ctx.host.set_parent(node, Some(parent))?,
            None => debug!(parent = parent_name, "parent to attach was not found"),
        }
    }
    Ok(Some(node))
}

/// Places a batch and answers with `{temporary name: stable name}` for every object created.
///
/// Items are placed in the order the peer listed them, so a later item can land on an earlier
/// one. Each temporary name is also recorded as a redirect, so the peer can keep addressing the
/// object by it until it learns the real name.
pub(super) fn add_objects(
    ctx: &mut SceneContext<'_>,
    batch: Vec<(String, PlacementRequest)>,
) -> OpResult<Output> {
    let mut placed = Map::new();
    for (temp, request) in batch {
        let Some(node) = add_object(ctx, &request)? else {
            continue;
        };
        let key = StableName::parse(&temp)
            .unwrap_or_else(|_| StableName::label_only(temp.as_str()));
        ctx.redirects.record(key, node);
        placed.insert(temp, json!(ctx.wire_name(node)));
    }
    Ok(Output::Value(Value::Object(placed)))
}

/// World-space triangles in working units from points given in centimetres.
fn to_world(units: UnitScale, matrix: Option<&[f64; 16]>, point: &[f64; 3]) -> Pos3 {
    let p = Pos3::from(from_array(*point));
    let p = matrix.map_or(p, |m| apply_matrix(m, &p));
    units.point_from_cm(&p)
}

fn triangles_from(units: UnitScale, geometry: &TriangleGeometry) -> OpResult<Vec<Triangle>> {
    let invalid = |reason: String| OpError::Geometry {
        name: geometry.name.clone(),
        reason,
    };
    let matrix = geometry.transform.as_ref();
    let vertex = |i: usize| {
        geometry
            .verts
            .get(i)
            .map(|v| to_world(units, matrix, v))
            .ok_or_else(|| invalid(format!("vertex index {i} out of range")))
    };

    let mut triangles = Vec::with_capacity(geometry.tri_ids.len());
    for (i, [a, b, c]) in geometry.tri_ids.iter().copied().enumerate() {
        let normal = geometry
            .normals
            .get(i)
            .map(|n| from_array(*n))
            .ok_or_else(|| invalid(format!("triangle {i} has no normal")))?;
        // Normals are directions: only the matrix's linear part applies.
        let normal = match matrix {
            Some(m) => nalgebra::Matrix4::from_column_slice(m).transform_vector(&normal),
            None => normal,
        };
        triangles.push(fix_winding([vertex(a)?, vertex(b)?, vertex(c)?], &normal));
    }
    Ok(triangles)
}

/// Builds meshes from indexed triangle soups and answers with `{key: stable name}`.
pub(super) fn add_objects_from_triangles(
    ctx: &mut SceneContext<'_>,
    batch: Vec<(String, TriangleGeometry)>,
) -> OpResult<Output> {
    let units = ctx.units();
    let mut created = Map::new();
    for (key, geometry) in batch {
        let triangles = triangles_from(units, &geometry)?;
        if triangles.is_empty() {
            warn!(name = %geometry.name, "skipping object without triangles");
            continue;
        }
        let node = ctx.host.create_mesh(label_or(&geometry.name, "mesh"), &triangles)?;
        created.insert(key, json!(ctx.wire_name(node)));
    }
    Ok(Output::Value(Value::Object(created)))
}

/// Builds one single-polygon mesh per entry.
pub(super) fn add_objects_from_polygons(
    ctx: &mut SceneContext<'_>,
    polygons: Vec<PolygonGeometry>,
) -> OpResult<Output> {
    let units = ctx.units();
    for polygon in polygons {
        let matrix = polygon.transform.as_ref();
        let points: Vec<Pos3> = polygon.points.iter().map(|p| to_world(units, matrix, p)).collect();
        let triangles = fan_triangulate(&points);
        if triangles.is_empty() {
            return Err(OpError::Geometry {
                name: polygon.name,
                reason: format!("a polygon needs at least 3 points, got {}", points.len()),
            });
        }
        ctx.host.create_mesh(label_or(&polygon.name, "polygon"), &triangles)?;
    }
    Ok(Output::Silent)
}

/// World bounds of a node and its descendants, in working units.
fn subtree_bounds(ctx: &SceneContext<'_>, node: Handle) -> OpResult<Option<Aabb>> {
    let units = ctx.units();
    let mut bounds: Option<Aabb> = None;
    for handle in std::iter::once(node).chain(ctx.host.descendants(node)) {
        let triangles = ctx.host.world_triangles(handle)?;
        let points: Vec<Pos3> = triangles
            .iter()
            .flatten()
            .map(|p| units.point_from_cm(p))
            .collect();
        if let Some(b) = Aabb::from_points(points.iter()) {
            bounds = Some(bounds.map_or(b, |acc| acc.union(&b)));
        }
    }
    Ok(bounds)
}

/// Lines the assets up in a row centred on `anchor` (centimetres) and drops each onto the
/// visible surface below it, tilting it to the surface normal.
pub(super) fn drop_assets(
    ctx: &mut SceneContext<'_>,
    anchor: Vec3,
    paths: &[String],
) -> OpResult<Output> {
    let units = ctx.units();
    let anchor = Pos3::from(units.vec_from_cm(&anchor));

    let mut created = Vec::new();
    for path in paths {
        if let Some(node) = reference_asset(ctx, path)? {
            created.push(node);
        }
    }
    if created.is_empty() {
        return Ok(Output::Silent);
    }

    let edge = units.from_cm(PLACEHOLDER_EDGE_CM);
    let placeholder = Aabb::new(Pos3::new(0.0, 0.0, 0.0), Pos3::new(edge, edge, edge));
    let mut bounds = Vec::with_capacity(created.len());
    for node in &created {
        bounds.push(subtree_bounds(ctx, *node)?.unwrap_or(placeholder));
    }
    let slots: Vec<RowSlot> = bounds.iter().map(RowSlot::from_bounds).collect();
    let positions = row_positions(&slots, &anchor);

    for ((node, position), extent) in created.iter().zip(positions).zip(&bounds) {
        // Cast from above the object's top so a row sitting on a surface still finds it.
        let lift = extent.size().y.max(edge);
        let origin = position + extent.bottom_center().coords + Vec3::y() * lift;
        let (translation, rotation) = match cast(&*ctx.host, origin, -Vec3::y(), None, &created) {
            Some(hit) => (hit.position.coords, angle_between_up(&hit.normal)),
            None => (position.coords, Vec3::zeros()),
        };
        ctx.host.set_transform(
            *node,
            TransformPatch {
                translation: Some(translation),
                rotation: Some(rotation),
                scale: None,
            },
        )?;
    }
    Ok(Output::Value(json!(ctx.wire_names(&created))))
}

/// Moves every object to `location` (centimetres), first dropping the point onto the surface
/// below within `distance` and tilting objects whose surface is flat enough.
pub(super) fn translate_and_raytrace(
    ctx: &mut SceneContext<'_>,
    location: Vec3,
    distance: f64,
    align_above: f64,
    names: &[String],
    ignore: &[String],
) -> OpResult<Output> {
    let units = ctx.units();
    let requested = units.vec_from_cm(&location);
    let distance = units.from_cm(distance);
    let ignore = ctx.resolve_all(ignore);
    let policy = AlignmentPolicy::align_above(align_above);

    for node in ctx.resolve_all(names) {
        let mut target = requested;
        if distance > 0.0 {
            let origin = Pos3::from(requested);
            if let Some(hit) = cast(&*ctx.host, origin, -Vec3::y(), Some(distance), &ignore) {
                target = hit.position.coords;
                if policy.classify(&hit.normal) == SurfaceFit::Align {
                    let tilt = TransformPatch::rotate(angle_between_up(&hit.normal));
                    ctx.host.set_transform(node, tilt)?;
                }
            }
        }
        ctx.host.set_transform(node, TransformPatch::translate(target))?;
    }
    Ok(Output::Silent)
}
