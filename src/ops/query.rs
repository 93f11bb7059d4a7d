// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Scene Bridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{json, Map, Value};

use super::reference::reference_path_of;
use super::{OpResult, Output, SceneContext};
use crate::geometry::{cast, group_transform, object_transform};
use crate::model::transform::{from_array, to_array};
use crate::model::{Handle, ObjectTransform, Vec3};

/// Everything the peer learns about one object, in centimetres and degrees.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct RawObjectData {
    pub raw_name: String,
    pub parent_name: String,
    pub is_group: bool,
    /// At least one centimetre per axis.
    pub size: [f64; 3],
    pub rotation: [f64; 3],
    pub pivot: [f64; 3],
    pub pivot_offset: [f64; 3],
    /// Translation, rotation, scale, flattened.
    pub transform: [f64; 9],
}

/// Footprint in centimetres. Nodes without geometry use their pivot.
pub(crate) fn footprint(ctx: &SceneContext<'_>, node: Handle) -> OpResult<ObjectTransform> {
    let units = ctx.units();
    let raw = ctx.host.transform(node)?;
    let fp = match ctx.host.local_bounds(node)? {
        Some(bounds) if ctx.host.has_mesh(node) => object_transform(&raw, &bounds),
        _ => group_transform(&raw),
    };
    let cm = |v: [f64; 3]| to_array(&units.vec_to_cm(&from_array(v)));
    let is_group = !ctx.host.has_mesh(node);
    Ok(ObjectTransform {
        // A group's "size" is its scale, which has no unit.
        size: if is_group { fp.size } else { cm(fp.size) },
        rotation: fp.rotation,
        pivot: cm(fp.pivot),
        pivot_offset: cm(fp.pivot_offset),
    })
}

pub(crate) fn raw_object_data(ctx: &SceneContext<'_>, node: Handle) -> OpResult<RawObjectData> {
    let units = ctx.units();
    let raw = ctx.host.transform(node)?;
    let fp = footprint(ctx, node)?;
    let translation = units.vec_to_cm(&raw.world_pivot);
    let parent_name = ctx.host.parent(node).map(|p| ctx.wire_name(p)).unwrap_or_default();
    let transform = [
        translation.x,
        translation.y,
        translation.z,
        raw.rotation.x,
        raw.rotation.y,
        raw.rotation.z,
        raw.scale.x,
        raw.scale.y,
        raw.scale.z,
    ];
    Ok(RawObjectData {
        raw_name: ctx.wire_name(node),
        parent_name,
        is_group: !ctx.host.has_mesh(node),
        size: fp.size.map(|s| s.max(1.0)),
        rotation: fp.rotation,
        pivot: fp.pivot,
        pivot_offset: fp.pivot_offset,
        transform,
    })
}

pub(super) fn scene_name(ctx: &mut SceneContext<'_>) -> Output {
    Output::Text(ctx.host.scene_name().unwrap_or_default())
}

pub(super) fn selection(ctx: &mut SceneContext<'_>) -> Output {
    let selection = ctx.host.selection();
    Output::Value(json!(ctx.wire_names(&selection)))
}

pub(super) fn visible_meshes(ctx: &mut SceneContext<'_>) -> Output {
    let visible = ctx.host.visible_geometry().unwrap_or_default();
    Output::Value(json!(ctx.wire_names(&visible)))
}

fn paths_index(ctx: &SceneContext<'_>, nodes: &[Handle]) -> BTreeMap<String, Vec<usize>> {
    let mut index: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (i, node) in nodes.iter().enumerate() {
        index.entry(reference_path_of(ctx, *node)).or_default().push(i);
    }
    index
}

pub(super) fn selected_and_visible(ctx: &mut SceneContext<'_>) -> Output {
    let selected = ctx.host.selection();
    let rendered = ctx.host.visible_geometry().unwrap_or_default();
    Output::Value(json!({
        "selected_names": ctx.wire_names(&selected),
        "rendered_names": ctx.wire_names(&rendered),
        "selected_paths": paths_index(ctx, &selected),
        "rendered_paths": paths_index(ctx, &rendered),
        "scene_name": ctx.host.scene_name().unwrap_or_default(),
    }))
}

/// Builds `{name: value}` for every name that resolves, keyed by the name as sent.
fn per_name(
    ctx: &mut SceneContext<'_>,
    names: &[String],
    mut value: impl FnMut(&SceneContext<'_>, Handle) -> OpResult<Value>,
) -> OpResult<Output> {
    let mut out = Map::new();
    for name in names {
        if let Some(node) = ctx.resolve(name) {
            out.insert(name.clone(), value(&*ctx, node)?);
        }
    }
    Ok(Output::Value(Value::Object(out)))
}

pub(super) fn location_data(ctx: &mut SceneContext<'_>, names: &[String]) -> OpResult<Output> {
    per_name(ctx, names, |ctx, node| {
        let translation = ctx.units().vec_to_cm(&ctx.host.transform(node)?.translation);
        Ok(json!(to_array(&translation)))
    })
}

pub(super) fn pivot_data(ctx: &mut SceneContext<'_>, names: &[String]) -> OpResult<Output> {
    per_name(ctx, names, |ctx, node| {
        Ok(json!(footprint(ctx, node)?.pivot))
    })
}

/// `[tx, ty, tz, rx, ry, rz, sx, sy, sz, size x3, pivot offset x3, parent name]`.
pub(super) fn transform_data(ctx: &mut SceneContext<'_>, names: &[String]) -> OpResult<Output> {
    per_name(ctx, names, |ctx, node| {
        let data = raw_object_data(ctx, node)?;
        let mut row: Vec<Value> = data.transform.iter().map(|v| json!(v)).collect();
        row.extend(data.size.iter().map(|v| json!(v)));
        row.extend(data.pivot_offset.iter().map(|v| json!(v)));
        row.push(json!(data.parent_name));
        Ok(Value::Array(row))
    })
}

/// Comma-joined parent names, one slot per input; no parent or no object leaves the slot empty.
pub(super) fn parents(ctx: &mut SceneContext<'_>, names: &[String]) -> Output {
    let nodes = ctx.resolve_each(names);
    let parents: Vec<String> = nodes
        .into_iter()
        .map(|node| {
            node.and_then(|n| ctx.host.parent(n))
                .map(|p| ctx.wire_name(p))
                .unwrap_or_default()
        })
        .collect();
    Output::Text(parents.join(","))
}

/// World triangle corners in centimetres, three consecutive entries per triangle, keyed by
/// index and wrapped in a one-element list.
fn triangle_positions(ctx: &SceneContext<'_>, node: Handle) -> OpResult<Value> {
    let triangles = ctx.host.world_triangles(node)?;
    let indexed: Map<String, Value> = triangles
        .iter()
        .flatten()
        .enumerate()
        .map(|(i, p)| (i.to_string(), json!([p.x, p.y, p.z])))
        .collect();
    Ok(json!([indexed]))
}

pub(super) fn vertex_data(ctx: &mut SceneContext<'_>, names: &[String]) -> OpResult<Output> {
    per_name(ctx, names, triangle_positions)
}

pub(super) fn vertex_data_single(ctx: &mut SceneContext<'_>, name: &str) -> OpResult<Output> {
    let Some(node) = ctx.resolve(name) else {
        return Ok(Output::Silent);
    };
    let positions = triangle_positions(ctx, node)?;
    Ok(Output::Value(json!({ "vertex_positions": positions })))
}

/// Drops a ray from the object's position and reports where it lands, in centimetres, or the
/// origin on a miss. The bidirectional form starts half the distance above the object.
pub(super) fn raytrace(
    ctx: &mut SceneContext<'_>,
    distance_cm: f64,
    name: &str,
    bidirectional: bool,
) -> OpResult<Output> {
    let Some(node) = ctx.resolve(name) else {
        return Ok(Output::Silent);
    };
    let units = ctx.units();
    let distance = units.from_cm(distance_cm);
    let mut origin = ctx.host.transform(node)?.translation;
    if bidirectional {
        origin.y += distance * 0.5;
    }
    let down = -Vec3::y();
    let hit = cast(&*ctx.host, origin.into(), down, Some(distance), &[node]);
    let position = hit.map_or([0.0; 3], |hit| {
        to_array(&units.vec_to_cm(&hit.position.coords))
    });
    Ok(Output::Value(json!({ name: position })))
}
