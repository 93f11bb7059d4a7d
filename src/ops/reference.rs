// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Scene Bridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::path::Path;

use tracing::{debug, warn};

use super::hierarchy::remove_node;
use super::{OpResult, Output, SceneContext};
use crate::host::{HostError, Triangle};
use crate::identity;
use crate::model::{Handle, TransformPatch};

/// Where a node's geometry comes from, as the peer knows it.
///
/// A referenced node reports its reference file, a tagged node its tag. Untagged geometry
/// reports its own stable name so it can be placed again by duplication. Groups and missing
/// nodes report an empty string.
pub fn reference_path_of(ctx: &SceneContext<'_>, node: Handle) -> String {
    if !ctx.host.exists(node) {
        return String::new();
    }
    if ctx.host.is_referenced(node) {
        if let Some(file) = ctx.host.reference_file(node) {
            return file;
        }
    }
    if let Some(tag) = ctx.host.reference_tag(node) {
        return tag;
    }
    if ctx.host.has_mesh(node) {
        return ctx.wire_name(node);
    }
    String::new()
}

/// Brings one instance of an asset into the scene at the origin with an identity transform.
///
/// An asset already present in the scene (tagged with the same path) is duplicated rather
/// than imported again. A path that is not an asset file is tried as a stable name of an
/// object to duplicate. Fresh imports with several top-level parts are merged into one mesh,
/// tagged with the path and frozen. Returns `None` when there is nothing to place.
pub(super) fn reference_asset(ctx: &mut SceneContext<'_>, path: &str) -> OpResult<Option<Handle>> {
    if path.is_empty() {
        return Ok(None);
    }

    let source = if ctx.host.asset_exists(path) {
        ctx.host.tagged_with(path).into_iter().next()
    } else {
        match ctx.resolve(path) {
            Some(node) => Some(node),
            None => {
                debug!(path, "asset reference is neither a file nor a live object");
                return Ok(None);
            }
        }
    };

    if let Some(source) = source {
        let copy = ctx.host.duplicate(source)?;
        if ctx.host.parent(copy).is_some() {
            ctx.host.set_parent(copy, None)?;
        }
        ctx.host.set_transform(copy, TransformPatch::identity())?;
        debug!(path, %source, %copy, "duplicated existing instance");
        return Ok(Some(copy));
    }

    let imported = ctx.host.import_asset(path)?;
    let node = match imported.as_slice() {
        [] => {
            return Err(HostError::Import {
                path: path.to_owned(),
                reason: "file contains no transforms".to_owned(),
            }
            .into())
        }
        [only] => *only,
        parts => merge_parts(ctx, path, parts)?,
    };
    ctx.host.set_reference_tag(node, path)?;
    ctx.host.freeze_transform(node)?;
    for child in ctx.host.descendants(node) {
        ctx.host.freeze_transform(child)?;
    }
    debug!(path, %node, "imported asset");
    Ok(Some(node))
}

/// Collapses several imported parts into one mesh named after the file.
fn merge_parts(ctx: &mut SceneContext<'_>, path: &str, parts: &[Handle]) -> OpResult<Handle> {
    let units = ctx.units();
    let mut triangles: Vec<Triangle> = Vec::new();
    for part in parts {
        let world = ctx.host.world_triangles(*part)?;
        triangles.extend(world.iter().map(|tri| tri.map(|p| units.point_from_cm(&p))));
    }
    let stem = Path::new(path)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "asset".to_owned());
    let merged = ctx.host.create_mesh(&stem, &triangles)?;
    for part in parts {
        if !ctx.host.exists(*part) {
            continue;
        }
        if ctx.host.is_referenced(*part) {
            ctx.host.remove_reference(*part)?;
        } else {
            ctx.host.delete(*part)?;
        }
    }
    Ok(merged)
}

/// Places one instance of every asset at the first selected object and selects them.
pub(super) fn add_mesh_on_selection(
    ctx: &mut SceneContext<'_>,
    paths: &[String],
) -> OpResult<Output> {
    let anchor = ctx.host.selection().first().copied();
    let translation = match anchor {
        Some(node) => Some(ctx.host.transform(node)?.translation),
        None => None,
    };

    let mut created = Vec::new();
    for path in paths {
        if let Some(node) = reference_asset(ctx, path)? {
            created.push(node);
        }
    }
    if let Some(translation) = translation {
        for node in &created {
            ctx.host.set_transform(*node, TransformPatch::translate(translation))?;
        }
    }
    ctx.host.select(&created)?;
    Ok(Output::Silent)
}

/// Swaps the geometry of each target for a fresh instance of `asset`.
///
/// The replacement takes over the target's translation, rotation, parent and children, and the
/// target's name is redirected to it before the target is removed. Targets already showing
/// `asset` are left alone. When no replacement can be made the target is kept.
pub(super) fn set_mesh(
    ctx: &mut SceneContext<'_>,
    asset: &str,
    targets: &[Handle],
) -> OpResult<Output> {
    for &target in targets {
        if !ctx.host.exists(target) || reference_path_of(ctx, target) == asset {
            continue;
        }
        let Some(old_name) = identity::name_for(&*ctx.host, target) else {
            continue;
        };
        let raw = ctx.host.transform(target)?;
        let parent = ctx.host.parent(target);
        let children = ctx.host.children(target);

        let Some(replacement) = reference_asset(ctx, asset)? else {
            warn!(asset, %target, "no replacement mesh, keeping the original");
            continue;
        };
        ctx.host.set_transform(
            replacement,
            TransformPatch {
                translation: Some(raw.translation),
                rotation: Some(raw.rotation),
                scale: None,
            },
        )?;
        if parent.is_some() {
            ctx.host.set_parent(replacement, parent)?;
        }
        for child in children {
            ctx.host.set_parent(child, Some(replacement))?;
        }

        ctx.redirects.retarget(target, replacement);
        ctx.redirects.record(old_name, replacement);
        remove_node(ctx, target)?;
        debug!(asset, %target, %replacement, "mesh swapped");
    }
    Ok(Output::Silent)
}
