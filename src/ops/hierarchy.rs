// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Scene Bridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use tracing::debug;

use super::{OpResult, Output, SceneContext};
use crate::model::Handle;

/// Removes `node` and everything below it, leaves first.
///
/// Nodes that come from a file reference are removed by unloading the reference, which takes
/// every node of that reference with it. Redirects pointing into the subtree are dropped.
pub(super) fn remove_node(ctx: &mut SceneContext<'_>, node: Handle) -> OpResult<()> {
    if !ctx.host.exists(node) {
        return Ok(());
    }
    let mut doomed = vec![node];
    doomed.extend(ctx.host.descendants(node));
    ctx.redirects.purge(&doomed);

    for handle in doomed.into_iter().rev() {
        // Unloading a reference can take later entries with it.
        if !ctx.host.exists(handle) {
            continue;
        }
        if ctx.host.is_referenced(handle) {
            ctx.host.remove_reference(handle)?;
        } else {
            ctx.host.delete(handle)?;
        }
    }
    Ok(())
}

/// Parents every other name under the first one.
pub(super) fn parent(ctx: &mut SceneContext<'_>, names: &[String]) -> OpResult<Output> {
    let Some((first, rest)) = names.split_first() else {
        return Ok(Output::Silent);
    };
    let Some(target) = ctx.resolve(first) else {
        debug!(parent = %first, "parent not found, nothing reparented");
        return Ok(Output::Silent);
    };
    for child in ctx.resolve_all(rest) {
        if child == target || ctx.host.parent(child) == Some(target) {
            continue;
        }
        ctx.host.set_parent(child, Some(target))?;
    }
    Ok(Output::Silent)
}

pub(super) fn unparent(ctx: &mut SceneContext<'_>, names: &[String]) -> OpResult<Output> {
    for node in ctx.resolve_all(names) {
        if ctx.host.parent(node).is_some() {
            ctx.host.set_parent(node, None)?;
        }
    }
    Ok(Output::Silent)
}

pub(super) fn remove(ctx: &mut SceneContext<'_>, names: &[String]) -> OpResult<Output> {
    for node in ctx.resolve_all(names) {
        remove_node(ctx, node)?;
    }
    Ok(Output::Silent)
}

/// Removes the children of each object, keeping the object itself.
pub(super) fn remove_descendants(ctx: &mut SceneContext<'_>, names: &[String]) -> OpResult<Output> {
    for node in ctx.resolve_all(names) {
        let children = ctx.host.children(node);
        if children.is_empty() {
            debug!(%node, "no children to remove");
        }
        for child in children {
            remove_node(ctx, child)?;
        }
    }
    Ok(Output::Silent)
}

pub(super) fn rename(ctx: &mut SceneContext<'_>, name: &str, label: &str) -> OpResult<Output> {
    if let Some(node) = ctx.resolve(name) {
        ctx.host.rename(node, label)?;
    }
    Ok(Output::Silent)
}

/// Replaces the selection with the objects that resolve.
pub(super) fn select(ctx: &mut SceneContext<'_>, names: &[String]) -> OpResult<Output> {
    let nodes = ctx.resolve_all(names);
    ctx.host.select(&nodes)?;
    Ok(Output::Silent)
}

pub(super) fn set_visible(
    ctx: &mut SceneContext<'_>,
    names: &[String],
    visible: bool,
) -> OpResult<Output> {
    let nodes = ctx.resolve_all(names);
    ctx.host.set_visible(&nodes, visible)?;
    Ok(Output::Silent)
}
