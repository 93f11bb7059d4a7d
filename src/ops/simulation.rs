// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Scene Bridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use tracing::debug;

use super::{OpResult, Output, SceneContext};
use crate::host::{RigidBodyKind, SimulationControl};
use crate::model::Handle;

/// Labels that collide as static ground whenever they exist.
const DEFAULT_STATIC_LABELS: [&str; 2] = ["floor", "terrain"];

/// Static colliders for a simulation of `dynamic`: the default ground objects plus every
/// visible piece of geometry that is not itself simulated.
fn static_nodes(ctx: &SceneContext<'_>, dynamic: &[Handle]) -> Vec<Handle> {
    let mut statics: Vec<Handle> = Vec::new();
    for label in DEFAULT_STATIC_LABELS {
        for node in ctx.host.find_by_label(label) {
            if !dynamic.contains(&node) && !statics.contains(&node) {
                statics.push(node);
            }
        }
    }
    for node in ctx.host.visible_geometry().unwrap_or_default() {
        if !dynamic.contains(&node) && !statics.contains(&node) {
            statics.push(node);
        }
    }
    statics
}

/// Gives the listed objects dynamic rigid bodies and everything they can land on static ones.
pub(super) fn enable(ctx: &mut SceneContext<'_>, names: &[String]) -> OpResult<Output> {
    let dynamic = ctx.resolve_all(names);
    for node in &dynamic {
        ctx.host.add_rigid_body(*node, RigidBodyKind::Dynamic)?;
    }
    let statics = static_nodes(ctx, &dynamic);
    for node in &statics {
        ctx.host.add_rigid_body(*node, RigidBodyKind::Static)?;
    }
    debug!(
        dynamic = dynamic.len(),
        statics = statics.len(),
        "simulation bodies created"
    );
    Ok(Output::Silent)
}

pub(super) fn control(ctx: &mut SceneContext<'_>, control: SimulationControl) -> OpResult<Output> {
    ctx.host.simulation(control)?;
    Ok(Output::Silent)
}
