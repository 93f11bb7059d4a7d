// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Scene Bridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::{OpResult, Output, SceneContext, TransformKind};
use crate::model::{RawTransform, TransformPatch, Vec3};

fn patch(
    kind: TransformKind,
    relative: bool,
    value: Vec3,
    current: &RawTransform,
) -> TransformPatch {
    match (kind, relative) {
        (TransformKind::Translate, false) => TransformPatch::translate(value),
        (TransformKind::Translate, true) => TransformPatch::translate(current.translation + value),
        (TransformKind::Rotate, false) => TransformPatch::rotate(value),
        (TransformKind::Rotate, true) => TransformPatch::rotate(current.rotation + value),
        (TransformKind::Scale, false) => TransformPatch {
            scale: Some(value),
            ..TransformPatch::default()
        },
        // Relative scale multiplies.
        (TransformKind::Scale, true) => TransformPatch {
            scale: Some(current.scale.component_mul(&value)),
            ..TransformPatch::default()
        },
    }
}

/// Translates, rotates or scales every object that resolves.
///
/// Translations arrive in centimetres and are converted with the working unit read at call
/// time; rotations (degrees) and scale factors pass through unchanged.
pub(super) fn apply_transform(
    ctx: &mut SceneContext<'_>,
    kind: TransformKind,
    relative: bool,
    value: Vec3,
    names: &[String],
) -> OpResult<Output> {
    let value = match kind {
        TransformKind::Translate => ctx.units().vec_from_cm(&value),
        TransformKind::Rotate | TransformKind::Scale => value,
    };
    for node in ctx.resolve_all(names) {
        let current = ctx.host.transform(node)?;
        ctx.host.set_transform(node, patch(kind, relative, value, &current))?;
    }
    Ok(Output::Silent)
}
