// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Scene Bridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::rotation::from_euler_degrees;
use crate::model::transform::to_array as array;
use crate::model::{Aabb, ObjectTransform, RawTransform};

/// Footprint of an object from its raw transform and object-space bounds.
///
/// Works for frozen transforms and moved pivots: the bottom centre is found by walking from
/// the world pivot back along the rotated, scaled pivot offset. All values stay in the units
/// of the inputs.
pub fn object_transform(raw: &RawTransform, local_bounds: &Aabb) -> ObjectTransform {
    let bottom = local_bounds.bottom_center().coords;
    // Object-space vector from the bottom centre to the pivot.
    let pivot_offset = raw.local_pivot - bottom;
    let rotated = from_euler_degrees(&raw.rotation) * pivot_offset;
    let world_bottom = raw.world_pivot - rotated.component_mul(&raw.scale);
    let size = local_bounds.size().component_mul(&raw.scale);
    ObjectTransform {
        size: array(&size),
        rotation: array(&raw.rotation),
        pivot: array(&world_bottom),
        pivot_offset: array(&pivot_offset),
    }
}

/// Footprint of a node without geometry of its own: its pivot and unit size.
pub fn group_transform(raw: &RawTransform) -> ObjectTransform {
    ObjectTransform {
        size: array(&raw.scale),
        rotation: array(&raw.rotation),
        pivot: array(&raw.world_pivot),
        pivot_offset: [0.0; 3],
    }
}
