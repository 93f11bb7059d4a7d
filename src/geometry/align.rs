// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Scene Bridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use nalgebra::Unit;

use crate::model::Vec3;

/// What a placement should do with the surface it landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceFit {
    /// Keep the requested rotation.
    Keep,
    /// Tilt onto the surface normal.
    Align,
    /// Abandon the placement.
    Reject,
}

/// Thresholds on `dot(world_up, hit_normal)`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AlignmentPolicy {
    /// Align when the dot product is strictly above this.
    pub align_above: Option<f64>,
    /// Reject when the dot product is strictly below this.
    pub reject_below: Option<f64>,
}

impl AlignmentPolicy {
    pub fn new(align_above: Option<f64>, reject_below: Option<f64>) -> Self {
        Self {
            align_above,
            reject_below,
        }
    }

    pub fn align_above(threshold: f64) -> Self {
        Self {
            align_above: Some(threshold),
            reject_below: None,
        }
    }

    /// An align threshold below the reject threshold. Every surface that survives rejection
    /// is then aligned.
    pub fn is_inverted(&self) -> bool {
        matches!((self.align_above, self.reject_below), (Some(a), Some(r)) if a < r)
    }

    /// Rejection is tested first, so it wins when the thresholds are inverted.
    pub fn classify(&self, normal: &Unit<Vec3>) -> SurfaceFit {
        let up_dot = Vec3::y().dot(normal);
        if self.reject_below.is_some_and(|r| up_dot < r) {
            return SurfaceFit::Reject;
        }
        if self.align_above.is_some_and(|a| up_dot > a) {
            return SurfaceFit::Align;
        }
        SurfaceFit::Keep
    }
}
