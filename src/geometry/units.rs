// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Scene Bridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::host::SceneHost;
use crate::model::{Pos3, Vec3};

/// Conversion between the host's working units and centimetres.
///
/// Centimetres are both the host's internal geometry unit and the unit the peer speaks. The
/// working unit can change at any time, so a `UnitScale` is read fresh per operation and never
/// stored across commands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitScale {
    cm_per_unit: f64,
}

impl UnitScale {
    pub fn new(cm_per_unit: f64) -> Self {
        let cm_per_unit =
            if cm_per_unit.is_finite() && cm_per_unit > 0.0 { cm_per_unit } else { 1.0 };
        Self { cm_per_unit }
    }

    pub fn of<H: SceneHost + ?Sized>(host: &H) -> Self {
        Self::new(host.centimeters_per_unit())
    }

    pub fn cm_per_unit(&self) -> f64 {
        self.cm_per_unit
    }

    pub fn to_cm(&self, units: f64) -> f64 {
        units * self.cm_per_unit
    }

    pub fn from_cm(&self, cm: f64) -> f64 {
        cm / self.cm_per_unit
    }

    pub fn vec_to_cm(&self, v: &Vec3) -> Vec3 {
        v * self.cm_per_unit
    }

    pub fn vec_from_cm(&self, v: &Vec3) -> Vec3 {
        v / self.cm_per_unit
    }

    pub fn point_to_cm(&self, p: &Pos3) -> Pos3 {
        p * self.cm_per_unit
    }

    pub fn point_from_cm(&self, p: &Pos3) -> Pos3 {
        p / self.cm_per_unit
    }
}
