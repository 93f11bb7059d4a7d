// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Scene Bridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

pub type Vec3 = Vector3<f64>;
pub type Pos3 = Point3<f64>;

/// World-space transform as reported by the host, in host working units and degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawTransform {
    pub translation: Vec3,
    /// Euler XYZ rotation in degrees.
    pub rotation: Vec3,
    pub scale: Vec3,
    /// Scale pivot in world space.
    pub world_pivot: Vec3,
    /// Scale pivot in object space (before scale).
    pub local_pivot: Vec3,
}

impl RawTransform {
    pub fn at(translation: Vec3) -> Self {
        Self {
            translation,
            rotation: Vec3::zeros(),
            scale: Vec3::repeat(1.0),
            world_pivot: translation,
            local_pivot: Vec3::zeros(),
        }
    }
}

/// Partial world-space transform update; `None` components are left untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TransformPatch {
    pub translation: Option<Vec3>,
    pub rotation: Option<Vec3>,
    pub scale: Option<Vec3>,
}

impl TransformPatch {
    pub fn translate(translation: Vec3) -> Self {
        Self {
            translation: Some(translation),
            ..Self::default()
        }
    }

    pub fn rotate(rotation: Vec3) -> Self {
        Self {
            rotation: Some(rotation),
            ..Self::default()
        }
    }

    pub fn identity() -> Self {
        Self {
            translation: Some(Vec3::zeros()),
            rotation: Some(Vec3::zeros()),
            scale: Some(Vec3::repeat(1.0)),
        }
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Pos3,
    pub max: Pos3,
}

impl Aabb {
    pub fn new(min: Pos3, max: Pos3) -> Self {
        Self { min, max }
    }

    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Pos3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let mut bounds = Self::new(first, first);
        for p in iter {
            bounds.min = bounds.min.inf(p);
            bounds.max = bounds.max.sup(p);
        }
        Some(bounds)
    }

    pub fn union(&self, other: &Self) -> Self {
        Self::new(self.min.inf(&other.min), self.max.sup(&other.max))
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn center(&self) -> Pos3 {
        nalgebra::center(&self.min, &self.max)
    }

    /// Centre on X/Z, minimum on Y: where an object rests on a floor.
    pub fn bottom_center(&self) -> Pos3 {
        let c = self.center();
        Pos3::new(c.x, self.min.y, c.z)
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.min * factor, self.max * factor)
    }
}

/// Normalized, scale-independent footprint of an object.
///
/// Rotation is in degrees; positions are in peer units once they leave the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectTransform {
    pub size: [f64; 3],
    pub rotation: [f64; 3],
    /// World-space bottom centre of the bounding box, the object's resting point.
    pub pivot: [f64; 3],
    /// Object-space vector from the bottom centre to the host pivot.
    pub pivot_offset: [f64; 3],
}

pub(crate) fn to_array(v: &Vec3) -> [f64; 3] {
    [v.x, v.y, v.z]
}

pub(crate) fn from_array(v: [f64; 3]) -> Vec3 {
    Vec3::new(v[0], v[1], v[2])
}
