// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Scene Bridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Euler helpers. Rotations are XYZ order in degrees: `v' = Rz * Ry * Rx * v`.

use std::f64::consts::PI;

use nalgebra::{Rotation3, Unit};

use crate::model::Vec3;

/// Rotation matrix for an XYZ Euler triple in degrees.
pub fn from_euler_degrees(euler: &Vec3) -> Rotation3<f64> {
    Rotation3::from_euler_angles(
        euler.x.to_radians(),
        euler.y.to_radians(),
        euler.z.to_radians(),
    )
}

/// XYZ Euler triple in degrees for a rotation matrix.
pub fn to_euler_degrees(rotation: &Rotation3<f64>) -> Vec3 {
    let (x, y, z) = rotation.euler_angles();
    Vec3::new(x.to_degrees(), y.to_degrees(), z.to_degrees())
}

/// Shortest rotation taking world up onto `normal`.
pub fn up_to_normal(normal: &Unit<Vec3>) -> Rotation3<f64> {
    // Antiparallel vectors have no unique shortest arc; flip about X.
    Rotation3::rotation_between(&Vec3::y(), normal.as_ref())
        .unwrap_or_else(|| Rotation3::from_axis_angle(&Vec3::x_axis(), PI))
}

/// Euler angles (degrees) of the rotation from world up to `normal`.
pub fn angle_between_up(normal: &Unit<Vec3>) -> Vec3 {
    to_euler_degrees(&up_to_normal(normal))
}

/// Tilts onto `normal`, then spins `yaw_degrees` about the object's own (tilted) up axis so
/// the heading the caller asked for survives the alignment.
pub fn align_keeping_yaw(normal: &Unit<Vec3>, yaw_degrees: f64) -> Vec3 {
    let yaw = Rotation3::from_axis_angle(&Vec3::y_axis(), yaw_degrees.to_radians());
    to_euler_degrees(&(up_to_normal(normal) * yaw))
}
