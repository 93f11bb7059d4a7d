// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Scene Bridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};

/// One entry of an `add_objects` batch, keyed by the caller's temporary name.
///
/// Positions and distances are in peer units (centimetres); rotations in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementRequest {
    /// Asset file path, or a stable name of an in-scene object to duplicate.
    #[serde(default)]
    pub asset_path: Option<String>,
    #[serde(default)]
    pub name: String,
    /// Create an empty group instead of geometry.
    #[serde(default)]
    pub group: bool,
    pub location: [f64; 3],
    #[serde(default)]
    pub rotation: [f64; 3],
    #[serde(default = "unit_scale")]
    pub scale: [f64; 3],
    #[serde(default)]
    pub raytrace_distance: Option<f64>,
    /// Align to the hit normal when `dot(up, normal)` exceeds this.
    #[serde(default, rename = "raytrace_alignment")]
    pub alignment_threshold: Option<f64>,
    /// Abandon the placement when `dot(up, normal)` falls below this.
    #[serde(default, rename = "raytrace_alignment_mask")]
    pub reject_threshold: Option<f64>,
    #[serde(default, rename = "parent_dcc_name", alias = "parent")]
    pub parent: Option<String>,
}

fn unit_scale() -> [f64; 3] {
    [1.0, 1.0, 1.0]
}

impl PlacementRequest {
    pub fn at(location: [f64; 3]) -> Self {
        Self {
            asset_path: None,
            name: String::new(),
            group: false,
            location,
            rotation: [0.0; 3],
            scale: unit_scale(),
            raytrace_distance: None,
            alignment_threshold: None,
            reject_threshold: None,
            parent: None,
        }
    }
}

/// Triangle-soup object description used by `add_objects_from_triangles`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriangleGeometry {
    pub name: String,
    pub verts: Vec<[f64; 3]>,
    pub tri_ids: Vec<[usize; 3]>,
    /// One normal per triangle, same order as `tri_ids`.
    pub normals: Vec<[f64; 3]>,
    /// Column-major 4x4 world matrix.
    #[serde(default)]
    pub transform: Option<[f64; 16]>,
}

/// Single-polygon object description used by `add_objects_from_polygons`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonGeometry {
    pub name: String,
    pub points: Vec<[f64; 3]>,
    #[serde(default)]
    pub transform: Option<[f64; 16]>,
}

#[cfg(test)]
mod tests {
    use super::PlacementRequest;

    #[test]
    fn deserializes_wire_field_names() {
        let json = r#"{
            "asset_path": "/assets/chair.ma",
            "name": "chair",
            "group": false,
            "location": [10.0, 0.0, 5.0],
            "rotation": [0.0, 90.0, 0.0],
            "scale": [1.0, 1.0, 1.0],
            "raytrace_distance": 200.0,
            "raytrace_alignment": 0.8,
            "raytrace_alignment_mask": 0.2,
            "parent_dcc_name": "room#42"
        }"#;
        let request: PlacementRequest = serde_json::from_str(json).expect("request");
        assert_eq!(request.alignment_threshold, Some(0.8));
        assert_eq!(request.reject_threshold, Some(0.2));
        assert_eq!(request.parent.as_deref(), Some("room#42"));
    }

    #[test]
    fn fills_defaults() {
        let request: PlacementRequest =
            serde_json::from_str(r#"{"location": [0, 0, 0]}"#).expect("request");
        assert_eq!(request, PlacementRequest::at([0.0; 3]));
    }
}
