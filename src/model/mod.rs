// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Scene Bridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model shared by the protocol, identity and geometry layers.

pub mod ids;
pub mod placement;
pub mod stable_name;
pub mod transform;

pub use ids::{Handle, Id, IdError, PersistentId};
pub use placement::{PlacementRequest, PolygonGeometry, TriangleGeometry};
pub use stable_name::{ParseStableNameError, StableName};
pub use transform::{Aabb, ObjectTransform, Pos3, RawTransform, TransformPatch, Vec3};
