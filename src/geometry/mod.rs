// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Scene Bridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Ray casting against viewport geometry and the placement math built on it.
//!
//! There is no acceleration structure: the candidate set is whatever the active viewport
//! draws, which is small on the interactive paths this serves.

pub mod align;
pub mod footprint;
pub mod layout;
pub mod primitives;
pub mod ray;
pub mod raycast;
pub mod rotation;
pub mod units;

pub use align::{AlignmentPolicy, SurfaceFit};
pub use footprint::{group_transform, object_transform};
pub use layout::{row_positions, RowSlot};
pub use ray::{Ray, RayHit};
pub use raycast::cast;
pub use units::UnitScale;
