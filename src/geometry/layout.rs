// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Scene Bridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::{Aabb, Pos3, Vec3};

/// Horizontal extent of an object and where its bottom centre sits relative to its position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowSlot {
    pub width: f64,
    pub bottom_offset: Vec3,
}

impl RowSlot {
    /// Slot for an object at the origin whose world bounds are `bounds`.
    pub fn from_bounds(bounds: &Aabb) -> Self {
        Self {
            width: bounds.size().x,
            bottom_offset: bounds.bottom_center().coords,
        }
    }
}

/// Lines objects up along X, centred on `anchor`, each one's bottom centre landing on the row.
///
/// Returns one object position per slot.
pub fn row_positions(slots: &[RowSlot], anchor: &Pos3) -> Vec<Pos3> {
    let total: f64 = slots.iter().map(|s| s.width).sum();
    let mut cursor = -total * 0.5;
    slots
        .iter()
        .map(|slot| {
            let center_x = cursor + slot.width * 0.5;
            cursor += slot.width;
            Pos3::new(anchor.x + center_x, anchor.y, anchor.z) - slot.bottom_offset
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(width: f64) -> RowSlot {
        RowSlot {
            width,
            bottom_offset: Vec3::zeros(),
        }
    }

    #[test]
    fn single_slot_centres_on_anchor() {
        let anchor = Pos3::new(5.0, 1.0, 2.0);
        assert_eq!(row_positions(&[slot(10.0)], &anchor), vec![anchor]);
    }

    #[test]
    fn slots_are_packed_by_width() {
        let slots = [slot(10.0), slot(30.0)];
        let positions = row_positions(&slots, &Pos3::origin());
        assert_eq!(
            positions,
            vec![Pos3::new(-15.0, 0.0, 0.0), Pos3::new(5.0, 0.0, 0.0)]
        );
    }

    #[test]
    fn bottom_offset_is_compensated() {
        // A box centred on its position: the bottom is 5 below, so the object is lifted.
        let bounds = Aabb::new(Pos3::new(-2.0, -5.0, -1.0), Pos3::new(2.0, 5.0, 1.0));
        let slot = RowSlot::from_bounds(&bounds);
        assert_eq!(slot.width, 4.0);
        let positions = row_positions(&[slot], &Pos3::new(0.0, 10.0, 0.0));
        assert_eq!(positions, vec![Pos3::new(0.0, 15.0, 0.0)]);
    }
}
