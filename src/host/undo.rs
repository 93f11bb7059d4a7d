// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Scene Bridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::ops::{Deref, DerefMut};

use super::SceneHost;

/// Undo chunk held open for the lifetime of the guard.
///
/// The chunk is closed on drop, so early returns, `?` and unwinding panics all leave the host's
/// undo history with a single boundary per command.
pub struct UndoScope<'a, H: SceneHost + ?Sized> {
    host: &'a mut H,
}

impl<'a, H: SceneHost + ?Sized> UndoScope<'a, H> {
    pub fn open(host: &'a mut H) -> Self {
        host.open_undo_chunk();
        Self { host }
    }
}

impl<H: SceneHost + ?Sized> Deref for UndoScope<'_, H> {
    type Target = H;

    fn deref(&self) -> &H {
        self.host
    }
}

impl<H: SceneHost + ?Sized> DerefMut for UndoScope<'_, H> {
    fn deref_mut(&mut self) -> &mut H {
        self.host
    }
}

impl<H: SceneHost + ?Sized> Drop for UndoScope<'_, H> {
    fn drop(&mut self) {
        self.host.close_undo_chunk();
    }
}
