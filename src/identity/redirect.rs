// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Scene Bridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashMap;

use crate::model::{Handle, StableName};

/// Old name → current node, for objects replaced behind the peer's back.
///
/// Lives for one server run and is never persisted. Entries leave the table when their target
/// is removed through the bridge ([`RedirectTable::purge`]) or when a lookup finds the target
/// gone.
#[derive(Debug, Default, Clone)]
pub struct RedirectTable {
    entries: HashMap<StableName, Handle>,
}

impl RedirectTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Points `name` at `target`, replacing any earlier target.
    pub fn record(&mut self, name: StableName, target: Handle) {
        self.entries.insert(name, target);
    }

    pub fn get(&self, name: &StableName) -> Option<Handle> {
        self.entries.get(name).copied()
    }

    pub fn evict(&mut self, name: &StableName) -> Option<Handle> {
        self.entries.remove(name)
    }

    /// Moves every entry pointing at `from` over to `to`, so chains of replacements keep
    /// resolving from the oldest name.
    pub fn retarget(&mut self, from: Handle, to: Handle) {
        for target in self.entries.values_mut().filter(|t| **t == from) {
            *target = to;
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Drops every entry whose target is in `removed`.
    pub fn purge(&mut self, removed: &[Handle]) {
        if removed.is_empty() {
            return;
        }
        self.entries.retain(|_, target| !removed.contains(target));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::RedirectTable;
    use crate::model::{Handle, StableName};

    #[test]
    fn record_replaces_and_purge_drops_targets() {
        let mut table = RedirectTable::new();
        let old = StableName::label_only("tmp");
        table.record(old.clone(), Handle::from_raw(1));
        table.record(old.clone(), Handle::from_raw(2));
        table.record(StableName::label_only("other"), Handle::from_raw(3));
        assert_eq!(table.get(&old), Some(Handle::from_raw(2)));
        assert_eq!(table.len(), 2);

        table.purge(&[Handle::from_raw(2)]);
        assert_eq!(table.get(&old), None);
        assert_eq!(table.len(), 1);
    }
}
