// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Scene Bridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Stable name ↔ live handle resolution.
//!
//! A miss is a normal outcome (`None`), never an error: peers routinely reference objects the
//! user deleted a moment ago.

mod redirect;

use tracing::trace;

use crate::host::SceneHost;
use crate::model::{Handle, PersistentId, StableName};

pub use redirect::RedirectTable;

/// Resolves a stable name in three steps: a redirect recorded under this exact name (evicted
/// when its target is gone), then the persistent id, then, for label-only names, the display
/// label when exactly one live node carries it.
pub fn resolve<H: SceneHost + ?Sized>(
    host: &H,
    redirects: &mut RedirectTable,
    name: &StableName,
) -> Option<Handle> {
    if let Some(target) = redirects.get(name) {
        if host.exists(target) {
            return Some(target);
        }
        trace!(%name, %target, "evicting dead redirect");
        redirects.evict(name);
    }

    if let Some(id) = name.id() {
        return host.find_by_id(id);
    }

    match host.find_by_label(name.label()).as_slice() {
        [only] => Some(*only),
        _ => None,
    }
}

/// Parses and resolves one raw name; unparsable input is a miss.
pub fn resolve_str<H: SceneHost + ?Sized>(
    host: &H,
    redirects: &mut RedirectTable,
    raw: &str,
) -> Option<Handle> {
    let name = StableName::parse(raw).ok()?;
    resolve(host, redirects, &name)
}

/// Resolves a comma-separated list, keeping positions.
pub fn resolve_list<H: SceneHost + ?Sized>(
    host: &H,
    redirects: &mut RedirectTable,
    raw: &str,
) -> Vec<Option<Handle>> {
    StableName::parse_list(raw)
        .into_iter()
        .map(|name| name.and_then(|name| resolve(host, redirects, &name)))
        .collect()
}

/// Current stable name of a live node, computed from host state on every call.
pub fn name_for<H: SceneHost + ?Sized>(host: &H, node: Handle) -> Option<StableName> {
    let label = host.label(node)?;
    let id = host.persistent_id(node)?;
    let id = PersistentId::new(id.as_str().to_ascii_lowercase()).ok()?;
    Some(StableName::new(label, id))
}

/// Stable names for `nodes`; dead handles map to `None` in place.
pub fn names_for<H: SceneHost + ?Sized>(host: &H, nodes: &[Handle]) -> Vec<Option<StableName>> {
    nodes.iter().map(|node| name_for(host, *node)).collect()
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;
    use crate::host::MemoryScene;

    #[fixture]
    fn scene() -> MemoryScene {
        let mut scene = MemoryScene::new();
        scene.create_group("chair", &[]).expect("chair");
        scene.create_group("table", &[]).expect("table");
        scene
    }

    fn first(scene: &MemoryScene, label: &str) -> Handle {
        scene.find_by_label(label)[0]
    }

    #[rstest]
    fn resolves_by_id_regardless_of_label(scene: MemoryScene) {
        let mut redirects = RedirectTable::new();
        let chair = first(&scene, "chair");
        let id = scene.persistent_id(chair).expect("id");
        let stale = StableName::new("something_else", id);
        assert_eq!(resolve(&scene, &mut redirects, &stale), Some(chair));
    }

    #[rstest]
    fn name_survives_repeated_renames(mut scene: MemoryScene) {
        let mut redirects = RedirectTable::new();
        let chair = first(&scene, "chair");
        for i in 0..5 {
            let before = name_for(&scene, chair).expect("name");
            scene.rename(chair, &format!("chair_v{i}")).expect("rename");
            assert_eq!(resolve(&scene, &mut redirects, &before), Some(chair));
        }
    }

    #[rstest]
    fn label_only_requires_a_unique_match(mut scene: MemoryScene) {
        let mut redirects = RedirectTable::new();
        assert_eq!(
            resolve_str(&scene, &mut redirects, "table"),
            Some(first(&scene, "table"))
        );

        let chair = first(&scene, "chair");
        scene.rename(chair, "table").expect("rename");
        assert_eq!(resolve_str(&scene, &mut redirects, "table"), None);
    }

    #[rstest]
    fn unknown_id_does_not_fall_back_to_label(scene: MemoryScene) {
        let mut redirects = RedirectTable::new();
        assert_eq!(resolve_str(&scene, &mut redirects, "chair#ffffffff"), None);
    }

    #[rstest]
    fn redirect_wins_and_self_heals(mut scene: MemoryScene) {
        let mut redirects = RedirectTable::new();
        let chair = first(&scene, "chair");
        let table = first(&scene, "table");
        let old = name_for(&scene, chair).expect("name");
        redirects.record(old.clone(), table);
        assert_eq!(resolve(&scene, &mut redirects, &old), Some(table));

        scene.delete(table).expect("delete");
        assert_eq!(resolve(&scene, &mut redirects, &old), Some(chair));
        assert!(redirects.is_empty());
    }

    #[rstest]
    fn list_resolution_keeps_positions(scene: MemoryScene) {
        let mut redirects = RedirectTable::new();
        let resolved = resolve_list(&scene, &mut redirects, "chair,,missing#1,table");
        assert_eq!(
            resolved,
            vec![Some(first(&scene, "chair")), None, None, Some(first(&scene, "table"))]
        );
    }

    #[rstest]
    fn names_are_label_hash_lowercase_id(scene: MemoryScene) {
        let chair = first(&scene, "chair");
        let name = name_for(&scene, chair).expect("name");
        let id = scene.persistent_id(chair).expect("id");
        assert_eq!(
            name.to_string(),
            format!("chair#{}", id.as_str().to_ascii_lowercase())
        );
        assert_eq!(names_for(&scene, &[chair, Handle::from_raw(999)])[1], None);
    }
}
