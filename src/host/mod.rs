// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Scene Bridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Scene host capability interface.
//!
//! The bridge never owns a scene graph. Everything it does to the live session goes through
//! [`SceneHost`], which a host integration implements on top of its native primitives.
//! [`MemoryScene`] is a self-contained implementation used by the binary and by tests.
//!
//! Unit contract: transform primitives take and return host *working units* (which the user can
//! change at any time, see [`SceneHost::centimeters_per_unit`]); geometry queries
//! ([`SceneHost::world_triangles`]) return the host's fixed internal unit, centimetres.

mod memory;
mod undo;

use smol_str::SmolStr;
use thiserror::Error;

use crate::model::{Aabb, Handle, PersistentId, Pos3, RawTransform, TransformPatch};

pub use memory::{Asset, MemoryScene, MeshPart, DEFAULT_UNDO_LIMIT};
pub use undo::UndoScope;

pub type Triangle = [Pos3; 3];

pub type HostResult<T> = Result<T, HostError>;

/// A host primitive failed.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("node {0} does not exist")]
    MissingNode(Handle),

    #[error("asset {path:?} could not be imported: {reason}")]
    Import { path: String, reason: String },

    #[error("cannot parent {child} under {parent}: it would create a cycle")]
    Cycle { child: Handle, parent: Handle },

    #[error("scene could not be saved: {0}")]
    Save(String),

    #[error("host does not support {0}")]
    Unsupported(&'static str),

    #[error("script failed: {0}")]
    Script(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RigidBodyKind {
    Dynamic,
    Static,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationControl {
    /// Rewind and play forward.
    Start,
    /// Stop, rewind and tear down every rigid body, discarding the result.
    Cancel,
    /// Tear down every rigid body and stop, keeping the simulated poses.
    End,
}

/// Escape hatch for running raw host-native script text.
pub trait ScriptHost {
    /// Executes `source`; a returned value is sent back to the peer.
    fn execute(&mut self, source: &str) -> HostResult<Option<String>>;
}

/// Primitives the bridge consumes from a live scene session.
///
/// Implementations are driven from exactly one thread at a time; the bridge serialises every
/// call through its worker, so methods need no internal locking.
pub trait SceneHost: Send {
    fn exists(&self, node: Handle) -> bool;

    fn label(&self, node: Handle) -> Option<SmolStr>;

    fn persistent_id(&self, node: Handle) -> Option<PersistentId>;

    fn find_by_id(&self, id: &PersistentId) -> Option<Handle>;

    /// All live nodes whose display label equals `label`.
    fn find_by_label(&self, label: &str) -> Vec<Handle>;

    fn rename(&mut self, node: Handle, label: &str) -> HostResult<()>;

    fn parent(&self, node: Handle) -> Option<Handle>;

    /// Direct transform children.
    fn children(&self, node: Handle) -> Vec<Handle>;

    /// Reparents `node`, keeping its world transform. `None` moves it to the world root.
    fn set_parent(&mut self, node: Handle, parent: Option<Handle>) -> HostResult<()>;

    /// All transform descendants, depth-first, parents before children.
    fn descendants(&self, node: Handle) -> Vec<Handle> {
        let mut out = Vec::new();
        let mut stack = self.children(node);
        stack.reverse();
        while let Some(next) = stack.pop() {
            out.push(next);
            let mut children = self.children(next);
            children.reverse();
            stack.extend(children);
        }
        out
    }

    /// Every transform node in the scene, in enumeration order.
    fn transforms(&self) -> Vec<Handle>;

    fn transform(&self, node: Handle) -> HostResult<RawTransform>;

    fn set_transform(&mut self, node: Handle, patch: TransformPatch) -> HostResult<()>;

    /// Bakes the node's transform into its geometry and resets it to identity, leaving the
    /// pivot where it was in world space.
    fn freeze_transform(&mut self, node: Handle) -> HostResult<()>;

    /// Whether the node carries geometry directly (not through a child).
    fn has_mesh(&self, node: Handle) -> bool;

    /// Object-space bounds of the node's own geometry, in working units.
    fn local_bounds(&self, node: Handle) -> HostResult<Option<Aabb>>;

    /// World-space triangles of the node's own geometry, in centimetres.
    fn world_triangles(&self, node: Handle) -> HostResult<Vec<Triangle>>;

    fn create_group(&mut self, label: &str, members: &[Handle]) -> HostResult<Handle>;

    /// Creates a mesh node from world-space triangles given in working units.
    fn create_mesh(&mut self, label: &str, triangles: &[Triangle]) -> HostResult<Handle>;

    /// Duplicates the node and its geometry (not its child transforms) under the same parent.
    fn duplicate(&mut self, node: Handle) -> HostResult<Handle>;

    fn delete(&mut self, node: Handle) -> HostResult<()>;

    /// Whether `path` names an importable asset file.
    fn asset_exists(&self, path: &str) -> bool;

    /// Imports an asset file and returns the new top-level transforms.
    fn import_asset(&mut self, path: &str) -> HostResult<Vec<Handle>>;

    /// Whether the node comes from a file reference rather than living in the scene.
    fn is_referenced(&self, node: Handle) -> bool;

    fn reference_file(&self, node: Handle) -> Option<String>;

    /// Unloads the file reference the node comes from.
    fn remove_reference(&mut self, node: Handle) -> HostResult<()>;

    /// Persistent source-asset attribute stored on the node.
    fn reference_tag(&self, node: Handle) -> Option<String>;

    fn set_reference_tag(&mut self, node: Handle, path: &str) -> HostResult<()>;

    /// Nodes whose source-asset attribute equals `path`, in enumeration order.
    fn tagged_with(&self, path: &str) -> Vec<Handle>;

    /// Geometry nodes inside the active viewport's frustum, or `None` when no viewport is active.
    fn visible_geometry(&self) -> Option<Vec<Handle>>;

    fn selection(&self) -> Vec<Handle>;

    fn select(&mut self, nodes: &[Handle]) -> HostResult<()>;

    fn set_visible(&mut self, nodes: &[Handle], visible: bool) -> HostResult<()>;

    /// Size of one working unit in centimetres, read fresh on every call.
    fn centimeters_per_unit(&self) -> f64;

    fn open_undo_chunk(&mut self);

    fn close_undo_chunk(&mut self);

    fn scene_name(&self) -> Option<String>;

    fn save_scene(&mut self) -> HostResult<()>;

    /// Opens a scene file, discarding unsaved changes. `Ok(false)` when the file does not exist.
    fn open_scene(&mut self, path: &str) -> HostResult<bool>;

    fn add_rigid_body(&mut self, node: Handle, kind: RigidBodyKind) -> HostResult<()>;

    fn simulation(&mut self, control: SimulationControl) -> HostResult<()>;

    fn script_host(&mut self) -> Option<&mut dyn ScriptHost> {
        None
    }
}
