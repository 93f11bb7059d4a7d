// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Scene Bridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! In-memory scene host.
//!
//! Nodes store world-space transforms directly, so reparenting never moves anything and moving
//! a parent does not carry its children. Geometry is kept in object space, in centimetres.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::path::Path;

use nalgebra::Rotation3;
use smol_str::SmolStr;

use super::{
    HostError, HostResult, RigidBodyKind, SceneHost, ScriptHost, SimulationControl, Triangle,
};
use crate::geometry::primitives::box_triangles;
use crate::geometry::rotation::from_euler_degrees;
use crate::model::{Aabb, Handle, PersistentId, Pos3, RawTransform, TransformPatch, Vec3};

/// One top-level object produced by importing an [`Asset`].
#[derive(Debug, Clone, PartialEq)]
pub struct MeshPart {
    pub label: SmolStr,
    /// Object-space triangles, in centimetres.
    pub triangles: Vec<Triangle>,
    /// World translation of the part right after import, in centimetres.
    pub offset: Vec3,
}

impl MeshPart {
    pub fn new(label: impl Into<SmolStr>, triangles: Vec<Triangle>) -> Self {
        Self {
            label: label.into(),
            triangles,
            offset: Vec3::zeros(),
        }
    }

    /// Box resting on the origin: centred on X/Z, bottom at Y = 0.
    pub fn resting_box(label: impl Into<SmolStr>, size: Vec3) -> Self {
        let half = size * 0.5;
        let min = Pos3::new(-half.x, 0.0, -half.z);
        let max = Pos3::new(half.x, size.y, half.z);
        Self::new(label, box_triangles(min, max))
    }

    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }
}

/// An importable file known to the [`MemoryScene`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Asset {
    pub parts: Vec<MeshPart>,
    /// Import as a file reference rather than as scene-owned geometry.
    pub referenced: bool,
    /// Fail every import of this file.
    pub broken: bool,
}

impl Asset {
    pub fn single(part: MeshPart) -> Self {
        Self {
            parts: vec![part],
            ..Self::default()
        }
    }

    pub fn parts(parts: Vec<MeshPart>) -> Self {
        Self {
            parts,
            ..Self::default()
        }
    }

    pub fn referenced(mut self) -> Self {
        self.referenced = true;
        self
    }

    pub fn broken(mut self) -> Self {
        self.broken = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
struct ReferenceLink {
    path: String,
    instance: u64,
}

#[derive(Debug, Clone, PartialEq)]
struct Node {
    label: SmolStr,
    id: PersistentId,
    parent: Option<Handle>,
    children: Vec<Handle>,
    translation: Vec3,
    rotation: Vec3,
    scale: Vec3,
    /// Object-space pivot.
    pivot: Vec3,
    mesh: Option<Vec<Triangle>>,
    tag: Option<String>,
    reference: Option<ReferenceLink>,
    visible: bool,
    in_view: bool,
}

impl Node {
    fn new(label: SmolStr, id: PersistentId) -> Self {
        Self {
            label,
            id,
            parent: None,
            children: Vec::new(),
            translation: Vec3::zeros(),
            rotation: Vec3::zeros(),
            scale: Vec3::repeat(1.0),
            pivot: Vec3::zeros(),
            mesh: None,
            tag: None,
            reference: None,
            visible: true,
            in_view: true,
        }
    }

    fn rotation_matrix(&self) -> Rotation3<f64> {
        from_euler_degrees(&self.rotation)
    }

    fn to_world(&self, p: &Pos3) -> Pos3 {
        Pos3::from(
            self.translation + self.rotation_matrix() * p.coords.component_mul(&self.scale),
        )
    }

    fn world_pivot(&self) -> Vec3 {
        self.translation + self.rotation_matrix() * self.pivot.component_mul(&self.scale)
    }
}

/// Everything undo can restore.
#[derive(Debug, Clone, Default, PartialEq)]
struct SceneState {
    nodes: BTreeMap<Handle, Node>,
    selection: Vec<Handle>,
    rigid_bodies: BTreeMap<Handle, RigidBodyKind>,
    simulating: bool,
    scene_path: Option<String>,
}

/// Closed undo chunks kept by default.
pub const DEFAULT_UNDO_LIMIT: usize = 100;

/// Self-contained [`SceneHost`] with snapshot-based undo.
///
/// A chunk snapshots the scene when it opens and keeps that snapshot only if the scene changed
/// by the time it closes, so queries leave no history behind. At most `undo_limit` chunks are
/// kept; the oldest is dropped first.
#[derive(Debug)]
pub struct MemoryScene {
    state: SceneState,
    next_handle: u64,
    next_id: u64,
    next_reference: u64,
    undo_stack: VecDeque<SceneState>,
    undo_limit: usize,
    chunk_start: Option<SceneState>,
    depth: usize,
    assets: HashMap<String, Asset>,
    scene_files: HashMap<String, SceneState>,
    viewport_active: bool,
    cm_per_unit: f64,
    imports: usize,
    duplicates: usize,
    saves: usize,
    scripts: Vec<String>,
}

impl Default for MemoryScene {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryScene {
    pub fn new() -> Self {
        Self {
            state: SceneState::default(),
            next_handle: 1,
            next_id: 1,
            next_reference: 1,
            undo_stack: VecDeque::new(),
            undo_limit: DEFAULT_UNDO_LIMIT,
            chunk_start: None,
            depth: 0,
            assets: HashMap::new(),
            scene_files: HashMap::new(),
            viewport_active: true,
            cm_per_unit: 1.0,
            imports: 0,
            duplicates: 0,
            saves: 0,
            scripts: Vec::new(),
        }
    }

    /// A small furnished room: a 20 m floor plus a table, with two assets on disk.
    pub fn demo() -> Self {
        let mut scene = Self::new();
        let floor = box_triangles(
            Pos3::new(-1000.0, -10.0, -1000.0),
            Pos3::new(1000.0, 0.0, 1000.0),
        );
        scene.insert_mesh("floor", floor);
        let table = scene.insert_mesh(
            "table",
            MeshPart::resting_box("table", Vec3::new(160.0, 75.0, 90.0)).triangles,
        );
        if let Some(node) = scene.state.nodes.get_mut(&table) {
            node.translation = Vec3::new(200.0, 0.0, 0.0);
        }
        scene.state.scene_path = Some("demo/room.ma".to_owned());
        scene.register_asset(
            "assets/chair.ma",
            Asset::single(MeshPart::resting_box("chair", Vec3::new(45.0, 90.0, 45.0))),
        );
        scene.register_asset(
            "assets/lamp.ma",
            Asset::single(MeshPart::resting_box("lamp", Vec3::new(30.0, 150.0, 30.0))),
        );
        scene
    }

    pub fn register_asset(&mut self, path: impl Into<String>, asset: Asset) {
        self.assets.insert(path.into(), asset);
    }

    /// Makes the current scene openable under `path`.
    pub fn store_scene_file(&mut self, path: impl Into<String>) {
        let path = path.into();
        let mut snapshot = self.state.clone();
        snapshot.scene_path = Some(path.clone());
        self.scene_files.insert(path, snapshot);
    }

    pub fn set_viewport_active(&mut self, active: bool) {
        self.viewport_active = active;
    }

    pub fn set_in_view(&mut self, node: Handle, in_view: bool) {
        if let Some(node) = self.state.nodes.get_mut(&node) {
            node.in_view = in_view;
        }
    }

    pub fn set_centimeters_per_unit(&mut self, cm_per_unit: f64) {
        self.cm_per_unit = cm_per_unit;
    }

    /// Sets the object-space pivot, in working units.
    pub fn set_pivot(&mut self, node: Handle, pivot: Vec3) -> HostResult<()> {
        let cm = self.cm_per_unit;
        self.node_mut(node)?.pivot = pivot * cm;
        Ok(())
    }

    /// Pops the most recent closed undo chunk. Returns `false` when there is nothing to undo
    /// or a chunk is still open.
    pub fn undo(&mut self) -> bool {
        if self.depth > 0 {
            return false;
        }
        match self.undo_stack.pop_back() {
            Some(state) => {
                self.state = state;
                true
            }
            None => false,
        }
    }

    pub fn undo_depth(&self) -> usize {
        self.depth
    }

    /// Closed chunks that [`MemoryScene::undo`] can still restore.
    pub fn undo_steps(&self) -> usize {
        self.undo_stack.len()
    }

    /// Caps the undo history, dropping the oldest chunks beyond `limit`.
    pub fn set_undo_limit(&mut self, limit: usize) {
        self.undo_limit = limit;
        self.trim_undo();
    }

    fn trim_undo(&mut self) {
        while self.undo_stack.len() > self.undo_limit {
            self.undo_stack.pop_front();
        }
    }

    pub fn import_count(&self) -> usize {
        self.imports
    }

    pub fn duplicate_count(&self) -> usize {
        self.duplicates
    }

    pub fn save_count(&self) -> usize {
        self.saves
    }

    pub fn node_count(&self) -> usize {
        self.state.nodes.len()
    }

    pub fn is_visible(&self, node: Handle) -> bool {
        self.state.nodes.get(&node).is_some_and(|n| n.visible)
    }

    pub fn rigid_body(&self, node: Handle) -> Option<RigidBodyKind> {
        self.state.rigid_bodies.get(&node).copied()
    }

    pub fn is_simulating(&self) -> bool {
        self.state.simulating
    }

    pub fn executed_scripts(&self) -> &[String] {
        &self.scripts
    }

    fn node(&self, handle: Handle) -> HostResult<&Node> {
        self.state.nodes.get(&handle).ok_or(HostError::MissingNode(handle))
    }

    fn node_mut(&mut self, handle: Handle) -> HostResult<&mut Node> {
        self.state.nodes.get_mut(&handle).ok_or(HostError::MissingNode(handle))
    }

    fn unique_label(&self, base: &str) -> SmolStr {
        let taken = |label: &str| self.state.nodes.values().any(|n| n.label == label);
        if !taken(base) {
            return base.into();
        }
        let stem = base.trim_end_matches(|c: char| c.is_ascii_digit());
        (1u64..)
            .map(|n| format!("{stem}{n}"))
            .find(|candidate| !taken(candidate))
            .map(SmolStr::from)
            .unwrap_or_else(|| base.into())
    }

    fn insert(&mut self, label: &str) -> Handle {
        let handle = Handle::from_raw(self.next_handle);
        self.next_handle += 1;
        let id = PersistentId::sequential(self.next_id);
        self.next_id += 1;
        let label = self.unique_label(label);
        self.state.nodes.insert(handle, Node::new(label, id));
        handle
    }

    /// Inserts a mesh node whose object space is world space, in centimetres.
    fn insert_mesh(&mut self, label: &str, triangles: Vec<Triangle>) -> Handle {
        let handle = self.insert(label);
        let pivot = Aabb::from_points(triangles.iter().flatten()).map(|b| b.center().coords);
        if let Some(node) = self.state.nodes.get_mut(&handle) {
            node.pivot = pivot.unwrap_or_else(Vec3::zeros);
            node.mesh = Some(triangles);
        }
        handle
    }

    fn detach(&mut self, node: Handle) {
        let parent = self.state.nodes.get(&node).and_then(|n| n.parent);
        if let Some(parent) = parent.and_then(|p| self.state.nodes.get_mut(&p)) {
            parent.children.retain(|c| *c != node);
        }
    }

    fn remove_subtree(&mut self, node: Handle) {
        self.detach(node);
        let mut doomed = vec![node];
        doomed.extend(self.descendants(node));
        for handle in doomed {
            self.state.nodes.remove(&handle);
            self.state.rigid_bodies.remove(&handle);
            self.state.selection.retain(|s| *s != handle);
        }
    }
}

impl SceneHost for MemoryScene {
    fn exists(&self, node: Handle) -> bool {
        self.state.nodes.contains_key(&node)
    }

    fn label(&self, node: Handle) -> Option<SmolStr> {
        self.state.nodes.get(&node).map(|n| n.label.clone())
    }

    fn persistent_id(&self, node: Handle) -> Option<PersistentId> {
        self.state.nodes.get(&node).map(|n| n.id.clone())
    }

    fn find_by_id(&self, id: &PersistentId) -> Option<Handle> {
        self.state.nodes.iter().find(|(_, n)| &n.id == id).map(|(h, _)| *h)
    }

    fn find_by_label(&self, label: &str) -> Vec<Handle> {
        self.state.nodes.iter().filter(|(_, n)| n.label == label).map(|(h, _)| *h).collect()
    }

    fn rename(&mut self, node: Handle, label: &str) -> HostResult<()> {
        self.node_mut(node)?.label = label.into();
        Ok(())
    }

    fn parent(&self, node: Handle) -> Option<Handle> {
        self.state.nodes.get(&node).and_then(|n| n.parent)
    }

    fn children(&self, node: Handle) -> Vec<Handle> {
        self.state.nodes.get(&node).map(|n| n.children.clone()).unwrap_or_default()
    }

    fn set_parent(&mut self, node: Handle, parent: Option<Handle>) -> HostResult<()> {
        self.node(node)?;
        if let Some(parent) = parent {
            self.node(parent)?;
            if parent == node || self.descendants(node).contains(&parent) {
                return Err(HostError::Cycle {
                    child: node,
                    parent,
                });
            }
        }
        self.detach(node);
        self.node_mut(node)?.parent = parent;
        if let Some(parent) = parent {
            self.node_mut(parent)?.children.push(node);
        }
        Ok(())
    }

    fn transforms(&self) -> Vec<Handle> {
        self.state.nodes.keys().copied().collect()
    }

    fn transform(&self, node: Handle) -> HostResult<RawTransform> {
        let n = self.node(node)?;
        let cm = self.cm_per_unit;
        Ok(RawTransform {
            translation: n.translation / cm,
            rotation: n.rotation,
            scale: n.scale,
            world_pivot: n.world_pivot() / cm,
            local_pivot: n.pivot / cm,
        })
    }

    fn set_transform(&mut self, node: Handle, patch: TransformPatch) -> HostResult<()> {
        let cm = self.cm_per_unit;
        let n = self.node_mut(node)?;
        if let Some(t) = patch.translation {
            n.translation = t * cm;
        }
        if let Some(r) = patch.rotation {
            n.rotation = r;
        }
        if let Some(s) = patch.scale {
            n.scale = s;
        }
        Ok(())
    }

    fn freeze_transform(&mut self, node: Handle) -> HostResult<()> {
        let n = self.node_mut(node)?;
        let world_pivot = n.world_pivot();
        if let Some(mesh) = n.mesh.take() {
            let baked = mesh.iter().map(|tri| tri.map(|p| n.to_world(&p))).collect();
            n.mesh = Some(baked);
        }
        n.pivot = world_pivot;
        n.translation = Vec3::zeros();
        n.rotation = Vec3::zeros();
        n.scale = Vec3::repeat(1.0);
        Ok(())
    }

    fn has_mesh(&self, node: Handle) -> bool {
        self.state.nodes.get(&node).is_some_and(|n| n.mesh.is_some())
    }

    fn local_bounds(&self, node: Handle) -> HostResult<Option<Aabb>> {
        let n = self.node(node)?;
        let bounds = n.mesh.as_ref().and_then(|mesh| Aabb::from_points(mesh.iter().flatten()));
        Ok(bounds.map(|b| b.scaled(1.0 / self.cm_per_unit)))
    }

    fn world_triangles(&self, node: Handle) -> HostResult<Vec<Triangle>> {
        let n = self.node(node)?;
        Ok(n.mesh
            .as_ref()
            .map(|mesh| {
                mesh.iter()
                    .map(|tri| tri.map(|p| n.to_world(&p)))
                    .collect()
            })
            .unwrap_or_default())
    }

    fn create_group(&mut self, label: &str, members: &[Handle]) -> HostResult<Handle> {
        for member in members {
            self.node(*member)?;
        }
        let group = self.insert(label);
        for member in members {
            self.set_parent(*member, Some(group))?;
        }
        Ok(group)
    }

    fn create_mesh(&mut self, label: &str, triangles: &[Triangle]) -> HostResult<Handle> {
        let cm = self.cm_per_unit;
        let scaled = triangles.iter().map(|tri| tri.map(|p| p * cm)).collect();
        Ok(self.insert_mesh(label, scaled))
    }

    fn duplicate(&mut self, node: Handle) -> HostResult<Handle> {
        let source = self.node(node)?.clone();
        let copy = self.insert(&source.label);
        let parent = source.parent;
        {
            let n = self.node_mut(copy)?;
            n.translation = source.translation;
            n.rotation = source.rotation;
            n.scale = source.scale;
            n.pivot = source.pivot;
            n.mesh = source.mesh;
            n.tag = source.tag;
            n.visible = source.visible;
            n.in_view = source.in_view;
        }
        if parent.is_some() {
            self.set_parent(copy, parent)?;
        }
        self.duplicates += 1;
        Ok(copy)
    }

    fn delete(&mut self, node: Handle) -> HostResult<()> {
        self.node(node)?;
        self.remove_subtree(node);
        Ok(())
    }

    fn asset_exists(&self, path: &str) -> bool {
        self.assets.contains_key(path)
    }

    fn import_asset(&mut self, path: &str) -> HostResult<Vec<Handle>> {
        let asset = self.assets.get(path).cloned().ok_or_else(|| HostError::Import {
            path: path.to_owned(),
            reason: "no such file".to_owned(),
        })?;
        if asset.broken {
            return Err(HostError::Import {
                path: path.to_owned(),
                reason: "unreadable file".to_owned(),
            });
        }
        self.imports += 1;

        let reference = asset.referenced.then(|| {
            let instance = self.next_reference;
            self.next_reference += 1;
            ReferenceLink {
                path: path.to_owned(),
                instance,
            }
        });
        let mut created = Vec::with_capacity(asset.parts.len());
        for part in asset.parts {
            let handle = self.insert(&part.label);
            let n = self.node_mut(handle)?;
            n.mesh = Some(part.triangles);
            n.translation = part.offset;
            n.reference = reference.clone();
            created.push(handle);
        }
        Ok(created)
    }

    fn is_referenced(&self, node: Handle) -> bool {
        self.state.nodes.get(&node).is_some_and(|n| n.reference.is_some())
    }

    fn reference_file(&self, node: Handle) -> Option<String> {
        self.state.nodes.get(&node).and_then(|n| n.reference.as_ref()).map(|r| r.path.clone())
    }

    fn remove_reference(&mut self, node: Handle) -> HostResult<()> {
        let link = self.node(node)?.reference.clone().ok_or(HostError::Unsupported(
            "removing a reference from a scene-owned node",
        ))?;
        let members: Vec<Handle> = self
            .state
            .nodes
            .iter()
            .filter(|(_, n)| n.reference.as_ref() == Some(&link))
            .map(|(h, _)| *h)
            .collect();
        for member in members {
            if self.exists(member) {
                self.remove_subtree(member);
            }
        }
        Ok(())
    }

    fn reference_tag(&self, node: Handle) -> Option<String> {
        self.state.nodes.get(&node).and_then(|n| n.tag.clone())
    }

    fn set_reference_tag(&mut self, node: Handle, path: &str) -> HostResult<()> {
        self.node_mut(node)?.tag = Some(path.to_owned());
        Ok(())
    }

    fn tagged_with(&self, path: &str) -> Vec<Handle> {
        self.state
            .nodes
            .iter()
            .filter(|(_, n)| n.tag.as_deref() == Some(path))
            .map(|(h, _)| *h)
            .collect()
    }

    fn visible_geometry(&self) -> Option<Vec<Handle>> {
        if !self.viewport_active {
            return None;
        }
        Some(
            self.state
                .nodes
                .iter()
                .filter(|(_, n)| n.mesh.is_some() && n.visible && n.in_view)
                .map(|(h, _)| *h)
                .collect(),
        )
    }

    fn selection(&self) -> Vec<Handle> {
        self.state.selection.clone()
    }

    fn select(&mut self, nodes: &[Handle]) -> HostResult<()> {
        self.state.selection = nodes.iter().copied().filter(|n| self.exists(*n)).collect();
        Ok(())
    }

    fn set_visible(&mut self, nodes: &[Handle], visible: bool) -> HostResult<()> {
        for node in nodes {
            self.node_mut(*node)?.visible = visible;
        }
        Ok(())
    }

    fn centimeters_per_unit(&self) -> f64 {
        self.cm_per_unit
    }

    fn open_undo_chunk(&mut self) {
        if self.depth == 0 && self.undo_limit > 0 {
            self.chunk_start = Some(self.state.clone());
        }
        self.depth += 1;
    }

    fn close_undo_chunk(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        if self.depth > 0 {
            return;
        }
        if let Some(start) = self.chunk_start.take() {
            if start != self.state {
                self.undo_stack.push_back(start);
                self.trim_undo();
            }
        }
    }

    fn scene_name(&self) -> Option<String> {
        let path = self.state.scene_path.as_deref()?;
        Path::new(path).file_name().map(|name| name.to_string_lossy().into_owned())
    }

    fn save_scene(&mut self) -> HostResult<()> {
        let path = self
            .state
            .scene_path
            .clone()
            .ok_or_else(|| HostError::Save("scene has never been saved".to_owned()))?;
        self.scene_files.insert(path, self.state.clone());
        self.saves += 1;
        Ok(())
    }

    fn open_scene(&mut self, path: &str) -> HostResult<bool> {
        match self.scene_files.get(path) {
            Some(state) => {
                self.state = state.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn add_rigid_body(&mut self, node: Handle, kind: RigidBodyKind) -> HostResult<()> {
        self.node(node)?;
        self.state.rigid_bodies.insert(node, kind);
        Ok(())
    }

    fn simulation(&mut self, control: SimulationControl) -> HostResult<()> {
        match control {
            SimulationControl::Start => self.state.simulating = true,
            SimulationControl::Cancel | SimulationControl::End => {
                self.state.simulating = false;
                self.state.rigid_bodies.clear();
            }
        }
        Ok(())
    }

    fn script_host(&mut self) -> Option<&mut dyn ScriptHost> {
        Some(self)
    }
}

impl ScriptHost for MemoryScene {
    fn execute(&mut self, source: &str) -> HostResult<Option<String>> {
        self.scripts.push(source.to_owned());
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_survive_rename_and_reparent() {
        let mut scene = MemoryScene::new();
        let a = scene.create_group("a", &[]).expect("a");
        let b = scene.create_group("b", &[]).expect("b");
        let id = scene.persistent_id(a).expect("id");
        scene.rename(a, "renamed").expect("rename");
        scene.set_parent(a, Some(b)).expect("parent");
        assert_eq!(scene.find_by_id(&id), Some(a));
        assert_eq!(scene.children(b), vec![a]);
    }

    #[test]
    fn labels_are_made_unique_on_creation() {
        let mut scene = MemoryScene::new();
        let a = scene.create_group("chair", &[]).expect("a");
        let b = scene.create_group("chair", &[]).expect("b");
        assert_eq!(scene.label(a).as_deref(), Some("chair"));
        assert_eq!(scene.label(b).as_deref(), Some("chair1"));
    }

    #[test]
    fn reparent_rejects_cycles() {
        let mut scene = MemoryScene::new();
        let a = scene.create_group("a", &[]).expect("a");
        let b = scene.create_group("b", &[a]).expect("b");
        assert!(matches!(
            scene.set_parent(b, Some(a)),
            Err(HostError::Cycle { .. })
        ));
    }

    #[test]
    fn transforms_follow_working_units() {
        let mut scene = MemoryScene::new();
        let node = scene.create_group("g", &[]).expect("g");
        scene.set_centimeters_per_unit(100.0);
        let patch = TransformPatch::translate(Vec3::new(1.0, 2.0, 3.0));
        scene.set_transform(node, patch).expect("move");
        scene.set_centimeters_per_unit(1.0);
        let raw = scene.transform(node).expect("transform");
        assert_eq!(raw.translation, Vec3::new(100.0, 200.0, 300.0));
    }

    #[test]
    fn freeze_bakes_geometry_in_place() {
        let mut scene = MemoryScene::new();
        let unit = box_triangles(Pos3::origin(), Pos3::new(1.0, 1.0, 1.0));
        let cube = scene.create_mesh("cube", &unit).expect("cube");
        scene
            .set_transform(
                cube,
                TransformPatch {
                    translation: Some(Vec3::new(10.0, 0.0, 0.0)),
                    rotation: None,
                    scale: Some(Vec3::repeat(2.0)),
                },
            )
            .expect("transform");
        let before = scene.world_triangles(cube).expect("before");
        scene.freeze_transform(cube).expect("freeze");
        let after = scene.world_triangles(cube).expect("after");
        assert_eq!(before, after);
        assert_eq!(
            scene.transform(cube).expect("raw").translation,
            Vec3::zeros()
        );
    }

    #[test]
    fn referenced_import_is_removed_as_a_unit() {
        let mut scene = MemoryScene::new();
        scene.register_asset(
            "set.ma",
            Asset::parts(vec![
                MeshPart::resting_box("a", Vec3::repeat(1.0)),
                MeshPart::resting_box("b", Vec3::repeat(1.0)),
            ])
            .referenced(),
        );
        let nodes = scene.import_asset("set.ma").expect("import");
        assert_eq!(nodes.len(), 2);
        assert!(scene.is_referenced(nodes[0]));
        scene.remove_reference(nodes[0]).expect("unload");
        assert_eq!(scene.node_count(), 0);
    }

    #[test]
    fn broken_asset_fails_import() {
        let mut scene = MemoryScene::new();
        scene.register_asset(
            "bad.ma",
            Asset::single(MeshPart::new("x", Vec::new())).broken(),
        );
        assert!(matches!(
            scene.import_asset("bad.ma"),
            Err(HostError::Import { .. })
        ));
        assert_eq!(scene.import_count(), 0);
    }

    #[test]
    fn viewport_controls_visible_geometry() {
        let mut scene = MemoryScene::demo();
        assert_eq!(scene.visible_geometry().map(|v| v.len()), Some(2));
        let table = scene.find_by_label("table")[0];
        scene.set_in_view(table, false);
        assert_eq!(scene.visible_geometry().map(|v| v.len()), Some(1));
        scene.set_viewport_active(false);
        assert!(scene.visible_geometry().is_none());
    }

    #[test]
    fn undo_restores_the_last_chunk() {
        let mut scene = MemoryScene::new();
        scene.open_undo_chunk();
        let g = scene.create_group("g", &[]).expect("g");
        scene.open_undo_chunk();
        scene.rename(g, "h").expect("rename");
        scene.close_undo_chunk();
        assert!(!scene.undo(), "chunk still open");
        scene.close_undo_chunk();
        assert!(scene.undo());
        assert_eq!(scene.node_count(), 0);
        assert!(!scene.undo());
    }

    #[test]
    fn read_only_chunks_leave_no_history() {
        let mut scene = MemoryScene::demo();
        for _ in 0..1000 {
            scene.open_undo_chunk();
            assert_eq!(scene.scene_name().as_deref(), Some("room.ma"));
            scene.close_undo_chunk();
        }
        assert_eq!(scene.undo_steps(), 0);
        assert!(!scene.undo());
    }

    #[test]
    fn undo_history_is_capped() {
        let mut scene = MemoryScene::new();
        scene.set_undo_limit(3);
        for i in 0..10 {
            scene.open_undo_chunk();
            scene.create_group(&format!("g{i}"), &[]).expect("group");
            scene.close_undo_chunk();
        }
        assert_eq!(scene.undo_steps(), 3);
        while scene.undo() {}
        assert_eq!(
            scene.node_count(),
            7,
            "only the last three chunks are undone"
        );

        scene.set_undo_limit(0);
        scene.open_undo_chunk();
        scene.create_group("late", &[]).expect("group");
        scene.close_undo_chunk();
        assert!(!scene.undo());
    }

    #[test]
    fn open_scene_reports_missing_files() {
        let mut scene = MemoryScene::demo();
        scene.store_scene_file("other.ma");
        assert!(!scene.open_scene("missing.ma").expect("open"));
        assert!(scene.open_scene("other.ma").expect("open"));
        assert_eq!(scene.scene_name().as_deref(), Some("other.ma"));
    }
}
