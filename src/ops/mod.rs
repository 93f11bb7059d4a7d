// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Scene Bridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Scene operations behind the peer's command vocabulary.
//!
//! Each [`Op`] is applied against a [`SceneContext`]: names are resolved through the identity
//! layer at apply time, missing objects are skipped, and host failures abort the operation with
//! an [`OpError`]. Positions and distances arrive from the peer in centimetres and are converted
//! to the host's working units on entry.

mod hierarchy;
mod lifecycle;
mod placement;
mod query;
mod reference;
mod simulation;
mod transform;


use serde::Deserialize;
use thiserror::Error;

use crate::geometry::UnitScale;
use crate::host::{HostError, SceneHost, SimulationControl};
use crate::identity::{self, RedirectTable};
use crate::model::{Handle, PlacementRequest, PolygonGeometry, TriangleGeometry, Vec3};

pub use reference::reference_path_of;

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    SceneName,
    Selection,
    VisibleMeshes,
    SelectedAndVisible,
    LocationData(Vec<String>),
    PivotData(Vec<String>),
    TransformData(Vec<String>),
    Parents(Vec<String>),
    VertexData(Vec<String>),
    VertexDataSingle(String),
    Raytrace {
        /// Centimetres.
        distance: f64,
        name: String,
        bidirectional: bool,
    },
    ReportDone,

    /// Keyed by temporary name, in the order the peer sent them.
    AddObjects(Vec<(String, PlacementRequest)>),
    AddObjectsFromTriangles(Vec<(String, TriangleGeometry)>),
    AddObjectsFromPolygons(Vec<PolygonGeometry>),
    AddMeshOnSelection(Vec<String>),
    DropAssets {
        /// Centimetres.
        anchor: Vec3,
        paths: Vec<String>,
    },

    /// First name is the new parent.
    Parent(Vec<String>),
    Unparent(Vec<String>),
    Remove(Vec<String>),
    RemoveDescendants(Vec<String>),
    Rename {
        name: String,
        label: String,
    },
    Select(Vec<String>),
    SetVisible {
        names: Vec<String>,
        visible: bool,
    },

    Transform {
        kind: TransformKind,
        relative: bool,
        /// Centimetres for translation, degrees for rotation, factors for scale.
        value: Vec3,
        names: Vec<String>,
    },
    TranslateAndRaytrace {
        /// Centimetres.
        location: Vec3,
        /// Centimetres.
        distance: f64,
        align_above: f64,
        names: Vec<String>,
        ignore: Vec<String>,
    },
    SetMesh {
        asset: String,
        names: Vec<String>,
    },
    SetMeshOnSelection(String),

    OpenFile(String),
    SaveScene,
    LearnFile(LearnFileRequest),
    Learn(String),

    EnableSimulation(Vec<String>),
    Simulation(SimulationControl),
    SimulationQuery,

    /// Accepted and deliberately ignored.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformKind {
    Translate,
    Rotate,
    Scale,
}

/// Payload of `learn_file`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LearnFileRequest {
    pub file_path: String,
    pub learn_file_path: String,
    pub tags: Vec<String>,
    pub project: Option<String>,
}

/// Result of an operation, before reply encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// No reply is written.
    Silent,
    /// Written verbatim.
    Text(String),
    /// Written as JSON.
    Value(serde_json::Value),
}

#[derive(Debug, Error)]
pub enum OpError {
    #[error(transparent)]
    Host(#[from] HostError),

    #[error("invalid geometry for {name:?}: {reason}")]
    Geometry { name: String, reason: String },

    #[error("scene file {0:?} does not exist")]
    MissingScene(String),

    #[error("failed to write learning data to {path:?}: {source}")]
    Learn {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode learning data: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type OpResult<T> = Result<T, OpError>;

/// Per-command view of the host plus the bridge's identity state.
pub struct SceneContext<'a> {
    pub host: &'a mut dyn SceneHost,
    pub redirects: &'a mut RedirectTable,
}

impl<'a> SceneContext<'a> {
    pub fn new(host: &'a mut dyn SceneHost, redirects: &'a mut RedirectTable) -> Self {
        Self { host, redirects }
    }

    pub fn units(&self) -> UnitScale {
        UnitScale::of(&*self.host)
    }

    pub fn resolve(&mut self, raw: &str) -> Option<Handle> {
        identity::resolve_str(&*self.host, self.redirects, raw)
    }

    /// Resolves each name, keeping positions.
    pub fn resolve_each(&mut self, names: &[String]) -> Vec<Option<Handle>> {
        names.iter().map(|raw| self.resolve(raw)).collect()
    }

    /// Resolved handles only, in input order.
    pub fn resolve_all(&mut self, names: &[String]) -> Vec<Handle> {
        self.resolve_each(names).into_iter().flatten().collect()
    }

    /// Wire name of a node, or an empty string once it is gone.
    pub fn wire_name(&self, node: Handle) -> String {
        identity::name_for(&*self.host, node).map(|n| n.to_string()).unwrap_or_default()
    }

    pub fn wire_names(&self, nodes: &[Handle]) -> Vec<String> {
        nodes.iter().map(|node| self.wire_name(*node)).collect()
    }
}

/// Applies one operation.
pub fn apply(ctx: &mut SceneContext<'_>, op: Op) -> OpResult<Output> {
    match op {
        Op::SceneName => Ok(query::scene_name(ctx)),
        Op::Selection => Ok(query::selection(ctx)),
        Op::VisibleMeshes => Ok(query::visible_meshes(ctx)),
        Op::SelectedAndVisible => Ok(query::selected_and_visible(ctx)),
        Op::LocationData(names) => query::location_data(ctx, &names),
        Op::PivotData(names) => query::pivot_data(ctx, &names),
        Op::TransformData(names) => query::transform_data(ctx, &names),
        Op::Parents(names) => Ok(query::parents(ctx, &names)),
        Op::VertexData(names) => query::vertex_data(ctx, &names),
        Op::VertexDataSingle(name) => query::vertex_data_single(ctx, &name),
        Op::Raytrace { distance, name, bidirectional } => {
            query::raytrace(ctx, distance, &name, bidirectional)
        }
        Op::ReportDone => Ok(Output::Value("Done".into())),

        Op::AddObjects(batch) => placement::add_objects(ctx, batch),
        Op::AddObjectsFromTriangles(batch) => placement::add_objects_from_triangles(ctx, batch),
        Op::AddObjectsFromPolygons(polygons) => placement::add_objects_from_polygons(ctx, polygons),
        Op::AddMeshOnSelection(paths) => reference::add_mesh_on_selection(ctx, &paths),
        Op::DropAssets { anchor, paths } => placement::drop_assets(ctx, anchor, &paths),

        Op::Parent(names) => hierarchy::parent(ctx, &names),
        Op::Unparent(names) => hierarchy::unparent(ctx, &names),
        Op::Remove(names) => hierarchy::remove(ctx, &names),
        Op::RemoveDescendants(names) => hierarchy::remove_descendants(ctx, &names),
        Op::Rename { name, label } => hierarchy::rename(ctx, &name, &label),
        Op::Select(names) => hierarchy::select(ctx, &names),
        Op::SetVisible { names, visible } => hierarchy::set_visible(ctx, &names, visible),

        Op::Transform { kind, relative, value, names } => {
            transform::apply_transform(ctx, kind, relative, value, &names)
        }
        Op::TranslateAndRaytrace { location, distance, align_above, names, ignore } => {
            placement::translate_and_raytrace(ctx, location, distance, align_above, &names, &ignore)
        }
        Op::SetMesh { asset, names } => {
            let targets = ctx.resolve_all(&names);
            reference::set_mesh(ctx, &asset, &targets)
        }
        Op::SetMeshOnSelection(asset) => {
            let targets = ctx.host.selection();
            reference::set_mesh(ctx, &asset, &targets)
        }

        Op::OpenFile(path) => lifecycle::open_file(ctx, &path),
        Op::SaveScene => lifecycle::save_scene(ctx),
        Op::LearnFile(request) => lifecycle::learn_file(ctx, &request),
        Op::Learn(path) => lifecycle::learn(ctx, &path, &[], None),

        Op::EnableSimulation(names) => simulation::enable(ctx, &names),
        Op::Simulation(control) => simulation::control(ctx, control),
        Op::SimulationQuery => Ok(Output::Value(serde_json::Value::Null)),

        Op::Ignored => Ok(Output::Silent),
    }
}
