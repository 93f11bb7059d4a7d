// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Scene Bridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use super::args::Args;
use super::CommandError;
use crate::host::SimulationControl;
use crate::ops::{Op, TransformKind};

/// Turns a command's arguments into an operation.
pub type Handler = fn(&Args<'_>) -> Result<Op, CommandError>;

/// Every command the bridge answers to. The registry must cover exactly this list.
pub const COMMAND_NAMES: &[&str] = &[
    "get_scene_name",
    "get_selection",
    "get_visible_static_mesh_actors",
    "get_selected_and_visible_static_mesh_actors",
    "get_location_data",
    "get_pivot_data",
    "get_transform_data",
    "get_parents",
    "get_vertex_data_from_scene_objects",
    "get_vertex_data_from_scene_object",
    "raytrace",
    "raytrace_bidirectional",
    "report_done",
    "add_objects",
    "add_objects_from_triangles",
    "add_objects_from_polygons",
    "add_mesh_on_selection",
    "drop_asset",
    "load_assets",
    "parent",
    "unparent",
    "remove",
    "remove_descendents",
    "rename",
    "select",
    "set_visible",
    "set_hidden",
    "translate",
    "rotate",
    "scale",
    "translate_relative",
    "rotate_relative",
    "scale_relative",
    "translate_and_snap",
    "translate_and_raytrace",
    "set_mesh",
    "set_mesh_on_selection",
    "open_file",
    "save_current_scene",
    "learn_file",
    "learn",
    "enable_simulation_on_objects",
    "start_simulation",
    "cancel_simulation",
    "end_simulation",
    "get_simulation_on_actors_by_name",
    "get_transform_data_from_simulating_objects",
    // Editor-side conveniences with no counterpart here. Accepted silently so they never
    // reach the script host.
    "focus",
    "isolate_selection",
    "toggle_surface_snapping",
    "screenshot",
    "setup_learn_scene",
    "learn_asset_file",
    "create_assets_from_selection",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("commands without a handler: {0:?}")]
    Missing(Vec<&'static str>),

    #[error("handlers for unlisted commands: {0:?}")]
    Unexpected(Vec<&'static str>),
}

/// Command name → handler.
#[derive(Clone, Default)]
pub struct Registry {
    handlers: HashMap<&'static str, Handler>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.handlers.keys().copied().collect();
        names.sort_unstable();
        f.debug_struct("Registry").field("commands", &names).finish()
    }
}

fn transform(kind: TransformKind, relative: bool, args: &Args<'_>) -> Result<Op, CommandError> {
    Ok(Op::Transform {
        kind,
        relative,
        value: args.vec3(0, "value")?,
        names: args.list(1, "names")?,
    })
}

impl Registry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registers `handler`, replacing any earlier handler of the same name.
    pub fn register(&mut self, name: &'static str, handler: Handler) {
        self.handlers.insert(name, handler);
    }

    /// The handler and the command's canonical name.
    pub fn get(&self, name: &str) -> Option<(&'static str, Handler)> {
        self.handlers.get_key_value(name).map(|(name, handler)| (*name, *handler))
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Checks that the registry covers [`COMMAND_NAMES`] exactly.
    pub fn validate(&self) -> Result<(), RegistryError> {
        let missing: Vec<&'static str> = COMMAND_NAMES
            .iter()
            .copied()
            .filter(|name| !self.handlers.contains_key(name))
            .collect();
        if !missing.is_empty() {
            return Err(RegistryError::Missing(missing));
        }
        let mut unexpected: Vec<&'static str> = self
            .handlers
            .keys()
            .copied()
            .filter(|name| !COMMAND_NAMES.contains(name))
            .collect();
        if !unexpected.is_empty() {
            unexpected.sort_unstable();
            return Err(RegistryError::Unexpected(unexpected));
        }
        Ok(())
    }

    /// The full command vocabulary.
    pub fn builtin() -> Self {
        let mut r = Self::empty();

        r.register("get_scene_name", |_| Ok(Op::SceneName));
        r.register("get_selection", |_| Ok(Op::Selection));
        r.register("get_visible_static_mesh_actors", |_| Ok(Op::VisibleMeshes));
        r.register("get_selected_and_visible_static_mesh_actors", |_| {
            Ok(Op::SelectedAndVisible)
        });
        r.register("get_location_data", |a| {
            Ok(Op::LocationData(a.list(0, "names")?))
        });
        r.register("get_pivot_data", |a| Ok(Op::PivotData(a.list(0, "names")?)));
        r.register("get_transform_data", |a| {
            Ok(Op::TransformData(a.list(0, "names")?))
        });
        r.register("get_parents", |a| Ok(Op::Parents(a.list(0, "names")?)));
        r.register("get_vertex_data_from_scene_objects", |a| {
            Ok(Op::VertexData(a.list(0, "names")?))
        });
        r.register("get_vertex_data_from_scene_object", |a| {
            Ok(Op::VertexDataSingle(a.token(0, "name")?.to_owned()))
        });
        r.register("raytrace", |a| {
            Ok(Op::Raytrace {
                distance: a.number(0, "distance")?,
                name: a.token(1, "name")?.to_owned(),
                bidirectional: false,
            })
        });
        r.register("raytrace_bidirectional", |a| {
            Ok(Op::Raytrace {
                distance: a.number(0, "distance")?,
                name: a.token(1, "name")?.to_owned(),
                bidirectional: true,
            })
        });
        r.register("report_done", |_| Ok(Op::ReportDone));

        r.register("add_objects", |a| {
            Ok(Op::AddObjects(a.json_entries("objects")?))
        });
        r.register("add_objects_from_triangles", |a| {
            Ok(Op::AddObjectsFromTriangles(a.json_entries("objects")?))
        });
        r.register("add_objects_from_polygons", |a| {
            Ok(Op::AddObjectsFromPolygons(a.json("polygons")?))
        });
        r.register("add_mesh_on_selection", |a| {
            Ok(Op::AddMeshOnSelection(a.list(0, "paths")?))
        });
        // Bare drag-and-drop notifications are handled by the host itself.
        r.register("drop_asset", |a| {
            if a.is_empty() {
                return Ok(Op::Ignored);
            }
            Ok(Op::DropAssets {
                anchor: a.vec3(0, "anchor")?,
                paths: a.list(1, "paths")?,
            })
        });
        r.register("load_assets", |_| Ok(Op::Ignored));

        for name in [
            "focus",
            "isolate_selection",
            "toggle_surface_snapping",
            "screenshot",
            "setup_learn_scene",
            "learn_asset_file",
            "create_assets_from_selection",
        ] {
            r.register(name, |_| Ok(Op::Ignored));
        }

        r.register("parent", |a| Ok(Op::Parent(a.list(0, "names")?)));
        r.register("unparent", |a| Ok(Op::Unparent(a.list(0, "names")?)));
        r.register("remove", |a| Ok(Op::Remove(a.list(0, "names")?)));
        r.register("remove_descendents", |a| {
            Ok(Op::RemoveDescendants(a.list(0, "names")?))
        });
        r.register("rename", |a| {
            Ok(Op::Rename {
                name: a.token(0, "name")?.to_owned(),
                label: a.token(1, "label")?.to_owned(),
            })
        });
        r.register("select", |a| Ok(Op::Select(a.list(0, "names")?)));
        r.register("set_visible", |a| {
            Ok(Op::SetVisible {
                names: a.list(0, "names")?,
                visible: true,
            })
        });
        r.register("set_hidden", |a| {
            Ok(Op::SetVisible {
                names: a.list(0, "names")?,
                visible: false,
            })
        });

        r.register("translate", |a| {
            transform(TransformKind::Translate, false, a)
        });
        r.register("rotate", |a| transform(TransformKind::Rotate, false, a));
        r.register("scale", |a| transform(TransformKind::Scale, false, a));
        r.register("translate_relative", |a| {
            transform(TransformKind::Translate, true, a)
        });
        r.register("rotate_relative", |a| {
            transform(TransformKind::Rotate, true, a)
        });
        r.register("scale_relative", |a| {
            transform(TransformKind::Scale, true, a)
        });
        r.register("translate_and_snap", |a| {
            Ok(Op::TranslateAndRaytrace {
                location: a.vec3(0, "location")?,
                distance: a.number(1, "distance")?,
                align_above: a.number(2, "max_normal_deviation")?,
                names: a.list(3, "names")?,
                ignore: a.optional_list(4),
            })
        });
        r.register("translate_and_raytrace", |a| {
            Ok(Op::TranslateAndRaytrace {
                location: a.vec3(0, "location")?,
                distance: a.number(1, "distance")?,
                align_above: 0.0,
                names: a.list(2, "names")?,
                ignore: a.optional_list(3),
            })
        });
        r.register("set_mesh", |a| {
            Ok(Op::SetMesh {
                asset: a.token(0, "asset")?.to_owned(),
                names: a.list(1, "names")?,
            })
        });
        r.register("set_mesh_on_selection", |a| {
            Ok(Op::SetMeshOnSelection(a.token(0, "asset")?.to_owned()))
        });

        r.register("open_file", |a| {
            Ok(Op::OpenFile(a.rest("path")?.to_owned()))
        });
        r.register("save_current_scene", |_| Ok(Op::SaveScene));
        r.register("learn_file", |a| Ok(Op::LearnFile(a.json("request")?)));
        r.register("learn", |a| Ok(Op::Learn(a.rest("path")?.to_owned())));

        r.register("enable_simulation_on_objects", |a| {
            Ok(Op::EnableSimulation(a.list(0, "names")?))
        });
        r.register("start_simulation", |_| {
            Ok(Op::Simulation(SimulationControl::Start))
        });
        r.register("cancel_simulation", |_| {
            Ok(Op::Simulation(SimulationControl::Cancel))
        });
        r.register("end_simulation", |_| {
            Ok(Op::Simulation(SimulationControl::End))
        });
        r.register("get_simulation_on_actors_by_name", |_| {
            Ok(Op::SimulationQuery)
        });
        r.register("get_transform_data_from_simulating_objects", |_| {
            Ok(Op::SimulationQuery)
        });

        r
    }
}
