// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Scene Bridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::Serialize;
use serde_json::json;
use tracing::info;

use super::query::{raw_object_data, RawObjectData};
use super::{LearnFileRequest, OpError, OpResult, Output, SceneContext};
use crate::model::Handle;

/// Marks objects (or whole branches) the learning pass must not see.
const EXCLUDE_MARKER: &str = "_kill_";

#[derive(Debug, Serialize)]
struct LearningData<'a> {
    raw_data: Vec<RawObjectData>,
    scene_id: String,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    extra_tags: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    project: Option<&'a str>,
}

fn normalize_path(path: &str) -> String {
    path.trim().replace('\\', "/")
}

/// Opens a scene file, discarding unsaved changes. Answers whether it was opened.
pub(super) fn open_file(ctx: &mut SceneContext<'_>, path: &str) -> OpResult<Output> {
    let path = normalize_path(path);
    if path.is_empty() {
        return Ok(Output::Value(json!(false)));
    }
    let opened = ctx.host.open_scene(&path)?;
    if opened {
        // Handles from the previous scene are meaningless now.
        ctx.redirects.clear();
        info!(path = %path, "scene opened");
    } else {
        info!(path = %path, "scene file does not exist");
    }
    Ok(Output::Value(json!(opened)))
}

pub(super) fn save_scene(ctx: &mut SceneContext<'_>) -> OpResult<Output> {
    ctx.host.save_scene()?;
    Ok(Output::Silent)
}

/// Opens a scene and writes its learning data.
pub(super) fn learn_file(
    ctx: &mut SceneContext<'_>,
    request: &LearnFileRequest,
) -> OpResult<Output> {
    let scene = normalize_path(&request.file_path);
    if !ctx.host.open_scene(&scene)? {
        return Err(OpError::MissingScene(scene));
    }
    ctx.redirects.clear();
    learn(
        ctx,
        &request.learn_file_path,
        &request.tags,
        request.project.as_deref(),
    )
}

fn excluded(ctx: &SceneContext<'_>, node: Handle) -> bool {
    let mut current = Some(node);
    while let Some(n) = current {
        if ctx.host.label(n).is_some_and(|label| label.contains(EXCLUDE_MARKER)) {
            return true;
        }
        current = ctx.host.parent(n);
    }
    false
}

/// Every transform with geometry on or below it, minus excluded branches.
fn learning_records(ctx: &SceneContext<'_>) -> OpResult<Vec<RawObjectData>> {
    let mut records = Vec::new();
    for node in ctx.host.transforms() {
        let carries_geometry = ctx.host.has_mesh(node)
            || ctx
                .host
                .descendants(node)
                .iter()
                .any(|d| ctx.host.has_mesh(*d));
        if !carries_geometry || excluded(ctx, node) {
            continue;
        }
        records.push(raw_object_data(ctx, node)?);
    }
    Ok(records)
}

/// Writes learning data for the open scene to `path` as JSON.
pub(super) fn learn(
    ctx: &mut SceneContext<'_>,
    path: &str,
    tags: &[String],
    project: Option<&str>,
) -> OpResult<Output> {
    let data = LearningData {
        raw_data: learning_records(ctx)?,
        scene_id: format!("{}/", ctx.host.scene_name().unwrap_or_default()),
        extra_tags: tags,
        project,
    };
    let encoded = serde_json::to_string(&data)?;
    let path = normalize_path(path);
    std::fs::write(&path, encoded).map_err(|source| OpError::Learn {
        path: path.clone(),
        source,
    })?;
    info!(path = %path, objects = data.raw_data.len(), "learning data written");
    Ok(Output::Value(json!(true)))
}
