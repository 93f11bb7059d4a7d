// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Scene Bridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Scene Bridge: a line-oriented TCP command bridge between a standalone editor and a live
//! 3D scene host.
//!
//! Peers send one command per line. Lines from every connection are funnelled into a single
//! worker that owns the [`host::SceneHost`], so the scene is never mutated concurrently.

pub mod config;
pub mod error;
pub mod geometry;
pub mod host;
pub mod identity;
pub mod model;
pub mod ops;
pub mod protocol;
pub mod server;

pub use config::BridgeConfig;
pub use error::{Error, Result};
