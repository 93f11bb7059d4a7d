// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Scene Bridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use thiserror::Error;

use crate::config::ConfigError;
use crate::server::{BindError, ServerError};

/// Top-level failure of a bridge run.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Bind(#[from] BindError),

    #[error(transparent)]
    Server(#[from] ServerError),

    #[error("failed to start the async runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
