// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Scene Bridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

use smol_str::SmolStr;

use super::ids::{IdError, PersistentId};

/// Cross-session object reference exchanged with the peer.
///
/// Canonical format: `<label>#<persistent_id>`. A bare `<label>` (no `#`) is also accepted on
/// input; it resolves by display label only. The label is informational: once an id is
/// present, resolution never looks at it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StableName {
    label: SmolStr,
    id: Option<PersistentId>,
}

impl StableName {
    pub fn new(label: impl Into<SmolStr>, id: PersistentId) -> Self {
        Self {
            label: label.into(),
            id: Some(id),
        }
    }

    /// A label-only name, as used for caller-provided temporary names.
    pub fn label_only(label: impl Into<SmolStr>) -> Self {
        Self {
            label: label.into(),
            id: None,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn id(&self) -> Option<&PersistentId> {
        self.id.as_ref()
    }

    pub fn parse(input: &str) -> Result<Self, ParseStableNameError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ParseStableNameError::Empty);
        }

        let Some((label, id)) = input.rsplit_once('#') else {
            return Ok(Self::label_only(input));
        };

        if label.is_empty() {
            return Err(ParseStableNameError::MissingLabel);
        }
        if id.is_empty() {
            return Err(ParseStableNameError::MissingId);
        }
        let id = PersistentId::new(id.to_ascii_lowercase())
            .map_err(ParseStableNameError::InvalidId)?;
        Ok(Self {
            label: label.into(),
            id: Some(id),
        })
    }

    /// Parses a comma-separated list, keeping list positions: entries that fail to parse
    /// become `None` so callers can zip the result with the raw input.
    pub fn parse_list(input: &str) -> Vec<Option<Self>> {
        input.split(',').map(|raw| Self::parse(raw).ok()).collect()
    }
}

impl fmt::Display for StableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)?;
        if let Some(id) = &self.id {
            write!(f, "#{id}")?;
        }
        Ok(())
    }
}

impl FromStr for StableName {
    type Err = ParseStableNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseStableNameError {
    Empty,
    MissingLabel,
    MissingId,
    InvalidId(IdError),
}

impl fmt::Display for ParseStableNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("stable name must not be empty"),
            Self::MissingLabel => f.write_str("stable name is missing its label"),
            Self::MissingId => f.write_str("stable name has '#' but no persistent id"),
            Self::InvalidId(err) => write!(f, "invalid persistent id: {err}"),
        }
    }
}

impl std::error::Error for ParseStableNameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidId(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ParseStableNameError, StableName};

    #[test]
    fn parses_and_formats_label_and_id() {
        let cases = [
            "chair#5c3f0a2e-0000-4000-8000-00000000002a",
            "pCube1#0000000a-0000-4000-8000-000000000000",
        ];

        for s in cases {
            let parsed: StableName = s.parse().expect("parse");
            assert_eq!(parsed.to_string(), s);
        }
    }

    #[test]
    fn lowercases_persistent_id() {
        let parsed = StableName::parse("lamp#ABCDEF").expect("parse");
        assert_eq!(parsed.id().map(|id| id.as_str()), Some("abcdef"));
        assert_eq!(parsed.label(), "lamp");
    }

    #[test]
    fn accepts_label_only_names() {
        let parsed = StableName::parse("table_01").expect("parse");
        assert_eq!(parsed.label(), "table_01");
        assert!(parsed.id().is_none());
        assert_eq!(parsed.to_string(), "table_01");
    }

    #[test]
    fn splits_on_last_hash() {
        let parsed = StableName::parse("odd#label#1234").expect("parse");
        assert_eq!(parsed.label(), "odd#label");
        assert_eq!(parsed.id().map(|id| id.as_str()), Some("1234"));
    }

    #[test]
    fn rejects_missing_parts() {
        assert_eq!(StableName::parse(""), Err(ParseStableNameError::Empty));
        assert_eq!(
            StableName::parse("#1234"),
            Err(ParseStableNameError::MissingLabel)
        );
        assert_eq!(
            StableName::parse("chair#"),
            Err(ParseStableNameError::MissingId)
        );
    }

    #[test]
    fn parse_list_keeps_positions() {
        let list = StableName::parse_list("a#1,,b");
        assert_eq!(list.len(), 3);
        assert!(list[0].is_some());
        assert!(list[1].is_none());
        assert_eq!(list[2].as_ref().map(|n| n.label()), Some("b"));
    }
}
